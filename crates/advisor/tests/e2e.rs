// SPDX-FileCopyrightText: 2026 Advisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end integration tests for the complete Advisor pipeline.
//!
//! Each test creates an isolated TestHarness with temp SQLite and mock
//! adapters. Tests are independent and order-insensitive.

use advisor_config::model::RepliesConfig;
use advisor_core::TaskStore;
use advisor_test_utils::TestHarness;

// ---- Task lifecycle ----

#[tokio::test]
async fn save_list_delete_until_empty() {
    let harness = TestHarness::new().await.unwrap();
    harness.send(10, "alice", "buy milk").await;
    harness.send(10, "alice", "walk dog").await;
    harness.send(10, "alice", "/tasks").await;
    harness.send(10, "alice", "/delete 1").await;
    harness.send(10, "alice", "/delete 1").await;
    harness.send(10, "alice", "/tasks").await;

    let offset = harness.run_until_drained().await.unwrap();
    assert_eq!(offset, 6);
    assert_eq!(
        harness.sink.texts_for(10).await,
        vec![
            "Task saved! 👌",
            "Task saved! 👌",
            "📝 Your tasks:\n\n1. buy milk\n2. walk dog\n",
            "🗑 Deleted: buy milk",
            "🗑 Deleted: walk dog",
            "You have no saved tasks 🙊",
        ]
    );
    assert!(harness.storage.list_all("alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn duplicate_task_is_stored_once() {
    let harness = TestHarness::new().await.unwrap();
    harness.send(10, "alice", "buy milk").await;
    harness.send(10, "alice", "buy milk").await;

    harness.run_until_drained().await.unwrap();
    assert_eq!(
        harness.sink.texts().await,
        vec!["Task saved! 👌", "You already have this task in your list 🤗"]
    );
    assert_eq!(harness.storage.list_all("alice").await.unwrap().len(), 1);
}

#[tokio::test]
async fn random_pick_returns_and_removes_the_only_task() {
    let harness = TestHarness::new().await.unwrap();
    harness.send(10, "alice", "read a book").await;
    harness.send(10, "alice", "/rnd").await;
    harness.send(10, "alice", "/rnd").await;

    harness.run_until_drained().await.unwrap();
    assert_eq!(
        harness.sink.texts().await,
        vec!["Task saved! 👌", "read a book", "You have no saved tasks 🙊"]
    );
}

#[tokio::test]
async fn users_never_see_each_others_tasks() {
    let harness = TestHarness::new().await.unwrap();
    harness.send(10, "alice", "alice task").await;
    harness.send(20, "bob", "bob task").await;
    harness.send(10, "alice", "/tasks").await;
    harness.send(20, "bob", "/tasks").await;

    harness.run_until_drained().await.unwrap();
    assert_eq!(
        harness.sink.texts_for(10).await[1],
        "📝 Your tasks:\n\n1. alice task\n"
    );
    assert_eq!(
        harness.sink.texts_for(20).await[1],
        "📝 Your tasks:\n\n1. bob task\n"
    );
}

// ---- Commands ----

#[tokio::test]
async fn start_help_and_unknown_commands() {
    let harness = TestHarness::new().await.unwrap();
    harness.send(10, "alice", "/start").await;
    harness.send(10, "alice", "/help").await;
    harness.send(10, "alice", "/frobnicate").await;

    harness.run_until_drained().await.unwrap();
    let texts = harness.sink.texts().await;
    assert_eq!(texts.len(), 3);
    assert!(texts[0].starts_with("Hi there! ✅\n\n"));
    assert!(texts[0].ends_with(&texts[1]));
    assert_eq!(texts[2], "Unknown command 🤔");
    assert!(harness.storage.list_all("alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn commands_with_trailing_words_are_unknown() {
    let harness = TestHarness::new().await.unwrap();
    harness.send(10, "alice", "keep me").await;
    harness.send(10, "alice", "/rnd now").await;

    harness.run_until_drained().await.unwrap();
    assert_eq!(
        harness.sink.texts().await,
        vec!["Task saved! 👌", "Unknown command 🤔"]
    );
    assert_eq!(harness.storage.list_all("alice").await.unwrap().len(), 1);
}

#[tokio::test]
async fn custom_reply_catalog_is_used() {
    let harness = TestHarness::builder()
        .with_replies(RepliesConfig {
            saved: "Noted.".into(),
            delete_usage: "Try {prefix}delete N".into(),
            ..RepliesConfig::default()
        })
        .build()
        .await
        .unwrap();
    harness.send(10, "alice", "water plants").await;
    harness.send(10, "alice", "/delete").await;

    harness.run_until_drained().await.unwrap();
    assert_eq!(harness.sink.texts().await, vec!["Noted.", "Try /delete N"]);
}

#[tokio::test]
async fn bad_delete_arguments_leave_tasks_alone() {
    let harness = TestHarness::new().await.unwrap();
    harness.send(10, "alice", "keep me").await;
    harness.send(10, "alice", "/delete").await;
    harness.send(10, "alice", "/delete zero").await;
    harness.send(10, "alice", "/delete 0").await;
    harness.send(10, "alice", "/delete 5").await;

    harness.run_until_drained().await.unwrap();
    assert_eq!(
        harness.sink.texts().await,
        vec![
            "Task saved! 👌",
            "Usage: /delete <number>",
            "Wrong number",
            "Wrong number",
            "No task with this number",
        ]
    );
    assert_eq!(harness.storage.list_all("alice").await.unwrap().len(), 1);
}

#[tokio::test]
async fn unsupported_updates_are_skipped() {
    let harness = TestHarness::new().await.unwrap();
    harness.source.push_unsupported().await;
    harness.send(10, "alice", "after the sticker").await;

    let offset = harness.run_until_drained().await.unwrap();
    assert_eq!(offset, 2);
    assert_eq!(harness.sink.texts().await, vec!["Task saved! 👌"]);
}

// ---- Offset checkpointing ----

#[tokio::test]
async fn checkpoint_survives_restart() {
    let harness = TestHarness::new().await.unwrap();
    harness.send(10, "alice", "first").await;
    harness.send(10, "alice", "second").await;
    assert_eq!(harness.run_until_drained().await.unwrap(), 2);

    harness.send(10, "alice", "/tasks").await;
    assert_eq!(harness.run_until_drained().await.unwrap(), 3);

    // The second consumer started at the stored checkpoint, not at zero.
    let offsets = harness.source.fetch_offsets().await;
    assert!(offsets.contains(&2));
    assert_eq!(offsets.iter().filter(|&&o| o == 0).count(), 1);
    assert_eq!(harness.sink.texts().await.len(), 3);
}

#[tokio::test]
async fn small_batches_cover_the_whole_stream() {
    let harness = TestHarness::builder()
        .with_batch_size(2)
        .build()
        .await
        .unwrap();
    for i in 0..5 {
        harness.send(10, "alice", &format!("task {i}")).await;
    }

    assert_eq!(harness.run_until_drained().await.unwrap(), 5);
    assert_eq!(
        harness.source.fetch_offsets().await,
        vec![0, 2, 4, 5]
    );
    assert_eq!(harness.storage.list_all("alice").await.unwrap().len(), 5);
}

#[tokio::test]
async fn failed_replies_still_advance_the_offset() {
    let harness = TestHarness::new().await.unwrap();
    harness.sink.set_failing(true);
    harness.send(10, "alice", "saved anyway").await;

    assert_eq!(harness.run_until_drained().await.unwrap(), 1);
    assert_eq!(harness.storage.list_all("alice").await.unwrap().len(), 1);
}
