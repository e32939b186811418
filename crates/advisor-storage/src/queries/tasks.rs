// SPDX-FileCopyrightText: 2026 Advisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Task record operations, always scoped by user name.

use advisor_core::{AdvisorError, SaveOutcome, Task};
use rusqlite::{OptionalExtension, params};

use crate::database::Database;

fn task_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Task> {
    Ok(Task {
        url: row.get(0)?,
        user_name: row.get(1)?,
    })
}

/// Returns true if the user already has a task with this text.
pub async fn exists(db: &Database, task: &Task) -> Result<bool, AdvisorError> {
    let task = task.clone();
    db.connection()
        .call(move |conn| {
            let found: bool = conn.query_row(
                "SELECT EXISTS(SELECT 1 FROM tasks WHERE user_name = ?1 AND url = ?2)",
                params![task.user_name, task.url],
                |row| row.get(0),
            )?;
            Ok(found)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Insert a task. The unique index turns a duplicate into a no-op.
pub async fn insert(db: &Database, task: &Task) -> Result<SaveOutcome, AdvisorError> {
    let task = task.clone();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "INSERT INTO tasks (url, user_name) VALUES (?1, ?2)
                 ON CONFLICT (user_name, url) DO NOTHING",
                params![task.url, task.user_name],
            )?;
            Ok(if changed == 0 {
                SaveOutcome::AlreadyExists
            } else {
                SaveOutcome::Inserted
            })
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Pick one of the user's tasks uniformly at random.
pub async fn pick_random(db: &Database, user_name: &str) -> Result<Option<Task>, AdvisorError> {
    let user_name = user_name.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                "SELECT url, user_name FROM tasks
                 WHERE user_name = ?1
                 ORDER BY RANDOM()
                 LIMIT 1",
                params![user_name],
                task_from_row,
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// Delete the task with exactly this key. Returns false if nothing matched.
pub async fn remove(db: &Database, task: &Task) -> Result<bool, AdvisorError> {
    let task = task.clone();
    db.connection()
        .call(move |conn| {
            let deleted = conn.execute(
                "DELETE FROM tasks WHERE user_name = ?1 AND url = ?2",
                params![task.user_name, task.url],
            )?;
            Ok(deleted > 0)
        })
        .await
        .map_err(crate::database::map_tr_err)
}

/// All of the user's tasks in insertion order.
pub async fn list_by_user(db: &Database, user_name: &str) -> Result<Vec<Task>, AdvisorError> {
    let user_name = user_name.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(
                "SELECT url, user_name FROM tasks
                 WHERE user_name = ?1
                 ORDER BY id ASC",
            )?;
            let rows = stmt.query_map(params![user_name], task_from_row)?;
            rows.collect::<Result<Vec<_>, _>>()
        })
        .await
        .map_err(crate::database::map_tr_err)
}
