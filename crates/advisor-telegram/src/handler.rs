// SPDX-FileCopyrightText: 2026 Advisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Conversion of Telegram updates into channel-agnostic [`Event`]s.

use advisor_core::Event;
use teloxide::types::{Message, Update, UpdateKind};

/// Converts one update into an event.
///
/// Every update becomes an event so it counts toward the consumer offset.
/// Anything that is not a plain new message is marked unsupported.
pub fn to_event(update: &Update) -> Event {
    let id = u64::from(update.id.0);
    match &update.kind {
        UpdateKind::Message(msg) => message_event(id, msg),
        _ => Event::unsupported(id),
    }
}

/// Builds a message event. Non-text messages (locations, photos) carry empty text.
pub fn message_event(id: u64, msg: &Message) -> Event {
    Event::message(
        id,
        msg.text().unwrap_or_default(),
        msg.chat.id.0,
        sender_key(msg),
    )
}

/// The identity tasks are stored under.
///
/// Users without a username fall back to their numeric id, so tasks of two
/// such users never merge. Messages without a sender use the chat id.
pub fn sender_key(msg: &Message) -> String {
    match msg.from.as_ref() {
        Some(user) => user
            .username
            .clone()
            .unwrap_or_else(|| user.id.0.to_string()),
        None => msg.chat.id.0.to_string(),
    }
}
