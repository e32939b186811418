// SPDX-FileCopyrightText: 2026 Advisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Translation between the consumer's count-based offset and Telegram update ids.
//!
//! The consumer advances its offset by the number of events it handled. Telegram
//! expects `getUpdates(offset)` to be one past the last confirmed `update_id`.
//! The cursor anchors the two on the first batch it sees and afterwards never
//! requests an id at or below one it already delivered.

/// Maps logical offsets onto Telegram `getUpdates` offsets.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateCursor {
    /// `update_id - logical offset` of the first delivered update.
    anchor: Option<i64>,
    /// One past the highest update id delivered so far.
    floor: i64,
}

impl UpdateCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// The Telegram offset to request for `logical`.
    ///
    /// Before any update has been seen this is the floor (0 asks Telegram for
    /// every unconfirmed update).
    pub fn request_offset(&self, logical: u64) -> i64 {
        match self.anchor {
            Some(anchor) => logical_to_i64(logical).saturating_add(anchor).max(self.floor),
            None => self.floor,
        }
    }

    /// Record a delivered batch whose update ids run from `first_id` to `last_id`.
    pub fn observe(&mut self, logical: u64, first_id: i64, last_id: i64) {
        if self.anchor.is_none() {
            self.anchor = Some(first_id.saturating_sub(logical_to_i64(logical)));
        }
        self.floor = self.floor.max(last_id.saturating_add(1));
    }

    /// One past the highest delivered update id; 0 before the first batch.
    pub fn floor(&self) -> i64 {
        self.floor
    }
}

fn logical_to_i64(logical: u64) -> i64 {
    i64::try_from(logical).unwrap_or(i64::MAX)
}
