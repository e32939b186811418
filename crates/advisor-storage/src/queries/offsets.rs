// SPDX-FileCopyrightText: 2026 Advisor Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Consumer offset checkpoints.

use advisor_core::AdvisorError;
use rusqlite::{OptionalExtension, params};

use crate::database::Database;

/// Load the stored offset for `consumer`, if one was ever saved.
pub async fn load(db: &Database, consumer: &str) -> Result<Option<u64>, AdvisorError> {
    let consumer = consumer.to_string();
    let stored: Option<i64> = db
        .connection()
        .call(move |conn| {
            conn.query_row(
                r#"SELECT "offset" FROM consumer_offsets WHERE consumer = ?1"#,
                params![consumer],
                |row| row.get(0),
            )
            .optional()
        })
        .await
        .map_err(crate::database::map_tr_err)?;

    stored
        .map(|value| u64::try_from(value).map_err(AdvisorError::storage))
        .transpose()
}

/// Upsert the offset for `consumer`.
pub async fn save(db: &Database, consumer: &str, offset: u64) -> Result<(), AdvisorError> {
    let consumer = consumer.to_string();
    let offset = i64::try_from(offset).map_err(AdvisorError::storage)?;
    db.connection()
        .call(move |conn| {
            conn.execute(
                r#"INSERT INTO consumer_offsets (consumer, "offset") VALUES (?1, ?2)
                   ON CONFLICT (consumer) DO UPDATE SET
                       "offset" = excluded."offset",
                       updated_at = strftime('%Y-%m-%dT%H:%M:%fZ', 'now')"#,
                params![consumer, offset],
            )?;
            Ok(())
        })
        .await
        .map_err(crate::database::map_tr_err)
}
