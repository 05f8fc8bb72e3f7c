use rusqlite::Transaction;

const UP_SQL: &str = r#"
-- Channels are soft-deleted: removal flips this flag and keeps the row.
ALTER TABLE local_channels ADD COLUMN is_closed BOOLEAN NOT NULL DEFAULT 0;
"#;

pub fn up(tx: &Transaction<'_>) -> Result<(), rusqlite::Error> {
    tx.execute_batch(UP_SQL)
}
