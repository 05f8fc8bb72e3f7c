//! Conversions between store types and SQLite column values.

use rusqlite::types::Type;
use rusqlite::Row;

use crate::error::{Result, StoreError};

/// Read a 32-byte blob column into an identifier type.
pub(crate) fn read_id<T: From<[u8; 32]>>(
    row: &Row<'_>,
    idx: usize,
    column: &'static str,
) -> rusqlite::Result<T> {
    let bytes: Vec<u8> = row.get(idx)?;
    let len = bytes.len();
    <[u8; 32]>::try_from(bytes.as_slice())
        .map(T::from)
        .map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                idx,
                Type::Blob,
                Box::new(StoreError::InvalidBlob { column, len }),
            )
        })
}

/// Read a non-negative INTEGER column as `u64`.
pub(crate) fn read_u64(row: &Row<'_>, idx: usize) -> rusqlite::Result<u64> {
    let value: i64 = row.get(idx)?;
    u64::try_from(value).map_err(|_| rusqlite::Error::IntegralValueOutOfRange(idx, value))
}

/// SQLite integers are signed 64-bit; reject anything above `i64::MAX`.
pub(crate) fn to_sql_int(value: u64, what: &'static str) -> Result<i64> {
    i64::try_from(value).map_err(|_| StoreError::OutOfRange(what))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_sql_int_rejects_values_above_i64_max() {
        assert_eq!(to_sql_int(42, "n").unwrap(), 42);
        assert!(matches!(
            to_sql_int(u64::MAX, "n"),
            Err(StoreError::OutOfRange("n"))
        ));
    }
}
