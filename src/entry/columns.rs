//! Column projections shared by the read and write paths.
//!
//! Every entry type lists its storage columns once as `(name, read, write)`
//! triples. Rows are fetched by column name, so the same projection works for
//! `SELECT *` over a single table and for joins that carry extra columns.

use rusqlite::Row;
use rusqlite::types::{FromSqlError, FromSqlResult, Value, ValueRef};
use uuid::Uuid;

/// A single storage column of an entry type.
pub struct Column<T> {
    pub name: &'static str,
    pub read: fn(&mut T, ValueRef<'_>) -> FromSqlResult<()>,
    pub write: fn(&T) -> Value,
}

/// Builds a [`Column`] for a struct field whose type implements [`ColumnValue`].
macro_rules! column {
    ($name:literal => $field:ident) => {
        $crate::entry::Column {
            name: $name,
            read: |entry, value| {
                entry.$field = $crate::entry::ColumnValue::from_column(value)?;
                Ok(())
            },
            write: |entry| $crate::entry::ColumnValue::to_column(&entry.$field),
        }
    };
}

pub(crate) use column;

/// A record stored in exactly one table.
///
/// The first entry of `COLUMNS` is the integer primary key; an id of `-1`
/// means the record has not been persisted yet.
pub trait Entry: Default + Sized + 'static {
    const TABLE: &'static str;
    const COLUMNS: &'static [Column<Self>];

    fn id(&self) -> i64;
    fn set_id(&mut self, id: i64);

    /// Checks for values that may appear in queries but never in storage.
    fn validate(&self) -> crate::Result<()> {
        Ok(())
    }

    fn primary_key() -> &'static str {
        Self::COLUMNS[0].name
    }

    fn column_names() -> Vec<&'static str> {
        Self::COLUMNS.iter().map(|c| c.name).collect()
    }

    /// Fetch a row into a fresh entry by looking up each projected column by name.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let mut entry = Self::default();
        for column in Self::COLUMNS {
            let index = row.as_ref().column_index(column.name)?;
            let value = row.get_ref(index)?;
            (column.read)(&mut entry, value).map_err(|e| {
                rusqlite::Error::FromSqlConversionFailure(index, value.data_type(), Box::new(e))
            })?;
        }
        Ok(entry)
    }

    /// Values for every column except the primary key, in projection order.
    fn values(&self) -> Vec<Value> {
        Self::COLUMNS[1..].iter().map(|c| (c.write)(self)).collect()
    }
}

/// Read one named column of a row through its [`ColumnValue`] conversion.
pub fn read_column<T: ColumnValue>(row: &Row<'_>, name: &str) -> rusqlite::Result<T> {
    let index = row.as_ref().column_index(name)?;
    let value = row.get_ref(index)?;
    T::from_column(value)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(index, value.data_type(), Box::new(e)))
}

/// Conversion between a field type and its SQLite representation.
///
/// NULL (produced by outer joins) reads as the type's "absent" value:
/// `-1` for integer keys, empty strings, zero, `false` and the nil GUID.
pub trait ColumnValue: Sized {
    fn from_column(value: ValueRef<'_>) -> FromSqlResult<Self>;
    fn to_column(&self) -> Value;
}

impl ColumnValue for String {
    fn from_column(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Null => Ok(String::new()),
            ValueRef::Text(bytes) => String::from_utf8(bytes.to_vec())
                .map_err(|e| FromSqlError::Other(Box::new(e))),
            _ => Err(FromSqlError::InvalidType),
        }
    }

    fn to_column(&self) -> Value {
        Value::Text(self.clone())
    }
}

impl ColumnValue for i64 {
    fn from_column(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Null => Ok(-1),
            ValueRef::Integer(i) => Ok(i),
            _ => Err(FromSqlError::InvalidType),
        }
    }

    fn to_column(&self) -> Value {
        Value::Integer(*self)
    }
}

impl ColumnValue for u32 {
    fn from_column(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Null => Ok(0),
            ValueRef::Integer(i) => u32::try_from(i).map_err(|_| FromSqlError::OutOfRange(i)),
            _ => Err(FromSqlError::InvalidType),
        }
    }

    fn to_column(&self) -> Value {
        Value::Integer(i64::from(*self))
    }
}

// u64 values are stored bit-for-bit in SQLite's signed 64-bit integer.
impl ColumnValue for u64 {
    fn from_column(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Null => Ok(0),
            ValueRef::Integer(i) => Ok(i as u64),
            _ => Err(FromSqlError::InvalidType),
        }
    }

    fn to_column(&self) -> Value {
        Value::Integer(*self as i64)
    }
}

impl ColumnValue for bool {
    fn from_column(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Null => Ok(false),
            ValueRef::Integer(i) => Ok(i != 0),
            _ => Err(FromSqlError::InvalidType),
        }
    }

    fn to_column(&self) -> Value {
        Value::Integer(i64::from(*self))
    }
}

impl ColumnValue for Uuid {
    fn from_column(value: ValueRef<'_>) -> FromSqlResult<Self> {
        match value {
            ValueRef::Null => Ok(Uuid::nil()),
            ValueRef::Blob(bytes) => {
                Uuid::from_slice(bytes).map_err(|e| FromSqlError::Other(Box::new(e)))
            }
            ValueRef::Text(text) => std::str::from_utf8(text)
                .map_err(|e| FromSqlError::Other(Box::new(e)))
                .and_then(|s| Uuid::parse_str(s).map_err(|e| FromSqlError::Other(Box::new(e)))),
            _ => Err(FromSqlError::InvalidType),
        }
    }

    fn to_column(&self) -> Value {
        Value::Blob(self.as_bytes().to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_reads_as_absent() {
        assert_eq!(i64::from_column(ValueRef::Null).unwrap(), -1);
        assert_eq!(String::from_column(ValueRef::Null).unwrap(), "");
        assert_eq!(Uuid::from_column(ValueRef::Null).unwrap(), Uuid::nil());
        assert!(!bool::from_column(ValueRef::Null).unwrap());
    }

    #[test]
    fn test_u64_keeps_high_bit() {
        let run_key = u64::MAX - 7;
        let Value::Integer(stored) = run_key.to_column() else {
            panic!("expected integer");
        };
        assert_eq!(u64::from_column(ValueRef::Integer(stored)).unwrap(), run_key);
    }

    #[test]
    fn test_uuid_blob() {
        let guid = Uuid::new_v4();
        let Value::Blob(bytes) = guid.to_column() else {
            panic!("expected blob");
        };
        assert_eq!(bytes.len(), 16);
        assert_eq!(Uuid::from_column(ValueRef::Blob(&bytes)).unwrap(), guid);
        assert!(Uuid::from_column(ValueRef::Blob(&bytes[..4])).is_err());
    }

    #[test]
    fn test_u32_rejects_negative() {
        assert!(u32::from_column(ValueRef::Integer(-5)).is_err());
        assert_eq!(u32::from_column(ValueRef::Integer(42)).unwrap(), 42);
    }
}
