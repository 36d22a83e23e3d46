//! Cell values and their CSV rendering.
//!
//! Each driver materializes a result cell into a [`RowValue`]; the variant is
//! chosen from the runtime type of the value, not from the declared column
//! type, so SQLite's dynamic typing is handled the same way as MySQL's
//! fixed column types.

use std::borrow::Cow;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use sqlx::mysql::types::MySqlTime;
use sqlx::mysql::MySqlRow;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, TypeInfo, ValueRef};

use crate::config::NULL_CELL;

/// One cell of a result row.
#[derive(Debug, Clone, PartialEq)]
pub enum RowValue {
    /// SQL NULL
    Null,
    /// Text or binary data, written byte-for-byte
    Bytes(Vec<u8>),
    Int(i64),
    UInt(u64),
    /// Single precision float (MySQL `FLOAT`)
    Real(f32),
    Double(f64),
    Date(NaiveDate),
    /// MySQL `TIME`: signed, up to 838 hours
    Time(MySqlTime),
    DateTime(NaiveDateTime),
    Timestamp(DateTime<Utc>),
}

impl RowValue {
    /// Renders the value as the contents of one CSV field.
    ///
    /// Quoting is left to the CSV writer; bytes are never re-encoded.
    pub fn to_field(&self) -> Cow<'_, [u8]> {
        match self {
            RowValue::Null => Cow::Borrowed(NULL_CELL.as_bytes()),
            RowValue::Bytes(bytes) => Cow::Borrowed(bytes.as_slice()),
            RowValue::Int(v) => Cow::Owned(v.to_string().into_bytes()),
            RowValue::UInt(v) => Cow::Owned(v.to_string().into_bytes()),
            RowValue::Real(v) => Cow::Owned(v.to_string().into_bytes()),
            RowValue::Double(v) => Cow::Owned(v.to_string().into_bytes()),
            RowValue::Date(v) => Cow::Owned(v.to_string().into_bytes()),
            RowValue::Time(v) => Cow::Owned(mysql_time_text(v).into_bytes()),
            RowValue::DateTime(v) => Cow::Owned(v.to_string().into_bytes()),
            RowValue::Timestamp(v) => Cow::Owned(v.to_string().into_bytes()),
        }
    }
}

/// A result row whose cells can be materialized one by one.
///
/// A decode failure on any cell is a scan failure for the whole row.
pub trait DecodeCells {
    /// Number of cells in the row.
    fn cell_count(&self) -> usize;

    /// Materializes the cell at `index`.
    fn decode_cell(&self, index: usize) -> Result<RowValue, sqlx::Error>;
}

/// How a MySQL cell is materialized, chosen from the value's type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MySqlCell {
    Date,
    Time,
    DateTime,
    Timestamp,
    Float,
    Double,
    Unsigned,
    Signed,
    Raw,
}

fn mysql_cell(type_name: &str) -> MySqlCell {
    match type_name {
        "DATE" => MySqlCell::Date,
        "TIME" => MySqlCell::Time,
        "DATETIME" => MySqlCell::DateTime,
        "TIMESTAMP" => MySqlCell::Timestamp,
        "FLOAT" => MySqlCell::Float,
        "DOUBLE" => MySqlCell::Double,
        name if name.ends_with("UNSIGNED") => MySqlCell::Unsigned,
        // TINYINT(1) is reported as BOOLEAN; keep the stored 0/1
        "BOOLEAN" | "TINYINT" | "SMALLINT" | "MEDIUMINT" | "INT" | "BIGINT" | "YEAR" => {
            MySqlCell::Signed
        }
        // CHAR/TEXT/BLOB/BINARY families, DECIMAL, JSON, ENUM, SET, BIT, GEOMETRY
        _ => MySqlCell::Raw,
    }
}

impl DecodeCells for MySqlRow {
    fn cell_count(&self) -> usize {
        self.len()
    }

    fn decode_cell(&self, index: usize) -> Result<RowValue, sqlx::Error> {
        let raw = self.try_get_raw(index)?;
        if raw.is_null() {
            return Ok(RowValue::Null);
        }
        let kind = mysql_cell(raw.type_info().name());

        // Unchecked decoding: the type name already selected the wire format
        let value = match kind {
            MySqlCell::Date | MySqlCell::DateTime | MySqlCell::Timestamp => {
                decode_mysql_date(self, index, kind)?
            }
            MySqlCell::Time => RowValue::Time(self.try_get_unchecked(index)?),
            MySqlCell::Float => RowValue::Real(self.try_get_unchecked(index)?),
            MySqlCell::Double => RowValue::Double(self.try_get_unchecked(index)?),
            MySqlCell::Unsigned => RowValue::UInt(self.try_get_unchecked(index)?),
            MySqlCell::Signed => RowValue::Int(self.try_get_unchecked(index)?),
            MySqlCell::Raw => RowValue::Bytes(self.try_get_unchecked(index)?),
        };
        Ok(value)
    }
}

/// Decodes a temporal cell through chrono, falling back to the server's own
/// rendering for dates chrono cannot hold (`0000-00-00`, `2024-02-00`).
fn decode_mysql_date(
    row: &MySqlRow,
    index: usize,
    kind: MySqlCell,
) -> Result<RowValue, sqlx::Error> {
    let decoded = match kind {
        MySqlCell::Date => row.try_get_unchecked(index).map(RowValue::Date),
        MySqlCell::DateTime => row.try_get_unchecked(index).map(RowValue::DateTime),
        _ => row.try_get_unchecked(index).map(RowValue::Timestamp),
    };
    decoded.or_else(|e| {
        let payload: &[u8] = row.try_get_unchecked(index)?;
        mysql_date_text(payload, kind != MySqlCell::Date)
            .map(|text| RowValue::Bytes(text.into_bytes()))
            .ok_or(e)
    })
}

/// Formats a binary-protocol date payload (length byte first) as MySQL prints it.
///
/// A zero length byte is the all-zero value. Returns `None` for anything that
/// is not a well-formed binary date.
fn mysql_date_text(payload: &[u8], with_time: bool) -> Option<String> {
    let (&len, rest) = payload.split_first()?;
    if !matches!(len, 0 | 4 | 7 | 11) || rest.len() != usize::from(len) {
        return None;
    }
    let field = |i: usize| rest.get(i).copied().map_or(0, u32::from);
    let year = field(0) | (field(1) << 8);
    let micros = rest
        .get(7..11)
        .and_then(|bytes| <[u8; 4]>::try_from(bytes).ok())
        .map_or(0, u32::from_le_bytes);

    let mut text = format!("{:04}-{:02}-{:02}", year, field(2), field(3));
    if with_time {
        text.push_str(&format!(" {:02}:{:02}:{:02}", field(4), field(5), field(6)));
        if micros != 0 {
            text.push_str(&format!(".{:06}", micros));
        }
    }
    Some(text)
}

/// `[-]HH:MM:SS[.ffffff]`, hours padded to two digits like the MySQL client.
fn mysql_time_text(time: &MySqlTime) -> String {
    let sign = if time.is_negative() { "-" } else { "" };
    let mut text = format!(
        "{}{:02}:{:02}:{:02}",
        sign,
        time.hours(),
        time.minutes(),
        time.seconds()
    );
    if time.microseconds() != 0 {
        text.push_str(&format!(".{:06}", time.microseconds()));
    }
    text
}

impl DecodeCells for SqliteRow {
    fn cell_count(&self) -> usize {
        self.len()
    }

    fn decode_cell(&self, index: usize) -> Result<RowValue, sqlx::Error> {
        let raw = self.try_get_raw(index)?;
        if raw.is_null() {
            return Ok(RowValue::Null);
        }
        let type_name = raw.type_info().name().to_string();

        let value = match type_name.as_str() {
            "INTEGER" | "BOOLEAN" => RowValue::Int(self.try_get_unchecked(index)?),
            "REAL" => RowValue::Double(self.try_get_unchecked(index)?),
            // TEXT and BLOB storage classes
            _ => RowValue::Bytes(self.try_get_unchecked(index)?),
        };
        Ok(value)
    }
}
