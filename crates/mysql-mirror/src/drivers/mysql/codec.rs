//! Conversion between MySQL wire values and crate types.
//!
//! Both protocols are accepted: the binary protocol sends `DATE` as
//! `Value::Date`, the text protocol sends it as `YYYY-MM-DD` bytes.

use chrono::{Datelike, NaiveDate};
use mysql_async::{from_value_opt, FromValueError, Row, Value};

use crate::core::{ColumnDescription, KeyRole, TitleRecord, TITLE_COLUMNS};
use crate::error::{MirrorError, Result};

/// Decode a `SELECT emp_no, title, from_date, to_date` row.
pub fn row_to_title(row: Row) -> Result<TitleRecord> {
    values_to_title(row.unwrap())
}

/// Decode the four column values of a `titles` row.
pub fn values_to_title(values: Vec<Value>) -> Result<TitleRecord> {
    let [emp_no, title, from_date, to_date]: [Value; 4] =
        values.try_into().map_err(|v: Vec<Value>| {
            MirrorError::decode(
                "*",
                format!("expected {} columns, got {}", TITLE_COLUMNS.len(), v.len()),
            )
        })?;

    Ok(TitleRecord {
        employee_id: from_value_opt::<i32>(emp_no)
            .map_err(|e| conversion_error(TITLE_COLUMNS[0], e))?,
        title: from_value_opt::<String>(title)
            .map_err(|e| conversion_error(TITLE_COLUMNS[1], e))?,
        from_date: value_to_date(from_date, TITLE_COLUMNS[2])?,
        to_date: match to_date {
            Value::NULL => None,
            other => Some(value_to_date(other, TITLE_COLUMNS[3])?),
        },
    })
}

/// Bind parameters for one `titles` row, in column order.
pub fn title_to_params(record: &TitleRecord) -> [Value; 4] {
    [
        Value::Int(record.employee_id as i64),
        Value::Bytes(record.title.as_bytes().to_vec()),
        date_to_value(record.from_date),
        record.to_date.map_or(Value::NULL, date_to_value),
    ]
}

fn date_to_value(date: NaiveDate) -> Value {
    Value::Date(
        date.year() as u16,
        date.month() as u8,
        date.day() as u8,
        0,
        0,
        0,
        0,
    )
}

fn value_to_date(value: Value, column: &str) -> Result<NaiveDate> {
    match value {
        Value::Date(year, month, day, ..) => {
            NaiveDate::from_ymd_opt(year as i32, month as u32, day as u32).ok_or_else(|| {
                MirrorError::decode(
                    column,
                    format!("invalid date {:04}-{:02}-{:02}", year, month, day),
                )
            })
        }
        Value::Bytes(bytes) => {
            let text = String::from_utf8_lossy(&bytes);
            NaiveDate::parse_from_str(&text, "%Y-%m-%d")
                .map_err(|e| MirrorError::decode(column, format!("invalid date '{}': {}", text, e)))
        }
        other => Err(MirrorError::decode(
            column,
            format!("expected DATE, got {:?}", other),
        )),
    }
}

fn conversion_error(column: &str, err: FromValueError) -> MirrorError {
    MirrorError::decode(column, format!("unexpected value {:?}", err.0))
}

/// Decode one row of `DESCRIBE` output (`Field, Type, Null, Key, Default, Extra`).
pub fn describe_row(row: Row) -> Result<ColumnDescription> {
    let mut values = row.unwrap().into_iter();
    let mut text = |column: &str| -> Result<Option<String>> {
        match values.next() {
            None | Some(Value::NULL) => Ok(None),
            Some(v) => from_value_opt::<String>(v)
                .map(Some)
                .map_err(|e| conversion_error(column, e)),
        }
    };

    let name = text("Field")?.unwrap_or_default();
    let column_type = text("Type")?.unwrap_or_default();
    let nullable = text("Null")?.is_some_and(|n| n.eq_ignore_ascii_case("YES"));
    let key = KeyRole::from_describe(&text("Key")?.unwrap_or_default());
    let default = text("Default")?;
    let extra = text("Extra")?.unwrap_or_default();

    if name.is_empty() {
        return Err(MirrorError::decode("Field", "empty column name"));
    }

    Ok(ColumnDescription {
        name,
        column_type,
        nullable,
        key,
        default,
        extra,
    })
}
