//! Row materialization.
//!
//! Converts the engine's current row into a [`Row`]. A column is kept only
//! when the engine reports both a name and a non-NULL value for it; NULL
//! cells are omitted instead of stored as `Value::Null`. When two columns
//! share a name, the later one wins.

use lode_query::{Row, Value};
use rusqlite::types::ValueRef;
use tracing::trace;

use crate::config::ColumnMode;
use crate::error::{SqliteError, SqliteResult};

/// Materialize the engine's current row.
pub fn materialize(row: &rusqlite::Row<'_>, mode: ColumnMode) -> SqliteResult<Row> {
    let stmt = row.as_ref();
    let column_count = stmt.column_count();
    let mut out = Row::with_capacity(column_count);

    for index in 0..column_count {
        let Ok(name) = stmt.column_name(index) else {
            trace!(index, "column has no name, skipping");
            continue;
        };
        let cell = row
            .get_ref(index)
            .map_err(|_| SqliteError::index_out_of_bounds(index, column_count))?;

        let value = match mode {
            ColumnMode::Text => text_value(cell).map(Value::Text),
            ColumnMode::Native => native_value(cell),
        };

        match value {
            Some(value) => {
                out.insert(name, value);
            }
            None => trace!(column = name, "NULL cell omitted"),
        }
    }

    Ok(out)
}

/// The engine's text rendering of a cell, or `None` for NULL.
pub fn text_value(cell: ValueRef<'_>) -> Option<String> {
    match cell {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(i.to_string()),
        ValueRef::Real(f) => Some(real_to_text(f)),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Some(String::from_utf8_lossy(bytes).into_owned())
        }
    }
}

/// A cell with its storage class preserved, or `None` for NULL.
///
/// Blobs have no counterpart in [`Value`] and are carried as lossy text.
pub fn native_value(cell: ValueRef<'_>) -> Option<Value> {
    match cell {
        ValueRef::Null => None,
        ValueRef::Integer(i) => Some(Value::Int(i)),
        ValueRef::Real(f) => Some(Value::Float(f)),
        ValueRef::Text(bytes) | ValueRef::Blob(bytes) => {
            Some(Value::Text(String::from_utf8_lossy(bytes).into_owned()))
        }
    }
}

/// Render a real the way SQLite's `%!.15g` conversion does.
///
/// Fifteen significant digits, trailing zeros trimmed, and at least one
/// digit after the decimal point: `3.0`, `0.1`, `1.0e+20`.
pub fn real_to_text(value: f64) -> String {
    if value.is_infinite() {
        return if value > 0.0 { "Inf".into() } else { "-Inf".into() };
    }
    if value.is_nan() {
        return "NaN".into();
    }
    // The engine drops the sign of negative zero.
    if value == 0.0 {
        return "0.0".into();
    }

    let formatted = format!("{:.14e}", value);
    let Some((mantissa, exponent)) = formatted.split_once('e') else {
        return value.to_string();
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let negative = mantissa.starts_with('-');
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let sign = if negative { "-" } else { "" };

    let trimmed = |frac: &str| -> String {
        let frac = frac.trim_end_matches('0');
        if frac.is_empty() { "0".to_string() } else { frac.to_string() }
    };

    if !(-4..15).contains(&exponent) {
        let exp_sign = if exponent < 0 { '-' } else { '+' };
        format!(
            "{}{}.{}e{}{:02}",
            sign,
            &digits[..1],
            trimmed(&digits[1..]),
            exp_sign,
            exponent.abs()
        )
    } else if exponent >= 0 {
        let point = exponent as usize + 1;
        format!("{}{}.{}", sign, &digits[..point], trimmed(&digits[point..]))
    } else {
        let leading = "0".repeat((-exponent - 1) as usize);
        format!("{}0.{}", sign, trimmed(&format!("{}{}", leading, digits)))
    }
}
