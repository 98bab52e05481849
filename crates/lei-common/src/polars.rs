//! Polars AnyValue and column utility functions.
//!
//! This module provides helper functions for working with Polars `AnyValue` types,
//! including string conversions, numeric parsing and date handling.

use std::collections::BTreeMap;

use chrono::{NaiveDate, TimeDelta};
use polars::prelude::{AnyValue, DataFrame, DataType};

/// Converts a Polars `AnyValue` to a `String` representation.
///
/// Returns an empty string for `Null`, formats numeric types without
/// unnecessary trailing zeros and dates as `YYYY-MM-DD`.
///
/// # Examples
///
/// ```
/// use polars::prelude::AnyValue;
/// use lei_common::any_to_string;
///
/// assert_eq!(any_to_string(AnyValue::Null), "");
/// assert_eq!(any_to_string(AnyValue::Int32(42)), "42");
/// assert_eq!(any_to_string(AnyValue::String("hello")), "hello");
/// ```
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        AnyValue::Date(days) => epoch_days_to_date(days)
            .map(|date| date.format("%Y-%m-%d").to_string())
            .unwrap_or_default(),
        other => other.to_string(),
    }
}

/// Formats a floating-point number as a string without trailing zeros.
///
/// # Examples
///
/// ```
/// use lei_common::format_numeric;
///
/// assert_eq!(format_numeric(1.0), "1");
/// assert_eq!(format_numeric(1.5), "1.5");
/// assert_eq!(format_numeric(0.0), "0");
/// ```
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if !s.contains('.') {
        return s;
    }
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Converts an `AnyValue` to `f64`, returning `None` for non-numeric or null values.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(f64::from(v)),
        AnyValue::Int16(v) => Some(f64::from(v)),
        AnyValue::Int32(v) => Some(f64::from(v)),
        AnyValue::Int64(v) => Some(v as f64),
        AnyValue::UInt8(v) => Some(f64::from(v)),
        AnyValue::UInt16(v) => Some(f64::from(v)),
        AnyValue::UInt32(v) => Some(f64::from(v)),
        AnyValue::UInt64(v) => Some(v as f64),
        AnyValue::Float32(v) => Some(f64::from(v)),
        AnyValue::Float64(v) => Some(v),
        AnyValue::String(s) => parse_f64(s),
        AnyValue::StringOwned(s) => parse_f64(&s),
        _ => None,
    }
}

/// Converts an `AnyValue` holding a Polars `Date` to a `NaiveDate`.
pub fn any_to_date(value: AnyValue<'_>) -> Option<NaiveDate> {
    match value {
        AnyValue::Date(days) => epoch_days_to_date(days),
        _ => None,
    }
}

/// Parses a string as `f64`, returning `None` for invalid, empty or NaN strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| !v.is_nan())
}

/// Rounds to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn unix_epoch() -> NaiveDate {
    NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default()
}

/// Converts a Polars `Date` physical value (days since 1970-01-01).
pub fn epoch_days_to_date(days: i32) -> Option<NaiveDate> {
    unix_epoch().checked_add_signed(TimeDelta::days(i64::from(days)))
}

/// Converts a date to the Polars `Date` physical value.
pub fn date_to_epoch_days(date: NaiveDate) -> i32 {
    date.signed_duration_since(unix_epoch()).num_days() as i32
}

/// Reads every value of a column as an optional string.
///
/// Returns `None` when the column does not exist. Nulls stay `None`;
/// non-string columns are rendered through [`any_to_string`].
pub fn optional_string_values(df: &DataFrame, name: &str) -> Option<Vec<Option<String>>> {
    let column = df.column(name).ok()?;
    if column.dtype() == &DataType::String {
        let series = column.as_materialized_series();
        let ca = series.str().ok()?;
        return Some(
            ca.into_iter()
                .map(|value| value.map(str::to_string))
                .collect(),
        );
    }
    let mut values = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let value = column.get(idx).unwrap_or(AnyValue::Null);
        if matches!(value, AnyValue::Null) {
            values.push(None);
        } else {
            values.push(Some(any_to_string(value)));
        }
    }
    Some(values)
}

/// Percentage of null values per column, rounded to two decimals.
///
/// Only columns with at least one null are included. An empty frame
/// yields an empty map.
pub fn null_percentages(df: &DataFrame) -> BTreeMap<String, f64> {
    let mut nulls = BTreeMap::new();
    let height = df.height();
    if height == 0 {
        return nulls;
    }
    for column in df.get_columns() {
        let null_count = column.null_count();
        if null_count > 0 {
            let pct = null_count as f64 / height as f64 * 100.0;
            nulls.insert(column.name().to_string(), round2(pct));
        }
    }
    nulls
}
