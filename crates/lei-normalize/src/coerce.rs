//! Per-kind type coercion of canonical columns.
//!
//! Coercion is total: malformed values become null (or the empty string for
//! text fields) and no row is ever removed.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use lei_common::{date_to_epoch_days, optional_string_values, parse_f64};
use lei_model::{DatasetType, FieldKind};
use polars::prelude::{DataFrame, DataType, NamedFrom, PlSmallStr, Series};

use crate::error::Result;

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y%m%d"];
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Coerces every canonical column present in `df` to its field kind.
///
/// Columns that are not canonical fields of `dataset` pass through.
pub fn coerce(dataset: DatasetType, df: &DataFrame) -> Result<DataFrame> {
    let mut out = df.clone();
    let height = df.height();
    for field in dataset.fields() {
        let Some(values) = optional_string_values(df, field.name) else {
            continue;
        };
        let name: PlSmallStr = field.name.into();
        let series = match field.kind {
            FieldKind::Identifier | FieldKind::Status => {
                let values: Vec<Option<String>> =
                    values.iter().map(|v| coerce_identifier(v.as_deref())).collect();
                Series::new(name, values)
            }
            FieldKind::Text => {
                let values: Vec<String> =
                    values.iter().map(|v| coerce_text(v.as_deref())).collect();
                Series::new(name, values)
            }
            FieldKind::OptionalText => {
                let values: Vec<Option<String>> = values
                    .iter()
                    .map(|v| coerce_optional_text(v.as_deref()))
                    .collect();
                Series::new(name, values)
            }
            FieldKind::Date => {
                let days: Vec<Option<i32>> = values
                    .iter()
                    .map(|v| v.as_deref().and_then(parse_date).map(date_to_epoch_days))
                    .collect();
                Series::new(name, days).cast(&DataType::Date)?
            }
            FieldKind::Percentage => {
                let values: Vec<Option<f64>> = values
                    .iter()
                    .map(|v| v.as_deref().and_then(coerce_percentage))
                    .collect();
                Series::new(name, values)
            }
        };
        out.with_column(series)?;
    }
    debug_assert_eq!(out.height(), height);
    tracing::debug!(dataset = %dataset, rows = height, "Coerced canonical columns");
    Ok(out)
}

/// Trims and upper-cases; blank input becomes `None`.
pub fn coerce_identifier(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_uppercase())
    }
}

/// Trims; missing input becomes the empty string.
pub fn coerce_text(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}

/// Trims; blank input becomes `None`.
pub fn coerce_optional_text(value: Option<&str>) -> Option<String> {
    let trimmed = value?.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Parses a number and clamps it to `[0, 100]`.
pub fn coerce_percentage(value: &str) -> Option<f64> {
    parse_f64(value).map(|v| v.clamp(0.0, 100.0))
}

/// Parses a calendar date, discarding any time-of-day component.
///
/// Accepts `YYYY-MM-DD`, `YYYY/MM/DD`, `YYYYMMDD`, RFC 3339 timestamps and
/// naive `YYYY-MM-DDTHH:MM:SS[.f]` / `YYYY-MM-DD HH:MM:SS[.f]` timestamps.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.date_naive());
    }
    for format in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt.date());
        }
    }
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(trimmed, format).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2012, 6, 6);
        assert_eq!(parse_date("2012-06-06"), expected);
        assert_eq!(parse_date("2012-06-06T15:53:00Z"), expected);
        assert_eq!(parse_date("2012-06-06T15:53:00+01:00"), expected);
        assert_eq!(parse_date("2012-06-06T15:53:00.123"), expected);
        assert_eq!(parse_date("2012-06-06 15:53:00"), expected);
        assert_eq!(parse_date("2012/06/06"), expected);
        assert_eq!(parse_date("20120606"), expected);
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        assert_eq!(parse_date(""), None);
        assert_eq!(parse_date("not a date"), None);
        assert_eq!(parse_date("2012-13-40"), None);
    }

    #[test]
    fn test_coerce_percentage_clamps() {
        assert_eq!(coerce_percentage("150"), Some(100.0));
        assert_eq!(coerce_percentage("-3"), Some(0.0));
        assert_eq!(coerce_percentage(" 42.5 "), Some(42.5));
        assert_eq!(coerce_percentage("abc"), None);
        assert_eq!(coerce_percentage("NaN"), None);
        assert_eq!(coerce_percentage("inf"), Some(100.0));
    }

    #[test]
    fn test_coerce_identifier() {
        assert_eq!(coerce_identifier(Some(" abc123 ")), Some("ABC123".to_string()));
        assert_eq!(coerce_identifier(Some("   ")), None);
        assert_eq!(coerce_identifier(None), None);
    }

    #[test]
    fn test_coerce_text_and_optional_text() {
        assert_eq!(coerce_text(None), "");
        assert_eq!(coerce_text(Some("  Acme ")), "Acme");
        assert_eq!(coerce_optional_text(Some("  ")), None);
        assert_eq!(coerce_optional_text(Some(" x ")), Some("x".to_string()));
    }
}
