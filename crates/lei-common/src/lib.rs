//! Shared utilities for the LEI pipeline crates.
//!
//! This crate provides common utilities used across the workspace,
//! mostly Polars `AnyValue`, column and key helpers.

pub mod dedupe;
pub mod polars;

// Re-export commonly used functions at crate root for convenience
pub use self::dedupe::{dedupe_keep_first, duplicate_keys, duplicate_row_count, row_keys};
pub use self::polars::{
    any_to_date, any_to_f64, any_to_string, date_to_epoch_days,
    epoch_days_to_date, format_numeric, null_percentages, optional_string_values, parse_f64,
    round2,
};
