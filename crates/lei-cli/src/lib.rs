//! Library components of the `lei-pipeline` binary.

pub mod config;
pub mod logging;
pub mod pipeline;
