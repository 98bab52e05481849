//! Streaming ingestion of GLEIF-style record files.
//!
//! Sources are read one record at a time and grouped into bounded batches
//! of raw, string-typed columns. Callers resolve each batch to the
//! canonical schema before requesting the next one, so raw columns never
//! accumulate.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use lei_ingest::{IngestOptions, open_source};
//! use lei_model::DatasetType;
//!
//! let options = IngestOptions::new(DatasetType::LegalEntities).with_batch_size(5_000);
//! for batch in open_source(Path::new("lei2.xml"), options)? {
//!     let batch = batch?;
//!     // resolve + append
//! }
//! ```

mod batch;
mod delimited;
mod error;
mod markup;
mod options;
mod reader;

// === Error Types ===
pub use error::{IngestError, Result};

// === Options ===
pub use options::{
    DEFAULT_BATCH_SIZE, ENTITY_PREVIEW_RECORDS, IngestOptions, RELATIONSHIP_PREVIEW_RECORDS,
    SourceFormat, default_record_tag,
};

// === Readers ===
pub use batch::RawRecord;
pub use delimited::CsvBatches;
pub use markup::XmlBatches;
pub use reader::{BatchReader, open_source};
