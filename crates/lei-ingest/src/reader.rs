//! Format-dispatching batch reader.

use std::path::Path;

use polars::prelude::DataFrame;

use crate::delimited::CsvBatches;
use crate::error::{IngestError, Result};
use crate::markup::XmlBatches;
use crate::options::{IngestOptions, SourceFormat};

/// Streams raw record batches from a CSV or XML source.
pub enum BatchReader {
    Csv(CsvBatches),
    Xml(XmlBatches),
}

impl BatchReader {
    pub fn format(&self) -> SourceFormat {
        match self {
            BatchReader::Csv(_) => SourceFormat::Csv,
            BatchReader::Xml(_) => SourceFormat::Xml,
        }
    }
}

impl Iterator for BatchReader {
    type Item = Result<DataFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        match self {
            BatchReader::Csv(batches) => batches.next(),
            BatchReader::Xml(batches) => batches.next(),
        }
    }
}

/// Opens a source file for batched reading.
///
/// The format is chosen by extension. Fails with
/// [`IngestError::FileNotFound`] when the path does not exist.
pub fn open_source(path: &Path, options: IngestOptions) -> Result<BatchReader> {
    if !path.exists() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let format = SourceFormat::from_path(path)?;
    tracing::info!(
        path = %path.display(),
        ?format,
        batch_size = options.batch_size,
        max_records = ?options.max_records,
        "Reading source"
    );
    match format {
        SourceFormat::Csv => CsvBatches::open(path, options).map(BatchReader::Csv),
        SourceFormat::Xml => XmlBatches::open(path, options).map(BatchReader::Xml),
    }
}
