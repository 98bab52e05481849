//! Row-streamed CSV reading.

use std::collections::HashSet;
use std::fs::File;
use std::path::{Path, PathBuf};

use csv::{Reader, ReaderBuilder, StringRecord};
use polars::prelude::DataFrame;

use crate::batch::rows_to_frame;
use crate::error::{IngestError, Result, open_error};
use crate::options::IngestOptions;

/// Iterator over CSV batches.
///
/// Cells are kept as raw strings; empty cells become null. Repeated header
/// names keep their first column. A file with a header but no rows yields a
/// single empty batch carrying the header columns.
pub struct CsvBatches {
    path: PathBuf,
    reader: Reader<File>,
    headers: Vec<String>,
    /// Source index of each kept header.
    indices: Vec<usize>,
    record: StringRecord,
    options: IngestOptions,
    read: usize,
    emitted: bool,
    done: bool,
}

impl CsvBatches {
    pub fn open(path: &Path, options: IngestOptions) -> Result<Self> {
        let file = File::open(path).map_err(|e| open_error(path, e))?;
        let mut reader = ReaderBuilder::new().flexible(true).from_reader(file);
        let raw_headers = reader
            .headers()
            .map_err(|source| IngestError::CsvParse {
                path: path.to_path_buf(),
                source,
            })?
            .clone();

        let mut seen = HashSet::new();
        let mut headers = Vec::with_capacity(raw_headers.len());
        let mut indices = Vec::with_capacity(raw_headers.len());
        for (idx, header) in raw_headers.iter().enumerate() {
            let name = header.strip_prefix('\u{feff}').unwrap_or(header).trim();
            if name.is_empty() || !seen.insert(name.to_string()) {
                continue;
            }
            headers.push(name.to_string());
            indices.push(idx);
        }

        tracing::debug!(
            path = %path.display(),
            columns = headers.len(),
            "Opened CSV source"
        );

        Ok(Self {
            path: path.to_path_buf(),
            reader,
            headers,
            indices,
            record: StringRecord::new(),
            options,
            read: 0,
            emitted: false,
            done: false,
        })
    }

    fn remaining(&self) -> usize {
        match self.options.max_records {
            Some(max) => max.saturating_sub(self.read),
            None => usize::MAX,
        }
    }

    fn next_batch(&mut self) -> Result<Option<DataFrame>> {
        let limit = self.options.batch_size.max(1).min(self.remaining());
        let mut columns: Vec<Vec<Option<String>>> =
            vec![Vec::with_capacity(limit.min(4096)); self.headers.len()];
        let mut rows = 0;

        while rows < limit {
            let has_row = self
                .reader
                .read_record(&mut self.record)
                .map_err(|source| IngestError::CsvParse {
                    path: self.path.clone(),
                    source,
                })?;
            if !has_row {
                self.done = true;
                break;
            }
            for (column, &idx) in columns.iter_mut().zip(&self.indices) {
                let value = self
                    .record
                    .get(idx)
                    .filter(|cell| !cell.is_empty())
                    .map(str::to_string);
                column.push(value);
            }
            rows += 1;
        }
        self.read += rows;
        if self.remaining() == 0 {
            self.done = true;
        }

        if rows == 0 && self.emitted {
            return Ok(None);
        }
        self.emitted = true;
        tracing::debug!(path = %self.path.display(), rows, "Read CSV batch");
        rows_to_frame(&self.headers, columns).map(Some)
    }
}

impl Iterator for CsvBatches {
    type Item = Result<DataFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done && self.emitted {
            return None;
        }
        self.next_batch().transpose()
    }
}
