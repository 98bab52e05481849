//! Element-streamed XML reading.
//!
//! Records are located by the local name of their wrapping element, so
//! `<lei:LEIRecord>` and `<LEIRecord>` both match `LEIRecord`. Inside a
//! record, every element with non-blank text becomes two keys: its dotted
//! path relative to the record (`Entity.LegalAddress.City`) and its bare
//! local name (`City`). When a key repeats within one record, the first
//! value wins. A record without any such element is still emitted, as a
//! row of nulls.

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use polars::prelude::DataFrame;
use quick_xml::Reader;
use quick_xml::events::Event;

use crate::batch::{RawRecord, records_to_frame};
use crate::error::{IngestError, Result, open_error};
use crate::options::IngestOptions;

/// Iterator over XML record batches.
pub struct XmlBatches {
    path: PathBuf,
    reader: Reader<BufReader<File>>,
    buf: Vec<u8>,
    options: IngestOptions,
    read: usize,
    done: bool,
}

impl XmlBatches {
    pub fn open(path: &Path, options: IngestOptions) -> Result<Self> {
        let file = File::open(path).map_err(|e| open_error(path, e))?;
        let reader = Reader::from_reader(BufReader::new(file));
        tracing::debug!(
            path = %path.display(),
            record_tag = %options.record_tag,
            "Opened XML source"
        );
        Ok(Self {
            path: path.to_path_buf(),
            reader,
            buf: Vec::new(),
            options,
            read: 0,
            done: false,
        })
    }

    fn remaining(&self) -> usize {
        match self.options.max_records {
            Some(max) => max.saturating_sub(self.read),
            None => usize::MAX,
        }
    }

    /// Advances to the next record and returns its fields.
    ///
    /// Returns `None` at end of document.
    fn next_record(&mut self) -> Result<Option<RawRecord>> {
        let tag = self.options.record_tag.as_bytes().to_vec();
        let mut record: Option<RawRecord> = None;
        let mut path: Vec<String> = Vec::new();
        let mut text = String::new();

        loop {
            self.buf.clear();
            let event = match self.reader.read_event_into(&mut self.buf) {
                Ok(event) => event,
                Err(err) => {
                    return Err(xml_error(&self.path, self.reader.buffer_position(), err));
                }
            };
            match event {
                Event::Start(start) => {
                    let local = start.local_name();
                    match record.as_mut() {
                        None if local.as_ref() == tag.as_slice() => {
                            record = Some(RawRecord::new());
                        }
                        None => {}
                        Some(_) => {
                            path.push(String::from_utf8_lossy(local.as_ref()).into_owned());
                            text.clear();
                        }
                    }
                }
                Event::Empty(empty)
                    if record.is_none() && empty.local_name().as_ref() == tag.as_slice() =>
                {
                    return Ok(Some(RawRecord::new()));
                }
                Event::Text(content) if record.is_some() && !path.is_empty() => {
                    let decoded = content
                        .decode()
                        .map_err(|e| xml_error(&self.path, self.reader.buffer_position(), e))?;
                    text.push_str(&decoded);
                }
                Event::CData(content) if record.is_some() && !path.is_empty() => {
                    text.push_str(&String::from_utf8_lossy(content.as_ref()));
                }
                Event::GeneralRef(reference) if record.is_some() && !path.is_empty() => {
                    if let Some(ch) = reference
                        .resolve_char_ref()
                        .map_err(|e| xml_error(&self.path, self.reader.buffer_position(), e))?
                    {
                        text.push(ch);
                    } else {
                        let name = reference
                            .decode()
                            .map_err(|e| xml_error(&self.path, self.reader.buffer_position(), e))?;
                        if let Some(value) = quick_xml::escape::resolve_predefined_entity(&name)
                        {
                            text.push_str(value);
                        }
                    }
                }
                Event::End(_) => {
                    let Some(fields) = record.as_mut() else {
                        continue;
                    };
                    if path.is_empty() {
                        return Ok(record);
                    }
                    let value = text.trim();
                    if !value.is_empty() {
                        let dotted = path.join(".");
                        if let Some(leaf) = path.last() {
                            fields
                                .entry(leaf.clone())
                                .or_insert_with(|| value.to_string());
                        }
                        fields.entry(dotted).or_insert_with(|| value.to_string());
                    }
                    path.pop();
                    text.clear();
                }
                Event::Eof => {
                    if record.is_some() {
                        return Err(xml_error(
                            &self.path,
                            self.reader.buffer_position(),
                            format!(
                                "unexpected end of document inside <{}>",
                                self.options.record_tag
                            ),
                        ));
                    }
                    return Ok(None);
                }
                _ => {}
            }
        }
    }

    fn next_batch(&mut self) -> Result<Option<DataFrame>> {
        let limit = self.options.batch_size.max(1).min(self.remaining());
        let mut records = Vec::with_capacity(limit.min(4096));
        while records.len() < limit {
            match self.next_record()? {
                Some(record) => {
                    records.push(record);
                    self.read += 1;
                    if self.remaining() == 0 {
                        self.done = true;
                        break;
                    }
                }
                None => {
                    self.done = true;
                    break;
                }
            }
        }
        if records.is_empty() {
            return Ok(None);
        }
        tracing::debug!(path = %self.path.display(), rows = records.len(), "Read XML batch");
        records_to_frame(&records).map(Some)
    }
}

fn xml_error(path: &Path, position: u64, message: impl ToString) -> IngestError {
    IngestError::XmlParse {
        path: path.to_path_buf(),
        position,
        message: message.to_string(),
    }
}

impl Iterator for XmlBatches {
    type Item = Result<DataFrame>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let batch = self.next_batch();
        if batch.is_err() {
            self.done = true;
        }
        batch.transpose()
    }
}
