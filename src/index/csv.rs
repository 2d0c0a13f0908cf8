//! Textual `cell,value` representation of an index.

use crate::error::{GeohashTreeError, Result};
use crate::index::IndexHeader;
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use geohash_tree_types::IndexRecord;
use rustc_hash::FxHashMap;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Appends records to a textual index, header first.
pub struct RecordWriter<W: Write> {
    inner: csv::Writer<W>,
    records_written: usize,
}

impl RecordWriter<File> {
    /// Create (or truncate) the file at `path` and write the header.
    pub fn create<P: AsRef<Path>>(path: P, header: &IndexHeader) -> Result<Self> {
        Self::new(File::create(path)?, header)
    }
}

impl<W: Write> RecordWriter<W> {
    pub fn new(writer: W, header: &IndexHeader) -> Result<Self> {
        let mut inner = WriterBuilder::new().has_headers(false).from_writer(writer);
        for record in header.to_records() {
            inner.write_record([record.cell.as_str(), record.value.as_str()])?;
        }
        Ok(Self {
            inner,
            records_written: 0,
        })
    }

    pub fn write_record(&mut self, record: &IndexRecord) -> Result<()> {
        self.inner
            .write_record([record.cell.as_str(), record.value.as_str()])?;
        self.records_written += 1;
        Ok(())
    }

    pub fn write_records(&mut self, records: &[IndexRecord]) -> Result<()> {
        for record in records {
            self.write_record(record)?;
        }
        Ok(())
    }

    /// Number of cell records written, header excluded.
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush()?;
        Ok(())
    }

    /// Flush and hand back the underlying writer.
    pub fn into_inner(self) -> Result<W> {
        self.inner
            .into_inner()
            .map_err(|e| GeohashTreeError::Io(e.into_error()))
    }
}

/// Streams every line of a textual index, header lines included, as records.
pub struct RecordReader<R: Read> {
    inner: csv::Reader<R>,
}

impl RecordReader<File> {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Ok(Self::new(File::open(path)?))
    }
}

impl<R: Read> RecordReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            inner: ReaderBuilder::new()
                .has_headers(false)
                .flexible(true)
                .from_reader(reader),
        }
    }

    pub fn into_records(self) -> impl Iterator<Item = Result<IndexRecord>> {
        self.inner
            .into_records()
            .map(|row| -> Result<IndexRecord> { parse_row(&row?) })
    }
}

fn parse_row(row: &StringRecord) -> Result<IndexRecord> {
    match (row.len(), row.get(0), row.get(1)) {
        (2, Some(cell), Some(value)) => Ok(IndexRecord::new(cell, value)),
        (fields, _, _) => Err(GeohashTreeError::MalformedIndex(format!(
            "Line {}: expected 2 fields, got {}",
            row.position().map(|p| p.line()).unwrap_or_default(),
            fields
        ))),
    }
}

/// Load a textual index into a map; later lines overwrite earlier ones.
pub fn read_index_map<P: AsRef<Path>>(path: P) -> Result<FxHashMap<String, String>> {
    let mut map = FxHashMap::default();
    for record in RecordReader::open(path)?.into_records() {
        let record = record?;
        map.insert(record.cell, record.value);
    }
    Ok(map)
}
