//! Persistent storage backend: an immutable sorted table read through mmap.
//!
//! Layout, all integers little-endian:
//!
//! ```text
//! magic "GHTREE_TABLE" | version u8 | entry count u64
//! entry offsets        | count x u64, absolute file offsets, keys ascending
//! entries              | key len u32 | key | value len u32 | value
//! ```
//!
//! Lookups binary-search the offset table, so only the pages touched by a
//! search are ever read from disk.

use super::{BulkPut, StorageBackend, StorageStats};
use crate::error::{GeohashTreeError, Result};
use crate::index::csv::RecordReader;
use geohash_tree_types::IndexRecord;
use log::info;
use memmap2::Mmap;
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const TABLE_MAGIC: &[u8] = b"GHTREE_TABLE";
const TABLE_VERSION: u8 = 1;
const OFFSETS_START: usize = TABLE_MAGIC.len() + 1 + 8;

/// Read-only view of a sorted table file.
pub struct DiskBackend {
    path: PathBuf,
    mmap: Mmap,
    count: usize,
}

impl DiskBackend {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)?;
        // SAFETY: tables are never modified in place; `DiskBackendBuilder`
        // replaces them with a rename, which leaves existing mappings intact.
        let mmap = unsafe { Mmap::map(&file)? };

        if mmap.len() < OFFSETS_START || &mmap[..TABLE_MAGIC.len()] != TABLE_MAGIC {
            return Err(GeohashTreeError::MalformedIndex(format!(
                "{} is not an index table",
                path.display()
            )));
        }
        if mmap[TABLE_MAGIC.len()] != TABLE_VERSION {
            return Err(GeohashTreeError::MalformedIndex(format!(
                "Unsupported table version {} in {}",
                mmap[TABLE_MAGIC.len()],
                path.display()
            )));
        }

        let count = read_u64(&mmap, TABLE_MAGIC.len() + 1)
            .and_then(|n| usize::try_from(n).ok())
            .filter(|&n| {
                n.checked_mul(8)
                    .and_then(|len| len.checked_add(OFFSETS_START))
                    .is_some_and(|end| end <= mmap.len())
            })
            .ok_or_else(|| {
                GeohashTreeError::MalformedIndex(format!(
                    "Entry table of {} is truncated",
                    path.display()
                ))
            })?;

        info!("Opened index table {} with {} records", path.display(), count);
        Ok(Self { path, mmap, count })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn entry(&self, index: usize) -> Result<(&[u8], &[u8])> {
        let corrupt = || {
            GeohashTreeError::MalformedIndex(format!(
                "Entry {} of {} is corrupt",
                index,
                self.path.display()
            ))
        };

        let offset = read_u64(&self.mmap, OFFSETS_START + index * 8)
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(corrupt)?;
        let (key, value_at) = read_blob(&self.mmap, offset).ok_or_else(corrupt)?;
        let (value, _) = read_blob(&self.mmap, value_at).ok_or_else(corrupt)?;
        Ok((key, value))
    }
}

impl StorageBackend for DiskBackend {
    /// Binary search over the sorted keys. An empty stored value reads as absent.
    fn get(&self, key: &str) -> Result<Option<&str>> {
        let (mut lo, mut hi) = (0, self.count);
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            let (candidate, value) = self.entry(mid)?;
            match candidate.cmp(key.as_bytes()) {
                Ordering::Less => lo = mid + 1,
                Ordering::Greater => hi = mid,
                Ordering::Equal => {
                    if value.is_empty() {
                        return Ok(None);
                    }
                    let value = std::str::from_utf8(value).map_err(|e| {
                        GeohashTreeError::MalformedIndex(format!(
                            "Value for '{}' is not UTF-8: {}",
                            key, e
                        ))
                    })?;
                    return Ok(Some(value));
                }
            }
        }
        Ok(None)
    }

    fn len(&self) -> usize {
        self.count
    }

    fn stats(&self) -> StorageStats {
        StorageStats {
            key_count: self.count,
            size_bytes: self.mmap.len(),
        }
    }
}

/// Collects records, sorts them by key and writes a table file.
pub struct DiskBackendBuilder {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl DiskBackendBuilder {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self {
            path: path.into(),
            entries: BTreeMap::new(),
        }
    }

    pub fn insert(&mut self, record: IndexRecord) {
        self.entries.insert(record.cell, record.value);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the table next to its destination, move it into place and open it.
    pub fn finish(self) -> Result<DiskBackend> {
        let temp_path = self.temp_path();
        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)?;
        let mut writer = BufWriter::new(file);

        writer.write_all(TABLE_MAGIC)?;
        writer.write_all(&[TABLE_VERSION])?;
        writer.write_all(&(self.entries.len() as u64).to_le_bytes())?;

        let mut offset = (OFFSETS_START + self.entries.len() * 8) as u64;
        for (key, value) in &self.entries {
            writer.write_all(&offset.to_le_bytes())?;
            offset += (8 + key.len() + value.len()) as u64;
        }
        for (key, value) in &self.entries {
            write_blob(&mut writer, key.as_bytes())?;
            write_blob(&mut writer, value.as_bytes())?;
        }

        writer.flush()?;
        let file = writer.into_inner().map_err(|e| e.into_error())?;
        file.sync_all()?;
        drop(file);

        std::fs::rename(&temp_path, &self.path)?;
        self.sync_parent_dir()?;

        info!(
            "Wrote {} records to index table {}",
            self.entries.len(),
            self.path.display()
        );
        DiskBackend::open(&self.path)
    }

    fn temp_path(&self) -> PathBuf {
        let mut temp = self.path.clone();
        if let Some(name) = temp.file_name() {
            let mut new_name = name.to_string_lossy().into_owned();
            new_name.push_str(".tmp");
            temp.set_file_name(new_name);
        }
        temp
    }

    fn sync_parent_dir(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            let dir = File::open(parent)?;
            dir.sync_all()?;
        }
        Ok(())
    }
}

impl BulkPut for DiskBackendBuilder {
    fn bulk_put<I>(&mut self, records: I) -> Result<usize>
    where
        I: IntoIterator<Item = IndexRecord>,
    {
        let mut count = 0;
        for record in records {
            self.insert(record);
            count += 1;
        }
        Ok(count)
    }
}

/// Convert a textual index into a table file at `table_path`.
pub fn create_disk_index<P, Q>(csv_path: P, table_path: Q) -> Result<DiskBackend>
where
    P: AsRef<Path>,
    Q: Into<PathBuf>,
{
    let mut builder = DiskBackendBuilder::new(table_path);
    for record in RecordReader::open(csv_path)?.into_records() {
        builder.insert(record?);
    }
    builder.finish()
}

fn read_u64(buf: &[u8], at: usize) -> Option<u64> {
    let bytes = buf.get(at..at.checked_add(8)?)?;
    Some(u64::from_le_bytes(bytes.try_into().ok()?))
}

fn read_blob(buf: &[u8], at: usize) -> Option<(&[u8], usize)> {
    let len_bytes = buf.get(at..at.checked_add(4)?)?;
    let len = u32::from_le_bytes(len_bytes.try_into().ok()?) as usize;
    let start = at + 4;
    let end = start.checked_add(len)?;
    Some((buf.get(start..end)?, end))
}

fn write_blob<W: Write>(writer: &mut W, bytes: &[u8]) -> Result<()> {
    let len = u32::try_from(bytes.len()).map_err(|_| {
        GeohashTreeError::InvalidInput(format!("Entry of {} bytes is too large", bytes.len()))
    })?;
    writer.write_all(&len.to_le_bytes())?;
    writer.write_all(bytes)?;
    Ok(())
}
