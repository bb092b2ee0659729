//! Binary range files consumed by the benchmark harness.
//!
//! A range file is a bare concatenation of 8-byte records, one per query:
//! `u32 LE (L)` immediately followed by `u32 LE (R)`. There is no header,
//! footer or length prefix, so a file of `Q` ranges is exactly `8 * Q` bytes.

use std::{
    fs::{self, File},
    io::{BufReader, BufWriter, Read, Write},
    path::Path,
};

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use crate::error::{Result, WorkloadError};

use super::QueryRange;

/// Size of one encoded range in bytes.
pub const RECORD_SIZE: usize = 8;

pub fn encode(ranges: &[QueryRange]) -> Vec<u8> {
    let mut bytes = vec![0u8; ranges.len() * RECORD_SIZE];
    for (record, range) in bytes.chunks_exact_mut(RECORD_SIZE).zip(ranges) {
        LittleEndian::write_u32(&mut record[..4], range.l);
        LittleEndian::write_u32(&mut record[4..], range.r);
    }
    bytes
}

pub fn decode(bytes: &[u8]) -> Result<Vec<QueryRange>> {
    if bytes.len() % RECORD_SIZE != 0 {
        return Err(WorkloadError::Format(format!(
            "{} bytes is not a multiple of the {}-byte record size",
            bytes.len(),
            RECORD_SIZE
        )));
    }

    Ok(bytes
        .chunks_exact(RECORD_SIZE)
        .map(|record| {
            QueryRange::new(
                LittleEndian::read_u32(&record[..4]),
                LittleEndian::read_u32(&record[4..]),
            )
        })
        .collect())
}

/// Writes ranges to any writer in the range file layout.
pub fn write_ranges<W: Write>(writer: &mut W, ranges: &[QueryRange]) -> std::io::Result<()> {
    for range in ranges {
        writer.write_u32::<LittleEndian>(range.l)?;
        writer.write_u32::<LittleEndian>(range.r)?;
    }
    Ok(())
}

/// Reads `count` ranges from any reader in the range file layout.
pub fn read_ranges<R: Read>(reader: &mut R, count: usize) -> std::io::Result<Vec<QueryRange>> {
    let mut ranges = Vec::with_capacity(count);
    for _ in 0..count {
        let l = reader.read_u32::<LittleEndian>()?;
        let r = reader.read_u32::<LittleEndian>()?;
        ranges.push(QueryRange::new(l, r));
    }
    Ok(ranges)
}

/// Writes `ranges` to `path`, creating the parent directory when missing.
///
/// The bytes go to a temporary file next to the target, which is flushed,
/// synced and renamed over `path` only once everything was written. If any
/// step fails the temporary file is removed, so `path` either holds the
/// complete encoding or is left untouched.
///
/// Returns the number of bytes written.
pub fn write_range_file<P: AsRef<Path>>(path: P, ranges: &[QueryRange]) -> Result<u64> {
    let path = path.as_ref();
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    fs::create_dir_all(dir).map_err(|source| WorkloadError::io(dir, source))?;

    let mut file = NamedTempFile::new_in(dir).map_err(|source| WorkloadError::io(path, source))?;
    {
        let mut writer = BufWriter::new(&mut file);
        write_ranges(&mut writer, ranges).map_err(|source| WorkloadError::io(path, source))?;
        writer
            .flush()
            .map_err(|source| WorkloadError::io(path, source))?;
    }
    file.as_file()
        .sync_all()
        .map_err(|source| WorkloadError::io(path, source))?;
    file.persist(path)
        .map_err(|err| WorkloadError::io(path, err.error))?;

    let size = (ranges.len() * RECORD_SIZE) as u64;
    debug!(path = %path.display(), ranges = ranges.len(), bytes = size, "wrote range file");
    Ok(size)
}

/// Loads every range stored in a range file.
pub fn read_range_file<P: AsRef<Path>>(path: P) -> Result<Vec<QueryRange>> {
    read_range_file_limited(path, usize::MAX)
}

/// Loads at most `limit` ranges from a range file.
///
/// The harness truncates a range file to its query count the same way; a
/// mismatch between the two is logged rather than treated as an error.
pub fn read_range_file_limited<P: AsRef<Path>>(path: P, limit: usize) -> Result<Vec<QueryRange>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| WorkloadError::io(path, source))?;
    let size = file
        .metadata()
        .map_err(|source| WorkloadError::io(path, source))?
        .len() as usize;

    if size % RECORD_SIZE != 0 {
        return Err(WorkloadError::Format(format!(
            "{}: {} bytes is not a multiple of the {}-byte record size",
            path.display(),
            size,
            RECORD_SIZE
        )));
    }

    let stored = size / RECORD_SIZE;
    let count = stored.min(limit);
    if limit != usize::MAX && stored != limit {
        warn!(
            path = %path.display(),
            stored,
            limit,
            "range file size does not match the query count"
        );
    }

    let mut reader = BufReader::new(file);
    read_ranges(&mut reader, count).map_err(|source| WorkloadError::io(path, source))
}
