//! Scanning one chunk into a partial aggregate.
//!
//! A record belongs to the chunk holding its first byte. The scanner keeps
//! reading until the bytes it has consumed reach the chunk length, so the last
//! record may run past the nominal end, but no record starting at or after the
//! end is ever read.

use std::{
    fs::File,
    io::{BufRead, BufReader, Seek, SeekFrom},
    path::Path,
};

use crate::{
    error::{Error, Result},
    measurement::parse_record,
    planner::Chunk,
    station::{StationMap, insert_measurement, new_station_map},
};

const READ_BUFFER: usize = 1 << 20;

/// Open a private read-only handle on `path` and aggregate the records of `chunk`.
pub fn scan_chunk(path: &Path, chunk: &Chunk, delimiter: u8) -> Result<StationMap> {
    let mut file = File::open(path)
        .map_err(|e| Error::io(format!("opening '{}'", path.display()), e))?;
    advise_sequential(&file, chunk);
    file.seek(SeekFrom::Start(chunk.start))
        .map_err(|e| Error::io(format!("seeking to offset {}", chunk.start), e))?;
    scan_reader(BufReader::with_capacity(READ_BUFFER, file), chunk, delimiter)
}

/// Aggregate records from `reader`, which must already be positioned at `chunk.start`.
pub fn scan_reader<R: BufRead>(mut reader: R, chunk: &Chunk, delimiter: u8) -> Result<StationMap> {
    let mut summary = new_station_map();
    let mut buffer = Vec::new();
    let mut consumed = 0u64;
    while consumed < chunk.length {
        let offset = chunk.start + consumed;
        buffer.clear();
        let read = reader
            .read_until(b'\n', &mut buffer)
            .map_err(|e| Error::io(format!("reading record at offset {offset}"), e))?;
        if read == 0 {
            break;
        }
        consumed += read as u64;
        let record = parse_record(&buffer, delimiter).map_err(|source| Error::Parse {
            offset,
            record: String::from_utf8_lossy(buffer.trim_ascii_end()).into_owned(),
            source,
        })?;
        insert_measurement(&mut summary, record.key, record.value);
    }
    log::trace!(
        "chunk at {} consumed {} of {} bytes, {} keys",
        chunk.start,
        consumed,
        chunk.length,
        summary.len()
    );
    Ok(summary)
}

#[cfg(target_os = "linux")]
fn advise_sequential(file: &File, chunk: &Chunk) {
    use std::os::fd::AsRawFd;

    let ret = unsafe {
        libc::posix_fadvise(
            file.as_raw_fd(),
            chunk.start as libc::off_t,
            chunk.length as libc::off_t,
            libc::POSIX_FADV_SEQUENTIAL,
        )
    };
    if ret != 0 {
        log::debug!(
            "posix_fadvise failed: {}",
            std::io::Error::from_raw_os_error(ret)
        );
    }
}

#[cfg(not(target_os = "linux"))]
fn advise_sequential(_file: &File, _chunk: &Chunk) {}
