//! Splitting a file into record-aligned byte ranges.

use std::io::{Read, Seek, SeekFrom};

use memchr::memchr;

use crate::error::{Error, Result};

pub const DEFAULT_LOOKAHEAD: usize = 1024;

/// A contiguous byte range `[start, start + length)` handed to exactly one worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    pub start: u64,
    pub length: u64,
}

impl Chunk {
    pub fn end(&self) -> u64 {
        self.start + self.length
    }
}

/// Cut `size` bytes of `source` into `chunk_count` chunks.
///
/// Ideal cut points sit at `i * (size / chunk_count)`. Every cut but the first is
/// moved to the byte right after the first newline within `lookahead` bytes of it.
/// A window that runs into end of file without a newline moves the cut to `size`,
/// leaving the tail to the previous chunk. A full window with no newline fails
/// with [`Error::Planning`].
///
/// The returned chunks partition `[0, size)`; some may be empty when
/// `chunk_count` is large relative to the number of lines.
pub fn plan_chunks<R: Read + Seek>(
    source: &mut R,
    size: u64,
    chunk_count: usize,
    lookahead: usize,
) -> Result<Vec<Chunk>> {
    if chunk_count == 0 {
        return Err(Error::Config("chunk count must be at least 1".into()));
    }
    if lookahead == 0 {
        return Err(Error::Config("lookahead window must be at least 1 byte".into()));
    }
    let ideal_chunk_size = size / chunk_count as u64;
    let mut starting_points: Vec<u64> = (0..chunk_count as u64)
        .map(|n| n * ideal_chunk_size)
        .collect();
    let mut window = Vec::with_capacity(lookahead);
    for i in 1..chunk_count {
        starting_points[i] =
            find_next_newline(source, starting_points[i], size, lookahead, &mut window)?;
    }

    let chunks = starting_points
        .iter()
        .zip(starting_points[1..].iter().chain(std::iter::once(&size)))
        .map(|(&start, &end)| {
            debug_assert!(start <= end, "cut points must be non-decreasing");
            Chunk {
                start,
                length: end - start,
            }
        })
        .collect();
    Ok(chunks)
}

fn find_next_newline<R: Read + Seek>(
    source: &mut R,
    from: u64,
    size: u64,
    lookahead: usize,
    window: &mut Vec<u8>,
) -> Result<u64> {
    if from >= size {
        return Ok(size);
    }
    source
        .seek(SeekFrom::Start(from))
        .map_err(|e| Error::io(format!("seeking to offset {from}"), e))?;
    window.clear();
    source
        .by_ref()
        .take(lookahead as u64)
        .read_to_end(window)
        .map_err(|e| Error::io(format!("reading lookahead window at offset {from}"), e))?;
    match memchr(b'\n', window) {
        Some(pos) => Ok(from + pos as u64 + 1),
        None if from + window.len() as u64 >= size => Ok(size),
        None => Err(Error::Planning {
            offset: from,
            window: lookahead,
        }),
    }
}
