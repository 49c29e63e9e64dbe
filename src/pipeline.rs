//! Plan → Scan (parallel) → Merge → Format.

use std::{fs::File, path::Path, time::Instant};

use log::{debug, info};
use rayon::prelude::*;

use crate::{
    config::Config,
    error::{Error, Result},
    merge::merge_all,
    planner::{Chunk, plan_chunks},
    report::{Report, summarize},
    scanner::scan_chunk,
    station::StationMap,
};

pub fn run(config: &Config) -> Result<Report> {
    config.validate()?;
    let path = config.path.as_path();

    let now = Instant::now();
    let chunks = plan_file(path, config.chunk_count, config.lookahead_window)?;
    info!(
        "planned {} chunks over '{}' in {:?}",
        chunks.len(),
        path.display(),
        now.elapsed()
    );

    let now = Instant::now();
    let partials = scan_all(path, &chunks, config.concurrency, config.delimiter)?;
    info!(
        "scanned {} chunks on {} threads in {:?}",
        partials.len(),
        config.concurrency,
        now.elapsed()
    );

    let now = Instant::now();
    let summary = merge_all(partials)?;
    let report = summarize(summary);
    info!("merged {} keys in {:?}", report.len(), now.elapsed());
    Ok(report)
}

/// Plan chunks for the file at `path`, sized from its metadata.
pub fn plan_file(path: &Path, chunk_count: usize, lookahead: usize) -> Result<Vec<Chunk>> {
    let mut file = File::open(path)
        .map_err(|e| Error::io(format!("opening '{}'", path.display()), e))?;
    let size = file
        .metadata()
        .map_err(|e| Error::io(format!("reading metadata of '{}'", path.display()), e))?
        .len();
    debug!("'{}' is {size} bytes", path.display());
    plan_chunks(&mut file, size, chunk_count, lookahead)
}

/// Scan every chunk on a dedicated pool of `concurrency` threads and wait for
/// all of them. Each chunk is scanned start to finish by a single thread and
/// results come back in chunk order, failures included.
pub fn scan_all(
    path: &Path,
    chunks: &[Chunk],
    concurrency: usize,
    delimiter: u8,
) -> Result<Vec<Result<StationMap>>> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(concurrency)
        .thread_name(|i| format!("brc-scan-{i}"))
        .build()?;
    let partials: Vec<Result<StationMap>> = pool.install(|| {
        chunks
            .par_iter()
            .with_max_len(1)
            .enumerate()
            .map(|(index, chunk)| {
                debug!(
                    "chunk {index}: bytes {}..{} ({} bytes)",
                    chunk.start,
                    chunk.end(),
                    chunk.length
                );
                scan_chunk(path, chunk, delimiter).map_err(|e| Error::worker(index, chunk, e))
            })
            .collect()
    });
    Ok(partials)
}
