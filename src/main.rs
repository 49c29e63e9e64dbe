use std::{io::Write, path::PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;

use brc::{Config, config, logging, planner::DEFAULT_LOOKAHEAD};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: jemallocator::Jemalloc = jemallocator::Jemalloc;

#[derive(Parser)]
#[command(name = "brc")]
#[command(about = "Per-station min/mean/max over a large `station;measurement` file", long_about = None)]
struct Cli {
    /// Input file, one `key<delimiter>value` record per line
    #[arg(default_value = config::DEFAULT_PATH)]
    path: PathBuf,

    /// Worker threads (defaults to the available parallelism)
    #[arg(short, long)]
    threads: Option<usize>,

    /// Number of chunks to split the file into (defaults to the thread count)
    #[arg(short, long)]
    chunks: Option<usize>,

    /// Bytes searched for a newline when aligning a chunk boundary
    #[arg(short = 'w', long, default_value_t = DEFAULT_LOOKAHEAD)]
    lookahead: usize,

    /// Field delimiter, a single ASCII character
    #[arg(short, long, default_value_t = ';')]
    delimiter: char,

    /// Log each stage to stderr
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn into_config(self) -> Result<Config> {
        if !self.delimiter.is_ascii() {
            bail!("delimiter must be a single ASCII character, got {:?}", self.delimiter);
        }
        let threads = self.threads.unwrap_or_else(config::available_threads);
        Ok(Config::new(self.path)
            .with_concurrency(threads)
            .with_chunk_count(self.chunks.unwrap_or(threads))
            .with_lookahead_window(self.lookahead)
            .with_delimiter(self.delimiter as u8))
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logger(cli.verbose);
    let config = cli.into_config()?;
    let report = brc::run(&config)
        .with_context(|| format!("failed to aggregate '{}'", config.path.display()))?;
    let mut out = std::io::stdout().lock();
    report.write_to(&mut out).context("failed to write report")?;
    writeln!(out)?;
    Ok(())
}
