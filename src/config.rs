use std::{num::NonZeroUsize, path::PathBuf, thread};

use crate::{
    error::{Error, Result},
    planner::DEFAULT_LOOKAHEAD,
};

pub const DEFAULT_PATH: &str = "measurements.txt";
pub const DEFAULT_DELIMITER: u8 = b';';

/// Everything a run needs; supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub path: PathBuf,
    /// Number of planned chunks.
    pub chunk_count: usize,
    /// Size of the worker pool. Need not match `chunk_count`.
    pub concurrency: usize,
    /// Bytes searched for a newline when snapping a chunk boundary.
    pub lookahead_window: usize,
    pub delimiter: u8,
}

pub fn available_threads() -> usize {
    thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1)
}

impl Default for Config {
    fn default() -> Self {
        let threads = available_threads();
        Config {
            path: PathBuf::from(DEFAULT_PATH),
            chunk_count: threads,
            concurrency: threads,
            lookahead_window: DEFAULT_LOOKAHEAD,
            delimiter: DEFAULT_DELIMITER,
        }
    }
}

impl Config {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Config {
            path: path.into(),
            ..Config::default()
        }
    }

    pub fn with_chunk_count(mut self, chunk_count: usize) -> Self {
        self.chunk_count = chunk_count;
        self
    }

    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn with_lookahead_window(mut self, lookahead_window: usize) -> Self {
        self.lookahead_window = lookahead_window;
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.chunk_count == 0 {
            return Err(Error::Config("chunk count must be at least 1".into()));
        }
        if self.concurrency == 0 {
            return Err(Error::Config("concurrency must be at least 1".into()));
        }
        if self.lookahead_window == 0 {
            return Err(Error::Config(
                "lookahead window must be at least 1 byte".into(),
            ));
        }
        if self.delimiter == b'\n' || self.delimiter == b'\r' {
            return Err(Error::Config(format!(
                "delimiter {:?} collides with the line terminator",
                self.delimiter as char
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.lookahead_window, 1024);
        assert_eq!(config.delimiter, b';');
        assert!(config.chunk_count >= 1);
    }

    #[test]
    fn rejects_zero_sizes_and_newline_delimiter() {
        for config in [
            Config::new("x").with_chunk_count(0),
            Config::new("x").with_concurrency(0),
            Config::new("x").with_lookahead_window(0),
            Config::new("x").with_delimiter(b'\n'),
        ] {
            assert!(matches!(config.validate(), Err(Error::Config(_))), "{config:?}");
        }
    }
}
