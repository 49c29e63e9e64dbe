//! Per-key min/max/mean over large `key;value` files.
//!
//! The file is cut into record-aligned chunks, each chunk is aggregated on its
//! own worker thread, and the partial results are merged and sorted once every
//! worker has finished.
//!
//! ```no_run
//! let config = brc::Config::new("measurements.txt").with_concurrency(8);
//! let report = brc::run(&config)?;
//! println!("{report}");
//! # Ok::<(), brc::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod logging;
pub mod measurement;
pub mod merge;
pub mod pipeline;
pub mod planner;
pub mod report;
pub mod scanner;
pub mod station;

pub use config::Config;
pub use error::{Error, ParseError, Result};
pub use pipeline::run;
pub use planner::Chunk;
pub use report::{Report, StationSummary};
pub use station::{StationEntry, StationMap};
