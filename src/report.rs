//! Turning the global aggregate into the final, key-ordered report.

use std::{
    fmt::{self, Display, Formatter},
    io::{self, Write},
};

use crate::station::StationMap;

#[derive(Debug, Clone, PartialEq)]
pub struct StationSummary {
    pub name: Box<[u8]>,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

impl StationSummary {
    pub fn name_lossy(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.name)
    }
}

/// Stations sorted ascending by their key bytes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    pub stations: Vec<StationSummary>,
}

/// Sort the keys and derive each mean.
pub fn summarize(summary: StationMap) -> Report {
    let mut stations: Vec<StationSummary> = summary
        .into_iter()
        .map(|(name, e)| StationSummary {
            min: e.min,
            max: e.max,
            mean: e.mean(),
            name,
        })
        .collect();
    stations.sort_unstable_by(|m1, m2| m1.name.cmp(&m2.name));
    Report { stations }
}

impl Report {
    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }

    pub fn get(&self, name: &[u8]) -> Option<&StationSummary> {
        self.stations
            .binary_search_by(|s| (*s.name).cmp(name))
            .ok()
            .map(|i| &self.stations[i])
    }

    /// `(key, min, max, mean)` tuples in key order.
    pub fn rows(&self) -> impl Iterator<Item = (&[u8], f64, f64, f64)> {
        self.stations
            .iter()
            .map(|s| (&*s.name, s.min, s.max, s.mean))
    }

    pub fn write_to<W: Write>(&self, mut out: W) -> io::Result<()> {
        out.write_fmt(format_args!("{self}"))?;
        out.flush()
    }
}

/// `{name=min/mean/max, ...}` with one decimal place.
impl Display for Report {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, s) in self.stations.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(
                f,
                "{}={:.1}/{:.1}/{:.1}",
                s.name_lossy(),
                s.min,
                s.mean,
                s.max
            )?;
        }
        f.write_str("}")
    }
}
