use rustc_hash::FxHashMap;

/// Running `{min, max, sum, count}` for one key. Only ever created from a first
/// observation, so `count >= 1` always holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StationEntry {
    pub min: f64,
    pub max: f64,
    pub sum: f64,
    pub count: u64,
}

impl StationEntry {
    pub fn new(measurement: f64) -> Self {
        StationEntry {
            min: measurement,
            max: measurement,
            sum: measurement,
            count: 1,
        }
    }

    pub fn add_measurement(&mut self, measurement: f64) {
        if measurement < self.min {
            self.min = measurement;
        }
        if measurement > self.max {
            self.max = measurement;
        }
        self.sum += measurement;
        self.count += 1;
    }

    pub fn merge(&mut self, other: &StationEntry) {
        if other.min < self.min {
            self.min = other.min;
        }
        if other.max > self.max {
            self.max = other.max;
        }
        self.sum += other.sum;
        self.count += other.count;
    }

    pub fn mean(&self) -> f64 {
        self.sum / self.count as f64
    }
}

/// Key bytes to aggregate. Used both for a chunk's partial result and for the
/// merged global result.
pub type StationMap = FxHashMap<Box<[u8]>, StationEntry>;

pub fn new_station_map() -> StationMap {
    StationMap::with_capacity_and_hasher(1024, Default::default())
}

/// Fold one measurement into `summary`, allocating the key only on first sight.
pub fn insert_measurement(summary: &mut StationMap, name: &[u8], measurement: f64) {
    match summary.get_mut(name) {
        Some(entry) => entry.add_measurement(measurement),
        None => {
            summary.insert(name.into(), StationEntry::new(measurement));
        }
    }
}
