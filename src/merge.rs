use crate::{
    error::Result,
    station::{StationMap, new_station_map},
};

/// Fold `summary2` into `summary1`. Keys new to `summary1` are moved over as is.
pub fn merge_summaries(mut summary1: StationMap, summary2: StationMap) -> StationMap {
    summary2
        .into_iter()
        .for_each(|(station_name, partial_entry)| {
            summary1
                .entry(station_name)
                .and_modify(|entry| entry.merge(&partial_entry))
                .or_insert(partial_entry);
        });
    summary1
}

/// Merge every worker's partial aggregate into one global aggregate.
///
/// All results are checked before any merging happens: the first failed worker
/// (in input order) is returned and nothing is merged.
pub fn merge_all<I>(partials: I) -> Result<StationMap>
where
    I: IntoIterator<Item = Result<StationMap>>,
{
    let partials = partials.into_iter().collect::<Result<Vec<_>>>()?;
    Ok(partials
        .into_iter()
        .reduce(merge_summaries)
        .unwrap_or_else(new_station_map))
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::{error::Error, station::insert_measurement};

    fn summary(records: &[(&str, f64)]) -> StationMap {
        let mut summary = new_station_map();
        for (name, value) in records {
            insert_measurement(&mut summary, name.as_bytes(), *value);
        }
        summary
    }

    #[test]
    fn combines_shared_and_distinct_keys() {
        let merged = merge_summaries(
            summary(&[("A", 10.0), ("B", 5.0)]),
            summary(&[("A", 20.0), ("C", -1.0)]),
        );
        assert_eq!(merged.len(), 3);
        let a = merged[&b"A"[..]];
        assert_eq!((a.min, a.max, a.sum, a.count), (10.0, 20.0, 30.0, 2));
        assert_eq!(merged[&b"C"[..]].count, 1);
    }

    #[test]
    fn no_partials_gives_an_empty_aggregate() {
        assert!(merge_all(Vec::<Result<StationMap>>::new()).unwrap().is_empty());
    }

    #[test]
    fn a_failed_worker_aborts_the_merge() {
        let partials = vec![
            Ok(summary(&[("A", 1.0)])),
            Err(Error::Config("boom".into())),
            Ok(summary(&[("B", 2.0)])),
        ];
        assert!(matches!(merge_all(partials), Err(Error::Config(_))));
    }

    fn arb_partials() -> impl Strategy<Value = Vec<Vec<(String, i32)>>> {
        prop::collection::vec(
            prop::collection::vec(("[a-e]", -999i32..1000), 0..30),
            1..8,
        )
    }

    proptest! {
        #[test]
        fn merge_order_does_not_matter(partials in arb_partials(), seed in any::<u64>()) {
            // half-degree values keep sums exact so results compare bitwise
            let build = |records: &Vec<(String, i32)>| {
                let mut summary = new_station_map();
                for (name, halves) in records {
                    insert_measurement(&mut summary, name.as_bytes(), *halves as f64 / 2.0);
                }
                summary
            };
            let forward = merge_all(partials.iter().map(|p| Ok(build(p)))).unwrap();

            let mut shuffled: Vec<_> = partials.iter().collect();
            let len = shuffled.len();
            for i in 0..len {
                let j = (seed.rotate_left(i as u32) as usize) % len;
                shuffled.swap(i, j);
            }
            let permuted = merge_all(shuffled.into_iter().rev().map(|p| Ok(build(p)))).unwrap();

            prop_assert_eq!(forward, permuted);
        }
    }
}
