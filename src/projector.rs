//! Latest-value projection: one reading per device, the newest one.

use std::collections::HashMap;

use crate::models::{LatestReading, StoredReading};

// ---

/// Select the newest reading for every device.
///
/// A single pass keeps one slot per device and replaces it whenever a
/// candidate's `(timestamp, id)` is at least the current one, so on an exact
/// timestamp tie the later insert wins. The result is ordered by device id
/// ascending and does not depend on input order.
pub fn project(readings: &[StoredReading]) -> Vec<LatestReading> {
    // ---
    let mut best: HashMap<&str, &StoredReading> = HashMap::new();

    for reading in readings {
        best.entry(reading.device_id.as_str())
            .and_modify(|current| {
                if reading.recency_key() >= current.recency_key() {
                    *current = reading;
                }
            })
            .or_insert(reading);
    }

    let mut latest: Vec<LatestReading> = best.into_values().cloned().collect();
    latest.sort_by(|a, b| a.device_id.cmp(&b.device_id));
    latest
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::models::fixtures::stored;

    #[test]
    fn test_empty_input() {
        assert!(project(&[]).is_empty());
    }

    #[test]
    fn test_one_per_device_at_max_timestamp() {
        // ---
        let mut rows = Vec::new();
        let mut id = 0;
        // GH001 every 10 minutes, GH002 every 7, interleaved by id
        for step in 0..12 {
            id += 1;
            rows.push(stored(id, "GH001", step * 10, 100.0 + step as f64, 6.5));
            id += 1;
            rows.push(stored(id, "GH002", step * 7, 200.0 + step as f64, 6.5));
        }

        let latest = project(&rows);
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].device_id, "GH001");
        assert_eq!(latest[0].nitrogen, 111.0);
        assert_eq!(latest[1].device_id, "GH002");
        assert_eq!(latest[1].nitrogen, 211.0);

        rows.reverse();
        assert_eq!(project(&rows), latest);

        rows.swap(0, 13);
        rows.swap(4, 20);
        assert_eq!(project(&rows), latest);
    }

    #[test]
    fn test_timestamp_tie_larger_id_wins() {
        // ---
        let older_insert = stored(4, "GH001", 30, 150.0, 6.5);
        let newer_insert = stored(9, "GH001", 30, 175.0, 6.5);

        let forward = project(&[older_insert.clone(), newer_insert.clone()]);
        let backward = project(&[newer_insert.clone(), older_insert]);

        assert_eq!(forward, vec![newer_insert.clone()]);
        assert_eq!(backward, vec![newer_insert]);
    }

    #[test]
    fn test_later_timestamp_beats_larger_id() {
        // ---
        let late_sensor_time = stored(1, "GH003", 60, 120.0, 6.5);
        let backfilled = stored(2, "GH003", 10, 130.0, 6.5);
        let latest = project(&[late_sensor_time.clone(), backfilled]);
        assert_eq!(latest, vec![late_sensor_time]);
    }

    #[test]
    fn test_ordered_by_device_id() {
        // ---
        let rows = vec![
            stored(1, "GH010", 0, 100.0, 6.5),
            stored(2, "GH002", 0, 100.0, 6.5),
            stored(3, "GH001", 0, 100.0, 6.5),
        ];
        let ids: Vec<String> = project(&rows).into_iter().map(|r| r.device_id).collect();
        assert_eq!(ids, vec!["GH001", "GH002", "GH010"]);
    }
}
