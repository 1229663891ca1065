use std::collections::{BTreeMap, HashMap};

use glam::DVec3;
use ordered_float::OrderedFloat;

use super::wire::DayRecord;
use super::EphemerisSource;

/// In-memory ephemeris: day number -> body key -> position (AU).
///
/// Days already present are never overwritten by a later merge, and the
/// watermark is always the largest key present.
#[derive(Debug, Default)]
pub struct EphemerisTable {
    days: BTreeMap<OrderedFloat<f64>, HashMap<String, DVec3>>,
}

impl EphemerisTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge decoded records. Returns how many new days were added.
    pub fn merge(&mut self, records: Vec<DayRecord>) -> usize {
        let mut added = 0;
        for record in records {
            let key = OrderedFloat(record.day_number);
            if self.days.contains_key(&key) {
                continue;
            }
            self.days.insert(key, record.positions);
            added += 1;
        }
        added
    }

    /// Earliest loaded day number.
    pub fn first_day(&self) -> Option<f64> {
        self.days.keys().next().map(|d| d.0)
    }

    /// The "last day number in batch" watermark.
    pub fn last_day(&self) -> Option<f64> {
        self.days.keys().next_back().map(|d| d.0)
    }

    /// Whether `day_number` lies inside the loaded span (inclusive).
    pub fn covers(&self, day_number: f64) -> bool {
        match (self.first_day(), self.last_day()) {
            (Some(first), Some(last)) => day_number >= first && day_number <= last,
            _ => false,
        }
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Exact record when `day_number` is a key, otherwise linear
    /// interpolation between the loaded neighbours on either side.
    pub fn get(&self, body: &str, day_number: f64) -> Option<DVec3> {
        let key = OrderedFloat(day_number);
        let (lo_day, lo) = self.days.range(..=key).next_back()?;
        let lo_pos = *lo.get(body)?;
        if *lo_day == key {
            return Some(lo_pos);
        }
        let (hi_day, hi) = self.days.range(key..).next()?;
        let hi_pos = *hi.get(body)?;
        let t = (day_number - lo_day.0) / (hi_day.0 - lo_day.0);
        Some(lo_pos.lerp(hi_pos, t))
    }
}

impl EphemerisSource for EphemerisTable {
    fn position(&self, body: &str, day_number: f64) -> Option<DVec3> {
        self.get(body, day_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(day_number: f64, x: f64) -> DayRecord {
        let mut positions = HashMap::new();
        positions.insert("earth".to_string(), DVec3::new(x, 0.0, 0.0));
        DayRecord { day_number, positions }
    }

    #[test]
    fn exact_and_interpolated_lookup() {
        let mut table = EphemerisTable::new();
        table.merge(vec![record(10.0, 1.0), record(11.0, 3.0)]);
        assert_eq!(table.get("earth", 10.0), Some(DVec3::new(1.0, 0.0, 0.0)));
        assert_eq!(table.get("earth", 10.25), Some(DVec3::new(1.5, 0.0, 0.0)));
        assert_eq!(table.get("earth", 11.0), Some(DVec3::new(3.0, 0.0, 0.0)));
    }

    #[test]
    fn absent_outside_loaded_span_or_for_unknown_body() {
        let mut table = EphemerisTable::new();
        table.merge(vec![record(10.0, 1.0), record(11.0, 3.0)]);
        assert_eq!(table.get("earth", 9.5), None);
        assert_eq!(table.get("earth", 11.5), None);
        assert_eq!(table.get("mars", 10.0), None);
    }

    #[test]
    fn loaded_days_are_immutable() {
        let mut table = EphemerisTable::new();
        assert_eq!(table.merge(vec![record(10.0, 1.0)]), 1);
        assert_eq!(table.merge(vec![record(10.0, 99.0), record(12.0, 2.0)]), 1);
        assert_eq!(table.get("earth", 10.0), Some(DVec3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn watermark_tracks_maximum_key() {
        let mut table = EphemerisTable::new();
        assert_eq!(table.last_day(), None);
        assert!(!table.covers(10.0));
        table.merge(vec![record(12.0, 0.0), record(10.0, 0.0)]);
        assert_eq!(table.last_day(), Some(12.0));
        table.merge(vec![record(11.0, 0.0)]);
        assert_eq!(table.last_day(), Some(12.0));
        assert!(table.covers(12.0));
        assert!(!table.covers(12.5));
    }
}
