use std::collections::{BTreeMap, HashMap};

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::api::error::EphemerisError;

/// On-the-wire ephemeris batch:
/// `{ "planetPositionArrays": { "<dayNumber>": { "<body>": [x, y, z] } } }`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchPayload {
    pub planet_position_arrays: BTreeMap<String, BTreeMap<String, [f64; 3]>>,
}

/// One decoded day of a batch.
#[derive(Debug, Clone, PartialEq)]
pub struct DayRecord {
    pub day_number: f64,
    pub positions: HashMap<String, DVec3>,
}

/// Format a day number the way it appears as a JSON key.
pub fn day_key(day_number: f64) -> String {
    format!("{day_number}")
}

impl BatchPayload {
    pub fn from_json(json: &str) -> Result<Self, EphemerisError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn insert(&mut self, day_number: f64, body: &str, position: DVec3) {
        self.planet_position_arrays
            .entry(day_key(day_number))
            .or_default()
            .insert(body.to_string(), position.to_array());
    }

    pub fn is_empty(&self) -> bool {
        self.planet_position_arrays.is_empty()
    }

    pub fn len(&self) -> usize {
        self.planet_position_arrays.len()
    }

    /// Decode every day, ascending by day number.
    pub fn records(&self) -> Result<Vec<DayRecord>, EphemerisError> {
        let mut records = self
            .planet_position_arrays
            .iter()
            .map(|(key, bodies)| {
                let day_number: f64 = key
                    .parse()
                    .map_err(|_| EphemerisError::MalformedKey(key.clone()))?;
                if !day_number.is_finite() {
                    return Err(EphemerisError::MalformedKey(key.clone()));
                }
                let positions = bodies
                    .iter()
                    .map(|(name, p)| (name.clone(), DVec3::from_array(*p)))
                    .collect();
                Ok(DayRecord { day_number, positions })
            })
            .collect::<Result<Vec<_>, _>>()?;
        records.sort_by(|a, b| a.day_number.total_cmp(&b.day_number));
        Ok(records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_format() {
        let json = r#"{
            "planetPositionArrays": {
                "2451545": { "earth": [-0.18, 0.97, 0.0], "mars": [1.39, -0.01, -0.03] },
                "2451544.5": { "earth": [-0.17, 0.97, 0.0] }
            }
        }"#;
        let payload = BatchPayload::from_json(json).unwrap();
        let records = payload.records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].day_number, 2451544.5);
        assert_eq!(records[1].day_number, 2451545.0);
        assert_eq!(records[1].positions["mars"], DVec3::new(1.39, -0.01, -0.03));
    }

    #[test]
    fn integral_days_have_no_fraction_in_key() {
        assert_eq!(day_key(2451549.0), "2451549");
        assert_eq!(day_key(2451549.25), "2451549.25");
    }

    #[test]
    fn non_numeric_key_is_rejected() {
        let mut payload = BatchPayload::default();
        payload
            .planet_position_arrays
            .insert("tomorrow".into(), BTreeMap::new());
        assert!(matches!(payload.records(), Err(EphemerisError::MalformedKey(_))));
    }

    #[test]
    fn wrong_shape_is_malformed() {
        let err = BatchPayload::from_json(r#"{ "planetPositionArrays": { "1": { "earth": [1, 2] } } }"#);
        assert!(matches!(err, Err(EphemerisError::Malformed(_))));
    }
}
