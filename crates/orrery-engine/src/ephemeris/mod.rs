pub mod elements;
pub mod kepler;
pub mod loader;
pub mod table;
pub mod wire;

use glam::DVec3;

use crate::api::error::EphemerisError;
use elements::{planet, select_elements, PLANETS};
use kepler::{centuries_since_j2000, heliocentric_position};
use loader::{BatchLoader, BatchRequest};
use table::EphemerisTable;
use wire::BatchPayload;

/// "Position of body B at day D", whichever way it is obtained.
pub trait EphemerisSource {
    fn position(&self, body: &str, day_number: f64) -> Option<DVec3>;
}

/// Closed-form positions from the element tables. Stateless.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeplerEphemeris;

impl KeplerEphemeris {
    /// Positions of every tabulated planet for `limit` days from `start`.
    pub fn batch(&self, start: f64, step: f64, limit: u32) -> BatchPayload {
        let mut payload = BatchPayload::default();
        for i in 0..limit {
            let day = start + step * i as f64;
            let t = centuries_since_j2000(day);
            for p in PLANETS.iter() {
                payload.insert(day, p.key, heliocentric_position(select_elements(p, t), t));
            }
        }
        payload
    }
}

impl EphemerisSource for KeplerEphemeris {
    fn position(&self, body: &str, day_number: f64) -> Option<DVec3> {
        let p = planet(body)?;
        let t = centuries_since_j2000(day_number);
        Some(heliocentric_position(select_elements(p, t), t))
    }
}

/// What a poll of the loader produced.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    Loaded { start: f64, days: usize },
    Failed { start: f64 },
}

/// The tabulated source used by the live view: a growing table fed by a
/// batch loader, one request in flight at a time.
pub struct TabulatedEphemeris {
    table: EphemerisTable,
    loader: Box<dyn BatchLoader>,
    batch_size: u32,
    batch_step: f64,
    in_flight: Option<BatchRequest>,
    last_failure: Option<EphemerisError>,
}

impl TabulatedEphemeris {
    pub fn new(loader: Box<dyn BatchLoader>, batch_size: u32, batch_step: f64) -> Self {
        Self {
            table: EphemerisTable::new(),
            loader,
            batch_size,
            batch_step,
            in_flight: None,
            last_failure: None,
        }
    }

    /// Ask for the batch starting at `start`. Ignored while another batch is
    /// in flight; returns whether a request went out.
    pub fn request_batch(&mut self, start: f64) -> bool {
        if let Some(pending) = self.in_flight {
            log::debug!("ephemeris: batch at {} still in flight, not requesting {}", pending.start, start);
            return false;
        }
        let request = BatchRequest {
            start,
            step: self.batch_step,
            limit: self.batch_size,
        };
        log::info!("ephemeris: requesting batch {}", request.query());
        self.last_failure = None;
        self.in_flight = Some(request);
        self.loader.request(request);
        true
    }

    /// Merge a completed batch, if any. A failed or empty batch leaves the
    /// table untouched and is kept as the last failure.
    pub fn poll(&mut self) -> Option<BatchOutcome> {
        let response = self.loader.poll()?;
        if self.in_flight.map(|r| r.start) == Some(response.request.start) {
            self.in_flight = None;
        }
        let start = response.request.start;

        let records = response.result.and_then(|payload| {
            if payload.is_empty() {
                Err(EphemerisError::EmptyBatch(start))
            } else {
                payload.records()
            }
        });

        match records {
            Ok(records) => {
                let days = self.table.merge(records);
                log::info!(
                    "ephemeris: merged {} days from {}, watermark {:?}",
                    days, start, self.table.last_day()
                );
                Some(BatchOutcome::Loaded { start, days })
            }
            Err(err) => {
                log::warn!("ephemeris: batch at {} failed: {}", start, err);
                self.last_failure = Some(err);
                Some(BatchOutcome::Failed { start })
            }
        }
    }

    pub fn covers(&self, day_number: f64) -> bool {
        self.table.covers(day_number)
    }

    pub fn last_day(&self) -> Option<f64> {
        self.table.last_day()
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn take_failure(&mut self) -> Option<EphemerisError> {
        self.last_failure.take()
    }

    pub fn table(&self) -> &EphemerisTable {
        &self.table
    }
}

impl EphemerisSource for TabulatedEphemeris {
    fn position(&self, body: &str, day_number: f64) -> Option<DVec3> {
        self.table.get(body, day_number)
    }
}

#[cfg(test)]
mod tests {
    use super::loader::scripted::{Script, ScriptedLoader};
    use super::*;

    #[test]
    fn analytic_batch_agrees_with_point_queries() {
        let source = KeplerEphemeris;
        let payload = source.batch(2460000.0, 10.0, 2);
        let records = payload.records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].day_number, 2460010.0);
        let mars = source.position("mars", 2460010.0).unwrap();
        assert_eq!(records[1].positions["mars"], mars);
        assert!(source.position("sun", 2460010.0).is_none());
    }

    #[test]
    fn one_request_in_flight() {
        let script = Script::shared();
        let mut eph = TabulatedEphemeris::new(Box::new(ScriptedLoader(script.clone())), 5, 1.0);
        assert!(eph.request_batch(100.0));
        assert!(!eph.request_batch(105.0));
        assert_eq!(script.borrow().requests.len(), 1);
        assert!(eph.is_loading());

        script.borrow_mut().resolve(&[("earth", DVec3::X)]);
        assert_eq!(eph.poll(), Some(BatchOutcome::Loaded { start: 100.0, days: 5 }));
        assert!(!eph.is_loading());
        assert_eq!(eph.last_day(), Some(104.0));
        assert!(eph.request_batch(105.0));
    }

    #[test]
    fn failure_keeps_previous_data() {
        let script = Script::shared();
        let mut eph = TabulatedEphemeris::new(Box::new(ScriptedLoader(script.clone())), 3, 1.0);
        eph.request_batch(0.0);
        script.borrow_mut().resolve(&[("earth", DVec3::Y)]);
        eph.poll();

        eph.request_batch(3.0);
        script.borrow_mut().fail("offline");
        assert_eq!(eph.poll(), Some(BatchOutcome::Failed { start: 3.0 }));
        assert!(matches!(eph.take_failure(), Some(EphemerisError::Fetch(_))));
        assert_eq!(eph.last_day(), Some(2.0));
        assert_eq!(eph.position("earth", 1.0), Some(DVec3::Y));
    }
}
