use glam::DVec3;

use crate::ephemeris::EphemerisSource;

/// Fraction of a period the path runs ahead of "now".
pub const LEAD_FRACTION: f64 = 1.0 / 32.0;

/// Sampled orbit curve for one body.
///
/// Samples span exactly one period ending a short lead past the current day,
/// so the body never sits on the seam where the loop closes. The path is
/// rebuilt only once the day number passes the lead end.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitPath {
    period_days: f64,
    max_samples: usize,
    vertices: Vec<DVec3>,
    refresh_at: Option<f64>,
}

impl OrbitPath {
    pub fn new(period_days: f64, max_samples: usize) -> Self {
        Self {
            period_days,
            max_samples: max_samples.max(2),
            vertices: Vec::with_capacity(max_samples.max(2)),
            refresh_at: None,
        }
    }

    pub fn vertices(&self) -> &[DVec3] {
        &self.vertices
    }

    pub fn max_samples(&self) -> usize {
        self.max_samples
    }

    /// Day number past which the path must be rebuilt.
    pub fn refresh_at(&self) -> Option<f64> {
        self.refresh_at
    }

    pub fn needs_refresh(&self, day_number: f64) -> bool {
        match self.refresh_at {
            None => true,
            Some(at) => day_number >= at || day_number < at - self.period_days,
        }
    }

    /// Rebuild the samples around `day_number`. Days the source cannot place
    /// are skipped.
    pub fn resample(
        &mut self,
        day_number: f64,
        key: &str,
        source: &dyn EphemerisSource,
        position_scale: f64,
    ) {
        let end = day_number + self.period_days * LEAD_FRACTION;
        let start = end - self.period_days;
        let last = (self.max_samples - 1) as f64;

        self.vertices.clear();
        for k in 0..self.max_samples {
            let day = start + self.period_days * (k as f64 / last);
            if let Some(p) = source.position(key, day) {
                self.vertices.push(p * position_scale);
            }
        }
        self.refresh_at = Some(end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ephemeris::KeplerEphemeris;

    #[test]
    fn samples_capped_and_span_one_period() {
        let mut path = OrbitPath::new(365.256, 64);
        assert!(path.needs_refresh(2451545.0));
        path.resample(2451545.0, "earth", &KeplerEphemeris, 1.0);

        assert_eq!(path.vertices().len(), 64);
        let first = path.vertices()[0];
        let last = path.vertices()[63];
        // One sidereal year apart: the loop nearly closes.
        assert!(first.distance(last) < 1e-3, "gap = {}", first.distance(last));
    }

    #[test]
    fn lead_puts_now_inside_the_curve() {
        let mut path = OrbitPath::new(100.0, 11);
        path.resample(1000.0, "mars", &KeplerEphemeris, 1.0);
        let at = path.refresh_at().unwrap();
        assert!(at > 1000.0);
        assert!((at - 1000.0 - 100.0 * LEAD_FRACTION).abs() < 1e-12);
    }

    #[test]
    fn refresh_only_after_threshold() {
        let mut path = OrbitPath::new(100.0, 11);
        path.resample(1000.0, "mars", &KeplerEphemeris, 1.0);
        assert!(!path.needs_refresh(1001.0));
        assert!(path.needs_refresh(1003.125));
        assert!(path.needs_refresh(800.0));
    }

    #[test]
    fn unknown_key_yields_no_vertices() {
        let mut path = OrbitPath::new(27.3, 16);
        path.resample(0.0, "moon", &KeplerEphemeris, 1.0);
        assert!(path.vertices().is_empty());
    }
}
