//! Keplerian orbital mechanics: pure math, no session state.
//!
//! Follows the "approximate positions of the planets" procedure: elements are
//! extrapolated linearly from J2000 by secular rates per Julian century, the
//! mean anomaly picks up optional long-baseline perturbation terms, Kepler's
//! equation is solved in degrees, and the perifocal position is rotated into
//! the J2000 ecliptic frame.
//!
//! Uses f64 throughout (centuries × deg/century = large numbers).

use glam::{DMat3, DVec3};

/// Julian day number of the J2000.0 epoch.
pub const J2000: f64 = 2451545.0;
/// Days per Julian century.
pub const DAYS_PER_CENTURY: f64 = 36525.0;
/// Convergence threshold on |ΔE| in degrees.
pub const KEPLER_TOLERANCE_DEG: f64 = 1e-6;
/// Hard cap on Newton iterations.
pub const KEPLER_MAX_ITERATIONS: u32 = 100;

/// One orbital element: value at J2000 plus its rate per Julian century.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    pub epoch: f64,
    pub rate: f64,
}

impl Element {
    pub const fn new(epoch: f64, rate: f64) -> Self {
        Self { epoch, rate }
    }

    /// Value `t` centuries after J2000.
    #[inline]
    pub fn at(&self, t: f64) -> f64 {
        self.epoch + self.rate * t
    }
}

/// Additional mean-anomaly terms `b·T² + c·cos(f·T) + s·sin(f·T)` (degrees).
/// Only the outer planets carry them, and only in the long-interval fit.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Perturbation {
    pub b: f64,
    pub c: f64,
    pub s: f64,
    pub f: f64,
}

impl Perturbation {
    pub const NONE: Perturbation = Perturbation { b: 0.0, c: 0.0, s: 0.0, f: 0.0 };

    pub const fn new(b: f64, c: f64, s: f64, f: f64) -> Self {
        Self { b, c, s, f }
    }

    pub fn at(&self, t: f64) -> f64 {
        let ft = (self.f * t).to_radians();
        self.b * t * t + self.c * ft.cos() + self.s * ft.sin()
    }
}

/// The six classical elements (angles in degrees, `a` in AU).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrbitalElements {
    /// Semi-major axis.
    pub a: Element,
    /// Eccentricity.
    pub e: Element,
    /// Inclination.
    pub i: Element,
    /// Mean longitude.
    pub l: Element,
    /// Longitude of perihelion (ϖ).
    pub long_peri: Element,
    /// Longitude of the ascending node (Ω).
    pub long_node: Element,
    pub perturbation: Perturbation,
}

/// Result of the Newton iteration on Kepler's equation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeplerSolution {
    /// Eccentric anomaly in degrees.
    pub eccentric_anomaly: f64,
    pub iterations: u32,
    /// False when the iteration cap was hit; the estimate is still returned.
    pub converged: bool,
}

/// Julian centuries elapsed since J2000 for a day number.
pub fn centuries_since_j2000(day_number: f64) -> f64 {
    (day_number - J2000) / DAYS_PER_CENTURY
}

/// Wrap an angle in degrees into (−180, 180].
pub fn normalize_degrees(angle: f64) -> f64 {
    let mut m = angle % 360.0;
    if m > 180.0 {
        m -= 360.0;
    } else if m <= -180.0 {
        m += 360.0;
    }
    m
}

/// Solve E − e°·sin(E) = M for the eccentric anomaly (degrees),
/// where e° is the eccentricity expressed in degrees.
pub fn solve_kepler(mean_anomaly: f64, eccentricity: f64) -> KeplerSolution {
    let e_star = eccentricity.to_degrees();
    let mut ea = mean_anomaly + e_star * mean_anomaly.to_radians().sin();

    for iteration in 1..=KEPLER_MAX_ITERATIONS {
        let delta_m = mean_anomaly - (ea - e_star * ea.to_radians().sin());
        let delta_e = delta_m / (1.0 - eccentricity * ea.to_radians().cos());
        ea += delta_e;
        if delta_e.abs() < KEPLER_TOLERANCE_DEG {
            return KeplerSolution { eccentric_anomaly: ea, iterations: iteration, converged: true };
        }
    }

    log::debug!(
        "kepler: no convergence after {} iterations (M={}, e={})",
        KEPLER_MAX_ITERATIONS, mean_anomaly, eccentricity
    );
    KeplerSolution { eccentric_anomaly: ea, iterations: KEPLER_MAX_ITERATIONS, converged: false }
}

/// Perifocal → J2000 ecliptic rotation from ω, Ω and I (degrees).
fn perifocal_to_ecliptic(arg_peri: f64, long_node: f64, incl: f64) -> DMat3 {
    let (sw, cw) = arg_peri.to_radians().sin_cos();
    let (so, co) = long_node.to_radians().sin_cos();
    let (si, ci) = incl.to_radians().sin_cos();

    DMat3::from_cols(
        DVec3::new(cw * co - sw * so * ci, cw * so + sw * co * ci, sw * si),
        DVec3::new(-sw * co - cw * so * ci, -sw * so + cw * co * ci, cw * si),
        DVec3::new(so * si, -co * si, ci),
    )
}

/// Heliocentric ecliptic position (AU) `t` centuries after J2000.
pub fn heliocentric_position(elements: &OrbitalElements, t: f64) -> DVec3 {
    let a = elements.a.at(t);
    let e = elements.e.at(t);
    let incl = elements.i.at(t);
    let l = elements.l.at(t);
    let long_peri = elements.long_peri.at(t);
    let long_node = elements.long_node.at(t);

    let arg_peri = long_peri - long_node;
    let mean_anomaly = normalize_degrees(l - long_peri + elements.perturbation.at(t));

    let ea = solve_kepler(mean_anomaly, e).eccentric_anomaly.to_radians();

    let x = a * (ea.cos() - e);
    let y = a * (1.0 - e * e).sqrt() * ea.sin();

    perifocal_to_ecliptic(arg_peri, long_node, incl) * DVec3::new(x, y, 0.0)
}
