use std::cell::Cell;

use glam::DVec3;

use crate::api::types::ColliderId;

/// A sphere standing in for a body's mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereCollider {
    pub id: ColliderId,
    pub center: DVec3,
    pub radius: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    pub collider: ColliderId,
    /// Distance from the ray origin to the first surface crossing.
    pub distance: f64,
}

/// Analytic ray/sphere caster with a configurable tolerance for grazing
/// hits. Counts casts so callers can assert a short-circuit happened.
#[derive(Debug)]
pub struct RayCaster {
    precision: f64,
    casts: Cell<u64>,
}

impl RayCaster {
    pub fn new(precision: f64) -> Self {
        Self {
            precision: precision.abs(),
            casts: Cell::new(0),
        }
    }

    /// Number of rays cast so far.
    pub fn cast_count(&self) -> u64 {
        self.casts.get()
    }

    /// Cast a ray along the unit vector `direction` and return every hit,
    /// nearest first. An origin inside a sphere hits it at distance 0.
    pub fn cast(&self, origin: DVec3, direction: DVec3, colliders: &[SphereCollider]) -> Vec<RayHit> {
        self.casts.set(self.casts.get() + 1);

        let mut hits: Vec<RayHit> = colliders
            .iter()
            .filter_map(|c| {
                intersect_sphere(origin, direction, c.center, c.radius, self.precision)
                    .map(|distance| RayHit { collider: c.id, distance })
            })
            .collect();
        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }
}

/// Distance along the ray to the sphere surface, if it is struck ahead of
/// the origin. Discriminants within `precision` below zero count as tangent.
fn intersect_sphere(origin: DVec3, direction: DVec3, center: DVec3, radius: f64, precision: f64) -> Option<f64> {
    let oc = origin - center;
    let b = oc.dot(direction);
    let c = oc.length_squared() - radius * radius;

    if c <= 0.0 {
        return Some(0.0);
    }
    if b > 0.0 {
        // Outside and pointing away.
        return None;
    }

    let disc = b * b - c;
    if disc < -precision {
        return None;
    }
    Some(-b - disc.max(0.0).sqrt())
}
