use std::collections::HashMap;

use glam::{DQuat, DVec3};

use crate::api::types::ColliderId;
use crate::collision::raycast::{RayCaster, SphereCollider};
use crate::components::body::Body;

/// Which clearance a move is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionDistance {
    /// Scaled radius plus a buffer; used for manual flight.
    Approach,
    /// Plain scaled radius; used by the auto-pilot to decide it has arrived.
    Surface,
}

/// Vetoes camera moves that would bring it within a body's collision
/// distance. Reads bodies and camera, never mutates them.
#[derive(Debug)]
pub struct CollisionOracle {
    caster: RayCaster,
    approach_buffer_ratio: f64,
    colliders: Vec<SphereCollider>,
    owners: HashMap<ColliderId, usize>,
}

impl CollisionOracle {
    pub fn new(ray_precision: f64, approach_buffer_ratio: f64) -> Self {
        Self {
            caster: RayCaster::new(ray_precision),
            approach_buffer_ratio,
            colliders: Vec::with_capacity(16),
            owners: HashMap::with_capacity(16),
        }
    }

    pub fn caster(&self) -> &RayCaster {
        &self.caster
    }

    /// Would translating the camera by `translation` (camera-local) carry it
    /// inside the collision distance of any of `bodies`?
    ///
    /// A zero translation is never a collision and casts no ray. Otherwise a
    /// ray is cast along the world-space direction of travel, each hit is
    /// resolved to its body by collider identity, and the first hit closer
    /// than that body's collision distance (strictly) decides.
    pub fn will_collide(
        &mut self,
        position: DVec3,
        orientation: DQuat,
        translation: DVec3,
        bodies: &[&Body],
        variant: CollisionDistance,
    ) -> bool {
        if translation.length_squared() == 0.0 {
            return false;
        }
        let direction = (orientation * translation).normalize();

        self.colliders.clear();
        self.owners.clear();
        for (idx, body) in bodies.iter().enumerate() {
            self.colliders.push(SphereCollider {
                id: body.collider,
                center: body.position,
                radius: body.radius,
            });
            self.owners.insert(body.collider, idx);
        }

        for hit in self.caster.cast(position, direction, &self.colliders) {
            let Some(&idx) = self.owners.get(&hit.collider) else {
                log::warn!("collision: hit on unknown collider {:?}", hit.collider);
                continue;
            };
            let body = bodies[idx];
            if hit.distance < body.collision_distance(variant, self.approach_buffer_ratio) {
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::BodyId;
    use crate::components::body::{BodyCategory, BodyDesc};

    fn body_at(id: u32, center: DVec3, radius: f64) -> Body {
        let mut body = Body::new(BodyId(id), BodyDesc::new(format!("b{id}"), BodyCategory::Planet, 1.0));
        body.position = center;
        body.radius = radius;
        body
    }

    fn forward() -> DVec3 {
        DVec3::new(0.0, 0.0, -1.0)
    }

    #[test]
    fn zero_translation_casts_nothing() {
        let mut oracle = CollisionOracle::new(1e-6, 0.25);
        let body = body_at(0, DVec3::new(0.0, 0.0, -1.5), 1.0);
        assert!(!oracle.will_collide(DVec3::ZERO, DQuat::IDENTITY, DVec3::ZERO, &[&body], CollisionDistance::Surface));
        assert_eq!(oracle.caster().cast_count(), 0);
    }

    #[test]
    fn hit_exactly_at_collision_distance_is_clear() {
        let mut oracle = CollisionOracle::new(1e-6, 0.25);
        // Surface at distance 1.0, collision distance 1.0.
        let body = body_at(0, DVec3::new(0.0, 0.0, -2.0), 1.0);
        assert!(!oracle.will_collide(DVec3::ZERO, DQuat::IDENTITY, forward(), &[&body], CollisionDistance::Surface));
    }

    #[test]
    fn one_unit_closer_collides() {
        let mut oracle = CollisionOracle::new(1e-6, 0.25);
        let clear = body_at(0, DVec3::new(0.0, 0.0, -4.0), 2.0);
        let close = body_at(1, DVec3::new(0.0, 0.0, -3.0), 2.0);
        assert!(!oracle.will_collide(DVec3::ZERO, DQuat::IDENTITY, forward(), &[&clear], CollisionDistance::Surface));
        assert!(oracle.will_collide(DVec3::ZERO, DQuat::IDENTITY, forward(), &[&close], CollisionDistance::Surface));
    }

    #[test]
    fn approach_variant_adds_buffer() {
        let mut oracle = CollisionOracle::new(1e-6, 0.25);
        // Hit at 2.0; surface distance 2.0, approach distance 2.5.
        let body = body_at(0, DVec3::new(0.0, 0.0, -4.0), 2.0);
        assert!(!oracle.will_collide(DVec3::ZERO, DQuat::IDENTITY, forward(), &[&body], CollisionDistance::Surface));
        assert!(oracle.will_collide(DVec3::ZERO, DQuat::IDENTITY, forward(), &[&body], CollisionDistance::Approach));
    }

    #[test]
    fn direction_follows_camera_orientation() {
        let mut oracle = CollisionOracle::new(1e-6, 0.25);
        let body = body_at(0, DVec3::new(1.5, 0.0, 0.0), 1.0);
        // Yaw -90° about Y turns local -Z into world +X.
        let yaw = DQuat::from_rotation_y(-std::f64::consts::FRAC_PI_2);
        assert!(oracle.will_collide(DVec3::ZERO, yaw, forward(), &[&body], CollisionDistance::Surface));
        assert!(!oracle.will_collide(DVec3::ZERO, DQuat::IDENTITY, forward(), &[&body], CollisionDistance::Surface));
    }

    #[test]
    fn any_qualifying_body_is_enough() {
        let mut oracle = CollisionOracle::new(1e-6, 0.25);
        let far = body_at(0, DVec3::new(0.0, 0.0, -100.0), 1.0);
        let near = body_at(1, DVec3::new(0.0, 0.0, -1.5), 1.0);
        assert!(oracle.will_collide(DVec3::ZERO, DQuat::IDENTITY, forward(), &[&far, &near], CollisionDistance::Surface));
        assert_eq!(oracle.caster().cast_count(), 1);
    }
}
