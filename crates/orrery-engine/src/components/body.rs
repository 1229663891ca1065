use std::f64::consts::TAU;

use glam::DVec3;
use serde::{Deserialize, Serialize};

use crate::api::types::{BodyId, ColliderId};
use crate::collision::oracle::CollisionDistance;
use crate::components::orbit_path::OrbitPath;

/// Kilometres per astronomical unit (IAU 2012).
pub const KM_PER_AU: f64 = 149_597_870.7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BodyCategory {
    Star,
    Planet,
    Moon,
}

/// How a body's position is updated each tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum BodyMotion {
    /// Never moves (the Sun sits at the origin).
    Fixed,
    /// Looked up in the ephemeris under `key`.
    Ephemeris { key: String },
    /// Circular orbit around another body, placed after the parent moves.
    Satellite {
        parent: String,
        orbit_radius_km: f64,
        period_days: f64,
        phase_deg: f64,
        inclination_deg: f64,
    },
}

/// Surface maps the renderer applies. Stored, never processed here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Surface {
    pub bump: bool,
    pub specular: bool,
}

/// Static description of a body, built once at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyDesc {
    /// Unique key across the registry.
    pub name: String,
    pub category: BodyCategory,
    /// Mean radius in kilometres.
    pub radius_km: f64,
    pub motion: BodyMotion,
    pub surface: Surface,
    /// Only needed when an orbit path is drawn.
    pub orbital_period_days: Option<f64>,
    /// Max camera distance (AU) at which the label may render.
    pub label_distance: f64,
    pub collideable: bool,
    /// Sidereal rotation period; negative for retrograde spin.
    pub rotation_period_hours: Option<f64>,
}

impl BodyDesc {
    pub fn new(name: impl Into<String>, category: BodyCategory, radius_km: f64) -> Self {
        Self {
            name: name.into(),
            category,
            radius_km,
            motion: BodyMotion::Fixed,
            surface: Surface::default(),
            orbital_period_days: None,
            label_distance: 10.0,
            collideable: true,
            rotation_period_hours: None,
        }
    }

    // -- Builder pattern --

    pub fn with_ephemeris(mut self, key: impl Into<String>) -> Self {
        self.motion = BodyMotion::Ephemeris { key: key.into() };
        self
    }

    pub fn with_satellite_orbit(
        mut self,
        parent: impl Into<String>,
        orbit_radius_km: f64,
        period_days: f64,
        inclination_deg: f64,
    ) -> Self {
        self.motion = BodyMotion::Satellite {
            parent: parent.into(),
            orbit_radius_km,
            period_days,
            phase_deg: 0.0,
            inclination_deg,
        };
        self
    }

    pub fn with_orbital_period(mut self, days: f64) -> Self {
        self.orbital_period_days = Some(days);
        self
    }

    pub fn with_label_distance(mut self, au: f64) -> Self {
        self.label_distance = au;
        self
    }

    pub fn with_rotation_period(mut self, hours: f64) -> Self {
        self.rotation_period_hours = Some(hours);
        self
    }

    pub fn with_surface(mut self, bump: bool, specular: bool) -> Self {
        self.surface = Surface { bump, specular };
        self
    }

    pub fn with_collideable(mut self, collideable: bool) -> Self {
        self.collideable = collideable;
        self
    }

    pub fn ephemeris_key(&self) -> Option<&str> {
        match &self.motion {
            BodyMotion::Ephemeris { key } => Some(key),
            _ => None,
        }
    }
}

/// Label placement computed by the dependents update.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelState {
    pub visible: bool,
    /// Rank by camera distance; 0 is nearest and draws on top.
    pub order: u32,
}

/// A live body in the scene.
#[derive(Debug, Clone)]
pub struct Body {
    pub id: BodyId,
    pub collider: ColliderId,
    pub desc: BodyDesc,
    /// Scene-space position (AU × position scale).
    pub position: DVec3,
    /// Scaled radius in scene units.
    pub radius: f64,
    /// Spin angle about the body's pole, radians in [0, TAU).
    pub rotation: f64,
    pub label: LabelState,
    pub orbit: Option<OrbitPath>,
}

impl Body {
    pub fn new(id: BodyId, desc: BodyDesc) -> Self {
        Self {
            id,
            collider: ColliderId(id.0),
            radius: desc.radius_km / KM_PER_AU,
            desc,
            position: DVec3::ZERO,
            rotation: 0.0,
            label: LabelState::default(),
            orbit: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.desc.name
    }

    pub fn is_collideable(&self) -> bool {
        self.desc.collideable
    }

    /// Recompute the scaled radius from the size factor and position scale.
    pub fn set_scale(&mut self, size_factor: f64, position_scale: f64) {
        self.radius = self.desc.radius_km / KM_PER_AU * size_factor * position_scale;
    }

    pub fn surface_distance(&self) -> f64 {
        self.radius
    }

    /// Never less than the surface distance.
    pub fn approach_distance(&self, buffer_ratio: f64) -> f64 {
        self.radius * (1.0 + buffer_ratio.max(0.0))
    }

    pub fn collision_distance(&self, variant: CollisionDistance, buffer_ratio: f64) -> f64 {
        match variant {
            CollisionDistance::Surface => self.surface_distance(),
            CollisionDistance::Approach => self.approach_distance(buffer_ratio),
        }
    }

    /// Spin in radians per second: one rotation period in hours plays back
    /// as that many seconds.
    pub fn spin_rate(&self) -> f64 {
        match self.desc.rotation_period_hours {
            Some(hours) if hours != 0.0 => TAU / hours,
            _ => 0.0,
        }
    }

    pub fn spin(&mut self, delta: f64) {
        self.rotation = (self.rotation + self.spin_rate() * delta).rem_euclid(TAU);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn earth() -> Body {
        Body::new(
            BodyId(3),
            BodyDesc::new("earth", BodyCategory::Planet, 6371.0)
                .with_ephemeris("earth")
                .with_rotation_period(24.0),
        )
    }

    #[test]
    fn collision_distance_never_below_radius() {
        let mut body = earth();
        body.set_scale(50.0, 1.0);
        assert_eq!(body.collision_distance(CollisionDistance::Surface, 0.25), body.radius);
        assert!(body.collision_distance(CollisionDistance::Approach, 0.25) > body.radius);
        assert_eq!(body.collision_distance(CollisionDistance::Approach, -3.0), body.radius);
    }

    #[test]
    fn scale_follows_size_factor() {
        let mut body = earth();
        body.set_scale(1.0, 1.0);
        let r1 = body.radius;
        body.set_scale(10.0, 1.0);
        assert!((body.radius - 10.0 * r1).abs() < 1e-15);
        assert!((r1 - 6371.0 / KM_PER_AU).abs() < 1e-15);
    }

    #[test]
    fn spin_wraps() {
        let mut body = earth();
        body.spin(30.0);
        assert!((body.rotation - (TAU * 30.0 / 24.0 - TAU)).abs() < 1e-9);
        assert!(body.rotation >= 0.0 && body.rotation < TAU);
    }

    #[test]
    fn retrograde_spin_stays_in_range() {
        let mut body = Body::new(
            BodyId(2),
            BodyDesc::new("venus", BodyCategory::Planet, 6051.8).with_rotation_period(-5832.5),
        );
        body.spin(1.0);
        assert!(body.rotation > 0.0 && body.rotation < TAU);
    }

    #[test]
    fn builder_sets_motion() {
        let desc = BodyDesc::new("moon", BodyCategory::Moon, 1737.4)
            .with_satellite_orbit("earth", 384_400.0, 27.321661, 5.145);
        assert!(desc.ephemeris_key().is_none());
        assert!(matches!(desc.motion, BodyMotion::Satellite { ref parent, .. } if parent == "earth"));
    }
}
