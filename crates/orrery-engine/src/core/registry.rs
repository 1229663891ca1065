use std::f64::consts::TAU;

use glam::{DQuat, DVec3};

use crate::api::error::SessionError;
use crate::api::types::BodyId;
use crate::components::body::{Body, BodyDesc, BodyMotion, KM_PER_AU};
use crate::components::orbit_path::OrbitPath;
use crate::ephemeris::kepler::J2000;
use crate::ephemeris::EphemerisSource;

/// Distance from a reference point to one body.
#[derive(Debug, Clone, PartialEq)]
pub struct BodyDistance {
    pub id: BodyId,
    pub name: String,
    pub distance: f64,
}

/// The fixed body set, stored in insertion order.
/// Small (a dozen bodies), so lookups are linear scans.
#[derive(Debug, Default)]
pub struct BodyRegistry {
    bodies: Vec<Body>,
}

impl BodyRegistry {
    pub fn new() -> Self {
        Self {
            bodies: Vec::with_capacity(16),
        }
    }

    /// Add a body. Names must be unique and radii positive.
    pub fn insert(&mut self, desc: BodyDesc) -> Result<BodyId, SessionError> {
        if !(desc.radius_km > 0.0) {
            return Err(SessionError::InvalidRadius {
                name: desc.name,
                radius_km: desc.radius_km,
            });
        }
        if self.find(&desc.name).is_some() {
            return Err(SessionError::DuplicateBody(desc.name));
        }
        let id = BodyId(self.bodies.len() as u32);
        self.bodies.push(Body::new(id, desc));
        Ok(id)
    }

    /// Give every body with an orbital period a path of `max_samples`.
    pub fn attach_orbit_paths(&mut self, max_samples: usize) {
        for body in self.bodies.iter_mut() {
            if let (Some(period), Some(_)) = (body.desc.orbital_period_days, body.desc.ephemeris_key()) {
                body.orbit = Some(OrbitPath::new(period, max_samples));
            }
        }
    }

    pub fn get(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.0 as usize)
    }

    pub fn get_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id.0 as usize)
    }

    /// Lookup without logging, for existence checks.
    pub fn find(&self, name: &str) -> Option<&Body> {
        self.bodies.iter().find(|b| b.name() == name)
    }

    /// Lookup by name. A miss is a caller bug and is logged.
    pub fn get_by_name(&self, name: &str) -> Option<&Body> {
        let found = self.find(name);
        if found.is_none() {
            log::warn!("registry: no body named {:?}", name);
        }
        found
    }

    /// Bodies in insertion order.
    pub fn as_slice(&self) -> &[Body] {
        &self.bodies
    }

    pub fn iter(&self) -> impl Iterator<Item = &Body> {
        self.bodies.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Body> {
        self.bodies.iter_mut()
    }

    pub fn collideable(&self) -> Vec<&Body> {
        self.bodies.iter().filter(|b| b.is_collideable()).collect()
    }

    pub fn len(&self) -> usize {
        self.bodies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bodies.is_empty()
    }

    /// Ascending by distance; ties keep insertion order.
    pub fn distances_to(&self, point: DVec3) -> Vec<BodyDistance> {
        let mut out: Vec<BodyDistance> = self
            .bodies
            .iter()
            .map(|b| BodyDistance {
                id: b.id,
                name: b.name().to_string(),
                distance: b.position.distance(point),
            })
            .collect();
        out.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        out
    }

    /// Rescale every body's radius.
    pub fn set_scale(&mut self, size_factor: f64, position_scale: f64) {
        for body in self.bodies.iter_mut() {
            body.set_scale(size_factor, position_scale);
        }
    }

    /// Move ephemeris-driven bodies to their positions at `day_number`, then
    /// place satellites around their (already moved) parents. Fixed bodies
    /// are skipped, and so is any body the source cannot place.
    pub fn translate_all(
        &mut self,
        day_number: f64,
        source: &dyn EphemerisSource,
        position_scale: f64,
        size_factor: f64,
    ) {
        for body in self.bodies.iter_mut() {
            if let BodyMotion::Ephemeris { key } = &body.desc.motion {
                match source.position(key, day_number) {
                    Some(p) => body.position = p * position_scale,
                    None => log::debug!("registry: no position for {} at {}", key, day_number),
                }
            }
        }

        for idx in 0..self.bodies.len() {
            let BodyMotion::Satellite {
                parent,
                orbit_radius_km,
                period_days,
                phase_deg,
                inclination_deg,
            } = &self.bodies[idx].desc.motion
            else {
                continue;
            };
            let Some(parent_pos) = self.find(parent).map(|p| p.position) else {
                log::warn!("registry: satellite {} has no parent {:?}", self.bodies[idx].name(), parent);
                continue;
            };
            let angle = phase_deg.to_radians() + TAU * (day_number - J2000) / period_days;
            let tilt = DQuat::from_rotation_x(inclination_deg.to_radians());
            let offset = tilt * DVec3::new(angle.cos(), angle.sin(), 0.0)
                * (orbit_radius_km / KM_PER_AU * size_factor * position_scale);
            self.bodies[idx].position = parent_pos + offset;
        }
    }

    /// Advance every body's spin by `delta` seconds.
    pub fn rotate_all(&mut self, delta: f64) {
        for body in self.bodies.iter_mut() {
            body.spin(delta);
        }
    }

    /// Camera-dependent state: label visibility and draw order, plus orbit
    /// paths whose refresh threshold has passed. Bodies do not move.
    pub fn update_dependents(
        &mut self,
        camera: DVec3,
        labels_enabled: bool,
        day_number: f64,
        path_source: &dyn EphemerisSource,
        position_scale: f64,
    ) {
        let ranked = self.distances_to(camera);
        for (rank, entry) in ranked.iter().enumerate() {
            let body = &mut self.bodies[entry.id.0 as usize];
            body.label.order = rank as u32;
            body.label.visible =
                labels_enabled && entry.distance <= body.desc.label_distance * position_scale;
        }

        for body in self.bodies.iter_mut() {
            let Some(key) = body.desc.ephemeris_key() else { continue };
            let Some(path) = body.orbit.as_mut() else { continue };
            if path.needs_refresh(day_number) {
                path.resample(day_number, key, path_source, position_scale);
            }
        }
    }
}
