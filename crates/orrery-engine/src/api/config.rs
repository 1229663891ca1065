use serde::{Deserialize, Serialize};

use crate::api::types::ModeName;
use crate::ephemeris::kepler::J2000;

/// Tunables for one flight session. Every field has a default, so a JSON
/// document only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Fixed inter-frame delay in seconds (default: 1/60).
    pub frame_delay: f64,
    /// Day number the clock starts at.
    pub epoch_day_number: f64,
    /// Records per ephemeris batch request.
    pub batch_size: u32,
    /// Days between consecutive records in a batch.
    pub batch_step: f64,
    /// Tolerance for grazing ray hits. Needs to be far tighter than a generic
    /// raycaster default at solar-system scale.
    pub ray_precision: f64,
    /// Approach distance = scaled radius × (1 + ratio).
    pub approach_buffer_ratio: f64,
    /// Auto-pilot forward speed, in proximity units per second.
    pub auto_forward_speed: f64,
    /// Slerp parameter increment per auto-pilot pan frame.
    pub slerp_increment: f64,
    /// Vertex cap per orbit path.
    pub orbit_path_samples: usize,
    /// Body slots reserved in the shared scene buffer.
    pub max_bodies: usize,
    /// Multiplier from AU to scene units.
    pub position_scale: f64,
    /// Size factor used when the size-scale setting is "large".
    pub large_size_factor: f64,
    /// Keyboard translation speed before the user multiplier.
    pub keyboard_base_speed: f64,
    /// Keyboard roll rate in radians per second.
    pub roll_speed: f64,
    /// Radians of look rotation per pointer pixel before the user multiplier.
    pub look_base_sensitivity: f64,
    pub camera_position: [f64; 3],
    pub camera_target: [f64; 3],
    /// Vertical field of view in degrees.
    pub camera_fov: f32,
    /// Mode entered once startup completes.
    pub initial_mode: ModeName,
    /// Switch to orbit controls around the target after a fly-to arrives.
    pub orbit_after_arrival: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            frame_delay: 1.0 / 60.0,
            epoch_day_number: J2000,
            batch_size: 4000,
            batch_step: 1.0,
            ray_precision: 1e-6,
            approach_buffer_ratio: 0.25,
            auto_forward_speed: 1.0,
            slerp_increment: 0.05,
            orbit_path_samples: 360,
            max_bodies: 32,
            position_scale: 1.0,
            large_size_factor: 50.0,
            keyboard_base_speed: 0.5,
            roll_speed: 1.0,
            look_base_sensitivity: 0.002,
            camera_position: [0.0, -2.5, 0.8],
            camera_target: [0.0, 0.0, 0.0],
            camera_fov: 45.0,
            initial_mode: ModeName::Menu,
            orbit_after_arrival: true,
        }
    }
}

impl SessionConfig {
    /// Parse a config from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_keeps_defaults() {
        let config = SessionConfig::from_json(r#"{ "batch_size": 16, "initial_mode": "orbit" }"#).unwrap();
        assert_eq!(config.batch_size, 16);
        assert_eq!(config.initial_mode, ModeName::Orbit);
        assert_eq!(config.ray_precision, 1e-6);
        assert_eq!(config.epoch_day_number, J2000);
    }

    #[test]
    fn bad_json_is_an_error() {
        assert!(SessionConfig::from_json("{ batch_size: }").is_err());
    }
}
