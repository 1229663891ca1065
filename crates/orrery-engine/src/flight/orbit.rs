use std::f64::consts::PI;

use glam::DVec3;

use crate::renderer::camera::Camera3D;

/// Keeps the polar angle off the poles so `look_at` stays well defined.
const POLAR_EPSILON: f64 = 1e-6;

/// Orbit-style camera controls around a target point (Z up).
///
/// Drag rotates about the target, the wheel dollies in and out, and a
/// secondary-button drag pans the target in the view plane.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    pub enabled: bool,
    pub target: DVec3,
    /// Radians per pointer pixel.
    pub rotate_speed: f64,
    /// Distance ratio per wheel notch.
    pub zoom_speed: f64,
    /// View-plane distance per pixel, relative to the current radius.
    pub pan_speed: f64,
    pub min_distance: f64,
    pub max_distance: f64,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            enabled: false,
            target: DVec3::ZERO,
            rotate_speed: 0.005,
            zoom_speed: 0.1,
            pan_speed: 0.001,
            min_distance: 1e-6,
            max_distance: 200.0,
        }
    }
}

impl OrbitControls {
    pub fn new(target: DVec3) -> Self {
        Self {
            target,
            ..Self::default()
        }
    }

    /// Orbit `dx` pixels around the pole and `dy` pixels toward it.
    pub fn rotate(&self, camera: &mut Camera3D, dx: f64, dy: f64) {
        let offset = camera.position - self.target;
        let radius = offset.length();
        if radius == 0.0 {
            return;
        }
        let azimuth = offset.y.atan2(offset.x) - dx * self.rotate_speed;
        let polar = ((offset.z / radius).clamp(-1.0, 1.0).acos() - dy * self.rotate_speed)
            .clamp(POLAR_EPSILON, PI - POLAR_EPSILON);
        camera.position = self.target + spherical(radius, polar, azimuth);
        camera.look_at(self.target);
    }

    /// Positive `notches` move away from the target.
    pub fn dolly(&self, camera: &mut Camera3D, notches: f64) {
        let offset = camera.position - self.target;
        let radius = offset.length();
        if radius == 0.0 || notches == 0.0 {
            return;
        }
        let scaled = (radius * (1.0 + self.zoom_speed).powf(notches))
            .clamp(self.min_distance, self.max_distance);
        camera.position = self.target + offset * (scaled / radius);
        camera.look_at(self.target);
    }

    /// Slide target and camera together across the view plane.
    pub fn pan(&mut self, camera: &mut Camera3D, dx: f64, dy: f64) {
        let radius = (camera.position - self.target).length();
        let shift = (camera.right() * -dx + camera.local_up() * dy) * self.pan_speed * radius;
        self.target += shift;
        camera.position += shift;
    }

    /// Aim at a new target, pulling the camera in or out to respect the
    /// distance limits.
    pub fn retarget(&mut self, camera: &mut Camera3D, target: DVec3, min_distance: f64) {
        self.target = target;
        self.min_distance = min_distance;
        let offset = camera.position - target;
        let radius = offset.length();
        if radius < min_distance {
            let dir = if radius > 0.0 { offset / radius } else { -camera.forward() };
            camera.position = target + dir * min_distance;
        }
        camera.look_at(target);
    }

    /// Apply one frame of pointer input: primary drag rotates, secondary
    /// drag pans, the wheel dollies.
    pub fn update(&mut self, camera: &mut Camera3D, rotating: bool, panning: bool, dx: f64, dy: f64, wheel: f64) {
        if !self.enabled {
            return;
        }
        if rotating {
            self.rotate(camera, dx, dy);
        } else if panning {
            self.pan(camera, dx, dy);
        }
        if wheel != 0.0 {
            self.dolly(camera, wheel.signum());
        }
    }
}

fn spherical(radius: f64, polar: f64, azimuth: f64) -> DVec3 {
    let (sp, cp) = polar.sin_cos();
    let (sa, ca) = azimuth.sin_cos();
    DVec3::new(radius * sp * ca, radius * sp * sa, radius * cp)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (OrbitControls, Camera3D) {
        let mut controls = OrbitControls::new(DVec3::ZERO);
        controls.enabled = true;
        let mut cam = Camera3D::new(DVec3::new(2.0, 0.0, 0.0), 45.0);
        cam.look_at(DVec3::ZERO);
        (controls, cam)
    }

    #[test]
    fn rotate_keeps_radius_and_faces_target() {
        let (controls, mut cam) = setup();
        controls.rotate(&mut cam, 100.0, 40.0);
        assert!((cam.position.length() - 2.0).abs() < 1e-9);
        assert!(cam.forward().distance(-cam.position.normalize()) < 1e-9);
    }

    #[test]
    fn polar_angle_is_clamped() {
        let (controls, mut cam) = setup();
        controls.rotate(&mut cam, 0.0, 1e6);
        assert!(cam.position.z < 2.0 && cam.position.z > 1.99);
        assert!(cam.position.truncate().length() > 0.0);
    }

    #[test]
    fn dolly_respects_limits() {
        let (mut controls, mut cam) = setup();
        controls.min_distance = 1.5;
        for _ in 0..20 {
            controls.dolly(&mut cam, -1.0);
        }
        assert!((cam.position.length() - 1.5).abs() < 1e-9);
        controls.dolly(&mut cam, 1.0);
        assert!((cam.position.length() - 1.65).abs() < 1e-9);
    }

    #[test]
    fn pan_moves_target_with_camera() {
        let (mut controls, mut cam) = setup();
        let before = cam.position - controls.target;
        controls.pan(&mut cam, 10.0, 0.0);
        assert!(controls.target.length() > 0.0);
        assert!((cam.position - controls.target).distance(before) < 1e-12);
    }

    #[test]
    fn disabled_controls_ignore_input() {
        let (mut controls, mut cam) = setup();
        controls.enabled = false;
        let before = cam.clone();
        controls.update(&mut cam, true, false, 50.0, 50.0, 1.0);
        assert_eq!(cam, before);
    }

    #[test]
    fn retarget_pushes_camera_out_of_minimum() {
        let (mut controls, mut cam) = setup();
        controls.retarget(&mut cam, DVec3::new(1.9, 0.0, 0.0), 0.5);
        assert!((cam.position.distance(controls.target) - 0.5).abs() < 1e-9);
    }
}
