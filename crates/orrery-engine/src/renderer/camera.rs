use glam::{DMat3, DQuat, DVec3};

/// Perspective camera in the ecliptic scene frame (Z up).
/// Looks down its local -Z axis, local +Y is screen-up.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera3D {
    pub position: DVec3,
    pub orientation: DQuat,
    /// World up used by `look_at`.
    pub up: DVec3,
    /// Vertical field of view in degrees.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera3D {
    pub fn new(position: DVec3, fov: f32) -> Self {
        Self {
            position,
            orientation: DQuat::IDENTITY,
            up: DVec3::Z,
            fov,
            near: 1e-7,
            far: 1e3,
        }
    }

    /// Direction the camera is looking in world space.
    pub fn forward(&self) -> DVec3 {
        self.orientation * DVec3::NEG_Z
    }

    pub fn right(&self) -> DVec3 {
        self.orientation * DVec3::X
    }

    pub fn local_up(&self) -> DVec3 {
        self.orientation * DVec3::Y
    }

    /// Move by a vector expressed in camera-local axes.
    pub fn translate_local(&mut self, local: DVec3) {
        self.position += self.orientation * local;
    }

    /// Rotate about a camera-local axis.
    pub fn rotate_local(&mut self, axis: DVec3, angle: f64) {
        self.orientation = (self.orientation * DQuat::from_axis_angle(axis, angle)).normalize();
    }

    pub fn look_at(&mut self, target: DVec3) {
        self.orientation = look_rotation(self.position, target, self.up);
    }
}

/// Orientation of an eye at `eye` looking at `target`, keeping `up` as close
/// to screen-up as possible. Falls back to another up axis when looking
/// straight along `up`.
pub fn look_rotation(eye: DVec3, target: DVec3, up: DVec3) -> DQuat {
    let z = (eye - target).normalize_or_zero();
    if z == DVec3::ZERO {
        return DQuat::IDENTITY;
    }
    let mut x = up.cross(z);
    if x.length_squared() < 1e-20 {
        x = if up.y.abs() < 0.9 { DVec3::Y } else { DVec3::X }.cross(z);
    }
    let x = x.normalize();
    let y = z.cross(x);
    DQuat::from_mat3(&DMat3::from_cols(x, y, z)).normalize()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_vec_close(a: DVec3, b: DVec3) {
        assert!(a.distance(b) < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn look_at_points_forward_at_target() {
        let mut cam = Camera3D::new(DVec3::new(0.0, -3.0, 1.0), 45.0);
        cam.look_at(DVec3::ZERO);
        assert_vec_close(cam.forward(), (DVec3::ZERO - cam.position).normalize());
        // Z-up: the camera's right vector stays in the ecliptic plane.
        assert!(cam.right().z.abs() < 1e-9);
    }

    #[test]
    fn look_straight_down_is_defined() {
        let q = look_rotation(DVec3::new(0.0, 0.0, 5.0), DVec3::ZERO, DVec3::Z);
        assert_vec_close(q * DVec3::NEG_Z, DVec3::NEG_Z);
    }

    #[test]
    fn translate_local_uses_orientation() {
        let mut cam = Camera3D::new(DVec3::ZERO, 45.0);
        cam.look_at(DVec3::new(10.0, 0.0, 0.0));
        cam.translate_local(DVec3::new(0.0, 0.0, -2.0));
        assert_vec_close(cam.position, DVec3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn rotate_local_roll_keeps_forward() {
        let mut cam = Camera3D::new(DVec3::ZERO, 45.0);
        cam.look_at(DVec3::new(0.0, 1.0, 0.0));
        let before = cam.forward();
        cam.rotate_local(DVec3::Z, 0.7);
        assert_vec_close(cam.forward(), before);
    }
}
