use glam::DVec3;

use crate::components::body::Body;

/// Distance from the camera to the nearest of `bodies`, used to scale raw
/// translation speed: slow near bodies, fast in open space. 1.0 when there
/// is nothing to measure against.
pub fn proximity_multiplier(camera: DVec3, bodies: &[&Body]) -> f64 {
    bodies
        .iter()
        .map(|b| b.position.distance(camera))
        .min_by(f64::total_cmp)
        .unwrap_or(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::BodyId;
    use crate::components::body::{BodyCategory, BodyDesc};

    fn at(id: u32, p: DVec3) -> Body {
        let mut b = Body::new(BodyId(id), BodyDesc::new(format!("b{id}"), BodyCategory::Planet, 1.0));
        b.position = p;
        b
    }

    #[test]
    fn nearest_body_wins() {
        let a = at(0, DVec3::new(5.0, 0.0, 0.0));
        let b = at(1, DVec3::new(0.0, -2.0, 0.0));
        assert_eq!(proximity_multiplier(DVec3::ZERO, &[&a, &b]), 2.0);
        assert_eq!(proximity_multiplier(DVec3::ZERO, &[&a]), 5.0);
    }

    #[test]
    fn empty_set_is_neutral() {
        assert_eq!(proximity_multiplier(DVec3::ONE, &[]), 1.0);
    }
}
