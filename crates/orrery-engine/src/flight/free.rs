use glam::DVec3;

use crate::collision::oracle::CollisionDistance;
use crate::core::world::World;
use crate::flight::speed::proximity_multiplier;
use crate::flight::FrameOutcome;

/// One pointer-lock frame: mouse look, keyboard roll, then keyboard
/// translation scaled by proximity and vetoed by the collision oracle.
pub fn animation_frame(world: &mut World, delta: f64) -> FrameOutcome {
    let (dx, dy, _) = world.pointer.take_motion();
    let sensitivity = world.config.look_base_sensitivity * world.settings.look_sensitivity;
    if dx != 0.0 {
        world.camera.rotate_local(DVec3::Y, -dx * sensitivity);
    }
    if dy != 0.0 {
        world.camera.rotate_local(DVec3::X, -dy * sensitivity);
    }
    let roll = world.keys.roll();
    if roll != 0.0 {
        world.camera.rotate_local(DVec3::Z, roll * world.config.roll_speed * delta);
    }

    let speed = fly(world, delta);
    world.update_space_time(delta);
    FrameOutcome::proceed(speed)
}

fn fly(world: &mut World, delta: f64) -> f64 {
    let direction = world.keys.translation();
    if direction == DVec3::ZERO || delta <= 0.0 {
        return 0.0;
    }

    let bodies = world.registry.collideable();
    let camera = &world.camera;
    let step = direction.normalize()
        * world.config.keyboard_base_speed
        * world.settings.keyboard_speed
        * proximity_multiplier(camera.position, &bodies)
        * delta;

    if world.oracle.will_collide(
        camera.position,
        camera.orientation,
        step,
        &bodies,
        CollisionDistance::Approach,
    ) {
        log::debug!("free flight: move blocked");
        return 0.0;
    }
    world.camera.translate_local(step);
    step.length() / delta
}
