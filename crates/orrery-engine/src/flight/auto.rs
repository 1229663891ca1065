use glam::{DQuat, DVec3};

use crate::api::types::{BodyId, ManeuverId, Notice, SessionEvent};
use crate::collision::oracle::CollisionDistance;
use crate::core::world::World;
use crate::flight::speed::proximity_multiplier;
use crate::flight::FrameOutcome;
use crate::renderer::camera::{look_rotation, Camera3D};

/// Where a fly-to maneuver currently is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase {
    /// Turning toward the target; `t` runs 0 → 1.
    Pan { t: f64, from: DQuat, to: DQuat },
    /// Moving along the view axis until the surface is reached.
    Translate,
    Arrived,
}

/// A scripted flight to one body: pan to face it, then translate forward
/// until the camera reaches its surface.
#[derive(Debug, Clone)]
pub struct AutoPilot {
    pub id: ManeuverId,
    pub target: BodyId,
    pub name: String,
    phase: Phase,
    slerp_increment: f64,
}

impl AutoPilot {
    /// The pan ends facing `target_position` from where the camera is now.
    pub fn new(
        id: ManeuverId,
        target: BodyId,
        name: impl Into<String>,
        camera: &Camera3D,
        target_position: DVec3,
        slerp_increment: f64,
    ) -> Self {
        Self {
            id,
            target,
            name: name.into(),
            phase: Phase::Pan {
                t: 0.0,
                from: camera.orientation,
                to: look_rotation(camera.position, target_position, camera.up),
            },
            slerp_increment,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_finished(&self) -> bool {
        self.phase == Phase::Arrived
    }

    /// Simulated time stops for the whole maneuver.
    pub fn enable(&mut self, world: &mut World) {
        world.set_speed(0.0);
        world.set_notice(Notice::looking_at(&self.name));
    }

    /// Leaving before arrival cancels the maneuver.
    pub fn disable(&mut self, world: &mut World) {
        if self.is_finished() {
            return;
        }
        log::info!("auto-pilot: maneuver {} to {} cancelled", self.id.generation, self.name);
        self.phase = Phase::Arrived;
        world.clear_notice();
        world.emit(SessionEvent::ManeuverCancelled {
            id: self.id,
            body: self.name.clone(),
        });
    }

    pub fn animation_frame(&mut self, world: &mut World, delta: f64) -> FrameOutcome {
        match self.phase {
            Phase::Pan { t, from, to } => {
                let mut t = t + self.slerp_increment;
                if t > 1.0 && t < 1.0 + self.slerp_increment {
                    t = 1.0;
                }
                let t = t.min(1.0);
                world.camera.orientation = from.slerp(to, t).normalize();
                world.update_dependents();

                if t >= 1.0 {
                    self.phase = Phase::Translate;
                    world.set_notice(Notice::flying_to(&self.name));
                } else {
                    self.phase = Phase::Pan { t, from, to };
                }
                FrameOutcome::proceed(0.0)
            }
            Phase::Translate => self.translate(world, delta),
            Phase::Arrived => FrameOutcome::stop(),
        }
    }

    fn translate(&mut self, world: &mut World, delta: f64) -> FrameOutcome {
        let Some(body) = world.registry.get(self.target) else {
            log::warn!("auto-pilot: target {} is gone", self.name);
            self.phase = Phase::Arrived;
            world.clear_notice();
            return FrameOutcome::stop();
        };
        let bodies = [body];
        let camera = &world.camera;

        if world.oracle.will_collide(
            camera.position,
            camera.orientation,
            DVec3::NEG_Z,
            &bodies,
            CollisionDistance::Surface,
        ) {
            self.phase = Phase::Arrived;
            log::info!("auto-pilot: arrived at {}", self.name);
            world.clear_notice();
            world.emit(SessionEvent::ManeuverFinished {
                id: self.id,
                body: self.name.clone(),
            });
            return FrameOutcome::stop();
        }

        let distance = world.config.auto_forward_speed * delta * proximity_multiplier(camera.position, &bodies);
        world.camera.translate_local(DVec3::new(0.0, 0.0, -distance));
        world.update_dependents();
        FrameOutcome::proceed(if delta > 0.0 { distance / delta } else { 0.0 })
    }
}
