//! Flight modes and the state machine that keeps exactly one of them active.
//!
//! Every mode has an enable step, a disable step and a per-frame step. A
//! transition always runs the old mode's disable before the new mode's
//! enable, and bumps the generation so stale work can be recognised.

pub mod auto;
pub mod free;
pub mod orbit;
pub mod speed;

use crate::api::error::SessionError;
use crate::api::types::{BodyId, ManeuverId, ModeName, SessionEvent};
use crate::core::world::World;

use self::auto::AutoPilot;

/// What one mode frame produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameOutcome {
    /// False ends the loop until the next mode change.
    pub proceed: bool,
    /// Camera speed in scene units per second.
    pub speed: f64,
}

impl FrameOutcome {
    pub fn proceed(speed: f64) -> Self {
        Self { proceed: true, speed }
    }

    pub fn stop() -> Self {
        Self { proceed: false, speed: 0.0 }
    }
}

#[derive(Debug, Clone)]
pub enum FlightMode {
    /// Overlay shown; remembers whether the clock was running.
    Menu { resume_clock: bool },
    Orbit,
    PointerLock,
    Auto(AutoPilot),
}

impl FlightMode {
    pub fn name(&self) -> ModeName {
        match self {
            FlightMode::Menu { .. } => ModeName::Menu,
            FlightMode::Orbit => ModeName::Orbit,
            FlightMode::PointerLock => ModeName::PointerLock,
            FlightMode::Auto(_) => ModeName::Auto,
        }
    }

    fn enable(&mut self, world: &mut World) {
        match self {
            FlightMode::Menu { resume_clock } => {
                *resume_clock = world.clock.is_on();
                world.clock.pause();
                world.emit(SessionEvent::OverlayShown);
            }
            FlightMode::Orbit => {
                let target = match world.orbit_follow.and_then(|id| world.registry.get(id)) {
                    Some(body) => body.position,
                    None => world.orbit_controls.target,
                };
                let min_distance = world.orbit_controls.min_distance;
                world.orbit_controls.enabled = true;
                world.orbit_controls.retarget(&mut world.camera, target, min_distance);
            }
            FlightMode::PointerLock => {
                world.keys.clear();
                world.pointer.clear();
                world.emit(SessionEvent::PointerLockRequested);
            }
            FlightMode::Auto(pilot) => pilot.enable(world),
        }
    }

    fn disable(&mut self, world: &mut World) {
        match self {
            FlightMode::Menu { resume_clock } => {
                if *resume_clock {
                    world.clock.resume();
                }
                world.emit(SessionEvent::OverlayHidden);
            }
            FlightMode::Orbit => {
                world.orbit_controls.enabled = false;
                world.pointer.clear();
            }
            FlightMode::PointerLock => {
                world.keys.clear();
                world.pointer.clear();
                world.emit(SessionEvent::PointerLockReleased);
            }
            FlightMode::Auto(pilot) => pilot.disable(world),
        }
    }

    fn animation_frame(&mut self, world: &mut World, delta: f64) -> FrameOutcome {
        match self {
            FlightMode::Menu { .. } => FrameOutcome::stop(),
            FlightMode::Orbit => orbit_frame(world, delta),
            FlightMode::PointerLock => free::animation_frame(world, delta),
            FlightMode::Auto(pilot) => pilot.animation_frame(world, delta),
        }
    }
}

fn orbit_frame(world: &mut World, delta: f64) -> FrameOutcome {
    let before = world.camera.position;
    let (dx, dy, wheel) = world.pointer.take_motion();
    let rotating = world.pointer.is_held(0);
    let panning = world.pointer.is_held(2);
    world
        .orbit_controls
        .update(&mut world.camera, rotating, panning, dx, dy, wheel);

    world.update_space_time(delta);

    // Carry the camera along with a followed body.
    if let Some(position) = world.orbit_follow.and_then(|id| world.registry.get(id)).map(|b| b.position) {
        let shift = position - world.orbit_controls.target;
        if shift != glam::DVec3::ZERO {
            world.orbit_controls.target = position;
            world.camera.position += shift;
            world.update_dependents();
        }
    }

    let moved = world.camera.position.distance(before);
    FrameOutcome::proceed(if delta > 0.0 { moved / delta } else { 0.0 })
}

/// The mode state machine. Holds the active mode; the session owns the
/// world it operates on.
#[derive(Debug, Default)]
pub struct FlightModes {
    current: Option<FlightMode>,
    generation: u64,
    speed: f64,
}

impl FlightModes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<ModeName> {
        self.current.as_ref().map(FlightMode::name)
    }

    pub fn is_enabled(&self, name: ModeName) -> bool {
        self.current() == Some(name)
    }

    /// Incremented on every transition.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Camera speed reported by the last frame.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// The maneuver in progress, if the auto-pilot is active.
    pub fn maneuver(&self) -> Option<&AutoPilot> {
        match &self.current {
            Some(FlightMode::Auto(pilot)) => Some(pilot),
            _ => None,
        }
    }

    /// Switch to `name`. Requesting the active mode does nothing; the
    /// auto-pilot can only be entered through [`fly_to`](Self::fly_to).
    /// Returns whether a transition happened.
    pub fn set_mode(&mut self, name: ModeName, world: &mut World) -> bool {
        if self.current() == Some(name) {
            return false;
        }
        let next = match name {
            ModeName::Menu => FlightMode::Menu { resume_clock: false },
            ModeName::Orbit => FlightMode::Orbit,
            ModeName::PointerLock => FlightMode::PointerLock,
            ModeName::Auto => {
                log::warn!("flight: auto mode needs a target, use fly_to");
                return false;
            }
        };
        if name != ModeName::Orbit {
            world.orbit_follow = None;
        }
        self.transition(next, world);
        true
    }

    /// Start a fly-to toward `body`, replacing whatever mode is active,
    /// including a maneuver already in progress.
    pub fn fly_to(&mut self, body: &str, world: &mut World) -> Result<ManeuverId, SessionError> {
        let target = world
            .registry
            .find(body)
            .ok_or_else(|| SessionError::UnknownBody(body.to_string()))?;
        let id = ManeuverId {
            generation: self.generation + 1,
        };
        let pilot = AutoPilot::new(
            id,
            target.id,
            target.name(),
            &world.camera,
            target.position,
            world.config.slerp_increment,
        );
        log::info!("flight: maneuver {} to {}", id.generation, body);
        world.orbit_follow = None;
        self.transition(FlightMode::Auto(pilot), world);
        Ok(id)
    }

    /// Orbit around `body`, following it as it moves.
    pub fn orbit_body(&mut self, id: BodyId, world: &mut World) -> bool {
        let Some(body) = world.registry.get(id) else {
            return false;
        };
        let (target, min_distance) = (body.position, body.radius);
        world.orbit_follow = Some(id);
        world.orbit_controls.target = target;
        world.orbit_controls.min_distance = min_distance;
        if self.is_enabled(ModeName::Orbit) {
            world.orbit_controls.retarget(&mut world.camera, target, min_distance);
            return false;
        }
        self.transition(FlightMode::Orbit, world);
        true
    }

    fn transition(&mut self, mut next: FlightMode, world: &mut World) {
        let from = self.current();
        if let Some(mut previous) = self.current.take() {
            previous.disable(world);
        }
        self.generation += 1;
        next.enable(world);

        let to = next.name();
        log::info!(
            "flight: mode {} -> {} (generation {})",
            from.map_or("none", ModeName::as_str),
            to,
            self.generation
        );
        world.emit(SessionEvent::ModeChanged { from, to });
        self.current = Some(next);
        self.speed = 0.0;
    }

    /// Run one frame of the active mode. False stops the loop.
    pub fn animation_frame(&mut self, world: &mut World, delta: f64) -> bool {
        let Some(mode) = self.current.as_mut() else {
            return false;
        };
        let outcome = mode.animation_frame(world, delta);
        self.speed = outcome.speed;
        outcome.proceed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::SessionConfig;
    use crate::components::catalogue::solar_system;
    use crate::ephemeris::loader::KeplerLoader;
    use crate::settings::Settings;

    fn world() -> World {
        let config = SessionConfig {
            orbit_path_samples: 8,
            ..SessionConfig::default()
        };
        let mut world = World::new(config, Settings::default(), Box::new(KeplerLoader::new()));
        let day = world.clock.day_number();
        world.ephemeris.request_batch(day);
        world.ephemeris.poll();
        world.populate(solar_system()).unwrap();
        world
    }

    fn mode_changes(world: &mut World) -> Vec<(Option<ModeName>, ModeName)> {
        world
            .drain_events()
            .into_iter()
            .filter_map(|e| match e {
                SessionEvent::ModeChanged { from, to } => Some((from, to)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn exactly_one_mode_after_each_transition() {
        let mut world = world();
        let mut modes = FlightModes::new();
        assert_eq!(modes.current(), None);

        for name in [ModeName::Orbit, ModeName::PointerLock, ModeName::Menu, ModeName::Orbit] {
            assert!(modes.set_mode(name, &mut world));
            assert_eq!(modes.current(), Some(name));
            for other in [ModeName::Menu, ModeName::Orbit, ModeName::PointerLock, ModeName::Auto] {
                assert_eq!(modes.is_enabled(other), other == name);
            }
        }
        assert_eq!(modes.generation(), 4);
        assert_eq!(
            mode_changes(&mut world),
            vec![
                (None, ModeName::Orbit),
                (Some(ModeName::Orbit), ModeName::PointerLock),
                (Some(ModeName::PointerLock), ModeName::Menu),
                (Some(ModeName::Menu), ModeName::Orbit),
            ]
        );
    }

    #[test]
    fn same_mode_is_a_no_op() {
        let mut world = world();
        let mut modes = FlightModes::new();
        modes.set_mode(ModeName::PointerLock, &mut world);
        world.drain_events();

        assert!(!modes.set_mode(ModeName::PointerLock, &mut world));
        assert_eq!(modes.generation(), 1);
        assert!(world.drain_events().is_empty());
    }

    #[test]
    fn disable_runs_before_enable() {
        let mut world = world();
        let mut modes = FlightModes::new();
        modes.set_mode(ModeName::PointerLock, &mut world);
        world.drain_events();
        modes.set_mode(ModeName::Menu, &mut world);
        assert_eq!(
            world.drain_events(),
            vec![
                SessionEvent::PointerLockReleased,
                SessionEvent::OverlayShown,
                SessionEvent::ModeChanged {
                    from: Some(ModeName::PointerLock),
                    to: ModeName::Menu,
                },
            ]
        );
    }

    #[test]
    fn menu_pauses_and_restores_the_clock() {
        let mut world = world();
        let mut modes = FlightModes::new();
        assert!(world.clock.is_on());

        modes.set_mode(ModeName::Menu, &mut world);
        assert!(!world.clock.is_on());
        assert!(!modes.animation_frame(&mut world, 1.0 / 60.0));

        modes.set_mode(ModeName::Orbit, &mut world);
        assert!(world.clock.is_on());
    }

    #[test]
    fn menu_leaves_a_stopped_clock_stopped() {
        let mut world = world();
        world.set_speed(0.0);
        let mut modes = FlightModes::new();
        modes.set_mode(ModeName::Menu, &mut world);
        modes.set_mode(ModeName::Orbit, &mut world);
        assert!(!world.clock.is_on());
    }

    #[test]
    fn auto_requires_fly_to() {
        let mut world = world();
        let mut modes = FlightModes::new();
        assert!(!modes.set_mode(ModeName::Auto, &mut world));
        assert_eq!(modes.current(), None);

        let id = modes.fly_to("mars", &mut world).unwrap();
        assert_eq!(id.generation, modes.generation());
        assert!(modes.is_enabled(ModeName::Auto));
        assert_eq!(modes.maneuver().map(|p| p.name.as_str()), Some("mars"));
    }

    #[test]
    fn unknown_body_leaves_mode_untouched() {
        let mut world = world();
        let mut modes = FlightModes::new();
        modes.set_mode(ModeName::Orbit, &mut world);
        assert_eq!(
            modes.fly_to("vulcan", &mut world),
            Err(SessionError::UnknownBody("vulcan".into()))
        );
        assert!(modes.is_enabled(ModeName::Orbit));
    }

    #[test]
    fn new_maneuver_supersedes_old_one() {
        let mut world = world();
        let mut modes = FlightModes::new();
        let first = modes.fly_to("mars", &mut world).unwrap();
        modes.animation_frame(&mut world, 1.0 / 60.0);
        world.drain_events();

        let second = modes.fly_to("venus", &mut world).unwrap();
        assert_ne!(first, second);
        let events = world.drain_events();
        assert!(events.contains(&SessionEvent::ManeuverCancelled {
            id: first,
            body: "mars".into(),
        }));
        assert_eq!(modes.maneuver().map(|p| p.id), Some(second));
    }

    #[test]
    fn orbit_body_follows_its_target() {
        let mut world = world();
        world.set_speed(5.0);
        let mut modes = FlightModes::new();
        let mars = world.registry.find("mars").unwrap().id;
        assert!(modes.orbit_body(mars, &mut world));

        let offset = world.camera.position - world.registry.get(mars).unwrap().position;
        modes.animation_frame(&mut world, 1.0 / 60.0);
        let after = world.camera.position - world.registry.get(mars).unwrap().position;
        assert!(after.distance(offset) < 1e-9);
        assert!(modes.speed() > 0.0);
    }
}
