use glam::DVec3;

use crate::api::config::SessionConfig;
use crate::api::error::{EphemerisError, SessionError};
use crate::api::types::{BodyId, Notice, NoticeKind, SessionEvent};
use crate::collision::oracle::CollisionOracle;
use crate::components::body::BodyDesc;
use crate::core::clock::{Increment, SimClock};
use crate::core::registry::BodyRegistry;
use crate::ephemeris::loader::BatchLoader;
use crate::ephemeris::{KeplerEphemeris, TabulatedEphemeris};
use crate::flight::orbit::OrbitControls;
use crate::flight::speed::proximity_multiplier;
use crate::input::keyboard::{KeyState, PointerState};
use crate::renderer::camera::Camera3D;
use crate::settings::Settings;

/// Shared state of one running session: clock, ephemeris, bodies, camera
/// and the input the active flight mode reads. Mutated only from the tick.
pub struct World {
    pub config: SessionConfig,
    pub clock: SimClock,
    pub ephemeris: TabulatedEphemeris,
    /// Analytic source for orbit paths, which span far more than one batch.
    pub analytic: KeplerEphemeris,
    pub registry: BodyRegistry,
    pub camera: Camera3D,
    pub oracle: CollisionOracle,
    pub orbit_controls: OrbitControls,
    /// Body the orbit target follows as it moves.
    pub orbit_follow: Option<BodyId>,
    pub keys: KeyState,
    pub pointer: PointerState,
    pub settings: Settings,
    settings_dirty: bool,
    notice: Option<Notice>,
    events: Vec<SessionEvent>,
}

impl World {
    pub fn new(config: SessionConfig, settings: Settings, loader: Box<dyn BatchLoader>) -> Self {
        let mut camera = Camera3D::new(DVec3::from_array(config.camera_position), config.camera_fov);
        let target = DVec3::from_array(config.camera_target);
        camera.look_at(target);

        let mut clock = SimClock::new(config.epoch_day_number);
        clock.set_step(settings.previous_speed);
        clock.set_step(settings.speed);

        Self {
            clock,
            ephemeris: TabulatedEphemeris::new(loader, config.batch_size, config.batch_step),
            analytic: KeplerEphemeris,
            registry: BodyRegistry::new(),
            camera,
            oracle: CollisionOracle::new(config.ray_precision, config.approach_buffer_ratio),
            orbit_controls: OrbitControls::new(target),
            orbit_follow: None,
            keys: KeyState::new(),
            pointer: PointerState::default(),
            settings,
            settings_dirty: false,
            notice: None,
            events: Vec::new(),
            config,
        }
    }

    pub fn populate(&mut self, specs: Vec<BodyDesc>) -> Result<(), SessionError> {
        self.add_bodies(specs)?;
        self.place_bodies();
        Ok(())
    }

    /// Build the body set. Bodies stay at the origin until placed.
    pub fn add_bodies(&mut self, specs: Vec<BodyDesc>) -> Result<(), SessionError> {
        for desc in specs {
            self.registry.insert(desc)?;
        }
        self.registry.attach_orbit_paths(self.config.orbit_path_samples);
        self.apply_scale();
        Ok(())
    }

    /// Place every body at the current day number. When the table cannot
    /// (initial load failed) bodies start from the analytic positions.
    pub fn place_bodies(&mut self) {
        let day = self.clock.day_number();
        if self.ephemeris.covers(day) {
            self.translate_bodies();
        } else {
            let factor = self.size_factor();
            self.registry
                .translate_all(day, &self.analytic, self.config.position_scale, factor);
        }
        self.update_dependents();
    }

    pub fn size_factor(&self) -> f64 {
        self.settings.size_scale.factor(self.config.large_size_factor)
    }

    /// Recompute radii after a size-scale change.
    pub fn apply_scale(&mut self) {
        let factor = self.size_factor();
        self.registry.set_scale(factor, self.config.position_scale);
    }

    /// Move ephemeris-driven bodies to the clock's day number.
    pub fn translate_bodies(&mut self) {
        let factor = self.size_factor();
        self.registry.translate_all(
            self.clock.day_number(),
            &self.ephemeris,
            self.config.position_scale,
            factor,
        );
    }

    /// Labels and orbit paths; bodies stay where they are.
    pub fn update_dependents(&mut self) {
        self.registry.update_dependents(
            self.camera.position,
            self.settings.labels,
            self.clock.day_number(),
            &self.analytic,
            self.config.position_scale,
        );
    }

    /// The per-tick step shared by orbit and free flight: advance the clock
    /// and move bodies if time is on, spin bodies if rotation is on, then
    /// refresh dependents. Never stops the loop.
    pub fn update_space_time(&mut self, delta: f64) -> bool {
        if self.clock.is_on() {
            match self.clock.increment(&mut self.ephemeris) {
                Increment::Committed(_) => {
                    self.clear_data_notice();
                    self.translate_bodies();
                }
                Increment::Idle | Increment::Waiting(_) => {}
                Increment::Exhausted(err) => self.end_of_time(err),
            }
        }
        if self.settings.rotation {
            self.registry.rotate_all(delta);
        }
        self.update_dependents();
        true
    }

    /// Ephemeris ran out: tell the user and stop simulated time.
    pub fn end_of_time(&mut self, err: EphemerisError) {
        log::warn!("clock: end of available data: {}", err);
        self.set_notice(Notice::end_of_time());
        self.set_speed(0.0);
    }

    /// Data is flowing again, so an earlier shortage notice is stale.
    fn clear_data_notice(&mut self) {
        if matches!(
            self.notice.as_ref().map(|n| n.kind),
            Some(NoticeKind::EndOfTime | NoticeKind::LoadFailed)
        ) {
            self.clear_notice();
        }
    }

    /// Change the clock step and keep the persisted speed in sync.
    pub fn set_speed(&mut self, days: f64) -> bool {
        if !self.clock.set_step(days) {
            return false;
        }
        self.settings.speed = days;
        self.settings.previous_speed = self.clock.previous_step();
        self.settings_dirty = true;
        true
    }

    /// Nearest-body distance among `candidates`, or among all collideable
    /// bodies when none are given.
    pub fn proximity_multiplier(&self, candidates: Option<&[BodyId]>) -> f64 {
        let bodies: Vec<_> = match candidates {
            Some(ids) => ids.iter().filter_map(|id| self.registry.get(*id)).collect(),
            None => self.registry.collideable(),
        };
        proximity_multiplier(self.camera.position, &bodies)
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn set_notice(&mut self, notice: Notice) {
        self.notice = Some(notice.clone());
        self.events.push(SessionEvent::NoticeSet { notice });
    }

    pub fn clear_notice(&mut self) {
        if self.notice.take().is_some() {
            self.events.push(SessionEvent::NoticeCleared);
        }
    }

    pub fn emit(&mut self, event: SessionEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.events)
    }

    /// Whether settings changed since the last call.
    pub fn take_settings_dirty(&mut self) -> bool {
        std::mem::take(&mut self.settings_dirty)
    }
}
