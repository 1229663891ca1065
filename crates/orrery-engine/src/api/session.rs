use crate::api::config::SessionConfig;
use crate::api::error::{SessionError, SettingsError};
use crate::api::observer::{ObserverId, Observers, RenderTick};
use crate::api::types::{Capabilities, ManeuverId, ModeName, Notice, NoticeKind, SessionEvent};
use crate::bridge::protocol::{FrameHeader, SceneBuffer, SceneLayout};
use crate::components::body::BodyDesc;
use crate::components::catalogue::solar_system;
use crate::core::calendar::CalendarDate;
use crate::core::registry::BodyDistance;
use crate::core::time::FrameGate;
use crate::core::world::World;
use crate::ephemeris::loader::BatchLoader;
use crate::ephemeris::BatchOutcome;
use crate::flight::auto::AutoPilot;
use crate::flight::FlightModes;
use crate::input::keyboard::KEY_ESCAPE;
use crate::input::queue::{InputEvent, InputQueue};
use crate::renderer::camera::Camera3D;
use crate::settings::{
    parse_value, Settings, SettingsStore, KEY_LABELS, KEY_PREVIOUS_SPEED, KEY_SIZE_SCALE, KEY_SPEED,
};

/// One flight session: owns the world, the mode state machine and the
/// frame loop. The host calls [`tick`](Self::tick) from its animation
/// callback and reads the scene buffer afterwards.
pub struct FlightSession {
    world: World,
    modes: FlightModes,
    gate: FrameGate,
    input: InputQueue,
    store: Box<dyn SettingsStore>,
    scene: SceneBuffer,
    render: Observers<RenderTick>,
    /// Bodies are placed once the initial batch resolves.
    ready: bool,
    /// Whether animation frames run; cleared when a mode signals stop.
    running: bool,
    frame: u64,
}

impl FlightSession {
    /// Start a session over the built-in solar system.
    pub fn new(
        config: SessionConfig,
        capabilities: Capabilities,
        loader: Box<dyn BatchLoader>,
        store: Box<dyn SettingsStore>,
    ) -> Result<Self, SessionError> {
        Self::with_bodies(config, capabilities, loader, store, solar_system())
    }

    /// Check capabilities, build the bodies and request the initial batch at
    /// the epoch. Nothing is constructed when a capability is missing.
    pub fn with_bodies(
        config: SessionConfig,
        capabilities: Capabilities,
        loader: Box<dyn BatchLoader>,
        store: Box<dyn SettingsStore>,
        bodies: Vec<BodyDesc>,
    ) -> Result<Self, SessionError> {
        capabilities.check()?;

        let settings = Settings::load(store.as_ref());
        let gate = FrameGate::new(config.frame_delay);
        let scene = SceneBuffer::new(SceneLayout::from_config(&config));
        let mut world = World::new(config, settings, loader);
        world.add_bodies(bodies)?;

        let epoch = world.clock.day_number();
        world.ephemeris.request_batch(epoch);
        log::info!("session: {} bodies, loading ephemeris at {}", world.registry.len(), epoch);

        Ok(Self {
            world,
            modes: FlightModes::new(),
            gate,
            input: InputQueue::new(),
            store,
            scene,
            render: Observers::new(),
            ready: false,
            running: false,
            frame: 0,
        })
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Whether the frame loop is live.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Advance by `elapsed` seconds of host time: merge finished ephemeris
    /// batches, apply queued input, then run the frames due. Returns whether
    /// the loop is still live.
    pub fn tick(&mut self, elapsed: f64) -> bool {
        self.poll_ephemeris();
        if !self.ready {
            return false;
        }
        self.route_input();

        if self.running {
            let frames = self.gate.accumulate(elapsed);
            let delta = self.gate.delay();
            for _ in 0..frames {
                let proceed = self.modes.animation_frame(&mut self.world, delta);
                self.frame += 1;
                self.render_frame();
                if !proceed && !self.after_stop() {
                    self.running = false;
                    break;
                }
            }
        }

        if self.world.take_settings_dirty() {
            self.world.settings.save(self.store.as_mut());
        }
        self.running
    }

    fn poll_ephemeris(&mut self) {
        let Some(outcome) = self.world.ephemeris.poll() else {
            return;
        };
        if self.ready {
            return;
        }
        if let BatchOutcome::Failed { start } = outcome {
            log::warn!("session: initial ephemeris batch at {} failed", start);
            self.world.set_notice(Notice::new(
                NoticeKind::LoadFailed,
                "Could not load ephemeris data",
            ));
            self.world.set_speed(0.0);
        }
        self.start();
    }

    fn start(&mut self) {
        self.world.place_bodies();
        self.ready = true;
        self.world.emit(SessionEvent::Ready);
        log::info!("session: ready at day {}", self.world.clock.day_number());

        let initial = match self.world.config.initial_mode {
            ModeName::Auto => ModeName::Menu,
            mode => mode,
        };
        self.modes.set_mode(initial, &mut self.world);
        self.restart();
        self.render_frame();
    }

    /// A mode signalled stop. A finished fly-to hands over to orbit controls
    /// around its target when configured; returns whether the loop goes on.
    fn after_stop(&mut self) -> bool {
        if !self.world.config.orbit_after_arrival {
            return false;
        }
        let Some(target) = self.modes.maneuver().filter(|p| p.is_finished()).map(|p| p.target) else {
            return false;
        };
        self.modes.orbit_body(target, &mut self.world)
    }

    fn restart(&mut self) {
        self.running = true;
        self.gate.reset();
    }

    fn route_input(&mut self) {
        for event in self.input.drain() {
            match event {
                InputEvent::KeyDown { key_code: KEY_ESCAPE } => {
                    if self.modes.set_mode(ModeName::Menu, &mut self.world) {
                        self.restart();
                    }
                }
                InputEvent::KeyDown { key_code } => self.world.keys.press(key_code),
                InputEvent::KeyUp { key_code } => self.world.keys.release(key_code),
                InputEvent::PointerDown { button } => self.world.pointer.press(button),
                InputEvent::PointerUp { button } => self.world.pointer.release(button),
                InputEvent::PointerMove { dx, dy } => {
                    self.world.pointer.dx += dx as f64;
                    self.world.pointer.dy += dy as f64;
                }
                InputEvent::Wheel { delta } => self.world.pointer.wheel += delta as f64,
                InputEvent::PointerLockLost => {
                    if self.modes.is_enabled(ModeName::PointerLock) {
                        self.modes.set_mode(ModeName::Menu, &mut self.world);
                        self.restart();
                    }
                }
            }
        }
    }

    fn render_frame(&mut self) {
        let header = FrameHeader {
            frame: self.frame,
            mode: self.modes.current(),
            speed: self.modes.speed(),
            day_number: self.world.clock.day_number(),
            size_factor: self.world.size_factor(),
        };
        self.scene.write(
            header,
            &self.world.settings,
            &self.world.camera,
            self.world.registry.as_slice(),
        );
        self.render.notify(&RenderTick {
            frame: self.frame,
            day_number: header.day_number,
        });
    }

    // -- Modes --

    pub fn mode(&self) -> Option<ModeName> {
        self.modes.current()
    }

    /// Switch flight mode and restart the frame loop. Requesting the active
    /// mode changes nothing.
    pub fn set_mode(&mut self, name: ModeName) -> Result<Option<ModeName>, SessionError> {
        if !self.ready {
            return Err(SessionError::NotReady);
        }
        if self.modes.set_mode(name, &mut self.world) {
            self.restart();
        }
        Ok(self.modes.current())
    }

    /// Begin a fly-to. Progress is reported through
    /// [`SessionEvent::ManeuverFinished`] or [`SessionEvent::ManeuverCancelled`]
    /// carrying the returned id.
    pub fn fly_to(&mut self, body: &str) -> Result<ManeuverId, SessionError> {
        if !self.ready {
            return Err(SessionError::NotReady);
        }
        let id = self.modes.fly_to(body, &mut self.world)?;
        self.restart();
        Ok(id)
    }

    pub fn maneuver(&self) -> Option<&AutoPilot> {
        self.modes.maneuver()
    }

    /// Camera speed reported by the active mode's last frame.
    pub fn speed(&self) -> f64 {
        self.modes.speed()
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.input.push(event);
    }

    // -- Time --

    pub fn day_number(&self) -> f64 {
        self.world.clock.day_number()
    }

    pub fn calendar_date(&self) -> CalendarDate {
        self.world.clock.calendar_date()
    }

    /// Simulated days per frame; 0 stops time.
    pub fn set_days_per_frame(&mut self, days: f64) -> bool {
        self.world.set_speed(days)
    }

    /// Pause or resume simulated time. Returns whether time now runs.
    pub fn toggle_pause(&mut self) -> bool {
        let days = if self.world.clock.is_on() {
            0.0
        } else {
            self.world.clock.previous_step()
        };
        self.world.set_speed(days);
        self.world.clock.is_on()
    }

    // -- Queries --

    /// Bodies by distance from the camera, nearest first.
    pub fn distances(&self) -> Vec<BodyDistance> {
        self.world.registry.distances_to(self.world.camera.position)
    }

    /// Camera distance to a named body, in scene units.
    pub fn distance_to(&self, body: &str) -> Option<f64> {
        self.world
            .registry
            .get_by_name(body)
            .map(|b| b.position.distance(self.world.camera.position))
    }

    pub fn camera(&self) -> &Camera3D {
        &self.world.camera
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.world.notice()
    }

    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        self.world.drain_events()
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn scene(&self) -> &SceneBuffer {
        &self.scene
    }

    // -- Settings --

    pub fn settings(&self) -> &Settings {
        &self.world.settings
    }

    pub fn store(&self) -> &dyn SettingsStore {
        self.store.as_ref()
    }

    /// Apply one raw setting value and persist it.
    pub fn apply_setting(&mut self, key: &str, raw: &str) -> Result<(), SettingsError> {
        self.world.settings.apply(key, parse_value(raw))?;
        match key {
            KEY_SPEED => {
                let days = self.world.settings.speed;
                self.world.set_speed(days);
            }
            KEY_PREVIOUS_SPEED => {
                let days = self.world.settings.previous_speed;
                self.world.clock.set_previous_step(days);
            }
            KEY_SIZE_SCALE => {
                self.world.apply_scale();
                self.world.translate_bodies();
                self.world.update_dependents();
            }
            KEY_LABELS => self.world.update_dependents(),
            _ => {}
        }
        self.world.settings.save(self.store.as_mut());
        Ok(())
    }

    // -- Observers --

    /// Called after every rendered frame.
    pub fn on_render(&mut self, listener: impl FnMut(&RenderTick) + 'static) -> ObserverId {
        self.render.subscribe(listener)
    }

    pub fn off_render(&mut self, id: ObserverId) -> bool {
        self.render.unsubscribe(id)
    }
}
