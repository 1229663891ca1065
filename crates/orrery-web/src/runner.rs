use orrery_engine::{
    Capabilities, FlightSession, InputEvent, ModeName, SessionConfig, SessionError,
};

use crate::loader::HttpLoader;
use crate::storage::LocalStorageStore;

/// Owns the flight session for the page.
///
/// wasm-bindgen cannot export a struct holding trait objects across the
/// boundary, so `lib.rs` keeps one runner in a `thread_local!` and exports
/// free functions that reach into it.
pub struct SessionRunner {
    session: FlightSession,
}

impl SessionRunner {
    pub fn new(
        api_base: &str,
        config: SessionConfig,
        capabilities: Capabilities,
    ) -> Result<Self, SessionError> {
        let session = FlightSession::new(
            config,
            capabilities,
            Box::new(HttpLoader::new(api_base)),
            Box::new(LocalStorageStore::new()),
        )?;
        Ok(Self { session })
    }

    /// Host frame callback. `dt` is in seconds.
    pub fn tick(&mut self, dt: f64) -> bool {
        self.session.tick(dt)
    }

    pub fn is_ready(&self) -> bool {
        self.session.is_ready()
    }

    pub fn push_input(&mut self, event: InputEvent) {
        self.session.push_input(event);
    }

    /// Mode names as the page spells them; "free" is accepted for pointer
    /// lock.
    pub fn set_mode(&mut self, name: &str) -> Result<ModeName, SessionError> {
        let mode: ModeName = name.parse()?;
        self.session.set_mode(mode)?;
        self.session.mode().ok_or(SessionError::NotReady)
    }

    pub fn mode(&self) -> Option<ModeName> {
        self.session.mode()
    }

    /// Generation of the started maneuver.
    pub fn fly_to(&mut self, body: &str) -> Result<u64, SessionError> {
        self.session.fly_to(body).map(|id| id.generation)
    }

    pub fn set_days_per_frame(&mut self, days: f64) -> bool {
        self.session.set_days_per_frame(days)
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.session.toggle_pause()
    }

    pub fn apply_setting(&mut self, key: &str, raw: &str) -> Result<(), String> {
        self.session.apply_setting(key, raw).map_err(|e| e.to_string())
    }

    /// Pending session events as a JSON array.
    pub fn events_json(&mut self) -> String {
        let events = self.session.drain_events();
        match serde_json::to_string(&events) {
            Ok(json) => json,
            Err(err) => {
                log::warn!("could not encode {} events: {}", events.len(), err);
                "[]".to_string()
            }
        }
    }

    pub fn day_number(&self) -> f64 {
        self.session.day_number()
    }

    /// "YYYY-MM-DD", astronomical year numbering.
    pub fn date_string(&self) -> String {
        let date = self.session.calendar_date();
        format!("{:04}-{:02}-{:02}", date.year, date.month, date.day)
    }

    pub fn speed(&self) -> f64 {
        self.session.speed()
    }

    /// Camera distance to a body in scene units, or -1 when unknown.
    pub fn distance_to(&self, body: &str) -> f64 {
        self.session.distance_to(body).unwrap_or(-1.0)
    }

    // ---- Scene buffer accessors ----

    pub fn scene_ptr(&self) -> *const f32 {
        self.session.scene().as_ptr()
    }

    pub fn scene_total_floats(&self) -> u32 {
        self.session.scene().layout().buffer_total_floats as u32
    }

    pub fn body_count(&self) -> u32 {
        self.session.scene().body_count() as u32
    }

    pub fn max_bodies(&self) -> u32 {
        self.session.scene().layout().max_bodies as u32
    }

    /// Body names in scene-buffer slot order, as JSON.
    pub fn body_names_json(&self) -> String {
        let names: Vec<&str> = self.session.world().registry.iter().map(|b| b.name()).collect();
        serde_json::to_string(&names).unwrap_or_else(|_| "[]".to_string())
    }
}
