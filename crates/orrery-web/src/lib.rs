//! Browser bridge for the orrery flight core.
//!
//! The page calls `orrery_init` once, then `orrery_tick` from its
//! animation callback. Input is forwarded through the `orrery_*` input
//! functions; the renderer reads the shared scene buffer through
//! `orrery_scene_ptr` and drains session events as JSON.

pub mod loader;
pub mod runner;
pub mod storage;

use std::cell::RefCell;

use wasm_bindgen::prelude::*;

use orrery_engine::{Capabilities, InputEvent, SessionConfig};

pub use runner::SessionRunner;

thread_local! {
    static RUNNER: RefCell<Option<SessionRunner>> = const { RefCell::new(None) };
}

/// Run `f` against the live runner. Calls before `orrery_init` succeeded are
/// logged and yield `None`.
fn with_runner<R>(f: impl FnOnce(&mut SessionRunner) -> R) -> Option<R> {
    RUNNER.with(|cell| match cell.borrow_mut().as_mut() {
        Some(runner) => Some(f(runner)),
        None => {
            log::warn!("orrery: session not initialized, call orrery_init first");
            None
        }
    })
}

/// Start a session. Returns `None` on success, or a message to show in place
/// of the scene (missing browser capability, bad config).
#[wasm_bindgen]
pub fn orrery_init(api_base: &str, config_json: &str, pointer_lock: bool, webgl: bool) -> Option<String> {
    console_error_panic_hook::set_once();
    let _ = console_log::init_with_level(log::Level::Info);

    let config = if config_json.trim().is_empty() {
        SessionConfig::default()
    } else {
        match SessionConfig::from_json(config_json) {
            Ok(config) => config,
            Err(err) => return Some(format!("Invalid configuration: {err}")),
        }
    };

    let capabilities = Capabilities { pointer_lock, webgl };
    match SessionRunner::new(api_base, config, capabilities) {
        Ok(runner) => {
            RUNNER.with(|cell| *cell.borrow_mut() = Some(runner));
            log::info!("orrery: initialized, ephemeris from {}", api_base);
            None
        }
        Err(err) => {
            log::warn!("orrery: startup aborted: {}", err);
            Some(err.to_string())
        }
    }
}

#[wasm_bindgen]
pub fn orrery_tick(dt: f64) -> bool {
    with_runner(|r| r.tick(dt)).unwrap_or(false)
}

#[wasm_bindgen]
pub fn orrery_is_ready() -> bool {
    with_runner(|r| r.is_ready()).unwrap_or(false)
}

// ---- Input ----

#[wasm_bindgen]
pub fn orrery_pointer_down(button: u8) {
    with_runner(|r| r.push_input(InputEvent::PointerDown { button }));
}

#[wasm_bindgen]
pub fn orrery_pointer_up(button: u8) {
    with_runner(|r| r.push_input(InputEvent::PointerUp { button }));
}

#[wasm_bindgen]
pub fn orrery_pointer_move(dx: f32, dy: f32) {
    with_runner(|r| r.push_input(InputEvent::PointerMove { dx, dy }));
}

#[wasm_bindgen]
pub fn orrery_wheel(delta: f32) {
    with_runner(|r| r.push_input(InputEvent::Wheel { delta }));
}

#[wasm_bindgen]
pub fn orrery_key_down(key_code: u32) {
    with_runner(|r| r.push_input(InputEvent::KeyDown { key_code }));
}

#[wasm_bindgen]
pub fn orrery_key_up(key_code: u32) {
    with_runner(|r| r.push_input(InputEvent::KeyUp { key_code }));
}

#[wasm_bindgen]
pub fn orrery_pointer_lock_lost() {
    with_runner(|r| r.push_input(InputEvent::PointerLockLost));
}

// ---- Commands ----

/// Returns the active mode name, or an empty string when the request failed.
#[wasm_bindgen]
pub fn orrery_set_mode(name: &str) -> String {
    match with_runner(|r| r.set_mode(name)) {
        Some(Ok(mode)) => mode.to_string(),
        Some(Err(err)) => {
            log::warn!("orrery: set_mode({}) failed: {}", name, err);
            String::new()
        }
        None => String::new(),
    }
}

#[wasm_bindgen]
pub fn orrery_mode() -> String {
    with_runner(|r| r.mode().map(|m| m.to_string()))
        .flatten()
        .unwrap_or_default()
}

/// Maneuver id (its generation), or -1 for an unknown body.
#[wasm_bindgen]
pub fn orrery_fly_to(body: &str) -> f64 {
    match with_runner(|r| r.fly_to(body)) {
        Some(Ok(generation)) => generation as f64,
        Some(Err(err)) => {
            log::warn!("orrery: fly_to({}) failed: {}", body, err);
            -1.0
        }
        None => -1.0,
    }
}

#[wasm_bindgen]
pub fn orrery_set_days_per_frame(days: f64) -> bool {
    with_runner(|r| r.set_days_per_frame(days)).unwrap_or(false)
}

#[wasm_bindgen]
pub fn orrery_toggle_pause() -> bool {
    with_runner(|r| r.toggle_pause()).unwrap_or(false)
}

/// Returns `None` on success, or the reason the value was rejected.
#[wasm_bindgen]
pub fn orrery_apply_setting(key: &str, value: &str) -> Option<String> {
    with_runner(|r| r.apply_setting(key, value).err()).flatten()
}

// ---- Data accessors ----

#[wasm_bindgen]
pub fn orrery_drain_events() -> String {
    with_runner(|r| r.events_json()).unwrap_or_else(|| "[]".to_string())
}

#[wasm_bindgen]
pub fn orrery_day_number() -> f64 {
    with_runner(|r| r.day_number()).unwrap_or(0.0)
}

#[wasm_bindgen]
pub fn orrery_date() -> String {
    with_runner(|r| r.date_string()).unwrap_or_default()
}

/// Julian day number of the wall clock, for hosts that want to start the
/// session "today" through `epoch_day_number`.
#[wasm_bindgen]
pub fn orrery_today_day_number() -> f64 {
    unix_ms_to_day_number(js_sys::Date::now())
}

/// Julian day number at the Unix epoch.
const UNIX_EPOCH_DAY_NUMBER: f64 = 2440587.5;

fn unix_ms_to_day_number(ms: f64) -> f64 {
    UNIX_EPOCH_DAY_NUMBER + ms / 86_400_000.0
}

#[wasm_bindgen]
pub fn orrery_speed() -> f64 {
    with_runner(|r| r.speed()).unwrap_or(0.0)
}

#[wasm_bindgen]
pub fn orrery_distance_to(body: &str) -> f64 {
    with_runner(|r| r.distance_to(body)).unwrap_or(-1.0)
}

#[wasm_bindgen]
pub fn orrery_scene_ptr() -> *const f32 {
    with_runner(|r| r.scene_ptr()).unwrap_or(std::ptr::null())
}

#[wasm_bindgen]
pub fn orrery_scene_total_floats() -> u32 {
    with_runner(|r| r.scene_total_floats()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn orrery_body_count() -> u32 {
    with_runner(|r| r.body_count()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn orrery_max_bodies() -> u32 {
    with_runner(|r| r.max_bodies()).unwrap_or(0)
}

#[wasm_bindgen]
pub fn orrery_body_names() -> String {
    with_runner(|r| r.body_names_json()).unwrap_or_else(|| "[]".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unix_epoch_and_j2000() {
        assert_eq!(unix_ms_to_day_number(0.0), 2440587.5);
        // 2000-01-01T12:00:00Z
        assert!((unix_ms_to_day_number(946_728_000_000.0) - 2451545.0).abs() < 1e-9);
    }
}
