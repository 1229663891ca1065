//! Persisted user options.
//!
//! The backing store is a flat string map; values go through [`parse_value`]
//! on the way in and `Display` on the way out.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::api::error::SettingsError;

pub const KEY_SPEED: &str = "speed";
pub const KEY_PREVIOUS_SPEED: &str = "previousSpeed";
pub const KEY_ROTATION: &str = "rotation";
pub const KEY_AMBIENT_LIGHT: &str = "ambientLight";
pub const KEY_LABELS: &str = "labels";
pub const KEY_ORBITS: &str = "orbits";
pub const KEY_STARS: &str = "stars";
pub const KEY_KEYBOARD_SPEED: &str = "keyboardSpeed";
pub const KEY_LOOK_SENSITIVITY: &str = "lookSensitivity";
pub const KEY_SIZE_SCALE: &str = "sizeScale";

pub const ALL_KEYS: [&str; 10] = [
    KEY_SPEED,
    KEY_PREVIOUS_SPEED,
    KEY_ROTATION,
    KEY_AMBIENT_LIGHT,
    KEY_LABELS,
    KEY_ORBITS,
    KEY_STARS,
    KEY_KEYBOARD_SPEED,
    KEY_LOOK_SENSITIVITY,
    KEY_SIZE_SCALE,
];

const LARGE: &str = "large";

/// A stored value after coercion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SettingValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl fmt::Display for SettingValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingValue::Bool(b) => write!(f, "{b}"),
            SettingValue::Number(n) => write!(f, "{n}"),
            SettingValue::Text(s) => f.write_str(s),
        }
    }
}

/// `"true"`/`"false"` become booleans, finite numeric strings become
/// numbers, anything else stays text.
pub fn parse_value(raw: &str) -> SettingValue {
    match raw {
        "true" => return SettingValue::Bool(true),
        "false" => return SettingValue::Bool(false),
        _ => {}
    }
    let trimmed = raw.trim();
    if !trimmed.is_empty() {
        if let Ok(n) = trimmed.parse::<f64>() {
            if n.is_finite() {
                return SettingValue::Number(n);
            }
        }
    }
    SettingValue::Text(raw.to_string())
}

/// Body size multiplier, or the "large" preset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizeScale {
    Factor(f64),
    Large,
}

impl SizeScale {
    pub fn factor(self, large_factor: f64) -> f64 {
        match self {
            SizeScale::Factor(f) => f,
            SizeScale::Large => large_factor,
        }
    }
}

/// Flat string-keyed persistence.
pub trait SettingsStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// In-memory store, for tests and hosts without persistence.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Simulated days per frame.
    pub speed: f64,
    /// Speed to restore when unpausing.
    pub previous_speed: f64,
    pub rotation: bool,
    pub ambient_light: bool,
    pub labels: bool,
    pub orbits: bool,
    pub stars: bool,
    pub keyboard_speed: f64,
    pub look_sensitivity: f64,
    pub size_scale: SizeScale,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            speed: 1.0,
            previous_speed: 1.0,
            rotation: true,
            ambient_light: false,
            labels: true,
            orbits: true,
            stars: true,
            keyboard_speed: 1.0,
            look_sensitivity: 1.0,
            size_scale: SizeScale::Factor(1.0),
        }
    }
}

impl Settings {
    /// Defaults overlaid with whatever the store holds. Unusable stored
    /// values are logged and skipped.
    pub fn load(store: &dyn SettingsStore) -> Self {
        let mut settings = Self::default();
        for key in ALL_KEYS {
            if let Some(raw) = store.get(key) {
                if let Err(err) = settings.apply(key, parse_value(&raw)) {
                    log::warn!("settings: ignoring stored value: {}", err);
                }
            }
        }
        settings
    }

    pub fn save(&self, store: &mut dyn SettingsStore) {
        for key in ALL_KEYS {
            if let Some(value) = self.get(key) {
                store.set(key, &value.to_string());
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<SettingValue> {
        use SettingValue::*;
        Some(match key {
            KEY_SPEED => Number(self.speed),
            KEY_PREVIOUS_SPEED => Number(self.previous_speed),
            KEY_ROTATION => Bool(self.rotation),
            KEY_AMBIENT_LIGHT => Bool(self.ambient_light),
            KEY_LABELS => Bool(self.labels),
            KEY_ORBITS => Bool(self.orbits),
            KEY_STARS => Bool(self.stars),
            KEY_KEYBOARD_SPEED => Number(self.keyboard_speed),
            KEY_LOOK_SENSITIVITY => Number(self.look_sensitivity),
            KEY_SIZE_SCALE => match self.size_scale {
                SizeScale::Factor(f) => Number(f),
                SizeScale::Large => Text(LARGE.to_string()),
            },
            _ => return None,
        })
    }

    /// Set one option from a coerced value.
    pub fn apply(&mut self, key: &str, value: SettingValue) -> Result<(), SettingsError> {
        let invalid = || SettingsError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };

        match key {
            KEY_SPEED | KEY_PREVIOUS_SPEED => {
                let SettingValue::Number(n) = value else { return Err(invalid()) };
                // previousSpeed is what resuming restores; it must be positive.
                let floor_ok = if key == KEY_SPEED { n >= 0.0 } else { n > 0.0 };
                if !n.is_finite() || !floor_ok {
                    return Err(invalid());
                }
                if key == KEY_SPEED {
                    self.speed = n;
                } else {
                    self.previous_speed = n;
                }
            }
            KEY_ROTATION | KEY_AMBIENT_LIGHT | KEY_LABELS | KEY_ORBITS | KEY_STARS => {
                let SettingValue::Bool(b) = value else { return Err(invalid()) };
                match key {
                    KEY_ROTATION => self.rotation = b,
                    KEY_AMBIENT_LIGHT => self.ambient_light = b,
                    KEY_LABELS => self.labels = b,
                    KEY_ORBITS => self.orbits = b,
                    _ => self.stars = b,
                }
            }
            KEY_KEYBOARD_SPEED | KEY_LOOK_SENSITIVITY => {
                let SettingValue::Number(n) = value else { return Err(invalid()) };
                if n <= 0.0 {
                    return Err(invalid());
                }
                if key == KEY_KEYBOARD_SPEED {
                    self.keyboard_speed = n;
                } else {
                    self.look_sensitivity = n;
                }
            }
            KEY_SIZE_SCALE => {
                self.size_scale = match &value {
                    SettingValue::Number(n) if *n > 0.0 => SizeScale::Factor(*n),
                    SettingValue::Text(s) if s == LARGE => SizeScale::Large,
                    _ => return Err(invalid()),
                };
            }
            _ => return Err(SettingsError::UnknownKey(key.to_string())),
        }
        Ok(())
    }
}
