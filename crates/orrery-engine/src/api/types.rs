use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::api::error::SessionError;

/// Unique identifier for a body in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Identity of a body's collision shape, resolved back to its owner by lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ColliderId(pub u32);

/// Names of the four flight modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ModeName {
    Menu,
    Orbit,
    PointerLock,
    Auto,
}

impl ModeName {
    pub fn as_str(self) -> &'static str {
        match self {
            ModeName::Menu => "menu",
            ModeName::Orbit => "orbit",
            ModeName::PointerLock => "pointerLock",
            ModeName::Auto => "auto",
        }
    }
}

impl fmt::Display for ModeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModeName {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "menu" => Ok(ModeName::Menu),
            "orbit" => Ok(ModeName::Orbit),
            "pointerLock" | "free" => Ok(ModeName::PointerLock),
            "auto" => Ok(ModeName::Auto),
            other => Err(SessionError::UnknownMode(other.to_string())),
        }
    }
}

/// Handle for one scripted fly-to. Carries the mode generation it was
/// started under so a superseded maneuver can be recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ManeuverId {
    pub generation: u64,
}

/// What a user-facing notice is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NoticeKind {
    /// Ephemeris data ran out; simulated speed was forced to zero.
    EndOfTime,
    /// The initial ephemeris batch could not be loaded.
    LoadFailed,
    /// Auto-pilot is turning toward a body.
    LookingAt,
    /// Auto-pilot is translating toward a body.
    FlyingTo,
}

/// A user-visible message. At most one is shown at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn new(kind: NoticeKind, text: impl Into<String>) -> Self {
        Self { kind, text: text.into() }
    }

    pub fn end_of_time() -> Self {
        Self::new(NoticeKind::EndOfTime, "Time has reached the end of available data")
    }

    pub fn looking_at(body: &str) -> Self {
        Self::new(NoticeKind::LookingAt, format!("Looking at {body}…"))
    }

    pub fn flying_to(body: &str) -> Self {
        Self::new(NoticeKind::FlyingTo, format!("Flying to {body}…"))
    }
}

/// Events emitted by the session for the embedding layer (overlay, pointer
/// capture, notices). Drained once per frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum SessionEvent {
    /// Initial batch resolved (or failed) and all bodies exist.
    Ready,
    ModeChanged { from: Option<ModeName>, to: ModeName },
    NoticeSet { notice: Notice },
    NoticeCleared,
    OverlayShown,
    OverlayHidden,
    PointerLockRequested,
    PointerLockReleased,
    ManeuverFinished { id: ManeuverId, body: String },
    ManeuverCancelled { id: ManeuverId, body: String },
}

/// Runtime features the host must provide before a session can start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub pointer_lock: bool,
    pub webgl: bool,
}

impl Capabilities {
    pub fn all() -> Self {
        Self { pointer_lock: true, webgl: true }
    }

    /// Fails on the first missing feature.
    pub fn check(&self) -> Result<(), SessionError> {
        if !self.webgl {
            return Err(SessionError::Unsupported("WebGL"));
        }
        if !self.pointer_lock {
            return Err(SessionError::Unsupported("Pointer Lock"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mode_names_round_trip() {
        for mode in [ModeName::Menu, ModeName::Orbit, ModeName::PointerLock, ModeName::Auto] {
            assert_eq!(mode.as_str().parse::<ModeName>().unwrap(), mode);
        }
        assert_eq!("free".parse::<ModeName>().unwrap(), ModeName::PointerLock);
        assert!("warp".parse::<ModeName>().is_err());
    }

    #[test]
    fn capabilities_report_missing_feature() {
        let caps = Capabilities { pointer_lock: false, webgl: true };
        match caps.check() {
            Err(SessionError::Unsupported(name)) => assert_eq!(name, "Pointer Lock"),
            other => panic!("expected Unsupported, got {other:?}"),
        }
        assert!(Capabilities::all().check().is_ok());
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let json = serde_json::to_string(&SessionEvent::ModeChanged {
            from: None,
            to: ModeName::PointerLock,
        })
        .unwrap();
        assert_eq!(json, r#"{"type":"modeChanged","from":null,"to":"pointerLock"}"#);
    }
}
