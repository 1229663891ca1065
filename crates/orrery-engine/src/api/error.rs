use thiserror::Error;

/// Failures of the tabulated ephemeris. Absorbed by the clock and turned
/// into a notice; never propagated out of a tick.
#[derive(Debug, Error)]
pub enum EphemerisError {
    #[error("ephemeris fetch failed: {0}")]
    Fetch(String),
    #[error("malformed ephemeris batch: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("malformed day number key {0:?}")]
    MalformedKey(String),
    #[error("ephemeris batch starting at day {0} is empty")]
    EmptyBatch(f64),
    #[error("day {0} is outside the loaded ephemeris")]
    OutOfRange(f64),
}

#[derive(Debug, Error, PartialEq)]
pub enum SessionError {
    #[error("{0} is not supported by this browser")]
    Unsupported(&'static str),
    #[error("unknown body {0:?}")]
    UnknownBody(String),
    #[error("duplicate body name {0:?}")]
    DuplicateBody(String),
    #[error("body {name:?} has non-positive radius {radius_km}")]
    InvalidRadius { name: String, radius_km: f64 },
    #[error("unknown flight mode {0:?}")]
    UnknownMode(String),
    #[error("session is still loading")]
    NotReady,
}

#[derive(Debug, Error, PartialEq)]
pub enum SettingsError {
    #[error("unknown setting {0:?}")]
    UnknownKey(String),
    #[error("invalid value {value:?} for setting {key:?}")]
    InvalidValue { key: String, value: String },
}
