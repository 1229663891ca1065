pub mod api;
pub mod bridge;
pub mod collision;
pub mod components;
pub mod core;
pub mod ephemeris;
pub mod flight;
pub mod input;
pub mod renderer;
pub mod settings;

// Re-export key types at crate root for convenience
pub use api::config::SessionConfig;
pub use api::error::{EphemerisError, SessionError, SettingsError};
pub use api::observer::{ObserverId, RenderTick};
pub use api::session::FlightSession;
pub use api::types::{BodyId, Capabilities, ManeuverId, ModeName, Notice, NoticeKind, SessionEvent};
pub use bridge::protocol::{SceneBuffer, SceneLayout};
pub use components::body::{Body, BodyCategory, BodyDesc};
pub use components::catalogue::solar_system;
pub use core::calendar::{day_number_to_date, gregorian_to_julian, julian_to_gregorian, CalendarDate};
pub use core::registry::BodyDistance;
pub use ephemeris::loader::{BatchLoader, BatchRequest, BatchResponse, KeplerLoader};
pub use ephemeris::wire::BatchPayload;
pub use ephemeris::{EphemerisSource, KeplerEphemeris};
pub use input::queue::{InputEvent, InputQueue};
pub use settings::{MemoryStore, Settings, SettingsStore};
