pub mod calendar;
pub mod clock;
pub mod registry;
pub mod time;
pub mod world;
