pub mod config;
pub mod error;
pub mod observer;
pub mod session;
pub mod types;
