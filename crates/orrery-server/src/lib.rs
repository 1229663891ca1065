//! HTTP surface for the orrery ephemeris.
//!
//! One route: `GET /ephemeris?start&step&limit` returns Keplerian positions
//! of the planets for `limit` days, in the batch format the browser loader
//! parses.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
