//! GET /ephemeris: analytic planet positions for a run of day numbers.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Extension, Query};
use axum::Json;
use serde::Deserialize;

use orrery_engine::{BatchPayload, KeplerEphemeris};

use crate::config::ServerConfig;
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct BatchQuery {
    /// First day number (Julian).
    pub start: f64,
    /// Days between records.
    pub step: f64,
    /// Number of records.
    pub limit: u32,
}

impl BatchQuery {
    pub fn validate(&self, max_limit: u32) -> Result<(), ApiError> {
        if !self.start.is_finite() {
            return Err(ApiError::NotFinite { name: "start", value: self.start });
        }
        if !self.step.is_finite() {
            return Err(ApiError::NotFinite { name: "step", value: self.step });
        }
        if self.step <= 0.0 {
            return Err(ApiError::NonPositiveStep(self.step));
        }
        if self.limit == 0 || self.limit > max_limit {
            return Err(ApiError::LimitOutOfRange { limit: self.limit, max: max_limit });
        }
        Ok(())
    }
}

/// GET /ephemeris?start={day}&step={days}&limit={count}
pub async fn get_batch(
    Extension(config): Extension<ServerConfig>,
    query: Result<Query<BatchQuery>, QueryRejection>,
) -> Result<Json<BatchPayload>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::InvalidQuery(rejection.body_text()))?;
    query.validate(config.max_limit)?;

    let payload = KeplerEphemeris.batch(query.start, query.step, query.limit);
    tracing::debug!(
        "ephemeris batch start={} step={} limit={} ({} days)",
        query.start,
        query.step,
        query.limit,
        payload.len()
    );
    Ok(Json(payload))
}
