use std::collections::VecDeque;

use crate::api::error::EphemerisError;

use super::wire::BatchPayload;
use super::KeplerEphemeris;

/// A request for `limit` records starting at `start`, `step` days apart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatchRequest {
    pub start: f64,
    pub step: f64,
    pub limit: u32,
}

impl BatchRequest {
    /// Query string for `GET /ephemeris`.
    pub fn query(&self) -> String {
        format!("start={}&step={}&limit={}", self.start, self.step, self.limit)
    }
}

/// Completion of a [`BatchRequest`].
#[derive(Debug)]
pub struct BatchResponse {
    pub request: BatchRequest,
    pub result: Result<BatchPayload, EphemerisError>,
}

/// Source of ephemeris batches. Requests are fire-and-forget; the caller
/// polls once per tick for completions, so no loader ever blocks a frame.
pub trait BatchLoader {
    fn request(&mut self, request: BatchRequest);
    fn poll(&mut self) -> Option<BatchResponse>;
}

/// Computes batches locally from the element tables. Each batch is
/// delivered on the poll after its request.
#[derive(Debug, Default)]
pub struct KeplerLoader {
    ephemeris: KeplerEphemeris,
    ready: VecDeque<BatchResponse>,
}

impl KeplerLoader {
    pub fn new() -> Self {
        Self::default()
    }
}

impl BatchLoader for KeplerLoader {
    fn request(&mut self, request: BatchRequest) {
        let payload = self.ephemeris.batch(request.start, request.step, request.limit);
        self.ready.push_back(BatchResponse { request, result: Ok(payload) });
    }

    fn poll(&mut self) -> Option<BatchResponse> {
        self.ready.pop_front()
    }
}
