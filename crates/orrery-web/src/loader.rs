use std::sync::mpsc::{channel, Receiver, Sender};

use orrery_engine::ephemeris::loader::{BatchLoader, BatchRequest, BatchResponse};
use orrery_engine::{BatchPayload, EphemerisError};

/// Fetches ephemeris batches from `{base_url}/ephemeris`. Responses land on
/// a channel from the fetch callback and are handed out by `poll`.
pub struct HttpLoader {
    base_url: String,
    tx: Sender<BatchResponse>,
    rx: Receiver<BatchResponse>,
}

impl HttpLoader {
    pub fn new(base_url: &str) -> Self {
        let (tx, rx) = channel();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            tx,
            rx,
        }
    }

    pub fn url(&self, request: &BatchRequest) -> String {
        format!("{}/ephemeris?{}", self.base_url, request.query())
    }
}

impl BatchLoader for HttpLoader {
    fn request(&mut self, request: BatchRequest) {
        let url = self.url(&request);
        log::debug!("GET {}", url);
        let tx = self.tx.clone();
        ehttp::fetch(ehttp::Request::get(&url), move |result| {
            let result = result
                .map_err(EphemerisError::Fetch)
                .and_then(|response| parse_response(&response));
            if tx.send(BatchResponse { request, result }).is_err() {
                log::warn!("ephemeris response for {} arrived after the session ended", request.start);
            }
        });
    }

    fn poll(&mut self) -> Option<BatchResponse> {
        self.rx.try_recv().ok()
    }
}

fn parse_response(response: &ehttp::Response) -> Result<BatchPayload, EphemerisError> {
    if !response.ok {
        return Err(EphemerisError::Fetch(format!(
            "{} {}",
            response.status, response.status_text
        )));
    }
    let text = response
        .text()
        .ok_or_else(|| EphemerisError::Fetch("response body is not UTF-8".to_string()))?;
    BatchPayload::from_json(text)
}
