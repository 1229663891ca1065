use std::env;

/// Default listen address.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
/// Default cap on `limit` per request.
pub const DEFAULT_MAX_LIMIT: u32 = 10_000;

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind_addr: String,
    /// Largest batch a single request may ask for.
    pub max_limit: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            max_limit: DEFAULT_MAX_LIMIT,
        }
    }
}

impl ServerConfig {
    /// Read `ORRERY_BIND_ADDR` and `ORRERY_MAX_LIMIT`, falling back to the
    /// defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let bind_addr = env::var("ORRERY_BIND_ADDR").unwrap_or(defaults.bind_addr);
        let max_limit = match env::var("ORRERY_MAX_LIMIT") {
            Ok(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!("ORRERY_MAX_LIMIT={raw} is not a count, using {}", defaults.max_limit);
                defaults.max_limit
            }),
            Err(_) => defaults.max_limit,
        };
        Self { bind_addr, max_limit }
    }
}
