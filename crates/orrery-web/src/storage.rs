use orrery_engine::{MemoryStore, SettingsStore};

const PREFIX: &str = "orrery.";

/// Settings persisted in the browser's localStorage under `orrery.<key>`.
/// Falls back to memory when storage is unavailable (private mode, sandboxed
/// frames).
pub struct LocalStorageStore {
    storage: Option<web_sys::Storage>,
    fallback: MemoryStore,
}

impl LocalStorageStore {
    pub fn new() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        if storage.is_none() {
            log::warn!("localStorage unavailable, settings will not persist");
        }
        Self {
            storage,
            fallback: MemoryStore::new(),
        }
    }
}

impl Default for LocalStorageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsStore for LocalStorageStore {
    fn get(&self, key: &str) -> Option<String> {
        match &self.storage {
            Some(storage) => storage.get_item(&format!("{PREFIX}{key}")).ok().flatten(),
            None => self.fallback.get(key),
        }
    }

    fn set(&mut self, key: &str, value: &str) {
        match &self.storage {
            Some(storage) => {
                if let Err(err) = storage.set_item(&format!("{PREFIX}{key}"), value) {
                    log::warn!("could not persist {}: {:?}", key, err);
                }
            }
            None => self.fallback.set(key, value),
        }
    }
}
