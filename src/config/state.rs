// Application state module
// Shared state passed into every request handler

use crate::config::Config;
use crate::store::CustomerStore;

/// Shared application state.
///
/// Owns the customer store for the life of the process; handlers receive it
/// behind an `Arc` instead of reaching for globals.
pub struct AppState {
    pub config: Config,
    pub store: CustomerStore,
}

impl AppState {
    /// Build state with the seeded customer store
    pub fn new(config: Config) -> Self {
        Self {
            config,
            store: CustomerStore::seeded(),
        }
    }

    /// Build state with an empty store (used by tests)
    #[cfg(test)]
    pub fn with_store(config: Config, store: CustomerStore) -> Self {
        Self { config, store }
    }
}
