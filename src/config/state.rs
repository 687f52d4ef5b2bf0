// Application state module
// Holds configuration, the student registry and runtime signals

use std::sync::Arc;
use tokio::sync::{Notify, RwLock};

use super::types::Config;
use crate::registry::StudentRegistry;

/// Application state shared by every connection
pub struct AppState {
    pub config: Config,
    /// Student records; each operation holds the lock for its whole duration
    pub registry: RwLock<StudentRegistry>,
    /// Notified once when the process should stop accepting connections
    pub shutdown: Arc<Notify>,
}

impl AppState {
    /// Create `AppState` with the seeded registry
    pub fn new(config: &Config) -> Self {
        let registry = StudentRegistry::seeded(config.registry.id_policy);
        Self::with_registry(config, registry)
    }

    /// Create `AppState` around an existing registry
    pub fn with_registry(config: &Config, registry: StudentRegistry) -> Self {
        Self {
            config: config.clone(),
            registry: RwLock::new(registry),
            shutdown: Arc::new(Notify::new()),
        }
    }

    pub const fn access_log_enabled(&self) -> bool {
        self.config.logging.access_log
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::IdPolicy;

    #[tokio::test]
    async fn test_state_follows_config() {
        let mut config = Config::load_from("does/not/exist/config").unwrap();
        config.logging.access_log = false;
        config.registry.id_policy = IdPolicy::Monotonic;

        let state = AppState::new(&config);
        assert!(!state.access_log_enabled());
        assert_eq!(state.registry.read().await.list().len(), 6);

        config.logging.access_log = true;
        assert!(AppState::new(&config).access_log_enabled());
    }
}
