// =============================================================================
// Central Application State
// =============================================================================
//
// Shared by every request handler through `Arc<AppState>`.  The only mutable
// piece is the runtime configuration; chart computation itself is stateless
// and reads a copy of the configuration at the start of each request.
//
// Thread safety:
//   - Atomic counter for lock-free version tracking.
//   - parking_lot::RwLock around the configuration.
// =============================================================================

use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;

use crate::runtime_config::RuntimeConfig;

/// Default location of the persisted configuration.
pub const DEFAULT_CONFIG_PATH: &str = "dashboard_config.json";

pub struct AppState {
    /// Bumped whenever the configuration changes.
    pub state_version: AtomicU64,

    pub runtime_config: Arc<RwLock<RuntimeConfig>>,

    /// Where configuration changes are persisted.
    pub config_path: PathBuf,

    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: RuntimeConfig, config_path: impl Into<PathBuf>) -> Self {
        Self {
            state_version: AtomicU64::new(1),
            runtime_config: Arc::new(RwLock::new(config)),
            config_path: config_path.into(),
            start_time: Instant::now(),
        }
    }

    /// Atomically increment the state version, returning the previous value.
    pub fn increment_version(&self) -> u64 {
        self.state_version.fetch_add(1, Ordering::SeqCst)
    }

    pub fn current_state_version(&self) -> u64 {
        self.state_version.load(Ordering::SeqCst)
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Copy of the current configuration; the lock is released on return.
    pub fn config_snapshot(&self) -> RuntimeConfig {
        self.runtime_config.read().clone()
    }
}
