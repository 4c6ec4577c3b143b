//! One-time process bootstrap.
//!
//! [`initialize`] runs the fixed startup sequence exactly once:
//! install the default warning filters, publish the system encoding,
//! set up logging, then assemble the global resolver chain with the
//! vendor redirector at its front. A second call returns the
//! already-built container without re-running any side effect.

mod encoding;

pub use encoding::system_encoding;

use crate::config::ToolkitConfig;
use crate::di::Container;
use crate::warnings::WarningFilters;
use std::sync::{Arc, Mutex, OnceLock};
use tracing::debug;
use tracing_subscriber::EnvFilter;

static CONTAINER: OnceLock<Container> = OnceLock::new();
static INIT_LOCK: Mutex<()> = Mutex::new(());

/// Run the bootstrap sequence with default configuration.
pub fn initialize() -> &'static Container {
    initialize_with(ToolkitConfig::default())
}

/// Run the bootstrap sequence once and publish the global container.
///
/// The "already initialized" check happens under `INIT_LOCK`, so
/// concurrent first calls serialize and exactly one of them runs the
/// side effects; the configuration of later calls is ignored.
pub fn initialize_with(config: ToolkitConfig) -> &'static Container {
    let _guard = INIT_LOCK.lock().unwrap();
    if let Some(container) = CONTAINER.get() {
        debug!("bootstrap already ran");
        return container;
    }

    let warnings = Arc::new(WarningFilters::new());
    warnings.install_defaults(&config.namespace_root);

    let encoding = system_encoding();

    if config.setup_logging {
        init_logging();
    }
    debug!(encoding, "system encoding published");

    let container =
        Container::with_dependencies(config, warnings, Arc::new(crate::resolver::ModuleRegistry::new()));
    CONTAINER.get_or_init(|| container)
}

/// The global container, if bootstrap has run.
pub fn global() -> Option<&'static Container> {
    CONTAINER.get()
}

pub fn is_initialized() -> bool {
    CONTAINER.get().is_some()
}

fn init_logging() {
    // The host may already own a subscriber; that is not our problem
    // to fix, so the error is dropped.
    let filter = EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into());
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
