use std::sync::OnceLock;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: OnceLock<()> = OnceLock::new();

const DEFAULT_FILTER: &str = "form_guard=info";

/// Install a fmt subscriber filtered by `RUST_LOG` (default
/// `form_guard=info`).
///
/// Idempotent, and a no-op if the host already installed a global
/// subscriber. Libraries embedding the form should install their own
/// subscriber instead.
pub fn init() {
    // already initialised: nothing to do
    INIT.get_or_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
        let _ = tracing_subscriber::registry()
            .with(fmt::layer().with_target(true))
            .with(filter)
            .try_init();
    });
}
