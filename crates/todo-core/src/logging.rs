//! Logging initialization.
//!
//! The store emits `tracing` events; hosts pick where they go. Honors
//! `RUST_LOG` when set.

use std::io::IsTerminal;
use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install a stderr subscriber for the host process.
///
/// `default_filter` applies when `RUST_LOG` is unset, e.g. `"todo_core=info"`.
///
/// # Errors
///
/// Returns an error if the filter is invalid or a global subscriber is
/// already installed.
pub fn init_logging(default_filter: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_filter))?;

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(std::io::stderr().is_terminal());

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer);
    tracing::subscriber::set_global_default(subscriber)?;

    Ok(())
}

/// Initialize logging for tests with the test writer.
pub fn init_test_logging() {
    static INIT: Once = Once::new();

    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("todo_core=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}
