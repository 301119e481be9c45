use crate::libs::messages::macros::is_debug_mode;
use tracing_subscriber::EnvFilter;

/// Installs the stderr subscriber when debug output was asked for.
///
/// `RUST_LOG` takes precedence; `TID_DEBUG` alone enables debug logs for
/// this crate only.
pub fn init_logging() {
    if !is_debug_mode() {
        return;
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!("{}=debug", env!("CARGO_PKG_NAME").replace('-', "_")))
    });

    // Tests and embedders may have installed their own subscriber already.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
