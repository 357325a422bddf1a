use tracing_subscriber::EnvFilter;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Env var holding the log filter; `RUST_LOG` is used when it is unset.
pub const LOG_ENV: &str = "ARGSMITH_LOG";

/// Initialize tracing on stderr.
///
/// Filter comes from `ARGSMITH_LOG`, then `RUST_LOG`, else `warn`. Stdout is
/// left to the program's own output. Calling this twice is harmless.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    let stderr_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(stderr_layer)
        .try_init();
}
