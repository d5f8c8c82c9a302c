//! Server logging.
//!
//! Reads `RUST_LOG`. Defaults to `kaboom=info` so turns, words and
//! explosions are visible without configuration.
//!
//! ```bash
//! RUST_LOG=kaboom=debug kaboom --port 4000
//! ```

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,kaboom=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
