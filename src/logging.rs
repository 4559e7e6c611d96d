use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt};

/// Send traces to stderr so stdout stays pure JSON. `RUST_LOG` takes precedence over `--debug`.
pub fn init(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("scholar={level}")));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
