//! Log subscriber setup

use eyre::eyre;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber
///
/// `RUST_LOG` wins when set; otherwise `debug` raises the level from
/// `info` to `debug`.
pub fn init(debug: bool, json: bool) -> eyre::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(debug)));

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    result.map_err(|e| eyre!(e))
}

fn default_directive(debug: bool) -> &'static str {
    if debug { "debug" } else { "info" }
}
