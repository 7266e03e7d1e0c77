use std::fs::File;
use std::path::Path;
use std::sync::Mutex;

use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use crate::domain::DVError;

/// Installs the global subscriber. `RUST_LOG` overrides the default `info`
/// level. The terminal UI owns stdout and stderr, so without a log file
/// nothing is written there unless running headless.
pub fn init_tracing(log_file: Option<&Path>, headless: bool) -> Result<(), DVError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let registry = tracing_subscriber::registry()
        .with(filter)
        .with(ErrorLayer::default());

    let result = match (log_file, headless) {
        (Some(path), _) => {
            let file = File::options().create(true).append(true).open(path)?;
            registry
                .with(fmt::layer().with_writer(Mutex::new(file)).with_ansi(false))
                .try_init()
        }
        (None, true) => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .try_init(),
        (None, false) => registry.try_init(),
    };
    result.map_err(|e| DVError::InvalidArgument(format!("cannot install logger: {e}")))
}
