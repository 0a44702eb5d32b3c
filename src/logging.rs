//! Tracing initialization.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Install the global subscriber.
///
/// Reads `DOCSUM_LOG` for filter directives, e.g. `DOCSUM_LOG=docsum::nlp=debug`.
/// Falls back to `docsum=info`. Output goes to stderr so stdout stays valid JSON.
/// Calling this more than once is a no-op.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("DOCSUM_LOG")
            .unwrap_or_else(|_| EnvFilter::new("docsum=info"));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .with(filter)
            .init();
    });
}
