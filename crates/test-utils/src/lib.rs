pub mod fixtures;
pub mod progress;

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Route `tracing` output from tests through the libtest capture.
///
/// The filter comes from `BUFFSPAWN_LOG` (same variable as the binary, but
/// full `EnvFilter` syntax, e.g. `buffspawn=trace`) and defaults to `debug`
/// for this crate's events only. Output shows up for failing tests, or for
/// all of them with `-- --nocapture`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env("BUFFSPAWN_LOG")
            .unwrap_or_else(|_| EnvFilter::new("buffspawn=debug"));

        // Another harness may already have installed a subscriber.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Run a future with a 10-second timeout.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(std::time::Duration::from_secs(10), f)
        .await
        .expect("Test timed out after 10 seconds")
}
