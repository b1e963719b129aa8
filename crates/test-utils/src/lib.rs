pub mod builders;
pub mod fake_executor;

use std::future::Future;
use std::sync::Once;
use std::time::Duration;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// How long a test may wait on a run before it counts as hung.
pub const RUN_TIMEOUT: Duration = Duration::from_secs(5);

/// Install a test subscriber once per test binary.
///
/// Output goes through the test writer, so it only shows for failing tests
/// (or with `--nocapture`). The level comes from `DAGRUN_LOG`, e.g.
/// `DAGRUN_LOG=debug cargo test`, and defaults to `info`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_env(dagrun::logging::LOG_ENV)
            .unwrap_or_else(|_| EnvFilter::new("info"));

        // Another harness may already have installed one.
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(false)
            .try_init();
    });
}

/// Await `f`, failing the test if it takes longer than [`RUN_TIMEOUT`].
///
/// A scheduler that stops making progress fails here instead of hanging the
/// test binary.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: Future<Output = T>,
{
    tokio::time::timeout(RUN_TIMEOUT, f)
        .await
        .expect("run did not finish within RUN_TIMEOUT")
}
