//! Log capture for tests.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Registry};

/// Install a subscriber that writes through the test harness.
///
/// `RUST_LOG` overrides the default `debug` level. Safe to call from every
/// test; only the first call installs anything.
pub fn init_test_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

    let _ = Registry::default()
        .with(env_filter)
        .with(fmt::layer().with_test_writer().with_target(true))
        .try_init();
}
