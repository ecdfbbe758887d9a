//! Tracing setup for the binary and for tests.

#[cfg(test)]
use once_cell::sync::Lazy;

/// Initialize tracing for tests.
///
/// Filtering comes from RUST_LOG, e.g. `RUST_LOG=rustycw=debug` or
/// `RUST_LOG=rustycw::cluster=trace`, defaulting to `rustycw=warn`.
/// Safe to call from every test; only the first call installs a subscriber.
#[cfg(test)]
pub fn init_test_tracing() {
    static TRACING: Lazy<()> = Lazy::new(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("rustycw=warn"));

        fmt()
            .with_env_filter(filter)
            .with_target(true)
            .with_line_number(true)
            .with_test_writer()
            .init();
    });

    Lazy::force(&TRACING);
}

/// Initialize tracing for the binary. Call once, early in main.
///
/// The pipeline is single-threaded, so events carry module path and line
/// number but no thread ids. Defaults to `rustycw=info` when RUST_LOG is
/// unset.
pub fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("rustycw=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_line_number(true)
        .init();
}
