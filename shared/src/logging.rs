//! Tracing setup shared by the qualifier binary and its tests

use tracing_subscriber::EnvFilter;

/// Initialize the tracing subscriber with a per-crate filter string.
///
/// `RUST_LOG` takes precedence when set; otherwise the given level applies to
/// the workspace crates while noisy HTTP internals stay at warn. Safe to call
/// more than once (later calls are no-ops), so tests can share it.
pub fn init_tracing(log_level: Option<&str>) {
    let base = log_level.unwrap_or("info");
    let default_filter = format!("qualifier={base},shared={base},reqwest=warn,hyper=warn");

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&default_filter));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .try_init();
}
