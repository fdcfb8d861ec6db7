use tracing_subscriber::{fmt, EnvFilter};

/// Installs the global tracing subscriber. `RUST_LOG` extends the default
/// directive.
pub fn init_tracing() {
    let filter = EnvFilter::from_default_env().add_directive("daybook_core=info".parse().unwrap());
    fmt().with_env_filter(filter).init();
}
