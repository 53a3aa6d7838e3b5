use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Install the fmt subscriber. `RUST_LOG` sets the base filter; the debug
/// toggle always opens the `upst` target so gated debug lines are shown.
pub fn init_logging(debug: bool) {
    let env_filter = build_filter(debug, std::env::var("RUST_LOG").ok().as_deref());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .without_time();

    let _ = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init();
}

fn build_filter(debug: bool, rust_log: Option<&str>) -> EnvFilter {
    let default_level = if debug { "debug" } else { "info" };
    let filter = rust_log
        .and_then(|directives| EnvFilter::try_new(directives).ok())
        .unwrap_or_else(|| EnvFilter::new(default_level));

    if !debug {
        return filter;
    }
    match "upst=debug".parse() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}
