use anyhow::{Context, Result};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{
    EnvFilter, filter::Targets, fmt, prelude::__tracing_subscriber_SubscriberExt,
    util::SubscriberInitExt,
};

const APP_TARGET: &str = "fxbrief";

/// Crate events only. Warnings about degraded inputs are always shown,
/// debug output only with `--verbose`.
fn app_targets(verbose: bool) -> Targets {
    let level = if verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::WARN
    };
    Targets::new().with_target(APP_TARGET, level)
}

/// Installs the global subscriber on stderr, keeping stdout for the report.
/// `RUST_LOG` narrows the crate filter further.
pub fn init_logging(verbose: bool) -> Result<()> {
    let default_directive = if verbose {
        format!("{APP_TARGET}=debug")
    } else {
        format!("{APP_TARGET}=warn")
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let detailed = verbose.then(|| {
        fmt::layer()
            .pretty()
            .without_time()
            .with_writer(std::io::stderr)
    });
    let concise = (!verbose).then(|| {
        fmt::layer()
            .compact()
            .without_time()
            .with_target(false)
            .with_writer(std::io::stderr)
    });

    tracing_subscriber::registry()
        .with(detailed)
        .with(concise)
        .with(app_targets(verbose))
        .with(env_filter)
        .try_init()
        .context("Failed to install the tracing subscriber")
}
