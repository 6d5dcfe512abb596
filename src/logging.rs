use anyhow::Context as _;

pub const DEFAULT_FILTER: &str = "info";
/// Also surfaces per-request spans from the HTTP trace layer.
pub const APP_DEFAULT_FILTER: &str = "info,tower_http=debug";

pub fn init() -> anyhow::Result<()> {
    init_with_default(DEFAULT_FILTER)
}

/// Installs the stderr subscriber; `RUST_LOG` overrides `default_filter`.
pub fn init_with_default(default_filter: &str) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(default_filter))
        .context("build log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("initialize tracing subscriber: {err}"))?;

    Ok(())
}
