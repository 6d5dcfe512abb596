use std::net::SocketAddr;

use clap::Parser;

use catalogview::app::{AppState, router};
use catalogview::cli::{ApiArgs, StoreArgs};
use catalogview::config::ApiConfig;
use catalogview::error_log::ErrorLog;
use catalogview::store::DocumentStore;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct AppArgs {
    #[arg(long, default_value = "127.0.0.1:8080")]
    addr: SocketAddr,

    #[command(flatten)]
    store: StoreArgs,

    #[command(flatten)]
    api: ApiArgs,
}

#[tokio::main]
async fn main() -> std::process::ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return std::process::ExitCode::FAILURE;
    }
    std::process::ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    catalogview::logging::init_with_default(catalogview::logging::APP_DEFAULT_FILTER)?;

    let args = AppArgs::parse();
    tracing::info!(?args, "starting catalogview-app");

    let api = match ApiConfig::from_args(&args.api) {
        Ok(config) => Some(config),
        Err(err) => {
            tracing::warn!(error = %format!("{err:#}"), "catalog pulls disabled");
            None
        }
    };

    let state = AppState {
        store: DocumentStore::new(&args.store.document),
        error_log: ErrorLog::new(&args.store.error_log),
        api,
    };

    let listener = tokio::net::TcpListener::bind(args.addr)
        .await
        .map_err(|err| anyhow::anyhow!("bind {}: {err}", args.addr))?;
    tracing::info!(addr = %args.addr, "listening");
    axum::serve(listener, router(state)).await?;
    Ok(())
}
