use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Request an access token, download the catalog and persist it.
    Fetch(FetchArgs),
    /// Render the persisted catalog document as an HTML page.
    Render(RenderArgs),
}

#[derive(Debug, Clone, Args)]
pub struct StoreArgs {
    /// Path of the persisted catalog document.
    #[arg(long, default_value = "catalog.json")]
    pub document: String,

    /// Append-only log receiving one line per failure.
    #[arg(long, default_value = "errors.log")]
    pub error_log: String,
}

#[derive(Debug, Clone, Args)]
pub struct ApiArgs {
    /// Catalog API base URL (default: `$CATALOGVIEW_BASE_URL`, else the sandbox).
    #[arg(long)]
    pub base_url: Option<String>,

    /// Timeout applied to each outbound HTTP request.
    #[arg(long, default_value_t = 30)]
    pub timeout_secs: u64,
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    #[command(flatten)]
    pub api: ApiArgs,
}

#[derive(Debug, Args)]
pub struct RenderArgs {
    #[command(flatten)]
    pub store: StoreArgs,

    /// Output HTML file (default: stdout).
    #[arg(long)]
    pub out: Option<String>,
}
