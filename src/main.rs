use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

fn main() -> ExitCode {
    if let Err(err) = try_main() {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn try_main() -> anyhow::Result<()> {
    catalogview::logging::init().context("init logging")?;

    let cli = catalogview::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        catalogview::cli::Command::Fetch(args) => {
            catalogview::fetch::run(args).context("fetch")?;
        }
        catalogview::cli::Command::Render(args) => {
            catalogview::render::run(args).context("render")?;
        }
    }

    Ok(())
}
