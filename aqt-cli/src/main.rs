//! AQT CLI - command line tool for the air-quality tracking backend.

use aqt_client::api::ApiConfig;
use clap::Parser;

#[derive(Parser)]
#[command(
    name = "aqt-cli",
    version,
    about = "Air-quality tracking data toolkit"
)]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "AQT_API_BASE", global = true)]
    api_base: Option<String>,

    #[command(subcommand)]
    command: aqt_cmd::Command,
}

// The fetchers are single-threaded, so the runtime is too.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let config = cli
        .api_base
        .as_deref()
        .map(ApiConfig::new)
        .unwrap_or_default();
    log::debug!("backend {}", config.base_url);
    aqt_cmd::run(cli.command, config).await
}
