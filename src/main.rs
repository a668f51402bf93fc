use std::{path::PathBuf, sync::Arc};

use clap::{
    Parser,
    builder::{
        Styles,
        styling::{AnsiColor, Effects},
    },
};

use tunegate::{
    browser::ChromeSessionProvider,
    config::{self, Config},
    error, info,
    server::{self, AppState},
};

fn styles() -> Styles {
    Styles::styled()
        .header(AnsiColor::White.on_default() | Effects::BOLD)
        .usage(AnsiColor::White.on_default() | Effects::BOLD)
        .literal(AnsiColor::BrightBlue.on_default())
        .placeholder(AnsiColor::BrightGreen.on_default())
}

#[derive(Parser, Debug, Clone)]
#[clap(
  version = env!("CARGO_PKG_VERSION"),
  name = env!("CARGO_PKG_NAME"),
  bin_name = env!("CARGO_PKG_NAME"),
  author = env!("CARGO_PKG_AUTHORS"),
  about = env!("CARGO_PKG_DESCRIPTION"),
  styles = styles(),
)]
struct Cli {
    /// Override the configured HTTP port
    #[clap(long)]
    port: Option<u16>,

    /// Load environment variables from this file instead of ./.env
    #[clap(long)]
    env_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    if let Err(e) = config::load_env(cli.env_file.as_deref()) {
        error!("Cannot load environment. Err: {}", e);
    }

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(e) => error!("Invalid configuration: {}", e),
    };

    let port = cli.port.unwrap_or(config.port);
    info!("Starting in {} mode", config.environment);

    let state = AppState {
        sessions: Arc::new(ChromeSessionProvider::from_config(&config)),
        config: Arc::new(config),
    };

    server::start_api_server(state, port).await;
}
