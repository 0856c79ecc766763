//! Command line client for the TradeRobots platform.
use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;
use traderobots_data::config::ClientConfig;
use traderobots_data::session::SessionStore;

mod commands;
mod output;

use commands::{
    AccountsArgs, CreateArgs, DeployArgs, ExportArgs, LoginArgs, RobotsArgs, SmokeArgs,
};

#[derive(Parser)]
#[command(name = "traderobots")]
#[command(about = "Build, deploy and export MT5 trading robots", long_about = None)]
struct Cli {
    /// Backend base URL (overrides TRADEROBOTS_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Session file (overrides TRADEROBOTS_SESSION_FILE)
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize a robot from indicators and risk settings
    Create(CreateArgs),
    /// Deploy a registered robot to a trading account
    Deploy(DeployArgs),
    /// List marketplace robots
    Robots(RobotsArgs),
    /// List linked trading accounts
    Accounts(AccountsArgs),
    /// Write a robot's generated code to a file
    Export(ExportArgs),
    /// Sign in and persist the session
    Login(LoginArgs),
    /// Sign out and remove the persisted session
    Logout,
    /// Check that the backend answers on its main endpoints
    Smoke(SmokeArgs),
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::from_env();
        if let Some(url) = &self.api_url {
            config = config.with_api_url(url.as_str());
        }
        if let Some(path) = &self.session_file {
            config.session_file = path.clone();
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = cli.client_config();
    let store = SessionStore::new(config.session_file.clone());

    match cli.command {
        Commands::Create(args) => commands::create(&config, &store, args).await,
        Commands::Deploy(args) => commands::deploy(&config, &store, args).await,
        Commands::Robots(args) => commands::robots(&config, &store, args).await,
        Commands::Accounts(args) => commands::accounts(&config, &store, args).await,
        Commands::Export(args) => commands::export(&config, &store, args).await,
        Commands::Login(args) => commands::login(&config, &store, args).await,
        Commands::Logout => commands::logout(&config, &store).await,
        Commands::Smoke(args) => commands::smoke(&config, args).await,
    }
}
