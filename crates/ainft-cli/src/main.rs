//! AINFT command line minter

use std::path::PathBuf;
use std::sync::Arc;

use ainft::{ApiClient, FileStore, KvStore};
use ainft_common::WalletGateway;
use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use tracing::Level;
use tracing_subscriber::EnvFilter;

mod config;
mod sub_commands;

use crate::config::Settings;

const DEFAULT_WORK_DIR: &str = ".ainft";
const CONFIG_FILE: &str = "config.toml";

/// Generate AI images, pin them to IPFS and mint them as Cardano NFTs
#[derive(Parser)]
#[command(name = "ainft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to working dir
    #[arg(short, long)]
    work_dir: Option<PathBuf>,
    /// Logging level
    #[arg(short, long, default_value = "error")]
    log_level: Level,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate an image from a prompt
    Generate(sub_commands::generate::GenerateSubCommand),
    /// Pin a local image to IPFS
    Upload(sub_commands::upload::UploadSubCommand),
    /// Generate, pin and mint in one go
    Mint(sub_commands::mint::MintSubCommand),
    /// Pin and mint a local image
    MintFile(sub_commands::mint_file::MintFileSubCommand),
    /// Estimate the fee of minting a local image
    EstimateFee(sub_commands::estimate_fee::EstimateFeeSubCommand),
    /// List, burn and send owned NFTs
    Gallery(sub_commands::gallery::GallerySubCommand),
    /// Saved prompts
    Prompts(sub_commands::prompts::PromptsSubCommand),
    /// Check an access key and optionally remember it
    Login(sub_commands::login::LoginSubCommand),
    /// Forget the remembered access key
    Logout,
}

/// Everything a subcommand may need
pub struct Context {
    /// Loaded settings
    pub settings: Settings,
    /// Backend API
    pub api: ApiClient,
    /// Configured wallet
    pub wallet: Arc<dyn WalletGateway>,
    /// Store under the work dir
    pub store: Arc<dyn KvStore>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Cli = Cli::parse();
    let default_filter = args.log_level;

    let hyper_filter = "hyper=warn";
    let reqwest_filter = "reqwest=warn";

    let env_filter = EnvFilter::new(format!(
        "{},{},{}",
        default_filter, hyper_filter, reqwest_filter
    ));

    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let work_dir = match &args.work_dir {
        Some(work_dir) => work_dir.clone(),
        None => {
            let home_dir = home::home_dir().ok_or_else(|| anyhow!("Unknown home dir"))?;
            home_dir.join(DEFAULT_WORK_DIR)
        }
    };

    tokio::fs::create_dir_all(&work_dir).await?;

    let settings = Settings::new(&work_dir.join(CONFIG_FILE))?.from_env()?;
    tracing::debug!("Settings: {:?}", settings);

    let http = settings.http_client()?;
    let ctx = Context {
        api: ApiClient::with_http_client(http.clone(), settings.api_url()?),
        wallet: settings.wallet_gateway(&http)?,
        store: Arc::new(FileStore::new(work_dir.join("store")).await?),
        settings,
    };

    match &args.command {
        Commands::Generate(sub_command_args) => {
            sub_commands::generate::generate(&ctx, sub_command_args).await
        }
        Commands::Upload(sub_command_args) => {
            sub_commands::upload::upload(&ctx, sub_command_args).await
        }
        Commands::Mint(sub_command_args) => sub_commands::mint::mint(&ctx, sub_command_args).await,
        Commands::MintFile(sub_command_args) => {
            sub_commands::mint_file::mint_file(&ctx, sub_command_args).await
        }
        Commands::EstimateFee(sub_command_args) => {
            sub_commands::estimate_fee::estimate_fee(&ctx, sub_command_args).await
        }
        Commands::Gallery(sub_command_args) => {
            sub_commands::gallery::gallery(&ctx, sub_command_args).await
        }
        Commands::Prompts(sub_command_args) => {
            sub_commands::prompts::prompts(&ctx, sub_command_args).await
        }
        Commands::Login(sub_command_args) => {
            sub_commands::login::login(&ctx, sub_command_args).await
        }
        Commands::Logout => sub_commands::login::logout(&ctx).await,
    }
}
