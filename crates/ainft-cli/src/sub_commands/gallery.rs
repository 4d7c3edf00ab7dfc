use std::sync::Arc;

use ainft::{Gallery, HttpAssetQuery};
use anyhow::Result;
use clap::{Args, Subcommand};

use crate::Context;

#[derive(Args)]
pub struct GallerySubCommand {
    #[command(subcommand)]
    command: GalleryCommand,
}

#[derive(Subcommand)]
enum GalleryCommand {
    /// List owned NFTs
    List {
        /// Page, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: usize,
    },
    /// Burn an NFT minted by this wallet
    Burn {
        /// Asset unit
        unit: String,
    },
    /// Send an NFT
    Send {
        /// Asset unit
        unit: String,
        /// Recipient address
        recipient: String,
        /// Public message, at most 64 characters
        #[arg(short, long)]
        message: Option<String>,
    },
}

pub async fn gallery(ctx: &Context, sub_command_args: &GallerySubCommand) -> Result<()> {
    let gallery = Gallery::with_page_size(
        Arc::new(HttpAssetQuery::new(ctx.api.clone())),
        ctx.wallet.clone(),
        ctx.settings.gallery.page_size,
    );
    let total = gallery.refresh().await?;

    match &sub_command_args.command {
        GalleryCommand::List { page } => {
            let assets = gallery.page(*page).await?;
            for asset in assets {
                println!(
                    "{}\n  {}\n  {}\n  {}",
                    asset.metadata.name,
                    asset.metadata.description,
                    asset.display_image_url(),
                    asset.unit
                );
            }
            println!(
                "Page {} of {} ({} NFTs)",
                page,
                gallery.total_pages().await.max(1),
                total
            );
        }
        GalleryCommand::Burn { unit } => {
            let hash = gallery.burn(unit).await?;
            println!("Burned in transaction {}", hash);
        }
        GalleryCommand::Send {
            unit,
            recipient,
            message,
        } => {
            let hash = gallery.send(unit, recipient, message.clone()).await?;
            println!("Sent in transaction {}", hash);
        }
    }

    Ok(())
}
