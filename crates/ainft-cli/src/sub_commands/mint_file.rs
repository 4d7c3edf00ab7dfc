use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::{load_file, print_progress, workflow, NftArgs};
use crate::Context;

#[derive(Args)]
pub struct MintFileSubCommand {
    /// PNG or JPEG file, at most 1.5MB
    file: PathBuf,
    #[command(flatten)]
    nft: NftArgs,
}

pub async fn mint_file(ctx: &Context, sub_command_args: &MintFileSubCommand) -> Result<()> {
    let workflow = workflow(ctx);
    let progress = print_progress(&workflow);

    let minted = async {
        load_file(&workflow, &sub_command_args.file).await?;
        let pinned = workflow.upload().await?;
        println!("Pinned {}", pinned.gateway_url);

        workflow
            .update_draft(sub_command_args.nft.draft(ctx.settings.wallet.network))
            .await?;
        Ok::<_, anyhow::Error>(workflow.mint().await?)
    }
    .await;

    drop(workflow);
    progress.await?;
    let minted = minted?;

    println!(
        "Minted {} in transaction {}",
        minted.asset_name, minted.transaction_hash
    );

    Ok(())
}
