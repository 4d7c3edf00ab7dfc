use anyhow::Result;
use clap::Args;

use super::{print_progress, workflow, GenerationArgs, NftArgs};
use crate::Context;

#[derive(Args)]
pub struct MintSubCommand {
    #[command(flatten)]
    generation: GenerationArgs,
    #[command(flatten)]
    nft: NftArgs,
}

pub async fn mint(ctx: &Context, sub_command_args: &MintSubCommand) -> Result<()> {
    let params = sub_command_args.generation.params()?;
    let workflow = workflow(ctx);
    let progress = print_progress(&workflow);

    let minted = async {
        workflow
            .generate(sub_command_args.generation.prompt(), params)
            .await?;

        let pinned = workflow.upload().await?;
        println!("Pinned {}", pinned.gateway_url);

        workflow
            .update_draft(sub_command_args.nft.draft(ctx.settings.wallet.network))
            .await?;
        workflow.mint().await
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
