use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::{load_file, workflow, NftArgs};
use crate::Context;

#[derive(Args)]
pub struct EstimateFeeSubCommand {
    /// PNG or JPEG file, at most 1.5MB
    file: PathBuf,
    #[command(flatten)]
    nft: NftArgs,
}

pub async fn estimate_fee(ctx: &Context, sub_command_args: &EstimateFeeSubCommand) -> Result<()> {
    let workflow = workflow(ctx);

    load_file(&workflow, &sub_command_args.file).await?;
    workflow.upload().await?;
    workflow
        .update_draft(sub_command_args.nft.draft(ctx.settings.wallet.network))
        .await?;

    let fee = workflow.estimate_fee().await?;
    println!(
        "~{:.6} ADA ({} lovelace, {} byte transaction)",
        fee.ada(),
        fee.lovelace,
        fee.tx_size
    );

    Ok(())
}
