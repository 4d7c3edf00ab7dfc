use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::{load_file, workflow};
use crate::Context;

#[derive(Args)]
pub struct UploadSubCommand {
    /// PNG or JPEG file, at most 1.5MB
    file: PathBuf,
    /// Also print the NFT metadata a mint with this name would carry
    #[arg(short, long)]
    name: Option<String>,
    /// Description used for the metadata preview
    #[arg(short, long, requires = "name")]
    description: Option<String>,
}

pub async fn upload(ctx: &Context, sub_command_args: &UploadSubCommand) -> Result<()> {
    let workflow = workflow(ctx);

    load_file(&workflow, &sub_command_args.file).await?;
    let pinned = workflow.upload().await?;

    println!("{}", serde_json::to_string_pretty(&pinned)?);

    if let Some(name) = &sub_command_args.name {
        let mut draft = workflow.snapshot().await.draft.unwrap_or_default();
        draft.name = name.clone();
        draft.description = sub_command_args.description.clone().unwrap_or_default();

        let preview = draft.preview(&pinned);
        println!("{}", serde_json::to_string_pretty(&preview)?);
    }

    Ok(())
}
