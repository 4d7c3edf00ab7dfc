use std::path::PathBuf;

use ainft::PromptLibrary;
use anyhow::{anyhow, Result};
use clap::Args;

use super::{print_progress, workflow, GenerationArgs};
use crate::Context;

#[derive(Args)]
pub struct GenerateSubCommand {
    #[command(flatten)]
    generation: GenerationArgs,
    /// Save the image to this file
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Add the prompt to the saved prompts
    #[arg(long)]
    save_prompt: bool,
}

pub async fn generate(ctx: &Context, sub_command_args: &GenerateSubCommand) -> Result<()> {
    let params = sub_command_args.generation.params()?;
    let workflow = workflow(ctx);
    let progress = print_progress(&workflow);

    let image = workflow
        .generate(sub_command_args.generation.prompt(), params)
        .await;

    drop(workflow);
    progress.await?;
    let image = image?;

    if sub_command_args.save_prompt {
        let library = PromptLibrary::new(ctx.store.clone());
        library.save(sub_command_args.generation.prompt()).await?;
    }

    match &sub_command_args.output {
        Some(path) => {
            let bytes = match image.bytes()? {
                Some(bytes) => bytes,
                None => ctx
                    .api
                    .http()
                    .get_bytes(&image.url)
                    .await
                    .map_err(|e| anyhow!("Could not download image: {}", e))?,
            };
            tokio::fs::write(path, bytes).await?;
            println!("Image {} saved to {}", image.id, path.display());
        }
        None if image.is_data_url() => {
            println!("Image {} generated, use --output to save it", image.id);
        }
        None => println!("Image {}: {}", image.id, image.url),
    }

    Ok(())
}
