use std::path::Path;

use ainft::{MintWorkflow, WorkflowEvent};
use ainft_common::{
    Dimensions, Engine, GeneratedImage, GenerationParams, LocalImage, MediaType, NftDraft,
    Network, StylePreset,
};
use anyhow::{anyhow, Result};
use clap::Args;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;

use crate::Context;

pub mod estimate_fee;
pub mod gallery;
pub mod generate;
pub mod login;
pub mod mint;
pub mod mint_file;
pub mod prompts;
pub mod upload;

/// Size used when the engine has no fixed output and none was given
const DEFAULT_SIZE: Dimensions = Dimensions::square(512);

#[derive(Args)]
pub struct GenerationArgs {
    /// Prompt, a leading "generate" or "create" is dropped
    prompt: String,
    /// Engine: sd16, sdxl, core or ultra
    #[arg(short, long, default_value = "sd16")]
    engine: Engine,
    /// Output size, e.g. 512x512
    #[arg(long)]
    size: Option<Dimensions>,
    /// Style preset, e.g. photographic or 3d-model
    #[arg(long)]
    style: Option<StylePreset>,
}

impl GenerationArgs {
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn params(&self) -> Result<GenerationParams> {
        let dimensions = self
            .size
            .or_else(|| self.engine.forced_dimensions())
            .unwrap_or(DEFAULT_SIZE);
        Ok(GenerationParams::new(self.engine, dimensions, self.style)?)
    }
}

#[derive(Args)]
pub struct NftArgs {
    /// NFT name
    #[arg(short, long)]
    name: String,
    /// NFT description
    #[arg(short, long)]
    description: String,
    /// Declared media type
    #[arg(long, default_value = "image/png")]
    media_type: MediaType,
}

impl NftArgs {
    pub fn draft(&self, network: Network) -> NftDraft {
        NftDraft {
            name: self.name.clone(),
            description: self.description.clone(),
            media_type: self.media_type,
            network,
        }
    }
}

/// Workflow talking to the configured backend and wallet
pub fn workflow(ctx: &Context) -> MintWorkflow {
    MintWorkflow::from_api(ctx.api.clone(), ctx.wallet.clone())
        .with_network(ctx.settings.wallet.network)
}

/// Print status changes of `workflow` to stderr until it is dropped
///
/// Await the handle after dropping the workflow to flush every event.
pub fn print_progress(workflow: &MintWorkflow) -> JoinHandle<()> {
    let mut events = workflow.subscribe();
    tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(WorkflowEvent::StatusChanged { to, .. }) => eprintln!("{}", to.label()),
                Ok(WorkflowEvent::Failed { message }) => eprintln!("Failed: {}", message),
                Ok(WorkflowEvent::Minted(_)) => {}
                Err(RecvError::Lagged(skipped)) => {
                    tracing::warn!("Skipped {} progress events", skipped);
                }
                Err(RecvError::Closed) => break,
            }
        }
    })
}

/// Read a PNG or JPEG file and install it as the current image
pub async fn load_file(workflow: &MintWorkflow, path: &Path) -> Result<GeneratedImage> {
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| anyhow!("Invalid file name {}", path.display()))?;
    let content_type = LocalImage::content_type_for(file_name)
        .ok_or_else(|| anyhow!("Please select a PNG or JPG file."))?;

    let bytes = tokio::fs::read(path).await?;
    let image = workflow
        .load_local_image(bytes, content_type, file_name)
        .await?;
    Ok(image)
}
