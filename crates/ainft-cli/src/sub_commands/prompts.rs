use ainft::PromptLibrary;
use anyhow::Result;
use clap::{Args, Subcommand};

use crate::Context;

#[derive(Args)]
pub struct PromptsSubCommand {
    #[command(subcommand)]
    command: PromptsCommand,
}

#[derive(Subcommand)]
enum PromptsCommand {
    /// Save a prompt
    Save {
        /// Prompt text
        prompt: String,
    },
    /// List saved prompts
    List,
    /// Delete a saved prompt
    Delete {
        /// Prompt text, exactly as saved
        prompt: String,
    },
}

pub async fn prompts(ctx: &Context, sub_command_args: &PromptsSubCommand) -> Result<()> {
    let library = PromptLibrary::new(ctx.store.clone());

    match &sub_command_args.command {
        PromptsCommand::Save { prompt } => {
            if library.save(prompt).await? {
                println!("Saved");
            } else {
                println!("Already saved");
            }
        }
        PromptsCommand::List => {
            for (i, prompt) in library.list().await?.iter().enumerate() {
                println!("{}: {}", i + 1, prompt);
            }
        }
        PromptsCommand::Delete { prompt } => {
            if library.delete(prompt).await? {
                println!("Deleted");
            } else {
                println!("No such prompt");
            }
        }
    }

    Ok(())
}
