use ainft::{Credentials, KeyValidator};
use anyhow::{bail, Result};
use clap::Args;

use crate::Context;

#[derive(Args)]
pub struct LoginSubCommand {
    /// Access key, the remembered one is checked again when omitted
    key: Option<String>,
    /// Keep the key for later runs
    #[arg(short, long)]
    remember: bool,
}

pub async fn login(ctx: &Context, sub_command_args: &LoginSubCommand) -> Result<()> {
    let validator = KeyValidator::new(ctx.api.clone());
    let credentials = Credentials::new(ctx.store.clone());

    let key = match &sub_command_args.key {
        Some(key) => key.clone(),
        None => {
            let Some(key) = credentials.recall().await? else {
                bail!("No remembered key, pass one to log in");
            };
            if !validator.validate(&key).await? {
                credentials.forget().await?;
                bail!("Remembered key is no longer valid and was forgotten");
            }
            println!("Remembered key valid");
            return Ok(());
        }
    };

    if !validator.validate(&key).await? {
        bail!("Invalid key");
    }

    if sub_command_args.remember {
        credentials.remember(&key).await?;
        println!("Key valid and remembered");
    } else {
        println!("Key valid");
    }

    Ok(())
}

pub async fn logout(ctx: &Context) -> Result<()> {
    Credentials::new(ctx.store.clone()).forget().await?;
    println!("Key forgotten");
    Ok(())
}
