use blendlab_core::analysis;
use blendlab_core::analysis::gemini::GeminiClient;
use blendlab_core::credential::{self, KeySource};
use blendlab_core::error::BlendError;

use super::Context;
use crate::prompt;

pub fn set(ctx: &Context, key: &str) -> Result<(), BlendError> {
    if key.trim().is_empty() {
        return Err(BlendError::Validation("API key must not be blank".into()));
    }
    let wb = ctx.workbench()?;
    wb.credentials().save(key)?;
    println!("API key saved to {}", ctx.data_dir().display());
    Ok(())
}

pub fn show(ctx: &Context) -> Result<(), BlendError> {
    let wb = ctx.workbench()?;
    let lookup = wb.credentials().lookup()?;
    match (&lookup.key, lookup.source) {
        (Some(key), KeySource::Stored) => println!("{} (stored)", credential::mask(key)),
        (Some(key), KeySource::Environment) => {
            println!("{} (from {})", credential::mask(key), credential::API_KEY_ENV)
        }
        _ => println!("No API key configured"),
    }
    Ok(())
}

pub fn test(ctx: &Context, key: Option<String>, model: Option<String>) -> Result<(), BlendError> {
    let key = match key {
        Some(key) => key,
        None => ctx
            .workbench()?
            .credentials()
            .lookup()?
            .key
            .ok_or(BlendError::MissingCredential)?,
    };

    let client = GeminiClient::new(&ctx.settings(model))?;
    analysis::test_connection(&client, key.trim())?;
    println!("Connection OK ({})", credential::mask(key.trim()));
    Ok(())
}

pub fn delete(ctx: &Context, yes: bool) -> Result<(), BlendError> {
    let wb = ctx.workbench()?;
    if wb.credentials().get()?.is_none() {
        println!("No stored API key");
        return Ok(());
    }
    if !yes && !prompt::confirm("Delete the stored API key?") {
        println!("Kept API key");
        return Ok(());
    }
    wb.credentials().remove()?;
    println!("API key deleted");
    Ok(())
}
