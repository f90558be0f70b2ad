use blendlab_core::error::BlendError;
use blendlab_core::saved::DeleteOutcome;

use super::Context;
use crate::{output, prompt};

pub fn list(ctx: &Context) -> Result<(), BlendError> {
    let wb = ctx.workbench()?;
    if ctx.json() {
        return output::json::print(wb.saved().list());
    }
    output::table::print_saved_list(wb.saved().list());
    Ok(())
}

pub fn save(ctx: &Context, name: &str) -> Result<(), BlendError> {
    let mut wb = ctx.workbench()?;
    let saved = wb.save(name)?;
    if ctx.json() {
        return output::json::print(saved);
    }
    println!("Saved '{}' as {}", saved.name, saved.id);
    Ok(())
}

pub fn load(ctx: &Context, id: &str) -> Result<(), BlendError> {
    let mut wb = ctx.workbench()?;
    let name = wb.load(id)?.name.clone();
    if ctx.json() {
        return output::json::print(&output::json::BlendView::from_workbench(&wb));
    }
    println!("Loaded '{name}'\n");
    output::table::print_blend(wb.blend().items(), wb.composition(), wb.analysis());
    Ok(())
}

pub fn show(ctx: &Context, id: &str) -> Result<(), BlendError> {
    let wb = ctx.workbench()?;
    let saved = wb
        .saved()
        .get(id)
        .ok_or_else(|| BlendError::NotFound(id.to_string()))?;
    if ctx.json() {
        return output::json::print(saved);
    }
    output::table::print_saved(saved);
    Ok(())
}

pub fn delete(ctx: &Context, id: &str, yes: bool) -> Result<(), BlendError> {
    let mut wb = ctx.workbench()?;
    let outcome = wb.delete_saved(id, |blend| {
        yes || prompt::confirm(&format!("Delete saved blend '{}'?", blend.name))
    })?;

    match outcome {
        DeleteOutcome::Deleted => println!("Deleted {id}"),
        DeleteOutcome::Declined => println!("Kept {id}"),
        DeleteOutcome::NotFound => return Err(BlendError::NotFound(id.to_string())),
    }
    Ok(())
}
