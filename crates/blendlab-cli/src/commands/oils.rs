use blendlab_core::catalog;
use blendlab_core::error::BlendError;
use std::path::Path;

use super::Context;
use crate::output;

pub fn list(ctx: &Context) -> Result<(), BlendError> {
    let wb = ctx.workbench()?;
    if ctx.json() {
        return output::json::print(wb.catalog().oils());
    }
    output::table::print_catalog(wb.catalog());
    Ok(())
}

pub fn show(ctx: &Context, id: &str) -> Result<(), BlendError> {
    let wb = ctx.workbench()?;
    let oil = wb
        .catalog()
        .get(id)
        .ok_or_else(|| BlendError::UnknownOil(id.to_string()))?;

    if ctx.json() {
        return output::json::print(oil);
    }
    output::table::print_oil(oil);
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), BlendError> {
    let catalog = catalog::load_catalog(file)?;
    println!(
        "Catalog '{}' is valid: version {}, {} oil(s)",
        file.display(),
        catalog.version(),
        catalog.len()
    );
    Ok(())
}
