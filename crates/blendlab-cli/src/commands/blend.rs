use blendlab_core::error::BlendError;
use blendlab_core::Workbench;

use super::Context;
use crate::output;

pub fn add(ctx: &Context, oil: &str) -> Result<(), BlendError> {
    let mut wb = ctx.workbench()?;
    wb.add_oil(oil)?;
    print_blend(ctx, &wb)
}

pub fn set(ctx: &Context, oil: &str, drops: u32) -> Result<(), BlendError> {
    let mut wb = ctx.workbench()?;
    if drops < 1 {
        return Err(BlendError::Validation(
            "drop count must be at least 1. Use `blendlab blend remove` to drop an oil".into(),
        ));
    }
    if !wb.set_drops(oil, drops)? {
        return Err(BlendError::Validation(format!(
            "'{oil}' is not in the blend. Use `blendlab blend add {oil}` first"
        )));
    }
    print_blend(ctx, &wb)
}

pub fn remove(ctx: &Context, oil: &str) -> Result<(), BlendError> {
    let mut wb = ctx.workbench()?;
    if !wb.remove_oil(oil)? {
        return Err(BlendError::Validation(format!("'{oil}' is not in the blend")));
    }
    print_blend(ctx, &wb)
}

pub fn show(ctx: &Context) -> Result<(), BlendError> {
    let wb = ctx.workbench()?;
    print_blend(ctx, &wb)
}

fn print_blend(ctx: &Context, wb: &Workbench) -> Result<(), BlendError> {
    if ctx.json() {
        return output::json::print(&output::json::BlendView::from_workbench(wb));
    }
    output::table::print_blend(wb.blend().items(), wb.composition(), wb.analysis());
    Ok(())
}
