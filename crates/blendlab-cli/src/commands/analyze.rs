use blendlab_core::analysis::gemini::GeminiClient;
use blendlab_core::error::BlendError;

use super::Context;
use crate::{output, prompt};

pub fn run(ctx: &Context, model: Option<String>) -> Result<(), BlendError> {
    let mut wb = ctx.workbench()?;
    let client = GeminiClient::new(&ctx.settings(model))?;

    if !ctx.json() {
        eprintln!("Analyzing {} component(s)...", wb.composition().len());
    }

    let first = wb.analyze(&client).map(|_| ());
    match first {
        Ok(()) => {}
        Err(e) if e.is_missing_credential() && prompt::interactive() => {
            eprintln!("No API key configured. Get one at https://aistudio.google.com/apikey");
            let key = prompt::ask("Gemini API key: ").unwrap_or_default();
            if key.trim().is_empty() {
                return Err(e);
            }
            wb.credentials().save(&key)?;
            wb.analyze(&client)?;
        }
        Err(e) => return Err(e),
    }

    if ctx.json() {
        return output::json::print(&output::json::BlendView::from_workbench(&wb));
    }
    output::table::print_analysis(wb.analysis());
    Ok(())
}
