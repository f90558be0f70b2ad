use blendlab_core::error::BlendError;
use blendlab_core::model::{BlendItem, CompositionResult};
use blendlab_core::Workbench;
use serde::Serialize;

pub fn print<T: Serialize + ?Sized>(value: &T) -> Result<(), BlendError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}

/// The working blend as one JSON document.
#[derive(Serialize)]
pub struct BlendView<'a> {
    pub blend: &'a [BlendItem],
    pub total_drops: u64,
    pub composition: &'a [CompositionResult],
    pub analysis: &'a str,
}

impl<'a> BlendView<'a> {
    pub fn from_workbench(wb: &'a Workbench) -> Self {
        Self {
            blend: wb.blend().items(),
            total_drops: wb.blend().total_drops(),
            composition: wb.composition(),
            analysis: wb.analysis(),
        }
    }
}
