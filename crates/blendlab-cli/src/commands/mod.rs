pub mod analyze;
pub mod blend;
pub mod key;
pub mod oils;
pub mod saved;

use blendlab_core::config::{Settings, SettingsManager};
use blendlab_core::error::BlendError;
use blendlab_core::Workbench;
use std::path::{Path, PathBuf};

/// Options shared by every subcommand.
pub struct Context {
    data_dir: PathBuf,
    catalog: Option<PathBuf>,
    output: String,
}

impl Context {
    pub fn new(data_dir: Option<PathBuf>, catalog: Option<PathBuf>, output: String) -> Self {
        let data_dir = data_dir.unwrap_or_else(default_data_dir);
        tracing::debug!(data_dir = %data_dir.display(), "using data directory");
        Self {
            data_dir,
            catalog,
            output,
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn json(&self) -> bool {
        self.output == "json"
    }

    pub fn workbench(&self) -> Result<Workbench, BlendError> {
        blendlab_core::open_workbench(&self.data_dir, self.catalog.as_deref())
    }

    /// Settings from `settings.json`, with the model optionally overridden.
    pub fn settings(&self, model: Option<String>) -> Settings {
        let mut settings = SettingsManager::in_dir(&self.data_dir).load();
        if let Some(model) = model {
            settings.model = model;
        }
        settings
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|d| d.join("blendlab"))
        .unwrap_or_else(|| PathBuf::from(".blendlab"))
}
