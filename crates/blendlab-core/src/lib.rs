pub mod aggregate;
pub mod analysis;
pub mod blend;
pub mod catalog;
pub mod config;
pub mod credential;
pub mod error;
pub mod model;
pub mod saved;
pub mod storage;
pub mod workbench;

pub use aggregate::aggregate;
pub use workbench::Workbench;

use catalog::Catalog;
use error::BlendError;
use std::path::Path;
use std::sync::Arc;
use storage::FileStore;

/// Main API entry point: open the workbench persisted in `data_dir`.
///
/// Uses the built-in catalog unless `catalog_path` names a custom catalog file.
pub fn open_workbench(data_dir: &Path, catalog_path: Option<&Path>) -> Result<Workbench, BlendError> {
    let catalog = load_catalog_or_builtin(catalog_path)?;
    let store = Arc::new(FileStore::new(data_dir));
    Ok(Workbench::open(catalog, store))
}

/// The custom catalog at `path`, or the built-in one.
pub fn load_catalog_or_builtin(path: Option<&Path>) -> Result<Catalog, BlendError> {
    match path {
        Some(path) => {
            let catalog = catalog::load_catalog(path)?;
            tracing::info!(path = %path.display(), oils = catalog.len(), "loaded custom catalog");
            Ok(catalog)
        }
        None => Ok(catalog::builtin::catalog().clone()),
    }
}
