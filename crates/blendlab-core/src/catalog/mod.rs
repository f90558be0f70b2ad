pub mod builtin;
pub mod schema;

use crate::error::BlendError;
use crate::model::EssentialOil;
use schema::CatalogDef;
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// Read-only reference list of oils, addressed by id.
#[derive(Debug, Clone)]
pub struct Catalog {
    version: String,
    description: Option<String>,
    oils: Vec<Arc<EssentialOil>>,
}

impl Catalog {
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Oils in catalog order.
    pub fn oils(&self) -> &[Arc<EssentialOil>] {
        &self.oils
    }

    pub fn get(&self, id: &str) -> Option<&Arc<EssentialOil>> {
        self.oils.iter().find(|oil| oil.id == id)
    }

    pub fn len(&self) -> usize {
        self.oils.len()
    }

    pub fn is_empty(&self) -> bool {
        self.oils.is_empty()
    }
}

impl From<CatalogDef> for Catalog {
    fn from(def: CatalogDef) -> Self {
        Catalog {
            version: def.version,
            description: def.description,
            oils: def.oils.into_iter().map(Arc::new).collect(),
        }
    }
}

/// Load a catalog from a JSON file.
pub fn load_catalog(path: &Path) -> Result<Catalog, BlendError> {
    let content = std::fs::read_to_string(path).map_err(|e| BlendError::CatalogLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_catalog(&content, path)
}

/// Parse a catalog from a JSON string, reporting errors against `source`.
pub fn parse_catalog(json: &str, source: &Path) -> Result<Catalog, BlendError> {
    let def: CatalogDef = serde_json::from_str(json).map_err(|e| BlendError::CatalogLoad {
        path: source.to_path_buf(),
        reason: e.to_string(),
    })?;
    validate_catalog(&def)?;
    Ok(def.into())
}

/// Parse a catalog from a JSON string (no file path context).
pub fn parse_catalog_str(json: &str) -> Result<Catalog, BlendError> {
    let def: CatalogDef = serde_json::from_str(json)?;
    validate_catalog(&def)?;
    Ok(def.into())
}

/// Validate that a catalog is well-formed.
///
/// Percentages are reference data and are deliberately not range-checked.
pub fn validate_catalog(def: &CatalogDef) -> Result<(), BlendError> {
    if def.oils.is_empty() {
        return Err(BlendError::CatalogInvalid("oils must not be empty".into()));
    }

    let mut seen = HashSet::new();
    for oil in &def.oils {
        if oil.id.trim().is_empty() {
            return Err(BlendError::CatalogInvalid("oil id must not be empty".into()));
        }
        if !seen.insert(oil.id.as_str()) {
            return Err(BlendError::CatalogInvalid(format!(
                "duplicate oil id '{}'",
                oil.id
            )));
        }
        if oil.name.trim().is_empty() {
            return Err(BlendError::CatalogInvalid(format!(
                "oil '{}' has an empty name",
                oil.id
            )));
        }
        if oil.composition.is_empty() {
            return Err(BlendError::CatalogInvalid(format!(
                "oil '{}' has no composition",
                oil.id
            )));
        }
        if oil.composition.iter().any(|c| c.name.trim().is_empty()) {
            return Err(BlendError::CatalogInvalid(format!(
                "oil '{}' has a component with an empty name",
                oil.id
            )));
        }
    }

    Ok(())
}
