use crate::model::EssentialOil;
use serde::{Deserialize, Serialize};

/// On-disk catalog format: a versioned list of oils.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogDef {
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    pub oils: Vec<EssentialOil>,
}
