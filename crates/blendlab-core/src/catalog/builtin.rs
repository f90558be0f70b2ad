use super::Catalog;
use std::sync::LazyLock;

const ESSENTIAL_OILS_JSON: &str = include_str!("../../../../catalog/essential-oils.json");

static BUILTIN_CATALOG: LazyLock<Catalog> = LazyLock::new(|| {
    super::parse_catalog_str(ESSENTIAL_OILS_JSON).expect("embedded essential-oils.json is valid")
});

/// The catalog shipped with the crate.
pub fn catalog() -> &'static Catalog {
    &BUILTIN_CATALOG
}
