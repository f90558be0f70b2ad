use blendlab_core::catalog::Catalog;
use blendlab_core::model::{BlendItem, CompositionResult, EssentialOil, SavedBlend};
use rust_decimal::prelude::ToPrimitive;

const BAR_WIDTH: usize = 30;

pub fn print_catalog(catalog: &Catalog) {
    println!("Oil catalog (v{}), {} oils\n", catalog.version(), catalog.len());
    if let Some(desc) = catalog.description() {
        println!("{desc}\n");
    }

    let width = catalog
        .oils()
        .iter()
        .map(|o| o.id.len())
        .max()
        .unwrap_or(10);
    for oil in catalog.oils() {
        println!(
            "  {:<width$}  {}  ({} components)",
            oil.id,
            oil.name,
            oil.composition.len(),
            width = width
        );
    }
}

pub fn print_oil(oil: &EssentialOil) {
    println!("{} [{}]\n", oil.name, oil.id);

    let width = oil
        .composition
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(10);
    for component in &oil.composition {
        println!(
            "  {:<width$}  {:>6}%",
            component.name,
            component.percentage.to_string(),
            width = width
        );
    }
}

pub fn print_blend(items: &[BlendItem], composition: &[CompositionResult], analysis: &str) {
    if items.is_empty() {
        println!("The blend is empty. Add an oil with `blendlab blend add <OIL>`.");
        return;
    }

    let total: u64 = items.iter().map(|i| u64::from(i.drops)).sum();
    println!("=== Blend ({total} drops) ===\n");
    let width = items
        .iter()
        .map(|i| i.oil.name.chars().count())
        .max()
        .unwrap_or(10);
    for item in items {
        println!(
            "  {:<width$}  {:>3} drop(s)  [{}]",
            item.oil.name,
            item.drops,
            item.oil.id,
            width = width
        );
    }

    println!("\n=== Chemical composition ===\n");
    print_composition(composition);

    if !analysis.is_empty() {
        println!();
        print_analysis(analysis);
    }
}

pub fn print_composition(composition: &[CompositionResult]) {
    let width = composition
        .iter()
        .map(|c| c.name.chars().count())
        .max()
        .unwrap_or(10);

    for c in composition {
        println!(
            "  {:<width$}  {:>6}%  {}",
            c.name,
            c.value.to_string(),
            bar(c),
            width = width
        );
    }
}

pub fn print_analysis(analysis: &str) {
    println!("=== AI analysis ===\n");
    println!("{analysis}");
}

pub fn print_saved_list(blends: &[SavedBlend]) {
    if blends.is_empty() {
        println!("No saved blends.");
        return;
    }

    let width = blends
        .iter()
        .map(|b| b.name.chars().count())
        .max()
        .unwrap_or(10);
    for blend in blends {
        println!(
            "  {}  {:<width$}  {:>2} oil(s), {:>3} drops  {}",
            blend.id,
            blend.name,
            blend.blend.len(),
            blend.total_drops(),
            created(blend),
            width = width
        );
    }
}

pub fn print_saved(blend: &SavedBlend) {
    println!("{} [{}]  {}\n", blend.name, blend.id, created(blend));
    print_blend(&blend.blend, &blend.composition, &blend.analysis);
}

fn created(blend: &SavedBlend) -> String {
    blend
        .created_at()
        .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_default()
}

fn bar(c: &CompositionResult) -> String {
    let pct = c.value.to_f64().unwrap_or(0.0).clamp(0.0, 100.0);
    let len = (pct / 100.0 * BAR_WIDTH as f64).round() as usize;
    "#".repeat(len)
}
