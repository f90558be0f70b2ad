use crate::model::{BlendItem, EssentialOil};
use std::sync::Arc;

/// The blend under construction: ordered, unique by oil id, every item >= 1 drop.
///
/// Mutators report whether anything changed so the owner can recompute the
/// composition and discard a stale analysis.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Blend {
    items: Vec<BlendItem>,
}

impl Blend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a blend from a snapshot, merging duplicate oil ids and dropping
    /// zero-drop lines so the invariants hold for hand-edited data.
    pub fn from_items(items: Vec<BlendItem>) -> Self {
        let mut blend = Blend::new();
        for item in items {
            if item.drops == 0 {
                continue;
            }
            match blend.position(&item.oil.id) {
                Some(idx) => {
                    let existing = &mut blend.items[idx];
                    existing.drops = existing.drops.saturating_add(item.drops);
                }
                None => blend.items.push(item),
            }
        }
        blend
    }

    /// Add one drop of `oil`, appending a new line if the oil is not yet present.
    pub fn add_oil(&mut self, oil: Arc<EssentialOil>) -> bool {
        match self.position(&oil.id) {
            Some(idx) => {
                let item = &mut self.items[idx];
                item.drops = item.drops.saturating_add(1);
            }
            None => self.items.push(BlendItem { oil, drops: 1 }),
        }
        true
    }

    /// Replace the drop count in place. Counts below 1 are rejected as a no-op.
    pub fn set_drops(&mut self, oil_id: &str, drops: u32) -> bool {
        if drops < 1 {
            return false;
        }
        match self.position(oil_id) {
            Some(idx) => {
                self.items[idx].drops = drops;
                true
            }
            None => false,
        }
    }

    pub fn remove_oil(&mut self, oil_id: &str) -> bool {
        match self.position(oil_id) {
            Some(idx) => {
                self.items.remove(idx);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, oil_id: &str) -> Option<&BlendItem> {
        self.items.iter().find(|item| item.oil.id == oil_id)
    }

    pub fn items(&self) -> &[BlendItem] {
        &self.items
    }

    pub fn total_drops(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.drops)).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    fn position(&self, oil_id: &str) -> Option<usize> {
        self.items.iter().position(|item| item.oil.id == oil_id)
    }
}
