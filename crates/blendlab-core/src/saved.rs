use crate::error::BlendError;
use crate::model::{BlendItem, CompositionResult, SavedBlend};
use crate::storage::{KeyValueStore, SAVED_BLENDS_KEY};
use std::sync::Arc;

/// Outcome of a confirmed delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The user answered no; nothing changed.
    Declined,
    /// No saved blend has that id; nothing changed and no confirmation was asked.
    NotFound,
}

/// Named blend snapshots, persisted as one JSON list.
pub struct SavedBlendRepository {
    store: Arc<dyn KeyValueStore>,
    blends: Vec<SavedBlend>,
}

impl SavedBlendRepository {
    /// Read the persisted list. Corrupt data is moved aside and replaced by an empty list.
    pub fn open(store: Arc<dyn KeyValueStore>) -> Self {
        let blends = match store.get(SAVED_BLENDS_KEY) {
            Ok(Some(json)) => match serde_json::from_str::<Vec<SavedBlend>>(&json) {
                Ok(blends) => blends,
                Err(e) => {
                    tracing::warn!(error = %e, "saved blends are corrupt, starting with an empty list");
                    let backup_key = format!("{SAVED_BLENDS_KEY}.corrupt");
                    if let Err(e) = store.set(&backup_key, &json) {
                        tracing::error!(error = %e, "failed to back up corrupt saved blends");
                    }
                    Vec::new()
                }
            },
            Ok(None) => Vec::new(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read saved blends, starting with an empty list");
                Vec::new()
            }
        };

        tracing::debug!(count = blends.len(), "loaded saved blends");
        Self { store, blends }
    }

    /// All saved blends, oldest first.
    pub fn list(&self) -> &[SavedBlend] {
        &self.blends
    }

    pub fn get(&self, id: &str) -> Option<&SavedBlend> {
        self.blends.iter().find(|b| b.id == id)
    }

    /// Snapshot a blend under `name`. A blend must be analyzed before it can be saved.
    pub fn save(
        &mut self,
        name: &str,
        blend: &[BlendItem],
        composition: &[CompositionResult],
        analysis: &str,
    ) -> Result<&SavedBlend, BlendError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(BlendError::Validation(
                "blend name must not be empty".into(),
            ));
        }
        if blend.is_empty() {
            return Err(BlendError::Validation(
                "cannot save an empty blend. Add oils and analyze it first".into(),
            ));
        }
        if analysis.trim().is_empty() {
            return Err(BlendError::Validation(
                "cannot save a blend without an analysis. Run `blendlab analyze` first".into(),
            ));
        }

        let saved = SavedBlend {
            id: self.next_id(),
            name: name.to_string(),
            blend: blend.to_vec(),
            composition: composition.to_vec(),
            analysis: analysis.to_string(),
        };

        let mut blends = self.blends.clone();
        blends.push(saved);
        self.persist(&blends)?;
        self.blends = blends;

        let saved = &self.blends[self.blends.len() - 1];
        tracing::info!(id = %saved.id, name = %saved.name, "saved blend");
        Ok(saved)
    }

    pub fn load(&self, id: &str) -> Result<&SavedBlend, BlendError> {
        self.get(id)
            .ok_or_else(|| BlendError::NotFound(id.to_string()))
    }

    /// Delete after the caller's yes/no confirmation.
    pub fn delete<F>(&mut self, id: &str, confirm: F) -> Result<DeleteOutcome, BlendError>
    where
        F: FnOnce(&SavedBlend) -> bool,
    {
        let Some(idx) = self.blends.iter().position(|b| b.id == id) else {
            return Ok(DeleteOutcome::NotFound);
        };
        if !confirm(&self.blends[idx]) {
            return Ok(DeleteOutcome::Declined);
        }

        let mut blends = self.blends.clone();
        let removed = blends.remove(idx);
        self.persist(&blends)?;
        self.blends = blends;

        tracing::info!(id = %removed.id, name = %removed.name, "deleted saved blend");
        Ok(DeleteOutcome::Deleted)
    }

    fn persist(&self, blends: &[SavedBlend]) -> Result<(), BlendError> {
        let json = serde_json::to_string(blends)?;
        self.store.set(SAVED_BLENDS_KEY, &json)
    }

    /// Milliseconds since the epoch, bumped past any id already in use.
    fn next_id(&self) -> String {
        let mut candidate = chrono::Utc::now().timestamp_millis();
        while self.blends.iter().any(|b| b.id == candidate.to_string()) {
            candidate += 1;
        }
        candidate.to_string()
    }
}
