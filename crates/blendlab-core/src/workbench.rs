use crate::aggregate::aggregate;
use crate::analysis::{self, TextGenerator};
use crate::blend::Blend;
use crate::catalog::Catalog;
use crate::credential::CredentialStore;
use crate::error::BlendError;
use crate::model::{BlendItem, CompositionResult, SavedBlend, WorkingState};
use crate::saved::{DeleteOutcome, SavedBlendRepository};
use crate::storage::{KeyValueStore, WORKING_STATE_KEY};
use std::sync::Arc;

/// Owns the blend under construction, its derived composition, the current
/// analysis, the saved blends and the API key.
///
/// Every blend mutation recomputes the composition and discards the analysis
/// before returning, so readers never see a stale pair. `analyze` borrows the
/// workbench mutably, which rules out a second request while one is in flight.
pub struct Workbench {
    catalog: Catalog,
    store: Arc<dyn KeyValueStore>,
    blend: Blend,
    composition: Vec<CompositionResult>,
    analysis: String,
    saved: SavedBlendRepository,
    credentials: CredentialStore,
}

impl Workbench {
    /// Restore persisted state from `store`. Corrupt state is logged and replaced by an empty one.
    pub fn open(catalog: Catalog, store: Arc<dyn KeyValueStore>) -> Self {
        let working = load_working_state(store.as_ref());
        let blend = Blend::from_items(working.blend);
        let (blend, composition, analysis) = match aggregate(blend.items()) {
            Ok(composition) => (blend, composition, working.analysis),
            Err(e) => {
                tracing::warn!(error = %e, "working blend cannot be composed, starting with an empty blend");
                (Blend::new(), Vec::new(), String::new())
            }
        };

        tracing::debug!(
            backend = store.backend_name(),
            items = blend.len(),
            "opened workbench"
        );

        Self {
            catalog,
            saved: SavedBlendRepository::open(Arc::clone(&store)),
            credentials: CredentialStore::new(Arc::clone(&store)),
            store,
            blend,
            composition,
            analysis,
        }
    }

    /// Read the fallback API key from another environment variable, or from none.
    pub fn with_key_env_var(mut self, name: Option<&str>) -> Self {
        self.credentials = self.credentials.with_env_var(name);
        self
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn blend(&self) -> &Blend {
        &self.blend
    }

    pub fn composition(&self) -> &[CompositionResult] {
        &self.composition
    }

    /// Current analysis text; empty when the blend changed since the last analysis.
    pub fn analysis(&self) -> &str {
        &self.analysis
    }

    pub fn saved(&self) -> &SavedBlendRepository {
        &self.saved
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    /// Add one drop of a catalog oil.
    pub fn add_oil(&mut self, oil_id: &str) -> Result<(), BlendError> {
        let oil = self
            .catalog
            .get(oil_id)
            .cloned()
            .ok_or_else(|| BlendError::UnknownOil(oil_id.to_string()))?;
        let mut next = self.blend.clone();
        next.add_oil(oil);
        self.commit_blend(next)
    }

    /// Set the drop count of an oil already in the blend.
    ///
    /// Returns `false` (and changes nothing) when `drops < 1` or the oil is not in the blend.
    pub fn set_drops(&mut self, oil_id: &str, drops: u32) -> Result<bool, BlendError> {
        let mut next = self.blend.clone();
        if !next.set_drops(oil_id, drops) {
            return Ok(false);
        }
        self.commit_blend(next)?;
        Ok(true)
    }

    /// Returns `false` when the oil was not in the blend.
    pub fn remove_oil(&mut self, oil_id: &str) -> Result<bool, BlendError> {
        let mut next = self.blend.clone();
        if !next.remove_oil(oil_id) {
            return Ok(false);
        }
        self.commit_blend(next)?;
        Ok(true)
    }

    /// Analyze the current composition. On failure the previous analysis is kept.
    pub fn analyze(&mut self, generator: &dyn TextGenerator) -> Result<&str, BlendError> {
        if self.composition.is_empty() {
            return Err(BlendError::EmptyBlend);
        }
        let lookup = self.credentials.lookup()?;
        tracing::debug!(source = lookup.source.as_str(), "resolved API key");

        let text = analysis::analyze(generator, &self.composition, lookup.key.as_deref())?;
        self.write_working_state(self.blend.items(), &text)?;
        self.analysis = text;
        Ok(&self.analysis)
    }

    /// Save the current blend, composition and analysis under `name`.
    pub fn save(&mut self, name: &str) -> Result<&SavedBlend, BlendError> {
        self.saved.save(
            name,
            self.blend.items(),
            &self.composition,
            &self.analysis,
        )
    }

    /// Replace the working blend and analysis with a saved snapshot.
    ///
    /// Nothing changes unless the snapshot composes and the new state is written.
    pub fn load(&mut self, id: &str) -> Result<&SavedBlend, BlendError> {
        let snapshot = self.saved.load(id)?.clone();

        let blend = Blend::from_items(snapshot.blend.clone());
        let composition = aggregate(blend.items())?;
        if composition != snapshot.composition {
            tracing::debug!(id, "saved composition differs from recomputed one, using recomputed");
        }
        self.write_working_state(blend.items(), &snapshot.analysis)?;

        self.blend = blend;
        self.composition = composition;
        self.analysis = snapshot.analysis;

        tracing::info!(id, name = %snapshot.name, "loaded saved blend");
        self.saved.load(id)
    }

    /// Delete a saved blend once `confirm` agrees.
    pub fn delete_saved<F>(&mut self, id: &str, confirm: F) -> Result<DeleteOutcome, BlendError>
    where
        F: FnOnce(&SavedBlend) -> bool,
    {
        self.saved.delete(id, confirm)
    }

    /// Compose and persist `next`, then make it the working blend with no analysis.
    fn commit_blend(&mut self, next: Blend) -> Result<(), BlendError> {
        let composition = aggregate(next.items())?;
        self.write_working_state(next.items(), "")?;

        self.blend = next;
        self.composition = composition;
        self.analysis.clear();
        tracing::debug!(
            items = self.blend.len(),
            total_drops = self.blend.total_drops(),
            components = self.composition.len(),
            "recomputed composition"
        );
        Ok(())
    }

    fn write_working_state(&self, blend: &[BlendItem], analysis: &str) -> Result<(), BlendError> {
        let state = WorkingState {
            blend: blend.to_vec(),
            analysis: analysis.to_string(),
        };
        let json = serde_json::to_string(&state)?;
        self.store.set(WORKING_STATE_KEY, &json)
    }
}

fn load_working_state(store: &dyn KeyValueStore) -> WorkingState {
    match store.get(WORKING_STATE_KEY) {
        Ok(Some(json)) => serde_json::from_str(&json).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "working blend is corrupt, starting with an empty blend");
            WorkingState::default()
        }),
        Ok(None) => WorkingState::default(),
        Err(e) => {
            tracing::warn!(error = %e, "failed to read working blend, starting with an empty blend");
            WorkingState::default()
        }
    }
}
