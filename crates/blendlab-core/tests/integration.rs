//! End-to-end tests for the workbench: compose, analyze, save, load, delete.
//!
//! Uses a MockGenerator that returns canned text without calling the Gemini
//! API, and an in-memory or temporary-directory store.

use blendlab_core::analysis::{TextGenerator, NO_RESULT};
use blendlab_core::catalog::{self, builtin};
use blendlab_core::credential::{KeySource, API_KEY_ENV};
use blendlab_core::error::BlendError;
use blendlab_core::saved::DeleteOutcome;
use blendlab_core::storage::{FileStore, KeyValueStore, MemoryStore, CREDENTIAL_KEY};
use blendlab_core::{open_workbench, Workbench};
use rust_decimal_macros::dec;
use std::sync::{Arc, Mutex};

struct MockGenerator {
    reply: Result<String, String>,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockGenerator {
    fn replying(text: &str) -> Self {
        Self {
            reply: Ok(text.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn failing(message: &str) -> Self {
        Self {
            reply: Err(message.to_string()),
            calls: Mutex::new(Vec::new()),
        }
    }

    fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl TextGenerator for MockGenerator {
    fn generate(&self, api_key: &str, prompt: &str) -> Result<String, BlendError> {
        self.calls
            .lock()
            .unwrap()
            .push((api_key.to_string(), prompt.to_string()));
        self.reply.clone().map_err(BlendError::Service)
    }

    fn model(&self) -> &str {
        "mock"
    }
}

const TWO_OIL_CATALOG: &str = r#"{
    "version": "test",
    "oils": [
        {
            "id": "a",
            "name": "Oil A",
            "composition": [
                { "name": "Linalool", "percentage": "70" },
                { "name": "Limonene", "percentage": "30" }
            ]
        },
        {
            "id": "b",
            "name": "Oil B",
            "composition": [ { "name": "Limonene", "percentage": "100" } ]
        }
    ]
}"#;

fn workbench_with_key() -> (Arc<MemoryStore>, Workbench) {
    let store = Arc::new(MemoryStore::new());
    let catalog = catalog::parse_catalog_str(TWO_OIL_CATALOG).unwrap();
    let wb = Workbench::open(catalog, store.clone());
    wb.credentials().save("test-key").unwrap();
    (store, wb)
}

// ---------------------------------------------------------------------------
// Test 1: Two-oil blend, composition and prompt
// ---------------------------------------------------------------------------
#[test]
fn two_oil_blend_composition_and_prompt() {
    let (_store, mut wb) = workbench_with_key();
    wb.add_oil("a").unwrap();
    wb.add_oil("a").unwrap();
    wb.add_oil("b").unwrap();

    let comp = wb.composition();
    assert_eq!(comp.len(), 2);
    assert_eq!(comp[0].name, "Limonene");
    assert_eq!(comp[0].value, dec!(53.33));
    assert_eq!(comp[1].name, "Linalool");
    assert_eq!(comp[1].value, dec!(46.67));

    let generator = MockGenerator::replying("## 분석 결과");
    let text = wb.analyze(&generator).unwrap().to_string();
    assert_eq!(text, "## 분석 결과");

    let calls = generator.calls.lock().unwrap();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, "test-key");
    assert!(calls[0].1.contains("Limonene: 53.33%, Linalool: 46.67%"));
}

// ---------------------------------------------------------------------------
// Test 2: Any blend mutation invalidates the analysis
// ---------------------------------------------------------------------------
#[test]
fn mutation_clears_analysis() {
    let (_store, mut wb) = workbench_with_key();
    let generator = MockGenerator::replying("analysis");

    wb.add_oil("a").unwrap();
    wb.analyze(&generator).unwrap();
    assert_eq!(wb.analysis(), "analysis");
    wb.add_oil("b").unwrap();
    assert_eq!(wb.analysis(), "");

    wb.analyze(&generator).unwrap();
    wb.set_drops("b", 3).unwrap();
    assert_eq!(wb.analysis(), "");

    wb.analyze(&generator).unwrap();
    wb.remove_oil("a").unwrap();
    assert_eq!(wb.analysis(), "");
}

// ---------------------------------------------------------------------------
// Test 3: Rejected set_drops does not invalidate the analysis
// ---------------------------------------------------------------------------
#[test]
fn rejected_set_drops_keeps_analysis() {
    let (_store, mut wb) = workbench_with_key();
    wb.add_oil("a").unwrap();
    wb.analyze(&MockGenerator::replying("keep me")).unwrap();

    assert!(!wb.set_drops("a", 0).unwrap());
    assert!(!wb.remove_oil("b").unwrap());
    assert_eq!(wb.analysis(), "keep me");
}

// ---------------------------------------------------------------------------
// Test 4: Missing credential is distinguishable and sends nothing
// ---------------------------------------------------------------------------
#[test]
fn missing_credential_is_distinct() {
    let (_store, wb) = workbench_with_key();
    let mut wb = wb.with_key_env_var(None);
    wb.credentials().remove().unwrap();
    wb.add_oil("a").unwrap();

    let generator = MockGenerator::replying("unused");
    let err = wb.analyze(&generator).unwrap_err();
    assert!(err.is_missing_credential());
    assert_eq!(generator.call_count(), 0);
}

// ---------------------------------------------------------------------------
// Test 5: Service failure leaves the blend and prior analysis untouched
// ---------------------------------------------------------------------------
#[test]
fn service_failure_keeps_state() {
    let (_store, mut wb) = workbench_with_key();
    wb.add_oil("a").unwrap();
    wb.analyze(&MockGenerator::replying("first")).unwrap();

    let failing = MockGenerator::failing("Gemini API returned 503: overloaded");
    let err = wb.analyze(&failing).unwrap_err();
    assert!(matches!(err, BlendError::Service(_)));
    assert_eq!(failing.call_count(), 1);
    assert_eq!(wb.analysis(), "first");
    assert_eq!(wb.blend().get("a").unwrap().drops, 1);
}

// ---------------------------------------------------------------------------
// Test 6: Empty reply becomes the fixed fallback text
// ---------------------------------------------------------------------------
#[test]
fn empty_reply_uses_fallback() {
    let (_store, mut wb) = workbench_with_key();
    wb.add_oil("b").unwrap();
    let text = wb.analyze(&MockGenerator::replying("")).unwrap();
    assert_eq!(text, NO_RESULT);
}

// ---------------------------------------------------------------------------
// Test 7: Saving requires a name, a blend and an analysis
// ---------------------------------------------------------------------------
#[test]
fn save_validation() {
    let (_store, mut wb) = workbench_with_key();
    assert!(matches!(wb.save("X"), Err(BlendError::Validation(_))));

    wb.add_oil("a").unwrap();
    assert!(matches!(wb.save("X"), Err(BlendError::Validation(_))));

    wb.analyze(&MockGenerator::replying("analysis text")).unwrap();
    assert!(matches!(wb.save(""), Err(BlendError::Validation(_))));
    assert!(wb.saved().list().is_empty());

    let saved = wb.save("Calm").unwrap();
    assert_eq!(saved.name, "Calm");
    assert_eq!(saved.analysis, "analysis text");
    assert_eq!(wb.saved().list().len(), 1);
}

// ---------------------------------------------------------------------------
// Test 8: Loading replaces the working state instead of merging
// ---------------------------------------------------------------------------
#[test]
fn load_replaces_working_state() {
    let (_store, mut wb) = workbench_with_key();
    wb.add_oil("a").unwrap();
    wb.set_drops("a", 2).unwrap();
    wb.analyze(&MockGenerator::replying("saved analysis")).unwrap();
    let id = wb.save("Only A").unwrap().id.clone();
    let saved_composition = wb.composition().to_vec();

    wb.remove_oil("a").unwrap();
    wb.add_oil("b").unwrap();
    wb.add_oil("b").unwrap();

    wb.load(&id).unwrap();
    assert_eq!(wb.blend().len(), 1);
    assert_eq!(wb.blend().get("a").unwrap().drops, 2);
    assert!(wb.blend().get("b").is_none());
    assert_eq!(wb.analysis(), "saved analysis");
    assert_eq!(wb.composition(), saved_composition.as_slice());

    assert!(matches!(wb.load("missing"), Err(BlendError::NotFound(_))));
}

// ---------------------------------------------------------------------------
// Test 9: Delete removes exactly one entry; missing ids are a no-op
// ---------------------------------------------------------------------------
#[test]
fn delete_exactly_one() {
    let (_store, mut wb) = workbench_with_key();
    wb.add_oil("a").unwrap();
    wb.analyze(&MockGenerator::replying("x")).unwrap();
    let first = wb.save("first").unwrap().id.clone();
    let second = wb.save("second").unwrap().id.clone();
    let third = wb.save("third").unwrap().id.clone();

    assert_eq!(
        wb.delete_saved("nope", |_| true).unwrap(),
        DeleteOutcome::NotFound
    );
    assert_eq!(wb.saved().list().len(), 3);

    assert_eq!(
        wb.delete_saved(&second, |_| false).unwrap(),
        DeleteOutcome::Declined
    );
    assert_eq!(wb.saved().list().len(), 3);

    assert_eq!(
        wb.delete_saved(&second, |_| true).unwrap(),
        DeleteOutcome::Deleted
    );
    let ids: Vec<&str> = wb.saved().list().iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec![first.as_str(), third.as_str()]);
}

// ---------------------------------------------------------------------------
// Test 10: Everything persists through the file store
// ---------------------------------------------------------------------------
#[test]
fn file_store_persists_across_sessions() {
    let dir = tempfile::tempdir().unwrap();

    {
        let mut wb = open_workbench(dir.path(), None).unwrap();
        wb.credentials().save("AIzaPersisted").unwrap();
        wb.add_oil("lavender").unwrap();
        wb.add_oil("bergamot").unwrap();
        wb.analyze(&MockGenerator::replying("relaxing")).unwrap();
        wb.save("Evening").unwrap();
    }

    let wb = open_workbench(dir.path(), None).unwrap();
    assert_eq!(wb.blend().len(), 2);
    assert_eq!(wb.analysis(), "relaxing");
    assert_eq!(wb.saved().list().len(), 1);
    assert_eq!(wb.saved().list()[0].name, "Evening");
    assert_eq!(
        wb.credentials().get().unwrap().as_deref(),
        Some("AIzaPersisted")
    );

    let raw = FileStore::new(dir.path()).get(CREDENTIAL_KEY).unwrap().unwrap();
    assert!(!raw.contains("AIzaPersisted"));
}

// ---------------------------------------------------------------------------
// Test 11: Corrupt saved blends do not prevent startup
// ---------------------------------------------------------------------------
#[test]
fn corrupt_saved_blends_recovered() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("essentialOilBlends"), "not json at all").unwrap();

    let mut wb = open_workbench(dir.path(), None).unwrap();
    assert!(wb.saved().list().is_empty());
    assert!(dir.path().join("essentialOilBlends.corrupt").exists());

    wb.credentials().save("k").unwrap();
    wb.add_oil("lemon").unwrap();
    wb.analyze(&MockGenerator::replying("fresh")).unwrap();
    wb.save("Fresh").unwrap();
    assert_eq!(wb.saved().list().len(), 1);
}

// ---------------------------------------------------------------------------
// Test 12: Custom catalog file
// ---------------------------------------------------------------------------
#[test]
fn custom_catalog_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let catalog_path = dir.path().join("oils.json");
    std::fs::write(&catalog_path, TWO_OIL_CATALOG).unwrap();

    let mut wb = open_workbench(&dir.path().join("data"), Some(&catalog_path)).unwrap();
    assert_eq!(wb.catalog().len(), 2);
    wb.add_oil("b").unwrap();
    assert!(matches!(wb.add_oil("lavender"), Err(BlendError::UnknownOil(_))));
    assert!(builtin::catalog().get("lavender").is_some());
}

// ---------------------------------------------------------------------------
// Test 13: Environment key is used when none is stored
// ---------------------------------------------------------------------------
#[test]
fn environment_key_fallback() {
    let (_store, wb) = workbench_with_key();
    wb.credentials().remove().unwrap();

    let lookup = wb
        .credentials()
        .lookup_with(|name| (name == API_KEY_ENV).then(|| "env-key".to_string()))
        .unwrap();
    assert_eq!(lookup.key.as_deref(), Some("env-key"));
    assert_eq!(lookup.source, KeySource::Environment);

    let lookup = wb.credentials().lookup_with(|_| None).unwrap();
    assert_eq!(lookup.source, KeySource::None);
}

// ---------------------------------------------------------------------------
// Test 14: Out-of-range catalog values fail the mutation and change nothing
// ---------------------------------------------------------------------------
const HUGE_CATALOG: &str = r#"{
    "version": "test",
    "oils": [
        {
            "id": "a",
            "name": "Oil A",
            "composition": [ { "name": "Huge", "percentage": "79228162514264337593543950335" } ]
        }
    ]
}"#;

#[test]
fn overflowing_blend_is_rejected_without_change() {
    let store = Arc::new(MemoryStore::new());
    let catalog = catalog::parse_catalog_str(HUGE_CATALOG).unwrap();
    let mut wb = Workbench::open(catalog, store.clone());

    wb.add_oil("a").unwrap();
    let before = wb.composition().to_vec();

    let err = wb.set_drops("a", 1000).unwrap_err();
    assert!(matches!(err, BlendError::Overflow(_)));
    assert_eq!(wb.blend().get("a").unwrap().drops, 1);
    assert_eq!(wb.composition(), before.as_slice());

    // The persisted blend was not touched either.
    let reopened = Workbench::open(catalog::parse_catalog_str(HUGE_CATALOG).unwrap(), store);
    assert_eq!(reopened.blend().get("a").unwrap().drops, 1);
}
