use super::*;
use crate::types::{Depth, DiagramStyle, GenerationRequest, GenerationResult};

fn entry(n: usize) -> HistoryEntry {
    HistoryEntry {
        id: format!("id-{n}"),
        input_summary: format!("topic {n}"),
        diagram_code: format!("graph TD\nA{n} --> B{n}"),
        questions: vec![format!("Q{n}?")],
        created_at: 1_700_000_000_000 + i64::try_from(n).unwrap(),
    }
}

/// Storage that rejects every write, for persistence-failure paths.
#[derive(Default)]
struct ReadOnlyStorage {
    inner: MemoryStorage,
}

impl HistoryStorage for ReadOnlyStorage {
    fn read(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.inner.read(key)
    }

    fn write(&mut self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Write("quota exceeded".into()))
    }

    fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }
}

// =============================================================================
// record
// =============================================================================

#[test]
fn record_prepends_newest_first() {
    let mut store = HistoryStore::new(MemoryStorage::new());
    store.record(entry(1)).unwrap();
    store.record(entry(2)).unwrap();
    store.record(entry(3)).unwrap();
    let ids: Vec<_> = store.entries().iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, ["id-3", "id-2", "id-1"]);
}

#[test]
fn record_caps_at_limit() {
    let mut store = HistoryStore::new(MemoryStorage::new());
    for n in 0..(HISTORY_LIMIT * 2 + 5) {
        store.record(entry(n)).unwrap();
        assert!(store.len() <= HISTORY_LIMIT);
    }
    assert_eq!(store.len(), HISTORY_LIMIT);
    assert_eq!(store.entries()[0].id, format!("id-{}", HISTORY_LIMIT * 2 + 4));
    assert_eq!(store.entries()[HISTORY_LIMIT - 1].id, format!("id-{}", HISTORY_LIMIT + 5));
}

#[test]
fn record_persists_full_list() {
    let mut store = HistoryStore::new(MemoryStorage::new());
    store.record(entry(1)).unwrap();
    store.record(entry(2)).unwrap();

    let raw = store.storage().read(HISTORY_KEY).unwrap().unwrap();
    let persisted: Vec<HistoryEntry> = serde_json::from_str(&raw).unwrap();
    assert_eq!(persisted, store.entries());
}

#[test]
fn record_keeps_memory_when_write_fails() {
    let mut store = HistoryStore::new(ReadOnlyStorage::default());
    let err = store.record(entry(1)).unwrap_err();
    assert!(matches!(err, StorageError::Write(_)));
    assert_eq!(store.len(), 1);
}

// =============================================================================
// restore
// =============================================================================

#[test]
fn open_restores_persisted_entries() {
    let mut store = HistoryStore::new(MemoryStorage::new());
    store.record(entry(1)).unwrap();
    store.record(entry(2)).unwrap();

    let reopened = HistoryStore::open(store.storage().clone());
    assert_eq!(reopened.entries(), store.entries());
}

#[test]
fn open_with_no_key_is_empty() {
    let store = HistoryStore::open(MemoryStorage::new());
    assert!(store.is_empty());
}

#[test]
fn open_with_corrupt_data_is_empty() {
    let mut storage = MemoryStorage::new();
    storage.write(HISTORY_KEY, "{not json").unwrap();
    let store = HistoryStore::open(storage);
    assert!(store.is_empty());
}

#[test]
fn open_with_wrong_shape_is_empty() {
    let mut storage = MemoryStorage::new();
    storage.write(HISTORY_KEY, r#"{"id":"x"}"#).unwrap();
    assert!(HistoryStore::open(storage).is_empty());
}

#[test]
fn open_truncates_oversized_lists() {
    let entries: Vec<_> = (0..30).map(entry).collect();
    let mut storage = MemoryStorage::new();
    storage.write(HISTORY_KEY, &serde_json::to_string(&entries).unwrap()).unwrap();
    let store = HistoryStore::open(storage);
    assert_eq!(store.len(), HISTORY_LIMIT);
    assert_eq!(store.entries()[0].id, "id-0");
}

#[test]
fn open_reads_legacy_entries_without_questions() {
    let raw = r#"[{"id":"a","input":"Cells","diagramCode":"graph TD\nA-->B","timestamp":1700000000000}]"#;
    let mut storage = MemoryStorage::new();
    storage.write(HISTORY_KEY, raw).unwrap();
    let store = HistoryStore::open(storage);
    assert_eq!(store.len(), 1);
    assert_eq!(store.entries()[0].input_summary, "Cells");
    assert!(store.entries()[0].questions.is_empty());
}

// =============================================================================
// clear
// =============================================================================

#[test]
fn clear_empties_memory_and_removes_key() {
    let mut store = HistoryStore::new(MemoryStorage::new());
    store.record(entry(1)).unwrap();
    store.clear().unwrap();
    assert!(store.is_empty());
    assert!(!store.storage().contains(HISTORY_KEY));

    let reopened = HistoryStore::open(store.storage().clone());
    assert!(reopened.is_empty());
}

#[test]
fn clear_empties_memory_even_when_remove_fails() {
    let mut store = HistoryStore::new(ReadOnlyStorage::default());
    store.record(entry(1)).unwrap_err();
    assert!(store.clear().is_err());
    assert!(store.is_empty());
}

// =============================================================================
// HistoryEntry
// =============================================================================

#[test]
fn from_generation_copies_result_and_summary() {
    let request = GenerationRequest {
        text: "Photosynthesis".into(),
        image: None,
        depth: Depth::Detailed,
        style: DiagramStyle::Hierarchical,
    };
    let result = GenerationResult {
        diagram_code: "graph TD\nA[\"Sun\"] --> B[\"Plant\"]".into(),
        questions: vec!["Q1?".into(), "Q2?".into(), "Q3?".into()],
        explanation: None,
    };
    let a = HistoryEntry::from_generation(&request, &result, 42);
    let b = HistoryEntry::from_generation(&request, &result, 42);
    assert_eq!(a.input_summary, "Photosynthesis");
    assert_eq!(a.diagram_code, result.diagram_code);
    assert_eq!(a.questions, result.questions);
    assert_eq!(a.created_at, 42);
    assert_ne!(a.id, b.id);
    assert_eq!(a.to_result(), result);
}

#[test]
fn entry_serializes_legacy_field_names() {
    let json = serde_json::to_value(entry(7)).unwrap();
    assert_eq!(json["input"], "topic 7");
    assert_eq!(json["diagramCode"], "graph TD\nA7 --> B7");
    assert_eq!(json["timestamp"], 1_700_000_000_007_i64);
}

#[test]
fn created_date_formats_utc_day() {
    let mut e = entry(0);
    e.created_at = 1_700_000_000_000; // 2023-11-14T22:13:20Z
    assert_eq!(e.created_date(), "2023-11-14");
    assert_eq!(e.created_time(), "22:13");
    assert_eq!(e.created_label(), "22:13 · 2023-11-14");
}

#[test]
fn out_of_range_timestamp_is_unknown() {
    let mut e = entry(0);
    e.created_at = i64::MAX;
    assert_eq!(e.created_date(), "unknown");
    assert_eq!(e.created_label(), "unknown");
}

#[test]
fn get_finds_by_id() {
    let mut store = HistoryStore::new(MemoryStorage::new());
    store.record(entry(1)).unwrap();
    assert_eq!(store.get("id-1").map(|e| e.input_summary.as_str()), Some("topic 1"));
    assert!(store.get("missing").is_none());
}
