use super::*;
use mapkit::{HISTORY_KEY, HISTORY_LIMIT, HistoryEntry, HistoryStore};

fn temp_path(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("mapmind-cli-{}-{name}", std::process::id()));
    fs::create_dir_all(&dir).unwrap();
    dir.join("history.json")
}

fn entry(id: &str) -> HistoryEntry {
    HistoryEntry {
        id: id.into(),
        input_summary: format!("topic {id}"),
        diagram_code: "graph TD\nA --> B".into(),
        questions: vec!["Q?".into()],
        created_at: 1_700_000_000_000,
    }
}

#[test]
fn missing_file_reads_as_absent() {
    let storage = FileStorage::new(temp_path("missing"));
    assert!(matches!(storage.read(HISTORY_KEY), Ok(None)));
}

#[test]
fn write_read_remove() {
    let path = temp_path("rw");
    let mut storage = FileStorage::new(&path);
    storage.write("a", "1").unwrap();
    storage.write("b", "2").unwrap();
    assert_eq!(storage.read("a").unwrap().as_deref(), Some("1"));

    storage.remove("a").unwrap();
    assert_eq!(storage.read("a").unwrap(), None);
    assert_eq!(storage.read("b").unwrap().as_deref(), Some("2"));

    storage.remove("b").unwrap();
    assert!(!path.exists(), "empty store removes the file");
    storage.remove("b").unwrap();
}

#[test]
fn corrupt_file_is_a_read_error() {
    let path = temp_path("corrupt");
    fs::write(&path, "{not json").unwrap();
    let storage = FileStorage::new(&path);
    assert!(matches!(storage.read(HISTORY_KEY), Err(StorageError::Read(_))));
}

#[test]
fn history_store_round_trips_through_file() {
    let path = temp_path("store");
    let _ = fs::remove_file(&path);

    let mut store = HistoryStore::open(FileStorage::new(&path));
    for i in 0..HISTORY_LIMIT + 3 {
        store.record(entry(&i.to_string())).unwrap();
    }

    let reopened = HistoryStore::open(FileStorage::new(&path));
    assert_eq!(reopened.len(), HISTORY_LIMIT);
    assert_eq!(reopened.entries()[0].id, (HISTORY_LIMIT + 2).to_string());

    let mut reopened = reopened;
    reopened.clear().unwrap();
    assert!(HistoryStore::open(FileStorage::new(&path)).is_empty());
}

#[test]
fn corrupt_file_is_replaced_on_write() {
    let path = temp_path("corrupt-write");
    fs::write(&path, "{not json").unwrap();

    let mut store = HistoryStore::open(FileStorage::new(&path));
    assert!(store.is_empty());
    store.record(entry("fresh")).unwrap();

    let reopened = HistoryStore::open(FileStorage::new(&path));
    assert_eq!(reopened.len(), 1);
    assert_eq!(reopened.entries()[0].id, "fresh");
}

#[test]
fn clear_removes_corrupt_file() {
    let path = temp_path("corrupt-clear");
    fs::write(&path, "{not json").unwrap();

    let mut store = HistoryStore::open(FileStorage::new(&path));
    store.clear().unwrap();
    assert!(!path.exists());
}
