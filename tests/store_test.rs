//! Tests for the on-disk stores.

use std::collections::BTreeMap;
use std::fs;
use tempfile::TempDir;

use spy_party::{Catalog, JsonFileStore, PersistenceStore, PlayerLibrary, TopicLibrary};

#[test]
fn test_topic_catalog_round_trip() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("nested").join("topic_data.json");

    let mut catalog = Catalog::with_defaults();
    catalog
        .add_or_replace("Rivers", vec!["Nile".to_string(), "Amazon".to_string()])
        .expect("Add failed");
    TopicLibrary::new(JsonFileStore::new(&path))
        .save_catalog(&catalog)
        .expect("Save failed");

    let loaded = TopicLibrary::new(JsonFileStore::new(&path))
        .load_catalog()
        .expect("Load failed");
    assert_eq!(loaded, catalog);
}

#[test]
fn test_stored_category_replaces_default() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("topic_data.json");
    let default_name = Catalog::with_defaults().names()[0].clone();
    let mut stored = BTreeMap::new();
    stored.insert(default_name.clone(), vec!["Only One"]);
    fs::write(&path, serde_json::json!({ "topics": stored }).to_string()).expect("Write failed");

    let loaded = TopicLibrary::new(JsonFileStore::new(&path))
        .load_catalog()
        .expect("Load failed");
    assert_eq!(loaded.get(&default_name).unwrap(), ["Only One"]);
    assert_eq!(loaded.len(), Catalog::with_defaults().len());
}

#[test]
fn test_corrupt_topic_file_is_error() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("topic_data.json");
    fs::write(&path, "not json").expect("Write failed");

    let result = TopicLibrary::new(JsonFileStore::new(&path)).load_catalog();
    assert!(result.is_err());
}

#[test]
fn test_player_library_persists_between_opens() {
    let dir = TempDir::new().expect("Failed to create temp dir");
    let path = dir.path().join("player_library.json");

    let mut library = PlayerLibrary::open(JsonFileStore::new(&path)).expect("Open failed");
    library.add("Ana").unwrap();
    library.add("Bo").unwrap();
    library.remove("Ana").unwrap();

    let reopened = PlayerLibrary::open(JsonFileStore::new(&path)).expect("Reopen failed");
    assert_eq!(reopened.names(), vec!["Bo"]);
    assert!(reopened.get("Bo").unwrap().image().is_none());

    let raw = JsonFileStore::new(&path).load().unwrap().unwrap();
    assert!(raw["players"]["Bo"]["added_at"].is_string());
}
