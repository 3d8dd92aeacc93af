//! Integration tests for DatasetStore and filtered queries over seeded data.

use chrono::NaiveDate;
use qq_predicate::CompileOptions;
use qq_store::schema::{catalog_for, PLAYERS, TABLES};
use qq_store::{
    get_filtered_paginated, seed_dataset, Dataset, DatasetStore, FilterArgs, PaginationOpts,
    SeedOptions,
};
use tempfile::tempdir;

fn seeded() -> Dataset {
    seed_dataset(&SeedOptions {
        count: 50,
        seed: Some(42),
        today: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        now_millis: 1_717_200_000_000,
    })
}

fn player_fields() -> String {
    serde_json::to_string(&catalog_for(PLAYERS).unwrap()).unwrap()
}

// ==================== Store ====================

#[test]
fn test_save_and_load_roundtrip() {
    let temp_dir = tempdir().expect("failed to create temp dir");
    let path = temp_dir.path().join("nested").join("dataset.json");
    let store = DatasetStore::with_path(path.clone());

    let dataset = seeded();
    store.save(&dataset).expect("failed to save dataset");
    assert!(path.exists(), "dataset file should exist after save");
    assert!(
        !path.with_extension("tmp").exists(),
        "temp file should be renamed away"
    );

    let loaded = store.load().expect("failed to load dataset");
    assert_eq!(loaded, dataset);
}

#[test]
fn test_load_or_default_missing_file() {
    let temp_dir = tempdir().expect("failed to create temp dir");
    let store = DatasetStore::with_path(temp_dir.path().join("nonexistent.json"));

    let dataset = store.load_or_default().expect("missing file is not an error");
    assert!(dataset.is_empty());
    assert!(!store.exists());
}

#[test]
fn test_delete_removes_file_and_tolerates_missing() {
    let temp_dir = tempdir().expect("failed to create temp dir");
    let store = DatasetStore::with_path(temp_dir.path().join("dataset.json"));

    store.save(&Dataset::new()).expect("failed to save");
    assert!(store.exists());
    store.delete().expect("failed to delete");
    assert!(!store.exists());
    store.delete().expect("deleting twice should be fine");
}

#[test]
fn test_saved_file_uses_wire_field_names() {
    let temp_dir = tempdir().expect("failed to create temp dir");
    let path = temp_dir.path().join("dataset.json");
    let store = DatasetStore::with_path(path.clone());
    store.save(&seeded()).expect("failed to save");

    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    let first = &raw["tables"]["players"][0];
    assert!(first["_id"].is_string());
    assert!(first["_creationTime"].is_i64());
    assert_eq!(first["name"], "Player 1");
    assert_eq!(raw["version"], 1);
}

#[tokio::test]
async fn test_async_save_and_load_roundtrip() {
    let temp_dir = tempdir().expect("failed to create temp dir");
    let store = DatasetStore::with_path(temp_dir.path().join("dataset.json"));

    let dataset = seeded();
    store.save_async(&dataset).await.expect("failed to save");
    let loaded = store.load_async().await.expect("failed to load");
    assert_eq!(loaded, dataset);

    // Sync and async formats are interchangeable.
    assert_eq!(store.load().expect("sync load"), dataset);
}

#[tokio::test]
async fn test_async_load_or_default_missing_file() {
    let temp_dir = tempdir().expect("failed to create temp dir");
    let store = DatasetStore::with_path(temp_dir.path().join("missing.json"));
    let dataset = store.load_or_default_async().await.expect("should default");
    assert!(dataset.is_empty());
}

// ==================== Queries over seeded data ====================

#[test]
fn test_seeded_tables_present() {
    let dataset = seeded();
    for table in TABLES {
        assert_eq!(dataset.table(table).map(<[_]>::len), Some(50), "{table}");
    }
}

#[test]
fn test_high_score_query_matches_manual_filter() {
    let dataset = seeded();
    let args = FilterArgs::from_json(
        r#"{"combinator": "and", "rules": [
            {"field": "totalScore", "operator": ">=", "value": "5000"},
            {"field": "isActive", "operator": "=", "value": true}
        ]}"#,
        player_fields(),
    );

    let result = get_filtered_paginated(
        &dataset,
        PLAYERS,
        &args,
        &PaginationOpts::first(100),
        CompileOptions::default(),
    )
    .expect("query should run");

    let expected: Vec<&str> = dataset
        .table(PLAYERS)
        .unwrap()
        .iter()
        .filter(|p| {
            p.fields["totalScore"].as_u64().unwrap() >= 5000
                && p.fields["isActive"].as_bool().unwrap()
        })
        .map(|p| p.id.as_str())
        .collect();
    let actual: Vec<&str> = result.page.iter().map(|p| p.id.as_str()).collect();
    assert_eq!(actual, expected);
    assert!(result.is_done);
}

#[test]
fn test_paging_through_registration_dates() {
    let dataset = seeded();
    // Players 1..=10 registered within the last ten days.
    let args = FilterArgs::from_json(
        r#"{"field": "registrationDate", "operator": ">", "value": "2024-05-22"}"#,
        player_fields(),
    );

    let mut opts = PaginationOpts::first(4);
    let mut names = Vec::new();
    loop {
        let result =
            get_filtered_paginated(&dataset, PLAYERS, &args, &opts, CompileOptions::default())
                .expect("query should run");
        names.extend(
            result
                .page
                .iter()
                .map(|p| p.fields["name"].as_str().unwrap().to_string()),
        );
        if result.is_done {
            break;
        }
        opts.cursor = result.continue_cursor;
    }

    let expected: Vec<String> = (1..=10).map(|n| format!("Player {n}")).collect();
    assert_eq!(names, expected);
}

#[test]
fn test_email_ends_with_across_whole_table() {
    let dataset = seeded();
    let args = FilterArgs::from_json(
        r#"{"field": "email", "operator": "endsWith", "value": "0@example.com"}"#,
        player_fields(),
    );
    let result = get_filtered_paginated(
        &dataset,
        PLAYERS,
        &args,
        &PaginationOpts::first(51),
        CompileOptions::default(),
    )
    .expect("query should run");
    let names: Vec<&str> = result
        .page
        .iter()
        .map(|p| p.fields["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec!["Player 10", "Player 20", "Player 30", "Player 40", "Player 50"]
    );
}
