//! Local record store for Query Quest.
//!
//! This crate plays the part of the document database behind the query
//! builder: it keeps tables of JSON records on disk, scans them in insertion
//! order, and serves filtered pages using predicates from `qq_predicate`.

use std::collections::BTreeMap;

use chrono::Utc;
use qq_predicate::FieldSource;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

pub mod pagination;
pub mod query;
pub mod sample;
pub mod schema;
mod store;

pub use pagination::{paginate, PaginateError, PaginationOpts, PaginationResult};
pub use query::{get_filtered_paginated, FilterArgs, QueryRunError};
pub use sample::{seed_dataset, SeedOptions};
pub use store::{DatasetStore, StoreError};

/// Current dataset file version.
pub const DATASET_VERSION: u32 = 1;

/// A stored document.
///
/// System fields are prefixed with an underscore on the wire; everything else
/// is user data and is what query rules read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Unique document id.
    #[serde(rename = "_id")]
    pub id: String,

    /// Insertion time in milliseconds since the Unix epoch.
    #[serde(rename = "_creationTime")]
    pub creation_time: i64,

    /// User fields.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// Creates a record with a fresh id and the current time.
    pub fn new(fields: Map<String, Value>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            creation_time: Utc::now().timestamp_millis(),
            fields,
        }
    }
}

impl FieldSource for Record {
    fn field(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }
}

/// All tables of a local dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    /// File format version.
    #[serde(default = "default_version")]
    pub version: u32,

    /// Records per table, in insertion order.
    #[serde(default)]
    pub tables: BTreeMap<String, Vec<Record>>,
}

fn default_version() -> u32 {
    DATASET_VERSION
}

impl Default for Dataset {
    fn default() -> Self {
        Self::new()
    }
}

impl Dataset {
    /// Creates an empty dataset.
    pub fn new() -> Self {
        Self {
            version: DATASET_VERSION,
            tables: BTreeMap::new(),
        }
    }

    /// Returns true if no table has any records.
    pub fn is_empty(&self) -> bool {
        self.tables.values().all(Vec::is_empty)
    }

    /// Returns the records of a table, or `None` if the table does not exist.
    pub fn table(&self, name: &str) -> Option<&[Record]> {
        self.tables.get(name).map(Vec::as_slice)
    }

    /// Appends a record to a table, creating the table if needed.
    ///
    /// Returns the id of the inserted record.
    pub fn insert(&mut self, table: &str, record: Record) -> String {
        let id = record.id.clone();
        self.tables.entry(table.to_string()).or_default().push(record);
        id
    }

    /// Returns the number of records in each table.
    pub fn counts(&self) -> Vec<(&str, usize)> {
        self.tables
            .iter()
            .map(|(name, records)| (name.as_str(), records.len()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_dataset_new_defaults() {
        let dataset = Dataset::new();
        assert_eq!(dataset.version, DATASET_VERSION);
        assert!(dataset.tables.is_empty());
        assert!(dataset.is_empty());
    }

    #[test]
    fn test_insert_creates_table_and_keeps_order() {
        let mut dataset = Dataset::new();
        let first = dataset.insert("players", Record::new(fields(json!({"name": "A"}))));
        let second = dataset.insert("players", Record::new(fields(json!({"name": "B"}))));

        let players = dataset.table("players").unwrap();
        assert_eq!(players.len(), 2);
        assert_eq!(players[0].id, first);
        assert_eq!(players[1].id, second);
        assert!(!dataset.is_empty());
        assert_eq!(dataset.counts(), vec![("players", 2)]);
    }

    #[test]
    fn test_table_missing() {
        assert!(Dataset::new().table("nope").is_none());
    }

    #[test]
    fn test_record_ids_are_unique() {
        let a = Record::new(Map::new());
        let b = Record::new(Map::new());
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_record_serializes_system_fields_inline() {
        let record = Record {
            id: "abc".to_string(),
            creation_time: 1_700_000_000_000,
            fields: fields(json!({"name": "Player 1", "totalScore": 750})),
        };

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(
            value,
            json!({
                "_id": "abc",
                "_creationTime": 1_700_000_000_000i64,
                "name": "Player 1",
                "totalScore": 750
            })
        );

        let back: Record = serde_json::from_value(value).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn test_record_field_source_reads_user_fields() {
        let record = Record::new(fields(json!({"totalScore": 750})));
        assert_eq!(record.field("totalScore"), Some(&json!(750)));
        assert_eq!(record.field("_id"), None);
        assert_eq!(record.field("missing"), None);
    }

    #[test]
    fn test_dataset_deserialize_minimal() {
        let dataset: Dataset = serde_json::from_str("{}").unwrap();
        assert_eq!(dataset.version, DATASET_VERSION);
        assert!(dataset.is_empty());
    }
}
