//! In-process storage engine with unique index enforcement.
//!
//! Mirrors the engine semantics the initializer relies on: idempotent index
//! creation, duplicate detection on existing documents, rejection of
//! duplicate writes once a unique index exists, and the implicit `_id_`
//! index on every existing collection. Used for tests and offline runs.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use books_kernel::IndexSpec;
use parking_lot::Mutex;
use serde_json::Value;

use crate::error::{DbError, Result, INDEX_OPTIONS_CONFLICT};
use crate::store::{IndexDescription, SchemaStore};

#[derive(Debug, Clone)]
struct StoredIndex {
    name: String,
    field: String,
    order: i32,
    unique: bool,
}

#[derive(Debug, Default)]
struct MemoryCollection {
    documents: Vec<Value>,
    indexes: Vec<StoredIndex>,
}

impl MemoryCollection {
    fn duplicate_of(&self, field: &str, value: &Value) -> bool {
        self.documents
            .iter()
            .any(|document| field_value(document, field) == *value)
    }
}

/// Missing fields index as `null`, like the engine does.
fn field_value(document: &Value, field: &str) -> Value {
    document.get(field).cloned().unwrap_or(Value::Null)
}

fn duplicate_key_message(collection: &str, index: &str, field: &str, value: &Value) -> String {
    format!(
        "E11000 duplicate key error collection: {} index: {} dup key: {{ {}: {} }}",
        collection, index, field, value
    )
}

#[derive(Debug)]
pub struct MemoryStore {
    collections: Mutex<HashMap<String, MemoryCollection>>,
    reachable: bool,
    schema_rights: bool,
    declaration_attempts: AtomicUsize,
}

impl MemoryStore {
    /// A reachable engine where the caller may modify the schema.
    pub fn new() -> Self {
        Self {
            collections: Mutex::new(HashMap::new()),
            reachable: true,
            schema_rights: true,
            declaration_attempts: AtomicUsize::new(0),
        }
    }

    /// An engine that cannot be reached; every operation fails.
    pub fn unreachable() -> Self {
        Self {
            reachable: false,
            ..Self::new()
        }
    }

    /// An engine where the caller can read and write documents but not
    /// create indexes.
    pub fn read_only() -> Self {
        Self {
            schema_rights: false,
            ..Self::new()
        }
    }

    fn check_reachable(&self) -> Result<()> {
        if self.reachable {
            Ok(())
        } else {
            Err(DbError::connection(
                "Server selection timeout: No available servers",
            ))
        }
    }

    /// Insert a document, enforcing every unique index of the collection.
    pub fn insert(&self, collection: &str, document: Value) -> Result<()> {
        self.check_reachable()?;

        let mut collections = self.collections.lock();
        let target = collections.entry(collection.to_string()).or_default();

        for index in target.indexes.iter().filter(|index| index.unique) {
            let value = field_value(&document, &index.field);
            if target.duplicate_of(&index.field, &value) {
                return Err(DbError::constraint_violation(
                    collection,
                    duplicate_key_message(collection, &index.name, &index.field, &value),
                ));
            }
        }

        target.documents.push(document);
        Ok(())
    }

    /// Number of documents stored in `collection`.
    pub fn document_count(&self, collection: &str) -> usize {
        self.collections
            .lock()
            .get(collection)
            .map_or(0, |c| c.documents.len())
    }

    /// How many times `ensure_index` has been called, successful or not.
    pub fn declaration_attempts(&self) -> usize {
        self.declaration_attempts.load(Ordering::SeqCst)
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SchemaStore for MemoryStore {
    async fn ping(&self) -> Result<()> {
        self.check_reachable()
    }

    async fn ensure_index(&self, collection: &str, spec: &IndexSpec) -> Result<String> {
        self.declaration_attempts.fetch_add(1, Ordering::SeqCst);
        self.check_reachable()?;

        let name = spec.name();
        if !self.schema_rights {
            return Err(DbError::permission(format!(
                "not authorized to execute command {{ createIndexes: \"{}\", indexes: [ {{ name: \"{}\" }} ] }}",
                collection, name
            )));
        }

        let mut collections = self.collections.lock();
        let target = collections.entry(collection.to_string()).or_default();

        if let Some(existing) = target.indexes.iter().find(|index| index.name == name) {
            if existing.unique == spec.unique {
                return Ok(name);
            }
            return Err(DbError::engine(
                Some(INDEX_OPTIONS_CONFLICT),
                format!(
                    "An existing index has the same name as the requested index. Requested index: {{ key: {{ {}: {} }}, name: \"{}\", unique: {} }}",
                    spec.field,
                    spec.order.as_i32(),
                    name,
                    spec.unique
                ),
            ));
        }

        if spec.unique {
            let mut seen: Vec<Value> = Vec::with_capacity(target.documents.len());
            for document in &target.documents {
                let value = field_value(document, spec.field);
                if seen.contains(&value) {
                    return Err(DbError::constraint_violation(
                        collection,
                        duplicate_key_message(collection, &name, spec.field, &value),
                    ));
                }
                seen.push(value);
            }
        }

        target.indexes.push(StoredIndex {
            name: name.clone(),
            field: spec.field.to_string(),
            order: spec.order.as_i32(),
            unique: spec.unique,
        });

        Ok(name)
    }

    async fn list_indexes(&self, collection: &str) -> Result<Vec<IndexDescription>> {
        self.check_reachable()?;

        let collections = self.collections.lock();
        let Some(target) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let implicit = IndexDescription {
            name: "_id_".to_string(),
            keys: vec![("_id".to_string(), 1)],
            unique: false,
        };

        Ok(std::iter::once(implicit)
            .chain(target.indexes.iter().map(|index| IndexDescription {
                name: index.name.clone(),
                keys: vec![(index.field.clone(), index.order)],
                unique: index.unique,
            }))
            .collect())
    }
}
