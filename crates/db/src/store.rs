use async_trait::async_trait;
use books_kernel::{IndexSpec, SortOrder};

use crate::error::Result;

/// An index as reported by the storage engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexDescription {
    pub name: String,
    pub keys: Vec<(String, i32)>,
    pub unique: bool,
}

impl IndexDescription {
    /// Whether this index covers exactly `spec`'s single key and direction.
    pub fn matches_keys(&self, spec: &IndexSpec) -> bool {
        matches!(
            self.keys.as_slice(),
            [(field, order)] if field == spec.field && SortOrder::from_i32(*order) == Some(spec.order)
        )
    }
}

/// Operations the initializer needs from a storage engine.
#[async_trait]
pub trait SchemaStore: Send + Sync {
    /// Round-trip to the engine to prove it is reachable.
    async fn ping(&self) -> Result<()>;

    /// Ensure `spec` exists on `collection`. Re-declaring an identical index
    /// is a no-op. Returns the index name.
    async fn ensure_index(&self, collection: &str, spec: &IndexSpec) -> Result<String>;

    /// Indexes currently defined on `collection`. A collection that does not
    /// exist has none.
    async fn list_indexes(&self, collection: &str) -> Result<Vec<IndexDescription>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn description(keys: &[(&str, i32)]) -> IndexDescription {
        IndexDescription {
            name: "idx".to_string(),
            keys: keys.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
            unique: true,
        }
    }

    #[test]
    fn matches_single_ascending_key() {
        let spec = IndexSpec::unique_ascending("name");
        assert!(description(&[("name", 1)]).matches_keys(&spec));
        assert!(!description(&[("name", -1)]).matches_keys(&spec));
        assert!(!description(&[("title", 1)]).matches_keys(&spec));
        assert!(!description(&[("name", 1), ("author", 1)]).matches_keys(&spec));
    }
}
