/// Sort direction of an index key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

impl SortOrder {
    /// Key value as the engine expects it in an index specification.
    pub const fn as_i32(self) -> i32 {
        match self {
            SortOrder::Ascending => 1,
            SortOrder::Descending => -1,
        }
    }

    pub const fn from_i32(value: i32) -> Option<Self> {
        match value {
            1 => Some(SortOrder::Ascending),
            -1 => Some(SortOrder::Descending),
            _ => None,
        }
    }
}

/// Single-field index contributed by a schema module.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSpec {
    pub field: &'static str,
    pub order: SortOrder,
    pub unique: bool,
}

impl IndexSpec {
    /// Ascending index that rejects duplicate values of `field`.
    pub const fn unique_ascending(field: &'static str) -> Self {
        Self {
            field,
            order: SortOrder::Ascending,
            unique: true,
        }
    }

    /// Index name the engine assigns by default, e.g. `name_1`.
    pub fn name(&self) -> String {
        format!("{}_{}", self.field, self.order.as_i32())
    }
}

/// An index bound to the collection it must be created on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexDeclaration {
    pub collection: &'static str,
    pub spec: IndexSpec,
}

/// Core trait implemented by every collection schema module
pub trait Module: Sync + Send {
    /// Unique name for this module
    fn name(&self) -> &'static str;

    /// Collection the module's indexes are created on.
    /// Defaults to the module name.
    fn collection(&self) -> &'static str {
        self.name()
    }

    /// Indexes the collection must carry
    fn indexes(&self) -> Vec<IndexSpec> {
        vec![]
    }
}
