use std::fmt;

use books_kernel::IndexDeclaration;

use crate::error::Result;
use crate::store::SchemaStore;

/// An index the initializer ensured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedIndex {
    pub collection: String,
    pub index_name: String,
}

/// Outcome of a successful provisioning run, in declaration order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitReport {
    pub applied: Vec<AppliedIndex>,
}

/// State of one declared index as found in the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexStatus {
    Present,
    Missing,
    NotUnique,
}

impl fmt::Display for IndexStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            IndexStatus::Present => "present",
            IndexStatus::Missing => "missing",
            IndexStatus::NotUnique => "not_unique",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyEntry {
    pub collection: String,
    pub index_name: String,
    pub status: IndexStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyReport {
    pub entries: Vec<VerifyEntry>,
}

impl VerifyReport {
    /// True when every declared index is present with the declared options.
    pub fn is_satisfied(&self) -> bool {
        self.entries
            .iter()
            .all(|entry| entry.status == IndexStatus::Present)
    }
}

/// Provisions declared indexes against a [`SchemaStore`].
///
/// Declarations are issued one at a time in the order given and the first
/// failure aborts the run. Nothing is retried.
pub struct SchemaInitializer<'a, S: SchemaStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: SchemaStore + ?Sized> SchemaInitializer<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Check reachability, then ensure every declaration.
    pub async fn run(&self, declarations: &[IndexDeclaration]) -> Result<InitReport> {
        self.store.ping().await.inspect_err(|err| {
            tracing::error!(kind = err.kind(), error = %err, "storage engine unreachable");
        })?;

        let mut report = InitReport::default();

        for declaration in declarations {
            let index_name = self
                .store
                .ensure_index(declaration.collection, &declaration.spec)
                .await
                .inspect_err(|err| {
                    tracing::error!(
                        collection = declaration.collection,
                        field = declaration.spec.field,
                        kind = err.kind(),
                        error = %err,
                        "failed to ensure index"
                    );
                })?;

            tracing::info!(
                collection = declaration.collection,
                index = %index_name,
                unique = declaration.spec.unique,
                "index ensured"
            );

            report.applied.push(AppliedIndex {
                collection: declaration.collection.to_string(),
                index_name,
            });
        }

        Ok(report)
    }

    /// Compare the engine's indexes against the declarations without
    /// changing anything.
    pub async fn verify(&self, declarations: &[IndexDeclaration]) -> Result<VerifyReport> {
        let mut report = VerifyReport::default();

        for declaration in declarations {
            let indexes = self.store.list_indexes(declaration.collection).await?;
            let matching: Vec<_> = indexes
                .iter()
                .filter(|index| index.matches_keys(&declaration.spec))
                .collect();

            let status = if matching.is_empty() {
                IndexStatus::Missing
            } else if matching
                .iter()
                .any(|index| index.unique == declaration.spec.unique)
            {
                IndexStatus::Present
            } else {
                IndexStatus::NotUnique
            };

            tracing::debug!(
                collection = declaration.collection,
                field = declaration.spec.field,
                %status,
                "index verified"
            );

            report.entries.push(VerifyEntry {
                collection: declaration.collection.to_string(),
                index_name: declaration.spec.name(),
                status,
            });
        }

        Ok(report)
    }
}
