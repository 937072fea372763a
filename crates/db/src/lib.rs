//! MongoDB client factory and unique-index provisioning.

pub mod error;
pub mod initializer;
pub mod memory;
pub mod mongo;
pub mod store;

use books_kernel::settings::DatabaseSettings;

pub use error::{DbError, Result};
pub use initializer::{
    AppliedIndex, IndexStatus, InitReport, SchemaInitializer, VerifyEntry, VerifyReport,
};
pub use memory::MemoryStore;
pub use mongo::MongoStore;
pub use store::{IndexDescription, SchemaStore};

/// Create a MongoDB store for the configured endpoint and database.
pub async fn connect(settings: &DatabaseSettings) -> Result<MongoStore> {
    tracing::info!(
        target: "books-db",
        database = %settings.database,
        "connecting to storage engine"
    );
    MongoStore::connect(settings).await
}
