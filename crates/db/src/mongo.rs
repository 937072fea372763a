//! MongoDB-backed [`SchemaStore`].

use std::time::Duration;

use async_trait::async_trait;
use books_kernel::settings::DatabaseSettings;
use books_kernel::IndexSpec;
use futures_util::TryStreamExt;
use mongodb::bson::{doc, Bson, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, IndexOptions};
use mongodb::{Client, Database, IndexModel};

use crate::error::{DbError, Result, DUPLICATE_KEY, NAMESPACE_NOT_FOUND, UNAUTHORIZED};
use crate::store::{IndexDescription, SchemaStore};

/// Handle to one logical database on a MongoDB deployment.
#[derive(Clone, Debug)]
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    /// Build a client for `settings.endpoint` and select `settings.database`.
    ///
    /// The driver connects lazily; use [`SchemaStore::ping`] to prove the
    /// engine is reachable.
    pub async fn connect(settings: &DatabaseSettings) -> Result<Self> {
        let mut options = ClientOptions::parse(&settings.endpoint)
            .await
            .map_err(|err| match err.kind.as_ref() {
                ErrorKind::InvalidArgument { message, .. } => DbError::InvalidEndpoint {
                    endpoint: settings.endpoint.clone(),
                    message: message.clone(),
                },
                _ => classify("", err),
            })?;

        options.app_name = Some(settings.app_name.clone());
        options.connect_timeout = Some(Duration::from_millis(settings.connect_timeout_ms));
        options.server_selection_timeout =
            Some(Duration::from_millis(settings.server_selection_timeout_ms));

        let client = Client::with_options(options).map_err(|err| classify("", err))?;
        let database = client.database(&settings.database);

        tracing::debug!(database = %settings.database, "mongodb client created");

        Ok(Self { database })
    }

    pub fn database(&self) -> &Database {
        &self.database
    }
}

#[async_trait]
impl SchemaStore for MongoStore {
    async fn ping(&self) -> Result<()> {
        self.database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|err| classify("", err))?;
        Ok(())
    }

    async fn ensure_index(&self, collection: &str, spec: &IndexSpec) -> Result<String> {
        let mut keys = Document::new();
        keys.insert(spec.field, spec.order.as_i32());

        let model = IndexModel::builder()
            .keys(keys)
            .options(IndexOptions::builder().unique(spec.unique).build())
            .build();

        let created = self
            .database
            .collection::<Document>(collection)
            .create_index(model)
            .await
            .map_err(|err| classify(collection, err))?;

        Ok(created.index_name)
    }

    async fn list_indexes(&self, collection: &str) -> Result<Vec<IndexDescription>> {
        let cursor = match self
            .database
            .collection::<Document>(collection)
            .list_indexes()
            .await
        {
            Ok(cursor) => cursor,
            Err(err) if is_namespace_not_found(&err) => return Ok(Vec::new()),
            Err(err) => return Err(classify(collection, err)),
        };

        let models: Vec<IndexModel> = cursor
            .try_collect()
            .await
            .map_err(|err| classify(collection, err))?;

        Ok(models.into_iter().map(describe).collect())
    }
}

fn describe(model: IndexModel) -> IndexDescription {
    let options = model.options.unwrap_or_default();
    let keys: Vec<(String, i32)> = model
        .keys
        .iter()
        .map(|(field, value)| (field.clone(), key_direction(value)))
        .collect();
    let name = options.name.unwrap_or_else(|| {
        keys.iter()
            .map(|(field, order)| format!("{}_{}", field, order))
            .collect::<Vec<_>>()
            .join("_")
    });

    IndexDescription {
        name,
        keys,
        unique: options.unique.unwrap_or(false),
    }
}

/// Numeric direction of an index key; special index types map to 0.
fn key_direction(value: &Bson) -> i32 {
    match value {
        Bson::Int32(v) => *v,
        Bson::Int64(v) => i32::try_from(*v).unwrap_or(0),
        Bson::Double(v) if *v == 1.0 => 1,
        Bson::Double(v) if *v == -1.0 => -1,
        _ => 0,
    }
}

fn is_namespace_not_found(err: &mongodb::error::Error) -> bool {
    matches!(err.kind.as_ref(), ErrorKind::Command(command) if command.code == NAMESPACE_NOT_FOUND)
}

/// Map a driver error onto the provisioning taxonomy, keeping the engine's
/// own message.
fn classify(collection: &str, err: mongodb::error::Error) -> DbError {
    let message = err.to_string();
    match err.kind.as_ref() {
        ErrorKind::ServerSelection { .. }
        | ErrorKind::Io(_)
        | ErrorKind::DnsResolve { .. }
        | ErrorKind::ConnectionPoolCleared { .. } => DbError::connection(message),
        ErrorKind::Authentication { .. } => DbError::permission(message),
        ErrorKind::Command(command) => match command.code {
            DUPLICATE_KEY => DbError::constraint_violation(collection, command.message.clone()),
            UNAUTHORIZED => DbError::permission(command.message.clone()),
            code => DbError::engine(Some(code), command.message.clone()),
        },
        ErrorKind::Write(WriteFailure::WriteError(write)) if write.code == DUPLICATE_KEY => {
            DbError::constraint_violation(collection, write.message.clone())
        }
        _ => DbError::engine(None, message),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn describe_reads_name_keys_and_uniqueness() {
        let model = IndexModel::builder()
            .keys(doc! { "name": 1 })
            .options(
                IndexOptions::builder()
                    .name("name_1".to_string())
                    .unique(true)
                    .build(),
            )
            .build();

        let description = describe(model);
        assert_eq!(description.name, "name_1");
        assert_eq!(description.keys, vec![("name".to_string(), 1)]);
        assert!(description.unique);
    }

    #[test]
    fn describe_defaults_missing_options() {
        let model = IndexModel::builder().keys(doc! { "_id": 1 }).build();

        let description = describe(model);
        assert_eq!(description.name, "_id_1");
        assert!(!description.unique);
    }

    #[test]
    fn key_direction_accepts_numeric_encodings() {
        assert_eq!(key_direction(&Bson::Int32(-1)), -1);
        assert_eq!(key_direction(&Bson::Int64(1)), 1);
        assert_eq!(key_direction(&Bson::Double(1.0)), 1);
        assert_eq!(key_direction(&Bson::String("text".to_string())), 0);
    }

    #[test]
    fn key_direction_does_not_truncate_out_of_range_values() {
        assert_eq!(key_direction(&Bson::Int64(4_294_967_297)), 0);
        assert_eq!(key_direction(&Bson::Double(1.5)), 0);
        assert_eq!(key_direction(&Bson::Double(-1.0)), -1);

        let model = IndexModel::builder()
            .keys(doc! { "name": Bson::Int64(4_294_967_297) })
            .build();
        let description = describe(model);
        assert!(!description.matches_keys(&IndexSpec::unique_ascending("name")));
    }

    #[tokio::test]
    async fn malformed_endpoint_is_rejected_before_connecting() {
        let settings = DatabaseSettings {
            endpoint: "postgres://127.0.0.1:5432".to_string(),
            ..DatabaseSettings::default()
        };

        let err = MongoStore::connect(&settings).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidEndpoint { .. }), "{err:?}");
    }
}
