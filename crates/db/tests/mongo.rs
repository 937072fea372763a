//! Runs against a live MongoDB named by `BOOKS_TEST_MONGO_URI`:
//! `cargo test -p books-db --test mongo -- --ignored`.
//! Each test uses its own throwaway database and drops it afterwards.

use books_db::{DbError, MongoStore, SchemaInitializer, SchemaStore};
use books_kernel::settings::DatabaseSettings;
use mongodb::bson::{doc, Document};

async fn store_for(test: &str) -> MongoStore {
    let endpoint = std::env::var("BOOKS_TEST_MONGO_URI")
        .expect("BOOKS_TEST_MONGO_URI must point at a MongoDB deployment");

    let settings = DatabaseSettings {
        endpoint,
        database: format!("books_schema_{}_{}", test, std::process::id()),
        ..DatabaseSettings::default()
    };
    let store = MongoStore::connect(&settings).await.unwrap();
    store.database().drop().await.unwrap();
    store
}

fn declarations() -> Vec<books_kernel::IndexDeclaration> {
    books_schema::registry().unwrap().collect_indexes()
}

#[tokio::test]
#[ignore = "requires a live MongoDB at BOOKS_TEST_MONGO_URI"]
async fn provisions_unique_name_indexes() {
    let store = store_for("provision").await;

    let initializer = SchemaInitializer::new(&store);
    initializer.run(&declarations()).await.unwrap();
    initializer.run(&declarations()).await.unwrap();

    for collection in ["books", "authors", "genres"] {
        let unique_name_indexes = store
            .list_indexes(collection)
            .await
            .unwrap()
            .into_iter()
            .filter(|index| index.unique && index.keys == vec![("name".to_string(), 1)])
            .count();
        assert_eq!(unique_name_indexes, 1, "{collection}");

        let docs = store.database().collection::<Document>(collection);
        docs.insert_one(doc! { "name": "Shared" }).await.unwrap();
        assert!(docs.insert_one(doc! { "name": "Shared" }).await.is_err());
        docs.insert_one(doc! { "name": "Distinct" }).await.unwrap();
    }

    assert!(initializer.verify(&declarations()).await.unwrap().is_satisfied());
    store.database().drop().await.unwrap();
}

#[tokio::test]
#[ignore = "requires a live MongoDB at BOOKS_TEST_MONGO_URI"]
async fn pre_existing_duplicates_are_a_constraint_violation() {
    let store = store_for("duplicates").await;

    let books = store.database().collection::<Document>("books");
    books.insert_one(doc! { "name": "Dune" }).await.unwrap();
    books.insert_one(doc! { "name": "Dune" }).await.unwrap();

    let err = SchemaInitializer::new(&store)
        .run(&declarations())
        .await
        .unwrap_err();
    assert!(
        matches!(err, DbError::ConstraintViolation { ref collection, .. } if collection == "books"),
        "{err:?}"
    );

    store.database().drop().await.unwrap();
}
