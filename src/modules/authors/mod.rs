use books_kernel::{IndexSpec, Module};
use serde::{Deserialize, Serialize};

/// An author, referenced from `Book::author` by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
}

/// Schema for the `authors` collection
pub struct AuthorsModule;

impl AuthorsModule {
    pub const fn new() -> Self {
        Self
    }
}

impl Module for AuthorsModule {
    fn name(&self) -> &'static str {
        "authors"
    }

    fn indexes(&self) -> Vec<IndexSpec> {
        vec![IndexSpec::unique_ascending("name")]
    }
}

/// Create a new instance of the authors module
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(AuthorsModule::new())
}
