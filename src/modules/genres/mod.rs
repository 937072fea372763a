use books_kernel::{IndexSpec, Module};
use serde::{Deserialize, Serialize};

/// A genre label as listed in `Book::genres`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    pub name: String,
}

/// Schema for the `genres` collection
pub struct GenresModule;

impl GenresModule {
    pub const fn new() -> Self {
        Self
    }
}

impl Module for GenresModule {
    fn name(&self) -> &'static str {
        "genres"
    }

    fn indexes(&self) -> Vec<IndexSpec> {
        vec![IndexSpec::unique_ascending("name")]
    }
}

/// Create a new instance of the genres module
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(GenresModule::new())
}
