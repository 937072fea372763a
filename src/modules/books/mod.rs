pub mod models;

use books_kernel::{IndexSpec, Module};

/// Schema for the `books` collection
pub struct BooksModule;

impl BooksModule {
    pub const fn new() -> Self {
        Self
    }
}

impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    fn indexes(&self) -> Vec<IndexSpec> {
        vec![IndexSpec::unique_ascending("name")]
    }
}

/// Create a new instance of the books module
pub fn create_module() -> std::sync::Arc<dyn Module> {
    std::sync::Arc::new(BooksModule::new())
}
