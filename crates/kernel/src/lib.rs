pub mod module;
pub mod registry;
pub mod settings;

pub use module::{IndexDeclaration, IndexSpec, Module, SortOrder};
pub use registry::ModuleRegistry;
