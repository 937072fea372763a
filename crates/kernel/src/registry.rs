use anyhow::bail;
use std::sync::Arc;

use crate::module::{IndexDeclaration, Module};

/// Module registry holding the schema modules in registration order
pub struct ModuleRegistry {
    modules: Vec<Arc<dyn Module>>,
}

impl ModuleRegistry {
    /// Create a new module registry
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
        }
    }

    /// Register a module with the registry.
    /// Fails if a module with the same name is already registered.
    pub fn register(&mut self, module: Arc<dyn Module>) -> anyhow::Result<()> {
        if self.get_module(module.name()).is_some() {
            bail!("module '{}' is already registered", module.name());
        }

        tracing::debug!(module = module.name(), "registered schema module");
        self.modules.push(module);
        Ok(())
    }

    /// Get all registered modules
    pub fn modules(&self) -> &[Arc<dyn Module>] {
        &self.modules
    }

    /// Get a module by name
    pub fn get_module(&self, name: &str) -> Option<&Arc<dyn Module>> {
        self.modules.iter().find(|module| module.name() == name)
    }

    /// Get the number of registered modules
    pub fn module_count(&self) -> usize {
        self.modules.len()
    }

    /// Collect index declarations from all modules, in registration order
    pub fn collect_indexes(&self) -> Vec<IndexDeclaration> {
        self.modules
            .iter()
            .flat_map(|module| {
                let collection = module.collection();
                module
                    .indexes()
                    .into_iter()
                    .map(move |spec| IndexDeclaration { collection, spec })
            })
            .collect()
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}
