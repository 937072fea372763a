pub mod authors;
pub mod books;
pub mod genres;

use books_kernel::ModuleRegistry;

/// Register all catalogue schema modules with the registry
pub fn register_all(registry: &mut ModuleRegistry) -> anyhow::Result<()> {
    registry.register(books::create_module())?;
    registry.register(authors::create_module())?;
    registry.register(genres::create_module())?;
    Ok(())
}

/// Registry preloaded with every catalogue module
pub fn registry() -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    register_all(&mut registry)?;
    Ok(registry)
}
