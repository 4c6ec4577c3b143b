use crate::config::ToolkitConfig;
use crate::resolver::{
    Module, ModuleHandle, ModuleRegistry, RegistryResolver, ResolverChain, Result, VendorRedirector,
};
use crate::warnings::{WarningCategory, WarningFilters, DUPLICATE_REGISTRATION_NOTICE};
use std::sync::Arc;

/// Dependency injection container
/// Wires the resolver chain, module registry, and warning filters from
/// one configuration so tests can build independent instances.
pub struct Container {
    config: Arc<ToolkitConfig>,
    warnings: Arc<WarningFilters>,
    registry: Arc<ModuleRegistry>,
    redirector: Arc<VendorRedirector>,
    chain: Arc<ResolverChain>,
}

impl Container {
    /// Create a new container with production dependencies
    pub fn new(config: ToolkitConfig) -> Self {
        Self::with_dependencies(
            config,
            Arc::new(WarningFilters::new()),
            Arc::new(ModuleRegistry::new()),
        )
    }

    /// Create a container with custom dependencies (for testing)
    ///
    /// Assembles the chain with the registry resolver at the back and
    /// the vendor redirector prepended in front of it.
    pub fn with_dependencies(
        config: ToolkitConfig,
        warnings: Arc<WarningFilters>,
        registry: Arc<ModuleRegistry>,
    ) -> Self {
        let config = Arc::new(config);
        let redirector = Arc::new(VendorRedirector::from_options(&config.vendor));

        let chain = Arc::new(ResolverChain::new());
        chain.push(Arc::new(RegistryResolver::new(registry.clone())));
        chain.prepend(redirector.clone());

        Container {
            config,
            warnings,
            registry,
            redirector,
            chain,
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Arc<ToolkitConfig> {
        &self.config
    }

    /// Get the warning filter table
    pub fn warnings(&self) -> &Arc<WarningFilters> {
        &self.warnings
    }

    /// Get the module registry
    pub fn registry(&self) -> &Arc<ModuleRegistry> {
        &self.registry
    }

    /// Get the vendor redirector
    pub fn redirector(&self) -> &Arc<VendorRedirector> {
        &self.redirector
    }

    /// Get the resolution chain
    pub fn chain(&self) -> &Arc<ResolverChain> {
        &self.chain
    }

    /// Resolve a module through the chain
    pub fn resolve(&self, name: &str) -> Result<ModuleHandle> {
        self.chain.resolve(name)
    }

    /// Register a module, emitting the duplicate-registration notice
    /// through the warning filters when the name is already taken.
    pub fn register_module(
        &self,
        name: &str,
        init: impl Fn() -> Module + Send + Sync + 'static,
    ) -> bool {
        let registered = self.registry.register(name, init);
        if !registered {
            self.warnings.emit(
                WarningCategory::Registration,
                name,
                &format!("{DUPLICATE_REGISTRATION_NOTICE}: {name}"),
            );
        }
        registered
    }
}
