use indexmap::IndexMap;
use std::sync::{Arc, OnceLock, RwLock};
use tracing::debug;

use super::{Module, ModuleHandle, ModuleResolver, ResolveError, ResolverChain, Result};

type InitFn = Box<dyn Fn() -> Module + Send + Sync>;

/// A registered module definition: an initializer plus the handle it
/// produced, if it has run. `OnceLock` guarantees the initializer body
/// (and its side effects) runs at most once per process, even when two
/// threads race to load the same name.
struct ModuleDef {
    init: InitFn,
    loaded: OnceLock<ModuleHandle>,
}

impl ModuleDef {
    fn load(&self) -> ModuleHandle {
        self.loaded.get_or_init(|| Arc::new((self.init)())).clone()
    }
}

/// Backing store of available modules, keyed by fully qualified dotted
/// name in registration order.
///
/// This stands in for the host's installed-package lookup: vendored
/// copies are registered under `<root>.<segment>.*` names, real
/// external packages under their own names.
pub struct ModuleRegistry {
    defs: RwLock<IndexMap<String, Arc<ModuleDef>>>,
}

impl ModuleRegistry {
    pub fn new() -> Self {
        Self {
            defs: RwLock::new(IndexMap::new()),
        }
    }

    /// Register a module initializer under `name`.
    ///
    /// Returns `false` if the name was already registered; the first
    /// registration wins and the new initializer is discarded.
    pub fn register(
        &self,
        name: impl Into<String>,
        init: impl Fn() -> Module + Send + Sync + 'static,
    ) -> bool {
        let name = name.into();
        let mut defs = self.defs.write().unwrap();
        if defs.contains_key(&name) {
            debug!(module = %name, "keeping existing registration");
            return false;
        }
        defs.insert(
            name,
            Arc::new(ModuleDef {
                init: Box::new(init),
                loaded: OnceLock::new(),
            }),
        );
        true
    }

    pub fn contains(&self, name: &str) -> bool {
        self.defs.read().unwrap().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.defs.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.read().unwrap().is_empty()
    }

    /// Run (or reuse) the initializer registered under `name`.
    pub fn load(&self, name: &str) -> Option<ModuleHandle> {
        let def = self.defs.read().unwrap().get(name).cloned();
        def.map(|def| def.load())
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Terminal resolver of the chain: satisfies any name the registry
/// knows about. Everything in front of it may rewrite or decline, but
/// lookups ultimately bottom out here.
pub struct RegistryResolver {
    registry: Arc<ModuleRegistry>,
}

impl RegistryResolver {
    pub fn new(registry: Arc<ModuleRegistry>) -> Self {
        Self { registry }
    }
}

impl ModuleResolver for RegistryResolver {
    fn id(&self) -> &str {
        super::REGISTRY_RESOLVER_ID
    }

    fn locate(&self, name: &str) -> bool {
        self.registry.contains(name)
    }

    fn load(&self, name: &str, _chain: &ResolverChain) -> Result<ModuleHandle> {
        self.registry
            .load(name)
            .ok_or_else(|| ResolveError::ModuleNotFound {
                name: name.to_string(),
            })
    }
}
