use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex, RwLock};
use tracing::{debug, trace};

use super::{ModuleHandle, ResolveError, Result};

/// A participant in the module-resolution chain.
///
/// `locate` decides ownership of a fully qualified name; `load` is
/// called only for names the resolver has claimed and may re-enter the
/// chain to resolve a rewritten name.
pub trait ModuleResolver: Send + Sync {
    /// Stable identifier, used to keep duplicate registrations from
    /// growing the chain.
    fn id(&self) -> &str;

    /// Claim or decline `name`. Declining lets the next resolver in
    /// the chain attempt resolution.
    fn locate(&self, name: &str) -> bool;

    /// Produce the module for a claimed name.
    fn load(&self, name: &str, chain: &ResolverChain) -> Result<ModuleHandle>;
}

/// The ordered resolution chain plus the cache of everything it has
/// resolved so far.
///
/// The cache is keyed by the *requested* name. A hit bypasses the
/// resolvers entirely, so module initializers never re-run for a name
/// that has already been served, and toggling a redirect after the
/// fact cannot change what an already-resolved name maps to.
pub struct ResolverChain {
    resolvers: RwLock<Vec<Arc<dyn ModuleResolver>>>,
    cache: Mutex<FxHashMap<String, ModuleHandle>>,
}

impl ResolverChain {
    pub fn new() -> Self {
        Self {
            resolvers: RwLock::new(Vec::new()),
            cache: Mutex::new(FxHashMap::default()),
        }
    }

    /// Install a resolver at the front of the chain so it is consulted
    /// before everything already present. Re-registering an id already
    /// in the chain is a no-op.
    pub fn prepend(&self, resolver: Arc<dyn ModuleResolver>) {
        let mut resolvers = self.resolvers.write().unwrap();
        if resolvers.iter().any(|r| r.id() == resolver.id()) {
            debug!(id = resolver.id(), "resolver already registered");
            return;
        }
        resolvers.insert(0, resolver);
    }

    /// Install a resolver at the back of the chain. Duplicate ids are
    /// ignored, as with [`prepend`](Self::prepend).
    pub fn push(&self, resolver: Arc<dyn ModuleResolver>) {
        let mut resolvers = self.resolvers.write().unwrap();
        if resolvers.iter().any(|r| r.id() == resolver.id()) {
            debug!(id = resolver.id(), "resolver already registered");
            return;
        }
        resolvers.push(resolver);
    }

    pub fn len(&self) -> usize {
        self.resolvers.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.resolvers.read().unwrap().is_empty()
    }

    /// Look up a previously resolved name without consulting the chain.
    pub fn cached(&self, name: &str) -> Option<ModuleHandle> {
        self.cache.lock().unwrap().get(name).cloned()
    }

    /// Resolve `name` through the chain: cache first, then each
    /// resolver in order, first claim wins.
    ///
    /// The resolver list is snapshotted before any `load` call so a
    /// loading resolver may re-enter the chain (to resolve a rewritten
    /// name) without holding the registration lock.
    pub fn resolve(&self, name: &str) -> Result<ModuleHandle> {
        if let Some(handle) = self.cached(name) {
            trace!(module = name, "cache hit");
            return Ok(handle);
        }

        let resolvers: Vec<Arc<dyn ModuleResolver>> =
            self.resolvers.read().unwrap().iter().cloned().collect();

        for resolver in resolvers {
            if !resolver.locate(name) {
                continue;
            }
            let handle = resolver.load(name, self)?;
            // The recursive resolve above (if any) cached the handle
            // under its canonical name; record the requested spelling
            // too so either name returns the identical object.
            self.cache
                .lock()
                .unwrap()
                .entry(name.to_string())
                .or_insert_with(|| handle.clone());
            debug!(module = name, canonical = handle.canonical_name(), "resolved");
            return Ok(handle);
        }

        Err(ResolveError::ModuleNotFound {
            name: name.to_string(),
        })
    }
}

impl Default for ResolverChain {
    fn default() -> Self {
        Self::new()
    }
}
