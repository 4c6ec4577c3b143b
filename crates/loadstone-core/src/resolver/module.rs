use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Shared handle to a loaded module. Identity matters: two lookups that
/// hit the same cached module return handles to the same allocation,
/// observable with `Arc::ptr_eq`.
pub type ModuleHandle = Arc<Module>;

/// A loaded module object.
///
/// The canonical name is the name the module was actually resolved
/// under, which may differ from the name it was requested by when the
/// lookup went through a redirect.
pub struct Module {
    canonical_name: String,
    exports: Box<dyn Any + Send + Sync>,
}

impl Module {
    /// Create a module with no exports.
    pub fn new(canonical_name: impl Into<String>) -> Self {
        Self {
            canonical_name: canonical_name.into(),
            exports: Box::new(()),
        }
    }

    /// Create a module carrying an exports value.
    pub fn with_exports(
        canonical_name: impl Into<String>,
        exports: impl Any + Send + Sync,
    ) -> Self {
        Self {
            canonical_name: canonical_name.into(),
            exports: Box::new(exports),
        }
    }

    pub fn canonical_name(&self) -> &str {
        &self.canonical_name
    }

    /// Downcast the exports value to a concrete type.
    pub fn exports<T: Any>(&self) -> Option<&T> {
        self.exports.downcast_ref()
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("canonical_name", &self.canonical_name)
            .finish_non_exhaustive()
    }
}
