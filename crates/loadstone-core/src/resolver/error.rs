use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ResolveError {
    /// No resolver in the chain could satisfy the request. When a
    /// redirected lookup fails this carries the rewritten (physical)
    /// name, not the name the caller asked for.
    #[error("module not found: {name}")]
    ModuleNotFound { name: String },

    /// The redirector was asked to load a name whose rewrite is a
    /// no-op. Its ownership rule never claims such names, so hitting
    /// this means the chain was assembled incorrectly.
    #[error("redirect loop detected for module: {name}")]
    RedirectLoop { name: String },
}

pub type Result<T> = std::result::Result<T, ResolveError>;
