//! Module resolution with vendored-dependency redirection.
//!
//! The resolution chain is consulted front to back on every lookup; a
//! [`VendorRedirector`] installed at the front retargets lookups for a
//! watched namespace into a bundled copy (or back out to the real
//! package), and a [`RegistryResolver`] at the back satisfies whatever
//! physical name the rewrite produced.

mod chain;
mod error;
mod module;
mod redirect;
mod registry;

pub use chain::{ModuleResolver, ResolverChain};
pub use error::{ResolveError, Result};
pub use module::{Module, ModuleHandle};
pub use redirect::{RedirectRule, VendorRedirector};
pub use registry::{ModuleRegistry, RegistryResolver};

/// Chain id of the vendor redirector.
pub const REDIRECTOR_ID: &str = "vendor-redirect";

/// Chain id of the terminal registry resolver.
pub const REGISTRY_RESOLVER_ID: &str = "registry";
