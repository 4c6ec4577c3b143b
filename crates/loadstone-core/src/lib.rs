//! Process bootstrap and module-resolution redirection for the
//! Loadstone orchestration toolkit.
//!
//! The crate covers two things, both evaluated once at process start:
//! a resolver chain whose front entry transparently substitutes a
//! bundled copy of a third-party dependency for the real one, and a
//! bootstrap sequence that publishes the system text encoding and
//! installs the toolkit's warning filters.

pub mod bootstrap;
pub mod config;
pub mod di;
pub mod errors;
pub mod resolver;
pub mod warnings;

pub use bootstrap::{initialize, initialize_with, system_encoding};
pub use config::{ToolkitConfig, VendorOptions};
pub use di::Container;
pub use errors::BootstrapError;
pub use resolver::{
    Module, ModuleHandle, ModuleRegistry, ModuleResolver, RedirectRule, RegistryResolver,
    ResolveError, ResolverChain, VendorRedirector,
};
pub use warnings::{FilterAction, WarningCategory, WarningFilter, WarningFilters};
