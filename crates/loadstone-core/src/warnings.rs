//! Category-based runtime warnings with suppression and dedup rules.
//!
//! Filters are consulted in order on every emission; the first rule
//! matching a warning's category, module, and message decides whether
//! it is shown. Warnings that survive filtering go out through
//! `tracing::warn!`.

use rustc_hash::FxHashSet;
use std::sync::{Mutex, RwLock};
use tracing::warn;

/// Message prefix of the benign notice emitted when a module name is
/// registered twice; ignored by the default filter set.
pub const DUPLICATE_REGISTRATION_NOTICE: &str = "module already registered";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCategory {
    /// A feature scheduled for removal was used.
    Deprecation,
    /// Registry bookkeeping notices, e.g. duplicate registration.
    Registration,
    /// Anything else surfaced at runtime.
    Runtime,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterAction {
    /// Show the first occurrence, suppress repeats.
    Once,
    /// Suppress entirely.
    Ignore,
}

/// Matches a module name exactly, or any dotted child of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModulePattern {
    root: String,
}

impl ModulePattern {
    pub fn namespace(root: impl Into<String>) -> Self {
        Self { root: root.into() }
    }

    pub fn matches(&self, module: &str) -> bool {
        module == self.root
            || module
                .strip_prefix(&self.root)
                .is_some_and(|rest| rest.starts_with('.'))
    }
}

#[derive(Debug, Clone)]
pub struct WarningFilter {
    action: FilterAction,
    category: Option<WarningCategory>,
    module: Option<ModulePattern>,
    message_prefix: Option<String>,
}

impl WarningFilter {
    pub fn once(category: WarningCategory) -> Self {
        Self {
            action: FilterAction::Once,
            category: Some(category),
            module: None,
            message_prefix: None,
        }
    }

    pub fn ignore(category: WarningCategory) -> Self {
        Self {
            action: FilterAction::Ignore,
            category: Some(category),
            module: None,
            message_prefix: None,
        }
    }

    /// Restrict the filter to a namespace root and its dotted children.
    pub fn for_namespace(mut self, root: impl Into<String>) -> Self {
        self.module = Some(ModulePattern::namespace(root));
        self
    }

    /// Restrict the filter to messages starting with `prefix`.
    pub fn with_message_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.message_prefix = Some(prefix.into());
        self
    }

    pub fn action(&self) -> FilterAction {
        self.action
    }

    fn matches(&self, category: WarningCategory, module: &str, message: &str) -> bool {
        if self.category.is_some_and(|c| c != category) {
            return false;
        }
        if let Some(pattern) = &self.module {
            if !pattern.matches(module) {
                return false;
            }
        }
        if let Some(prefix) = &self.message_prefix {
            if !message.starts_with(prefix.as_str()) {
                return false;
            }
        }
        true
    }
}

/// The installed filter table plus the seen-set backing `Once` dedup.
pub struct WarningFilters {
    rules: RwLock<Vec<WarningFilter>>,
    seen: Mutex<FxHashSet<(WarningCategory, String, String)>>,
}

impl WarningFilters {
    pub fn new() -> Self {
        Self {
            rules: RwLock::new(Vec::new()),
            seen: Mutex::new(FxHashSet::default()),
        }
    }

    /// Append a filter after everything already installed, so
    /// pre-existing rules keep precedence.
    pub fn append(&self, filter: WarningFilter) {
        self.rules.write().unwrap().push(filter);
    }

    /// Install a filter ahead of everything already present.
    pub fn prepend(&self, filter: WarningFilter) {
        self.rules.write().unwrap().insert(0, filter);
    }

    pub fn rule_count(&self) -> usize {
        self.rules.read().unwrap().len()
    }

    /// Install the toolkit's default rules, appended so host-installed
    /// filters take precedence: deprecation warnings from the
    /// toolkit's own namespace are shown once each, and the duplicate
    /// registration notice is dropped entirely.
    pub fn install_defaults(&self, namespace_root: &str) {
        self.append(WarningFilter::once(WarningCategory::Deprecation).for_namespace(namespace_root));
        self.append(
            WarningFilter::ignore(WarningCategory::Registration)
                .with_message_prefix(DUPLICATE_REGISTRATION_NOTICE),
        );
    }

    /// Emit a warning through the filter table. Returns whether the
    /// warning was shown.
    pub fn emit(&self, category: WarningCategory, module: &str, message: &str) -> bool {
        let action = self
            .rules
            .read()
            .unwrap()
            .iter()
            .find(|f| f.matches(category, module, message))
            .map(WarningFilter::action);

        let show = match action {
            Some(FilterAction::Ignore) => false,
            Some(FilterAction::Once) => {
                let key = (category, module.to_string(), message.to_string());
                self.seen.lock().unwrap().insert(key)
            }
            None => true,
        };

        if show {
            warn!(module = module, category = ?category, "{}", message);
        }
        show
    }
}

impl Default for WarningFilters {
    fn default() -> Self {
        Self::new()
    }
}
