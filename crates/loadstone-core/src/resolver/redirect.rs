use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

use crate::config::VendorOptions;

use super::{ModuleHandle, ModuleResolver, ResolveError, ResolverChain, Result};

/// One redirect mapping: a watched namespace root and the segment the
/// bundled copy lives under.
///
/// With vendoring enabled, every lookup under the bare root is
/// retargeted into the vendored sub-namespace; with it disabled, only
/// lookups for the vendored spelling are claimed and rewritten back to
/// the real external package.
#[derive(Debug)]
pub struct RedirectRule {
    watched_root: String,
    vendored_segment: String,
    enabled: AtomicBool,
}

impl RedirectRule {
    pub fn new(
        watched_root: impl Into<String>,
        vendored_segment: impl Into<String>,
        enabled: bool,
    ) -> Self {
        Self {
            watched_root: watched_root.into(),
            vendored_segment: vendored_segment.into(),
            enabled: AtomicBool::new(enabled),
        }
    }

    pub fn watched_root(&self) -> &str {
        &self.watched_root
    }

    pub fn vendored_segment(&self) -> &str {
        &self.vendored_segment
    }

    /// Read fresh on every lookup, never memoized at registration.
    pub fn enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    /// `<root>.<segment>.` — the spelling of the vendored sub-namespace.
    fn vendored_prefix(&self) -> String {
        format!("{}.{}.", self.watched_root, self.vendored_segment)
    }

    fn is_vendored(&self, name: &str) -> bool {
        name.strip_prefix(&self.vendored_prefix()).is_some()
            || name == format!("{}.{}", self.watched_root, self.vendored_segment)
    }

    fn first_segment(name: &str) -> &str {
        name.split('.').next().unwrap_or(name)
    }

    /// Ownership rule. Enabled: any name rooted at the watched root
    /// that does not already carry the vendored segment (those need no
    /// rewrite and fall through to the chain's terminal resolver).
    /// Disabled: only names inside the vendored sub-namespace, so they
    /// can be rewritten back to the real package.
    fn claims(&self, name: &str) -> bool {
        if self.enabled() {
            Self::first_segment(name) == self.watched_root && !self.is_vendored(name)
        } else {
            name.starts_with(&self.vendored_prefix())
        }
    }

    /// Compute the rewrite target for a claimed name. `None` means the
    /// name needs no rewrite under the current toggle state.
    fn rewrite(&self, name: &str) -> Option<String> {
        if self.enabled() {
            if self.is_vendored(name) {
                return None;
            }
            if name == self.watched_root {
                return Some(format!("{}.{}", self.watched_root, self.vendored_segment));
            }
            let rest = name.strip_prefix(&format!("{}.", self.watched_root))?;
            Some(format!(
                "{}.{}.{}",
                self.watched_root, self.vendored_segment, rest
            ))
        } else {
            name.strip_prefix(&self.vendored_prefix())
                .map(str::to_string)
        }
    }
}

/// The redirection layer itself. Holds an ordered list of rules,
/// checked in registration order, first match wins; injected at
/// construction so independent instances can carry different settings.
pub struct VendorRedirector {
    rules: Vec<Arc<RedirectRule>>,
}

impl VendorRedirector {
    pub fn new(rules: Vec<RedirectRule>) -> Self {
        Self {
            rules: rules.into_iter().map(Arc::new).collect(),
        }
    }

    /// Convenience constructor for the common single-rule setup.
    pub fn single(
        watched_root: impl Into<String>,
        vendored_segment: impl Into<String>,
        enabled: bool,
    ) -> Self {
        Self::new(vec![RedirectRule::new(
            watched_root,
            vendored_segment,
            enabled,
        )])
    }

    pub fn from_options(options: &VendorOptions) -> Self {
        Self::single(
            options.watched_root.clone(),
            options.vendored_segment.clone(),
            options.enabled,
        )
    }

    pub fn rules(&self) -> &[Arc<RedirectRule>] {
        &self.rules
    }

    fn matching_rule(&self, name: &str) -> Option<&RedirectRule> {
        self.rules.iter().map(Arc::as_ref).find(|r| r.claims(name))
    }
}

impl ModuleResolver for VendorRedirector {
    fn id(&self) -> &str {
        super::REDIRECTOR_ID
    }

    fn locate(&self, name: &str) -> bool {
        self.matching_rule(name).is_some()
    }

    fn load(&self, name: &str, chain: &ResolverChain) -> Result<ModuleHandle> {
        let rule = self
            .matching_rule(name)
            .ok_or_else(|| ResolveError::ModuleNotFound {
                name: name.to_string(),
            })?;

        // Guard against re-entering ourselves with an unchanged name.
        // The ownership rule already excludes no-op rewrites; this
        // keeps a future change to that rule from looping the chain.
        match rule.rewrite(name) {
            Some(target) if target != name => {
                debug!(from = name, to = %target, "redirecting module lookup");
                chain.resolve(&target)
            }
            _ => Err(ResolveError::RedirectLoop {
                name: name.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(enabled: bool) -> RedirectRule {
        RedirectRule::new("relay", "vendored", enabled)
    }

    #[test]
    fn test_enabled_claims_bare_root_names() {
        let rule = rule(true);

        assert!(rule.claims("relay"));
        assert!(rule.claims("relay.web"));
        assert!(rule.claims("relay.web.client"));
        assert!(!rule.claims("relay.vendored.web"));
        assert!(!rule.claims("other.pkg"));
        assert!(!rule.claims("relayish.web"));
    }

    #[test]
    fn test_disabled_claims_only_vendored_names() {
        let rule = rule(false);

        assert!(rule.claims("relay.vendored.web"));
        assert!(!rule.claims("relay"));
        assert!(!rule.claims("relay.web"));
        assert!(!rule.claims("other.pkg"));
    }

    #[test]
    fn test_enabled_rewrite_inserts_vendored_segment() {
        let rule = rule(true);

        assert_eq!(rule.rewrite("relay"), Some("relay.vendored".to_string()));
        assert_eq!(
            rule.rewrite("relay.web.client"),
            Some("relay.vendored.web.client".to_string())
        );
        assert_eq!(rule.rewrite("relay.vendored.web"), None);
    }

    #[test]
    fn test_disabled_rewrite_strips_vendored_prefix() {
        let rule = rule(false);

        assert_eq!(rule.rewrite("relay.vendored.web"), Some("web".to_string()));
        assert_eq!(
            rule.rewrite("relay.vendored.web.client"),
            Some("web.client".to_string())
        );
        assert_eq!(rule.rewrite("other.pkg"), None);
    }

    #[test]
    fn test_toggle_read_fresh() {
        let redirector = VendorRedirector::single("relay", "vendored", true);
        assert!(redirector.locate("relay.web"));

        redirector.rules()[0].set_enabled(false);
        assert!(!redirector.locate("relay.web"));
        assert!(redirector.locate("relay.vendored.web"));
    }

    #[test]
    fn test_load_of_unclaimed_name_errors() {
        let redirector = VendorRedirector::single("relay", "vendored", true);
        let chain = ResolverChain::new();

        let err = redirector.load("other.pkg", &chain).unwrap_err();
        assert_eq!(
            err,
            ResolveError::ModuleNotFound {
                name: "other.pkg".to_string()
            }
        );
    }

    #[test]
    fn test_rules_checked_in_registration_order() {
        let redirector = VendorRedirector::new(vec![
            RedirectRule::new("relay", "vendored", true),
            RedirectRule::new("relay", "legacy", true),
        ]);

        // Both rules match the root; the first one decides the rewrite.
        let rule = redirector.matching_rule("relay.web").unwrap();
        assert_eq!(rule.vendored_segment(), "vendored");
    }
}
