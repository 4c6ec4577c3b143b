use loadstone_core::config::{ToolkitConfig, VendorOptions};
use loadstone_core::resolver::{
    Module, ModuleRegistry, ModuleResolver, RegistryResolver, ResolveError, ResolverChain,
    VendorRedirector,
};
use loadstone_core::Container;
use proptest::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

fn container(enabled: bool) -> Container {
    let config = ToolkitConfig {
        vendor: VendorOptions {
            enabled,
            ..VendorOptions::default()
        },
        ..ToolkitConfig::default()
    };
    Container::new(config)
}

/// Registry contents mirroring a shipped toolkit: the bundled copy
/// under the vendored sub-namespace, the real package at its own name.
fn populate(container: &Container) {
    container.register_module("relay.vendored.web", || {
        Module::with_exports("relay.vendored.web", "bundled")
    });
    container.register_module("relay.vendored.web.client", || {
        Module::new("relay.vendored.web.client")
    });
    container.register_module("web", || Module::with_exports("web", "external"));
}

// ============================================================================
// Vendoring enabled
// ============================================================================

#[test]
fn test_enabled_aliases_root_to_vendored_copy() {
    let container = container(true);
    populate(&container);

    let via_root = container.resolve("relay.web").unwrap();
    let direct = container.resolve("relay.vendored.web").unwrap();

    assert!(Arc::ptr_eq(&via_root, &direct));
    assert_eq!(via_root.canonical_name(), "relay.vendored.web");
    assert_eq!(via_root.exports::<&str>(), Some(&"bundled"));
}

#[test]
fn test_enabled_repeat_resolution_is_identical() {
    let container = container(true);
    populate(&container);

    let first = container.resolve("relay.vendored.web").unwrap();
    let second = container.resolve("relay.vendored.web").unwrap();
    assert!(Arc::ptr_eq(&first, &second));
}

#[test]
fn test_enabled_init_side_effects_run_once_across_spellings() {
    static CALLS: AtomicUsize = AtomicUsize::new(0);

    let container = container(true);
    container.register_module("relay.vendored.web", || {
        CALLS.fetch_add(1, Ordering::SeqCst);
        Module::new("relay.vendored.web")
    });

    container.resolve("relay.web").unwrap();
    container.resolve("relay.vendored.web").unwrap();
    container.resolve("relay.web").unwrap();

    assert_eq!(CALLS.load(Ordering::SeqCst), 1);
}

#[test]
fn test_enabled_failure_names_the_rewritten_target() {
    let container = container(true);

    let err = container.resolve("relay.missing").unwrap_err();
    assert_eq!(
        err,
        ResolveError::ModuleNotFound {
            name: "relay.vendored.missing".to_string()
        }
    );
}

// ============================================================================
// Vendoring disabled
// ============================================================================

#[test]
fn test_disabled_strips_back_to_real_package() {
    let container = container(false);
    populate(&container);

    let via_vendored = container.resolve("relay.vendored.web").unwrap();
    let direct = container.resolve("web").unwrap();

    assert!(Arc::ptr_eq(&via_vendored, &direct));
    assert_eq!(via_vendored.exports::<&str>(), Some(&"external"));
}

#[test]
fn test_disabled_declines_bare_root_names() {
    let container = container(false);
    populate(&container);

    assert!(!container.redirector().locate("relay.web"));
    // Falls through the chain; nothing else owns the name either.
    let err = container.resolve("relay.web").unwrap_err();
    assert_eq!(
        err,
        ResolveError::ModuleNotFound {
            name: "relay.web".to_string()
        }
    );
}

// ============================================================================
// Toggle and cache interaction
// ============================================================================

#[test]
fn test_cache_wins_over_toggled_flag() {
    static CALLS: AtomicUsize = AtomicUsize::new(0);

    let container = container(true);
    populate(&container);
    container.register_module("relay.vendored.state", || {
        CALLS.fetch_add(1, Ordering::SeqCst);
        Module::new("relay.vendored.state")
    });

    let before = container.resolve("relay.state").unwrap();
    container.redirector().rules()[0].set_enabled(false);
    let after = container.resolve("relay.state").unwrap();

    // The cached object is served without re-running ownership or
    // rewrite logic, so the toggle is invisible for this name.
    assert!(Arc::ptr_eq(&before, &after));
    assert_eq!(CALLS.load(Ordering::SeqCst), 1);
}

#[test]
fn test_toggle_affects_uncached_names() {
    let container = container(true);
    populate(&container);

    container.resolve("relay.web").unwrap();
    container.redirector().rules()[0].set_enabled(false);

    // A fresh bare-root name is now declined instead of redirected.
    let err = container.resolve("relay.web.client").unwrap_err();
    assert_eq!(
        err,
        ResolveError::ModuleNotFound {
            name: "relay.web.client".to_string()
        }
    );
}

// ============================================================================
// Foreign namespaces and chain hygiene
// ============================================================================

#[test]
fn test_foreign_namespace_is_declined_and_left_uncached() {
    for enabled in [true, false] {
        let container = container(enabled);
        populate(&container);

        assert!(!container.redirector().locate("other.pkg"));
        assert!(container.resolve("other.pkg").is_err());
        assert!(container.chain().cached("other.pkg").is_none());
    }
}

#[test]
fn test_duplicate_redirector_registration_is_harmless() {
    let container = container(true);
    let len = container.chain().len();

    let again: Arc<dyn ModuleResolver> = container.redirector().clone();
    container.chain().prepend(again);
    assert_eq!(container.chain().len(), len);
}

// ============================================================================
// End-to-end scenario with a freestanding chain
// ============================================================================

#[test]
fn test_pkgroot_scenario() {
    let registry = Arc::new(ModuleRegistry::new());
    registry.register("pkgroot.vendor.foo", || Module::new("pkgroot.vendor.foo"));

    let chain = ResolverChain::new();
    chain.push(Arc::new(RegistryResolver::new(registry)));
    let redirector = Arc::new(VendorRedirector::single("pkgroot", "vendor", true));
    chain.prepend(redirector.clone());

    assert!(redirector.locate("pkgroot.foo"));
    assert!(!redirector.locate("other.pkg"));

    let handle = chain.resolve("pkgroot.foo").unwrap();
    let direct = chain.resolve("pkgroot.vendor.foo").unwrap();
    assert!(Arc::ptr_eq(&handle, &direct));

    redirector.rules()[0].set_enabled(false);
    assert!(!redirector.locate("other.pkg"));
}

proptest! {
    #[test]
    fn never_claims_foreign_namespaces(
        name in "[a-z]{1,8}(\\.[a-z]{1,8}){0,3}"
    ) {
        prop_assume!(name != "relay" && !name.starts_with("relay."));

        let enabled = VendorRedirector::single("relay", "vendored", true);
        let disabled = VendorRedirector::single("relay", "vendored", false);
        prop_assert!(!enabled.locate(&name));
        prop_assert!(!disabled.locate(&name));
    }
}
