use serde::{Deserialize, Serialize};
use std::path::Path;

/// Vendored-dependency redirection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorOptions {
    /// Namespace root being intercepted (default: "relay")
    #[serde(default = "default_watched_root")]
    pub watched_root: String,

    /// Segment the bundled copy lives under (default: "vendored")
    #[serde(default = "default_vendored_segment")]
    pub vendored_segment: String,

    /// Serve the bundled copy instead of the real package (default: true)
    #[serde(default = "default_true")]
    pub enabled: bool,
}

fn default_watched_root() -> String {
    "relay".to_string()
}

fn default_vendored_segment() -> String {
    "vendored".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for VendorOptions {
    fn default() -> Self {
        Self {
            watched_root: default_watched_root(),
            vendored_segment: default_vendored_segment(),
            enabled: true,
        }
    }
}

/// Toolkit bootstrap configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolkitConfig {
    /// The toolkit's own namespace root, used by the default warning
    /// filters (default: "loadstone")
    #[serde(default = "default_namespace_root")]
    pub namespace_root: String,

    /// Vendor redirection settings
    #[serde(default)]
    pub vendor: VendorOptions,

    /// Install the tracing subscriber during bootstrap (default: true)
    #[serde(default = "default_true")]
    pub setup_logging: bool,
}

fn default_namespace_root() -> String {
    "loadstone".to_string()
}

impl Default for ToolkitConfig {
    fn default() -> Self {
        Self {
            namespace_root: default_namespace_root(),
            vendor: VendorOptions::default(),
            setup_logging: true,
        }
    }
}

impl ToolkitConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, crate::errors::BootstrapError> {
        let content = std::fs::read_to_string(path)?;
        let config: ToolkitConfig = serde_json::from_str(&content)
            .map_err(|e| crate::errors::BootstrapError::Config(e.to_string()))?;
        Ok(config)
    }

    /// Create a default configuration and write it to a file
    pub fn init_file(path: &Path) -> Result<(), crate::errors::BootstrapError> {
        let config = ToolkitConfig::default();
        let json = serde_json::to_string_pretty(&config)
            .map_err(|e| crate::errors::BootstrapError::Config(e.to_string()))?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
