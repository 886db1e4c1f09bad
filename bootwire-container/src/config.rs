//! Bootstrap configuration.
//!
//! Every field has a default, so a partial document deserializes:
//!
//! ```
//! use bootwire_container::config::BootstrapConfig;
//!
//! let config = BootstrapConfig::default();
//! assert!(!config.overwrite_existing);
//! assert!(config.log_diagnostics);
//! ```

use serde::{Deserialize, Serialize};

/// Policy knobs for one bootstrap context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BootstrapConfig {
    /// Replace fields and properties that already hold a value instead of
    /// skipping them with an `AlreadySet` warning.
    pub overwrite_existing: bool,

    /// Run the validator after a successful bootstrap and keep its report.
    pub validate_after_bootstrap: bool,

    /// Mirror diagnostics to `tracing` as they are recorded.
    pub log_diagnostics: bool,
}

impl Default for BootstrapConfig {
    fn default() -> Self {
        Self {
            overwrite_existing: false,
            validate_after_bootstrap: false,
            log_diagnostics: true,
        }
    }
}
