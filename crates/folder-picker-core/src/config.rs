//! Picker configuration.
//!
//! [`PickerConfig`] carries the plain-data half of the host property
//! contract. It can be built in code with the `with_*` methods or loaded from
//! TOML:
//!
//! ```
//! use folder_picker_core::PickerConfig;
//!
//! let config = PickerConfig::from_toml_str(r#"
//! label = "Target folder"
//! target_property = "folder"
//! base_folder = "/sites/a"
//! deferred_validation_time_ms = 250
//! "#).unwrap();
//! assert_eq!(config.page_size, 6);
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::folder::normalize_or_root;

/// Number of folders shown per dialog page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: usize = 6;

/// Default idle delay before a confirmed value is validated.
pub const DEFAULT_VALIDATION_DELAY_MS: u64 = 200;

/// Configuration for a folder picker control.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PickerConfig {
    /// Label shown above the value.
    pub label: String,
    /// Key of the host property this control edits.
    pub target_property: String,
    /// Upper bound of the browsable subtree. Empty means the site root.
    pub base_folder: Option<String>,
    /// Folder the control starts with.
    pub initial_folder: Option<String>,
    /// Whether the browse and clear actions are disabled.
    pub disabled: bool,
    /// Idle delay before validation, in milliseconds.
    pub deferred_validation_time_ms: u64,
    /// Folders per dialog page.
    pub page_size: usize,
    /// Server-relative URL of the web. Navigating up onto it yields the root.
    pub web_server_relative_url: String,
    /// When set, the host is not asked to re-render after a change.
    pub disable_reactive_property_changes: bool,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            label: String::new(),
            target_property: String::new(),
            base_folder: None,
            initial_folder: None,
            disabled: false,
            deferred_validation_time_ms: DEFAULT_VALIDATION_DELAY_MS,
            page_size: DEFAULT_PAGE_SIZE,
            web_server_relative_url: String::new(),
            disable_reactive_property_changes: false,
        }
    }
}

impl PickerConfig {
    /// Create a configuration for the given property key.
    pub fn new(target_property: impl Into<String>) -> Self {
        Self {
            target_property: target_property.into(),
            ..Default::default()
        }
    }

    /// Parse a configuration from TOML.
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Check numeric settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::OutOfRange {
                field: "page_size",
                value: 0,
            });
        }
        Ok(())
    }

    /// Set the label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Restrict browsing to the subtree under `base_folder`.
    pub fn with_base_folder(mut self, base_folder: impl Into<String>) -> Self {
        self.base_folder = Some(base_folder.into());
        self
    }

    /// Seed the control with an initial value.
    pub fn with_initial_folder(mut self, initial_folder: impl Into<String>) -> Self {
        self.initial_folder = Some(initial_folder.into());
        self
    }

    /// Disable the browse and clear actions.
    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Set the validation debounce delay.
    pub fn with_validation_delay(mut self, delay: Duration) -> Self {
        self.deferred_validation_time_ms = delay.as_millis() as u64;
        self
    }

    /// Set the number of folders per page.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the web's server-relative URL.
    pub fn with_web_server_relative_url(mut self, url: impl Into<String>) -> Self {
        self.web_server_relative_url = url.into();
        self
    }

    /// Stop asking the host to re-render after changes.
    pub fn with_reactive_changes_disabled(mut self, disabled: bool) -> Self {
        self.disable_reactive_property_changes = disabled;
        self
    }

    /// The validation debounce delay.
    pub fn validation_delay(&self) -> Duration {
        Duration::from_millis(self.deferred_validation_time_ms)
    }

    /// The base folder, normalized. Root is `""`.
    pub fn normalized_base_folder(&self) -> String {
        self.base_folder
            .as_deref()
            .map(|raw| normalize_or_root("base_folder", raw))
            .unwrap_or_default()
    }

    /// The initial folder, normalized. `None` when unset or root.
    pub fn normalized_initial_folder(&self) -> Option<String> {
        self.initial_folder
            .as_deref()
            .map(|raw| normalize_or_root("initial_folder", raw))
            .filter(|path| !path.is_empty())
    }

    /// The web's server-relative URL, normalized.
    pub fn normalized_web_url(&self) -> String {
        normalize_or_root("web_server_relative_url", &self.web_server_relative_url)
    }
}
