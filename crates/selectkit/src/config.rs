//! Control configuration and manifests.
//!
//! A manifest describes a complete control (flags, options, initial value)
//! and can be loaded from YAML or JSON:
//!
//! ```yaml
//! config:
//!   multiple: true
//!   searchable: true
//! options:
//!   - { value: mpm, label: Maputo, group: South }
//!   - { value: bei, label: Beira, group: Centre }
//!   - { value: nam, label: Nampula, disabled: true }
//! value: [mpm]
//! ```

use crate::control::SelectControl;
use crate::error::ControlError;
use crate::option::{OptionValue, SelectOption};
use crate::store::{Ownership, SelectionMode, SelectionValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::hash::Hash;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Flags of a selection control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlConfig {
    /// Allow any number of values
    pub multiple: bool,
    /// Typed text filters the options
    pub searchable: bool,
    /// Ignore all interaction
    pub disabled: bool,
    /// Options are still being fetched; ignore all interaction
    pub loading: bool,
}

impl ControlConfig {
    /// Selection mode implied by `multiple`.
    #[must_use]
    pub const fn mode(&self) -> SelectionMode {
        if self.multiple {
            SelectionMode::Multiple
        } else {
            SelectionMode::Single
        }
    }
}

/// Errors raised while loading a manifest.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// YAML parse error
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// JSON parse error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Manifest file could not be read
    #[error("failed to read {path}: {source}")]
    Io {
        /// File that failed
        path: PathBuf,
        /// Underlying error
        source: std::io::Error,
    },

    /// Manifest content is inconsistent
    #[error("invalid control: {0}")]
    Control(#[from] ControlError),
}

/// A complete control description.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(bound(
    serialize = "T: Serialize",
    deserialize = "T: DeserializeOwned + Eq + Hash"
))]
pub struct ControlManifest<T> {
    /// Control flags
    #[serde(default)]
    pub config: ControlConfig,
    /// Options in display order
    #[serde(default)]
    pub options: Vec<SelectOption<T>>,
    /// Initial value (the default value unless `controlled`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<SelectionValue<T>>,
    /// Whether the host owns the value
    #[serde(default)]
    pub controlled: bool,
}

impl<T: OptionValue> PartialEq for ControlManifest<T> {
    fn eq(&self, other: &Self) -> bool {
        self.config == other.config
            && self.options == other.options
            && self.value == other.value
            && self.controlled == other.controlled
    }
}

impl<T: OptionValue + DeserializeOwned> ControlManifest<T> {
    /// Parse a manifest from YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the YAML is invalid.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml_ng::from_str(yaml)?)
    }

    /// Parse a manifest from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is invalid.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a manifest file. `.json` files are read as JSON, anything else
    /// as YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json {
            Self::from_json(&text)
        } else {
            Self::from_yaml(&text)
        }
    }
}

impl<T: OptionValue + Serialize> ControlManifest<T> {
    /// Serialize to YAML.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml_ng::to_string(self)?)
    }
}

impl<T: OptionValue> ControlManifest<T> {
    /// Ownership implied by `controlled`.
    #[must_use]
    pub const fn ownership(&self) -> Ownership {
        if self.controlled {
            Ownership::Controlled
        } else {
            Ownership::Uncontrolled
        }
    }

    /// Build the described control.
    ///
    /// # Errors
    ///
    /// Returns [`ControlError::DuplicateValue`] if two options share a value,
    /// or [`ControlError::ModeMismatch`] if `value` does not fit the mode.
    pub fn into_control(self) -> Result<SelectControl<T>, ControlError> {
        let ownership = self.ownership();
        let mut builder = SelectControl::builder()
            .options(self.options)
            .config(self.config);
        if let Some(value) = self.value {
            builder = match ownership {
                Ownership::Controlled => builder.value(value),
                Ownership::Uncontrolled => builder.default_value(value),
            };
        } else if ownership == Ownership::Controlled {
            builder = builder.value(SelectionValue::empty(self.config.mode()));
        }
        builder.build()
    }
}
