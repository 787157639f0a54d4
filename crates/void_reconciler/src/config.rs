//! Reconciler configuration
//!
//! Loaded from TOML; every section is optional.
//!
//! ```toml
//! unsupported_types = "null_instance"   # or "reject"
//!
//! [trace]
//! create_instance = true
//! append_child = true
//! prepare_update = false
//! commit_update = false
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Errors from configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

/// What to do with element types missing from the registry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnsupportedTypePolicy {
    /// Log a warning and mount a null placeholder
    #[default]
    NullInstance,
    /// Fail the mount or update
    Reject,
}

/// Host callbacks that can be traced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Callback {
    CreateInstance,
    AppendInitialChild,
    AppendChild,
    AppendChildToContainer,
    InsertBefore,
    InsertInContainerBefore,
    RemoveChild,
    RemoveChildFromContainer,
    PrepareUpdate,
    CommitUpdate,
    DetachDeletedInstance,
}

impl Callback {
    /// Protocol name of the callback
    pub fn name(&self) -> &'static str {
        match self {
            Self::CreateInstance => "createInstance",
            Self::AppendInitialChild => "appendInitialChild",
            Self::AppendChild => "appendChild",
            Self::AppendChildToContainer => "appendChildToContainer",
            Self::InsertBefore => "insertBefore",
            Self::InsertInContainerBefore => "insertInContainerBefore",
            Self::RemoveChild => "removeChild",
            Self::RemoveChildFromContainer => "removeChildFromContainer",
            Self::PrepareUpdate => "prepareUpdate",
            Self::CommitUpdate => "commitUpdate",
            Self::DetachDeletedInstance => "detachDeletedInstance",
        }
    }
}

/// Per-callback trace toggles
///
/// Structural callbacks are traced by default; the per-frame update pair
/// is not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallbackTrace {
    pub create_instance: bool,
    pub append_initial_child: bool,
    pub append_child: bool,
    pub append_child_to_container: bool,
    pub insert_before: bool,
    pub insert_in_container_before: bool,
    pub remove_child: bool,
    pub remove_child_from_container: bool,
    pub prepare_update: bool,
    pub commit_update: bool,
    pub detach_deleted_instance: bool,
}

impl Default for CallbackTrace {
    fn default() -> Self {
        Self {
            create_instance: true,
            append_initial_child: true,
            append_child: true,
            append_child_to_container: true,
            insert_before: true,
            insert_in_container_before: true,
            remove_child: true,
            remove_child_from_container: true,
            prepare_update: false,
            commit_update: false,
            detach_deleted_instance: true,
        }
    }
}

impl CallbackTrace {
    /// Trace nothing
    pub fn silent() -> Self {
        Self {
            create_instance: false,
            append_initial_child: false,
            append_child: false,
            append_child_to_container: false,
            insert_before: false,
            insert_in_container_before: false,
            remove_child: false,
            remove_child_from_container: false,
            prepare_update: false,
            commit_update: false,
            detach_deleted_instance: false,
        }
    }

    pub fn enabled(&self, callback: Callback) -> bool {
        match callback {
            Callback::CreateInstance => self.create_instance,
            Callback::AppendInitialChild => self.append_initial_child,
            Callback::AppendChild => self.append_child,
            Callback::AppendChildToContainer => self.append_child_to_container,
            Callback::InsertBefore => self.insert_before,
            Callback::InsertInContainerBefore => self.insert_in_container_before,
            Callback::RemoveChild => self.remove_child,
            Callback::RemoveChildFromContainer => self.remove_child_from_container,
            Callback::PrepareUpdate => self.prepare_update,
            Callback::CommitUpdate => self.commit_update,
            Callback::DetachDeletedInstance => self.detach_deleted_instance,
        }
    }
}

/// Top-level reconciler settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcilerConfig {
    pub unsupported_types: UnsupportedTypePolicy,
    pub trace: CallbackTrace,
}

impl ReconcilerConfig {
    /// Parse from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Load from a TOML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ReconcilerConfig::default();
        assert_eq!(config.unsupported_types, UnsupportedTypePolicy::NullInstance);
        assert!(config.trace.enabled(Callback::CreateInstance));
        assert!(config.trace.enabled(Callback::RemoveChildFromContainer));
        assert!(!config.trace.enabled(Callback::PrepareUpdate));
        assert!(!config.trace.enabled(Callback::CommitUpdate));
    }

    #[test]
    fn test_partial_toml() {
        let config = ReconcilerConfig::from_toml_str(
            r#"
            unsupported_types = "reject"

            [trace]
            commit_update = true
            create_instance = false
            "#,
        )
        .unwrap();

        assert_eq!(config.unsupported_types, UnsupportedTypePolicy::Reject);
        assert!(config.trace.enabled(Callback::CommitUpdate));
        assert!(!config.trace.enabled(Callback::CreateInstance));
        assert!(config.trace.enabled(Callback::AppendChild));
    }

    #[test]
    fn test_empty_toml_is_default() {
        assert_eq!(
            ReconcilerConfig::from_toml_str("").unwrap(),
            ReconcilerConfig::default()
        );
    }

    #[test]
    fn test_bad_policy() {
        let err = ReconcilerConfig::from_toml_str(r#"unsupported_types = "explode""#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[trace]\nremove_child = false").unwrap();

        let config = ReconcilerConfig::load(file.path()).unwrap();
        assert!(!config.trace.enabled(Callback::RemoveChild));
        assert!(config.trace.enabled(Callback::InsertBefore));
    }

    #[test]
    fn test_missing_file() {
        let err = ReconcilerConfig::load("/nonexistent/reconciler.toml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }

    #[test]
    fn test_callback_names() {
        assert_eq!(Callback::AppendChildToContainer.name(), "appendChildToContainer");
        assert_eq!(Callback::DetachDeletedInstance.name(), "detachDeletedInstance");
    }
}
