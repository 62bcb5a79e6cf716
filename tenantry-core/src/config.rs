//! Configuration loading for the tenant-scoping decorators.
//!
//! Every field has a default so an empty file is a valid configuration.

use crate::{ConfigError, TenantryResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable naming the configuration file used by [`TenantryConfig::load`].
pub const CONFIG_ENV_VAR: &str = "TENANTRY_CONFIG";

/// When the after-hook pass runs relative to a task body's outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AfterTaskPolicy {
    /// Run after-hooks on every exit from the body: success, error, or panic.
    #[default]
    Always,
    /// Run after-hooks only when the body succeeded.
    OnSuccess,
}

/// Settings for tenant-scoped caches.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CacheConfig {
    #[serde(default)]
    pub context_required: bool,
}

/// Settings for tenant-scoped cache registries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegistryConfig {
    #[serde(default)]
    pub context_required: bool,
}

/// Settings for intercepted task execution.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TaskConfig {
    #[serde(default)]
    pub after_task_policy: AfterTaskPolicy,
}

impl TaskConfig {
    pub fn with_policy(after_task_policy: AfterTaskPolicy) -> Self {
        Self { after_task_policy }
    }
}

/// Master configuration struct.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TenantryConfig {
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
    #[serde(default)]
    pub task: TaskConfig,
}

impl TenantryConfig {
    /// Load from the file named by `TENANTRY_CONFIG`.
    pub fn load() -> TenantryResult<Self> {
        let path = std::env::var_os(CONFIG_ENV_VAR).ok_or_else(|| {
            ConfigError::MissingConfigPath {
                env_var: CONFIG_ENV_VAR.to_string(),
            }
        })?;
        Self::from_path(Path::new(&path))
    }

    pub fn from_path(path: &Path) -> TenantryResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!(path = %path.display(), ?config, "Loaded tenantry config");
        Ok(config)
    }

    pub fn from_toml_str(contents: &str) -> TenantryResult<Self> {
        let config: TenantryConfig = toml::from_str(contents).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TenantryError;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = TenantryConfig::default();
        assert!(!config.cache.context_required);
        assert!(!config.registry.context_required);
        assert_eq!(config.task.after_task_policy, AfterTaskPolicy::Always);
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = TenantryConfig::from_toml_str("").expect("empty config should parse");
        assert_eq!(config, TenantryConfig::default());
    }

    #[test]
    fn test_full_document() {
        let config = TenantryConfig::from_toml_str(
            r#"
            [cache]
            context_required = true

            [registry]
            context_required = true

            [task]
            after_task_policy = "on_success"
            "#,
        )
        .expect("config should parse");

        assert!(config.cache.context_required);
        assert!(config.registry.context_required);
        assert_eq!(config.task.after_task_policy, AfterTaskPolicy::OnSuccess);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let err = TenantryConfig::from_toml_str("[cache]\ncontext_requierd = true\n")
            .expect_err("typo should be rejected");
        assert!(matches!(err, TenantryError::Config(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_unknown_policy_rejected() {
        let err = TenantryConfig::from_toml_str("[task]\nafter_task_policy = \"never\"\n")
            .expect_err("unknown policy should be rejected");
        assert!(matches!(err, TenantryError::Config(ConfigError::Parse { .. })));
    }

    #[test]
    fn test_from_path() {
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        writeln!(file, "[registry]\ncontext_required = true").expect("write config");

        let config = TenantryConfig::from_path(file.path()).expect("config should load");
        assert!(config.registry.context_required);
        assert!(!config.cache.context_required);
    }

    #[test]
    fn test_from_missing_path() {
        let err = TenantryConfig::from_path(Path::new("/nonexistent/tenantry.toml"))
            .expect_err("missing file should fail");
        assert!(matches!(err, TenantryError::Config(ConfigError::Io { .. })));
    }
}
