//! Layered settings for the CLI.
//!
//! Later layers win field by field:
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/flattree/flattree.toml`
//! 3. Local config: `<dir>/.flattree.toml` (usually the working directory)
//! 4. Environment variables: `FLATTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, Map};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::ROOT_LABEL;

/// Unified configuration for flattree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Flat store file (default: `<data dir>/flattree/tree.toml`)
    pub store_path: PathBuf,
    /// Label of the hidden root written by `init`
    pub root_label: String,
    /// Top-level labels used by `init` when none are given
    pub default_labels: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
            root_label: ROOT_LABEL.to_string(),
            default_labels: Vec::new(),
        }
    }
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub store_path: Option<PathBuf>,
    pub root_label: Option<String>,
    pub default_labels: Option<Vec<String>>,
}

fn default_store_path() -> PathBuf {
    ProjectDirs::from("", "", "flattree")
        .map(|dirs| dirs.data_dir().join("tree.toml"))
        .unwrap_or_else(|| PathBuf::from("~/.flattree/tree.toml"))
}

pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "flattree").map(|dirs| dirs.config_dir().to_path_buf())
}

pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("flattree.toml"))
}

/// Get the path to the local config file in a directory.
pub fn local_config_path(dir: &Path) -> PathBuf {
    dir.join(".flattree.toml")
}

fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

/// Expand `~`, `$VAR` and `${VAR}`; leaves the input alone if expansion fails.
pub fn expand_env_vars(path: &str) -> String {
    shellexpand::full(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

impl Settings {
    fn expand_paths(&mut self) {
        let expanded = expand_env_vars(self.store_path.to_string_lossy().as_ref());
        self.store_path = PathBuf::from(expanded);
    }

    /// Overlay wins for every field it specifies.
    fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            store_path: overlay
                .store_path
                .clone()
                .unwrap_or_else(|| self.store_path.clone()),
            root_label: overlay
                .root_label
                .clone()
                .unwrap_or_else(|| self.root_label.clone()),
            default_labels: overlay
                .default_labels
                .clone()
                .unwrap_or_else(|| self.default_labels.clone()),
        }
    }

    /// Merges defaults, the global file, `<local_dir>/.flattree.toml` and
    /// the environment. A relative `store_path` in the local file is taken
    /// relative to `local_dir`.
    pub fn load(local_dir: Option<&Path>) -> Result<Self, ApplicationError> {
        let mut current = Self::default();

        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        if let Some(dir) = local_dir {
            let local_path = local_config_path(dir);
            if local_path.exists() {
                let mut raw = load_raw_settings(&local_path)?;
                raw.store_path = raw.store_path.map(|p| {
                    let p = PathBuf::from(expand_env_vars(&p.to_string_lossy()));
                    if p.is_relative() {
                        dir.join(p)
                    } else {
                        p
                    }
                });
                current = current.merge_with(&raw);
            }
        }

        current = Self::apply_env_overrides(current)?;
        current.expand_paths();

        Ok(current)
    }

    /// Apply FLATTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(settings: Self) -> Result<Self, ApplicationError> {
        Self::apply_env_source(settings, None)
    }

    /// `vars` replaces the process environment when given.
    ///
    /// Keys are `FLATTREE_STORE_PATH`, `FLATTREE_ROOT_LABEL` and
    /// `FLATTREE_DEFAULT_LABELS` (comma separated).
    fn apply_env_source(
        mut settings: Self,
        vars: Option<Map<String, String>>,
    ) -> Result<Self, ApplicationError> {
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("FLATTREE")
                    .prefix_separator("_")
                    .separator("__")
                    .source(vars),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("store_path") {
            settings.store_path = PathBuf::from(val);
        }
        if let Ok(val) = config.get_string("root_label") {
            settings.root_label = val;
        }
        if let Ok(val) = config.get_string("default_labels") {
            settings.default_labels = val
                .split(',')
                .map(str::trim)
                .filter(|label| !label.is_empty())
                .map(String::from)
                .collect();
        }

        Ok(settings)
    }

    /// Effective settings, as printed by `config show`.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Commented starter file, as printed by `config template`.
    pub fn template() -> String {
        r#"# flattree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/flattree/flattree.toml
#   Local:  ./.flattree.toml
#   Env:    FLATTREE_* environment variables

# Flat store holding the tree (relative paths in a local config are
# resolved against the directory of that config)
# store_path = "~/.local/share/flattree/tree.toml"

# Label of the hidden root node
# root_label = "Root"

# Top-level nodes created by `flattree init` when no labels are given
# default_labels = ["Network", "Audio", "Render"]
"#
        .to_string()
    }
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_no_config_when_loading_then_uses_defaults() {
        let settings = Settings::load(None).expect("load defaults");
        assert!(settings.store_path.to_string_lossy().ends_with("tree.toml"));
        assert_eq!(settings.root_label, "Root");
    }

    #[test]
    fn given_tilde_in_store_path_when_expand_paths_then_expands_to_home() {
        let mut settings = Settings {
            store_path: PathBuf::from("~/trees/tree.toml"),
            ..Settings::default()
        };

        settings.expand_paths();

        let home = std::env::var("HOME").expect("HOME should be set");
        assert!(settings.store_path.to_string_lossy().starts_with(&home));
        assert!(!settings.store_path.to_string_lossy().contains('~'));
    }

    #[test]
    fn given_partial_overlay_when_merging_then_unspecified_fields_are_kept() {
        let base = Settings {
            store_path: PathBuf::from("/tmp/base.toml"),
            root_label: "Base".into(),
            default_labels: vec!["a".into()],
        };
        let overlay = RawSettings {
            root_label: Some("Overlay".into()),
            ..RawSettings::default()
        };

        let merged = base.merge_with(&overlay);

        assert_eq!(merged.store_path, PathBuf::from("/tmp/base.toml"));
        assert_eq!(merged.root_label, "Overlay");
        assert_eq!(merged.default_labels, vec!["a".to_string()]);
    }

    fn env(pairs: &[(&str, &str)]) -> Option<Map<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn given_single_underscore_env_vars_when_applying_then_fields_are_overridden() {
        let vars = env(&[
            ("FLATTREE_ROOT_LABEL", "FromEnv"),
            ("FLATTREE_DEFAULT_LABELS", "x, y"),
            ("FLATTREE_STORE_PATH", "/tmp/env-tree.toml"),
            ("OTHER_ROOT_LABEL", "ignored"),
        ]);

        let settings = Settings::apply_env_source(Settings::default(), vars).unwrap();

        assert_eq!(settings.root_label, "FromEnv");
        assert_eq!(settings.default_labels, vec!["x", "y"]);
        assert_eq!(settings.store_path, PathBuf::from("/tmp/env-tree.toml"));
    }

    #[test]
    fn given_single_env_label_when_applying_then_list_has_one_entry() {
        let vars = env(&[("FLATTREE_DEFAULT_LABELS", "only")]);

        let settings = Settings::apply_env_source(Settings::default(), vars).unwrap();

        assert_eq!(settings.default_labels, vec!["only"]);
    }

    #[test]
    fn given_no_env_vars_when_applying_then_settings_are_unchanged() {
        let base = Settings {
            store_path: PathBuf::from("/tmp/base.toml"),
            root_label: "Base".into(),
            default_labels: vec!["a".into()],
        };

        let settings = Settings::apply_env_source(base.clone(), env(&[])).unwrap();

        assert_eq!(settings, base);
    }

    #[test]
    fn given_template_when_parsed_then_is_valid_toml() {
        let raw: RawSettings = toml::from_str(&Settings::template()).unwrap();
        assert!(raw.store_path.is_none());
    }
}
