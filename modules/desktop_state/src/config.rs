//! Configuration for the desktop state module

use crate::infra::extensions::DEFAULT_EXTENSION_DIRS;
use serde::{Deserialize, Serialize};

/// Desktop state configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// `gsettings` executable used as the settings store
    #[serde(default = "default_gsettings_executable")]
    pub gsettings_executable: String,

    /// Extension manager executable
    #[serde(default = "default_extension_executable")]
    pub extension_executable: String,

    /// Directories scanned for installed extensions (`~/` is expanded)
    #[serde(default = "default_extension_dirs")]
    pub extension_dirs: Vec<String>,

    /// Schema holding the enabled/disabled extension lists
    #[serde(default = "default_shell_schema")]
    pub shell_schema: String,

    #[serde(default = "default_enabled_extensions_key")]
    pub enabled_extensions_key: String,

    #[serde(default = "default_disabled_extensions_key")]
    pub disabled_extensions_key: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            gsettings_executable: default_gsettings_executable(),
            extension_executable: default_extension_executable(),
            extension_dirs: default_extension_dirs(),
            shell_schema: default_shell_schema(),
            enabled_extensions_key: default_enabled_extensions_key(),
            disabled_extensions_key: default_disabled_extensions_key(),
        }
    }
}

fn default_gsettings_executable() -> String {
    "gsettings".to_string()
}

fn default_extension_executable() -> String {
    "/usr/bin/gnome-extensions".to_string()
}

fn default_extension_dirs() -> Vec<String> {
    DEFAULT_EXTENSION_DIRS.iter().map(|d| d.to_string()).collect()
}

fn default_shell_schema() -> String {
    "org.gnome.shell".to_string()
}

fn default_enabled_extensions_key() -> String {
    "enabled-extensions".to_string()
}

fn default_disabled_extensions_key() -> String {
    "disabled-extensions".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_fills_defaults() {
        let cfg: Config =
            serde_json::from_str(r#"{"extension_executable": "/opt/bin/gnome-extensions"}"#).unwrap();
        assert_eq!(cfg.extension_executable, "/opt/bin/gnome-extensions");
        assert_eq!(cfg.gsettings_executable, "gsettings");
        assert_eq!(cfg.extension_dirs.len(), 2);
        assert_eq!(cfg.enabled_extensions_key, "enabled-extensions");
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = serde_json::from_str::<Config>(r#"{"retention": 30}"#);
        assert!(result.is_err());
    }
}
