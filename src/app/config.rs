//! Configuration for the terminal engine

use serde::{Deserialize, Serialize};

use crate::core::ColorTable;

/// Which terminal the engine identifies itself as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeviceIdentity {
    /// VT100 with advanced video option
    Vt100,
    #[default]
    Vt102,
}

impl DeviceIdentity {
    /// Reply to a device-attributes request
    pub fn attributes_reply(&self) -> &'static [u8] {
        match self {
            DeviceIdentity::Vt100 => b"\x1b[?1;2c",
            DeviceIdentity::Vt102 => b"\x1b[?6c",
        }
    }
}

/// Terminal configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TermConfig {
    /// Lines on screen
    pub rows: usize,
    /// Columns on screen
    pub cols: usize,
    /// Longest line the engine will build
    pub max_line_len: usize,
    /// Autowrap at power-on
    pub autowrap: bool,
    /// Device-attributes identity
    pub identity: DeviceIdentity,
    /// SGR color substitutions
    pub color_table: ColorTable,
    /// Keep renditions of scrolled-out lines as inline SGR
    pub history_renditions: bool,
}

impl Default for TermConfig {
    fn default() -> Self {
        Self {
            rows: 24,
            cols: 80,
            max_line_len: 1024,
            autowrap: true,
            identity: DeviceIdentity::default(),
            color_table: ColorTable::default(),
            history_renditions: true,
        }
    }
}

impl TermConfig {
    /// Load configuration from a file
    pub fn load(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: TermConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a file
    pub fn save(&self, path: &std::path::Path) -> Result<(), ConfigError> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Load configuration from default location or return default config
    pub fn load_or_default() -> Self {
        // Try to load from ~/.config/padterm/config.json
        if let Some(config_dir) = dirs_config_path() {
            let config_path = config_dir.join("config.json");
            if config_path.exists() {
                match Self::load(&config_path) {
                    Ok(config) => return config,
                    Err(err) => {
                        tracing::warn!(path = %config_path.display(), %err, "ignoring config file");
                    },
                }
            }
        }
        Self::default()
    }

    pub fn with_size(mut self, rows: usize, cols: usize) -> Self {
        self.rows = rows;
        self.cols = cols;
        self
    }
}

/// Get the configuration directory path
fn dirs_config_path() -> Option<std::path::PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|home| std::path::PathBuf::from(home).join(".config").join("padterm"))
}

/// Configuration error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ColorPair;

    #[test]
    fn test_config_default() {
        let config = TermConfig::default();
        assert_eq!(config.rows, 24);
        assert_eq!(config.cols, 80);
        assert!(config.autowrap);
        assert_eq!(config.identity, DeviceIdentity::Vt102);
    }

    #[test]
    fn test_config_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = TermConfig::default().with_size(30, 100);
        config.autowrap = false;
        config.color_table.set(2, ColorPair::new("black", "green"));
        config.save(&path).unwrap();

        let loaded = TermConfig::load(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: TermConfig = serde_json::from_str(r#"{"cols": 132}"#).unwrap();
        assert_eq!(config.cols, 132);
        assert_eq!(config.rows, 24);
        assert!(config.history_renditions);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = TermConfig::load(&dir.path().join("nope.json"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{not json").unwrap();
        assert!(matches!(TermConfig::load(&bad), Err(ConfigError::Json(_))));
    }

    #[test]
    fn test_identity_replies() {
        assert_eq!(DeviceIdentity::Vt100.attributes_reply(), b"\x1b[?1;2c");
        assert_eq!(DeviceIdentity::Vt102.attributes_reply(), b"\x1b[?6c");
    }
}
