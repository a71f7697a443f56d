//! Bridge configuration

use serde::{Deserialize, Serialize};
use shiori_core::{Charset, Result, ShioriError};
use std::path::Path;

/// Bridge configuration
///
/// Loaded from TOML when the host ships a `bridge.toml`; every field has
/// a default so an absent file configures a working bridge.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Upper bound, in bytes, for a stored ghost directory path.
    /// Longer paths are truncated at a character boundary, never copied
    /// past the bound.
    #[serde(default = "default_max_directory_bytes")]
    pub max_directory_bytes: usize,

    /// Name reported in the `Sender` header of responses
    #[serde(default = "default_sender")]
    pub sender: String,

    /// Charset assumed until the host calls `set_encoding`
    #[serde(default)]
    pub charset: Charset,

    /// Whether `load` fails when the ghost directory has no readable
    /// `descript.txt`. Off by default; a bare directory is tolerated.
    #[serde(default)]
    pub require_descriptor: bool,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            max_directory_bytes: default_max_directory_bytes(),
            sender: default_sender(),
            charset: Charset::default(),
            require_descriptor: false,
        }
    }
}

fn default_max_directory_bytes() -> usize {
    4096
}

fn default_sender() -> String {
    "shiori-bridge".to_string()
}

impl BridgeConfig {
    /// Parse configuration from TOML
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| ShioriError::ParseError(e.to_string()))
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.max_directory_bytes, 4096);
        assert_eq!(config.sender, "shiori-bridge");
        assert_eq!(config.charset, Charset::Utf8);
        assert!(!config.require_descriptor);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = BridgeConfig::from_toml("sender = \"embryo\"\n").unwrap();
        assert_eq!(config.sender, "embryo");
        assert_eq!(config.max_directory_bytes, 4096);
    }

    #[test]
    fn test_full_toml() {
        let config = BridgeConfig::from_toml(
            "max_directory_bytes = 260\nsender = \"host\"\ncharset = \"shift_jis\"\n",
        )
        .unwrap();
        assert_eq!(config.max_directory_bytes, 260);
        assert_eq!(config.charset, Charset::ShiftJis);
    }

    #[test]
    fn test_bad_toml_is_parse_error() {
        assert!(matches!(
            BridgeConfig::from_toml("max_directory_bytes = \"many\""),
            Err(ShioriError::ParseError(_))
        ));
    }
}
