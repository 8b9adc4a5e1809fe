//! Optional TOML configuration file.
//!
//! Every key is optional; anything missing falls back to the CLI / environment
//! value or the built-in default.  Example:
//!
//! ```toml
//! [server]
//! port = 3000
//! bind_address = "0.0.0.0"
//! ping_interval_secs = 30
//! outbox_capacity = 256
//!
//! [palette]
//! colors = ["#FF0000", "#00FF00", "#0000FF"]
//! ```
//!
//! Fields annotated with `#[serde(default)]` tolerate their whole section
//! being absent, so an empty file is a valid config.

use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use whiteboard_core::{ColorPalette, PaletteError};

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("I/O error reading config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The `[palette]` section is empty or holds an invalid color.
    #[error("invalid palette: {0}")]
    Palette(#[from] PaletteError),
}

// ── Config schema types ───────────────────────────────────────────────────────

/// Top-level shape of the config file.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub palette: PaletteSection,
}

/// Network and queueing settings.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    pub port: Option<u16>,
    /// IP address to bind to.  `"0.0.0.0"` binds all interfaces.
    pub bind_address: Option<String>,
    pub ping_interval_secs: Option<u64>,
    pub outbox_capacity: Option<usize>,
}

/// Colors assigned to sessions in connection order.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PaletteSection {
    pub colors: Option<Vec<String>>,
}

impl FileConfig {
    /// Validates the configured palette, if any.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Palette`] if `colors` is present but empty or
    /// contains something other than `#RGB` / `#RRGGBB`.
    pub fn palette(&self) -> Result<Option<ColorPalette>, ConfigError> {
        match &self.palette.colors {
            Some(colors) => Ok(Some(ColorPalette::from_strs(colors)?)),
            None => Ok(None),
        }
    }
}

// ── Loading ───────────────────────────────────────────────────────────────────

/// Parses config file text.
///
/// # Errors
///
/// Returns [`ConfigError::Parse`] on malformed TOML or unknown keys.
pub fn parse_config(text: &str) -> Result<FileConfig, ConfigError> {
    Ok(toml::from_str(text)?)
}

/// Reads and parses the config file at `path`.
///
/// # Errors
///
/// Returns [`ConfigError::Io`] if the file cannot be read, otherwise the
/// errors of [`parse_config`].
pub fn load_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&text)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_is_all_defaults() {
        let cfg = parse_config("").unwrap();
        assert_eq!(cfg, FileConfig::default());
        assert!(cfg.palette().unwrap().is_none());
    }

    #[test]
    fn test_full_file_parses() {
        // Arrange
        let text = r##"
            [server]
            port = 8080
            bind_address = "127.0.0.1"
            ping_interval_secs = 10
            outbox_capacity = 64

            [palette]
            colors = ["#111111", "#222222"]
        "##;

        // Act
        let cfg = parse_config(text).unwrap();

        // Assert
        assert_eq!(cfg.server.port, Some(8080));
        assert_eq!(cfg.server.bind_address.as_deref(), Some("127.0.0.1"));
        assert_eq!(cfg.server.ping_interval_secs, Some(10));
        assert_eq!(cfg.server.outbox_capacity, Some(64));
        let palette = cfg.palette().unwrap().unwrap();
        assert_eq!(palette.len(), 2);
        assert_eq!(palette.color_for(1).as_str(), "#222222");
    }

    #[test]
    fn test_partial_server_section() {
        let cfg = parse_config("[server]\nport = 9000\n").unwrap();
        assert_eq!(cfg.server.port, Some(9000));
        assert!(cfg.server.bind_address.is_none());
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let result = parse_config("[server]\nprot = 9000\n");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_empty_palette_is_rejected() {
        let cfg = parse_config("[palette]\ncolors = []\n").unwrap();
        assert!(matches!(
            cfg.palette(),
            Err(ConfigError::Palette(PaletteError::Empty))
        ));
    }

    #[test]
    fn test_invalid_palette_color_is_rejected() {
        let cfg = parse_config("[palette]\ncolors = [\"#FF0000\", \"purple\"]\n").unwrap();
        assert!(matches!(
            cfg.palette(),
            Err(ConfigError::Palette(PaletteError::InvalidColor(c))) if c == "purple"
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_config(Path::new("/definitely/not/here/whiteboard.toml"));
        assert!(matches!(result, Err(ConfigError::Io { .. })));
    }

    #[test]
    fn test_load_config_reads_file() {
        let path = std::env::temp_dir().join(format!(
            "whiteboard-config-test-{}.toml",
            std::process::id()
        ));
        std::fs::write(&path, "[server]\nport = 4321\n").unwrap();

        let cfg = load_config(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(cfg.server.port, Some(4321));
    }
}
