//! CLI configuration file.
//!
//! The file is TOML and lives in the platform config directory unless
//! `--config` points elsewhere:
//! - macOS: ~/Library/Application Support/com.datazen.DataZen/config.toml
//! - Windows: %APPDATA%/datazen/DataZen/config/config.toml
//! - Linux: ~/.config/datazen/config.toml
//!
//! ```toml
//! [import]
//! separator = ";"
//! decimal = ","
//! header_row = 0
//! sheet = "Results"
//!
//! [display]
//! preview_rows = 20
//! max_column_width = 30
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use dz_ingest::{ImportOptions, SheetSelector};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const APP_QUALIFIER: &str = "com";
const APP_ORG: &str = "datazen";
const APP_NAME: &str = "DataZen";
const CONFIG_FILENAME: &str = "config.toml";

pub const DEFAULT_PREVIEW_ROWS: usize = 10;
pub const DEFAULT_MAX_COLUMN_WIDTH: u16 = 24;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid separator {value:?}: expected a single ASCII character or \"tab\"")]
    InvalidSeparator { value: String },

    #[error("invalid decimal mark {value:?}: expected \".\" or \",\"")]
    InvalidDecimal { value: String },
}

/// Contents of `config.toml`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub import: ImportSection,
    pub display: DisplaySection,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ImportSection {
    pub separator: Option<String>,
    pub decimal: Option<String>,
    /// Zero-based header row. A negative value means "no header".
    pub header_row: Option<i64>,
    pub sheet: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DisplaySection {
    pub preview_rows: usize,
    pub max_column_width: u16,
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            preview_rows: DEFAULT_PREVIEW_ROWS,
            max_column_width: DEFAULT_MAX_COLUMN_WIDTH,
        }
    }
}

/// Import flags given on the command line; `None` defers to the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportOverrides {
    pub separator: Option<String>,
    pub decimal: Option<String>,
    pub header: Option<usize>,
    pub no_header: bool,
    pub sheet: Option<String>,
}

/// Path of the default config file, if the platform has a config directory.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from(APP_QUALIFIER, APP_ORG, APP_NAME)
        .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

/// Loads configuration.
///
/// An explicit path must exist and parse. Without one, the default location is
/// tried; a missing or broken default file falls back to defaults with a warning.
pub fn load_config(explicit: Option<&Path>) -> Result<Config, ConfigError> {
    if let Some(path) = explicit {
        return read_config(path);
    }
    let Some(path) = default_config_path() else {
        tracing::debug!("no platform config directory, using defaults");
        return Ok(Config::default());
    };
    match read_config(&path) {
        Ok(config) => Ok(config),
        Err(ConfigError::Read { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            Ok(Config::default())
        }
        Err(error) => {
            tracing::warn!(%error, "ignoring default config file");
            Ok(Config::default())
        }
    }
}

pub fn read_config(path: &Path) -> Result<Config, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "loaded config");
    Ok(config)
}

/// Merges command-line flags over the file's `[import]` section.
pub fn resolve_import_options(
    overrides: &ImportOverrides,
    section: &ImportSection,
) -> Result<ImportOptions, ConfigError> {
    let defaults = ImportOptions::default();

    let delimiter = match overrides.separator.as_deref().or(section.separator.as_deref()) {
        Some(value) => parse_separator(value)?,
        None => defaults.delimiter,
    };
    let decimal = match overrides.decimal.as_deref().or(section.decimal.as_deref()) {
        Some(value) => parse_decimal(value)?,
        None => defaults.decimal,
    };
    let header = if overrides.no_header {
        None
    } else if let Some(row) = overrides.header {
        Some(row)
    } else {
        match section.header_row {
            Some(row) => usize::try_from(row).ok(),
            None => defaults.header,
        }
    };
    let sheet = match overrides.sheet.as_deref().or(section.sheet.as_deref()) {
        Some(value) => value.parse().unwrap_or_default(),
        None => SheetSelector::default(),
    };

    Ok(ImportOptions {
        delimiter,
        decimal,
        header,
        sheet,
    })
}

/// Accepts a single ASCII character, or `tab` / `\t` for tabs.
pub fn parse_separator(value: &str) -> Result<u8, ConfigError> {
    match value {
        "tab" | "\\t" | "\t" => return Ok(b'\t'),
        _ => {}
    }
    match value.as_bytes() {
        [byte] if byte.is_ascii() && !byte.is_ascii_control() => Ok(*byte),
        _ => Err(ConfigError::InvalidSeparator {
            value: value.to_string(),
        }),
    }
}

pub fn parse_decimal(value: &str) -> Result<u8, ConfigError> {
    match value {
        "." => Ok(b'.'),
        "," => Ok(b','),
        _ => Err(ConfigError::InvalidDecimal {
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn separator_accepts_tab_aliases() {
        assert_eq!(parse_separator("tab").unwrap(), b'\t');
        assert_eq!(parse_separator("\\t").unwrap(), b'\t');
        assert_eq!(parse_separator(";").unwrap(), b';');
        assert!(parse_separator(";;").is_err());
        assert!(parse_separator("").is_err());
    }

    #[test]
    fn decimal_accepts_dot_or_comma() {
        assert_eq!(parse_decimal(",").unwrap(), b',');
        assert!(matches!(
            parse_decimal(":"),
            Err(ConfigError::InvalidDecimal { .. })
        ));
    }

    #[test]
    fn defaults_without_flags_or_file() {
        let options =
            resolve_import_options(&ImportOverrides::default(), &ImportSection::default())
                .unwrap();
        assert_eq!(options, ImportOptions::default());
    }

    #[test]
    fn flags_win_over_file() {
        let section = ImportSection {
            separator: Some(";".to_string()),
            decimal: Some(",".to_string()),
            header_row: Some(2),
            sheet: Some("Data".to_string()),
        };
        let overrides = ImportOverrides {
            separator: Some("tab".to_string()),
            no_header: true,
            ..ImportOverrides::default()
        };
        let options = resolve_import_options(&overrides, &section).unwrap();
        assert_eq!(options.delimiter, b'\t');
        assert_eq!(options.decimal, b',');
        assert_eq!(options.header, None);
        assert_eq!(options.sheet, SheetSelector::Name("Data".to_string()));
    }

    #[test]
    fn negative_header_row_means_no_header() {
        let section = ImportSection {
            header_row: Some(-1),
            ..ImportSection::default()
        };
        let options = resolve_import_options(&ImportOverrides::default(), &section).unwrap();
        assert_eq!(options.header, None);
    }
}
