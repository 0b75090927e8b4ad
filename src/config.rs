//! Configuration file handling.
//!
//! The configuration file is stored at `$KEUANGAN_HOME/config.json` and holds the locale settings
//! used when displaying money and dates, and the names used when exporting a workbook. The file is
//! optional: when it does not exist the defaults are used.

use crate::display::{CurrencyFormat, DateFormat, DEFAULT_DATE_FORMAT};
use crate::error::{ErrorType, IntoResult};
use crate::sheet::{DATA_SHEET, EXPORT_FILE};
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_NAME: &str = "keuangan";
const CONFIG_VERSION: u8 = 1;
const CONFIG_JSON: &str = "config.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$KEUANGAN_HOME` and from there it loads `$KEUANGAN_HOME/config.json`.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the home directory if needed and writes a `config.json` with default settings.
    ///
    /// # Errors
    /// - `ErrorType::Config` if `config.json` already exists or any file operation fails.
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        Self::create_inner(dir.into())
            .await
            .pub_result(ErrorType::Config)
    }

    async fn create_inner(maybe_relative: PathBuf) -> anyhow::Result<Self> {
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the keuangan home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if config_path.exists() {
            bail!(
                "A config file already exists at '{}'",
                config_path.display()
            );
        }

        let config_file = ConfigFile::default();
        config_file.save(&config_path).await?;

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    /// Loads `config.json` from `home`. If the directory or the file does not exist, the default
    /// settings are used instead.
    ///
    /// # Errors
    /// - `ErrorType::Config` if the file exists but cannot be read or is invalid.
    pub async fn load(home: impl Into<PathBuf>) -> Result<Self> {
        let root = home.into();
        let config_path = root.join(CONFIG_JSON);
        let config_file = if config_path.is_file() {
            ConfigFile::load(&config_path)
                .await
                .pub_result(ErrorType::Config)?
        } else {
            debug!(
                "No config file at '{}', using defaults",
                config_path.display()
            );
            ConfigFile::default()
        };
        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// The name of the sheet written on export.
    pub fn sheet_name(&self) -> &str {
        &self.config_file.sheet_name
    }

    /// The file written by `export` when no path is given.
    pub fn export_file(&self) -> &Path {
        &self.config_file.export_file
    }

    pub fn date_format(&self) -> DateFormat {
        DateFormat::new(&self.config_file.date_format)
    }

    pub fn currency_format(&self) -> CurrencyFormat {
        CurrencyFormat::new(
            &self.config_file.currency_symbol,
            &self.config_file.thousands_separator,
        )
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            root: PathBuf::new(),
            config_path: PathBuf::from(CONFIG_JSON),
            config_file: ConfigFile::default(),
        }
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "keuangan",
///   "config_version": 1,
///   "sheet_name": "DataKeuangan",
///   "export_file": "perencanaan_keuangan.xlsx",
///   "date_format": "%-d/%-m/%Y",
///   "currency_symbol": "Rp",
///   "thousands_separator": "."
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(default)]
struct ConfigFile {
    /// Application name, should always be "keuangan"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// The name of the sheet written on export
    sheet_name: String,

    /// The file written by export when no path is given, relative to the working directory
    export_file: PathBuf,

    /// A chrono strftime pattern for the locale date format
    date_format: String,

    /// Prefix for displayed amounts of money
    currency_symbol: String,

    /// Separator between groups of thousands in displayed amounts of money
    thousands_separator: String,
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            sheet_name: DATA_SHEET.to_string(),
            export_file: PathBuf::from(EXPORT_FILE),
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            currency_symbol: "Rp".to_string(),
            thousands_separator: ".".to_string(),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    async fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path).await?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            !config.sheet_name.is_empty(),
            "The sheet_name in the config file must not be empty"
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}
