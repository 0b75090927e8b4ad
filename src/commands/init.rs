use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use std::path::{Path, PathBuf};

/// Creates the keuangan home directory and writes an initial `config.json` with default settings.
///
/// # Arguments
/// - `keuangan_home` - The directory that will hold the configuration, e.g. `$HOME/keuangan`
///
/// # Errors
/// - Returns an error if a config file already exists or any file operation fails.
pub async fn init(keuangan_home: &Path) -> Result<Out<PathBuf>> {
    let config = Config::create(keuangan_home)
        .await
        .context("Unable to create the keuangan directory and config")
        .pub_result(ErrorType::Config)?;
    Ok(Out::new(
        format!(
            "Successfully created the keuangan config at {}",
            config.config_path().display()
        ),
        config.config_path().to_path_buf(),
    ))
}
