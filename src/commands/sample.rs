use crate::commands::Out;
use crate::session::Session;
use crate::{Config, Result};
use std::path::{Path, PathBuf};

/// Loads the sample entries into an empty ledger and exports them.
///
/// # Arguments
/// - `out` - Where to write the workbook. Defaults to the configured export file.
///
/// # Errors
/// - Returns an error if the file type is not supported or the file cannot be written.
pub async fn sample(config: Config, out: Option<&Path>) -> Result<Out<PathBuf>> {
    let mut session = Session::new(config);
    session.seed().print();
    session.export_file(out).await
}
