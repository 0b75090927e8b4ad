use crate::bridge::ImportSummary;
use crate::commands::Out;
use crate::session::Session;
use crate::{Config, Result};
use std::path::Path;

/// Imports `from` and exports the resulting ledger to `to`. The file types are chosen by
/// extension, so this converts between workbook and CSV files.
///
/// # Errors
/// - Returns an error if either file type is unsupported, `from` cannot be read or decoded, or
///   `to` cannot be written.
pub async fn convert(config: Config, from: &Path, to: &Path) -> Result<Out<ImportSummary>> {
    let mut session = Session::new(config);
    let imported = session.import_file(from).await?;
    imported.print();
    let exported = session.export_file(Some(to)).await?;
    let message = format!("{}\n{}", imported.message(), exported.message());
    match imported.into_structure() {
        Some(summary) => Ok(Out::new(message, summary)),
        None => Ok(Out::new_message(message)),
    }
}
