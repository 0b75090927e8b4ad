//! The interactive session: a `Ledger` plus the settings needed to display it and move it in and
//! out of spreadsheet files.
//!
//! Every method corresponds to one discrete user action and runs to completion before the next one
//! is accepted. The only asynchronous step is reading or writing file bytes.

use crate::bridge::{Bridge, ImportSummary};
use crate::commands::Out;
use crate::error::{Error, ErrorType, IntoResult};
use crate::model::{Amount, Entry, EntryId, EntryKind, Ledger};
use crate::summary::Summary;
use crate::{utils, Config, Result};
use anyhow::Context;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Where the session is in reading a file for import.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImportState {
    #[default]
    Idle,
    /// The file bytes are being read.
    Reading,
    /// The last import decoded and was applied to the ledger.
    Decoded,
    /// The last import could not be read or decoded; the ledger was not changed.
    ReadFailed,
}

serde_plain::derive_display_from_serialize!(ImportState);

/// The data needed to add an entry, as typed by a user.
#[derive(Debug, Clone, Default)]
pub struct NewEntry {
    pub category: String,
    pub amount: String,
    pub description: Option<String>,
    pub date: Option<String>,
}

pub struct Session {
    config: Config,
    ledger: Ledger,
    import_state: ImportState,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            ledger: Ledger::new(),
            import_state: ImportState::Idle,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn import_state(&self) -> ImportState {
        self.import_state
    }

    /// Validates user input and adds an entry of `kind`.
    ///
    /// # Errors
    /// - `ErrorType::InvalidAmount` if the amount is not a number greater than zero. Nothing is
    ///   added.
    /// - `ErrorType::Usage` if a date was given that cannot be understood.
    pub fn add(&mut self, kind: EntryKind, new: NewEntry) -> Result<Out<Entry>> {
        let amount = Amount::parse_positive(&new.amount)?;
        let mut entry = Entry::new(kind, new.category, amount)
            .with_description(new.description.unwrap_or_default());
        if let Some(date) = new.date {
            entry = entry.with_date(self.parse_date(&date)?);
        }
        match kind {
            EntryKind::Income => self.ledger.add_income(entry.clone())?,
            EntryKind::Outcome => self.ledger.add_outcome(entry.clone())?,
        }
        let message = format!(
            "Added {kind} {} of {} with ID: {}",
            display_category(entry.category()),
            self.money(entry.amount().value() as i128),
            entry.id()
        );
        Ok(Out::new(message, entry))
    }

    /// Removes the entry with `id`. An unknown id is not an error.
    pub fn remove(&mut self, id: &str) -> Out<Option<Entry>> {
        match self.ledger.remove_by_id(&EntryId::from(id)) {
            Some(entry) => Out::new(
                format!("Removed {} {}", entry.kind(), entry.id()),
                Some(entry),
            ),
            None => Out::new(format!("No entry with ID: {id}"), None),
        }
    }

    pub fn clear(&mut self) -> Out<Summary> {
        self.ledger.clear_all();
        Out::new("Cleared all entries", Summary::new(&self.ledger))
    }

    pub fn seed(&mut self) -> Out<Summary> {
        self.ledger.seed_sample_data();
        Out::new(
            format!("Loaded {} sample entries", self.ledger.len()),
            Summary::new(&self.ledger),
        )
    }

    pub fn summary(&self) -> Out<Summary> {
        let summary = Summary::new(&self.ledger);
        Out::new(summary.render(&self.config.currency_format()), summary)
    }

    /// Lists incomes then outcomes, one line per entry.
    pub fn list(&self) -> Out<Vec<Entry>> {
        let date_format = self.config.date_format();
        let mut message = String::new();
        for (title, entries, empty) in [
            ("Income", self.ledger.incomes(), "No income yet"),
            ("Outcome", self.ledger.outcomes(), "No outcome yet"),
        ] {
            if !message.is_empty() {
                message.push('\n');
            }
            let _ = write!(message, "{title}:");
            if entries.is_empty() {
                let _ = write!(message, "\n  {empty}");
            }
            for e in entries {
                let description = if e.description().is_empty() {
                    "-"
                } else {
                    e.description()
                };
                let _ = write!(
                    message,
                    "\n  {}  {}  {}  {} • {}",
                    e.id(),
                    display_category(e.category()),
                    self.money(e.amount().value() as i128),
                    description,
                    date_format.format(e.date()),
                );
            }
        }
        Out::new(message, self.ledger.entries().cloned().collect())
    }

    /// Reads `path` and replaces the ledger with its rows.
    ///
    /// # Errors
    /// - `ErrorType::CodecUnavailable` if the file type is not supported.
    /// - `ErrorType::Io` if the file cannot be read.
    /// - `ErrorType::DecodeFailure` if the file contents cannot be decoded.
    ///
    /// The ledger is unchanged whenever an error is returned. If the returned future is dropped
    /// before it completes, the ledger is unchanged and the state becomes `ReadFailed`.
    pub async fn import_file(&mut self, path: &Path) -> Result<Out<ImportSummary>> {
        let bridge = Bridge::for_path(path, &self.config)?;

        let reading = ReadGuard::start(&mut self.import_state);
        debug!("Reading {}", path.display());
        let result = match utils::read_bytes(path).await.pub_result(ErrorType::Io) {
            Ok(bytes) => bridge.import(&mut self.ledger, &bytes),
            Err(e) => Err(e),
        };

        match result {
            Ok(summary) => {
                reading.finish(ImportState::Decoded);
                let mut message = format!(
                    "Imported {} entries from {}",
                    summary.imported,
                    path.display()
                );
                if summary.skipped > 0 {
                    let _ = write!(
                        message,
                        " (skipped {} rows without an Income or Outcome type)",
                        summary.skipped
                    );
                }
                Ok(Out::new(message, summary))
            }
            Err(e) => {
                warn!("Import of {} failed", path.display());
                reading.finish(ImportState::ReadFailed);
                Err(e)
            }
        }
    }

    /// Writes the ledger to `path`, or to the configured export file when `path` is `None`.
    ///
    /// # Errors
    /// - `ErrorType::CodecUnavailable` if the file type is not supported.
    /// - `ErrorType::EmptyExport` if the ledger is empty.
    /// - `ErrorType::Io` if the file cannot be written.
    pub async fn export_file(&self, path: Option<&Path>) -> Result<Out<PathBuf>> {
        let path = path.unwrap_or_else(|| self.config.export_file()).to_path_buf();
        let bridge = Bridge::for_path(&path, &self.config)?;
        let bytes = bridge.export(&self.ledger)?;
        utils::write(&path, bytes)
            .await
            .context("Unable to save the export")
            .pub_result(ErrorType::Io)?;
        Ok(Out::new(
            format!(
                "Exported {} entries to {}",
                self.ledger.len(),
                path.display()
            ),
            path,
        ))
    }

    fn parse_date(&self, s: &str) -> Result<NaiveDateTime> {
        self.config.date_format().parse(s).ok_or_else(|| {
            Error::msg(
                ErrorType::Usage,
                format!(
                    "Unable to understand the date '{s}', use the format {}",
                    self.config.date_format().pattern()
                ),
            )
        })
    }

    fn money(&self, value: i128) -> String {
        self.config.currency_format().format(value)
    }
}

/// Holds the import state at `Reading` while a file is read. A read that never finishes, for
/// example because its future was dropped, leaves the state at `ReadFailed`.
struct ReadGuard<'a> {
    state: &'a mut ImportState,
}

impl<'a> ReadGuard<'a> {
    fn start(state: &'a mut ImportState) -> Self {
        *state = ImportState::Reading;
        Self { state }
    }

    fn finish(self, outcome: ImportState) {
        *self.state = outcome;
    }
}

impl Drop for ReadGuard<'_> {
    fn drop(&mut self) {
        if *self.state == ImportState::Reading {
            *self.state = ImportState::ReadFailed;
        }
    }
}

fn display_category(category: &str) -> &str {
    if category.is_empty() {
        "(no category)"
    } else {
        category
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::TestEnv;

    fn new_entry(category: &str, amount: &str) -> NewEntry {
        NewEntry {
            category: category.to_string(),
            amount: amount.to_string(),
            ..NewEntry::default()
        }
    }

    #[test]
    fn test_add_and_summary() {
        let mut session = Session::new(Config::default());
        let out = session
            .add(EntryKind::Income, new_entry("salary", "5000000"))
            .unwrap();
        assert!(out.message().contains("Rp 5.000.000"));
        session
            .add(EntryKind::Outcome, new_entry("rent", "1500000"))
            .unwrap();
        let summary = session.summary();
        let s = summary.structure().unwrap();
        assert_eq!(s.total_income, 5_000_000);
        assert_eq!(s.total_outcome, 1_500_000);
        assert_eq!(s.balance, 3_500_000);
    }

    #[test]
    fn test_add_invalid_amount_changes_nothing() {
        let mut session = Session::new(Config::default());
        for bad in ["0", "-5", "abc", ""] {
            let err = session
                .add(EntryKind::Income, new_entry("x", bad))
                .unwrap_err();
            assert_eq!(err.error_type(), ErrorType::InvalidAmount);
        }
        assert!(session.ledger().is_empty());
    }

    #[test]
    fn test_add_with_date_and_description() {
        let mut session = Session::new(Config::default());
        let entry = session
            .add(
                EntryKind::Outcome,
                NewEntry {
                    category: "makan".into(),
                    amount: "25000".into(),
                    description: Some("nasi goreng".into()),
                    date: Some("3/11/2025".into()),
                },
            )
            .unwrap()
            .structure()
            .cloned()
            .unwrap();
        assert_eq!(entry.description(), "nasi goreng");
        assert_eq!(entry.date().to_string(), "2025-11-03 00:00:00");
    }

    #[test]
    fn test_add_with_bad_date() {
        let mut session = Session::new(Config::default());
        let mut new = new_entry("makan", "1");
        new.date = Some("besok".into());
        let err = session.add(EntryKind::Outcome, new).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Usage);
        assert!(session.ledger().is_empty());
    }

    #[test]
    fn test_remove() {
        let mut session = Session::new(Config::default());
        session.seed();
        let id = session.ledger().outcomes()[0].id().to_string();
        let out = session.remove(&id);
        assert!(out.structure().unwrap().is_some());
        assert_eq!(session.ledger().len(), 6);
        let out = session.remove(&id);
        assert!(out.structure().unwrap().is_none());
        assert_eq!(session.ledger().len(), 6);
    }

    #[test]
    fn test_list() {
        let mut session = Session::new(Config::default());
        let out = session.list();
        assert!(out.message().contains("No income yet"));
        session.seed();
        let out = session.list();
        assert_eq!(out.structure().unwrap().len(), 7);
        assert!(out
            .message()
            .contains("gaji bulanan  Rp 8.000.000  Gaji perusahaan ABC • 1/11/2025"));
    }

    #[tokio::test]
    async fn test_export_then_import_file() {
        let env = TestEnv::new().await;
        let path = env.path("ledger.xlsx");
        let mut session = Session::new(env.config());
        session.seed();
        let out = session.export_file(Some(&path)).await.unwrap();
        assert_eq!(out.structure().unwrap(), &path);

        let mut other = Session::new(env.config());
        assert_eq!(other.import_state(), ImportState::Idle);
        let out = other.import_file(&path).await.unwrap();
        assert_eq!(out.structure().unwrap().imported, 7);
        assert_eq!(other.import_state(), ImportState::Decoded);
        assert_eq!(other.ledger().balance(), session.ledger().balance());
    }

    #[tokio::test]
    async fn test_export_empty_fails() {
        let env = TestEnv::new().await;
        let session = Session::new(env.config());
        let path = env.path("empty.xlsx");
        let err = session.export_file(Some(&path)).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::EmptyExport);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_import_missing_file_is_read_failed() {
        let env = TestEnv::new().await;
        let mut session = Session::new(env.config());
        session.seed();
        let err = session
            .import_file(&env.path("missing.xlsx"))
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Io);
        assert_eq!(session.import_state(), ImportState::ReadFailed);
        assert_eq!(session.ledger().len(), 7);
    }

    #[tokio::test]
    async fn test_import_corrupt_file_is_read_failed() {
        let env = TestEnv::new().await;
        let path = env.path("corrupt.xlsx");
        std::fs::write(&path, b"garbage").unwrap();
        let mut session = Session::new(env.config());
        session.seed();
        let err = session.import_file(&path).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::DecodeFailure);
        assert_eq!(session.import_state(), ImportState::ReadFailed);
        assert_eq!(session.ledger().len(), 7);
    }

    #[test]
    fn test_abandoned_read_is_read_failed() {
        let mut state = ImportState::Idle;
        let reading = ReadGuard::start(&mut state);
        drop(reading);
        assert_eq!(state, ImportState::ReadFailed);

        let reading = ReadGuard::start(&mut state);
        reading.finish(ImportState::Decoded);
        assert_eq!(state, ImportState::Decoded);
    }

    #[tokio::test]
    async fn test_import_unsupported_extension() {
        let env = TestEnv::new().await;
        let mut session = Session::new(env.config());
        let err = session
            .import_file(&env.path("ledger.pdf"))
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::CodecUnavailable);
        assert_eq!(session.import_state(), ImportState::Idle);
    }

    #[tokio::test]
    async fn test_import_csv_skips_transfer_rows() {
        let env = TestEnv::new().await;
        let path = env.path("mixed.csv");
        std::fs::write(
            &path,
            "Tipe,Kategori,Jumlah,Keterangan,Tanggal\n\
             Income,gaji,100,,1/11/2025\n\
             Outcome,makan,30,,2/11/2025\n\
             transfer,tabungan,50,,3/11/2025\n\
             outcome,bensin,20,,4/11/2025\n",
        )
        .unwrap();
        let mut session = Session::new(env.config());
        let out = session.import_file(&path).await.unwrap();
        assert!(out.message().contains("skipped 1 rows"));
        assert_eq!(session.ledger().len(), 3);
        assert_eq!(session.ledger().balance(), 50);
    }
}
