//! These structs provide the CLI interface for the keuangan CLI.

use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// keuangan: A personal finance tracker for incomes and outcomes.
///
/// Entries live in memory for the length of a command or an interactive session. They can be
/// imported from and exported to spreadsheet files (.xlsx or .csv) with the columns Tipe,
/// Kategori, Jumlah, Keterangan and Tanggal.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the keuangan directory and write a config.json with default settings.
    ///
    /// The config file is optional. Edit it to change the currency symbol, the thousands
    /// separator, the date format or the name of the exported sheet.
    Init,
    /// Write the sample entries to a spreadsheet file.
    Sample(SampleArgs),
    /// Show totals, balance and category breakdowns for a spreadsheet file.
    Summary(FileArgs),
    /// Read a spreadsheet file and write its entries to another, e.g. from .xlsx to .csv.
    Convert(ConvertArgs),
    /// Start an interactive session. Type 'help' once it is running for a list of commands.
    Session(SessionArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where the keuangan configuration is held. Defaults to ~/keuangan
    #[arg(long, env = "KEUANGAN_HOME", default_value_t = default_keuangan_home())]
    keuangan_home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, keuangan_home: PathBuf) -> Self {
        Self {
            log_level,
            keuangan_home: keuangan_home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn keuangan_home(&self) -> &DisplayPath {
        &self.keuangan_home
    }
}

/// (Not shown): Args for the `keuangan sample` command.
#[derive(Debug, Parser, Clone)]
pub struct SampleArgs {
    /// Where to write the sample entries. Defaults to the export_file in config.json.
    #[arg(long)]
    out: Option<PathBuf>,
}

impl SampleArgs {
    pub fn new(out: Option<PathBuf>) -> Self {
        Self { out }
    }

    pub fn out(&self) -> Option<&Path> {
        self.out.as_deref()
    }
}

/// (Not shown): Args for commands that read one file.
#[derive(Debug, Parser, Clone)]
pub struct FileArgs {
    /// An .xlsx or .csv file
    file: PathBuf,
}

impl FileArgs {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self { file: file.into() }
    }

    pub fn file(&self) -> &Path {
        &self.file
    }
}

/// (Not shown): Args for the `keuangan convert` command.
#[derive(Debug, Parser, Clone)]
pub struct ConvertArgs {
    /// The file to read
    from: PathBuf,

    /// The file to write. Its extension chooses the file type.
    to: PathBuf,
}

impl ConvertArgs {
    pub fn new(from: impl Into<PathBuf>, to: impl Into<PathBuf>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn from(&self) -> &Path {
        &self.from
    }

    pub fn to(&self) -> &Path {
        &self.to
    }
}

/// (Not shown): Args for the `keuangan session` command.
#[derive(Debug, Parser, Clone)]
pub struct SessionArgs {
    /// A file to import when the session starts
    #[arg(long)]
    file: Option<PathBuf>,
}

impl SessionArgs {
    pub fn new(file: Option<PathBuf>) -> Self {
        Self { file }
    }

    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }
}

fn default_keuangan_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("keuangan"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --keuangan-home or KEUANGAN_HOME instead of relying on the \
                default keuangan home directory.",
            );
            PathBuf::from("keuangan")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_convert() {
        let args = Args::try_parse_from([
            "keuangan",
            "--keuangan-home",
            "/tmp/k",
            "--log-level",
            "debug",
            "convert",
            "a.xlsx",
            "b.csv",
        ])
        .unwrap();
        assert_eq!(args.common().keuangan_home().path(), Path::new("/tmp/k"));
        assert_eq!(args.common().log_level(), LevelFilter::DEBUG);
        match args.command() {
            Command::Convert(c) => {
                assert_eq!(c.from(), Path::new("a.xlsx"));
                assert_eq!(c.to(), Path::new("b.csv"));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_parse_session_and_sample() {
        let args = Args::try_parse_from(["keuangan", "session", "--file", "x.csv"]).unwrap();
        assert!(matches!(args.command(), Command::Session(s) if s.file() == Some(Path::new("x.csv"))));

        let args = Args::try_parse_from(["keuangan", "sample"]).unwrap();
        assert!(matches!(args.command(), Command::Sample(s) if s.out().is_none()));
    }

    #[test]
    fn test_summary_requires_file() {
        assert!(Args::try_parse_from(["keuangan", "summary"]).is_err());
    }
}
