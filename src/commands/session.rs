//! The interactive session: reads one command per line and applies it to a `Session`.
//!
//! A failed command prints a notice and the session carries on with the next line.

use crate::commands::Out;
use crate::error::{Error, ErrorType, IntoResult};
use crate::model::EntryKind;
use crate::session::{NewEntry, Session};
use crate::summary::Summary;
use crate::{Config, Result};
use anyhow::Context;
use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::{debug, info, warn};

/// Starts an interactive session over stdin, optionally importing `file` first. Returns the
/// totals of the ledger when the session ends.
///
/// # Errors
/// - Returns an error only if stdin cannot be read. Errors from individual commands are reported
///   and the session continues.
pub async fn session(config: Config, file: Option<&Path>) -> Result<Out<Summary>> {
    let mut session = Session::new(config);
    if let Some(path) = file {
        match session.import_file(path).await {
            Ok(out) => out.print(),
            Err(e) => warn!("{e}"),
        }
    }
    info!("Type 'help' for a list of commands");
    run_session(&mut session, BufReader::new(tokio::io::stdin())).await
}

/// Applies each line of `input` to `session` until the input ends or `quit` is entered.
pub async fn run_session<R>(session: &mut Session, input: R) -> Result<Out<Summary>>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines
        .next_line()
        .await
        .context("Unable to read the next command")
        .pub_result(ErrorType::Io)?
    {
        match execute(session, &line).await {
            Ok(Reply::Nothing) => {}
            Ok(Reply::Message(message)) => info!("{message}"),
            Ok(Reply::Quit) => break,
            Err(e) => warn!("{e}"),
        }
    }
    let summary = Summary::new(session.ledger());
    let message = format!(
        "Session ended with {} entries, balance {}",
        session.ledger().len(),
        session.config().currency_format().format(summary.balance)
    );
    Ok(Out::new(message, summary))
}

#[derive(Debug, Clone, Eq, PartialEq)]
enum Reply {
    Nothing,
    Message(String),
    Quit,
}

/// Commands accepted by the interactive session.
#[derive(Debug, Parser)]
#[command(
    name = "keuangan",
    no_binary_name = true,
    disable_version_flag = true,
    help_template = "{subcommands}"
)]
struct Line {
    #[command(subcommand)]
    action: Action,
}

#[derive(Debug, Subcommand)]
enum Action {
    /// Add an entry: add <income|outcome> <amount> [category] [--description <text>] [--date <date>]
    Add(AddArgs),
    /// Remove the entry with the given ID
    Remove { id: String },
    /// Remove all entries
    Clear,
    /// Replace all entries with sample data
    Seed,
    /// List all entries
    List,
    /// Show totals, balance and category breakdowns
    Summary,
    /// Replace all entries with the rows of an .xlsx or .csv file
    Import { file: PathBuf },
    /// Write all entries to an .xlsx or .csv file
    Export { file: Option<PathBuf> },
    /// End the session
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, clap::Args)]
struct AddArgs {
    #[arg(value_parser = parse_kind)]
    kind: EntryKind,

    #[arg(allow_hyphen_values = true)]
    amount: String,

    category: Option<String>,

    #[arg(long, short)]
    description: Option<String>,

    /// In the configured date format, e.g. 1/11/2025
    #[arg(long)]
    date: Option<String>,
}

fn parse_kind(s: &str) -> std::result::Result<EntryKind, String> {
    EntryKind::from_cell(s).ok_or_else(|| format!("expected income or outcome, got '{s}'"))
}

async fn execute(session: &mut Session, line: &str) -> Result<Reply> {
    let words = split_line(line)?;
    if words.is_empty() {
        return Ok(Reply::Nothing);
    }
    let parsed = match Line::try_parse_from(&words) {
        Ok(parsed) => parsed,
        Err(e) if e.kind() == ErrorKind::DisplayHelp => {
            return Ok(Reply::Message(e.to_string()));
        }
        Err(e) => return Err(Error::new(ErrorType::Usage, e)),
    };

    let reply = match parsed.action {
        Action::Add(args) => to_reply(session.add(
            args.kind,
            NewEntry {
                category: args.category.unwrap_or_default(),
                amount: args.amount,
                description: args.description,
                date: args.date,
            },
        )?),
        Action::Remove { id } => to_reply(session.remove(&id)),
        Action::Clear => to_reply(session.clear()),
        Action::Seed => to_reply(session.seed()),
        Action::List => to_reply(session.list()),
        Action::Summary => to_reply(session.summary()),
        Action::Import { file } => to_reply(session.import_file(&file).await?),
        Action::Export { file } => to_reply(session.export_file(file.as_deref()).await?),
        Action::Quit => Reply::Quit,
    };
    Ok(reply)
}

fn to_reply<T>(out: Out<T>) -> Reply
where
    T: Serialize + Clone + Debug,
{
    if let Some(structure) = out.structure() {
        if let Ok(json) = serde_json::to_string_pretty(structure) {
            debug!("Command output:\n\n{json}\n\n");
        }
    }
    Reply::Message(out.message().to_string())
}

/// Splits a command line into words. Single or double quotes group words that contain spaces.
fn split_line(line: &str) -> Result<Vec<String>> {
    let mut words = Vec::new();
    let mut current: Option<String> = None;
    let mut quote: Option<char> = None;
    for c in line.chars() {
        match quote {
            Some(q) if c == q => quote = None,
            Some(_) => current.get_or_insert_with(String::new).push(c),
            None if c == '"' || c == '\'' => {
                quote = Some(c);
                current.get_or_insert_with(String::new);
            }
            None if c.is_whitespace() => {
                if let Some(word) = current.take() {
                    words.push(word);
                }
            }
            None => current.get_or_insert_with(String::new).push(c),
        }
    }
    if let Some(q) = quote {
        return Err(Error::msg(
            ErrorType::Usage,
            format!("Missing closing {q} in the command"),
        ));
    }
    words.extend(current);
    Ok(words)
}
