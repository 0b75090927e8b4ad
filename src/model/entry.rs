use crate::model::Amount;
use chrono::{Local, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Whether an entry is money coming in or going out.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    Income,
    Outcome,
}

serde_plain::derive_display_from_serialize!(EntryKind);
serde_plain::derive_fromstr_from_deserialize!(EntryKind);

impl EntryKind {
    /// Matches the type column of a spreadsheet row. Comparison ignores case and surrounding
    /// whitespace; anything other than "income" or "outcome" yields `None`.
    pub fn from_cell(value: &str) -> Option<EntryKind> {
        let lower = value.trim().to_lowercase();
        match lower.as_str() {
            "income" => Some(EntryKind::Income),
            "outcome" => Some(EntryKind::Outcome),
            _ => None,
        }
    }
}

/// An opaque identifier for an entry.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Generates a new identifier from the current timestamp and random bits (UUIDv7). Collisions
    /// are not checked for.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for EntryId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl From<&str> for EntryId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for EntryId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A single financial record. Entries are immutable once constructed; the `with_*` methods are for
/// building one up before it is added to a `Ledger`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Entry {
    id: EntryId,
    kind: EntryKind,
    category: String,
    amount: Amount,
    description: String,
    date: NaiveDateTime,
}

impl Entry {
    /// Creates an entry with a generated id, an empty description and the current local time.
    pub fn new(kind: EntryKind, category: impl Into<String>, amount: impl Into<Amount>) -> Self {
        Self {
            id: EntryId::generate(),
            kind,
            category: category.into(),
            amount: amount.into(),
            description: String::new(),
            date: Local::now().naive_local(),
        }
    }

    pub fn income(category: impl Into<String>, amount: impl Into<Amount>) -> Self {
        Self::new(EntryKind::Income, category, amount)
    }

    pub fn outcome(category: impl Into<String>, amount: impl Into<Amount>) -> Self {
        Self::new(EntryKind::Outcome, category, amount)
    }

    pub fn with_id(mut self, id: impl Into<EntryId>) -> Self {
        self.id = id.into();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_date(mut self, date: NaiveDateTime) -> Self {
        self.date = date;
        self
    }

    pub fn id(&self) -> &EntryId {
        &self.id
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn date(&self) -> NaiveDateTime {
        self.date
    }
}
