use crate::error::{Error, ErrorType};
use crate::model::{Entry, EntryId, EntryKind};
use crate::Result;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::trace;

/// Category label -> summed amount.
pub type CategoryTotals = BTreeMap<String, u128>;

/// The in-memory collection of all entries for the current session.
///
/// Incomes and outcomes are kept in two separate sequences, each in insertion order. Ids are not
/// checked for uniqueness on insert; they are unique because of how `EntryId` generates them.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Ledger {
    incomes: Vec<Entry>,
    outcomes: Vec<Entry>,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an income entry.
    ///
    /// # Errors
    /// - `ErrorType::WrongEntryKind` if `entry` is an Outcome.
    pub fn add_income(&mut self, entry: Entry) -> Result<()> {
        check_kind(&entry, EntryKind::Income)?;
        trace!("Adding income {}", entry.id());
        self.incomes.push(entry);
        Ok(())
    }

    /// Appends an outcome entry.
    ///
    /// # Errors
    /// - `ErrorType::WrongEntryKind` if `entry` is an Income.
    pub fn add_outcome(&mut self, entry: Entry) -> Result<()> {
        check_kind(&entry, EntryKind::Outcome)?;
        trace!("Adding outcome {}", entry.id());
        self.outcomes.push(entry);
        Ok(())
    }

    /// Appends `entry` to the sequence that matches its kind.
    pub fn add(&mut self, entry: Entry) {
        match entry.kind() {
            EntryKind::Income => self.incomes.push(entry),
            EntryKind::Outcome => self.outcomes.push(entry),
        }
    }

    /// Removes the entry with `id` from whichever sequence holds it. Returns `None`, and changes
    /// nothing, if there is no such entry.
    pub fn remove_by_id(&mut self, id: &EntryId) -> Option<Entry> {
        for entries in [&mut self.incomes, &mut self.outcomes] {
            if let Some(ix) = entries.iter().position(|e| e.id() == id) {
                return Some(entries.remove(ix));
            }
        }
        None
    }

    pub fn clear_all(&mut self) {
        self.incomes.clear();
        self.outcomes.clear();
    }

    pub fn incomes(&self) -> &[Entry] {
        &self.incomes
    }

    pub fn outcomes(&self) -> &[Entry] {
        &self.outcomes
    }

    /// All entries, incomes first, each sequence in insertion order.
    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.incomes.iter().chain(self.outcomes.iter())
    }

    pub fn get(&self, id: &EntryId) -> Option<&Entry> {
        self.entries().find(|e| e.id() == id)
    }

    pub fn len(&self) -> usize {
        self.incomes.len() + self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.incomes.is_empty() && self.outcomes.is_empty()
    }

    pub fn total_income(&self) -> u128 {
        sum(&self.incomes)
    }

    pub fn total_outcome(&self) -> u128 {
        sum(&self.outcomes)
    }

    /// Total income minus total outcome. Negative when spending exceeds income.
    pub fn balance(&self) -> i128 {
        // Sums of u64 values cannot exceed i128::MAX for any realistic ledger length.
        self.total_income() as i128 - self.total_outcome() as i128
    }

    pub fn incomes_by_category(&self) -> CategoryTotals {
        by_category(&self.incomes)
    }

    pub fn outcomes_by_category(&self) -> CategoryTotals {
        by_category(&self.outcomes)
    }

    /// Replaces the contents of the ledger with a fixed set of example entries.
    pub fn seed_sample_data(&mut self) {
        self.clear_all();
        for (kind, category, amount, description, (y, m, d)) in SAMPLE_DATA {
            let entry = Entry::new(*kind, *category, *amount)
                .with_description(*description)
                .with_date(midnight(*y, *m, *d));
            self.add(entry);
        }
    }
}

fn check_kind(entry: &Entry, expected: EntryKind) -> Result<()> {
    if entry.kind() != expected {
        return Err(Error::msg(
            ErrorType::WrongEntryKind,
            format!(
                "Expected an {expected} entry but received an {} entry",
                entry.kind()
            ),
        ));
    }
    Ok(())
}

fn sum(entries: &[Entry]) -> u128 {
    entries.iter().map(|e| u128::from(e.amount().value())).sum()
}

fn by_category(entries: &[Entry]) -> CategoryTotals {
    let mut map = CategoryTotals::new();
    for entry in entries {
        *map.entry(entry.category().to_string()).or_default() += u128::from(entry.amount().value());
    }
    map
}

fn midnight(y: i32, m: u32, d: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .unwrap_or_default()
}

type SampleRow = (EntryKind, &'static str, u64, &'static str, (i32, u32, u32));

const SAMPLE_DATA: &[SampleRow] = &[
    (EntryKind::Income, "gaji bulanan", 8_000_000, "Gaji perusahaan ABC", (2025, 11, 1)),
    (EntryKind::Income, "freelance", 1_500_000, "Project website", (2025, 11, 5)),
    (EntryKind::Income, "lainnya", 300_000, "Penjualan barang bekas", (2025, 11, 6)),
    (EntryKind::Outcome, "belanja bulanan", 2_000_000, "Belanja pasar bulan Nov", (2025, 11, 2)),
    (EntryKind::Outcome, "operasional kantor", 750_000, "ATK dan listrik", (2025, 11, 3)),
    (EntryKind::Outcome, "hiburan mingguan", 250_000, "Nonton & makan", (2025, 11, 8)),
    (EntryKind::Outcome, "biaya tak terduga", 500_000, "Service motor", (2025, 11, 7)),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn salary_and_rent() -> Ledger {
        let mut ledger = Ledger::new();
        ledger
            .add_income(Entry::income("salary", 5_000_000u64))
            .unwrap();
        ledger
            .add_outcome(Entry::outcome("rent", 1_500_000u64))
            .unwrap();
        ledger
    }

    #[test]
    fn test_salary_and_rent_scenario() {
        let ledger = salary_and_rent();
        assert_eq!(ledger.total_income(), 5_000_000);
        assert_eq!(ledger.total_outcome(), 1_500_000);
        assert_eq!(ledger.balance(), 3_500_000);
        let expected: CategoryTotals = [("salary".to_string(), 5_000_000)].into_iter().collect();
        assert_eq!(ledger.incomes_by_category(), expected);
    }

    #[test]
    fn test_empty_ledger_totals() {
        let ledger = Ledger::new();
        assert_eq!(ledger.total_income(), 0);
        assert_eq!(ledger.total_outcome(), 0);
        assert_eq!(ledger.balance(), 0);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_negative_balance() {
        let mut ledger = Ledger::new();
        ledger.add_income(Entry::income("gaji", 100u64)).unwrap();
        ledger.add_outcome(Entry::outcome("sewa", 250u64)).unwrap();
        assert_eq!(ledger.balance(), -150);
    }

    #[test]
    fn test_add_income_rejects_outcome() {
        let mut ledger = Ledger::new();
        let err = ledger
            .add_income(Entry::outcome("rent", 10u64))
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::WrongEntryKind);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_add_outcome_rejects_income() {
        let mut ledger = Ledger::new();
        let err = ledger
            .add_outcome(Entry::income("salary", 10u64))
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::WrongEntryKind);
        assert!(ledger.is_empty());
    }

    #[test]
    fn test_duplicate_ids_are_not_checked() {
        let mut ledger = Ledger::new();
        ledger
            .add_income(Entry::income("a", 1u64).with_id("same"))
            .unwrap();
        ledger
            .add_income(Entry::income("b", 2u64).with_id("same"))
            .unwrap();
        assert_eq!(ledger.incomes().len(), 2);
    }

    #[test]
    fn test_remove_by_id() {
        let mut ledger = salary_and_rent();
        let rent_id = ledger.outcomes()[0].id().clone();
        let removed = ledger.remove_by_id(&rent_id).unwrap();
        assert_eq!(removed.category(), "rent");
        assert_eq!(ledger.total_outcome(), 0);
        assert_eq!(ledger.total_income(), 5_000_000);
        assert!(ledger.get(&rent_id).is_none());
    }

    #[test]
    fn test_remove_missing_id_is_noop() {
        let mut ledger = salary_and_rent();
        let before = ledger.clone();
        assert!(ledger.remove_by_id(&EntryId::from("nope")).is_none());
        assert_eq!(ledger, before);
        assert_eq!(ledger.len(), 2);
    }

    #[test]
    fn test_totals_track_interleaved_adds_and_removes() {
        let mut ledger = Ledger::new();
        let mut kept = Vec::new();
        for i in 1..=20u64 {
            let entry = if i % 3 == 0 {
                Entry::outcome(format!("c{}", i % 4), i * 1000)
            } else {
                Entry::income(format!("c{}", i % 4), i * 1000)
            };
            let id = entry.id().clone();
            ledger.add(entry);
            if i % 5 == 0 {
                ledger.remove_by_id(&id);
            } else {
                kept.push(id);
            }
        }
        let expected_income: u128 = ledger
            .incomes()
            .iter()
            .map(|e| e.amount().value() as u128)
            .sum();
        let expected_outcome: u128 = ledger
            .outcomes()
            .iter()
            .map(|e| e.amount().value() as u128)
            .sum();
        assert_eq!(ledger.total_income(), expected_income);
        assert_eq!(ledger.total_outcome(), expected_outcome);
        assert_eq!(ledger.len(), kept.len());
        assert_eq!(
            ledger.balance(),
            expected_income as i128 - expected_outcome as i128
        );
    }

    #[test]
    fn test_by_category_sums_and_no_zero_fill() {
        let mut ledger = Ledger::new();
        ledger.add(Entry::outcome("makan", 100u64));
        ledger.add(Entry::outcome("makan", 250u64));
        ledger.add(Entry::outcome("", 5u64));
        let map = ledger.outcomes_by_category();
        assert_eq!(map.len(), 2);
        assert_eq!(map["makan"], 350);
        assert_eq!(map[""], 5);
        assert!(ledger.incomes_by_category().is_empty());
    }

    #[test]
    fn test_clear_all() {
        let mut ledger = salary_and_rent();
        ledger.clear_all();
        assert_eq!(ledger.total_income(), 0);
        assert_eq!(ledger.total_outcome(), 0);
        assert!(ledger.incomes_by_category().is_empty());
        assert!(ledger.outcomes_by_category().is_empty());
    }

    #[test]
    fn test_entries_order_incomes_first() {
        let mut ledger = Ledger::new();
        ledger.add(Entry::outcome("o1", 1u64));
        ledger.add(Entry::income("i1", 1u64));
        ledger.add(Entry::outcome("o2", 1u64));
        ledger.add(Entry::income("i2", 1u64));
        let order: Vec<&str> = ledger.entries().map(|e| e.category()).collect();
        assert_eq!(order, vec!["i1", "i2", "o1", "o2"]);
    }

    #[test]
    fn test_seed_sample_data() {
        let mut ledger = salary_and_rent();
        ledger.seed_sample_data();
        assert_eq!(ledger.incomes().len(), 3);
        assert_eq!(ledger.outcomes().len(), 4);
        assert_eq!(ledger.total_income(), 9_800_000);
        assert_eq!(ledger.total_outcome(), 3_500_000);
        assert_eq!(ledger.balance(), 6_300_000);
        assert!(!ledger.incomes_by_category().contains_key("salary"));
        assert_eq!(
            ledger.incomes()[0].date(),
            NaiveDate::from_ymd_opt(2025, 11, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap()
        );
    }
}
