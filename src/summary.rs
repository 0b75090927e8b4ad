//! A serializable snapshot of a ledger's totals, used as the structured output of commands.

use crate::display::CurrencyFormat;
use crate::model::{CategoryTotals, Ledger};
use serde::Serialize;
use std::fmt::Write;

#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Summary {
    pub income_count: usize,
    pub outcome_count: usize,
    pub total_income: u128,
    pub total_outcome: u128,
    pub balance: i128,
    pub incomes_by_category: CategoryTotals,
    pub outcomes_by_category: CategoryTotals,
}

impl Summary {
    pub fn new(ledger: &Ledger) -> Self {
        Self {
            income_count: ledger.incomes().len(),
            outcome_count: ledger.outcomes().len(),
            total_income: ledger.total_income(),
            total_outcome: ledger.total_outcome(),
            balance: ledger.balance(),
            incomes_by_category: ledger.incomes_by_category(),
            outcomes_by_category: ledger.outcomes_by_category(),
        }
    }

    /// Renders a human-readable report.
    pub fn render(&self, currency: &CurrencyFormat) -> String {
        let money = |v: u128| currency.format(v as i128);
        let mut s = String::new();
        let _ = writeln!(
            s,
            "Total income:  {} ({} entries)",
            money(self.total_income),
            self.income_count
        );
        let _ = writeln!(
            s,
            "Total outcome: {} ({} entries)",
            money(self.total_outcome),
            self.outcome_count
        );
        let _ = write!(s, "Balance:       {}", currency.format(self.balance));
        for (title, map) in [
            ("Income by category", &self.incomes_by_category),
            ("Outcome by category", &self.outcomes_by_category),
        ] {
            if map.is_empty() {
                continue;
            }
            let _ = write!(s, "\n{title}:");
            for (category, total) in map {
                let label = if category.is_empty() { "-" } else { category.as_str() };
                let _ = write!(s, "\n  {label}: {}", money(*total));
            }
        }
        s
    }
}
