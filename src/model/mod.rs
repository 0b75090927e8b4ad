//! Types that represent the core data model: `Entry`, `Ledger` and `Amount`.
mod amount;
mod entry;
mod ledger;

pub use amount::{Amount, AmountError};
pub use entry::{Entry, EntryId, EntryKind};
pub use ledger::{CategoryTotals, Ledger};
