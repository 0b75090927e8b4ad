//! keuangan: a personal finance tracker.
//!
//! A [`model::Ledger`] holds income and outcome entries in memory. The [`bridge::Bridge`] moves a
//! ledger in and out of spreadsheet files through a [`sheet::Codec`], and [`session::Session`]
//! applies user actions to a ledger one at a time.

pub mod args;
pub mod bridge;
pub mod commands;
mod config;
pub mod display;
mod error;
pub mod model;
pub mod session;
pub mod sheet;
pub mod summary;
#[cfg(test)]
mod test;
mod utils;

pub use config::Config;
pub use error::{Error, ErrorType, IntoResult, Result};
