//! Hunting-session ledger for Entropia Universe chat logs.
//!
//! Raw `chat.log` lines are parsed into typed [`events::ParsedEvent`]s,
//! appended to a copy-on-write [`session::Session`] together with a frozen
//! cost snapshot of the active loadout, and folded into
//! [`stats::SessionStats`] on demand.

pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod export;
pub mod loadout;
pub mod logging;
pub mod parallel;
pub mod parser;
pub mod server;
pub mod session;
pub mod stats;

pub use error::LedgerError;
