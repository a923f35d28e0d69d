//! Secret-locked remittance escrow ledger
//!
//! This crate implements an escrow ledger where a sender locks a payment
//! behind a commitment derived from two secret shares, addressed to one
//! designated recipient. The recipient redeems by presenting both secrets
//! before a deadline; after the deadline the sender may reclaim the
//! principal. A small fee is withheld per deposit and accrued for the
//! ledger administrator, who can also transfer administration or revoke
//! the ledger permanently.

pub mod access_control;
pub mod clock;
pub mod error;
pub mod events;
pub mod ledger;
pub mod models;
pub mod transfer;
pub mod treasury;

use error::LedgerError;

/// Result type alias for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
