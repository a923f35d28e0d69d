//! Error types for the escrow ledger
//!
//! Every precondition failure is surfaced synchronously to the caller and
//! is a permanent rejection of that call; no variant represents a
//! transient condition the core would retry.

use crate::{
    models::{ClockValue, Commitment},
    transfer::TransferError,
};
use thiserror::Error;

/// Main error type for ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Deposit carried no value
    #[error("deposit value must be greater than zero")]
    ZeroValue,

    /// Commitment equals the reserved empty-secret digest
    #[error("commitment equals the empty-secret digest and cannot key a deposit")]
    TrivialSecret,

    /// Requested deadline exceeds the maximum lock window
    #[error("deadline offset {offset} exceeds the maximum window of {max}")]
    DeadlineTooFar { offset: ClockValue, max: ClockValue },

    /// Commitment already keys a live deposit
    #[error("commitment {0} already keys a live deposit")]
    CommitmentReused(Commitment),

    /// No live deposit under this commitment
    #[error("no live deposit under commitment {0}")]
    NotFound(Commitment),

    /// Caller is not the identity bound to this operation
    #[error("caller is not authorized for this operation")]
    Unauthorized,

    /// Redemption window has closed
    #[error("deadline {deadline} has passed (clock reads {now})")]
    Expired { deadline: ClockValue, now: ClockValue },

    /// Refund requested before the redemption window closed
    #[error("deadline {deadline} has not passed yet (clock reads {now})")]
    TooEarly { deadline: ClockValue, now: ClockValue },

    /// Ledger administration has been permanently revoked
    #[error("ledger has been permanently revoked")]
    Revoked,

    /// The value-transfer collaborator rejected the movement
    #[error("value transfer failed: {0}")]
    Transfer(#[from] TransferError),
}
