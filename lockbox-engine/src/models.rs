//! Core data models for the escrow ledger
//!
//! This module contains the account, commitment, and deposit types plus
//! the notification shapes emitted by the ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

/// Value moved between accounts and ledger custody
pub type Amount = u64;

/// Reading of the external monotonic clock collaborator
pub type ClockValue = u64;

/// Sentinel deadline meaning "no expiry window"
pub const NO_DEADLINE: ClockValue = 0;

/// Opaque, comparable account reference
///
/// Whatever the host value-transfer substrate uses to address a party;
/// the ledger only ever compares these for equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(String);

impl AccountId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AccountId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Fixed-width digest binding a secret pair to a deposit
///
/// Derived as `SHA-256(secret_a || secret_b)` and used as the sole lookup
/// key for deposits. The digest of two empty strings is reserved as
/// "no secret" and is never a valid deposit key.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Commitment([u8; 32]);

impl Commitment {
    /// Derive a commitment from the two secret shares
    pub fn derive(secret_a: &str, secret_b: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(secret_a.as_bytes());
        hasher.update(secret_b.as_bytes());
        Self(hasher.finalize().into())
    }

    /// The reserved empty-secret digest
    pub fn trivial() -> Self {
        Self::derive("", "")
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for Commitment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Commitment({})", self.to_hex())
    }
}

/// A single escrowed payment awaiting redemption or refund
///
/// Immutable once stored: the first successful redeem or refund consumes
/// it atomically, and until then no field ever changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deposit {
    /// Redemption credential and lookup key
    pub commitment: Commitment,
    /// Who funded the deposit; the only identity permitted to refund
    pub sender: AccountId,
    /// The only identity permitted to redeem
    pub recipient: AccountId,
    /// Value payable to the recipient, net of the withheld fee
    pub principal: Amount,
    /// Fee withheld into the treasury at creation
    pub fee: Amount,
    /// Absolute clock reading closing the redemption window;
    /// `NO_DEADLINE` means refundable immediately, redeemable any time
    pub deadline: ClockValue,
    /// Wall-clock creation timestamp (observability only)
    pub created_at: DateTime<Utc>,
}

/// Notifications emitted by the ledger core
///
/// Shape only; delivery happens through the event hub and how observers
/// consume them is outside the core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LedgerEvent {
    DepositCreated {
        commitment: Commitment,
        sender: AccountId,
        recipient: AccountId,
        principal: Amount,
        deadline: ClockValue,
        fee: Amount,
    },
    Redeemed {
        commitment: Commitment,
        sender: AccountId,
        recipient: AccountId,
        principal: Amount,
    },
    Refunded {
        commitment: Commitment,
        sender: AccountId,
        recipient: AccountId,
        principal: Amount,
    },
    AdministratorChanged {
        old_administrator: AccountId,
        new_administrator: AccountId,
    },
    LedgerRevoked {
        last_administrator: AccountId,
    },
}

impl LedgerEvent {
    /// Event kind tag used in logs and the audit trail
    pub fn kind(&self) -> &'static str {
        match self {
            Self::DepositCreated { .. } => "deposit.created",
            Self::Redeemed { .. } => "deposit.redeemed",
            Self::Refunded { .. } => "deposit.refunded",
            Self::AdministratorChanged { .. } => "administration.transferred",
            Self::LedgerRevoked { .. } => "ledger.revoked",
        }
    }
}
