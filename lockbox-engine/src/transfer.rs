//! Value-transfer collaborator - moves funds between parties
//!
//! The ledger never holds balances itself; it instructs an external
//! substrate to move value between accounts and its own custody. A
//! transfer either completes or fails atomically within the calling
//! operation, so a rejected transfer leaves ledger state untouched.

use crate::models::{AccountId, Amount};
use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use thiserror::Error;
use tokio::sync::RwLock;

/// A party funds can move between
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Party {
    /// An external account on the host substrate
    Account(AccountId),
    /// The ledger's own escrow custody
    Custody,
}

impl fmt::Display for Party {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Account(id) => write!(f, "account:{}", id),
            Self::Custody => f.write_str("custody"),
        }
    }
}

/// Errors reported by the value-transfer substrate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    #[error("insufficient balance in {party}: have {available}, need {required}")]
    InsufficientBalance {
        party: String,
        available: Amount,
        required: Amount,
    },

    #[error("transfer rejected by substrate: {0}")]
    Rejected(String),
}

/// External substrate that moves value and reports balances
#[async_trait]
pub trait ValueTransfer: Send + Sync {
    /// Move `amount` from one party to another; atomic per call
    async fn move_value(
        &self,
        from: &Party,
        to: &Party,
        amount: Amount,
    ) -> Result<(), TransferError>;

    /// Current balance of an account (used by callers and tests,
    /// never by the ledger's own logic)
    async fn balance_of(&self, account: &AccountId) -> Amount;
}

#[derive(Debug, Default)]
struct BankState {
    accounts: HashMap<AccountId, Amount>,
    custody: Amount,
}

/// In-memory value-transfer substrate
///
/// Reference implementation backing tests and demos. Unknown accounts
/// read as zero and are created on first credit. `fail_next_transfer`
/// makes the next `move_value` call fail without moving anything, for
/// rollback testing.
#[derive(Debug, Default)]
pub struct InMemoryBank {
    state: RwLock<BankState>,
    fail_next: AtomicBool,
}

impl InMemoryBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account with an opening balance
    pub async fn open_account(&self, account: AccountId, balance: Amount) {
        self.state.write().await.accounts.insert(account, balance);
    }

    /// Total value currently held in ledger custody
    pub async fn custody_balance(&self) -> Amount {
        self.state.read().await.custody
    }

    /// Make the next `move_value` call fail atomically
    pub fn fail_next_transfer(&self) {
        self.fail_next.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl ValueTransfer for InMemoryBank {
    async fn move_value(
        &self,
        from: &Party,
        to: &Party,
        amount: Amount,
    ) -> Result<(), TransferError> {
        if self.fail_next.swap(false, Ordering::SeqCst) {
            return Err(TransferError::Rejected(
                "substrate failure injected".to_string(),
            ));
        }

        let mut state = self.state.write().await;

        // Debit first; a failed debit leaves both sides untouched.
        match from {
            Party::Account(id) => {
                let available = state.accounts.get(id).copied().unwrap_or(0);
                if available < amount {
                    return Err(TransferError::InsufficientBalance {
                        party: from.to_string(),
                        available,
                        required: amount,
                    });
                }
                state.accounts.insert(id.clone(), available - amount);
            }
            Party::Custody => {
                if state.custody < amount {
                    return Err(TransferError::InsufficientBalance {
                        party: from.to_string(),
                        available: state.custody,
                        required: amount,
                    });
                }
                state.custody -= amount;
            }
        }

        match to {
            Party::Account(id) => {
                *state.accounts.entry(id.clone()).or_insert(0) += amount;
            }
            Party::Custody => {
                state.custody += amount;
            }
        }

        Ok(())
    }

    async fn balance_of(&self, account: &AccountId) -> Amount {
        self.state
            .read()
            .await
            .accounts
            .get(account)
            .copied()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn moves_value_between_account_and_custody() {
        let bank = InMemoryBank::new();
        let alice = AccountId::from("alice");
        bank.open_account(alice.clone(), 100).await;

        bank.move_value(&Party::Account(alice.clone()), &Party::Custody, 60)
            .await
            .unwrap();

        assert_eq!(bank.balance_of(&alice).await, 40);
        assert_eq!(bank.custody_balance().await, 60);
    }

    #[tokio::test]
    async fn rejects_overdraft_without_moving_anything() {
        let bank = InMemoryBank::new();
        let alice = AccountId::from("alice");
        bank.open_account(alice.clone(), 10).await;

        let err = bank
            .move_value(&Party::Account(alice.clone()), &Party::Custody, 11)
            .await
            .unwrap_err();

        assert!(matches!(err, TransferError::InsufficientBalance { .. }));
        assert_eq!(bank.balance_of(&alice).await, 10);
        assert_eq!(bank.custody_balance().await, 0);
    }

    #[tokio::test]
    async fn injected_failure_hits_exactly_one_transfer() {
        let bank = InMemoryBank::new();
        let alice = AccountId::from("alice");
        bank.open_account(alice.clone(), 100).await;
        bank.fail_next_transfer();

        let err = bank
            .move_value(&Party::Account(alice.clone()), &Party::Custody, 5)
            .await
            .unwrap_err();
        assert!(matches!(err, TransferError::Rejected(_)));

        bank.move_value(&Party::Account(alice.clone()), &Party::Custody, 5)
            .await
            .unwrap();
        assert_eq!(bank.custody_balance().await, 5);
    }
}
