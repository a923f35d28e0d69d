//! Escrow ledger - the core deposit/redeem/refund state machine
//!
//! Holds the set of live deposits keyed by commitment, accrues fees into
//! the treasury, and executes every operation as one atomic step against
//! shared state. Per deposit the machine is `absent -> pending ->
//! removed`: exactly one of redeem or refund ever succeeds, enforced by
//! removal under the mutation lock.

use crate::{
    access_control::AccessControl,
    clock::Clock,
    error::LedgerError,
    events::EventHub,
    models::{AccountId, Amount, ClockValue, Commitment, Deposit, LedgerEvent, NO_DEADLINE},
    transfer::{Party, ValueTransfer},
    treasury::FeeTreasury,
    LedgerResult,
};
use chrono::Utc;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use tracing::info;

/// Configuration for the escrow ledger
#[derive(Debug, Clone)]
pub struct LedgerConfig {
    /// Fee withheld per deposit, in basis points of the deposited value
    pub fee_bps: u64,
    /// Maximum allowed deadline offset, in clock ticks; bounds how long
    /// funds can be locked
    pub max_deadline_offset: ClockValue,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            fee_bps: 100,             // 1%
            max_deadline_offset: 100, // ticks
        }
    }
}

impl LedgerConfig {
    /// Fee withheld from a deposit of `value`
    pub fn fee_for(&self, value: Amount) -> Amount {
        ((value as u128 * self.fee_bps as u128) / 10_000) as Amount
    }
}

/// Deposit creation request
#[derive(Debug, Clone)]
pub struct DepositRequest {
    pub sender: AccountId,
    pub recipient: AccountId,
    pub commitment: Commitment,
    /// Ticks from now until redemption closes; `0` means no deadline
    pub deadline_offset: ClockValue,
    pub value: Amount,
}

/// Deposits and treasury share one lock so every operation is a single
/// atomic step (the one-settlement-per-commitment invariant depends on it).
#[derive(Default)]
struct LedgerState {
    deposits: HashMap<Commitment, Deposit>,
    treasury: FeeTreasury,
}

/// The escrow ledger core
pub struct EscrowLedger {
    config: LedgerConfig,
    state: RwLock<LedgerState>,
    access: Arc<AccessControl>,
    clock: Arc<dyn Clock>,
    bank: Arc<dyn ValueTransfer>,
    events: Arc<EventHub>,
}

impl EscrowLedger {
    pub fn new(
        config: LedgerConfig,
        access: Arc<AccessControl>,
        clock: Arc<dyn Clock>,
        bank: Arc<dyn ValueTransfer>,
        events: Arc<EventHub>,
    ) -> Self {
        Self {
            config,
            state: RwLock::new(LedgerState::default()),
            access,
            clock,
            bank,
            events,
        }
    }

    /// Lock a payment behind a commitment, addressed to `recipient`
    ///
    /// Withholds the policy fee into the treasury and moves the full
    /// value from the sender into ledger custody. Returns the commitment
    /// as the handle for later redemption or refund.
    pub async fn deposit(&self, request: DepositRequest) -> LedgerResult<Commitment> {
        if !self.access.is_active().await {
            return Err(LedgerError::Revoked);
        }
        if request.value == 0 {
            return Err(LedgerError::ZeroValue);
        }
        if request.commitment == Commitment::trivial() {
            return Err(LedgerError::TrivialSecret);
        }
        if request.deadline_offset > self.config.max_deadline_offset {
            return Err(LedgerError::DeadlineTooFar {
                offset: request.deadline_offset,
                max: self.config.max_deadline_offset,
            });
        }

        let event = {
            let mut state = self.state.write().await;
            if state.deposits.contains_key(&request.commitment) {
                return Err(LedgerError::CommitmentReused(request.commitment));
            }

            // Custody must be funded before anything is recorded; a failed
            // transfer returns here with ledger state untouched.
            self.bank
                .move_value(
                    &Party::Account(request.sender.clone()),
                    &Party::Custody,
                    request.value,
                )
                .await?;

            let fee = self.config.fee_for(request.value);
            let deadline = if request.deadline_offset == 0 {
                NO_DEADLINE
            } else {
                self.clock.now().saturating_add(request.deadline_offset)
            };

            let deposit = Deposit {
                commitment: request.commitment,
                sender: request.sender.clone(),
                recipient: request.recipient.clone(),
                principal: request.value - fee,
                fee,
                deadline,
                created_at: Utc::now(),
            };

            state.treasury.accrue(fee);
            let event = LedgerEvent::DepositCreated {
                commitment: deposit.commitment,
                sender: deposit.sender.clone(),
                recipient: deposit.recipient.clone(),
                principal: deposit.principal,
                deadline: deposit.deadline,
                fee: deposit.fee,
            };
            state.deposits.insert(deposit.commitment, deposit);
            event
        };

        info!(commitment = %request.commitment, value = request.value, "deposit created");
        self.events.publish(event).await;

        Ok(request.commitment)
    }

    /// Redeem a deposit by presenting both secret shares
    ///
    /// Only the bound recipient may collect, and only while a non-sentinel
    /// deadline has not passed.
    pub async fn redeem(
        &self,
        caller: &AccountId,
        secret_a: &str,
        secret_b: &str,
    ) -> LedgerResult<()> {
        let commitment = Commitment::derive(secret_a, secret_b);

        let event = {
            let mut state = self.state.write().await;
            let deposit = state
                .deposits
                .get(&commitment)
                .ok_or(LedgerError::NotFound(commitment))?;

            if &deposit.recipient != caller {
                return Err(LedgerError::Unauthorized);
            }
            let now = self.clock.now();
            if deposit.deadline != NO_DEADLINE && now >= deposit.deadline {
                return Err(LedgerError::Expired {
                    deadline: deposit.deadline,
                    now,
                });
            }

            // Transfer first; the deposit stays pending if it fails.
            self.bank
                .move_value(
                    &Party::Custody,
                    &Party::Account(deposit.recipient.clone()),
                    deposit.principal,
                )
                .await?;

            let deposit = state
                .deposits
                .remove(&commitment)
                .ok_or(LedgerError::NotFound(commitment))?;
            LedgerEvent::Redeemed {
                commitment,
                sender: deposit.sender,
                recipient: deposit.recipient,
                principal: deposit.principal,
            }
        };

        info!(commitment = %commitment, "deposit redeemed");
        self.events.publish(event).await;

        Ok(())
    }

    /// Reclaim a deposit's principal after its redemption window closed
    ///
    /// Only the original sender may refund; with a sentinel deadline the
    /// refund is available immediately.
    pub async fn refund(
        &self,
        caller: &AccountId,
        secret_a: &str,
        secret_b: &str,
    ) -> LedgerResult<()> {
        let commitment = Commitment::derive(secret_a, secret_b);

        let event = {
            let mut state = self.state.write().await;
            let deposit = state
                .deposits
                .get(&commitment)
                .ok_or(LedgerError::NotFound(commitment))?;

            if &deposit.sender != caller {
                return Err(LedgerError::Unauthorized);
            }
            let now = self.clock.now();
            if deposit.deadline != NO_DEADLINE && now < deposit.deadline {
                return Err(LedgerError::TooEarly {
                    deadline: deposit.deadline,
                    now,
                });
            }

            self.bank
                .move_value(
                    &Party::Custody,
                    &Party::Account(deposit.sender.clone()),
                    deposit.principal,
                )
                .await?;

            let deposit = state
                .deposits
                .remove(&commitment)
                .ok_or(LedgerError::NotFound(commitment))?;
            LedgerEvent::Refunded {
                commitment,
                sender: deposit.sender,
                recipient: deposit.recipient,
                principal: deposit.principal,
            }
        };

        info!(commitment = %commitment, "deposit refunded");
        self.events.publish(event).await;

        Ok(())
    }

    /// Withdraw the full accrued fee balance to the administrator
    ///
    /// Safe to call with nothing accrued: returns zero without touching
    /// the transfer substrate.
    pub async fn withdraw_fees(&self, caller: &AccountId) -> LedgerResult<Amount> {
        self.access.require_administrator(caller).await?;

        let mut state = self.state.write().await;
        let amount = state.treasury.total();
        if amount == 0 {
            return Ok(0);
        }

        // Drain only after the transfer is confirmed so a substrate
        // failure leaves the balance intact.
        self.bank
            .move_value(&Party::Custody, &Party::Account(caller.clone()), amount)
            .await?;
        state.treasury.drain();

        info!(administrator = %caller, amount, "fees withdrawn");
        Ok(amount)
    }

    /// Accrued, unwithdrawn fees
    pub async fn total_fees(&self) -> Amount {
        self.state.read().await.treasury.total()
    }

    /// Look up a live deposit; expired deposits stay queryable until the
    /// sender refunds them
    pub async fn get_deposit(&self, commitment: &Commitment) -> Option<Deposit> {
        self.state.read().await.deposits.get(commitment).cloned()
    }

    /// Number of live deposits
    pub async fn deposit_count(&self) -> usize {
        self.state.read().await.deposits.len()
    }
}
