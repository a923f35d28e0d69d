//! Access control - administrator slot and ledger lifecycle
//!
//! Owns the single administrator identity. The slot supports transfer to
//! a new administrator and permanent revocation; once revoked, every
//! administrative operation fails with `Revoked` forever. Escrow
//! resolution against existing deposits is deliberately outside this
//! gate so stranded funds stay recoverable.

use crate::{
    error::LedgerError,
    events::EventHub,
    models::{AccountId, LedgerEvent},
    LedgerResult,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

/// Administrator slot with terminal revocation
pub struct AccessControl {
    /// `None` means permanently revoked
    administrator: RwLock<Option<AccountId>>,
    events: Arc<EventHub>,
}

impl AccessControl {
    pub fn new(initial_administrator: AccountId, events: Arc<EventHub>) -> Self {
        Self {
            administrator: RwLock::new(Some(initial_administrator)),
            events,
        }
    }

    /// Hand administration to a new identity
    pub async fn transfer_administration(
        &self,
        caller: &AccountId,
        new_administrator: AccountId,
    ) -> LedgerResult<()> {
        let old = {
            let mut slot = self.administrator.write().await;
            let current = slot.as_ref().ok_or(LedgerError::Revoked)?;
            if current != caller {
                return Err(LedgerError::Unauthorized);
            }
            slot.replace(new_administrator.clone()).ok_or(LedgerError::Revoked)?
        };

        info!(from = %old, to = %new_administrator, "administration transferred");
        self.events
            .publish(LedgerEvent::AdministratorChanged {
                old_administrator: old,
                new_administrator,
            })
            .await;

        Ok(())
    }

    /// Permanently disable administration; terminal
    pub async fn revoke(&self, caller: &AccountId) -> LedgerResult<()> {
        let last = {
            let mut slot = self.administrator.write().await;
            let current = slot.as_ref().ok_or(LedgerError::Revoked)?;
            if current != caller {
                return Err(LedgerError::Unauthorized);
            }
            slot.take().ok_or(LedgerError::Revoked)?
        };

        warn!(last_administrator = %last, "ledger revoked");
        self.events
            .publish(LedgerEvent::LedgerRevoked {
                last_administrator: last,
            })
            .await;

        Ok(())
    }

    /// Whether the ledger has not been revoked
    pub async fn is_active(&self) -> bool {
        self.administrator.read().await.is_some()
    }

    /// Current administrator, if any
    pub async fn administrator(&self) -> Option<AccountId> {
        self.administrator.read().await.clone()
    }

    /// Fail unless `caller` is the current administrator
    pub async fn require_administrator(&self, caller: &AccountId) -> LedgerResult<()> {
        match self.administrator.read().await.as_ref() {
            None => Err(LedgerError::Revoked),
            Some(admin) if admin != caller => Err(LedgerError::Unauthorized),
            Some(_) => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn control(admin: &str) -> AccessControl {
        AccessControl::new(AccountId::from(admin), Arc::new(EventHub::default()))
    }

    #[tokio::test]
    async fn transfer_replaces_administrator() {
        let control = control("alice");
        let alice = AccountId::from("alice");
        let dan = AccountId::from("dan");

        control
            .transfer_administration(&alice, dan.clone())
            .await
            .unwrap();

        assert_eq!(control.administrator().await, Some(dan.clone()));
        // The old administrator lost the capability with the slot.
        let err = control
            .transfer_administration(&alice, alice.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Unauthorized));
    }

    #[tokio::test]
    async fn transfer_by_non_administrator_is_rejected() {
        let control = control("alice");
        let err = control
            .transfer_administration(&AccountId::from("mallory"), AccountId::from("mallory"))
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Unauthorized));
    }

    #[tokio::test]
    async fn revoke_is_terminal() {
        let control = control("alice");
        let alice = AccountId::from("alice");

        control.revoke(&alice).await.unwrap();
        assert!(!control.is_active().await);
        assert_eq!(control.administrator().await, None);

        let err = control
            .transfer_administration(&alice, alice.clone())
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Revoked));
        let err = control.revoke(&alice).await.unwrap_err();
        assert!(matches!(err, LedgerError::Revoked));
    }

    #[tokio::test]
    async fn lifecycle_events_are_published() {
        let events = Arc::new(EventHub::default());
        let control = AccessControl::new(AccountId::from("alice"), events.clone());
        let alice = AccountId::from("alice");
        let dan = AccountId::from("dan");

        control
            .transfer_administration(&alice, dan.clone())
            .await
            .unwrap();
        control.revoke(&dan).await.unwrap();

        let trail = events.trail().await;
        assert_eq!(trail.len(), 2);
        assert_eq!(
            trail[0].event,
            LedgerEvent::AdministratorChanged {
                old_administrator: alice,
                new_administrator: dan.clone(),
            }
        );
        assert_eq!(
            trail[1].event,
            LedgerEvent::LedgerRevoked {
                last_administrator: dan,
            }
        );
    }

    #[tokio::test]
    async fn require_administrator_distinguishes_errors() {
        let control = control("alice");
        let alice = AccountId::from("alice");

        control.require_administrator(&alice).await.unwrap();
        assert!(matches!(
            control
                .require_administrator(&AccountId::from("mallory"))
                .await,
            Err(LedgerError::Unauthorized)
        ));

        control.revoke(&alice).await.unwrap();
        assert!(matches!(
            control.require_administrator(&alice).await,
            Err(LedgerError::Revoked)
        ));
    }
}
