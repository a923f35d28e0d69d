//! Fee treasury - accumulates per-deposit fees
//!
//! The treasury is plain state owned by the ledger and mutated only under
//! the ledger's mutation lock; authorization for withdrawal lives in
//! access control, not here.

use crate::models::Amount;

/// Accrued, unwithdrawn fees
#[derive(Debug, Default)]
pub struct FeeTreasury {
    accrued: Amount,
}

impl FeeTreasury {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a withheld fee to the accrued balance
    pub fn accrue(&mut self, fee: Amount) {
        self.accrued += fee;
    }

    /// Accrued balance awaiting withdrawal
    pub fn total(&self) -> Amount {
        self.accrued
    }

    /// Take the full accrued balance, resetting it to zero
    pub fn drain(&mut self) -> Amount {
        std::mem::take(&mut self.accrued)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accrues_and_drains() {
        let mut treasury = FeeTreasury::new();
        treasury.accrue(3);
        treasury.accrue(4);
        assert_eq!(treasury.total(), 7);

        assert_eq!(treasury.drain(), 7);
        assert_eq!(treasury.total(), 0);
        assert_eq!(treasury.drain(), 0);
    }
}
