//! Balance ledger.
//!
//! Balances are voting weight. There is no debit path: the only way a
//! balance changes is [`BalanceLedger::credit`], so balances never decrease.

use super::errors::{GovernanceError, GovernanceResult};
use super::Balance;
use crate::identity::Principal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceLedger {
    balances: HashMap<Principal, Balance>,
}

impl BalanceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Balance of `principal`, zero if never credited.
    pub fn balance_of(&self, principal: &Principal) -> Balance {
        self.balances.get(principal).copied().unwrap_or(0)
    }

    /// Balance `principal` would have after crediting `amount`.
    ///
    /// Performs every check [`credit`](Self::credit) does without mutating,
    /// so compound operations can validate before committing anything.
    pub fn checked_credit(
        &self,
        principal: &Principal,
        amount: Balance,
    ) -> GovernanceResult<Balance> {
        if amount == 0 {
            return Err(GovernanceError::InvalidAmount);
        }
        self.balance_of(principal)
            .checked_add(amount)
            .ok_or(GovernanceError::Overflow)
    }

    /// Increase `principal`'s balance by `amount`. Returns the new balance.
    pub fn credit(&mut self, principal: &Principal, amount: Balance) -> GovernanceResult<Balance> {
        let updated = self.checked_credit(principal, amount)?;
        self.balances.insert(principal.clone(), updated);
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_principal_has_zero_balance() {
        let ledger = BalanceLedger::new();
        assert_eq!(ledger.balance_of(&Principal::from("nobody")), 0);
    }

    #[test]
    fn test_credit_accumulates() {
        let mut ledger = BalanceLedger::new();
        let alice = Principal::from("alice");

        assert_eq!(ledger.credit(&alice, 40).unwrap(), 40);
        assert_eq!(ledger.credit(&alice, 60).unwrap(), 100);
        assert_eq!(ledger.balance_of(&alice), 100);
    }

    #[test]
    fn test_credit_zero_rejected() {
        let mut ledger = BalanceLedger::new();
        let alice = Principal::from("alice");

        assert_eq!(ledger.credit(&alice, 0), Err(GovernanceError::InvalidAmount));
        assert_eq!(ledger, BalanceLedger::new());
    }

    #[test]
    fn test_credit_overflow_leaves_balance_untouched() {
        let mut ledger = BalanceLedger::new();
        let alice = Principal::from("alice");
        ledger.credit(&alice, Balance::MAX - 1).unwrap();

        assert_eq!(ledger.credit(&alice, 2), Err(GovernanceError::Overflow));
        assert_eq!(ledger.balance_of(&alice), Balance::MAX - 1);

        assert_eq!(ledger.credit(&alice, 1).unwrap(), Balance::MAX);
    }
}
