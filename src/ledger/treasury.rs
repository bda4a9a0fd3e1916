//! Deposits and withdrawals.
//!
//! Members pay in through an external value-transfer system; the ledger
//! credits `paid * token_multiplier` of voting weight and keeps the paid
//! amount until the administrator withdraws it. Moving the money itself is
//! the [`TransferMechanism`]'s job.

use super::errors::{GovernanceError, GovernanceResult};
use super::events::GovernanceEvent;
use super::state::GovernanceState;
use super::Balance;
use crate::clock::Timestamp;
use crate::identity::Principal;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tracing::{info, warn};

/// Failure reported by the value-transfer system.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct TransferError(pub String);

/// Downstream system that pays out withdrawals.
pub trait TransferMechanism: Send + Sync {
    fn transfer(&self, recipient: &Principal, amount: Balance) -> Result<(), TransferError>;
}

/// Accumulated, not yet withdrawn payments.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Treasury {
    accumulated: Balance,
}

impl Treasury {
    pub fn accumulated(&self) -> Balance {
        self.accumulated
    }
}

/// Transfer mechanism that accepts every transfer and remembers it.
#[derive(Debug, Clone, Default)]
pub struct RecordingTransfer {
    transfers: Arc<Mutex<Vec<(Principal, Balance)>>>,
}

impl RecordingTransfer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Transfers performed so far.
    pub fn transfers(&self) -> Vec<(Principal, Balance)> {
        self.transfers
            .lock()
            .map(|t| t.clone())
            .unwrap_or_default()
    }
}

impl TransferMechanism for RecordingTransfer {
    fn transfer(&self, recipient: &Principal, amount: Balance) -> Result<(), TransferError> {
        let mut transfers = self
            .transfers
            .lock()
            .map_err(|_| TransferError("transfer log poisoned".to_string()))?;
        transfers.push((recipient.clone(), amount));
        Ok(())
    }
}

impl GovernanceState {
    /// Convert `paid_amount` into voting weight for `caller`.
    ///
    /// Returns the credited weight.
    pub fn deposit_tokens(
        &mut self,
        caller: &Principal,
        paid_amount: Balance,
        now: Timestamp,
    ) -> GovernanceResult<Balance> {
        self.membership.require_member(caller)?;

        if paid_amount == 0 {
            return Err(GovernanceError::InvalidAmount);
        }

        let credited = paid_amount
            .checked_mul(self.params.token_multiplier)
            .ok_or(GovernanceError::Overflow)?;
        let accumulated = self
            .treasury
            .accumulated
            .checked_add(paid_amount)
            .ok_or(GovernanceError::Overflow)?;

        // Last fallible step; nothing is mutated if it fails.
        self.balances.credit(caller, credited)?;
        self.treasury.accumulated = accumulated;

        info!(member = %caller, paid = paid_amount, credited, "tokens deposited");
        self.events.push(
            now,
            GovernanceEvent::TokensDeposited {
                member: caller.clone(),
                paid: paid_amount,
                credited,
            },
        );

        Ok(credited)
    }

    /// Pay the whole treasury out to the administrator.
    ///
    /// The transfer runs before the treasury is emptied, so a failed transfer
    /// leaves the accumulated amount in place.
    pub fn withdraw(
        &mut self,
        caller: &Principal,
        transfer: &dyn TransferMechanism,
        now: Timestamp,
    ) -> GovernanceResult<Balance> {
        self.membership.require_administrator(caller)?;

        let amount = self.treasury.accumulated;
        if amount == 0 {
            return Err(GovernanceError::NothingToWithdraw);
        }

        if let Err(e) = transfer.transfer(caller, amount) {
            warn!(recipient = %caller, amount, error = %e, "withdrawal transfer failed");
            return Err(GovernanceError::TransferFailed(e.0));
        }
        self.treasury.accumulated = 0;

        info!(recipient = %caller, amount, "treasury withdrawn");
        self.events.push(
            now,
            GovernanceEvent::FundsWithdrawn {
                recipient: caller.clone(),
                amount,
            },
        );

        Ok(amount)
    }

    pub fn treasury_balance(&self) -> Balance {
        self.treasury.accumulated
    }
}
