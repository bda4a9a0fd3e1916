//! Shared, thread-safe ledger handle.
//!
//! Every mutating call takes the single write lock for its whole duration,
//! reads the clock once, and publishes the events it produced to live
//! subscribers after committing. Queries take the read lock.

use super::errors::GovernanceResult;
use super::events::EventRecord;
use super::execution::{ExecutionHook, NoopHook};
use super::proposal::ProposalSnapshot;
use super::state::GovernanceState;
use super::treasury::TransferMechanism;
use super::voting::ProposalState;
use super::{Balance, ProposalId};
use crate::clock::{Clock, Timestamp};
use crate::identity::Principal;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tokio::sync::broadcast;

/// Capacity of the live event channel. Slow subscribers see `Lagged`.
const EVENT_CHANNEL_CAPACITY: usize = 1024;

#[derive(Clone)]
pub struct Governance {
    state: Arc<RwLock<GovernanceState>>,
    clock: Arc<dyn Clock>,
    transfer: Arc<dyn TransferMechanism>,
    hook: Arc<dyn ExecutionHook>,
    notifier: broadcast::Sender<EventRecord>,
}

impl std::fmt::Debug for Governance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Governance").finish_non_exhaustive()
    }
}

impl Governance {
    pub fn new(
        state: GovernanceState,
        clock: Arc<dyn Clock>,
        transfer: Arc<dyn TransferMechanism>,
    ) -> Self {
        let (notifier, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: Arc::new(RwLock::new(state)),
            clock,
            transfer,
            hook: Arc::new(NoopHook),
            notifier,
        }
    }

    /// Replace the effect run when a proposal executes.
    pub fn with_hook(mut self, hook: Arc<dyn ExecutionHook>) -> Self {
        self.hook = hook;
        self
    }

    /// Live stream of events committed after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<EventRecord> {
        self.notifier.subscribe()
    }

    pub fn now(&self) -> Timestamp {
        self.clock.now()
    }

    fn read(&self) -> RwLockReadGuard<'_, GovernanceState> {
        // Operations validate before writing, so a panicked writer cannot
        // have left a half-applied change behind.
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, GovernanceState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run `op` under the write lock and publish whatever it appended.
    fn mutate<T>(
        &self,
        op: impl FnOnce(&mut GovernanceState, Timestamp) -> GovernanceResult<T>,
    ) -> GovernanceResult<T> {
        let mut state = self.write();
        let now = self.clock.now();
        let offset = state.events.len();

        let result = op(&mut *state, now)?;

        for record in state.events.since(offset) {
            // No receivers is fine.
            let _ = self.notifier.send(record.clone());
        }
        Ok(result)
    }

    pub fn admit(
        &self,
        caller: &Principal,
        principal: Principal,
        initial_weight: Balance,
    ) -> GovernanceResult<()> {
        self.mutate(|state, now| state.admit(caller, principal, initial_weight, now))
    }

    pub fn deposit_tokens(
        &self,
        caller: &Principal,
        paid_amount: Balance,
    ) -> GovernanceResult<Balance> {
        self.mutate(|state, now| state.deposit_tokens(caller, paid_amount, now))
    }

    pub fn withdraw(&self, caller: &Principal) -> GovernanceResult<Balance> {
        let transfer = Arc::clone(&self.transfer);
        self.mutate(|state, now| state.withdraw(caller, transfer.as_ref(), now))
    }

    pub fn create_proposal(
        &self,
        caller: &Principal,
        description: impl Into<String>,
    ) -> GovernanceResult<ProposalId> {
        self.mutate(|state, now| state.create_proposal(caller, description, now))
    }

    pub fn vote(
        &self,
        caller: &Principal,
        proposal_id: ProposalId,
        support: bool,
    ) -> GovernanceResult<Balance> {
        self.mutate(|state, now| state.vote(caller, proposal_id, support, now))
    }

    /// Finalize `proposal_id`, then run the configured hook.
    ///
    /// The hook runs after the lock is released and subscribers have the
    /// `ProposalExecuted` event, so it may query the ledger.
    pub fn execute_proposal(
        &self,
        caller: &Principal,
        proposal_id: ProposalId,
    ) -> GovernanceResult<()> {
        let snapshot = self.mutate(|state, now| {
            state.execute_proposal(caller, proposal_id, &NoopHook, now)?;
            state.get_proposal(proposal_id)
        })?;
        self.hook.on_executed(&snapshot);
        Ok(())
    }

    pub fn get_proposal(&self, proposal_id: ProposalId) -> GovernanceResult<ProposalSnapshot> {
        self.read().get_proposal(proposal_id)
    }

    pub fn has_voted(
        &self,
        proposal_id: ProposalId,
        principal: &Principal,
    ) -> GovernanceResult<bool> {
        self.read().has_voted(proposal_id, principal)
    }

    pub fn balance_of(&self, principal: &Principal) -> Balance {
        self.read().balance_of(principal)
    }

    pub fn is_member(&self, principal: &Principal) -> bool {
        self.read().is_member(principal)
    }

    pub fn total_proposals(&self) -> u64 {
        self.read().total_proposals()
    }

    pub fn treasury_balance(&self) -> Balance {
        self.read().treasury_balance()
    }

    pub fn proposal_state(&self, proposal_id: ProposalId) -> GovernanceResult<ProposalState> {
        let now = self.clock.now();
        self.read().proposal_state(proposal_id, now)
    }

    pub fn pending_execution(&self) -> Vec<ProposalId> {
        let now = self.clock.now();
        self.read().pending_execution(now)
    }

    /// Copy of the full event log.
    pub fn events(&self) -> Vec<EventRecord> {
        self.read().events().to_vec()
    }

    /// Copy of the whole ledger state.
    pub fn snapshot(&self) -> GovernanceState {
        self.read().clone()
    }
}
