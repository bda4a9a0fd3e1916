//! The owned governance store.
//!
//! `GovernanceState` holds every piece of ledger state. Operations are
//! methods on it (spread across the component modules) that take the caller
//! and the current time explicitly. Each one validates everything before its
//! first write, so a returned error means nothing changed.

use super::balance::BalanceLedger;
use super::errors::GovernanceResult;
use super::events::{EventLog, EventRecord, GovernanceEvent};
use super::membership::MembershipRegistry;
use super::proposal::ProposalRegistry;
use super::treasury::Treasury;
use super::voting::VoteIndex;
use super::Balance;
use crate::clock::Timestamp;
use crate::identity::Principal;
use serde::{Deserialize, Serialize};

/// Seven days.
pub const DEFAULT_VOTING_DURATION_SECS: u64 = 7 * 24 * 60 * 60;

pub const DEFAULT_MIN_PROPOSAL_WEIGHT: Balance = 100;

pub const DEFAULT_TOKEN_MULTIPLIER: Balance = 1;

/// Fixed ledger parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerParams {
    /// Balance a member needs to create a proposal.
    pub min_proposal_weight: Balance,
    /// Seconds between creation and deadline.
    pub voting_duration_secs: u64,
    /// Weight credited per unit paid in.
    pub token_multiplier: Balance,
}

impl Default for LedgerParams {
    fn default() -> Self {
        Self {
            min_proposal_weight: DEFAULT_MIN_PROPOSAL_WEIGHT,
            voting_duration_secs: DEFAULT_VOTING_DURATION_SECS,
            token_multiplier: DEFAULT_TOKEN_MULTIPLIER,
        }
    }
}

/// Member admitted at genesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenesisAllocation {
    pub principal: Principal,
    #[serde(default)]
    pub weight: Balance,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceState {
    pub(super) params: LedgerParams,
    pub(super) membership: MembershipRegistry,
    pub(super) balances: BalanceLedger,
    pub(super) proposals: ProposalRegistry,
    pub(super) votes: VoteIndex,
    pub(super) treasury: Treasury,
    pub(super) events: EventLog,
}

impl GovernanceState {
    /// Fresh ledger whose only member is `administrator`, with no weight,
    /// admitted at `now`.
    pub fn new(administrator: Principal, params: LedgerParams, now: Timestamp) -> Self {
        let mut state = Self::empty(administrator.clone(), params);
        state.membership.insert(administrator.clone());
        state.events.push(
            now,
            GovernanceEvent::MemberAdded {
                member: administrator,
                initial_weight: 0,
            },
        );
        state
    }

    /// Ledger seeded with `allocations`.
    ///
    /// The administrator is always admitted first, with the weight of its own
    /// allocation if one is listed. Listing any principal twice fails with
    /// `AlreadyMember`.
    pub fn genesis(
        administrator: Principal,
        params: LedgerParams,
        allocations: &[GenesisAllocation],
        now: Timestamp,
    ) -> GovernanceResult<Self> {
        let mut state = Self::empty(administrator.clone(), params);

        let admin_entry = allocations
            .iter()
            .position(|a| a.principal == administrator);
        let admin_weight = admin_entry.map(|i| allocations[i].weight).unwrap_or(0);
        state.admit_unchecked(administrator, admin_weight, now)?;

        for (i, allocation) in allocations.iter().enumerate() {
            if Some(i) == admin_entry {
                continue;
            }
            state.admit_unchecked(allocation.principal.clone(), allocation.weight, now)?;
        }

        Ok(state)
    }

    fn empty(administrator: Principal, params: LedgerParams) -> Self {
        Self {
            params,
            membership: MembershipRegistry::new(administrator),
            balances: BalanceLedger::new(),
            proposals: ProposalRegistry::new(),
            votes: VoteIndex::new(),
            treasury: Treasury::default(),
            events: EventLog::new(),
        }
    }

    pub fn params(&self) -> &LedgerParams {
        &self.params
    }

    pub fn administrator(&self) -> &Principal {
        self.membership.administrator()
    }

    pub fn is_member(&self, principal: &Principal) -> bool {
        self.membership.is_member(principal)
    }

    pub fn balance_of(&self, principal: &Principal) -> Balance {
        self.balances.balance_of(principal)
    }

    pub fn membership(&self) -> &MembershipRegistry {
        &self.membership
    }

    pub fn proposals(&self) -> &ProposalRegistry {
        &self.proposals
    }

    pub fn events(&self) -> &[EventRecord] {
        self.events.records()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::GovernanceError;

    fn p(id: &str) -> Principal {
        Principal::from(id)
    }

    fn alloc(principal: &str, weight: Balance) -> GenesisAllocation {
        GenesisAllocation {
            principal: p(principal),
            weight,
        }
    }

    #[test]
    fn test_default_params() {
        let params = LedgerParams::default();
        assert_eq!(params.min_proposal_weight, 100);
        assert_eq!(params.voting_duration_secs, 604_800);
        assert_eq!(params.token_multiplier, 1);
    }

    #[test]
    fn test_new_admits_administrator() {
        let state = GovernanceState::new(p("admin"), LedgerParams::default(), 1_700_000_000);
        assert!(state.is_member(&p("admin")));
        assert_eq!(state.balance_of(&p("admin")), 0);
        assert_eq!(state.administrator(), &p("admin"));
        assert_eq!(state.events().len(), 1);
        assert_eq!(state.events()[0].timestamp, 1_700_000_000);
    }

    #[test]
    fn test_genesis_allocations() {
        let state = GovernanceState::genesis(
            p("admin"),
            LedgerParams::default(),
            &[alloc("alice", 100), alloc("admin", 500), alloc("bob", 0)],
            1_700_000_000,
        )
        .unwrap();

        assert_eq!(state.balance_of(&p("admin")), 500);
        assert_eq!(state.balance_of(&p("alice")), 100);
        assert!(state.is_member(&p("bob")));
        assert_eq!(state.membership().len(), 3);

        // Administrator first, then allocation order
        let admitted: Vec<_> = state
            .events()
            .iter()
            .filter_map(|r| match &r.event {
                GovernanceEvent::MemberAdded { member, .. } => Some(member.as_str().to_string()),
                _ => None,
            })
            .collect();
        assert_eq!(admitted, vec!["admin", "alice", "bob"]);
        assert!(state.events().iter().all(|r| r.timestamp == 1_700_000_000));
    }

    #[test]
    fn test_genesis_rejects_duplicates() {
        let err = GovernanceState::genesis(
            p("admin"),
            LedgerParams::default(),
            &[alloc("alice", 1), alloc("alice", 2)],
            0,
        )
        .unwrap_err();
        assert_eq!(err, GovernanceError::AlreadyMember(p("alice")));

        let err = GovernanceState::genesis(
            p("admin"),
            LedgerParams::default(),
            &[alloc("admin", 1), alloc("admin", 2)],
            0,
        )
        .unwrap_err();
        assert_eq!(err, GovernanceError::AlreadyMember(p("admin")));
    }
}
