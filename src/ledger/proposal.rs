//! Proposal registry.
//!
//! Ids are assigned sequentially from 1 and never reused. A proposal's id,
//! description, proposer and deadline are fixed at creation; only the tallies
//! and the executed flag change afterwards, and only through the voting and
//! execution modules.

use super::errors::{GovernanceError, GovernanceResult};
use super::events::GovernanceEvent;
use super::state::GovernanceState;
use super::{Balance, ProposalId};
use crate::clock::Timestamp;
use crate::identity::Principal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// A governance proposal.
///
/// Per-member vote records live in the vote index, not here, so a clone of
/// this struct is exactly the read-side snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub description: String,
    pub proposer: Principal,
    /// Voting is open strictly before this instant.
    pub deadline: Timestamp,
    pub votes_for: Balance,
    pub votes_against: Balance,
    pub executed: bool,
}

pub type ProposalSnapshot = Proposal;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProposalRegistry {
    /// Index `i` holds proposal id `i + 1`.
    proposals: Vec<Proposal>,
}

impl ProposalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of proposals ever created, which is also the highest id.
    pub fn count(&self) -> u64 {
        self.proposals.len() as u64
    }

    /// Id the next proposal will receive.
    pub fn next_id(&self) -> GovernanceResult<ProposalId> {
        self.count().checked_add(1).ok_or(GovernanceError::Overflow)
    }

    pub fn get(&self, id: ProposalId) -> GovernanceResult<&Proposal> {
        Self::index(id)
            .and_then(|i| self.proposals.get(i))
            .ok_or(GovernanceError::InvalidProposalId(id))
    }

    pub(super) fn get_mut(&mut self, id: ProposalId) -> GovernanceResult<&mut Proposal> {
        Self::index(id)
            .and_then(|i| self.proposals.get_mut(i))
            .ok_or(GovernanceError::InvalidProposalId(id))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Proposal> {
        self.proposals.iter()
    }

    pub(super) fn insert(&mut self, proposal: Proposal) {
        debug_assert_eq!(proposal.id, self.count() + 1);
        self.proposals.push(proposal);
    }

    fn index(id: ProposalId) -> Option<usize> {
        id.checked_sub(1).and_then(|i| usize::try_from(i).ok())
    }
}

impl GovernanceState {
    /// Create a proposal on behalf of `caller`.
    ///
    /// The caller must be a member holding at least the configured minimum
    /// weight, and the description must not be empty.
    pub fn create_proposal(
        &mut self,
        caller: &Principal,
        description: impl Into<String>,
        now: Timestamp,
    ) -> GovernanceResult<ProposalId> {
        let description = description.into();

        self.membership.require_member(caller)?;

        let weight = self.balances.balance_of(caller);
        if weight < self.params.min_proposal_weight {
            debug!(
                proposer = %caller,
                weight,
                required = self.params.min_proposal_weight,
                "proposal rejected: insufficient weight"
            );
            return Err(GovernanceError::InsufficientWeight {
                required: self.params.min_proposal_weight,
                actual: weight,
            });
        }

        if description.is_empty() {
            return Err(GovernanceError::EmptyDescription);
        }

        let id = self.proposals.next_id()?;
        let deadline = now
            .checked_add(self.params.voting_duration_secs)
            .ok_or(GovernanceError::Overflow)?;

        self.proposals.insert(Proposal {
            id,
            description: description.clone(),
            proposer: caller.clone(),
            deadline,
            votes_for: 0,
            votes_against: 0,
            executed: false,
        });

        info!(proposal_id = id, proposer = %caller, deadline, "proposal created");
        self.events.push(
            now,
            GovernanceEvent::ProposalCreated {
                id,
                description,
                proposer: caller.clone(),
            },
        );

        Ok(id)
    }

    /// Snapshot of proposal `id`.
    pub fn get_proposal(&self, id: ProposalId) -> GovernanceResult<ProposalSnapshot> {
        self.proposals.get(id).cloned()
    }

    pub fn total_proposals(&self) -> u64 {
        self.proposals.count()
    }
}
