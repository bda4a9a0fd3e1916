//! Weighted voting.
//!
//! A proposal's state is never stored. It is recomputed from
//! `(now, deadline, executed, votes_for, votes_against)` by
//! [`derive_state`] every time someone asks.
//!
//! ## Vote recording
//!
//! - One vote per (proposal, member) pair, kept in a flat [`VoteIndex`].
//! - Weight is the voter's balance at the moment of voting, read once.
//! - Tallies only ever grow; nothing removes a vote record.

use super::errors::{GovernanceError, GovernanceResult};
use super::events::GovernanceEvent;
use super::proposal::Proposal;
use super::state::GovernanceState;
use super::{Balance, ProposalId};
use crate::clock::Timestamp;
use crate::identity::Principal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;
use tracing::{debug, info};

/// Derived proposal state.
///
/// `Succeeded` and `Defeated` together are the closed-but-not-executed
/// phase. `Defeated` is a read-side label only: the ledger never records a
/// rejection, and executing a defeated proposal fails every time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalState {
    /// Before the deadline.
    Open,
    /// Deadline passed, strict majority for, awaiting execution.
    Succeeded,
    /// Deadline passed without a strict majority for.
    Defeated,
    /// Executed. Terminal.
    Executed,
}

impl ProposalState {
    /// Closed for voting but not executed.
    pub fn is_closed_pending(&self) -> bool {
        matches!(self, ProposalState::Succeeded | ProposalState::Defeated)
    }
}

impl fmt::Display for ProposalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            ProposalState::Open => "open",
            ProposalState::Succeeded => "succeeded",
            ProposalState::Defeated => "defeated",
            ProposalState::Executed => "executed",
        };
        f.write_str(label)
    }
}

/// Compute the state of `proposal` at `now`.
pub fn derive_state(proposal: &Proposal, now: Timestamp) -> ProposalState {
    if proposal.executed {
        ProposalState::Executed
    } else if now < proposal.deadline {
        ProposalState::Open
    } else if proposal.votes_for > proposal.votes_against {
        ProposalState::Succeeded
    } else {
        ProposalState::Defeated
    }
}

/// Set of (proposal, voter) pairs that have voted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteIndex {
    cast: HashSet<(ProposalId, Principal)>,
}

impl VoteIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, proposal_id: ProposalId, voter: &Principal) -> bool {
        // Tuple lookups need an owned key.
        self.cast.contains(&(proposal_id, voter.clone()))
    }

    /// Record a vote. Returns false if the pair was already present.
    pub(super) fn record(&mut self, proposal_id: ProposalId, voter: Principal) -> bool {
        self.cast.insert((proposal_id, voter))
    }

    pub fn len(&self) -> usize {
        self.cast.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cast.is_empty()
    }
}

impl GovernanceState {
    /// Cast `caller`'s full balance for or against `proposal_id`.
    ///
    /// Returns the weight used.
    pub fn vote(
        &mut self,
        caller: &Principal,
        proposal_id: ProposalId,
        support: bool,
        now: Timestamp,
    ) -> GovernanceResult<Balance> {
        let proposal = self.proposals.get(proposal_id)?;

        self.membership.require_member(caller)?;

        if now >= proposal.deadline {
            debug!(proposal_id, voter = %caller, "vote rejected: voting closed");
            return Err(GovernanceError::VotingClosed {
                proposal_id,
                deadline: proposal.deadline,
            });
        }

        if self.votes.contains(proposal_id, caller) {
            debug!(proposal_id, voter = %caller, "vote rejected: already voted");
            return Err(GovernanceError::AlreadyVoted {
                proposal_id,
                voter: caller.clone(),
            });
        }

        let weight = self.balances.balance_of(caller);
        if weight == 0 {
            return Err(GovernanceError::NoWeight(caller.clone()));
        }

        let (votes_for, votes_against) = if support {
            (
                proposal
                    .votes_for
                    .checked_add(weight)
                    .ok_or(GovernanceError::Overflow)?,
                proposal.votes_against,
            )
        } else {
            (
                proposal.votes_for,
                proposal
                    .votes_against
                    .checked_add(weight)
                    .ok_or(GovernanceError::Overflow)?,
            )
        };

        // All checks passed; commit.
        self.votes.record(proposal_id, caller.clone());
        let proposal = self.proposals.get_mut(proposal_id)?;
        proposal.votes_for = votes_for;
        proposal.votes_against = votes_against;

        info!(proposal_id, voter = %caller, support, weight, "vote cast");
        self.events.push(
            now,
            GovernanceEvent::VoteCast {
                proposal_id,
                voter: caller.clone(),
                support,
                weight,
            },
        );

        Ok(weight)
    }

    /// Whether `principal` has voted on `proposal_id`.
    pub fn has_voted(
        &self,
        proposal_id: ProposalId,
        principal: &Principal,
    ) -> GovernanceResult<bool> {
        self.proposals.get(proposal_id)?;
        Ok(self.votes.contains(proposal_id, principal))
    }

    /// Derived state of `proposal_id` at `now`.
    pub fn proposal_state(
        &self,
        proposal_id: ProposalId,
        now: Timestamp,
    ) -> GovernanceResult<ProposalState> {
        Ok(derive_state(self.proposals.get(proposal_id)?, now))
    }

    /// Ids of proposals that would execute successfully at `now`.
    pub fn pending_execution(&self, now: Timestamp) -> Vec<ProposalId> {
        self.proposals
            .iter()
            .filter(|p| derive_state(p, now) == ProposalState::Succeeded)
            .map(|p| p.id)
            .collect()
    }
}
