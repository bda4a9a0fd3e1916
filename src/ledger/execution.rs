//! Proposal execution.
//!
//! Anyone may finalize a proposal once its deadline has passed. Nothing
//! finalizes proposals automatically; an external caller or poller has to
//! invoke [`GovernanceState::execute_proposal`].

use super::errors::{GovernanceError, GovernanceResult};
use super::events::GovernanceEvent;
use super::proposal::ProposalSnapshot;
use super::state::GovernanceState;
use super::ProposalId;
use crate::clock::Timestamp;
use crate::identity::Principal;
use tracing::{debug, info};

/// Effect applied when a proposal passes.
///
/// Runs once the execution is committed: the executed flag is set and the
/// `ProposalExecuted` event is in the log. A panicking hook cannot undo or
/// hide the execution. [`Governance`](super::Governance) calls it after
/// releasing the write lock.
pub trait ExecutionHook: Send + Sync {
    fn on_executed(&self, proposal: &ProposalSnapshot);
}

/// Hook that does nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHook;

impl ExecutionHook for NoopHook {
    fn on_executed(&self, _proposal: &ProposalSnapshot) {}
}

impl GovernanceState {
    /// Finalize `proposal_id`.
    ///
    /// Requires the deadline to have passed, the proposal to be unexecuted,
    /// and strictly more weight for than against. A proposal that fails the
    /// majority check stays unexecuted; retrying fails the same way forever.
    pub fn execute_proposal(
        &mut self,
        caller: &Principal,
        proposal_id: ProposalId,
        hook: &dyn ExecutionHook,
        now: Timestamp,
    ) -> GovernanceResult<()> {
        let proposal = self.proposals.get(proposal_id)?;

        if now < proposal.deadline {
            debug!(proposal_id, caller = %caller, "execution rejected: voting still active");
            return Err(GovernanceError::VotingStillActive {
                proposal_id,
                deadline: proposal.deadline,
            });
        }

        if proposal.executed {
            return Err(GovernanceError::AlreadyExecuted(proposal_id));
        }

        if proposal.votes_for <= proposal.votes_against {
            debug!(
                proposal_id,
                votes_for = proposal.votes_for,
                votes_against = proposal.votes_against,
                "execution rejected: no majority"
            );
            return Err(GovernanceError::ProposalRejected {
                proposal_id,
                votes_for: proposal.votes_for,
                votes_against: proposal.votes_against,
            });
        }

        let proposal = self.proposals.get_mut(proposal_id)?;
        proposal.executed = true;
        let snapshot = proposal.clone();

        info!(proposal_id, caller = %caller, "proposal executed");
        self.events.push(
            now,
            GovernanceEvent::ProposalExecuted {
                proposal_id,
                success: true,
            },
        );

        hook.on_executed(&snapshot);
        Ok(())
    }
}
