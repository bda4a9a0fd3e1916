//! Weighted governance ledger.
//!
//! Components, leaf first:
//! - Balance ledger: voting weight per principal, credit-only
//! - Membership registry: who may propose, vote and deposit
//! - Proposal registry: sequentially numbered, time-bounded proposals
//! - Voting: one weighted vote per (proposal, member)
//! - Execution: permissionless finalize after the deadline
//! - Treasury: deposits converted to weight, administrator withdrawals
//!
//! All state lives in [`GovernanceState`]. [`Governance`] wraps it behind a
//! single write lock and a clock for use from multiple threads.

pub mod audit;
pub mod balance;
pub mod errors;
pub mod events;
pub mod execution;
pub mod handle;
pub mod membership;
pub mod proposal;
pub mod state;
pub mod treasury;
pub mod voting;

#[cfg(test)]
mod proptests;

/// Voting weight and payment amounts.
pub type Balance = u64;

/// Proposal identifier, assigned sequentially from 1.
pub type ProposalId = u64;

pub use audit::{format_events, query_events, EventQuery};
pub use balance::BalanceLedger;
pub use errors::{ErrorKind, GovernanceError, GovernanceResult};
pub use events::{EventKind, EventLog, EventRecord, GovernanceEvent};
pub use execution::{ExecutionHook, NoopHook};
pub use handle::Governance;
pub use membership::MembershipRegistry;
pub use proposal::{Proposal, ProposalRegistry, ProposalSnapshot};
pub use state::{GenesisAllocation, GovernanceState, LedgerParams};
pub use treasury::{RecordingTransfer, TransferError, TransferMechanism, Treasury};
pub use voting::{derive_state, ProposalState, VoteIndex};
