//! Concord - Weighted Governance Ledger
//!
//! Members hold voting weight, propose time-bounded changes, vote once per
//! proposal with their full weight, and anyone may finalize a proposal after
//! its deadline if it won a strict majority.
//!
//! Key principles:
//! - One owned store, one write lock, all-or-nothing operations
//! - Proposal state derived from time and tallies, never stored
//! - Caller identity and clock supplied by the environment
//! - Append-only event log for every state transition

pub mod clock;
pub mod identity;
pub mod ledger;
pub mod serialization;

pub use clock::{Clock, ManualClock, SystemClock, Timestamp};
pub use identity::Principal;
pub use ledger::{Governance, GovernanceError, GovernanceResult, GovernanceState, LedgerParams};
