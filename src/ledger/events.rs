//! Ledger notifications.
//!
//! Every successful state transition appends exactly one record. The log is
//! append-only and the field order of each variant is part of the external
//! contract: observers decode exported logs positionally.

use super::{Balance, ProposalId};
use crate::clock::Timestamp;
use crate::identity::Principal;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GovernanceEvent {
    MemberAdded {
        member: Principal,
        initial_weight: Balance,
    },
    ProposalCreated {
        id: ProposalId,
        description: String,
        proposer: Principal,
    },
    VoteCast {
        proposal_id: ProposalId,
        voter: Principal,
        support: bool,
        weight: Balance,
    },
    ProposalExecuted {
        proposal_id: ProposalId,
        success: bool,
    },
    TokensDeposited {
        member: Principal,
        paid: Balance,
        credited: Balance,
    },
    FundsWithdrawn {
        recipient: Principal,
        amount: Balance,
    },
}

/// Event discriminant, for filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventKind {
    MemberAdded,
    ProposalCreated,
    VoteCast,
    ProposalExecuted,
    TokensDeposited,
    FundsWithdrawn,
}

impl EventKind {
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::MemberAdded => "member-added",
            EventKind::ProposalCreated => "proposal-created",
            EventKind::VoteCast => "vote-cast",
            EventKind::ProposalExecuted => "proposal-executed",
            EventKind::TokensDeposited => "tokens-deposited",
            EventKind::FundsWithdrawn => "funds-withdrawn",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "member-added" => Some(EventKind::MemberAdded),
            "proposal-created" => Some(EventKind::ProposalCreated),
            "vote-cast" => Some(EventKind::VoteCast),
            "proposal-executed" => Some(EventKind::ProposalExecuted),
            "tokens-deposited" => Some(EventKind::TokensDeposited),
            "funds-withdrawn" => Some(EventKind::FundsWithdrawn),
            _ => None,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl GovernanceEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            GovernanceEvent::MemberAdded { .. } => EventKind::MemberAdded,
            GovernanceEvent::ProposalCreated { .. } => EventKind::ProposalCreated,
            GovernanceEvent::VoteCast { .. } => EventKind::VoteCast,
            GovernanceEvent::ProposalExecuted { .. } => EventKind::ProposalExecuted,
            GovernanceEvent::TokensDeposited { .. } => EventKind::TokensDeposited,
            GovernanceEvent::FundsWithdrawn { .. } => EventKind::FundsWithdrawn,
        }
    }

    /// Principal the event is about, if any.
    pub fn principal(&self) -> Option<&Principal> {
        match self {
            GovernanceEvent::MemberAdded { member, .. } => Some(member),
            GovernanceEvent::ProposalCreated { proposer, .. } => Some(proposer),
            GovernanceEvent::VoteCast { voter, .. } => Some(voter),
            GovernanceEvent::ProposalExecuted { .. } => None,
            GovernanceEvent::TokensDeposited { member, .. } => Some(member),
            GovernanceEvent::FundsWithdrawn { recipient, .. } => Some(recipient),
        }
    }
}

/// An event with its position in the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    /// Position in the log, starting at 1.
    pub sequence: u64,
    /// Clock value at the time of the transition.
    pub timestamp: Timestamp,
    pub event: GovernanceEvent,
}

/// Append-only event log.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLog {
    records: Vec<EventRecord>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub(super) fn push(&mut self, timestamp: Timestamp, event: GovernanceEvent) {
        let sequence = self.records.len() as u64 + 1;
        self.records.push(EventRecord {
            sequence,
            timestamp,
            event,
        });
    }

    pub fn records(&self) -> &[EventRecord] {
        &self.records
    }

    /// Records appended after the first `offset` records.
    pub fn since(&self, offset: usize) -> &[EventRecord] {
        self.records.get(offset..).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
