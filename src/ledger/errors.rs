//! Governance errors.
//!
//! Every failure aborts the whole operation before the first mutation, so an
//! `Err` always means the ledger is bit-for-bit unchanged.

use crate::clock::Timestamp;
use crate::identity::Principal;
use crate::ledger::{Balance, ProposalId};

/// Broad classification of a [`GovernanceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Caller lacks the role the operation requires.
    Authorization,
    /// Malformed input.
    Validation,
    /// Operation conflicts with the current ledger state.
    StateConflict,
    /// Legitimate outcome that prevents the operation.
    Outcome,
    /// Arithmetic limits or the value-transfer collaborator.
    Downstream,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GovernanceError {
    #[error("caller {0} is not the administrator")]
    Unauthorized(Principal),

    #[error("{0} is not a member")]
    NotMember(Principal),

    #[error("proposal description is empty")]
    EmptyDescription,

    #[error("amount must be greater than zero")]
    InvalidAmount,

    #[error("invalid proposal id: {0}")]
    InvalidProposalId(ProposalId),

    #[error("{0} is already a member")]
    AlreadyMember(Principal),

    #[error("{voter} already voted on proposal {proposal_id}")]
    AlreadyVoted {
        proposal_id: ProposalId,
        voter: Principal,
    },

    #[error("proposal {0} was already executed")]
    AlreadyExecuted(ProposalId),

    #[error("voting on proposal {proposal_id} closed at {deadline}")]
    VotingClosed {
        proposal_id: ProposalId,
        deadline: Timestamp,
    },

    #[error("voting on proposal {proposal_id} is open until {deadline}")]
    VotingStillActive {
        proposal_id: ProposalId,
        deadline: Timestamp,
    },

    #[error("proposal {proposal_id} rejected ({votes_for} for, {votes_against} against)")]
    ProposalRejected {
        proposal_id: ProposalId,
        votes_for: Balance,
        votes_against: Balance,
    },

    #[error("insufficient weight to propose: required {required}, have {actual}")]
    InsufficientWeight { required: Balance, actual: Balance },

    #[error("{0} has no voting weight")]
    NoWeight(Principal),

    #[error("transfer failed: {0}")]
    TransferFailed(String),

    #[error("nothing to withdraw")]
    NothingToWithdraw,

    #[error("arithmetic overflow")]
    Overflow,
}

impl GovernanceError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Unauthorized(_) | Self::NotMember(_) => ErrorKind::Authorization,
            Self::EmptyDescription | Self::InvalidAmount | Self::InvalidProposalId(_) => {
                ErrorKind::Validation
            }
            Self::AlreadyMember(_)
            | Self::AlreadyVoted { .. }
            | Self::AlreadyExecuted(_)
            | Self::VotingClosed { .. }
            | Self::VotingStillActive { .. } => ErrorKind::StateConflict,
            Self::ProposalRejected { .. } | Self::InsufficientWeight { .. } | Self::NoWeight(_) => {
                ErrorKind::Outcome
            }
            Self::TransferFailed(_) | Self::NothingToWithdraw | Self::Overflow => {
                ErrorKind::Downstream
            }
        }
    }

    /// Stable short name, used by the replay report.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "Unauthorized",
            Self::NotMember(_) => "NotMember",
            Self::EmptyDescription => "EmptyDescription",
            Self::InvalidAmount => "InvalidAmount",
            Self::InvalidProposalId(_) => "InvalidProposalId",
            Self::AlreadyMember(_) => "AlreadyMember",
            Self::AlreadyVoted { .. } => "AlreadyVoted",
            Self::AlreadyExecuted(_) => "AlreadyExecuted",
            Self::VotingClosed { .. } => "VotingClosed",
            Self::VotingStillActive { .. } => "VotingStillActive",
            Self::ProposalRejected { .. } => "ProposalRejected",
            Self::InsufficientWeight { .. } => "InsufficientWeight",
            Self::NoWeight(_) => "NoWeight",
            Self::TransferFailed(_) => "TransferFailed",
            Self::NothingToWithdraw => "NothingToWithdraw",
            Self::Overflow => "Overflow",
        }
    }
}

pub type GovernanceResult<T> = Result<T, GovernanceError>;
