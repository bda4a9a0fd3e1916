//! Event log queries and display.
//!
//! - Filter by event kind, principal and sequence
//! - Most recent first
//! - Plain-text rendering for the operator CLI

use super::events::{EventKind, EventRecord, GovernanceEvent};
use crate::identity::Principal;

/// Query options for the event log.
#[derive(Debug, Clone)]
pub struct EventQuery {
    /// Filter by event kind.
    pub kind: Option<EventKind>,
    /// Filter by the principal the event is about.
    pub principal: Option<Principal>,
    /// Only show records with a greater sequence number.
    pub after_sequence: Option<u64>,
    /// Limit number of results (most recent first).
    pub limit: Option<usize>,
}

impl Default for EventQuery {
    fn default() -> Self {
        Self {
            kind: None,
            principal: None,
            after_sequence: None,
            limit: Some(50), // Default: last 50 entries
        }
    }
}

/// Query the event log with filters.
///
/// Returns records in reverse log order (most recent first).
pub fn query_events(records: &[EventRecord], query: &EventQuery) -> Vec<EventRecord> {
    let mut filtered: Vec<EventRecord> = records
        .iter()
        .filter(|record| {
            if let Some(kind) = query.kind {
                if record.event.kind() != kind {
                    return false;
                }
            }

            if let Some(ref principal) = query.principal {
                if record.event.principal() != Some(principal) {
                    return false;
                }
            }

            if let Some(after) = query.after_sequence {
                if record.sequence <= after {
                    return false;
                }
            }

            true
        })
        .cloned()
        .collect();

    filtered.sort_by(|a, b| b.sequence.cmp(&a.sequence));

    if let Some(limit) = query.limit {
        filtered.truncate(limit);
    }

    filtered
}

fn describe(event: &GovernanceEvent) -> String {
    match event {
        GovernanceEvent::MemberAdded {
            member,
            initial_weight,
        } => format!("{} admitted with weight {}", member, initial_weight),
        GovernanceEvent::ProposalCreated {
            id,
            description,
            proposer,
        } => format!("#{} \"{}\" proposed by {}", id, description, proposer),
        GovernanceEvent::VoteCast {
            proposal_id,
            voter,
            support,
            weight,
        } => format!(
            "{} voted {} #{} with weight {}",
            voter,
            if *support { "for" } else { "against" },
            proposal_id,
            weight
        ),
        GovernanceEvent::ProposalExecuted {
            proposal_id,
            success,
        } => format!(
            "#{} executed ({})",
            proposal_id,
            if *success { "success" } else { "failure" }
        ),
        GovernanceEvent::TokensDeposited {
            member,
            paid,
            credited,
        } => format!("{} paid {} for {} weight", member, paid, credited),
        GovernanceEvent::FundsWithdrawn { recipient, amount } => {
            format!("{} withdrew {}", recipient, amount)
        }
    }
}

/// Format records for terminal output.
pub fn format_events(records: &[EventRecord]) -> String {
    if records.is_empty() {
        return "No events found.".to_string();
    }

    let mut output = String::from("Governance Event Log\n\n");

    for record in records {
        output.push_str(&format!(
            "[{:>5}] t={} {:<17} {}\n",
            record.sequence,
            record.timestamp,
            record.event.kind().name(),
            describe(&record.event)
        ));
    }

    output.trim_end().to_string()
}
