//! Property-based tests for the governance ledger
//!
//! Tests for:
//! - Tally integrity: tallies equal the summed weight of recorded votes
//! - Monotonicity: tallies and balances never decrease
//! - Vote permanence: has_voted never flips back, no double votes
//! - Execution gate: never before the deadline, at most once

use super::*;
use crate::identity::Principal;
use proptest::prelude::*;

const MEMBERS: usize = 6;
const DURATION: u64 = 1_000;

#[derive(Debug, Clone)]
enum Op {
    Deposit { member: usize, amount: u64 },
    Vote { member: usize, proposal: u64, support: bool },
    Execute { proposal: u64 },
    Advance { secs: u64 },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0..MEMBERS, 0u64..500).prop_map(|(member, amount)| Op::Deposit { member, amount }),
        (0..MEMBERS, 0u64..4, any::<bool>()).prop_map(|(member, proposal, support)| Op::Vote {
            member,
            proposal,
            support
        }),
        (0u64..4).prop_map(|proposal| Op::Execute { proposal }),
        (0u64..400).prop_map(|secs| Op::Advance { secs }),
    ]
}

fn member(i: usize) -> Principal {
    Principal::new(format!("member-{}", i))
}

/// Ledger with MEMBERS members (member i has weight i * 50) and two proposals.
fn setup() -> GovernanceState {
    let params = LedgerParams {
        min_proposal_weight: 100,
        voting_duration_secs: DURATION,
        token_multiplier: 2,
    };
    let allocations: Vec<GenesisAllocation> = (0..MEMBERS)
        .map(|i| GenesisAllocation {
            principal: member(i),
            weight: i as u64 * 50,
        })
        .collect();
    let mut state =
        GovernanceState::genesis(Principal::from("admin"), params, &allocations, 0).unwrap();
    state.create_proposal(&member(5), "first", 0).unwrap();
    state.create_proposal(&member(4), "second", 0).unwrap();
    state
}

/// Sum of VoteCast weights per side for `proposal_id`.
fn recorded_weights(state: &GovernanceState, proposal_id: ProposalId) -> (u64, u64) {
    state
        .events()
        .iter()
        .fold((0, 0), |(f, a), record| match &record.event {
            GovernanceEvent::VoteCast {
                proposal_id: id,
                support,
                weight,
                ..
            } if *id == proposal_id => {
                if *support {
                    (f + weight, a)
                } else {
                    (f, a + weight)
                }
            }
            _ => (f, a),
        })
}

proptest! {
    /// Property test: Tally integrity and monotonicity under arbitrary op sequences
    #[test]
    fn prop_ledger_invariants(ops in prop::collection::vec(op_strategy(), 0..60)) {
        let mut state = setup();
        let mut now = 0u64;

        for op in ops {
            let before = state.clone();
            let result = match op {
                Op::Deposit { member: m, amount } => {
                    state.deposit_tokens(&member(m), amount, now).map(|_| ())
                }
                Op::Vote { member: m, proposal, support } => {
                    state.vote(&member(m), proposal, support, now).map(|_| ())
                }
                Op::Execute { proposal } => {
                    state.execute_proposal(&member(0), proposal, &NoopHook, now)
                }
                Op::Advance { secs } => {
                    now += secs;
                    Ok(())
                }
            };

            // Failures never mutate anything
            if result.is_err() {
                prop_assert_eq!(&state, &before);
            }

            for i in 0..MEMBERS {
                prop_assert!(state.balance_of(&member(i)) >= before.balance_of(&member(i)));
            }

            for id in 1..=state.total_proposals() {
                let old = before.get_proposal(id).unwrap();
                let new = state.get_proposal(id).unwrap();
                prop_assert!(new.votes_for >= old.votes_for);
                prop_assert!(new.votes_against >= old.votes_against);
                prop_assert!(new.executed || !old.executed);

                let (for_weight, against_weight) = recorded_weights(&state, id);
                prop_assert_eq!(new.votes_for, for_weight);
                prop_assert_eq!(new.votes_against, against_weight);

                if new.executed && !old.executed {
                    prop_assert!(now >= new.deadline);
                    prop_assert!(new.votes_for > new.votes_against);
                }

                for i in 0..MEMBERS {
                    if before.has_voted(id, &member(i)).unwrap() {
                        prop_assert!(state.has_voted(id, &member(i)).unwrap());
                    }
                }
            }
        }
    }

    /// Property test: A second vote by the same member always fails
    #[test]
    fn prop_no_double_vote(m in 1..MEMBERS, first in any::<bool>(), second in any::<bool>()) {
        let mut state = setup();
        state.vote(&member(m), 1, first, 0).unwrap();

        let err = state.vote(&member(m), 1, second, 1).unwrap_err();
        prop_assert_eq!(err, GovernanceError::AlreadyVoted { proposal_id: 1, voter: member(m) });
    }

    /// Property test: Execution before the deadline fails whatever the tally
    #[test]
    fn prop_execute_before_deadline_fails(
        supports in prop::collection::vec(any::<bool>(), MEMBERS),
        at in 0u64..DURATION,
    ) {
        let mut state = setup();
        for (i, support) in supports.iter().enumerate().skip(1) {
            state.vote(&member(i), 1, *support, 0).unwrap();
        }

        let err = state.execute_proposal(&member(0), 1, &NoopHook, at).unwrap_err();
        let is_still_active = matches!(err, GovernanceError::VotingStillActive { .. });
        prop_assert!(is_still_active);
    }
}
