//! Benchmarks for weighted voting and event queries
//!
//! Measures:
//! - Vote recording on a ledger with many members
//! - Execution after a full round of votes
//! - Event log filtering

use concord::ledger::{query_events, EventKind, EventQuery, GenesisAllocation, NoopHook};
use concord::{GovernanceState, LedgerParams, Principal};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

const MEMBERS: usize = 1_000;

fn member(i: usize) -> Principal {
    Principal::new(format!("member-{}", i))
}

fn ledger_with_proposal() -> GovernanceState {
    let allocations: Vec<_> = (0..MEMBERS)
        .map(|i| GenesisAllocation {
            principal: member(i),
            weight: 100 + i as u64,
        })
        .collect();
    let mut state = GovernanceState::genesis(
        Principal::from("admin"),
        LedgerParams::default(),
        &allocations,
        0,
    )
    .expect("genesis failed");
    state
        .create_proposal(&member(0), "benchmark", 0)
        .expect("proposal failed");
    state
}

fn benchmark_vote(c: &mut Criterion) {
    let base = ledger_with_proposal();

    c.bench_function("vote_all_members", |b| {
        b.iter(|| {
            let mut state = base.clone();
            for i in 0..MEMBERS {
                state
                    .vote(black_box(&member(i)), 1, i % 3 != 0, 1)
                    .expect("vote failed");
            }
            state
        });
    });
}

fn benchmark_execute(c: &mut Criterion) {
    let mut voted = ledger_with_proposal();
    for i in 0..MEMBERS {
        voted.vote(&member(i), 1, true, 1).expect("vote failed");
    }
    let after_deadline = LedgerParams::default().voting_duration_secs;

    c.bench_function("execute_proposal", |b| {
        b.iter(|| {
            let mut state = voted.clone();
            state
                .execute_proposal(&member(0), black_box(1), &NoopHook, after_deadline)
                .expect("execution failed");
            state
        });
    });
}

fn benchmark_query_events(c: &mut Criterion) {
    let mut state = ledger_with_proposal();
    for i in 0..MEMBERS {
        state.vote(&member(i), 1, i % 2 == 0, 1).expect("vote failed");
    }
    let records = state.events().to_vec();
    let query = EventQuery {
        kind: Some(EventKind::VoteCast),
        principal: Some(member(MEMBERS / 2)),
        ..EventQuery::default()
    };

    c.bench_function("query_events_by_principal", |b| {
        b.iter(|| query_events(black_box(&records), black_box(&query)));
    });
}

criterion_group!(
    benches,
    benchmark_vote,
    benchmark_execute,
    benchmark_query_events
);
criterion_main!(benches);
