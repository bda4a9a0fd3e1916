//! Integration tests for deposits and treasury withdrawal.

use concord::ledger::{
    GenesisAllocation, GovernanceEvent, RecordingTransfer, TransferError, TransferMechanism,
};
use concord::{
    Governance, GovernanceError, GovernanceState, LedgerParams, ManualClock, Principal,
};
use std::sync::Arc;

fn p(id: &str) -> Principal {
    Principal::from(id)
}

fn params(multiplier: u64) -> LedgerParams {
    LedgerParams {
        token_multiplier: multiplier,
        ..LedgerParams::default()
    }
}

fn genesis(multiplier: u64) -> GovernanceState {
    let allocations = vec![
        GenesisAllocation {
            principal: p("alice"),
            weight: 10,
        },
        GenesisAllocation {
            principal: p("bob"),
            weight: 0,
        },
    ];
    GovernanceState::genesis(p("admin"), params(multiplier), &allocations, 0).unwrap()
}

/// Transfer mechanism that always refuses
struct BankDown;

impl TransferMechanism for BankDown {
    fn transfer(&self, _recipient: &Principal, _amount: u64) -> Result<(), TransferError> {
        Err(TransferError("bank offline".to_string()))
    }
}

#[test]
fn test_deposit_converts_payment_to_weight() {
    let transfer = RecordingTransfer::new();
    let gov = Governance::new(
        genesis(3),
        Arc::new(ManualClock::new(0)),
        Arc::new(transfer.clone()),
    );

    assert_eq!(gov.deposit_tokens(&p("bob"), 40).unwrap(), 120);
    assert_eq!(gov.deposit_tokens(&p("alice"), 5).unwrap(), 15);

    assert_eq!(gov.balance_of(&p("bob")), 120);
    assert_eq!(gov.balance_of(&p("alice")), 25);
    assert_eq!(gov.treasury_balance(), 45);

    // Bob crossed the proposal threshold by depositing
    assert_eq!(gov.create_proposal(&p("bob"), "Bought in").unwrap(), 1);

    assert_eq!(
        gov.events().last().map(|r| r.event.clone()),
        Some(GovernanceEvent::ProposalCreated {
            id: 1,
            description: "Bought in".to_string(),
            proposer: p("bob"),
        })
    );
    assert!(transfer.transfers().is_empty());
}

#[test]
fn test_deposit_preconditions() {
    let gov = Governance::new(
        genesis(1),
        Arc::new(ManualClock::new(0)),
        Arc::new(RecordingTransfer::new()),
    );

    assert_eq!(
        gov.deposit_tokens(&p("stranger"), 10).unwrap_err(),
        GovernanceError::NotMember(p("stranger"))
    );
    assert_eq!(
        gov.deposit_tokens(&p("alice"), 0).unwrap_err(),
        GovernanceError::InvalidAmount
    );
    assert_eq!(gov.treasury_balance(), 0);
    assert_eq!(gov.balance_of(&p("alice")), 10);
}

#[test]
fn test_deposit_overflow_leaves_state_unchanged() {
    let gov = Governance::new(
        genesis(2),
        Arc::new(ManualClock::new(0)),
        Arc::new(RecordingTransfer::new()),
    );
    let before = gov.snapshot();

    assert_eq!(
        gov.deposit_tokens(&p("alice"), u64::MAX).unwrap_err(),
        GovernanceError::Overflow
    );
    assert_eq!(gov.snapshot(), before);
}

#[test]
fn test_withdraw_pays_administrator() {
    let clock = ManualClock::new(0);
    let transfer = RecordingTransfer::new();
    let gov = Governance::new(genesis(1), Arc::new(clock.clone()), Arc::new(transfer.clone()));

    gov.deposit_tokens(&p("alice"), 70).unwrap();
    gov.deposit_tokens(&p("bob"), 30).unwrap();

    assert_eq!(
        gov.withdraw(&p("alice")).unwrap_err(),
        GovernanceError::Unauthorized(p("alice"))
    );

    clock.advance(60);
    assert_eq!(gov.withdraw(&p("admin")).unwrap(), 100);
    assert_eq!(gov.treasury_balance(), 0);
    assert_eq!(transfer.transfers(), vec![(p("admin"), 100)]);

    let last = gov.events().last().cloned().unwrap();
    assert_eq!(last.timestamp, 60);
    assert_eq!(
        last.event,
        GovernanceEvent::FundsWithdrawn {
            recipient: p("admin"),
            amount: 100
        }
    );

    // Weight is not taken back by a withdrawal
    assert_eq!(gov.balance_of(&p("alice")), 80);

    assert_eq!(
        gov.withdraw(&p("admin")).unwrap_err(),
        GovernanceError::NothingToWithdraw
    );
}

#[test]
fn test_failed_transfer_keeps_treasury() {
    let gov = Governance::new(
        genesis(1),
        Arc::new(ManualClock::new(0)),
        Arc::new(BankDown),
    );
    gov.deposit_tokens(&p("alice"), 9).unwrap();
    let events_before = gov.events().len();

    let err = gov.withdraw(&p("admin")).unwrap_err();

    assert!(matches!(
        err,
        GovernanceError::TransferFailed(ref reason) if reason.contains("bank offline")
    ));
    assert_eq!(gov.treasury_balance(), 9);
    assert_eq!(gov.events().len(), events_before);
}
