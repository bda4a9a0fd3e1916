//! Membership registry and admission.

use super::errors::{GovernanceError, GovernanceResult};
use super::events::GovernanceEvent;
use super::state::GovernanceState;
use super::Balance;
use crate::clock::Timestamp;
use crate::identity::Principal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use tracing::{debug, info};

/// Set of principals holding the membership flag.
///
/// Members are never removed. Deactivation would clear the flag here and
/// nowhere else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MembershipRegistry {
    administrator: Principal,
    members: BTreeSet<Principal>,
}

impl MembershipRegistry {
    /// Registry with no members yet.
    pub fn new(administrator: Principal) -> Self {
        Self {
            administrator,
            members: BTreeSet::new(),
        }
    }

    pub fn administrator(&self) -> &Principal {
        &self.administrator
    }

    pub fn is_administrator(&self, principal: &Principal) -> bool {
        &self.administrator == principal
    }

    pub fn is_member(&self, principal: &Principal) -> bool {
        self.members.contains(principal)
    }

    pub fn members(&self) -> impl Iterator<Item = &Principal> {
        self.members.iter()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Fails with `NotMember` unless `principal` holds the flag.
    pub fn require_member(&self, principal: &Principal) -> GovernanceResult<()> {
        if self.is_member(principal) {
            Ok(())
        } else {
            Err(GovernanceError::NotMember(principal.clone()))
        }
    }

    /// Fails with `Unauthorized` unless `principal` is the administrator.
    pub fn require_administrator(&self, principal: &Principal) -> GovernanceResult<()> {
        if self.is_administrator(principal) {
            Ok(())
        } else {
            Err(GovernanceError::Unauthorized(principal.clone()))
        }
    }

    pub(super) fn insert(&mut self, principal: Principal) -> bool {
        self.members.insert(principal)
    }
}

impl GovernanceState {
    /// Admit `principal` with `initial_weight`.
    ///
    /// Only the administrator may admit. A zero weight admits without
    /// touching the balance ledger.
    pub fn admit(
        &mut self,
        caller: &Principal,
        principal: Principal,
        initial_weight: Balance,
        now: Timestamp,
    ) -> GovernanceResult<()> {
        self.membership.require_administrator(caller)?;
        self.admit_unchecked(principal, initial_weight, now)
    }

    /// Admission without the administrator check. Used for genesis.
    pub(super) fn admit_unchecked(
        &mut self,
        principal: Principal,
        initial_weight: Balance,
        now: Timestamp,
    ) -> GovernanceResult<()> {
        if self.membership.is_member(&principal) {
            debug!(member = %principal, "admission rejected: already a member");
            return Err(GovernanceError::AlreadyMember(principal));
        }

        // Credit first: it is the only step that can still fail.
        if initial_weight > 0 {
            self.balances.credit(&principal, initial_weight)?;
        }
        self.membership.insert(principal.clone());

        info!(member = %principal, weight = initial_weight, "member admitted");
        self.events.push(
            now,
            GovernanceEvent::MemberAdded {
                member: principal,
                initial_weight,
            },
        );
        Ok(())
    }
}
