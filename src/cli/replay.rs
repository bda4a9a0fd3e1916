//! Scripted replay of governance calls.
//!
//! A script is a JSON array of steps, each naming the time it runs at, the
//! calling principal, and one command:
//!
//! ```json
//! [
//!   { "at": 0, "caller": "admin",
//!     "command": { "admit": { "principal": "alice", "weight": 100 } } },
//!   { "at": 10, "caller": "alice",
//!     "command": { "propose": { "description": "Fund grant" } } },
//!   { "at": 20, "caller": "alice",
//!     "command": { "vote": { "proposal_id": 1, "support": true } } },
//!   { "at": 700000, "caller": "bob",
//!     "command": { "execute": { "proposal_id": 1 } }, "expect_ok": true }
//! ]
//! ```
//!
//! Steps run in order against a fresh ledger built from the config's genesis
//! section, with a manual clock set to each step's `at`.

use super::config::{default_config_path, ConcordConfig, ConfigError};
use super::logging;
use concord::clock::ClockError;
use concord::ledger::{ProposalId, ProposalState, RecordingTransfer};
use concord::serialization::{encode_event_log, SerializationError};
use concord::{
    Governance, GovernanceError, GovernanceState, LedgerParams, ManualClock, Principal, Timestamp,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Replay errors.
#[derive(Debug, thiserror::Error)]
pub enum ReplayError {
    #[error("failed to read script '{path}': {source}")]
    ReadScript {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid script: {0}")]
    Parse(#[from] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("genesis failed: {0}")]
    Genesis(GovernanceError),

    #[error("step {step}: {source}")]
    Clock { step: usize, source: ClockError },

    #[error("step {step} was expected to succeed: {source}")]
    StepFailed {
        step: usize,
        source: GovernanceError,
    },

    #[error("failed to export event log: {0}")]
    Export(#[from] SerializationError),

    #[error("failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// One scripted call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub at: Timestamp,
    pub caller: Principal,
    pub command: ScriptCommand,
    /// Abort the replay if this step fails.
    #[serde(default)]
    pub expect_ok: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptCommand {
    Admit {
        principal: Principal,
        #[serde(default)]
        weight: u64,
    },
    Deposit {
        amount: u64,
    },
    Withdraw,
    Propose {
        description: String,
    },
    Vote {
        proposal_id: ProposalId,
        support: bool,
    },
    Execute {
        proposal_id: ProposalId,
    },
}

impl ScriptCommand {
    fn name(&self) -> &'static str {
        match self {
            ScriptCommand::Admit { .. } => "admit",
            ScriptCommand::Deposit { .. } => "deposit",
            ScriptCommand::Withdraw => "withdraw",
            ScriptCommand::Propose { .. } => "propose",
            ScriptCommand::Vote { .. } => "vote",
            ScriptCommand::Execute { .. } => "execute",
        }
    }
}

/// Result of a single step.
#[derive(Debug, Clone, Serialize)]
pub struct StepOutcome {
    pub step: usize,
    pub at: Timestamp,
    pub caller: Principal,
    pub command: &'static str,
    pub ok: bool,
    /// What happened, or the error message.
    pub detail: String,
    /// Stable error code when the step failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProposalSummary {
    pub id: ProposalId,
    pub description: String,
    pub proposer: Principal,
    pub deadline: Timestamp,
    pub votes_for: u64,
    pub votes_against: u64,
    pub state: ProposalState,
}

#[derive(Debug, Clone, Serialize)]
pub struct MemberSummary {
    pub principal: Principal,
    pub balance: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReplayReport {
    pub params: LedgerParams,
    pub final_time: Timestamp,
    pub steps: Vec<StepOutcome>,
    pub proposals: Vec<ProposalSummary>,
    pub members: Vec<MemberSummary>,
    pub treasury: u64,
    pub events: usize,
}

impl ReplayReport {
    pub fn failed_steps(&self) -> usize {
        self.steps.iter().filter(|s| !s.ok).count()
    }

    /// Plain-text rendering for the terminal.
    pub fn render(&self) -> String {
        let mut output = String::new();

        output.push_str(&format!(
            "Replayed {} steps ({} failed), final time t={}\n\n",
            self.steps.len(),
            self.failed_steps(),
            self.final_time
        ));
        output.push_str(&format!(
            "Rules: min_proposal_weight={} voting_period={}s token_multiplier={}\n\n",
            self.params.min_proposal_weight,
            self.params.voting_duration_secs,
            self.params.token_multiplier
        ));

        for outcome in &self.steps {
            let status = if outcome.ok { "ok" } else { "FAILED" };
            output.push_str(&format!(
                "[{:>3}] t={} {:<10} {:<8} {:<6} {}\n",
                outcome.step,
                outcome.at,
                outcome.caller.short(),
                outcome.command,
                status,
                outcome.detail
            ));
        }

        output.push_str("\nProposals:\n");
        if self.proposals.is_empty() {
            output.push_str("  (none)\n");
        }
        for proposal in &self.proposals {
            output.push_str(&format!(
                "  #{} {:<10} for={} against={} deadline=t{} {}\n",
                proposal.id,
                proposal.state.to_string(),
                proposal.votes_for,
                proposal.votes_against,
                proposal.deadline,
                proposal.description
            ));
        }

        output.push_str("\nMembers:\n");
        for member in &self.members {
            output.push_str(&format!("  {:<24} {}\n", member.principal, member.balance));
        }

        output.push_str(&format!("\nTreasury: {}\n", self.treasury));
        output.push_str(&format!("Events: {}\n", self.events));
        output
    }
}

pub async fn execute(
    script: String,
    config: Option<String>,
    events_out: Option<String>,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = match config {
        Some(path) => ConcordConfig::load(Path::new(&path))?,
        None => ConcordConfig::load_or_default(&default_config_path())?,
    };
    logging::init(&config.logging)?;

    let steps = load_script(Path::new(&script))?;
    let (governance, report) = run(&config, &steps)?;

    if let Some(path) = events_out {
        let path = PathBuf::from(path);
        export_events(&governance, &path)?;
        info!(path = %path.display(), events = report.events, "exported event log");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report.render());
    }
    Ok(())
}

pub fn load_script(path: &Path) -> Result<Vec<Step>, ReplayError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ReplayError::ReadScript {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(serde_json::from_str(&contents)?)
}

/// Build the genesis ledger from `config` and run `steps` against it.
pub fn run(
    config: &ConcordConfig,
    steps: &[Step],
) -> Result<(Governance, ReplayReport), ReplayError> {
    let params = config.ledger_params()?;
    let state = GovernanceState::genesis(
        config.governance.administrator.clone(),
        params,
        &config.genesis,
        0,
    )
    .map_err(ReplayError::Genesis)?;

    let clock = ManualClock::new(0);
    let governance = Governance::new(
        state,
        Arc::new(clock.clone()),
        Arc::new(RecordingTransfer::new()),
    );

    let mut outcomes = Vec::with_capacity(steps.len());
    for (index, step) in steps.iter().enumerate() {
        let number = index + 1;
        clock
            .set(step.at)
            .map_err(|source| ReplayError::Clock { step: number, source })?;

        let result = apply(&governance, &step.caller, &step.command);
        let outcome = match result {
            Ok(detail) => StepOutcome {
                step: number,
                at: step.at,
                caller: step.caller.clone(),
                command: step.command.name(),
                ok: true,
                detail,
                error_code: None,
            },
            Err(err) => {
                debug!(step = number, code = err.code(), error = %err, "step failed");
                if step.expect_ok {
                    return Err(ReplayError::StepFailed {
                        step: number,
                        source: err,
                    });
                }
                StepOutcome {
                    step: number,
                    at: step.at,
                    caller: step.caller.clone(),
                    command: step.command.name(),
                    ok: false,
                    detail: err.to_string(),
                    error_code: Some(err.code()),
                }
            }
        };
        outcomes.push(outcome);
    }

    let report = summarize(&governance, outcomes);
    info!(
        steps = report.steps.len(),
        failed = report.failed_steps(),
        proposals = report.proposals.len(),
        "replay complete"
    );
    Ok((governance, report))
}

fn apply(
    governance: &Governance,
    caller: &Principal,
    command: &ScriptCommand,
) -> Result<String, GovernanceError> {
    match command {
        ScriptCommand::Admit { principal, weight } => {
            governance.admit(caller, principal.clone(), *weight)?;
            Ok(format!("admitted {} with weight {}", principal, weight))
        }
        ScriptCommand::Deposit { amount } => {
            let credited = governance.deposit_tokens(caller, *amount)?;
            Ok(format!("paid {}, credited {}", amount, credited))
        }
        ScriptCommand::Withdraw => {
            let amount = governance.withdraw(caller)?;
            Ok(format!("withdrew {}", amount))
        }
        ScriptCommand::Propose { description } => {
            let id = governance.create_proposal(caller, description.clone())?;
            Ok(format!("created proposal #{}", id))
        }
        ScriptCommand::Vote {
            proposal_id,
            support,
        } => {
            let weight = governance.vote(caller, *proposal_id, *support)?;
            let side = if *support { "for" } else { "against" };
            Ok(format!("voted {} #{} with weight {}", side, proposal_id, weight))
        }
        ScriptCommand::Execute { proposal_id } => {
            governance.execute_proposal(caller, *proposal_id)?;
            Ok(format!("executed proposal #{}", proposal_id))
        }
    }
}

fn summarize(governance: &Governance, steps: Vec<StepOutcome>) -> ReplayReport {
    let now = governance.now();
    let state = governance.snapshot();

    let proposals = state
        .proposals()
        .iter()
        .map(|p| ProposalSummary {
            id: p.id,
            description: p.description.clone(),
            proposer: p.proposer.clone(),
            deadline: p.deadline,
            votes_for: p.votes_for,
            votes_against: p.votes_against,
            state: concord::ledger::derive_state(p, now),
        })
        .collect();

    let members = state
        .membership()
        .members()
        .map(|principal| MemberSummary {
            principal: principal.clone(),
            balance: state.balance_of(principal),
        })
        .collect();

    ReplayReport {
        params: *state.params(),
        final_time: now,
        steps,
        proposals,
        members,
        treasury: state.treasury_balance(),
        events: state.events().len(),
    }
}

fn export_events(governance: &Governance, path: &Path) -> Result<(), ReplayError> {
    let bytes = encode_event_log(&governance.events())?;
    std::fs::write(path, bytes).map_err(|source| ReplayError::Write {
        path: path.to_path_buf(),
        source,
    })
}
