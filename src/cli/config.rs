//! Concord configuration file handling
//!
//! Provides default configuration generation and loading for the operator CLI.
//! Configuration files are TOML format.
//!
//! ## Ledger Parameters vs Operator Settings
//!
//! `[governance]` and `[[genesis]]` fix the ledger's rules (administrator,
//! proposal threshold, voting period, deposit multiplier) and its initial
//! members. They are read once when a ledger is built. `[logging]` only
//! affects the local process.

use concord::ledger::{GenesisAllocation, LedgerParams};
use concord::Principal;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Default log level
const DEFAULT_LOG_LEVEL: &str = "info";

/// Default voting period (humantime syntax)
const DEFAULT_VOTING_PERIOD: &str = "7days";

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write config file '{path}': {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("invalid voting period '{value}': {reason}")]
    VotingPeriod { value: String, reason: String },

    #[error("token_multiplier must be greater than zero")]
    ZeroMultiplier,
}

/// Concord configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcordConfig {
    /// Ledger rules
    #[serde(default)]
    pub governance: GovernanceConfig,

    /// Members admitted when the ledger is created
    #[serde(default)]
    pub genesis: Vec<GenesisAllocation>,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Ledger rules
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GovernanceConfig {
    /// Principal allowed to admit members and withdraw the treasury
    #[serde(default = "default_administrator")]
    pub administrator: Principal,

    /// Balance required to create a proposal
    #[serde(default = "default_min_proposal_weight")]
    pub min_proposal_weight: u64,

    /// Time from proposal creation to deadline, e.g. "7days", "48h"
    #[serde(default = "default_voting_period")]
    pub voting_period: String,

    /// Voting weight credited per unit deposited
    #[serde(default = "default_token_multiplier")]
    pub token_multiplier: u64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    pub file: Option<PathBuf>,
}

fn default_administrator() -> Principal {
    Principal::from("admin")
}

fn default_min_proposal_weight() -> u64 {
    LedgerParams::default().min_proposal_weight
}

fn default_voting_period() -> String {
    DEFAULT_VOTING_PERIOD.to_string()
}

fn default_token_multiplier() -> u64 {
    LedgerParams::default().token_multiplier
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

impl Default for GovernanceConfig {
    fn default() -> Self {
        Self {
            administrator: default_administrator(),
            min_proposal_weight: default_min_proposal_weight(),
            voting_period: default_voting_period(),
            token_multiplier: default_token_multiplier(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: DEFAULT_LOG_LEVEL.to_string(),
            file: None,
        }
    }
}

impl Default for ConcordConfig {
    fn default() -> Self {
        Self {
            governance: GovernanceConfig::default(),
            genesis: Vec::new(),
            logging: LoggingConfig::default(),
        }
    }
}

impl ConcordConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        toml::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Load from `path` if it exists, otherwise use defaults
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Validated ledger parameters
    pub fn ledger_params(&self) -> Result<LedgerParams, ConfigError> {
        let period = &self.governance.voting_period;
        let duration =
            humantime::parse_duration(period).map_err(|e| ConfigError::VotingPeriod {
                value: period.clone(),
                reason: e.to_string(),
            })?;
        if duration.as_secs() == 0 {
            return Err(ConfigError::VotingPeriod {
                value: period.clone(),
                reason: "must be at least one second".to_string(),
            });
        }

        if self.governance.token_multiplier == 0 {
            return Err(ConfigError::ZeroMultiplier);
        }

        Ok(LedgerParams {
            min_proposal_weight: self.governance.min_proposal_weight,
            voting_duration_secs: duration.as_secs(),
            token_multiplier: self.governance.token_multiplier,
        })
    }

    /// Generate default configuration content as a string with comments
    pub fn generate_default_toml() -> String {
        format!(
            r#"# Concord Governance Ledger Configuration
#
# [governance] and [[genesis]] define the rules and initial members of a
# ledger. They are read once when a ledger is created; changing them later
# does not alter a ledger that already exists.

[governance]
# Principal allowed to admit members and withdraw deposited funds.
# Always a member.
administrator = "admin"

# Balance a member needs before it may create a proposal
min_proposal_weight = {min_weight}

# Time between proposal creation and its voting deadline
# Examples: "7days", "48h", "30min"
voting_period = "{period}"

# Voting weight credited per unit deposited
token_multiplier = {multiplier}

# Initial members. The administrator may be listed to give it weight.
# [[genesis]]
# principal = "alice"
# weight = 100

[logging]
# Log level: trace, debug, info, warn, error
# RUST_LOG overrides this when set.
level = "info"

# Log file path (optional, logs to stderr if not specified)
# file = "/var/log/concord/concord.log"
"#,
            min_weight = default_min_proposal_weight(),
            period = DEFAULT_VOTING_PERIOD,
            multiplier = default_token_multiplier(),
        )
    }

    /// Create and save a default configuration file
    pub fn create_default(config_path: &Path) -> Result<(), ConfigError> {
        write_creating_parent(config_path, &Self::generate_default_toml())
    }
}

fn write_creating_parent(path: &Path, contents: &str) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    fs::write(path, contents).map_err(|source| ConfigError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Get the default config file path
///
/// - Linux: ~/.local/share/concord/config.toml
pub fn default_config_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("concord")
        .join("config.toml")
}
