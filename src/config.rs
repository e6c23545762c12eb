use clap::Parser;
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_PAGE_SIZE: usize = 3000;
pub const DEFAULT_BATCH_TRIGGER: u64 = 300;
/// 50 native units in smallest denomination. Notes above this are already
/// large and are left out of consolidation.
pub const DEFAULT_MAX_NOTE_VALUE: u64 = 5_000_000_000;
pub const DEFAULT_FEE: u64 = 5;
pub const DEFAULT_EXPIRATION_DELTA: u32 = 30;

#[derive(Parser, Debug, Default)]
#[clap(version)]
pub struct Cli {
    /// http rpc endpoint of the node, e.g. localhost:8021
    #[clap(long, value_parser, env = "RPC_URL")]
    pub rpc_url: Option<String>,
    /// path to csv file where submission results are written
    #[clap(long, value_parser, env = "OUTPUT")]
    pub output: Option<PathBuf>,
    /// wallet account whose notes are combined
    #[clap(long, value_parser, env = "ACCOUNT")]
    pub account: Option<String>,
    /// stop once this many notes have been considered
    #[clap(long, value_parser, env = "TARGET_NOTES")]
    pub target_notes: Option<u64>,
    /// notes requested per page from the wallet
    #[clap(long, value_parser, default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,
    /// considered-note count after which the open batch is submitted
    #[clap(long, value_parser, default_value_t = DEFAULT_BATCH_TRIGGER)]
    pub batch_trigger: u64,
    /// notes above this value (smallest denomination) are not combined
    #[clap(long, value_parser, default_value_t = DEFAULT_MAX_NOTE_VALUE)]
    pub max_note_value: u64,
    /// transaction fee in smallest denomination
    #[clap(long, value_parser, default_value_t = DEFAULT_FEE)]
    pub fee: u64,
    /// blocks until an unconfirmed transaction expires
    #[clap(long, value_parser, default_value_t = DEFAULT_EXPIRATION_DELTA)]
    pub expiration_delta: u32,
}

/// A required setting that was neither passed as a flag nor set in the
/// environment. Each variant keeps its own exit code so operators can tell
/// from the status alone which setting is missing.
#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    MissingRpcUrl,
    MissingOutput,
    MissingAccount,
    MissingTargetNotes,
}

impl ConfigError {
    pub fn exit_code(&self) -> i32 {
        match self {
            ConfigError::MissingRpcUrl => 1,
            ConfigError::MissingOutput => 2,
            ConfigError::MissingAccount => 3,
            ConfigError::MissingTargetNotes => 4,
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MissingRpcUrl => write!(
                f,
                "Specify `RPC_URL` (or --rpc-url) pointing to the http rpc endpoint of the node"
            ),
            ConfigError::MissingOutput => write!(
                f,
                "Specify `OUTPUT` (or --output) with the path of the csv file to write results to"
            ),
            ConfigError::MissingAccount => {
                write!(f, "Specify `ACCOUNT` (or --account) with the account name")
            }
            ConfigError::MissingTargetNotes => write!(
                f,
                "Specify `TARGET_NOTES` (or --target-notes) with the number of notes to consider"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone, Debug)]
pub struct Config {
    pub rpc_url: String,
    pub output: PathBuf,
    pub account: String,
    pub target_notes: u64,
    pub page_size: usize,
    pub batch_trigger: u64,
    pub max_note_value: u64,
    pub fee: u64,
    pub expiration_delta: u32,
}

impl Config {
    /// Validates the parsed CLI before any remote interaction happens.
    pub fn from_cli(cli: Cli) -> Result<Config, ConfigError> {
        let rpc_url = cli.rpc_url.ok_or(ConfigError::MissingRpcUrl)?;
        let output = cli.output.ok_or(ConfigError::MissingOutput)?;
        let account = cli.account.ok_or(ConfigError::MissingAccount)?;
        let target_notes = cli.target_notes.ok_or(ConfigError::MissingTargetNotes)?;

        Ok(Config {
            rpc_url: normalize_endpoint(rpc_url),
            output,
            account,
            target_notes,
            page_size: cli.page_size,
            batch_trigger: cli.batch_trigger,
            max_note_value: cli.max_note_value,
            fee: cli.fee,
            expiration_delta: cli.expiration_delta,
        })
    }
}

/// The original tooling accepted bare `host:port` endpoints.
fn normalize_endpoint(endpoint: String) -> String {
    if endpoint.contains("://") {
        endpoint
    } else {
        format!("http://{endpoint}")
    }
}

#[cfg(test)]
mod tests {
    use crate::config::{Cli, Config, ConfigError};
    use std::path::PathBuf;

    fn full_cli() -> Cli {
        Cli {
            rpc_url: Some("localhost:8021".to_string()),
            output: Some(PathBuf::from("/tmp/out.csv")),
            account: Some("default".to_string()),
            target_notes: Some(300),
            ..Cli::default()
        }
    }

    #[test]
    fn full_cli_resolves() {
        let config = Config::from_cli(full_cli()).unwrap();
        assert_eq!(config.rpc_url, "http://localhost:8021");
        assert_eq!(config.account, "default");
        assert_eq!(config.target_notes, 300);
    }

    #[test]
    fn explicit_scheme_is_kept() {
        let mut cli = full_cli();
        cli.rpc_url = Some("https://node.example:8021".to_string());
        let config = Config::from_cli(cli).unwrap();
        assert_eq!(config.rpc_url, "https://node.example:8021");
    }

    #[test]
    fn each_missing_setting_has_its_own_exit_code() {
        let mut cli = full_cli();
        cli.rpc_url = None;
        let err = Config::from_cli(cli).unwrap_err();
        assert_eq!(err, ConfigError::MissingRpcUrl);
        assert_eq!(err.exit_code(), 1);

        let mut cli = full_cli();
        cli.output = None;
        assert_eq!(Config::from_cli(cli).unwrap_err().exit_code(), 2);

        let mut cli = full_cli();
        cli.account = None;
        assert_eq!(Config::from_cli(cli).unwrap_err().exit_code(), 3);

        let mut cli = full_cli();
        cli.target_notes = None;
        assert_eq!(Config::from_cli(cli).unwrap_err().exit_code(), 4);
    }

    #[test]
    fn missing_settings_are_reported_in_order() {
        // rpc url wins over the rest when several are missing
        let err = Config::from_cli(Cli::default()).unwrap_err();
        assert_eq!(err, ConfigError::MissingRpcUrl);
    }
}
