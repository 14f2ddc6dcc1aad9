pub mod completions;
pub mod report;
pub mod resolve;

use eyre::{Result, eyre};

use testinel::config::Config;
use testinel::destination::DSN_ENV_VAR;

/// Destination from `--dsn`, TESTINEL_DSN, or the config file
pub fn destination(flag: Option<&str>, config: &Config) -> Result<String> {
    config
        .resolve_dsn(flag, std::env::var(DSN_ENV_VAR).ok())
        .ok_or_else(|| eyre!("No destination configured: pass --dsn, set {}, or set reporter.dsn", DSN_ENV_VAR))
}
