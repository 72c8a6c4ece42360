//! Command handlers.

use vantage_api::seed::{self, AccountOutcome, SeedReport};
use vantage_api::{Backend, Backends, Config};

use crate::cli::{Command, ConfigAction};
use crate::error::{Error, Result};

/// Run a command against the resolved configuration.
pub async fn run(config: &Config, command: &Command) -> Result<()> {
    match command {
        Command::Seed => {
            let report = cmd_seed(config).await?;
            print!("{}", render_report(&report));
            check_report(&report)
        }
        Command::Config {
            action: ConfigAction::Show,
        } => {
            print!("{}", cmd_config_show(config)?);
            Ok(())
        }
    }
}

/// Seed the demo accounts into the configured backends.
pub async fn cmd_seed(config: &Config) -> Result<SeedReport> {
    if config.backend == Backend::Memory {
        tracing::warn!("Seeding the memory backend; nothing will outlive this process");
    }
    let backends = Backends::from_config(config)?;
    Ok(seed::seed(backends.identity.as_ref(), backends.profiles().as_ref()).await)
}

/// The resolved configuration as TOML.
pub fn cmd_config_show(config: &Config) -> Result<String> {
    Ok(toml::to_string_pretty(config)?)
}

/// One line per demo account.
pub fn render_report(report: &SeedReport) -> String {
    let mut out = String::new();
    for entry in &report.entries {
        let account = match &entry.account {
            AccountOutcome::Created => "created".to_string(),
            AccountOutcome::AlreadyExists => "already exists".to_string(),
            AccountOutcome::Failed(reason) => format!("failed ({reason})"),
        };
        let profile = match &entry.profile_error {
            None => "written".to_string(),
            Some(reason) => format!("failed ({reason})"),
        };
        out.push_str(&format!(
            "{:<18} account: {account}; profile: {profile}\n",
            entry.uid
        ));
    }
    out
}

fn check_report(report: &SeedReport) -> Result<()> {
    if report.is_complete() {
        return Ok(());
    }
    let failed = report
        .entries
        .iter()
        .filter(|e| matches!(e.account, AccountOutcome::Failed(_)) || e.profile_error.is_some())
        .count();
    Err(Error::SeedIncomplete(failed, report.entries.len()))
}
