use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use portcfg::config::{ErrorMessages, ToolParameters};
use portcfg::{DriverError, PytoolDriver, WorkflowOutcome};
use std::path::PathBuf;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Message id printed when a configuration run fails.
const FAILURE_MESSAGE: &str = "error_msg1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Host and SOC MTU, then port mapping
    #[value(name = "MTU")]
    Mtu,
}

/// Drive the LEK port configuration tool non-interactively
#[derive(Debug, Parser)]
#[command(name = "portcfg", version, about)]
struct Cli {
    /// What to configure
    #[arg(value_enum)]
    mode: Mode,

    /// JSON document with tool parameters
    parameters: PathBuf,

    /// JSON document with user-facing error messages
    errors: PathBuf,

    /// Treat a choice the tool rejected as a failure
    #[arg(long)]
    strict: bool,

    /// Seconds to wait for each prompt (overrides the parameter document)
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Increase log verbosity (-v debug, which echoes the tool's output; -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

/// Log what a workflow reported and decide whether the run may continue.
fn settle(step: &str, outcome: WorkflowOutcome, strict: bool) -> Result<Option<String>> {
    if outcome.rejected_choices > 0 {
        log::warn!("{}: tool rejected {} choice(s)", step, outcome.rejected_choices);
    }

    let outcome = if strict {
        outcome.strict().with_context(|| format!("{} failed", step))?
    } else {
        outcome
    };

    if !outcome.success {
        if let Some(failure) = &outcome.failure {
            log::error!("{} stopped: {}", step, failure);
        }
        return Ok(None);
    }

    log::info!("{} done", step);
    Ok(Some(outcome.captured))
}

async fn run_mtu(params: &ToolParameters, timeout: Duration, strict: bool) -> Result<bool> {
    let command = params.tool_command();
    let (mut driver, screen) = PytoolDriver::launch(&command, timeout)
        .await
        .with_context(|| format!("failed to start {}", command.program))?;

    let outcome = driver
        .configure_mtu_size(&screen, &params.host_request(), false)
        .await
        .context("host MTU configuration")?;
    let Some(screen) = settle("host MTU", outcome, strict)? else {
        return Ok(false);
    };

    let outcome = driver
        .configure_mtu_size(&screen, &params.soc_request(), false)
        .await
        .context("SOC MTU configuration")?;
    let Some(screen) = settle("SOC MTU", outcome, strict)? else {
        return Ok(false);
    };

    let outcome = driver
        .port_mapping(&screen, &params.port_mapping, true)
        .await
        .context("port mapping")?;
    if settle("port mapping", outcome, strict)?.is_none() {
        return Ok(false);
    }

    match driver.finish().await {
        Ok(status) if !status.success() => {
            log::warn!("tool exited with status {}", status.exit_code());
        }
        Ok(_) => {}
        Err(e @ DriverError::ExitTimeout { .. }) => log::warn!("{}", e),
        Err(e) => return Err(e).context("waiting for the tool to exit"),
    }
    Ok(true)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let params = ToolParameters::load(&cli.parameters).context("loading parameters")?;
    let messages = ErrorMessages::load(&cli.errors).context("loading error messages")?;
    let timeout = cli
        .timeout
        .map(Duration::from_secs)
        .or_else(|| params.timeout())
        .unwrap_or(DEFAULT_TIMEOUT);

    let result = match cli.mode {
        Mode::Mtu => run_mtu(&params, timeout, cli.strict).await,
    };

    match result {
        Ok(true) => Ok(()),
        Ok(false) => {
            println!("{}", messages.message(FAILURE_MESSAGE));
            std::process::exit(1);
        }
        Err(e) => {
            println!("{}", messages.message(FAILURE_MESSAGE));
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(failure: Option<DriverError>, rejected_choices: usize) -> WorkflowOutcome {
        WorkflowOutcome {
            success: failure.is_none(),
            captured: "1) Configure Host Port\r\n".to_string(),
            failure,
            rejected_choices,
        }
    }

    #[test]
    fn test_settle_passes_screen_on() {
        let screen = settle("host MTU", outcome(None, 0), false).unwrap();

        assert_eq!(screen.as_deref(), Some("1) Configure Host Port\r\n"));
    }

    #[test]
    fn test_settle_stops_on_missing_label() {
        let failure = DriverError::LabelNotFound {
            label: "Modify MTU".to_string(),
        };

        assert!(settle("host MTU", outcome(Some(failure), 0), false)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_settle_stops_on_missing_label_when_strict() {
        let failure = DriverError::LabelNotFound {
            label: "Mapping".to_string(),
        };

        let err = settle("port mapping", outcome(Some(failure), 0), true).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<DriverError>(),
            Some(DriverError::LabelNotFound { .. })
        ));
    }

    #[test]
    fn test_settle_tolerates_rejections_by_default() {
        assert!(settle("SOC MTU", outcome(None, 2), false).unwrap().is_some());
    }

    #[test]
    fn test_settle_escalates_rejections_when_strict() {
        let err = settle("SOC MTU", outcome(None, 2), true).unwrap_err();

        assert!(err.to_string().contains("SOC MTU failed"));
        assert!(matches!(
            err.downcast_ref::<DriverError>(),
            Some(DriverError::RejectedChoice { count: 2 })
        ));
    }

    #[test]
    fn test_cli_arguments() {
        let cli = Cli::try_parse_from([
            "portcfg", "MTU", "params.json", "errors.json", "--strict", "--timeout", "5", "-vv",
        ])
        .unwrap();

        assert_eq!(cli.mode, Mode::Mtu);
        assert_eq!(cli.parameters, PathBuf::from("params.json"));
        assert!(cli.strict);
        assert_eq!(cli.timeout, Some(5));
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["portcfg", "VLAN", "params.json", "errors.json"]).is_err());
    }
}
