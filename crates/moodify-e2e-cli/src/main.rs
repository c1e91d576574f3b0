//! Moodify E2E runner.
//!
//! ## Usage
//!
//! ```bash
//! moodify-e2e            # Run the full suite against TEST_BASE_URL
//! moodify-e2e -v         # With harness debug logging
//! moodify-e2e -q         # Summary only
//! ```
//!
//! Target and credentials come from the environment: `TEST_BASE_URL`,
//! `TEST_EMAIL`, `TEST_PASSWORD`, `NEW_USER_EMAIL`, `NEW_USER_PASSWORD`.
//! Exit code 0 means every scenario passed (skips allowed); 1 otherwise.

use clap::Parser;
use console::style;
use moodify_e2e::{ScenarioResult, ScenarioStatus, Suite, TestConfig};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "moodify-e2e", version, about = "Run the Moodify browser test suite")]
struct Cli {
    /// Increase log verbosity (-v: debug, -vv: trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress per-scenario output; print only the summary
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(all_passed) => {
            if all_passed {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(verbose: u8) {
    let default_directive = match verbose {
        0 => "moodify_e2e=info",
        1 => "moodify_e2e=debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<bool, Box<dyn std::error::Error>> {
    let config = TestConfig::from_env();
    if !cli.quiet {
        println!(
            "Running Moodify suite against {}\n",
            style(&config.base_url).cyan()
        );
    }

    let suite = Suite::moodify(config);
    let quiet = cli.quiet;

    let rt = tokio::runtime::Runtime::new()?;
    let report = rt.block_on(suite.run_with_observer(|result| {
        if !quiet {
            print_result(result);
        }
    }))?;

    print!("{}", report.summary());
    Ok(report.all_passed())
}

fn print_result(result: &ScenarioResult) {
    let marker = match result.status {
        ScenarioStatus::Passed => style("✓").green(),
        ScenarioStatus::Failed => style("✗").red(),
        ScenarioStatus::Error => style("!").red().bold(),
        ScenarioStatus::Skipped => style("-").yellow(),
    };
    let detail = result
        .message
        .as_deref()
        .map(|m| format!(" ({m})"))
        .unwrap_or_default();
    println!(
        "{marker} {}::{} [{:.1}s]{detail}",
        result.group,
        result.name,
        result.duration.as_secs_f64()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["moodify-e2e"]);
        assert_eq!(cli.verbose, 0);
        assert!(!cli.quiet);
    }

    #[test]
    fn test_cli_verbosity_counts() {
        let cli = Cli::parse_from(["moodify-e2e", "-vv"]);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn test_cli_quiet_conflicts_with_verbose() {
        let result = Cli::try_parse_from(["moodify-e2e", "-q", "-v"]);
        assert!(result.is_err());
    }
}
