//! Suite aggregation: fixed scenario groups, one browser session per group,
//! and a run report with pass/fail accounting.
//!
//! Group order is part of the contract: authentication first (later groups
//! assume the login flow works), then dashboard, then navigation. A session
//! that fails to launch aborts the run; a scenario failure never stops the
//! group.

use crate::config::TestConfig;
use crate::result::HarnessResult;
use crate::scenario::{
    authentication_scenarios, dashboard_scenarios, navigation_scenarios, Scenario,
    ScenarioOutcome,
};
use crate::session::{Session, SessionConfig};
use std::time::{Duration, Instant};

/// A named, ordered collection of scenarios sharing one browser session
pub struct ScenarioGroup {
    /// Group name
    pub name: &'static str,
    /// Scenarios in execution order
    pub scenarios: Vec<Scenario>,
}

/// Final status of one scenario
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScenarioStatus {
    /// All assertions held
    Passed,
    /// An assertion did not hold
    Failed,
    /// The harness could not complete the script (navigation, timeout)
    Error,
    /// Nothing to verify; does not count against the run
    Skipped,
}

impl std::fmt::Display for ScenarioStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Passed => write!(f, "PASS"),
            Self::Failed => write!(f, "FAIL"),
            Self::Error => write!(f, "ERROR"),
            Self::Skipped => write!(f, "SKIP"),
        }
    }
}

/// Outcome of one scenario within a run
#[derive(Debug, Clone)]
pub struct ScenarioResult {
    /// Owning group name
    pub group: &'static str,
    /// Scenario name
    pub name: &'static str,
    /// Final status
    pub status: ScenarioStatus,
    /// Failure/error/skip detail, if any
    pub message: Option<String>,
    /// Wall-clock time spent in the scenario
    pub duration: Duration,
}

/// Accumulated results of a full suite run
#[derive(Debug, Clone, Default)]
pub struct SuiteReport {
    /// Per-scenario results in execution order
    pub results: Vec<ScenarioResult>,
    /// Wall-clock time for the whole run
    pub duration: Duration,
}

impl SuiteReport {
    fn count(&self, status: ScenarioStatus) -> usize {
        self.results.iter().filter(|r| r.status == status).count()
    }

    /// Number of scenarios executed (including skips)
    #[must_use]
    pub fn total(&self) -> usize {
        self.results.len()
    }

    /// Number of passed scenarios
    #[must_use]
    pub fn passed(&self) -> usize {
        self.count(ScenarioStatus::Passed)
    }

    /// Number of assertion failures
    #[must_use]
    pub fn failed(&self) -> usize {
        self.count(ScenarioStatus::Failed)
    }

    /// Number of harness errors
    #[must_use]
    pub fn errors(&self) -> usize {
        self.count(ScenarioStatus::Error)
    }

    /// Number of skipped scenarios
    #[must_use]
    pub fn skipped(&self) -> usize {
        self.count(ScenarioStatus::Skipped)
    }

    /// True when no scenario failed or errored. Skips do not count against
    /// the run.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failed() == 0 && self.errors() == 0
    }

    /// Human-readable run summary
    #[must_use]
    pub fn summary(&self) -> String {
        let bar = "=".repeat(70);
        let mut out = String::new();
        out.push_str(&format!("{bar}\nTEST SUMMARY\n{bar}\n"));
        out.push_str(&format!("Total Scenarios Run: {}\n", self.total()));
        out.push_str(&format!("Passed:   {}\n", self.passed()));
        out.push_str(&format!("Failed:   {}\n", self.failed()));
        out.push_str(&format!("Errors:   {}\n", self.errors()));
        out.push_str(&format!("Skipped:  {}\n", self.skipped()));

        let problems: Vec<&ScenarioResult> = self
            .results
            .iter()
            .filter(|r| matches!(r.status, ScenarioStatus::Failed | ScenarioStatus::Error))
            .collect();
        if !problems.is_empty() {
            out.push_str(&bar);
            out.push('\n');
            for result in problems {
                out.push_str(&format!(
                    "{} {}::{}: {}\n",
                    result.status,
                    result.group,
                    result.name,
                    result.message.as_deref().unwrap_or("no detail")
                ));
            }
        }
        out.push_str(&bar);
        out.push('\n');
        out
    }
}

/// The suite: configuration plus ordered scenario groups
pub struct Suite {
    config: TestConfig,
    groups: Vec<ScenarioGroup>,
}

impl Suite {
    /// Build a suite from explicit groups
    #[must_use]
    pub fn new(config: TestConfig, groups: Vec<ScenarioGroup>) -> Self {
        Self { config, groups }
    }

    /// The full Moodify suite in its fixed group order
    #[must_use]
    pub fn moodify(config: TestConfig) -> Self {
        Self::new(
            config,
            vec![
                ScenarioGroup {
                    name: "authentication",
                    scenarios: authentication_scenarios(),
                },
                ScenarioGroup {
                    name: "dashboard",
                    scenarios: dashboard_scenarios(),
                },
                ScenarioGroup {
                    name: "navigation",
                    scenarios: navigation_scenarios(),
                },
            ],
        )
    }

    /// Run configuration
    #[must_use]
    pub const fn config(&self) -> &TestConfig {
        &self.config
    }

    /// Run every group in order, reporting each scenario result through
    /// `observer` as it completes.
    ///
    /// One browser session serves each group: launched before the first
    /// scenario, pointed at the base URL before every scenario, and closed
    /// when the group ends regardless of outcomes.
    ///
    /// # Errors
    ///
    /// `HarnessError::SessionInit` if a group's browser fails to launch;
    /// results collected up to that point are lost with the run.
    pub async fn run_with_observer<F>(&self, mut observer: F) -> HarnessResult<SuiteReport>
    where
        F: FnMut(&ScenarioResult),
    {
        let run_start = Instant::now();
        let mut report = SuiteReport::default();

        for group in &self.groups {
            tracing::info!(group = group.name, "starting scenario group");
            let mut session = Session::launch(SessionConfig::from(&self.config)).await?;

            for scenario in &group.scenarios {
                let result = Self::run_scenario(&mut session, &self.config, group.name, scenario)
                    .await;
                observer(&result);
                report.results.push(result);
            }

            if let Err(e) = session.close().await {
                tracing::warn!(group = group.name, error = %e, "session teardown failed");
            }
        }

        report.duration = run_start.elapsed();
        Ok(report)
    }

    /// Run every group in order without progress reporting.
    ///
    /// # Errors
    ///
    /// Same as [`Suite::run_with_observer`].
    pub async fn run(&self) -> HarnessResult<SuiteReport> {
        self.run_with_observer(|_| {}).await
    }

    async fn run_scenario(
        session: &mut Session,
        config: &TestConfig,
        group: &'static str,
        scenario: &Scenario,
    ) -> ScenarioResult {
        let start = Instant::now();

        // Fresh page before every scenario, mirroring a per-test setup step
        let outcome = match session.goto(&config.base_url).await {
            Ok(()) => (scenario.run)(session, config).await,
            Err(e) => Err(e),
        };

        let (status, message) = match outcome {
            Ok(ScenarioOutcome::Passed) => (ScenarioStatus::Passed, None),
            Ok(ScenarioOutcome::Failed(m)) => (ScenarioStatus::Failed, Some(m)),
            Ok(ScenarioOutcome::Skipped(m)) => (ScenarioStatus::Skipped, Some(m)),
            Err(e) => (ScenarioStatus::Error, Some(e.to_string())),
        };

        match status {
            ScenarioStatus::Passed => {
                tracing::info!(group, scenario = scenario.name, "passed");
            }
            ScenarioStatus::Skipped => {
                tracing::info!(
                    group,
                    scenario = scenario.name,
                    reason = message.as_deref().unwrap_or(""),
                    "skipped"
                );
            }
            ScenarioStatus::Failed | ScenarioStatus::Error => {
                tracing::warn!(
                    group,
                    scenario = scenario.name,
                    detail = message.as_deref().unwrap_or(""),
                    "did not pass"
                );
            }
        }

        ScenarioResult {
            group,
            name: scenario.name,
            status,
            message,
            duration: start.elapsed(),
        }
    }
}
