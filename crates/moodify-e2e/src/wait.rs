//! Polling waits that bridge issuing a browser command and the app's
//! asynchronous rendering.
//!
//! All conditions share one contract: poll at a fixed interval, bounded by
//! an explicit timeout, and treat "not yet true" and "never true" as the
//! same timeout failure. A caller cannot distinguish a slow condition from
//! an impossible one; that is an accepted limitation of bounded polling.

use crate::config::EXPLICIT_WAIT_MS;
use crate::locator::Locator;
use crate::result::{HarnessError, HarnessResult};
use std::future::Future;
use std::time::{Duration, Instant};

/// Default polling interval (50ms)
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 50;

/// Options for a single wait operation
#[derive(Debug, Clone)]
pub struct WaitOptions {
    /// Timeout in milliseconds
    pub timeout_ms: u64,
    /// Polling interval in milliseconds
    pub poll_interval_ms: u64,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            timeout_ms: EXPLICIT_WAIT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }
}

impl WaitOptions {
    /// Create wait options with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the timeout in milliseconds
    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }

    /// Set the polling interval in milliseconds
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval_ms: u64) -> Self {
        self.poll_interval_ms = poll_interval_ms;
        self
    }

    /// Timeout as a Duration
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Poll interval as a Duration
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

/// The condition kinds a scenario can wait on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WaitCondition {
    /// An element matching the locator exists in the document
    /// (existence, not visibility)
    ElementPresent(Locator),
    /// An element matching the locator exists, is visible, and is enabled
    ElementClickable(Locator),
    /// The navigation URL differs from the baseline
    UrlChanged(String),
    /// The navigation URL contains the substring
    UrlContains(String),
}

impl std::fmt::Display for WaitCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ElementPresent(locator) => write!(f, "element present: {locator}"),
            Self::ElementClickable(locator) => write!(f, "element clickable: {locator}"),
            Self::UrlChanged(baseline) => write!(f, "url changed from {baseline}"),
            Self::UrlContains(part) => write!(f, "url contains {part}"),
        }
    }
}

/// Poll `probe` at the configured interval until it returns true or the
/// timeout elapses. Returns the elapsed time on success.
///
/// One loop serves all four condition kinds; sessions pass a predicate
/// closing over however they observe the page. A final probe runs at the
/// timeout boundary, so a condition that became true at time t succeeds no
/// later than t plus one poll interval, and a condition that never becomes
/// true fails no earlier than the timeout and no later than the timeout
/// plus one poll interval.
///
/// # Errors
///
/// `HarnessError::Timeout` when the condition never became true; probe
/// errors propagate unchanged.
pub async fn poll_until<F, Fut>(
    options: &WaitOptions,
    waited_for: &str,
    mut probe: F,
) -> HarnessResult<Duration>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = HarnessResult<bool>>,
{
    let start = Instant::now();
    let timeout = options.timeout();
    let poll_interval = options.poll_interval();

    loop {
        if probe().await? {
            return Ok(start.elapsed());
        }
        if start.elapsed() >= timeout {
            return Err(HarnessError::Timeout {
                ms: options.timeout_ms,
                waited_for: waited_for.to_string(),
            });
        }
        tokio::time::sleep(poll_interval).await;
    }
}

/// Fixed settle delay. Last resort, for actions whose completion cannot be
/// observed via the DOM (e.g. a backend write reflected only after refresh);
/// prefer [`poll_until`] everywhere else.
pub async fn settle(duration: Duration) {
    tokio::time::sleep(duration).await;
}
