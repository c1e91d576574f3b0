//! End-to-end browser test harness for the Moodify mood-tracking web app.
//!
//! The harness drives a real Chromium instance over the DevTools protocol
//! (behind the `browser` feature) or an in-process mock (the default, used
//! by the unit tests), and runs a fixed suite of user-journey scenarios:
//! authentication, dashboard, and navigation, in that order.
//!
//! Synchronization is the core of the crate: every lookup and assertion
//! goes through bounded polling ([`wait`]) rather than fixed sleeps, so the
//! suite stays reliable against an app that renders asynchronously.
//!
//! # Example
//!
//! ```no_run
//! use moodify_e2e::{Suite, TestConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let suite = Suite::moodify(TestConfig::from_env());
//!     let runtime = tokio::runtime::Runtime::new()?;
//!     let report = runtime.block_on(suite.run())?;
//!     print!("{}", report.summary());
//!     std::process::exit(i32::from(!report.all_passed()));
//! }
//! ```

pub mod config;
pub mod locator;
pub mod result;
pub mod scenario;
pub mod session;
pub mod suite;
pub mod wait;

pub use config::TestConfig;
pub use locator::Locator;
pub use result::{HarnessError, HarnessResult};
pub use scenario::{Scenario, ScenarioOutcome};
pub use session::{Session, SessionConfig};
pub use suite::{ScenarioGroup, ScenarioResult, ScenarioStatus, Suite, SuiteReport};
pub use wait::{WaitCondition, WaitOptions};
