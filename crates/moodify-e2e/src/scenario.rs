//! User-journey scenarios.
//!
//! Each scenario is a linear script: navigate, act, wait, assert. Scenarios
//! never manage the browser lifecycle; they receive a live [`Session`] and
//! the run configuration, and report one of three outcomes. Harness-level
//! failures (navigation errors, wait timeouts) propagate as errors and are
//! reported separately from assertion failures.

use crate::config::TestConfig;
use crate::locator::{moodify, Locator};
use crate::result::HarnessResult;
use crate::session::Session;
use crate::wait::{settle, WaitOptions};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

/// How a scenario concluded
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScenarioOutcome {
    /// Every assertion held
    Passed,
    /// An assertion did not hold
    Failed(String),
    /// The application was already in the target state; nothing to verify
    Skipped(String),
}

/// Boxed scenario entry point, usable in a registry
pub type ScenarioFn = for<'a> fn(
    &'a mut Session,
    &'a TestConfig,
) -> Pin<Box<dyn Future<Output = HarnessResult<ScenarioOutcome>> + 'a>>;

/// A named scenario
pub struct Scenario {
    /// Scenario name, stable across runs
    pub name: &'static str,
    /// Entry point
    pub run: ScenarioFn,
}

fn fail(message: impl Into<String>) -> HarnessResult<ScenarioOutcome> {
    Ok(ScenarioOutcome::Failed(message.into()))
}

/// Explicit wait sized from the run configuration
fn explicit(config: &TestConfig) -> WaitOptions {
    WaitOptions::new().with_timeout(config.explicit_wait_ms)
}

/// Shorter wait for validation errors, which render synchronously with the
/// click; capped so a missing message fails fast.
fn error_wait(config: &TestConfig) -> WaitOptions {
    WaitOptions::new().with_timeout(config.explicit_wait_ms.min(5_000))
}

/// Heading shown on the dashboard once authenticated. The login form lives
/// at the same URL, so this heading (not the URL) signals a successful
/// login.
fn dashboard_heading() -> Locator {
    Locator::text_contains("feel")
}

async fn fill_login_form(
    session: &mut Session,
    email: &str,
    password: &str,
) -> HarnessResult<()> {
    session.type_text(&moodify::email_input(), email).await?;
    session
        .type_text(&moodify::password_input(), password)
        .await?;
    session.click(&moodify::submit_button()).await
}

/// Bring the session to an authenticated dashboard, logging in with the
/// configured credentials if the login form is showing.
async fn ensure_logged_in(session: &mut Session, config: &TestConfig) -> HarnessResult<()> {
    session.goto(&config.dashboard_url()).await?;
    if session.is_present(&dashboard_heading()).await? {
        return Ok(());
    }
    session
        .wait_for_element(&moodify::email_input(), &explicit(config))
        .await?;
    fill_login_form(session, &config.test_email, &config.test_password).await?;
    session
        .wait_for_element(&dashboard_heading(), &explicit(config))
        .await?;
    Ok(())
}

// ============================================================================
// Authentication scenarios
// ============================================================================

/// The homepage renders its branding and a call to action.
pub async fn homepage_loads(
    session: &mut Session,
    config: &TestConfig,
) -> HarnessResult<ScenarioOutcome> {
    session.goto(&config.base_url).await?;
    session
        .wait_for_element(&Locator::tag("h1"), &explicit(config))
        .await?;

    let heading = session.text_of(&Locator::tag("h1")).await?;
    if !heading.contains("Moodify") {
        return fail(format!("homepage heading missing app name: {heading:?}"));
    }

    for cta in ["Get started", "Sign Up", "Login"] {
        if session.is_present(&Locator::button_text(cta)).await?
            || session.is_present(&Locator::text_contains(cta)).await?
        {
            return Ok(ScenarioOutcome::Passed);
        }
    }
    fail("homepage has no call-to-action link")
}

/// The homepage call to action is clickable and the dashboard URL shows
/// the login form when unauthenticated.
pub async fn login_page_navigation(
    session: &mut Session,
    config: &TestConfig,
) -> HarnessResult<ScenarioOutcome> {
    // Take the homepage CTA route when one exists; its absence is
    // tolerated, but a CTA that never becomes clickable is not.
    session.goto(&config.base_url).await?;
    for cta in ["Get started", "Sign Up"] {
        let candidate = Locator::button_text(cta);
        if session.is_present(&candidate).await? {
            session
                .wait_for_clickable(&candidate, &error_wait(config))
                .await?;
            session.click(&candidate).await?;
            break;
        }
    }

    session.goto(&config.dashboard_url()).await?;
    // Force a logged-out state so the form must render even after an
    // earlier scenario authenticated.
    session.clear_cookies().await?;
    session.clear_local_storage().await?;
    session.refresh().await?;
    session
        .wait_for_element(&moodify::email_input(), &explicit(config))
        .await?;

    if !session
        .is_present(&Locator::css("input[type='password']"))
        .await?
    {
        return fail("password input missing or not of type password");
    }
    if !session.is_present(&moodify::submit_button()).await? {
        return fail("submit button missing from login form");
    }
    let heading = session.text_of(&Locator::tag("h3")).await?;
    if !heading.contains("Log In") {
        return fail(format!("login form heading is {heading:?}, expected Log In"));
    }
    Ok(ScenarioOutcome::Passed)
}

/// Submitting the empty form surfaces the client-side validation message.
pub async fn login_empty_fields(
    session: &mut Session,
    config: &TestConfig,
) -> HarnessResult<ScenarioOutcome> {
    session.goto(&config.dashboard_url()).await?;
    session
        .wait_for_element(&moodify::submit_button(), &explicit(config))
        .await?;
    session.click(&moodify::submit_button()).await?;

    session
        .wait_for_element(&moodify::error_message(), &error_wait(config))
        .await?;
    let message = session.text_of(&moodify::error_message()).await?;
    if message.contains("valid email and password") {
        Ok(ScenarioOutcome::Passed)
    } else {
        fail(format!("unexpected validation message: {message:?}"))
    }
}

/// A malformed email address is rejected client-side.
pub async fn login_invalid_email(
    session: &mut Session,
    config: &TestConfig,
) -> HarnessResult<ScenarioOutcome> {
    session.goto(&config.dashboard_url()).await?;
    session
        .wait_for_element(&moodify::email_input(), &explicit(config))
        .await?;
    fill_login_form(session, "notanemail", "somepass123").await?;

    session
        .wait_for_element(&moodify::error_message(), &error_wait(config))
        .await?;
    let message = session.text_of(&moodify::error_message()).await?;
    if message.contains("valid email") {
        Ok(ScenarioOutcome::Passed)
    } else {
        fail(format!("unexpected validation message: {message:?}"))
    }
}

/// A password under six characters is rejected client-side.
pub async fn login_short_password(
    session: &mut Session,
    config: &TestConfig,
) -> HarnessResult<ScenarioOutcome> {
    session.goto(&config.dashboard_url()).await?;
    session
        .wait_for_element(&moodify::email_input(), &explicit(config))
        .await?;
    fill_login_form(session, &config.test_email, "12345").await?;

    session
        .wait_for_element(&moodify::error_message(), &error_wait(config))
        .await?;
    let message = session.text_of(&moodify::error_message()).await?;
    if message.contains('6') {
        Ok(ScenarioOutcome::Passed)
    } else {
        fail(format!(
            "validation message does not mention the length rule: {message:?}"
        ))
    }
}

/// Valid credentials reach the dashboard.
pub async fn login_valid_credentials(
    session: &mut Session,
    config: &TestConfig,
) -> HarnessResult<ScenarioOutcome> {
    session.goto(&config.dashboard_url()).await?;
    if session.is_present(&dashboard_heading()).await? {
        return Ok(ScenarioOutcome::Skipped(
            "already authenticated".to_string(),
        ));
    }
    session
        .wait_for_element(&moodify::email_input(), &explicit(config))
        .await?;
    fill_login_form(session, &config.test_email, &config.test_password).await?;

    // The form and the dashboard share a URL, so the mood prompt heading is
    // the success signal.
    match session
        .wait_for_element(&dashboard_heading(), &explicit(config))
        .await
    {
        Ok(()) => Ok(ScenarioOutcome::Passed),
        Err(wait_err) => {
            if session.is_present(&moodify::error_message()).await? {
                let message = session.text_of(&moodify::error_message()).await?;
                fail(format!("login rejected: {message}"))
            } else {
                Err(wait_err)
            }
        }
    }
}

/// The form toggles between its login and register modes.
pub async fn login_form_toggle(
    session: &mut Session,
    config: &TestConfig,
) -> HarnessResult<ScenarioOutcome> {
    session.goto(&config.dashboard_url()).await?;
    session
        .wait_for_element(&moodify::email_input(), &explicit(config))
        .await?;

    session.click(&moodify::sign_up_toggle()).await?;
    let heading = session.text_of(&Locator::tag("h3")).await?;
    if !heading.contains("Register") {
        return fail(format!(
            "expected Register heading after toggling, got {heading:?}"
        ));
    }

    session.click(&moodify::sign_in_toggle()).await?;
    let heading = session.text_of(&Locator::tag("h3")).await?;
    if heading.contains("Log In") {
        Ok(ScenarioOutcome::Passed)
    } else {
        fail(format!(
            "expected Log In heading after toggling back, got {heading:?}"
        ))
    }
}

/// Well-formed but unknown credentials are rejected by the backend and the
/// user stays on the login form.
pub async fn invalid_credentials_rejected(
    session: &mut Session,
    config: &TestConfig,
) -> HarnessResult<ScenarioOutcome> {
    session.goto(&config.dashboard_url()).await?;
    session
        .wait_for_element(&moodify::email_input(), &explicit(config))
        .await?;
    fill_login_form(session, "nosuchuser@example.com", "wrongpass123").await?;

    session
        .wait_for_element(&moodify::error_message(), &explicit(config))
        .await?;
    let message = session.text_of(&moodify::error_message()).await?;
    if message.trim().is_empty() {
        return fail("backend rejection produced an empty error message");
    }
    if session.is_present(&dashboard_heading()).await? {
        return fail("rejected credentials still reached the dashboard");
    }
    Ok(ScenarioOutcome::Passed)
}

// ============================================================================
// Dashboard scenarios
// ============================================================================

/// The statistics grid shows its three labelled figures.
pub async fn dashboard_statistics(
    session: &mut Session,
    config: &TestConfig,
) -> HarnessResult<ScenarioOutcome> {
    ensure_logged_in(session, config).await?;
    session
        .wait_for_element(&moodify::statistics_grid(), &explicit(config))
        .await?;

    let grid = session.text_of(&moodify::statistics_grid()).await?;
    let missing: Vec<&str> = ["num days", "average mood", "time remaining"]
        .into_iter()
        .filter(|label| !grid.contains(label))
        .collect();
    if missing.is_empty() {
        Ok(ScenarioOutcome::Passed)
    } else {
        fail(format!("statistics grid missing labels: {missing:?}"))
    }
}

/// Selecting a mood survives a page reload.
pub async fn mood_selection_persistence(
    session: &mut Session,
    config: &TestConfig,
) -> HarnessResult<ScenarioOutcome> {
    ensure_logged_in(session, config).await?;
    session
        .wait_for_element(&moodify::mood_buttons(), &explicit(config))
        .await?;

    let moods = session.count(&moodify::mood_buttons()).await?;
    if moods < 4 {
        return fail(format!("expected at least 4 mood buttons, found {moods}"));
    }

    session.click(&moodify::mood_buttons()).await?;
    // The write lands via the backend with no DOM acknowledgement; give it a
    // beat before reloading.
    settle(Duration::from_millis(500)).await;
    session.refresh().await?;

    session
        .wait_for_element(&dashboard_heading(), &explicit(config))
        .await?;
    if session.is_present(&moodify::statistics_grid()).await? {
        Ok(ScenarioOutcome::Passed)
    } else {
        fail("dashboard lost its statistics after reload")
    }
}

/// Month names shown in the mood-history calendar
const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// The mood-history calendar renders at the bottom of the dashboard.
pub async fn calendar_display(
    session: &mut Session,
    config: &TestConfig,
) -> HarnessResult<ScenarioOutcome> {
    ensure_logged_in(session, config).await?;
    session
        .wait_for_element(&dashboard_heading(), &explicit(config))
        .await?;

    // The calendar sits below the fold
    session
        .execute_script("window.scrollTo(0, document.body.scrollHeight)")
        .await?;

    for month in MONTH_NAMES {
        if session.is_present(&Locator::text_contains(month)).await? {
            return Ok(ScenarioOutcome::Passed);
        }
    }
    // Some builds label the calendar numerically; fall back to the grid
    // container itself.
    if session.count(&moodify::calendar_grid()).await? > 0 {
        Ok(ScenarioOutcome::Passed)
    } else {
        fail("no calendar month text or grid found on the dashboard")
    }
}

// ============================================================================
// Navigation scenarios
// ============================================================================

/// Logging out returns to the login form.
pub async fn logout(
    session: &mut Session,
    config: &TestConfig,
) -> HarnessResult<ScenarioOutcome> {
    ensure_logged_in(session, config).await?;

    let mut logout_button = None;
    for label in ["Logout", "Log out", "Sign out"] {
        let candidate = Locator::button_text(label);
        if session.is_present(&candidate).await? {
            logout_button = Some(candidate);
            break;
        }
    }
    let Some(button) = logout_button else {
        return fail("no logout button found on the dashboard");
    };

    session.click(&button).await?;
    session
        .wait_for_element(&moodify::email_input(), &explicit(config))
        .await?;
    if session.is_present(&dashboard_heading()).await? {
        fail("dashboard still visible after logout")
    } else {
        Ok(ScenarioOutcome::Passed)
    }
}

// ============================================================================
// Registry
// ============================================================================

/// Build a [`Scenario`] registry entry from an async scenario function,
/// named after the function itself.
macro_rules! scenario {
    ($name:ident) => {{
        fn run<'a>(
            session: &'a mut $crate::session::Session,
            config: &'a $crate::config::TestConfig,
        ) -> ::std::pin::Pin<
            Box<
                dyn ::std::future::Future<
                        Output = $crate::result::HarnessResult<
                            $crate::scenario::ScenarioOutcome,
                        >,
                    > + 'a,
            >,
        > {
            Box::pin($name(session, config))
        }
        $crate::scenario::Scenario {
            name: stringify!($name),
            run,
        }
    }};
}
pub(crate) use scenario;

/// Authentication scenarios, in execution order
#[must_use]
pub fn authentication_scenarios() -> Vec<Scenario> {
    vec![
        scenario!(homepage_loads),
        scenario!(login_page_navigation),
        scenario!(login_empty_fields),
        scenario!(login_invalid_email),
        scenario!(login_short_password),
        scenario!(login_form_toggle),
        scenario!(invalid_credentials_rejected),
        scenario!(login_valid_credentials),
    ]
}

/// Dashboard scenarios, in execution order
#[must_use]
pub fn dashboard_scenarios() -> Vec<Scenario> {
    vec![
        scenario!(dashboard_statistics),
        scenario!(mood_selection_persistence),
        scenario!(calendar_display),
    ]
}

/// Navigation scenarios, in execution order
#[must_use]
pub fn navigation_scenarios() -> Vec<Scenario> {
    vec![scenario!(logout)]
}
