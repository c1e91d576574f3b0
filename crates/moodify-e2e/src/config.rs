//! Test configuration: target URLs, timeouts, and credentials.
//!
//! All values come from the environment with sensible local-dev defaults,
//! so the suite runs against `http://localhost:3000` out of the box.

use std::time::Duration;

/// Default implicit wait applied to every element lookup (10 seconds)
pub const IMPLICIT_WAIT_MS: u64 = 10_000;

/// Default explicit wait for per-call conditions (15 seconds)
pub const EXPLICIT_WAIT_MS: u64 = 15_000;

/// Page-load timeout for navigation (30 seconds)
pub const PAGE_LOAD_TIMEOUT_MS: u64 = 30_000;

/// Configuration for a suite run
#[derive(Debug, Clone)]
pub struct TestConfig {
    /// Base URL of the application under test
    pub base_url: String,
    /// Known-good login credentials
    pub test_email: String,
    /// Password paired with `test_email`
    pub test_password: String,
    /// Credentials for registration scenarios
    pub new_user_email: String,
    /// Password paired with `new_user_email`
    pub new_user_password: String,
    /// Implicit wait in milliseconds
    pub implicit_wait_ms: u64,
    /// Explicit wait in milliseconds
    pub explicit_wait_ms: u64,
    /// Page-load timeout in milliseconds
    pub page_load_timeout_ms: u64,
    /// Run the browser headless
    pub headless: bool,
    /// Viewport width
    pub window_width: u32,
    /// Viewport height
    pub window_height: u32,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:3000".to_string(),
            test_email: "testuser@example.com".to_string(),
            test_password: "testpass123".to_string(),
            new_user_email: "newuser@example.com".to_string(),
            new_user_password: "newpass123".to_string(),
            implicit_wait_ms: IMPLICIT_WAIT_MS,
            explicit_wait_ms: EXPLICIT_WAIT_MS,
            page_load_timeout_ms: PAGE_LOAD_TIMEOUT_MS,
            headless: true,
            window_width: 1920,
            window_height: 1080,
        }
    }
}

impl TestConfig {
    /// Build configuration from process environment variables
    /// (`TEST_BASE_URL`, `TEST_EMAIL`, `TEST_PASSWORD`, `NEW_USER_EMAIL`,
    /// `NEW_USER_PASSWORD`), falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(url) = lookup("TEST_BASE_URL") {
            config.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(email) = lookup("TEST_EMAIL") {
            config.test_email = email;
        }
        if let Some(password) = lookup("TEST_PASSWORD") {
            config.test_password = password;
        }
        if let Some(email) = lookup("NEW_USER_EMAIL") {
            config.new_user_email = email;
        }
        if let Some(password) = lookup("NEW_USER_PASSWORD") {
            config.new_user_password = password;
        }
        config
    }

    /// Dashboard URL (shows the login form when unauthenticated)
    #[must_use]
    pub fn dashboard_url(&self) -> String {
        format!("{}/dashboard", self.base_url)
    }

    /// Set the base URL
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set the implicit wait
    #[must_use]
    pub const fn with_implicit_wait(mut self, ms: u64) -> Self {
        self.implicit_wait_ms = ms;
        self
    }

    /// Set the explicit wait
    #[must_use]
    pub const fn with_explicit_wait(mut self, ms: u64) -> Self {
        self.explicit_wait_ms = ms;
        self
    }

    /// Explicit wait as a Duration
    #[must_use]
    pub const fn explicit_wait(&self) -> Duration {
        Duration::from_millis(self.explicit_wait_ms)
    }

    /// Implicit wait as a Duration
    #[must_use]
    pub const fn implicit_wait(&self) -> Duration {
        Duration::from_millis(self.implicit_wait_ms)
    }
}
