//! Browser session fixture.
//!
//! A [`Session`] owns one browser for the lifetime of a scenario group:
//! launched once, navigated to a fresh page before each scenario, and torn
//! down unconditionally when the group finishes. Element lookups carry an
//! implicit wait (the element may render after the command is issued); the
//! explicit wait helpers layer on top for conditions beyond presence.
//!
//! Two implementations share the same surface: a CDP-backed session behind
//! the `browser` feature, and an in-process mock used by the unit tests.

use crate::config::{IMPLICIT_WAIT_MS, PAGE_LOAD_TIMEOUT_MS, TestConfig};
use crate::locator::Locator;
use crate::result::{HarnessError, HarnessResult};
use crate::wait::{WaitCondition, WaitOptions};

/// Default user agent, overriding the headless-Chrome default which some
/// backends reject outright.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Browser launch configuration
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Run without a visible window
    pub headless: bool,
    /// Viewport width
    pub window_width: u32,
    /// Viewport height
    pub window_height: u32,
    /// Keep the Chromium sandbox (disabled by default; the suite runs in
    /// containers where the sandbox cannot start)
    pub sandbox: bool,
    /// Suppress `navigator.webdriver` and related automation tells
    pub hide_automation: bool,
    /// User-agent override; `None` keeps the browser default
    pub user_agent: Option<String>,
    /// Implicit wait applied to element lookups, in milliseconds
    pub implicit_wait_ms: u64,
    /// Navigation timeout in milliseconds
    pub page_load_timeout_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            headless: true,
            window_width: 1920,
            window_height: 1080,
            sandbox: false,
            hide_automation: true,
            user_agent: Some(DEFAULT_USER_AGENT.to_string()),
            implicit_wait_ms: IMPLICIT_WAIT_MS,
            page_load_timeout_ms: PAGE_LOAD_TIMEOUT_MS,
        }
    }
}

impl SessionConfig {
    /// Create a configuration with defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Set the viewport size
    #[must_use]
    pub const fn with_window_size(mut self, width: u32, height: u32) -> Self {
        self.window_width = width;
        self.window_height = height;
        self
    }

    /// Set the implicit wait in milliseconds
    #[must_use]
    pub const fn with_implicit_wait(mut self, ms: u64) -> Self {
        self.implicit_wait_ms = ms;
        self
    }

    /// Set the page-load timeout in milliseconds
    #[must_use]
    pub const fn with_page_load_timeout(mut self, ms: u64) -> Self {
        self.page_load_timeout_ms = ms;
        self
    }
}

impl From<&TestConfig> for SessionConfig {
    fn from(config: &TestConfig) -> Self {
        Self {
            headless: config.headless,
            window_width: config.window_width,
            window_height: config.window_height,
            implicit_wait_ms: config.implicit_wait_ms,
            page_load_timeout_ms: config.page_load_timeout_ms,
            ..Self::default()
        }
    }
}

// ============================================================================
// CDP implementation (real browser)
// ============================================================================

#[cfg(feature = "browser")]
mod cdp {
    use super::{HarnessError, HarnessResult, Locator, SessionConfig, WaitCondition, WaitOptions};
    use crate::wait::poll_until;
    use chromiumoxide::browser::{Browser, BrowserConfig};
    use chromiumoxide::cdp::browser_protocol::network::ClearBrowserCookiesParams;
    use chromiumoxide::Page;
    use futures::StreamExt;
    use std::time::Duration;

    /// A live browser session driven over the Chrome DevTools Protocol
    pub struct Session {
        browser: Browser,
        page: Page,
        handler_task: tokio::task::JoinHandle<()>,
        config: SessionConfig,
        closed: bool,
    }

    impl Session {
        /// Launch a browser and open a blank page.
        ///
        /// # Errors
        ///
        /// `HarnessError::SessionInit` if the browser cannot start.
        pub async fn launch(config: SessionConfig) -> HarnessResult<Self> {
            let mut builder = BrowserConfig::builder()
                .window_size(config.window_width, config.window_height)
                .arg("--disable-dev-shm-usage");

            if !config.sandbox {
                builder = builder.no_sandbox();
            }
            if !config.headless {
                builder = builder.with_head();
            }
            if config.hide_automation {
                builder = builder.arg("--disable-blink-features=AutomationControlled");
            }
            if let Some(agent) = &config.user_agent {
                builder = builder.arg(format!("--user-agent={agent}"));
            }

            let browser_config = builder
                .build()
                .map_err(|message| HarnessError::SessionInit { message })?;

            let (browser, mut handler) =
                Browser::launch(browser_config)
                    .await
                    .map_err(|e| HarnessError::SessionInit {
                        message: e.to_string(),
                    })?;

            // Drive CDP events until the browser goes away
            let handler_task = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if event.is_err() {
                        break;
                    }
                }
            });

            let page = browser.new_page("about:blank").await.map_err(|e| {
                HarnessError::SessionInit {
                    message: e.to_string(),
                }
            })?;

            tracing::debug!(
                headless = config.headless,
                width = config.window_width,
                height = config.window_height,
                "browser session started"
            );

            Ok(Self {
                browser,
                page,
                handler_task,
                config,
                closed: false,
            })
        }

        const fn ensure_open(&self) -> HarnessResult<()> {
            if self.closed {
                return Err(HarnessError::SessionClosed);
            }
            Ok(())
        }

        async fn eval(&self, js: String) -> HarnessResult<serde_json::Value> {
            self.ensure_open()?;
            let result = self
                .page
                .evaluate(js)
                .await
                .map_err(|e| HarnessError::Script {
                    message: e.to_string(),
                })?;
            Ok(result.value().cloned().unwrap_or(serde_json::Value::Null))
        }

        /// Navigate to a URL, bounded by the page-load timeout.
        ///
        /// # Errors
        ///
        /// `HarnessError::Navigation` on failure or page-load timeout.
        pub async fn goto(&mut self, url: &str) -> HarnessResult<()> {
            self.ensure_open()?;
            tracing::debug!(url, "navigating");
            let deadline = Duration::from_millis(self.config.page_load_timeout_ms);
            match tokio::time::timeout(deadline, self.page.goto(url)).await {
                Ok(Ok(_)) => Ok(()),
                Ok(Err(e)) => Err(HarnessError::Navigation {
                    url: url.to_string(),
                    message: e.to_string(),
                }),
                Err(_) => Err(HarnessError::Navigation {
                    url: url.to_string(),
                    message: format!("page load exceeded {}ms", self.config.page_load_timeout_ms),
                }),
            }
        }

        /// Reload the current page.
        pub async fn refresh(&mut self) -> HarnessResult<()> {
            self.eval("window.location.reload()".to_string()).await?;
            Ok(())
        }

        /// Current navigation URL.
        pub async fn current_url(&self) -> HarnessResult<String> {
            let value = self.eval("window.location.href".to_string()).await?;
            value
                .as_str()
                .map(ToString::to_string)
                .ok_or_else(|| HarnessError::Script {
                    message: "location.href did not evaluate to a string".to_string(),
                })
        }

        /// Current document title.
        pub async fn title(&self) -> HarnessResult<String> {
            let value = self.eval("document.title".to_string()).await?;
            Ok(value.as_str().unwrap_or_default().to_string())
        }

        /// Whether any element matches right now (no implicit wait).
        pub async fn is_present(&self, locator: &Locator) -> HarnessResult<bool> {
            let js = format!("({}) !== null", locator.to_query());
            Ok(self.eval(js).await?.as_bool().unwrap_or(false))
        }

        /// Number of elements matching right now (no implicit wait).
        pub async fn count(&self, locator: &Locator) -> HarnessResult<usize> {
            let value = self.eval(locator.to_count_query()).await?;
            Ok(value.as_u64().unwrap_or(0) as usize)
        }

        async fn is_clickable_now(&self, locator: &Locator) -> HarnessResult<bool> {
            let js = format!(
                "(() => {{ const el = {}; if (!el) return false; \
                 if (el.disabled) return false; \
                 const r = el.getBoundingClientRect(); \
                 return r.width > 0 && r.height > 0; }})()",
                locator.to_query()
            );
            Ok(self.eval(js).await?.as_bool().unwrap_or(false))
        }

        /// Text content of the first matching element, with the implicit
        /// wait applied.
        ///
        /// # Errors
        ///
        /// `HarnessError::NoSuchElement` if nothing matches within the
        /// implicit wait.
        pub async fn text_of(&self, locator: &Locator) -> HarnessResult<String> {
            self.await_presence(locator).await?;
            let js = format!(
                "(() => {{ const el = {}; return el ? el.textContent : null; }})()",
                locator.to_query()
            );
            let value = self.eval(js).await?;
            value
                .as_str()
                .map(|s| s.trim().to_string())
                .ok_or_else(|| HarnessError::NoSuchElement {
                    locator: locator.to_string(),
                })
        }

        /// Click the first matching element, with the implicit wait applied.
        ///
        /// # Errors
        ///
        /// `HarnessError::NoSuchElement` if nothing matches within the
        /// implicit wait; `HarnessError::NotInteractable` if an element
        /// matches but never becomes visible and enabled.
        pub async fn click(&mut self, locator: &Locator) -> HarnessResult<()> {
            self.await_clickable(locator).await?;
            tracing::debug!(%locator, "click");
            let js = format!(
                "(() => {{ const el = {}; if (!el) return false; el.click(); return true; }})()",
                locator.to_query()
            );
            if self.eval(js).await?.as_bool().unwrap_or(false) {
                Ok(())
            } else {
                Err(HarnessError::NoSuchElement {
                    locator: locator.to_string(),
                })
            }
        }

        /// Type into the first matching input, with the implicit wait
        /// applied. Uses the native value setter and fires an `input` event
        /// so React-controlled inputs observe the change.
        pub async fn type_text(&mut self, locator: &Locator, text: &str) -> HarnessResult<()> {
            self.await_presence(locator).await?;
            let js = format!(
                "(() => {{ const el = {}; if (!el) return false; \
                 const setter = Object.getOwnPropertyDescriptor(\
                     window.HTMLInputElement.prototype, 'value').set; \
                 setter.call(el, {text:?}); \
                 el.dispatchEvent(new Event('input', {{ bubbles: true }})); \
                 return true; }})()",
                locator.to_query()
            );
            if self.eval(js).await?.as_bool().unwrap_or(false) {
                Ok(())
            } else {
                Err(HarnessError::NoSuchElement {
                    locator: locator.to_string(),
                })
            }
        }

        /// Delete all browser cookies. Safe to call when none exist.
        pub async fn clear_cookies(&mut self) -> HarnessResult<()> {
            self.ensure_open()?;
            self.page
                .execute(ClearBrowserCookiesParams::default())
                .await
                .map_err(|e| HarnessError::Script {
                    message: e.to_string(),
                })?;
            Ok(())
        }

        /// Clear `localStorage` for the current origin. Safe when empty.
        pub async fn clear_local_storage(&mut self) -> HarnessResult<()> {
            self.eval("window.localStorage.clear()".to_string()).await?;
            Ok(())
        }

        /// Evaluate an arbitrary script and return its JSON value.
        pub async fn execute_script(&self, js: &str) -> HarnessResult<serde_json::Value> {
            self.eval(js.to_string()).await
        }

        async fn await_presence(&self, locator: &Locator) -> HarnessResult<()> {
            let options = WaitOptions::new().with_timeout(self.config.implicit_wait_ms);
            let condition = WaitCondition::ElementPresent(locator.clone());
            let description = condition.to_string();
            let result = poll_until(&options, &description, || async move {
                self.is_present(locator).await
            })
            .await;
            match result {
                Ok(_) => Ok(()),
                Err(HarnessError::Timeout { .. }) => Err(HarnessError::NoSuchElement {
                    locator: locator.to_string(),
                }),
                Err(e) => Err(e),
            }
        }

        async fn await_clickable(&self, locator: &Locator) -> HarnessResult<()> {
            let options = WaitOptions::new().with_timeout(self.config.implicit_wait_ms);
            let condition = WaitCondition::ElementClickable(locator.clone());
            let description = condition.to_string();
            let result = poll_until(&options, &description, || async move {
                self.is_clickable_now(locator).await
            })
            .await;
            match result {
                Ok(_) => Ok(()),
                Err(HarnessError::Timeout { .. }) => {
                    if self.is_present(locator).await? {
                        Err(HarnessError::NotInteractable {
                            locator: locator.to_string(),
                        })
                    } else {
                        Err(HarnessError::NoSuchElement {
                            locator: locator.to_string(),
                        })
                    }
                }
                Err(e) => Err(e),
            }
        }

        /// Wait until an element matching the locator exists.
        ///
        /// # Errors
        ///
        /// `HarnessError::Timeout` if the condition never becomes true.
        pub async fn wait_for_element(
            &self,
            locator: &Locator,
            options: &WaitOptions,
        ) -> HarnessResult<()> {
            let description = WaitCondition::ElementPresent(locator.clone()).to_string();
            poll_until(options, &description, || async move {
                self.is_present(locator).await
            })
            .await?;
            Ok(())
        }

        /// Wait until an element matching the locator is visible and enabled.
        pub async fn wait_for_clickable(
            &self,
            locator: &Locator,
            options: &WaitOptions,
        ) -> HarnessResult<()> {
            let description = WaitCondition::ElementClickable(locator.clone()).to_string();
            poll_until(options, &description, || async move {
                self.is_clickable_now(locator).await
            })
            .await?;
            Ok(())
        }

        /// Wait until the URL differs from `baseline`.
        pub async fn wait_for_url_change(
            &self,
            baseline: &str,
            options: &WaitOptions,
        ) -> HarnessResult<()> {
            let description = WaitCondition::UrlChanged(baseline.to_string()).to_string();
            poll_until(options, &description, || async move {
                Ok(self.current_url().await? != baseline)
            })
            .await?;
            Ok(())
        }

        /// Wait until the URL contains `part`.
        pub async fn wait_for_url_contains(
            &self,
            part: &str,
            options: &WaitOptions,
        ) -> HarnessResult<()> {
            let description = WaitCondition::UrlContains(part.to_string()).to_string();
            poll_until(options, &description, || async move {
                Ok(self.current_url().await?.contains(part))
            })
            .await?;
            Ok(())
        }

        /// Tear the session down. Idempotent; every other command fails
        /// with `SessionClosed` afterwards.
        pub async fn close(&mut self) -> HarnessResult<()> {
            if self.closed {
                return Ok(());
            }
            self.closed = true;
            let _ = self.browser.close().await;
            let _ = self.browser.wait().await;
            self.handler_task.abort();
            tracing::debug!("browser session closed");
            Ok(())
        }
    }
}

// ============================================================================
// Mock implementation (unit tests, no browser required)
// ============================================================================

#[cfg(not(feature = "browser"))]
mod mock {
    use super::{HarnessError, HarnessResult, Locator, SessionConfig, WaitCondition, WaitOptions};
    use crate::wait::poll_until;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// An element in the mocked DOM
    #[derive(Debug, Clone)]
    pub struct MockElement {
        /// Tag name (lowercase)
        pub tag: String,
        /// Placeholder attribute, for inputs
        pub placeholder: Option<String>,
        /// Class attribute
        pub class: String,
        /// Text content (descendants flattened)
        pub text: String,
        /// Current input value
        pub value: String,
        /// Rendered with nonzero size
        pub visible: bool,
        /// Not disabled
        pub enabled: bool,
        /// Raw selector this element answers to, for CSS/XPath lookups
        pub selector: Option<String>,
    }

    impl MockElement {
        /// Create a visible, enabled element with the given tag
        #[must_use]
        pub fn new(tag: impl Into<String>) -> Self {
            Self {
                tag: tag.into(),
                placeholder: None,
                class: String::new(),
                text: String::new(),
                value: String::new(),
                visible: true,
                enabled: true,
                selector: None,
            }
        }

        /// Set the placeholder attribute
        #[must_use]
        pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
            self.placeholder = Some(placeholder.into());
            self
        }

        /// Set the class attribute
        #[must_use]
        pub fn with_class(mut self, class: impl Into<String>) -> Self {
            self.class = class.into();
            self
        }

        /// Set the text content
        #[must_use]
        pub fn with_text(mut self, text: impl Into<String>) -> Self {
            self.text = text.into();
            self
        }

        /// Set the raw selector this element answers to
        #[must_use]
        pub fn with_selector(mut self, selector: impl Into<String>) -> Self {
            self.selector = Some(selector.into());
            self
        }

        /// Mark the element hidden
        #[must_use]
        pub const fn hidden(mut self) -> Self {
            self.visible = false;
            self
        }

        /// Mark the element disabled
        #[must_use]
        pub const fn disabled(mut self) -> Self {
            self.enabled = false;
            self
        }

        fn matches(&self, locator: &Locator) -> bool {
            match locator {
                Locator::Css(s) | Locator::XPath(s) => {
                    self.selector.as_deref() == Some(s.as_str())
                }
                Locator::Placeholder(p) => {
                    self.tag == "input" && self.placeholder.as_deref() == Some(p.as_str())
                }
                Locator::ButtonText(t) => self.tag == "button" && self.text.contains(t),
                Locator::TextContains(t) => self.text.contains(t),
                Locator::ClassContains(c) => self.class.contains(c),
                Locator::Tag(name) => &self.tag == name,
            }
        }
    }

    /// A page the mock can navigate to
    #[derive(Debug, Clone, Default)]
    pub struct MockPage {
        /// Document title
        pub title: String,
        /// Elements rendered on the page
        pub elements: Vec<MockElement>,
    }

    /// Scripted consequence of clicking a button
    #[derive(Debug, Clone, Default)]
    pub struct ClickEffect {
        /// Applies to buttons whose text contains this string
        pub button_text: String,
        /// Elements added to the page
        pub add: Vec<MockElement>,
        /// New URL after the click (loads the matching route if registered)
        pub set_url: Option<String>,
    }

    #[derive(Debug, Default)]
    struct MockState {
        url: String,
        title: String,
        elements: Vec<MockElement>,
        routes: HashMap<String, MockPage>,
        click_effects: Vec<ClickEffect>,
        local_storage: HashMap<String, String>,
        cookies: HashMap<String, String>,
        script_results: HashMap<String, serde_json::Value>,
    }

    impl MockState {
        fn find(&self, locator: &Locator) -> Option<&MockElement> {
            self.elements.iter().find(|el| el.matches(locator))
        }

        fn find_mut(&mut self, locator: &Locator) -> Option<&mut MockElement> {
            self.elements.iter_mut().find(|el| el.matches(locator))
        }

        fn count(&self, locator: &Locator) -> usize {
            self.elements.iter().filter(|el| el.matches(locator)).count()
        }

        fn load_route(&mut self, url: &str) {
            self.url = url.to_string();
            if let Some(page) = self.routes.get(url).cloned() {
                self.title = page.title;
                self.elements = page.elements;
            }
        }
    }

    /// Handle for tests to script and inspect the mocked browser
    #[derive(Clone)]
    pub struct MockHandle {
        state: Arc<Mutex<MockState>>,
    }

    impl MockHandle {
        fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
            self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
        }

        /// Register a navigable page
        pub fn add_route(&self, url: impl Into<String>, page: MockPage) {
            self.lock().routes.insert(url.into(), page);
        }

        /// Add an element to the current page
        pub fn add_element(&self, element: MockElement) {
            self.lock().elements.push(element);
        }

        /// Script a click consequence
        pub fn add_click_effect(&self, effect: ClickEffect) {
            self.lock().click_effects.push(effect);
        }

        /// Overwrite the current URL without navigation side effects
        pub fn set_url(&self, url: impl Into<String>) {
            self.lock().url = url.into();
        }

        /// Set the document title
        pub fn set_title(&self, title: impl Into<String>) {
            self.lock().title = title.into();
        }

        /// Seed a cookie
        pub fn set_cookie(&self, name: impl Into<String>, value: impl Into<String>) {
            self.lock().cookies.insert(name.into(), value.into());
        }

        /// Seed a `localStorage` entry
        pub fn set_local_storage(&self, key: impl Into<String>, value: impl Into<String>) {
            self.lock().local_storage.insert(key.into(), value.into());
        }

        /// Canned result for `execute_script`
        pub fn set_script_result(&self, js: impl Into<String>, value: serde_json::Value) {
            self.lock().script_results.insert(js.into(), value);
        }

        /// Number of cookies currently stored
        #[must_use]
        pub fn cookie_count(&self) -> usize {
            self.lock().cookies.len()
        }

        /// Number of `localStorage` entries currently stored
        #[must_use]
        pub fn local_storage_count(&self) -> usize {
            self.lock().local_storage.len()
        }

        /// Current value of the first input matching the locator
        #[must_use]
        pub fn input_value(&self, locator: &Locator) -> Option<String> {
            self.lock().find(locator).map(|el| el.value.clone())
        }
    }

    /// In-process stand-in for a browser session
    pub struct Session {
        state: Arc<Mutex<MockState>>,
        config: SessionConfig,
        closed: bool,
    }

    impl Session {
        /// Start a mock session with an empty page.
        pub async fn launch(config: SessionConfig) -> HarnessResult<Self> {
            tracing::debug!(headless = config.headless, "mock session started");
            Ok(Self {
                state: Arc::new(Mutex::new(MockState::default())),
                config,
                closed: false,
            })
        }

        /// Handle for scripting this session from a test
        #[must_use]
        pub fn handle(&self) -> MockHandle {
            MockHandle {
                state: Arc::clone(&self.state),
            }
        }

        const fn ensure_open(&self) -> HarnessResult<()> {
            if self.closed {
                return Err(HarnessError::SessionClosed);
            }
            Ok(())
        }

        fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
            self.state.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
        }

        /// Navigate to a URL, installing the registered route if any.
        pub async fn goto(&mut self, url: &str) -> HarnessResult<()> {
            self.ensure_open()?;
            self.lock().load_route(url);
            Ok(())
        }

        /// Reload the current page from its route.
        pub async fn refresh(&mut self) -> HarnessResult<()> {
            self.ensure_open()?;
            let url = self.lock().url.clone();
            self.lock().load_route(&url);
            Ok(())
        }

        /// Current navigation URL.
        pub async fn current_url(&self) -> HarnessResult<String> {
            self.ensure_open()?;
            Ok(self.lock().url.clone())
        }

        /// Current document title.
        pub async fn title(&self) -> HarnessResult<String> {
            self.ensure_open()?;
            Ok(self.lock().title.clone())
        }

        /// Whether any element matches right now (no implicit wait).
        pub async fn is_present(&self, locator: &Locator) -> HarnessResult<bool> {
            self.ensure_open()?;
            Ok(self.lock().find(locator).is_some())
        }

        /// Number of elements matching right now (no implicit wait).
        pub async fn count(&self, locator: &Locator) -> HarnessResult<usize> {
            self.ensure_open()?;
            Ok(self.lock().count(locator))
        }

        fn is_clickable_now(&self, locator: &Locator) -> bool {
            self.lock()
                .elements
                .iter()
                .any(|el| el.matches(locator) && el.visible && el.enabled)
        }

        /// Text content of the first matching element, with the implicit
        /// wait applied.
        pub async fn text_of(&self, locator: &Locator) -> HarnessResult<String> {
            self.await_presence(locator).await?;
            self.lock()
                .find(locator)
                .map(|el| el.text.trim().to_string())
                .ok_or_else(|| HarnessError::NoSuchElement {
                    locator: locator.to_string(),
                })
        }

        /// Click the first matching element, with the implicit wait applied.
        /// Applies any scripted click effects whose button text matches.
        pub async fn click(&mut self, locator: &Locator) -> HarnessResult<()> {
            self.await_clickable(locator).await?;
            tracing::debug!(%locator, "click");
            let mut state = self.lock();
            let clicked_text = match state.find(locator) {
                Some(el) => el.text.clone(),
                None => {
                    return Err(HarnessError::NoSuchElement {
                        locator: locator.to_string(),
                    })
                }
            };
            let effects: Vec<ClickEffect> = state
                .click_effects
                .iter()
                .filter(|e| !e.button_text.is_empty() && clicked_text.contains(&e.button_text))
                .cloned()
                .collect();
            for effect in effects {
                state.elements.extend(effect.add);
                if let Some(url) = effect.set_url {
                    state.load_route(&url);
                }
            }
            Ok(())
        }

        /// Type into the first matching input, with the implicit wait
        /// applied.
        pub async fn type_text(&mut self, locator: &Locator, text: &str) -> HarnessResult<()> {
            self.await_presence(locator).await?;
            let mut state = self.lock();
            match state.find_mut(locator) {
                Some(el) => {
                    el.value = text.to_string();
                    Ok(())
                }
                None => Err(HarnessError::NoSuchElement {
                    locator: locator.to_string(),
                }),
            }
        }

        /// Delete all cookies. Safe to call when none exist.
        pub async fn clear_cookies(&mut self) -> HarnessResult<()> {
            self.ensure_open()?;
            self.lock().cookies.clear();
            Ok(())
        }

        /// Clear `localStorage`. Safe when empty.
        pub async fn clear_local_storage(&mut self) -> HarnessResult<()> {
            self.ensure_open()?;
            self.lock().local_storage.clear();
            Ok(())
        }

        /// Return the canned result registered for `js`, or `Null`.
        pub async fn execute_script(&self, js: &str) -> HarnessResult<serde_json::Value> {
            self.ensure_open()?;
            Ok(self
                .lock()
                .script_results
                .get(js)
                .cloned()
                .unwrap_or(serde_json::Value::Null))
        }

        async fn await_presence(&self, locator: &Locator) -> HarnessResult<()> {
            let options = WaitOptions::new().with_timeout(self.config.implicit_wait_ms);
            let description = WaitCondition::ElementPresent(locator.clone()).to_string();
            let result = poll_until(&options, &description, || async move {
                self.is_present(locator).await
            })
            .await;
            match result {
                Ok(_) => Ok(()),
                Err(HarnessError::Timeout { .. }) => Err(HarnessError::NoSuchElement {
                    locator: locator.to_string(),
                }),
                Err(e) => Err(e),
            }
        }

        async fn await_clickable(&self, locator: &Locator) -> HarnessResult<()> {
            let options = WaitOptions::new().with_timeout(self.config.implicit_wait_ms);
            let description = WaitCondition::ElementClickable(locator.clone()).to_string();
            let result = poll_until(&options, &description, || async move {
                self.ensure_open()?;
                Ok(self.is_clickable_now(locator))
            })
            .await;
            match result {
                Ok(_) => Ok(()),
                Err(HarnessError::Timeout { .. }) => {
                    if self.is_present(locator).await? {
                        Err(HarnessError::NotInteractable {
                            locator: locator.to_string(),
                        })
                    } else {
                        Err(HarnessError::NoSuchElement {
                            locator: locator.to_string(),
                        })
                    }
                }
                Err(e) => Err(e),
            }
        }

        /// Wait until an element matching the locator exists.
        pub async fn wait_for_element(
            &self,
            locator: &Locator,
            options: &WaitOptions,
        ) -> HarnessResult<()> {
            let description = WaitCondition::ElementPresent(locator.clone()).to_string();
            poll_until(options, &description, || async move {
                self.is_present(locator).await
            })
            .await?;
            Ok(())
        }

        /// Wait until an element matching the locator is visible and enabled.
        pub async fn wait_for_clickable(
            &self,
            locator: &Locator,
            options: &WaitOptions,
        ) -> HarnessResult<()> {
            let description = WaitCondition::ElementClickable(locator.clone()).to_string();
            poll_until(options, &description, || async move {
                self.ensure_open()?;
                Ok(self.is_clickable_now(locator))
            })
            .await?;
            Ok(())
        }

        /// Wait until the URL differs from `baseline`.
        pub async fn wait_for_url_change(
            &self,
            baseline: &str,
            options: &WaitOptions,
        ) -> HarnessResult<()> {
            let description = WaitCondition::UrlChanged(baseline.to_string()).to_string();
            poll_until(options, &description, || async move {
                Ok(self.current_url().await? != baseline)
            })
            .await?;
            Ok(())
        }

        /// Wait until the URL contains `part`.
        pub async fn wait_for_url_contains(
            &self,
            part: &str,
            options: &WaitOptions,
        ) -> HarnessResult<()> {
            let description = WaitCondition::UrlContains(part.to_string()).to_string();
            poll_until(options, &description, || async move {
                Ok(self.current_url().await?.contains(part))
            })
            .await?;
            Ok(())
        }

        /// Tear the session down. Idempotent; every other command fails
        /// with `SessionClosed` afterwards.
        pub async fn close(&mut self) -> HarnessResult<()> {
            self.closed = true;
            tracing::debug!("mock session closed");
            Ok(())
        }
    }
}

#[cfg(feature = "browser")]
pub use cdp::Session;

#[cfg(not(feature = "browser"))]
pub use mock::{ClickEffect, MockElement, MockHandle, MockPage, Session};

#[cfg(all(test, not(feature = "browser")))]
mod tests {
    use super::*;
    use crate::locator::moodify;

    fn fast_config() -> SessionConfig {
        SessionConfig::new().with_implicit_wait(200)
    }

    fn login_page() -> MockPage {
        MockPage {
            title: "Moodify".to_string(),
            elements: vec![
                MockElement::new("h3").with_text("Log In"),
                MockElement::new("input").with_placeholder("Email..."),
                MockElement::new("input")
                    .with_placeholder("Password...")
                    .with_selector("input[type='password']"),
                MockElement::new("button").with_text("Submit"),
            ],
        }
    }

    mod lifecycle_tests {
        use super::*;

        #[tokio::test]
        async fn test_commands_fail_after_close() {
            let mut session = Session::launch(fast_config()).await.unwrap();
            session.close().await.unwrap();

            let err = session.goto("http://localhost:3000").await.unwrap_err();
            assert!(matches!(err, HarnessError::SessionClosed));
            let err = session.current_url().await.unwrap_err();
            assert!(matches!(err, HarnessError::SessionClosed));
        }

        #[tokio::test]
        async fn test_close_is_idempotent() {
            let mut session = Session::launch(fast_config()).await.unwrap();
            session.close().await.unwrap();
            session.close().await.unwrap();
        }
    }

    mod navigation_tests {
        use super::*;

        #[tokio::test]
        async fn test_goto_installs_route() {
            let mut session = Session::launch(fast_config()).await.unwrap();
            session
                .handle()
                .add_route("http://localhost:3000/dashboard", login_page());

            session.goto("http://localhost:3000/dashboard").await.unwrap();
            assert_eq!(
                session.current_url().await.unwrap(),
                "http://localhost:3000/dashboard"
            );
            assert_eq!(session.title().await.unwrap(), "Moodify");
            assert!(session.is_present(&moodify::email_input()).await.unwrap());
        }

        #[tokio::test]
        async fn test_refresh_restores_route() {
            let mut session = Session::launch(fast_config()).await.unwrap();
            let handle = session.handle();
            handle.add_route("http://localhost:3000/dashboard", login_page());
            session.goto("http://localhost:3000/dashboard").await.unwrap();

            // Mutate the live page, then reload
            handle.add_element(MockElement::new("p").with_class("text-red-500"));
            assert!(session.is_present(&moodify::error_message()).await.unwrap());
            session.refresh().await.unwrap();
            assert!(!session.is_present(&moodify::error_message()).await.unwrap());
        }
    }

    mod lookup_tests {
        use super::*;
        use crate::locator::Locator;

        #[tokio::test]
        async fn test_implicit_wait_catches_late_element() {
            let session = Session::launch(
                SessionConfig::new().with_implicit_wait(2000),
            )
            .await
            .unwrap();
            let handle = session.handle();

            tokio::spawn({
                let handle = handle.clone();
                async move {
                    tokio::time::sleep(std::time::Duration::from_millis(80)).await;
                    handle.add_element(
                        MockElement::new("p")
                            .with_class("text-red-500")
                            .with_text("Invalid email or password. Please try again."),
                    );
                }
            });

            let text = session.text_of(&moodify::error_message()).await.unwrap();
            assert!(text.contains("Invalid email or password"));
        }

        #[tokio::test]
        async fn test_missing_element_is_no_such_element() {
            let session = Session::launch(fast_config()).await.unwrap();
            let err = session.text_of(&Locator::tag("h1")).await.unwrap_err();
            assert!(matches!(err, HarnessError::NoSuchElement { .. }));
        }

        #[tokio::test]
        async fn test_count_matches_multiple() {
            let session = Session::launch(fast_config()).await.unwrap();
            let handle = session.handle();
            for _ in 0..5 {
                handle.add_element(MockElement::new("button").with_class("purpleShadow"));
            }
            assert_eq!(session.count(&moodify::mood_buttons()).await.unwrap(), 5);
        }
    }

    mod interaction_tests {
        use super::*;

        #[tokio::test]
        async fn test_type_text_sets_value() {
            let mut session = Session::launch(fast_config()).await.unwrap();
            let handle = session.handle();
            handle.add_element(MockElement::new("input").with_placeholder("Email..."));

            session
                .type_text(&moodify::email_input(), "testuser@example.com")
                .await
                .unwrap();
            assert_eq!(
                handle.input_value(&moodify::email_input()).as_deref(),
                Some("testuser@example.com")
            );
        }

        #[tokio::test]
        async fn test_click_disabled_button_not_interactable() {
            let mut session = Session::launch(fast_config()).await.unwrap();
            session
                .handle()
                .add_element(MockElement::new("button").with_text("Submit").disabled());

            let err = session.click(&moodify::submit_button()).await.unwrap_err();
            assert!(matches!(err, HarnessError::NotInteractable { .. }));
        }

        #[tokio::test]
        async fn test_click_effect_navigates() {
            let mut session = Session::launch(fast_config()).await.unwrap();
            let handle = session.handle();
            handle.add_route(
                "http://localhost:3000/dashboard",
                MockPage {
                    title: "Moodify".to_string(),
                    elements: vec![MockElement::new("h1").with_text("How do you feel today?")],
                },
            );
            handle.add_element(MockElement::new("button").with_text("Submit"));
            handle.add_click_effect(ClickEffect {
                button_text: "Submit".to_string(),
                set_url: Some("http://localhost:3000/dashboard".to_string()),
                ..ClickEffect::default()
            });

            session.click(&moodify::submit_button()).await.unwrap();
            assert!(session
                .current_url()
                .await
                .unwrap()
                .contains("dashboard"));
        }
    }

    mod storage_tests {
        use super::*;

        #[tokio::test]
        async fn test_clearing_is_idempotent() {
            let mut session = Session::launch(fast_config()).await.unwrap();
            let handle = session.handle();
            handle.set_cookie("session", "abc123");
            handle.set_local_storage("token", "jwt");

            session.clear_cookies().await.unwrap();
            session.clear_local_storage().await.unwrap();
            assert_eq!(handle.cookie_count(), 0);
            assert_eq!(handle.local_storage_count(), 0);

            // Clearing an already-empty store succeeds
            session.clear_cookies().await.unwrap();
            session.clear_local_storage().await.unwrap();
        }
    }

    mod wait_tests {
        use super::*;

        #[tokio::test]
        async fn test_wait_for_url_contains() {
            let session = Session::launch(fast_config()).await.unwrap();
            let handle = session.handle();
            handle.set_url("http://localhost:3000");

            tokio::spawn({
                let handle = handle.clone();
                async move {
                    tokio::time::sleep(std::time::Duration::from_millis(60)).await;
                    handle.set_url("http://localhost:3000/dashboard");
                }
            });

            session
                .wait_for_url_contains(
                    "dashboard",
                    &WaitOptions::new().with_timeout(2000).with_poll_interval(10),
                )
                .await
                .unwrap();
        }

        #[tokio::test]
        async fn test_wait_for_url_change_times_out() {
            let session = Session::launch(fast_config()).await.unwrap();
            session.handle().set_url("http://localhost:3000");

            let err = session
                .wait_for_url_change(
                    "http://localhost:3000",
                    &WaitOptions::new().with_timeout(80).with_poll_interval(10),
                )
                .await
                .unwrap_err();
            assert!(matches!(err, HarnessError::Timeout { .. }));
        }

        #[tokio::test]
        async fn test_wait_for_clickable_after_enable() {
            let session = Session::launch(fast_config()).await.unwrap();
            let handle = session.handle();
            handle.add_element(MockElement::new("button").with_text("Submit").hidden());

            tokio::spawn({
                let handle = handle.clone();
                async move {
                    tokio::time::sleep(std::time::Duration::from_millis(60)).await;
                    handle.add_element(MockElement::new("button").with_text("Submit"));
                }
            });

            session
                .wait_for_clickable(
                    &moodify::submit_button(),
                    &WaitOptions::new().with_timeout(2000).with_poll_interval(10),
                )
                .await
                .unwrap();
        }
    }
}
