//! Locator abstraction for element selection.
//!
//! Each locator kind renders to a JavaScript query expression evaluated in
//! the page, so one code path serves CSS, XPath, and the text-based lookups
//! the Moodify UI needs (inputs are only addressable by placeholder, and
//! button labels live in child `<p>` tags).

use serde::{Deserialize, Serialize};

/// A selector identifying zero or more elements in the rendered page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locator {
    /// CSS selector (e.g. `input[type='password']`)
    Css(String),
    /// XPath selector
    XPath(String),
    /// Input element by its placeholder text (e.g. `Email...`)
    Placeholder(String),
    /// Button whose text content (including children) contains the string
    ButtonText(String),
    /// Any element whose text content contains the string
    TextContains(String),
    /// Element whose class attribute contains the string
    ClassContains(String),
    /// Element by tag name
    Tag(String),
}

impl Locator {
    /// Create a CSS locator
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create an XPath locator
    #[must_use]
    pub fn xpath(expr: impl Into<String>) -> Self {
        Self::XPath(expr.into())
    }

    /// Create a placeholder locator
    #[must_use]
    pub fn placeholder(text: impl Into<String>) -> Self {
        Self::Placeholder(text.into())
    }

    /// Create a button-text locator
    #[must_use]
    pub fn button_text(text: impl Into<String>) -> Self {
        Self::ButtonText(text.into())
    }

    /// Create a text-contains locator
    #[must_use]
    pub fn text_contains(text: impl Into<String>) -> Self {
        Self::TextContains(text.into())
    }

    /// Create a class-contains locator
    #[must_use]
    pub fn class_contains(class: impl Into<String>) -> Self {
        Self::ClassContains(class.into())
    }

    /// Create a tag-name locator
    #[must_use]
    pub fn tag(name: impl Into<String>) -> Self {
        Self::Tag(name.into())
    }

    /// JavaScript expression returning the first match, or null
    #[must_use]
    pub fn to_query(&self) -> String {
        match self {
            Self::Css(s) => format!("document.querySelector({s:?})"),
            Self::XPath(s) => format!(
                "document.evaluate({s:?}, document, null, XPathResult.FIRST_ORDERED_NODE_TYPE, null).singleNodeValue"
            ),
            Self::Placeholder(p) => {
                format!("document.querySelector('input[placeholder={p:?}]')")
            }
            Self::ButtonText(t) => format!(
                "(Array.from(document.querySelectorAll('button')).find(el => el.textContent.includes({t:?})) || null)"
            ),
            Self::TextContains(t) => format!(
                "(Array.from(document.querySelectorAll('*')).find(el => el.children.length === 0 && el.textContent.includes({t:?})) || null)"
            ),
            Self::ClassContains(c) => format!("document.querySelector('[class*={c:?}]')"),
            Self::Tag(name) => format!("document.querySelector({name:?})"),
        }
    }

    /// JavaScript expression returning the number of matches
    #[must_use]
    pub fn to_count_query(&self) -> String {
        match self {
            Self::Css(s) => format!("document.querySelectorAll({s:?}).length"),
            Self::XPath(s) => format!(
                "document.evaluate({s:?}, document, null, XPathResult.ORDERED_NODE_SNAPSHOT_TYPE, null).snapshotLength"
            ),
            Self::Placeholder(p) => {
                format!("document.querySelectorAll('input[placeholder={p:?}]').length")
            }
            Self::ButtonText(t) => format!(
                "Array.from(document.querySelectorAll('button')).filter(el => el.textContent.includes({t:?})).length"
            ),
            Self::TextContains(t) => format!(
                "Array.from(document.querySelectorAll('*')).filter(el => el.children.length === 0 && el.textContent.includes({t:?})).length"
            ),
            Self::ClassContains(c) => {
                format!("document.querySelectorAll('[class*={c:?}]').length")
            }
            Self::Tag(name) => format!("document.querySelectorAll({name:?}).length"),
        }
    }
}

impl std::fmt::Display for Locator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Css(s) => write!(f, "css={s}"),
            Self::XPath(s) => write!(f, "xpath={s}"),
            Self::Placeholder(p) => write!(f, "placeholder={p}"),
            Self::ButtonText(t) => write!(f, "button[text~={t}]"),
            Self::TextContains(t) => write!(f, "text~={t}"),
            Self::ClassContains(c) => write!(f, "class~={c}"),
            Self::Tag(name) => write!(f, "tag={name}"),
        }
    }
}

/// Locators for the Moodify login form and dashboard, collected in one
/// place so scenarios and the page under test stay in sync.
pub mod moodify {
    use super::Locator;

    /// Email input on the login form
    #[must_use]
    pub fn email_input() -> Locator {
        Locator::placeholder("Email...")
    }

    /// Password input on the login form
    #[must_use]
    pub fn password_input() -> Locator {
        Locator::placeholder("Password...")
    }

    /// Submit button on the login form
    #[must_use]
    pub fn submit_button() -> Locator {
        Locator::button_text("Submit")
    }

    /// Toggle from register mode back to login
    #[must_use]
    pub fn sign_in_toggle() -> Locator {
        Locator::button_text("Sign In")
    }

    /// Toggle from login mode to register
    #[must_use]
    pub fn sign_up_toggle() -> Locator {
        Locator::button_text("Sign Up")
    }

    /// Validation/auth error paragraph under the form
    #[must_use]
    pub fn error_message() -> Locator {
        Locator::class_contains("text-red")
    }

    /// Dashboard statistics grid
    #[must_use]
    pub fn statistics_grid() -> Locator {
        Locator::class_contains("grid-cols-3")
    }

    /// Mood buttons on the dashboard
    #[must_use]
    pub fn mood_buttons() -> Locator {
        Locator::class_contains("purpleShadow")
    }

    /// Dashboard mood-history calendar (seven-column grid)
    #[must_use]
    pub fn calendar_grid() -> Locator {
        Locator::class_contains("grid-cols-7")
    }
}
