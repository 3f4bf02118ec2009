//! The page capability the validators consume.
//!
//! Validators only see [`PageSession`] and [`PageElement`], so they run the same against a
//! live Chrome tab ([`ChromePage`]) and against in-memory fakes in tests.

use crate::error::{AuditError, Result};
use headless_chrome::{Element, Tab};
use serde_json::{Value, json};
use std::{sync::Arc, time::Duration};

/// A handle to one element on the current page
pub trait PageElement {
    /// Rendered text of the element
    fn text(&self) -> Result<String>;

    /// Attribute value, `None` when the attribute is absent.
    ///
    /// URL-valued attributes (`href`, `src`) come back resolved against the page.
    fn attribute(&self, name: &str) -> Result<Option<String>>;

    /// Distance in CSS pixels from the top of the document
    fn vertical_position(&self) -> Result<f64>;

    /// Dispatch a click from script, bypassing overlays that would intercept a pointer click
    fn script_click(&self) -> Result<()>;

    /// Descendants matching a CSS selector, in document order
    fn find_all(&self, selector: &str) -> Result<Vec<Self>>
    where
        Self: Sized;
}

/// A navigable page that hands out element handles
pub trait PageSession {
    type Element<'a>: PageElement
    where
        Self: 'a;

    /// Load `url` and wait for the navigation to settle
    fn navigate(&self, url: &str) -> Result<()>;

    /// All elements matching a CSS selector, in document order; empty when nothing matches
    fn find_elements(&self, selector: &str) -> Result<Vec<Self::Element<'_>>>;

    /// Block until an element matching `selector` exists, failing after `timeout`
    fn wait_for_element(&self, selector: &str, timeout: Duration) -> Result<Self::Element<'_>>;

    /// Evaluate a script expression and return its JSON-serialized value (`Null` for undefined)
    fn evaluate_json(&self, expression: &str) -> Result<Value>;
}

const TEXT_JS: &str = "function() { return this.innerText ?? this.textContent ?? ''; }";

const ATTRIBUTE_JS: &str = r#"
    function(name) {
        if (!this.hasAttribute(name)) {
            return null;
        }
        const prop = this[name];
        return typeof prop === 'string' ? prop : this.getAttribute(name);
    }
"#;

const POSITION_JS: &str = "function() { return this.getBoundingClientRect().top + window.scrollY; }";

const CLICK_JS: &str = "function() { this.click(); return true; }";

const COUNT_JS: &str = "function(selector) { return this.querySelectorAll(selector).length; }";

/// [`PageSession`] over a headless_chrome tab
#[derive(Clone)]
pub struct ChromePage {
    tab: Arc<Tab>,
}

impl ChromePage {
    pub fn new(tab: Arc<Tab>) -> Self {
        Self { tab }
    }

    pub fn tab(&self) -> &Arc<Tab> {
        &self.tab
    }

    fn count(&self, selector: &str) -> Result<u64> {
        let expression = format!("document.querySelectorAll({}).length", serde_json::to_string(selector)?);
        let result = self
            .tab
            .evaluate(&expression, false)
            .map_err(|e| AuditError::EvaluationFailed(format!("Failed to query '{}': {}", selector, e)))?;

        Ok(result.value.and_then(|v| v.as_u64()).unwrap_or(0))
    }
}

impl PageSession for ChromePage {
    type Element<'a> = ChromeElement<'a>;

    fn navigate(&self, url: &str) -> Result<()> {
        self.tab
            .navigate_to(url)
            .and_then(|tab| tab.wait_until_navigated())
            .map_err(|e| AuditError::NavigationFailed(format!("Failed to navigate to {}: {}", url, e)))?;

        log::debug!("Navigated to {}", url);
        Ok(())
    }

    fn find_elements(&self, selector: &str) -> Result<Vec<ChromeElement<'_>>> {
        // headless_chrome reports an empty match as an error
        if self.count(selector)? == 0 {
            return Ok(Vec::new());
        }

        let elements = self
            .tab
            .find_elements(selector)
            .map_err(|e| AuditError::ElementNotFound(format!("Elements '{}' not found: {}", selector, e)))?;

        Ok(elements.into_iter().map(ChromeElement::new).collect())
    }

    fn wait_for_element(&self, selector: &str, timeout: Duration) -> Result<ChromeElement<'_>> {
        self.tab
            .wait_for_element_with_custom_timeout(selector, timeout)
            .map(ChromeElement::new)
            .map_err(|e| {
                log::debug!("Wait for '{}' ended with: {}", selector, e);
                AuditError::ElementTimeout { selector: selector.to_string(), timeout_ms: timeout.as_millis() }
            })
    }

    fn evaluate_json(&self, expression: &str) -> Result<Value> {
        let wrapped = format!("JSON.stringify(({}) ?? null)", expression);
        let result = self
            .tab
            .evaluate(&wrapped, false)
            .map_err(|e| AuditError::EvaluationFailed(e.to_string()))?;

        match result.value {
            Some(Value::String(json_str)) => Ok(serde_json::from_str(&json_str)?),
            _ => Ok(Value::Null),
        }
    }
}

/// [`PageElement`] over a headless_chrome element
pub struct ChromeElement<'a> {
    inner: Element<'a>,
}

impl<'a> ChromeElement<'a> {
    fn new(inner: Element<'a>) -> Self {
        Self { inner }
    }

    fn call(&self, function_declaration: &str, args: Vec<Value>) -> Result<Option<Value>> {
        let result = self
            .inner
            .call_js_fn(function_declaration, args, false)
            .map_err(|e| AuditError::ElementInteraction(e.to_string()))?;

        Ok(result.value.filter(|v| !v.is_null()))
    }
}

impl PageElement for ChromeElement<'_> {
    fn text(&self) -> Result<String> {
        Ok(self
            .call(TEXT_JS, Vec::new())?
            .and_then(|v| v.as_str().map(str::to_string))
            .unwrap_or_default())
    }

    fn attribute(&self, name: &str) -> Result<Option<String>> {
        Ok(self.call(ATTRIBUTE_JS, vec![json!(name)])?.map(|v| match v {
            Value::String(s) => s,
            other => other.to_string(),
        }))
    }

    fn vertical_position(&self) -> Result<f64> {
        self.call(POSITION_JS, Vec::new())?
            .and_then(|v| v.as_f64())
            .ok_or_else(|| AuditError::ElementInteraction("Element has no layout position".to_string()))
    }

    fn script_click(&self) -> Result<()> {
        self.call(CLICK_JS, Vec::new())?;
        Ok(())
    }

    fn find_all(&self, selector: &str) -> Result<Vec<Self>> {
        let count = self.call(COUNT_JS, vec![json!(selector)])?.and_then(|v| v.as_u64()).unwrap_or(0);
        if count == 0 {
            return Ok(Vec::new());
        }

        let elements = self
            .inner
            .find_elements(selector)
            .map_err(|e| AuditError::ElementNotFound(format!("Elements '{}' not found: {}", selector, e)))?;

        Ok(elements.into_iter().map(ChromeElement::new).collect())
    }
}
