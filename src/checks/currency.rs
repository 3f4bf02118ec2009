//! Currency switching regression test.
//!
//! For each option of the storefront's currency selector the visible prices are captured,
//! the option is activated from script, and after a fixed settle delay the prices are
//! captured again from the same element handles. The activation passes only when every
//! single price changed.

use crate::browser::PageElement;
use crate::checks::ValidationResult;
use crate::error::{AuditError, Result};
use regex::Regex;
use std::sync::LazyLock;
use std::time::Duration;

pub const UNKNOWN_CODE: &str = "Unknown";
pub const NOT_UPDATED: &str = "Prices did not update";

static PARENTHETICAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\(([^()]*)\)").expect("valid regex"));

/// Selectors and timings for the currency test
#[derive(Debug, Clone)]
pub struct CurrencyConfig {
    /// The selector widget; must appear within the element timeout
    pub widget_selector: String,

    /// Options inside the widget
    pub option_selector: String,

    /// Every displayed price on the page
    pub price_selector: String,

    /// Flat wait after an activation for prices to re-render
    pub settle_delay: Duration,

    /// Leading characters stripped from each raw price (the currency symbol block)
    pub prefix_len: usize,
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            widget_selector: "#js-currency-sort-footer".to_string(),
            option_selector: "ul.select-ul > li".to_string(),
            price_selector: ".js-price-value".to_string(),
            settle_delay: Duration::from_secs(3),
            prefix_len: 3,
        }
    }
}

impl CurrencyConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn settle_delay(mut self, delay: Duration) -> Self {
        self.settle_delay = delay;
        self
    }

    pub fn widget_selector(mut self, selector: impl Into<String>) -> Self {
        self.widget_selector = selector.into();
        self
    }

    pub fn option_selector(mut self, selector: impl Into<String>) -> Self {
        self.option_selector = selector.into();
        self
    }

    pub fn price_selector(mut self, selector: impl Into<String>) -> Self {
        self.price_selector = selector.into();
        self
    }
}

/// One entry of the currency selector
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrencyOption {
    pub raw_label: String,

    /// Code from the label's last parenthetical group, `"US Dollar ($) (USD)"` → `"USD"`
    pub code: String,
}

impl CurrencyOption {
    pub fn parse(raw_label: &str) -> Result<Self> {
        let code = PARENTHETICAL
            .captures_iter(raw_label)
            .last()
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
            .filter(|code| !code.is_empty())
            .ok_or_else(|| AuditError::CurrencyLabel(raw_label.trim().to_string()))?;

        Ok(Self { raw_label: raw_label.to_string(), code: code.to_string() })
    }
}

/// Price strings captured at one instant, one per price element
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PriceSnapshot {
    prices: Vec<String>,
}

impl PriceSnapshot {
    pub fn capture<E: PageElement>(elements: &[E], prefix_len: usize) -> Result<Self> {
        let prices = elements
            .iter()
            .map(|element| Ok(strip_prefix(element.text()?.trim(), prefix_len)))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { prices })
    }

    pub fn from_prices(prices: Vec<String>) -> Self {
        Self { prices }
    }

    pub fn prices(&self) -> &[String] {
        &self.prices
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }

    /// Associate each baseline price with the post-activation price of the same element.
    ///
    /// Snapshots of different length cannot be aligned and are an error.
    pub fn pair_with(&self, post: &PriceSnapshot) -> Result<Vec<PricePair>> {
        if self.len() != post.len() {
            return Err(AuditError::SnapshotMismatch { baseline: self.len(), post: post.len() });
        }

        Ok(self
            .prices
            .iter()
            .zip(&post.prices)
            .enumerate()
            .map(|(element, (before, after))| PricePair { element, before: before.clone(), after: after.clone() })
            .collect())
    }
}

/// Drop the first `len` characters when the value is at least that long
fn strip_prefix(raw: &str, len: usize) -> String {
    if raw.chars().count() < len {
        return raw.to_string();
    }
    raw.chars().skip(len).collect()
}

/// The same price element observed before and after an activation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricePair {
    /// Position of the element in the price element list
    pub element: usize,
    pub before: String,
    pub after: String,
}

impl PricePair {
    pub fn changed(&self) -> bool {
        self.before != self.after
    }
}

/// All-or-nothing: one unchanged price fails the whole activation
pub fn all_prices_changed(pairs: &[PricePair]) -> bool {
    pairs.iter().all(PricePair::changed)
}

/// Activates each currency option in turn and verifies every price re-renders
pub struct CurrencyRegressionTester {
    config: CurrencyConfig,
}

impl CurrencyRegressionTester {
    pub fn new(config: CurrencyConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CurrencyConfig {
        &self.config
    }

    /// One result per option. Enumerating the options is the only fatal step;
    /// everything after that is isolated per option.
    pub fn run<E: PageElement>(&self, page_url: &str, widget: &E, prices: &[E]) -> Result<Vec<ValidationResult>> {
        let options = widget.find_all(&self.config.option_selector)?;
        log::info!("Found {} currency options", options.len());

        let results = options
            .iter()
            .enumerate()
            .map(|(index, option)| self.activate(page_url, index + 1, option, prices))
            .collect();

        Ok(results)
    }

    fn activate<E: PageElement>(&self, page_url: &str, ordinal: usize, option: &E, prices: &[E]) -> ValidationResult {
        let currency = match option.text().and_then(|label| CurrencyOption::parse(&label)) {
            Ok(currency) => currency,
            Err(e) => {
                log::warn!("Error with currency option {}: {}", ordinal, e);
                return ValidationResult::fail(page_url, UNKNOWN_CODE, format!("Error: {}", e));
            }
        };

        log::info!("Processing currency option {}: {}", ordinal, currency.code);

        match self.compare(option, prices) {
            Ok(pairs) if all_prices_changed(&pairs) => {
                if pairs.is_empty() {
                    log::warn!("No price elements to compare for {}", currency.code);
                }
                log::info!("Prices updated in {}", currency.code);
                ValidationResult::pass(page_url, &currency.code, format!("Prices updated successfully in {}", currency.code))
            }
            Ok(pairs) => {
                for pair in pairs.iter().filter(|p| !p.changed()) {
                    log::debug!("Price #{} stayed at {}", pair.element, pair.before);
                }
                log::warn!("Prices did not update for {}", currency.code);
                ValidationResult::fail(page_url, &currency.code, NOT_UPDATED)
            }
            Err(e) => {
                log::warn!("Error with currency option {} ({}): {}", ordinal, currency.code, e);
                ValidationResult::fail(page_url, &currency.code, format!("Error: {}", e))
            }
        }
    }

    fn compare<E: PageElement>(&self, option: &E, prices: &[E]) -> Result<Vec<PricePair>> {
        let baseline = PriceSnapshot::capture(prices, self.config.prefix_len)?;

        option.script_click()?;
        if !self.config.settle_delay.is_zero() {
            std::thread::sleep(self.config.settle_delay);
        }

        let post = PriceSnapshot::capture(prices, self.config.prefix_len)?;
        let pairs = baseline.pair_with(&post)?;

        for pair in &pairs {
            log::debug!("Initial: {:<10} --- Updated: {:<10}", pair.before, pair.after);
        }

        Ok(pairs)
    }
}
