//! Page validators and the result rows they produce
//!
//! Each validator is a pure function of the page it is handed: it returns an ordered
//! list of [`ValidationResult`] and leaves aggregation to the caller.

pub mod currency;
pub mod links;
pub mod script_data;
pub mod structure;

pub use currency::{CurrencyConfig, CurrencyOption, CurrencyRegressionTester, PricePair, PriceSnapshot};
pub use links::{LinkCheckConfig, LinkHealthChecker};
pub use script_data::ScriptDataRecord;
pub use structure::{HeadingObservation, StructuralValidator};

use crate::report::{CURRENCY_SHEET, SCRIPT_DATA_SHEET, SheetLayout, TEST_SHEET};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Binary outcome of a single check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    Pass,
    Fail,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Pass => f.write_str("Pass"),
            Status::Fail => f.write_str("Fail"),
        }
    }
}

/// One row of test outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub page_url: String,

    /// Test case name; the currency code for currency activations
    pub test_case: String,

    pub status: Status,

    /// Free-text explanation, always populated on failure
    pub comments: String,
}

impl ValidationResult {
    pub fn pass(page_url: impl Into<String>, test_case: impl Into<String>, comments: impl Into<String>) -> Self {
        Self { page_url: page_url.into(), test_case: test_case.into(), status: Status::Pass, comments: comments.into() }
    }

    pub fn fail(page_url: impl Into<String>, test_case: impl Into<String>, comments: impl Into<String>) -> Self {
        Self { page_url: page_url.into(), test_case: test_case.into(), status: Status::Fail, comments: comments.into() }
    }

    pub fn is_pass(&self) -> bool {
        self.status == Status::Pass
    }

    /// Cells in report column order
    pub fn to_row(&self) -> Vec<String> {
        vec![self.page_url.clone(), self.test_case.clone(), self.status.to_string(), self.comments.clone()]
    }
}

/// Report categories, one sheet each
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Heading presence, heading order and image alt text
    Structure,
    /// HTTP status of every anchor on the page
    Links,
    /// Currency selector re-renders prices
    Currency,
    /// Page metadata from the embedded `ScriptData` object
    ScriptData,
}

impl Category {
    /// Run order used when no explicit selection is made
    pub const ALL: [Category; 4] = [Category::Structure, Category::Links, Category::Currency, Category::ScriptData];

    pub fn name(&self) -> &'static str {
        match self {
            Category::Structure => "structure",
            Category::Links => "links",
            Category::Currency => "currency",
            Category::ScriptData => "script_data",
        }
    }

    pub fn sheet(&self) -> &'static SheetLayout {
        match self {
            Category::Structure | Category::Links => &TEST_SHEET,
            Category::Currency => &CURRENCY_SHEET,
            Category::ScriptData => &SCRIPT_DATA_SHEET,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
