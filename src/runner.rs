//! Sequences the audit categories against a page and feeds their rows to the report.

use crate::browser::PageSession;
use crate::checks::{
    Category, CurrencyConfig, CurrencyRegressionTester, LinkCheckConfig, LinkHealthChecker, ScriptDataRecord,
    StructuralValidator, ValidationResult,
};
use crate::error::Result;
use crate::http::HttpProbe;
use crate::report::{DEFAULT_REPORT_PATH, ReportStore};
use std::path::PathBuf;
use std::time::Duration;

/// Tunables for a full audit run
#[derive(Debug, Clone)]
pub struct AuditConfig {
    /// Wait bound for required elements such as the currency widget
    pub element_timeout: Duration,

    /// Per-request timeout of the link probe
    pub request_timeout: Duration,

    pub report_path: PathBuf,

    pub links: LinkCheckConfig,

    pub currency: CurrencyConfig,
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            element_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(30),
            report_path: PathBuf::from(DEFAULT_REPORT_PATH),
            links: LinkCheckConfig::default(),
            currency: CurrencyConfig::default(),
        }
    }
}

impl AuditConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn element_timeout(mut self, timeout: Duration) -> Self {
        self.element_timeout = timeout;
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn report_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.report_path = path.into();
        self
    }

    pub fn links(mut self, links: LinkCheckConfig) -> Self {
        self.links = links;
        self
    }

    pub fn currency(mut self, currency: CurrencyConfig) -> Self {
        self.currency = currency;
        self
    }
}

/// Rows one category produced for one target
#[derive(Debug, Clone)]
pub struct CategoryReport {
    pub category: Category,
    pub url: String,

    /// Validation outcomes; empty for script data
    pub results: Vec<ValidationResult>,

    /// Cells in sheet column order
    pub rows: Vec<Vec<String>>,
}

impl CategoryReport {
    fn from_results(category: Category, url: &str, results: Vec<ValidationResult>) -> Self {
        let rows = results.iter().map(ValidationResult::to_row).collect();
        Self { category, url: url.to_string(), results, rows }
    }

    pub fn failures(&self) -> usize {
        self.results.iter().filter(|r| !r.is_pass()).count()
    }
}

/// Outcome of a multi-category run
#[derive(Debug, Default)]
pub struct RunSummary {
    pub completed: Vec<CategoryReport>,

    /// Categories that aborted, with the reason
    pub aborted: Vec<(Category, String)>,
}

impl RunSummary {
    pub fn is_clean(&self) -> bool {
        self.aborted.is_empty() && self.completed.iter().all(|report| report.failures() == 0)
    }
}

/// Runs audit categories on a page and records them in the report
pub struct Auditor<'p, P, H> {
    page: &'p P,
    probe: H,
    config: AuditConfig,
}

impl<'p, P: PageSession, H: HttpProbe> Auditor<'p, P, H> {
    pub fn new(page: &'p P, probe: H, config: AuditConfig) -> Self {
        Self { page, probe, config }
    }

    pub fn config(&self) -> &AuditConfig {
        &self.config
    }

    /// Navigate to `url` and run one category, without touching the report.
    ///
    /// Navigation failures and a missing currency widget abort the category.
    pub fn inspect(&self, category: Category, url: &str) -> Result<CategoryReport> {
        log::info!("Running {} checks on {}", category, url);
        self.page.navigate(url)?;

        match category {
            Category::Structure => {
                let results = StructuralValidator::new().run(self.page, url);
                Ok(CategoryReport::from_results(category, url, results))
            }
            Category::Links => {
                let anchors = self.page.find_elements("a")?;
                let checker = LinkHealthChecker::new(&self.probe, self.config.links.clone());
                Ok(CategoryReport::from_results(category, url, checker.check(&anchors)))
            }
            Category::Currency => {
                let currency = &self.config.currency;
                let widget = self.page.wait_for_element(&currency.widget_selector, self.config.element_timeout)?;
                log::info!("Currency dropdown found");

                let prices = self.page.find_elements(&currency.price_selector)?;
                let tester = CurrencyRegressionTester::new(currency.clone());
                let results = tester.run(url, &widget, &prices)?;
                Ok(CategoryReport::from_results(category, url, results))
            }
            Category::ScriptData => {
                let rows = ScriptDataRecord::scrape(self.page)?.map(|record| record.to_row()).into_iter().collect();
                Ok(CategoryReport { category, url: url.to_string(), results: Vec::new(), rows })
            }
        }
    }

    /// Run one category and persist its rows
    pub fn audit(&self, category: Category, url: &str, store: &mut ReportStore) -> Result<CategoryReport> {
        let report = self.inspect(category, url)?;

        store.append(category.sheet(), &report.rows)?;
        store.save()?;

        log::info!("{} checks on {} recorded: {} rows, {} failures", category, url, report.rows.len(), report.failures());
        Ok(report)
    }

    /// Run every `(category, url)` pair in order. A category that fails is logged and skipped.
    pub fn run_all(&self, plan: &[(Category, String)], store: &mut ReportStore) -> RunSummary {
        let mut summary = RunSummary::default();

        for (category, url) in plan {
            match self.audit(*category, url, store) {
                Ok(report) => summary.completed.push(report),
                Err(e) => {
                    log::error!("{} checks on {} aborted: {}", category, url, e);
                    summary.aborted.push((*category, e.to_string()));
                }
            }
        }

        summary
    }
}
