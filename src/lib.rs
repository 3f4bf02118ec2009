//! # storefront-audit
//!
//! Post-deployment checks for a live storefront, driven through Chrome DevTools Protocol.
//!
//! ## Checks
//!
//! - **Structure**: an `h1` exists, headings never step back up in visual order, every image has alt text
//! - **Links**: every anchor's target answers something other than 404
//! - **Currency**: each option of the currency selector re-renders every displayed price
//! - **Script data**: page metadata published in `window.ScriptData`
//!
//! Results accumulate in one xlsx workbook (`reports/all_the_reports.xlsx` by default), one sheet
//! per category, merged across runs without overwriting earlier rows.
//!
//! ## Command line
//!
//! ```bash
//! cargo run -- --url https://www.alojamiento.io/
//!
//! # Only the currency test, with a visible browser
//! cargo run -- --only currency --currency-url https://www.alojamiento.io/property/cabrils/BC-1178728 --headed
//! ```
//!
//! ## Library usage
//!
//! ```rust,no_run
//! use storefront_audit::{AuditConfig, Auditor, BlockingProbe, BrowserSession, Category, LaunchOptions, ReportStore};
//!
//! # fn main() -> storefront_audit::Result<()> {
//! let session = BrowserSession::launch(LaunchOptions::default())?;
//! let page = session.page();
//! let config = AuditConfig::default();
//!
//! let probe = BlockingProbe::new(config.request_timeout)?;
//! let mut store = ReportStore::open(&config.report_path)?;
//! let auditor = Auditor::new(&page, probe, config);
//!
//! let report = auditor.audit(Category::Structure, "https://www.alojamiento.io/", &mut store)?;
//! println!("{} failures", report.failures());
//! # Ok(())
//! # }
//! ```
//!
//! ## Module Overview
//!
//! - [`browser`]: Chrome session and the page/element capability the checks run against
//! - [`checks`]: the validators and their result rows
//! - [`http`]: link reachability probe
//! - [`report`]: the xlsx report store
//! - [`runner`]: category sequencing
//! - [`error`]: error types and result alias

pub mod browser;
pub mod checks;
pub mod error;
pub mod http;
pub mod report;
pub mod runner;

pub use browser::{BrowserSession, ChromePage, ConnectionOptions, LaunchOptions, PageElement, PageSession};
pub use checks::{Category, Status, ValidationResult};
pub use error::{AuditError, Result};
pub use http::{BlockingProbe, HttpProbe};
pub use report::{ReportStore, SheetLayout};
pub use runner::{AuditConfig, Auditor, CategoryReport, RunSummary};
