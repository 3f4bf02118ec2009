//! storefront-audit command line
//!
//! Launches (or attaches to) a browser, runs the selected categories in order and
//! appends their results to the report workbook.

use anyhow::Context;
use clap::Parser;
use std::time::Duration;
use storefront_audit::checks::{CurrencyConfig, LinkCheckConfig};
use storefront_audit::report::DEFAULT_REPORT_PATH;
use storefront_audit::{
    AuditConfig, Auditor, BlockingProbe, BrowserSession, Category, ConnectionOptions, LaunchOptions, ReportStore,
};

const DEFAULT_URL: &str = "https://www.alojamiento.io/";
const DEFAULT_CURRENCY_URL: &str = "https://www.alojamiento.io/property/cabrils/BC-1178728";

#[derive(Parser)]
#[command(name = "storefront-audit")]
#[command(version)]
#[command(about = "Validate a live storefront and record the results in an xlsx report", long_about = None)]
struct Cli {
    /// Page checked for structure, links and script data
    #[arg(long, default_value = DEFAULT_URL)]
    url: String,

    /// Page carrying the currency selector and prices
    #[arg(long, value_name = "URL", default_value = DEFAULT_CURRENCY_URL)]
    currency_url: String,

    /// Report workbook, created if missing
    #[arg(long, value_name = "PATH", default_value = DEFAULT_REPORT_PATH)]
    report: String,

    /// Run only these categories (repeatable); all of them by default
    #[arg(long, value_enum)]
    only: Vec<Category>,

    /// Launch browser in headed mode (default: headless)
    #[arg(long, short = 'H')]
    headed: bool,

    /// Path to custom browser executable
    #[arg(long, value_name = "PATH")]
    executable_path: Option<String>,

    /// WebSocket endpoint URL for remote browser connection
    #[arg(long, value_name = "URL")]
    ws_endpoint: Option<String>,

    /// Persistent browser profile directory
    #[arg(long, value_name = "DIR")]
    user_data_dir: Option<String>,

    /// Pause between link requests
    #[arg(long, default_value = "1000")]
    link_delay_ms: u64,

    /// Wait after each currency activation before re-reading prices
    #[arg(long, default_value = "3000")]
    settle_ms: u64,

    /// Wait bound for required elements
    #[arg(long, default_value = "30")]
    element_timeout_secs: u64,

    /// Per-request timeout of the link probe
    #[arg(long, default_value = "30")]
    request_timeout_secs: u64,

    /// Print every result as a JSON line on stdout
    #[arg(long)]
    json: bool,
}

impl Cli {
    fn plan(&self) -> Vec<(Category, String)> {
        let selected = if self.only.is_empty() { Category::ALL.to_vec() } else { self.only.clone() };

        selected
            .into_iter()
            .map(|category| {
                let url = match category {
                    Category::Currency => self.currency_url.clone(),
                    _ => self.url.clone(),
                };
                (category, url)
            })
            .collect()
    }

    fn audit_config(&self) -> AuditConfig {
        AuditConfig::new()
            .report_path(&self.report)
            .element_timeout(Duration::from_secs(self.element_timeout_secs))
            .request_timeout(Duration::from_secs(self.request_timeout_secs))
            .links(LinkCheckConfig::new().delay(Duration::from_millis(self.link_delay_ms)))
            .currency(CurrencyConfig::new().settle_delay(Duration::from_millis(self.settle_ms)))
    }

    fn session(&self) -> storefront_audit::Result<BrowserSession> {
        if let Some(ref endpoint) = self.ws_endpoint {
            return BrowserSession::connect(ConnectionOptions::new(endpoint));
        }

        let mut options = LaunchOptions::new().headless(!self.headed);
        if let Some(ref path) = self.executable_path {
            options = options.chrome_path(path);
        }
        if let Some(ref dir) = self.user_data_dir {
            options = options.user_data_dir(dir);
        }
        BrowserSession::launch(options)
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    let config = cli.audit_config();
    let plan = cli.plan();

    let mut store = ReportStore::open(&config.report_path).context("Failed to open report")?;
    let probe = BlockingProbe::new(config.request_timeout).context("Failed to build HTTP client")?;
    let session = cli.session().context("Failed to start browser session")?;
    let page = session.page();

    let summary = Auditor::new(&page, probe, config).run_all(&plan, &mut store);

    if let Err(e) = session.close() {
        log::warn!("Browser teardown: {}", e);
    }

    if cli.json {
        for report in &summary.completed {
            for result in &report.results {
                println!("{}", serde_json::to_string(result)?);
            }
        }
    }

    for report in &summary.completed {
        log::info!("{} on {}: {} rows, {} failures", report.category, report.url, report.rows.len(), report.failures());
    }
    for (category, reason) in &summary.aborted {
        log::error!("{} aborted: {}", category, reason);
    }
    log::info!("Report: {}", store.path().display());

    if !summary.aborted.is_empty() {
        anyhow::bail!("{} of {} categories aborted", summary.aborted.len(), plan.len());
    }

    Ok(())
}
