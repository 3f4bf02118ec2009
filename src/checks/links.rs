use crate::browser::PageElement;
use crate::checks::ValidationResult;
use crate::http::HttpProbe;
use std::time::Duration;

pub const TEST_CASE: &str = "URL Status Code";

/// Throttling policy for the link crawl
#[derive(Debug, Clone)]
pub struct LinkCheckConfig {
    /// Pause between consecutive requests
    pub delay: Duration,
}

impl Default for LinkCheckConfig {
    fn default() -> Self {
        Self { delay: Duration::from_secs(1) }
    }
}

impl LinkCheckConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

/// Classifies every anchor on the page by HTTP reachability.
///
/// Only failures are recorded: a 404 or a request-level error. Every other
/// status passes implicitly and produces no row.
pub struct LinkHealthChecker<H> {
    probe: H,
    config: LinkCheckConfig,
}

impl<H: HttpProbe> LinkHealthChecker<H> {
    pub fn new(probe: H, config: LinkCheckConfig) -> Self {
        Self { probe, config }
    }

    /// Probe every anchor with an href, in order.
    ///
    /// An anchor whose href cannot be read has no URL to report, so its row carries
    /// `anchor #N` (its position in `anchors`) in the Page URL column instead.
    pub fn check<E: PageElement>(&self, anchors: &[E]) -> Vec<ValidationResult> {
        log::info!("Found {} links on the page", anchors.len());

        let mut results = Vec::new();
        let mut requested = 0usize;

        for (index, anchor) in anchors.iter().enumerate() {
            let href = match anchor.attribute("href") {
                Ok(Some(href)) if !href.is_empty() => href,
                Ok(_) => continue,
                Err(e) => {
                    log::warn!("Could not read href of anchor #{}: {}", index, e);
                    results.push(ValidationResult::fail(format!("anchor #{}", index), TEST_CASE, format!("Error: {}", e)));
                    continue;
                }
            };

            if requested > 0 && !self.config.delay.is_zero() {
                std::thread::sleep(self.config.delay);
            }
            requested += 1;

            if let Some(result) = self.classify(&href) {
                results.push(result);
            }
        }

        log::info!("Checked {} links, {} failures", requested, results.len());
        results
    }

    fn classify(&self, href: &str) -> Option<ValidationResult> {
        log::info!("Checking URL: {}", href);

        match self.probe.status(href) {
            Ok(404) => {
                log::warn!("404 Not Found: {}", href);
                Some(ValidationResult::fail(href, TEST_CASE, "404 Not Found"))
            }
            Ok(status) => {
                log::debug!("{} -> {}", href, status);
                None
            }
            Err(e) => {
                log::warn!("Error checking URL {}: {}", href, e);
                Some(ValidationResult::fail(href, TEST_CASE, format!("Error: {}", e)))
            }
        }
    }
}
