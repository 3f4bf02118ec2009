mod common;

use common::{board, set_board, FakeElement, FakePage, FakeProbe};
use serde_json::json;
use std::time::Duration;
use storefront_audit::checks::{CurrencyConfig, LinkCheckConfig};
use storefront_audit::{AuditConfig, AuditError, Auditor, Category, ReportStore};

const URL: &str = "https://shop.test/";
const PROPERTY_URL: &str = "https://shop.test/property/BC-1";

fn config(dir: &tempfile::TempDir) -> AuditConfig {
    AuditConfig::new()
        .report_path(dir.path().join("all_the_reports.xlsx"))
        .element_timeout(Duration::from_millis(10))
        .links(LinkCheckConfig::new().delay(Duration::ZERO))
        .currency(CurrencyConfig::new().settle_delay(Duration::ZERO))
}

fn storefront() -> FakePage {
    let prices = board(&["US$100", "US$250"]);
    let target = prices.clone();
    let euro = FakeElement::new()
        .with_text("Euro (€) (EUR)")
        .on_click(move || set_board(&target, &["EU€90", "EU€230"]));

    FakePage::new()
        .with_elements("h1", vec![FakeElement::new().at(0.0)])
        .with_elements("h2", vec![FakeElement::new().at(200.0)])
        .with_elements("img", vec![FakeElement::new().with_attribute("src", "https://cdn.test/a.jpg")])
        .with_elements(
            "a",
            vec![
                FakeElement::new().with_attribute("href", "https://shop.test/ok"),
                FakeElement::new().with_attribute("href", "https://shop.test/gone"),
            ],
        )
        .with_elements(
            "#js-currency-sort-footer",
            vec![FakeElement::new().with_children("ul.select-ul > li", vec![euro])],
        )
        .with_elements(".js-price-value", vec![FakeElement::price(&prices, 0), FakeElement::price(&prices, 1)])
        .with_script_data(json!({
            "config": { "SiteUrl": "https://shop.test", "SiteName": "Shop" },
            "userInfo": { "Browser": "Chrome", "CountryCode": "BD", "IP": "203.0.113.7" },
            "pageData": { "CampaignId": "summer" }
        }))
}

#[test]
fn test_full_run_fills_all_three_sheets() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(&dir);
    let page = storefront();
    let probe = FakeProbe::new().answer("https://shop.test/gone", 404);
    let mut store = ReportStore::open(&config.report_path).unwrap();

    let plan: Vec<(Category, String)> = Category::ALL
        .iter()
        .map(|c| {
            let url = if *c == Category::Currency { PROPERTY_URL } else { URL };
            (*c, url.to_string())
        })
        .collect();
    let summary = Auditor::new(&page, &probe, config.clone()).run_all(&plan, &mut store);

    assert!(summary.aborted.is_empty());
    assert_eq!(summary.completed.len(), 4);
    assert_eq!(*page.visited.borrow(), vec![URL, URL, PROPERTY_URL, URL]);

    let reopened = ReportStore::open(&config.report_path).unwrap();

    // header + 3 structure rows + 1 link failure
    let test_rows = reopened.sheet_values("Test").unwrap();
    assert_eq!(test_rows.len(), 5);
    assert_eq!(test_rows[3][1], "Image Alt Attributes");
    assert_eq!(test_rows[3][2], "Fail");
    assert_eq!(test_rows[4], vec!["https://shop.test/gone", "URL Status Code", "Fail", "404 Not Found"]);

    let currency_rows = reopened.sheet_values("Currency").unwrap();
    assert_eq!(currency_rows[1], vec![PROPERTY_URL, "EUR", "Pass", "Prices updated successfully in EUR"]);

    let script_rows = reopened.sheet_values("Script Data").unwrap();
    assert_eq!(script_rows[1], vec!["https://shop.test", "Shop", "Chrome", "BD", "203.0.113.7", "summer"]);
}

#[test]
fn test_missing_currency_widget_aborts_only_that_category() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(&dir);
    let page = FakePage::new().with_elements("h1", vec![FakeElement::new()]);
    let mut store = ReportStore::open(&config.report_path).unwrap();

    let plan = vec![(Category::Currency, PROPERTY_URL.to_string()), (Category::Structure, URL.to_string())];
    let summary = Auditor::new(&page, FakeProbe::new(), config.clone()).run_all(&plan, &mut store);

    assert_eq!(summary.aborted.len(), 1);
    assert_eq!(summary.aborted[0].0, Category::Currency);
    assert!(summary.aborted[0].1.contains("#js-currency-sort-footer"));
    assert_eq!(summary.completed.len(), 1);

    let reopened = ReportStore::open(&config.report_path).unwrap();
    assert!(reopened.sheet_values("Currency").is_none());
    assert_eq!(reopened.sheet_values("Test").unwrap().len(), 4);
}

#[test]
fn test_navigation_failure_is_fatal_for_category() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(&dir);
    let page = FakePage::new().unreachable();
    let auditor = Auditor::new(&page, FakeProbe::new(), config);

    assert!(matches!(auditor.inspect(Category::Links, URL), Err(AuditError::NavigationFailed(_))));
}

#[test]
fn test_page_without_script_data_writes_header_only() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(&dir);
    let page = FakePage::new();
    let mut store = ReportStore::open(&config.report_path).unwrap();

    let report = Auditor::new(&page, FakeProbe::new(), config.clone()).audit(Category::ScriptData, URL, &mut store).unwrap();
    assert!(report.rows.is_empty());

    let rows = ReportStore::open(&config.report_path).unwrap().sheet_values("Script Data").unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], "SiteURL");
}

#[test]
fn test_second_run_appends_to_existing_report() {
    let dir = tempfile::tempdir().unwrap();
    let config = config(&dir);
    let page = storefront();

    for _ in 0..2 {
        let mut store = ReportStore::open(&config.report_path).unwrap();
        Auditor::new(&page, FakeProbe::new(), config.clone()).audit(Category::Structure, URL, &mut store).unwrap();
    }

    let rows = ReportStore::open(&config.report_path).unwrap().sheet_values("Test").unwrap();
    assert_eq!(rows.len(), 7);
}
