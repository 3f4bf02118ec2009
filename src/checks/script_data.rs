use crate::browser::PageSession;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const SCRIPT_DATA_EXPR: &str = "window.ScriptData";

/// Page metadata published by the storefront in `window.ScriptData`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScriptDataRecord {
    pub site_url: String,
    pub site_name: String,
    pub browser: String,
    pub country_code: String,
    pub ip: String,
    pub campaign_id: String,
}

impl ScriptDataRecord {
    /// Project the nested object onto one row. Missing keys become empty cells.
    pub fn from_value(script_data: &Value) -> Self {
        Self {
            site_url: lookup(script_data, "config", "SiteUrl"),
            site_name: lookup(script_data, "config", "SiteName"),
            browser: lookup(script_data, "userInfo", "Browser"),
            country_code: lookup(script_data, "userInfo", "CountryCode"),
            ip: lookup(script_data, "userInfo", "IP"),
            campaign_id: lookup(script_data, "pageData", "CampaignId"),
        }
    }

    /// Read the object from the current page; `None` when the page does not publish one
    pub fn scrape<P: PageSession>(page: &P) -> Result<Option<Self>> {
        let script_data = page.evaluate_json(SCRIPT_DATA_EXPR)?;
        if script_data.is_null() {
            log::warn!("No ScriptData found on the page");
            return Ok(None);
        }

        log::info!("ScriptData fetched");
        Ok(Some(Self::from_value(&script_data)))
    }

    pub fn to_row(&self) -> Vec<String> {
        vec![
            self.site_url.clone(),
            self.site_name.clone(),
            self.browser.clone(),
            self.country_code.clone(),
            self.ip.clone(),
            self.campaign_id.clone(),
        ]
    }
}

fn lookup(root: &Value, section: &str, key: &str) -> String {
    match root.get(section).and_then(|s| s.get(key)) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
