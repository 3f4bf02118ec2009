//! HTTP reachability probing for the link checker

use crate::error::{AuditError, Result};
use reqwest::blocking::Client;
use std::time::Duration;

/// Issues a single GET and reports the response status.
///
/// Any response, whatever its status, is `Ok`; only request-level failures
/// (timeout, DNS, refused connection) are errors.
pub trait HttpProbe {
    fn status(&self, url: &str) -> Result<u16>;
}

/// [`HttpProbe`] backed by a blocking reqwest client
#[derive(Debug, Clone)]
pub struct BlockingProbe {
    client: Client,
}

impl BlockingProbe {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AuditError::Request(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client })
    }
}

impl HttpProbe for BlockingProbe {
    fn status(&self, url: &str) -> Result<u16> {
        let response = self.client.get(url).send().map_err(|e| AuditError::Request(e.to_string()))?;
        Ok(response.status().as_u16())
    }
}

impl<P: HttpProbe + ?Sized> HttpProbe for &P {
    fn status(&self, url: &str) -> Result<u16> {
        (**self).status(url)
    }
}
