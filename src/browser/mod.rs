//! Browser session management
//!
//! - [`config`]: launch and connection options
//! - [`session`]: owns the Chrome process and its tab
//! - [`page`]: the page/element capability the validators are written against

pub mod config;
pub mod page;
pub mod session;

pub use config::{ConnectionOptions, LaunchOptions};
pub use page::{ChromeElement, ChromePage, PageElement, PageSession};
pub use session::BrowserSession;
