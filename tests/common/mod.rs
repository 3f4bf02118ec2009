//! In-memory page, element and probe fakes for driving the checks without Chrome or network.

#![allow(dead_code)]

use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;
use storefront_audit::{AuditError, HttpProbe, PageElement, PageSession, Result};

/// Shared price texts a currency click rewrites
pub type PriceBoard = Rc<RefCell<Vec<String>>>;

#[derive(Clone)]
enum TextSource {
    Fixed(String),
    Board(PriceBoard, usize),
    Broken(String),
}

#[derive(Clone)]
pub struct FakeElement {
    text: TextSource,
    attributes: HashMap<String, String>,
    position: f64,
    children: HashMap<String, Vec<FakeElement>>,
    on_click: Option<Rc<dyn Fn()>>,
    clicks: Rc<RefCell<usize>>,
}

impl FakeElement {
    pub fn new() -> Self {
        Self {
            text: TextSource::Fixed(String::new()),
            attributes: HashMap::new(),
            position: 0.0,
            children: HashMap::new(),
            on_click: None,
            clicks: Rc::new(RefCell::new(0)),
        }
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = TextSource::Fixed(text.to_string());
        self
    }

    pub fn with_attribute(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn at(mut self, position: f64) -> Self {
        self.position = position;
        self
    }

    /// Text read live from `board[index]`
    pub fn price(board: &PriceBoard, index: usize) -> Self {
        let mut element = Self::new();
        element.text = TextSource::Board(board.clone(), index);
        element
    }

    /// Every read fails as if the node went stale
    pub fn broken(reason: &str) -> Self {
        let mut element = Self::new();
        element.text = TextSource::Broken(reason.to_string());
        element
    }

    pub fn with_children(mut self, selector: &str, children: Vec<FakeElement>) -> Self {
        self.children.insert(selector.to_string(), children);
        self
    }

    pub fn on_click(mut self, action: impl Fn() + 'static) -> Self {
        self.on_click = Some(Rc::new(action));
        self
    }

    pub fn click_count(&self) -> usize {
        *self.clicks.borrow()
    }
}

impl PageElement for FakeElement {
    fn text(&self) -> Result<String> {
        match &self.text {
            TextSource::Fixed(text) => Ok(text.clone()),
            TextSource::Board(board, index) => board
                .borrow()
                .get(*index)
                .cloned()
                .ok_or_else(|| AuditError::ElementInteraction(format!("price #{} detached", index))),
            TextSource::Broken(reason) => Err(AuditError::ElementInteraction(reason.clone())),
        }
    }

    fn attribute(&self, name: &str) -> Result<Option<String>> {
        if let TextSource::Broken(reason) = &self.text {
            return Err(AuditError::ElementInteraction(reason.clone()));
        }
        Ok(self.attributes.get(name).cloned())
    }

    fn vertical_position(&self) -> Result<f64> {
        Ok(self.position)
    }

    fn script_click(&self) -> Result<()> {
        *self.clicks.borrow_mut() += 1;
        if let Some(action) = &self.on_click {
            action();
        }
        Ok(())
    }

    fn find_all(&self, selector: &str) -> Result<Vec<Self>> {
        Ok(self.children.get(selector).cloned().unwrap_or_default())
    }
}

#[derive(Default)]
pub struct FakePage {
    elements: HashMap<String, Vec<FakeElement>>,
    script_data: Option<Value>,
    unreachable: bool,
    pub visited: RefCell<Vec<String>>,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_elements(mut self, selector: &str, elements: Vec<FakeElement>) -> Self {
        self.elements.insert(selector.to_string(), elements);
        self
    }

    pub fn with_script_data(mut self, script_data: Value) -> Self {
        self.script_data = Some(script_data);
        self
    }

    /// Every navigation fails
    pub fn unreachable(mut self) -> Self {
        self.unreachable = true;
        self
    }
}

impl PageSession for FakePage {
    type Element<'a> = FakeElement;

    fn navigate(&self, url: &str) -> Result<()> {
        if self.unreachable {
            return Err(AuditError::NavigationFailed(format!("Failed to navigate to {}: net::ERR_NAME_NOT_RESOLVED", url)));
        }
        self.visited.borrow_mut().push(url.to_string());
        Ok(())
    }

    fn find_elements(&self, selector: &str) -> Result<Vec<FakeElement>> {
        Ok(self.elements.get(selector).cloned().unwrap_or_default())
    }

    fn wait_for_element(&self, selector: &str, timeout: Duration) -> Result<FakeElement> {
        self.elements
            .get(selector)
            .and_then(|found| found.first().cloned())
            .ok_or_else(|| AuditError::ElementTimeout { selector: selector.to_string(), timeout_ms: timeout.as_millis() })
    }

    fn evaluate_json(&self, _expression: &str) -> Result<Value> {
        Ok(self.script_data.clone().unwrap_or(Value::Null))
    }
}

/// Probe answering from a fixed table; unknown URLs answer 200
#[derive(Default)]
pub struct FakeProbe {
    answers: HashMap<String, std::result::Result<u16, String>>,
    pub requested: RefCell<Vec<String>>,
}

impl FakeProbe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answer(mut self, url: &str, status: u16) -> Self {
        self.answers.insert(url.to_string(), Ok(status));
        self
    }

    pub fn error(mut self, url: &str, reason: &str) -> Self {
        self.answers.insert(url.to_string(), Err(reason.to_string()));
        self
    }
}

impl HttpProbe for FakeProbe {
    fn status(&self, url: &str) -> Result<u16> {
        self.requested.borrow_mut().push(url.to_string());
        match self.answers.get(url) {
            Some(Ok(status)) => Ok(*status),
            Some(Err(reason)) => Err(AuditError::Request(reason.clone())),
            None => Ok(200),
        }
    }
}

pub fn board(prices: &[&str]) -> PriceBoard {
    Rc::new(RefCell::new(prices.iter().map(|p| p.to_string()).collect()))
}

pub fn set_board(board: &PriceBoard, prices: &[&str]) {
    *board.borrow_mut() = prices.iter().map(|p| p.to_string()).collect();
}
