#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::Instant;
use vigil_common::config::{VigilConfig, WaitSettings};
use vigil_common::{DriverError, Locator};
use vigil_engine::driver::Driver;

pub type NodeId = usize;

/// What a scripted click does instead of succeeding.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickReaction {
    Ok,
    Stale,
    Intercepted(String),
    Fail(String),
}

#[derive(Debug, Clone, Default)]
pub struct NodeSpec {
    text: String,
    hidden: bool,
    disabled: bool,
    attrs: HashMap<String, String>,
}

impl NodeSpec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attrs.insert(name.to_string(), value.to_string());
        self
    }
}

#[derive(Debug)]
struct Node {
    locator: Locator,
    parent: Option<NodeId>,
    attached: bool,
    visible: bool,
    enabled: bool,
    text: String,
    attrs: HashMap<String, String>,
}

type Effect = Arc<dyn Fn(&mut FakePage) + Send + Sync>;
type Scheduled = Box<dyn FnOnce(&mut FakePage) + Send>;

/// In-memory page model behind [`FakeDriver`].
#[derive(Default)]
pub struct FakePage {
    nodes: Vec<Node>,
    pub url: String,
    click_script: HashMap<Locator, VecDeque<ClickReaction>>,
    effects: HashMap<NodeId, Vec<Effect>>,
    scheduled: Vec<(Instant, Scheduled)>,
    pub fallback_fails: bool,
    pub quit_fails: bool,
    /// Makes every call fail with an unexpected driver error.
    pub broken: Option<String>,
    /// Nodes whose visibility check fails with an unexpected error.
    pub visibility_failures: HashMap<NodeId, String>,
    /// Nodes whose text read fails with an unexpected error.
    pub text_failures: HashMap<NodeId, String>,
    pub clicks: HashMap<Locator, usize>,
    pub fallback_activations: usize,
    pub typed: HashMap<Locator, String>,
    pub navigations: Vec<String>,
    pub quits: usize,
}

impl FakePage {
    pub fn add(&mut self, locator: Locator, spec: NodeSpec) -> NodeId {
        self.insert(locator, None, spec)
    }

    pub fn add_child(&mut self, parent: NodeId, locator: Locator, spec: NodeSpec) -> NodeId {
        self.insert(locator, Some(parent), spec)
    }

    fn insert(&mut self, locator: Locator, parent: Option<NodeId>, spec: NodeSpec) -> NodeId {
        self.nodes.push(Node {
            locator,
            parent,
            attached: true,
            visible: !spec.hidden,
            enabled: !spec.disabled,
            text: spec.text,
            attrs: spec.attrs,
        });
        self.nodes.len() - 1
    }

    /// Detach a node and everything below it.
    pub fn remove(&mut self, id: NodeId) {
        self.nodes[id].attached = false;
        let children: Vec<NodeId> = (0..self.nodes.len())
            .filter(|&c| self.nodes[c].parent == Some(id) && self.nodes[c].attached)
            .collect();
        for child in children {
            self.remove(child);
        }
    }

    pub fn remove_all(&mut self, locator: &Locator) {
        let ids: Vec<NodeId> = (0..self.nodes.len())
            .filter(|&i| self.nodes[i].attached && &self.nodes[i].locator == locator)
            .collect();
        for id in ids {
            self.remove(id);
        }
    }

    pub fn set_text(&mut self, id: NodeId, text: &str) {
        self.nodes[id].text = text.to_string();
    }

    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        self.nodes[id].visible = visible;
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) {
        self.nodes[id].attrs.insert(name.to_string(), value.to_string());
    }

    fn live(&self, id: NodeId) -> bool {
        let node = &self.nodes[id];
        node.attached && node.parent.is_none_or(|p| self.live(p))
    }

    fn descends_from(&self, id: NodeId, ancestor: NodeId) -> bool {
        let mut current = self.nodes[id].parent;
        while let Some(p) = current {
            if p == ancestor {
                return true;
            }
            current = self.nodes[p].parent;
        }
        false
    }

    fn matches(&self, locator: &Locator, within: Option<NodeId>) -> Vec<NodeId> {
        (0..self.nodes.len())
            .filter(|&i| self.live(i) && &self.nodes[i].locator == locator)
            .filter(|&i| within.is_none_or(|p| self.descends_from(i, p)))
            .collect()
    }

    fn node(&self, id: NodeId) -> Result<&Node, DriverError> {
        if self.live(id) {
            Ok(&self.nodes[id])
        } else {
            Err(DriverError::Stale)
        }
    }

    fn run_effects(&mut self, id: NodeId) {
        let effects = self.effects.get(&id).cloned().unwrap_or_default();
        for effect in effects {
            effect(self);
        }
    }

    fn sync(&mut self) -> Result<(), DriverError> {
        let now = Instant::now();
        let mut due = Vec::new();
        let mut i = 0;
        while i < self.scheduled.len() {
            if self.scheduled[i].0 <= now {
                due.push(self.scheduled.remove(i));
            } else {
                i += 1;
            }
        }
        for (_, change) in due {
            change(self);
        }
        match &self.broken {
            Some(reason) => Err(DriverError::Other(reason.clone())),
            None => Ok(()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FakeElement(NodeId);

/// Scriptable in-memory driver. Clones share one page.
#[derive(Clone, Default)]
pub struct FakeDriver {
    page: Arc<Mutex<FakePage>>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_url(url: &str) -> Self {
        let driver = Self::new();
        driver.page().url = url.to_string();
        driver
    }

    pub fn page(&self) -> MutexGuard<'_, FakePage> {
        self.page.lock().unwrap()
    }

    pub fn add(&self, locator: Locator, spec: NodeSpec) -> NodeId {
        self.page().add(locator, spec)
    }

    pub fn add_child(&self, parent: NodeId, locator: Locator, spec: NodeSpec) -> NodeId {
        self.page().add_child(parent, locator, spec)
    }

    /// Queue reactions for the next clicks on elements found by `locator`.
    pub fn script_clicks(&self, locator: Locator, reactions: Vec<ClickReaction>) {
        self.page()
            .click_script
            .entry(locator)
            .or_default()
            .extend(reactions);
    }

    /// Run `effect` whenever node `id` is activated successfully.
    pub fn on_click(&self, id: NodeId, effect: impl Fn(&mut FakePage) + Send + Sync + 'static) {
        self.page()
            .effects
            .entry(id)
            .or_default()
            .push(Arc::new(effect));
    }

    /// Apply `change` once `delay` has elapsed on the tokio clock.
    pub fn schedule(&self, delay: Duration, change: impl FnOnce(&mut FakePage) + Send + 'static) {
        FakePage::schedule_on(&mut self.page(), delay, change);
    }

    pub fn clicks(&self, locator: &Locator) -> usize {
        self.page().clicks.get(locator).copied().unwrap_or(0)
    }

    pub fn fallback_activations(&self) -> usize {
        self.page().fallback_activations
    }

    pub fn quits(&self) -> usize {
        self.page().quits
    }

    pub fn typed(&self, locator: &Locator) -> Option<String> {
        self.page().typed.get(locator).cloned()
    }
}

impl FakePage {
    pub fn schedule_on(
        page: &mut FakePage,
        delay: Duration,
        change: impl FnOnce(&mut FakePage) + Send + 'static,
    ) {
        page.scheduled.push((Instant::now() + delay, Box::new(change)));
    }

    pub fn schedule(
        &mut self,
        delay: Duration,
        change: impl FnOnce(&mut FakePage) + Send + 'static,
    ) {
        FakePage::schedule_on(self, delay, change);
    }
}

#[async_trait]
impl Driver for FakeDriver {
    type Element = FakeElement;

    async fn find_element(&self, locator: &Locator) -> Result<FakeElement, DriverError> {
        let mut page = self.page();
        page.sync()?;
        page.matches(locator, None)
            .first()
            .map(|&id| FakeElement(id))
            .ok_or_else(|| DriverError::not_found(locator))
    }

    async fn find_elements(&self, locator: &Locator) -> Result<Vec<FakeElement>, DriverError> {
        let mut page = self.page();
        page.sync()?;
        Ok(page.matches(locator, None).into_iter().map(FakeElement).collect())
    }

    async fn find_within(
        &self,
        parent: &FakeElement,
        locator: &Locator,
    ) -> Result<FakeElement, DriverError> {
        let mut page = self.page();
        page.sync()?;
        page.node(parent.0)?;
        page.matches(locator, Some(parent.0))
            .first()
            .map(|&id| FakeElement(id))
            .ok_or_else(|| DriverError::not_found(locator))
    }

    async fn find_all_within(
        &self,
        parent: &FakeElement,
        locator: &Locator,
    ) -> Result<Vec<FakeElement>, DriverError> {
        let mut page = self.page();
        page.sync()?;
        page.node(parent.0)?;
        Ok(page
            .matches(locator, Some(parent.0))
            .into_iter()
            .map(FakeElement)
            .collect())
    }

    async fn is_visible(&self, element: &FakeElement) -> Result<bool, DriverError> {
        let mut page = self.page();
        page.sync()?;
        if let Some(reason) = page.visibility_failures.get(&element.0) {
            return Err(DriverError::Other(reason.clone()));
        }
        Ok(page.node(element.0)?.visible)
    }

    async fn is_enabled(&self, element: &FakeElement) -> Result<bool, DriverError> {
        let mut page = self.page();
        page.sync()?;
        Ok(page.node(element.0)?.enabled)
    }

    async fn text(&self, element: &FakeElement) -> Result<String, DriverError> {
        let mut page = self.page();
        page.sync()?;
        if let Some(reason) = page.text_failures.get(&element.0) {
            return Err(DriverError::Other(reason.clone()));
        }
        let node = page.node(element.0)?;
        // Hidden elements render no text, as in a real browser.
        Ok(if node.visible { node.text.clone() } else { String::new() })
    }

    async fn attribute(
        &self,
        element: &FakeElement,
        name: &str,
    ) -> Result<Option<String>, DriverError> {
        let mut page = self.page();
        page.sync()?;
        Ok(page.node(element.0)?.attrs.get(name).cloned())
    }

    async fn click(&self, element: &FakeElement) -> Result<(), DriverError> {
        let mut page = self.page();
        page.sync()?;
        let locator = page.node(element.0)?.locator.clone();
        *page.clicks.entry(locator.clone()).or_default() += 1;
        let reaction = page
            .click_script
            .get_mut(&locator)
            .and_then(|q| q.pop_front())
            .unwrap_or(ClickReaction::Ok);
        match reaction {
            ClickReaction::Ok => {
                page.run_effects(element.0);
                Ok(())
            }
            ClickReaction::Stale => Err(DriverError::Stale),
            ClickReaction::Intercepted(msg) => Err(DriverError::Intercepted(msg)),
            ClickReaction::Fail(msg) => Err(DriverError::Other(msg)),
        }
    }

    async fn clear(&self, element: &FakeElement) -> Result<(), DriverError> {
        let mut page = self.page();
        page.sync()?;
        let locator = page.node(element.0)?.locator.clone();
        page.typed.insert(locator, String::new());
        Ok(())
    }

    async fn send_keys(&self, element: &FakeElement, text: &str) -> Result<(), DriverError> {
        let mut page = self.page();
        page.sync()?;
        let locator = page.node(element.0)?.locator.clone();
        page.typed.entry(locator).or_default().push_str(text);
        Ok(())
    }

    async fn navigate(&self, url: &str) -> Result<(), DriverError> {
        let mut page = self.page();
        page.sync()?;
        page.url = url.to_string();
        page.navigations.push(url.to_string());
        Ok(())
    }

    async fn current_url(&self) -> Result<String, DriverError> {
        let mut page = self.page();
        page.sync()?;
        Ok(page.url.clone())
    }

    async fn activate_fallback(&self, element: &FakeElement) -> Result<(), DriverError> {
        let mut page = self.page();
        page.sync()?;
        page.node(element.0)?;
        page.fallback_activations += 1;
        if page.fallback_fails {
            return Err(DriverError::Other("javascript error: fallback failed".into()));
        }
        page.run_effects(element.0);
        Ok(())
    }

    async fn quit(&self) -> Result<(), DriverError> {
        let mut page = self.page();
        page.quits += 1;
        if page.quit_fails {
            return Err(DriverError::Other("session already gone".into()));
        }
        Ok(())
    }
}

/// Short timings so paused-clock tests stay readable.
pub fn fast_config() -> VigilConfig {
    let mut config = VigilConfig::default();
    config.waits = WaitSettings {
        default_timeout_ms: 2000,
        optional_timeout_ms: 1000,
        poll_interval_ms: 100,
        settle_delay_ms: 50,
        count_sync_timeout_ms: 1500,
    };
    config.storefront.base_url = "https://shop.test/".to_string();
    config
}
