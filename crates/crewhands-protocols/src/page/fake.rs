//! In-memory page double.
//!
//! Serves canned HTML per URL prefix and emulates just enough behaviour for
//! adapters and the form filler: clicks on checkboxes, links, submit controls
//! and "load more" steps, field values and file uploads. Element handles are
//! document-order indices into the current HTML.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use scraper::{ElementRef, Html, Selector};

use super::{ElementHandle, Page, SessionFactory, SessionOptions};
use crate::error::PageError;

/// Marker attribute values understood by [`FakePage::click`].
const CLICK_ATTR: &str = "data-fake-click";

#[derive(Debug, Clone)]
enum AfterSubmit {
    Html(String),
    Redirect(String),
}

#[derive(Debug, Clone, Default)]
struct Route {
    /// Successive documents; "load more" clicks and scrolls advance through them.
    steps: Vec<String>,
    after_submit: Option<AfterSubmit>,
}

#[derive(Debug, Default)]
struct State {
    routes: Vec<(String, Route)>,
    failing: Vec<String>,
    current_url: String,
    html: String,
    route: Option<usize>,
    step: usize,
    values: HashMap<usize, String>,
    checked: HashMap<usize, bool>,
    uploads: Vec<PathBuf>,
    visited: Vec<String>,
    submits: usize,
    snapshots: usize,
    closes: usize,
    closed: bool,
}

impl State {
    fn ensure_open(&self) -> Result<(), PageError> {
        if self.closed {
            Err(PageError::Closed)
        } else {
            Ok(())
        }
    }

    fn find_route(&self, url: &str) -> Option<usize> {
        self.routes
            .iter()
            .enumerate()
            .filter(|(_, (prefix, _))| url.starts_with(prefix.as_str()))
            .max_by_key(|(_, (prefix, _))| prefix.len())
            .map(|(i, _)| i)
    }

    fn navigate(&mut self, url: &str) -> Result<(), PageError> {
        self.ensure_open()?;
        self.visited.push(url.to_string());
        if self.failing.iter().any(|p| url.starts_with(p.as_str())) {
            return Err(PageError::Navigation(format!("net::ERR_CONNECTION_RESET at {}", url)));
        }
        let index = self
            .find_route(url)
            .ok_or_else(|| PageError::Navigation(format!("net::ERR_NAME_NOT_RESOLVED at {}", url)))?;
        self.current_url = url.to_string();
        self.route = Some(index);
        self.step = 0;
        self.html = self.routes[index].1.steps.first().cloned().unwrap_or_default();
        self.values.clear();
        self.checked.clear();
        Ok(())
    }

    fn advance_step(&mut self) -> bool {
        let Some(index) = self.route else {
            return false;
        };
        let steps = &self.routes[index].1.steps;
        if self.step + 1 < steps.len() {
            self.step += 1;
            self.html = steps[self.step].clone();
            true
        } else {
            false
        }
    }

    fn submit(&mut self) -> Result<(), PageError> {
        self.submits += 1;
        let after = self
            .route
            .and_then(|index| self.routes[index].1.after_submit.clone());
        match after {
            Some(AfterSubmit::Html(html)) => {
                self.html = html;
                self.values.clear();
                self.checked.clear();
                Ok(())
            }
            Some(AfterSubmit::Redirect(url)) => self.navigate(&url),
            None => Ok(()),
        }
    }

    fn resolve(&self, href: &str) -> Option<String> {
        if href.starts_with("http://") || href.starts_with("https://") {
            return Some(href.to_string());
        }
        if href.starts_with('/') {
            let scheme_end = self.current_url.find("://")? + 3;
            let host_end = self.current_url[scheme_end..]
                .find('/')
                .map(|i| i + scheme_end)
                .unwrap_or(self.current_url.len());
            return Some(format!("{}{}", &self.current_url[..host_end], href));
        }
        None
    }
}

fn parse_selector(selector: &str) -> Result<Selector, PageError> {
    Selector::parse(selector).map_err(|e| PageError::InvalidSelector(format!("{}: {}", selector, e)))
}

fn elements(doc: &Html) -> Vec<ElementRef<'_>> {
    doc.tree.root().descendants().filter_map(ElementRef::wrap).collect()
}

fn element_at(doc: &Html, handle: ElementHandle) -> Result<ElementRef<'_>, PageError> {
    usize::try_from(handle.0)
        .ok()
        .and_then(|i| elements(doc).into_iter().nth(i))
        .ok_or(PageError::StaleElement(handle.0))
}

fn index_of(handle: ElementHandle) -> usize {
    usize::try_from(handle.0).unwrap_or(usize::MAX)
}

/// Details of an element needed by click and fill, read while the document
/// is parsed.
struct ElementInfo {
    tag: String,
    input_type: Option<String>,
    href: Option<String>,
    click: Option<String>,
}

/// In-memory [`Page`] implementation. Clones share state.
#[derive(Debug, Clone, Default)]
pub struct FakePage {
    state: Arc<Mutex<State>>,
}

impl FakePage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `html` for URLs starting with `prefix`.
    pub fn route(self, prefix: impl Into<String>, html: impl Into<String>) -> Self {
        self.route_steps(prefix, vec![html.into()])
    }

    /// Serve successive documents for one prefix.
    pub fn route_steps(self, prefix: impl Into<String>, steps: Vec<String>) -> Self {
        let prefix = prefix.into();
        {
            let mut state = self.state.lock();
            state.routes.retain(|(p, _)| *p != prefix);
            state.routes.push((
                prefix,
                Route {
                    steps,
                    after_submit: None,
                },
            ));
        }
        self
    }

    /// Replace the document with `html` when a submit control is clicked.
    pub fn on_submit(self, prefix: &str, html: impl Into<String>) -> Self {
        self.set_after_submit(prefix, AfterSubmit::Html(html.into()));
        self
    }

    /// Navigate to `url` when a submit control is clicked.
    pub fn redirect_on_submit(self, prefix: &str, url: impl Into<String>) -> Self {
        self.set_after_submit(prefix, AfterSubmit::Redirect(url.into()));
        self
    }

    /// Fail navigation to URLs starting with `prefix`.
    pub fn fail_route(self, prefix: impl Into<String>) -> Self {
        self.state.lock().failing.push(prefix.into());
        self
    }

    fn set_after_submit(&self, prefix: &str, after: AfterSubmit) {
        let mut state = self.state.lock();
        if let Some((_, route)) = state.routes.iter_mut().find(|(p, _)| p == prefix) {
            route.after_submit = Some(after);
        } else {
            state.routes.push((
                prefix.to_string(),
                Route {
                    steps: vec![String::new()],
                    after_submit: Some(after),
                },
            ));
        }
    }

    /// A fresh page with the same routes and no navigation history.
    pub fn fork(&self) -> FakePage {
        let state = self.state.lock();
        FakePage {
            state: Arc::new(Mutex::new(State {
                routes: state.routes.clone(),
                failing: state.failing.clone(),
                ..Default::default()
            })),
        }
    }

    /// Value filled into the first element matching `selector`.
    pub fn value_of(&self, selector: &str) -> Option<String> {
        let state = self.state.lock();
        let selector = Selector::parse(selector).ok()?;
        let doc = Html::parse_document(&state.html);
        let index = elements(&doc).iter().position(|el| selector.matches(el))?;
        state.values.get(&index).cloned()
    }

    /// Checked state of the first element matching `selector`.
    pub fn checked_state(&self, selector: &str) -> Option<bool> {
        let state = self.state.lock();
        let selector = Selector::parse(selector).ok()?;
        let doc = Html::parse_document(&state.html);
        let all = elements(&doc);
        let index = all.iter().position(|el| selector.matches(el))?;
        Some(
            state
                .checked
                .get(&index)
                .copied()
                .unwrap_or_else(|| all[index].value().attr("checked").is_some()),
        )
    }

    pub fn uploads(&self) -> Vec<PathBuf> {
        self.state.lock().uploads.clone()
    }

    pub fn visited(&self) -> Vec<String> {
        self.state.lock().visited.clone()
    }

    pub fn submit_count(&self) -> usize {
        self.state.lock().submits
    }

    pub fn snapshot_count(&self) -> usize {
        self.state.lock().snapshots
    }

    pub fn close_count(&self) -> usize {
        self.state.lock().closes
    }

    pub fn is_closed(&self) -> bool {
        self.state.lock().closed
    }

    fn with_element<T>(
        &self,
        handle: ElementHandle,
        f: impl FnOnce(&State, ElementRef<'_>) -> T,
    ) -> Result<T, PageError> {
        let state = self.state.lock();
        state.ensure_open()?;
        let doc = Html::parse_document(&state.html);
        let el = element_at(&doc, handle)?;
        Ok(f(&state, el))
    }

    fn info(&self, handle: ElementHandle) -> Result<ElementInfo, PageError> {
        self.with_element(handle, |_, el| {
            let value = el.value();
            ElementInfo {
                tag: value.name().to_string(),
                input_type: value.attr("type").map(|t| t.to_lowercase()),
                href: value.attr("href").map(str::to_string),
                click: value.attr(CLICK_ATTR).map(str::to_string),
            }
        })
    }
}

#[async_trait]
impl Page for FakePage {
    async fn goto(&self, url: &str) -> Result<(), PageError> {
        self.state.lock().navigate(url)
    }

    async fn current_url(&self) -> Result<String, PageError> {
        let state = self.state.lock();
        state.ensure_open()?;
        Ok(state.current_url.clone())
    }

    async fn content(&self) -> Result<String, PageError> {
        let state = self.state.lock();
        state.ensure_open()?;
        Ok(state.html.clone())
    }

    async fn query(&self, selector: &str) -> Result<Option<ElementHandle>, PageError> {
        Ok(self.query_all(selector).await?.into_iter().next())
    }

    async fn query_all(&self, selector: &str) -> Result<Vec<ElementHandle>, PageError> {
        let selector = parse_selector(selector)?;
        let state = self.state.lock();
        state.ensure_open()?;
        let doc = Html::parse_document(&state.html);
        Ok(elements(&doc)
            .iter()
            .enumerate()
            .filter(|(_, el)| selector.matches(el))
            .map(|(i, _)| ElementHandle(i as i64))
            .collect())
    }

    async fn text(&self, element: ElementHandle) -> Result<String, PageError> {
        self.with_element(element, |_, el| el.text().collect::<String>())
    }

    async fn attribute(
        &self,
        element: ElementHandle,
        name: &str,
    ) -> Result<Option<String>, PageError> {
        self.with_element(element, |state, el| {
            if name == "value" {
                if let Some(value) = state.values.get(&index_of(element)) {
                    return Some(value.clone());
                }
            }
            el.value().attr(name).map(str::to_string)
        })
    }

    async fn is_checked(&self, element: ElementHandle) -> Result<bool, PageError> {
        self.with_element(element, |state, el| {
            state
                .checked
                .get(&index_of(element))
                .copied()
                .unwrap_or_else(|| el.value().attr("checked").is_some())
        })
    }

    async fn is_visible(&self, element: ElementHandle) -> Result<bool, PageError> {
        self.with_element(element, |_, el| {
            let hidden = |e: &ElementRef<'_>| {
                e.value().attr("hidden").is_some()
                    || e.value()
                        .attr("style")
                        .is_some_and(|s| s.replace(' ', "").contains("display:none"))
            };
            !hidden(&el) && !el.ancestors().filter_map(ElementRef::wrap).any(|a| hidden(&a))
        })
    }

    async fn is_disabled(&self, element: ElementHandle) -> Result<bool, PageError> {
        self.with_element(element, |_, el| {
            el.value().attr("disabled").is_some()
                || el.value().classes().any(|c| c == "disabled")
                || el.value().attr("aria-disabled") == Some("true")
        })
    }

    async fn fill(&self, element: ElementHandle, value: &str) -> Result<(), PageError> {
        let info = self.info(element)?;
        if !matches!(info.tag.as_str(), "input" | "textarea" | "select") {
            return Err(PageError::Other(format!("<{}> is not fillable", info.tag)));
        }
        self.state
            .lock()
            .values
            .insert(index_of(element), value.to_string());
        Ok(())
    }

    async fn click(&self, element: ElementHandle) -> Result<(), PageError> {
        let info = self.info(element)?;
        let mut state = self.state.lock();
        match info.click.as_deref() {
            Some("fail") => return Err(PageError::Other("click intercepted".to_string())),
            Some("next-step") => {
                state.advance_step();
                return Ok(());
            }
            Some("submit") => return state.submit(),
            _ => {}
        }
        if info.tag == "input" && info.input_type.as_deref() == Some("checkbox") {
            let index = index_of(element);
            let doc = Html::parse_document(&state.html);
            let initially = element_at(&doc, element)?.value().attr("checked").is_some();
            drop(doc);
            let current = state.checked.get(&index).copied().unwrap_or(initially);
            state.checked.insert(index, !current);
            return Ok(());
        }
        let submits = match info.tag.as_str() {
            "button" => matches!(info.input_type.as_deref(), None | Some("submit")),
            "input" => info.input_type.as_deref() == Some("submit"),
            _ => false,
        };
        if submits {
            return state.submit();
        }
        if let Some(target) = info.href.as_deref().and_then(|href| state.resolve(href)) {
            return state.navigate(&target);
        }
        Ok(())
    }

    async fn upload(&self, element: ElementHandle, path: &Path) -> Result<(), PageError> {
        let (is_file, fails) = self.with_element(element, |_, el| {
            (
                el.value().name() == "input" && el.value().attr("type") == Some("file"),
                el.value().attr("data-fake-upload") == Some("fail"),
            )
        })?;
        if !is_file {
            return Err(PageError::Other("element is not a file input".to_string()));
        }
        if fails {
            return Err(PageError::Other(format!("upload rejected: {}", path.display())));
        }
        self.state.lock().uploads.push(path.to_path_buf());
        Ok(())
    }

    async fn scroll_to_bottom(&self) -> Result<(), PageError> {
        let mut state = self.state.lock();
        state.ensure_open()?;
        state.advance_step();
        Ok(())
    }

    async fn scroll_height(&self) -> Result<u64, PageError> {
        let state = self.state.lock();
        state.ensure_open()?;
        Ok(state.html.len() as u64)
    }

    async fn snapshot(&self) -> Result<Vec<u8>, PageError> {
        let mut state = self.state.lock();
        state.ensure_open()?;
        state.snapshots += 1;
        Ok(b"\x89PNG\r\n\x1a\nfake".to_vec())
    }

    async fn close(&self) -> Result<(), PageError> {
        let mut state = self.state.lock();
        state.closes += 1;
        state.closed = true;
        Ok(())
    }
}

/// Hands out forks of a blueprint page, or fails every open.
#[derive(Debug, Clone, Default)]
pub struct FakeSessionFactory {
    blueprint: FakePage,
    fail: bool,
    opened: Arc<Mutex<Vec<(SessionOptions, FakePage)>>>,
}

impl FakeSessionFactory {
    pub fn new(blueprint: FakePage) -> Self {
        Self {
            blueprint,
            fail: false,
            opened: Arc::default(),
        }
    }

    /// A factory whose every `open` fails.
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    /// Pages opened so far, with the options they were opened with.
    pub fn opened(&self) -> Vec<(SessionOptions, FakePage)> {
        self.opened.lock().clone()
    }
}

#[async_trait]
impl SessionFactory for FakeSessionFactory {
    async fn open(&self, options: SessionOptions) -> Result<Box<dyn Page>, PageError> {
        if self.fail {
            return Err(PageError::SessionUnavailable("browser failed to launch".to_string()));
        }
        let page = self.blueprint.fork();
        self.opened.lock().push((options, page.clone()));
        Ok(Box::new(page))
    }
}

#[cfg(test)]
#[path = "fake_tests.rs"]
mod tests;
