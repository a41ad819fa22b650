//! In-memory listing page for exercising the extractor without a browser.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;

use crate::app::{Result, ScraperError};
use crate::config::SelectorConfig;
use crate::session::{BrowserSession, Selector};

/// One rendered list item.
#[derive(Debug, Clone)]
pub struct FakeItem {
    pub title: Option<String>,
    pub href: Option<String>,
    /// `None`: no views block. `Some(None)`: block without a value element.
    pub views: Option<Option<String>>,
    pub tags: Option<Vec<String>>,
}

impl FakeItem {
    /// A well-formed item with a relative link, views and one tag
    pub fn article(name: &str) -> Self {
        Self {
            title: Some(format!("Article {}", name)),
            href: Some(format!("/{}.html", name.to_lowercase())),
            views: Some(Some("1 024".to_string())),
            tags: Some(vec![format!("tag-{}", name.to_lowercase())]),
        }
    }

    pub fn titled(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn without_title(mut self) -> Self {
        self.title = None;
        self
    }

    pub fn without_href(mut self) -> Self {
        self.href = None;
        self
    }

    pub fn views_text(mut self, text: &str) -> Self {
        self.views = Some(Some(text.to_string()));
        self
    }

    pub fn views_block_without_value(mut self) -> Self {
        self.views = Some(None);
        self
    }

    pub fn without_views(mut self) -> Self {
        self.views = None;
        self
    }

    pub fn without_tags(mut self) -> Self {
        self.tags = None;
        self
    }
}

/// What a "show more" click does to the rendered list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickEffect {
    /// Next batch is appended
    Append,
    /// Next batch replaces everything rendered so far
    Replace,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeElement {
    Item(usize),
    Title(usize),
    ViewsBlock(usize),
    ViewsValue(usize),
    Tags(usize),
    Tag(usize, usize),
    LoadMore,
}

#[derive(Debug)]
struct FakeState {
    pending: Vec<Vec<FakeItem>>,
    rendered: Vec<FakeItem>,
    click_effect: ClickEffect,
    /// Keep showing the control after the last batch
    control_after_end: bool,
    /// Clicked batches wait here until enough item queries have passed
    staged: Vec<FakeItem>,
    reveal_after: usize,
    reveal_countdown: usize,
    failing_click: bool,
    item_queries: usize,
    item_query_limit: Option<usize>,
    broken_items: HashSet<usize>,
    navigate_error: Option<String>,
    navigated_to: Vec<String>,
    titles_read: Vec<String>,
    clicks: usize,
    terminations: usize,
}

/// Shared view of the page state, kept by tests after the session is moved
#[derive(Clone)]
pub struct FakeHandle(Arc<Mutex<FakeState>>);

impl FakeHandle {
    fn state(&self) -> MutexGuard<'_, FakeState> {
        self.0.lock().unwrap()
    }

    pub fn clicks(&self) -> usize {
        self.state().clicks
    }

    pub fn terminations(&self) -> usize {
        self.state().terminations
    }

    pub fn navigated_to(&self) -> Vec<String> {
        self.state().navigated_to.clone()
    }

    /// Titles of the items whose title element was read, in order
    pub fn titles_read(&self) -> Vec<String> {
        self.state().titles_read.clone()
    }
}

/// Scripted listing page.
///
/// The first batch is rendered on navigation, each click renders the next one.
pub struct FakeSession {
    state: Arc<Mutex<FakeState>>,
    selectors: SelectorConfig,
}

impl FakeSession {
    pub fn new(batches: Vec<Vec<FakeItem>>) -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeState {
                pending: batches.into_iter().rev().collect(),
                rendered: Vec::new(),
                click_effect: ClickEffect::Append,
                control_after_end: false,
                staged: Vec::new(),
                reveal_after: 0,
                reveal_countdown: 0,
                failing_click: false,
                item_queries: 0,
                item_query_limit: None,
                broken_items: HashSet::new(),
                navigate_error: None,
                navigated_to: Vec::new(),
                titles_read: Vec::new(),
                clicks: 0,
                terminations: 0,
            })),
            selectors: SelectorConfig::default(),
        }
    }

    pub fn handle(&self) -> FakeHandle {
        FakeHandle(self.state.clone())
    }

    pub fn click_effect(self, effect: ClickEffect) -> Self {
        self.lock().click_effect = effect;
        self
    }

    pub fn control_after_end(self) -> Self {
        self.lock().control_after_end = true;
        self
    }

    /// A clicked batch shows up only after `queries` more item queries
    pub fn slow_rendering(self, queries: usize) -> Self {
        self.lock().reveal_after = queries;
        self
    }

    /// The control is found but clicking it fails
    pub fn failing_click(self) -> Self {
        self.lock().failing_click = true;
        self
    }

    /// Item queries after the first `calls` fail with a session error
    pub fn failing_item_query_after(self, calls: usize) -> Self {
        self.lock().item_query_limit = Some(calls);
        self
    }

    /// Queries under the item at `index` fail with a session error
    pub fn broken_item(self, index: usize) -> Self {
        self.lock().broken_items.insert(index);
        self
    }

    pub fn failing_navigation(self, reason: &str) -> Self {
        self.lock().navigate_error = Some(reason.to_string());
        self
    }

    fn lock(&self) -> MutexGuard<'_, FakeState> {
        self.state.lock().unwrap()
    }

    fn check_open(state: &FakeState) -> Result<()> {
        if state.terminations > 0 {
            return Err(ScraperError::Session("session terminated".into()));
        }
        Ok(())
    }

    fn item_index(element: &FakeElement) -> Option<usize> {
        match element {
            FakeElement::Item(i)
            | FakeElement::Title(i)
            | FakeElement::ViewsBlock(i)
            | FakeElement::ViewsValue(i)
            | FakeElement::Tags(i)
            | FakeElement::Tag(i, _) => Some(*i),
            FakeElement::LoadMore => None,
        }
    }
}

#[async_trait]
impl BrowserSession for FakeSession {
    type Element = FakeElement;

    async fn navigate(&mut self, url: &str) -> Result<()> {
        let mut state = self.lock();
        Self::check_open(&state)?;
        state.navigated_to.push(url.to_string());
        if let Some(reason) = state.navigate_error.clone() {
            return Err(ScraperError::Navigation {
                url: url.to_string(),
                reason,
            });
        }
        if let Some(first) = state.pending.pop() {
            state.rendered = first;
        }
        Ok(())
    }

    async fn find_all(&self, selector: &Selector) -> Result<Vec<FakeElement>> {
        let mut state = self.lock();
        Self::check_open(&state)?;
        if *selector == self.selectors.item {
            if state.item_query_limit.is_some_and(|limit| state.item_queries >= limit) {
                return Err(ScraperError::Session("target closed".into()));
            }
            state.item_queries += 1;
            if !state.staged.is_empty() {
                if state.reveal_countdown == 0 {
                    let staged = std::mem::take(&mut state.staged);
                    state.rendered.extend(staged);
                } else {
                    state.reveal_countdown -= 1;
                }
            }
            return Ok((0..state.rendered.len()).map(FakeElement::Item).collect());
        }
        if *selector == self.selectors.load_more {
            let visible = !state.pending.is_empty()
                || !state.staged.is_empty()
                || state.control_after_end;
            return Ok(if visible { vec![FakeElement::LoadMore] } else { Vec::new() });
        }
        Ok(Vec::new())
    }

    async fn find_one_in(
        &self,
        parent: &FakeElement,
        selector: &Selector,
    ) -> Result<Option<FakeElement>> {
        Ok(self.find_all_in(parent, selector).await?.into_iter().next())
    }

    async fn find_all_in(
        &self,
        parent: &FakeElement,
        selector: &Selector,
    ) -> Result<Vec<FakeElement>> {
        let state = self.lock();
        Self::check_open(&state)?;
        let Some(index) = Self::item_index(parent) else {
            return Ok(Vec::new());
        };
        if state.broken_items.contains(&index) {
            return Err(ScraperError::Session(format!("node {} detached", index)));
        }
        let Some(item) = state.rendered.get(index) else {
            return Err(ScraperError::Session(format!("stale element {}", index)));
        };

        let s = &self.selectors;
        let found = match parent {
            FakeElement::Item(i) if *selector == s.title => {
                item.title.as_ref().map(|_| vec![FakeElement::Title(*i)])
            }
            FakeElement::Item(i) if *selector == s.views => {
                item.views.as_ref().map(|_| vec![FakeElement::ViewsBlock(*i)])
            }
            FakeElement::Item(i) if *selector == s.tags => {
                item.tags.as_ref().map(|_| vec![FakeElement::Tags(*i)])
            }
            FakeElement::ViewsBlock(i) if *selector == s.views_value => item
                .views
                .as_ref()
                .and_then(|v| v.as_ref())
                .map(|_| vec![FakeElement::ViewsValue(*i)]),
            FakeElement::Tags(i) if *selector == s.tag => item
                .tags
                .as_ref()
                .map(|tags| (0..tags.len()).map(|t| FakeElement::Tag(*i, t)).collect()),
            _ => None,
        };
        Ok(found.unwrap_or_default())
    }

    async fn read_text(&self, element: &FakeElement) -> Result<Option<String>> {
        let mut state = self.lock();
        Self::check_open(&state)?;
        let Some(index) = Self::item_index(element) else {
            return Ok(Some("Show more".to_string()));
        };
        let Some(item) = state.rendered.get(index).cloned() else {
            return Err(ScraperError::Session(format!("stale element {}", index)));
        };
        let text = match element {
            FakeElement::Title(_) => {
                let title = item.title.clone();
                if let Some(ref t) = title {
                    state.titles_read.push(t.clone());
                }
                title
            }
            FakeElement::ViewsValue(_) => item.views.clone().flatten(),
            FakeElement::Tag(_, t) => item.tags.as_ref().and_then(|tags| tags.get(*t).cloned()),
            _ => None,
        };
        Ok(text)
    }

    async fn read_attribute(&self, element: &FakeElement, name: &str) -> Result<Option<String>> {
        let state = self.lock();
        Self::check_open(&state)?;
        match element {
            FakeElement::Title(i) if name == "href" => {
                Ok(state.rendered.get(*i).and_then(|item| item.href.clone()))
            }
            _ => Ok(None),
        }
    }

    async fn script_click(&self, element: &FakeElement) -> Result<()> {
        let mut state = self.lock();
        Self::check_open(&state)?;
        if *element != FakeElement::LoadMore {
            return Ok(());
        }
        state.clicks += 1;
        if state.failing_click {
            return Err(ScraperError::Session("element is not clickable".into()));
        }
        if let Some(batch) = state.pending.pop() {
            if state.reveal_after > 0 {
                state.reveal_countdown = state.reveal_after;
                state.staged.extend(batch);
                return Ok(());
            }
            match state.click_effect {
                ClickEffect::Append => state.rendered.extend(batch),
                ClickEffect::Replace => state.rendered = batch,
            }
        }
        Ok(())
    }

    async fn terminate(&mut self) -> Result<()> {
        self.lock().terminations += 1;
        Ok(())
    }
}
