//! StaticDriver - an in-memory browser
//!
//! Serves a single [`Document`] for every URL. Navigation reloads the pristine
//! document, so clicks in one test case never leak into the next. Element
//! reads follow browser semantics closely enough for the homepage suite:
//! text is empty for hidden elements, `src`/`href` are resolved against the
//! current URL, and clicks on hidden elements are rejected.

pub mod dom;
mod query;

pub use dom::{Document, Node, NodeId};

use crate::driver::PageDriver;
use crate::locator::{ElementPath, Locator};
use crate::result::{PagecheckError, PagecheckResult};
use async_trait::async_trait;
use tracing::debug;
use url::Url;

/// Driver backed by an in-memory DOM
#[derive(Debug, Clone)]
pub struct StaticDriver {
    pristine: Document,
    live: Document,
    url: String,
    visits: Vec<String>,
    clicks: Vec<String>,
    navigation_error: Option<String>,
    screenshot: Vec<u8>,
    closed: bool,
}

impl StaticDriver {
    /// Create a driver serving `document`
    #[must_use]
    pub fn new(document: Document) -> Self {
        Self {
            live: document.clone(),
            pristine: document,
            url: String::from("about:blank"),
            visits: Vec::new(),
            clicks: Vec::new(),
            navigation_error: None,
            screenshot: Vec::new(),
            closed: false,
        }
    }

    /// Make every navigation fail with `message`
    #[must_use]
    pub fn with_navigation_error(mut self, message: impl Into<String>) -> Self {
        self.navigation_error = Some(message.into());
        self
    }

    /// Bytes returned by every screenshot
    #[must_use]
    pub fn with_screenshot(mut self, png: impl Into<Vec<u8>>) -> Self {
        self.screenshot = png.into();
        self
    }

    /// URLs navigated to, in order
    #[must_use]
    pub fn visits(&self) -> &[String] {
        &self.visits
    }

    /// Descriptions of clicked elements, in order
    #[must_use]
    pub fn clicks(&self) -> &[String] {
        &self.clicks
    }

    /// Whether `quit` was called
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// The document as currently modified by clicks
    #[must_use]
    pub const fn document(&self) -> &Document {
        &self.live
    }

    /// Resolve a path to a node id, step by step
    fn resolve(&self, path: &ElementPath) -> PagecheckResult<NodeId> {
        let mut current: Option<NodeId> = None;
        for step in path.steps() {
            let matches = query::find_all(&self.live, current.as_deref(), &step.locator)?;
            current = Some(
                matches
                    .into_iter()
                    .nth(step.index)
                    .ok_or_else(|| PagecheckError::not_found(path.to_string()))?,
            );
        }
        current.ok_or_else(|| PagecheckError::not_found(path.to_string()))
    }

    fn node(&self, path: &ElementPath) -> PagecheckResult<(NodeId, &Node)> {
        let id = self.resolve(path)?;
        let node = self
            .live
            .get(&id)
            .ok_or_else(|| PagecheckError::not_found(path.to_string()))?;
        Ok((id, node))
    }

    /// Resolve a URL-valued attribute against the current page
    fn absolute(&self, value: &str) -> String {
        Url::parse(&self.url)
            .and_then(|base| base.join(value))
            .map_or_else(|_| value.to_string(), String::from)
    }

    fn click_path(&mut self, path: &ElementPath) -> PagecheckResult<()> {
        let id = self.resolve(path)?;
        if !self.live.is_displayed(&id) {
            return Err(PagecheckError::Input {
                message: format!("element not interactable: {path}"),
            });
        }
        self.live.click(&id);
        self.clicks.push(path.to_string());
        Ok(())
    }
}

#[async_trait]
impl PageDriver for StaticDriver {
    async fn navigate(&mut self, url: &str) -> PagecheckResult<()> {
        debug!(url, "static navigate");
        if let Some(message) = &self.navigation_error {
            return Err(PagecheckError::Navigation {
                url: url.to_string(),
                message: message.clone(),
            });
        }
        self.live = self.pristine.clone();
        self.url = url.to_string();
        self.visits.push(url.to_string());
        Ok(())
    }

    async fn title(&mut self) -> PagecheckResult<String> {
        Ok(self.live.title().to_string())
    }

    async fn current_url(&mut self) -> PagecheckResult<String> {
        Ok(self.url.clone())
    }

    async fn find_elements(
        &mut self,
        scope: Option<&ElementPath>,
        locator: &Locator,
    ) -> PagecheckResult<usize> {
        let scope_id = scope.map(|path| self.resolve(path)).transpose()?;
        Ok(query::find_all(&self.live, scope_id.as_deref(), locator)?.len())
    }

    async fn text(&mut self, element: &ElementPath) -> PagecheckResult<String> {
        let (id, node) = self.node(element)?;
        if self.live.is_displayed(&id) {
            Ok(node.render_text(false))
        } else {
            Ok(String::new())
        }
    }

    async fn property(
        &mut self,
        element: &ElementPath,
        name: &str,
    ) -> PagecheckResult<Option<String>> {
        let (_, node) = self.node(element)?;
        let value = match name {
            "innerText" => Some(node.render_text(true)),
            "textContent" => Some(node.text_content()),
            "className" => Some(node.get_attr("class").unwrap_or_default().to_string()),
            "tagName" => Some(node.tag_name().to_ascii_uppercase()),
            "id" => Some(node.get_attr("id").unwrap_or_default().to_string()),
            "checked" | "selected" => Some(node.is_selected().to_string()),
            "src" | "href" => node.get_attr(name).map(|v| self.absolute(v)),
            _ => None,
        };
        Ok(value)
    }

    async fn attribute(
        &mut self,
        element: &ElementPath,
        name: &str,
    ) -> PagecheckResult<Option<String>> {
        let (_, node) = self.node(element)?;
        Ok(match name {
            "src" | "href" => node.get_attr(name).map(|v| self.absolute(v)),
            _ => node.get_attr(name).map(str::to_string),
        })
    }

    async fn is_displayed(&mut self, element: &ElementPath) -> PagecheckResult<bool> {
        let id = self.resolve(element)?;
        Ok(self.live.is_displayed(&id))
    }

    async fn is_selected(&mut self, element: &ElementPath) -> PagecheckResult<bool> {
        let (_, node) = self.node(element)?;
        Ok(node.is_selected())
    }

    async fn click(&mut self, element: &ElementPath) -> PagecheckResult<()> {
        self.click_path(element)
    }

    async fn hover_click(&mut self, element: &ElementPath) -> PagecheckResult<()> {
        self.click_path(element)
    }

    async fn screenshot(&mut self) -> PagecheckResult<Vec<u8>> {
        Ok(self.screenshot.clone())
    }

    async fn quit(&mut self) -> PagecheckResult<()> {
        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> Document {
        Document::with_body(
            "8by8 Challenge",
            [
                Node::new("img").attr("alt", "logo").attr("src", "/_next/logo.svg"),
                Node::new("label").class("outer").reveals("inner"),
                Node::new("div")
                    .id("inner")
                    .class("inner")
                    .hidden()
                    .child(Node::new("li").text("Sign in")),
                Node::new("a").attr("href", "/why8by8").text("See why"),
            ],
        )
    }

    async fn driver() -> StaticDriver {
        let mut driver = StaticDriver::new(page());
        driver.navigate("http://localhost:3000/?x=1").await.unwrap();
        driver
    }

    #[tokio::test]
    async fn test_attribute_resolves_src() {
        let mut d = driver().await;
        let img = ElementPath::root(Locator::tag("img"), 0);
        let src = d.attribute(&img, "src").await.unwrap();
        assert_eq!(src.as_deref(), Some("http://localhost:3000/_next/logo.svg"));
    }

    #[tokio::test]
    async fn test_hidden_text_is_empty_but_inner_text_is_not() {
        let mut d = driver().await;
        let li = ElementPath::root(Locator::class_name("inner"), 0).child(Locator::tag("li"), 0);
        assert_eq!(d.text(&li).await.unwrap(), "");
        assert_eq!(
            d.property(&li, "innerText").await.unwrap().as_deref(),
            Some("Sign in")
        );
    }

    #[tokio::test]
    async fn test_click_reveals_and_navigation_resets() {
        let mut d = driver().await;
        let outer = ElementPath::root(Locator::class_name("outer"), 0);
        let inner = ElementPath::root(Locator::class_name("inner"), 0);
        assert!(!d.is_displayed(&inner).await.unwrap());
        d.hover_click(&outer).await.unwrap();
        assert!(d.is_displayed(&inner).await.unwrap());
        assert_eq!(d.clicks().len(), 1);

        d.navigate("http://localhost:3000/").await.unwrap();
        assert!(!d.is_displayed(&inner).await.unwrap());
        assert_eq!(d.visits().len(), 2);
    }

    #[tokio::test]
    async fn test_hidden_click_rejected() {
        let mut d = driver().await;
        let li = ElementPath::root(Locator::tag("li"), 0);
        let err = d.click(&li).await.unwrap_err();
        assert!(matches!(err, PagecheckError::Input { .. }));
    }

    #[tokio::test]
    async fn test_missing_step_is_not_found() {
        let mut d = driver().await;
        let path = ElementPath::root(Locator::tag("section"), 2);
        let err = d.text(&path).await.unwrap_err();
        assert_eq!(err.to_string(), "Element not found: tag name `section` [2]");
    }

    #[tokio::test]
    async fn test_scoped_find() {
        let mut d = driver().await;
        let inner = ElementPath::root(Locator::class_name("inner"), 0);
        assert_eq!(
            d.find_elements(Some(&inner), &Locator::tag("li")).await.unwrap(),
            1
        );
        assert_eq!(d.find_elements(None, &Locator::tag("li")).await.unwrap(), 1);
        assert_eq!(d.find_elements(None, &Locator::tag("h1")).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_navigation_error() {
        let mut d = StaticDriver::new(page()).with_navigation_error("connection refused");
        let err = d.navigate("http://localhost:3000").await.unwrap_err();
        assert!(err.to_string().contains("connection refused"));
        assert!(!err.is_check_failure());
    }

    #[tokio::test]
    async fn test_quit() {
        let mut d = driver().await;
        d.quit().await.unwrap();
        assert!(d.is_closed());
        assert_eq!(d.title().await.unwrap(), "8by8 Challenge");
        assert_eq!(d.current_url().await.unwrap(), "http://localhost:3000/?x=1");
    }
}
