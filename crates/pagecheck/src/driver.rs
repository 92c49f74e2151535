//! PageDriver - abstract browser automation trait
//!
//! Every check in a suite goes through this trait, so the runner works the
//! same against a real Chromium over CDP ([`crate::ChromiumDriver`], feature
//! `browser`) and against the in-memory [`crate::StaticDriver`].
//!
//! Element accessors take an [`ElementPath`] and resolve it again on every
//! call. A path that no longer resolves yields
//! [`crate::PagecheckError::ElementNotFound`].

use crate::locator::{ElementPath, Locator};
use crate::result::PagecheckResult;
use async_trait::async_trait;

/// Browser session operations used by the assertion runner
#[async_trait]
pub trait PageDriver: Send {
    /// Navigate to a URL and wait for the page to load
    async fn navigate(&mut self, url: &str) -> PagecheckResult<()>;

    /// Current document title
    async fn title(&mut self) -> PagecheckResult<String>;

    /// Current page URL
    async fn current_url(&mut self) -> PagecheckResult<String>;

    /// Count the matches of `locator`, searching the whole document or the
    /// descendants of `scope`
    async fn find_elements(
        &mut self,
        scope: Option<&ElementPath>,
        locator: &Locator,
    ) -> PagecheckResult<usize>;

    /// Rendered text of a displayed element, trimmed; empty when hidden
    async fn text(&mut self, element: &ElementPath) -> PagecheckResult<String>;

    /// A DOM property rendered as a string (`None` when undefined)
    async fn property(
        &mut self,
        element: &ElementPath,
        name: &str,
    ) -> PagecheckResult<Option<String>>;

    /// Attribute lookup: the property value when the element has one
    /// (so `src` and `href` are absolute), the raw attribute otherwise
    async fn attribute(
        &mut self,
        element: &ElementPath,
        name: &str,
    ) -> PagecheckResult<Option<String>>;

    /// Whether the element is rendered and visible
    async fn is_displayed(&mut self, element: &ElementPath) -> PagecheckResult<bool>;

    /// Whether an option, checkbox or radio is selected
    async fn is_selected(&mut self, element: &ElementPath) -> PagecheckResult<bool>;

    /// Click the element
    async fn click(&mut self, element: &ElementPath) -> PagecheckResult<()>;

    /// Move the pointer over the element, then click
    async fn hover_click(&mut self, element: &ElementPath) -> PagecheckResult<()>;

    /// PNG screenshot of the viewport; empty when unsupported
    async fn screenshot(&mut self) -> PagecheckResult<Vec<u8>> {
        Ok(Vec::new())
    }

    /// Release the browser session
    async fn quit(&mut self) -> PagecheckResult<()>;
}
