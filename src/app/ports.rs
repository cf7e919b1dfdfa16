use crate::error::Result;
use async_trait::async_trait;

/// Narrows a query to the `index`-th element matching `selector`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Within<'a> {
    pub selector: &'a str,
    pub index: usize,
}

impl<'a> Within<'a> {
    pub fn nth(selector: &'a str, index: usize) -> Self {
        Self { selector, index }
    }
}

// Scraper-side ports
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Load `url` and hand back a session holding the page.
    async fn navigate(&self, url: &str) -> Result<Box<dyn PageSession>>;
}

/// An open page. Every session must be passed to `release` once the caller
/// is done with it, whether or not extraction succeeded.
#[async_trait]
pub trait PageSession: Send + Sync {
    fn url(&self) -> &str;

    /// Number of elements matching `selector`
    async fn count(&self, selector: &str) -> Result<usize>;

    /// Visible text of the first match. Fails on zero matches.
    async fn extract_text(&self, within: Option<Within<'_>>, selector: &str) -> Result<String>;

    /// Value of `attribute` on the first match. Fails on zero matches or when
    /// the attribute is absent.
    async fn extract_attribute(
        &self,
        within: Option<Within<'_>>,
        selector: &str,
        attribute: &str,
    ) -> Result<String>;

    /// Finds the first element matching `label_selector` whose visible text is
    /// exactly `label` and returns the text of its next sibling element.
    async fn extract_sibling_text(&self, label_selector: &str, label: &str) -> Result<String>;

    async fn release(self: Box<Self>);
}
