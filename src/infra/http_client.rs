use crate::app::ports::{PageFetcher, PageSession, Within};
use crate::config::HttpConfig;
use crate::error::{Result, ScraperError};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::debug;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("static regex"));

/// Fetches pages over plain HTTP and answers queries against the returned
/// markup. The listing is served pre-rendered, so no browser is involved.
pub struct ReqwestPageFetcher {
    client: reqwest::Client,
    timeout: Duration,
}

impl ReqwestPageFetcher {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let timeout = Duration::from_secs(config.timeout_seconds);
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(timeout)
            .build()?;
        Ok(Self { client, timeout })
    }
}

#[async_trait]
impl PageFetcher for ReqwestPageFetcher {
    async fn navigate(&self, url: &str) -> Result<Box<dyn PageSession>> {
        debug!("GET {}", url);
        let resp = self.client.get(url).send().await.map_err(|e| self.classify(url, e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ScraperError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(|e| self.classify(url, e))?;
        debug!("Loaded {} ({} bytes)", url, body.len());
        Ok(Box::new(HtmlPage::new(url, body)))
    }
}

impl ReqwestPageFetcher {
    fn classify(&self, url: &str, e: reqwest::Error) -> ScraperError {
        if e.is_timeout() {
            ScraperError::Timeout {
                url: url.to_string(),
                seconds: self.timeout.as_secs(),
            }
        } else {
            ScraperError::Http(e)
        }
    }
}

/// A loaded document. `scraper::Html` can't be held across an await, so the
/// markup is kept as text. Scoped queries go through a per-selector cache of
/// container fragments: the full document is parsed once per container
/// selector and each query only parses its own container.
pub struct HtmlPage {
    url: String,
    body: String,
    containers: Mutex<HashMap<String, Arc<Vec<String>>>>,
    full_parses: AtomicUsize,
}

impl HtmlPage {
    pub fn new(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            body: body.into(),
            containers: Mutex::new(HashMap::new()),
            full_parses: AtomicUsize::new(0),
        }
    }

    pub fn count_matches(&self, selector: &str) -> Result<usize> {
        Ok(self.containers(selector)?.len())
    }

    pub fn text_of(&self, within: Option<Within<'_>>, selector: &str) -> Result<String> {
        let target = parse_selector(selector)?;
        let scope = self.scope_markup(within, selector)?;
        let element = scope.select(&target).next().ok_or_else(|| missing(within, selector))?;
        Ok(visible_text(&element))
    }

    pub fn attribute_of(&self, within: Option<Within<'_>>, selector: &str, attribute: &str) -> Result<String> {
        let target = parse_selector(selector)?;
        let scope = self.scope_markup(within, selector)?;
        let element = scope.select(&target).next().ok_or_else(|| missing(within, selector))?;
        element
            .value()
            .attr(attribute)
            .map(str::to_string)
            .ok_or_else(|| ScraperError::MissingAttribute {
                selector: selector.to_string(),
                attribute: attribute.to_string(),
            })
    }

    pub fn sibling_text_of(&self, label_selector: &str, label: &str) -> Result<String> {
        let selector = parse_selector(label_selector)?;
        let document = self.parse_document();

        let header = document
            .select(&selector)
            .find(|el| visible_text(el) == label)
            .ok_or_else(|| ScraperError::LabelNotFound {
                label: label.to_string(),
            })?;

        // The value cell is the next element, not the next node (skip whitespace text)
        let value = header
            .next_siblings()
            .find_map(ElementRef::wrap)
            .map(|cell| visible_text(&cell))
            .ok_or_else(|| ScraperError::MissingElement {
                selector: format!("{} + *", label_selector),
            })?;

        if value.is_empty() {
            return Err(ScraperError::EmptyValue {
                label: label.to_string(),
            });
        }
        Ok(value)
    }

    fn parse_document(&self) -> Html {
        self.full_parses.fetch_add(1, Ordering::Relaxed);
        Html::parse_document(&self.body)
    }

    /// Outer HTML of every element matching `selector`, in document order
    fn containers(&self, selector: &str) -> Result<Arc<Vec<String>>> {
        let mut cache = self.containers.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(found) = cache.get(selector) {
            return Ok(found.clone());
        }

        let parsed = parse_selector(selector)?;
        let document = self.parse_document();
        let fragments: Vec<String> = document.select(&parsed).map(|el| el.html()).collect();
        debug!("Indexed {} '{}' elements on {}", fragments.len(), selector, self.url);

        let fragments = Arc::new(fragments);
        cache.insert(selector.to_string(), fragments.clone());
        Ok(fragments)
    }

    /// The markup a query runs against: the whole page, or just the scoped
    /// container. Target selectors are matched inside the container only.
    fn scope_markup(&self, within: Option<Within<'_>>, selector: &str) -> Result<Html> {
        match within {
            Some(scope) => {
                let containers = self.containers(scope.selector)?;
                let fragment = containers.get(scope.index).ok_or_else(|| missing(within, selector))?;
                Ok(Html::parse_fragment(fragment))
            }
            None => Ok(self.parse_document()),
        }
    }
}

#[async_trait]
impl PageSession for HtmlPage {
    fn url(&self) -> &str {
        &self.url
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        self.count_matches(selector)
    }

    async fn extract_text(&self, within: Option<Within<'_>>, selector: &str) -> Result<String> {
        self.text_of(within, selector)
    }

    async fn extract_attribute(
        &self,
        within: Option<Within<'_>>,
        selector: &str,
        attribute: &str,
    ) -> Result<String> {
        self.attribute_of(within, selector, attribute)
    }

    async fn extract_sibling_text(&self, label_selector: &str, label: &str) -> Result<String> {
        self.sibling_text_of(label_selector, label)
    }

    async fn release(self: Box<Self>) {
        debug!("Released page {}", self.url);
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ScraperError::Selector(format!("{}: {}", selector, e)))
}

fn missing(within: Option<Within<'_>>, selector: &str) -> ScraperError {
    ScraperError::MissingElement {
        selector: match within {
            Some(scope) => format!("{}[{}] {}", scope.selector, scope.index, selector),
            None => selector.to_string(),
        },
    }
}

/// Element text with runs of whitespace collapsed, roughly what a browser
/// would render.
fn visible_text(element: &ElementRef<'_>) -> String {
    let raw = element.text().collect::<String>();
    WHITESPACE.replace_all(raw.trim(), " ").into_owned()
}
