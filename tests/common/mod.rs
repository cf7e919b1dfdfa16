#![allow(dead_code)]

use ak_birthdays::app::ports::{PageFetcher, PageSession, Within};
use ak_birthdays::constants;
use ak_birthdays::error::{Result, ScraperError};
use ak_birthdays::types::Operator;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const LISTING_URL: &str = "https://fake.test/operators";
pub const ORIGIN: &str = "https://fake.test";

/// One `.operator-cell` on the fake listing. `None` fields are missing from
/// the markup.
#[derive(Clone, Debug)]
pub struct FakeCell {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub href: Option<String>,
    /// Extra time every extraction scoped to this cell takes
    pub delay: Duration,
}

impl FakeCell {
    pub fn new(name: &str, href: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            icon: Some(format!("/icons{}.png", href)),
            href: Some(href.to_string()),
            delay: Duration::ZERO,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[derive(Clone, Debug)]
pub enum FakeProfile {
    Birthday(String),
    NoLabel,
    NavigationError,
    /// Extraction never finishes in time
    Hang,
}

/// Counts sessions so tests can check the concurrency bound and releases.
#[derive(Default)]
pub struct SessionStats {
    open: AtomicUsize,
    max_open: AtomicUsize,
    released: AtomicUsize,
    navigations: Mutex<Vec<String>>,
    /// Container names in the order their name extraction finished
    names_read: Mutex<Vec<String>>,
}

impl SessionStats {
    fn opened(&self, url: &str) {
        self.navigations.lock().unwrap().push(url.to_string());
        let now = self.open.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_open.fetch_max(now, Ordering::SeqCst);
    }

    fn closed(&self) {
        self.open.fetch_sub(1, Ordering::SeqCst);
        self.released.fetch_add(1, Ordering::SeqCst);
    }

    pub fn open(&self) -> usize {
        self.open.load(Ordering::SeqCst)
    }

    pub fn max_open(&self) -> usize {
        self.max_open.load(Ordering::SeqCst)
    }

    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    pub fn navigations(&self) -> Vec<String> {
        self.navigations.lock().unwrap().clone()
    }

    pub fn names_read(&self) -> Vec<String> {
        self.names_read.lock().unwrap().clone()
    }
}

pub struct FakeSite {
    /// `None` makes the listing navigation fail
    listing: Option<Vec<FakeCell>>,
    profiles: HashMap<String, FakeProfile>,
    delay: Duration,
    pub stats: Arc<SessionStats>,
}

impl FakeSite {
    pub fn new(cells: Vec<FakeCell>) -> Self {
        Self {
            listing: Some(cells),
            profiles: HashMap::new(),
            delay: Duration::ZERO,
            stats: Arc::new(SessionStats::default()),
        }
    }

    pub fn unreachable() -> Self {
        Self {
            listing: None,
            ..Self::new(Vec::new())
        }
    }

    /// Register a profile under the URL the collector will build for `href`
    pub fn with_profile(mut self, href: &str, profile: FakeProfile) -> Self {
        self.profiles.insert(profile_url_for(href), profile);
        self
    }

    /// Every extraction call sleeps this long before answering
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

pub fn profile_url_for(href: &str) -> String {
    format!("{}{}{}", ORIGIN, href, constants::PROFILE_FRAGMENT)
}

/// Operators as the roster phase would produce them, birthday still pending
pub fn roster(entries: &[(&str, &str)]) -> Vec<Operator> {
    entries
        .iter()
        .map(|(name, href)| Operator::new(*name, format!("/icons{}.png", href), profile_url_for(href)))
        .collect()
}

#[async_trait]
impl PageFetcher for FakeSite {
    async fn navigate(&self, url: &str) -> Result<Box<dyn PageSession>> {
        let content = if url == LISTING_URL {
            match &self.listing {
                Some(cells) => FakeContent::Listing(cells.clone()),
                None => return Err(ScraperError::Status { url: url.to_string(), status: 503 }),
            }
        } else {
            match self.profiles.get(url) {
                Some(FakeProfile::NavigationError) | None => {
                    return Err(ScraperError::Status { url: url.to_string(), status: 404 })
                }
                Some(profile) => FakeContent::Profile(profile.clone()),
            }
        };

        tokio::time::sleep(self.delay).await;
        self.stats.opened(url);
        Ok(Box::new(FakeSession {
            url: url.to_string(),
            content,
            delay: self.delay,
            stats: self.stats.clone(),
        }))
    }
}

enum FakeContent {
    Listing(Vec<FakeCell>),
    Profile(FakeProfile),
}

struct FakeSession {
    url: String,
    content: FakeContent,
    delay: Duration,
    stats: Arc<SessionStats>,
}

impl FakeSession {
    fn cell(&self, within: Option<Within<'_>>, selector: &str) -> Result<&FakeCell> {
        let missing = || ScraperError::MissingElement { selector: selector.to_string() };
        match (&self.content, within) {
            (FakeContent::Listing(cells), Some(scope)) if scope.selector == constants::CONTAINER_SELECTOR => {
                cells.get(scope.index).ok_or_else(missing)
            }
            _ => Err(missing()),
        }
    }
}

#[async_trait]
impl PageSession for FakeSession {
    fn url(&self) -> &str {
        &self.url
    }

    async fn count(&self, selector: &str) -> Result<usize> {
        tokio::time::sleep(self.delay).await;
        match &self.content {
            FakeContent::Listing(cells) if selector == constants::CONTAINER_SELECTOR => Ok(cells.len()),
            _ => Ok(0),
        }
    }

    async fn extract_text(&self, within: Option<Within<'_>>, selector: &str) -> Result<String> {
        tokio::time::sleep(self.delay).await;
        let cell = self.cell(within, selector)?;
        tokio::time::sleep(cell.delay).await;
        match selector {
            constants::NAME_SELECTOR => {
                let name = cell
                    .name
                    .clone()
                    .ok_or_else(|| ScraperError::MissingElement { selector: selector.to_string() })?;
                self.stats.names_read.lock().unwrap().push(name.clone());
                Ok(name)
            }
            _ => Err(ScraperError::MissingElement { selector: selector.to_string() }),
        }
    }

    async fn extract_attribute(&self, within: Option<Within<'_>>, selector: &str, attribute: &str) -> Result<String> {
        tokio::time::sleep(self.delay).await;
        let cell = self.cell(within, selector)?;
        tokio::time::sleep(cell.delay).await;
        let value = match (selector, attribute) {
            (constants::ICON_SELECTOR, constants::ICON_ATTRIBUTE) => cell.icon.clone(),
            (constants::LINK_SELECTOR, constants::LINK_ATTRIBUTE) => cell.href.clone(),
            _ => None,
        };
        value.ok_or_else(|| ScraperError::MissingAttribute {
            selector: selector.to_string(),
            attribute: attribute.to_string(),
        })
    }

    async fn extract_sibling_text(&self, _label_selector: &str, label: &str) -> Result<String> {
        match &self.content {
            FakeContent::Profile(FakeProfile::Birthday(value)) => {
                tokio::time::sleep(self.delay).await;
                Ok(value.clone())
            }
            FakeContent::Profile(FakeProfile::Hang) => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok("too late".to_string())
            }
            _ => Err(ScraperError::LabelNotFound { label: label.to_string() }),
        }
    }

    async fn release(self: Box<Self>) {
        self.stats.closed();
    }
}
