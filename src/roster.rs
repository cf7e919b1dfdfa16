use crate::app::ports::{PageFetcher, PageSession, Within};
use crate::config::SiteConfig;
use crate::error::{Result, ScraperError};
use crate::types::Operator;
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{info, instrument};

/// Reads the listing page and builds one `Operator` per container, in page
/// order. Any missing field fails the whole collection; there is no partial
/// roster.
pub struct RosterCollector {
    fetcher: Arc<dyn PageFetcher>,
    site: SiteConfig,
}

impl RosterCollector {
    pub fn new(fetcher: Arc<dyn PageFetcher>, site: SiteConfig) -> Self {
        Self { fetcher, site }
    }

    #[instrument(skip(self), fields(url = %self.site.listing_url))]
    pub async fn collect(&self) -> Result<Vec<Operator>> {
        info!("Loading operator listing");
        let session = self.fetcher.navigate(&self.site.listing_url).await?;

        let result = self.collect_from(session.as_ref()).await;
        session.release().await;
        result
    }

    async fn collect_from(&self, session: &dyn PageSession) -> Result<Vec<Operator>> {
        let total = session.count(&self.site.container_selector).await?;
        if total == 0 {
            return Err(ScraperError::NoContainers {
                selector: self.site.container_selector.clone(),
                url: session.url().to_string(),
            });
        }
        info!("Found {} operator cells", total);

        // try_join_all keeps results in container order regardless of which
        // extraction finishes first.
        let operators = try_join_all((0..total).map(|index| self.read_container(session, index, total))).await?;

        info!("Collected {} operators", operators.len());
        Ok(operators)
    }

    async fn read_container(&self, session: &dyn PageSession, index: usize, total: usize) -> Result<Operator> {
        let site = &self.site;
        let within = Some(Within::nth(&site.container_selector, index));

        let (name, icon_url, path) = tokio::try_join!(
            session.extract_text(within, &site.name_selector),
            session.extract_attribute(within, &site.icon_selector, &site.icon_attribute),
            session.extract_attribute(within, &site.link_selector, &site.link_attribute),
        )?;

        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ScraperError::EmptyField { field: "name", index });
        }

        info!("Fetched basic data for element {} of {}: {}", index + 1, total, name);
        let profile_url = profile_url(&site.origin, &path, &site.profile_fragment);
        Ok(Operator::new(name, icon_url, profile_url))
    }
}

/// Joins the site origin and a scraped link into the profile URL.
/// Links that are already absolute are kept. Protocol-relative links
/// (`//host/path`) take the origin's scheme.
pub fn profile_url(origin: &str, path: &str, fragment: &str) -> String {
    let path = path.trim();
    let base = if path.starts_with("http://") || path.starts_with("https://") {
        path.to_string()
    } else if path.starts_with("//") {
        let scheme = origin.split_once("://").map_or("https", |(scheme, _)| scheme);
        format!("{}:{}", scheme, path)
    } else if path.starts_with('/') {
        format!("{}{}", origin.trim_end_matches('/'), path)
    } else {
        format!("{}/{}", origin.trim_end_matches('/'), path)
    };
    format!("{}{}", base, fragment)
}

#[cfg(test)]
mod tests {
    use super::profile_url;

    #[test]
    fn joins_origin_and_path() {
        assert_eq!(
            profile_url("https://gamepress.gg", "/arknights/operator/amiya", "#profile"),
            "https://gamepress.gg/arknights/operator/amiya#profile"
        );
    }

    #[test]
    fn tolerates_trailing_slash_and_relative_path() {
        assert_eq!(
            profile_url("https://gamepress.gg/", "arknights/operator/amiya", ""),
            "https://gamepress.gg/arknights/operator/amiya"
        );
    }

    #[test]
    fn absolute_links_are_kept() {
        assert_eq!(
            profile_url("https://gamepress.gg", "https://mirror.example/op/amiya", "#profile"),
            "https://mirror.example/op/amiya#profile"
        );
    }

    #[test]
    fn protocol_relative_links_take_origin_scheme() {
        assert_eq!(
            profile_url("https://gamepress.gg", "//cdn.gamepress.gg/op/amiya", "#profile"),
            "https://cdn.gamepress.gg/op/amiya#profile"
        );
        assert_eq!(
            profile_url("http://localhost:8080", "//mirror.test/op/amiya", ""),
            "http://mirror.test/op/amiya"
        );
    }
}
