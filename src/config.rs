use crate::constants;
use crate::error::{Result, ScraperError};
use serde::Deserialize;
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub site: SiteConfig,
    pub enrichment: EnrichmentConfig,
    pub http: HttpConfig,
    pub output: OutputConfig,
}

/// Where the roster lives and how to pick fields out of its markup
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub origin: String,
    pub listing_url: String,
    pub container_selector: String,
    pub name_selector: String,
    pub icon_selector: String,
    pub icon_attribute: String,
    pub link_selector: String,
    pub link_attribute: String,
    pub profile_fragment: String,
    pub birthday_label_selector: String,
    pub birthday_label: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            origin: constants::SITE_ORIGIN.to_string(),
            listing_url: constants::LISTING_URL.to_string(),
            container_selector: constants::CONTAINER_SELECTOR.to_string(),
            name_selector: constants::NAME_SELECTOR.to_string(),
            icon_selector: constants::ICON_SELECTOR.to_string(),
            icon_attribute: constants::ICON_ATTRIBUTE.to_string(),
            link_selector: constants::LINK_SELECTOR.to_string(),
            link_attribute: constants::LINK_ATTRIBUTE.to_string(),
            profile_fragment: constants::PROFILE_FRAGMENT.to_string(),
            birthday_label_selector: constants::BIRTHDAY_LABEL_SELECTOR.to_string(),
            birthday_label: constants::BIRTHDAY_LABEL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EnrichmentConfig {
    /// Number of profile pages open at once
    pub concurrency: usize,
    /// Upper bound on each navigation and each extraction
    pub item_timeout_seconds: u64,
}

impl Default for EnrichmentConfig {
    fn default() -> Self {
        Self {
            concurrency: constants::DEFAULT_CONCURRENCY,
            item_timeout_seconds: constants::DEFAULT_ITEM_TIMEOUT_SECS,
        }
    }
}

impl EnrichmentConfig {
    pub fn workers(&self) -> Result<NonZeroUsize> {
        NonZeroUsize::new(self.concurrency)
            .ok_or_else(|| ScraperError::Config("enrichment.concurrency must be at least 1".into()))
    }

    pub fn item_timeout(&self) -> Duration {
        Duration::from_secs(self.item_timeout_seconds)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub user_agent: String,
    pub timeout_seconds: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: constants::DEFAULT_USER_AGENT.to_string(),
            timeout_seconds: constants::DEFAULT_HTTP_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub path: PathBuf,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(constants::OUTPUT_FILE),
        }
    }
}

impl Config {
    /// Read a config file, falling back to built-in defaults when it does not
    /// exist. The result is not validated; apply any overrides first and then
    /// call [`Config::validate`].
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            debug!("No config file at {}, using defaults", config_path.display());
            return Ok(Self::default());
        }

        let config_content = fs::read_to_string(config_path).map_err(|e| {
            ScraperError::Config(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;

        let config = Self::from_toml(&config_content)?;
        info!("Loaded configuration from {}", config_path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Command-line values take precedence over the file.
    pub fn apply_overrides(&mut self, output: Option<PathBuf>, concurrency: Option<usize>) {
        if let Some(output) = output {
            self.output.path = output;
        }
        if let Some(concurrency) = concurrency {
            self.enrichment.concurrency = concurrency;
        }
    }

    pub fn validate(&self) -> Result<()> {
        self.enrichment.workers()?;

        if self.enrichment.item_timeout_seconds == 0 {
            return Err(ScraperError::Config("enrichment.item_timeout_seconds must be positive".into()));
        }
        if self.http.timeout_seconds == 0 {
            return Err(ScraperError::Config("http.timeout_seconds must be positive".into()));
        }
        if self.site.origin.trim().is_empty() {
            return Err(ScraperError::Config("site.origin is empty".into()));
        }

        let required = [
            ("site.listing_url", &self.site.listing_url),
            ("site.container_selector", &self.site.container_selector),
            ("site.name_selector", &self.site.name_selector),
            ("site.icon_selector", &self.site.icon_selector),
            ("site.icon_attribute", &self.site.icon_attribute),
            ("site.link_selector", &self.site.link_selector),
            ("site.link_attribute", &self.site.link_attribute),
            ("site.birthday_label_selector", &self.site.birthday_label_selector),
            ("site.birthday_label", &self.site.birthday_label),
        ];
        for (key, value) in required {
            if value.trim().is_empty() {
                return Err(ScraperError::Config(format!("{} is empty", key)));
            }
        }

        Ok(())
    }
}
