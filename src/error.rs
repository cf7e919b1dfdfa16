use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { url: String, status: u16 },

    #[error("Timed out after {seconds}s waiting on {url}")]
    Timeout { url: String, seconds: u64 },

    #[error("Invalid selector: {0}")]
    Selector(String),

    #[error("No element matches selector '{selector}'")]
    MissingElement { selector: String },

    #[error("Element '{selector}' has no '{attribute}' attribute")]
    MissingAttribute { selector: String, attribute: String },

    #[error("Field '{field}' is empty for container {index}")]
    EmptyField { field: &'static str, index: usize },

    #[error("No header cell labelled '{label}'")]
    LabelNotFound { label: String },

    #[error("Cell next to '{label}' is empty")]
    EmptyValue { label: String },

    #[error("Listing {url} has no elements matching '{selector}'")]
    NoContainers { selector: String, url: String },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML deserialization failed: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ScraperError>;
