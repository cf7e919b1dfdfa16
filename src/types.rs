use std::fmt;

/// Outcome of the profile-page lookup for one operator.
///
/// `Failed` is the null marker: the lookup ran and produced nothing. It is kept
/// distinct from `Pending` so a record that was never attempted can't be
/// confused with one that failed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Birthday {
    #[default]
    Pending,
    Failed,
    Known(String),
}

impl Birthday {
    pub fn as_deref(&self) -> Option<&str> {
        match self {
            Birthday::Known(value) => Some(value.as_str()),
            Birthday::Pending | Birthday::Failed => None,
        }
    }
}

impl fmt::Display for Birthday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Birthday::Pending => write!(f, "<pending>"),
            Birthday::Failed => write!(f, "<none>"),
            Birthday::Known(value) => write!(f, "{}", value),
        }
    }
}

/// One roster entry scraped from the listing page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operator {
    pub name: String,
    /// Image reference exactly as it appears in the listing (may be relative)
    pub icon_url: String,
    /// Absolute URL of the operator's profile section
    pub profile_url: String,
    pub birthday: Birthday,
}

impl Operator {
    pub fn new(name: impl Into<String>, icon_url: impl Into<String>, profile_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            icon_url: icon_url.into(),
            profile_url: profile_url.into(),
            birthday: Birthday::Pending,
        }
    }
}
