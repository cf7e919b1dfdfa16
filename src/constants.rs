//! Defaults for the gamepress operator listing and profile pages.
//! Every value here can be overridden from `config.toml`.

pub const SITE_ORIGIN: &str = "https://gamepress.gg";
pub const LISTING_URL: &str =
    "https://gamepress.gg/arknights/tools/interactive-operator-list#tags=null##stats";

// Listing page selectors
pub const CONTAINER_SELECTOR: &str = ".operator-cell";
pub const NAME_SELECTOR: &str = ".operator-title-actual";
pub const ICON_SELECTOR: &str = "img[src]";
pub const ICON_ATTRIBUTE: &str = "src";
pub const LINK_SELECTOR: &str = "a";
pub const LINK_ATTRIBUTE: &str = "href";

/// Appended to each profile path so the link lands on the profile tab
pub const PROFILE_FRAGMENT: &str = "#profile";

// Profile page lookup
pub const BIRTHDAY_LABEL_SELECTOR: &str = "th";
pub const BIRTHDAY_LABEL: &str = "Birthday";

pub const DEFAULT_CONCURRENCY: usize = 4;
pub const DEFAULT_ITEM_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = concat!("ak_birthdays/", env!("CARGO_PKG_VERSION"));

pub const OUTPUT_FILE: &str = "operators.csv";
pub const CONFIG_FILE: &str = "config.toml";

/// Column order of the export. Never reordered.
pub const CSV_HEADER: [&str; 4] = ["name", "iconURL", "profileURL", "birthday"];
