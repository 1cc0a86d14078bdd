use serde::{Deserialize, Serialize};

use crate::config::FetcherConfig;
use crate::registry::DEFAULT_FETCHER;

/// One fetch to perform: which provider, from where, and how.
///
/// An event is owned by the provider built for it and is immutable after
/// construction. A missing config is resolved to the provider's default
/// variant when the provider is constructed, so providers never read an
/// absent config.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FetchEvent {
    /// Name of the provider variant this event targets.
    #[serde(default = "default_fetcher")]
    pub fetcher: String,

    /// Locator of the resource to acquire.
    pub url: String,

    /// Provider-specific options, if the caller supplied any.
    #[serde(default)]
    pub config: Option<FetcherConfig>,
}

impl FetchEvent {
    /// Event for the default provider with default options.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            fetcher: DEFAULT_FETCHER.to_owned(),
            url: url.into(),
            config: None,
        }
    }

    /// Event carrying an explicit config; the provider name follows the
    /// config's tag.
    pub fn with_config(url: impl Into<String>, config: FetcherConfig) -> Self {
        Self {
            fetcher: config.name().to_owned(),
            url: url.into(),
            config: Some(config),
        }
    }
}

fn default_fetcher() -> String {
    DEFAULT_FETCHER.to_owned()
}
