use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Canonical name of the HTTP GET provider.
pub const HTTP_GET_FETCHER: &str = "http-get";

/// Provider-specific configuration, tagged by provider kind.
///
/// The variant set is sealed: each provider reads exactly one variant, and
/// the tag doubles as the name the registry dispatches on.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "fetcher")]
pub enum FetcherConfig {
    /// Options for the HTTP GET provider.
    #[serde(rename = "http-get")]
    HttpGet(HttpFetcherConfig),
}

impl FetcherConfig {
    /// The provider name this config targets (the serde tag).
    pub fn name(&self) -> &'static str {
        match self {
            Self::HttpGet(_) => HTTP_GET_FETCHER,
        }
    }
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self::HttpGet(HttpFetcherConfig::default())
    }
}

/// Options for the HTTP GET provider.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpFetcherConfig {
    /// Extra request headers to send with the GET.
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,

    /// Decode the response body as JSON.
    #[serde(default = "default_true")]
    pub is_json: bool,

    /// Decode the body at all; when false the raw response is handed back.
    #[serde(default = "default_true")]
    pub process_data: bool,
}

impl Default for HttpFetcherConfig {
    fn default() -> Self {
        Self {
            headers: None,
            is_json: true,
            process_data: true,
        }
    }
}

fn default_true() -> bool {
    true
}
