use std::collections::HashMap;
use std::sync::Arc;

use crate::event::FetchEvent;

/// Undecoded resource as acquired by a provider's fetch phase.
///
/// Fully owned: acquisition snapshots the transport response before
/// releasing its session, so no live connection rides along with the
/// document. Transport metadata is optional so non-HTTP realizations can
/// leave it empty.
#[derive(Debug, Clone, Default)]
pub struct RawDocument {
    /// Transport status code, when the transport has one.
    pub status: Option<u16>,

    /// Transport response headers, empty when not applicable.
    pub headers: HashMap<String, String>,

    /// Raw body bytes.
    pub body: Vec<u8>,
}

/// Final value produced by a fetch pipeline.
#[derive(Debug, Clone)]
pub enum FetchedData {
    /// Body parsed as a JSON document.
    Json(serde_json::Value),

    /// Body decoded as UTF-8 text.
    Text(String),

    /// Unprocessed response, for callers that opted out of decoding.
    /// Status inspection is the caller's responsibility.
    Raw(RawDocument),
}

impl FetchedData {
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_json(self) -> Option<serde_json::Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

/// Errors from decoding a fetched body.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    #[error("body is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("body is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Errors from running a fetch pipeline.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("transport error fetching {url}: {reason}")]
    Transport { url: String, reason: String },

    #[error("invalid fetcher config: {0}")]
    Config(String),

    #[error("no fetch provider registered for {0:?}")]
    UnknownProvider(String),

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

/// A provider variant: one transport bound to one fetch event.
///
/// Providers run a two-phase pipeline: `fetch` acquires the raw resource,
/// `process` transforms it into a usable value. `retrieve` is the entry
/// point callers use. An instance is single-use per event and keeps no
/// internal lock; concurrent fetches need separate instances.
#[async_trait::async_trait]
pub trait FetchProvider: Send + Sync {
    /// The event this provider was built for.
    fn event(&self) -> &FetchEvent;

    /// Acquire the raw resource named by the event. Transport failures
    /// propagate to the caller unmodified.
    async fn fetch(&self) -> Result<RawDocument, FetchError>;

    /// Transform the raw resource per the event's config.
    /// Must not touch the transport again.
    async fn process(&self, raw: RawDocument) -> Result<FetchedData, FetchError>;

    /// Run the full pipeline. `process` is never invoked when `fetch`
    /// fails.
    async fn retrieve(&self) -> Result<FetchedData, FetchError> {
        let raw = self.fetch().await?;
        self.process(raw).await
    }
}

#[async_trait::async_trait]
impl<T: FetchProvider + ?Sized> FetchProvider for Arc<T> {
    fn event(&self) -> &FetchEvent {
        (**self).event()
    }

    async fn fetch(&self) -> Result<RawDocument, FetchError> {
        (**self).fetch().await
    }

    async fn process(&self, raw: RawDocument) -> Result<FetchedData, FetchError> {
        (**self).process(raw).await
    }

    async fn retrieve(&self) -> Result<FetchedData, FetchError> {
        (**self).retrieve().await
    }
}
