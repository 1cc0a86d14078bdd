use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::{FetcherConfig, HttpFetcherConfig};
use crate::event::FetchEvent;
use crate::provider::{DecodeError, FetchError, FetchProvider, FetchedData, RawDocument};

/// Provider returning a canned document, for tests that need a pipeline
/// without a transport. Decoding honors the event's HTTP-style config so
/// tests can exercise the whole decision table.
pub struct StaticFetchProvider {
    event: FetchEvent,
    body: Option<Vec<u8>>,
    processed: AtomicBool,
}

impl StaticFetchProvider {
    pub fn new(event: FetchEvent, body: impl Into<Vec<u8>>) -> Self {
        Self {
            event,
            body: Some(body.into()),
            processed: AtomicBool::new(false),
        }
    }

    /// A provider whose fetch phase always fails with a transport error.
    pub fn failing(event: FetchEvent) -> Self {
        Self {
            event,
            body: None,
            processed: AtomicBool::new(false),
        }
    }

    /// Whether `process` has run on this instance.
    pub fn processed(&self) -> bool {
        self.processed.load(Ordering::SeqCst)
    }

    fn config(&self) -> HttpFetcherConfig {
        match &self.event.config {
            Some(FetcherConfig::HttpGet(config)) => config.clone(),
            None => HttpFetcherConfig::default(),
        }
    }
}

#[async_trait::async_trait]
impl FetchProvider for StaticFetchProvider {
    fn event(&self) -> &FetchEvent {
        &self.event
    }

    async fn fetch(&self) -> Result<RawDocument, FetchError> {
        match &self.body {
            Some(body) => Ok(RawDocument {
                status: Some(200),
                headers: HashMap::new(),
                body: body.clone(),
            }),
            None => Err(FetchError::Transport {
                url: self.event.url.clone(),
                reason: "static provider configured to fail".to_owned(),
            }),
        }
    }

    async fn process(&self, raw: RawDocument) -> Result<FetchedData, FetchError> {
        self.processed.store(true, Ordering::SeqCst);

        let config = self.config();
        if !config.process_data {
            return Ok(FetchedData::Raw(raw));
        }

        if config.is_json {
            let value: serde_json::Value =
                serde_json::from_slice(&raw.body).map_err(DecodeError::Json)?;
            Ok(FetchedData::Json(value))
        } else {
            let text = String::from_utf8(raw.body).map_err(DecodeError::Utf8)?;
            Ok(FetchedData::Text(text))
        }
    }
}
