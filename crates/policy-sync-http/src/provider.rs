use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use policy_sync::{
    DecodeError, FetchError, FetchEvent, FetchProvider, FetchedData, FetcherConfig,
    FetcherRegister, HttpFetcherConfig, RawDocument, HTTP_GET_FETCHER,
};

/// Fetches a resource over HTTP GET and decodes the body per its config.
///
/// The client session is scoped to a single `fetch` call: it is built,
/// used for one GET, and dropped before the call returns, so nothing is
/// held across the caller's suspension points, even when the caller is
/// cancelled mid-fetch.
pub struct HttpFetchProvider {
    event: FetchEvent,
    config: HttpFetcherConfig,
}

impl HttpFetchProvider {
    /// Bind a provider to one event. An absent config resolves to the
    /// documented defaults, so no later read sees a missing config.
    pub fn new(event: FetchEvent) -> Self {
        let config = match &event.config {
            Some(FetcherConfig::HttpGet(config)) => config.clone(),
            None => HttpFetcherConfig::default(),
        };

        Self { event, config }
    }

    fn request_headers(&self) -> Result<HeaderMap, FetchError> {
        let mut map = HeaderMap::new();

        if let Some(headers) = &self.config.headers {
            for (name, value) in headers {
                let header_name = HeaderName::from_bytes(name.as_bytes())
                    .map_err(|e| FetchError::Config(format!("bad header name {name:?}: {e}")))?;
                let header_value = HeaderValue::from_str(value).map_err(|e| {
                    FetchError::Config(format!("bad value for header {name:?}: {e}"))
                })?;
                map.insert(header_name, header_value);
            }
        }

        Ok(map)
    }

    fn transport_error(&self, error: reqwest::Error) -> FetchError {
        FetchError::Transport {
            url: self.event.url.clone(),
            reason: error.to_string(),
        }
    }
}

#[async_trait::async_trait]
impl FetchProvider for HttpFetchProvider {
    fn event(&self) -> &FetchEvent {
        &self.event
    }

    async fn fetch(&self) -> Result<RawDocument, FetchError> {
        tracing::debug!(url = %self.event.url, "fetching over http");

        let headers = self.request_headers()?;

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| self.transport_error(e))?;

        let response = client
            .get(&self.event.url)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        // Snapshot the response before the client goes away. A non-2xx
        // status is not an error here; it travels in the document for the
        // caller to inspect.
        let status = response.status().as_u16();
        let response_headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value.to_str().ok().map(|v| (name.to_string(), v.to_owned()))
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| self.transport_error(e))?
            .to_vec();

        Ok(RawDocument {
            status: Some(status),
            headers: response_headers,
            body,
        })
    }

    async fn process(&self, raw: RawDocument) -> Result<FetchedData, FetchError> {
        if !self.config.process_data {
            return Ok(FetchedData::Raw(raw));
        }

        if self.config.is_json {
            let value: serde_json::Value =
                serde_json::from_slice(&raw.body).map_err(DecodeError::Json)?;
            Ok(FetchedData::Json(value))
        } else {
            let text = String::from_utf8(raw.body).map_err(DecodeError::Utf8)?;
            Ok(FetchedData::Text(text))
        }
    }
}

/// Register the HTTP provider under its canonical name.
pub fn register_provider(fetchers: &mut FetcherRegister) {
    fetchers.register(HTTP_GET_FETCHER, |event| {
        Box::new(HttpFetchProvider::new(event)) as Box<dyn FetchProvider>
    });
}
