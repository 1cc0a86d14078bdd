pub mod config;
pub mod event;
pub mod provider;
pub mod registry;
pub mod store;

pub use config::{FetcherConfig, HttpFetcherConfig, HTTP_GET_FETCHER};
pub use event::FetchEvent;
pub use provider::{DecodeError, FetchError, FetchProvider, FetchedData, RawDocument};
pub use registry::{FetcherRegister, DEFAULT_FETCHER};
pub use store::{DataStoreClient, PolicyBundle, PolicyModule, StoreError};

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;
