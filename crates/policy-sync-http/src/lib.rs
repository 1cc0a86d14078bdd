pub mod provider;

pub use provider::{register_provider, HttpFetchProvider};
