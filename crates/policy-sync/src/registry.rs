use std::collections::HashMap;

use crate::config::HTTP_GET_FETCHER;
use crate::event::FetchEvent;
use crate::provider::{FetchError, FetchProvider};

/// Provider name events dispatch to when the caller names none.
pub const DEFAULT_FETCHER: &str = HTTP_GET_FETCHER;

type ProviderFactory = Box<dyn Fn(FetchEvent) -> Box<dyn FetchProvider> + Send + Sync>;

/// Maps provider names to constructors.
///
/// Realization crates register their providers here once; an orchestrator
/// then builds a fresh provider per event by the event's `fetcher` tag.
#[derive(Default)]
pub struct FetcherRegister {
    factories: HashMap<String, ProviderFactory>,
}

impl FetcherRegister {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor under a provider name.
    /// Registering the same name again replaces the previous constructor.
    pub fn register<F>(&mut self, name: impl Into<String>, factory: F)
    where
        F: Fn(FetchEvent) -> Box<dyn FetchProvider> + Send + Sync + 'static,
    {
        let name = name.into();
        tracing::debug!(provider = %name, "registering fetch provider");
        self.factories.insert(name, Box::new(factory));
    }

    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered provider names, in no particular order.
    pub fn names(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Build the provider a fetch event targets.
    pub fn build(&self, event: FetchEvent) -> Result<Box<dyn FetchProvider>, FetchError> {
        match self.factories.get(&event.fetcher) {
            Some(factory) => Ok(factory(event)),
            None => Err(FetchError::UnknownProvider(event.fetcher)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::StaticFetchProvider;

    fn static_register(body: &'static str) -> FetcherRegister {
        let mut register = FetcherRegister::new();
        register.register(DEFAULT_FETCHER, move |event| {
            Box::new(StaticFetchProvider::new(event, body)) as Box<dyn FetchProvider>
        });
        register
    }

    #[tokio::test]
    async fn build_dispatches_on_the_event_fetcher() {
        let register = static_register(r#"{"ok": true}"#);

        let provider = register.build(FetchEvent::new("static://doc")).unwrap();
        let data = provider.retrieve().await.unwrap();
        assert_eq!(data.as_json().unwrap()["ok"], true);
    }

    #[test]
    fn build_fails_for_unregistered_names() {
        let register = static_register("{}");

        let mut event = FetchEvent::new("static://doc");
        event.fetcher = "carrier-pigeon".to_owned();

        let result = register.build(event);
        assert!(matches!(result, Err(FetchError::UnknownProvider(name)) if name == "carrier-pigeon"));
    }

    #[tokio::test]
    async fn registering_a_name_again_replaces_the_factory() {
        let mut register = static_register(r#"{"version": 1}"#);
        register.register(DEFAULT_FETCHER, |event| {
            Box::new(StaticFetchProvider::new(event, r#"{"version": 2}"#)) as Box<dyn FetchProvider>
        });

        let provider = register.build(FetchEvent::new("static://doc")).unwrap();
        let data = provider.retrieve().await.unwrap();
        assert_eq!(data.as_json().unwrap()["version"], 2);
    }

    #[test]
    fn names_and_contains_reflect_registrations() {
        let register = static_register("{}");
        assert!(register.contains(DEFAULT_FETCHER));
        assert!(!register.contains("carrier-pigeon"));
        assert_eq!(register.names(), vec![DEFAULT_FETCHER]);
    }
}
