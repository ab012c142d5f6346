use std::collections::BTreeMap;
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

use super::traits::{AddonHandler, Strategy, StrategyKey, WashHandler};
use crate::jobs::{Addon, WashTier};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("duplicate {kind} registration for key '{key}': {existing}, {conflicting}")]
    DuplicateKey {
        kind: &'static str,
        key: String,
        existing: &'static str,
        conflicting: &'static str,
    },
    #[error("no {kind} handler registered for key '{key}'")]
    UnknownKey { kind: &'static str, key: String },
    #[error("{kind} handler {handler} declares key '{declared}' but was registered under '{requested}'")]
    KeyMismatch {
        kind: &'static str,
        handler: &'static str,
        declared: String,
        requested: String,
    },
}

/// Lookup side of a registry, the only view the processor gets
pub trait StrategyResolver<K, H: ?Sized>: Send + Sync {
    fn resolve(&self, key: K) -> Result<Arc<H>, RegistryError>;
}

/// Immutable key → handler mapping, built once at startup
///
/// Lookups take `&self` and never lock, so one registry behind an `Arc`
/// serves any number of concurrent jobs.
pub struct StrategyRegistry<K, H: ?Sized> {
    handlers: BTreeMap<K, Arc<H>>,
}

pub type WashRegistry = StrategyRegistry<WashTier, dyn WashHandler>;
pub type AddonRegistry = StrategyRegistry<Addon, dyn AddonHandler>;

impl<K, H> StrategyRegistry<K, H>
where
    K: StrategyKey,
    H: Strategy<Key = K> + ?Sized,
{
    pub fn builder() -> RegistryBuilder<K, H> {
        RegistryBuilder::new()
    }

    pub fn get(&self, key: K) -> Result<Arc<H>, RegistryError> {
        self.handlers
            .get(&key)
            .cloned()
            .ok_or_else(|| RegistryError::UnknownKey {
                kind: K::KIND,
                key: key.to_string(),
            })
    }

    pub fn contains(&self, key: K) -> bool {
        self.handlers.contains_key(&key)
    }

    /// Registered keys in ascending order
    pub fn keys(&self) -> impl Iterator<Item = K> + '_ {
        self.handlers.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<K: Clone, H: ?Sized> Clone for StrategyRegistry<K, H> {
    fn clone(&self) -> Self {
        Self {
            handlers: self.handlers.clone(),
        }
    }
}

impl<K, H> StrategyResolver<K, H> for StrategyRegistry<K, H>
where
    K: StrategyKey,
    H: Strategy<Key = K> + ?Sized,
{
    fn resolve(&self, key: K) -> Result<Arc<H>, RegistryError> {
        self.get(key)
    }
}

/// Collects registrations and rejects conflicts before freezing
pub struct RegistryBuilder<K, H: ?Sized> {
    handlers: BTreeMap<K, Arc<H>>,
}

impl<K, H> RegistryBuilder<K, H>
where
    K: StrategyKey,
    H: Strategy<Key = K> + ?Sized,
{
    pub fn new() -> Self {
        Self {
            handlers: BTreeMap::new(),
        }
    }

    /// Register `handler` under `key`
    ///
    /// Fails if another handler already owns `key`, or if the handler
    /// declares a different key than the one it is registered under.
    pub fn register(&mut self, key: K, handler: Arc<H>) -> Result<(), RegistryError> {
        let declared = handler.key();
        if declared != key {
            return Err(RegistryError::KeyMismatch {
                kind: K::KIND,
                handler: handler.name(),
                declared: declared.to_string(),
                requested: key.to_string(),
            });
        }

        if let Some(existing) = self.handlers.get(&key) {
            return Err(RegistryError::DuplicateKey {
                kind: K::KIND,
                key: key.to_string(),
                existing: existing.name(),
                conflicting: handler.name(),
            });
        }

        debug!(kind = K::KIND, %key, handler = handler.name(), "Registered handler");
        self.handlers.insert(key, handler);
        Ok(())
    }

    /// Register every handler under the key it declares
    pub fn register_all(
        mut self,
        handlers: impl IntoIterator<Item = Arc<H>>,
    ) -> Result<Self, RegistryError> {
        for handler in handlers {
            let key = handler.key();
            self.register(key, handler)?;
        }
        Ok(self)
    }

    pub fn build(self) -> StrategyRegistry<K, H> {
        StrategyRegistry {
            handlers: self.handlers,
        }
    }
}

impl<K, H> Default for RegistryBuilder<K, H>
where
    K: StrategyKey,
    H: Strategy<Key = K> + ?Sized,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio_util::sync::CancellationToken;
    use crate::handlers::traits::HandlerError;
    use crate::jobs::Job;
    use async_trait::async_trait;

    struct NamedWash {
        key: WashTier,
        name: &'static str,
    }

    impl Strategy for NamedWash {
        type Key = WashTier;

        fn key(&self) -> WashTier {
            self.key
        }

        fn name(&self) -> &'static str {
            self.name
        }
    }

    #[async_trait]
    impl WashHandler for NamedWash {
        async fn perform_wash(&self, _job: &Job, _cancel: &CancellationToken) -> Result<(), HandlerError> {
            Ok(())
        }
    }

    fn wash(key: WashTier, name: &'static str) -> Arc<dyn WashHandler> {
        Arc::new(NamedWash { key, name })
    }

    #[test]
    fn test_resolve_returns_handler_with_requested_key() {
        let registry = WashRegistry::builder()
            .register_all([
                wash(WashTier::Basic, "BasicWash"),
                wash(WashTier::Awesome, "AwesomeWash"),
                wash(WashTier::ToTheMax, "ToTheMaxWash"),
            ])
            .unwrap()
            .build();

        for tier in WashTier::ALL {
            let handler = registry.resolve(*tier).unwrap();
            assert_eq!(handler.key(), *tier);
        }
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn test_duplicate_key_names_both_handlers() {
        let result = WashRegistry::builder().register_all([
            wash(WashTier::Basic, "BasicWash"),
            wash(WashTier::Basic, "OtherBasicWash"),
        ]);

        let err = result.err().unwrap();
        assert_eq!(
            err,
            RegistryError::DuplicateKey {
                kind: "wash",
                key: "Basic".to_string(),
                existing: "BasicWash",
                conflicting: "OtherBasicWash",
            }
        );
        assert_eq!(
            err.to_string(),
            "duplicate wash registration for key 'Basic': BasicWash, OtherBasicWash"
        );
    }

    #[test]
    fn test_register_rejects_key_mismatch() {
        let mut builder = WashRegistry::builder();
        let err = builder
            .register(WashTier::Awesome, wash(WashTier::Basic, "BasicWash"))
            .unwrap_err();

        assert!(matches!(err, RegistryError::KeyMismatch { handler: "BasicWash", .. }));
        assert!(builder.build().is_empty());
    }

    #[test]
    fn test_unknown_key() {
        let registry = WashRegistry::builder()
            .register_all([wash(WashTier::Basic, "BasicWash")])
            .unwrap()
            .build();

        let err = registry.resolve(WashTier::ToTheMax).err().unwrap();
        assert_eq!(
            err,
            RegistryError::UnknownKey {
                kind: "wash",
                key: "ToTheMax".to_string()
            }
        );
        assert!(!registry.contains(WashTier::ToTheMax));
    }

    #[test]
    fn test_keys_are_sorted() {
        let registry = WashRegistry::builder()
            .register_all([
                wash(WashTier::ToTheMax, "ToTheMaxWash"),
                wash(WashTier::Basic, "BasicWash"),
            ])
            .unwrap()
            .build();

        assert_eq!(
            registry.keys().collect::<Vec<_>>(),
            vec![WashTier::Basic, WashTier::ToTheMax]
        );
    }

    #[test]
    fn test_registry_is_shareable_across_threads() {
        let registry = Arc::new(
            WashRegistry::builder()
                .register_all([wash(WashTier::Basic, "BasicWash")])
                .unwrap()
                .build(),
        );

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let registry = Arc::clone(&registry);
                std::thread::spawn(move || registry.resolve(WashTier::Basic).is_ok())
            })
            .collect();

        for handle in handles {
            assert!(handle.join().unwrap());
        }
    }
}
