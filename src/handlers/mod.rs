//! Wash and add-on handlers
//!
//! Each wash tier and add-on is implemented by exactly one handler that
//! declares the key it owns. Handlers are collected into an immutable
//! [`StrategyRegistry`] at startup; the processor only sees the
//! [`StrategyResolver`] side of it.
//!
//! ## Key Components
//!
//! - [`WashHandler`] / [`AddonHandler`] - handler contracts
//! - [`StrategyRegistry`] - key → handler mapping with duplicate detection
//! - [`default_wash_registry`] / [`default_addon_registry`] - the registration tables
//!
//! ## Adding a handler
//!
//! Add the key to [`WashTier`](crate::jobs::WashTier) or
//! [`Addon`](crate::jobs::Addon), implement the handler, and list
//! it in the matching registration table below. Nothing else changes.
//!
//! ```rust,ignore
//! use carwash::handlers::{default_wash_registry, StrategyResolver};
//!
//! let registry = default_wash_registry(Duration::from_secs(1), sink)?;
//! let handler = registry.resolve(WashTier::Basic)?;
//! handler.perform_wash(&job, &cancel).await?;
//! ```

mod addons;
mod registry;
mod traits;
mod wash;

pub use addons::{HandWaxAndShine, InteriorClean, TireShine};
pub use registry::{
    AddonRegistry, RegistryBuilder, RegistryError, StrategyRegistry, StrategyResolver,
    WashRegistry,
};
pub use traits::{
    AddonHandler, HandlerError, Strategy, StrategyKey, WashHandler, simulate_work,
};
pub use wash::{AwesomeWash, BasicWash, ToTheMaxWash};

use std::sync::Arc;
use std::time::Duration;

use crate::events::CompletionSink;

/// Registration table for wash tiers
pub fn default_wash_registry(
    duration: Duration,
    sink: Arc<dyn CompletionSink>,
) -> Result<WashRegistry, RegistryError> {
    let handlers: [Arc<dyn WashHandler>; 3] = [
        Arc::new(BasicWash::new(duration, sink.clone())),
        Arc::new(AwesomeWash::new(duration, sink.clone())),
        Arc::new(ToTheMaxWash::new(duration, sink)),
    ];

    Ok(WashRegistry::builder().register_all(handlers)?.build())
}

/// Registration table for add-ons
pub fn default_addon_registry(
    duration: Duration,
    sink: Arc<dyn CompletionSink>,
) -> Result<AddonRegistry, RegistryError> {
    let handlers: [Arc<dyn AddonHandler>; 3] = [
        Arc::new(TireShine::new(duration, sink.clone())),
        Arc::new(InteriorClean::new(duration, sink.clone())),
        Arc::new(HandWaxAndShine::new(duration, sink)),
    ];

    Ok(AddonRegistry::builder().register_all(handlers)?.build())
}
