use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

use crate::jobs::{Addon, Job, WashTier};

/// Handler errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum HandlerError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("action cancelled")]
    Cancelled,
    #[error("action failed: {0}")]
    Failed(String),
}

/// Discriminator type a family of handlers is keyed by
pub trait StrategyKey:
    Copy + Eq + Ord + Hash + Debug + Display + Send + Sync + 'static
{
    /// Handler family name used in diagnostics ("wash", "addon")
    const KIND: &'static str;
}

impl StrategyKey for WashTier {
    const KIND: &'static str = "wash";
}

impl StrategyKey for Addon {
    const KIND: &'static str = "addon";
}

/// A handler that declares ownership of one discriminator key
pub trait Strategy: Send + Sync {
    type Key: StrategyKey;

    fn key(&self) -> Self::Key;

    /// Implementation name, reported when two handlers claim the same key
    fn name(&self) -> &'static str;
}

/// Performs one wash tier
///
/// Implementations must not mutate the job and must emit exactly one
/// completion event on success, none on failure. A job whose wash tier is
/// not the handler's own key is rejected with
/// [`HandlerError::InvalidArgument`] before any work starts.
#[async_trait]
pub trait WashHandler: Strategy<Key = WashTier> {
    async fn perform_wash(&self, job: &Job, cancel: &CancellationToken) -> Result<(), HandlerError>;
}

/// Performs one add-on; same contract as [`WashHandler`]
///
/// A job that did not request the handler's add-on is rejected with
/// [`HandlerError::InvalidArgument`].
#[async_trait]
pub trait AddonHandler: Strategy<Key = Addon> {
    async fn perform_addon(&self, job: &Job, cancel: &CancellationToken) -> Result<(), HandlerError>;
}

/// Simulated physical work: waits for `duration` unless cancelled first
pub async fn simulate_work(duration: Duration, cancel: &CancellationToken) -> Result<(), HandlerError> {
    if cancel.is_cancelled() {
        return Err(HandlerError::Cancelled);
    }

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(HandlerError::Cancelled),
        _ = tokio::time::sleep(duration) => Ok(()),
    }
}
