//! Built-in add-on handlers

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::traits::{AddonHandler, HandlerError, Strategy, simulate_work};
use crate::events::{ActionKind, CompletionEvent, CompletionSink};
use crate::jobs::{Addon, Job};

macro_rules! addon_handler {
    ($(#[$meta:meta])* $name:ident => $addon:expr) => {
        $(#[$meta])*
        #[derive(Clone)]
        pub struct $name {
            duration: Duration,
            sink: Arc<dyn CompletionSink>,
        }

        impl $name {
            pub fn new(duration: Duration, sink: Arc<dyn CompletionSink>) -> Self {
                Self { duration, sink }
            }
        }

        impl Strategy for $name {
            type Key = Addon;

            fn key(&self) -> Addon {
                $addon
            }

            fn name(&self) -> &'static str {
                stringify!($name)
            }
        }

        #[async_trait]
        impl AddonHandler for $name {
            async fn perform_addon(
                &self,
                job: &Job,
                cancel: &CancellationToken,
            ) -> Result<(), HandlerError> {
                perform(self.key(), self.duration, self.sink.as_ref(), job, cancel).await
            }
        }
    };
}

addon_handler! {
    TireShine => Addon::TireShine
}

addon_handler! {
    InteriorClean => Addon::InteriorClean
}

addon_handler! {
    /// Hand-applied wax followed by a buff
    HandWaxAndShine => Addon::HandWaxAndShine
}

async fn perform(
    addon: Addon,
    duration: Duration,
    sink: &dyn CompletionSink,
    job: &Job,
    cancel: &CancellationToken,
) -> Result<(), HandlerError> {
    if !job.requests_addon(addon) {
        return Err(HandlerError::InvalidArgument(format!(
            "customer {} did not request {addon}",
            job.customer_id()
        )));
    }

    simulate_work(duration, cancel).await?;
    sink.record(CompletionEvent::new(ActionKind::Addon(addon), job.customer_id()));
    Ok(())
}
