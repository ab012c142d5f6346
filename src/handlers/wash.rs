//! Built-in wash tier handlers

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

use super::traits::{HandlerError, Strategy, WashHandler, simulate_work};
use crate::events::{ActionKind, CompletionEvent, CompletionSink};
use crate::jobs::{Job, WashTier};

macro_rules! wash_handler {
    ($(#[$meta:meta])* $name:ident => $tier:expr) => {
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
            type Key = WashTier;

            fn key(&self) -> WashTier {
                $tier
            }

            fn name(&self) -> &'static str {
                stringify!($name)
            }
        }

        #[async_trait]
        impl WashHandler for $name {
            async fn perform_wash(
                &self,
                job: &Job,
                cancel: &CancellationToken,
            ) -> Result<(), HandlerError> {
                perform(self.key(), self.duration, self.sink.as_ref(), job, cancel).await
            }
        }
    };
}

wash_handler! {
    /// Basic exterior wash
    BasicWash => WashTier::Basic
}

wash_handler! {
    AwesomeWash => WashTier::Awesome
}

wash_handler! {
    /// Everything the bay can do
    ToTheMaxWash => WashTier::ToTheMax
}

async fn perform(
    tier: WashTier,
    duration: Duration,
    sink: &dyn CompletionSink,
    job: &Job,
    cancel: &CancellationToken,
) -> Result<(), HandlerError> {
    if job.wash_tier() != tier {
        return Err(HandlerError::InvalidArgument(format!(
            "{tier} wash handler received a {} job for customer {}",
            job.wash_tier(),
            job.customer_id()
        )));
    }

    simulate_work(duration, cancel).await?;
    sink.record(CompletionEvent::new(ActionKind::Wash(tier), job.customer_id()));
    Ok(())
}
