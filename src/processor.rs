//! Job processor
//!
//! Runs a job in two strictly sequential phases: the wash, then each
//! distinct add-on in order of first appearance. The first failure stops
//! the job; nothing later in the pipeline runs.

use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::HandlerSettings;
use crate::error::{Phase, ProcessingError};
use crate::events::CompletionSink;
use crate::handlers::{
    AddonHandler, RegistryError, Strategy, StrategyResolver, WashHandler,
    default_addon_registry, default_wash_registry,
};
use crate::jobs::{Addon, Job, WashTier};
use crate::observability::Metrics;

pub type WashResolver = dyn StrategyResolver<WashTier, dyn WashHandler>;
pub type AddonResolver = dyn StrategyResolver<Addon, dyn AddonHandler>;

#[derive(Clone)]
pub struct JobProcessor {
    washes: Arc<WashResolver>,
    addons: Arc<AddonResolver>,
    metrics: Option<Arc<Metrics>>,
}

impl JobProcessor {
    pub fn new(washes: Arc<WashResolver>, addons: Arc<AddonResolver>) -> Self {
        Self {
            washes,
            addons,
            metrics: None,
        }
    }

    /// Processor wired to the built-in handlers
    pub fn with_default_handlers(
        settings: &HandlerSettings,
        sink: Arc<dyn CompletionSink>,
    ) -> Result<Self, RegistryError> {
        let washes = default_wash_registry(settings.wash_delay.as_duration(), sink.clone())?;
        let addons = default_addon_registry(settings.addon_delay.as_duration(), sink)?;
        Ok(Self::new(Arc::new(washes), Arc::new(addons)))
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Process one job to completion or first failure
    pub async fn process_job(&self, job: &Job, cancel: &CancellationToken) -> Result<(), ProcessingError> {
        let customer_id = job.customer_id().get();
        debug!(
            customer_id,
            make = %job.make(),
            wash_tier = %job.wash_tier(),
            addons = job.addons().len(),
            "Processing job"
        );

        let result = self.run(job, cancel).await;

        match &result {
            Ok(()) => {
                debug!(customer_id, "Job completed");
                self.record(Metrics::job_completed);
            }
            Err(e) if e.is_cancelled() => {
                debug!(customer_id, phase = %e.phase(), "Job cancelled");
                self.record(Metrics::job_cancelled);
            }
            Err(e) => {
                warn!(customer_id, error = %e, "Job failed");
                self.record(Metrics::job_failed);
            }
        }

        result
    }

    async fn run(&self, job: &Job, cancel: &CancellationToken) -> Result<(), ProcessingError> {
        let tier = job.wash_tier();
        let phase = Phase::Wash(tier);
        let handler = self
            .washes
            .resolve(tier)
            .map_err(|source| ProcessingError::UnknownKey { phase, source })?;

        debug!(customer_id = job.customer_id().get(), handler = handler.name(), "Wash phase");
        handler
            .perform_wash(job, cancel)
            .await
            .map_err(|e| ProcessingError::from_handler(phase, e))?;
        self.record(Metrics::action_performed);

        for addon in job.distinct_addons() {
            let phase = Phase::Addon(addon);
            let handler = self
                .addons
                .resolve(addon)
                .map_err(|source| ProcessingError::UnknownKey { phase, source })?;

            debug!(customer_id = job.customer_id().get(), handler = handler.name(), "Addon step");
            handler
                .perform_addon(job, cancel)
                .await
                .map_err(|e| ProcessingError::from_handler(phase, e))?;
            self.record(Metrics::action_performed);
        }

        Ok(())
    }

    fn record(&self, counter: fn(&Metrics)) {
        if let Some(metrics) = &self.metrics {
            counter(metrics);
        }
    }
}
