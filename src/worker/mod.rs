//! Worker host loop
//!
//! Generates a random job every `worker.job_interval` and hands it to the
//! [`JobProcessor`]. Jobs run on their own tokio tasks, at most
//! `worker.max_concurrent_jobs` at a time; each job's phases stay sequential.
//! Failed jobs are logged and counted, they never stop the loop.

pub mod runner;

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::config::Config;
use crate::events::CompletionSink;
use crate::handlers::RegistryError;
use crate::jobs::JobGenerator;
use crate::observability::{Metrics, MetricsSnapshot};
use crate::processor::JobProcessor;

const MIN_JOB_INTERVAL: Duration = Duration::from_millis(1);

pub struct Worker {
    config: Config,
    processor: JobProcessor,
    metrics: Arc<Metrics>,
    generator: JobGenerator,
}

impl Worker {
    /// Build the registries once; duplicate registrations fail here
    pub fn new(config: Config, sink: Arc<dyn CompletionSink>) -> Result<Self, RegistryError> {
        let metrics = Arc::new(Metrics::new());
        let processor =
            JobProcessor::with_default_handlers(&config.handlers, sink)?.with_metrics(metrics.clone());
        let generator = JobGenerator::new(config.worker.max_addons_per_job);

        Ok(Self {
            config,
            processor,
            metrics,
            generator,
        })
    }

    pub fn with_generator(mut self, generator: JobGenerator) -> Self {
        self.generator = generator;
        self
    }

    pub fn metrics(&self) -> Arc<Metrics> {
        self.metrics.clone()
    }

    /// Run until `shutdown` fires or `worker.max_jobs` jobs were dispatched
    ///
    /// Each job runs under a child of `shutdown`, so cancelling `shutdown`
    /// reaches every in-flight job. They are awaited before returning.
    pub async fn run(mut self, shutdown: CancellationToken) -> MetricsSnapshot {
        let settings = self.config.worker.clone();
        let period = settings.job_interval.as_duration().max(MIN_JOB_INTERVAL);
        let semaphore = Arc::new(Semaphore::new(settings.max_concurrent_jobs.max(1)));
        let mut in_flight = JoinSet::new();
        let mut dispatched: u64 = 0;

        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(
            job_interval = %settings.job_interval,
            max_concurrent_jobs = settings.max_concurrent_jobs,
            max_jobs = ?settings.max_jobs,
            "Worker started"
        );

        loop {
            if settings.max_jobs.is_some_and(|max| dispatched >= max) {
                info!(dispatched, "Job limit reached");
                break;
            }

            tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {}
            }

            let permit = tokio::select! {
                biased;
                _ = shutdown.cancelled() => break,
                permit = semaphore.clone().acquire_owned() => match permit {
                    Ok(permit) => permit,
                    Err(_) => break,
                },
            };

            let job = self.generator.next_job();
            dispatched += 1;
            in_flight.spawn(runner::run_job(
                self.processor.clone(),
                job,
                shutdown.child_token(),
                permit,
            ));

            while let Some(joined) = in_flight.try_join_next() {
                log_join_error(joined);
            }
        }

        if shutdown.is_cancelled() {
            info!(in_flight = in_flight.len(), "Shutdown requested, cancelling in-flight jobs");
        }
        while let Some(joined) = in_flight.join_next().await {
            log_join_error(joined);
        }

        let snapshot = self.metrics.snapshot();
        info!(
            dispatched,
            completed = snapshot.jobs_completed,
            failed = snapshot.jobs_failed,
            cancelled = snapshot.jobs_cancelled,
            actions = snapshot.actions_performed,
            "Worker stopped"
        );
        snapshot
    }
}

fn log_join_error<T>(joined: Result<T, tokio::task::JoinError>) {
    if let Err(e) = joined {
        error!(error = %e, "Job task panicked or was aborted");
    }
}
