//! Job runner - processes a single generated job on its own task

use tokio::sync::OwnedSemaphorePermit;
use tokio_util::sync::CancellationToken;
use tracing::error;

use crate::error::ProcessingError;
use crate::jobs::Job;
use crate::processor::JobProcessor;

/// Process `job`, holding `permit` until it finishes
pub async fn run_job(
    processor: JobProcessor,
    job: Job,
    cancel: CancellationToken,
    permit: OwnedSemaphorePermit,
) -> Result<(), ProcessingError> {
    let result = processor.process_job(&job, &cancel).await;
    drop(permit);

    if let Err(e @ ProcessingError::UnknownKey { .. }) = &result {
        error!(
            customer_id = job.customer_id().get(),
            error = %e,
            "Job references an unregistered handler"
        );
    }

    result
}
