pub mod config;
pub mod error;
pub mod events;
pub mod handlers;
pub mod humanize;
pub mod jobs;
pub mod observability;
pub mod processor;
pub mod worker;

pub use error::{Phase, ProcessingError};
pub use jobs::{Addon, CarMake, CustomerId, Job, WashTier};
pub use processor::JobProcessor;
pub use tokio_util::sync::CancellationToken;
