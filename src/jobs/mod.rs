//! Car wash job model
//!
//! A [`Job`] is one customer's work order: a single [`WashTier`] plus an
//! ordered list of [`Addon`]s that may contain repeats. Jobs are immutable
//! once constructed.

mod generator;
mod types;

pub use generator::JobGenerator;
pub use types::{Addon, CarMake, CustomerId, Job, JobError, WashTier};
