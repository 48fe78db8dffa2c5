//! Background job scheduler and job implementations.

mod draft_expiry;
mod pool_metrics;
mod scheduler;

pub use draft_expiry::DraftExpiryJob;
pub use pool_metrics::PoolMetricsJob;
pub use scheduler::{run_job, Job, JobFrequency, JobScheduler};
