//! Periodic background jobs.

use std::sync::Arc;
use std::time::{Duration, Instant};

use metrics::counter;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, error, info, warn};

/// How often a job runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobFrequency {
    Seconds(u64),
    Minutes(u64),
    Hourly,
}

impl JobFrequency {
    pub fn duration(&self) -> Duration {
        match self {
            JobFrequency::Seconds(secs) => Duration::from_secs(*secs),
            JobFrequency::Minutes(mins) => Duration::from_secs(*mins * 60),
            JobFrequency::Hourly => Duration::from_secs(3600),
        }
    }
}

/// A unit of periodic background work.
#[async_trait::async_trait]
pub trait Job: Send + Sync {
    /// Name used in logs and metrics.
    fn name(&self) -> &'static str;

    fn frequency(&self) -> JobFrequency;

    async fn execute(&self) -> Result<(), String>;
}

/// Runs a job once, logging and counting the outcome.
pub async fn run_job(job: &dyn Job) -> bool {
    let name = job.name();
    let start = Instant::now();

    let result = job.execute().await;
    let elapsed_ms = start.elapsed().as_millis() as u64;

    let outcome = match &result {
        Ok(()) => {
            debug!(job = name, elapsed_ms, "Job completed");
            "success"
        }
        Err(e) => {
            error!(job = name, elapsed_ms, error = %e, "Job failed");
            "failure"
        }
    };
    counter!("background_job_runs_total", "job" => name, "outcome" => outcome).increment(1);
    result.is_ok()
}

/// Runs registered jobs on their own intervals until shut down.
pub struct JobScheduler {
    jobs: Vec<Arc<dyn Job>>,
    shutdown_tx: watch::Sender<bool>,
    handles: Vec<JoinHandle<()>>,
}

impl JobScheduler {
    pub fn new() -> Self {
        let (shutdown_tx, _) = watch::channel(false);
        Self {
            jobs: Vec::new(),
            shutdown_tx,
            handles: Vec::new(),
        }
    }

    pub fn register<J: Job + 'static>(&mut self, job: J) {
        self.jobs.push(Arc::new(job));
    }

    pub fn job_count(&self) -> usize {
        self.jobs.len()
    }

    /// Spawns one task per job. The first run happens one interval after
    /// start.
    pub fn start(&mut self) {
        info!(jobs = self.jobs.len(), "Starting job scheduler");

        for job in &self.jobs {
            let job = Arc::clone(job);
            let mut shutdown_rx = self.shutdown_tx.subscribe();

            self.handles.push(tokio::spawn(async move {
                let mut interval = tokio::time::interval(job.frequency().duration());
                interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
                interval.tick().await;

                loop {
                    tokio::select! {
                        _ = interval.tick() => {
                            run_job(job.as_ref()).await;
                        }
                        changed = shutdown_rx.changed() => {
                            if changed.is_err() || *shutdown_rx.borrow() {
                                debug!(job = job.name(), "Job stopped");
                                break;
                            }
                        }
                    }
                }
            }));
        }
    }

    /// Signals every job to stop after its current run.
    pub fn shutdown(&self) {
        info!("Stopping job scheduler");
        let _ = self.shutdown_tx.send(true);
    }

    /// Waits up to `timeout` for job tasks to finish.
    pub async fn wait_for_shutdown(self, timeout: Duration) {
        let handles = self.handles;
        let joined = async {
            for handle in handles {
                if let Err(e) = handle.await {
                    warn!("Job task panicked: {}", e);
                }
            }
        };

        if tokio::time::timeout(timeout, joined).await.is_err() {
            warn!("Job shutdown timed out after {:?}", timeout);
        }
    }
}

impl Default for JobScheduler {
    fn default() -> Self {
        Self::new()
    }
}
