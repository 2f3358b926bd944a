//! Background job queue.
//!
//! Fire-and-forget jobs run on a single worker task fed by an mpsc
//! channel. Handlers submit a job, get its id back immediately, and poll
//! its status afterwards. Statuses live in shared memory and disappear
//! on restart.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{mpsc, RwLock};
use uuid::Uuid;

/// How many submitted jobs may wait in the channel before submission
/// starts failing.
const QUEUE_CAPACITY: usize = 256;

/// How long a finished job's status stays pollable before eviction.
const STATUS_RETENTION: Duration = Duration::from_secs(300);

/// The work a job performs.
#[derive(Debug, Clone)]
pub enum JobKind {
    SendEmail {
        email: String,
        subject: String,
        message: String,
    },
    ProcessData {
        data: String,
    },
    Cleanup,
}

impl JobKind {
    /// Worker steps for this kind. Each step takes one delay tick.
    fn total_steps(&self) -> u32 {
        match self {
            JobKind::SendEmail { .. } => 10,
            JobKind::ProcessData { .. } => 5,
            JobKind::Cleanup => 3,
        }
    }

    fn describe_result(&self) -> String {
        match self {
            JobKind::SendEmail { email, subject, .. } => {
                format!("Email '{subject}' sent to {email}")
            }
            JobKind::ProcessData { data } => {
                format!("Processed {} bytes of data", data.len())
            }
            JobKind::Cleanup => "Cleanup finished".to_string(),
        }
    }
}

/// Observable lifecycle of a submitted job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum JobStatus {
    Pending,
    Running { current: u32, total: u32 },
    Succeeded { result: String },
    Failed { error: String },
}

struct QueuedJob {
    id: Uuid,
    kind: JobKind,
}

/// Handle to the background worker.
///
/// Cloning is cheap and every clone feeds the same worker.
#[derive(Clone)]
pub struct JobQueue {
    tx: mpsc::Sender<QueuedJob>,
    statuses: Arc<RwLock<HashMap<Uuid, JobStatus>>>,
}

impl JobQueue {
    /// Starts the worker with the production step delay of one second.
    pub fn new() -> Self {
        Self::with_timings(Duration::from_secs(1), STATUS_RETENTION)
    }

    /// Starts the worker with a custom per-step delay.
    pub fn with_step_delay(step_delay: Duration) -> Self {
        Self::with_timings(step_delay, STATUS_RETENTION)
    }

    /// Starts the worker with a custom step delay and status retention.
    ///
    /// Terminal statuses are evicted from the shared map once the
    /// retention window passes, so the map stays bounded by throughput
    /// rather than growing for the lifetime of the process.
    pub fn with_timings(step_delay: Duration, retention: Duration) -> Self {
        let (tx, mut rx) = mpsc::channel::<QueuedJob>(QUEUE_CAPACITY);
        let statuses: Arc<RwLock<HashMap<Uuid, JobStatus>>> = Arc::new(RwLock::new(HashMap::new()));

        let worker_statuses = statuses.clone();
        tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                run_job(&worker_statuses, job, step_delay, retention).await;
            }
            tracing::debug!("Job worker stopped, queue closed");
        });

        Self { tx, statuses }
    }

    /// Queues a job and returns its id, or `None` when the queue is full
    /// or the worker is gone.
    pub async fn submit(&self, kind: JobKind) -> Option<Uuid> {
        let id = Uuid::new_v4();
        self.statuses.write().await.insert(id, JobStatus::Pending);

        if self.tx.try_send(QueuedJob { id, kind }).is_err() {
            tracing::warn!(job_id = %id, "Job queue full, rejecting submission");
            self.statuses.write().await.remove(&id);
            return None;
        }

        tracing::debug!(job_id = %id, "Job submitted");
        Some(id)
    }

    /// Current status of a job, or `None` for unknown ids.
    pub async fn status(&self, id: Uuid) -> Option<JobStatus> {
        self.statuses.read().await.get(&id).cloned()
    }
}

impl Default for JobQueue {
    fn default() -> Self {
        Self::new()
    }
}

async fn run_job(
    statuses: &Arc<RwLock<HashMap<Uuid, JobStatus>>>,
    job: QueuedJob,
    step_delay: Duration,
    retention: Duration,
) {
    let total = job.kind.total_steps();
    tracing::debug!(job_id = %job.id, total, "Job started");

    for current in 1..=total {
        statuses
            .write()
            .await
            .insert(job.id, JobStatus::Running { current, total });
        tokio::time::sleep(step_delay).await;
    }

    let result = job.kind.describe_result();
    statuses
        .write()
        .await
        .insert(job.id, JobStatus::Succeeded { result });
    tracing::debug!(job_id = %job.id, "Job finished");

    // Keep the terminal status pollable for the retention window, then
    // drop it so the map cannot grow without bound.
    let evict_statuses = statuses.clone();
    let job_id = job.id;
    tokio::spawn(async move {
        tokio::time::sleep(retention).await;
        evict_statuses.write().await.remove(&job_id);
        tracing::trace!(job_id = %job_id, "Job status evicted");
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn wait_for_success(queue: &JobQueue, id: Uuid) -> JobStatus {
        for _ in 0..200 {
            if let Some(status @ JobStatus::Succeeded { .. }) = queue.status(id).await {
                return status;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("job {id} never succeeded");
    }

    #[tokio::test]
    async fn test_cleanup_job_runs_to_completion() {
        let queue = JobQueue::with_step_delay(Duration::from_millis(1));

        let id = queue.submit(JobKind::Cleanup).await.unwrap();
        let status = wait_for_success(&queue, id).await;

        assert_eq!(
            status,
            JobStatus::Succeeded {
                result: "Cleanup finished".to_string()
            }
        );
    }

    #[tokio::test]
    async fn test_send_email_result_names_recipient() {
        let queue = JobQueue::with_step_delay(Duration::from_millis(1));

        let id = queue
            .submit(JobKind::SendEmail {
                email: "alice@example.com".to_string(),
                subject: "hello".to_string(),
                message: "hi".to_string(),
            })
            .await
            .unwrap();

        match wait_for_success(&queue, id).await {
            JobStatus::Succeeded { result } => {
                assert!(result.contains("alice@example.com"));
                assert!(result.contains("hello"));
            }
            other => panic!("unexpected status {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_status_starts_pending_or_running() {
        let queue = JobQueue::with_step_delay(Duration::from_millis(50));

        let id = queue
            .submit(JobKind::ProcessData {
                data: "abc".to_string(),
            })
            .await
            .unwrap();

        let status = queue.status(id).await.unwrap();
        assert!(matches!(
            status,
            JobStatus::Pending | JobStatus::Running { .. }
        ));
    }

    #[tokio::test]
    async fn test_finished_status_is_evicted_after_retention() {
        let queue = JobQueue::with_timings(Duration::from_millis(1), Duration::from_millis(50));

        let id = queue.submit(JobKind::Cleanup).await.unwrap();
        wait_for_success(&queue, id).await;

        for _ in 0..200 {
            if queue.status(id).await.is_none() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("status for job {id} was never evicted");
    }

    #[tokio::test]
    async fn test_unknown_job_id_has_no_status() {
        let queue = JobQueue::with_step_delay(Duration::from_millis(1));
        assert_eq!(queue.status(Uuid::new_v4()).await, None);
    }

    #[test]
    fn test_status_serializes_with_tag() {
        let running = JobStatus::Running {
            current: 3,
            total: 10,
        };
        let json = serde_json::to_value(&running).unwrap();
        assert_eq!(json["status"], "running");
        assert_eq!(json["current"], 3);
    }
}
