//! In-process job queue on the tokio runtime.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use tokio::sync::watch;

use crate::traits::{Job, JobQueue};

type Running = Arc<Mutex<HashSet<String>>>;

/// Runs each job as a tokio task and refuses duplicate keys while one is running.
pub struct TokioJobQueue {
    running: Running,
    active: watch::Sender<usize>,
}

impl TokioJobQueue {
    /// Empty queue.
    #[must_use]
    pub fn new() -> Self {
        let (active, _) = watch::channel(0);
        Self {
            running: Arc::new(Mutex::new(HashSet::new())),
            active,
        }
    }

    /// Resolve once no job is running.
    pub async fn wait_idle(&self) {
        let mut rx = self.active.subscribe();
        // The sender lives in `self`, so the channel cannot close while we wait.
        let _ = rx.wait_for(|n| *n == 0).await;
    }

    /// Number of jobs currently running.
    pub fn len(&self) -> usize {
        *self.active.borrow()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for TokioJobQueue {
    fn default() -> Self {
        Self::new()
    }
}

fn lock(running: &Mutex<HashSet<String>>) -> MutexGuard<'_, HashSet<String>> {
    running.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Removes the key when the job finishes, panics included.
struct Finished {
    key: String,
    running: Running,
    active: watch::Sender<usize>,
}

impl Drop for Finished {
    fn drop(&mut self) {
        let mut running = lock(&self.running);
        running.remove(&self.key);
        self.active.send_replace(running.len());
        log::debug!("Job {} finished", self.key);
    }
}

#[async_trait]
impl JobQueue for TokioJobQueue {
    async fn spawn(&self, key: &str, job: Job) -> bool {
        {
            let mut running = lock(&self.running);
            if !running.insert(key.to_string()) {
                return false;
            }
            self.active.send_replace(running.len());
        }

        let guard = Finished {
            key: key.to_string(),
            running: Arc::clone(&self.running),
            active: self.active.clone(),
        };
        tokio::spawn(async move {
            let _guard = guard;
            job.await;
        });

        log::debug!("Job {key} started");
        true
    }

    async fn in_flight(&self) -> Vec<String> {
        let mut keys: Vec<String> = lock(&self.running).iter().cloned().collect();
        keys.sort();
        keys
    }
}
