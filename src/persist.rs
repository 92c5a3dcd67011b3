//! Fire-and-forget persistence of saved images.
//!
//! The comparison engine updates `saved` immediately; the network call runs
//! on a worker thread and its outcome is reported back later. Outcomes never
//! feed back into engine state.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};
use std::thread::{self, JoinHandle};

use crate::model::SaveResponse;
use crate::remote::ImageService;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SaveJob {
    pub batch_id: String,
    pub paths: Vec<String>,
    pub target_folder: String,
}

#[derive(Debug)]
pub struct SaveOutcome {
    pub job: SaveJob,
    pub result: Result<SaveResponse, String>,
}

pub struct SaveQueue {
    jobs: Option<Sender<SaveJob>>,
    outcomes: Receiver<SaveOutcome>,
    worker: Option<JoinHandle<()>>,
    pending: usize,
}

impl SaveQueue {
    pub fn spawn(service: Arc<dyn ImageService + Send + Sync>) -> Self {
        let (job_tx, job_rx) = mpsc::channel::<SaveJob>();
        let (out_tx, out_rx) = mpsc::channel::<SaveOutcome>();

        let worker = thread::spawn(move || {
            for job in job_rx {
                let result = service
                    .save_selected(&job.batch_id, &job.paths, &job.target_folder)
                    .map_err(|e| e.to_string());
                match &result {
                    Ok(resp) => tracing::info!(
                        batch = %job.batch_id,
                        success = resp.success.len(),
                        conflicts = resp.conflicts.len(),
                        failed = resp.failed.len(),
                        "save persisted"
                    ),
                    Err(err) => tracing::warn!(batch = %job.batch_id, %err, "save failed"),
                }
                if out_tx.send(SaveOutcome { job, result }).is_err() {
                    break;
                }
            }
        });

        Self {
            jobs: Some(job_tx),
            outcomes: out_rx,
            worker: Some(worker),
            pending: 0,
        }
    }

    pub fn enqueue(&mut self, job: SaveJob) -> bool {
        let Some(jobs) = &self.jobs else {
            return false;
        };
        if jobs.send(job).is_err() {
            return false;
        }
        self.pending += 1;
        true
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Collects every outcome that has arrived, without blocking.
    pub fn drain(&mut self) -> Vec<SaveOutcome> {
        let mut out = Vec::new();
        loop {
            match self.outcomes.try_recv() {
                Ok(outcome) => {
                    self.pending = self.pending.saturating_sub(1);
                    out.push(outcome);
                }
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        out
    }

    /// Stops accepting jobs and waits for queued ones to finish.
    pub fn shutdown(mut self) -> Vec<SaveOutcome> {
        self.close();
        self.drain_remaining()
    }

    fn close(&mut self) {
        self.jobs.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::warn!("save worker panicked");
            }
        }
    }

    fn drain_remaining(&mut self) -> Vec<SaveOutcome> {
        let out: Vec<SaveOutcome> = self.outcomes.try_iter().collect();
        self.pending = 0;
        out
    }
}

impl Drop for SaveQueue {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
#[path = "tests/persist_tests.rs"]
mod tests;
