use crate::traits::VideoBackend;
use clipix_core::{DEFAULT_POLL_INTERVAL_MS, JobId, JobSnapshot, JobState};
use std::time::Duration;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Error)]
pub enum PollError {
    /// The job reached `failed`; carries the server's message or the default.
    #[error("{0}")]
    Failed(String),

    #[error("job polling cancelled")]
    Cancelled,

    /// The status request itself failed. Not retried.
    #[error(transparent)]
    Transport(anyhow::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollOptions {
    /// Delay before each status request, including the first.
    pub interval: Duration,
}

impl Default for PollOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
        }
    }
}

impl PollOptions {
    pub fn every(interval: Duration) -> Self {
        Self { interval }
    }
}

/// Polls `GET /api/job/{id}` until the job is terminal.
///
/// Polls run strictly one after another: the next wait starts only after the
/// previous response arrived. There is no attempt limit and no backoff; the
/// loop ends on a terminal status, on the first transport error, or when
/// `cancel` fires (checked while waiting and while a request is in flight).
pub async fn poll_job<B, F>(
    backend: &B,
    job_id: &JobId,
    opts: &PollOptions,
    cancel: &CancellationToken,
    mut on_progress: F,
) -> Result<JobSnapshot, PollError>
where
    B: VideoBackend + ?Sized,
    F: FnMut(&JobSnapshot) + Send,
{
    let mut attempt = 0u64;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                log::info!("job {job_id}: polling cancelled after {attempt} polls");
                return Err(PollError::Cancelled);
            }
            _ = tokio::time::sleep(opts.interval) => {}
        }

        attempt += 1;
        let snapshot = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                log::info!("job {job_id}: polling cancelled mid-request");
                return Err(PollError::Cancelled);
            }
            res = backend.job_status(job_id) => match res {
                Ok(s) => s,
                Err(e) => {
                    log::warn!("job {job_id}: status request failed on poll {attempt}: {e:#}");
                    return Err(PollError::Transport(e));
                }
            },
        };

        on_progress(&snapshot);

        if snapshot.status == JobState::Completed {
            log::info!("job {job_id}: completed after {attempt} polls");
            return Ok(snapshot);
        }
        if snapshot.status == JobState::Failed {
            let message = snapshot.failure_message();
            log::warn!("job {job_id}: failed: {message}");
            return Err(PollError::Failed(message));
        }

        log::debug!(
            "job {job_id}: {} ({:.0}%) {}",
            snapshot.status,
            snapshot.progress * 100.0,
            snapshot.message
        );
    }
}
