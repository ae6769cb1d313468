use crate::poller::{PollError, PollOptions, poll_job};
use crate::traits::VideoBackend;
use clipix_core::{
    CaptionRequest, CaptionResult, CutRequest, JobId, JobSnapshot, JobSubmission,
    ProcessedVideo, TrimRequest, UploadedVideo,
};
use clipix_providers::multipart::VideoFile;
use clipix_providers::runtime::UploadProgressFn;
use std::sync::Arc;
use thiserror::Error;
use tokio_util::sync::CancellationToken;

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("submit {operation} job: {error:#}")]
    Submit {
        operation: &'static str,
        error: anyhow::Error,
    },

    #[error(transparent)]
    Poll(#[from] PollError),

    #[error("job {0} completed without a usable result")]
    MissingResult(JobId),
}

/// Submit-then-wait workflows over a [`VideoBackend`].
///
/// Each `*_and_wait` call submits one job and polls it to a terminal state.
/// The progress hook sees every snapshot and must be fast.
#[derive(Clone)]
pub struct VideoEditor {
    backend: Arc<dyn VideoBackend>,
    poll: PollOptions,
}

impl VideoEditor {
    pub fn new(backend: Arc<dyn VideoBackend>, poll: PollOptions) -> Self {
        Self { backend, poll }
    }

    pub fn backend(&self) -> &Arc<dyn VideoBackend> {
        &self.backend
    }

    pub async fn upload(
        &self,
        file: VideoFile,
        on_progress: Option<UploadProgressFn>,
    ) -> anyhow::Result<UploadedVideo> {
        let name = file.filename.clone();
        let size = file.len();
        let uploaded = self.backend.upload_video(file, on_progress).await?;
        log::info!("uploaded {name} ({size} bytes) as {}", uploaded.video_id);
        Ok(uploaded)
    }

    pub async fn wait_for_job<F>(
        &self,
        job_id: &JobId,
        cancel: &CancellationToken,
        on_progress: F,
    ) -> Result<JobSnapshot, EditorError>
    where
        F: FnMut(&JobSnapshot) + Send,
    {
        Ok(poll_job(self.backend.as_ref(), job_id, &self.poll, cancel, on_progress).await?)
    }

    pub async fn trim_and_wait<F>(
        &self,
        req: &TrimRequest,
        cancel: &CancellationToken,
        on_progress: F,
    ) -> Result<ProcessedVideo, EditorError>
    where
        F: FnMut(&JobSnapshot) + Send,
    {
        let submission = submitted("trim", self.backend.trim_video(req).await)?;
        let done = self
            .wait_for_job(&submission.job_id, cancel, on_progress)
            .await?;
        done.processed_video()
            .ok_or(EditorError::MissingResult(submission.job_id))
    }

    pub async fn cut_and_wait<F>(
        &self,
        req: &CutRequest,
        cancel: &CancellationToken,
        on_progress: F,
    ) -> Result<ProcessedVideo, EditorError>
    where
        F: FnMut(&JobSnapshot) + Send,
    {
        let submission = submitted("cut", self.backend.cut_video(req).await)?;
        let done = self
            .wait_for_job(&submission.job_id, cancel, on_progress)
            .await?;
        done.processed_video()
            .ok_or(EditorError::MissingResult(submission.job_id))
    }

    pub async fn captions_and_wait<F>(
        &self,
        req: &CaptionRequest,
        cancel: &CancellationToken,
        on_progress: F,
    ) -> Result<CaptionResult, EditorError>
    where
        F: FnMut(&JobSnapshot) + Send,
    {
        let submission = submitted("captions", self.backend.generate_captions(req).await)?;
        let done = self
            .wait_for_job(&submission.job_id, cancel, on_progress)
            .await?;
        done.captions()
            .ok_or(EditorError::MissingResult(submission.job_id))
    }
}

fn submitted(
    operation: &'static str,
    res: anyhow::Result<JobSubmission>,
) -> Result<JobSubmission, EditorError> {
    match res {
        Ok(submission) => {
            log::info!("{operation} job {} submitted ({})", submission.job_id, submission.status);
            Ok(submission)
        }
        Err(error) => Err(EditorError::Submit { operation, error }),
    }
}
