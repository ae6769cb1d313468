use async_trait::async_trait;
use clipix_core::{
    CaptionRequest, CutRequest, HealthStatus, JobId, JobSnapshot, JobSubmission, TrimRequest,
    UploadedVideo, VideoId, VideoInfo, VideoList,
};
use clipix_providers::multipart::VideoFile;
use clipix_providers::runtime::UploadProgressFn;

/// The remote video-editing service.
///
/// All processing happens server-side; implementations only move requests
/// and snapshots across the wire.
#[async_trait]
pub trait VideoBackend: Send + Sync {
    async fn upload_video(
        &self,
        file: VideoFile,
        on_progress: Option<UploadProgressFn>,
    ) -> anyhow::Result<UploadedVideo>;

    async fn video_info(&self, id: &VideoId) -> anyhow::Result<VideoInfo>;

    async fn trim_video(&self, req: &TrimRequest) -> anyhow::Result<JobSubmission>;

    async fn cut_video(&self, req: &CutRequest) -> anyhow::Result<JobSubmission>;

    async fn generate_captions(&self, req: &CaptionRequest) -> anyhow::Result<JobSubmission>;

    async fn job_status(&self, id: &JobId) -> anyhow::Result<JobSnapshot>;

    async fn list_videos(&self) -> anyhow::Result<VideoList>;

    async fn health(&self) -> anyhow::Result<HealthStatus>;
}
