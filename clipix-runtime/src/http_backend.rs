use anyhow::Context;
use async_trait::async_trait;
use clipix_core::{
    CaptionRequest, ClientConfig, CutRequest, HealthStatus, JobId, JobSnapshot, JobSubmission,
    TrimRequest, UploadedVideo, VideoId, VideoInfo, VideoList,
};
use clipix_engine::traits::VideoBackend;
use clipix_providers::endpoints::{self, ApiUrls};
use clipix_providers::multipart::VideoFile;
use clipix_providers::parse::parse_json;
use clipix_providers::runtime::{HttpRuntime, UploadProgressFn};

/// [`VideoBackend`] over the backend's REST API.
#[derive(Debug, Clone)]
pub struct HttpVideoBackend {
    urls: ApiUrls,
    http: HttpRuntime,
}

impl HttpVideoBackend {
    pub fn from_config(cfg: &ClientConfig) -> anyhow::Result<Self> {
        cfg.validate().context("invalid client config")?;
        let urls = ApiUrls::new(&cfg.backend_url)?;
        let http = HttpRuntime::new(cfg.request_timeout(), cfg.upload_timeout())?;
        Ok(Self { urls, http })
    }

    pub fn urls(&self) -> &ApiUrls {
        &self.urls
    }
}

#[async_trait]
impl VideoBackend for HttpVideoBackend {
    async fn upload_video(
        &self,
        file: VideoFile,
        on_progress: Option<UploadProgressFn>,
    ) -> anyhow::Result<UploadedVideo> {
        let req = endpoints::build_upload_video_request(&self.urls, &file);
        let resp = self
            .http
            .execute_with_upload_progress(&req, on_progress)
            .await?;
        parse_json(&resp, "upload")
    }

    async fn video_info(&self, id: &VideoId) -> anyhow::Result<VideoInfo> {
        let req = endpoints::build_video_info_request(&self.urls, id);
        parse_json(&self.http.execute(&req).await?, "video info")
    }

    async fn trim_video(&self, req: &TrimRequest) -> anyhow::Result<JobSubmission> {
        let req = endpoints::build_trim_request(&self.urls, req)?;
        parse_json(&self.http.execute(&req).await?, "trim submission")
    }

    async fn cut_video(&self, req: &CutRequest) -> anyhow::Result<JobSubmission> {
        let req = endpoints::build_cut_request(&self.urls, req)?;
        parse_json(&self.http.execute(&req).await?, "cut submission")
    }

    async fn generate_captions(&self, req: &CaptionRequest) -> anyhow::Result<JobSubmission> {
        let req = endpoints::build_captions_request(&self.urls, req)?;
        parse_json(&self.http.execute(&req).await?, "captions submission")
    }

    async fn job_status(&self, id: &JobId) -> anyhow::Result<JobSnapshot> {
        let req = endpoints::build_job_status_request(&self.urls, id);
        parse_json(&self.http.execute(&req).await?, "job status")
    }

    async fn list_videos(&self) -> anyhow::Result<VideoList> {
        let req = endpoints::build_list_videos_request(&self.urls);
        parse_json(&self.http.execute(&req).await?, "video list")
    }

    async fn health(&self) -> anyhow::Result<HealthStatus> {
        let req = endpoints::build_health_request(&self.urls);
        parse_json(&self.http.execute(&req).await?, "health")
    }
}
