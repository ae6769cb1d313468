use crate::multipart::{VideoFile, build_upload_request};
use crate::request::HttpRequest;
use anyhow::{Context, anyhow};
use clipix_core::{CaptionId, CaptionRequest, CutRequest, JobId, ResultId, TrimRequest, VideoId};
use url::Url;

/// URL layout of the backend: every endpoint lives under `{backend}/api`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiUrls {
    backend: Url,
    api_base: Url,
}

impl ApiUrls {
    pub fn new(backend_url: &str) -> anyhow::Result<Self> {
        let backend =
            Url::parse(backend_url.trim()).with_context(|| format!("parse backend URL: {backend_url}"))?;
        let mut api_base = backend.clone();
        api_base
            .path_segments_mut()
            .map_err(|_| anyhow!("backend URL cannot be a base: {backend_url}"))?
            .pop_if_empty()
            .push("api");
        Ok(Self { backend, api_base })
    }

    pub fn api_base(&self) -> &str {
        self.api_base.as_str()
    }

    fn endpoint(&self, segments: &[&str]) -> String {
        let mut url = self.api_base.clone();
        // The base was validated in `new`, so segments are always available.
        if let Ok(mut path) = url.path_segments_mut() {
            path.extend(segments);
        }
        url.into()
    }

    pub fn upload(&self) -> String {
        self.endpoint(&["video", "upload"])
    }

    pub fn video_info(&self, id: &VideoId) -> String {
        self.endpoint(&["video", id.as_str(), "info"])
    }

    pub fn video_stream(&self, id: &VideoId) -> String {
        self.endpoint(&["video", id.as_str(), "stream"])
    }

    pub fn video_thumbnail(&self, id: &VideoId) -> String {
        self.endpoint(&["video", id.as_str(), "thumbnail"])
    }

    pub fn trim(&self) -> String {
        self.endpoint(&["video", "trim"])
    }

    pub fn cut(&self) -> String {
        self.endpoint(&["video", "cut"])
    }

    pub fn captions(&self) -> String {
        self.endpoint(&["video", "captions"])
    }

    pub fn job(&self, id: &JobId) -> String {
        self.endpoint(&["job", id.as_str()])
    }

    pub fn download(&self, id: &ResultId) -> String {
        self.endpoint(&["video", "download", id.as_str()])
    }

    pub fn captions_srt(&self, id: &CaptionId) -> String {
        self.endpoint(&["captions", id.as_str(), "srt"])
    }

    pub fn captions_vtt(&self, id: &CaptionId) -> String {
        self.endpoint(&["captions", id.as_str(), "vtt"])
    }

    pub fn videos(&self) -> String {
        self.endpoint(&["videos"])
    }

    pub fn health(&self) -> String {
        self.endpoint(&["health"])
    }

    /// Makes a URL from a response (e.g. a job's `download_url`) absolute.
    ///
    /// Absolute and protocol-relative URLs follow normal URL resolution;
    /// root-relative paths stay under the backend's own path prefix.
    pub fn resolve(&self, url: &str) -> String {
        let joined = if url.starts_with('/') && !url.starts_with("//") {
            let prefix = self.backend.path().trim_end_matches('/');
            self.backend.join(&format!("{prefix}{url}"))
        } else {
            self.backend.join(url)
        };
        joined.map(String::from).unwrap_or_else(|_| url.to_string())
    }
}

pub fn build_upload_video_request(urls: &ApiUrls, file: &VideoFile) -> HttpRequest {
    build_upload_request(urls.upload(), file)
}

pub fn build_video_info_request(urls: &ApiUrls, id: &VideoId) -> HttpRequest {
    HttpRequest::get(urls.video_info(id))
}

pub fn build_trim_request(urls: &ApiUrls, req: &TrimRequest) -> anyhow::Result<HttpRequest> {
    HttpRequest::post_json(urls.trim(), req)
}

pub fn build_cut_request(urls: &ApiUrls, req: &CutRequest) -> anyhow::Result<HttpRequest> {
    HttpRequest::post_json(urls.cut(), req)
}

pub fn build_captions_request(
    urls: &ApiUrls,
    req: &CaptionRequest,
) -> anyhow::Result<HttpRequest> {
    HttpRequest::post_json(urls.captions(), req)
}

pub fn build_job_status_request(urls: &ApiUrls, id: &JobId) -> HttpRequest {
    HttpRequest::get(urls.job(id))
}

pub fn build_list_videos_request(urls: &ApiUrls) -> HttpRequest {
    HttpRequest::get(urls.videos())
}

pub fn build_health_request(urls: &ApiUrls) -> HttpRequest {
    HttpRequest::get(urls.health())
}
