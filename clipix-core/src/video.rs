use crate::types::VideoId;
use serde::{Deserialize, Serialize};

/// File extensions the backend accepts for upload.
pub const SUPPORTED_VIDEO_EXTENSIONS: &[&str] = &["mp4", "avi", "mov", "mkv", "webm", "flv"];

/// Returned by `POST /api/video/upload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadedVideo {
    pub video_id: VideoId,
    pub filename: String,
    pub duration: f64,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

/// Stored video metadata as returned by `GET /api/video/{id}/info`.
///
/// The backend owns this shape; only `video_id` and `filename` are required
/// so older records still decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub video_id: VideoId,
    pub filename: String,
    #[serde(default)]
    pub duration: f64,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub fps: Option<f64>,
    #[serde(default)]
    pub codec: Option<String>,
    #[serde(default)]
    pub has_audio: Option<bool>,
    #[serde(default)]
    pub file_size: Option<u64>,
    #[serde(default)]
    pub thumbnail_filename: Option<String>,
    #[serde(default)]
    pub uploaded_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoList {
    pub videos: Vec<VideoInfo>,
    #[serde(default)]
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrimRequest {
    pub video_id: VideoId,
    pub start_time: f64,
    pub end_time: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutSegment {
    pub start: f64,
    pub end: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CutRequest {
    pub video_id: VideoId,
    pub segments: Vec<CutSegment>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionRequest {
    pub video_id: VideoId,
    // Sent as `null` when absent; the backend treats that as auto-detect.
    pub language: Option<String>,
}

fn extension(filename: &str) -> Option<String> {
    let (stem, ext) = filename.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

pub fn is_supported_video_file(filename: &str) -> bool {
    extension(filename).is_some_and(|ext| SUPPORTED_VIDEO_EXTENSIONS.contains(&ext.as_str()))
}

pub fn video_mime_type(filename: &str) -> Option<&'static str> {
    let mime = match extension(filename)?.as_str() {
        "mp4" => "video/mp4",
        "avi" => "video/x-msvideo",
        "mov" => "video/quicktime",
        "mkv" => "video/x-matroska",
        "webm" => "video/webm",
        "flv" => "video/x-flv",
        _ => return None,
    };
    Some(mime)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_supported_extensions_case_insensitively() {
        assert!(is_supported_video_file("clip.MP4"));
        assert!(is_supported_video_file("a.b.webm"));
        assert!(!is_supported_video_file("notes.txt"));
        assert!(!is_supported_video_file("mp4"));
        assert!(!is_supported_video_file(".mkv"));
    }

    #[test]
    fn maps_mime_types() {
        assert_eq!(video_mime_type("x.mov"), Some("video/quicktime"));
        assert_eq!(video_mime_type("x.gif"), None);
    }

    #[test]
    fn caption_request_sends_null_language() {
        let req = CaptionRequest {
            video_id: VideoId::new("v1"),
            language: None,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["video_id"], "v1");
        assert!(json["language"].is_null());
    }

    #[test]
    fn decodes_stored_video_document() {
        let body = r#"{
            "video_id": "v1", "filename": "cat.mp4", "stored_filename": "v1.mp4",
            "duration": 12.5, "width": 1920, "height": 1080, "fps": 29.97,
            "codec": "h264", "has_audio": true, "file_size": 1024,
            "thumbnail_filename": "v1_thumb.jpg", "uploaded_at": "2024-01-01T00:00:00+00:00"
        }"#;
        let info: VideoInfo = serde_json::from_str(body).unwrap();
        assert_eq!(info.video_id, VideoId::new("v1"));
        assert_eq!(info.codec.as_deref(), Some("h264"));
        assert_eq!(info.has_audio, Some(true));
    }
}
