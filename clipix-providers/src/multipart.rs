use std::path::PathBuf;

use bytes::Bytes;

use crate::request::{Body, HttpRequest};

/// Where the upload's payload comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VideoSource {
    /// Already in memory. Chunks are sliced, never copied.
    Bytes(Bytes),
    /// Read from disk while sending; `len` is fixed when the file is opened
    /// for upload so Content-Length stays truthful.
    File { path: PathBuf, len: u64 },
}

impl VideoSource {
    pub fn len(&self) -> u64 {
        match self {
            VideoSource::Bytes(b) => b.len() as u64,
            VideoSource::File { len, .. } => *len,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoFile {
    pub filename: String,
    pub mime_type: String,
    pub source: VideoSource,
}

impl VideoFile {
    /// In-memory video. Guesses the MIME type from the file extension.
    pub fn new(filename: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self::with_source(filename.into(), VideoSource::Bytes(bytes.into()))
    }

    /// Video streamed from `path` at upload time.
    pub fn from_path(filename: impl Into<String>, path: impl Into<PathBuf>, len: u64) -> Self {
        Self::with_source(
            filename.into(),
            VideoSource::File {
                path: path.into(),
                len,
            },
        )
    }

    fn with_source(filename: String, source: VideoSource) -> Self {
        let mime_type = clipix_core::video_mime_type(&filename)
            .unwrap_or("application/octet-stream")
            .to_string();
        Self {
            filename,
            mime_type,
            source,
        }
    }

    pub fn len(&self) -> u64 {
        self.source.len()
    }

    pub fn is_empty(&self) -> bool {
        self.source.is_empty()
    }
}

/// Builds a `multipart/form-data` request with a single `file` part.
///
/// Only the part header and the closing boundary are materialised; the
/// payload itself stays in `file.source` until the runtime streams it.
pub fn build_upload_request(url: impl Into<String>, file: &VideoFile) -> HttpRequest {
    let boundary = format!("Boundary-{}", uuid::Uuid::new_v4());

    let head = part_head(&boundary, "file", &file.filename, &file.mime_type);
    let tail = format!("\r\n--{}--\r\n", boundary);

    HttpRequest {
        method: "POST".into(),
        url: url.into(),
        headers: vec![
            (
                "Content-Type".into(),
                format!("multipart/form-data; boundary={}", boundary),
            ),
            ("Accept".into(), "application/json".into()),
        ],
        body: Body::MultipartFormData {
            boundary,
            head: Bytes::from(head),
            payload: file.source.clone(),
            tail: Bytes::from(tail),
        },
    }
}

fn part_head(boundary: &str, name: &str, filename: &str, mime_type: &str) -> String {
    // Quotes would terminate the header parameter early.
    let filename = filename.replace('"', "_");
    format!(
        "--{boundary}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: {mime_type}\r\n\r\n"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn head_and_tail(req: &HttpRequest) -> (String, String) {
        match &req.body {
            Body::MultipartFormData { head, tail, .. } => (
                String::from_utf8_lossy(head).into_owned(),
                String::from_utf8_lossy(tail).into_owned(),
            ),
            _ => panic!("expected multipart"),
        }
    }

    #[test]
    fn builds_single_file_part() {
        let file = VideoFile::new("holiday.mp4", vec![1u8, 2, 3]);
        assert_eq!(file.mime_type, "video/mp4");

        let req = build_upload_request("http://localhost:8001/api/video/upload", &file);
        assert_eq!(req.method, "POST");
        let content_type = req.header("content-type").unwrap();
        assert!(content_type.starts_with("multipart/form-data; boundary=Boundary-"));

        let (head, tail) = head_and_tail(&req);
        assert!(head.contains("name=\"file\"; filename=\"holiday.mp4\""));
        assert!(head.contains("Content-Type: video/mp4"));
        assert!(head.ends_with("\r\n\r\n"));
        match &req.body {
            Body::MultipartFormData { boundary, .. } => {
                assert_eq!(tail, format!("\r\n--{}--\r\n", boundary));
            }
            _ => unreachable!(),
        }
        assert_eq!(req.body_len(), (head.len() + 3 + tail.len()) as u64);
    }

    #[test]
    fn shares_in_memory_payload_without_copying() {
        let bytes = Bytes::from(vec![9u8; 1024]);
        let file = VideoFile::new("clip.mp4", bytes.clone());
        let req = build_upload_request("http://h/api/video/upload", &file);
        match &req.body {
            Body::MultipartFormData {
                payload: VideoSource::Bytes(b),
                ..
            } => assert_eq!(b.as_ptr(), bytes.as_ptr()),
            _ => panic!("expected in-memory multipart"),
        }
    }

    #[test]
    fn file_source_keeps_path_and_length() {
        let file = VideoFile::from_path("big.mkv", "/videos/big.mkv", 5_000_000_000);
        assert_eq!(file.mime_type, "video/x-matroska");
        assert_eq!(file.len(), 5_000_000_000);

        let req = build_upload_request("http://h/api/video/upload", &file);
        let (head, tail) = head_and_tail(&req);
        assert_eq!(
            req.body_len(),
            head.len() as u64 + 5_000_000_000 + tail.len() as u64
        );
    }

    #[test]
    fn unknown_extension_falls_back_to_octet_stream() {
        let file = VideoFile::new("raw.bin", Vec::<u8>::new());
        assert_eq!(file.mime_type, "application/octet-stream");
        assert!(file.is_empty());
    }

    #[test]
    fn sanitizes_quotes_in_filename() {
        let file = VideoFile::new("a\"b.mp4", vec![0u8]);
        let req = build_upload_request("http://h/api/video/upload", &file);
        let (head, _) = head_and_tail(&req);
        assert!(head.contains("filename=\"a_b.mp4\""));
    }
}
