use anyhow::Context;
use bytes::Bytes;
use serde::Serialize;

use crate::multipart::VideoSource;

#[derive(Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Body,
}

impl std::fmt::Debug for HttpRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let body_summary = match &self.body {
            Body::Empty => "Empty".to_string(),
            Body::Json(s) => format!("Json(len={})", s.len()),
            Body::MultipartFormData { boundary, .. } => {
                format!(
                    "MultipartFormData(boundary={}, len={})",
                    boundary,
                    self.body_len()
                )
            }
        };

        f.debug_struct("HttpRequest")
            .field("method", &self.method)
            .field("url", &self.url)
            .field("headers", &self.headers)
            .field("body", &body_summary)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Body {
    Empty,
    Json(String),
    /// One file part: `head` and `tail` frame the payload, which is streamed.
    MultipartFormData {
        boundary: String,
        head: Bytes,
        payload: VideoSource,
        tail: Bytes,
    },
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: "GET".into(),
            url: url.into(),
            headers: vec![("Accept".into(), "application/json".into())],
            body: Body::Empty,
        }
    }

    pub fn post_json<T: Serialize>(url: impl Into<String>, payload: &T) -> anyhow::Result<Self> {
        let json = serde_json::to_string(payload).context("encode request JSON")?;
        Ok(Self {
            method: "POST".into(),
            url: url.into(),
            headers: vec![
                ("Content-Type".into(), "application/json".into()),
                ("Accept".into(), "application/json".into()),
            ],
            body: Body::Json(json),
        })
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn body_len(&self) -> u64 {
        match &self.body {
            Body::Empty => 0,
            Body::Json(s) => s.len() as u64,
            Body::MultipartFormData {
                head,
                payload,
                tail,
                ..
            } => head.len() as u64 + payload.len() + tail.len() as u64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_is_case_insensitive() {
        let req = HttpRequest::get("https://example.com/api/videos");
        assert_eq!(req.header("accept"), Some("application/json"));
        assert_eq!(req.body_len(), 0);
    }

    #[test]
    fn post_json_encodes_payload() {
        let req = HttpRequest::post_json(
            "https://example.com/api/video/trim",
            &serde_json::json!({"video_id": "v1"}),
        )
        .unwrap();
        assert_eq!(req.method, "POST");
        assert_eq!(req.header("content-type"), Some("application/json"));
        match req.body {
            Body::Json(s) => assert!(s.contains("\"video_id\":\"v1\"")),
            _ => panic!("expected json"),
        }
    }

    #[test]
    fn debug_summarizes_upload_body() {
        let req = HttpRequest {
            method: "POST".into(),
            url: "https://example.com/api/video/upload".into(),
            headers: Vec::new(),
            body: Body::MultipartFormData {
                boundary: "b".into(),
                head: Bytes::from_static(b"head"),
                payload: VideoSource::Bytes(Bytes::from(vec![0xAB; 64])),
                tail: Bytes::from_static(b"tail"),
            },
        };

        let s = format!("{req:?}");
        assert!(s.contains("MultipartFormData(boundary=b, len=72)"));
        assert!(!s.contains("\\xab"));
    }
}
