use crate::runtime::HttpResponse;
use anyhow::Context;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// A non-2xx answer from the backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("backend request failed: status={status} detail={detail}")]
pub struct HttpStatusError {
    pub status: u16,
    pub detail: String,
}

impl HttpStatusError {
    pub fn is_not_found(&self) -> bool {
        self.status == 404
    }
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

/// Pulls the human-readable message out of an error body.
///
/// The backend answers errors with `{"detail": "..."}`; validation errors
/// carry a structured `detail`, which is kept as compact JSON.
pub fn error_detail(body: &[u8]) -> String {
    match serde_json::from_slice::<ErrorBody>(body) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(s),
        }) => s,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) => String::from_utf8_lossy(body).trim().to_string(),
    }
}

pub fn ensure_success(resp: &HttpResponse) -> Result<(), HttpStatusError> {
    if (200..=299).contains(&resp.status) {
        return Ok(());
    }
    Err(HttpStatusError {
        status: resp.status,
        detail: error_detail(&resp.body),
    })
}

pub fn parse_json<T: DeserializeOwned>(resp: &HttpResponse, what: &str) -> anyhow::Result<T> {
    ensure_success(resp)?;
    let value = serde_json::from_slice(&resp.body).with_context(|| format!("decode {what} JSON"))?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clipix_core::{JobSnapshot, JobState};

    fn resp(status: u16, body: &str) -> HttpResponse {
        HttpResponse {
            status,
            body: body.as_bytes().to_vec(),
        }
    }

    #[test]
    fn extracts_string_detail() {
        assert_eq!(error_detail(br#"{"detail":"Job not found"}"#), "Job not found");
    }

    #[test]
    fn keeps_structured_detail_as_json() {
        let d = error_detail(br#"{"detail":[{"loc":["body","video_id"],"msg":"field required"}]}"#);
        assert!(d.contains("field required"));
    }

    #[test]
    fn falls_back_to_raw_body() {
        assert_eq!(error_detail(b" Bad Gateway \n"), "Bad Gateway");
    }

    #[test]
    fn non_success_becomes_status_error() {
        let err = parse_json::<JobSnapshot>(&resp(404, r#"{"detail":"Job not found"}"#), "job")
            .unwrap_err();
        let status = err.downcast_ref::<HttpStatusError>().unwrap();
        assert!(status.is_not_found());
        assert_eq!(status.detail, "Job not found");
    }

    #[test]
    fn decodes_success_body() {
        let snap: JobSnapshot =
            parse_json(&resp(200, r#"{"status":"processing","progress":0.3}"#), "job").unwrap();
        assert_eq!(snap.status, JobState::Processing);
    }

    #[test]
    fn malformed_success_body_errors() {
        assert!(parse_json::<JobSnapshot>(&resp(200, "<html>"), "job").is_err());
    }
}
