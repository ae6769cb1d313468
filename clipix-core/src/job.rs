use crate::types::{CaptionId, JobId, ResultId};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub const DEFAULT_JOB_FAILED_MESSAGE: &str = "Job failed";

/// Server-side job status.
///
/// Only `completed` and `failed` are terminal. The backend's in-progress
/// vocabulary is not fixed, so unknown values are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum JobState {
    Pending,
    Processing,
    Completed,
    Failed,
    Other(String),
}

impl JobState {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "pending" => JobState::Pending,
            "processing" => JobState::Processing,
            "completed" => JobState::Completed,
            "failed" => JobState::Failed,
            other => JobState::Other(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            JobState::Pending => "pending",
            JobState::Processing => "processing",
            JobState::Completed => "completed",
            JobState::Failed => "failed",
            JobState::Other(s) => s,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Completed | JobState::Failed)
    }
}

impl std::fmt::Display for JobState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for JobState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for JobState {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(JobState::parse(&raw))
    }
}

/// Returned by the trim/cut/captions submission endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSubmission {
    pub job_id: JobId,
    pub status: JobState,
}

/// A point-in-time read of `GET /api/job/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSnapshot {
    #[serde(default)]
    pub job_id: Option<JobId>,
    pub status: JobState,
    #[serde(default)]
    pub progress: f64,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub result: Option<serde_json::Value>,
    #[serde(default)]
    pub error: Option<String>,
}

impl JobSnapshot {
    pub fn new(status: JobState) -> Self {
        Self {
            job_id: None,
            status,
            progress: 0.0,
            message: String::new(),
            result: None,
            error: None,
        }
    }

    /// The message a failed job should surface: the server's error, or the
    /// default when none (or an empty one) was supplied.
    pub fn failure_message(&self) -> String {
        self.error
            .as_deref()
            .filter(|e| !e.is_empty())
            .unwrap_or(DEFAULT_JOB_FAILED_MESSAGE)
            .to_string()
    }

    pub fn processed_video(&self) -> Option<ProcessedVideo> {
        self.decode_result()
    }

    pub fn captions(&self) -> Option<CaptionResult> {
        self.decode_result()
    }

    fn decode_result<T: serde::de::DeserializeOwned>(&self) -> Option<T> {
        let value = self.result.as_ref()?;
        serde_json::from_value(value.clone()).ok()
    }
}

/// Result payload of a completed trim or cut job.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessedVideo {
    pub result_id: ResultId,
    pub download_url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

/// Result payload of a completed caption job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionResult {
    pub caption_id: CaptionId,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub segments: Vec<CaptionSegment>,
    pub srt_url: String,
    pub vtt_url: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_completed_and_failed_are_terminal() {
        assert!(JobState::Completed.is_terminal());
        assert!(JobState::Failed.is_terminal());
        assert!(!JobState::Pending.is_terminal());
        assert!(!JobState::Processing.is_terminal());
        assert!(!JobState::Other("running".into()).is_terminal());
    }

    #[test]
    fn unknown_status_round_trips_verbatim() {
        let s: JobState = serde_json::from_str("\"running\"").unwrap();
        assert_eq!(s, JobState::Other("running".into()));
        assert_eq!(serde_json::to_string(&s).unwrap(), "\"running\"");
    }

    #[test]
    fn decodes_minimal_snapshot() {
        let snap: JobSnapshot = serde_json::from_str(r#"{"status":"failed"}"#).unwrap();
        assert_eq!(snap.status, JobState::Failed);
        assert_eq!(snap.progress, 0.0);
        assert_eq!(snap.failure_message(), DEFAULT_JOB_FAILED_MESSAGE);
    }

    #[test]
    fn failure_message_prefers_server_error() {
        let mut snap = JobSnapshot::new(JobState::Failed);
        snap.error = Some("Video not found".into());
        assert_eq!(snap.failure_message(), "Video not found");

        snap.error = Some(String::new());
        assert_eq!(snap.failure_message(), DEFAULT_JOB_FAILED_MESSAGE);
    }

    #[test]
    fn decodes_typed_results() {
        let snap: JobSnapshot = serde_json::from_str(
            r#"{"job_id":"j","status":"completed","progress":1.0,"message":"",
                "result":{"result_id":"r1","download_url":"/api/video/download/r1"}}"#,
        )
        .unwrap();
        let video = snap.processed_video().unwrap();
        assert_eq!(video.result_id, ResultId::new("r1"));
        assert!(snap.captions().is_none());

        let snap: JobSnapshot = serde_json::from_str(
            r#"{"status":"completed","result":{
                "caption_id":"c1","text":"hi","language":"en",
                "segments":[{"id":0,"start":0.0,"end":1.5,"text":"hi"}],
                "srt_url":"/api/captions/c1/srt","vtt_url":"/api/captions/c1/vtt"}}"#,
        )
        .unwrap();
        let captions = snap.captions().unwrap();
        assert_eq!(captions.caption_id, CaptionId::new("c1"));
        assert_eq!(captions.segments.len(), 1);
    }
}
