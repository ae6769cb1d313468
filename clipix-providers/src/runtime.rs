use crate::multipart::VideoSource;
use crate::request::{Body, HttpRequest};
use anyhow::{Context, anyhow};
use bytes::Bytes;
use futures_util::stream::{self, BoxStream, StreamExt};
use reqwest::header::{CONTENT_LENGTH, HeaderMap, HeaderName, HeaderValue};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio_util::io::ReaderStream;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const UPLOAD_CHUNK_SIZE: usize = 64 * 1024;

/// Upload progress in whole percent (0..=100).
pub type UploadProgressFn = Arc<dyn Fn(u8) + Send + Sync>;

#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

/// Shared HTTP client. Cheap to clone; connections are pooled.
#[derive(Debug, Clone)]
pub struct HttpRuntime {
    client: reqwest::Client,
    upload_timeout: Duration,
}

impl HttpRuntime {
    pub fn new(request_timeout: Duration, upload_timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(request_timeout)
            .build()
            .context("build http client")?;
        Ok(Self {
            client,
            upload_timeout,
        })
    }

    pub async fn execute(&self, req: &HttpRequest) -> anyhow::Result<HttpResponse> {
        self.execute_with_upload_progress(req, None).await
    }

    /// Sends `req`. Multipart bodies are streamed in chunks (from disk for
    /// file sources) and reported to `on_progress` as they are handed to the
    /// connection.
    pub async fn execute_with_upload_progress(
        &self,
        req: &HttpRequest,
        on_progress: Option<UploadProgressFn>,
    ) -> anyhow::Result<HttpResponse> {
        let mut headers = HeaderMap::new();
        for (k, v) in &req.headers {
            let name = HeaderName::from_bytes(k.as_bytes())
                .with_context(|| format!("invalid header name: {k}"))?;
            let value =
                HeaderValue::from_str(v).with_context(|| format!("invalid header value for {k}"))?;
            headers.insert(name, value);
        }

        let builder = match req.method.as_str() {
            "GET" => self.client.get(&req.url),
            "POST" => self.client.post(&req.url),
            other => return Err(anyhow!("unsupported method: {other}")),
        };

        let total = req.body_len();
        log::debug!("{} {} ({} bytes)", req.method, req.url, total);

        let builder = match &req.body {
            Body::Empty => builder.headers(headers),
            Body::Json(s) => builder.headers(headers).body(s.clone()),
            Body::MultipartFormData {
                head,
                payload,
                tail,
                ..
            } => {
                headers.insert(CONTENT_LENGTH, HeaderValue::from(total));
                let body = multipart_body(head, payload, tail, total, on_progress).await?;
                builder
                    .headers(headers)
                    .timeout(self.upload_timeout)
                    .body(body)
            }
        };

        let resp = builder.send().await.context("http request failed")?;
        let status = resp.status().as_u16();
        let body = resp
            .bytes()
            .await
            .context("failed reading response body")?
            .to_vec();

        log::debug!("{} {} -> {}", req.method, req.url, status);
        Ok(HttpResponse { status, body })
    }
}

pub fn upload_percent(sent: u64, total: u64) -> u8 {
    if total == 0 {
        return 100;
    }
    let pct = (sent as f64 * 100.0 / total as f64).round();
    pct.clamp(0.0, 100.0) as u8
}

async fn multipart_body(
    head: &Bytes,
    payload: &VideoSource,
    tail: &Bytes,
    total: u64,
    on_progress: Option<UploadProgressFn>,
) -> anyhow::Result<reqwest::Body> {
    let payload: BoxStream<'static, std::io::Result<Bytes>> = match payload {
        VideoSource::Bytes(bytes) => stream::iter(slice_chunks(bytes.clone()).map(Ok)).boxed(),
        VideoSource::File { path, len } => {
            let file = tokio::fs::File::open(path)
                .await
                .with_context(|| format!("failed to open video: {}", path.display()))?;
            // Never send more than Content-Length promised, even if the file grew.
            ReaderStream::with_capacity(file.take(*len), UPLOAD_CHUNK_SIZE).boxed()
        }
    };

    let mut sent = 0u64;
    let parts = stream::iter([Ok(head.clone())])
        .chain(payload)
        .chain(stream::iter([Ok(tail.clone())]))
        .map(move |chunk| {
            if let (Ok(bytes), Some(cb)) = (&chunk, &on_progress) {
                sent += bytes.len() as u64;
                cb(upload_percent(sent, total));
            }
            chunk
        });

    Ok(reqwest::Body::wrap_stream(parts))
}

/// Splits `bytes` into views over the same buffer.
fn slice_chunks(bytes: Bytes) -> impl Iterator<Item = Bytes> + Send + 'static {
    let len = bytes.len();
    (0..len)
        .step_by(UPLOAD_CHUNK_SIZE)
        .map(move |start| bytes.slice(start..(start + UPLOAD_CHUNK_SIZE).min(len)))
}
