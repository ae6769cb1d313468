use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU8, Ordering};

use anyhow::{Context, anyhow};
use clap::{ArgAction, Args, Parser, Subcommand};
use clipix_core::{
    CaptionId, CaptionRequest, ClientConfig, CutRequest, CutSegment, JobId, JobSnapshot,
    Navigator, ResultId, Route, TrimRequest, VideoId, is_supported_video_file,
};
use clipix_engine::editor::VideoEditor;
use clipix_engine::poller::PollOptions;
use clipix_providers::endpoints::ApiUrls;
use clipix_providers::runtime::UploadProgressFn;
use clipix_runtime::config_store::ConfigStore;
use clipix_runtime::defaults::{apply_process_env, default_config_path};
use clipix_runtime::files::open_video_file;
use clipix_runtime::http_backend::HttpVideoBackend;
use serde::Serialize;
use serde_json::json;
use tokio_util::sync::CancellationToken;

#[derive(Parser)]
#[command(name = "clipix", version, about = "Client for the Clipix video editing backend")]
struct Cli {
    /// Backend base URL (overrides config file and CLIPIX_BACKEND_URL).
    #[arg(long, global = true)]
    backend_url: Option<String>,

    /// Path to a JSON config file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// More log output on stderr (-v, -vv).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct WaitArgs {
    /// Print the job submission instead of waiting for the result.
    #[arg(long)]
    no_wait: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Upload a video file.
    Upload { file: PathBuf },
    /// Show stored metadata for a video.
    Info { video_id: String },
    /// List uploaded videos.
    List,
    /// Keep only the part of a video between START and END seconds.
    Trim {
        video_id: String,
        start: f64,
        end: f64,
        #[command(flatten)]
        wait: WaitArgs,
    },
    /// Keep the given START:END segments and join them.
    Cut {
        video_id: String,
        #[arg(required = true, value_parser = parse_segment)]
        segments: Vec<CutSegment>,
        #[command(flatten)]
        wait: WaitArgs,
    },
    /// Generate captions (language is auto-detected unless given).
    Captions {
        video_id: String,
        #[arg(long)]
        language: Option<String>,
        #[command(flatten)]
        wait: WaitArgs,
    },
    /// Fetch one job status snapshot.
    Job { job_id: String },
    /// Poll a job until it completes or fails.
    Wait { job_id: String },
    /// Print resource URLs (stream, thumbnail, download, subtitle files).
    Urls {
        #[arg(long)]
        video: Option<String>,
        #[arg(long)]
        result: Option<String>,
        #[arg(long)]
        captions: Option<String>,
    },
    /// Check backend health.
    Health,
    /// Resolve a shell route path (`/` or `/dashboard`).
    Route { path: String },
}

fn parse_segment(raw: &str) -> Result<CutSegment, String> {
    let (start, end) = raw
        .split_once(':')
        .ok_or_else(|| format!("expected START:END, got {raw:?}"))?;
    let start: f64 = start
        .trim()
        .parse()
        .map_err(|_| format!("invalid start in {raw:?}"))?;
    let end: f64 = end
        .trim()
        .parse()
        .map_err(|_| format!("invalid end in {raw:?}"))?;
    Ok(CutSegment { start, end })
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "warn,clipix_cli=info,clipix_engine=info",
        1 => "info,clipix_cli=debug,clipix_engine=debug,clipix_providers=debug",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default))
        .format_timestamp_millis()
        .init();
}

fn load_config(config: Option<&Path>, backend_url: Option<&str>) -> anyhow::Result<ClientConfig> {
    let path = config.map(Path::to_path_buf).or_else(default_config_path);
    let cfg = match path {
        Some(p) => ConfigStore::at_path(p).load_or_default()?,
        None => ClientConfig::default(),
    };
    let mut cfg = apply_process_env(cfg)?;
    if let Some(url) = backend_url {
        cfg.backend_url = url.to_string();
    }
    Ok(cfg)
}

/// Everything a command that talks to the backend needs.
struct Session {
    editor: VideoEditor,
    urls: ApiUrls,
}

fn connect(cfg: &ClientConfig) -> anyhow::Result<Session> {
    let backend = Arc::new(HttpVideoBackend::from_config(cfg)?);
    let urls = backend.urls().clone();
    log::debug!("backend: {}", urls.api_base());
    Ok(Session {
        editor: VideoEditor::new(backend, PollOptions::every(cfg.poll_interval())),
        urls,
    })
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value).context("encode output")?);
    Ok(())
}

fn log_progress(s: &JobSnapshot) {
    log::info!(
        "{} {:>3.0}% {}",
        s.status,
        (s.progress * 100.0).clamp(0.0, 100.0),
        s.message
    );
}

fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("interrupted, stopping");
            token.cancel();
        }
    });
    cancel
}

fn print_urls(
    urls: &ApiUrls,
    video: Option<String>,
    result: Option<String>,
    captions: Option<String>,
) -> anyhow::Result<()> {
    if video.is_none() && result.is_none() && captions.is_none() {
        return Err(anyhow!("pass at least one of --video, --result, --captions"));
    }

    let mut out = serde_json::Map::new();
    if let Some(id) = video.map(VideoId::new) {
        out.insert("stream".into(), json!(urls.video_stream(&id)));
        out.insert("thumbnail".into(), json!(urls.video_thumbnail(&id)));
    }
    if let Some(id) = result.map(ResultId::new) {
        out.insert("download".into(), json!(urls.download(&id)));
    }
    if let Some(id) = captions.map(CaptionId::new) {
        out.insert("srt".into(), json!(urls.captions_srt(&id)));
        out.insert("vtt".into(), json!(urls.captions_vtt(&id)));
    }
    print_json(&out)
}

fn print_route(path: &str) -> anyhow::Result<()> {
    let route = Route::from_path(path).ok_or_else(|| anyhow!("unknown route: {path}"))?;
    let mut nav = Navigator::new();
    let resolved = nav.navigate(route);
    print_json(&json!({ "route": format!("{:?}", nav.current()), "path": resolved }))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(cli).await
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        backend_url,
        config,
        command,
        ..
    } = cli;
    let settings = || load_config(config.as_deref(), backend_url.as_deref());
    let session = || -> anyhow::Result<Session> { connect(&settings()?) };

    match command {
        Command::Upload { file } => {
            let Session { editor, .. } = session()?;
            let video = open_video_file(&file).await?;
            if !is_supported_video_file(&video.filename) {
                log::warn!(
                    "{} does not look like a supported video; the backend may reject it",
                    video.filename
                );
            }

            let last = AtomicU8::new(u8::MAX);
            let progress: UploadProgressFn = Arc::new(move |pct: u8| {
                if last.swap(pct, Ordering::Relaxed) != pct {
                    eprint!("\ruploading {pct:>3}%");
                }
            });
            let uploaded = editor.upload(video, Some(progress)).await;
            eprintln!();
            print_json(&uploaded?)
        }
        Command::Info { video_id } => {
            let s = session()?;
            print_json(&s.editor.backend().video_info(&VideoId::new(video_id)).await?)
        }
        Command::List => print_json(&session()?.editor.backend().list_videos().await?),
        Command::Trim {
            video_id,
            start,
            end,
            wait,
        } => {
            let Session { editor, urls } = session()?;
            let req = TrimRequest {
                video_id: VideoId::new(video_id),
                start_time: start,
                end_time: end,
            };
            if wait.no_wait {
                return print_json(&editor.backend().trim_video(&req).await?);
            }
            let video = editor
                .trim_and_wait(&req, &cancel_on_ctrl_c(), log_progress)
                .await?;
            print_json(&json!({
                "result_id": video.result_id,
                "download_url": urls.resolve(&video.download_url),
            }))
        }
        Command::Cut {
            video_id,
            segments,
            wait,
        } => {
            let Session { editor, urls } = session()?;
            let req = CutRequest {
                video_id: VideoId::new(video_id),
                segments,
            };
            if wait.no_wait {
                return print_json(&editor.backend().cut_video(&req).await?);
            }
            let video = editor
                .cut_and_wait(&req, &cancel_on_ctrl_c(), log_progress)
                .await?;
            print_json(&json!({
                "result_id": video.result_id,
                "download_url": urls.resolve(&video.download_url),
            }))
        }
        Command::Captions {
            video_id,
            language,
            wait,
        } => {
            let Session { editor, urls } = session()?;
            let req = CaptionRequest {
                video_id: VideoId::new(video_id),
                language,
            };
            if wait.no_wait {
                return print_json(&editor.backend().generate_captions(&req).await?);
            }
            let mut captions = editor
                .captions_and_wait(&req, &cancel_on_ctrl_c(), log_progress)
                .await?;
            captions.srt_url = urls.resolve(&captions.srt_url);
            captions.vtt_url = urls.resolve(&captions.vtt_url);
            print_json(&captions)
        }
        Command::Job { job_id } => {
            let s = session()?;
            print_json(&s.editor.backend().job_status(&JobId::new(job_id)).await?)
        }
        Command::Wait { job_id } => {
            let done = session()?
                .editor
                .wait_for_job(&JobId::new(job_id), &cancel_on_ctrl_c(), log_progress)
                .await?;
            print_json(&done)
        }
        Command::Urls {
            video,
            result,
            captions,
        } => {
            let urls = ApiUrls::new(&settings()?.backend_url)?;
            print_urls(&urls, video, result, captions)
        }
        Command::Health => print_json(&session()?.editor.backend().health().await?),
        Command::Route { path } => print_route(&path),
    }
}
