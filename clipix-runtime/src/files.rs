use std::fs;
use std::path::Path;

use anyhow::Context;
use clipix_providers::multipart::VideoFile;

pub fn ensure_dir(path: &Path) -> anyhow::Result<()> {
    fs::create_dir_all(path).with_context(|| format!("failed to create dir: {}", path.display()))
}

pub fn replace_file(tmp: &Path, dst: &Path) -> anyhow::Result<()> {
    let backup = dst.with_extension("bak");

    if dst.exists() {
        let _ = fs::remove_file(&backup);
        fs::rename(dst, &backup)
            .with_context(|| format!("failed rename {} -> {}", dst.display(), backup.display()))?;
    }

    if let Err(e) = fs::rename(tmp, dst) {
        // Put the previous file back so a failed save never loses it.
        if backup.exists() {
            let _ = fs::rename(&backup, dst);
        }
        let _ = fs::remove_file(tmp);
        return Err(anyhow::Error::new(e).context(format!(
            "failed rename {} -> {}",
            tmp.display(),
            dst.display()
        )));
    }

    let _ = fs::remove_file(&backup);
    Ok(())
}

/// Prepares a local video for upload. Only the size is read here; the
/// contents are streamed from disk while the request is sent.
pub async fn open_video_file(path: &Path) -> anyhow::Result<VideoFile> {
    let filename = path
        .file_name()
        .and_then(|n| n.to_str())
        .with_context(|| format!("not a file path: {}", path.display()))?
        .to_string();
    let meta = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("failed to stat video: {}", path.display()))?;
    if !meta.is_file() {
        return Err(anyhow::anyhow!("not a regular file: {}", path.display()));
    }
    Ok(VideoFile::from_path(filename, path, meta.len()))
}
