use anyhow::Context;
use clipix_core::config::ClientConfig;
use std::path::PathBuf;

pub const ENV_BACKEND_URL: &str = "CLIPIX_BACKEND_URL";
pub const ENV_POLL_INTERVAL_MS: &str = "CLIPIX_POLL_INTERVAL_MS";

const CONFIG_FILENAME: &str = "config.json";

/// `<platform config dir>/config.json`, e.g. `~/.config/clipix/config.json`.
pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "clipix", "clipix")
        .map(|dirs| dirs.config_dir().join(CONFIG_FILENAME))
}

/// Applies overrides from a variable lookup (normally `std::env::var`).
pub fn apply_env_overrides<F>(mut cfg: ClientConfig, lookup: F) -> anyhow::Result<ClientConfig>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(ENV_BACKEND_URL).filter(|v| !v.trim().is_empty()) {
        cfg.backend_url = url.trim().to_string();
    }
    if let Some(raw) = lookup(ENV_POLL_INTERVAL_MS) {
        cfg.poll_interval_ms = raw
            .trim()
            .parse()
            .with_context(|| format!("{ENV_POLL_INTERVAL_MS} must be an integer, got {raw:?}"))?;
    }
    Ok(cfg)
}

pub fn apply_process_env(cfg: ClientConfig) -> anyhow::Result<ClientConfig> {
    apply_env_overrides(cfg, |k| std::env::var(k).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |k| map.get(k).cloned()
    }

    #[test]
    fn env_overrides_backend_and_interval() {
        let cfg = apply_env_overrides(
            ClientConfig::default(),
            env(&[
                (ENV_BACKEND_URL, " https://clipix.example.com "),
                (ENV_POLL_INTERVAL_MS, "750"),
            ]),
        )
        .unwrap();
        assert_eq!(cfg.backend_url, "https://clipix.example.com");
        assert_eq!(cfg.poll_interval_ms, 750);
    }

    #[test]
    fn blank_backend_is_ignored() {
        let cfg = apply_env_overrides(ClientConfig::default(), env(&[(ENV_BACKEND_URL, "  ")]))
            .unwrap();
        assert_eq!(cfg, ClientConfig::default());
    }

    #[test]
    fn bad_interval_is_an_error() {
        let err = apply_env_overrides(
            ClientConfig::default(),
            env(&[(ENV_POLL_INTERVAL_MS, "soon")]),
        )
        .unwrap_err();
        assert!(err.to_string().contains(ENV_POLL_INTERVAL_MS));
    }
}
