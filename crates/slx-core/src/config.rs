use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::{errors::Error, Result};

/// Typed configuration for the exporter.
///
/// Everything is read once at startup; the credential is then handed
/// explicitly to the API client rather than re-read from the environment.
#[derive(Clone, Debug)]
pub struct Config {
    /// Bearer token for the Slack Web API.
    pub token: String,

    /// Directory that holds one date/time-stamped subdirectory per run.
    pub archive_root: PathBuf,

    /// Per-request timeout for the HTTP client.
    pub http_timeout: Duration,

    /// Client-side pacing: at most `pace_max_calls` API calls per `pace_window`.
    pub pace_max_calls: usize,
    pub pace_window: Duration,
}

impl Config {
    pub fn load() -> Result<Self> {
        load_dotenv_if_present(Path::new(".env"));

        let token = env_str("SLACK_BOT_TOKEN").and_then(non_empty).ok_or_else(|| {
            Error::Config("SLACK_BOT_TOKEN environment variable is required".to_string())
        })?;

        let archive_root =
            env_path("ARCHIVE_ROOT").unwrap_or_else(|| PathBuf::from("archives"));

        let http_timeout = Duration::from_secs(env_u64("HTTP_TIMEOUT_SECS").unwrap_or(30));

        // Defaults match the Slack Tier 3 budget the exporter was tuned for.
        let pace_max_calls = env_usize("PACE_MAX_CALLS").unwrap_or(95);
        let pace_window = Duration::from_secs(env_u64("PACE_WINDOW_SECS").unwrap_or(55));

        Ok(Self {
            token,
            archive_root,
            http_timeout,
            pace_max_calls,
            pace_window,
        })
    }
}

fn load_dotenv_if_present(path: &Path) {
    let Ok(contents) = fs::read_to_string(path) else {
        return;
    };

    for raw in contents.lines() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let Some((k, v)) = line.split_once('=') else {
            continue;
        };

        let key = k.trim();
        if key.is_empty() {
            continue;
        }
        if env::var_os(key).is_some() {
            continue; // do not override existing env
        }

        let mut val = v.trim().to_string();
        // Strip optional surrounding quotes.
        if val.len() >= 2
            && ((val.starts_with('"') && val.ends_with('"'))
                || (val.starts_with('\'') && val.ends_with('\'')))
        {
            val = val[1..val.len() - 1].to_string();
        }

        env::set_var(key, val);
    }
}

fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

fn env_u64(key: &str) -> Option<u64> {
    env_str(key).and_then(|s| s.trim().parse::<u64>().ok())
}

fn env_usize(key: &str) -> Option<usize> {
    env_str(key).and_then(|s| s.trim().parse::<usize>().ok())
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var_os(key).map(PathBuf::from)
}

fn non_empty(s: String) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s)
    }
}
