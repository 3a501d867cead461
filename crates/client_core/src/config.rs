use std::{
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
};

use anyhow::{anyhow, bail, Context, Result};
use tracing::warn;
use url::Url;

pub const DEFAULT_WEBHOOK_URL: &str = "http://localhost:5678/webhook/n8n";
pub const CONFIG_FILE_NAME: &str = "n8n_chat.toml";
const DATA_DIR_NAME: &str = "n8n_chat";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatSettings {
    pub webhook_url: Url,
    pub data_dir: PathBuf,
}

impl ChatSettings {
    /// Applies command-line overrides on top of file/environment settings.
    pub fn with_overrides(
        mut self,
        webhook_url: Option<&str>,
        data_dir: Option<PathBuf>,
    ) -> Result<Self> {
        if let Some(raw) = webhook_url {
            self.webhook_url = parse_webhook_url(raw)?;
        }
        if let Some(dir) = data_dir {
            self.data_dir = dir;
        }
        Ok(self)
    }
}

/// Defaults, then `n8n_chat.toml` in the working directory, then environment.
pub fn load_settings() -> Result<ChatSettings> {
    let file_cfg = read_config_file(Path::new(CONFIG_FILE_NAME));
    resolve_settings(file_cfg.as_ref(), |name| std::env::var(name).ok())
}

pub fn read_config_file(path: &Path) -> Option<HashMap<String, String>> {
    let raw = fs::read_to_string(path).ok()?;
    match toml::from_str::<HashMap<String, String>>(&raw) {
        Ok(cfg) => Some(cfg),
        Err(err) => {
            warn!(path = %path.display(), "ignoring unreadable config file: {err}");
            None
        }
    }
}

pub fn resolve_settings(
    file_cfg: Option<&HashMap<String, String>>,
    env: impl Fn(&str) -> Option<String>,
) -> Result<ChatSettings> {
    let lookup = |name: &str| env(name).filter(|value| !value.trim().is_empty());

    let mut webhook_url = DEFAULT_WEBHOOK_URL.to_string();
    let mut data_dir = None;

    if let Some(cfg) = file_cfg {
        if let Some(v) = cfg.get("webhook_url") {
            webhook_url = v.clone();
        }
        if let Some(v) = cfg.get("data_dir") {
            data_dir = Some(PathBuf::from(v));
        }
    }

    if let Some(v) = lookup("N8N_WEBHOOK_URL") {
        webhook_url = v;
    }
    if let Some(v) = lookup("APP__WEBHOOK_URL") {
        webhook_url = v;
    }
    if let Some(v) = lookup("APP__DATA_DIR") {
        data_dir = Some(PathBuf::from(v));
    }

    let data_dir = match data_dir {
        Some(dir) => dir,
        None => default_data_dir(dirs::data_local_dir(), lookup("HOME"))?,
    };

    Ok(ChatSettings {
        webhook_url: parse_webhook_url(&webhook_url)?,
        data_dir,
    })
}

pub fn parse_webhook_url(raw: &str) -> Result<Url> {
    let url = Url::parse(raw.trim()).with_context(|| format!("invalid webhook url '{raw}'"))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => bail!("webhook url '{raw}' must use http or https, not '{other}'"),
    }
}

fn default_data_dir(local_data: Option<PathBuf>, home: Option<String>) -> Result<PathBuf> {
    if let Some(base) = local_data {
        return Ok(base.join(DATA_DIR_NAME));
    }
    home.map(|home| PathBuf::from(home).join(format!(".{DATA_DIR_NAME}")))
        .ok_or_else(|| anyhow!("unable to resolve a data directory; set APP__DATA_DIR or HOME"))
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
