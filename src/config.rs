use std::{path::PathBuf, time::Duration};

use reqwest::Url;

use crate::error::{AppError, AppResult};

const DEFAULT_BASE_URL: &str = "http://localhost:5000";

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub base_url: Url,
    pub token: Option<String>,
    pub timeout: Option<Duration>,
    pub download_dir: PathBuf,
}

impl ServiceConfig {
    pub fn new(base_url: &str) -> AppResult<Self> {
        Ok(Self {
            base_url: parse_base_url(base_url)?,
            token: None,
            timeout: None,
            download_dir: default_download_dir(),
        })
    }

    pub fn from_env() -> AppResult<Self> {
        let base_url =
            env_value("IMAGETALES_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let token = env_value("IMAGETALES_TOKEN");
        let timeout = env_value("IMAGETALES_TIMEOUT_SECS")
            .map(|value| {
                value
                    .trim()
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|_| {
                        AppError::msg(format!("IMAGETALES_TIMEOUT_SECS is not a number: {value}"))
                    })
            })
            .transpose()?;
        let download_dir = env_value("IMAGETALES_DOWNLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(default_download_dir);

        Ok(Self {
            base_url: parse_base_url(&base_url)?,
            token,
            timeout,
            download_dir,
        })
    }

    pub fn with_token<T: Into<String>>(mut self, token: T) -> Self {
        let token: String = token.into();
        self.token = Some(token).filter(|v| !v.trim().is_empty());
        self
    }

    pub fn with_download_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.download_dir = dir.into();
        self
    }

    /// Only reports whether a session token is present; it is never validated here.
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

pub fn load_env_files() {
    let _ = dotenvy::from_filename(".env");
    let _ = dotenvy::from_filename("../.env");
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_base_url(value: &str) -> AppResult<Url> {
    let url = Url::parse(value.trim())
        .map_err(|error| AppError::msg(format!("invalid service base url {value}: {error}")))?;
    if url.cannot_be_a_base() {
        return Err(AppError::msg(format!("service base url cannot be a base: {value}")));
    }
    Ok(url)
}

fn default_download_dir() -> PathBuf {
    dirs::download_dir().unwrap_or_else(|| PathBuf::from("."))
}
