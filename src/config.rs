use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::errors::ConfigError;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// HTTP port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Log level for tracing (e.g. "info", "debug").
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// When set, log events go to this file as JSON lines instead of stdout.
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Path to the articles snapshot JSON file.
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,

    /// Root directory for uploads, one subdirectory per article id.
    #[serde(default = "default_uploads_dir")]
    pub uploads_dir: PathBuf,

    /// Directory holding the TinyMCE editor bundle.
    #[serde(default = "default_tinymce_dir")]
    pub tinymce_dir: PathBuf,

    /// Largest accepted upload request body, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,

    #[serde(default = "default_server_version")]
    pub server_version: String,
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_data_path() -> PathBuf {
    PathBuf::from("articles.json")
}

fn default_uploads_dir() -> PathBuf {
    PathBuf::from("uploads")
}

fn default_tinymce_dir() -> PathBuf {
    PathBuf::from("tinymce")
}

fn default_max_upload_bytes() -> usize {
    10 << 20
}

fn default_server_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            log_level: default_log_level(),
            log_file: None,
            data_path: default_data_path(),
            uploads_dir: default_uploads_dir(),
            tinymce_dir: default_tinymce_dir(),
            max_upload_bytes: default_max_upload_bytes(),
            server_version: default_server_version(),
        }
    }
}

impl AppConfig {
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let file = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&file).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<AppConfig>(json)
    }

    /// Finds `config.json` beside the executable, falling back to the
    /// executable's parent directory.
    pub fn locate(exe_dir: &Path) -> Result<PathBuf, ConfigError> {
        let primary = exe_dir.join("config.json");
        if primary.exists() {
            return Ok(primary);
        }

        let fallback = exe_dir.join("..").join("config.json");
        if fallback.exists() {
            return Ok(fallback);
        }

        Err(ConfigError::Missing(exe_dir.to_path_buf()))
    }
}
