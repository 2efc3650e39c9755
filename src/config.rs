use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

/// Default upload limit: 500 MB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 500 * 1024 * 1024;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub service: ServiceConfig,
    pub storage: StorageConfig,
    pub ai: AiConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServiceConfig {
    pub name: String,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    pub bind: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Directory for uploaded audio; `~` is expanded
    pub uploads_path: String,
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AiConfig {
    /// Base URL of an OpenAI-compatible API (without `/v1`)
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    pub transcription_model: String,
    pub chat_model: String,
    pub request_timeout_secs: u64,
}

impl StorageConfig {
    pub fn uploads_dir(&self) -> PathBuf {
        PathBuf::from(shellexpand::tilde(&self.uploads_path).into_owned())
    }
}

impl Config {
    /// Load configuration from built-in defaults, an optional file at `path`
    /// (any extension the `config` crate understands), then `RECAP_*`
    /// environment variables, e.g. `RECAP_SERVICE__HTTP__PORT=8080`.
    pub fn load(path: &str) -> Result<Self> {
        let settings = config::Config::builder()
            .set_default("service.name", "recap")?
            .set_default("service.http.bind", "0.0.0.0")?
            .set_default("service.http.port", 3000)?
            .set_default("storage.uploads_path", "uploads")?
            .set_default("storage.max_upload_bytes", DEFAULT_MAX_UPLOAD_BYTES as i64)?
            .set_default("ai.base_url", "https://api.openai.com")?
            .set_default("ai.transcription_model", "whisper-1")?
            .set_default("ai.chat_model", "gpt-4o-mini")?
            .set_default("ai.request_timeout_secs", 600)?
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix("RECAP")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let mut cfg: Config = settings.try_deserialize()?;
        if cfg.ai.api_key.is_none() {
            cfg.ai.api_key = std::env::var("OPENAI_API_KEY").ok();
        }

        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load("/nonexistent/recap-config").unwrap();

        assert_eq!(cfg.service.http.port, 3000);
        assert_eq!(cfg.storage.max_upload_bytes, DEFAULT_MAX_UPLOAD_BYTES);
        assert_eq!(cfg.ai.transcription_model, "whisper-1");
    }

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("recap.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(
            file,
            "[service.http]\nport = 8088\n\n[storage]\nuploads_path = \"~/recap-audio\"\n\n[ai]\nchat_model = \"local-llm\""
        )
        .unwrap();

        let cfg = Config::load(path.to_str().unwrap()).unwrap();

        assert_eq!(cfg.service.http.port, 8088);
        assert_eq!(cfg.service.http.bind, "0.0.0.0");
        assert_eq!(cfg.ai.chat_model, "local-llm");
        assert!(!cfg.storage.uploads_dir().starts_with("~"));
    }
}
