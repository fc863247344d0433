use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging: LoggingConfig,
    pub client: ClientConfig,
    pub http: HttpConfig,
    pub jellyfin: JellyfinConfig,
    pub tmdb: TmdbConfig,
    pub live_italy: LiveItalyConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String, // "json" or "pretty"
    pub file_path: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file_path: None,
        }
    }
}

/// Identity this client announces to upstream servers
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub name: String,
    pub version: String,
    pub device_name: String,
    pub device_id: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            name: "Teevi for Jellyfin".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            device_name: "Teevi Client".to_string(),
            device_id: "teevi-client".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub connect_timeout_seconds: u64,
    pub request_timeout_seconds: u64,
    /// Upper bound for a single server discovery probe
    pub probe_timeout_seconds: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_seconds: 10,
            request_timeout_seconds: 30,
            probe_timeout_seconds: 5,
        }
    }
}

impl HttpConfig {
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_seconds)
    }

    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    #[must_use]
    pub const fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_seconds)
    }
}

/// Jellyfin credentials as entered by the user
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct JellyfinConfig {
    /// Free-form server address ("host", "host:port" or a full URL)
    pub server: String,
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TmdbConfig {
    pub api_url: String,
    pub image_base_url: String,
    /// v4 read access token, sent as a bearer token
    pub api_token: String,
    pub language: String,
}

impl Default for TmdbConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.themoviedb.org/3".to_string(),
            image_base_url: "https://image.tmdb.org/t/p".to_string(),
            api_token: String::new(),
            language: "en-US".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LiveItalyConfig {
    pub playlist_url: String,
    /// Published program guide (output of the guide builder)
    pub guide_url: String,
    /// XMLTV sources merged by the guide builder, in priority order
    pub epg_sources: Vec<String>,
    pub language: String,
}

impl Default for LiveItalyConfig {
    fn default() -> Self {
        Self {
            playlist_url:
                "https://raw.githubusercontent.com/Free-TV/IPTV/master/playlists/playlist_italy.m3u8"
                    .to_string(),
            guide_url:
                "https://teeviapp.github.io/teevi-official-extensions/data/live-italy/epg-guide.json"
                    .to_string(),
            epg_sources: vec![
                "https://tvit.leicaflorianrobert.dev/epg/list.xml".to_string(),
                "https://www.open-epg.com/files/italy1.xml".to_string(),
            ],
            language: "it".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from multiple sources with priority:
    /// 1. Environment variables (highest priority)
    /// 2. Config file (if provided)
    /// 3. Defaults (lowest priority)
    pub fn load(config_file: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();

        if let Some(path) = config_file {
            if Path::new(path).exists() {
                builder = builder.add_source(File::with_name(path));
            }
        }

        // TEEVI_JELLYFIN__SERVER, TEEVI_HTTP__PROBE_TIMEOUT_SECONDS, ...
        builder = builder.add_source(
            Environment::with_prefix("TEEVI")
                .prefix_separator("_")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("live_italy.epg_sources")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Load from environment variables only
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::load(None)
    }

    /// Load from file path
    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        Self::load(Some(path))
    }

    /// Check the configuration for values that would make every request fail.
    ///
    /// Returns the list of problems found; credentials are not checked here
    /// since each extension validates its own on use.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        if !matches!(self.logging.format.as_str(), "json" | "pretty") {
            errors.push(format!(
                "logging.format must be \"json\" or \"pretty\", got \"{}\"",
                self.logging.format
            ));
        }
        if self.http.probe_timeout_seconds == 0 {
            errors.push("http.probe_timeout_seconds must be greater than 0".to_string());
        }
        if self.http.request_timeout_seconds == 0 {
            errors.push("http.request_timeout_seconds must be greater than 0".to_string());
        }
        if self.http.connect_timeout_seconds == 0 {
            errors.push("http.connect_timeout_seconds must be greater than 0".to_string());
        }
        if self.client.device_id.trim().is_empty() {
            errors.push("client.device_id must not be empty".to_string());
        }
        for (key, value) in [
            ("tmdb.api_url", &self.tmdb.api_url),
            ("live_italy.playlist_url", &self.live_italy.playlist_url),
            ("live_italy.guide_url", &self.live_italy.guide_url),
        ] {
            if !value.starts_with("http://") && !value.starts_with("https://") {
                errors.push(format!("{key} must be an http(s) URL, got \"{value}\""));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.logging.level, "info");
        assert_eq!(config.http.probe_timeout(), Duration::from_secs(5));
        assert_eq!(config.tmdb.language, "en-US");
        assert_eq!(config.live_italy.epg_sources.len(), 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_toml_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            r#"
[jellyfin]
server = "demo.jellyfin.org/stable"
username = "demo"

[http]
probe_timeout_seconds = 2
"#
        )
        .unwrap();

        let path = file.path().to_str().unwrap();
        let config = Config::from_file(path).unwrap();

        assert_eq!(config.jellyfin.server, "demo.jellyfin.org/stable");
        assert_eq!(config.jellyfin.username, "demo");
        assert_eq!(config.jellyfin.password, "");
        assert_eq!(config.http.probe_timeout_seconds, 2);
        // untouched sections keep their defaults
        assert_eq!(config.http.request_timeout_seconds, 30);
        assert_eq!(config.client.device_name, "Teevi Client");
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let config = Config::from_file("/nonexistent/teevi.toml").unwrap();
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn test_validate_reports_every_problem() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        config.http.probe_timeout_seconds = 0;
        config.tmdb.api_url = "ftp://example.com".to_string();

        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 3);
        assert!(errors.iter().any(|e| e.contains("logging.format")));
        assert!(errors.iter().any(|e| e.contains("probe_timeout")));
        assert!(errors.iter().any(|e| e.contains("tmdb.api_url")));
    }

    #[test]
    fn test_validate_rejects_zero_connect_timeout() {
        let mut config = Config::default();
        config.http.connect_timeout_seconds = 0;

        let errors = config.validate().unwrap_err();
        assert_eq!(errors, vec!["http.connect_timeout_seconds must be greater than 0".to_string()]);
    }
}
