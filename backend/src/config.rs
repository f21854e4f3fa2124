use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::env;
use url::Url;

const CONFIG_PATH_ENV: &str = "CLASSLIVE_CONFIG";
const DEFAULT_CONFIG_PATH: &str = "config";
const ENV_PREFIX: &str = "CLASSLIVE";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub streaming: StreamingConfig,
    #[serde(default)]
    pub maintenance: MaintenanceConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub cors_allow_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".into(),
            port: 8080,
            cors_allow_origins: vec!["*".into()],
        }
    }
}

/// Connection settings for PostgreSQL.
///
/// `url` wins when present; otherwise the URL is assembled from the discrete
/// credential fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub user: String,
    pub password: String,
    pub host: String,
    pub port: u16,
    pub name: String,
    pub max_connections: u32,
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: None,
            user: "classlive".into(),
            password: String::new(),
            host: "127.0.0.1".into(),
            port: 5432,
            name: "classlive".into(),
            max_connections: 10,
            acquire_timeout_secs: 30,
        }
    }
}

impl DatabaseConfig {
    pub fn connection_url(&self) -> anyhow::Result<String> {
        if let Some(url) = self.url.as_deref().filter(|u| !u.trim().is_empty()) {
            return Ok(url.to_string());
        }

        let mut url = Url::parse("postgres://localhost").context("build database url")?;
        url.set_host(Some(&self.host))
            .map_err(|e| anyhow!("Invalid database host {}: {}", self.host, e))?;
        url.set_port(Some(self.port))
            .map_err(|_| anyhow!("Invalid database port {}", self.port))?;
        url.set_username(&self.user)
            .map_err(|_| anyhow!("Invalid database user {}", self.user))?;
        if !self.password.is_empty() {
            url.set_password(Some(&self.password))
                .map_err(|_| anyhow!("Invalid database password"))?;
        }
        url.set_path(&self.name);
        Ok(url.to_string())
    }

    /// Connection URL with the password replaced, suitable for logs.
    pub fn redacted_url(&self) -> String {
        match self.connection_url().ok().and_then(|u| Url::parse(&u).ok()) {
            Some(mut url) => {
                if url.password().is_some() {
                    let _ = url.set_password(Some("***"));
                }
                url.to_string()
            }
            None => "<invalid>".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StreamingConfig {
    /// Base URL of the media server's control API.
    pub api_url: String,
    pub request_timeout_secs: u64,
    pub playback: PlaybackConfig,
}

impl Default for StreamingConfig {
    fn default() -> Self {
        Self {
            api_url: "http://127.0.0.1:8090".into(),
            request_timeout_secs: 10,
            playback: PlaybackConfig::default(),
        }
    }
}

/// Public addressing of the media server, used to derive viewer URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    pub host: String,
    pub app: String,
    pub rtmp_port: u16,
    pub flv_port: u16,
    pub hls_port: u16,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            host: "localhost".into(),
            app: "live".into(),
            rtmp_port: 1935,
            flv_port: 7001,
            hls_port: 7002,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MaintenanceConfig {
    /// Pending sessions older than this are treated as orphans by the cleanup tool.
    pub stale_pending_hours: i64,
}

impl Default for MaintenanceConfig {
    fn default() -> Self {
        Self {
            stale_pending_hours: 24,
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let path = env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        let mut config = Self::load_from(&path)?;

        if let Ok(database_url) = env::var("DATABASE_URL") {
            config.database.url = Some(database_url);
        }

        Ok(config)
    }

    /// Reads the optional config file at `path` and layers `CLASSLIVE__*`
    /// environment variables over it.
    pub fn load_from(path: &str) -> anyhow::Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.cors_allow_origins"),
            )
            .build()
            .with_context(|| format!("Failed to read configuration from {}", path))?;

        let config: Config = settings
            .try_deserialize()
            .context("Invalid configuration")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> anyhow::Result<()> {
        Url::parse(&self.streaming.api_url)
            .map_err(|e| anyhow!("Invalid streaming.api_url {}: {}", self.streaming.api_url, e))?;
        if self.streaming.playback.host.trim().is_empty() {
            return Err(anyhow!("streaming.playback.host must not be empty"));
        }
        if self.maintenance.stale_pending_hours <= 0 {
            return Err(anyhow!("maintenance.stale_pending_hours must be positive"));
        }
        self.database.connection_url()?;
        Ok(())
    }
}
