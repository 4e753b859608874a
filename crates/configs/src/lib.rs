use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub marketplace: MarketplaceConfig,
    #[serde(default)]
    pub realtime: RealtimeConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    /// Origins allowed by CORS; empty allows any origin.
    #[serde(default)]
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4), cors_origins: Vec::new() }
    }
}

/// Which repository implementation backs the service layer.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

impl std::str::FromStr for StorageBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "postgres" | "postgresql" => Ok(Self::Postgres),
            "memory" => Ok(Self::Memory),
            other => Err(anyhow!("unknown storage backend `{other}`")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default = "default_true")]
    pub run_migrations: bool,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            acquire_timeout_secs: default_acquire_timeout(),
            run_migrations: true,
            sqlx_logging: false,
        }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_acquire_timeout() -> u64 { 30 }
fn default_true() -> bool { true }

/// Settings for verifying tokens minted by the hosted identity provider.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AuthConfig {
    #[serde(default)]
    pub jwt_secret: String,
    /// Expected `iss` claim; unchecked when absent.
    #[serde(default)]
    pub issuer: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarketplaceConfig {
    #[serde(default = "default_currency")]
    pub currency: String,
    /// Boost price in minor currency units (paise for INR).
    #[serde(default = "default_boost_price")]
    pub boost_price_minor: i64,
    #[serde(default = "default_boost_days")]
    pub boost_duration_days: i64,
}

impl Default for MarketplaceConfig {
    fn default() -> Self {
        Self {
            currency: default_currency(),
            boost_price_minor: default_boost_price(),
            boost_duration_days: default_boost_days(),
        }
    }
}

fn default_currency() -> String { "INR".into() }
fn default_boost_price() -> i64 { 9_900 }
fn default_boost_days() -> i64 { 30 }

#[derive(Debug, Clone, Deserialize)]
pub struct RealtimeConfig {
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Default for RealtimeConfig {
    fn default() -> Self { Self { channel_capacity: default_channel_capacity() } }
}

fn default_channel_capacity() -> usize { 64 }

/// `CONFIG_PATH`, or `config.toml` in the working directory.
pub fn config_path() -> String {
    std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string())
}

pub fn load_default() -> Result<AppConfig> {
    load_from_file(&config_path())
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    parse(&content)
}

/// Like [`load_from_file`], but a missing file yields the defaults. Read and
/// parse failures of an existing file are still errors.
pub fn load_or_default(path: &str) -> Result<AppConfig> {
    match std::fs::read_to_string(path) {
        Ok(content) => parse(&content).map_err(|e| anyhow!("invalid config file `{path}`: {e}")),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(AppConfig::default()),
        Err(e) => Err(anyhow!("cannot read config file `{path}`: {e}")),
    }
}

pub fn parse(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    /// Load `config.toml` when present, otherwise start from defaults; then apply
    /// environment overrides and validate. A file that exists but does not
    /// parse is an error.
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_or_default(&config_path())?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize_from_env()?;
        self.database.normalize_from_env()?;
        self.database.validate()?;
        self.auth.normalize_from_env();
        self.auth.validate()?;
        self.marketplace.validate()?;
        if self.realtime.channel_capacity == 0 {
            return Err(anyhow!("realtime.channel_capacity must be >= 1"));
        }
        Ok(())
    }
}

impl ServerConfig {
    fn normalize_from_env(&mut self) -> Result<()> {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.host = host;
        }
        if let Ok(port) = std::env::var("SERVER_PORT") {
            self.port = port.parse().map_err(|_| anyhow!("SERVER_PORT must be a port number"))?;
        }
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be in 1..=65535"));
        }
        if let Some(w) = self.worker_threads {
            if w == 0 { self.worker_threads = Some(4); }
        } else {
            self.worker_threads = Some(4);
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) -> Result<()> {
        if let Ok(backend) = std::env::var("STORAGE_BACKEND") {
            self.backend = backend.parse()?;
        }
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.backend == StorageBackend::Memory {
            return Ok(());
        }
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://")) {
            return Err(anyhow!("database.url must start with postgresql:// or postgres://"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl AuthConfig {
    pub fn normalize_from_env(&mut self) {
        if self.jwt_secret.trim().is_empty() {
            if let Ok(secret) = std::env::var("JWT_SECRET") {
                self.jwt_secret = secret;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.jwt_secret.trim().is_empty() {
            return Err(anyhow!("auth.jwt_secret is empty; set it in config.toml or JWT_SECRET"));
        }
        Ok(())
    }
}

impl MarketplaceConfig {
    pub fn validate(&self) -> Result<()> {
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(anyhow!("marketplace.currency must be a 3-letter ISO code"));
        }
        if self.boost_price_minor <= 0 {
            return Err(anyhow!("marketplace.boost_price_minor must be positive"));
        }
        if self.boost_duration_days <= 0 {
            return Err(anyhow!("marketplace.boost_duration_days must be positive"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_file() {
        let cfg = parse(
            r#"
            [server]
            host = "0.0.0.0"
            port = 9000

            [database]
            backend = "memory"

            [auth]
            jwt_secret = "s3cret"

            [marketplace]
            currency = "INR"
            boost_price_minor = 19900
            boost_duration_days = 7
            "#,
        )
        .unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.database.backend, StorageBackend::Memory);
        assert_eq!(cfg.marketplace.boost_price_minor, 19_900);
        assert_eq!(cfg.marketplace.boost_duration_days, 7);
        assert_eq!(cfg.realtime.channel_capacity, 64);
    }

    #[test]
    fn defaults_match_checkout_price() {
        let m = MarketplaceConfig::default();
        assert_eq!(m.currency, "INR");
        assert_eq!(m.boost_price_minor, 9_900);
        assert_eq!(m.boost_duration_days, 30);
        assert!(m.validate().is_ok());
    }

    #[test]
    fn rejects_non_postgres_url() {
        let db = DatabaseConfig { url: "mysql://localhost/db".into(), ..Default::default() };
        assert!(db.validate().is_err());
    }

    #[test]
    fn memory_backend_needs_no_url() {
        let db = DatabaseConfig { backend: StorageBackend::Memory, ..Default::default() };
        assert!(db.validate().is_ok());
    }

    #[test]
    fn rejects_bad_currency() {
        let m = MarketplaceConfig { currency: "rupees".into(), ..Default::default() };
        assert!(m.validate().is_err());
    }

    fn scratch_file(name: &str, content: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("{name}-{}.toml", std::process::id()));
        std::fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn malformed_file_is_an_error() {
        let path = scratch_file("malformed", "[server\nport = 9000\n[database]\nbackend = \"memory\"\n");
        let err = load_or_default(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("invalid config file"), "{err}");
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let path = std::env::temp_dir().join("no-such-marketplace-config.toml");
        let cfg = load_or_default(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.database.backend, StorageBackend::Postgres);
    }

    #[test]
    fn existing_file_is_read() {
        let path = scratch_file("valid", "[server]\nhost = \"0.0.0.0\"\nport = 9000\ncors_origins = [\"https://app.example\"]\n");
        let cfg = load_or_default(path.to_str().unwrap()).unwrap();
        assert_eq!(cfg.server.port, 9000);
        assert_eq!(cfg.server.cors_origins, vec!["https://app.example".to_string()]);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn backend_from_str() {
        assert_eq!("Memory".parse::<StorageBackend>().unwrap(), StorageBackend::Memory);
        assert!("sqlite".parse::<StorageBackend>().is_err());
    }
}
