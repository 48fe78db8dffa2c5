use serde::Deserialize;
use std::net::SocketAddr;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub logging: LoggingConfig,
    pub security: SecurityConfig,
    /// Admin login and session settings
    pub auth: AuthConfig,
    /// Where uploaded images are stored
    pub storage: StorageConfig,
    #[serde(default)]
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Body limit for JSON requests (uploads use `storage.max_upload_bytes`)
    #[serde(default = "default_max_body_size")]
    pub max_body_size: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
}

impl DatabaseConfig {
    /// Pool settings in the shape the persistence crate expects.
    pub fn pool_config(&self) -> persistence::db::DatabaseConfig {
        persistence::db::DatabaseConfig {
            url: self.url.clone(),
            max_connections: self.max_connections,
            min_connections: self.min_connections,
            connect_timeout_secs: self.connect_timeout_secs,
            idle_timeout_secs: self.idle_timeout_secs,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,

    #[serde(default = "default_log_format")]
    pub format: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SecurityConfig {
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Login attempts allowed per client address per minute (0 disables)
    #[serde(default = "default_login_rate_limit")]
    pub login_rate_limit_per_minute: u32,

    /// Send Strict-Transport-Security (enable only behind TLS)
    #[serde(default)]
    pub hsts_enabled: bool,
}

#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    /// Argon2id PHC hash of the admin password (see `salon-site hash-password`)
    #[serde(default)]
    pub admin_password_hash: String,

    /// HMAC secret for session tokens
    #[serde(default)]
    pub session_secret: String,

    /// Session lifetime in seconds (default: 28800 = 8 hours)
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: i64,

    /// Leeway in seconds for clock skew tolerance
    #[serde(default = "default_session_leeway")]
    pub leeway_secs: u64,

    /// Trusted development mode: every admin request is authenticated as the
    /// developer principal. Never enable in production.
    #[serde(default)]
    pub skip_auth: bool,

    /// Where the admin UI sends unauthenticated users
    #[serde(default = "default_login_path")]
    pub login_path: String,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("admin_password_hash", &"[REDACTED]")
            .field("session_secret", &"[REDACTED]")
            .field("session_ttl_secs", &self.session_ttl_secs)
            .field("leeway_secs", &self.leeway_secs)
            .field("skip_auth", &self.skip_auth)
            .field("login_path", &self.login_path)
            .finish()
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Storage backend: local or http
    #[serde(default = "default_storage_provider")]
    pub provider: String,

    /// Directory for the local backend
    #[serde(default = "default_local_dir")]
    pub local_dir: String,

    /// URL prefix under which local uploads are served
    #[serde(default = "default_public_base_url")]
    pub public_base_url: String,

    /// Blob service endpoint for the http backend
    #[serde(default)]
    pub http_endpoint: String,

    /// Bearer token for the blob service
    #[serde(default)]
    pub http_token: String,

    /// Timeout for blob service requests in milliseconds
    #[serde(default = "default_storage_timeout_ms")]
    pub timeout_ms: u64,

    /// Images under this prefix ship with the site and are never deleted
    #[serde(default = "default_bundled_asset_prefix")]
    pub bundled_asset_prefix: String,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// How long public content reads are served from memory
    #[serde(default = "default_cache_ttl")]
    pub public_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            public_ttl_secs: default_cache_ttl(),
        }
    }
}

// Default value functions
fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_request_timeout() -> u64 {
    30
}
fn default_max_body_size() -> usize {
    1_048_576
}
fn default_max_connections() -> u32 {
    10
}
fn default_min_connections() -> u32 {
    1
}
fn default_connect_timeout() -> u64 {
    10
}
fn default_idle_timeout() -> u64 {
    600
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_log_format() -> String {
    "json".to_string()
}
fn default_login_rate_limit() -> u32 {
    10
}
fn default_session_ttl() -> i64 {
    28_800
}
fn default_session_leeway() -> u64 {
    shared::jwt::DEFAULT_LEEWAY_SECS
}
fn default_login_path() -> String {
    "/admin/login".to_string()
}
fn default_storage_provider() -> String {
    "local".to_string()
}
fn default_local_dir() -> String {
    "./uploads".to_string()
}
fn default_public_base_url() -> String {
    "/uploads".to_string()
}
fn default_storage_timeout_ms() -> u64 {
    15_000
}
fn default_bundled_asset_prefix() -> String {
    "/images/".to_string()
}
fn default_max_upload_bytes() -> usize {
    10 * 1024 * 1024
}
fn default_cache_ttl() -> u64 {
    60
}

/// Configuration validation error
#[derive(Debug, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Missing required configuration: {0}")]
    MissingRequired(String),

    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),
}

impl Config {
    /// Load configuration from files and environment variables.
    ///
    /// Loading order (later sources override earlier):
    /// 1. config/default.toml - base configuration with defaults
    /// 2. config/local.toml - local overrides (optional, not in git)
    /// 3. Environment variables with SALON__ prefix
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("SALON")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("security.cors_origins")
                    .try_parsing(true),
            )
            .build()?;

        let cfg: Self = config.try_deserialize()?;
        cfg.validate()
            .map_err(|e| config::ConfigError::Message(e.to_string()))?;
        Ok(cfg)
    }

    /// Load configuration for testing with custom overrides.
    ///
    /// Defaults are embedded so tests do not depend on the config directory.
    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let defaults = r#"
            [server]
            host = "0.0.0.0"
            port = 8080
            request_timeout_secs = 30
            max_body_size = 1048576

            [database]
            url = ""
            max_connections = 10
            min_connections = 1
            connect_timeout_secs = 10
            idle_timeout_secs = 600

            [logging]
            level = "info"
            format = "json"

            [security]
            cors_origins = []
            login_rate_limit_per_minute = 10
            hsts_enabled = false

            [auth]
            admin_password_hash = ""
            session_secret = ""
            session_ttl_secs = 28800
            skip_auth = false
            login_path = "/admin/login"

            [storage]
            provider = "local"
            local_dir = "./uploads"
            public_base_url = "/uploads"
            bundled_asset_prefix = "/images/"
            max_upload_bytes = 10485760

            [cache]
            public_ttl_secs = 60
        "#;

        let mut builder = config::Config::builder()
            .add_source(config::File::from_str(defaults, config::FileFormat::Toml));

        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }

        // Validation is left to the individual tests
        builder.build()?.try_deserialize()
    }

    /// Validate configuration values.
    fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.database.url.is_empty() {
            return Err(ConfigValidationError::MissingRequired(
                "SALON__DATABASE__URL environment variable must be set".to_string(),
            ));
        }

        if self.server.port == 0 {
            return Err(ConfigValidationError::InvalidValue(
                "Server port cannot be 0".to_string(),
            ));
        }

        if self.database.min_connections > self.database.max_connections {
            return Err(ConfigValidationError::InvalidValue(
                "min_connections cannot exceed max_connections".to_string(),
            ));
        }

        if !self.auth.skip_auth {
            if self.auth.admin_password_hash.is_empty() {
                return Err(ConfigValidationError::MissingRequired(
                    "SALON__AUTH__ADMIN_PASSWORD_HASH must be set unless auth.skip_auth is enabled"
                        .to_string(),
                ));
            }
            if self.auth.session_secret.len() < shared::jwt::MIN_SECRET_LEN {
                return Err(ConfigValidationError::MissingRequired(format!(
                    "SALON__AUTH__SESSION_SECRET must be at least {} bytes",
                    shared::jwt::MIN_SECRET_LEN
                )));
            }
        }

        if self.auth.session_ttl_secs <= 0 {
            return Err(ConfigValidationError::InvalidValue(
                "auth.session_ttl_secs must be positive".to_string(),
            ));
        }

        match self.storage.provider.as_str() {
            "local" => {}
            "http" if self.storage.http_endpoint.is_empty() => {
                return Err(ConfigValidationError::MissingRequired(
                    "storage.http_endpoint is required for the http storage provider".to_string(),
                ));
            }
            "http" => {}
            other => {
                return Err(ConfigValidationError::InvalidValue(format!(
                    "Unknown storage provider: {}",
                    other
                )));
            }
        }

        Ok(())
    }

    pub fn socket_addr(&self) -> SocketAddr {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .expect("Invalid socket address")
    }
}
