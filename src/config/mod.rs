use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub storage: StorageConfig,
    pub auth: AuthConfig,
    pub server: ServerConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StoreBackend {
    S3,
    Memory,
}

impl std::str::FromStr for StoreBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "s3" => Ok(StoreBackend::S3),
            "memory" | "mem" => Ok(StoreBackend::Memory),
            other => Err(format!("unknown store backend '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Bucket the listing runs against. Empty means "not configured".
    pub bucket: String,
    pub backend: StoreBackend,
    /// Endpoint override for S3-compatible stores (LocalStack, MinIO)
    pub endpoint_url: Option<String>,
    pub memory_page_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Claim carrying the JSON-encoded role list
    pub role_claim: String,
    /// A role authorizes listing when its name contains this substring
    pub privileged_role: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let environment = match env::var("APP_ENV").as_deref() {
            Ok("production") | Ok("prod") => Environment::Production,
            Ok("staging") | Ok("stage") => Environment::Staging,
            _ => Environment::Development,
        };

        // Set defaults based on environment, then override with specific env vars
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            Environment::Development => Self::development(),
        }
        .with_env_overrides()
    }

    fn with_env_overrides(mut self) -> Self {
        // Storage overrides
        if let Ok(v) = env::var("BUCKET") {
            self.storage.bucket = v.trim().to_string();
        }
        if let Ok(v) = env::var("STORE_BACKEND") {
            match v.parse() {
                Ok(backend) => self.storage.backend = backend,
                Err(e) => tracing::warn!("Ignoring STORE_BACKEND: {}", e),
            }
        }
        if let Ok(v) = env::var("STORE_ENDPOINT_URL") {
            self.storage.endpoint_url = Some(v).filter(|s| !s.trim().is_empty());
        }
        if let Ok(v) = env::var("MEMORY_STORE_PAGE_SIZE") {
            self.storage.memory_page_size = v.parse().unwrap_or(self.storage.memory_page_size);
        }

        // Auth overrides
        if let Ok(v) = env::var("AUTH_ROLE_CLAIM") {
            if !v.trim().is_empty() {
                self.auth.role_claim = v.trim().to_string();
            }
        }
        if let Ok(v) = env::var("AUTH_PRIVILEGED_ROLE") {
            if !v.is_empty() {
                self.auth.privileged_role = v;
            }
        }

        // Server overrides
        if let Some(port) = env::var("ABE_PROXY_PORT")
            .ok()
            .or_else(|| env::var("PORT").ok())
            .and_then(|s| s.parse::<u16>().ok())
        {
            self.server.port = port;
        }
        if let Ok(v) = env::var("SERVER_ENABLE_REQUEST_LOGGING") {
            self.server.enable_request_logging = v.parse().unwrap_or(self.server.enable_request_logging);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }

        self
    }

    fn defaults(environment: Environment) -> Self {
        Self {
            environment,
            storage: StorageConfig {
                bucket: String::new(),
                backend: StoreBackend::S3,
                endpoint_url: None,
                memory_page_size: 1000,
            },
            auth: AuthConfig {
                role_claim: "custom:role".to_string(),
                privileged_role: "Admin".to_string(),
            },
            server: ServerConfig {
                port: 3000,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 4,
            },
        }
    }

    fn development() -> Self {
        let mut config = Self::defaults(Environment::Development);
        config.security.jwt_secret = "abe-development-secret".to_string();
        config.security.jwt_expiry_hours = 24 * 7; // 1 week
        config
    }

    fn staging() -> Self {
        let mut config = Self::defaults(Environment::Staging);
        config.security.jwt_expiry_hours = 24;
        config
    }

    fn production() -> Self {
        let mut config = Self::defaults(Environment::Production);
        config.server.enable_request_logging = false;
        config
    }
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}

#[macro_export]
macro_rules! is_development {
    () => {
        matches!($crate::config::CONFIG.environment, $crate::config::Environment::Development)
    };
}
