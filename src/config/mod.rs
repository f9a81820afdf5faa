use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub security: SecurityConfig,
    pub cache: CacheConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub jwt_expiry_hours: u64,
    /// Expiry used when the authenticate request sets rememberMe.
    pub jwt_remember_me_expiry_hours: u64,
}

/// Second-level cache settings, applied uniformly to every cache region.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheConfig {
    pub time_to_live_secs: u64,
    pub max_entries: usize,
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
        if let Ok(v) = env::var("HR_API_PORT") {
            self.server.port = v.parse().unwrap_or(self.server.port);
        }
        if let Ok(v) = env::var("HR_DATABASE_URL") {
            self.database.url = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("JWT_SECRET") {
            self.security.jwt_secret = v;
        }
        if let Ok(v) = env::var("SECURITY_JWT_EXPIRY_HOURS") {
            self.security.jwt_expiry_hours = v.parse().unwrap_or(self.security.jwt_expiry_hours);
        }
        if let Ok(v) = env::var("SECURITY_JWT_REMEMBER_ME_EXPIRY_HOURS") {
            self.security.jwt_remember_me_expiry_hours = v
                .parse()
                .unwrap_or(self.security.jwt_remember_me_expiry_hours);
        }
        if let Ok(v) = env::var("CACHE_TIME_TO_LIVE_SECS") {
            self.cache.time_to_live_secs = v.parse().unwrap_or(self.cache.time_to_live_secs);
        }
        if let Ok(v) = env::var("CACHE_MAX_ENTRIES") {
            self.cache.max_entries = v.parse().unwrap_or(self.cache.max_entries);
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            server: ServerConfig { port: 8080 },
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                max_connections: 10,
            },
            security: SecurityConfig {
                jwt_secret: "dev-secret-change-me".to_string(),
                jwt_expiry_hours: 24,
                jwt_remember_me_expiry_hours: 24 * 30,
            },
            cache: CacheConfig {
                time_to_live_secs: 3600,
                max_entries: 100,
            },
        }
    }

    fn staging() -> Self {
        Self {
            environment: Environment::Staging,
            server: ServerConfig { port: 8080 },
            database: DatabaseConfig {
                url: "sqlite://hr-staging.db".to_string(),
                max_connections: 20,
            },
            security: SecurityConfig {
                jwt_secret: String::new(),
                jwt_expiry_hours: 24,
                jwt_remember_me_expiry_hours: 24 * 7,
            },
            cache: CacheConfig {
                time_to_live_secs: 3600,
                max_entries: 1000,
            },
        }
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            server: ServerConfig { port: 8080 },
            database: DatabaseConfig {
                url: "sqlite://hr.db".to_string(),
                max_connections: 20,
            },
            security: SecurityConfig {
                // Must come from JWT_SECRET; token generation fails when empty
                jwt_secret: String::new(),
                jwt_expiry_hours: 8,
                jwt_remember_me_expiry_hours: 24 * 7,
            },
            cache: CacheConfig {
                time_to_live_secs: 3600,
                max_entries: 1000,
            },
        }
    }
}

static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

/// Global configuration singleton, loaded from the environment on first use.
pub fn config() -> &'static AppConfig {
    &CONFIG
}
