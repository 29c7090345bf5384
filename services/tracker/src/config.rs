use std::time::Duration;

use argon2::Params;
use sea_orm::ConnectOptions;

use biblia_core::config::{env_opt, env_or, required};

/// Tracker service configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct TrackerConfig {
    /// SeaORM connection URL. Env var: `DATABASE_URL`.
    pub database_url: String,
    /// Bind address (default `0.0.0.0`). Env var: `TRACKER_HOST`.
    pub host: String,
    /// TCP port for the HTTP server (default 8080). Env var: `TRACKER_PORT`.
    pub port: u16,
    pub pool: PoolConfig,
    pub password_hash: PasswordHashConfig,
    /// Emit JSON log lines when `LOG_FORMAT=json`.
    pub log_json: bool,
}

impl TrackerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: required("DATABASE_URL")?,
            host: env_or("TRACKER_HOST", "0.0.0.0".to_owned())?,
            port: env_or("TRACKER_PORT", 8080)?,
            pool: PoolConfig::from_env()?,
            password_hash: PasswordHashConfig::from_env()?,
            log_json: env_or("LOG_FORMAT", String::new())?.eq_ignore_ascii_case("json"),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Connection pool bounds.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    pub max_connections: u32,
    pub min_connections: u32,
    pub idle_timeout: Duration,
    pub connect_timeout: Duration,
    pub acquire_timeout: Duration,
    pub sql_logging: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_connections: 30,
            min_connections: 1,
            idle_timeout: Duration::from_secs(900),
            connect_timeout: Duration::from_secs(5),
            acquire_timeout: Duration::from_secs(5),
            sql_logging: false,
        }
    }
}

impl PoolConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let defaults = Self::default();
        let pool = Self {
            max_connections: env_or("DB_MAX_CONNECTIONS", defaults.max_connections)?,
            min_connections: env_or("DB_MIN_CONNECTIONS", defaults.min_connections)?,
            idle_timeout: secs("DB_IDLE_TIMEOUT_SECS", defaults.idle_timeout)?,
            connect_timeout: secs("DB_CONNECT_TIMEOUT_SECS", defaults.connect_timeout)?,
            acquire_timeout: secs("DB_ACQUIRE_TIMEOUT_SECS", defaults.acquire_timeout)?,
            sql_logging: env_or("DB_SQL_LOGGING", defaults.sql_logging)?,
        };
        if pool.max_connections == 0 {
            anyhow::bail!("DB_MAX_CONNECTIONS must be at least 1");
        }
        if pool.min_connections > pool.max_connections {
            anyhow::bail!(
                "DB_MIN_CONNECTIONS ({}) exceeds DB_MAX_CONNECTIONS ({})",
                pool.min_connections,
                pool.max_connections
            );
        }
        Ok(pool)
    }

    pub fn connect_options(&self, url: &str) -> ConnectOptions {
        let mut opts = ConnectOptions::new(url.to_owned());
        opts.max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .idle_timeout(self.idle_timeout)
            .connect_timeout(self.connect_timeout)
            .acquire_timeout(self.acquire_timeout)
            .sqlx_logging(self.sql_logging);
        opts
    }
}

fn secs(key: &str, default: Duration) -> anyhow::Result<Duration> {
    env_or(key, default.as_secs()).map(Duration::from_secs)
}

/// Argon2id cost parameters. Unset fields use the argon2 crate defaults.
#[derive(Debug, Clone, Default)]
pub struct PasswordHashConfig {
    pub memory_kib: Option<u32>,
    pub iterations: Option<u32>,
    pub parallelism: Option<u32>,
}

impl PasswordHashConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            memory_kib: env_opt("PASSWORD_HASH_MEMORY_KIB")?,
            iterations: env_opt("PASSWORD_HASH_ITERATIONS")?,
            parallelism: env_opt("PASSWORD_HASH_PARALLELISM")?,
        })
    }

    pub fn params(&self) -> anyhow::Result<Params> {
        Params::new(
            self.memory_kib.unwrap_or(Params::DEFAULT_M_COST),
            self.iterations.unwrap_or(Params::DEFAULT_T_COST),
            self.parallelism.unwrap_or(Params::DEFAULT_P_COST),
            None,
        )
        .map_err(|e| anyhow::anyhow!("invalid password hash parameters: {e}"))
    }
}
