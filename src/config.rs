use std::fmt;

use anyhow::{bail, Context};
use sqlx::postgres::PgConnectOptions;

pub const DEFAULT_HASH_COST: u32 = 10;
pub const DEFAULT_TTL_MINUTES: i64 = 60 * 24;

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_minutes: i64,
}

impl fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JwtConfig")
            .field("secret", &"<redacted>")
            .field("ttl_minutes", &self.ttl_minutes)
            .finish()
    }
}

/// Where the Postgres pool connects to.
///
/// A full `DATABASE_URL` wins; otherwise the discrete `DB_*` settings are used.
#[derive(Clone)]
pub enum DatabaseTarget {
    Url(String),
    Parts {
        host: String,
        port: u16,
        user: Option<String>,
        password: Option<String>,
        database: Option<String>,
    },
}

impl fmt::Debug for DatabaseTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseTarget::Url(_) => f.write_str("Url(<redacted>)"),
            DatabaseTarget::Parts {
                host,
                port,
                user,
                database,
                ..
            } => f
                .debug_struct("Parts")
                .field("host", host)
                .field("port", port)
                .field("user", user)
                .field("database", database)
                .finish_non_exhaustive(),
        }
    }
}

impl DatabaseTarget {
    pub fn connect_options(&self) -> anyhow::Result<PgConnectOptions> {
        match self {
            DatabaseTarget::Url(url) => url.parse().context("parse DATABASE_URL"),
            DatabaseTarget::Parts {
                host,
                port,
                user,
                password,
                database,
            } => {
                let mut opts = PgConnectOptions::new().host(host).port(*port);
                if let Some(user) = user {
                    opts = opts.username(user);
                }
                if let Some(password) = password {
                    opts = opts.password(password);
                }
                if let Some(database) = database {
                    opts = opts.database(database);
                }
                Ok(opts)
            }
        }
    }
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub target: DatabaseTarget,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: DatabaseConfig,
    pub jwt: JwtConfig,
    pub hash_cost: u32,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secret = lookup("JWT_SECRET")
            .filter(|s| !s.trim().is_empty())
            .context("JWT_SECRET must be set to a non-empty value")?;

        let ttl_minutes = parse_or(&lookup, "JWT_TTL_MINUTES", DEFAULT_TTL_MINUTES)?;
        if ttl_minutes <= 0 {
            bail!("JWT_TTL_MINUTES must be positive, got {ttl_minutes}");
        }

        let hash_cost = parse_or(&lookup, "HASH_COST", DEFAULT_HASH_COST)?;
        if !(4..=31).contains(&hash_cost) {
            bail!("HASH_COST must be between 4 and 31, got {hash_cost}");
        }

        let target = match lookup("DATABASE_URL").filter(|s| !s.is_empty()) {
            Some(url) => DatabaseTarget::Url(url),
            None => DatabaseTarget::Parts {
                host: lookup("DB_SERVER").unwrap_or_else(|| "localhost".into()),
                port: parse_or(&lookup, "DB_PORT", 5432)?,
                user: lookup("DB_USER"),
                password: lookup("DB_PASSWORD"),
                database: lookup("DB_DATABASE"),
            },
        };

        Ok(Self {
            database: DatabaseConfig {
                target,
                max_connections: parse_or(&lookup, "DB_MAX_CONNECTIONS", 10)?,
            },
            jwt: JwtConfig {
                secret,
                ttl_minutes,
            },
            hash_cost,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> anyhow::Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .with_context(|| format!("invalid value for {key}: {raw:?}")),
        None => Ok(default),
    }
}
