//! Configuration types shared across crates.

use crate::identifier::TableIdentifier;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// PostgreSQL SSL mode configuration.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PgSslMode {
    /// Disable SSL/TLS entirely.
    Disable,
    /// Prefer SSL/TLS but allow unencrypted connections (default).
    #[default]
    Prefer,
    /// Require SSL/TLS for all connections.
    Require,
}

/// Relational store configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum DatabaseConfig {
    /// SQLite database file, or `:memory:`.
    Sqlite {
        /// Database file path.
        path: PathBuf,
    },
    /// PostgreSQL database.
    Postgres {
        /// Connection URL. Takes precedence over individual fields if both are provided.
        url: Option<String>,
        /// Database host.
        host: Option<String>,
        /// Database port (default: 5432).
        #[serde(default = "default_pg_port")]
        port: Option<u16>,
        /// Database username.
        username: Option<String>,
        /// Database password.
        /// Prefer AGORA_DATABASE__PASSWORD over storing it in the config file.
        password: Option<String>,
        /// Database name.
        database: Option<String>,
        /// SSL mode for connections.
        ssl_mode: Option<PgSslMode>,
        /// Maximum connections in the pool.
        #[serde(default = "default_max_connections")]
        max_connections: u32,
        /// Statement timeout in milliseconds.
        statement_timeout_ms: Option<u64>,
    },
}

fn default_max_connections() -> u32 {
    10
}

fn default_pg_port() -> Option<u16> {
    Some(5432)
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::Sqlite {
            path: PathBuf::from("./data/agora.db"),
        }
    }
}

impl DatabaseConfig {
    /// Validate database configuration invariants.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            DatabaseConfig::Sqlite { path } => {
                if path.as_os_str().is_empty() {
                    return Err("sqlite config requires a non-empty 'path'".to_string());
                }
                Ok(())
            }
            DatabaseConfig::Postgres {
                url,
                host,
                database,
                max_connections,
                ..
            } => {
                if *max_connections == 0 {
                    return Err("postgres 'max_connections' must be at least 1".to_string());
                }
                match (url.as_ref(), host.as_ref(), database.as_ref()) {
                    (Some(_), _, _) => Ok(()),
                    (None, Some(_), Some(_)) => Ok(()),
                    (None, None, _) => Err(
                        "postgres config requires either 'url' or 'host' + 'database'".to_string(),
                    ),
                    (None, Some(_), None) => Err(
                        "postgres config requires 'database' when using individual fields"
                            .to_string(),
                    ),
                }
            }
        }
    }

    /// Copy of this config that is safe to print.
    pub fn redacted(&self) -> Self {
        match self.clone() {
            DatabaseConfig::Postgres {
                url,
                host,
                port,
                username,
                password,
                database,
                ssl_mode,
                max_connections,
                statement_timeout_ms,
            } => DatabaseConfig::Postgres {
                url: url.map(|_| "<redacted>".to_string()),
                host,
                port,
                username,
                password: password.map(|_| "<redacted>".to_string()),
                database,
                ssl_mode,
                max_connections,
                statement_timeout_ms,
            },
            sqlite => sqlite,
        }
    }
}

/// Table names of the feature entities that capabilities attach to.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TargetsConfig {
    #[serde(default = "default_posts_table")]
    pub posts: TableIdentifier,
    #[serde(default = "default_comments_table")]
    pub comments: TableIdentifier,
    #[serde(default = "default_profiles_table")]
    pub profiles: TableIdentifier,
}

fn default_table(name: &str) -> TableIdentifier {
    match TableIdentifier::new(name) {
        Ok(id) => id,
        Err(_) => unreachable!("built-in table name {name} is letters only"),
    }
}

fn default_posts_table() -> TableIdentifier {
    default_table("Post")
}

fn default_comments_table() -> TableIdentifier {
    default_table("Comment")
}

fn default_profiles_table() -> TableIdentifier {
    default_table("Profile")
}

impl Default for TargetsConfig {
    fn default() -> Self {
        Self {
            posts: default_posts_table(),
            comments: default_comments_table(),
            profiles: default_profiles_table(),
        }
    }
}

/// Location of uploaded media, passed explicitly instead of read from the
/// process environment.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Directory uploaded files are written to.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
    /// Public base URL the directory is served under.
    #[serde(default = "default_static_host")]
    pub static_host: String,
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("./data/static")
}

fn default_static_host() -> String {
    "http://127.0.0.1:8080/static".to_string()
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            static_dir: default_static_dir(),
            static_host: default_static_host(),
        }
    }
}

impl MediaConfig {
    /// Public URL for a stored file name.
    pub fn public_url(&self, file_name: &str) -> String {
        format!(
            "{}/{}",
            self.static_host.trim_end_matches('/'),
            file_name.trim_start_matches('/')
        )
    }

    /// Path a stored file name is written to.
    pub fn local_path(&self, file_name: &str) -> PathBuf {
        self.static_dir.join(file_name.trim_start_matches('/'))
    }
}

/// Feed paging configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FeedConfig {
    /// Page size used when a caller does not ask for one.
    #[serde(default = "default_page_size")]
    pub default_page_size: u32,
}

fn default_page_size() -> u32 {
    20
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            default_page_size: default_page_size(),
        }
    }
}

/// Complete application configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Relational store configuration.
    #[serde(default)]
    pub database: DatabaseConfig,
    /// Feature table names.
    #[serde(default)]
    pub targets: TargetsConfig,
    /// Uploaded media location.
    #[serde(default)]
    pub media: MediaConfig,
    /// Feed paging.
    #[serde(default)]
    pub feed: FeedConfig,
}

impl AppConfig {
    /// Create a test configuration backed by an in-memory SQLite database.
    ///
    /// **For testing only.**
    pub fn for_testing() -> Self {
        Self {
            database: DatabaseConfig::Sqlite {
                path: PathBuf::from(":memory:"),
            },
            ..Self::default()
        }
    }

    /// Validate the whole configuration.
    pub fn validate(&self) -> crate::Result<()> {
        self.database.validate().map_err(crate::Error::Config)?;
        if self.feed.default_page_size == 0 {
            return Err(crate::Error::Config(
                "feed 'default_page_size' must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Copy of this config that is safe to print.
    pub fn redacted(&self) -> Self {
        Self {
            database: self.database.redacted(),
            ..self.clone()
        }
    }
}
