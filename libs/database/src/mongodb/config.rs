#[cfg(feature = "config")]
use core_config::{ConfigError, FromEnv, env_or_default, env_parse};

/// Database used when none is configured
pub const DEFAULT_DATABASE: &str = "users_db";

/// MongoDB connection settings
///
/// Can be constructed manually or loaded from environment variables (with the
/// `config` feature).
///
/// # Example
///
/// ```ignore
/// use database::mongodb::MongoConfig;
///
/// let config = MongoConfig::with_database("mongodb://localhost:27017", "users_db");
///
/// let config = MongoConfig::from_parts("db", 27017, Some(("root", "secret")), "admin");
///
/// // From environment variables (requires `config` feature)
/// let config = MongoConfig::from_env()?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoConfig {
    /// Connection string
    /// Format: mongodb://[username:password@]host[:port][/database][?options]
    pub url: String,

    /// Database name to use
    pub database: String,

    /// Optional application name reported to the server
    pub app_name: Option<String>,

    /// Maximum number of connections in the pool
    pub max_pool_size: u32,

    /// Minimum number of connections in the pool
    pub min_pool_size: u32,

    /// Connection timeout in seconds
    pub connect_timeout_secs: u64,

    /// Server selection timeout in seconds
    pub server_selection_timeout_secs: u64,
}

impl MongoConfig {
    /// Config for `url` with the default database and pool settings
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Self::default()
        }
    }

    /// Config for `url` using a specific database
    pub fn with_database(url: impl Into<String>, database: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            database: database.into(),
            ..Self::default()
        }
    }

    /// Build a config from discrete connection parameters.
    ///
    /// Credentials are percent-encoded into the URL and `auth_source` becomes
    /// the `authSource` option. Without credentials no auth options are set.
    pub fn from_parts(
        host: &str,
        port: u16,
        credentials: Option<(&str, &str)>,
        auth_source: &str,
    ) -> Self {
        Self::new(build_url(host, port, credentials, auth_source))
    }

    /// Set the application name for server logs
    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = Some(app_name.into());
        self
    }

    /// Get a reference to the MongoDB URL
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The URL with any password replaced by `***`, safe to log
    pub fn redacted_url(&self) -> String {
        let Some((scheme, rest)) = self.url.split_once("://") else {
            return self.url.clone();
        };
        let Some((userinfo, host)) = rest.rsplit_once('@') else {
            return self.url.clone();
        };
        match userinfo.split_once(':') {
            Some((user, _)) => format!("{}://{}:***@{}", scheme, user, host),
            None => self.url.clone(),
        }
    }

    /// Get the database name
    pub fn database(&self) -> &str {
        &self.database
    }
}

impl Default for MongoConfig {
    fn default() -> Self {
        Self {
            url: "mongodb://localhost:27017".to_string(),
            database: DEFAULT_DATABASE.to_string(),
            app_name: None,
            max_pool_size: 100,
            min_pool_size: 5,
            connect_timeout_secs: 10,
            server_selection_timeout_secs: 30,
        }
    }
}

fn build_url(host: &str, port: u16, credentials: Option<(&str, &str)>, auth_source: &str) -> String {
    match credentials {
        Some((username, password)) => format!(
            "mongodb://{}:{}@{}:{}/?authSource={}",
            urlencoding::encode(username),
            urlencoding::encode(password),
            host,
            port,
            urlencoding::encode(auth_source),
        ),
        None => format!("mongodb://{}:{}", host, port),
    }
}

/// Load MongoConfig from environment variables
///
/// Connection string, first match wins:
/// - `MONGODB_URL` or `MONGO_URL`
/// - assembled from `MONGODB_HOST` (default: db), `MONGODB_PORT` (default: 27017),
///   `MONGO_INITDB_ROOT_USERNAME` / `MONGO_INITDB_ROOT_PASSWORD` (optional, both
///   required for auth) and `MONGODB_AUTH_SOURCE` (default: admin)
///
/// Other settings:
/// - `MONGODB_DATABASE` or `MONGO_DATABASE` (default: users_db)
/// - `MONGODB_APP_NAME` (optional)
/// - `MONGODB_MAX_POOL_SIZE` (default: 100), `MONGODB_MIN_POOL_SIZE` (default: 5)
/// - `MONGODB_CONNECT_TIMEOUT_SECS` (default: 10)
/// - `MONGODB_SERVER_SELECTION_TIMEOUT_SECS` (default: 30)
#[cfg(feature = "config")]
impl FromEnv for MongoConfig {
    fn from_env() -> Result<Self, ConfigError> {
        let url = match std::env::var("MONGODB_URL").or_else(|_| std::env::var("MONGO_URL")) {
            Ok(url) => url,
            Err(_) => {
                let host = env_or_default("MONGODB_HOST", "db");
                let port = env_parse("MONGODB_PORT", 27017u16)?;
                let auth_source = env_or_default("MONGODB_AUTH_SOURCE", "admin");
                let username = std::env::var("MONGO_INITDB_ROOT_USERNAME").ok();
                let password = std::env::var("MONGO_INITDB_ROOT_PASSWORD").ok();
                let credentials = match (username.as_deref(), password.as_deref()) {
                    (Some(user), Some(pass)) => Some((user, pass)),
                    _ => None,
                };
                build_url(&host, port, credentials, &auth_source)
            }
        };

        let database = std::env::var("MONGODB_DATABASE")
            .or_else(|_| std::env::var("MONGO_DATABASE"))
            .unwrap_or_else(|_| DEFAULT_DATABASE.to_string());

        Ok(Self {
            url,
            database,
            app_name: std::env::var("MONGODB_APP_NAME").ok(),
            max_pool_size: env_parse("MONGODB_MAX_POOL_SIZE", 100)?,
            min_pool_size: env_parse("MONGODB_MIN_POOL_SIZE", 5)?,
            connect_timeout_secs: env_parse("MONGODB_CONNECT_TIMEOUT_SECS", 10)?,
            server_selection_timeout_secs: env_parse("MONGODB_SERVER_SELECTION_TIMEOUT_SECS", 30)?,
        })
    }
}
