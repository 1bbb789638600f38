use ::config::{Config as Settings, Environment, Map};
use serde::Deserialize;
use std::fmt;
use url::Url;

use crate::error::DbError;

#[derive(Debug, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub password: PasswordConfig,
}

/// Connection settings. `url` wins over the discrete fields whenever it is set.
#[derive(Clone, Default)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub name: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub host: Option<String>,
    /// Kept as text; a bad value only surfaces when connecting.
    pub port: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PasswordConfig {
    pub cost: u32,
}

impl Default for PasswordConfig {
    fn default() -> Self {
        PasswordConfig {
            cost: bcrypt::DEFAULT_COST,
        }
    }
}

// Flat view of the process environment. `config::Environment` lowercases keys.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct EnvVars {
    database_url: Option<String>,
    database: Option<String>,
    user: Option<String>,
    password: Option<String>,
    host: Option<String>,
    port: Option<String>,
    bcrypt_cost: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenv::dotenv().ok();
        Self::load(Environment::default())
    }

    /// Builds the configuration from an explicit variable map instead of the
    /// process environment.
    pub fn from_source(vars: Map<String, String>) -> Result<Self, anyhow::Error> {
        Self::load(Environment::default().source(Some(vars)))
    }

    fn load(env: Environment) -> Result<Self, anyhow::Error> {
        let vars: EnvVars = Settings::builder()
            .add_source(env)
            .build()?
            .try_deserialize()?;

        let cost = match non_empty(vars.bcrypt_cost) {
            Some(raw) => raw
                .trim()
                .parse()
                .map_err(|_| anyhow::anyhow!("Invalid BCRYPT_COST value: {:?}", raw))?,
            None => bcrypt::DEFAULT_COST,
        };

        Ok(Config {
            database: DatabaseConfig {
                url: non_empty(vars.database_url),
                name: non_empty(vars.database),
                user: non_empty(vars.user),
                password: non_empty(vars.password),
                host: non_empty(vars.host),
                port: non_empty(vars.port),
            },
            password: PasswordConfig { cost },
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

impl DatabaseConfig {
    pub fn uses_url(&self) -> bool {
        self.url.is_some()
    }

    /// Resolves the URL handed to the driver.
    ///
    /// Discrete settings travel as query parameters so the driver decodes
    /// them verbatim: a `HOST` starting with `/` is a socket directory, IPv6
    /// literals need no brackets and database names may hold any character.
    /// The authority is always `localhost`; a `HOST` parameter overrides it.
    pub fn connection_url(&self) -> Result<String, DbError> {
        if let Some(url) = &self.url {
            return Ok(url.clone());
        }

        let port = match &self.port {
            Some(raw) => Some(
                raw.trim()
                    .parse::<u16>()
                    .map_err(|_| DbError::Config(format!("invalid PORT {:?}", raw)))?,
            ),
            None => None,
        };

        let params = [
            ("host", self.host.clone()),
            ("port", port.map(|p| p.to_string())),
            ("user", self.user.clone()),
            ("password", self.password.clone()),
            ("dbname", self.name.clone()),
        ];

        let mut url = Url::parse("postgres://localhost")
            .map_err(|e| DbError::Config(e.to_string()))?;
        if params.iter().any(|(_, value)| value.is_some()) {
            let mut query = url.query_pairs_mut();
            for (key, value) in &params {
                if let Some(value) = value {
                    query.append_pair(key, value);
                }
            }
        }

        Ok(url.to_string())
    }
}

// Both the URL and the password field carry secrets.
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .finish()
    }
}
