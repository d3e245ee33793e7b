use std::net::SocketAddr;

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;

#[cfg(feature = "logging")]
use tracing_subscriber::filter::LevelFilter;

/// Database configuration.
#[derive(Deserialize)]
pub struct Database {
    /// Database URL string.
    pub url: String,
}

/// HTTP server configuration.
#[derive(Deserialize)]
pub struct Server {
    /// Address, that HTTP server will listen on.
    pub address: SocketAddr,
}

/// Implementation of [`serde`]'s deserializer for [`FromStr`] types.
#[cfg(feature = "logging")]
fn deserialize_from_str<'de, T, D>(deserializer: D) -> Result<T, D::Error>
where
    T: std::str::FromStr,
    T::Err: std::error::Error,
    D: serde::de::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    std::str::FromStr::from_str(&s).map_err(serde::de::Error::custom)
}

/// Logging configuration.
#[cfg(feature = "logging")]
#[derive(Deserialize)]
pub struct Logging {
    /// Log level.
    #[serde(deserialize_with = "deserialize_from_str")]
    pub level: LevelFilter,
}

#[cfg(feature = "logging")]
impl Default for Logging {
    fn default() -> Self {
        Self {
            level: LevelFilter::WARN,
        }
    }
}

/// Outgoing mail configuration, used to deliver generated reports.
#[derive(Deserialize)]
pub struct Mail {
    /// SMTP relay host name.
    pub smtp_host: String,

    /// SMTP relay port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// SMTP credentials.
    pub username: String,
    pub password: String,

    /// Sender mailbox, e.g. `"Reports <no-reply@example.com>"`.
    pub from: String,

    /// Report recipient mailboxes.
    pub to: Vec<String>,
}

fn default_smtp_port() -> u16 {
    465
}

/// General configuration.
#[derive(Deserialize)]
pub struct Config {
    /// General database configuration.
    pub database: Database,

    /// HTTP server configuration.
    #[serde(default)]
    pub server: Option<Server>,

    /// Logging configuration.
    #[cfg(feature = "logging")]
    #[serde(default)]
    pub logging: Logging,

    /// Outgoing mail configuration.
    #[serde(default)]
    pub mail: Option<Mail>,
}

impl Config {
    /// Create new config using default configuration file or environment variables.
    ///
    /// See [`Env`] for more details on how to use environment variables configuration.
    ///
    /// [`Env`]: figment::providers::Env
    pub fn new() -> Result<Self, figment::Error> {
        Figment::new()
            .merge(Toml::file("Config.toml"))
            .merge(Env::prefixed("CONFIG_").split("_"))
            .extract()
    }

    /// Create new config suitable for running unit tests.
    #[cfg(feature = "test-utils")]
    pub fn for_tests() -> Self {
        Self {
            database: Database {
                url: String::from("sqlite::memory:"),
            },
            server: Some(Server {
                address: "127.0.0.1:3000".parse().unwrap(),
            }),
            logging: Logging::default(),
            mail: None,
        }
    }
}
