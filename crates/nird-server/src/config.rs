//! Server configuration
//!
//! Command-line flags, each with an environment fallback and a default.

use clap::{value_parser, Arg, ArgMatches, Command};
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::str::FromStr;
use warp::http::uri::Authority;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A setting has no value
    #[error("missing setting: {0}")]
    Missing(&'static str),

    /// The CORS origin is not `scheme://authority`
    #[error("invalid frontend origin '{0}': expected scheme://host[:port]")]
    InvalidOrigin(String),
}

/// Resolved server settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Listen address
    pub host: IpAddr,
    /// Listen port
    pub port: u16,
    /// The one origin allowed by CORS
    pub frontend_url: String,
    /// Catalog document
    pub catalog_path: PathBuf,
    /// Score ledger document
    pub scores_path: PathBuf,
    /// Default tracing filter when `RUST_LOG` is unset
    pub log_level: String,
}

impl ServerConfig {
    /// Build from parsed command-line matches
    ///
    /// # Errors
    /// `ConfigError::InvalidOrigin` for an unusable frontend URL
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, ConfigError> {
        let frontend_url = required::<String>(matches, "frontend-url")?;

        Ok(Self {
            host: required(matches, "host")?,
            port: required(matches, "port")?,
            frontend_url: normalize_origin(&frontend_url)?,
            catalog_path: required(matches, "catalog")?,
            scores_path: required(matches, "scores")?,
            log_level: required(matches, "log-level")?,
        })
    }

    /// Socket to bind
    #[inline]
    #[must_use]
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn required<T: Clone + Send + Sync + 'static>(
    matches: &ArgMatches,
    id: &'static str,
) -> Result<T, ConfigError> {
    matches.get_one::<T>(id).cloned().ok_or(ConfigError::Missing(id))
}

/// Check `raw` is `scheme://authority` and strip any trailing slash
///
/// # Errors
/// `ConfigError::InvalidOrigin`
pub fn normalize_origin(raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    let invalid = || ConfigError::InvalidOrigin(raw.to_string());

    let (scheme, rest) = trimmed.split_once("://").ok_or_else(invalid)?;
    let scheme_ok = !scheme.is_empty()
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "+-.".contains(c));
    if !scheme_ok {
        return Err(invalid());
    }
    if rest.is_empty() || rest.contains('/') || Authority::from_str(rest).is_err() {
        return Err(invalid());
    }

    Ok(trimmed.to_string())
}

/// Command-line definition
#[must_use]
pub fn command() -> Command {
    Command::new("nird-server")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Village Numérique Résistant API: podium scoring and village game")
        .arg(
            Arg::new("host")
                .long("host")
                .env("NIRD_HOST")
                .default_value("0.0.0.0")
                .value_parser(value_parser!(IpAddr))
                .help("Address to listen on"),
        )
        .arg(
            Arg::new("port")
                .long("port")
                .env("PORT")
                .default_value("3000")
                .value_parser(value_parser!(u16))
                .help("Port to listen on"),
        )
        .arg(
            Arg::new("frontend-url")
                .long("frontend-url")
                .env("FRONTEND_URL")
                .default_value("http://localhost:5173")
                .help("Origin allowed to call the API from a browser"),
        )
        .arg(
            Arg::new("catalog")
                .long("catalog")
                .env("NIRD_CATALOG_PATH")
                .default_value("data/nuitdelinfo.json")
                .value_parser(value_parser!(PathBuf))
                .help("Missions/teams catalog document"),
        )
        .arg(
            Arg::new("scores")
                .long("scores")
                .env("NIRD_SCORES_PATH")
                .default_value("data/scores.json")
                .value_parser(value_parser!(PathBuf))
                .help("Score ledger document, rewritten on every update"),
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .env("NIRD_LOG")
                .default_value("info")
                .help("Tracing filter used when RUST_LOG is not set"),
        )
}
