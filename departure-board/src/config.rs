//! Application configuration from environment variables.
//!
//! | Variable | Default |
//! |---|---|
//! | `BOARD_LISTEN_ADDR` | `127.0.0.1:3000` |
//! | `BOARD_API_URL` | `https://v6.bvg.transport.rest` |
//! | `BOARD_RESULTS` | `6` |
//! | `BOARD_LIMIT` | `6` |
//! | `BOARD_MAX_ATTEMPTS` | `3` |
//! | `BOARD_RETRY_DELAY_MS` | `2000` |
//! | `BOARD_TIMEOUT_SECS` | `10` |
//! | `BOARD_STRICT_FIRST_LEG` | `false` |
//! | `BOARD_CACHE_DIR` | unset (in-memory store) |
//! | `BOARD_CACHE_TTL_SECS` | `300` |
//! | `BOARD_FIXTURES_DIR` | unset (live API) |

use std::fmt::Display;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::cache::CacheConfig;
use crate::hafas::{AdmissionPolicy, HafasConfig};
use crate::pipeline::RefreshSettings;

/// Default listen address.
const DEFAULT_LISTEN_ADDR: SocketAddr =
    SocketAddr::V4(std::net::SocketAddrV4::new(std::net::Ipv4Addr::LOCALHOST, 3000));

/// Invalid configuration value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {var}={value:?}: {reason}")]
pub struct ConfigError {
    /// Environment variable name
    pub var: &'static str,
    /// Offending value
    pub value: String,
    /// What is wrong with it
    pub reason: String,
}

/// Complete application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Address the HTTP server binds to.
    pub listen_addr: SocketAddr,

    /// Journey API client settings.
    pub hafas: HafasConfig,

    /// Per-route refresh settings.
    pub refresh: RefreshSettings,

    /// Connection store settings.
    pub cache: CacheConfig,

    /// Directory for the disk store; in-memory store when `None`.
    pub cache_dir: Option<PathBuf>,

    /// Directory of recorded responses; live API when `None`.
    pub fixtures_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            listen_addr: DEFAULT_LISTEN_ADDR,
            hafas: HafasConfig::default(),
            refresh: RefreshSettings::default(),
            cache: CacheConfig::default(),
            cache_dir: None,
            fixtures_dir: None,
        }
    }
}

impl AppConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Read configuration through an arbitrary variable lookup.
    ///
    /// Unset and empty variables take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());
        let mut config = AppConfig::default();

        if let Some(addr) = parse(&get, "BOARD_LISTEN_ADDR")? {
            config.listen_addr = addr;
        }

        if let Some(url) = get("BOARD_API_URL") {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(invalid("BOARD_API_URL", &url, "expected an http(s) URL"));
            }
            config.hafas = config.hafas.with_base_url(url);
        }

        if let Some(results) = parse_positive::<u8>(&get, "BOARD_RESULTS")? {
            config.hafas = config.hafas.with_results(results);
        }

        if let Some(ms) = parse::<u64>(&get, "BOARD_RETRY_DELAY_MS")? {
            config.hafas = config.hafas.with_retry_delay(Duration::from_millis(ms));
        }

        if let Some(secs) = parse_positive::<u64>(&get, "BOARD_TIMEOUT_SECS")? {
            config.hafas = config.hafas.with_timeout(secs);
        }

        if let Some(limit) = parse_positive::<usize>(&get, "BOARD_LIMIT")? {
            config.refresh.limit = limit;
        }

        if let Some(attempts) = parse_positive::<u32>(&get, "BOARD_MAX_ATTEMPTS")? {
            config.refresh.max_attempts = attempts;
        }

        if let Some(value) = get("BOARD_STRICT_FIRST_LEG") {
            config.refresh.policy = if parse_flag("BOARD_STRICT_FIRST_LEG", &value)? {
                AdmissionPolicy::FirstLegStrict
            } else {
                AdmissionPolicy::EveryLeg
            };
        }

        if let Some(secs) = parse::<u64>(&get, "BOARD_CACHE_TTL_SECS")? {
            config.cache = config.cache.with_ttl(Duration::from_secs(secs));
        }

        config.cache_dir = get("BOARD_CACHE_DIR").map(PathBuf::from);
        config.fixtures_dir = get("BOARD_FIXTURES_DIR").map(PathBuf::from);

        Ok(config)
    }
}

fn invalid(var: &'static str, value: &str, reason: impl Display) -> ConfigError {
    ConfigError {
        var,
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn parse<T>(
    get: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    get(var)
        .map(|value| value.trim().parse().map_err(|e| invalid(var, &value, e)))
        .transpose()
}

fn parse_positive<T>(
    get: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError>
where
    T: FromStr + Default + PartialEq + Display,
    T::Err: Display,
{
    match parse::<T>(get, var)? {
        Some(v) if v == T::default() => Err(invalid(var, &v.to_string(), "must be at least 1")),
        other => Ok(other),
    }
}

fn parse_flag(var: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(var, value, "expected true or false")),
    }
}
