//! Server configuration from environment variables.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::nominatim::NominatimConfig;
use crate::osrm::OsrmConfig;
use crate::scoring::ProcessScorerConfig;

/// Default listen address.
const DEFAULT_BIND_ADDR: &str = "127.0.0.1:5000";

/// An environment variable held a value that could not be used.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("invalid value {value:?} for {name}: {reason}")]
pub struct ConfigError {
    name: &'static str,
    value: String,
    reason: String,
}

/// Everything needed to start the server.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub osrm: OsrmConfig,
    pub nominatim: NominatimConfig,
    pub scorer: ProcessScorerConfig,
}

impl AppConfig {
    /// Read configuration from the process environment.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `FARE_BIND_ADDR` | `127.0.0.1:5000` |
    /// | `OSRM_BASE_URL` | public OSRM server |
    /// | `OSRM_TIMEOUT_SECS` | 10 |
    /// | `NOMINATIM_BASE_URL` | public Nominatim server |
    /// | `NOMINATIM_TIMEOUT_SECS` | 5 |
    /// | `NOMINATIM_USER_AGENT` | `Taxi-Price-Predictor/1.0` |
    /// | `SCORER_INTERPRETER` | `python` |
    /// | `SCORER_SCRIPT` | `ml/predict.py` |
    /// | `SCORER_WORKDIR` | `ml` |
    /// | `SCORER_TIMEOUT_SECS` | none |
    ///
    /// Relative scorer paths are relative to the server's working directory.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let bind_addr = parse(
            "FARE_BIND_ADDR",
            &var("FARE_BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string()),
        )?;

        let mut osrm = OsrmConfig::new();
        if let Some(url) = var("OSRM_BASE_URL") {
            osrm = osrm.with_base_url(url);
        }
        if let Some(secs) = var("OSRM_TIMEOUT_SECS") {
            osrm = osrm.with_timeout(parse_secs("OSRM_TIMEOUT_SECS", &secs)?);
        }

        let mut nominatim = NominatimConfig::new();
        if let Some(url) = var("NOMINATIM_BASE_URL") {
            nominatim = nominatim.with_base_url(url);
        }
        if let Some(secs) = var("NOMINATIM_TIMEOUT_SECS") {
            nominatim = nominatim.with_timeout(parse_secs("NOMINATIM_TIMEOUT_SECS", &secs)?);
        }
        if let Some(agent) = var("NOMINATIM_USER_AGENT") {
            nominatim = nominatim.with_user_agent(agent);
        }

        let defaults = ProcessScorerConfig::default();
        let mut scorer = ProcessScorerConfig::new(
            var("SCORER_INTERPRETER").map_or(defaults.interpreter, PathBuf::from),
            var("SCORER_SCRIPT").map_or(defaults.script, PathBuf::from),
        );
        if let Some(dir) = var("SCORER_WORKDIR").map(PathBuf::from).or(defaults.working_dir) {
            scorer = scorer.with_working_dir(dir);
        }
        if let Some(secs) = var("SCORER_TIMEOUT_SECS") {
            scorer = scorer.with_timeout(Duration::from_secs(parse_secs(
                "SCORER_TIMEOUT_SECS",
                &secs,
            )?));
        }

        Ok(Self {
            bind_addr,
            osrm,
            nominatim,
            scorer,
        })
    }
}

fn parse<T>(name: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e: T::Err| ConfigError {
        name,
        value: value.to_string(),
        reason: e.to_string(),
    })
}

/// A strictly positive number of seconds.
fn parse_secs(name: &'static str, value: &str) -> Result<u64, ConfigError> {
    match parse(name, value)? {
        0 => Err(ConfigError {
            name,
            value: value.to_string(),
            reason: "must be at least 1 second".to_string(),
        }),
        secs => Ok(secs),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn defaults() {
        let config = config(&[]).unwrap();
        assert_eq!(config.bind_addr, "127.0.0.1:5000".parse().unwrap());
        assert_eq!(config.osrm.base_url, "http://router.project-osrm.org");
        assert_eq!(config.osrm.timeout_secs, 10);
        assert_eq!(config.nominatim.base_url, "https://nominatim.openstreetmap.org");
        assert_eq!(config.nominatim.timeout_secs, 5);
        assert_eq!(config.nominatim.user_agent, "Taxi-Price-Predictor/1.0");
        assert_eq!(config.scorer.interpreter, PathBuf::from("python"));
        assert_eq!(config.scorer.script, PathBuf::from("ml/predict.py"));
        assert_eq!(config.scorer.working_dir, Some(PathBuf::from("ml")));
        assert_eq!(config.scorer.timeout, None);
    }

    #[test]
    fn overrides() {
        let config = config(&[
            ("FARE_BIND_ADDR", "0.0.0.0:8080"),
            ("OSRM_BASE_URL", "http://osrm.local:5000"),
            ("OSRM_TIMEOUT_SECS", "3"),
            ("NOMINATIM_BASE_URL", "http://nominatim.local"),
            ("NOMINATIM_TIMEOUT_SECS", "2"),
            ("NOMINATIM_USER_AGENT", "fare-tests/0.1"),
            ("SCORER_INTERPRETER", "/usr/bin/python3"),
            ("SCORER_SCRIPT", "/srv/model/predict.py"),
            ("SCORER_WORKDIR", "/srv/model"),
            ("SCORER_TIMEOUT_SECS", "30"),
        ])
        .unwrap();

        assert_eq!(config.bind_addr, "0.0.0.0:8080".parse().unwrap());
        assert_eq!(config.osrm.base_url, "http://osrm.local:5000");
        assert_eq!(config.osrm.timeout_secs, 3);
        assert_eq!(config.nominatim.base_url, "http://nominatim.local");
        assert_eq!(config.nominatim.timeout_secs, 2);
        assert_eq!(config.nominatim.user_agent, "fare-tests/0.1");
        assert_eq!(config.scorer.interpreter, PathBuf::from("/usr/bin/python3"));
        assert_eq!(config.scorer.script, PathBuf::from("/srv/model/predict.py"));
        assert_eq!(config.scorer.working_dir, Some(PathBuf::from("/srv/model")));
        assert_eq!(config.scorer.timeout, Some(Duration::from_secs(30)));
    }

    #[test]
    fn blank_values_use_defaults() {
        let config = config(&[("OSRM_TIMEOUT_SECS", "  "), ("SCORER_SCRIPT", "")]).unwrap();
        assert_eq!(config.osrm.timeout_secs, 10);
        assert_eq!(config.scorer.script, PathBuf::from("ml/predict.py"));
    }

    #[test]
    fn invalid_numbers() {
        let err = config(&[("OSRM_TIMEOUT_SECS", "ten")]).unwrap_err();
        assert!(err.to_string().contains("OSRM_TIMEOUT_SECS"));

        let err = config(&[("SCORER_TIMEOUT_SECS", "0")]).unwrap_err();
        assert!(err.to_string().contains("at least 1 second"));

        assert!(config(&[("NOMINATIM_TIMEOUT_SECS", "-1")]).is_err());
    }

    #[test]
    fn invalid_bind_addr() {
        let err = config(&[("FARE_BIND_ADDR", "localhost")]).unwrap_err();
        assert!(err.to_string().contains("FARE_BIND_ADDR"));
    }
}
