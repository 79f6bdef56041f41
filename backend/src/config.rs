//! Runtime configuration, read from the process environment.
//!
//! A `.env` file in the working directory is loaded first when present. Every
//! setting has a default so the server starts with no configuration at all.

use chrono::TimeDelta;
use std::env;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {reason}")]
    InvalidValue { var: String, reason: String },
}

/// Credentials of the administrator created on first start.
#[derive(Debug, Clone)]
pub struct AdminSeed {
    pub name: String,
    pub email: String,
    pub mobile: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database_path: PathBuf,
    /// Directory holding uploads while they are being processed.
    pub upload_dir: PathBuf,
    pub max_upload_bytes: usize,
    pub session_ttl_hours: i64,
    pub admin: AdminSeed,
}

impl AppConfig {
    /// Loads `.env` (if any) and reads the configuration from the environment.
    ///
    /// Recognised variables: `HOST`, `PORT`, `DATABASE_PATH`, `UPLOAD_DIR`,
    /// `MAX_UPLOAD_BYTES`, `SESSION_TTL_HOURS`, `ADMIN_NAME`, `ADMIN_EMAIL`,
    /// `ADMIN_MOBILE` and `ADMIN_PASSWORD`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let text = |var: &str, default: &str| lookup(var).unwrap_or_else(|| default.to_string());

        Ok(AppConfig {
            host: text("HOST", "127.0.0.1"),
            port: parse_var(&lookup, "PORT", 5000)?,
            database_path: PathBuf::from(text("DATABASE_PATH", "distribution.sqlite")),
            upload_dir: PathBuf::from(text("UPLOAD_DIR", "uploads")),
            max_upload_bytes: parse_var(&lookup, "MAX_UPLOAD_BYTES", 5 * 1024 * 1024)?,
            session_ttl_hours: session_ttl(parse_var(&lookup, "SESSION_TTL_HOURS", 720)?)?,
            admin: AdminSeed {
                name: text("ADMIN_NAME", "System Admin"),
                email: text("ADMIN_EMAIL", "admin@mern.com"),
                mobile: text("ADMIN_MOBILE", "+1234567890"),
                password: text("ADMIN_PASSWORD", "admin123"),
            },
        })
    }

    pub fn bind_address(&self) -> (String, u16) {
        (self.host.clone(), self.port)
    }
}

fn parse_var<F, T>(lookup: &F, var: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(var) {
        Some(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
            var: var.to_string(),
            reason: format!("expected a number, got '{}'", raw),
        }),
        None => Ok(default),
    }
}

/// Session lifetimes must be positive and representable as a `TimeDelta`.
fn session_ttl(hours: i64) -> Result<i64, ConfigError> {
    match TimeDelta::try_hours(hours) {
        Some(_) if hours > 0 => Ok(hours),
        _ => Err(ConfigError::InvalidValue {
            var: "SESSION_TTL_HOURS".to_string(),
            reason: format!("{} is not a usable number of hours", hours),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|var| vars.get(var).cloned())
    }

    #[test]
    fn defaults_apply_when_nothing_is_set() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.bind_address(), ("127.0.0.1".to_string(), 5000));
        assert_eq!(config.max_upload_bytes, 5 * 1024 * 1024);
        assert_eq!(config.session_ttl_hours, 720);
        assert_eq!(config.admin.email, "admin@mern.com");
    }

    #[test]
    fn overrides_are_read() {
        let config = config_from(&[
            ("PORT", "8081"),
            ("UPLOAD_DIR", "/tmp/uploads"),
            ("ADMIN_EMAIL", "root@example.com"),
        ])
        .unwrap();
        assert_eq!(config.port, 8081);
        assert_eq!(config.upload_dir, PathBuf::from("/tmp/uploads"));
        assert_eq!(config.admin.email, "root@example.com");
    }

    #[test]
    fn bad_numbers_are_rejected() {
        let err = config_from(&[("MAX_UPLOAD_BYTES", "lots")]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::InvalidValue {
                var: "MAX_UPLOAD_BYTES".to_string(),
                reason: "expected a number, got 'lots'".to_string(),
            }
        );
    }

    #[test]
    fn session_ttl_must_fit_a_time_delta() {
        for bad in ["0", "-5", "9223372036854775807"] {
            let err = config_from(&[("SESSION_TTL_HOURS", bad)]).unwrap_err();
            assert!(
                matches!(err, ConfigError::InvalidValue { ref var, .. } if var == "SESSION_TTL_HOURS"),
                "{} was accepted",
                bad
            );
        }
        assert_eq!(
            config_from(&[("SESSION_TTL_HOURS", "48")]).unwrap().session_ttl_hours,
            48
        );
    }
}
