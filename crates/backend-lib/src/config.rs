// ============================
// crates/backend-lib/src/config.rs
// ============================
//! Configuration management.
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::auth::PasswordRequirements;
use crate::error::AppError;

/// Default config file, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Prefix for environment overrides, e.g. `GYM_JWT__TTL_SECS=600`
pub const ENV_PREFIX: &str = "GYM_";

/// Shortest HMAC secret accepted for token signing
pub const MIN_SECRET_LEN: usize = 32;

const VALID_LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Server bind address
    pub bind_addr: SocketAddr,
    /// Data directory path (flat-file user store lives under it)
    pub data_dir: PathBuf,
    /// Log level used when `RUST_LOG` is unset
    pub log_level: String,
    pub jwt: JwtSettings,
    pub lockout: LockoutSettings,
    pub revocation: RevocationSettings,
    pub password: PasswordSettings,
}

/// Bearer token settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JwtSettings {
    /// HMAC signing secret. Generated at startup when absent.
    #[serde(default)]
    pub secret: Option<String>,
    /// Token lifetime in seconds
    pub ttl_secs: u64,
}

/// Failed-login lockout settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockoutSettings {
    /// Consecutive failures that trigger a lockout
    pub max_attempts: u32,
    /// How long a lockout lasts
    pub duration_secs: u64,
    /// Interval of the background sweep of elapsed lockouts
    pub cleanup_interval_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RevocationSettings {
    /// Interval of the background prune of expired revocations
    pub prune_interval_secs: u64,
}

/// Password hashing and strength settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PasswordSettings {
    /// scrypt cost parameter (log2 of N)
    pub hash_log_n: u8,
    pub requirements: PasswordRequirements,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            data_dir: PathBuf::from("data"),
            log_level: "info".to_string(),
            jwt: JwtSettings::default(),
            lockout: LockoutSettings::default(),
            revocation: RevocationSettings::default(),
            password: PasswordSettings::default(),
        }
    }
}

impl Default for JwtSettings {
    fn default() -> Self {
        Self {
            secret: None,
            ttl_secs: 10 * 60 * 60, // 10 hours
        }
    }
}

impl Default for LockoutSettings {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            duration_secs: 5 * 60,
            cleanup_interval_secs: 60 * 60,
        }
    }
}

impl Default for RevocationSettings {
    fn default() -> Self {
        Self {
            prune_interval_secs: 15 * 60,
        }
    }
}

impl Default for PasswordSettings {
    fn default() -> Self {
        Self {
            hash_log_n: 15,
            requirements: PasswordRequirements::default(),
        }
    }
}

impl JwtSettings {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl LockoutSettings {
    pub fn duration(&self) -> Duration {
        Duration::from_secs(self.duration_secs)
    }
}

impl Settings {
    /// Load settings from the given TOML file (missing file is fine) and the
    /// environment, layered over the defaults.
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, AppError> {
        let settings: Settings = Self::figment(path.as_ref())
            .extract()
            .map_err(|e| AppError::Config(e.to_string()))?;
        settings.validate()?;
        Ok(settings)
    }

    fn figment(path: &Path) -> Figment {
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Validate the settings
    pub fn validate(&self) -> Result<(), AppError> {
        if !VALID_LOG_LEVELS.contains(&self.log_level.to_lowercase().as_str()) {
            return Err(AppError::Config(format!(
                "invalid log level: {}",
                self.log_level
            )));
        }
        if self.jwt.ttl_secs == 0 {
            return Err(AppError::Config("jwt.ttl_secs must be positive".into()));
        }
        if let Some(secret) = &self.jwt.secret {
            if secret.len() < MIN_SECRET_LEN {
                return Err(AppError::Config(format!(
                    "jwt.secret must be at least {MIN_SECRET_LEN} bytes"
                )));
            }
        }
        if self.lockout.max_attempts == 0 {
            return Err(AppError::Config("lockout.max_attempts must be positive".into()));
        }
        if self.lockout.duration_secs == 0 {
            return Err(AppError::Config("lockout.duration_secs must be positive".into()));
        }
        if self.lockout.cleanup_interval_secs == 0 || self.revocation.prune_interval_secs == 0 {
            return Err(AppError::Config("sweep intervals must be positive".into()));
        }
        if !(1..64).contains(&self.password.hash_log_n) {
            return Err(AppError::Config("password.hash_log_n must be in 1..64".into()));
        }
        if self.password.requirements.min_length < 6 {
            return Err(AppError::Config(
                "password.requirements.min_length must be at least 6".into(),
            ));
        }
        Ok(())
    }
}
