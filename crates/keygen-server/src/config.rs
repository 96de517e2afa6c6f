//! Server configuration from environment variables

use jose_keypair::{EcCurve, KeygenConfig, KeypairError, PemPolicy, MIN_RSA_BITS};
use std::num::ParseIntError;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

pub const TIMEOUT_VAR: &str = "JOSE_KEYPAIR_TIMEOUT_SECS";
pub const DEFAULT_RSA_BITS_VAR: &str = "JOSE_KEYPAIR_DEFAULT_RSA_BITS";
pub const MIN_RSA_BITS_VAR: &str = "JOSE_KEYPAIR_MIN_RSA_BITS";
pub const PEM_POLICY_VAR: &str = "JOSE_KEYPAIR_PEM_POLICY";
pub const ECDH_CURVE_VAR: &str = "JOSE_KEYPAIR_ECDH_CURVE";

/// Upper bound on a single generation; RSA has no internal cancellation point
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {var}: {reason}")]
    InvalidValue { var: &'static str, reason: String },

    /// Values parse individually but cannot be used together
    #[error("{0}")]
    Keygen(#[from] KeypairError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServerConfig {
    pub keygen: KeygenConfig,
    pub timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            keygen: KeygenConfig::default(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable source; unset variables keep defaults
    ///
    /// The resulting RSA bounds are validated, so a server never starts with
    /// a default size it would refuse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = ServerConfig::default();

        if let Some(secs) = lookup(TIMEOUT_VAR) {
            config.timeout = Duration::from_secs(parse_number(TIMEOUT_VAR, &secs)?);
        }
        if let Some(bits) = lookup(DEFAULT_RSA_BITS_VAR) {
            config.keygen = config
                .keygen
                .with_default_rsa_bits(parse_number(DEFAULT_RSA_BITS_VAR, &bits)?);
        }
        if let Some(bits) = lookup(MIN_RSA_BITS_VAR) {
            let min: usize = parse_number(MIN_RSA_BITS_VAR, &bits)?;
            if min < MIN_RSA_BITS {
                return Err(ConfigError::InvalidValue {
                    var: MIN_RSA_BITS_VAR,
                    reason: format!("must be at least {}", MIN_RSA_BITS),
                });
            }
            config.keygen = config.keygen.with_min_rsa_bits(min);
        }
        if let Some(policy) = lookup(PEM_POLICY_VAR) {
            config.keygen = config
                .keygen
                .with_pem_policy(parse_named::<PemPolicy>(PEM_POLICY_VAR, &policy)?);
        }
        if let Some(curve) = lookup(ECDH_CURVE_VAR) {
            config.keygen = config
                .keygen
                .with_ecdh_default_curve(parse_named::<EcCurve>(ECDH_CURVE_VAR, &curve)?);
        }

        config.keygen.validate()?;
        Ok(config)
    }
}

fn parse_number<T>(var: &'static str, value: &str) -> Result<T, ConfigError>
where
    T: FromStr<Err = ParseIntError>,
{
    value.trim().parse().map_err(|e: ParseIntError| ConfigError::InvalidValue {
        var,
        reason: e.to_string(),
    })
}

/// Parse a value through its serde string name (`rs256-only`, `P-384`, ...)
fn parse_named<T: serde::de::DeserializeOwned>(
    var: &'static str,
    value: &str,
) -> Result<T, ConfigError> {
    serde_json::from_value(serde_json::Value::String(value.trim().to_string())).map_err(|e| {
        ConfigError::InvalidValue {
            var,
            reason: e.to_string(),
        }
    })
}
