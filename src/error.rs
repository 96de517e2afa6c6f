//! Unified error type for keypair generation
//!
//! Every failure is returned to the immediate caller; the engine never hands
//! back partial output next to an error.
//!
//! # Example
//!
//! ```
//! use jose_keypair::{KeyRequest, KeypairError};
//!
//! let err = KeyRequest::parse("sig", "NOT_A_REAL_ALG", None).unwrap_err();
//! assert!(matches!(err, KeypairError::UnsupportedAlgorithm(_)));
//! assert!(err.is_validation_error());
//! ```

use crate::algorithm::{Algorithm, KeyFamily};
use thiserror::Error;

/// Boxed cause carried by [`KeypairError::GenerationFailed`]
pub type BoxedCause = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors produced while generating or encoding a keypair
///
/// # Error Categories
///
/// - **Validation**: unsupported algorithm, use/algorithm mismatch, key size
///   outside policy
/// - **Generation**: the native key generator failed
/// - **Encoding**: JWK or PEM serialization failed, or PEM was requested for
///   a key family that has no PEM projection
/// - **Configuration**: generator bounds that can never be honored
#[derive(Debug, Error)]
pub enum KeypairError {
    /// Algorithm identifier is not one of the supported JOSE algorithms
    #[error("Unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Requested key use is unknown or inconsistent with the algorithm
    #[error("Invalid key use '{requested}': {reason}")]
    InvalidUse { requested: String, reason: String },

    /// Key size is not acceptable for the algorithm
    #[error("Invalid key size {bits} for {alg}: {reason}")]
    InvalidKeySize {
        alg: Algorithm,
        bits: usize,
        reason: String,
    },

    /// Native key generation failed
    #[error("Key generation failed for {alg}: {source}")]
    GenerationFailed {
        alg: Algorithm,
        #[source]
        source: BoxedCause,
    },

    /// JWK or PEM serialization failed
    #[error("Encoding failed: {0}")]
    EncodingFailed(String),

    /// PEM projection is only defined for RSA keys
    #[error("PEM projection is not supported for {family} keys")]
    PemProjectionUnsupported { family: KeyFamily },

    /// Generator configuration is inconsistent or below the RSA floor
    #[error("Invalid generator configuration: {0}")]
    InvalidConfig(String),
}

impl KeypairError {
    /// Returns true if repeating the same request may succeed
    ///
    /// Only native generation failures qualify: every call draws fresh
    /// randomness and has no side effects to undo. Validation errors will
    /// fail identically on every attempt.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::GenerationFailed { .. })
    }

    /// Returns true if the request itself was rejected before any key material
    /// was generated
    pub fn is_validation_error(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedAlgorithm(_) | Self::InvalidUse { .. } | Self::InvalidKeySize { .. }
        )
    }

    /// Returns a suggestion for resolving this error
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::UnsupportedAlgorithm(_) => Some(
                "Use one of EdDSA, ES256, ES384, ES512, RS256, RS384, RS512, PS256, PS384, \
                 PS512 for 'sig' or RSA1_5, RSA-OAEP, RSA-OAEP-256, ECDH-ES, ECDH-ES+A128KW, \
                 ECDH-ES+A192KW, ECDH-ES+A256KW for 'enc'",
            ),
            Self::InvalidUse { .. } => {
                Some("Signature algorithms require use 'sig', key management algorithms 'enc'")
            }
            Self::InvalidKeySize { alg, .. } if alg.family() == KeyFamily::Rsa => {
                Some("RSA keys must be between 2048 and 16384 bits")
            }
            Self::InvalidKeySize { .. } => Some("ECDH-ES key sizes are 256, 384 or 521"),
            Self::GenerationFailed { .. } => Some("Retry the request; generation is side-effect free"),
            Self::PemProjectionUnsupported { .. } => {
                Some("Only RSA keys are exported as PEM; use the JWK form for EC and OKP keys")
            }
            Self::InvalidConfig(_) => Some(
                "RSA bounds must satisfy 2048 <= min_rsa_bits <= default_rsa_bits <= max_rsa_bits",
            ),
            Self::EncodingFailed(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_categories() {
        let unsupported = KeypairError::UnsupportedAlgorithm("HS256".to_string());
        assert!(unsupported.is_validation_error());
        assert!(!unsupported.is_retryable());

        let failed = KeypairError::GenerationFailed {
            alg: Algorithm::Rs256,
            source: "entropy source unavailable".into(),
        };
        assert!(failed.is_retryable());
        assert!(!failed.is_validation_error());

        let pem = KeypairError::PemProjectionUnsupported {
            family: KeyFamily::Edwards,
        };
        assert!(!pem.is_validation_error());
        assert!(pem.suggestion().is_some());

        let config = KeypairError::InvalidConfig("min_rsa_bits 512".to_string());
        assert!(!config.is_validation_error());
        assert!(!config.is_retryable());
        assert!(config.suggestion().unwrap().contains("2048"));
    }

    #[test]
    fn test_generation_failed_keeps_source() {
        use std::error::Error as _;

        let err = KeypairError::GenerationFailed {
            alg: Algorithm::RsaOaep,
            source: "boom".into(),
        };
        assert_eq!(err.source().map(|s| s.to_string()), Some("boom".to_string()));
        assert!(err.to_string().contains("RSA-OAEP"));
    }

    #[test]
    fn test_key_size_suggestion_depends_on_family() {
        let rsa = KeypairError::InvalidKeySize {
            alg: Algorithm::Ps256,
            bits: 1024,
            reason: "too small".to_string(),
        };
        assert!(rsa.suggestion().unwrap().contains("2048"));

        let ecdh = KeypairError::InvalidKeySize {
            alg: Algorithm::EcdhEs,
            bits: 128,
            reason: "no such curve".to_string(),
        };
        assert!(ecdh.suggestion().unwrap().contains("521"));
    }
}
