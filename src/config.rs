//! Generation requests and generator configuration
//!
//! Request defaults are `use = sig`, `alg = RS256` and, for RSA, a
//! 4096-bit modulus. They are plain values handed to the generator.

use crate::algorithm::{Algorithm, EcCurve, KeyFamily, KeyUse};
use crate::error::KeypairError;
use serde::{Deserialize, Serialize};

/// Default RSA modulus length
pub const DEFAULT_RSA_BITS: usize = 4096;

/// Smallest RSA modulus the generator accepts
pub const MIN_RSA_BITS: usize = 2048;

/// Largest RSA modulus the generator accepts
pub const MAX_RSA_BITS: usize = 16384;

/// A single keypair request: (use, alg, size)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct KeyRequest {
    #[serde(rename = "use", default)]
    pub key_use: KeyUse,
    #[serde(default)]
    pub alg: Algorithm,
    /// Key size in bits; RSA modulus length or ECDH-ES curve strength
    #[serde(default)]
    pub size: Option<usize>,
}

impl KeyRequest {
    pub fn new(key_use: KeyUse, alg: Algorithm) -> Self {
        Self {
            key_use,
            alg,
            size: None,
        }
    }

    /// Request for `alg` with the use it requires
    pub fn for_algorithm(alg: Algorithm) -> Self {
        Self::new(alg.required_use(), alg)
    }

    pub fn with_size(mut self, bits: usize) -> Self {
        self.size = Some(bits);
        self
    }

    /// Build a request from the string surface (`use`, `alg`, `size`)
    ///
    /// The algorithm is resolved first so that an unknown identifier is
    /// reported as [`KeypairError::UnsupportedAlgorithm`] regardless of `use`.
    pub fn parse(key_use: &str, alg: &str, size: Option<usize>) -> Result<Self, KeypairError> {
        let alg: Algorithm = alg.parse()?;
        let key_use: KeyUse = key_use.parse()?;
        Ok(Self {
            key_use,
            alg,
            size,
        })
    }
}

/// Which RSA algorithms get a PEM projection in [`KeypairOutput`](crate::KeypairOutput)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PemPolicy {
    /// Every RSA-family algorithm
    #[default]
    RsaFamily,
    /// RS256 only, for consumers that expect PEM on RS256 keys alone
    Rs256Only,
}

impl PemPolicy {
    pub fn applies_to(&self, alg: Algorithm) -> bool {
        match self {
            PemPolicy::RsaFamily => alg.family() == KeyFamily::Rsa,
            PemPolicy::Rs256Only => alg == Algorithm::Rs256,
        }
    }
}

/// Generator configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeygenConfig {
    /// RSA modulus length used when a request has no size
    pub default_rsa_bits: usize,
    pub min_rsa_bits: usize,
    pub max_rsa_bits: usize,
    /// Curve for ECDH-ES algorithms when a request has no size
    pub ecdh_default_curve: EcCurve,
    pub pem_policy: PemPolicy,
}

impl Default for KeygenConfig {
    fn default() -> Self {
        Self {
            default_rsa_bits: DEFAULT_RSA_BITS,
            min_rsa_bits: MIN_RSA_BITS,
            max_rsa_bits: MAX_RSA_BITS,
            ecdh_default_curve: EcCurve::P256,
            pem_policy: PemPolicy::RsaFamily,
        }
    }
}

impl KeygenConfig {
    pub fn with_default_rsa_bits(mut self, bits: usize) -> Self {
        self.default_rsa_bits = bits;
        self
    }

    pub fn with_min_rsa_bits(mut self, bits: usize) -> Self {
        self.min_rsa_bits = bits;
        self
    }

    pub fn with_max_rsa_bits(mut self, bits: usize) -> Self {
        self.max_rsa_bits = bits;
        self
    }

    pub fn with_ecdh_default_curve(mut self, curve: EcCurve) -> Self {
        self.ecdh_default_curve = curve;
        self
    }

    pub fn with_pem_policy(mut self, policy: PemPolicy) -> Self {
        self.pem_policy = policy;
        self
    }

    /// Check that the RSA bounds can be honored
    ///
    /// `min_rsa_bits` may be raised above [`MIN_RSA_BITS`] but never lowered,
    /// and the default must lie within `[min_rsa_bits, max_rsa_bits]`.
    pub fn validate(&self) -> Result<(), KeypairError> {
        if self.min_rsa_bits < MIN_RSA_BITS {
            return Err(KeypairError::InvalidConfig(format!(
                "min_rsa_bits {} is below the {}-bit floor",
                self.min_rsa_bits, MIN_RSA_BITS
            )));
        }
        if self.default_rsa_bits < self.min_rsa_bits || self.default_rsa_bits > self.max_rsa_bits {
            return Err(KeypairError::InvalidConfig(format!(
                "default_rsa_bits {} is outside [{}, {}]",
                self.default_rsa_bits, self.min_rsa_bits, self.max_rsa_bits
            )));
        }
        Ok(())
    }

    /// Resolve the RSA modulus length for a request, enforcing the size bounds
    ///
    /// The floor never drops below [`MIN_RSA_BITS`], whatever `min_rsa_bits`
    /// says.
    pub fn rsa_bits(&self, alg: Algorithm, size: Option<usize>) -> Result<usize, KeypairError> {
        let bits = size.unwrap_or(self.default_rsa_bits);
        let floor = self.min_rsa_bits.max(MIN_RSA_BITS);
        if bits < floor {
            return Err(KeypairError::InvalidKeySize {
                alg,
                bits,
                reason: format!("RSA keys must be at least {} bits", floor),
            });
        }
        if bits > self.max_rsa_bits {
            return Err(KeypairError::InvalidKeySize {
                alg,
                bits,
                reason: format!("RSA keys must be at most {} bits", self.max_rsa_bits),
            });
        }
        Ok(bits)
    }

    /// Resolve the curve for an ECDH-ES request
    ///
    /// No size selects the configured default curve; 256, 384 and 521 select
    /// P-256, P-384 and P-521.
    pub fn ecdh_curve(&self, alg: Algorithm, size: Option<usize>) -> Result<EcCurve, KeypairError> {
        match size {
            None => Ok(self.ecdh_default_curve),
            Some(bits) => EcCurve::from_bits(bits).ok_or_else(|| KeypairError::InvalidKeySize {
                alg,
                bits,
                reason: "unknown elliptic curve bit length, expected 256, 384 or 521".to_string(),
            }),
        }
    }
}
