//! Keypair generation and encoding engine
//!
//! Dispatch goes by key family:
//!
//! | Family | Algorithms | Size |
//! |---|---|---|
//! | Edwards | EdDSA | ignored (Ed25519) |
//! | EC | ES256/ES384/ES512 | ignored, curve fixed by the identifier |
//! | EC | ECDH-ES, ECDH-ES+A*KW | selects the curve, default P-256 |
//! | RSA | RS*, PS*, RSA1_5, RSA-OAEP* | modulus length, default 4096 |
//!
//! Both JWKs are stamped with `alg`, `use` and a `kid` equal to the RFC 7638
//! thumbprint of the public key.
//!
//! # Example
//!
//! ```
//! use jose_keypair::{Algorithm, KeyGenerator, KeyRequest, KeygenConfig};
//!
//! # fn example() -> Result<(), jose_keypair::KeypairError> {
//! let generator = KeyGenerator::new(KeygenConfig::default());
//! let keypair = generator.generate(&KeyRequest::for_algorithm(Algorithm::Es256))?;
//!
//! assert_eq!(keypair.public_jwk().crv.as_deref(), Some("P-256"));
//! assert_eq!(keypair.public_jwk().kid.as_deref(), Some(keypair.key_id()));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

use crate::algorithm::{Algorithm, KeyFamily, KeyUse};
use crate::config::{KeyRequest, KeygenConfig, PemPolicy};
use crate::error::KeypairError;
use crate::jwk::Jwk;
use crate::keys::{EcKeyPair, EdKeyPair, JwkEncode, NativeKey, PemPair, RsaKeyPair};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Generate a keypair with the default configuration
pub fn generate(request: &KeyRequest) -> Result<GeneratedKeypair, KeypairError> {
    KeyGenerator::default().generate(request)
}

/// Stateless keypair generator
///
/// Holds only its configuration, so a single instance can be shared freely
/// between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeyGenerator {
    config: KeygenConfig,
}

impl KeyGenerator {
    pub fn new(config: KeygenConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &KeygenConfig {
        &self.config
    }

    /// Validate the request, generate fresh key material and encode it
    pub fn generate(&self, request: &KeyRequest) -> Result<GeneratedKeypair, KeypairError> {
        let alg = request.alg;
        alg.check_use(request.key_use)?;

        let native = self.generate_native(alg, request.size)?;
        let keypair = GeneratedKeypair::encode(native, request.key_use, alg)?;

        debug!(alg = %alg, kid = %keypair.key_id(), "generated keypair");
        Ok(keypair)
    }

    /// Generate and render the string output surface, PEM included per
    /// the configured [`PemPolicy`]
    pub fn generate_output(&self, request: &KeyRequest) -> Result<KeypairOutput, KeypairError> {
        self.generate(request)?.to_output(self.config.pem_policy)
    }

    fn generate_native(&self, alg: Algorithm, size: Option<usize>) -> Result<NativeKey, KeypairError> {
        match alg.family() {
            KeyFamily::Edwards => {
                debug!(alg = %alg, "generating Ed25519 keypair");
                Ok(EdKeyPair::generate().into())
            }
            KeyFamily::EllipticCurve => {
                let curve = match alg.mandated_curve() {
                    Some(curve) => curve,
                    None => self.config.ecdh_curve(alg, size)?,
                };
                debug!(alg = %alg, curve = %curve, "generating EC keypair");
                Ok(EcKeyPair::generate(curve).into())
            }
            KeyFamily::Rsa => {
                let bits = self.config.rsa_bits(alg, size).map_err(|e| {
                    warn!(alg = %alg, error = %e, "refusing RSA key size");
                    e
                })?;
                debug!(alg = %alg, bits, "generating RSA keypair");
                let keypair = RsaKeyPair::generate(bits).map_err(|e| KeypairError::GenerationFailed {
                    alg,
                    source: Box::new(e),
                })?;
                Ok(keypair.into())
            }
        }
    }
}

/// A freshly generated keypair in JWK and native form
#[derive(Debug, Clone)]
pub struct GeneratedKeypair {
    key_use: KeyUse,
    alg: Algorithm,
    public_jwk: Jwk,
    private_jwk: Jwk,
    native: NativeKey,
    key_id: String,
}

impl GeneratedKeypair {
    /// Encode existing key material for `alg`
    ///
    /// The key family (and, for ES algorithms, the curve) must match the
    /// algorithm. Identical material always produces an identical result.
    pub fn from_native(
        native: NativeKey,
        key_use: KeyUse,
        alg: Algorithm,
    ) -> Result<Self, KeypairError> {
        alg.check_use(key_use)?;

        if native.family() != alg.family() {
            return Err(KeypairError::EncodingFailed(format!(
                "{} key cannot be encoded for {}",
                native.family(),
                alg
            )));
        }
        if let (Some(required), Some(ec)) = (alg.mandated_curve(), native.as_ec()) {
            if ec.curve() != required {
                return Err(KeypairError::EncodingFailed(format!(
                    "{} requires a {} key, got {}",
                    alg,
                    required,
                    ec.curve()
                )));
            }
        }

        Self::encode(native, key_use, alg)
    }

    fn encode(native: NativeKey, key_use: KeyUse, alg: Algorithm) -> Result<Self, KeypairError> {
        let mut public_jwk = native.public_jwk()?;
        let mut private_jwk = native.private_jwk()?;
        let key_id = public_jwk.thumbprint()?;

        for jwk in [&mut public_jwk, &mut private_jwk] {
            jwk.kid = Some(key_id.clone());
            jwk.alg = Some(alg);
            jwk.key_use = Some(key_use);
        }

        Ok(Self {
            key_use,
            alg,
            public_jwk,
            private_jwk,
            native,
            key_id,
        })
    }

    pub fn key_use(&self) -> KeyUse {
        self.key_use
    }

    pub fn alg(&self) -> Algorithm {
        self.alg
    }

    pub fn family(&self) -> KeyFamily {
        self.alg.family()
    }

    pub fn public_jwk(&self) -> &Jwk {
        &self.public_jwk
    }

    pub fn private_jwk(&self) -> &Jwk {
        &self.private_jwk
    }

    /// RFC 7638 thumbprint of the public key
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    pub fn native(&self) -> &NativeKey {
        &self.native
    }

    pub fn into_native(self) -> NativeKey {
        self.native
    }

    /// PKCS#1 PEM projection; RSA keys only
    pub fn to_pem(&self) -> Result<PemPair, KeypairError> {
        self.native.to_pem()
    }

    /// Render the string output surface
    pub fn to_output(&self, pem_policy: PemPolicy) -> Result<KeypairOutput, KeypairError> {
        let (public_key_pem, private_key_pem) = if pem_policy.applies_to(self.alg) {
            let pem = self.to_pem()?;
            (Some(pem.public_pem.clone()), Some(pem.private_pem.clone()))
        } else {
            (None, None)
        };

        Ok(KeypairOutput {
            public_key: self.public_jwk.to_json()?,
            private_key: self.private_jwk.to_json()?,
            public_key_pem,
            private_key_pem,
            id: self.key_id.clone(),
        })
    }
}

/// String form of a generated keypair
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct KeypairOutput {
    /// Public JWK as JSON
    pub public_key: String,
    /// Private JWK as JSON
    pub private_key: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub public_key_pem: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub private_key_pem: Option<String>,
    /// Key id (`kid`)
    pub id: String,
}

impl fmt::Debug for KeypairOutput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeypairOutput")
            .field("id", &self.id)
            .field("public_key", &self.public_key)
            .field("public_key_pem", &self.public_key_pem)
            .finish_non_exhaustive()
    }
}
