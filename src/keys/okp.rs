//! Edwards curve keypairs (EdDSA over Ed25519)

use super::JwkEncode;
use crate::algorithm::KeyFamily;
use crate::error::KeypairError;
use crate::jwk::{b64url, Jwk};
use ed25519_dalek::{SigningKey, VerifyingKey};
use rand::rngs::OsRng;
use std::fmt;
use zeroize::Zeroizing;

/// JWK `crv` for Ed25519 keys (RFC 8037)
pub const ED25519_CRV: &str = "Ed25519";

#[derive(Clone)]
pub struct EdKeyPair {
    signing_key: SigningKey,
}

impl EdKeyPair {
    pub fn generate() -> Self {
        Self {
            signing_key: SigningKey::generate(&mut OsRng),
        }
    }

    /// Create from a 32-byte Ed25519 seed (the JWK `d` member)
    pub fn from_seed(seed: &[u8; 32]) -> Self {
        Self {
            signing_key: SigningKey::from_bytes(seed),
        }
    }

    pub fn signing_key(&self) -> &SigningKey {
        &self.signing_key
    }

    pub fn verifying_key(&self) -> VerifyingKey {
        self.signing_key.verifying_key()
    }
}

impl JwkEncode for EdKeyPair {
    fn family(&self) -> KeyFamily {
        KeyFamily::Edwards
    }

    fn public_jwk(&self) -> Result<Jwk, KeypairError> {
        let mut jwk = Jwk::new(KeyFamily::Edwards.kty());
        jwk.crv = Some(ED25519_CRV.to_string());
        jwk.x = Some(b64url(self.verifying_key().as_bytes()));
        Ok(jwk)
    }

    fn private_jwk(&self) -> Result<Jwk, KeypairError> {
        let seed = Zeroizing::new(self.signing_key.to_bytes());
        let mut jwk = self.public_jwk()?;
        jwk.d = Some(b64url(seed.as_slice()));
        Ok(jwk)
    }
}

impl fmt::Debug for EdKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EdKeyPair")
            .field("verifying_key", &self.verifying_key())
            .finish_non_exhaustive()
    }
}
