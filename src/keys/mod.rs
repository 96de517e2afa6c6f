//! Native key material per key family
//!
//! Each family module owns its generator and its JWK encoding. [`NativeKey`]
//! is the tagged union handed back to callers; PEM projection is defined on
//! the RSA variant only ([`RsaKeyPair::to_pkcs1_pem`]).

use crate::algorithm::KeyFamily;
use crate::error::KeypairError;
use crate::jwk::Jwk;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

pub mod ec;
pub mod okp;
pub mod rsa;

pub use self::ec::EcKeyPair;
pub use self::okp::EdKeyPair;
pub use self::rsa::RsaKeyPair;

/// JWK encoding shared by every key family
///
/// Implementations fill the key-type specific members only; `kid`, `alg`
/// and `use` are stamped by the generator.
pub trait JwkEncode {
    /// Key family of this material
    fn family(&self) -> KeyFamily;

    /// JWK holding the public members
    fn public_jwk(&self) -> Result<Jwk, KeypairError>;

    /// JWK holding the public and private members
    fn private_jwk(&self) -> Result<Jwk, KeypairError>;
}

/// PKCS#1 PEM encoding of an RSA keypair
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct PemPair {
    /// `RSA PUBLIC KEY` block
    pub public_pem: String,
    /// `RSA PRIVATE KEY` block
    pub private_pem: String,
}

impl fmt::Debug for PemPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PemPair")
            .field("public_pem", &self.public_pem)
            .finish_non_exhaustive()
    }
}

/// Native key material produced by the generator
#[derive(Debug, Clone)]
pub enum NativeKey {
    Rsa(RsaKeyPair),
    EllipticCurve(EcKeyPair),
    Edwards(EdKeyPair),
}

impl NativeKey {
    /// The RSA keypair, if this is one
    pub fn as_rsa(&self) -> Option<&RsaKeyPair> {
        match self {
            NativeKey::Rsa(rsa) => Some(rsa),
            _ => None,
        }
    }

    pub fn as_ec(&self) -> Option<&EcKeyPair> {
        match self {
            NativeKey::EllipticCurve(ec) => Some(ec),
            _ => None,
        }
    }

    pub fn as_edwards(&self) -> Option<&EdKeyPair> {
        match self {
            NativeKey::Edwards(ed) => Some(ed),
            _ => None,
        }
    }

    /// PKCS#1 PEM projection
    ///
    /// Fails with [`KeypairError::PemProjectionUnsupported`] for anything but
    /// RSA keys.
    pub fn to_pem(&self) -> Result<PemPair, KeypairError> {
        match self {
            NativeKey::Rsa(rsa) => rsa.to_pkcs1_pem(),
            other => Err(KeypairError::PemProjectionUnsupported {
                family: other.family(),
            }),
        }
    }

    fn inner(&self) -> &dyn JwkEncode {
        match self {
            NativeKey::Rsa(k) => k,
            NativeKey::EllipticCurve(k) => k,
            NativeKey::Edwards(k) => k,
        }
    }
}

impl JwkEncode for NativeKey {
    fn family(&self) -> KeyFamily {
        self.inner().family()
    }

    fn public_jwk(&self) -> Result<Jwk, KeypairError> {
        self.inner().public_jwk()
    }

    fn private_jwk(&self) -> Result<Jwk, KeypairError> {
        self.inner().private_jwk()
    }
}

impl From<RsaKeyPair> for NativeKey {
    fn from(key: RsaKeyPair) -> Self {
        NativeKey::Rsa(key)
    }
}

impl From<EcKeyPair> for NativeKey {
    fn from(key: EcKeyPair) -> Self {
        NativeKey::EllipticCurve(key)
    }
}

impl From<EdKeyPair> for NativeKey {
    fn from(key: EdKeyPair) -> Self {
        NativeKey::Edwards(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::EcCurve;

    #[test]
    fn test_pem_only_for_rsa() {
        let ec = NativeKey::from(EcKeyPair::generate(EcCurve::P256));
        assert!(matches!(
            ec.to_pem(),
            Err(KeypairError::PemProjectionUnsupported {
                family: KeyFamily::EllipticCurve
            })
        ));

        let ed = NativeKey::from(EdKeyPair::generate());
        assert!(matches!(
            ed.to_pem(),
            Err(KeypairError::PemProjectionUnsupported {
                family: KeyFamily::Edwards
            })
        ));
    }

    #[test]
    fn test_variant_accessors() {
        let ed = NativeKey::from(EdKeyPair::generate());
        assert_eq!(ed.family(), KeyFamily::Edwards);
        assert!(ed.as_edwards().is_some());
        assert!(ed.as_rsa().is_none());
        assert!(ed.as_ec().is_none());
    }

    #[test]
    fn test_public_and_private_jwk_share_public_members() {
        let key = NativeKey::from(EcKeyPair::generate(EcCurve::P384));
        let public = key.public_jwk().unwrap();
        let private = key.private_jwk().unwrap();

        assert!(!public.is_private());
        assert!(private.is_private());
        assert_eq!(public, private.to_public());
    }
}
