//! NIST elliptic curve keypairs (ES*, ECDH-ES*)

use super::JwkEncode;
use crate::algorithm::{EcCurve, KeyFamily};
use crate::error::KeypairError;
use crate::jwk::{b64url, Jwk};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use rand::rngs::OsRng;
use std::fmt;
use zeroize::Zeroizing;

/// EC private key on one of the supported curves
///
/// The public key is derived from the secret scalar on demand.
#[derive(Clone)]
pub enum EcKeyPair {
    P256(p256::SecretKey),
    P384(p384::SecretKey),
    P521(p521::SecretKey),
}

impl EcKeyPair {
    /// Generate a new random keypair on `curve`
    pub fn generate(curve: EcCurve) -> Self {
        match curve {
            EcCurve::P256 => EcKeyPair::P256(p256::SecretKey::random(&mut OsRng)),
            EcCurve::P384 => EcKeyPair::P384(p384::SecretKey::random(&mut OsRng)),
            EcCurve::P521 => EcKeyPair::P521(p521::SecretKey::random(&mut OsRng)),
        }
    }

    /// Create from a big-endian secret scalar of the curve's field length
    pub fn from_secret_bytes(curve: EcCurve, bytes: &[u8]) -> Result<Self, KeypairError> {
        let invalid = |e: p256::elliptic_curve::Error| {
            KeypairError::EncodingFailed(format!("invalid {} scalar: {}", curve, e))
        };

        if bytes.len() != curve.field_len() {
            return Err(KeypairError::EncodingFailed(format!(
                "{} scalar must be {} bytes, got {}",
                curve,
                curve.field_len(),
                bytes.len()
            )));
        }

        let keypair = match curve {
            EcCurve::P256 => p256::SecretKey::from_slice(bytes).map(EcKeyPair::P256),
            EcCurve::P384 => p384::SecretKey::from_slice(bytes).map(EcKeyPair::P384),
            EcCurve::P521 => p521::SecretKey::from_slice(bytes).map(EcKeyPair::P521),
        };
        keypair.map_err(invalid)
    }

    pub fn curve(&self) -> EcCurve {
        match self {
            EcKeyPair::P256(_) => EcCurve::P256,
            EcKeyPair::P384(_) => EcCurve::P384,
            EcKeyPair::P521(_) => EcCurve::P521,
        }
    }

    /// Uncompressed SEC1 encoding of the public point (`0x04 || x || y`)
    pub fn public_key_sec1(&self) -> Vec<u8> {
        match self {
            EcKeyPair::P256(sk) => sk.public_key().to_encoded_point(false).as_bytes().to_vec(),
            EcKeyPair::P384(sk) => sk.public_key().to_encoded_point(false).as_bytes().to_vec(),
            EcKeyPair::P521(sk) => sk.public_key().to_encoded_point(false).as_bytes().to_vec(),
        }
    }

    /// Big-endian secret scalar, padded to the field length
    pub fn secret_bytes(&self) -> Zeroizing<Vec<u8>> {
        Zeroizing::new(match self {
            EcKeyPair::P256(sk) => sk.to_bytes().to_vec(),
            EcKeyPair::P384(sk) => sk.to_bytes().to_vec(),
            EcKeyPair::P521(sk) => sk.to_bytes().to_vec(),
        })
    }
}

impl JwkEncode for EcKeyPair {
    fn family(&self) -> KeyFamily {
        KeyFamily::EllipticCurve
    }

    fn public_jwk(&self) -> Result<Jwk, KeypairError> {
        let curve = self.curve();
        let len = curve.field_len();
        let point = self.public_key_sec1();

        if point.len() != 1 + 2 * len || point[0] != 0x04 {
            return Err(KeypairError::EncodingFailed(format!(
                "unexpected {} point encoding ({} bytes)",
                curve,
                point.len()
            )));
        }
        let (x, y) = point[1..].split_at(len);

        let mut jwk = Jwk::new(KeyFamily::EllipticCurve.kty());
        jwk.crv = Some(curve.jwk_name().to_string());
        jwk.x = Some(b64url(x));
        jwk.y = Some(b64url(y));
        Ok(jwk)
    }

    fn private_jwk(&self) -> Result<Jwk, KeypairError> {
        let mut jwk = self.public_jwk()?;
        jwk.d = Some(b64url(&self.secret_bytes()));
        Ok(jwk)
    }
}

impl fmt::Debug for EcKeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EcKeyPair")
            .field("curve", &self.curve())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jwk::decode_member;

    #[test]
    fn test_coordinates_are_fixed_length() {
        for curve in [EcCurve::P256, EcCurve::P384, EcCurve::P521] {
            let keypair = EcKeyPair::generate(curve);
            let jwk = keypair.private_jwk().unwrap();

            assert_eq!(jwk.kty, "EC");
            assert_eq!(jwk.crv.as_deref(), Some(curve.jwk_name()));
            for member in [&jwk.x, &jwk.y, &jwk.d] {
                let bytes = decode_member(member.as_deref().unwrap()).unwrap();
                assert_eq!(bytes.len(), curve.field_len(), "{} member length", curve);
            }
        }
    }

    #[test]
    fn test_from_secret_bytes_round_trip() {
        let original = EcKeyPair::generate(EcCurve::P384);
        let restored =
            EcKeyPair::from_secret_bytes(EcCurve::P384, &original.secret_bytes()).unwrap();

        assert_eq!(restored.curve(), EcCurve::P384);
        assert_eq!(restored.public_key_sec1(), original.public_key_sec1());
        assert_eq!(
            restored.public_jwk().unwrap(),
            original.public_jwk().unwrap()
        );
    }

    #[test]
    fn test_from_secret_bytes_rejects_wrong_length() {
        let result = EcKeyPair::from_secret_bytes(EcCurve::P521, &[1u8; 32]);
        assert!(matches!(result, Err(KeypairError::EncodingFailed(_))));
    }

    #[test]
    fn test_from_secret_bytes_rejects_zero_scalar() {
        let result = EcKeyPair::from_secret_bytes(EcCurve::P256, &[0u8; 32]);
        assert!(result.is_err());
    }

    #[test]
    fn test_independent_keys_differ() {
        let a = EcKeyPair::generate(EcCurve::P256);
        let b = EcKeyPair::generate(EcCurve::P256);
        assert_ne!(a.public_key_sec1(), b.public_key_sec1());
    }
}
