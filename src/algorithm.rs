//! JOSE algorithm identifiers, key uses and key families
//!
//! The set of algorithms is closed: anything not listed in [`Algorithm::ALL`]
//! is rejected with [`KeypairError::UnsupportedAlgorithm`].

use crate::error::KeypairError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Public key use (`use` JWK member)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyUse {
    /// Signature (JWS)
    #[default]
    Sig,
    /// Encryption / key management (JWE)
    Enc,
}

impl KeyUse {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyUse::Sig => "sig",
            KeyUse::Enc => "enc",
        }
    }
}

impl fmt::Display for KeyUse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for KeyUse {
    type Err = KeypairError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "sig" => Ok(KeyUse::Sig),
            "enc" => Ok(KeyUse::Enc),
            other => Err(KeypairError::InvalidUse {
                requested: other.to_string(),
                reason: "expected one of [enc sig]".to_string(),
            }),
        }
    }
}

/// Underlying cryptographic primitive class of a key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyFamily {
    Rsa,
    EllipticCurve,
    Edwards,
}

impl KeyFamily {
    /// JWK `kty` value for keys of this family
    pub fn kty(&self) -> &'static str {
        match self {
            KeyFamily::Rsa => "RSA",
            KeyFamily::EllipticCurve => "EC",
            KeyFamily::Edwards => "OKP",
        }
    }
}

impl fmt::Display for KeyFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            KeyFamily::Rsa => "RSA",
            KeyFamily::EllipticCurve => "elliptic curve",
            KeyFamily::Edwards => "Edwards curve",
        })
    }
}

/// NIST curves used for EC keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EcCurve {
    /// NIST P-256 (secp256r1)
    #[default]
    #[serde(rename = "P-256")]
    P256,
    /// NIST P-384 (secp384r1)
    #[serde(rename = "P-384")]
    P384,
    /// NIST P-521 (secp521r1)
    #[serde(rename = "P-521")]
    P521,
}

impl EcCurve {
    /// JWK `crv` value
    pub fn jwk_name(&self) -> &'static str {
        match self {
            EcCurve::P256 => "P-256",
            EcCurve::P384 => "P-384",
            EcCurve::P521 => "P-521",
        }
    }

    /// Curve strength in bits, as used by the `size` request parameter
    pub fn bits(&self) -> usize {
        match self {
            EcCurve::P256 => 256,
            EcCurve::P384 => 384,
            EcCurve::P521 => 521,
        }
    }

    /// Length in bytes of a coordinate or private scalar
    pub fn field_len(&self) -> usize {
        match self {
            EcCurve::P256 => 32,
            EcCurve::P384 => 48,
            EcCurve::P521 => 66,
        }
    }

    pub fn from_bits(bits: usize) -> Option<Self> {
        match bits {
            256 => Some(EcCurve::P256),
            384 => Some(EcCurve::P384),
            521 => Some(EcCurve::P521),
            _ => None,
        }
    }
}

impl fmt::Display for EcCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.jwk_name())
    }
}

/// Supported JOSE algorithm identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Algorithm {
    #[serde(rename = "EdDSA")]
    EdDsa,
    #[serde(rename = "ES256")]
    Es256,
    #[serde(rename = "ES384")]
    Es384,
    #[serde(rename = "ES512")]
    Es512,
    #[default]
    #[serde(rename = "RS256")]
    Rs256,
    #[serde(rename = "RS384")]
    Rs384,
    #[serde(rename = "RS512")]
    Rs512,
    #[serde(rename = "PS256")]
    Ps256,
    #[serde(rename = "PS384")]
    Ps384,
    #[serde(rename = "PS512")]
    Ps512,
    #[serde(rename = "RSA1_5")]
    Rsa1_5,
    #[serde(rename = "RSA-OAEP")]
    RsaOaep,
    #[serde(rename = "RSA-OAEP-256")]
    RsaOaep256,
    #[serde(rename = "ECDH-ES")]
    EcdhEs,
    #[serde(rename = "ECDH-ES+A128KW")]
    EcdhEsA128Kw,
    #[serde(rename = "ECDH-ES+A192KW")]
    EcdhEsA192Kw,
    #[serde(rename = "ECDH-ES+A256KW")]
    EcdhEsA256Kw,
}

impl Algorithm {
    /// Every supported algorithm, signature algorithms first
    pub const ALL: [Algorithm; 17] = [
        Algorithm::EdDsa,
        Algorithm::Es256,
        Algorithm::Es384,
        Algorithm::Es512,
        Algorithm::Rs256,
        Algorithm::Rs384,
        Algorithm::Rs512,
        Algorithm::Ps256,
        Algorithm::Ps384,
        Algorithm::Ps512,
        Algorithm::Rsa1_5,
        Algorithm::RsaOaep,
        Algorithm::RsaOaep256,
        Algorithm::EcdhEs,
        Algorithm::EcdhEsA128Kw,
        Algorithm::EcdhEsA192Kw,
        Algorithm::EcdhEsA256Kw,
    ];

    /// JOSE identifier (`alg` JWK member)
    pub fn as_str(&self) -> &'static str {
        match self {
            Algorithm::EdDsa => "EdDSA",
            Algorithm::Es256 => "ES256",
            Algorithm::Es384 => "ES384",
            Algorithm::Es512 => "ES512",
            Algorithm::Rs256 => "RS256",
            Algorithm::Rs384 => "RS384",
            Algorithm::Rs512 => "RS512",
            Algorithm::Ps256 => "PS256",
            Algorithm::Ps384 => "PS384",
            Algorithm::Ps512 => "PS512",
            Algorithm::Rsa1_5 => "RSA1_5",
            Algorithm::RsaOaep => "RSA-OAEP",
            Algorithm::RsaOaep256 => "RSA-OAEP-256",
            Algorithm::EcdhEs => "ECDH-ES",
            Algorithm::EcdhEsA128Kw => "ECDH-ES+A128KW",
            Algorithm::EcdhEsA192Kw => "ECDH-ES+A192KW",
            Algorithm::EcdhEsA256Kw => "ECDH-ES+A256KW",
        }
    }

    /// The only key use this algorithm may be generated for
    pub fn required_use(&self) -> KeyUse {
        match self {
            Algorithm::EdDsa
            | Algorithm::Es256
            | Algorithm::Es384
            | Algorithm::Es512
            | Algorithm::Rs256
            | Algorithm::Rs384
            | Algorithm::Rs512
            | Algorithm::Ps256
            | Algorithm::Ps384
            | Algorithm::Ps512 => KeyUse::Sig,
            Algorithm::Rsa1_5
            | Algorithm::RsaOaep
            | Algorithm::RsaOaep256
            | Algorithm::EcdhEs
            | Algorithm::EcdhEsA128Kw
            | Algorithm::EcdhEsA192Kw
            | Algorithm::EcdhEsA256Kw => KeyUse::Enc,
        }
    }

    pub fn family(&self) -> KeyFamily {
        match self {
            Algorithm::EdDsa => KeyFamily::Edwards,
            Algorithm::Es256
            | Algorithm::Es384
            | Algorithm::Es512
            | Algorithm::EcdhEs
            | Algorithm::EcdhEsA128Kw
            | Algorithm::EcdhEsA192Kw
            | Algorithm::EcdhEsA256Kw => KeyFamily::EllipticCurve,
            Algorithm::Rs256
            | Algorithm::Rs384
            | Algorithm::Rs512
            | Algorithm::Ps256
            | Algorithm::Ps384
            | Algorithm::Ps512
            | Algorithm::Rsa1_5
            | Algorithm::RsaOaep
            | Algorithm::RsaOaep256 => KeyFamily::Rsa,
        }
    }

    /// Curve fixed by the identifier itself (ES family only)
    ///
    /// ECDH-ES identifiers do not encode a curve; see
    /// [`KeygenConfig::ecdh_curve`](crate::KeygenConfig::ecdh_curve).
    pub fn mandated_curve(&self) -> Option<EcCurve> {
        match self {
            Algorithm::Es256 => Some(EcCurve::P256),
            Algorithm::Es384 => Some(EcCurve::P384),
            Algorithm::Es512 => Some(EcCurve::P521),
            _ => None,
        }
    }

    pub fn is_ecdh(&self) -> bool {
        matches!(
            self,
            Algorithm::EcdhEs
                | Algorithm::EcdhEsA128Kw
                | Algorithm::EcdhEsA192Kw
                | Algorithm::EcdhEsA256Kw
        )
    }

    /// Check that `key_use` is the use this algorithm requires
    pub fn check_use(&self, key_use: KeyUse) -> Result<(), KeypairError> {
        let required = self.required_use();
        if key_use == required {
            Ok(())
        } else {
            Err(KeypairError::InvalidUse {
                requested: key_use.to_string(),
                reason: format!("algorithm {} requires use '{}'", self, required),
            })
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Algorithm {
    type Err = KeypairError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Algorithm::ALL
            .iter()
            .copied()
            .find(|alg| alg.as_str() == s)
            .ok_or_else(|| KeypairError::UnsupportedAlgorithm(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_every_identifier() {
        for alg in Algorithm::ALL {
            let parsed: Algorithm = alg.as_str().parse().unwrap();
            assert_eq!(parsed, alg);
        }
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!(matches!(
            "rs256".parse::<Algorithm>(),
            Err(KeypairError::UnsupportedAlgorithm(s)) if s == "rs256"
        ));
        assert!("HS256".parse::<Algorithm>().is_err());
    }

    #[test]
    fn test_families_and_uses() {
        assert_eq!(Algorithm::EdDsa.family(), KeyFamily::Edwards);
        assert_eq!(Algorithm::Es384.family(), KeyFamily::EllipticCurve);
        assert_eq!(Algorithm::EcdhEsA192Kw.family(), KeyFamily::EllipticCurve);
        assert_eq!(Algorithm::Rsa1_5.family(), KeyFamily::Rsa);
        assert_eq!(Algorithm::Ps512.required_use(), KeyUse::Sig);
        assert_eq!(Algorithm::RsaOaep256.required_use(), KeyUse::Enc);

        let sig_count = Algorithm::ALL
            .iter()
            .filter(|a| a.required_use() == KeyUse::Sig)
            .count();
        assert_eq!(sig_count, 10);
    }

    #[test]
    fn test_mandated_curves() {
        assert_eq!(Algorithm::Es256.mandated_curve(), Some(EcCurve::P256));
        assert_eq!(Algorithm::Es384.mandated_curve(), Some(EcCurve::P384));
        assert_eq!(Algorithm::Es512.mandated_curve(), Some(EcCurve::P521));
        assert_eq!(Algorithm::EcdhEs.mandated_curve(), None);
        assert_eq!(Algorithm::Rs256.mandated_curve(), None);
    }

    #[test]
    fn test_check_use() {
        assert!(Algorithm::Es256.check_use(KeyUse::Sig).is_ok());
        let err = Algorithm::Es256.check_use(KeyUse::Enc).unwrap_err();
        assert!(matches!(err, KeypairError::InvalidUse { ref requested, .. } if requested == "enc"));
    }

    #[test]
    fn test_key_use_parse() {
        assert_eq!("sig".parse::<KeyUse>().unwrap(), KeyUse::Sig);
        assert_eq!("enc".parse::<KeyUse>().unwrap(), KeyUse::Enc);
        assert!(matches!(
            "verify".parse::<KeyUse>(),
            Err(KeypairError::InvalidUse { .. })
        ));
    }

    #[test]
    fn test_serde_names_match_jose_identifiers() {
        let json = serde_json::to_string(&Algorithm::EcdhEsA128Kw).unwrap();
        assert_eq!(json, "\"ECDH-ES+A128KW\"");
        let alg: Algorithm = serde_json::from_str("\"RSA-OAEP-256\"").unwrap();
        assert_eq!(alg, Algorithm::RsaOaep256);
        let curve: EcCurve = serde_json::from_str("\"P-521\"").unwrap();
        assert_eq!(curve, EcCurve::P521);
    }

    #[test]
    fn test_curve_from_bits() {
        assert_eq!(EcCurve::from_bits(384), Some(EcCurve::P384));
        assert_eq!(EcCurve::from_bits(512), None);
        assert_eq!(EcCurve::P521.field_len(), 66);
    }
}
