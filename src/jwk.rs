//! JSON Web Key representation
//!
//! Members follow RFC 7517 (common), RFC 7518 (RSA and EC parameters) and
//! RFC 8037 (OKP). Binary members are base64url without padding. Private
//! members are cleared from memory when a `Jwk` is dropped.

use crate::algorithm::{Algorithm, KeyUse};
use crate::error::KeypairError;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD as BASE64URL, Engine as _};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Encode bytes as an unpadded base64url JWK member
pub(crate) fn b64url(bytes: &[u8]) -> String {
    BASE64URL.encode(bytes)
}

/// Decode an unpadded base64url JWK member
pub fn decode_member(value: &str) -> Result<Vec<u8>, KeypairError> {
    BASE64URL
        .decode(value)
        .map_err(|e| KeypairError::EncodingFailed(format!("invalid base64url member: {}", e)))
}

/// A JSON Web Key
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, Zeroize, ZeroizeOnDrop)]
pub struct Jwk {
    /// Key type: `RSA`, `EC` or `OKP`
    pub kty: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    #[zeroize(skip)]
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub key_use: Option<KeyUse>,
    #[zeroize(skip)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alg: Option<Algorithm>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crv: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
    /// RSA modulus
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,
    /// RSA public exponent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,
    /// Private exponent (RSA) or private scalar/seed (EC, OKP)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dq: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qi: Option<String>,
}

impl Jwk {
    /// Create an empty key of the given `kty`
    pub fn new(kty: &str) -> Self {
        Jwk {
            kty: kty.to_string(),
            kid: None,
            key_use: None,
            alg: None,
            crv: None,
            x: None,
            y: None,
            n: None,
            e: None,
            d: None,
            p: None,
            q: None,
            dp: None,
            dq: None,
            qi: None,
        }
    }

    /// Returns true if the key carries private members
    pub fn is_private(&self) -> bool {
        self.d.is_some()
    }

    /// Copy of this key with every private member removed
    pub fn to_public(&self) -> Jwk {
        let mut public = self.clone();
        public.d.zeroize();
        public.p.zeroize();
        public.q.zeroize();
        public.dp.zeroize();
        public.dq.zeroize();
        public.qi.zeroize();
        public
    }

    /// RFC 7638 JWK thumbprint (SHA-256, base64url)
    ///
    /// Only the required public members take part, so a private key and its
    /// public half share the same thumbprint.
    pub fn thumbprint(&self) -> Result<String, KeypairError> {
        let canonical = match self.kty.as_str() {
            "RSA" => format!(
                r#"{{"e":"{}","kty":"RSA","n":"{}"}}"#,
                required(&self.e, "e")?,
                required(&self.n, "n")?
            ),
            "EC" => format!(
                r#"{{"crv":"{}","kty":"EC","x":"{}","y":"{}"}}"#,
                required(&self.crv, "crv")?,
                required(&self.x, "x")?,
                required(&self.y, "y")?
            ),
            "OKP" => format!(
                r#"{{"crv":"{}","kty":"OKP","x":"{}"}}"#,
                required(&self.crv, "crv")?,
                required(&self.x, "x")?
            ),
            other => {
                return Err(KeypairError::EncodingFailed(format!(
                    "cannot compute thumbprint for kty '{}'",
                    other
                )))
            }
        };

        Ok(b64url(&Sha256::digest(canonical.as_bytes())))
    }

    /// Serialize to compact JSON
    pub fn to_json(&self) -> Result<String, KeypairError> {
        serde_json::to_string(self).map_err(|e| KeypairError::EncodingFailed(e.to_string()))
    }
}

fn required<'a>(member: &'a Option<String>, name: &str) -> Result<&'a str, KeypairError> {
    member
        .as_deref()
        .ok_or_else(|| KeypairError::EncodingFailed(format!("missing JWK member '{}'", name)))
}

impl fmt::Debug for Jwk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Jwk")
            .field("kty", &self.kty)
            .field("kid", &self.kid)
            .field("use", &self.key_use)
            .field("alg", &self.alg)
            .field("crv", &self.crv)
            .field("private", &self.is_private())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // RFC 8037 appendix A.1 / A.3
    const RFC8037_X: &str = "11qYAYKxCrfVS_7TyWQHOg7hcvPapiMlrwIaaPcHURo";
    const RFC8037_D: &str = "nWGxne_9WmC6hEr0kuwsxERJxWl7MmkZcDusAxyuf2A";
    const RFC8037_THUMBPRINT: &str = "kPrK_qmxVWaYVA9wwBF6Iuo3vVzz7TxHCTwXBygrS4k";

    fn rfc8037_key() -> Jwk {
        let mut jwk = Jwk::new("OKP");
        jwk.crv = Some("Ed25519".to_string());
        jwk.x = Some(RFC8037_X.to_string());
        jwk.d = Some(RFC8037_D.to_string());
        jwk
    }

    #[test]
    fn test_okp_thumbprint_matches_rfc8037() {
        assert_eq!(rfc8037_key().thumbprint().unwrap(), RFC8037_THUMBPRINT);
    }

    #[test]
    fn test_thumbprint_ignores_optional_members() {
        let bare = rfc8037_key();
        let mut decorated = rfc8037_key();
        decorated.kid = Some("something-else".to_string());
        decorated.alg = Some(Algorithm::EdDsa);
        decorated.key_use = Some(KeyUse::Sig);

        assert_eq!(bare.thumbprint().unwrap(), decorated.thumbprint().unwrap());
        assert_eq!(
            bare.thumbprint().unwrap(),
            bare.to_public().thumbprint().unwrap()
        );
    }

    #[test]
    fn test_thumbprint_requires_members() {
        let mut jwk = Jwk::new("RSA");
        jwk.n = Some("AQAB".to_string());
        assert!(matches!(
            jwk.thumbprint(),
            Err(KeypairError::EncodingFailed(msg)) if msg.contains("'e'")
        ));

        assert!(Jwk::new("oct").thumbprint().is_err());
    }

    #[test]
    fn test_to_public_strips_private_members() {
        let mut jwk = Jwk::new("RSA");
        jwk.n = Some("n".to_string());
        jwk.e = Some("AQAB".to_string());
        jwk.d = Some("d".to_string());
        jwk.p = Some("p".to_string());
        jwk.qi = Some("qi".to_string());

        let public = jwk.to_public();
        assert!(!public.is_private());
        assert!(public.p.is_none());
        assert!(public.qi.is_none());
        assert_eq!(public.n.as_deref(), Some("n"));
        assert!(jwk.is_private());
    }

    #[test]
    fn test_serialization_omits_absent_members() {
        let mut jwk = rfc8037_key().to_public();
        jwk.key_use = Some(KeyUse::Sig);
        jwk.alg = Some(Algorithm::EdDsa);

        let value: serde_json::Value = serde_json::from_str(&jwk.to_json().unwrap()).unwrap();
        assert_eq!(value["use"], "sig");
        assert_eq!(value["alg"], "EdDSA");
        assert!(value.get("d").is_none());
        assert!(value.get("n").is_none());

        let back: Jwk = serde_json::from_value(value).unwrap();
        assert_eq!(back, jwk);
    }

    #[test]
    fn test_debug_hides_key_material() {
        let rendered = format!("{:?}", rfc8037_key());
        assert!(!rendered.contains(RFC8037_D));
        assert!(rendered.contains("private: true"));
    }

    #[test]
    fn test_decode_member_rejects_padding_garbage() {
        assert_eq!(decode_member("AQAB").unwrap(), vec![1, 0, 1]);
        assert!(decode_member("AQAB=").is_err());
    }
}
