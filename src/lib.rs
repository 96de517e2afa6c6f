//! JOSE Keypair Generation
//!
//! Generates asymmetric keypairs for JWS and JWE:
//! - JWK encoding of public and private keys (RSA, EC P-256/P-384/P-521, Ed25519)
//! - Key ids derived from the key material (RFC 7638 thumbprints)
//! - PKCS#1 PEM projection for RSA keys
//!
//! # Security Features
//!
//! - **Validation first**: algorithm/use mismatches and unsafe RSA sizes are
//!   rejected before any key material exists
//! - **Zeroization**: private JWK members and PEM output are cleared on drop
//! - **Fresh randomness**: every call draws from the OS random source
//!
//! # Example
//!
//! ```
//! use jose_keypair::{KeyGenerator, KeyRequest, KeygenConfig};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let request = KeyRequest::parse("sig", "RS256", Some(2048))?;
//! let output = KeyGenerator::new(KeygenConfig::default()).generate_output(&request)?;
//!
//! assert!(output.public_key.contains("\"kty\":\"RSA\""));
//! assert!(output.public_key_pem.as_deref().unwrap().contains("RSA PUBLIC KEY"));
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub mod algorithm;
pub mod config;
pub mod error;
pub mod generator;
pub mod jwk;
pub mod keys;
pub mod prelude;

pub use algorithm::{Algorithm, EcCurve, KeyFamily, KeyUse};
pub use config::{KeyRequest, KeygenConfig, PemPolicy, DEFAULT_RSA_BITS, MAX_RSA_BITS, MIN_RSA_BITS};
pub use error::KeypairError;
pub use generator::{generate, GeneratedKeypair, KeyGenerator, KeypairOutput};
pub use jwk::Jwk;
pub use keys::{EcKeyPair, EdKeyPair, JwkEncode, NativeKey, PemPair, RsaKeyPair};

// Re-export the native key crates so callers can name the wrapped types
pub use ed25519_dalek;
pub use p256;
pub use p384;
pub use p521;
pub use rsa;
