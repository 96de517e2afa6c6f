//! Common test utilities for jose-keypair integration tests
//!
//! Shared helpers to keep the individual test files focused on behavior.

#![allow(dead_code)]

pub use jose_keypair::{
    Algorithm, GeneratedKeypair, Jwk, KeyFamily, KeyGenerator, KeyRequest, KeyUse, KeygenConfig,
    KeypairError, PemPolicy,
};

/// RSA size used throughout the tests; 4096-bit generation is too slow for CI
pub const TEST_RSA_BITS: usize = 2048;

/// Generator whose RSA default is [`TEST_RSA_BITS`]
pub fn test_generator() -> KeyGenerator {
    KeyGenerator::new(KeygenConfig::default().with_default_rsa_bits(TEST_RSA_BITS))
}

/// Same as [`test_generator`] with a specific PEM policy
pub fn test_generator_with_pem(policy: PemPolicy) -> KeyGenerator {
    KeyGenerator::new(
        KeygenConfig::default()
            .with_default_rsa_bits(TEST_RSA_BITS)
            .with_pem_policy(policy),
    )
}

/// The opposite key use
pub fn other_use(key_use: KeyUse) -> KeyUse {
    match key_use {
        KeyUse::Sig => KeyUse::Enc,
        KeyUse::Enc => KeyUse::Sig,
    }
}

/// Decode a base64url JWK member into bytes
pub fn member_bytes(value: &Option<String>) -> Vec<u8> {
    jose_keypair::jwk::decode_member(value.as_deref().expect("member present"))
        .expect("valid base64url")
}

/// Bit length of the RSA modulus carried by a JWK
pub fn modulus_bits(jwk: &Jwk) -> usize {
    let n = member_bytes(&jwk.n);
    let first = n.iter().position(|b| *b != 0).expect("non-zero modulus");
    (n.len() - first - 1) * 8 + (8 - n[first].leading_zeros() as usize)
}

/// Parse a JWK JSON string from a `KeypairOutput`
pub fn parse_jwk(json: &str) -> Jwk {
    serde_json::from_str(json).expect("valid JWK JSON")
}
