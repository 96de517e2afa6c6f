//! jose-keypair Prelude
//!
//! Commonly used types and the [`JwkEncode`] trait in one import.
//!
//! # Example
//!
//! ```rust
//! use jose_keypair::prelude::*;
//!
//! # fn example() -> Result<(), KeypairError> {
//! let keypair = generate(&KeyRequest::for_algorithm(Algorithm::EdDsa))?;
//! let jwk = keypair.native().public_jwk()?; // JwkEncode is in scope
//! assert_eq!(jwk.thumbprint()?, keypair.key_id());
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```

pub use crate::algorithm::{Algorithm, EcCurve, KeyFamily, KeyUse};
pub use crate::config::{KeyRequest, KeygenConfig, PemPolicy};
pub use crate::error::KeypairError;
pub use crate::generator::{generate, GeneratedKeypair, KeyGenerator, KeypairOutput};
pub use crate::jwk::Jwk;
pub use crate::keys::{EcKeyPair, EdKeyPair, JwkEncode, NativeKey, PemPair, RsaKeyPair};
