//! Identity-based and ciphertext-policy attribute-based encryption on the
//! Type-1 Tate pairing.
//!
//! - [`hash`]: the RFC 5091 hashing primitives (range, point, byte-stream,
//!   canonical encoding) over a pluggable SHA-family function,
//! - [`security`]: the level table fixing subgroup/field sizes and hash,
//! - [`ibe`]: Boneh-Franklin identity-based encryption,
//! - [`abe`]: Bethencourt-Sahai-Waters ciphertext-policy attribute-based
//!   encryption with monotone threshold access trees.
//!
//! All randomized operations take a caller-supplied [`rand::Rng`]; use a
//! cryptographically secure, OS-seeded generator outside of tests.

pub mod hash;

pub mod security;
pub use self::security::SecurityLevel;

pub mod ibe;

pub mod abe;

/// Protocol-level failures; arithmetic and generation failures bubble up
/// from the algebra crate unchanged.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Algebra(#[from] algebra::Error),

    #[error("hashing onto the curve failed within {0} attempts")]
    HashToPoint(usize),

    #[error("message must not be empty")]
    EmptyMessage,

    #[error("identity must not be empty")]
    EmptyIdentity,

    #[error("attribute set must not be empty")]
    EmptyAttributeSet,

    #[error("access tree violates the threshold invariants")]
    InvalidAccessTree,

    #[error("public parameters are inconsistent")]
    InvalidPublicParameters,

    #[error("secret key does not satisfy the ciphertext policy")]
    InvalidSecretKey,

    #[error("ciphertext is structurally malformed")]
    MalformedCipherText,

    #[error("decryption failed")]
    DecryptionFailed,
}

pub type Result<T> = std::result::Result<T, Error>;

/// Attempt cap shared by the bounded generation loops.
pub(crate) const GENERATION_ATTEMPTS: usize = 100;
