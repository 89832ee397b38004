//! Arithmetic core for Type-1 pairing cryptography over runtime moduli.
//!
//! Unlike fixed-curve libraries, every prime here is generated at setup
//! time (the subgroup order is a Solinas prime, the field prime has the
//! 12rq - 1 shape), so elements carry arbitrary-precision magnitudes and
//! operations take the modulus explicitly. The layering is
//!
//! - [`fields`]: F_p helper arithmetic and the quadratic extension F_p^2,
//! - [`curves`]: the supersingular curve y^2 = x^3 + 1, affine points and
//!   window-NAF scalar multiplication, plus the distortion map into
//!   E(F_p^2),
//! - [`pairing`]: divisor evaluation and the reduced Tate pairing,
//! - [`solinas`]: parameter generation and primality testing,
//! - [`bytes`]: the length-prefixed big-endian wire encoding.

pub mod bytes;
pub use self::bytes::*;

pub mod error;
pub use self::error::*;

pub mod fields;
pub use self::fields::Fp2;

pub mod curves;
pub use self::curves::{AffinePoint, EllipticCurve, Fp2Point};

pub mod pairing;
pub use self::pairing::TatePairing;

pub mod solinas;
pub use self::solinas::{generate_type1_params, random_solinas_prime, Type1Params};
