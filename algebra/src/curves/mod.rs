//! Supersingular short Weierstrass curves and their point arithmetic.

pub mod curve;
pub use self::curve::*;

pub mod affine;
pub use self::affine::*;

pub mod fp2_point;
pub use self::fp2_point::*;
