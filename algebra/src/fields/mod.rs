//! Arithmetic over the base prime field and its quadratic extension.

pub mod fp;

pub mod fp2;
pub use self::fp2::*;
