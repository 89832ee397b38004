//! RFC 5091 hashing primitives.
//!
//! Everything here is deterministic: hashing into an integer range
//! (HashToRange), hashing onto the order-q curve subgroup (HashToPoint),
//! the keyed byte-stream generator (HashBytes) and the fixed-width
//! canonical encoding of F_p^2 elements.

use crate::{Error, Result, GENERATION_ATTEMPTS};
use algebra::curves::{AffinePoint, EllipticCurve};
use algebra::fields::{fp, Fp2};
use num_bigint::BigUint;
use num_traits::{One, Zero};
use serde::{Deserialize, Serialize};
use sha1::Sha1;
use sha2::{Digest, Sha224, Sha256, Sha384, Sha512};

/// The SHA-family capability record: an algorithm tag with its output
/// length and a pure digest function.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HashFunction {
    Sha1,
    Sha224,
    Sha256,
    Sha384,
    Sha512,
}

impl HashFunction {
    /// Output length in octets.
    pub fn output_len(self) -> usize {
        match self {
            HashFunction::Sha1 => 20,
            HashFunction::Sha224 => 28,
            HashFunction::Sha256 => 32,
            HashFunction::Sha384 => 48,
            HashFunction::Sha512 => 64,
        }
    }

    pub fn digest(self, data: &[u8]) -> Vec<u8> {
        match self {
            HashFunction::Sha1 => Sha1::digest(data).to_vec(),
            HashFunction::Sha224 => Sha224::digest(data).to_vec(),
            HashFunction::Sha256 => Sha256::digest(data).to_vec(),
            HashFunction::Sha384 => Sha384::digest(data).to_vec(),
            HashFunction::Sha512 => Sha512::digest(data).to_vec(),
        }
    }

    /// One-octet algorithm tag for the wire encoding.
    pub fn id(self) -> u8 {
        match self {
            HashFunction::Sha1 => 0,
            HashFunction::Sha224 => 1,
            HashFunction::Sha256 => 2,
            HashFunction::Sha384 => 3,
            HashFunction::Sha512 => 4,
        }
    }

    pub fn from_id(id: u8) -> Option<Self> {
        match id {
            0 => Some(HashFunction::Sha1),
            1 => Some(HashFunction::Sha224),
            2 => Some(HashFunction::Sha256),
            3 => Some(HashFunction::Sha384),
            4 => Some(HashFunction::Sha512),
            _ => None,
        }
    }
}

/// HashToRange (RFC 5091 4.1.1): a near-uniform integer in `[0, n)`.
///
/// Chains `hash(state || s)` for as many rounds as needed to cover the
/// bit length of `n`, folding the blocks into a base-256^hashlen
/// accumulator before the final reduction.
pub fn hash_to_range(s: &[u8], n: &BigUint, hash: HashFunction) -> BigUint {
    let hashlen = hash.output_len();
    let rounds = ((n.bits() as usize) + 8 * hashlen - 1) / (8 * hashlen);
    let base = BigUint::one() << (8 * hashlen as u64);

    let mut state = vec![0u8; hashlen];
    let mut acc = BigUint::zero();
    for _ in 0..rounds.max(1) {
        let mut input = state.clone();
        input.extend_from_slice(s);
        state = hash.digest(&input);
        acc = acc * &base + BigUint::from_bytes_be(&state);
    }
    acc % n
}

/// HashBytes (RFC 5091 4.2.1): exactly `count` pseudo-random octets
/// derived from `seed`.
pub fn hash_bytes(count: usize, seed: &[u8], hash: HashFunction) -> Vec<u8> {
    let hashlen = hash.output_len();
    let key = hash.digest(seed);
    let mut state = vec![0u8; hashlen];
    let mut out = Vec::with_capacity(count + hashlen);
    while out.len() < count {
        state = hash.digest(&state);
        let mut input = state.clone();
        input.extend_from_slice(&key);
        out.extend_from_slice(&hash.digest(&input));
    }
    out.truncate(count);
    out
}

/// Canonical (RFC 5091 4.3.1): fixed-width big-endian encoding of an
/// F_p^2 element; `order` = 0 emits c0 then c1, 1 swaps them.
pub fn canonical(p: &BigUint, value: &Fp2, order: u8) -> Vec<u8> {
    let width = ((p.bits() as usize) + 7) / 8;
    let mut out = Vec::with_capacity(2 * width);
    let components = if order == 0 {
        [&value.c0, &value.c1]
    } else {
        [&value.c1, &value.c0]
    };
    for component in components.iter() {
        let bytes = component.to_bytes_be();
        out.resize(out.len() + width - bytes.len(), 0);
        out.extend_from_slice(&bytes);
    }
    out
}

/// HashToPoint (RFC 5091 4.4.1): a point of the order-q subgroup derived
/// from `id`.
///
/// y is hashed into F_p, x recovered through the cube-root bijection
/// (y^2 - b)^((2p-1)/3), and the candidate cleared by the cofactor
/// (p+1)/q. A candidate collapsing to infinity advances the seed; the
/// loop gives up after 100 attempts.
pub fn hash_to_point(
    curve: &EllipticCurve,
    q: &BigUint,
    id: &[u8],
    hash: HashFunction,
) -> Result<AffinePoint> {
    let cofactor = (&curve.p + 1u32) / q;
    let mut seed = id.to_vec();
    for _ in 0..GENERATION_ATTEMPTS {
        let y = hash_to_range(&seed, &curve.p, hash);
        let y_sq = (&y * &y) % &curve.p;
        let x = fp::cube_root(&fp::sub(&y_sq, &curve.b, &curve.p), &curve.p);
        let candidate = AffinePoint::new(x, y).mul(&cofactor, curve);
        if !candidate.is_zero() {
            return Ok(candidate);
        }
        seed = hash.digest(&seed);
    }
    Err(Error::HashToPoint(GENERATION_ATTEMPTS))
}

/// XOR of equal-length buffers; the protocol masks are always sized to
/// their payload.
pub(crate) fn xor(a: &[u8], b: &[u8]) -> Vec<u8> {
    debug_assert_eq!(a.len(), b.len());
    a.iter().zip(b.iter()).map(|(x, y)| x ^ y).collect()
}
