//! Generation of the Type-1 curve parameters: a Solinas subgroup order q
//! and a field prime p = 12rq - 1.
//!
//! Primality testing is probabilistic (Miller-Rabin based) through
//! `num-prime`; the searches are bounded and report which cap was
//! exhausted.

use crate::{Error, Result};
use num_bigint::{BigUint, RandBigInt};
use num_prime::nt_funcs::is_prime;
use num_traits::One;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// Attempt budget per modulus bit when searching for p = 12rq - 1.
const FIELD_PRIME_ATTEMPTS_PER_BIT: usize = 50;

pub fn is_probable_prime(n: &BigUint) -> bool {
    is_prime(n, None).probably()
}

/// A random Solinas prime 2^a +- 2^b +- 1 with a = `nbits`.
///
/// Each of the at most `limit` attempts draws a fresh b and tests the
/// four sign variants of the form.
pub fn random_solinas_prime<R: Rng>(nbits: u64, limit: usize, rng: &mut R) -> Result<BigUint> {
    let base = BigUint::one() << nbits;
    for _ in 0..limit {
        let b = rng.gen_range(1..nbits);
        let mid = BigUint::one() << b;
        for body in [&base + &mid, &base - &mid].iter() {
            for candidate in [body + 1u32, body - 1u32].iter() {
                if is_probable_prime(candidate) {
                    return Ok(candidate.clone());
                }
            }
        }
    }
    Err(Error::SolinasGeneration(limit))
}

/// The primes of a Type-1 pairing configuration: p = 12rq - 1.
///
/// q is the (Solinas) order of the pairing subgroup, p the field prime,
/// and 12r the cofactor of the subgroup inside E(F_p).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Type1Params {
    pub p: BigUint,
    pub q: BigUint,
    pub r: BigUint,
}

impl Type1Params {
    /// 12r, the index of the order-q subgroup.
    pub fn cofactor(&self) -> BigUint {
        (&self.p + 1u32) / &self.q
    }
}

/// Draws q with `nq_bits` and then searches for r such that p = 12rq - 1
/// is an `np_bits` probable prime. p = 11 mod 12 holds by construction,
/// which gives p = 3 mod 4 and p = 2 mod 3.
pub fn generate_type1_params<R: Rng>(
    nq_bits: u64,
    np_bits: u64,
    limit: usize,
    rng: &mut R,
) -> Result<Type1Params> {
    let q = random_solinas_prime(nq_bits, limit, rng)?;
    let twelve_q = &q * 12u32;

    // r must keep p inside [2^(np-1), 2^np)
    let p_min = BigUint::one() << (np_bits - 1);
    let p_max = BigUint::one() << np_bits;
    let r_min = (&p_min + &twelve_q) / &twelve_q; // ceil((p_min + 1) / 12q)
    let r_max = (&p_max / &twelve_q) + 1u32;
    if r_min >= r_max {
        return Err(Error::PrimalityTest(0));
    }

    let attempts = FIELD_PRIME_ATTEMPTS_PER_BIT * np_bits as usize;
    for _ in 0..attempts {
        let r = rng.gen_biguint_range(&r_min, &r_max);
        let p = &twelve_q * &r - 1u32;
        if p.bits() == np_bits && is_probable_prime(&p) {
            return Ok(Type1Params { p, q, r });
        }
    }
    Err(Error::PrimalityTest(attempts))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xorshift::XorShiftRng;

    // The search is a bounded randomized walk, so the test scans fixed
    // seeds for one that stays inside the 100-attempt cap at the lowest
    // security level's subgroup size, then pins down determinism.
    #[test]
    fn solinas_generation_within_the_attempt_cap() {
        let mut found = None;
        for seed in 0..20u64 {
            let mut rng = XorShiftRng::seed_from_u64(seed);
            if let Ok(q) = random_solinas_prime(160, 100, &mut rng) {
                found = Some((seed, q));
                break;
            }
        }
        let (seed, q) = found.expect("a seed inside the cap");
        assert!(is_probable_prime(&q));

        let mut rng = XorShiftRng::seed_from_u64(seed);
        assert_eq!(random_solinas_prime(160, 100, &mut rng).unwrap(), q);

        // 2^a +- 2^b +- 1 has very low Hamming weight in either the plain
        // or the complemented representation
        let weight = q.to_radix_le(2).iter().filter(|&&b| b == 1).count();
        let complement_weight = ((BigUint::one() << (q.bits() + 1)) - &q)
            .to_radix_le(2)
            .iter()
            .filter(|&&b| b == 1)
            .count();
        assert!(weight.min(complement_weight) <= q.bits() as usize / 2 + 2);
    }

    #[test]
    fn type1_params_small() {
        let mut rng = XorShiftRng::seed_from_u64(1);
        let params = generate_type1_params(30, 96, 100, &mut rng).unwrap();
        assert!(is_probable_prime(&params.p));
        assert!(is_probable_prime(&params.q));
        assert_eq!(params.p.bits(), 96);
        assert_eq!(&(&params.q * 12u32) * &params.r - 1u32, params.p);
        // p = 11 mod 12
        assert_eq!((&params.p % 12u32), BigUint::from(11u32));
        assert_eq!(params.cofactor(), &params.r * 12u32);
    }

    #[test]
    fn bounded_search_reports_exhaustion() {
        let mut rng = XorShiftRng::seed_from_u64(3);
        assert_eq!(
            random_solinas_prime(160, 0, &mut rng),
            Err(Error::SolinasGeneration(0))
        );
    }
}
