//! Boneh-Franklin identity-based encryption (RFC 5091 BFKEM variant with
//! the full message transport).
//!
//! A trusted generator runs [`setup`] once, keeps the [`MasterSecret`] and
//! publishes the [`PublicParameters`]; identities obtain their
//! [`PrivateKey`] through [`extract`]. Encryption binds the message to an
//! identity string; decryption re-derives the encryptor's randomness and
//! rejects any ciphertext that fails the consistency check, without
//! revealing which step diverged.

use crate::hash::{self, HashFunction};
use crate::{Error, Result, SecurityLevel, GENERATION_ATTEMPTS};
use algebra::bytes::{FromBytes, ToBytes};
use algebra::curves::{AffinePoint, EllipticCurve};
use algebra::pairing::TatePairing;
use algebra::solinas::generate_type1_params;
use byteorder::ReadBytesExt;
use num_bigint::{BigUint, RandBigInt};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::io::{Read, Result as IoResult, Write};
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicParameters {
    pub curve: EllipticCurve,
    /// Order of the pairing subgroup.
    pub q: BigUint,
    /// Generator of the subgroup.
    pub point: AffinePoint,
    /// s * point for the master secret s.
    pub point_pub: AffinePoint,
    pub hash: HashFunction,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterSecret {
    pub s: BigUint,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrivateKey {
    pub point: AffinePoint,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherText {
    pub u: AffinePoint,
    /// Masked encryptor randomness, one hash-output wide.
    pub v: Vec<u8>,
    /// Masked message, as long as the plaintext.
    pub w: Vec<u8>,
}

impl PublicParameters {
    /// Structural sanity of published parameters: the generator is a
    /// non-trivial point of order q and both points lie on the curve.
    pub fn validate(&self) -> Result<()> {
        if self.point.is_zero()
            || !self.curve.contains(&self.point)
            || !self.curve.contains(&self.point_pub)
            || !self.point.mul(&self.q, &self.curve).is_zero()
        {
            return Err(Error::InvalidPublicParameters);
        }
        Ok(())
    }

    fn pairing(&self) -> TatePairing {
        TatePairing::new(self.curve.clone(), self.q.clone())
    }
}

/// Generates the Type-1 parameters for `level` and a fresh master secret.
pub fn setup<R: Rng>(
    level: SecurityLevel,
    rng: &mut R,
) -> Result<(PublicParameters, MasterSecret)> {
    debug!(?level, "ibe setup");
    let params = generate_type1_params(
        level.q_bits(),
        level.p_bits(),
        GENERATION_ATTEMPTS,
        rng,
    )?;
    let curve = EllipticCurve::supersingular(params.p.clone());
    let point = subgroup_generator(&curve, &params.cofactor(), rng)?;
    let s = rng.gen_biguint_range(&BigUint::from(2u32), &params.q);
    let point_pub = point.mul(&s, &curve);

    let public = PublicParameters {
        curve,
        q: params.q,
        point,
        point_pub,
        hash: level.hash(),
    };
    Ok((public, MasterSecret { s }))
}

/// Clears the cofactor off random points until one survives.
pub(crate) fn subgroup_generator<R: Rng>(
    curve: &EllipticCurve,
    cofactor: &BigUint,
    rng: &mut R,
) -> Result<AffinePoint> {
    for _ in 0..GENERATION_ATTEMPTS {
        let point = curve.random_point(GENERATION_ATTEMPTS, rng)?;
        let candidate = point.mul(cofactor, curve);
        if !candidate.is_zero() {
            return Ok(candidate);
        }
    }
    Err(Error::Algebra(algebra::Error::PointGeneration(
        GENERATION_ATTEMPTS,
    )))
}

/// The private key s * H(id) for an identity string.
pub fn extract(
    id: &[u8],
    public: &PublicParameters,
    master: &MasterSecret,
) -> Result<PrivateKey> {
    if id.is_empty() {
        return Err(Error::EmptyIdentity);
    }
    public.validate()?;
    let id_point = hash::hash_to_point(&public.curve, &public.q, id, public.hash)?;
    Ok(PrivateKey {
        point: id_point.mul(&master.s, &public.curve),
    })
}

pub fn encrypt<R: Rng>(
    message: &[u8],
    id: &[u8],
    public: &PublicParameters,
    rng: &mut R,
) -> Result<CipherText> {
    if message.is_empty() {
        return Err(Error::EmptyMessage);
    }
    if id.is_empty() {
        return Err(Error::EmptyIdentity);
    }
    public.validate()?;
    debug!(message_len = message.len(), "ibe encrypt");

    let hashlen = public.hash.output_len();
    let mut rho = vec![0u8; hashlen];
    rng.fill_bytes(&mut rho);

    // l = HashToRange(rho || H(m), q) commits the point U to both the
    // randomness and the message
    let digest = public.hash.digest(message);
    let l = session_scalar(&rho, &digest, public);
    let u = public.point.mul(&l, &public.curve);

    let id_point = hash::hash_to_point(&public.curve, &public.q, id, public.hash)?;
    let theta = public
        .pairing()
        .compute(&public.point_pub, &id_point)?
        .pow(&l, &public.curve.p);

    let mask = public.hash.digest(&hash::canonical(&public.curve.p, &theta, 1));
    let v = hash::xor(&mask, &rho);
    let w = hash::xor(&hash::hash_bytes(message.len(), &rho, public.hash), message);
    Ok(CipherText { u, v, w })
}

pub fn decrypt(
    ciphertext: &CipherText,
    key: &PrivateKey,
    public: &PublicParameters,
) -> Result<Vec<u8>> {
    if ciphertext.v.len() != public.hash.output_len() || ciphertext.w.is_empty() {
        return Err(Error::MalformedCipherText);
    }
    let theta = public.pairing().compute(&ciphertext.u, &key.point)?;
    let mask = public.hash.digest(&hash::canonical(&public.curve.p, &theta, 1));
    let rho = hash::xor(&mask, &ciphertext.v);
    let message = hash::xor(
        &hash::hash_bytes(ciphertext.w.len(), &rho, public.hash),
        &ciphertext.w,
    );

    // the ciphertext is only accepted if U matches the re-derived scalar
    let digest = public.hash.digest(&message);
    let l = session_scalar(&rho, &digest, public);
    if public.point.mul(&l, &public.curve) != ciphertext.u {
        debug!("ibe consistency check failed");
        return Err(Error::DecryptionFailed);
    }
    Ok(message)
}

fn session_scalar(rho: &[u8], message_digest: &[u8], public: &PublicParameters) -> BigUint {
    let mut input = rho.to_vec();
    input.extend_from_slice(message_digest);
    hash::hash_to_range(&input, &public.q, public.hash)
}

impl ToBytes for PublicParameters {
    fn write<W: Write>(&self, mut writer: W) -> IoResult<()> {
        self.curve.write(&mut writer)?;
        self.q.write(&mut writer)?;
        self.point.write(&mut writer)?;
        self.point_pub.write(&mut writer)?;
        writer.write_all(&[self.hash.id()])
    }
}

impl FromBytes for PublicParameters {
    fn read<R: Read>(mut reader: R) -> IoResult<Self> {
        let curve = EllipticCurve::read(&mut reader)?;
        let q = BigUint::read(&mut reader)?;
        let point = AffinePoint::read(&mut reader)?;
        let point_pub = AffinePoint::read(&mut reader)?;
        let hash = read_hash_id(&mut reader)?;
        Ok(PublicParameters {
            curve,
            q,
            point,
            point_pub,
            hash,
        })
    }
}

pub(crate) fn read_hash_id<R: Read>(mut reader: R) -> IoResult<HashFunction> {
    let id = reader.read_u8()?;
    HashFunction::from_id(id).ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::InvalidData, "unknown hash id")
    })
}

impl ToBytes for MasterSecret {
    fn write<W: Write>(&self, writer: W) -> IoResult<()> {
        self.s.write(writer)
    }
}

impl FromBytes for MasterSecret {
    fn read<R: Read>(reader: R) -> IoResult<Self> {
        Ok(MasterSecret {
            s: BigUint::read(reader)?,
        })
    }
}

impl ToBytes for PrivateKey {
    fn write<W: Write>(&self, writer: W) -> IoResult<()> {
        self.point.write(writer)
    }
}

impl FromBytes for PrivateKey {
    fn read<R: Read>(reader: R) -> IoResult<Self> {
        Ok(PrivateKey {
            point: AffinePoint::read(reader)?,
        })
    }
}

impl ToBytes for CipherText {
    fn write<W: Write>(&self, mut writer: W) -> IoResult<()> {
        self.u.write(&mut writer)?;
        self.v.write(&mut writer)?;
        self.w.write(&mut writer)
    }
}

impl FromBytes for CipherText {
    fn read<R: Read>(mut reader: R) -> IoResult<Self> {
        let u = AffinePoint::read(&mut reader)?;
        let v = Vec::<u8>::read(&mut reader)?;
        let w = Vec::<u8>::read(&mut reader)?;
        Ok(CipherText { u, v, w })
    }
}

#[cfg(test)]
mod tests;
