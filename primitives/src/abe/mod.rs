//! Bethencourt-Sahai-Waters ciphertext-policy attribute-based encryption.
//!
//! Ciphertexts carry an [`AccessTree`] policy; secret keys carry a set of
//! attribute labels. Decryption recovers the blinding value e(g,g)^{rs}
//! through recursive Lagrange interpolation in the exponent, which only
//! succeeds when the attribute set satisfies the policy tree.
//!
//! Messages are packed as big-endian integers strictly smaller than the
//! field prime; longer messages are split into blocks, all blinded by the
//! same session value e(g,g)^{alpha s}.

pub mod tree;
pub use self::tree::{AccessTree, PolicyNode};

use crate::hash::{self, HashFunction};
use crate::ibe::{read_hash_id, subgroup_generator};
use crate::{Error, Result, SecurityLevel, GENERATION_ATTEMPTS};
use algebra::bytes::{FromBytes, ToBytes};
use algebra::curves::{AffinePoint, EllipticCurve};
use algebra::fields::{fp, Fp2};
use algebra::pairing::TatePairing;
use algebra::solinas::generate_type1_params;
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use num_bigint::{BigUint, RandBigInt};
use num_traits::{One, Zero};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{Read, Result as IoResult, Write};
use tracing::debug;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicKey {
    pub curve: EllipticCurve,
    pub q: BigUint,
    pub g: AffinePoint,
    /// beta * g.
    pub h: AffinePoint,
    /// beta^-1 * g.
    pub f: AffinePoint,
    /// e(g, g)^alpha.
    pub e_gg_alpha: Fp2,
    pub hash: HashFunction,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MasterKey {
    pub beta: BigUint,
    pub g_alpha: AffinePoint,
}

/// Per-attribute key material: (r*g + r_j*H(attr), r_j*g).
pub type AttributeKey = (AffinePoint, AffinePoint);

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretKey {
    /// The pairing context the key was issued under.
    pub curve: EllipticCurve,
    pub q: BigUint,
    /// beta^-1 * (alpha + r) * g.
    pub d: AffinePoint,
    pub components: BTreeMap<String, AttributeKey>,
}

/// Share annotations of one policy leaf: (share*g, share*H(attr)).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeafShare {
    pub c_y: AffinePoint,
    pub c_y_prime: AffinePoint,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CipherText {
    pub policy: AccessTree,
    /// s * h.
    pub c: AffinePoint,
    /// Message blocks blinded by e(g,g)^{alpha s}.
    pub blocks: Vec<Fp2>,
    /// Leaf annotations keyed by preorder node id.
    pub shares: BTreeMap<usize, LeafShare>,
    pub message_len: u64,
}

impl SecretKey {
    pub fn attributes(&self) -> Vec<String> {
        self.components.keys().cloned().collect()
    }

    fn pairing(&self) -> TatePairing {
        TatePairing::new(self.curve.clone(), self.q.clone())
    }
}

/// Generates the Type-1 parameters for `level` together with the master
/// key (beta, alpha*g).
pub fn setup<R: Rng>(level: SecurityLevel, rng: &mut R) -> Result<(PublicKey, MasterKey)> {
    debug!(?level, "abe setup");
    let params = generate_type1_params(
        level.q_bits(),
        level.p_bits(),
        GENERATION_ATTEMPTS,
        rng,
    )?;
    let curve = EllipticCurve::supersingular(params.p.clone());
    let g = subgroup_generator(&curve, &params.cofactor(), rng)?;

    let one = BigUint::one();
    let alpha = rng.gen_biguint_range(&one, &params.q);
    let beta = rng.gen_biguint_range(&one, &params.q);
    let beta_inv = fp::inverse(&beta, &params.q)?;

    let h = g.mul(&beta, &curve);
    let f = g.mul(&beta_inv, &curve);
    let g_alpha = g.mul(&alpha, &curve);
    let e_gg_alpha = TatePairing::new(curve.clone(), params.q.clone())
        .compute(&g, &g)?
        .pow(&alpha, &params.p);

    let public = PublicKey {
        curve,
        q: params.q,
        g,
        h,
        f,
        e_gg_alpha,
        hash: level.hash(),
    };
    Ok((public, MasterKey { beta, g_alpha }))
}

/// Issues a secret key for an attribute set.
pub fn keygen<R: Rng>(
    master: &MasterKey,
    public: &PublicKey,
    attributes: &[String],
    rng: &mut R,
) -> Result<SecretKey> {
    if attributes.is_empty() {
        return Err(Error::EmptyAttributeSet);
    }
    debug!(count = attributes.len(), "abe keygen");
    let curve = &public.curve;
    let one = BigUint::one();
    let r = rng.gen_biguint_range(&one, &public.q);
    let beta_inv = fp::inverse(&master.beta, &public.q)?;
    let d = master
        .g_alpha
        .add(&public.g.mul(&r, curve), curve)
        .mul(&beta_inv, curve);

    let mut components = BTreeMap::new();
    for attribute in attributes {
        if attribute.is_empty() {
            return Err(Error::EmptyAttributeSet);
        }
        let r_j = rng.gen_biguint_range(&one, &public.q);
        let attr_point = hash::hash_to_point(curve, &public.q, attribute.as_bytes(), public.hash)?;
        let d_j = public
            .g
            .mul(&r, curve)
            .add(&attr_point.mul(&r_j, curve), curve);
        let d_j_prime = public.g.mul(&r_j, curve);
        components.insert(attribute.clone(), (d_j, d_j_prime));
    }

    Ok(SecretKey {
        curve: public.curve.clone(),
        q: public.q.clone(),
        d,
        components,
    })
}

/// Encrypts `message` under the policy `tree`.
pub fn encrypt<R: Rng>(
    message: &[u8],
    tree: &AccessTree,
    public: &PublicKey,
    rng: &mut R,
) -> Result<CipherText> {
    if message.is_empty() {
        return Err(Error::EmptyMessage);
    }
    tree.validate()?;
    debug!(message_len = message.len(), "abe encrypt");

    let curve = &public.curve;
    let s = rng.gen_biguint_range(&BigUint::one(), &public.q);

    // annotate every leaf with its split of s
    let scalar_shares = tree::split_shares(&tree.root, &s, &public.q, rng);
    let leaves = tree.leaves();
    let mut shares = BTreeMap::new();
    for (id, share) in scalar_shares {
        let attribute = leaves[&id];
        let attr_point = hash::hash_to_point(curve, &public.q, attribute.as_bytes(), public.hash)?;
        shares.insert(
            id,
            LeafShare {
                c_y: public.g.mul(&share, curve),
                c_y_prime: attr_point.mul(&share, curve),
            },
        );
    }

    let mask = public.e_gg_alpha.pow(&s, &curve.p);
    let blocks = message
        .chunks(block_len(&curve.p))
        .map(|chunk| mask.scale(&BigUint::from_bytes_be(chunk), &curve.p))
        .collect();

    Ok(CipherText {
        policy: tree.clone(),
        c: public.h.mul(&s, curve),
        blocks,
        shares,
        message_len: message.len() as u64,
    })
}

/// Recovers the message when the key's attributes satisfy the policy.
pub fn decrypt(ciphertext: &CipherText, key: &SecretKey) -> Result<Vec<u8>> {
    if ciphertext.blocks.is_empty() || ciphertext.message_len == 0 {
        return Err(Error::MalformedCipherText);
    }
    ciphertext.policy.validate()?;
    if !ciphertext.policy.satisfied_by(&key.attributes()) {
        return Err(Error::InvalidSecretKey);
    }
    debug!("abe decrypt");

    let pairing = key.pairing();
    let p = &key.curve.p;
    let mut counter = 0usize;
    let blinding = decrypt_node(&ciphertext.policy.root, &mut counter, ciphertext, key, &pairing)?
        .ok_or(Error::DecryptionFailed)?;

    // M_i = C~_i * e(g,g)^{rs} / e(s*h, beta^-1 (alpha+r) g)
    let e_c_d = pairing.compute(&ciphertext.c, &key.d)?;
    let unmask = blinding.mul(
        &e_c_d.inverse(p).map_err(|_| Error::DecryptionFailed)?,
        p,
    );

    let width = block_len(p);
    let mut message = Vec::with_capacity(ciphertext.message_len as usize);
    let mut remaining = ciphertext.message_len as usize;
    for block in &ciphertext.blocks {
        let chunk_len = remaining.min(width);
        if chunk_len == 0 {
            return Err(Error::MalformedCipherText);
        }
        let element = block.mul(&unmask, p);
        if !element.c1.is_zero() {
            return Err(Error::DecryptionFailed);
        }
        let bytes = if element.c0.is_zero() {
            Vec::new()
        } else {
            element.c0.to_bytes_be()
        };
        if bytes.len() > chunk_len {
            return Err(Error::DecryptionFailed);
        }
        message.resize(message.len() + chunk_len - bytes.len(), 0);
        message.extend_from_slice(&bytes);
        remaining -= chunk_len;
    }
    if remaining != 0 {
        return Err(Error::MalformedCipherText);
    }
    Ok(message)
}

/// Bytes per message block; a block always imports to an integer below p.
fn block_len(p: &BigUint) -> usize {
    (((p.bits() - 1) / 8) as usize).max(1)
}

/// Walks the policy in preorder, mirroring the numbering used when the
/// shares were split. Satisfied leaves evaluate
/// e(D_j, C_y) / e(D_j', C_y') = e(g,g)^{r * share}; gates combine any
/// `threshold` successful children by Lagrange interpolation at zero.
fn decrypt_node(
    node: &PolicyNode,
    counter: &mut usize,
    ciphertext: &CipherText,
    key: &SecretKey,
    pairing: &TatePairing,
) -> Result<Option<Fp2>> {
    let id = *counter;
    *counter += 1;
    let p = &key.curve.p;
    match node {
        PolicyNode::Leaf { attribute } => {
            let component = match key.components.get(attribute) {
                Some(component) => component,
                None => return Ok(None),
            };
            let share = match ciphertext.shares.get(&id) {
                Some(share) => share,
                None => return Err(Error::MalformedCipherText),
            };
            let numerator = pairing.compute(&component.0, &share.c_y)?;
            let denominator = pairing.compute(&component.1, &share.c_y_prime)?;
            let value = numerator.mul(
                &denominator.inverse(p).map_err(|_| Error::DecryptionFailed)?,
                p,
            );
            Ok(Some(value))
        }
        PolicyNode::Gate {
            threshold,
            children,
        } => {
            let mut successes = Vec::new();
            for (index, child) in children.iter().enumerate() {
                let result = decrypt_node(child, counter, ciphertext, key, pairing)?;
                if let Some(value) = result {
                    successes.push((index + 1, value));
                }
            }
            if successes.len() < *threshold {
                return Ok(None);
            }
            successes.truncate(*threshold);
            Ok(Some(lagrange_combine(&successes, &key.q, p)?))
        }
    }
}

/// prod_i F_i ^ Delta_{i,S}(0) with Delta_{i,S}(0) =
/// prod_{j in S, j != i} (-j)/(i - j), all coefficients taken mod q.
fn lagrange_combine(values: &[(usize, Fp2)], q: &BigUint, p: &BigUint) -> Result<Fp2> {
    let mut combined = Fp2::one();
    for (i, value) in values {
        let mut numerator = BigUint::one();
        let mut denominator = BigUint::one();
        for (j, _) in values {
            if i == j {
                continue;
            }
            numerator = (numerator * fp::neg(&BigUint::from(*j), q)) % q;
            denominator =
                (denominator * fp::sub(&BigUint::from(*i), &BigUint::from(*j), q)) % q;
        }
        let coefficient = (numerator
            * fp::inverse(&denominator, q).map_err(|_| Error::DecryptionFailed)?)
            % q;
        combined = combined.mul(&value.pow(&coefficient, p), p);
    }
    Ok(combined)
}

impl ToBytes for PublicKey {
    fn write<W: Write>(&self, mut writer: W) -> IoResult<()> {
        self.curve.write(&mut writer)?;
        self.q.write(&mut writer)?;
        self.g.write(&mut writer)?;
        self.h.write(&mut writer)?;
        self.f.write(&mut writer)?;
        self.e_gg_alpha.write(&mut writer)?;
        writer.write_all(&[self.hash.id()])
    }
}

impl FromBytes for PublicKey {
    fn read<R: Read>(mut reader: R) -> IoResult<Self> {
        Ok(PublicKey {
            curve: EllipticCurve::read(&mut reader)?,
            q: BigUint::read(&mut reader)?,
            g: AffinePoint::read(&mut reader)?,
            h: AffinePoint::read(&mut reader)?,
            f: AffinePoint::read(&mut reader)?,
            e_gg_alpha: Fp2::read(&mut reader)?,
            hash: read_hash_id(&mut reader)?,
        })
    }
}

impl ToBytes for MasterKey {
    fn write<W: Write>(&self, mut writer: W) -> IoResult<()> {
        self.beta.write(&mut writer)?;
        self.g_alpha.write(&mut writer)
    }
}

impl FromBytes for MasterKey {
    fn read<R: Read>(mut reader: R) -> IoResult<Self> {
        Ok(MasterKey {
            beta: BigUint::read(&mut reader)?,
            g_alpha: AffinePoint::read(&mut reader)?,
        })
    }
}

impl ToBytes for SecretKey {
    fn write<W: Write>(&self, mut writer: W) -> IoResult<()> {
        self.curve.write(&mut writer)?;
        self.q.write(&mut writer)?;
        self.d.write(&mut writer)?;
        writer.write_u32::<BigEndian>(self.components.len() as u32)?;
        for (attribute, (d_j, d_j_prime)) in &self.components {
            attribute.write(&mut writer)?;
            d_j.write(&mut writer)?;
            d_j_prime.write(&mut writer)?;
        }
        Ok(())
    }
}

impl FromBytes for SecretKey {
    fn read<R: Read>(mut reader: R) -> IoResult<Self> {
        let curve = EllipticCurve::read(&mut reader)?;
        let q = BigUint::read(&mut reader)?;
        let d = AffinePoint::read(&mut reader)?;
        let count = reader.read_u32::<BigEndian>()?;
        let mut components = BTreeMap::new();
        for _ in 0..count {
            let attribute = String::read(&mut reader)?;
            let d_j = AffinePoint::read(&mut reader)?;
            let d_j_prime = AffinePoint::read(&mut reader)?;
            components.insert(attribute, (d_j, d_j_prime));
        }
        Ok(SecretKey {
            curve,
            q,
            d,
            components,
        })
    }
}

impl PolicyNode {
    fn write_to(&self, writer: &mut dyn Write) -> IoResult<()> {
        match self {
            PolicyNode::Leaf { attribute } => {
                writer.write_u8(0)?;
                attribute.write(writer)
            }
            PolicyNode::Gate {
                threshold,
                children,
            } => {
                writer.write_u8(1)?;
                writer.write_u32::<BigEndian>(*threshold as u32)?;
                writer.write_u32::<BigEndian>(children.len() as u32)?;
                for child in children {
                    child.write_to(writer)?;
                }
                Ok(())
            }
        }
    }

    fn read_from(reader: &mut dyn Read) -> IoResult<Self> {
        match reader.read_u8()? {
            0 => Ok(PolicyNode::Leaf {
                attribute: String::read(reader)?,
            }),
            1 => {
                let threshold = reader.read_u32::<BigEndian>()? as usize;
                let count = reader.read_u32::<BigEndian>()? as usize;
                let mut children = Vec::with_capacity(count.min(1024));
                for _ in 0..count {
                    children.push(PolicyNode::read_from(reader)?);
                }
                Ok(PolicyNode::Gate {
                    threshold,
                    children,
                })
            }
            _ => Err(std::io::Error::new(
                std::io::ErrorKind::InvalidData,
                "unknown policy node tag",
            )),
        }
    }
}

impl ToBytes for PolicyNode {
    fn write<W: Write>(&self, mut writer: W) -> IoResult<()> {
        self.write_to(&mut writer)
    }
}

impl FromBytes for PolicyNode {
    fn read<R: Read>(mut reader: R) -> IoResult<Self> {
        PolicyNode::read_from(&mut reader)
    }
}

impl ToBytes for CipherText {
    fn write<W: Write>(&self, mut writer: W) -> IoResult<()> {
        self.policy.root.write(&mut writer)?;
        self.c.write(&mut writer)?;
        writer.write_u32::<BigEndian>(self.blocks.len() as u32)?;
        for block in &self.blocks {
            block.write(&mut writer)?;
        }
        writer.write_u32::<BigEndian>(self.shares.len() as u32)?;
        for (id, share) in &self.shares {
            writer.write_u64::<BigEndian>(*id as u64)?;
            share.c_y.write(&mut writer)?;
            share.c_y_prime.write(&mut writer)?;
        }
        writer.write_u64::<BigEndian>(self.message_len)
    }
}

impl FromBytes for CipherText {
    fn read<R: Read>(mut reader: R) -> IoResult<Self> {
        let root = PolicyNode::read(&mut reader)?;
        let c = AffinePoint::read(&mut reader)?;
        let block_count = reader.read_u32::<BigEndian>()?;
        let mut blocks = Vec::with_capacity(block_count.min(1024) as usize);
        for _ in 0..block_count {
            blocks.push(Fp2::read(&mut reader)?);
        }
        let share_count = reader.read_u32::<BigEndian>()?;
        let mut shares = BTreeMap::new();
        for _ in 0..share_count {
            let id = reader.read_u64::<BigEndian>()? as usize;
            let c_y = AffinePoint::read(&mut reader)?;
            let c_y_prime = AffinePoint::read(&mut reader)?;
            shares.insert(id, LeafShare { c_y, c_y_prime });
        }
        let message_len = reader.read_u64::<BigEndian>()?;
        Ok(CipherText {
            policy: AccessTree::new(root),
            c,
            blocks,
            shares,
            message_len,
        })
    }
}
