//! Length-prefixed big-endian wire encoding for the public artifacts.
//!
//! Big integers serialize as a `u32` octet count followed by the minimal
//! big-endian magnitude; affine points carry a one-octet is-infinity tag in
//! front of their coordinates. Readers reject nothing beyond structural
//! truncation, leaving semantic validation to the protocol layer.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use num_bigint::BigUint;
use std::io::{Read, Result as IoResult, Write};

pub trait ToBytes {
    fn write<W: Write>(&self, writer: W) -> IoResult<()>;
}

pub trait FromBytes: Sized {
    fn read<R: Read>(reader: R) -> IoResult<Self>;
}

impl ToBytes for BigUint {
    fn write<W: Write>(&self, mut writer: W) -> IoResult<()> {
        let bytes = self.to_bytes_be();
        writer.write_u32::<BigEndian>(bytes.len() as u32)?;
        writer.write_all(&bytes)
    }
}

impl FromBytes for BigUint {
    fn read<R: Read>(mut reader: R) -> IoResult<Self> {
        let len = reader.read_u32::<BigEndian>()? as usize;
        let mut bytes = vec![0u8; len];
        reader.read_exact(&mut bytes)?;
        Ok(BigUint::from_bytes_be(&bytes))
    }
}

impl ToBytes for Vec<u8> {
    fn write<W: Write>(&self, mut writer: W) -> IoResult<()> {
        writer.write_u32::<BigEndian>(self.len() as u32)?;
        writer.write_all(self)
    }
}

impl FromBytes for Vec<u8> {
    fn read<R: Read>(mut reader: R) -> IoResult<Self> {
        let len = reader.read_u32::<BigEndian>()? as usize;
        let mut bytes = vec![0u8; len];
        reader.read_exact(&mut bytes)?;
        Ok(bytes)
    }
}

impl ToBytes for String {
    fn write<W: Write>(&self, mut writer: W) -> IoResult<()> {
        self.as_bytes().to_vec().write(&mut writer)
    }
}

impl FromBytes for String {
    fn read<R: Read>(reader: R) -> IoResult<Self> {
        let bytes = Vec::<u8>::read(reader)?;
        String::from_utf8(bytes)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }
}

impl ToBytes for crate::fields::Fp2 {
    fn write<W: Write>(&self, mut writer: W) -> IoResult<()> {
        self.c0.write(&mut writer)?;
        self.c1.write(&mut writer)
    }
}

impl FromBytes for crate::fields::Fp2 {
    fn read<R: Read>(mut reader: R) -> IoResult<Self> {
        let c0 = BigUint::read(&mut reader)?;
        let c1 = BigUint::read(&mut reader)?;
        Ok(crate::fields::Fp2::new(c0, c1))
    }
}

impl ToBytes for crate::curves::AffinePoint {
    fn write<W: Write>(&self, mut writer: W) -> IoResult<()> {
        writer.write_u8(self.infinity as u8)?;
        if !self.infinity {
            self.x.write(&mut writer)?;
            self.y.write(&mut writer)?;
        }
        Ok(())
    }
}

impl FromBytes for crate::curves::AffinePoint {
    fn read<R: Read>(mut reader: R) -> IoResult<Self> {
        if reader.read_u8()? != 0 {
            return Ok(crate::curves::AffinePoint::zero());
        }
        let x = BigUint::read(&mut reader)?;
        let y = BigUint::read(&mut reader)?;
        Ok(crate::curves::AffinePoint::new(x, y))
    }
}

impl ToBytes for crate::curves::EllipticCurve {
    fn write<W: Write>(&self, mut writer: W) -> IoResult<()> {
        self.a.write(&mut writer)?;
        self.b.write(&mut writer)?;
        self.p.write(&mut writer)
    }
}

impl FromBytes for crate::curves::EllipticCurve {
    fn read<R: Read>(mut reader: R) -> IoResult<Self> {
        let a = BigUint::read(&mut reader)?;
        let b = BigUint::read(&mut reader)?;
        let p = BigUint::read(&mut reader)?;
        Ok(crate::curves::EllipticCurve::new(a, b, p))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::AffinePoint;
    use crate::fields::Fp2;

    fn round_trip<T: ToBytes + FromBytes + PartialEq + std::fmt::Debug>(value: &T) {
        let mut buffer = Vec::new();
        value.write(&mut buffer).unwrap();
        let back = T::read(&buffer[..]).unwrap();
        assert_eq!(&back, value);
    }

    #[test]
    fn big_integers_round_trip() {
        round_trip(&BigUint::from(0u32));
        round_trip(&BigUint::from(1u32));
        round_trip(&BigUint::parse_bytes(b"123456789012345678901234567890", 10).unwrap());
    }

    #[test]
    fn points_round_trip() {
        round_trip(&AffinePoint::zero());
        round_trip(&AffinePoint::new(
            BigUint::from(28u32),
            BigUint::from(51u32),
        ));
    }

    #[test]
    fn extension_elements_round_trip() {
        round_trip(&Fp2::new(BigUint::from(42u32), BigUint::from(40u32)));
    }

    #[test]
    fn truncated_input_is_rejected() {
        let mut buffer = Vec::new();
        BigUint::from(123456u32).write(&mut buffer).unwrap();
        assert!(BigUint::read(&buffer[..buffer.len() - 1]).is_err());
    }
}

