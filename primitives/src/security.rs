//! RFC 5091 security levels.

use crate::hash::HashFunction;
use serde::{Deserialize, Serialize};

/// Selects the subgroup order size, field prime size and hash function.
///
/// `Lowest` (SHA-1, 160/512 bits) exists for interoperability with legacy
/// deployments only.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SecurityLevel {
    Lowest,
    Low,
    Medium,
    High,
    Highest,
}

impl SecurityLevel {
    /// Bit length of the Solinas subgroup order q.
    pub fn q_bits(self) -> u64 {
        match self {
            SecurityLevel::Lowest => 160,
            SecurityLevel::Low => 224,
            SecurityLevel::Medium => 256,
            SecurityLevel::High => 384,
            SecurityLevel::Highest => 512,
        }
    }

    /// Bit length of the field prime p.
    pub fn p_bits(self) -> u64 {
        match self {
            SecurityLevel::Lowest => 512,
            SecurityLevel::Low => 1024,
            SecurityLevel::Medium => 1536,
            SecurityLevel::High => 3840,
            SecurityLevel::Highest => 7680,
        }
    }

    pub fn hash(self) -> HashFunction {
        match self {
            SecurityLevel::Lowest => HashFunction::Sha1,
            SecurityLevel::Low => HashFunction::Sha224,
            SecurityLevel::Medium => HashFunction::Sha256,
            SecurityLevel::High => HashFunction::Sha384,
            SecurityLevel::Highest => HashFunction::Sha512,
        }
    }
}
