/// Failures surfaced by field, curve and pairing arithmetic, and by the
/// bounded parameter-generation searches.
///
/// Generation errors carry the attempt cap that was exhausted.
#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    #[error("element is not invertible modulo the given prime")]
    NonInvertible,

    #[error("no curve point found within {0} attempts")]
    PointGeneration(usize),

    #[error("no Solinas prime found within {0} attempts")]
    SolinasGeneration(usize),

    #[error("no matching field prime found within {0} attempts")]
    PrimalityTest(usize),

    #[error("degenerate input to the Tate pairing")]
    PairingDegenerate,
}

pub type Result<T> = std::result::Result<T, Error>;
