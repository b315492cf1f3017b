use thiserror::Error;

/// Grammar violations found while decoding a bitmap stream
#[derive(Error, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub enum FormatError {
    /// The two first bytes are not one of `P1`, `P2`, `P4`, `P5`, `R4`
    #[error("unknown magic number {:?}", String::from_utf8_lossy(.0))]
    BadMagic([u8; 2]),
    /// No digit where an integer was expected
    #[error("expected a decimal integer, found byte {0:#04x}")]
    NotAnInteger(u8),
    /// An integer is larger than `u32::MAX`
    #[error("integer does not fit in 32 bits")]
    IntegerOverflow,
    /// A column or row count is larger than `u16::MAX`
    #[error("dimension {0} does not fit in 16 bits")]
    DimensionTooLarge(u32),
    /// A PGM maxval is zero or larger than `u16::MAX`
    #[error("maxval {0} is outside 1..=65535")]
    BadMaxval(u32),
    /// A PGM text sample is larger than the maxval
    #[error("sample {sample} is above maxval {maxval}")]
    SampleOutOfRange {
        /// sample read
        sample: u32,
        /// maxval of the header
        maxval: u32,
    },
    /// A PBM text pixel is neither `0` nor `1`
    #[error("expected '0' or '1', found byte {0:#04x}")]
    BadPbmDigit(u8),
}
