use crate::rom::types::AttributeKey;

/// Errors that can occur while editing ROM attributes or contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RomError {
    /// The value's type does not fit the attribute it was assigned to.
    #[error("value does not match the type of attribute `{key}`")]
    TypeMismatch { key: AttributeKey },
    /// Bit width outside the range accepted for the attribute.
    #[error("bit width {width} is outside the supported range {min}..={max}")]
    WidthOutOfRange { width: u8, min: u8, max: u8 },
    /// Replacement contents do not have the set's current shape.
    #[error(
        "contents shaped {addr_bits}x{data_bits} do not fit attributes shaped {expected_addr_bits}x{expected_data_bits}"
    )]
    ShapeMismatch {
        addr_bits: u8,
        data_bits: u8,
        expected_addr_bits: u8,
        expected_data_bits: u8,
    },
    /// Cell address or range exceeds the image bounds.
    #[error("address {addr:#x} is outside a memory of {len} cells")]
    AddressOutOfRange { addr: u32, len: u32 },
    /// Operation attempted with zero length.
    #[error("operation attempted with zero length")]
    ZeroLength,
}
