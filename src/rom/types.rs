use strum::{AsRefStr, Display, EnumCount, EnumIter, EnumString};

use crate::rom::{
    ContentsRef, RomError,
    helpers::{MAX_DATA_BITS, MIN_DATA_BITS, value_mask},
};

/// Number of bits carried by a bus or addressed by a memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BitWidth(u8);

impl BitWidth {
    /// Creates a width of `bits`, which must lie in `1..=32`.
    pub fn new(bits: u8) -> Result<Self, RomError> {
        if !(MIN_DATA_BITS..=MAX_DATA_BITS).contains(&bits) {
            return Err(RomError::WidthOutOfRange {
                width: bits,
                min: MIN_DATA_BITS,
                max: MAX_DATA_BITS,
            });
        }
        Ok(Self(bits))
    }

    /// Caller guarantees `bits` is in range.
    pub(crate) const fn from_raw(bits: u8) -> Self {
        Self(bits)
    }

    /// Number of bits.
    #[inline]
    pub const fn width(self) -> u8 {
        self.0
    }

    /// Mask selecting the low `width()` bits of a cell value.
    #[inline]
    pub fn mask(self) -> u32 {
        value_mask(self.0)
    }
}

/// Which chip-select level enables the memory.
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumIter, EnumString,
)]
pub enum SelectionPolicy {
    #[default]
    #[strum(serialize = "low")]
    Low,
    #[strum(serialize = "high")]
    High,
}

/// Keys of the attributes exposed by a ROM component.
///
/// Declaration order is the order reported by
/// [`MemoryAttributeSet::attributes`](crate::rom::MemoryAttributeSet::attributes).
/// The string forms are the names used by the attribute framework.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, AsRefStr, Display, EnumCount, EnumIter, EnumString,
)]
pub enum AttributeKey {
    #[strum(serialize = "addrWidth")]
    AddressWidth,
    #[strum(serialize = "dataWidth")]
    DataWidth,
    #[strum(serialize = "contents")]
    Contents,
    #[strum(serialize = "select")]
    Selection,
}

/// Value stored under an [`AttributeKey`].
///
/// Equality on [`AttributeValue::Contents`] is identity of the image, not
/// equality of its cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    Width(BitWidth),
    Contents(ContentsRef),
    Selection(SelectionPolicy),
}

impl From<BitWidth> for AttributeValue {
    fn from(width: BitWidth) -> Self {
        AttributeValue::Width(width)
    }
}

impl From<ContentsRef> for AttributeValue {
    fn from(contents: ContentsRef) -> Self {
        AttributeValue::Contents(contents)
    }
}

impl From<SelectionPolicy> for AttributeValue {
    fn from(selection: SelectionPolicy) -> Self {
        AttributeValue::Selection(selection)
    }
}
