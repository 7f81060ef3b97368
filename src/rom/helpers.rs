//! Width limits and address arithmetic shared by content images and
//! attribute sets.

use crate::rom::{BitWidth, RomError};

/// Narrowest address bus a ROM accepts.
pub const MIN_ADDR_BITS: u8 = 2;
/// Widest address bus a ROM accepts.
pub const MAX_ADDR_BITS: u8 = 24;
/// Narrowest data bus.
pub const MIN_DATA_BITS: u8 = 1;
/// Widest data bus.
pub const MAX_DATA_BITS: u8 = 32;

/// Page size of a content image, as a power of two.
pub(crate) const PAGE_BITS: u8 = 12;

/// Mask selecting the low `bits` bits of a cell value.
///
/// # Example
/// ```
/// use rom_contents::rom::helpers::value_mask;
///
/// assert_eq!(value_mask(4), 0xF);
/// assert_eq!(value_mask(32), u32::MAX);
/// ```
#[inline]
pub fn value_mask(bits: u8) -> u32 {
    if bits >= 32 {
        u32::MAX
    } else {
        (1u32 << bits) - 1
    }
}

/// Validates that `width` is usable as a ROM address width.
///
/// # Errors
/// * [`RomError::WidthOutOfRange`] - if `width` is outside `2..=24`
pub fn check_address_width(width: BitWidth) -> Result<BitWidth, RomError> {
    let bits = width.width();
    if !(MIN_ADDR_BITS..=MAX_ADDR_BITS).contains(&bits) {
        return Err(RomError::WidthOutOfRange {
            width: bits,
            min: MIN_ADDR_BITS,
            max: MAX_ADDR_BITS,
        });
    }
    Ok(width)
}

/// Number of cells addressed by `addr_bits` address lines.
#[inline]
pub fn cell_count(addr_bits: u8) -> u32 {
    1u32 << addr_bits
}

/// Calculates the cell range `(start, end)` for an address and length.
///
/// End is exclusive.
///
/// # Errors
/// * [`RomError::ZeroLength`] - if `len` is 0
/// * [`RomError::AddressOutOfRange`] - if the range exceeds `total` cells
///
/// # Example
/// ```
/// use rom_contents::rom::{RomError, helpers::range_span};
///
/// assert_eq!(range_span(4, 4, 16), Ok((4, 8)));
/// assert_eq!(
///     range_span(14, 4, 16),
///     Err(RomError::AddressOutOfRange { addr: 14, len: 16 })
/// );
/// ```
pub fn range_span(addr: u32, len: usize, total: u32) -> Result<(u32, u32), RomError> {
    if len == 0 {
        return Err(RomError::ZeroLength);
    }

    let out_of_range = RomError::AddressOutOfRange { addr, len: total };
    let len = u32::try_from(len).map_err(|_| out_of_range)?;
    let end = addr.checked_add(len).ok_or(out_of_range)?;

    if end > total {
        return Err(out_of_range);
    }

    Ok((addr, end))
}

/// Cells held by one page of an image with `addr_bits` address lines.
#[inline]
pub(crate) fn page_len(addr_bits: u8) -> usize {
    1usize << addr_bits.min(PAGE_BITS)
}

/// Pages needed by an image with `addr_bits` address lines.
#[inline]
pub(crate) fn page_count(addr_bits: u8) -> usize {
    1usize << addr_bits.saturating_sub(PAGE_BITS)
}

/// Splits a cell address into `(page, offset)`.
#[inline]
pub(crate) fn page_index(addr: u32) -> (usize, usize) {
    let addr = addr as usize;
    (addr >> PAGE_BITS, addr & ((1usize << PAGE_BITS) - 1))
}

#[test]
fn range_span_edge_cases() {
    // Zero length
    assert_eq!(range_span(0, 0, 16), Err(RomError::ZeroLength));

    // Out of bounds
    assert_eq!(
        range_span(15, 2, 16),
        Err(RomError::AddressOutOfRange { addr: 15, len: 16 })
    );
    assert_eq!(
        range_span(u32::MAX, 2, 16),
        Err(RomError::AddressOutOfRange {
            addr: u32::MAX,
            len: 16
        })
    );

    // Last cell
    assert_eq!(range_span(15, 1, 16), Ok((15, 16)));

    // Whole image
    assert_eq!(range_span(0, 16, 16), Ok((0, 16)));
}

#[test]
fn page_geometry() {
    // Small images fit in a single short page
    assert_eq!(page_len(8), 256);
    assert_eq!(page_count(8), 1);

    // Large images split into full pages
    assert_eq!(page_len(16), 4096);
    assert_eq!(page_count(16), 16);

    assert_eq!(page_index(0x1003), (1, 3));
    assert_eq!(cell_count(24), 1 << 24);
}

#[test]
fn address_width_limits() {
    assert!(check_address_width(BitWidth::new(1).unwrap()).is_err());
    assert!(check_address_width(BitWidth::new(2).unwrap()).is_ok());
    assert!(check_address_width(BitWidth::new(24).unwrap()).is_ok());
    assert_eq!(
        check_address_width(BitWidth::new(25).unwrap()),
        Err(RomError::WidthOutOfRange {
            width: 25,
            min: 2,
            max: 24
        })
    );
}
