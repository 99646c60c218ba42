//! Bit-field codec - narrow integer fields packed into 32/64-bit words
//!
//! Fields are laid out least-significant-first: the first field occupies
//! bits `[0, w0)`, the second `[w0, w0 + w1)`, and so on.
//!
//! Values are masked to their declared width before insertion. A value that
//! does not fit silently loses its high bits; only the aggregate width is
//! checked against the word capacity.
//!
//! ## Two entry-point families
//!
//! - **Fail-fast**: `pack`, `unpack`, `pack_to_long`, `unpack_from_long`,
//!   `pack_fields`, `unpack_fields`. The error kind is the failure; callers
//!   treat it as a programming error and propagate with `?`.
//! - **Result-typed**: `pack_ints`, `unpack_ints`. Built for widths read at
//!   runtime; the error carries a descriptive message to inspect.
//!
//! Both families go through the same `pack_core` / `unpack_core` pair, so
//! the bit layout cannot diverge between them.

use crate::error::CodecError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Widest field accepted by the byte-oriented `pack`/`unpack`.
pub const MAX_BYTE_WIDTH: u32 = 8;

/// Result of the recoverable codec entry points.
pub type PackResult<T> = Result<T, CodecError>;

/// Supported word capacities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum WordWidth {
    W32,
    W64,
}

impl WordWidth {
    /// Capacity in bits.
    #[inline]
    pub const fn bits(self) -> u32 {
        match self {
            WordWidth::W32 => 32,
            WordWidth::W64 => 64,
        }
    }
}

/// A `(value, width)` pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BitField {
    pub value: u64,
    pub width: u32,
}

impl BitField {
    pub const fn new(value: u64, width: u32) -> Self {
        Self { value, width }
    }
}

impl From<(u64, u32)> for BitField {
    fn from((value, width): (u64, u32)) -> Self {
        Self::new(value, width)
    }
}

/// Mask covering the low `width` bits.
#[inline]
pub const fn mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

// =========================================================================
// SHARED CORE
// =========================================================================

/// Validate every width and the aggregate against `capacity`.
///
/// Returns the total width on success.
fn check_widths<W>(widths: W, max_width: u32, capacity: WordWidth) -> Result<u64, CodecError>
where
    W: IntoIterator<Item = u32>,
{
    let mut total = 0u64;
    for width in widths {
        if width == 0 || width > max_width {
            return Err(CodecError::InvalidBitWidth {
                width,
                max: max_width,
            });
        }
        total += u64::from(width);
        // Stop at the first field that no longer fits.
        if total > u64::from(capacity.bits()) {
            return Err(CodecError::CapacityExceeded {
                required: total,
                capacity: capacity.bits(),
            });
        }
    }
    Ok(total)
}

/// Check `count` fields of `bit_width` bits each without walking them.
fn check_uniform(bit_width: u32, count: usize, max_width: u32, capacity: WordWidth) -> Result<(), CodecError> {
    if bit_width == 0 || bit_width > max_width {
        return Err(CodecError::InvalidBitWidth {
            width: bit_width,
            max: max_width,
        });
    }
    let required = u64::try_from(count)
        .ok()
        .and_then(|count| count.checked_mul(u64::from(bit_width)))
        .unwrap_or(u64::MAX);
    if required > u64::from(capacity.bits()) {
        return Err(CodecError::CapacityExceeded {
            required,
            capacity: capacity.bits(),
        });
    }
    Ok(())
}

fn pack_core<F>(fields: F, max_width: u32, capacity: WordWidth) -> Result<u64, CodecError>
where
    F: IntoIterator<Item = (u64, u32)>,
    F::IntoIter: Clone,
{
    let fields = fields.into_iter();
    check_widths(fields.clone().map(|(_, width)| width), max_width, capacity)?;

    let mut packed = 0u64;
    let mut offset = 0u32;
    for (value, width) in fields {
        packed = insert_field(packed, offset, width, value);
        offset += width;
    }
    Ok(packed)
}

fn unpack_core<W>(packed: u64, widths: W, max_width: u32, capacity: WordWidth) -> Result<Vec<u64>, CodecError>
where
    W: IntoIterator<Item = u32>,
    W::IntoIter: Clone,
{
    let widths = widths.into_iter();
    check_widths(widths.clone(), max_width, capacity)?;

    let mut values = Vec::with_capacity(widths.size_hint().0);
    let mut offset = 0u32;
    for width in widths {
        values.push(extract_field(packed, offset, width));
        offset += width;
    }
    Ok(values)
}

// =========================================================================
// FAIL-FAST API
// =========================================================================

/// Pack byte-range values into a 32-bit word, `bit_width` bits each.
///
/// Fails with `InvalidBitWidth` unless `1 <= bit_width <= 8`, and with
/// `CapacityExceeded` when `values.len() * bit_width > 32`.
pub fn pack(values: &[i8], bit_width: u32) -> Result<u32, CodecError> {
    check_uniform(bit_width, values.len(), MAX_BYTE_WIDTH, WordWidth::W32)?;
    let fields = values.iter().map(move |&v| (u64::from(v as u8), bit_width));
    let packed = pack_core(fields, MAX_BYTE_WIDTH, WordWidth::W32)?;
    Ok(packed as u32)
}

/// Unpack `count` values of `bit_width` bits each from a 32-bit word.
///
/// Each slice is read unsigned and narrowed to a byte.
pub fn unpack(packed: u32, bit_width: u32, count: usize) -> Result<Vec<i8>, CodecError> {
    check_uniform(bit_width, count, MAX_BYTE_WIDTH, WordWidth::W32)?;
    let widths = std::iter::repeat(bit_width).take(count);
    let values = unpack_core(u64::from(packed), widths, MAX_BYTE_WIDTH, WordWidth::W32)?;
    Ok(values.into_iter().map(|v| v as u8 as i8).collect())
}

/// Pack integers into a 64-bit word, `bit_width` bits each.
pub fn pack_to_long(values: &[i64], bit_width: u32) -> Result<u64, CodecError> {
    check_uniform(bit_width, values.len(), WordWidth::W64.bits(), WordWidth::W64)?;
    let fields = values.iter().map(move |&v| (v as u64, bit_width));
    pack_core(fields, WordWidth::W64.bits(), WordWidth::W64)
}

/// Unpack `count` values of `bit_width` bits each from a 64-bit word.
pub fn unpack_from_long(packed: u64, bit_width: u32, count: usize) -> Result<Vec<i64>, CodecError> {
    check_uniform(bit_width, count, WordWidth::W64.bits(), WordWidth::W64)?;
    let widths = std::iter::repeat(bit_width).take(count);
    let values = unpack_core(packed, widths, WordWidth::W64.bits(), WordWidth::W64)?;
    Ok(values.into_iter().map(|v| v as i64).collect())
}

/// Pack variable-width fields into a 64-bit word.
pub fn pack_fields(fields: &[BitField]) -> Result<u64, CodecError> {
    let fields = fields.iter().map(|f| (f.value, f.width));
    pack_core(fields, WordWidth::W64.bits(), WordWidth::W64)
}

/// Inverse of [`pack_fields`]: one value per declared width.
pub fn unpack_fields(packed: u64, widths: &[u32]) -> Result<Vec<u64>, CodecError> {
    unpack_core(packed, widths.iter().copied(), WordWidth::W64.bits(), WordWidth::W64)
}

/// Read the `width` bits starting at bit `offset`.
///
/// No range checks: bits past the end of the word read as zero.
#[inline]
pub fn extract_field(packed: u64, offset: u32, width: u32) -> u64 {
    packed.checked_shr(offset).unwrap_or(0) & mask(width)
}

/// Replace the `width` bits starting at bit `offset` with `value`.
///
/// `value` is masked to `width` bits; bits shifted past bit 63 are dropped.
#[inline]
pub fn insert_field(packed: u64, offset: u32, width: u32, value: u64) -> u64 {
    let field_mask = mask(width).checked_shl(offset).unwrap_or(0);
    let bits = (value & mask(width)).checked_shl(offset).unwrap_or(0);
    (packed & !field_mask) | bits
}

// =========================================================================
// RESULT-TYPED API
// =========================================================================

/// Pack `values[i]` into `bit_widths[i]` bits, least-significant-first.
///
/// Fails when the slices differ in length ("must match number of bit
/// widths") or the widths sum past 64 ("exceeds 64-bit limit").
pub fn pack_ints(values: &[u64], bit_widths: &[u32]) -> PackResult<u64> {
    if values.len() != bit_widths.len() {
        return Err(CodecError::LengthMismatch {
            values: values.len(),
            widths: bit_widths.len(),
        });
    }
    let fields = values.iter().copied().zip(bit_widths.iter().copied());
    pack_core(fields, WordWidth::W64.bits(), WordWidth::W64)
}

/// Decode one value per entry of `bit_widths`.
pub fn unpack_ints(packed: u64, bit_widths: &[u32]) -> PackResult<Vec<u64>> {
    unpack_core(packed, bit_widths.iter().copied(), WordWidth::W64.bits(), WordWidth::W64)
}
