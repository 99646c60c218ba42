//! Named bit layouts - a validated schema over the codec
//!
//! A layout is checked once at construction; afterwards every pack, unpack
//! and field access uses the offsets it computed. Offsets follow the codec's
//! least-significant-first order, so a layout packs exactly like
//! [`pack_fields`](crate::codec::pack_fields) over the same widths.

use crate::codec::{self, WordWidth};
use crate::error::CodecError;
use std::collections::HashSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One named field of a layout.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FieldSpec {
    pub name: String,
    pub width: u32,
}

impl FieldSpec {
    pub fn new(name: impl Into<String>, width: u32) -> Self {
        Self {
            name: name.into(),
            width,
        }
    }
}

/// Ordered, validated set of named fields fitting in a 64-bit word.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "Vec<FieldSpec>", into = "Vec<FieldSpec>"))]
pub struct BitLayout {
    fields: Vec<FieldSpec>,
    offsets: Vec<u32>,
    total_width: u32,
}

impl BitLayout {
    /// Build a layout, rejecting empty or duplicate names, zero widths and
    /// totals past 64 bits.
    pub fn new(fields: Vec<FieldSpec>) -> Result<Self, CodecError> {
        {
            let mut seen = HashSet::with_capacity(fields.len());
            for field in &fields {
                if field.name.is_empty() {
                    return Err(CodecError::EmptyFieldName);
                }
                if !seen.insert(field.name.as_str()) {
                    return Err(CodecError::DuplicateField(field.name.clone()));
                }
            }
        }

        // Width checks go through the codec so both report the same errors.
        let widths: Vec<u32> = fields.iter().map(|f| f.width).collect();
        codec::unpack_fields(0, &widths)?;

        let mut offsets = Vec::with_capacity(fields.len());
        let mut offset = 0u32;
        for width in &widths {
            offsets.push(offset);
            offset += width;
        }

        Ok(Self {
            fields,
            offsets,
            total_width: offset,
        })
    }

    /// Build a layout from `(name, width)` pairs.
    pub fn from_pairs<S: Into<String>>(
        pairs: impl IntoIterator<Item = (S, u32)>,
    ) -> Result<Self, CodecError> {
        Self::new(
            pairs
                .into_iter()
                .map(|(name, width)| FieldSpec::new(name, width))
                .collect(),
        )
    }

    // =========================================================================
    // ACCESSORS
    // =========================================================================

    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Sum of all field widths.
    pub fn total_width(&self) -> u32 {
        self.total_width
    }

    /// Smallest word that holds the layout.
    pub fn word_width(&self) -> WordWidth {
        if self.total_width <= WordWidth::W32.bits() {
            WordWidth::W32
        } else {
            WordWidth::W64
        }
    }

    /// Bit offset of a field.
    pub fn offset_of(&self, name: &str) -> Option<u32> {
        self.index_of(name).map(|i| self.offsets[i])
    }

    fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    fn locate(&self, name: &str) -> Result<(u32, u32), CodecError> {
        self.index_of(name)
            .map(|i| (self.offsets[i], self.fields[i].width))
            .ok_or_else(|| CodecError::UnknownField(name.to_string()))
    }

    // =========================================================================
    // PACKING
    // =========================================================================

    /// Pack one value per field, in declaration order.
    pub fn pack(&self, values: &[u64]) -> Result<u64, CodecError> {
        let widths: Vec<u32> = self.fields.iter().map(|f| f.width).collect();
        codec::pack_ints(values, &widths)
    }

    /// Unpack one value per field, in declaration order.
    pub fn unpack(&self, packed: u64) -> Vec<u64> {
        self.fields
            .iter()
            .zip(&self.offsets)
            .map(|(field, &offset)| codec::extract_field(packed, offset, field.width))
            .collect()
    }

    /// Read a single named field.
    pub fn get(&self, packed: u64, name: &str) -> Result<u64, CodecError> {
        let (offset, width) = self.locate(name)?;
        Ok(codec::extract_field(packed, offset, width))
    }

    /// Return `packed` with one named field replaced (value masked to width).
    pub fn set(&self, packed: u64, name: &str, value: u64) -> Result<u64, CodecError> {
        let (offset, width) = self.locate(name)?;
        Ok(codec::insert_field(packed, offset, width, value))
    }
}

impl TryFrom<Vec<FieldSpec>> for BitLayout {
    type Error = CodecError;

    fn try_from(fields: Vec<FieldSpec>) -> Result<Self, Self::Error> {
        Self::new(fields)
    }
}

impl From<BitLayout> for Vec<FieldSpec> {
    fn from(layout: BitLayout) -> Self {
        layout.fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header() -> BitLayout {
        BitLayout::from_pairs([("version", 2), ("kind", 3), ("flags", 4), ("length", 5)]).unwrap()
    }

    #[test]
    fn test_offsets() {
        let layout = header();
        assert_eq!(layout.len(), 4);
        assert_eq!(layout.total_width(), 14);
        assert_eq!(layout.word_width(), WordWidth::W32);
        assert_eq!(layout.offset_of("version"), Some(0));
        assert_eq!(layout.offset_of("kind"), Some(2));
        assert_eq!(layout.offset_of("flags"), Some(5));
        assert_eq!(layout.offset_of("length"), Some(9));
        assert_eq!(layout.offset_of("missing"), None);
    }

    #[test]
    fn test_matches_pack_fields() {
        let layout = header();
        let packed = layout.pack(&[3, 5, 9, 15]).unwrap();
        let fields = [(3, 2), (5, 3), (9, 4), (15, 5)].map(codec::BitField::from);
        assert_eq!(packed, codec::pack_fields(&fields).unwrap());
        assert_eq!(layout.unpack(packed), vec![3, 5, 9, 15]);
    }

    #[test]
    fn test_get_set() {
        let layout = header();
        let packed = layout.pack(&[1, 2, 3, 4]).unwrap();
        assert_eq!(layout.get(packed, "flags").unwrap(), 3);

        let packed = layout.set(packed, "flags", 0xA).unwrap();
        assert_eq!(layout.unpack(packed), vec![1, 2, 0xA, 4]);

        // masked to 2 bits
        let packed = layout.set(packed, "version", 0b110).unwrap();
        assert_eq!(layout.get(packed, "version").unwrap(), 0b10);

        assert_eq!(
            layout.get(packed, "nope").unwrap_err(),
            CodecError::UnknownField("nope".into())
        );
    }

    #[test]
    fn test_invalid_layouts() {
        assert_eq!(
            BitLayout::from_pairs([("a", 4), ("a", 4)]).unwrap_err(),
            CodecError::DuplicateField("a".into())
        );
        assert_eq!(
            BitLayout::from_pairs([("", 4)]).unwrap_err(),
            CodecError::EmptyFieldName
        );
        assert!(matches!(
            BitLayout::from_pairs([("a", 0)]).unwrap_err(),
            CodecError::InvalidBitWidth { width: 0, .. }
        ));
        let err = BitLayout::from_pairs([("a", 40), ("b", 40)]).unwrap_err();
        assert!(err.message().contains("exceeds 64-bit limit"));
    }

    #[test]
    fn test_pack_length_mismatch() {
        let err = header().pack(&[1, 2]).unwrap_err();
        assert!(matches!(err, CodecError::LengthMismatch { values: 2, widths: 4 }));
    }

    #[test]
    fn test_wide_layout() {
        let layout = BitLayout::from_pairs([("lo", 32), ("hi", 32)]).unwrap();
        assert_eq!(layout.word_width(), WordWidth::W64);
        let packed = layout.pack(&[0xDEAD_BEEF, 0xCAFE_F00D]).unwrap();
        assert_eq!(packed, 0xCAFE_F00D_DEAD_BEEF);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_schema() {
        let json = r#"[{"name":"a","width":4},{"name":"b","width":12}]"#;
        let layout: BitLayout = serde_json::from_str(json).unwrap();
        assert_eq!(layout.offset_of("b"), Some(4));
        assert_eq!(serde_json::to_string(&layout).unwrap(), json);

        let bad = r#"[{"name":"a","width":40},{"name":"b","width":40}]"#;
        assert!(serde_json::from_str::<BitLayout>(bad).is_err());
    }
}
