//! EXIF tag type and directory vocabulary.
//!
//! This module defines the static tables the enumerator consults:
//! - Field types, which give the unit size of a tag's value
//! - Directory names and the indexed names consumers see
//! - Tags whose value is the offset of a nested directory

use serde::Serialize;

use crate::io::ByteOrder;

// =============================================================================
// Field Types
// =============================================================================

/// EXIF field types that determine how a tag's value is encoded.
///
/// The unit size decides whether `count` units fit in the 4-byte value
/// field of an entry or live elsewhere in the block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[repr(u16)]
pub enum FieldType {
    /// Unsigned 8-bit integer
    Byte = 1,

    /// 8-bit ASCII character, NUL terminated
    Ascii = 2,

    /// Unsigned 16-bit integer
    Short = 3,

    /// Unsigned 32-bit integer
    Long = 4,

    /// Two LONGs: numerator and denominator
    Rational = 5,

    /// Signed 8-bit integer
    SByte = 6,

    /// Opaque byte data
    Undefined = 7,

    /// Signed 16-bit integer
    SShort = 8,

    /// Signed 32-bit integer
    SLong = 9,

    /// Two SLONGs: numerator and denominator
    SRational = 10,

    /// IEEE 754 single precision
    Float = 11,

    /// IEEE 754 double precision
    Double = 12,
}

impl FieldType {
    /// Maximum bytes that can be stored inline in an IFD entry.
    pub const INLINE_THRESHOLD: usize = 4;

    /// Size of a single value of this type in bytes.
    #[inline]
    pub const fn size_in_bytes(self) -> usize {
        match self {
            FieldType::Byte | FieldType::Ascii | FieldType::SByte | FieldType::Undefined => 1,
            FieldType::Short | FieldType::SShort => 2,
            FieldType::Long | FieldType::SLong | FieldType::Float => 4,
            FieldType::Rational | FieldType::SRational | FieldType::Double => 8,
        }
    }

    /// Create a FieldType from its numeric value.
    ///
    /// Returns `None` for unknown type values.
    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(FieldType::Byte),
            2 => Some(FieldType::Ascii),
            3 => Some(FieldType::Short),
            4 => Some(FieldType::Long),
            5 => Some(FieldType::Rational),
            6 => Some(FieldType::SByte),
            7 => Some(FieldType::Undefined),
            8 => Some(FieldType::SShort),
            9 => Some(FieldType::SLong),
            10 => Some(FieldType::SRational),
            11 => Some(FieldType::Float),
            12 => Some(FieldType::Double),
            _ => None,
        }
    }

    /// Upper-case name as used in the EXIF standard.
    pub const fn name(self) -> &'static str {
        match self {
            FieldType::Byte => "BYTE",
            FieldType::Ascii => "ASCII",
            FieldType::Short => "SHORT",
            FieldType::Long => "LONG",
            FieldType::Rational => "RATIONAL",
            FieldType::SByte => "SBYTE",
            FieldType::Undefined => "UNDEFINED",
            FieldType::SShort => "SSHORT",
            FieldType::SLong => "SLONG",
            FieldType::SRational => "SRATIONAL",
            FieldType::Float => "FLOAT",
            FieldType::Double => "DOUBLE",
        }
    }

    /// Check if `count` values of this type fit in the inline value field.
    #[inline]
    pub fn fits_inline(self, count: u32) -> bool {
        (self.size_in_bytes() as u64) * (count as u64) <= Self::INLINE_THRESHOLD as u64
    }
}

// =============================================================================
// TagType
// =============================================================================

/// Type descriptor handed to tag visitors.
///
/// Pairs the raw type code with the session byte order so a downstream
/// value decoder has everything it needs without going back to the
/// enumerator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TagType {
    pub type_id: u16,
    pub byte_order: ByteOrder,
}

impl TagType {
    pub fn new(type_id: u16, byte_order: ByteOrder) -> Self {
        Self {
            type_id,
            byte_order,
        }
    }

    /// The known field type, if the type code is recognized.
    pub fn field_type(&self) -> Option<FieldType> {
        FieldType::from_u16(self.type_id)
    }

    /// Unit size in bytes, if known.
    pub fn size(&self) -> Option<usize> {
        self.field_type().map(FieldType::size_in_bytes)
    }

    /// Type name, or "UNKNOWN" for unrecognized codes.
    pub fn name(&self) -> &'static str {
        self.field_type().map_or("UNKNOWN", FieldType::name)
    }
}

// =============================================================================
// Directory Names
// =============================================================================

/// Name of the standard IFD chain (IFD0, IFD1, ...)
pub const IFD_STANDARD: &str = "IFD";

/// Indexed name of the second standard IFD (thumbnail)
pub const IFD_THUMBNAIL: &str = "IFD1";

/// Name of the Exif sub-IFD
pub const IFD_EXIF: &str = "Exif";

/// Name of the GPS sub-IFD
pub const IFD_GPS: &str = "GPSInfo";

/// Name of the Interoperability sub-IFD
pub const IFD_IOP: &str = "Iop";

/// Tag in IFD0 pointing at the Exif sub-IFD
pub const TAG_EXIF_IFD_POINTER: u16 = 0x8769;

/// Tag in IFD0 pointing at the GPS sub-IFD
pub const TAG_GPS_IFD_POINTER: u16 = 0x8825;

/// Tag in the Exif IFD pointing at the Interoperability sub-IFD
pub const TAG_IOP_IFD_POINTER: u16 = 0xA005;

/// Resolve a directory name and chain index to the name visitors see.
///
/// Returns `None` for directories we don't have a schema for. Their tags are
/// still decoded structurally, but never handed to a visitor.
pub fn indexed_ifd_name(ifd_name: &str, ifd_index: usize) -> Option<&'static str> {
    match (ifd_name, ifd_index) {
        (IFD_STANDARD, 0) => Some(IFD_STANDARD),
        (IFD_STANDARD, 1) => Some(IFD_THUMBNAIL),
        (IFD_EXIF, 0) => Some(IFD_EXIF),
        (IFD_GPS, 0) => Some(IFD_GPS),
        (IFD_IOP, 0) => Some(IFD_IOP),
        _ => None,
    }
}

/// Map a tag ID to the name of the directory its value points at.
///
/// Returns `None` for ordinary tags.
pub fn child_ifd_name(tag_id: u16) -> Option<&'static str> {
    match tag_id {
        TAG_EXIF_IFD_POINTER => Some(IFD_EXIF),
        TAG_GPS_IFD_POINTER => Some(IFD_GPS),
        TAG_IOP_IFD_POINTER => Some(IFD_IOP),
        _ => None,
    }
}

// =============================================================================
// Tests
// =============================================================================
