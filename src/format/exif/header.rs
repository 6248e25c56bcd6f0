//! TIFF header parsing for EXIF blocks.
//!
//! An EXIF block is a small TIFF file, optionally preceded by the 6-byte
//! `Exif\0\0` preamble that APP1 segments carry. Every IFD and value offset
//! in the block is measured from the start of the TIFF header (the "top
//! offset"), not from the start of the block.
//!
//! # Layout
//!
//! ```text
//! [Exif\0\0]           optional preamble (6 bytes)
//! Bytes 0-1: Byte order (0x4949 = little-endian "II", 0x4D4D = big-endian "MM")
//! Bytes 2-3: Version (42 = 0x002A)
//! Bytes 4-7: Offset to the root IFD (4 bytes)
//! ```

use serde::Serialize;

use crate::error::HeaderError;
use crate::io::ByteOrder;

// =============================================================================
// Constants
// =============================================================================

/// Preamble carried by EXIF blocks extracted from JPEG APP1 segments
pub const EXIF_PREAMBLE: &[u8; 6] = b"Exif\0\0";

/// Offset of the TIFF header when the preamble is present
pub const EXIF_TOP_OFFSET: usize = 6;

/// Size of the TIFF header in bytes
pub const TIFF_HEADER_SIZE: usize = 8;

/// Magic bytes indicating little-endian byte order ("II" for Intel)
const BYTE_ORDER_LITTLE_ENDIAN: u16 = 0x4949;

/// Magic bytes indicating big-endian byte order ("MM" for Motorola)
const BYTE_ORDER_BIG_ENDIAN: u16 = 0x4D4D;

/// Version number for TIFF
const VERSION_TIFF: u16 = 42;

// =============================================================================
// ExifHeader
// =============================================================================

/// Parsed header of an EXIF block.
///
/// Carries what the enumerator needs to start walking directories:
/// - Byte order for every subsequent read
/// - Where the TIFF header starts (all offsets are relative to it)
/// - Location of the root IFD
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExifHeader {
    /// Byte order for all multi-byte values in the block
    pub byte_order: ByteOrder,

    /// Position of the TIFF header within the block
    pub top_offset: usize,

    /// Offset of the root IFD, relative to `top_offset`
    pub root_ifd_offset: u32,
}

impl ExifHeader {
    /// Parse the header of an EXIF block.
    ///
    /// The block may start with the `Exif\0\0` preamble or directly with the
    /// TIFF byte order mark.
    ///
    /// # Errors
    /// - `TooSmall` if there aren't enough bytes for the header
    /// - `InvalidMagic` if byte order bytes are not II or MM
    /// - `InvalidVersion` if version is not 42
    /// - `InvalidIfdOffset` if the root IFD offset is outside the block
    pub fn parse(data: &[u8]) -> Result<Self, HeaderError> {
        let top_offset = if data.starts_with(EXIF_PREAMBLE) {
            EXIF_TOP_OFFSET
        } else {
            0
        };

        let required = top_offset + TIFF_HEADER_SIZE;
        if data.len() < required {
            return Err(HeaderError::TooSmall {
                required,
                actual: data.len(),
            });
        }

        let tiff = &data[top_offset..];

        // Checked as little-endian because we're matching fixed byte patterns
        let magic = u16::from_le_bytes([tiff[0], tiff[1]]);
        let byte_order = match magic {
            BYTE_ORDER_LITTLE_ENDIAN => ByteOrder::LittleEndian,
            BYTE_ORDER_BIG_ENDIAN => ByteOrder::BigEndian,
            _ => return Err(HeaderError::InvalidMagic(magic)),
        };

        let version = byte_order.u16_from([tiff[2], tiff[3]]);
        if version != VERSION_TIFF {
            return Err(HeaderError::InvalidVersion(version));
        }

        let root_ifd_offset = byte_order.u32_from([tiff[4], tiff[5], tiff[6], tiff[7]]);

        // The root IFD can't overlap the header itself or start past the end
        if (root_ifd_offset as usize) < TIFF_HEADER_SIZE
            || root_ifd_offset as usize >= tiff.len()
        {
            return Err(HeaderError::InvalidIfdOffset(root_ifd_offset));
        }

        Ok(ExifHeader {
            byte_order,
            top_offset,
            root_ifd_offset,
        })
    }
}

// =============================================================================
// Tests
// =============================================================================
