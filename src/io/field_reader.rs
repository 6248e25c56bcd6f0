use serde::Serialize;

use crate::error::IfdError;

// =============================================================================
// ByteOrder
// =============================================================================

/// Byte order (endianness) of an EXIF block.
///
/// Declared once in the TIFF header and fixed for the whole decode session.
/// Every multi-byte field in every directory is read with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ByteOrder {
    /// Little-endian ("II" = Intel)
    LittleEndian,
    /// Big-endian ("MM" = Motorola)
    BigEndian,
}

impl ByteOrder {
    /// Decode a u16 from exactly two bytes.
    #[inline]
    pub fn u16_from(self, raw: [u8; 2]) -> u16 {
        match self {
            ByteOrder::LittleEndian => u16::from_le_bytes(raw),
            ByteOrder::BigEndian => u16::from_be_bytes(raw),
        }
    }

    /// Decode a u32 from exactly four bytes.
    #[inline]
    pub fn u32_from(self, raw: [u8; 4]) -> u32 {
        match self {
            ByteOrder::LittleEndian => u32::from_le_bytes(raw),
            ByteOrder::BigEndian => u32::from_be_bytes(raw),
        }
    }

    /// Short label used in dumps ("II" or "MM").
    pub const fn mark(self) -> &'static str {
        match self {
            ByteOrder::LittleEndian => "II",
            ByteOrder::BigEndian => "MM",
        }
    }
}

// =============================================================================
// FieldReader
// =============================================================================

/// Sequential, byte-order-aware reader over a borrowed buffer.
///
/// This is the only place where directory bytes are pulled out of the
/// buffer, so it is also the only place that bounds-checks. A read that
/// would run past the end fails with [`IfdError::Truncated`] and leaves
/// the cursor where it was.
#[derive(Debug, Clone)]
pub struct FieldReader<'a> {
    data: &'a [u8],
    position: usize,
    byte_order: ByteOrder,
}

impl<'a> FieldReader<'a> {
    /// Create a reader positioned at `offset` within `data`.
    ///
    /// An offset past the end is accepted; the first read will fail.
    pub fn new(data: &'a [u8], byte_order: ByteOrder, offset: usize) -> Self {
        Self {
            data,
            position: offset,
            byte_order,
        }
    }

    /// Current cursor position.
    #[inline]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bytes left between the cursor and the end of the buffer.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Read a u16, returning the decoded value and the raw bytes consumed.
    pub fn read_u16(&mut self) -> Result<(u16, [u8; 2]), IfdError> {
        let raw: [u8; 2] = self.take()?;
        Ok((self.byte_order.u16_from(raw), raw))
    }

    /// Read a u32, returning the decoded value and the raw bytes consumed.
    pub fn read_u32(&mut self) -> Result<(u32, [u8; 4]), IfdError> {
        let raw: [u8; 4] = self.take()?;
        Ok((self.byte_order.u32_from(raw), raw))
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], IfdError> {
        let available = self.remaining();
        if available < N {
            return Err(IfdError::Truncated {
                offset: self.position as u64,
                requested: N,
                available,
            });
        }

        let mut raw = [0u8; N];
        raw.copy_from_slice(&self.data[self.position..self.position + N]);
        self.position += N;
        Ok(raw)
    }
}
