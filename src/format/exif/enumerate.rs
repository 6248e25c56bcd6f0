//! IFD enumeration.
//!
//! An IFD is a 2-byte entry count, that many 12-byte entry records, and a
//! trailing 4-byte offset of the next IFD in the same chain (0 ends the
//! chain). There is no other framing: where the next directory lives is only
//! known from offsets found inside the current one.
//!
//! ```text
//! Entry record (12 bytes):
//!   Bytes 0-1:  Tag ID
//!   Bytes 2-3:  Field type
//!   Bytes 4-7:  Unit count
//!   Bytes 8-11: Value, or offset of the value
//! ```
//!
//! Whether bytes 8-11 hold the value itself or point at it depends on the
//! field type and count. The enumerator records the raw field and leaves that
//! decision to the value decoder (see [`ValueContext::locate`]).

use std::collections::HashSet;

use bytes::Bytes;
use serde::Serialize;
use tracing::debug;

use crate::error::{BoxError, IfdError};
use crate::io::{ByteOrder, FieldReader};

use super::header::{ExifHeader, EXIF_TOP_OFFSET};
use super::tags::{child_ifd_name, indexed_ifd_name, TagType};

// =============================================================================
// Constants
// =============================================================================

/// Default maximum number of IFDs decoded in one traversal (safety limit)
pub const DEFAULT_MAX_DIRECTORIES: usize = 100;

/// Size of the entry count at the start of an IFD
pub const IFD_COUNT_SIZE: usize = 2;

/// Size of one IFD entry record
pub const IFD_ENTRY_SIZE: usize = 12;

/// Size of the next-IFD offset at the end of an IFD
pub const IFD_NEXT_OFFSET_SIZE: usize = 4;

// =============================================================================
// ValueContext
// =============================================================================

/// Everything a value decoder needs to find a tag's value.
///
/// `raw_exif` is the block starting at the TIFF header, which is where
/// `value_offset` is measured from.
#[derive(Debug, Clone)]
pub struct ValueContext {
    pub unit_count: u32,
    pub value_offset: u32,
    pub raw_value_offset: [u8; 4],
    pub raw_exif: Bytes,
}

impl ValueContext {
    /// Locate the raw bytes of the value.
    ///
    /// Values that fit in four bytes are taken from the entry itself;
    /// anything larger is sliced out of the block at `value_offset`.
    pub fn locate(&self, tag_type: TagType) -> Result<Bytes, IfdError> {
        let field_type = tag_type
            .field_type()
            .ok_or(IfdError::UnknownFieldType(tag_type.type_id))?;

        let size = field_type.size_in_bytes() as u64 * self.unit_count as u64;

        if field_type.fits_inline(self.unit_count) {
            return Ok(Bytes::copy_from_slice(
                &self.raw_value_offset[..size as usize],
            ));
        }

        let start = self.value_offset as u64;
        let len = self.raw_exif.len() as u64;
        if start + size > len {
            return Err(IfdError::Truncated {
                offset: start,
                requested: size as usize,
                available: len.saturating_sub(start) as usize,
            });
        }

        Ok(self
            .raw_exif
            .slice(start as usize..(start + size) as usize))
    }
}

// =============================================================================
// IfdTagEntry
// =============================================================================

/// One decoded entry record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IfdTagEntry {
    /// Tag identifier
    pub tag_id: u16,

    /// Position of the record within its IFD
    pub tag_index: usize,

    /// Raw field type code
    pub type_id: u16,

    /// Number of values
    pub unit_count: u32,

    /// Value field interpreted as a u32 (value or offset)
    pub value_offset: u32,

    /// Value field exactly as stored
    pub raw_value_offset: [u8; 4],

    /// Directory this tag points at, if it is a nested-IFD tag
    pub child_ifd_name: Option<&'static str>,
}

impl IfdTagEntry {
    /// Whether the entry's value is the offset of a nested IFD.
    #[inline]
    pub fn is_child_ifd(&self) -> bool {
        self.child_ifd_name.is_some()
    }
}

// =============================================================================
// TagVisitor
// =============================================================================

/// Callback invoked once per tag of every recognized IFD.
///
/// Returning an error stops the whole scan; no further tags are visited.
pub trait TagVisitor {
    fn visit(
        &mut self,
        indexed_ifd_name: &str,
        tag_id: u16,
        tag_type: TagType,
        value_context: &ValueContext,
    ) -> Result<(), BoxError>;
}

impl<F> TagVisitor for F
where
    F: FnMut(&str, u16, TagType, &ValueContext) -> Result<(), BoxError>,
{
    fn visit(
        &mut self,
        indexed_ifd_name: &str,
        tag_id: u16,
        tag_type: TagType,
        value_context: &ValueContext,
    ) -> Result<(), BoxError> {
        self(indexed_ifd_name, tag_id, tag_type, value_context)
    }
}

// =============================================================================
// Traversal
// =============================================================================

/// Per-traversal bookkeeping: which IFD offsets were already decoded.
#[derive(Debug)]
pub(crate) struct Traversal {
    visited: HashSet<u32>,
    limit: usize,
}

impl Traversal {
    pub(crate) fn new(limit: usize) -> Self {
        Self {
            visited: HashSet::new(),
            limit,
        }
    }

    /// Record that the IFD at `offset` is about to be decoded.
    pub(crate) fn enter(&mut self, offset: u32) -> Result<(), IfdError> {
        if !self.visited.insert(offset) {
            return Err(IfdError::Cycle(offset));
        }
        if self.visited.len() > self.limit {
            return Err(IfdError::TooManyDirectories(self.limit));
        }
        Ok(())
    }
}

// =============================================================================
// IfdEnumerate
// =============================================================================

/// Walks the IFDs of one EXIF block.
///
/// The block is held as [`Bytes`], so value contexts handed to visitors
/// share it without copying.
#[derive(Debug, Clone)]
pub struct IfdEnumerate {
    data: Bytes,
    exif: Bytes,
    byte_order: ByteOrder,
    top_offset: usize,
    max_directories: usize,
}

impl IfdEnumerate {
    /// Create an enumerator for a block that starts with the `Exif\0\0`
    /// preamble.
    pub fn new(data: impl Into<Bytes>, byte_order: ByteOrder) -> Self {
        let data = data.into();
        let exif = Self::slice_from(&data, EXIF_TOP_OFFSET);
        Self {
            data,
            exif,
            byte_order,
            top_offset: EXIF_TOP_OFFSET,
            max_directories: DEFAULT_MAX_DIRECTORIES,
        }
    }

    /// Create an enumerator using the byte order and top offset of a parsed
    /// header.
    pub fn from_header(data: impl Into<Bytes>, header: &ExifHeader) -> Self {
        Self::new(data, header.byte_order).with_top_offset(header.top_offset)
    }

    /// Measure offsets from `top_offset` instead of the preamble default.
    pub fn with_top_offset(mut self, top_offset: usize) -> Self {
        self.top_offset = top_offset;
        self.exif = Self::slice_from(&self.data, top_offset);
        self
    }

    /// Limit how many IFDs a single traversal may decode.
    pub fn with_max_directories(mut self, max_directories: usize) -> Self {
        self.max_directories = max_directories;
        self
    }

    fn slice_from(data: &Bytes, top_offset: usize) -> Bytes {
        data.slice(top_offset.min(data.len())..)
    }

    #[inline]
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    #[inline]
    pub fn top_offset(&self) -> usize {
        self.top_offset
    }

    #[inline]
    pub fn max_directories(&self) -> usize {
        self.max_directories
    }

    /// The block starting at the TIFF header.
    #[inline]
    pub fn raw_exif(&self) -> &Bytes {
        &self.exif
    }

    /// Decode the IFD at `ifd_offset`.
    ///
    /// Tags are handed to `visitor` only when the directory name is
    /// recognized. With `descend` set, nested IFDs are walked (with their
    /// whole chain) as soon as the tag naming them is reached.
    ///
    /// Returns the next-IFD offset (0 at the end of the chain) and the
    /// entries in record order.
    pub fn parse_ifd(
        &self,
        ifd_name: &str,
        ifd_index: usize,
        ifd_offset: u32,
        visitor: Option<&mut dyn TagVisitor>,
        descend: bool,
    ) -> Result<(u32, Vec<IfdTagEntry>), IfdError> {
        let mut traversal = Traversal::new(self.max_directories);
        traversal.enter(ifd_offset)?;
        self.decode(ifd_name, ifd_index, ifd_offset, visitor, descend, &mut traversal)
    }

    /// Visit every tag in the chain starting at `ifd_offset`, descending
    /// into nested IFDs.
    pub fn scan(
        &self,
        ifd_name: &str,
        ifd_offset: u32,
        visitor: Option<&mut dyn TagVisitor>,
    ) -> Result<(), IfdError> {
        let mut traversal = Traversal::new(self.max_directories);
        self.walk_chain(ifd_name, ifd_offset, visitor, &mut traversal)
    }

    fn walk_chain<V: TagVisitor + ?Sized>(
        &self,
        ifd_name: &str,
        mut ifd_offset: u32,
        mut visitor: Option<&mut V>,
        traversal: &mut Traversal,
    ) -> Result<(), IfdError> {
        for ifd_index in 0.. {
            traversal.enter(ifd_offset)?;

            let (next_ifd_offset, _) = self.decode(
                ifd_name,
                ifd_index,
                ifd_offset,
                visitor.as_deref_mut(),
                true,
                traversal,
            )?;

            if next_ifd_offset == 0 {
                break;
            }

            ifd_offset = next_ifd_offset;
        }

        Ok(())
    }

    pub(crate) fn decode<V: TagVisitor + ?Sized>(
        &self,
        ifd_name: &str,
        ifd_index: usize,
        ifd_offset: u32,
        mut visitor: Option<&mut V>,
        descend: bool,
        traversal: &mut Traversal,
    ) -> Result<(u32, Vec<IfdTagEntry>), IfdError> {
        debug!(
            ifd = ifd_name,
            index = ifd_index,
            "Parsing IFD at offset 0x{:04x}",
            ifd_offset
        );

        let indexed_name = indexed_ifd_name(ifd_name, ifd_index);
        if indexed_name.is_none() {
            debug!(
                ifd = ifd_name,
                index = ifd_index,
                "IFD not known, tags will not be visited"
            );
        }

        let truncated = |source: IfdError| IfdError::Decode {
            name: ifd_name.to_string(),
            index: ifd_index,
            offset: ifd_offset,
            source: Box::new(source),
        };

        let mut reader = FieldReader::new(&self.exif, self.byte_order, ifd_offset as usize);

        let (tag_count, _) = reader.read_u16().map_err(truncated)?;
        debug!(ifd = ifd_name, "IFD tag count: {}", tag_count);

        let mut entries = Vec::with_capacity(tag_count as usize);

        for tag_index in 0..tag_count as usize {
            let (tag_id, _) = reader.read_u16().map_err(truncated)?;
            let (type_id, _) = reader.read_u16().map_err(truncated)?;
            let (unit_count, _) = reader.read_u32().map_err(truncated)?;
            let (value_offset, raw_value_offset) = reader.read_u32().map_err(truncated)?;

            if let (Some(visitor), Some(name)) = (visitor.as_deref_mut(), indexed_name) {
                let value_context = ValueContext {
                    unit_count,
                    value_offset,
                    raw_value_offset,
                    raw_exif: self.exif.clone(),
                };

                visitor
                    .visit(
                        name,
                        tag_id,
                        TagType::new(type_id, self.byte_order),
                        &value_context,
                    )
                    .map_err(|source| IfdError::Visitor {
                        name: name.to_string(),
                        index: ifd_index,
                        offset: ifd_offset,
                        tag_id,
                        source,
                    })?;
            }

            let child = child_ifd_name(tag_id);

            if let Some(child_name) = child.filter(|_| descend) {
                if value_offset == 0 {
                    debug!(ifd = child_name, "Nested IFD pointer is zero, skipping");
                } else {
                    debug!(ifd = child_name, "Descending to IFD at 0x{:04x}", value_offset);
                    self.walk_chain(child_name, value_offset, visitor.as_deref_mut(), traversal)?;
                }
            }

            entries.push(IfdTagEntry {
                tag_id,
                tag_index,
                type_id,
                unit_count,
                value_offset,
                raw_value_offset,
                child_ifd_name: child,
            });
        }

        let (next_ifd_offset, _) = reader.read_u32().map_err(truncated)?;
        debug!(ifd = ifd_name, "Next IFD at offset 0x{:08x}", next_ifd_offset);

        Ok((next_ifd_offset, entries))
    }
}

// =============================================================================
// Tests
// =============================================================================
