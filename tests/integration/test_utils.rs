//! Test utilities for integration tests.
//!
//! This module provides a builder for synthetic EXIF blocks and a recording
//! tag visitor.

use exif_ifd::{BoxError, ByteOrder, TagType, TagVisitor, ValueContext};

// =============================================================================
// EXIF Block Builder
// =============================================================================

/// Tag IDs used by the sample blocks.
pub const TAG_MAKE: u16 = 0x010F;
pub const TAG_EXPOSURE_TIME: u16 = 0x829A;
pub const TAG_GPS_VERSION_ID: u16 = 0x0000;
pub const TAG_JPEG_INTERCHANGE_FORMAT: u16 = 0x0201;
pub const TAG_INTEROP_INDEX: u16 = 0x0001;

/// Field type codes used by the sample blocks.
pub const TYPE_BYTE: u16 = 1;
pub const TYPE_ASCII: u16 = 2;
pub const TYPE_SHORT: u16 = 3;
pub const TYPE_LONG: u16 = 4;
pub const TYPE_RATIONAL: u16 = 5;

/// Raw entry: (tag, type, count, value-or-offset).
pub type RawEntry = (u16, u16, u32, u32);

/// Size in bytes of an IFD with `entries` records.
pub const fn ifd_size(entries: usize) -> usize {
    2 + 12 * entries + 4
}

/// Builds an EXIF block with IFDs and value blobs at chosen offsets.
///
/// Offsets are relative to the TIFF header, as in a real block.
pub struct ExifBlockBuilder {
    byte_order: ByteOrder,
    preamble: bool,
    root_offset: u32,
    ifds: Vec<(u32, Vec<RawEntry>, u32)>,
    blobs: Vec<(u32, Vec<u8>)>,
}

impl ExifBlockBuilder {
    pub fn new(byte_order: ByteOrder) -> Self {
        Self {
            byte_order,
            preamble: true,
            root_offset: 8,
            ifds: Vec::new(),
            blobs: Vec::new(),
        }
    }

    pub fn without_preamble(mut self) -> Self {
        self.preamble = false;
        self
    }

    pub fn root(mut self, offset: u32) -> Self {
        self.root_offset = offset;
        self
    }

    pub fn ifd(mut self, offset: u32, entries: &[RawEntry], next: u32) -> Self {
        self.ifds.push((offset, entries.to_vec(), next));
        self
    }

    pub fn blob(mut self, offset: u32, bytes: &[u8]) -> Self {
        self.blobs.push((offset, bytes.to_vec()));
        self
    }

    pub fn build(self) -> Vec<u8> {
        let mut end = 8;
        for (offset, entries, _) in &self.ifds {
            end = end.max(*offset as usize + ifd_size(entries.len()));
        }
        for (offset, bytes) in &self.blobs {
            end = end.max(*offset as usize + bytes.len());
        }

        let mut tiff = vec![0u8; end];

        let mark: &[u8; 2] = match self.byte_order {
            ByteOrder::LittleEndian => b"II",
            ByteOrder::BigEndian => b"MM",
        };
        tiff[0..2].copy_from_slice(mark);
        self.put_u16(&mut tiff, 2, 42);
        self.put_u32(&mut tiff, 4, self.root_offset);

        for (offset, entries, next) in &self.ifds {
            let mut pos = *offset as usize;
            self.put_u16(&mut tiff, pos, entries.len() as u16);
            pos += 2;
            for &(tag, type_id, count, value) in entries {
                self.put_u16(&mut tiff, pos, tag);
                self.put_u16(&mut tiff, pos + 2, type_id);
                self.put_u32(&mut tiff, pos + 4, count);
                self.put_u32(&mut tiff, pos + 8, value);
                pos += 12;
            }
            self.put_u32(&mut tiff, pos, *next);
        }

        for (offset, bytes) in &self.blobs {
            let start = *offset as usize;
            tiff[start..start + bytes.len()].copy_from_slice(bytes);
        }

        if self.preamble {
            let mut block = b"Exif\0\0".to_vec();
            block.extend_from_slice(&tiff);
            block
        } else {
            tiff
        }
    }

    fn put_u16(&self, buf: &mut [u8], pos: usize, value: u16) {
        let bytes = match self.byte_order {
            ByteOrder::LittleEndian => value.to_le_bytes(),
            ByteOrder::BigEndian => value.to_be_bytes(),
        };
        buf[pos..pos + 2].copy_from_slice(&bytes);
    }

    fn put_u32(&self, buf: &mut [u8], pos: usize, value: u32) {
        let bytes = match self.byte_order {
            ByteOrder::LittleEndian => value.to_le_bytes(),
            ByteOrder::BigEndian => value.to_be_bytes(),
        };
        buf[pos..pos + 4].copy_from_slice(&bytes);
    }
}

/// Encode a 4-byte inline value field in the given byte order, so the
/// builder writes `bytes` back out verbatim.
pub fn inline_bytes(byte_order: ByteOrder, bytes: [u8; 4]) -> u32 {
    match byte_order {
        ByteOrder::LittleEndian => u32::from_le_bytes(bytes),
        ByteOrder::BigEndian => u32::from_be_bytes(bytes),
    }
}

// =============================================================================
// Sample Layout
// =============================================================================

pub const IFD0_OFFSET: u32 = 0x08;
pub const EXIF_OFFSET: u32 = 0x60;
pub const GPS_OFFSET: u32 = 0x90;
pub const IFD1_OFFSET: u32 = 0xC0;
pub const IOP_OFFSET: u32 = 0xE0;
pub const MAKE_OFFSET: u32 = 0x100;
pub const EXPOSURE_OFFSET: u32 = 0x110;

/// A typical camera block:
///
/// ```text
/// IFD0 @0x08 (Make, ExifPointer, GPSPointer) -> IFD1 @0xC0
///   Exif @0x60 (ExposureTime, InteropPointer)
///     Iop @0xE0 (InteropIndex)
///   GPSInfo @0x90 (GPSVersionID)
/// ```
pub fn sample_block(byte_order: ByteOrder) -> Vec<u8> {
    ExifBlockBuilder::new(byte_order)
        .root(IFD0_OFFSET)
        .ifd(
            IFD0_OFFSET,
            &[
                (TAG_MAKE, TYPE_ASCII, 6, MAKE_OFFSET),
                (0x8769, TYPE_LONG, 1, EXIF_OFFSET),
                (0x8825, TYPE_LONG, 1, GPS_OFFSET),
            ],
            IFD1_OFFSET,
        )
        .ifd(
            EXIF_OFFSET,
            &[
                (TAG_EXPOSURE_TIME, TYPE_RATIONAL, 1, EXPOSURE_OFFSET),
                (0xA005, TYPE_LONG, 1, IOP_OFFSET),
            ],
            0,
        )
        .ifd(
            GPS_OFFSET,
            &[(
                TAG_GPS_VERSION_ID,
                TYPE_BYTE,
                4,
                inline_bytes(byte_order, [2, 2, 0, 0]),
            )],
            0,
        )
        .ifd(
            IFD1_OFFSET,
            &[(TAG_JPEG_INTERCHANGE_FORMAT, TYPE_LONG, 1, 0x200)],
            0,
        )
        .ifd(
            IOP_OFFSET,
            &[(
                TAG_INTEROP_INDEX,
                TYPE_ASCII,
                4,
                inline_bytes(byte_order, *b"R98\0"),
            )],
            0,
        )
        .blob(MAKE_OFFSET, b"Canon\0")
        .blob(EXPOSURE_OFFSET, &[0, 0, 0, 1, 0, 0, 0, 125])
        .build()
}

/// A single IFD at 0x08 holding `count` plain SHORT tags (0x0100, 0x0101, ...).
pub fn flat_block(byte_order: ByteOrder, count: u16) -> Vec<u8> {
    let entries: Vec<RawEntry> = (0..count)
        .map(|i| (0x0100 + i, TYPE_SHORT, 1, 0))
        .collect();

    ExifBlockBuilder::new(byte_order)
        .ifd(IFD0_OFFSET, &entries, 0)
        .build()
}

// =============================================================================
// Recording Visitor
// =============================================================================

/// Records every tag it is handed, optionally failing on the Nth call.
#[derive(Default)]
pub struct RecordingVisitor {
    pub visits: Vec<(String, u16)>,
    pub values: Vec<Vec<u8>>,
    fail_on_call: Option<usize>,
}

impl RecordingVisitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail on the `call`-th visit (1-based).
    pub fn failing_on(call: usize) -> Self {
        Self {
            fail_on_call: Some(call),
            ..Self::default()
        }
    }

    pub fn tag_ids(&self) -> Vec<u16> {
        self.visits.iter().map(|(_, tag)| *tag).collect()
    }
}

impl TagVisitor for RecordingVisitor {
    fn visit(
        &mut self,
        indexed_ifd_name: &str,
        tag_id: u16,
        tag_type: TagType,
        value_context: &ValueContext,
    ) -> Result<(), BoxError> {
        self.visits.push((indexed_ifd_name.to_string(), tag_id));

        let value = value_context
            .locate(tag_type)
            .map(|bytes| bytes.to_vec())
            .unwrap_or_default();
        self.values.push(value);

        if self.fail_on_call == Some(self.visits.len()) {
            return Err(format!("stop at tag 0x{:04x}", tag_id).into());
        }

        Ok(())
    }
}
