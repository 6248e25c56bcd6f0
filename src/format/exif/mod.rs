//! EXIF IFD enumeration.
//!
//! This module decodes the Image File Directory structure of an EXIF block
//! into either a stream of tag callbacks or a materialized tree.
//!
//! # Key Concepts
//!
//! - **Byte order**: declared in the TIFF header (II = little-endian,
//!   MM = big-endian) and applied to every multi-byte field.
//!
//! - **Top offset**: all IFD and value offsets are measured from the TIFF
//!   header, which sits after the 6-byte `Exif\0\0` preamble when present.
//!
//! - **Chains and nesting**: IFDs at one level are linked by next-IFD
//!   pointers; pointer tags (Exif, GPS, Interoperability) nest a child
//!   chain under the IFD that contains them.
//!
//! - **Values are located, not decoded**: each tag records its raw 4-byte
//!   value field. Interpreting it is left to the caller.

mod enumerate;
mod header;
mod tags;
mod tree;

pub use enumerate::{
    IfdEnumerate, IfdTagEntry, TagVisitor, ValueContext, DEFAULT_MAX_DIRECTORIES, IFD_COUNT_SIZE,
    IFD_ENTRY_SIZE, IFD_NEXT_OFFSET_SIZE,
};
pub use header::{ExifHeader, EXIF_PREAMBLE, EXIF_TOP_OFFSET, TIFF_HEADER_SIZE};
pub use tags::{
    child_ifd_name, indexed_ifd_name, FieldType, TagType, IFD_EXIF, IFD_GPS, IFD_IOP,
    IFD_STANDARD, IFD_THUMBNAIL, TAG_EXIF_IFD_POINTER, TAG_GPS_IFD_POINTER, TAG_IOP_IFD_POINTER,
};
pub use tree::{Ifd, IfdId, IfdTree};
