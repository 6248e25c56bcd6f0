//! # EXIF IFD
//!
//! Decodes the Image File Directory (IFD) structure of an EXIF block into a
//! navigable tree of directories and their tag entries.
//!
//! The IFD format carries no framing besides fixed-size records and raw
//! offsets into the same buffer. This crate walks those offsets safely:
//! every read is bounds-checked, revisited offsets are reported instead of
//! looping, and the number of directories per traversal is capped.
//!
//! ## Features
//!
//! - **Streaming**: [`IfdEnumerate::scan`] hands every tag of every known
//!   directory to a [`TagVisitor`], descending into nested IFDs depth-first
//! - **Materialized tree**: [`IfdEnumerate::collect`] decodes all directories
//!   breadth-first into an [`IfdTree`] with parent, child and chain links
//! - **Value location**: [`ValueContext::locate`] finds a tag's raw value
//!   bytes without interpreting them
//!
//! ## Architecture
//!
//! - [`io`] - Byte order and the bounds-checked field reader
//! - [`mod@format`] - EXIF header, tag tables, enumerator and tree
//! - [`config`] - CLI configuration for the `exif-ifd` binary
//!
//! ## Example
//!
//! ```rust,no_run
//! use exif_ifd::{ExifHeader, IfdEnumerate};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = std::fs::read("photo.exif")?;
//! let header = ExifHeader::parse(&data)?;
//!
//! let tree = IfdEnumerate::from_header(data, &header).collect(header.root_ifd_offset)?;
//! tree.print_tree();
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod io;

// Re-export commonly used types
pub use config::{ByteOrderArg, Config, OutputFormat};
pub use error::{BoxError, ExifError, HeaderError, IfdError};
pub use format::exif::{
    child_ifd_name, indexed_ifd_name, ExifHeader, FieldType, Ifd, IfdEnumerate, IfdId,
    IfdTagEntry, IfdTree, TagType, TagVisitor, ValueContext, DEFAULT_MAX_DIRECTORIES,
    EXIF_PREAMBLE, EXIF_TOP_OFFSET, IFD_EXIF, IFD_GPS, IFD_IOP, IFD_STANDARD, IFD_THUMBNAIL,
};
pub use io::{ByteOrder, FieldReader};
