//! Format parsers for embedded image metadata.
//!
//! Currently this covers the EXIF block: its TIFF header and the IFD
//! structure behind it. Locating the block inside a JPEG or other container
//! happens before anything in here is called.

pub mod exif;

pub use exif::{ExifHeader, IfdEnumerate, IfdTree};
