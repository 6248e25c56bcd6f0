//! Configuration for the `exif-ifd` command-line tool.
//!
//! Options come from command-line arguments via clap, with environment
//! variable fallbacks using the `EXIF_` prefix:
//!
//! - `EXIF_FORMAT` - Output format: tree, tags or json (default: tree)
//! - `EXIF_BYTE_ORDER` - Byte order override: auto, big or little (default: auto)
//! - `EXIF_MAX_DIRECTORIES` - Maximum IFDs decoded per traversal (default: 100)

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::format::exif::DEFAULT_MAX_DIRECTORIES;
use crate::io::ByteOrder;

// =============================================================================
// Value Enums
// =============================================================================

/// What to print.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Indented IFD tree
    Tree,
    /// One line per tag, streamed through the tag visitor
    Tags,
    /// The collected tree as JSON
    Json,
}

/// Byte order selection.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrderArg {
    /// Use the byte order declared in the TIFF header
    Auto,
    /// Force big-endian
    Big,
    /// Force little-endian
    Little,
}

impl ByteOrderArg {
    /// Pick the byte order to decode with, given what the header declared.
    pub fn resolve(self, declared: ByteOrder) -> ByteOrder {
        match self {
            ByteOrderArg::Auto => declared,
            ByteOrderArg::Big => ByteOrder::BigEndian,
            ByteOrderArg::Little => ByteOrder::LittleEndian,
        }
    }
}

// =============================================================================
// CLI Arguments
// =============================================================================

/// exif-ifd - Dump the IFD structure of an EXIF block.
///
/// Reads a file holding a raw EXIF block (with or without the `Exif\0\0`
/// preamble) and prints its directories and tags.
#[derive(Parser, Debug, Clone)]
#[command(name = "exif-ifd")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Path to the EXIF block.
    pub input: PathBuf,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Tree, env = "EXIF_FORMAT")]
    pub format: OutputFormat,

    /// Byte order to decode with.
    #[arg(long, value_enum, default_value_t = ByteOrderArg::Auto, env = "EXIF_BYTE_ORDER")]
    pub byte_order: ByteOrderArg,

    /// Maximum number of IFDs decoded in one traversal.
    #[arg(long, default_value_t = DEFAULT_MAX_DIRECTORIES, env = "EXIF_MAX_DIRECTORIES")]
    pub max_directories: usize,

    /// Enable verbose logging (debug level).
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

impl Config {
    /// Validate the configuration and return an error message if invalid.
    pub fn validate(&self) -> Result<(), String> {
        if self.input.as_os_str().is_empty() {
            return Err("Input path is required".to_string());
        }

        if self.max_directories == 0 {
            return Err("max_directories must be greater than 0".to_string());
        }

        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
