use thiserror::Error;

/// Boxed error returned by tag visitors.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while parsing the TIFF header of an EXIF block
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderError {
    /// Block is too small to contain a valid TIFF header
    #[error("EXIF block too small: need at least {required} bytes, got {actual}")]
    TooSmall { required: usize, actual: usize },

    /// Invalid byte order mark (not II or MM)
    #[error("Invalid byte order mark: expected 0x4949 (II) or 0x4D4D (MM), got 0x{0:04X}")]
    InvalidMagic(u16),

    /// Invalid TIFF version number
    #[error("Invalid TIFF version: expected 42, got {0}")]
    InvalidVersion(u16),

    /// Root IFD offset points outside the block
    #[error("Invalid root IFD offset: 0x{0:08x}")]
    InvalidIfdOffset(u32),
}

/// Errors that can occur while enumerating IFDs
#[derive(Debug, Error)]
pub enum IfdError {
    /// Fewer bytes remain than a field read requires
    #[error("Truncated read at offset {offset}: need {requested} bytes, {available} available")]
    Truncated {
        offset: u64,
        requested: usize,
        available: usize,
    },

    /// A field read failed while decoding a directory
    #[error("Failed to decode IFD [{name}] ({index}) at offset 0x{offset:04x}: {source}")]
    Decode {
        name: String,
        index: usize,
        offset: u32,
        #[source]
        source: Box<IfdError>,
    },

    /// The caller-supplied tag visitor reported an error
    #[error(
        "Tag visitor failed on tag 0x{tag_id:04x} in IFD [{name}] ({index}) at offset 0x{offset:04x}: {source}"
    )]
    Visitor {
        name: String,
        index: usize,
        offset: u32,
        tag_id: u16,
        #[source]
        source: BoxError,
    },

    /// A directory offset was reached a second time in one traversal.
    ///
    /// Raised for true loops (a chain or pointer leading back to an
    /// ancestor) and also for two pointer tags naming the same directory.
    #[error("IFD offset 0x{0:08x} reached more than once (loop or shared directory)")]
    Cycle(u32),

    /// Traversal exceeded the configured directory budget
    #[error("Directory limit exceeded: more than {0} IFDs")]
    TooManyDirectories(usize),

    /// Value location requested for a type code with no known unit size
    #[error("Unknown field type: {0}")]
    UnknownFieldType(u16),
}

/// Top-level error for reading a whole EXIF block
#[derive(Debug, Error)]
pub enum ExifError {
    /// TIFF header error
    #[error("Header error: {0}")]
    Header(#[from] HeaderError),

    /// IFD enumeration error
    #[error("IFD error: {0}")]
    Ifd(#[from] IfdError),

    /// JSON output error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
