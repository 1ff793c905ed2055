use std::fmt;
use std::io;

/// The lifecycle state of an import operation.
///
/// A freshly created importer is `Loading`. Once the decode call returns, the
/// status is either `Success` or `Error` and never changes again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImportStatus {
    Loading,
    Success,
    Error,
}

/// The closed set of failure categories an import can report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The path does not exist.
    FileNotFound,
    /// The path exists but could not be opened.
    FailedToOpenFile,
    /// The underlying read returned a hard I/O error.
    FailedToReadFile,
    /// No decoder claimed the byte stream.
    SignatureNotRecognized,
    /// The stream ended or was malformed during the header phase.
    CouldNotReadHeader,
    /// The stream ended during the pixel phase.
    NotEnoughData,
    /// The bytes violate the format grammar (e.g. an RLE overrun).
    InvalidDataInImage,
    /// Width or height exceeds the supported maximum.
    DimensionsTooLarge,
    /// The on-disk pixel encoding has no known GPU format mapping.
    UnknownFormat,
    /// The format is valid but deliberately unsupported.
    UnsupportedFeature,
    /// A pixel conversion kernel could not produce the requested output.
    ConversionError,
    /// The allocator returned a layout outside the offered set.
    InvalidTextureAllocatorFormatLayout,
    /// The allocator returned a format outside the offered set.
    InvalidTextureAllocatorFormat,
    /// The allocator refused to allocate a texture.
    TextureAllocationFailed,
    /// Dispatch exhausted all decoders without a signature match.
    UnknownFileFormat,
    /// Defensive default.
    Unknown,
}

impl ErrorKind {
    pub(crate) const fn as_str(self) -> &'static str {
        match self {
            ErrorKind::FileNotFound => "file not found",
            ErrorKind::FailedToOpenFile => "failed to open file",
            ErrorKind::FailedToReadFile => "failed to read file",
            ErrorKind::SignatureNotRecognized => "signature not recognized",
            ErrorKind::CouldNotReadHeader => "could not read header",
            ErrorKind::NotEnoughData => "not enough data",
            ErrorKind::InvalidDataInImage => "invalid data in image",
            ErrorKind::DimensionsTooLarge => "dimensions too large",
            ErrorKind::UnknownFormat => "unknown format",
            ErrorKind::UnsupportedFeature => "unsupported feature",
            ErrorKind::ConversionError => "conversion error",
            ErrorKind::InvalidTextureAllocatorFormatLayout => {
                "allocator returned an invalid format layout"
            }
            ErrorKind::InvalidTextureAllocatorFormat => "allocator returned an invalid format",
            ErrorKind::TextureAllocationFailed => "texture allocation failed",
            ErrorKind::UnknownFileFormat => "unknown file format",
            ErrorKind::Unknown => "unknown error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An import failure: a category from the closed [`ErrorKind`] set plus a
/// short human-readable message.
///
/// The message is diagnostic only and not part of the crate's contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportError {
    kind: ErrorKind,
    message: String,
}

impl ImportError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Creates an error with the kind's generic description as the message.
    pub fn from_kind(kind: ErrorKind) -> Self {
        Self {
            kind,
            message: String::new(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        if self.message.is_empty() {
            self.kind.as_str()
        } else {
            &self.message
        }
    }

    /// Maps an I/O error raised while parsing a file header.
    ///
    /// An unexpected EOF means the header itself was truncated; anything else
    /// is a hard read failure.
    pub(crate) fn header_io(error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::UnexpectedEof => Self::new(
                ErrorKind::CouldNotReadHeader,
                "stream ended while reading the header",
            ),
            _ => Self::new(ErrorKind::FailedToReadFile, error.to_string()),
        }
    }

    /// Maps an I/O error raised while reading pixel data.
    pub(crate) fn pixel_io(error: io::Error) -> Self {
        match error.kind() {
            io::ErrorKind::UnexpectedEof => Self::new(
                ErrorKind::NotEnoughData,
                "stream ended while reading pixel data",
            ),
            _ => Self::new(ErrorKind::FailedToReadFile, error.to_string()),
        }
    }
}

impl fmt::Display for ImportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.message.is_empty() {
            f.write_str(self.kind.as_str())
        } else {
            write!(f, "{}: {}", self.kind, self.message)
        }
    }
}

impl std::error::Error for ImportError {}
