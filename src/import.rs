use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::reader::ReadSeek;
use crate::{bitmap, dds, ktx, targa};
use crate::{ErrorKind, ImportError, ImportStatus, Options, TextureAllocator};

/// The file container formats the importer can decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum FileFormat {
    Bitmap,
    Dds,
    Ktx,
    Targa,
}

/// Signature probe order when the extension does not settle the format.
pub(crate) const PROBE_ORDER: [FileFormat; 4] = [
    FileFormat::Bitmap,
    FileFormat::Dds,
    FileFormat::Ktx,
    FileFormat::Targa,
];

impl FileFormat {
    /// The lower-case file extensions conventionally used for this format.
    pub const fn extensions(self) -> &'static [&'static str] {
        match self {
            FileFormat::Bitmap => &["bmp"],
            FileFormat::Dds => &["dds"],
            FileFormat::Ktx => &["ktx"],
            FileFormat::Targa => &["tga", "targa"],
        }
    }

    /// Maps a file extension (with or without the leading dot, any case) to
    /// a format.
    pub fn from_extension(extension: &str) -> Option<FileFormat> {
        let extension = extension.strip_prefix('.').unwrap_or(extension);
        if extension.is_empty() || extension.len() > 64 {
            return None;
        }
        let lowered = extension.to_ascii_lowercase();

        PROBE_ORDER
            .into_iter()
            .find(|format| format.extensions().contains(&lowered.as_str()))
    }

    fn matches_signature(self, reader: &mut dyn ReadSeek) -> bool {
        match self {
            FileFormat::Bitmap => bitmap::check_signature(reader),
            FileFormat::Dds => dds::check_signature(reader),
            FileFormat::Ktx => ktx::check_signature(reader),
            FileFormat::Targa => targa::check_signature(reader),
        }
    }

    fn decode(
        self,
        reader: &mut dyn ReadSeek,
        allocator: &mut dyn TextureAllocator,
        options: &Options,
    ) -> Result<(), ImportError> {
        match self {
            FileFormat::Bitmap => bitmap::decode(reader, allocator, options),
            FileFormat::Dds => dds::decode(reader, allocator, options),
            FileFormat::Ktx => ktx::decode(reader, allocator, options),
            FileFormat::Targa => targa::decode(reader, allocator, options),
        }
    }
}

/// The observable outcome of one import: terminal status, the first error
/// if any, the path the caller named, and the format that claimed the
/// stream.
#[derive(Debug)]
pub struct Importer {
    status: ImportStatus,
    error: Option<ImportError>,
    file_path: PathBuf,
    file_format: Option<FileFormat>,
}

impl Importer {
    fn success(file_path: PathBuf, file_format: FileFormat) -> Self {
        Self {
            status: ImportStatus::Success,
            error: None,
            file_path,
            file_format: Some(file_format),
        }
    }

    fn failure(file_path: PathBuf, file_format: Option<FileFormat>, error: ImportError) -> Self {
        Self {
            status: ImportStatus::Error,
            error: Some(error),
            file_path,
            file_format,
        }
    }

    pub fn status(&self) -> ImportStatus {
        self.status
    }

    pub fn error(&self) -> Option<&ImportError> {
        self.error.as_ref()
    }

    pub fn error_kind(&self) -> Option<ErrorKind> {
        self.error.as_ref().map(ImportError::kind)
    }

    pub fn error_message(&self) -> &str {
        self.error.as_ref().map_or("", ImportError::message)
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }

    /// The format whose signature claimed the stream, when one did.
    pub fn file_format(&self) -> Option<FileFormat> {
        self.file_format
    }
}

/// Opens `path` and decodes it into `allocator`.
///
/// The extension picks the first decoder to try; its signature check must
/// still pass. When the extension is unknown or its decoder rejects the
/// signature, every compiled-in decoder is probed in a fixed order. Once a
/// signature matches, that decoder's result is final.
pub fn import_texture(
    path: impl AsRef<Path>,
    allocator: &mut dyn TextureAllocator,
    options: &Options,
) -> Importer {
    let path = path.as_ref();

    if !path.exists() {
        return Importer::failure(
            path.to_path_buf(),
            None,
            ImportError::new(ErrorKind::FileNotFound, "path does not exist"),
        );
    }

    let file = match File::open(path) {
        Ok(file) => file,
        Err(error) => {
            return Importer::failure(
                path.to_path_buf(),
                None,
                ImportError::new(ErrorKind::FailedToOpenFile, error.to_string()),
            )
        }
    };

    let extension_format = path
        .extension()
        .and_then(|extension| extension.to_str())
        .and_then(FileFormat::from_extension);

    let mut reader = BufReader::new(file);
    import_from_reader(&mut reader, extension_format, path, allocator, options)
}

/// Decodes an already-open stream into `allocator`. `extension_format` is
/// the decoder the caller's file name suggests, if any; `path` is used for
/// error reporting only.
pub fn import_from_reader<R: std::io::Read + std::io::Seek>(
    reader: &mut R,
    extension_format: Option<FileFormat>,
    path: impl AsRef<Path>,
    allocator: &mut dyn TextureAllocator,
    options: &Options,
) -> Importer {
    let path = path.as_ref();

    let claimed = identify(reader, extension_format);
    let Some(format) = claimed else {
        return Importer::failure(
            path.to_path_buf(),
            None,
            ImportError::new(
                ErrorKind::UnknownFileFormat,
                "no decoder recognized the byte stream",
            ),
        );
    };

    match format.decode(reader, allocator, options) {
        Ok(()) => Importer::success(path.to_path_buf(), format),
        Err(error) => Importer::failure(path.to_path_buf(), Some(format), error),
    }
}

/// Decodes a stream with one specific decoder, failing with
/// `SignatureNotRecognized` if the stream is not of that format.
pub fn import_as<R: std::io::Read + std::io::Seek>(
    reader: &mut R,
    format: FileFormat,
    path: impl AsRef<Path>,
    allocator: &mut dyn TextureAllocator,
    options: &Options,
) -> Importer {
    let path = path.as_ref();

    if !format.matches_signature(reader) {
        return Importer::failure(
            path.to_path_buf(),
            Some(format),
            ImportError::new(
                ErrorKind::SignatureNotRecognized,
                format!("the byte stream is not a recognizable {format:?} file"),
            ),
        );
    }

    match format.decode(reader, allocator, options) {
        Ok(()) => Importer::success(path.to_path_buf(), format),
        Err(error) => Importer::failure(path.to_path_buf(), Some(format), error),
    }
}

/// Finds the decoder whose signature claims the stream: the extension's
/// decoder first, then the fixed probe order.
fn identify(reader: &mut dyn ReadSeek, extension_format: Option<FileFormat>) -> Option<FileFormat> {
    if let Some(format) = extension_format {
        if format.matches_signature(reader) {
            return Some(format);
        }
    }

    PROBE_ORDER
        .into_iter()
        .filter(|format| Some(*format) != extension_format)
        .find(|format| format.matches_signature(reader))
}
