#![forbid(unsafe_code)]

//! Multi-format texture importer in pure safe Rust.
//!
//! Decodes BMP, DDS, KTX v1 and TGA byte streams into caller-owned texture
//! storage. The caller supplies a [`TextureAllocator`]; the decoder and the
//! allocator agree on a destination GPU [`Format`] through a two-phase
//! handshake (coarse [`FormatLayout`] first, then a concrete format), the
//! allocator reserves the surfaces, and the decoder fills them.
//!
//! ```no_run
//! let mut allocator = teximp::CpuTextureAllocator::new();
//! let importer = teximp::import_texture(
//!     "example.dds",
//!     &mut allocator,
//!     &teximp::Options::default(),
//! );
//! assert_eq!(importer.status(), teximp::ImportStatus::Success);
//! ```

mod allocator;
pub mod bitmap;
pub mod convert;
pub mod dds;
mod error;
mod format;
mod import;
pub mod ktx;
mod layout;
mod reader;
pub mod targa;
mod util;

pub use allocator::{
    CpuTextureAllocator, Extent, MipSurfaceKey, TextureAllocator, TextureDimension, TextureParams,
};
pub use error::{ErrorKind, ImportError, ImportStatus};
pub use format::{BitRange, Channel, Format, FormatInfo};
pub use import::{import_as, import_from_reader, import_texture, FileFormat, Importer};
pub use layout::FormatLayout;

/// The largest image width any decoder accepts.
pub const MAX_TEXTURE_WIDTH: u32 = 16384;
/// The largest image height any decoder accepts.
pub const MAX_TEXTURE_HEIGHT: u32 = 16384;

/// Caller preferences for a decode.
#[derive(Debug, Clone)]
pub struct Options {
    /// Prefer 4-channel destination layouts for 3-channel sources.
    ///
    /// This expresses a preference, never a guarantee: the allocator may
    /// still pick a 3-channel layout when the decoder offers one.
    ///
    /// Defaults to `true`.
    pub pad_rgb_with_alpha: bool,

    /// Assume 8-bit color data is sRGB encoded when the container has no
    /// color-space tag of its own, and pick the sRGB twin of the
    /// destination format.
    ///
    /// Defaults to `true`.
    pub assume_srgb: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            pad_rgb_with_alpha: true,
            assume_srgb: true,
        }
    }
}
