//! On-disk BMP header records and their normalization.
//!
//! BMP is eight header variants sharing a 14-byte file header. All variants
//! are widened into [`BitmapHeader`], a V5-shaped record with sentinel
//! defaults for the fields a variant does not carry.

use zerocopy::little_endian::{I16, I32, U16, U32};
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::reader::ByteReader;
use crate::{ErrorKind, ImportError, MAX_TEXTURE_HEIGHT, MAX_TEXTURE_WIDTH};

/// The 14-byte file header following the `BM` signature bytes.
#[derive(Debug, Clone, Copy)]
pub struct BitmapFileHeader {
    pub file_size: u32,
    pub reserved0: u16,
    pub reserved1: u16,
    /// Absolute offset of the pixel data, or 0.
    pub bitmap_offset: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitmapCompression {
    Rgb,
    Rle8,
    Rle4,
    Bitfields,
    Jpeg,
    Png,
    AlphaBitfields,
}

impl BitmapCompression {
    pub(crate) fn from_u32(raw: u32) -> Option<Self> {
        Some(match raw {
            0 => Self::Rgb,
            1 => Self::Rle8,
            2 => Self::Rle4,
            3 => Self::Bitfields,
            4 => Self::Jpeg,
            5 => Self::Png,
            6 => Self::AlphaBitfields,
            _ => return None,
        })
    }

    pub(crate) fn is_bitfields(self) -> bool {
        matches!(self, Self::Bitfields | Self::AlphaBitfields)
    }

    pub(crate) fn is_rle(self) -> bool {
        matches!(self, Self::Rle4 | Self::Rle8)
    }
}

/// The V4/V5 color-space tag. Pre-V4 headers default to `CalibratedRgb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BitmapColorSpace {
    CalibratedRgb,
    Srgb,
    WindowsColorSpace,
    ProfileLinked,
    ProfileEmbedded,
    Other(u32),
}

impl BitmapColorSpace {
    fn from_u32(raw: u32) -> Self {
        match raw {
            0 => Self::CalibratedRgb,
            0x7352_4742 => Self::Srgb,              // 'sRGB'
            0x5769_6E20 => Self::WindowsColorSpace, // 'Win '
            0x4C49_4E4B => Self::ProfileLinked,     // 'LINK'
            0x4D42_4544 => Self::ProfileEmbedded,   // 'MBED'
            other => Self::Other(other),
        }
    }

    /// Whether the tag declares the pixel data to be sRGB encoded.
    pub(crate) fn is_srgb(self) -> bool {
        matches!(self, Self::Srgb | Self::WindowsColorSpace)
    }
}

/// The CIE endpoints and gammas a V4/V5 header carries, decoded from their
/// 2.30 and 16.16 fixed-point fields.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BitmapColorEndpoints {
    pub red: [f32; 3],
    pub green: [f32; 3],
    pub blue: [f32; 3],
    pub gamma: [f32; 3],
}

/// Which on-disk variant a header was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HeaderVersion {
    V2,
    Os2V2_16,
    Os2V2,
    V3,
    V4,
    V5,
}

impl HeaderVersion {
    /// OS/2 v2 and all V3+ variants store 4-byte palette entries; only V2
    /// uses packed 3-byte entries.
    pub(crate) fn palette_entry_len(self) -> usize {
        match self {
            HeaderVersion::V2 => 3,
            _ => 4,
        }
    }
}

/// All header variants widened to the V5 shape.
#[derive(Debug, Clone)]
pub struct BitmapHeader {
    pub size: u32,
    pub width: i32,
    pub height: i32,
    pub planes: u16,
    pub bits_per_pixel: u16,
    pub compression: BitmapCompression,
    pub size_of_bitmap: u32,
    pub horizontal_resolution: i32,
    pub vertical_resolution: i32,
    pub colors_used: u32,
    pub colors_important: u32,
    pub red_mask: u32,
    pub green_mask: u32,
    pub blue_mask: u32,
    pub alpha_mask: u32,
    pub color_space: BitmapColorSpace,
    pub endpoints: Option<BitmapColorEndpoints>,
    pub intent: u32,
    pub profile_data: u32,
    pub profile_size: u32,
}

impl BitmapHeader {
    fn with_sentinels() -> Self {
        Self {
            size: 0,
            width: 0,
            height: 0,
            planes: 1,
            bits_per_pixel: 0,
            compression: BitmapCompression::Rgb,
            size_of_bitmap: 0,
            horizontal_resolution: 0,
            vertical_resolution: 0,
            colors_used: 0,
            colors_important: 0,
            red_mask: 0,
            green_mask: 0,
            blue_mask: 0,
            alpha_mask: 0,
            color_space: BitmapColorSpace::CalibratedRgb,
            endpoints: None,
            intent: 0,
            profile_data: 0,
            profile_size: 0,
        }
    }

    pub(crate) fn abs_width(&self) -> u32 {
        self.width.unsigned_abs()
    }

    pub(crate) fn abs_height(&self) -> u32 {
        self.height.unsigned_abs()
    }

    /// Positive height means the bottom row comes first in the file.
    pub(crate) fn is_bottom_up(&self) -> bool {
        self.height > 0
    }
}

/// The body of a V2 header after its `size` field. 8 bytes.
#[derive(FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
struct V2Body {
    width: I16,
    height: I16,
    planes: U16,
    bits_per_pixel: U16,
}

/// The body of a V3 header after its `size` field. 36 bytes, shared prefix
/// of every later Windows variant.
#[derive(FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
struct V3Body {
    width: I32,
    height: I32,
    planes: U16,
    bits_per_pixel: U16,
    compression: U32,
    size_of_bitmap: U32,
    horizontal_resolution: I32,
    vertical_resolution: I32,
    colors_used: U32,
    colors_important: U32,
}

/// The extra fields of a V4 header after the V3 body and the four masks.
/// 52 bytes.
#[derive(FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
struct V4Extra {
    color_space: U32,
    red_coord: [U32; 3],
    green_coord: [U32; 3],
    blue_coord: [U32; 3],
    gamma_red: U32,
    gamma_green: U32,
    gamma_blue: U32,
}

/// The extra fields of a V5 header after the V4 fields. 16 bytes.
#[derive(FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
struct V5Extra {
    intent: U32,
    profile_data: U32,
    profile_size: U32,
    reserved: U32,
}

/// The body of an OS/2 v2 16-byte header after its `size` field. 12 bytes.
#[derive(FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
struct Os2V2_16Body {
    width: U32,
    height: U32,
    planes: U16,
    bits_per_pixel: U16,
}

/// The body of a full OS/2 v2 header after its `size` field. 60 bytes.
#[derive(FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
struct Os2V2Body {
    width: U32,
    height: U32,
    planes: U16,
    bits_per_pixel: U16,
    compression: U32,
    size_of_bitmap: U32,
    horizontal_resolution: U32,
    vertical_resolution: U32,
    colors_used: U32,
    colors_important: U32,
    res_unit: U16,
    reserved: U16,
    orientation: U16,
    halftoning: U16,
    halftone_size1: U32,
    halftone_size2: U32,
    color_space: U32,
    app_data: U32,
}

pub(crate) fn read_file_header(r: &mut ByteReader) -> Result<BitmapFileHeader, ImportError> {
    let _signature = r.u16_le().map_err(ImportError::header_io)?;
    let file_size = r.u32_le().map_err(ImportError::header_io)?;
    let reserved0 = r.u16_le().map_err(ImportError::header_io)?;
    let reserved1 = r.u16_le().map_err(ImportError::header_io)?;
    let bitmap_offset = r.u32_le().map_err(ImportError::header_io)?;

    Ok(BitmapFileHeader {
        file_size,
        reserved0,
        reserved1,
        bitmap_offset,
    })
}

fn compression(raw: u32) -> Result<BitmapCompression, ImportError> {
    BitmapCompression::from_u32(raw).ok_or_else(|| {
        ImportError::new(
            ErrorKind::InvalidDataInImage,
            format!("invalid compression type '{raw}'"),
        )
    })
}

fn fixed_coord(raw: [U32; 3]) -> [f32; 3] {
    [
        crate::convert::fixed_point_2_30(raw[0].get()),
        crate::convert::fixed_point_2_30(raw[1].get()),
        crate::convert::fixed_point_2_30(raw[2].get()),
    ]
}

/// Reads the info header whose 32-bit `size` field has already been
/// consumed, dispatching on its value.
pub(crate) fn read_info_header(
    r: &mut ByteReader,
    size: u32,
) -> Result<(BitmapHeader, HeaderVersion), ImportError> {
    let mut header = BitmapHeader::with_sentinels();
    header.size = size;

    let version = match size {
        12 => {
            let body: V2Body = r.record().map_err(ImportError::header_io)?;
            // i16::MIN has no absolute value; reject it before widening
            if body.height.get() == i16::MIN || body.width.get() == i16::MIN {
                return Err(ImportError::new(
                    ErrorKind::InvalidDataInImage,
                    "V2 header dimension has no representable magnitude",
                ));
            }
            header.width = body.width.get() as i32;
            header.height = body.height.get() as i32;
            header.planes = body.planes.get();
            header.bits_per_pixel = body.bits_per_pixel.get();
            HeaderVersion::V2
        }
        40 | 52 | 56 => {
            let body: V3Body = r.record().map_err(ImportError::header_io)?;
            apply_v3_body(&mut header, &body)?;

            if size >= 52 {
                header.red_mask = r.u32_le().map_err(ImportError::header_io)?;
                header.green_mask = r.u32_le().map_err(ImportError::header_io)?;
                header.blue_mask = r.u32_le().map_err(ImportError::header_io)?;
            }
            if size >= 56 {
                header.alpha_mask = r.u32_le().map_err(ImportError::header_io)?;
            }
            // the plain 40-byte header stores its masks after the header
            // proper, but only under bitfields compression
            if size == 40 && header.compression.is_bitfields() {
                header.red_mask = r.u32_le().map_err(ImportError::header_io)?;
                header.green_mask = r.u32_le().map_err(ImportError::header_io)?;
                header.blue_mask = r.u32_le().map_err(ImportError::header_io)?;
                header.alpha_mask = r.u32_le().map_err(ImportError::header_io)?;
            }
            HeaderVersion::V3
        }
        108 | 124 => {
            let body: V3Body = r.record().map_err(ImportError::header_io)?;
            apply_v3_body(&mut header, &body)?;

            header.red_mask = r.u32_le().map_err(ImportError::header_io)?;
            header.green_mask = r.u32_le().map_err(ImportError::header_io)?;
            header.blue_mask = r.u32_le().map_err(ImportError::header_io)?;
            header.alpha_mask = r.u32_le().map_err(ImportError::header_io)?;

            let extra: V4Extra = r.record().map_err(ImportError::header_io)?;
            header.color_space = BitmapColorSpace::from_u32(extra.color_space.get());
            header.endpoints = Some(BitmapColorEndpoints {
                red: fixed_coord(extra.red_coord),
                green: fixed_coord(extra.green_coord),
                blue: fixed_coord(extra.blue_coord),
                gamma: [
                    crate::convert::fixed_point_16_16(extra.gamma_red.get()),
                    crate::convert::fixed_point_16_16(extra.gamma_green.get()),
                    crate::convert::fixed_point_16_16(extra.gamma_blue.get()),
                ],
            });

            if size == 124 {
                let extra: V5Extra = r.record().map_err(ImportError::header_io)?;
                header.intent = extra.intent.get();
                header.profile_data = extra.profile_data.get();
                header.profile_size = extra.profile_size.get();
                HeaderVersion::V5
            } else {
                HeaderVersion::V4
            }
        }
        16 => {
            let body: Os2V2_16Body = r.record().map_err(ImportError::header_io)?;
            header.width = body.width.get() as i32;
            header.height = body.height.get() as i32;
            header.planes = body.planes.get();
            header.bits_per_pixel = body.bits_per_pixel.get();
            HeaderVersion::Os2V2_16
        }
        64 => {
            let body: Os2V2Body = r.record().map_err(ImportError::header_io)?;
            header.width = body.width.get() as i32;
            header.height = body.height.get() as i32;
            header.planes = body.planes.get();
            header.bits_per_pixel = body.bits_per_pixel.get();
            header.compression = compression(body.compression.get())?;
            header.size_of_bitmap = body.size_of_bitmap.get();
            header.colors_used = body.colors_used.get();
            header.colors_important = body.colors_important.get();
            HeaderVersion::Os2V2
        }
        _ => {
            return Err(ImportError::new(
                ErrorKind::CouldNotReadHeader,
                format!("unrecognized header size '{size}'"),
            ))
        }
    };

    Ok((header, version))
}

fn apply_v3_body(header: &mut BitmapHeader, body: &V3Body) -> Result<(), ImportError> {
    if body.width.get() == i32::MIN || body.height.get() == i32::MIN {
        return Err(ImportError::new(
            ErrorKind::InvalidDataInImage,
            "header dimension has no representable magnitude",
        ));
    }
    header.width = body.width.get();
    header.height = body.height.get();
    header.planes = body.planes.get();
    header.bits_per_pixel = body.bits_per_pixel.get();
    header.compression = compression(body.compression.get())?;
    header.size_of_bitmap = body.size_of_bitmap.get();
    header.horizontal_resolution = body.horizontal_resolution.get();
    header.vertical_resolution = body.vertical_resolution.get();
    header.colors_used = body.colors_used.get();
    header.colors_important = body.colors_important.get();
    Ok(())
}

pub(crate) fn validate_header(header: &BitmapHeader) -> Result<(), ImportError> {
    if header.width == 0 || header.height == 0 {
        return Err(ImportError::new(
            ErrorKind::InvalidDataInImage,
            "image has a zero dimension",
        ));
    }

    if header.abs_width() > MAX_TEXTURE_WIDTH {
        return Err(ImportError::new(
            ErrorKind::DimensionsTooLarge,
            format!(
                "image width of {} pixels is greater than the max supported width of {} pixels",
                header.abs_width(),
                MAX_TEXTURE_WIDTH
            ),
        ));
    }

    if header.abs_height() > MAX_TEXTURE_HEIGHT {
        return Err(ImportError::new(
            ErrorKind::DimensionsTooLarge,
            format!(
                "image height of {} pixels is greater than the max supported height of {} pixels",
                header.abs_height(),
                MAX_TEXTURE_HEIGHT
            ),
        ));
    }

    if !matches!(header.bits_per_pixel, 1 | 2 | 4 | 8 | 16 | 24 | 32) {
        return Err(ImportError::new(
            ErrorKind::InvalidDataInImage,
            format!("invalid bits per pixel value '{}'", header.bits_per_pixel),
        ));
    }

    if matches!(
        header.compression,
        BitmapCompression::Jpeg | BitmapCompression::Png
    ) {
        return Err(ImportError::new(
            ErrorKind::UnsupportedFeature,
            "JPEG and PNG compressed bitmaps are not supported",
        ));
    }

    let rle_mismatch = (header.compression == BitmapCompression::Rle4
        && header.bits_per_pixel != 4)
        || (header.compression == BitmapCompression::Rle8 && header.bits_per_pixel != 8);
    if rle_mismatch {
        return Err(ImportError::new(
            ErrorKind::InvalidDataInImage,
            format!(
                "{:?} compression does not match {} bits per pixel",
                header.compression, header.bits_per_pixel
            ),
        ));
    }

    Ok(())
}

/// Loads the color palette as raw on-disk entries: `[b, g, r]` for V2,
/// `[b, g, r, pad]` for every other variant, stored here uniformly as
/// 4-byte entries.
///
/// A zero `colors_used` with indexed bits-per-pixel implies the full
/// `2^bpp` table. `palette_bytes_available` bounds how much of the table
/// the file actually stores before the pixel data; entries beyond it are
/// synthesized as black. At most 256 entries are kept; the remainder is
/// skipped.
pub(crate) fn load_palette(
    r: &mut ByteReader,
    header: &BitmapHeader,
    version: HeaderVersion,
    palette_bytes_available: Option<u64>,
) -> Result<Vec<[u8; 4]>, ImportError> {
    let mut colors_used = header.colors_used;
    if colors_used == 0 && header.bits_per_pixel < 16 {
        colors_used = 1 << header.bits_per_pixel;
    }

    if colors_used == 0 {
        return Ok(Vec::new());
    }

    let entry_len = version.palette_entry_len();
    let kept = colors_used.min(256) as usize;
    let stored = match palette_bytes_available {
        Some(available) => (available / entry_len as u64).min(kept as u64) as usize,
        None => kept,
    };

    let mut raw = vec![0_u8; stored * entry_len];
    r.read_exact(&mut raw).map_err(ImportError::header_io)?;

    let mut palette: Vec<[u8; 4]> = raw
        .chunks_exact(entry_len)
        .map(|entry| {
            let pad = if entry_len == 4 { entry[3] } else { 0 };
            [entry[0], entry[1], entry[2], pad]
        })
        .collect();
    palette.resize(kept, [0, 0, 0, 0]);

    if colors_used > 256 && palette_bytes_available.is_none() {
        r.skip((colors_used as u64 - 256) * entry_len as u64)
            .map_err(ImportError::header_io)?;
    }

    Ok(palette)
}
