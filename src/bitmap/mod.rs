//! Bitmap (BMP) decoder.
//!
//! Handles every header variant from the 12-byte V2 record through the
//! 124-byte V5 record and the OS/2 v2 forms, with RGB, bit-field, RLE-4 and
//! RLE-8 pixel data.

mod header;
pub(crate) mod rows;

pub use header::{
    BitmapColorEndpoints, BitmapColorSpace, BitmapCompression, BitmapFileHeader, BitmapHeader,
    HeaderVersion,
};

use crate::allocator::{
    allocate_single, negotiate_format, negotiate_layout, Extent, TextureAllocator, TextureParams,
};
use crate::convert::ChannelMasks;
use crate::reader::{ByteReader, ReadSeek};
use crate::{
    ErrorKind, Format, FormatLayout, ImportError, MipSurfaceKey, Options, TextureDimension,
};

pub(crate) const SIGNATURE: [u8; 2] = *b"BM";

/// Checks the `BM` signature at the start of the stream.
pub(crate) fn check_signature(reader: &mut dyn ReadSeek) -> bool {
    let mut r = ByteReader::new(reader);
    if r.seek_to(0).is_err() {
        return false;
    }
    let mut signature = [0_u8; 2];
    match r.read_at_most(&mut signature) {
        Ok(2) => signature == SIGNATURE,
        _ => false,
    }
}

/// How the pixel data is read, resolved from bits-per-pixel, compression
/// and the bit-field masks.
enum PixelPath {
    Palette,
    PaletteRle,
    /// 16-bit 5-5-5 with the alpha bit forced when the source has none.
    Packed555 { force_alpha: bool },
    Packed565,
    Mask16 { masks: ChannelMasks },
    Rgb24,
    Rgb32,
    Mask32 { masks: ChannelMasks },
}

pub(crate) fn decode(
    reader: &mut dyn ReadSeek,
    allocator: &mut dyn TextureAllocator,
    options: &Options,
) -> Result<(), ImportError> {
    let mut r = ByteReader::new(reader);
    r.seek_to(0).map_err(ImportError::header_io)?;

    let file_header = header::read_file_header(&mut r)?;
    let info_size = r.u32_le().map_err(ImportError::header_io)?;
    let (bmp, version) = header::read_info_header(&mut r, info_size)?;

    header::validate_header(&bmp)?;

    let palette_bytes_available = if file_header.bitmap_offset != 0 {
        let position = r.position().map_err(ImportError::header_io)?;
        Some((file_header.bitmap_offset as u64).saturating_sub(position))
    } else {
        None
    };
    let palette = header::load_palette(&mut r, &bmp, version, palette_bytes_available)?;

    let masks = resolve_masks(&bmp);
    let path = resolve_pixel_path(&bmp, masks);

    // format negotiation: layout phase, then concrete formats for the
    // chosen layout
    let (native, wider) = offered_layouts(&path, options);
    let layout = negotiate_layout(allocator, native, wider)?;

    let srgb = source_is_srgb(&bmp, version, options);
    let candidates = offered_formats(layout, srgb);
    let format = negotiate_format(allocator, layout, &candidates)?;

    let width = bmp.abs_width();
    let height = bmp.abs_height();
    let params = TextureParams {
        format,
        dimension: TextureDimension::Texture2D,
        extent: Extent::new(width, height, 1),
        array_size: 1,
        faces: 1,
        mips: 1,
    };
    allocate_single(allocator, &params)?;

    if file_header.bitmap_offset != 0 {
        r.seek_to(file_header.bitmap_offset as u64)
            .map_err(ImportError::pixel_io)?;
    }

    let surface = allocator.access_texture_data(0, MipSurfaceKey::default());
    debug_assert_eq!(surface.len(), params.surface_len(0));

    let dest_bpp = format.info().block_byte_size as usize;
    let row_pitch = width as usize * dest_bpp;

    if bmp.compression.is_rle() {
        decode_rle(&mut r, &bmp, &palette, surface, row_pitch)
    } else {
        decode_linear(&mut r, &bmp, &path, &palette, layout, surface, row_pitch)
    }
}

/// The bit-field masks in effect: header masks, or the canonical defaults
/// when bit-field compression is declared with all masks zero.
fn resolve_masks(bmp: &BitmapHeader) -> ChannelMasks {
    if !bmp.compression.is_bitfields() {
        return ChannelMasks::new(0, 0, 0, 0);
    }

    if bmp.red_mask == 0 && bmp.green_mask == 0 && bmp.blue_mask == 0 && bmp.alpha_mask == 0 {
        match bmp.bits_per_pixel {
            16 => ChannelMasks::new(0xF800, 0x07E0, 0x001F, 0),
            24 => ChannelMasks::new(0x00FF_0000, 0x0000_FF00, 0x0000_00FF, 0),
            32 => ChannelMasks::new(0x00FF_0000, 0x0000_FF00, 0x0000_00FF, 0xFF00_0000),
            _ => ChannelMasks::new(0, 0, 0, 0),
        }
    } else {
        ChannelMasks::new(bmp.red_mask, bmp.green_mask, bmp.blue_mask, bmp.alpha_mask)
    }
}

fn resolve_pixel_path(bmp: &BitmapHeader, masks: ChannelMasks) -> PixelPath {
    let bitfields = bmp.compression.is_bitfields();

    match bmp.bits_per_pixel {
        1 | 2 | 4 | 8 => {
            if bmp.compression.is_rle() {
                PixelPath::PaletteRle
            } else {
                PixelPath::Palette
            }
        }
        16 => {
            if !bitfields {
                PixelPath::Packed555 { force_alpha: true }
            } else if masks == ChannelMasks::new(0x7C00, 0x03E0, 0x001F, 0) {
                PixelPath::Packed555 { force_alpha: true }
            } else if masks == ChannelMasks::new(0x7C00, 0x03E0, 0x001F, 0x8000) {
                PixelPath::Packed555 { force_alpha: false }
            } else if masks == ChannelMasks::new(0xF800, 0x07E0, 0x001F, 0) {
                PixelPath::Packed565
            } else {
                PixelPath::Mask16 { masks }
            }
        }
        24 => PixelPath::Rgb24,
        32 => {
            if bitfields {
                PixelPath::Mask32 { masks }
            } else {
                PixelPath::Rgb32
            }
        }
        _ => unreachable!("validated earlier"),
    }
}

fn offered_layouts(path: &PixelPath, options: &Options) -> (FormatLayout, &'static [FormatLayout]) {
    use FormatLayout::*;

    match path {
        PixelPath::Palette | PixelPath::PaletteRle => (_8_8_8_8, &[]),
        PixelPath::Packed555 { .. } => (_5_5_5_1, &[_8_8_8, _8_8_8_8]),
        PixelPath::Packed565 => (_5_6_5, &[_8_8_8, _8_8_8_8]),
        PixelPath::Mask16 { masks } => {
            if masks.has_alpha() || options.pad_rgb_with_alpha {
                (_8_8_8_8, &[])
            } else {
                (_8_8_8, &[_8_8_8_8])
            }
        }
        PixelPath::Rgb24 => {
            if options.pad_rgb_with_alpha {
                (_8_8_8_8, &[])
            } else {
                (_8_8_8, &[_8_8_8_8])
            }
        }
        PixelPath::Rgb32 | PixelPath::Mask32 { .. } => (_8_8_8_8, &[]),
    }
}

fn offered_formats(layout: FormatLayout, srgb: bool) -> Vec<Format> {
    let base = match layout {
        FormatLayout::_5_5_5_1 => Format::A1R5G5B5_UNORM_PACK16,
        FormatLayout::_5_6_5 => Format::R5G6B5_UNORM_PACK16,
        FormatLayout::_8_8_8 => Format::R8G8B8_UNORM,
        FormatLayout::_8_8_8_8 => Format::R8G8B8A8_UNORM,
        _ => unreachable!("layout was offered by this decoder"),
    };

    let format = if srgb { base.srgb_upgrade() } else { base };
    vec![format]
}

/// Whether the destination should carry the sRGB encoding: V4/V5 headers
/// say so explicitly; earlier headers carry no color-space tag, so the
/// `assume_srgb` hint decides.
fn source_is_srgb(bmp: &BitmapHeader, version: HeaderVersion, options: &Options) -> bool {
    match version {
        HeaderVersion::V4 | HeaderVersion::V5 => bmp.color_space.is_srgb(),
        _ => options.assume_srgb,
    }
}

/// On-disk pitch of one uncompressed row: the packed bits rounded up to a
/// 4-byte boundary.
fn source_row_pitch(bmp: &BitmapHeader) -> usize {
    let packed = (bmp.abs_width() as usize * bmp.bits_per_pixel as usize + 7) / 8;
    crate::util::round_up_to_multiple(packed, 4)
}

fn decode_linear(
    r: &mut ByteReader,
    bmp: &BitmapHeader,
    path: &PixelPath,
    palette: &[[u8; 4]],
    layout: FormatLayout,
    surface: &mut [u8],
    row_pitch: usize,
) -> Result<(), ImportError> {
    let height = bmp.abs_height() as usize;
    let mut scratch = vec![0_u8; source_row_pitch(bmp)];

    for y in 0..height {
        let dest_y = if bmp.is_bottom_up() { height - 1 - y } else { y };
        let dest = &mut surface[dest_y * row_pitch..(dest_y + 1) * row_pitch];

        r.read_exact(&mut scratch).map_err(ImportError::pixel_io)?;
        decode_row(bmp, path, palette, layout, &scratch, dest)?;
    }

    Ok(())
}

fn decode_row(
    bmp: &BitmapHeader,
    path: &PixelPath,
    palette: &[[u8; 4]],
    layout: FormatLayout,
    src: &[u8],
    dest: &mut [u8],
) -> Result<(), ImportError> {
    use FormatLayout::*;

    match (path, layout) {
        (PixelPath::Palette, _8_8_8_8) => match bmp.bits_per_pixel {
            1 | 2 | 4 => rows::expand_bits_row::<4>(src, bmp.bits_per_pixel, palette, dest),
            8 => rows::expand_8bit_row::<4>(src, palette, dest),
            _ => unreachable!(),
        },
        (PixelPath::Packed555 { force_alpha }, _5_5_5_1) => {
            rows::row_555_packed(src, *force_alpha, dest)
        }
        (PixelPath::Packed555 { force_alpha }, _8_8_8) => {
            rows::row_5551_unpack::<3>(src, *force_alpha, dest)
        }
        (PixelPath::Packed555 { force_alpha }, _8_8_8_8) => {
            rows::row_5551_unpack::<4>(src, *force_alpha, dest)
        }
        (PixelPath::Packed565, _5_6_5) => rows::row_565_packed(src, dest),
        (PixelPath::Packed565, _8_8_8) => rows::row_565_unpack::<3>(src, dest),
        (PixelPath::Packed565, _8_8_8_8) => rows::row_565_unpack::<4>(src, dest),
        (PixelPath::Mask16 { masks }, _8_8_8) => rows::row_16_masked::<3>(src, masks, dest),
        (PixelPath::Mask16 { masks }, _8_8_8_8) => rows::row_16_masked::<4>(src, masks, dest),
        (PixelPath::Rgb24, _8_8_8) => rows::row_24bit::<3>(src, dest),
        (PixelPath::Rgb24, _8_8_8_8) => rows::row_24bit::<4>(src, dest),
        (PixelPath::Rgb32, _8_8_8_8) => rows::row_32bit(src, dest),
        (PixelPath::Mask32 { masks }, _8_8_8_8) => rows::row_32_masked(src, masks, dest),
        _ => {
            return Err(ImportError::new(
                ErrorKind::ConversionError,
                "no conversion kernel for the negotiated layout",
            ))
        }
    }

    Ok(())
}

fn decode_rle(
    r: &mut ByteReader,
    bmp: &BitmapHeader,
    palette: &[[u8; 4]],
    surface: &mut [u8],
    row_pitch: usize,
) -> Result<(), ImportError> {
    let height = bmp.abs_height() as i64;
    let four_bit = bmp.compression == BitmapCompression::Rle4;

    // the compressed stream runs to the end-of-data marker or the end of
    // the file, capped by the declared bitmap size when there is one
    let data_start = r.position().map_err(ImportError::pixel_io)?;
    let stream_len = r.stream_len().map_err(ImportError::pixel_io)?;
    let available = stream_len.saturating_sub(data_start);
    let mut remaining = if bmp.size_of_bitmap > 0 {
        available.min(bmp.size_of_bitmap as u64)
    } else {
        available
    };

    // positive heights are bottom-up; RLE rows advance in write order
    let (mut y, step) = if bmp.is_bottom_up() {
        (height - 1, -1_i64)
    } else {
        (0, 1_i64)
    };

    let mut row_offset = 0_u32;
    while y >= 0 && y < height {
        let dest = &mut surface[y as usize * row_pitch..(y as usize + 1) * row_pitch];
        let outcome =
            rows::decode_rle_row::<4>(r, &mut remaining, dest, row_offset, palette, four_bit)?;

        if outcome.end_of_bitmap {
            break;
        }

        row_offset = outcome.next_row_offset;
        y += step * (outcome.rows_to_skip.max(1) as i64);
    }

    Ok(())
}
