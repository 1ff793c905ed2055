//! Targa (TGA) decoder.
//!
//! Six decode paths (true-color / color-mapped / gray-scale, each raw or
//! RLE), the optional footer and extension area, and the alpha policy the
//! extension's attributes type dictates.

use crate::allocator::{
    allocate_single, negotiate_format, negotiate_layout, Extent, TextureAllocator, TextureParams,
};
use crate::convert::A1R5G5B5;
use crate::reader::{ByteReader, ReadSeek};
use crate::{
    ErrorKind, Format, FormatLayout, ImportError, MipSurfaceKey, Options, TextureDimension,
    MAX_TEXTURE_HEIGHT, MAX_TEXTURE_WIDTH,
};

pub(crate) const FOOTER_LEN: u64 = 26;
const FOOTER_SIGNATURE: &[u8; 16] = b"TRUEVISION-XFILE";
const EXTENSION_AREA_LEN: u16 = 495;

/// The 18-byte TGA header at the top of the file.
#[derive(Debug, Clone, Copy, Default)]
pub struct TgaHeader {
    pub id_length: u8,
    pub color_map_type: u8,
    pub image_type: u8,
    pub color_map_first_index: u16,
    pub color_map_length: u16,
    pub color_map_entry_size: u8,
    pub x_origin: u16,
    pub y_origin: u16,
    pub width: u16,
    pub height: u16,
    pub bits_per_pixel: u8,
    pub descriptor: u8,
}

/// Corner the first pixel of the file belongs to, bits 5–4 of the
/// descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOrigin {
    LowerLeft,
    LowerRight,
    UpperLeft,
    UpperRight,
}

impl TgaHeader {
    pub fn origin(&self) -> ImageOrigin {
        match (self.descriptor >> 4) & 0b11 {
            0b00 => ImageOrigin::LowerLeft,
            0b01 => ImageOrigin::LowerRight,
            0b10 => ImageOrigin::UpperLeft,
            _ => ImageOrigin::UpperRight,
        }
    }

    pub fn alpha_channel_bits(&self) -> u8 {
        self.descriptor & 0xF
    }

    fn is_color_map(&self) -> bool {
        self.image_type == 1 || self.image_type == 9
    }

    fn is_true_color(&self) -> bool {
        self.image_type == 2 || self.image_type == 10
    }

    fn is_gray_scale(&self) -> bool {
        self.image_type == 3 || self.image_type == 11
    }

    fn is_rle(&self) -> bool {
        (9..=11).contains(&self.image_type)
    }

    /// The bit depth of the color values the image resolves to: the pixel
    /// depth for true-color and gray images, the map entry size for
    /// color-mapped images.
    fn color_depth(&self) -> u8 {
        if self.is_color_map() {
            self.color_map_entry_size
        } else {
            self.bits_per_pixel
        }
    }
}

/// The alpha-channel semantics stored in the extension area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TgaAlphaType {
    NoAlpha,
    IgnoreUndefinedAlpha,
    KeepUndefinedAlpha,
    Alpha,
    PreMultAlpha,
}

impl TgaAlphaType {
    fn from_u8(raw: u8) -> Option<Self> {
        Some(match raw {
            0 => Self::NoAlpha,
            1 => Self::IgnoreUndefinedAlpha,
            2 => Self::KeepUndefinedAlpha,
            3 => Self::Alpha,
            4 => Self::PreMultAlpha,
            _ => return None,
        })
    }

    fn keeps_alpha(self) -> bool {
        matches!(
            self,
            Self::KeepUndefinedAlpha | Self::Alpha | Self::PreMultAlpha
        )
    }
}

fn read_base_header(r: &mut ByteReader) -> std::io::Result<TgaHeader> {
    Ok(TgaHeader {
        id_length: r.u8()?,
        color_map_type: r.u8()?,
        image_type: r.u8()?,
        color_map_first_index: r.u16_le()?,
        color_map_length: r.u16_le()?,
        color_map_entry_size: r.u8()?,
        x_origin: r.u16_le()?,
        y_origin: r.u16_le()?,
        width: r.u16_le()?,
        height: r.u16_le()?,
        bits_per_pixel: r.u8()?,
        descriptor: r.u8()?,
    })
}

fn header_looks_valid(header: &TgaHeader) -> bool {
    if !matches!(header.image_type, 0..=3 | 9..=11) {
        return false;
    }

    if header.color_map_type == 1 {
        if !matches!(header.color_map_entry_size, 8 | 15 | 16 | 24 | 32) {
            return false;
        }
        if !matches!(header.bits_per_pixel, 8 | 16) {
            return false;
        }
    } else if !matches!(header.bits_per_pixel, 8 | 15 | 16 | 24 | 32) {
        return false;
    }

    header.width >= 1 && header.height >= 1
}

fn footer_is_present(r: &mut ByteReader) -> bool {
    let Ok(len) = r.stream_len() else { return false };
    if len < FOOTER_LEN {
        return false;
    }
    if r.seek_from_end(FOOTER_LEN as i64).is_err() {
        return false;
    }

    let mut footer = [0_u8; FOOTER_LEN as usize];
    if !matches!(r.read_at_most(&mut footer), Ok(n) if n as u64 == FOOTER_LEN) {
        return false;
    }

    footer[8..24] == *FOOTER_SIGNATURE && footer[24] == b'.' && footer[25] == 0
}

/// Targa has no magic at the top of the file. The authoritative signature
/// is the footer at `end − 26`; without one, the header fields themselves
/// are validated.
pub(crate) fn check_signature(reader: &mut dyn ReadSeek) -> bool {
    let mut r = ByteReader::new(reader);

    if footer_is_present(&mut r) {
        return true;
    }

    if r.seek_to(0).is_err() {
        return false;
    }
    match read_base_header(&mut r) {
        Ok(header) => header_looks_valid(&header),
        Err(_) => false,
    }
}

/// Reads the extension area's attributes type, if the footer points at a
/// well-formed extension block.
fn read_alpha_type(r: &mut ByteReader) -> Option<TgaAlphaType> {
    if !footer_is_present(r) {
        return None;
    }

    r.seek_from_end(FOOTER_LEN as i64).ok()?;
    let mut footer = [0_u8; 8];
    r.read_exact(&mut footer).ok()?;
    let extension_offset = u32::from_le_bytes(footer[0..4].try_into().unwrap());
    if extension_offset == 0 {
        return None;
    }

    r.seek_to(extension_offset as u64).ok()?;
    let size = r.u16_le().ok()?;
    if size != EXTENSION_AREA_LEN {
        return None;
    }

    // attributes type is the last byte of the 495-byte extension area
    r.skip(EXTENSION_AREA_LEN as u64 - 2 - 1).ok()?;
    TgaAlphaType::from_u8(r.u8().ok()?)
}

/// How the source pixels (or color-map entries) are encoded.
#[derive(Debug, Clone, Copy)]
enum SourceKind {
    Gray,
    /// 15/16-bit `A1R5G5B5`; `force_alpha` overrides the stored bit.
    Packed16 { force_alpha: bool },
    Bgr24,
    /// 32-bit BGRA; `opaque` discards the stored alpha.
    Bgra32 { opaque: bool },
}

impl SourceKind {
    const fn byte_len(self) -> usize {
        match self {
            SourceKind::Gray => 1,
            SourceKind::Packed16 { .. } => 2,
            SourceKind::Bgr24 => 3,
            SourceKind::Bgra32 { .. } => 4,
        }
    }
}

/// How the negotiated destination format stores pixels.
#[derive(Debug, Clone, Copy)]
enum DestKind {
    R8,
    Packed16,
    /// 3 or 4 channel 8-bit; `swap` turns the BGR source order into RGB.
    Rgb { swap: bool },
    Rgba { swap: bool },
}

impl DestKind {
    fn from_format(format: Format) -> Result<Self, ImportError> {
        Ok(match format {
            Format::R8_UNORM => DestKind::R8,
            Format::A1R5G5B5_UNORM_PACK16 => DestKind::Packed16,
            Format::R8G8B8_UNORM | Format::R8G8B8_SRGB => DestKind::Rgb { swap: true },
            Format::B8G8R8_UNORM | Format::B8G8R8_SRGB => DestKind::Rgb { swap: false },
            Format::R8G8B8A8_UNORM | Format::R8G8B8A8_SRGB => DestKind::Rgba { swap: true },
            Format::B8G8R8A8_UNORM | Format::B8G8R8A8_SRGB => DestKind::Rgba { swap: false },
            _ => {
                return Err(ImportError::new(
                    ErrorKind::ConversionError,
                    format!("no targa conversion into {format:?}"),
                ))
            }
        })
    }

    const fn byte_len(self) -> usize {
        match self {
            DestKind::R8 => 1,
            DestKind::Packed16 => 2,
            DestKind::Rgb { .. } => 3,
            DestKind::Rgba { .. } => 4,
        }
    }
}

/// One (source, destination) pixel conversion.
#[derive(Debug, Clone, Copy)]
struct Transform {
    source: SourceKind,
    dest: DestKind,
}

impl Transform {
    fn apply(&self, src: &[u8], dest: &mut [u8]) {
        match (self.source, self.dest) {
            (SourceKind::Gray, DestKind::R8) => dest[0] = src[0],
            (SourceKind::Gray, DestKind::Rgb { .. }) => {
                dest.copy_from_slice(&crate::convert::gray_to_rgb(src[0]));
            }
            (SourceKind::Gray, DestKind::Rgba { .. }) => {
                dest.copy_from_slice(&crate::convert::gray_to_rgba(src[0]));
            }
            (SourceKind::Packed16 { force_alpha }, DestKind::Packed16) => {
                let mut raw = u16::from_le_bytes([src[0], src[1]]);
                if force_alpha {
                    raw |= 0x8000;
                }
                dest.copy_from_slice(&raw.to_le_bytes());
            }
            (SourceKind::Packed16 { force_alpha }, DestKind::Rgba { .. }) => {
                let mut raw = u16::from_le_bytes([src[0], src[1]]);
                if force_alpha {
                    raw |= 0x8000;
                }
                dest.copy_from_slice(&A1R5G5B5::from_u16(raw).to_rgba8());
            }
            (SourceKind::Bgr24, DestKind::Rgb { swap }) => {
                let pixel = [src[0], src[1], src[2]];
                let pixel = if swap {
                    crate::convert::swap_rb3(pixel)
                } else {
                    pixel
                };
                dest.copy_from_slice(&pixel);
            }
            (SourceKind::Bgr24, DestKind::Rgba { swap }) => {
                let pixel = crate::convert::pad_alpha([src[0], src[1], src[2]], 255);
                let pixel = if swap {
                    crate::convert::swap_rb4(pixel)
                } else {
                    pixel
                };
                dest.copy_from_slice(&pixel);
            }
            (SourceKind::Bgra32 { opaque }, DestKind::Rgba { swap }) => {
                let alpha = if opaque { 255 } else { src[3] };
                let pixel = [src[0], src[1], src[2], alpha];
                let pixel = if swap {
                    crate::convert::swap_rb4(pixel)
                } else {
                    pixel
                };
                dest.copy_from_slice(&pixel);
            }
            _ => unreachable!("source and destination kinds were negotiated together"),
        }
    }
}

pub(crate) fn decode(
    reader: &mut dyn ReadSeek,
    allocator: &mut dyn TextureAllocator,
    options: &Options,
) -> Result<(), ImportError> {
    let mut r = ByteReader::new(reader);

    let alpha_type = read_alpha_type(&mut r);

    r.seek_to(0).map_err(ImportError::header_io)?;
    let header = read_base_header(&mut r).map_err(ImportError::header_io)?;

    if header.image_type == 0 {
        return Err(ImportError::new(
            ErrorKind::InvalidDataInImage,
            "no image data in file",
        ));
    }
    if !header_looks_valid(&header) {
        return Err(ImportError::new(
            ErrorKind::InvalidDataInImage,
            format!("image type {} is not a valid image type", header.image_type),
        ));
    }

    match header.origin() {
        ImageOrigin::LowerRight | ImageOrigin::UpperRight => {
            return Err(ImportError::new(
                ErrorKind::UnsupportedFeature,
                "right-origin targa images are not supported",
            ))
        }
        ImageOrigin::LowerLeft | ImageOrigin::UpperLeft => {}
    }

    let width = header.width as u32;
    let height = header.height as u32;
    if width > MAX_TEXTURE_WIDTH || height > MAX_TEXTURE_HEIGHT {
        return Err(ImportError::new(
            ErrorKind::DimensionsTooLarge,
            format!(
                "image extent {width}x{height} is greater than the max supported {MAX_TEXTURE_WIDTH}x{MAX_TEXTURE_HEIGHT}"
            ),
        ));
    }

    r.skip(header.id_length as u64)
        .map_err(ImportError::header_io)?;

    let color_map = if header.color_map_type == 1 {
        let entry_len = (header.color_map_entry_size as usize + 7) / 8;
        let mut data = vec![0_u8; header.color_map_length as usize * entry_len];
        r.read_exact(&mut data).map_err(ImportError::header_io)?;
        data
    } else {
        Vec::new()
    };

    // the extension area's word wins over the descriptor's alpha bits
    let keep_alpha = match alpha_type {
        Some(alpha_type) => alpha_type.keeps_alpha(),
        None => header.alpha_channel_bits() > 0,
    };

    let source = match header.color_depth() {
        8 => SourceKind::Gray,
        15 => SourceKind::Packed16 { force_alpha: true },
        16 => SourceKind::Packed16 {
            force_alpha: !keep_alpha,
        },
        24 => SourceKind::Bgr24,
        32 => SourceKind::Bgra32 { opaque: !keep_alpha },
        other => {
            return Err(ImportError::new(
                ErrorKind::UnknownFormat,
                format!("unsupported pixel depth {other}"),
            ))
        }
    };

    let (native, wider) = offered_layouts(source, options);
    let layout = negotiate_layout(allocator, native, wider)?;
    let candidates = offered_formats(layout, source, options);
    let format = negotiate_format(allocator, layout, &candidates)?;

    let params = TextureParams {
        format,
        dimension: TextureDimension::Texture2D,
        extent: Extent::new(width, height, 1),
        array_size: 1,
        faces: 1,
        mips: 1,
    };
    allocate_single(allocator, &params)?;

    let transform = Transform {
        source,
        dest: DestKind::from_format(format)?,
    };

    let surface = allocator.access_texture_data(0, MipSurfaceKey::default());
    debug_assert_eq!(surface.len(), params.surface_len(0));

    let map_lookup = if header.is_color_map() {
        Some(MapLookup {
            data: &color_map,
            entry_len: source.byte_len(),
            first_index: header.color_map_first_index,
            index_len: (header.bits_per_pixel as usize + 7) / 8,
        })
    } else {
        None
    };

    if header.is_rle() {
        decode_rle(&mut r, surface, transform, map_lookup.as_ref())?;
        if header.origin() == ImageOrigin::LowerLeft {
            flip_rows(surface, width as usize * transform.dest.byte_len());
        }
        Ok(())
    } else {
        decode_raw(&mut r, &header, surface, transform, map_lookup.as_ref())
    }
}

fn offered_layouts(
    source: SourceKind,
    options: &Options,
) -> (FormatLayout, &'static [FormatLayout]) {
    use FormatLayout::*;

    match source {
        SourceKind::Gray => (_8, &[_8_8_8, _8_8_8_8]),
        SourceKind::Packed16 { .. } => (_5_5_5_1, &[_8_8_8_8]),
        SourceKind::Bgr24 => {
            if options.pad_rgb_with_alpha {
                (_8_8_8_8, &[])
            } else {
                (_8_8_8, &[_8_8_8_8])
            }
        }
        SourceKind::Bgra32 { .. } => (_8_8_8_8, &[]),
    }
}

/// Candidate formats for the chosen layout, decoder preference first.
/// Targa stores BGR on disk, so the swizzle-free BGR formats lead.
fn offered_formats(layout: FormatLayout, source: SourceKind, options: &Options) -> Vec<Format> {
    let gray = matches!(source, SourceKind::Gray);
    let packed = matches!(source, SourceKind::Packed16 { .. });

    let base: Vec<Format> = match layout {
        FormatLayout::_8 => vec![Format::R8_UNORM],
        FormatLayout::_5_5_5_1 => vec![Format::A1R5G5B5_UNORM_PACK16],
        FormatLayout::_8_8_8 => vec![Format::B8G8R8_UNORM, Format::R8G8B8_UNORM],
        FormatLayout::_8_8_8_8 if gray || packed => vec![Format::R8G8B8A8_UNORM],
        FormatLayout::_8_8_8_8 => vec![Format::B8G8R8A8_UNORM, Format::R8G8B8A8_UNORM],
        _ => unreachable!("layout was offered by this decoder"),
    };

    // no color-space tag anywhere in a targa file; the hint decides
    if options.assume_srgb {
        base.into_iter().map(Format::srgb_upgrade).collect()
    } else {
        base
    }
}

/// Color-map indirection: per-pixel indices resolve through the map data.
struct MapLookup<'a> {
    data: &'a [u8],
    entry_len: usize,
    first_index: u16,
    index_len: usize,
}

impl MapLookup<'_> {
    /// The map entry for an index, or an all-zero entry when out of range.
    fn entry(&self, index: usize) -> [u8; 4] {
        let mut out = [0_u8; 4];
        let Some(relative) = index.checked_sub(self.first_index as usize) else {
            return out;
        };
        let start = relative * self.entry_len;
        if let Some(entry) = self.data.get(start..start + self.entry_len) {
            out[..self.entry_len].copy_from_slice(entry);
        }
        out
    }

    fn read_index(&self, r: &mut ByteReader) -> std::io::Result<usize> {
        Ok(if self.index_len == 2 {
            r.u16_le()? as usize
        } else {
            r.u8()? as usize
        })
    }
}

fn decode_raw(
    r: &mut ByteReader,
    header: &TgaHeader,
    surface: &mut [u8],
    transform: Transform,
    map: Option<&MapLookup>,
) -> Result<(), ImportError> {
    let width = header.width as usize;
    let height = header.height as usize;
    let dest_len = transform.dest.byte_len();
    let row_pitch = width * dest_len;

    let src_len = match map {
        Some(map) => map.index_len,
        None => transform.source.byte_len(),
    };
    let mut src_row = vec![0_u8; width * src_len];

    for y in 0..height {
        let dest_y = match header.origin() {
            ImageOrigin::LowerLeft => height - 1 - y,
            _ => y,
        };
        let dest_row = &mut surface[dest_y * row_pitch..(dest_y + 1) * row_pitch];

        r.read_exact(&mut src_row).map_err(ImportError::pixel_io)?;
        for x in 0..width {
            let dest = &mut dest_row[x * dest_len..(x + 1) * dest_len];
            match map {
                Some(map) => {
                    let index = match map.index_len {
                        2 => u16::from_le_bytes([src_row[x * 2], src_row[x * 2 + 1]]) as usize,
                        _ => src_row[x] as usize,
                    };
                    let entry = map.entry(index);
                    transform.apply(&entry[..map.entry_len], dest);
                }
                None => transform.apply(&src_row[x * src_len..(x + 1) * src_len], dest),
            }
        }
    }

    Ok(())
}

/// Decodes RLE packets linearly across the whole surface. Every control
/// byte produces exactly its count of pixels; a packet that would write
/// past the end of the image is an error.
fn decode_rle(
    r: &mut ByteReader,
    surface: &mut [u8],
    transform: Transform,
    map: Option<&MapLookup>,
) -> Result<(), ImportError> {
    let dest_len = transform.dest.byte_len();
    let total_pixels = surface.len() / dest_len;
    let mut filled = 0_usize;

    let mut src_pixel = [0_u8; 4];
    let src_len = transform.source.byte_len();

    while filled < total_pixels {
        let control = r.u8().map_err(ImportError::pixel_io)?;
        let count = (control & 0x7F) as usize + 1;

        if filled + count > total_pixels {
            return Err(ImportError::new(
                ErrorKind::InvalidDataInImage,
                "RLE packet writes past the end of the image",
            ));
        }

        if control & 0x80 != 0 {
            // run packet: one pixel value repeated
            read_source_pixel(r, transform, map, &mut src_pixel)?;
            let mut first = [0_u8; 4];
            transform.apply(&src_pixel[..src_len], &mut first[..dest_len]);

            for i in 0..count {
                let at = (filled + i) * dest_len;
                surface[at..at + dest_len].copy_from_slice(&first[..dest_len]);
            }
        } else {
            // literal packet: count individual pixels
            for i in 0..count {
                read_source_pixel(r, transform, map, &mut src_pixel)?;
                let at = (filled + i) * dest_len;
                transform.apply(&src_pixel[..src_len], &mut surface[at..at + dest_len]);
            }
        }

        filled += count;
    }

    Ok(())
}

fn read_source_pixel(
    r: &mut ByteReader,
    transform: Transform,
    map: Option<&MapLookup>,
    out: &mut [u8; 4],
) -> Result<(), ImportError> {
    match map {
        Some(map) => {
            let index = map.read_index(r).map_err(ImportError::pixel_io)?;
            *out = map.entry(index);
        }
        None => {
            let len = transform.source.byte_len();
            r.read_exact(&mut out[..len]).map_err(ImportError::pixel_io)?;
        }
    }
    Ok(())
}

fn flip_rows(surface: &mut [u8], row_pitch: usize) {
    if row_pitch == 0 {
        return;
    }
    let rows = surface.len() / row_pitch;
    for y in 0..rows / 2 {
        let (top, bottom) = surface.split_at_mut((rows - 1 - y) * row_pitch);
        top[y * row_pitch..(y + 1) * row_pitch].swap_with_slice(&mut bottom[..row_pitch]);
    }
}
