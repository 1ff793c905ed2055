//! DDS decoder: legacy D3D headers, the DX10 extension, and the full
//! mip × face × array surface walk.

mod header;

pub use header::{DdsCaps, DdsCaps2, DdsFlags, DxgiFormat, FourCC, MiscFlags, PixelFormatFlags};

use crate::allocator::{
    allocate_single, negotiate_format, negotiate_layout, Extent, TextureAllocator, TextureParams,
};
use crate::reader::{ByteReader, ReadSeek};
use crate::{
    ErrorKind, Format, ImportError, MipSurfaceKey, Options, TextureDimension, MAX_TEXTURE_HEIGHT,
    MAX_TEXTURE_WIDTH,
};

/// Array sizes beyond this are treated as corrupt rather than allocated.
const MAX_ARRAY_SIZE: u32 = 4096;

/// The parsed DDS header with the optional DX10 extension, in host types.
#[derive(Debug, Clone)]
pub struct DdsHeader {
    pub flags: DdsFlags,
    pub height: u32,
    pub width: u32,
    pub pitch_or_linear_size: u32,
    pub depth: u32,
    pub mip_map_count: u32,
    pub pixel_format: DdsPixelFormat,
    pub caps: DdsCaps,
    pub caps2: DdsCaps2,
    pub dx10: Option<Dx10Header>,
}

#[derive(Debug, Clone)]
pub struct DdsPixelFormat {
    pub flags: PixelFormatFlags,
    pub four_cc: FourCC,
    pub rgb_bit_count: u32,
    pub r_bit_mask: u32,
    pub g_bit_mask: u32,
    pub b_bit_mask: u32,
    pub a_bit_mask: u32,
}

#[derive(Debug, Clone)]
pub struct Dx10Header {
    pub dxgi_format: DxgiFormat,
    pub resource_dimension: u32,
    pub misc_flag: MiscFlags,
    pub array_size: u32,
}

/// Checks the `'DDS '` magic at the start of the stream.
pub(crate) fn check_signature(reader: &mut dyn ReadSeek) -> bool {
    let mut r = ByteReader::new(reader);
    if r.seek_to(0).is_err() {
        return false;
    }
    let mut magic = [0_u8; 4];
    match r.read_at_most(&mut magic) {
        Ok(4) => magic == header::MAGIC,
        _ => false,
    }
}

fn read_header(r: &mut ByteReader) -> Result<DdsHeader, ImportError> {
    let raw: header::RawHeader = r.record().map_err(|_| {
        ImportError::new(
            ErrorKind::CouldNotReadHeader,
            "not enough bytes in file for the dds header",
        )
    })?;

    let pixel_format = DdsPixelFormat {
        flags: PixelFormatFlags::from_bits_retain(raw.pixel_format.flags.get()),
        four_cc: FourCC(raw.pixel_format.four_cc.get()),
        rgb_bit_count: raw.pixel_format.rgb_bit_count.get(),
        r_bit_mask: raw.pixel_format.r_bit_mask.get(),
        g_bit_mask: raw.pixel_format.g_bit_mask.get(),
        b_bit_mask: raw.pixel_format.b_bit_mask.get(),
        a_bit_mask: raw.pixel_format.a_bit_mask.get(),
    };

    let mut header = DdsHeader {
        flags: DdsFlags::from_bits_retain(raw.flags.get()),
        height: raw.height.get(),
        width: raw.width.get(),
        pitch_or_linear_size: raw.pitch_or_linear_size.get(),
        depth: raw.depth.get(),
        mip_map_count: raw.mip_map_count.get(),
        pixel_format,
        caps: DdsCaps::from_bits_retain(raw.caps.get()),
        caps2: DdsCaps2::from_bits_retain(raw.caps2.get()),
        dx10: None,
    };

    let has_dx10 = header.pixel_format.flags.contains(PixelFormatFlags::FOURCC)
        && header.pixel_format.four_cc == FourCC::DX10;
    if has_dx10 {
        let raw: header::RawDx10Header = r.record().map_err(|_| {
            ImportError::new(
                ErrorKind::CouldNotReadHeader,
                "not enough bytes in file for the dds dx10 header",
            )
        })?;
        header.dx10 = Some(Dx10Header {
            dxgi_format: DxgiFormat(raw.dxgi_format.get()),
            resource_dimension: raw.resource_dimension.get(),
            misc_flag: MiscFlags::from_bits_retain(raw.misc_flag.get()),
            array_size: raw.array_size.get(),
        });
    }

    Ok(header)
}

/// Resolves the stored pixel encoding to a GPU format: DX10 first, then
/// legacy FourCC codes, then the channel-mask scan.
fn resolve_format(dds: &DdsHeader) -> Result<Format, ImportError> {
    if let Some(dx10) = &dds.dx10 {
        return header::dxgi_to_format(dx10.dxgi_format).ok_or_else(|| {
            ImportError::new(
                ErrorKind::UnknownFormat,
                format!("unsupported dxgi format {:?}", dx10.dxgi_format),
            )
        });
    }

    let pf = &dds.pixel_format;
    if pf.flags.contains(PixelFormatFlags::FOURCC) {
        return header::four_cc_to_format(pf.four_cc).ok_or_else(|| {
            ImportError::new(
                ErrorKind::UnknownFormat,
                format!("unsupported fourcc format {:?}", pf.four_cc),
            )
        });
    }

    let mask_flags = PixelFormatFlags::ALPHA
        | PixelFormatFlags::ALPHA_PIXELS
        | PixelFormatFlags::RGB
        | PixelFormatFlags::LUMINANCE
        | PixelFormatFlags::BUMP_DUDV;
    if pf.flags.intersects(mask_flags) {
        if pf.rgb_bit_count == 0 {
            return Err(ImportError::new(
                ErrorKind::InvalidDataInImage,
                "format flags require bits per pixel to be greater than 0",
            ));
        }

        let signed = pf.flags.contains(PixelFormatFlags::BUMP_DUDV);
        return header::masks_to_format(
            pf.rgb_bit_count,
            signed,
            pf.r_bit_mask,
            pf.g_bit_mask,
            pf.b_bit_mask,
            pf.a_bit_mask,
        )
        .ok_or_else(|| {
            ImportError::new(
                ErrorKind::UnknownFormat,
                format!(
                    "no gpu format with {} bits per pixel and masks r:{:#x} g:{:#x} b:{:#x} a:{:#x}",
                    pf.rgb_bit_count, pf.r_bit_mask, pf.g_bit_mask, pf.b_bit_mask, pf.a_bit_mask
                ),
            )
        });
    }

    Err(ImportError::new(
        ErrorKind::UnknownFormat,
        "pixel format declares no recognized encoding",
    ))
}

fn resolve_dimension(dds: &DdsHeader) -> TextureDimension {
    let dx10_dimension = dds.dx10.as_ref().map(|d| d.resource_dimension);

    if dds.caps2.contains(DdsCaps2::CUBEMAP) {
        TextureDimension::TextureCube
    } else if dds.caps2.contains(DdsCaps2::VOLUME)
        || dds.flags.contains(DdsFlags::DEPTH)
        || dx10_dimension == Some(header::DDS_DIMENSION_TEXTURE3D)
    {
        TextureDimension::Texture3D
    } else if dx10_dimension == Some(header::DDS_DIMENSION_TEXTURE1D)
        || !dds.flags.contains(DdsFlags::HEIGHT)
    {
        TextureDimension::Texture1D
    } else if dx10_dimension == Some(header::DDS_DIMENSION_TEXTURE2D) {
        let cube = dds
            .dx10
            .as_ref()
            .is_some_and(|d| d.misc_flag.contains(MiscFlags::TEXTURE_CUBE));
        if cube {
            TextureDimension::TextureCube
        } else {
            TextureDimension::Texture2D
        }
    } else {
        TextureDimension::Texture2D
    }
}

pub(crate) fn decode(
    reader: &mut dyn ReadSeek,
    allocator: &mut dyn TextureAllocator,
    options: &Options,
) -> Result<(), ImportError> {
    let mut r = ByteReader::new(reader);
    r.seek_to(header::MAGIC.len() as u64)
        .map_err(ImportError::header_io)?;

    let dds = read_header(&mut r)?;

    if dds.width > MAX_TEXTURE_WIDTH || dds.height > MAX_TEXTURE_HEIGHT {
        return Err(ImportError::new(
            ErrorKind::DimensionsTooLarge,
            format!(
                "image extent {}x{} is greater than the max supported {}x{}",
                dds.width, dds.height, MAX_TEXTURE_WIDTH, MAX_TEXTURE_HEIGHT
            ),
        ));
    }
    if dds.width == 0 {
        return Err(ImportError::new(
            ErrorKind::InvalidDataInImage,
            "image has zero width",
        ));
    }

    let mut format = resolve_format(&dds)?;

    // legacy headers carry no color-space tag; DX10 formats state it
    // themselves
    if dds.dx10.is_none() && options.assume_srgb {
        format = format.srgb_upgrade();
    }

    let dimension = resolve_dimension(&dds);

    let mips = if dds.flags.contains(DdsFlags::MIPMAP_COUNT) {
        dds.mip_map_count.max(1)
    } else {
        1
    };
    let faces = if dimension == TextureDimension::TextureCube {
        6
    } else {
        1
    };
    let depth = if dds.caps2.contains(DdsCaps2::VOLUME) {
        dds.depth.max(1)
    } else {
        1
    };
    let array_size = dds.dx10.as_ref().map_or(1, |d| d.array_size).max(1);

    if array_size > MAX_ARRAY_SIZE {
        return Err(ImportError::new(
            ErrorKind::InvalidDataInImage,
            format!("array size {array_size} is beyond the supported maximum {MAX_ARRAY_SIZE}"),
        ));
    }

    // the protocol still runs for DDS, with nothing to widen into: the file
    // already stores a concrete GPU format
    let layout = negotiate_layout(allocator, format.layout(), &[])?;
    let format = negotiate_format(allocator, layout, &[format])?;

    let params = TextureParams {
        format,
        dimension,
        extent: Extent::new(dds.width, dds.height.max(1), depth),
        array_size,
        faces,
        mips,
    };
    allocate_single(allocator, &params)?;

    let data_start = r.position().map_err(ImportError::pixel_io)?;
    let data_len = r
        .stream_len()
        .map_err(ImportError::pixel_io)?
        .saturating_sub(data_start);

    // a cubemap may omit faces; a face whose bit is clear consumes no bytes
    let partial_cube = dimension == TextureDimension::TextureCube
        && dds.caps2.intersects(DdsCaps2::ALL_FACES);

    let mut read_total = 0_u64;
    for slice in 0..array_size {
        for face in 0..faces {
            if partial_cube && !dds.caps2.contains(DdsCaps2::face_bit(face)) {
                continue;
            }

            for mip in 0..mips {
                let key = MipSurfaceKey {
                    array_slice: slice,
                    face,
                    mip,
                };
                let surface = allocator.access_texture_data(0, key);
                debug_assert_eq!(surface.len(), params.surface_len(mip));

                read_total += surface.len() as u64;
                r.read_exact(surface).map_err(|_| {
                    ImportError::new(
                        ErrorKind::NotEnoughData,
                        format!(
                            "prematurely reached the end of the file. expected {} bytes of texture data, but only had {}",
                            read_total, data_len
                        ),
                    )
                })?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn signature() {
        let mut stream = Cursor::new(b"DDS \0\0\0\0".to_vec());
        assert!(check_signature(&mut stream));
        let mut stream = Cursor::new(b"DDS".to_vec());
        assert!(!check_signature(&mut stream));
        let mut stream = Cursor::new(b"KTX 11".to_vec());
        assert!(!check_signature(&mut stream));
    }

    fn base_raw_header() -> Vec<u8> {
        let mut h = vec![0_u8; header::HEADER_LEN];
        h[0..4].copy_from_slice(&124_u32.to_le_bytes()); // size
        let flags = DdsFlags::CAPS | DdsFlags::HEIGHT | DdsFlags::WIDTH | DdsFlags::PIXEL_FORMAT;
        h[4..8].copy_from_slice(&flags.bits().to_le_bytes());
        h[8..12].copy_from_slice(&4_u32.to_le_bytes()); // height
        h[12..16].copy_from_slice(&4_u32.to_le_bytes()); // width
        h[72..76].copy_from_slice(&32_u32.to_le_bytes()); // pf size
        h
    }

    #[test]
    fn header_parsing_reads_fourcc() {
        let mut bytes = base_raw_header();
        bytes[76..80].copy_from_slice(&PixelFormatFlags::FOURCC.bits().to_le_bytes());
        bytes[80..84].copy_from_slice(b"DXT1");

        let mut cursor = Cursor::new(bytes);
        let mut r = ByteReader::new(&mut cursor);
        let dds = read_header(&mut r).unwrap();
        assert_eq!(dds.pixel_format.four_cc, FourCC::DXT1);
        assert_eq!(resolve_format(&dds).unwrap(), Format::BC1_RGBA_UNORM_BLOCK);
        assert!(dds.dx10.is_none());
    }

    #[test]
    fn truncated_header_fails() {
        let mut cursor = Cursor::new(vec![0_u8; 60]);
        let mut r = ByteReader::new(&mut cursor);
        let err = read_header(&mut r).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CouldNotReadHeader);
    }

    #[test]
    fn dimension_rules() {
        let mut bytes = base_raw_header();
        bytes[108..112]
            .copy_from_slice(&(DdsCaps2::CUBEMAP | DdsCaps2::ALL_FACES).bits().to_le_bytes());
        let mut cursor = Cursor::new(bytes);
        let mut r = ByteReader::new(&mut cursor);
        let dds = read_header(&mut r).unwrap();
        assert_eq!(resolve_dimension(&dds), TextureDimension::TextureCube);

        let mut bytes = base_raw_header();
        bytes[108..112].copy_from_slice(&DdsCaps2::VOLUME.bits().to_le_bytes());
        let mut cursor = Cursor::new(bytes);
        let mut r = ByteReader::new(&mut cursor);
        let dds = read_header(&mut r).unwrap();
        assert_eq!(resolve_dimension(&dds), TextureDimension::Texture3D);

        // no HEIGHT flag means 1D
        let mut bytes = base_raw_header();
        let flags = DdsFlags::CAPS | DdsFlags::WIDTH | DdsFlags::PIXEL_FORMAT;
        bytes[4..8].copy_from_slice(&flags.bits().to_le_bytes());
        let mut cursor = Cursor::new(bytes);
        let mut r = ByteReader::new(&mut cursor);
        let dds = read_header(&mut r).unwrap();
        assert_eq!(resolve_dimension(&dds), TextureDimension::Texture1D);
    }
}
