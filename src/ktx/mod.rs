//! KTX v1 decoder: GL-style header, key/value metadata block, and the
//! mip × array × face walk with 4-byte surface padding.

mod gl;

use zerocopy::little_endian::U32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::allocator::{
    allocate_single, negotiate_format, negotiate_layout, Extent, TextureAllocator, TextureParams,
};
use crate::reader::{ByteReader, ReadSeek};
use crate::util::round_up_to_multiple;
use crate::{
    ErrorKind, ImportError, MipSurfaceKey, Options, TextureDimension, MAX_TEXTURE_HEIGHT,
    MAX_TEXTURE_WIDTH,
};

/// The 12-byte KTX 1.1 file identifier: `«KTX 11»\r\n\x1A\n`.
pub(crate) const IDENTIFIER: [u8; 12] = [
    0xAB, 0x4B, 0x54, 0x58, 0x20, 0x31, 0x31, 0xBB, 0x0D, 0x0A, 0x1A, 0x0A,
];

const ENDIANNESS_NATIVE: u32 = 0x0403_0201;
const ENDIANNESS_SWAPPED: u32 = 0x0102_0304;

/// The 52-byte header following the identifier.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub struct KtxHeader {
    pub endianness: U32,
    pub gl_type: U32,
    pub gl_type_size: U32,
    pub gl_format: U32,
    pub gl_internal_format: U32,
    pub gl_base_internal_format: U32,
    pub pixel_width: U32,
    pub pixel_height: U32,
    pub pixel_depth: U32,
    pub number_of_array_elements: U32,
    pub number_of_faces: U32,
    pub number_of_mipmap_levels: U32,
    pub bytes_of_key_value_data: U32,
}

/// One entry of the key/value metadata block: a NUL-terminated UTF-8 key
/// and an opaque value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyValuePair {
    pub key: String,
    pub value: Vec<u8>,
}

/// Checks the 12-byte identifier at the start of the stream.
pub(crate) fn check_signature(reader: &mut dyn ReadSeek) -> bool {
    let mut r = ByteReader::new(reader);
    if r.seek_to(0).is_err() {
        return false;
    }
    let mut identifier = [0_u8; 12];
    match r.read_at_most(&mut identifier) {
        Ok(12) => identifier == IDENTIFIER,
        _ => false,
    }
}

/// Parses the key/value data block into ordered pairs. Duplicate keys are
/// kept. Entries are padded to 4-byte boundaries.
pub fn parse_key_value_data(bytes: &[u8]) -> Result<Vec<KeyValuePair>, ImportError> {
    let mut pairs = Vec::new();
    let mut offset = 0_usize;

    while offset + 4 <= bytes.len() {
        let len = u32::from_le_bytes(bytes[offset..offset + 4].try_into().unwrap()) as usize;
        offset += 4;

        if offset + len > bytes.len() {
            return Err(ImportError::new(
                ErrorKind::InvalidDataInImage,
                "key/value entry runs past the end of the metadata block",
            ));
        }

        let entry = &bytes[offset..offset + len];
        let key_end = entry.iter().position(|&b| b == 0).unwrap_or(entry.len());
        let key = String::from_utf8_lossy(&entry[..key_end]).into_owned();
        let value = entry[(key_end + 1).min(entry.len())..].to_vec();
        pairs.push(KeyValuePair { key, value });

        offset += round_up_to_multiple(len, 4);
    }

    Ok(pairs)
}

fn resolve_dimension(header: &KtxHeader) -> TextureDimension {
    if header.number_of_faces.get() > 1 {
        TextureDimension::TextureCube
    } else if header.pixel_height.get() == 0 {
        TextureDimension::Texture1D
    } else if header.pixel_depth.get() > 0 {
        TextureDimension::Texture3D
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
    r.seek_to(IDENTIFIER.len() as u64)
        .map_err(ImportError::header_io)?;

    let header: KtxHeader = r.record().map_err(|_| {
        ImportError::new(ErrorKind::CouldNotReadHeader, "not enough data for the ktx header")
    })?;

    match header.endianness.get() {
        ENDIANNESS_NATIVE => {}
        ENDIANNESS_SWAPPED => {
            return Err(ImportError::new(
                ErrorKind::UnsupportedFeature,
                "byte-swapped ktx files are not supported",
            ))
        }
        other => {
            return Err(ImportError::new(
                ErrorKind::CouldNotReadHeader,
                format!("invalid endianness field {other:#010x}"),
            ))
        }
    }

    let key_value_len = header.bytes_of_key_value_data.get() as u64;
    let tail = r.stream_len().map_err(ImportError::header_io)?
        - r.position().map_err(ImportError::header_io)?;
    if key_value_len > tail {
        return Err(ImportError::new(
            ErrorKind::CouldNotReadHeader,
            format!("key/value data claims {key_value_len} bytes, but only {tail} remain"),
        ));
    }

    let mut key_value_data = vec![0_u8; key_value_len as usize];
    r.read_exact(&mut key_value_data)
        .map_err(ImportError::header_io)?;
    let _key_values = parse_key_value_data(&key_value_data)?;

    let mut format = gl::translate_format(
        header.gl_internal_format.get(),
        header.gl_format.get(),
        header.gl_type.get(),
    )
    .ok_or_else(|| {
        ImportError::new(
            ErrorKind::UnknownFormat,
            format!(
                "no gpu format for gl internal format {:#06x}, format {:#06x}, type {:#06x}",
                header.gl_internal_format.get(),
                header.gl_format.get(),
                header.gl_type.get()
            ),
        )
    })?;

    if !format.is_srgb() && options.assume_srgb {
        format = format.srgb_upgrade();
    }

    let width = header.pixel_width.get();
    let height = header.pixel_height.get().max(1);
    if width > MAX_TEXTURE_WIDTH || height > MAX_TEXTURE_HEIGHT {
        return Err(ImportError::new(
            ErrorKind::DimensionsTooLarge,
            format!(
                "image extent {width}x{height} is greater than the max supported {MAX_TEXTURE_WIDTH}x{MAX_TEXTURE_HEIGHT}"
            ),
        ));
    }
    if width == 0 {
        return Err(ImportError::new(
            ErrorKind::InvalidDataInImage,
            "image has zero width",
        ));
    }

    let faces = header.number_of_faces.get().max(1);
    if faces != 1 && faces != 6 {
        return Err(ImportError::new(
            ErrorKind::InvalidDataInImage,
            format!("invalid cubemap face count {faces}"),
        ));
    }

    let dimension = resolve_dimension(&header);
    let layout = negotiate_layout(allocator, format.layout(), &[])?;
    let format = negotiate_format(allocator, layout, &[format])?;

    let params = TextureParams {
        format,
        dimension,
        extent: Extent::new(width, height, header.pixel_depth.get().max(1)),
        array_size: header.number_of_array_elements.get().max(1),
        faces,
        mips: header.number_of_mipmap_levels.get().max(1),
    };
    allocate_single(allocator, &params)?;

    let block_byte_size = format.info().block_byte_size as u64;

    for mip in 0..params.mips {
        let image_size = r.u32_le().map_err(|_| {
            ImportError::new(ErrorKind::NotEnoughData, "expected larger file size")
        })? as u64;

        let surface_len = params.surface_len(mip) as u64;
        if image_size < surface_len {
            return Err(ImportError::new(
                ErrorKind::NotEnoughData,
                format!(
                    "mip {mip} stores {image_size} bytes per surface, but the format requires {surface_len}"
                ),
            ));
        }

        for array_slice in 0..params.array_size {
            for face in 0..params.faces {
                let key = MipSurfaceKey {
                    array_slice,
                    face,
                    mip,
                };
                let surface = allocator.access_texture_data(0, key);
                r.read_exact(surface).map_err(ImportError::pixel_io)?;

                // surfaces are padded up to 4 bytes, but never skip less
                // than one block
                let skip = round_up_to_multiple(surface_len, 4).max(block_byte_size) - surface_len;
                r.skip(skip).map_err(ImportError::pixel_io)?;
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use zerocopy::FromZeros;

    #[test]
    fn signature() {
        let mut bytes = IDENTIFIER.to_vec();
        bytes.extend_from_slice(&[0; 8]);
        let mut stream = Cursor::new(bytes);
        assert!(check_signature(&mut stream));

        let mut stream = Cursor::new(b"DDS ....".to_vec());
        assert!(!check_signature(&mut stream));
    }

    #[test]
    fn key_values_preserve_order_and_duplicates() {
        let mut block = Vec::new();
        for (key, value) in [("KTXorientation", "S=r,T=d"), ("author", "x"), ("author", "y")] {
            let len = key.len() + 1 + value.len();
            block.extend_from_slice(&(len as u32).to_le_bytes());
            block.extend_from_slice(key.as_bytes());
            block.push(0);
            block.extend_from_slice(value.as_bytes());
            let padding = (4 - len % 4) % 4;
            block.extend_from_slice(&vec![0; padding]);
        }

        let pairs = parse_key_value_data(&block).unwrap();
        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0].key, "KTXorientation");
        assert_eq!(pairs[0].value, b"S=r,T=d");
        assert_eq!(pairs[1].key, "author");
        assert_eq!(pairs[1].value, b"x");
        assert_eq!(pairs[2].key, "author");
        assert_eq!(pairs[2].value, b"y");
    }

    #[test]
    fn key_value_overflow_is_invalid() {
        let mut block = Vec::new();
        block.extend_from_slice(&100_u32.to_le_bytes());
        block.extend_from_slice(b"abc");
        let err = parse_key_value_data(&block).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidDataInImage);
    }

    #[test]
    fn dimension_rules() {
        let mut header = KtxHeader::new_zeroed();
        header.pixel_width = 4.into();
        header.pixel_height = 4.into();
        header.number_of_faces = 1.into();
        assert_eq!(resolve_dimension(&header), TextureDimension::Texture2D);

        header.number_of_faces = 6.into();
        assert_eq!(resolve_dimension(&header), TextureDimension::TextureCube);

        header.number_of_faces = 1.into();
        header.pixel_height = 0.into();
        assert_eq!(resolve_dimension(&header), TextureDimension::Texture1D);

        header.pixel_height = 4.into();
        header.pixel_depth = 4.into();
        assert_eq!(resolve_dimension(&header), TextureDimension::Texture3D);
    }
}
