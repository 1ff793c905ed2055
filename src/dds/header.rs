//! On-disk DDS header records, flag words, FourCC codes and the tables
//! resolving them to GPU formats.

use bitflags::bitflags;
use zerocopy::little_endian::U32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::Format;

pub(crate) const MAGIC: [u8; 4] = *b"DDS ";
pub(crate) const HEADER_LEN: usize = 124;
pub(crate) const DX10_HEADER_LEN: usize = 20;

bitflags! {
    /// `dwFlags` of the DDS header.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DdsFlags: u32 {
        const CAPS = 0x1;
        const HEIGHT = 0x2;
        const WIDTH = 0x4;
        const PITCH = 0x8;
        const PIXEL_FORMAT = 0x1000;
        const MIPMAP_COUNT = 0x20000;
        const LINEAR_SIZE = 0x80000;
        const DEPTH = 0x80_0000;

        const _ = !0;
    }
}

bitflags! {
    /// `dwCaps` of the DDS header.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DdsCaps: u32 {
        const COMPLEX = 0x8;
        const MIPMAP = 0x40_0000;
        const TEXTURE = 0x1000;

        const _ = !0;
    }
}

bitflags! {
    /// `dwCaps2` of the DDS header.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct DdsCaps2: u32 {
        const CUBEMAP = 0x200;
        const CUBEMAP_POSITIVE_X = 0x400;
        const CUBEMAP_NEGATIVE_X = 0x800;
        const CUBEMAP_POSITIVE_Y = 0x1000;
        const CUBEMAP_NEGATIVE_Y = 0x2000;
        const CUBEMAP_POSITIVE_Z = 0x4000;
        const CUBEMAP_NEGATIVE_Z = 0x8000;
        const VOLUME = 0x20_0000;

        const _ = !0;
    }
}

impl DdsCaps2 {
    pub const ALL_FACES: DdsCaps2 = DdsCaps2::CUBEMAP_POSITIVE_X
        .union(DdsCaps2::CUBEMAP_NEGATIVE_X)
        .union(DdsCaps2::CUBEMAP_POSITIVE_Y)
        .union(DdsCaps2::CUBEMAP_NEGATIVE_Y)
        .union(DdsCaps2::CUBEMAP_POSITIVE_Z)
        .union(DdsCaps2::CUBEMAP_NEGATIVE_Z);

    /// The face bit for face index 0..6, in +X −X +Y −Y +Z −Z order.
    pub(crate) fn face_bit(face: u32) -> DdsCaps2 {
        match face {
            0 => DdsCaps2::CUBEMAP_POSITIVE_X,
            1 => DdsCaps2::CUBEMAP_NEGATIVE_X,
            2 => DdsCaps2::CUBEMAP_POSITIVE_Y,
            3 => DdsCaps2::CUBEMAP_NEGATIVE_Y,
            4 => DdsCaps2::CUBEMAP_POSITIVE_Z,
            5 => DdsCaps2::CUBEMAP_NEGATIVE_Z,
            _ => DdsCaps2::empty(),
        }
    }
}

bitflags! {
    /// `dwFlags` of the DDS pixel format record.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct PixelFormatFlags: u32 {
        const ALPHA_PIXELS = 0x1;
        const ALPHA = 0x2;
        const FOURCC = 0x4;
        const PAL8 = 0x20;
        const RGB = 0x40;
        const LUMINANCE = 0x2_0000;
        const BUMP_DUDV = 0x8_0000;

        const _ = !0;
    }
}

bitflags! {
    /// `miscFlag` of the DX10 extension header.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct MiscFlags: u32 {
        const TEXTURE_CUBE = 0x4;

        const _ = !0;
    }
}

/// A four-character code, compared as its little-endian 32-bit packing.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCC(pub u32);

impl FourCC {
    pub const fn new(bytes: [u8; 4]) -> Self {
        Self(u32::from_le_bytes(bytes))
    }

    pub const DX10: FourCC = FourCC::new(*b"DX10");
    pub const DXT1: FourCC = FourCC::new(*b"DXT1");
    pub const DXT2: FourCC = FourCC::new(*b"DXT2");
    pub const DXT3: FourCC = FourCC::new(*b"DXT3");
    pub const DXT4: FourCC = FourCC::new(*b"DXT4");
    pub const DXT5: FourCC = FourCC::new(*b"DXT5");
    pub const ATI1: FourCC = FourCC::new(*b"ATI1");
    pub const ATI2: FourCC = FourCC::new(*b"ATI2");
    pub const BC4U: FourCC = FourCC::new(*b"BC4U");
    pub const BC4S: FourCC = FourCC::new(*b"BC4S");
    pub const BC5U: FourCC = FourCC::new(*b"BC5U");
    pub const BC5S: FourCC = FourCC::new(*b"BC5S");
    pub const BC6H: FourCC = FourCC::new(*b"BC6H");
    pub const BC7L: FourCC = FourCC::new(*b"BC7L");
    pub const ETC2: FourCC = FourCC::new(*b"ET2 ");
    pub const ETC2_A: FourCC = FourCC::new(*b"ET2A");
    pub const EAC_R: FourCC = FourCC::new(*b"EAR ");
    pub const EAC_RG: FourCC = FourCC::new(*b"EARG");
}

impl std::fmt::Debug for FourCC {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let bytes = self.0.to_le_bytes();
        if bytes.iter().all(|b| b.is_ascii_graphic() || *b == b' ') {
            write!(
                f,
                "FourCC({}{}{}{})",
                bytes[0] as char, bytes[1] as char, bytes[2] as char, bytes[3] as char
            )
        } else {
            write!(f, "FourCC({})", self.0)
        }
    }
}

/// A DXGI format code from the DX10 extension header. Unknown values are
/// representable; the translation table decides support.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct DxgiFormat(pub u32);

#[allow(non_upper_case_globals, dead_code)]
impl DxgiFormat {
    pub const R32G32B32A32_FLOAT: DxgiFormat = DxgiFormat(2);
    pub const R32G32B32_FLOAT: DxgiFormat = DxgiFormat(6);
    pub const R16G16B16A16_FLOAT: DxgiFormat = DxgiFormat(10);
    pub const R16G16B16A16_UNORM: DxgiFormat = DxgiFormat(11);
    pub const R16G16B16A16_SNORM: DxgiFormat = DxgiFormat(13);
    pub const R32G32_FLOAT: DxgiFormat = DxgiFormat(16);
    pub const R10G10B10A2_UNORM: DxgiFormat = DxgiFormat(24);
    pub const R11G11B10_FLOAT: DxgiFormat = DxgiFormat(26);
    pub const R8G8B8A8_UNORM: DxgiFormat = DxgiFormat(28);
    pub const R8G8B8A8_UNORM_SRGB: DxgiFormat = DxgiFormat(29);
    pub const R8G8B8A8_SNORM: DxgiFormat = DxgiFormat(31);
    pub const R16G16_FLOAT: DxgiFormat = DxgiFormat(34);
    pub const R16G16_UNORM: DxgiFormat = DxgiFormat(35);
    pub const R16G16_SNORM: DxgiFormat = DxgiFormat(37);
    pub const R32_FLOAT: DxgiFormat = DxgiFormat(41);
    pub const R8G8_UNORM: DxgiFormat = DxgiFormat(49);
    pub const R8G8_SNORM: DxgiFormat = DxgiFormat(51);
    pub const R16_FLOAT: DxgiFormat = DxgiFormat(54);
    pub const R16_UNORM: DxgiFormat = DxgiFormat(56);
    pub const R16_SNORM: DxgiFormat = DxgiFormat(58);
    pub const R8_UNORM: DxgiFormat = DxgiFormat(61);
    pub const R8_SNORM: DxgiFormat = DxgiFormat(63);
    pub const A8_UNORM: DxgiFormat = DxgiFormat(65);
    pub const R9G9B9E5_SHAREDEXP: DxgiFormat = DxgiFormat(67);
    pub const BC1_UNORM: DxgiFormat = DxgiFormat(71);
    pub const BC1_UNORM_SRGB: DxgiFormat = DxgiFormat(72);
    pub const BC2_UNORM: DxgiFormat = DxgiFormat(74);
    pub const BC2_UNORM_SRGB: DxgiFormat = DxgiFormat(75);
    pub const BC3_UNORM: DxgiFormat = DxgiFormat(77);
    pub const BC3_UNORM_SRGB: DxgiFormat = DxgiFormat(78);
    pub const BC4_UNORM: DxgiFormat = DxgiFormat(80);
    pub const BC4_SNORM: DxgiFormat = DxgiFormat(81);
    pub const BC5_UNORM: DxgiFormat = DxgiFormat(83);
    pub const BC5_SNORM: DxgiFormat = DxgiFormat(84);
    pub const B5G6R5_UNORM: DxgiFormat = DxgiFormat(85);
    pub const B5G5R5A1_UNORM: DxgiFormat = DxgiFormat(86);
    pub const B8G8R8A8_UNORM: DxgiFormat = DxgiFormat(87);
    pub const B8G8R8X8_UNORM: DxgiFormat = DxgiFormat(88);
    pub const B8G8R8A8_UNORM_SRGB: DxgiFormat = DxgiFormat(91);
    pub const B8G8R8X8_UNORM_SRGB: DxgiFormat = DxgiFormat(93);
    pub const BC6H_UF16: DxgiFormat = DxgiFormat(95);
    pub const BC6H_SF16: DxgiFormat = DxgiFormat(96);
    pub const BC7_UNORM: DxgiFormat = DxgiFormat(98);
    pub const BC7_UNORM_SRGB: DxgiFormat = DxgiFormat(99);
    pub const B4G4R4A4_UNORM: DxgiFormat = DxgiFormat(115);
}

impl std::fmt::Debug for DxgiFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "DxgiFormat({})", self.0)
    }
}

/// The 32-byte `DDS_PIXELFORMAT` record.
#[derive(FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub(crate) struct RawPixelFormat {
    pub size: U32,
    pub flags: U32,
    pub four_cc: U32,
    pub rgb_bit_count: U32,
    pub r_bit_mask: U32,
    pub g_bit_mask: U32,
    pub b_bit_mask: U32,
    pub a_bit_mask: U32,
}

/// The 124-byte DDS header following the magic bytes.
#[derive(FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub(crate) struct RawHeader {
    pub size: U32,
    pub flags: U32,
    pub height: U32,
    pub width: U32,
    pub pitch_or_linear_size: U32,
    pub depth: U32,
    pub mip_map_count: U32,
    pub reserved1: [U32; 11],
    pub pixel_format: RawPixelFormat,
    pub caps: U32,
    pub caps2: U32,
    pub caps3: U32,
    pub caps4: U32,
    pub reserved2: U32,
}

/// The 20-byte DX10 extension header.
#[derive(FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
pub(crate) struct RawDx10Header {
    pub dxgi_format: U32,
    pub resource_dimension: U32,
    pub misc_flag: U32,
    pub array_size: U32,
    pub misc_flags2: U32,
}

pub(crate) const DDS_DIMENSION_TEXTURE1D: u32 = 2;
pub(crate) const DDS_DIMENSION_TEXTURE2D: u32 = 3;
pub(crate) const DDS_DIMENSION_TEXTURE3D: u32 = 4;

/// Maps a DXGI format code to a GPU format. `None` for codes with no
/// supported mapping.
pub(crate) fn dxgi_to_format(dxgi: DxgiFormat) -> Option<Format> {
    Some(match dxgi {
        DxgiFormat::R32G32B32A32_FLOAT => Format::R32G32B32A32_SFLOAT,
        DxgiFormat::R32G32B32_FLOAT => Format::R32G32B32_SFLOAT,
        DxgiFormat::R16G16B16A16_FLOAT => Format::R16G16B16A16_SFLOAT,
        DxgiFormat::R16G16B16A16_UNORM => Format::R16G16B16A16_UNORM,
        DxgiFormat::R16G16B16A16_SNORM => Format::R16G16B16A16_SNORM,
        DxgiFormat::R32G32_FLOAT => Format::R32G32_SFLOAT,
        DxgiFormat::R10G10B10A2_UNORM => Format::A2B10G10R10_UNORM_PACK32,
        DxgiFormat::R11G11B10_FLOAT => Format::B10G11R11_UFLOAT_PACK32,
        DxgiFormat::R8G8B8A8_UNORM => Format::R8G8B8A8_UNORM,
        DxgiFormat::R8G8B8A8_UNORM_SRGB => Format::R8G8B8A8_SRGB,
        DxgiFormat::R8G8B8A8_SNORM => Format::R8G8B8A8_SNORM,
        DxgiFormat::R16G16_FLOAT => Format::R16G16_SFLOAT,
        DxgiFormat::R16G16_UNORM => Format::R16G16_UNORM,
        DxgiFormat::R16G16_SNORM => Format::R16G16_SNORM,
        DxgiFormat::R32_FLOAT => Format::R32_SFLOAT,
        DxgiFormat::R8G8_UNORM => Format::R8G8_UNORM,
        DxgiFormat::R8G8_SNORM => Format::R8G8_SNORM,
        DxgiFormat::R16_FLOAT => Format::R16_SFLOAT,
        DxgiFormat::R16_UNORM => Format::R16_UNORM,
        DxgiFormat::R16_SNORM => Format::R16_SNORM,
        DxgiFormat::R8_UNORM => Format::R8_UNORM,
        DxgiFormat::R8_SNORM => Format::R8_SNORM,
        DxgiFormat::A8_UNORM => Format::A8_UNORM,
        DxgiFormat::R9G9B9E5_SHAREDEXP => Format::E5B9G9R9_UFLOAT_PACK32,
        DxgiFormat::BC1_UNORM => Format::BC1_RGBA_UNORM_BLOCK,
        DxgiFormat::BC1_UNORM_SRGB => Format::BC1_RGBA_SRGB_BLOCK,
        DxgiFormat::BC2_UNORM => Format::BC2_UNORM_BLOCK,
        DxgiFormat::BC2_UNORM_SRGB => Format::BC2_SRGB_BLOCK,
        DxgiFormat::BC3_UNORM => Format::BC3_UNORM_BLOCK,
        DxgiFormat::BC3_UNORM_SRGB => Format::BC3_SRGB_BLOCK,
        DxgiFormat::BC4_UNORM => Format::BC4_UNORM_BLOCK,
        DxgiFormat::BC4_SNORM => Format::BC4_SNORM_BLOCK,
        DxgiFormat::BC5_UNORM => Format::BC5_UNORM_BLOCK,
        DxgiFormat::BC5_SNORM => Format::BC5_SNORM_BLOCK,
        DxgiFormat::B5G6R5_UNORM => Format::R5G6B5_UNORM_PACK16,
        DxgiFormat::B5G5R5A1_UNORM => Format::A1R5G5B5_UNORM_PACK16,
        DxgiFormat::B8G8R8A8_UNORM => Format::B8G8R8A8_UNORM,
        DxgiFormat::B8G8R8X8_UNORM => Format::B8G8R8X8_UNORM,
        DxgiFormat::B8G8R8A8_UNORM_SRGB => Format::B8G8R8A8_SRGB,
        DxgiFormat::BC6H_UF16 => Format::BC6H_UFLOAT_BLOCK,
        DxgiFormat::BC6H_SF16 => Format::BC6H_SFLOAT_BLOCK,
        DxgiFormat::BC7_UNORM => Format::BC7_UNORM_BLOCK,
        DxgiFormat::BC7_UNORM_SRGB => Format::BC7_SRGB_BLOCK,
        DxgiFormat::B4G4R4A4_UNORM => Format::A4R4G4B4_UNORM_PACK16,
        _ => return None,
    })
}

/// Maps a legacy FourCC code to a GPU format.
///
/// Covers the DXT/BC family, the ETC2/EAC extension codes, and the D3D9
/// numeric format codes some old encoders store in the FourCC field.
pub(crate) fn four_cc_to_format(four_cc: FourCC) -> Option<Format> {
    Some(match four_cc {
        FourCC::DXT1 => Format::BC1_RGBA_UNORM_BLOCK,
        FourCC::DXT2 | FourCC::DXT3 => Format::BC2_UNORM_BLOCK,
        FourCC::DXT4 | FourCC::DXT5 => Format::BC3_UNORM_BLOCK,
        FourCC::ATI1 | FourCC::BC4U => Format::BC4_UNORM_BLOCK,
        FourCC::BC4S => Format::BC4_SNORM_BLOCK,
        FourCC::ATI2 | FourCC::BC5U => Format::BC5_UNORM_BLOCK,
        FourCC::BC5S => Format::BC5_SNORM_BLOCK,
        FourCC::BC6H => Format::BC6H_UFLOAT_BLOCK,
        FourCC::BC7L => Format::BC7_UNORM_BLOCK,
        FourCC::ETC2 => Format::ETC2_R8G8B8_UNORM_BLOCK,
        FourCC::ETC2_A => Format::ETC2_R8G8B8A8_UNORM_BLOCK,
        FourCC::EAC_R => Format::EAC_R11_UNORM_BLOCK,
        FourCC::EAC_RG => Format::EAC_R11G11_UNORM_BLOCK,

        // D3DFORMAT constants stored in the FourCC field by old encoders
        FourCC(36) => Format::R16G16B16A16_UNORM,
        FourCC(110) => Format::R16G16B16A16_SNORM,
        FourCC(111) => Format::R16_SFLOAT,
        FourCC(112) => Format::R16G16_SFLOAT,
        FourCC(113) => Format::R16G16B16A16_SFLOAT,
        FourCC(114) => Format::R32_SFLOAT,
        FourCC(115) => Format::R32G32_SFLOAT,
        FourCC(116) => Format::R32G32B32A32_SFLOAT,

        _ => return None,
    })
}

/// Scans the uncompressed format table for an entry matching the pixel
/// format's bit count, signedness and channel masks. First match wins.
pub(crate) fn masks_to_format(
    rgb_bit_count: u32,
    signed: bool,
    r_mask: u32,
    g_mask: u32,
    b_mask: u32,
    a_mask: u32,
) -> Option<Format> {
    Format::ALL.iter().copied().find(|format| {
        let info = format.info();
        !info.is_compressed()
            && !info.is_srgb
            && info.block_byte_size as u32 * 8 == rgb_bit_count
            && info.is_signed == signed
            && info.red.mask() == r_mask
            && info.green.mask() == g_mask
            && info.blue.mask() == b_mask
            && info.alpha.mask() == a_mask
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn four_cc_debug_prints_ascii() {
        assert_eq!(format!("{:?}", FourCC::DXT1), "FourCC(DXT1)");
        assert_eq!(format!("{:?}", FourCC(113)), "FourCC(113)");
    }

    #[test]
    fn raw_header_is_layout_exact() {
        assert_eq!(std::mem::size_of::<RawHeader>(), HEADER_LEN);
        assert_eq!(std::mem::size_of::<RawPixelFormat>(), 32);
        assert_eq!(std::mem::size_of::<RawDx10Header>(), DX10_HEADER_LEN);
    }

    #[test]
    fn srgb_dxgi_codes_map_to_srgb_formats() {
        assert_eq!(
            dxgi_to_format(DxgiFormat::BC1_UNORM_SRGB),
            Some(Format::BC1_RGBA_SRGB_BLOCK)
        );
        assert_eq!(
            dxgi_to_format(DxgiFormat::R8G8B8A8_UNORM_SRGB),
            Some(Format::R8G8B8A8_SRGB)
        );
        assert_eq!(dxgi_to_format(DxgiFormat(0)), None);
    }

    #[test]
    fn legacy_masks_resolve_common_layouts() {
        assert_eq!(
            masks_to_format(32, false, 0xFF, 0xFF00, 0xFF_0000, 0xFF00_0000),
            Some(Format::R8G8B8A8_UNORM)
        );
        assert_eq!(
            masks_to_format(32, false, 0xFF_0000, 0xFF00, 0xFF, 0xFF00_0000),
            Some(Format::B8G8R8A8_UNORM)
        );
        assert_eq!(
            masks_to_format(16, false, 0xF800, 0x07E0, 0x001F, 0),
            Some(Format::R5G6B5_UNORM_PACK16)
        );
        assert_eq!(
            masks_to_format(16, false, 0x7C00, 0x03E0, 0x001F, 0x8000),
            Some(Format::A1R5G5B5_UNORM_PACK16)
        );
        // alpha only
        assert_eq!(masks_to_format(8, false, 0, 0, 0, 0xFF), Some(Format::A8_UNORM));
        // luminance
        assert_eq!(masks_to_format(8, false, 0xFF, 0, 0, 0), Some(Format::R8_UNORM));
        // snorm through the BumpDuDv flag
        assert_eq!(
            masks_to_format(32, true, 0xFF, 0xFF00, 0xFF_0000, 0xFF00_0000),
            Some(Format::R8G8B8A8_SNORM)
        );
        assert_eq!(masks_to_format(16, false, 0x1234, 0, 0, 0), None);
    }

    #[test]
    fn face_bits_cover_standard_order() {
        let mut seen = DdsCaps2::empty();
        for face in 0..6 {
            seen |= DdsCaps2::face_bit(face);
        }
        assert_eq!(seen, DdsCaps2::ALL_FACES);
    }
}
