//! OpenGL enum constants and the `(internal format, format, type)` → GPU
//! format translation used by the KTX v1 decoder.

#![allow(dead_code)]

use crate::Format;

// pixel types
pub(crate) const GL_UNSIGNED_BYTE: u32 = 0x1401;
pub(crate) const GL_UNSIGNED_SHORT: u32 = 0x1403;
pub(crate) const GL_HALF_FLOAT: u32 = 0x140B;
pub(crate) const GL_FLOAT: u32 = 0x1406;
pub(crate) const GL_UNSIGNED_SHORT_5_6_5: u32 = 0x8363;
pub(crate) const GL_UNSIGNED_SHORT_1_5_5_5_REV: u32 = 0x8366;
pub(crate) const GL_UNSIGNED_INT_2_10_10_10_REV: u32 = 0x8368;
pub(crate) const GL_UNSIGNED_INT_10F_11F_11F_REV: u32 = 0x8C3B;
pub(crate) const GL_UNSIGNED_INT_5_9_9_9_REV: u32 = 0x8C3E;

// pixel formats
pub(crate) const GL_RED: u32 = 0x1903;
pub(crate) const GL_ALPHA: u32 = 0x1906;
pub(crate) const GL_RG: u32 = 0x8227;
pub(crate) const GL_RGB: u32 = 0x1907;
pub(crate) const GL_RGBA: u32 = 0x1908;
pub(crate) const GL_BGR: u32 = 0x80E0;
pub(crate) const GL_BGRA: u32 = 0x80E1;

// sized internal formats
pub(crate) const GL_R8: u32 = 0x8229;
pub(crate) const GL_RG8: u32 = 0x822B;
pub(crate) const GL_RGB8: u32 = 0x8051;
pub(crate) const GL_SRGB8: u32 = 0x8C41;
pub(crate) const GL_RGBA8: u32 = 0x8058;
pub(crate) const GL_SRGB8_ALPHA8: u32 = 0x8C43;
pub(crate) const GL_ALPHA8: u32 = 0x803C;
pub(crate) const GL_R16: u32 = 0x822A;
pub(crate) const GL_RG16: u32 = 0x822C;
pub(crate) const GL_RGBA16: u32 = 0x805B;
pub(crate) const GL_R16F: u32 = 0x822D;
pub(crate) const GL_RG16F: u32 = 0x822F;
pub(crate) const GL_RGBA16F: u32 = 0x881A;
pub(crate) const GL_R32F: u32 = 0x822E;
pub(crate) const GL_RG32F: u32 = 0x8230;
pub(crate) const GL_RGB32F: u32 = 0x8815;
pub(crate) const GL_RGBA32F: u32 = 0x8814;
pub(crate) const GL_RGB565: u32 = 0x8D62;
pub(crate) const GL_RGB5_A1: u32 = 0x8057;
pub(crate) const GL_RGB10_A2: u32 = 0x8059;
pub(crate) const GL_R11F_G11F_B10F: u32 = 0x8C3A;
pub(crate) const GL_RGB9_E5: u32 = 0x8C3D;

// compressed internal formats
pub(crate) const GL_COMPRESSED_RGB_S3TC_DXT1_EXT: u32 = 0x83F0;
pub(crate) const GL_COMPRESSED_RGBA_S3TC_DXT1_EXT: u32 = 0x83F1;
pub(crate) const GL_COMPRESSED_RGBA_S3TC_DXT3_EXT: u32 = 0x83F2;
pub(crate) const GL_COMPRESSED_RGBA_S3TC_DXT5_EXT: u32 = 0x83F3;
pub(crate) const GL_COMPRESSED_SRGB_S3TC_DXT1_EXT: u32 = 0x8C4C;
pub(crate) const GL_COMPRESSED_SRGB_ALPHA_S3TC_DXT1_EXT: u32 = 0x8C4D;
pub(crate) const GL_COMPRESSED_SRGB_ALPHA_S3TC_DXT3_EXT: u32 = 0x8C4E;
pub(crate) const GL_COMPRESSED_SRGB_ALPHA_S3TC_DXT5_EXT: u32 = 0x8C4F;
pub(crate) const GL_COMPRESSED_RED_RGTC1: u32 = 0x8DBB;
pub(crate) const GL_COMPRESSED_SIGNED_RED_RGTC1: u32 = 0x8DBC;
pub(crate) const GL_COMPRESSED_RG_RGTC2: u32 = 0x8DBD;
pub(crate) const GL_COMPRESSED_SIGNED_RG_RGTC2: u32 = 0x8DBE;
pub(crate) const GL_COMPRESSED_RGBA_BPTC_UNORM: u32 = 0x8E8C;
pub(crate) const GL_COMPRESSED_SRGB_ALPHA_BPTC_UNORM: u32 = 0x8E8D;
pub(crate) const GL_COMPRESSED_RGB_BPTC_SIGNED_FLOAT: u32 = 0x8E8E;
pub(crate) const GL_COMPRESSED_RGB_BPTC_UNSIGNED_FLOAT: u32 = 0x8E8F;
pub(crate) const GL_COMPRESSED_R11_EAC: u32 = 0x9270;
pub(crate) const GL_COMPRESSED_SIGNED_R11_EAC: u32 = 0x9271;
pub(crate) const GL_COMPRESSED_RG11_EAC: u32 = 0x9272;
pub(crate) const GL_COMPRESSED_SIGNED_RG11_EAC: u32 = 0x9273;
pub(crate) const GL_COMPRESSED_RGB8_ETC2: u32 = 0x9274;
pub(crate) const GL_COMPRESSED_SRGB8_ETC2: u32 = 0x9275;
pub(crate) const GL_COMPRESSED_RGB8_PUNCHTHROUGH_ALPHA1_ETC2: u32 = 0x9276;
pub(crate) const GL_COMPRESSED_SRGB8_PUNCHTHROUGH_ALPHA1_ETC2: u32 = 0x9277;
pub(crate) const GL_COMPRESSED_RGBA8_ETC2_EAC: u32 = 0x9278;
pub(crate) const GL_COMPRESSED_SRGB8_ALPHA8_ETC2_EAC: u32 = 0x9279;

/// Translates a KTX `(glInternalFormat, glFormat, glType)` triple to a GPU
/// format. Compressed internal formats carry `glFormat == 0` and
/// `glType == 0`.
pub(crate) fn translate_format(
    internal_format: u32,
    gl_format: u32,
    gl_type: u32,
) -> Option<Format> {
    // compressed internal formats stand alone
    if gl_format == 0 && gl_type == 0 {
        return Some(match internal_format {
            GL_COMPRESSED_RGB_S3TC_DXT1_EXT | GL_COMPRESSED_RGBA_S3TC_DXT1_EXT => {
                Format::BC1_RGBA_UNORM_BLOCK
            }
            GL_COMPRESSED_SRGB_S3TC_DXT1_EXT | GL_COMPRESSED_SRGB_ALPHA_S3TC_DXT1_EXT => {
                Format::BC1_RGBA_SRGB_BLOCK
            }
            GL_COMPRESSED_RGBA_S3TC_DXT3_EXT => Format::BC2_UNORM_BLOCK,
            GL_COMPRESSED_SRGB_ALPHA_S3TC_DXT3_EXT => Format::BC2_SRGB_BLOCK,
            GL_COMPRESSED_RGBA_S3TC_DXT5_EXT => Format::BC3_UNORM_BLOCK,
            GL_COMPRESSED_SRGB_ALPHA_S3TC_DXT5_EXT => Format::BC3_SRGB_BLOCK,
            GL_COMPRESSED_RED_RGTC1 => Format::BC4_UNORM_BLOCK,
            GL_COMPRESSED_SIGNED_RED_RGTC1 => Format::BC4_SNORM_BLOCK,
            GL_COMPRESSED_RG_RGTC2 => Format::BC5_UNORM_BLOCK,
            GL_COMPRESSED_SIGNED_RG_RGTC2 => Format::BC5_SNORM_BLOCK,
            GL_COMPRESSED_RGBA_BPTC_UNORM => Format::BC7_UNORM_BLOCK,
            GL_COMPRESSED_SRGB_ALPHA_BPTC_UNORM => Format::BC7_SRGB_BLOCK,
            GL_COMPRESSED_RGB_BPTC_SIGNED_FLOAT => Format::BC6H_SFLOAT_BLOCK,
            GL_COMPRESSED_RGB_BPTC_UNSIGNED_FLOAT => Format::BC6H_UFLOAT_BLOCK,
            GL_COMPRESSED_R11_EAC => Format::EAC_R11_UNORM_BLOCK,
            GL_COMPRESSED_SIGNED_R11_EAC => Format::EAC_R11_SNORM_BLOCK,
            GL_COMPRESSED_RG11_EAC => Format::EAC_R11G11_UNORM_BLOCK,
            GL_COMPRESSED_SIGNED_RG11_EAC => Format::EAC_R11G11_SNORM_BLOCK,
            GL_COMPRESSED_RGB8_ETC2 => Format::ETC2_R8G8B8_UNORM_BLOCK,
            GL_COMPRESSED_SRGB8_ETC2 => Format::ETC2_R8G8B8_SRGB_BLOCK,
            GL_COMPRESSED_RGB8_PUNCHTHROUGH_ALPHA1_ETC2 => Format::ETC2_R8G8B8A1_UNORM_BLOCK,
            GL_COMPRESSED_SRGB8_PUNCHTHROUGH_ALPHA1_ETC2 => Format::ETC2_R8G8B8A1_SRGB_BLOCK,
            GL_COMPRESSED_RGBA8_ETC2_EAC => Format::ETC2_R8G8B8A8_UNORM_BLOCK,
            GL_COMPRESSED_SRGB8_ALPHA8_ETC2_EAC => Format::ETC2_R8G8B8A8_SRGB_BLOCK,
            _ => return None,
        });
    }

    Some(match (internal_format, gl_format, gl_type) {
        (GL_R8, GL_RED, GL_UNSIGNED_BYTE) => Format::R8_UNORM,
        (GL_ALPHA8, GL_ALPHA, GL_UNSIGNED_BYTE) => Format::A8_UNORM,
        (GL_RG8, GL_RG, GL_UNSIGNED_BYTE) => Format::R8G8_UNORM,
        (GL_RGB8, GL_RGB, GL_UNSIGNED_BYTE) => Format::R8G8B8_UNORM,
        (GL_RGB8, GL_BGR, GL_UNSIGNED_BYTE) => Format::B8G8R8_UNORM,
        (GL_SRGB8, GL_RGB, GL_UNSIGNED_BYTE) => Format::R8G8B8_SRGB,
        (GL_SRGB8, GL_BGR, GL_UNSIGNED_BYTE) => Format::B8G8R8_SRGB,
        (GL_RGBA8, GL_RGBA, GL_UNSIGNED_BYTE) => Format::R8G8B8A8_UNORM,
        (GL_RGBA8, GL_BGRA, GL_UNSIGNED_BYTE) => Format::B8G8R8A8_UNORM,
        (GL_SRGB8_ALPHA8, GL_RGBA, GL_UNSIGNED_BYTE) => Format::R8G8B8A8_SRGB,
        (GL_SRGB8_ALPHA8, GL_BGRA, GL_UNSIGNED_BYTE) => Format::B8G8R8A8_SRGB,
        (GL_R16, GL_RED, GL_UNSIGNED_SHORT) => Format::R16_UNORM,
        (GL_RG16, GL_RG, GL_UNSIGNED_SHORT) => Format::R16G16_UNORM,
        (GL_RGBA16, GL_RGBA, GL_UNSIGNED_SHORT) => Format::R16G16B16A16_UNORM,
        (GL_R16F, GL_RED, GL_HALF_FLOAT) => Format::R16_SFLOAT,
        (GL_RG16F, GL_RG, GL_HALF_FLOAT) => Format::R16G16_SFLOAT,
        (GL_RGBA16F, GL_RGBA, GL_HALF_FLOAT) => Format::R16G16B16A16_SFLOAT,
        (GL_R32F, GL_RED, GL_FLOAT) => Format::R32_SFLOAT,
        (GL_RG32F, GL_RG, GL_FLOAT) => Format::R32G32_SFLOAT,
        (GL_RGB32F, GL_RGB, GL_FLOAT) => Format::R32G32B32_SFLOAT,
        (GL_RGBA32F, GL_RGBA, GL_FLOAT) => Format::R32G32B32A32_SFLOAT,
        (GL_RGB565, GL_RGB, GL_UNSIGNED_SHORT_5_6_5) => Format::R5G6B5_UNORM_PACK16,
        (GL_RGB5_A1, GL_BGRA, GL_UNSIGNED_SHORT_1_5_5_5_REV) => Format::A1R5G5B5_UNORM_PACK16,
        (GL_RGB10_A2, GL_RGBA, GL_UNSIGNED_INT_2_10_10_10_REV) => {
            Format::A2B10G10R10_UNORM_PACK32
        }
        (GL_R11F_G11F_B10F, GL_RGB, GL_UNSIGNED_INT_10F_11F_11F_REV) => {
            Format::B10G11R11_UFLOAT_PACK32
        }
        (GL_RGB9_E5, GL_RGB, GL_UNSIGNED_INT_5_9_9_9_REV) => Format::E5B9G9R9_UFLOAT_PACK32,
        _ => return None,
    })
}
