use crate::FormatLayout;

/// A color channel of a pixel format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Red,
    Green,
    Blue,
    Alpha,
}

/// The bit position of one channel within a packed pixel.
///
/// `width == 0` means the channel is absent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BitRange {
    pub offset: u8,
    pub width: u8,
}

impl BitRange {
    pub const NONE: BitRange = BitRange { offset: 0, width: 0 };

    pub const fn new(offset: u8, width: u8) -> Self {
        Self { offset, width }
    }

    pub const fn is_empty(&self) -> bool {
        self.width == 0
    }

    /// The channel mask within a pixel no wider than 32 bits.
    ///
    /// Returns 0 for absent channels and for channels that do not fit into
    /// 32 bits (e.g. the upper half of a 64-bit pixel).
    pub const fn mask(&self) -> u32 {
        if self.width == 0 || self.offset as u32 + self.width as u32 > 32 {
            return 0;
        }
        if self.width == 32 {
            u32::MAX
        } else {
            ((1_u32 << self.width) - 1) << self.offset
        }
    }

    /// The maximum unsigned value the channel can hold.
    pub const fn max_value(&self) -> u32 {
        if self.width == 0 {
            0
        } else if self.width >= 32 {
            u32::MAX
        } else {
            (1_u32 << self.width) - 1
        }
    }
}

/// Metadata describing the byte and bit layout of a [`Format`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInfo {
    /// Bytes per texel for uncompressed formats, bytes per block for
    /// block-compressed formats.
    pub block_byte_size: u8,
    /// Texels covered by one block: (1, 1) for uncompressed, (4, 4) for
    /// BC/ETC.
    pub block_extent: (u8, u8),
    pub red: BitRange,
    pub green: BitRange,
    pub blue: BitRange,
    pub alpha: BitRange,
    pub is_signed: bool,
    pub is_srgb: bool,
    pub layout: FormatLayout,
    pub channel_count: u8,
}

impl FormatInfo {
    pub const fn channel(&self, channel: Channel) -> BitRange {
        match channel {
            Channel::Red => self.red,
            Channel::Green => self.green,
            Channel::Blue => self.blue,
            Channel::Alpha => self.alpha,
        }
    }

    pub const fn is_compressed(&self) -> bool {
        self.block_extent.0 != 1 || self.block_extent.1 != 1
    }
}

/// The closed set of GPU pixel formats the decoders can produce.
///
/// Naming follows the Vulkan convention: the channel order reads from the
/// lowest memory address for byte-oriented formats, and from the most
/// significant bit for `_PACK16`/`_PACK32` formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
#[allow(non_camel_case_types)]
pub enum Format {
    // 8 bits per channel
    R8_UNORM,
    R8_SNORM,
    A8_UNORM,
    R8G8_UNORM,
    R8G8_SNORM,
    R8G8B8_UNORM,
    R8G8B8_SRGB,
    B8G8R8_UNORM,
    B8G8R8_SRGB,
    R8G8B8A8_UNORM,
    R8G8B8A8_SRGB,
    R8G8B8A8_SNORM,
    B8G8R8A8_UNORM,
    B8G8R8A8_SRGB,
    B8G8R8X8_UNORM,

    // packed 16-bit
    R5G6B5_UNORM_PACK16,
    A1R5G5B5_UNORM_PACK16,
    A4R4G4B4_UNORM_PACK16,

    // 16 bits per channel
    R16_UNORM,
    R16_SNORM,
    R16_SFLOAT,
    R16G16_UNORM,
    R16G16_SNORM,
    R16G16_SFLOAT,
    R16G16B16A16_UNORM,
    R16G16B16A16_SNORM,
    R16G16B16A16_SFLOAT,

    // packed 32-bit
    A2B10G10R10_UNORM_PACK32,
    B10G11R11_UFLOAT_PACK32,
    E5B9G9R9_UFLOAT_PACK32,

    // 32 bits per channel
    R32_SFLOAT,
    R32G32_SFLOAT,
    R32G32B32_SFLOAT,
    R32G32B32A32_SFLOAT,

    // block compressed
    BC1_RGBA_UNORM_BLOCK,
    BC1_RGBA_SRGB_BLOCK,
    BC2_UNORM_BLOCK,
    BC2_SRGB_BLOCK,
    BC3_UNORM_BLOCK,
    BC3_SRGB_BLOCK,
    BC4_UNORM_BLOCK,
    BC4_SNORM_BLOCK,
    BC5_UNORM_BLOCK,
    BC5_SNORM_BLOCK,
    BC6H_UFLOAT_BLOCK,
    BC6H_SFLOAT_BLOCK,
    BC7_UNORM_BLOCK,
    BC7_SRGB_BLOCK,
    ETC2_R8G8B8_UNORM_BLOCK,
    ETC2_R8G8B8_SRGB_BLOCK,
    ETC2_R8G8B8A1_UNORM_BLOCK,
    ETC2_R8G8B8A1_SRGB_BLOCK,
    ETC2_R8G8B8A8_UNORM_BLOCK,
    ETC2_R8G8B8A8_SRGB_BLOCK,
    EAC_R11_UNORM_BLOCK,
    EAC_R11_SNORM_BLOCK,
    EAC_R11G11_UNORM_BLOCK,
    EAC_R11G11_SNORM_BLOCK,
}

const fn uncompressed(
    size: u8,
    layout: FormatLayout,
    count: u8,
    r: BitRange,
    g: BitRange,
    b: BitRange,
    a: BitRange,
    signed: bool,
    srgb: bool,
) -> FormatInfo {
    FormatInfo {
        block_byte_size: size,
        block_extent: (1, 1),
        red: r,
        green: g,
        blue: b,
        alpha: a,
        is_signed: signed,
        is_srgb: srgb,
        layout,
        channel_count: count,
    }
}

const fn block(size: u8, channels: u8, signed: bool, srgb: bool) -> FormatInfo {
    FormatInfo {
        block_byte_size: size,
        block_extent: (4, 4),
        red: BitRange::NONE,
        green: BitRange::NONE,
        blue: BitRange::NONE,
        alpha: BitRange::NONE,
        is_signed: signed,
        is_srgb: srgb,
        layout: FormatLayout::Block,
        channel_count: channels,
    }
}

const fn bits(offset: u8, width: u8) -> BitRange {
    BitRange::new(offset, width)
}

const NO_BITS: BitRange = BitRange::NONE;

impl Format {
    /// Every format, in declaration order. Used by the DDS legacy mask scan,
    /// which takes the first matching entry.
    pub const ALL: &'static [Format] = &[
        Format::R8_UNORM,
        Format::R8_SNORM,
        Format::A8_UNORM,
        Format::R8G8_UNORM,
        Format::R8G8_SNORM,
        Format::R8G8B8_UNORM,
        Format::R8G8B8_SRGB,
        Format::B8G8R8_UNORM,
        Format::B8G8R8_SRGB,
        Format::R8G8B8A8_UNORM,
        Format::R8G8B8A8_SRGB,
        Format::R8G8B8A8_SNORM,
        Format::B8G8R8A8_UNORM,
        Format::B8G8R8A8_SRGB,
        Format::B8G8R8X8_UNORM,
        Format::R5G6B5_UNORM_PACK16,
        Format::A1R5G5B5_UNORM_PACK16,
        Format::A4R4G4B4_UNORM_PACK16,
        Format::R16_UNORM,
        Format::R16_SNORM,
        Format::R16_SFLOAT,
        Format::R16G16_UNORM,
        Format::R16G16_SNORM,
        Format::R16G16_SFLOAT,
        Format::R16G16B16A16_UNORM,
        Format::R16G16B16A16_SNORM,
        Format::R16G16B16A16_SFLOAT,
        Format::A2B10G10R10_UNORM_PACK32,
        Format::B10G11R11_UFLOAT_PACK32,
        Format::E5B9G9R9_UFLOAT_PACK32,
        Format::R32_SFLOAT,
        Format::R32G32_SFLOAT,
        Format::R32G32B32_SFLOAT,
        Format::R32G32B32A32_SFLOAT,
        Format::BC1_RGBA_UNORM_BLOCK,
        Format::BC1_RGBA_SRGB_BLOCK,
        Format::BC2_UNORM_BLOCK,
        Format::BC2_SRGB_BLOCK,
        Format::BC3_UNORM_BLOCK,
        Format::BC3_SRGB_BLOCK,
        Format::BC4_UNORM_BLOCK,
        Format::BC4_SNORM_BLOCK,
        Format::BC5_UNORM_BLOCK,
        Format::BC5_SNORM_BLOCK,
        Format::BC6H_UFLOAT_BLOCK,
        Format::BC6H_SFLOAT_BLOCK,
        Format::BC7_UNORM_BLOCK,
        Format::BC7_SRGB_BLOCK,
        Format::ETC2_R8G8B8_UNORM_BLOCK,
        Format::ETC2_R8G8B8_SRGB_BLOCK,
        Format::ETC2_R8G8B8A1_UNORM_BLOCK,
        Format::ETC2_R8G8B8A1_SRGB_BLOCK,
        Format::ETC2_R8G8B8A8_UNORM_BLOCK,
        Format::ETC2_R8G8B8A8_SRGB_BLOCK,
        Format::EAC_R11_UNORM_BLOCK,
        Format::EAC_R11_SNORM_BLOCK,
        Format::EAC_R11G11_UNORM_BLOCK,
        Format::EAC_R11G11_SNORM_BLOCK,
    ];

    /// The layout and channel metadata of this format.
    pub const fn info(self) -> &'static FormatInfo {
        macro_rules! table {
            ($($variant:ident => $info:expr;)*) => {
                match self {
                    $(Format::$variant => {
                        const INFO: FormatInfo = $info;
                        &INFO
                    })*
                }
            };
        }

        use FormatLayout as L;

        table! {
            R8_UNORM => uncompressed(1, L::_8, 1, bits(0, 8), NO_BITS, NO_BITS, NO_BITS, false, false);
            R8_SNORM => uncompressed(1, L::_8, 1, bits(0, 8), NO_BITS, NO_BITS, NO_BITS, true, false);
            A8_UNORM => uncompressed(1, L::_8, 1, NO_BITS, NO_BITS, NO_BITS, bits(0, 8), false, false);
            R8G8_UNORM => uncompressed(2, L::_8_8, 2, bits(0, 8), bits(8, 8), NO_BITS, NO_BITS, false, false);
            R8G8_SNORM => uncompressed(2, L::_8_8, 2, bits(0, 8), bits(8, 8), NO_BITS, NO_BITS, true, false);
            R8G8B8_UNORM => uncompressed(3, L::_8_8_8, 3, bits(0, 8), bits(8, 8), bits(16, 8), NO_BITS, false, false);
            R8G8B8_SRGB => uncompressed(3, L::_8_8_8, 3, bits(0, 8), bits(8, 8), bits(16, 8), NO_BITS, false, true);
            B8G8R8_UNORM => uncompressed(3, L::_8_8_8, 3, bits(16, 8), bits(8, 8), bits(0, 8), NO_BITS, false, false);
            B8G8R8_SRGB => uncompressed(3, L::_8_8_8, 3, bits(16, 8), bits(8, 8), bits(0, 8), NO_BITS, false, true);
            R8G8B8A8_UNORM => uncompressed(4, L::_8_8_8_8, 4, bits(0, 8), bits(8, 8), bits(16, 8), bits(24, 8), false, false);
            R8G8B8A8_SRGB => uncompressed(4, L::_8_8_8_8, 4, bits(0, 8), bits(8, 8), bits(16, 8), bits(24, 8), false, true);
            R8G8B8A8_SNORM => uncompressed(4, L::_8_8_8_8, 4, bits(0, 8), bits(8, 8), bits(16, 8), bits(24, 8), true, false);
            B8G8R8A8_UNORM => uncompressed(4, L::_8_8_8_8, 4, bits(16, 8), bits(8, 8), bits(0, 8), bits(24, 8), false, false);
            B8G8R8A8_SRGB => uncompressed(4, L::_8_8_8_8, 4, bits(16, 8), bits(8, 8), bits(0, 8), bits(24, 8), false, true);
            B8G8R8X8_UNORM => uncompressed(4, L::_8_8_8_8, 3, bits(16, 8), bits(8, 8), bits(0, 8), NO_BITS, false, false);

            R5G6B5_UNORM_PACK16 => uncompressed(2, L::_5_6_5, 3, bits(11, 5), bits(5, 6), bits(0, 5), NO_BITS, false, false);
            A1R5G5B5_UNORM_PACK16 => uncompressed(2, L::_5_5_5_1, 4, bits(10, 5), bits(5, 5), bits(0, 5), bits(15, 1), false, false);
            A4R4G4B4_UNORM_PACK16 => uncompressed(2, L::_4_4_4_4, 4, bits(8, 4), bits(4, 4), bits(0, 4), bits(12, 4), false, false);

            R16_UNORM => uncompressed(2, L::_16, 1, bits(0, 16), NO_BITS, NO_BITS, NO_BITS, false, false);
            R16_SNORM => uncompressed(2, L::_16, 1, bits(0, 16), NO_BITS, NO_BITS, NO_BITS, true, false);
            R16_SFLOAT => uncompressed(2, L::_16, 1, bits(0, 16), NO_BITS, NO_BITS, NO_BITS, true, false);
            R16G16_UNORM => uncompressed(4, L::_16_16, 2, bits(0, 16), bits(16, 16), NO_BITS, NO_BITS, false, false);
            R16G16_SNORM => uncompressed(4, L::_16_16, 2, bits(0, 16), bits(16, 16), NO_BITS, NO_BITS, true, false);
            R16G16_SFLOAT => uncompressed(4, L::_16_16, 2, bits(0, 16), bits(16, 16), NO_BITS, NO_BITS, true, false);
            R16G16B16A16_UNORM => uncompressed(8, L::_16_16_16_16, 4, bits(0, 16), bits(16, 16), bits(32, 16), bits(48, 16), false, false);
            R16G16B16A16_SNORM => uncompressed(8, L::_16_16_16_16, 4, bits(0, 16), bits(16, 16), bits(32, 16), bits(48, 16), true, false);
            R16G16B16A16_SFLOAT => uncompressed(8, L::_16_16_16_16, 4, bits(0, 16), bits(16, 16), bits(32, 16), bits(48, 16), true, false);

            A2B10G10R10_UNORM_PACK32 => uncompressed(4, L::_10_10_10_2, 4, bits(0, 10), bits(10, 10), bits(20, 10), bits(30, 2), false, false);
            B10G11R11_UFLOAT_PACK32 => uncompressed(4, L::_11_11_10, 3, bits(0, 11), bits(11, 11), bits(22, 10), NO_BITS, false, false);
            E5B9G9R9_UFLOAT_PACK32 => uncompressed(4, L::_9_9_9_5, 3, bits(0, 9), bits(9, 9), bits(18, 9), NO_BITS, false, false);

            R32_SFLOAT => uncompressed(4, L::_32, 1, bits(0, 32), NO_BITS, NO_BITS, NO_BITS, true, false);
            R32G32_SFLOAT => uncompressed(8, L::_32_32, 2, bits(0, 32), bits(32, 32), NO_BITS, NO_BITS, true, false);
            R32G32B32_SFLOAT => uncompressed(12, L::_32_32_32, 3, bits(0, 32), bits(32, 32), bits(64, 32), NO_BITS, true, false);
            R32G32B32A32_SFLOAT => uncompressed(16, L::_32_32_32_32, 4, bits(0, 32), bits(32, 32), bits(64, 32), bits(96, 32), true, false);

            BC1_RGBA_UNORM_BLOCK => block(8, 4, false, false);
            BC1_RGBA_SRGB_BLOCK => block(8, 4, false, true);
            BC2_UNORM_BLOCK => block(16, 4, false, false);
            BC2_SRGB_BLOCK => block(16, 4, false, true);
            BC3_UNORM_BLOCK => block(16, 4, false, false);
            BC3_SRGB_BLOCK => block(16, 4, false, true);
            BC4_UNORM_BLOCK => block(8, 1, false, false);
            BC4_SNORM_BLOCK => block(8, 1, true, false);
            BC5_UNORM_BLOCK => block(16, 2, false, false);
            BC5_SNORM_BLOCK => block(16, 2, true, false);
            BC6H_UFLOAT_BLOCK => block(16, 3, false, false);
            BC6H_SFLOAT_BLOCK => block(16, 3, true, false);
            BC7_UNORM_BLOCK => block(16, 4, false, false);
            BC7_SRGB_BLOCK => block(16, 4, false, true);
            ETC2_R8G8B8_UNORM_BLOCK => block(8, 3, false, false);
            ETC2_R8G8B8_SRGB_BLOCK => block(8, 3, false, true);
            ETC2_R8G8B8A1_UNORM_BLOCK => block(8, 4, false, false);
            ETC2_R8G8B8A1_SRGB_BLOCK => block(8, 4, false, true);
            ETC2_R8G8B8A8_UNORM_BLOCK => block(16, 4, false, false);
            ETC2_R8G8B8A8_SRGB_BLOCK => block(16, 4, false, true);
            EAC_R11_UNORM_BLOCK => block(8, 1, false, false);
            EAC_R11_SNORM_BLOCK => block(8, 1, true, false);
            EAC_R11G11_UNORM_BLOCK => block(16, 2, false, false);
            EAC_R11G11_SNORM_BLOCK => block(16, 2, true, false);
        }
    }

    pub const fn layout(self) -> FormatLayout {
        self.info().layout
    }

    pub const fn is_srgb(self) -> bool {
        self.info().is_srgb
    }

    pub const fn is_compressed(self) -> bool {
        self.info().is_compressed()
    }

    pub const fn has_channel(self, channel: Channel) -> bool {
        !self.info().channel(channel).is_empty()
    }

    /// The bit mask of one channel within the packed pixel, or `None` when
    /// the format has no such channel or the channel does not fit into the
    /// low 32 bits.
    pub fn channel_bit_mask(self, channel: Channel) -> Option<u32> {
        let range = self.info().channel(channel);
        let mask = range.mask();
        if mask == 0 {
            None
        } else {
            Some(mask)
        }
    }

    /// The sRGB-encoded counterpart of a linear format and vice versa.
    ///
    /// `None` for formats without a paired encoding (signed, float, packed
    /// sub-byte and single-channel formats).
    pub const fn srgb_twin(self) -> Option<Format> {
        Some(match self {
            Format::R8G8B8_UNORM => Format::R8G8B8_SRGB,
            Format::R8G8B8_SRGB => Format::R8G8B8_UNORM,
            Format::B8G8R8_UNORM => Format::B8G8R8_SRGB,
            Format::B8G8R8_SRGB => Format::B8G8R8_UNORM,
            Format::R8G8B8A8_UNORM => Format::R8G8B8A8_SRGB,
            Format::R8G8B8A8_SRGB => Format::R8G8B8A8_UNORM,
            Format::B8G8R8A8_UNORM => Format::B8G8R8A8_SRGB,
            Format::B8G8R8A8_SRGB => Format::B8G8R8A8_UNORM,
            Format::BC1_RGBA_UNORM_BLOCK => Format::BC1_RGBA_SRGB_BLOCK,
            Format::BC1_RGBA_SRGB_BLOCK => Format::BC1_RGBA_UNORM_BLOCK,
            Format::BC2_UNORM_BLOCK => Format::BC2_SRGB_BLOCK,
            Format::BC2_SRGB_BLOCK => Format::BC2_UNORM_BLOCK,
            Format::BC3_UNORM_BLOCK => Format::BC3_SRGB_BLOCK,
            Format::BC3_SRGB_BLOCK => Format::BC3_UNORM_BLOCK,
            Format::BC7_UNORM_BLOCK => Format::BC7_SRGB_BLOCK,
            Format::BC7_SRGB_BLOCK => Format::BC7_UNORM_BLOCK,
            Format::ETC2_R8G8B8_UNORM_BLOCK => Format::ETC2_R8G8B8_SRGB_BLOCK,
            Format::ETC2_R8G8B8_SRGB_BLOCK => Format::ETC2_R8G8B8_UNORM_BLOCK,
            Format::ETC2_R8G8B8A1_UNORM_BLOCK => Format::ETC2_R8G8B8A1_SRGB_BLOCK,
            Format::ETC2_R8G8B8A1_SRGB_BLOCK => Format::ETC2_R8G8B8A1_UNORM_BLOCK,
            Format::ETC2_R8G8B8A8_UNORM_BLOCK => Format::ETC2_R8G8B8A8_SRGB_BLOCK,
            Format::ETC2_R8G8B8A8_SRGB_BLOCK => Format::ETC2_R8G8B8A8_UNORM_BLOCK,
            _ => return None,
        })
    }

    /// Whether this is a linear 8-bit-per-channel UNORM color format, i.e.
    /// one the `assume_srgb` option is allowed to upgrade.
    pub const fn is_8bit_unorm_color(self) -> bool {
        matches!(
            self,
            Format::R8G8B8_UNORM
                | Format::B8G8R8_UNORM
                | Format::R8G8B8A8_UNORM
                | Format::B8G8R8A8_UNORM
        )
    }

    /// The sRGB twin when this is an upgradeable color format, otherwise the
    /// format unchanged.
    pub const fn srgb_upgrade(self) -> Format {
        if self.is_8bit_unorm_color() {
            match self.srgb_twin() {
                Some(twin) => twin,
                None => self,
            }
        } else {
            self
        }
    }
}

/// The number of bytes one surface of `width`×`height` texels occupies in
/// this format, honoring block alignment.
pub(crate) fn surface_byte_len(format: Format, width: u32, height: u32, depth: u32) -> usize {
    let info = format.info();
    let blocks_x = crate::util::div_ceil(width, info.block_extent.0 as u32) as usize;
    let blocks_y = crate::util::div_ceil(height, info.block_extent.1 as u32) as usize;
    blocks_x * blocks_y * depth as usize * info.block_byte_size as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_match_known_dxgi_layouts() {
        // A1R5G5B5 has the D3D "BGR, alpha on top" bit layout.
        let f = Format::A1R5G5B5_UNORM_PACK16;
        assert_eq!(f.channel_bit_mask(Channel::Red), Some(0x7C00));
        assert_eq!(f.channel_bit_mask(Channel::Green), Some(0x03E0));
        assert_eq!(f.channel_bit_mask(Channel::Blue), Some(0x001F));
        assert_eq!(f.channel_bit_mask(Channel::Alpha), Some(0x8000));

        let f = Format::R5G6B5_UNORM_PACK16;
        assert_eq!(f.channel_bit_mask(Channel::Red), Some(0xF800));
        assert_eq!(f.channel_bit_mask(Channel::Green), Some(0x07E0));
        assert_eq!(f.channel_bit_mask(Channel::Blue), Some(0x001F));
        assert_eq!(f.channel_bit_mask(Channel::Alpha), None);

        let f = Format::B8G8R8A8_UNORM;
        assert_eq!(f.channel_bit_mask(Channel::Red), Some(0x00FF0000));
        assert_eq!(f.channel_bit_mask(Channel::Blue), Some(0x000000FF));
        assert_eq!(f.channel_bit_mask(Channel::Alpha), Some(0xFF000000));
    }

    #[test]
    fn srgb_twins_are_symmetric() {
        for &format in Format::ALL {
            if let Some(twin) = format.srgb_twin() {
                assert_eq!(twin.srgb_twin(), Some(format), "format={:?}", format);
                assert_ne!(format.is_srgb(), twin.is_srgb(), "format={:?}", format);
                assert_eq!(format.layout(), twin.layout(), "format={:?}", format);
            }
        }
    }

    #[test]
    fn every_format_has_exactly_one_layout() {
        for &format in Format::ALL {
            let info = format.info();
            if info.is_compressed() {
                assert_eq!(info.layout, FormatLayout::Block, "format={:?}", format);
                assert_eq!(info.block_extent, (4, 4), "format={:?}", format);
            } else {
                assert_ne!(info.layout, FormatLayout::Block, "format={:?}", format);
                assert_eq!(info.block_extent, (1, 1), "format={:?}", format);
            }
        }
    }

    #[test]
    fn uncompressed_channel_bits_fit_block_size() {
        for &format in Format::ALL {
            let info = format.info();
            if info.is_compressed() {
                continue;
            }
            let total_bits = info.block_byte_size as u32 * 8;
            for channel in [Channel::Red, Channel::Green, Channel::Blue, Channel::Alpha] {
                let range = info.channel(channel);
                assert!(
                    range.offset as u32 + range.width as u32 <= total_bits,
                    "format={:?} channel={:?}",
                    format,
                    channel
                );
            }
        }
    }

    #[test]
    fn surface_byte_len_blocks() {
        assert_eq!(surface_byte_len(Format::R8G8B8A8_UNORM, 2, 2, 1), 16);
        assert_eq!(surface_byte_len(Format::R8G8B8_UNORM, 3, 1, 1), 9);
        // one 4x4 BC1 block, even for partial blocks
        assert_eq!(surface_byte_len(Format::BC1_RGBA_UNORM_BLOCK, 4, 4, 1), 8);
        assert_eq!(surface_byte_len(Format::BC1_RGBA_UNORM_BLOCK, 1, 1, 1), 8);
        assert_eq!(surface_byte_len(Format::BC1_RGBA_UNORM_BLOCK, 5, 4, 1), 16);
        // volumes multiply by depth
        assert_eq!(surface_byte_len(Format::R8_UNORM, 4, 4, 4), 64);
    }
}
