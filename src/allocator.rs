use crate::format::surface_byte_len;
use crate::util::mip_dimension;
use crate::{ErrorKind, Format, FormatLayout, ImportError};

/// The width, height and depth of a texture in texels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Extent {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
}

impl Extent {
    pub const fn new(width: u32, height: u32, depth: u32) -> Self {
        Self {
            width,
            height,
            depth,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureDimension {
    Texture1D,
    Texture2D,
    Texture3D,
    TextureCube,
}

/// Everything an allocator needs to reserve storage for one texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureParams {
    pub format: Format,
    pub dimension: TextureDimension,
    pub extent: Extent,
    pub array_size: u32,
    pub faces: u32,
    pub mips: u32,
}

impl TextureParams {
    /// Whether the parameters are internally consistent: positive extent and
    /// counts, and `faces == 6` exactly for cube maps.
    pub fn is_valid(&self) -> bool {
        let cube = self.dimension == TextureDimension::TextureCube;
        let faces_ok = if cube { self.faces == 6 } else { self.faces == 1 };

        faces_ok
            && self.extent.width > 0
            && self.extent.height > 0
            && self.extent.depth > 0
            && (self.dimension == TextureDimension::Texture3D || self.extent.depth == 1)
            && self.array_size > 0
            && self.mips > 0
    }

    /// The extent of one mip level, halved per level and clamped to 1.
    pub fn mip_extent(&self, mip: u32) -> Extent {
        Extent {
            width: mip_dimension(self.extent.width, mip),
            height: mip_dimension(self.extent.height, mip),
            depth: mip_dimension(self.extent.depth, mip),
        }
    }

    /// The byte length of the surface identified by `mip`, block aligned.
    pub fn surface_len(&self, mip: u32) -> usize {
        let extent = self.mip_extent(mip);
        surface_byte_len(self.format, extent.width, extent.height, extent.depth)
    }
}

/// Identifies exactly one 2-D surface (or one 3-D mip volume) within a
/// texture. The sole addressing tuple between decoder and allocator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct MipSurfaceKey {
    pub array_slice: u32,
    pub face: u32,
    pub mip: u32,
}

/// The destination side of a decode: receives the negotiated format and owns
/// all texture storage.
///
/// The decoder drives this trait through a fixed sequence:
///
/// 1. [`select_format_layout`](Self::select_format_layout) — the decoder
///    offers its native [`FormatLayout`] plus the layouts it can losslessly
///    widen into; the allocator picks one. Returning a layout outside the
///    offered set fails the import with
///    [`ErrorKind::InvalidTextureAllocatorFormatLayout`].
/// 2. [`select_format`](Self::select_format) — for the chosen layout the
///    decoder offers concrete formats, best first; the allocator picks one.
///    Returning a format outside the list fails the import with
///    [`ErrorKind::InvalidTextureAllocatorFormat`].
/// 3. [`pre_allocation`](Self::pre_allocation), then one
///    [`allocate_texture`](Self::allocate_texture) per texture, then
///    [`post_allocation`](Self::post_allocation).
/// 4. [`access_texture_data`](Self::access_texture_data) per surface; the
///    decoder writes exactly the block-aligned byte count of that surface.
///    All writes happen before the decode call returns.
///
/// The default method bodies accept the decoder's first preference and must
/// always succeed.
pub trait TextureAllocator {
    fn select_format_layout(
        &mut self,
        native: FormatLayout,
        wider: &[FormatLayout],
    ) -> FormatLayout {
        let _ = wider;
        native
    }

    fn select_format(&mut self, layout: FormatLayout, candidates: &[Format]) -> Format {
        let _ = layout;
        candidates[0]
    }

    fn pre_allocation(&mut self, texture_count: Option<usize>) {
        let _ = texture_count;
    }

    fn allocate_texture(&mut self, params: &TextureParams, index: usize) -> bool;

    fn post_allocation(&mut self) {}

    /// A mutable view of the storage for one surface.
    ///
    /// The returned span must be exactly
    /// `block_byte_size × ⌈mip_width/block_w⌉ × ⌈mip_height/block_h⌉ × mip_depth`
    /// bytes long for the surface the key names.
    fn access_texture_data(&mut self, index: usize, key: MipSurfaceKey) -> &mut [u8];
}

/// Runs the layout phase of the negotiation and validates the allocator's
/// answer.
pub(crate) fn negotiate_layout(
    allocator: &mut dyn TextureAllocator,
    native: FormatLayout,
    wider: &[FormatLayout],
) -> Result<FormatLayout, ImportError> {
    let chosen = allocator.select_format_layout(native, wider);
    if chosen == native || wider.contains(&chosen) {
        Ok(chosen)
    } else {
        Err(ImportError::new(
            ErrorKind::InvalidTextureAllocatorFormatLayout,
            format!(
                "allocator chose layout {:?}, which is neither the native layout {:?} nor one of the offered wider layouts {:?}",
                chosen, native, wider
            ),
        ))
    }
}

/// Runs the format phase of the negotiation and validates the allocator's
/// answer. `candidates` is ordered by decoder preference, best first.
pub(crate) fn negotiate_format(
    allocator: &mut dyn TextureAllocator,
    layout: FormatLayout,
    candidates: &[Format],
) -> Result<Format, ImportError> {
    debug_assert!(!candidates.is_empty());
    debug_assert!(candidates.iter().all(|f| f.layout() == layout));

    let chosen = allocator.select_format(layout, candidates);
    if candidates.contains(&chosen) {
        Ok(chosen)
    } else {
        Err(ImportError::new(
            ErrorKind::InvalidTextureAllocatorFormat,
            format!(
                "allocator chose format {:?}, which is not one of the offered formats {:?}",
                chosen, candidates
            ),
        ))
    }
}

/// Reserves a single texture through the allocation phase of the protocol.
pub(crate) fn allocate_single(
    allocator: &mut dyn TextureAllocator,
    params: &TextureParams,
) -> Result<(), ImportError> {
    allocator.pre_allocation(Some(1));
    if !allocator.allocate_texture(params, 0) {
        return Err(allocation_failed(params));
    }
    allocator.post_allocation();
    Ok(())
}

pub(crate) fn allocation_failed(params: &TextureParams) -> ImportError {
    ImportError::new(
        ErrorKind::TextureAllocationFailed,
        format!(
            "failed to allocate texture. format: {:?}, dimension: {:?}, extent: ({}, {}, {}), array size: {}, faces: {}, mips: {}",
            params.format,
            params.dimension,
            params.extent.width,
            params.extent.height,
            params.extent.depth,
            params.array_size,
            params.faces,
            params.mips
        ),
    )
}

struct CpuTexture {
    params: TextureParams,
    data: Vec<u8>,
    /// Byte ranges per surface, ordered (array slice, face, mip).
    surfaces: Vec<(usize, usize)>,
}

impl CpuTexture {
    fn new(params: TextureParams) -> Self {
        let surface_count = (params.array_size * params.faces * params.mips) as usize;
        let mut surfaces = Vec::with_capacity(surface_count);

        let mut offset = 0_usize;
        for _slice in 0..params.array_size {
            for _face in 0..params.faces {
                for mip in 0..params.mips {
                    let len = params.surface_len(mip);
                    surfaces.push((offset, len));
                    offset += len;
                }
            }
        }

        Self {
            params,
            data: vec![0; offset],
            surfaces,
        }
    }

    fn surface_index(&self, key: MipSurfaceKey) -> usize {
        assert!(key.array_slice < self.params.array_size);
        assert!(key.face < self.params.faces);
        assert!(key.mip < self.params.mips);
        ((key.array_slice * self.params.faces + key.face) * self.params.mips + key.mip) as usize
    }
}

/// The crate's default allocator: plain heap storage, zero-initialized, one
/// contiguous buffer per texture with surfaces ordered (slice, face, mip).
#[derive(Default)]
pub struct CpuTextureAllocator {
    textures: Vec<CpuTexture>,
}

impl CpuTextureAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn texture_count(&self) -> usize {
        self.textures.len()
    }

    pub fn texture_params(&self, index: usize) -> Option<&TextureParams> {
        self.textures.get(index).map(|t| &t.params)
    }

    /// A read-only view of one surface.
    pub fn surface_data(&self, index: usize, key: MipSurfaceKey) -> Option<&[u8]> {
        let texture = self.textures.get(index)?;
        if key.array_slice >= texture.params.array_size
            || key.face >= texture.params.faces
            || key.mip >= texture.params.mips
        {
            return None;
        }
        let (offset, len) = texture.surfaces[texture.surface_index(key)];
        Some(&texture.data[offset..offset + len])
    }
}

impl TextureAllocator for CpuTextureAllocator {
    fn pre_allocation(&mut self, texture_count: Option<usize>) {
        if let Some(count) = texture_count {
            self.textures.reserve(count);
        }
    }

    fn allocate_texture(&mut self, params: &TextureParams, _index: usize) -> bool {
        if !params.is_valid() {
            return false;
        }
        self.textures.push(CpuTexture::new(*params));
        true
    }

    fn access_texture_data(&mut self, index: usize, key: MipSurfaceKey) -> &mut [u8] {
        let texture = &mut self.textures[index];
        let (offset, len) = texture.surfaces[texture.surface_index(key)];
        &mut texture.data[offset..offset + len]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Format;

    fn params_2d(format: Format, width: u32, height: u32, mips: u32) -> TextureParams {
        TextureParams {
            format,
            dimension: TextureDimension::Texture2D,
            extent: Extent::new(width, height, 1),
            array_size: 1,
            faces: 1,
            mips,
        }
    }

    #[test]
    fn cube_face_invariant() {
        let mut params = params_2d(Format::R8G8B8A8_UNORM, 4, 4, 1);
        params.dimension = TextureDimension::TextureCube;
        assert!(!params.is_valid());
        params.faces = 6;
        assert!(params.is_valid());

        let mut flat = params_2d(Format::R8G8B8A8_UNORM, 4, 4, 1);
        flat.faces = 6;
        assert!(!flat.is_valid());
    }

    #[test]
    fn surface_sizes_follow_block_math() {
        let params = params_2d(Format::R8G8B8A8_UNORM, 2, 2, 2);
        assert_eq!(params.surface_len(0), 16);
        assert_eq!(params.surface_len(1), 4);

        let params = params_2d(Format::BC1_RGBA_UNORM_BLOCK, 8, 8, 4);
        assert_eq!(params.surface_len(0), 32);
        assert_eq!(params.surface_len(1), 8);
        // 2x2 and 1x1 mips still occupy a whole block
        assert_eq!(params.surface_len(2), 8);
        assert_eq!(params.surface_len(3), 8);
    }

    #[test]
    fn cpu_allocator_surface_addressing() {
        let mut allocator = CpuTextureAllocator::new();
        let params = TextureParams {
            format: Format::R8G8B8A8_UNORM,
            dimension: TextureDimension::TextureCube,
            extent: Extent::new(2, 2, 1),
            array_size: 2,
            faces: 6,
            mips: 2,
        };
        assert!(allocator.allocate_texture(&params, 0));

        // every surface is addressable and has the block-aligned length
        for slice in 0..2 {
            for face in 0..6 {
                for mip in 0..2 {
                    let key = MipSurfaceKey {
                        array_slice: slice,
                        face,
                        mip,
                    };
                    let expected = if mip == 0 { 16 } else { 4 };
                    assert_eq!(allocator.access_texture_data(0, key).len(), expected);
                }
            }
        }

        // surfaces are disjoint: write a marker and check nothing else sees it
        allocator
            .access_texture_data(
                0,
                MipSurfaceKey {
                    array_slice: 1,
                    face: 3,
                    mip: 1,
                },
            )
            .fill(0xAB);
        let mut marked = 0;
        for slice in 0..2 {
            for face in 0..6 {
                for mip in 0..2 {
                    let key = MipSurfaceKey {
                        array_slice: slice,
                        face,
                        mip,
                    };
                    if allocator.surface_data(0, key).unwrap().iter().any(|&b| b == 0xAB) {
                        marked += 1;
                    }
                }
            }
        }
        assert_eq!(marked, 1);
    }

    struct RogueAllocator;
    impl TextureAllocator for RogueAllocator {
        fn select_format_layout(
            &mut self,
            _native: FormatLayout,
            _wider: &[FormatLayout],
        ) -> FormatLayout {
            FormatLayout::_32_32_32_32
        }
        fn select_format(&mut self, _layout: FormatLayout, _candidates: &[Format]) -> Format {
            Format::R32G32B32A32_SFLOAT
        }
        fn allocate_texture(&mut self, _params: &TextureParams, _index: usize) -> bool {
            false
        }
        fn access_texture_data(&mut self, _index: usize, _key: MipSurfaceKey) -> &mut [u8] {
            unreachable!()
        }
    }

    #[test]
    fn rogue_allocator_choices_are_rejected() {
        let mut rogue = RogueAllocator;
        let err = negotiate_layout(&mut rogue, FormatLayout::_8_8_8, &[FormatLayout::_8_8_8_8])
            .unwrap_err();
        assert_eq!(
            err.kind(),
            crate::ErrorKind::InvalidTextureAllocatorFormatLayout
        );

        let err = negotiate_format(
            &mut rogue,
            FormatLayout::_8_8_8_8,
            &[Format::R8G8B8A8_UNORM],
        )
        .unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::InvalidTextureAllocatorFormat);
    }

    #[test]
    fn default_negotiation_accepts_first_preference() {
        let mut allocator = CpuTextureAllocator::new();
        let layout = negotiate_layout(
            &mut allocator,
            FormatLayout::_8_8_8,
            &[FormatLayout::_8_8_8_8],
        )
        .unwrap();
        assert_eq!(layout, FormatLayout::_8_8_8);

        let format = negotiate_format(
            &mut allocator,
            FormatLayout::_8_8_8,
            &[Format::B8G8R8_UNORM, Format::R8G8B8_UNORM],
        )
        .unwrap();
        assert_eq!(format, Format::B8G8R8_UNORM);
    }
}
