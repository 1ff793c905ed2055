#![allow(dead_code)]

use std::io::Cursor;

use teximp::{
    import_from_reader, CpuTextureAllocator, FileFormat, Format, FormatLayout, Importer,
    MipSurfaceKey, Options, TextureAllocator, TextureParams,
};

/// Runs an in-memory byte stream through the importer with the default
/// allocator.
pub fn import_bytes(
    bytes: &[u8],
    extension: Option<&str>,
    options: &Options,
) -> (Importer, CpuTextureAllocator) {
    let mut allocator = CpuTextureAllocator::new();
    let importer = import_bytes_into(bytes, extension, options, &mut allocator);
    (importer, allocator)
}

pub fn import_bytes_into(
    bytes: &[u8],
    extension: Option<&str>,
    options: &Options,
    allocator: &mut dyn TextureAllocator,
) -> Importer {
    let extension_format = extension.and_then(FileFormat::from_extension);
    let name = format!("test.{}", extension.unwrap_or("bin"));
    let mut cursor = Cursor::new(bytes.to_vec());
    import_from_reader(&mut cursor, extension_format, name, allocator, options)
}

/// The options every test starts from: no alpha padding, no sRGB
/// assumption, so negotiated formats stay linear and 3-channel sources stay
/// 3-channel unless a test opts in.
pub fn plain_options() -> Options {
    Options {
        pad_rgb_with_alpha: false,
        assume_srgb: false,
    }
}

/// Splits a surface into 4-byte RGBA pixels.
pub fn rgba_pixels(surface: &[u8]) -> Vec<[u8; 4]> {
    surface
        .chunks_exact(4)
        .map(|chunk| chunk.try_into().unwrap())
        .collect()
}

/// Splits a surface into 3-byte RGB pixels.
pub fn rgb_pixels(surface: &[u8]) -> Vec<[u8; 3]> {
    surface
        .chunks_exact(3)
        .map(|chunk| chunk.try_into().unwrap())
        .collect()
}

/// What a [`RecordingAllocator`] saw the decoder do, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    SelectLayout {
        native: FormatLayout,
        wider: Vec<FormatLayout>,
    },
    SelectFormat {
        layout: FormatLayout,
        candidates: Vec<Format>,
    },
    PreAllocation(Option<usize>),
    Allocate(TextureParams),
    PostAllocation,
    Access(MipSurfaceKey),
}

/// A default-behaving allocator that records the protocol sequence.
#[derive(Default)]
pub struct RecordingAllocator {
    pub inner: CpuTextureAllocator,
    pub events: Vec<Event>,
}

impl TextureAllocator for RecordingAllocator {
    fn select_format_layout(
        &mut self,
        native: FormatLayout,
        wider: &[FormatLayout],
    ) -> FormatLayout {
        self.events.push(Event::SelectLayout {
            native,
            wider: wider.to_vec(),
        });
        self.inner.select_format_layout(native, wider)
    }

    fn select_format(&mut self, layout: FormatLayout, candidates: &[Format]) -> Format {
        self.events.push(Event::SelectFormat {
            layout,
            candidates: candidates.to_vec(),
        });
        self.inner.select_format(layout, candidates)
    }

    fn pre_allocation(&mut self, texture_count: Option<usize>) {
        self.events.push(Event::PreAllocation(texture_count));
        self.inner.pre_allocation(texture_count);
    }

    fn allocate_texture(&mut self, params: &TextureParams, index: usize) -> bool {
        self.events.push(Event::Allocate(*params));
        self.inner.allocate_texture(params, index)
    }

    fn post_allocation(&mut self) {
        self.events.push(Event::PostAllocation);
        self.inner.post_allocation();
    }

    fn access_texture_data(&mut self, index: usize, key: MipSurfaceKey) -> &mut [u8] {
        self.events.push(Event::Access(key));
        self.inner.access_texture_data(index, key)
    }
}

/// An allocator that prefers one specific layout (when offered) and
/// otherwise behaves like the default.
pub struct PreferLayout {
    pub inner: CpuTextureAllocator,
    pub layout: FormatLayout,
}

impl PreferLayout {
    pub fn new(layout: FormatLayout) -> Self {
        Self {
            inner: CpuTextureAllocator::new(),
            layout,
        }
    }
}

impl TextureAllocator for PreferLayout {
    fn select_format_layout(
        &mut self,
        native: FormatLayout,
        wider: &[FormatLayout],
    ) -> FormatLayout {
        if native == self.layout || wider.contains(&self.layout) {
            self.layout
        } else {
            native
        }
    }

    fn allocate_texture(&mut self, params: &TextureParams, index: usize) -> bool {
        self.inner.allocate_texture(params, index)
    }

    fn access_texture_data(&mut self, index: usize, key: MipSurfaceKey) -> &mut [u8] {
        self.inner.access_texture_data(index, key)
    }
}

/// An allocator that prefers one specific format from the candidate list.
pub struct PreferFormat {
    pub inner: CpuTextureAllocator,
    pub format: Format,
}

impl PreferFormat {
    pub fn new(format: Format) -> Self {
        Self {
            inner: CpuTextureAllocator::new(),
            format,
        }
    }
}

impl TextureAllocator for PreferFormat {
    fn select_format(&mut self, _layout: FormatLayout, candidates: &[Format]) -> Format {
        if candidates.contains(&self.format) {
            self.format
        } else {
            candidates[0]
        }
    }

    fn allocate_texture(&mut self, params: &TextureParams, index: usize) -> bool {
        self.inner.allocate_texture(params, index)
    }

    fn access_texture_data(&mut self, index: usize, key: MipSurfaceKey) -> &mut [u8] {
        self.inner.access_texture_data(index, key)
    }
}

/// An allocator whose `allocate_texture` always refuses.
#[derive(Default)]
pub struct RefusingAllocator;

impl TextureAllocator for RefusingAllocator {
    fn allocate_texture(&mut self, _params: &TextureParams, _index: usize) -> bool {
        false
    }

    fn access_texture_data(&mut self, _index: usize, _key: MipSurfaceKey) -> &mut [u8] {
        unreachable!("nothing was allocated")
    }
}
