mod util;

use teximp::dds::{DdsCaps2, DdsFlags, MiscFlags, PixelFormatFlags};
use teximp::{
    ErrorKind, FileFormat, Format, ImportStatus, MipSurfaceKey, Options, TextureDimension,
};
use util::*;

struct DdsBuilder {
    flags: DdsFlags,
    height: u32,
    width: u32,
    depth: u32,
    mip_map_count: u32,
    pf_flags: PixelFormatFlags,
    four_cc: [u8; 4],
    rgb_bit_count: u32,
    masks: [u32; 4],
    caps2: DdsCaps2,
    dx10: Option<Dx10>,
    payload: Vec<u8>,
}

struct Dx10 {
    dxgi_format: u32,
    resource_dimension: u32,
    misc_flag: MiscFlags,
    array_size: u32,
}

impl DdsBuilder {
    fn new(width: u32, height: u32) -> Self {
        Self {
            flags: DdsFlags::CAPS | DdsFlags::HEIGHT | DdsFlags::WIDTH | DdsFlags::PIXEL_FORMAT,
            height,
            width,
            depth: 0,
            mip_map_count: 0,
            pf_flags: PixelFormatFlags::empty(),
            four_cc: [0; 4],
            rgb_bit_count: 0,
            masks: [0; 4],
            caps2: DdsCaps2::empty(),
            dx10: None,
            payload: Vec::new(),
        }
    }

    fn flags(mut self, flags: DdsFlags) -> Self {
        self.flags = flags;
        self
    }

    fn mips(mut self, count: u32) -> Self {
        self.flags |= DdsFlags::MIPMAP_COUNT;
        self.mip_map_count = count;
        self
    }

    fn four_cc(mut self, code: [u8; 4]) -> Self {
        self.pf_flags |= PixelFormatFlags::FOURCC;
        self.four_cc = code;
        self
    }

    fn rgb_masks(mut self, flags: PixelFormatFlags, bits: u32, masks: [u32; 4]) -> Self {
        self.pf_flags = flags;
        self.rgb_bit_count = bits;
        self.masks = masks;
        self
    }

    fn caps2(mut self, caps2: DdsCaps2) -> Self {
        self.caps2 = caps2;
        self
    }

    fn dx10(mut self, dxgi_format: u32, resource_dimension: u32, misc: MiscFlags, array: u32) -> Self {
        self = self.four_cc(*b"DX10");
        self.dx10 = Some(Dx10 {
            dxgi_format,
            resource_dimension,
            misc_flag: misc,
            array_size: array,
        });
        self
    }

    fn payload(mut self, payload: &[u8]) -> Self {
        self.payload = payload.to_vec();
        self
    }

    fn build(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(b"DDS ");
        bytes.extend_from_slice(&124_u32.to_le_bytes());
        bytes.extend_from_slice(&self.flags.bits().to_le_bytes());
        bytes.extend_from_slice(&self.height.to_le_bytes());
        bytes.extend_from_slice(&self.width.to_le_bytes());
        bytes.extend_from_slice(&0_u32.to_le_bytes()); // pitch or linear size
        bytes.extend_from_slice(&self.depth.to_le_bytes());
        bytes.extend_from_slice(&self.mip_map_count.to_le_bytes());
        bytes.extend_from_slice(&[0; 44]); // reserved1

        bytes.extend_from_slice(&32_u32.to_le_bytes());
        bytes.extend_from_slice(&self.pf_flags.bits().to_le_bytes());
        bytes.extend_from_slice(&self.four_cc);
        bytes.extend_from_slice(&self.rgb_bit_count.to_le_bytes());
        for mask in self.masks {
            bytes.extend_from_slice(&mask.to_le_bytes());
        }

        bytes.extend_from_slice(&0_u32.to_le_bytes()); // caps
        bytes.extend_from_slice(&self.caps2.bits().to_le_bytes());
        bytes.extend_from_slice(&[0; 12]); // caps3, caps4, reserved2

        if let Some(dx10) = &self.dx10 {
            bytes.extend_from_slice(&dx10.dxgi_format.to_le_bytes());
            bytes.extend_from_slice(&dx10.resource_dimension.to_le_bytes());
            bytes.extend_from_slice(&dx10.misc_flag.bits().to_le_bytes());
            bytes.extend_from_slice(&dx10.array_size.to_le_bytes());
            bytes.extend_from_slice(&0_u32.to_le_bytes());
        }

        bytes.extend_from_slice(&self.payload);
        bytes
    }
}

const DXGI_R8G8B8A8_UNORM: u32 = 28;
const DXGI_R8G8B8A8_UNORM_SRGB: u32 = 29;
const DDS_DIMENSION_TEXTURE2D: u32 = 3;

#[test]
fn dxt1_single_surface() {
    let payload: Vec<u8> = (0..8).collect();
    let bytes = DdsBuilder::new(4, 4)
        .flags(
            DdsFlags::CAPS
                | DdsFlags::HEIGHT
                | DdsFlags::WIDTH
                | DdsFlags::PIXEL_FORMAT
                | DdsFlags::LINEAR_SIZE,
        )
        .four_cc(*b"DXT1")
        .payload(&payload)
        .build();

    let (importer, allocator) = import_bytes(&bytes, Some("dds"), &plain_options());
    assert_eq!(importer.status(), ImportStatus::Success);
    assert_eq!(importer.file_format(), Some(FileFormat::Dds));

    let params = allocator.texture_params(0).unwrap();
    assert_eq!(params.format, Format::BC1_RGBA_UNORM_BLOCK);
    assert_eq!(params.mips, 1);

    let surface = allocator.surface_data(0, MipSurfaceKey::default()).unwrap();
    assert_eq!(surface, &payload[..]);
}

#[test]
fn dx10_cubemap_array_walk_order() {
    // 2 array slices x 6 faces x 1 mip of 2x2 RGBA8 = 12 surfaces x 16 B
    let payload: Vec<u8> = (0..12 * 16).map(|i| (i % 251) as u8).collect();
    let bytes = DdsBuilder::new(2, 2)
        .dx10(
            DXGI_R8G8B8A8_UNORM,
            DDS_DIMENSION_TEXTURE2D,
            MiscFlags::TEXTURE_CUBE,
            2,
        )
        .payload(&payload)
        .build();

    let mut allocator = RecordingAllocator::default();
    let importer = import_bytes_into(&bytes, Some("dds"), &plain_options(), &mut allocator);
    assert_eq!(importer.status(), ImportStatus::Success);

    let mut events = allocator.events.iter();
    // negotiation first, then one texture allocation
    assert!(matches!(events.next(), Some(Event::SelectLayout { .. })));
    assert!(matches!(events.next(), Some(Event::SelectFormat { .. })));
    assert_eq!(events.next(), Some(&Event::PreAllocation(Some(1))));
    match events.next() {
        Some(Event::Allocate(params)) => {
            assert_eq!(params.dimension, TextureDimension::TextureCube);
            assert_eq!(params.faces, 6);
            assert_eq!(params.array_size, 2);
            assert_eq!(params.format, Format::R8G8B8A8_UNORM);
        }
        other => panic!("expected an allocation, got {other:?}"),
    }
    assert_eq!(events.next(), Some(&Event::PostAllocation));

    // 12 surface accesses ordered by (array slice, face)
    let accesses: Vec<_> = events
        .map(|event| match event {
            Event::Access(key) => *key,
            other => panic!("expected only accesses, got {other:?}"),
        })
        .collect();
    let expected: Vec<MipSurfaceKey> = (0..2)
        .flat_map(|slice| {
            (0..6).map(move |face| MipSurfaceKey {
                array_slice: slice,
                face,
                mip: 0,
            })
        })
        .collect();
    assert_eq!(accesses, expected);

    // the payload landed surface by surface in file order
    for (i, key) in expected.iter().enumerate() {
        let surface = allocator.inner.surface_data(0, *key).unwrap();
        assert_eq!(surface, &payload[i * 16..(i + 1) * 16], "surface {i}");
    }
}

#[test]
fn dx10_srgb_format_is_honored() {
    let payload = [0_u8; 16];
    let bytes = DdsBuilder::new(2, 2)
        .dx10(
            DXGI_R8G8B8A8_UNORM_SRGB,
            DDS_DIMENSION_TEXTURE2D,
            MiscFlags::empty(),
            1,
        )
        .payload(&payload)
        .build();

    // assume_srgb must not double-apply to an explicit DX10 format
    let options = Options {
        pad_rgb_with_alpha: false,
        assume_srgb: true,
    };
    let (importer, allocator) = import_bytes(&bytes, Some("dds"), &options);
    assert_eq!(importer.status(), ImportStatus::Success);
    assert_eq!(
        allocator.texture_params(0).unwrap().format,
        Format::R8G8B8A8_SRGB
    );
}

#[test]
fn legacy_masks_resolve_bgra() {
    let bytes = DdsBuilder::new(1, 1)
        .rgb_masks(
            PixelFormatFlags::RGB | PixelFormatFlags::ALPHA_PIXELS,
            32,
            [0x00FF_0000, 0x0000_FF00, 0x0000_00FF, 0xFF00_0000],
        )
        .payload(&[10, 20, 30, 40])
        .build();

    let (importer, allocator) = import_bytes(&bytes, Some("dds"), &plain_options());
    assert_eq!(importer.status(), ImportStatus::Success);
    assert_eq!(
        allocator.texture_params(0).unwrap().format,
        Format::B8G8R8A8_UNORM
    );
    let surface = allocator.surface_data(0, MipSurfaceKey::default()).unwrap();
    assert_eq!(surface, &[10, 20, 30, 40]);
}

#[test]
fn legacy_color_format_upgrades_with_assume_srgb() {
    let bytes = DdsBuilder::new(1, 1)
        .rgb_masks(
            PixelFormatFlags::RGB | PixelFormatFlags::ALPHA_PIXELS,
            32,
            [0x00FF_0000, 0x0000_FF00, 0x0000_00FF, 0xFF00_0000],
        )
        .payload(&[10, 20, 30, 40])
        .build();

    let options = Options {
        pad_rgb_with_alpha: false,
        assume_srgb: true,
    };
    let (importer, allocator) = import_bytes(&bytes, Some("dds"), &options);
    assert_eq!(importer.status(), ImportStatus::Success);
    assert_eq!(
        allocator.texture_params(0).unwrap().format,
        Format::B8G8R8A8_SRGB
    );
}

#[test]
fn partial_cubemap_skips_unlisted_faces() {
    // 1x1 R8 cubemap storing only +X and -Y
    let bytes = DdsBuilder::new(1, 1)
        .rgb_masks(PixelFormatFlags::LUMINANCE, 8, [0xFF, 0, 0, 0])
        .caps2(
            DdsCaps2::CUBEMAP | DdsCaps2::CUBEMAP_POSITIVE_X | DdsCaps2::CUBEMAP_NEGATIVE_Y,
        )
        .payload(&[0xAA, 0xBB])
        .build();

    let (importer, allocator) = import_bytes(&bytes, Some("dds"), &plain_options());
    assert_eq!(importer.status(), ImportStatus::Success);

    let face = |face| {
        allocator
            .surface_data(0, MipSurfaceKey {
                array_slice: 0,
                face,
                mip: 0,
            })
            .unwrap()
            .to_vec()
    };
    assert_eq!(face(0), vec![0xAA]);
    assert_eq!(face(3), vec![0xBB]);
    // unlisted faces stay zero-filled
    for unlisted in [1, 2, 4, 5] {
        assert_eq!(face(unlisted), vec![0], "face {unlisted}");
    }
}

#[test]
fn mip_chain_sizes_and_short_file() {
    // 4x4 RGBA8 with 3 mips: 64 + 16 + 4 bytes
    let full: Vec<u8> = (0..84).map(|i| i as u8).collect();
    let bytes = DdsBuilder::new(4, 4)
        .rgb_masks(
            PixelFormatFlags::RGB | PixelFormatFlags::ALPHA_PIXELS,
            32,
            [0xFF, 0xFF00, 0xFF_0000, 0xFF00_0000],
        )
        .mips(3)
        .payload(&full)
        .build();

    let (importer, allocator) = import_bytes(&bytes, Some("dds"), &plain_options());
    assert_eq!(importer.status(), ImportStatus::Success);

    let len = |mip| {
        allocator
            .surface_data(0, MipSurfaceKey {
                array_slice: 0,
                face: 0,
                mip,
            })
            .unwrap()
            .len()
    };
    assert_eq!(len(0), 64);
    assert_eq!(len(1), 16);
    assert_eq!(len(2), 4);

    // drop the last byte of the smallest mip
    let (importer, _) = import_bytes(
        &bytes[..bytes.len() - 1],
        Some("dds"),
        &plain_options(),
    );
    assert_eq!(importer.status(), ImportStatus::Error);
    assert_eq!(importer.error_kind(), Some(ErrorKind::NotEnoughData));
}

#[test]
fn volume_texture_reads_all_depth_slices() {
    // 2x2x2 R8 volume, single mip: 8 bytes
    let payload: Vec<u8> = (1..=8).collect();
    let mut builder = DdsBuilder::new(2, 2)
        .rgb_masks(PixelFormatFlags::LUMINANCE, 8, [0xFF, 0, 0, 0])
        .caps2(DdsCaps2::VOLUME)
        .payload(&payload);
    builder.depth = 2;
    builder.flags |= DdsFlags::DEPTH;
    let bytes = builder.build();

    let (importer, allocator) = import_bytes(&bytes, Some("dds"), &plain_options());
    assert_eq!(importer.status(), ImportStatus::Success);

    let params = allocator.texture_params(0).unwrap();
    assert_eq!(params.dimension, TextureDimension::Texture3D);
    assert_eq!(params.extent.depth, 2);

    let surface = allocator.surface_data(0, MipSurfaceKey::default()).unwrap();
    assert_eq!(surface, &payload[..]);
}

#[test]
fn unknown_four_cc_is_unknown_format() {
    let bytes = DdsBuilder::new(4, 4).four_cc(*b"WXYZ").build();
    let (importer, _) = import_bytes(&bytes, Some("dds"), &plain_options());
    assert_eq!(importer.status(), ImportStatus::Error);
    assert_eq!(importer.error_kind(), Some(ErrorKind::UnknownFormat));
}

#[test]
fn truncated_header_fails() {
    let bytes = DdsBuilder::new(4, 4).four_cc(*b"DXT1").build();
    for cut in [4, 60, 100, 127] {
        let (importer, _) = import_bytes(&bytes[..cut], Some("dds"), &plain_options());
        assert_eq!(importer.status(), ImportStatus::Error, "cut={cut}");
    }
}

#[test]
fn oversized_dimensions_are_rejected() {
    let bytes = DdsBuilder::new(16385, 4).four_cc(*b"DXT1").build();
    let (importer, _) = import_bytes(&bytes, Some("dds"), &plain_options());
    assert_eq!(importer.error_kind(), Some(ErrorKind::DimensionsTooLarge));
}

#[test]
fn signature_probing_without_extension() {
    let payload = [0_u8; 8];
    let bytes = DdsBuilder::new(4, 4).four_cc(*b"DXT1").payload(&payload).build();

    let (importer, _) = import_bytes(&bytes, None, &plain_options());
    assert_eq!(importer.status(), ImportStatus::Success);
    assert_eq!(importer.file_format(), Some(FileFormat::Dds));
}
