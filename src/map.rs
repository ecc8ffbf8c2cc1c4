//! Mapped-Region Resolver
//!
//! Turns the result of a `Map` call into the pointer and byte span a capture
//! layer should copy. Read-only maps and anything whose size can't be
//! determined resolve to [`MappedRegion::EMPTY`].

use std::ffi::c_void;
use std::ptr;
use std::slice;

use tracing::{debug, trace, warn};

use crate::config::Config;
use crate::error::QueryError;
use crate::format::DxgiFormat;
use crate::geometry::category_data_size;
use crate::resource::{ResourceDesc, ResourceKind, SurfaceDesc};

/// Access requested by a `Map` call. Values match `D3D10_MAP`/`D3D11_MAP`.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapMode {
    Read = 1,
    Write = 2,
    ReadWrite = 3,
    WriteDiscard = 4,
    WriteNoOverwrite = 5,
}

impl MapMode {
    pub fn from_raw(raw: u32) -> Option<Self> {
        match raw {
            1 => Some(MapMode::Read),
            2 => Some(MapMode::Write),
            3 => Some(MapMode::ReadWrite),
            4 => Some(MapMode::WriteDiscard),
            5 => Some(MapMode::WriteNoOverwrite),
            _ => None,
        }
    }

    /// Whether the mapped region may be written through.
    pub fn is_write(self) -> bool {
        self != MapMode::Read
    }
}

/// `DXGI_MAP_*` flags passed to `IDXGISurface::Map`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MapFlags(pub u32);

impl MapFlags {
    pub const READ: Self = Self(1);
    pub const WRITE: Self = Self(2);
    pub const DISCARD: Self = Self(4);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }
}

impl std::ops::BitOr for MapFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

/// What a resource `Map` call handed back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MappedSubresource {
    /// Bare pointer (buffers and D3D10 1D textures).
    Pointer(*mut c_void),
    Texture2D {
        data: *mut c_void,
        row_pitch: u32,
    },
    Texture3D {
        data: *mut c_void,
        row_pitch: u32,
        depth_pitch: u32,
    },
}

impl MappedSubresource {
    pub fn data(&self) -> *mut c_void {
        match *self {
            MappedSubresource::Pointer(data)
            | MappedSubresource::Texture2D { data, .. }
            | MappedSubresource::Texture3D { data, .. } => data,
        }
    }

    /// (row pitch, depth pitch). Pitches the payload doesn't carry are zero.
    pub fn pitches(&self) -> (u32, u32) {
        match *self {
            MappedSubresource::Pointer(_) => (0, 0),
            MappedSubresource::Texture2D { row_pitch, .. } => (row_pitch, 0),
            MappedSubresource::Texture3D {
                row_pitch,
                depth_pitch,
                ..
            } => (row_pitch, depth_pitch),
        }
    }
}

impl From<*mut c_void> for MappedSubresource {
    fn from(data: *mut c_void) -> Self {
        MappedSubresource::Pointer(data)
    }
}

/// Locked rectangle returned by `IDXGISurface::Map`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappedRect {
    pub bits: *mut u8,
    pub pitch: u32,
}

/// Resolved span of a mapped resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MappedRegion {
    pub ptr: *mut c_void,
    pub size: usize,
}

impl MappedRegion {
    pub const EMPTY: Self = Self {
        ptr: ptr::null_mut(),
        size: 0,
    };

    pub fn is_empty(&self) -> bool {
        self.ptr.is_null() || self.size == 0
    }

    /// View the region as bytes.
    ///
    /// # Safety
    ///
    /// The resource must still be mapped and `size` bytes from `ptr` must be
    /// readable for `'a`.
    pub unsafe fn as_slice<'a>(&self) -> &'a [u8] {
        if self.is_empty() {
            return &[];
        }
        slice::from_raw_parts(self.ptr as *const u8, self.size)
    }
}

impl Default for MappedRegion {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// A mappable resource whose descriptor can be queried.
pub trait MapTarget {
    fn resource_desc(&self) -> Result<ResourceDesc, QueryError>;
}

/// A DXGI surface whose descriptor can be queried.
pub trait SurfaceTarget {
    fn surface_desc(&self) -> Result<SurfaceDesc, QueryError>;
}

impl MapTarget for ResourceDesc {
    fn resource_desc(&self) -> Result<ResourceDesc, QueryError> {
        Ok(*self)
    }
}

impl SurfaceTarget for SurfaceDesc {
    fn surface_desc(&self) -> Result<SurfaceDesc, QueryError> {
        Ok(*self)
    }
}

/// Resolves map results using a configured format classification.
#[derive(Debug, Clone, Default)]
pub struct MapSizer {
    config: Config,
}

impl MapSizer {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Byte span of a `width` x `height` x `depth` mapped layout.
    pub fn data_size(
        &self,
        format: DxgiFormat,
        width: u32,
        height: u32,
        row_pitch: u32,
        depth: u32,
        depth_pitch: u32,
    ) -> usize {
        category_data_size(
            self.config.classify(format),
            width,
            height,
            row_pitch,
            depth,
            depth_pitch,
        )
    }

    /// Byte span of one subresource of `desc`.
    pub fn subresource_size(
        &self,
        desc: &ResourceDesc,
        subresource: u32,
        row_pitch: u32,
        slice_pitch: u32,
    ) -> usize {
        desc.subresource_size_with(
            |format| self.config.classify(format),
            subresource,
            row_pitch,
            slice_pitch,
        )
    }

    /// Resolve the region a resource `Map` call exposed.
    ///
    /// `subresource` is ignored for buffers.
    pub fn map_info<T: MapTarget + ?Sized>(
        &self,
        resource: &T,
        subresource: u32,
        mode: MapMode,
        mapped: MappedSubresource,
    ) -> MappedRegion {
        if !mode.is_write() {
            debug!("Map subresource {}: read-only, nothing to capture", subresource);
            return MappedRegion::EMPTY;
        }

        let desc = match resource.resource_desc() {
            Ok(desc) => desc,
            Err(e) => {
                warn!("Map subresource {}: {}", subresource, e);
                return MappedRegion::EMPTY;
            }
        };

        let (row_pitch, depth_pitch) = mapped.pitches();
        let region = MappedRegion {
            ptr: mapped.data(),
            size: self.subresource_size(&desc, subresource, row_pitch, depth_pitch),
        };
        trace!(
            "Map {:?} subresource {} ({:?}): {:p} +{} bytes",
            desc.kind(),
            subresource,
            mode,
            region.ptr,
            region.size
        );
        region
    }

    /// Resolve the region an `IDXGISurface::Map` call exposed.
    pub fn surface_map_info<S: SurfaceTarget + ?Sized>(
        &self,
        surface: &S,
        rect: MappedRect,
        flags: MapFlags,
    ) -> MappedRegion {
        if !flags.contains(MapFlags::WRITE) {
            debug!("Surface map without write intent (flags=0x{:X})", flags.0);
            return MappedRegion::EMPTY;
        }

        let desc = match surface.surface_desc() {
            Ok(desc) => desc,
            Err(e) => {
                warn!("Surface map: {}", e);
                return MappedRegion::EMPTY;
            }
        };

        let region = MappedRegion {
            ptr: rect.bits.cast(),
            size: self.data_size(desc.format, desc.width, desc.height, rect.pitch, 1, 0),
        };
        trace!(
            "Map {:?} {}x{} format {}: {:p} +{} bytes",
            ResourceKind::Surface,
            desc.width,
            desc.height,
            desc.format.0,
            region.ptr,
            region.size
        );
        region
    }
}

/// [`MapSizer::map_info`] with the built-in format table.
pub fn map_info<T: MapTarget + ?Sized>(
    resource: &T,
    subresource: u32,
    mode: MapMode,
    mapped: MappedSubresource,
) -> MappedRegion {
    MapSizer::default().map_info(resource, subresource, mode, mapped)
}

/// [`MapSizer::surface_map_info`] with the built-in format table.
pub fn surface_map_info<S: SurfaceTarget + ?Sized>(
    surface: &S,
    rect: MappedRect,
    flags: MapFlags,
) -> MappedRegion {
    MapSizer::default().surface_map_info(surface, rect, flags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FormatOverride;
    use crate::format::FormatCategory;
    use crate::resource::{BufferDesc, Texture1dDesc, Texture2dDesc, Texture3dDesc};

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    struct FailingResource;

    impl MapTarget for FailingResource {
        fn resource_desc(&self) -> Result<ResourceDesc, QueryError> {
            Err(QueryError::Hresult(0x887A_0005))
        }
    }

    impl SurfaceTarget for FailingResource {
        fn surface_desc(&self) -> Result<SurfaceDesc, QueryError> {
            Err(QueryError::Other("device removed".into()))
        }
    }

    fn backing(len: usize) -> Vec<u8> {
        vec![0u8; len]
    }

    #[test]
    fn test_map_mode_from_raw() {
        assert_eq!(MapMode::from_raw(1), Some(MapMode::Read));
        assert_eq!(MapMode::from_raw(4), Some(MapMode::WriteDiscard));
        assert_eq!(MapMode::from_raw(0), None);
        assert_eq!(MapMode::from_raw(6), None);
        assert!(!MapMode::Read.is_write());
        assert!(MapMode::ReadWrite.is_write());
        assert!(MapMode::WriteNoOverwrite.is_write());
    }

    #[test]
    fn test_read_only_map_is_empty() {
        init_tracing();
        let mut data = backing(4096);
        let ptr: *mut c_void = data.as_mut_ptr().cast();

        let resources: [ResourceDesc; 4] = [
            BufferDesc { byte_width: 4096 }.into(),
            Texture1dDesc {
                format: DxgiFormat::R8G8B8A8_UNORM,
                width: 16,
                mip_levels: 1,
                array_size: 1,
            }
            .into(),
            Texture2dDesc {
                format: DxgiFormat::R8G8B8A8_UNORM,
                width: 16,
                height: 16,
                mip_levels: 1,
                array_size: 1,
            }
            .into(),
            Texture3dDesc {
                format: DxgiFormat::R8G8B8A8_UNORM,
                width: 4,
                height: 4,
                depth: 4,
                mip_levels: 1,
            }
            .into(),
        ];
        for desc in &resources {
            let region = map_info(
                desc,
                0,
                MapMode::Read,
                MappedSubresource::Texture3D {
                    data: ptr,
                    row_pitch: 64,
                    depth_pitch: 1024,
                },
            );
            assert_eq!(region, MappedRegion::EMPTY);
        }
    }

    #[test]
    fn test_buffer_map() {
        init_tracing();
        let mut data = backing(4096);
        let ptr: *mut c_void = data.as_mut_ptr().cast();
        let desc: ResourceDesc = BufferDesc { byte_width: 4096 }.into();

        let region = map_info(&desc, 0, MapMode::WriteDiscard, MappedSubresource::Pointer(ptr));
        assert_eq!(region.ptr, ptr);
        assert_eq!(region.size, 4096);
        assert_eq!(unsafe { region.as_slice() }.len(), 4096);

        // Pitches are ignored for buffers.
        let region = map_info(
            &desc,
            0,
            MapMode::Write,
            MappedSubresource::Texture2D {
                data: ptr,
                row_pitch: 7,
            },
        );
        assert_eq!(region.size, 4096);
    }

    #[test]
    fn test_texture1d_pointer_only_map() {
        let mut data = backing(64);
        let ptr: *mut c_void = data.as_mut_ptr().cast();
        let desc: ResourceDesc = Texture1dDesc {
            format: DxgiFormat::R8G8B8A8_UNORM,
            width: 16,
            mip_levels: 1,
            array_size: 1,
        }
        .into();

        // Without a row pitch there is no span to report.
        let region = map_info(&desc, 0, MapMode::Write, ptr.into());
        assert_eq!(region.ptr, ptr);
        assert_eq!(region.size, 0);
        assert!(region.is_empty());

        let region = map_info(
            &desc,
            0,
            MapMode::Write,
            MappedSubresource::Texture2D {
                data: ptr,
                row_pitch: 64,
            },
        );
        assert_eq!(region.size, 64);
    }

    #[test]
    fn test_texture2d_block_compressed_map() {
        init_tracing();
        let mut data = backing(120);
        let ptr: *mut c_void = data.as_mut_ptr().cast();
        let desc: ResourceDesc = Texture2dDesc {
            format: DxgiFormat::BC1_UNORM,
            width: 10,
            height: 10,
            mip_levels: 1,
            array_size: 1,
        }
        .into();

        let region = map_info(
            &desc,
            0,
            MapMode::WriteDiscard,
            MappedSubresource::Texture2D {
                data: ptr,
                row_pitch: 40,
            },
        );
        assert_eq!(region.ptr, ptr);
        assert_eq!(region.size, 120);
    }

    #[test]
    fn test_texture2d_array_slice_map() {
        let desc: ResourceDesc = Texture2dDesc {
            format: DxgiFormat::R8G8B8A8_UNORM,
            width: 32,
            height: 32,
            mip_levels: 0,
            array_size: 3,
        }
        .into();
        // 6 mips per slice; subresource 7 is slice 1, mip 1 (16 rows).
        let region = map_info(
            &desc,
            7,
            MapMode::Write,
            MappedSubresource::Texture2D {
                data: ptr::null_mut(),
                row_pitch: 64,
            },
        );
        assert_eq!(region.size, 16 * 64);
    }

    #[test]
    fn test_texture3d_map() {
        let mut data = backing(4096);
        let ptr: *mut c_void = data.as_mut_ptr().cast();
        let desc: ResourceDesc = Texture3dDesc {
            format: DxgiFormat::R8G8B8A8_UNORM,
            width: 8,
            height: 8,
            depth: 4,
            mip_levels: 1,
        }
        .into();

        let region = map_info(
            &desc,
            0,
            MapMode::ReadWrite,
            MappedSubresource::Texture3D {
                data: ptr,
                row_pitch: 32,
                depth_pitch: 512,
            },
        );
        assert_eq!(region.ptr, ptr);
        assert_eq!(region.size, 8 * 32 + 3 * 512);
    }

    #[test]
    fn test_unknown_format_map() {
        let desc: ResourceDesc = Texture2dDesc {
            format: DxgiFormat::UNKNOWN,
            width: 16,
            height: 16,
            mip_levels: 1,
            array_size: 1,
        }
        .into();
        let region = map_info(
            &desc,
            0,
            MapMode::Write,
            MappedSubresource::Texture2D {
                data: ptr::null_mut(),
                row_pitch: 64,
            },
        );
        assert_eq!(region.size, 0);
        assert!(region.is_empty());
    }

    #[test]
    fn test_query_failure_is_empty() {
        init_tracing();
        let mut data = backing(16);
        let ptr: *mut c_void = data.as_mut_ptr().cast();

        let region = map_info(&FailingResource, 0, MapMode::Write, MappedSubresource::Pointer(ptr));
        assert_eq!(region, MappedRegion::EMPTY);

        let rect = MappedRect {
            bits: data.as_mut_ptr(),
            pitch: 16,
        };
        let region = surface_map_info(&FailingResource, rect, MapFlags::WRITE);
        assert_eq!(region, MappedRegion::EMPTY);
    }

    #[test]
    fn test_surface_map() {
        init_tracing();
        let mut data = backing(4 * 256);
        let desc = SurfaceDesc {
            format: DxgiFormat::B8G8R8A8_UNORM,
            width: 64,
            height: 4,
        };
        let rect = MappedRect {
            bits: data.as_mut_ptr(),
            pitch: 256,
        };

        let expected: *mut c_void = data.as_mut_ptr().cast();
        let region = surface_map_info(&desc, rect, MapFlags::READ | MapFlags::WRITE);
        assert_eq!(region.ptr, expected);
        assert_eq!(region.size, 4 * 256);

        let region = surface_map_info(&desc, rect, MapFlags::READ);
        assert_eq!(region, MappedRegion::EMPTY);

        let region = surface_map_info(&desc, rect, MapFlags::DISCARD);
        assert_eq!(region, MappedRegion::EMPTY);
    }

    #[test]
    fn test_configured_overrides_apply() {
        let yuy2 = DxgiFormat(107);
        let sizer = MapSizer::new(Config {
            format_overrides: vec![FormatOverride {
                format: yuy2.0,
                category: FormatCategory::Unknown,
            }],
        });
        let desc: ResourceDesc = Texture2dDesc {
            format: yuy2,
            width: 16,
            height: 16,
            mip_levels: 1,
            array_size: 1,
        }
        .into();
        let mapped = MappedSubresource::Texture2D {
            data: ptr::null_mut(),
            row_pitch: 32,
        };

        assert_eq!(map_info(&desc, 0, MapMode::Write, mapped).size, 16 * 32);
        assert_eq!(sizer.map_info(&desc, 0, MapMode::Write, mapped).size, 0);
        assert_eq!(sizer.data_size(yuy2, 16, 16, 32, 1, 0), 0);
    }

    #[test]
    fn test_empty_region_slice() {
        assert!(unsafe { MappedRegion::EMPTY.as_slice() }.is_empty());
        assert!(MappedRegion::default().is_empty());
    }
}
