//! Resource descriptors
//!
//! Snapshots of the `GetDesc` results the size calculation needs, and the
//! per-kind mip/subresource geometry built on top of them.

use crate::format::{DxgiFormat, FormatCategory};
use crate::geometry::{category_mip_data_size, num_mip_levels};

/// Kind of resource a map call targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Buffer,
    Texture1D,
    Texture2D,
    Texture3D,
    Surface,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BufferDesc {
    pub byte_width: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Texture1dDesc {
    pub format: DxgiFormat,
    pub width: u32,
    /// 0 means a full chain.
    pub mip_levels: u32,
    pub array_size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Texture2dDesc {
    pub format: DxgiFormat,
    pub width: u32,
    pub height: u32,
    /// 0 means a full chain.
    pub mip_levels: u32,
    pub array_size: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Texture3dDesc {
    pub format: DxgiFormat,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    /// 0 means a full chain.
    pub mip_levels: u32,
}

/// DXGI surface: a single 2D image with no mips or array slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SurfaceDesc {
    pub format: DxgiFormat,
    pub width: u32,
    pub height: u32,
}

/// Descriptor of a mappable resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceDesc {
    Buffer(BufferDesc),
    Texture1D(Texture1dDesc),
    Texture2D(Texture2dDesc),
    Texture3D(Texture3dDesc),
}

/// Dimensions that take part in mip math for a given kind.
#[derive(Debug, Clone, Copy)]
struct Extent {
    format: DxgiFormat,
    width: u32,
    height: u32,
    depth: u32,
    declared_mips: u32,
}

impl ResourceDesc {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceDesc::Buffer(_) => ResourceKind::Buffer,
            ResourceDesc::Texture1D(_) => ResourceKind::Texture1D,
            ResourceDesc::Texture2D(_) => ResourceKind::Texture2D,
            ResourceDesc::Texture3D(_) => ResourceKind::Texture3D,
        }
    }

    /// Pixel format, if the resource has one.
    pub fn format(&self) -> Option<DxgiFormat> {
        self.extent().ok().map(|e| e.format)
    }

    /// Texel extent of a texture, or the buffer itself.
    fn extent(&self) -> Result<Extent, BufferDesc> {
        match *self {
            ResourceDesc::Buffer(b) => Err(b),
            ResourceDesc::Texture1D(d) => Ok(Extent {
                format: d.format,
                width: d.width,
                height: 1,
                depth: 1,
                declared_mips: d.mip_levels,
            }),
            ResourceDesc::Texture2D(d) => Ok(Extent {
                format: d.format,
                width: d.width,
                height: d.height,
                depth: 1,
                declared_mips: d.mip_levels,
            }),
            ResourceDesc::Texture3D(d) => Ok(Extent {
                format: d.format,
                width: d.width,
                height: d.height,
                depth: d.depth,
                declared_mips: d.mip_levels,
            }),
        }
    }

    /// Mip levels of the resource. A declared count is returned verbatim, even
    /// when shorter than the full chain.
    pub fn mip_levels(&self) -> u32 {
        match self.extent() {
            Err(_) => 1,
            Ok(e) if e.declared_mips != 0 => e.declared_mips,
            Ok(e) => num_mip_levels(e.width, e.height, e.depth),
        }
    }

    /// Number of subresources. Volumes have one per mip level.
    pub fn num_subresources(&self) -> u32 {
        match self {
            ResourceDesc::Buffer(_) => 1,
            ResourceDesc::Texture1D(d) => self.mip_levels().saturating_mul(d.array_size),
            ResourceDesc::Texture2D(d) => self.mip_levels().saturating_mul(d.array_size),
            ResourceDesc::Texture3D(_) => self.mip_levels(),
        }
    }

    /// Mip level addressed by `subresource`. All array slices of a level share
    /// its size, so the slice index is dropped.
    pub fn subresource_mip_level(&self, subresource: u32) -> u32 {
        match self {
            ResourceDesc::Buffer(_) => 0,
            ResourceDesc::Texture1D(_) | ResourceDesc::Texture2D(_) => {
                subresource % self.mip_levels()
            }
            ResourceDesc::Texture3D(_) => subresource,
        }
    }

    /// Bytes spanned by `subresource` once mapped with the given pitches,
    /// classifying the format with the built-in table.
    ///
    /// Buffers report their byte width and ignore the index and pitches.
    pub fn subresource_size(&self, subresource: u32, row_pitch: u32, slice_pitch: u32) -> usize {
        self.subresource_size_with(
            |format| format.category(),
            subresource,
            row_pitch,
            slice_pitch,
        )
    }

    /// [`subresource_size`](Self::subresource_size) with a caller-supplied
    /// format classification.
    pub fn subresource_size_with<F>(
        &self,
        classify: F,
        subresource: u32,
        row_pitch: u32,
        slice_pitch: u32,
    ) -> usize
    where
        F: Fn(DxgiFormat) -> FormatCategory,
    {
        let e = match self.extent() {
            Ok(e) => e,
            Err(buffer) => return buffer.byte_width as usize,
        };

        let mip_level = self.subresource_mip_level(subresource);
        category_mip_data_size(
            mip_level,
            classify(e.format),
            e.width,
            e.height,
            row_pitch,
            e.depth,
            slice_pitch,
        )
    }
}

impl From<BufferDesc> for ResourceDesc {
    fn from(desc: BufferDesc) -> Self {
        ResourceDesc::Buffer(desc)
    }
}

impl From<Texture1dDesc> for ResourceDesc {
    fn from(desc: Texture1dDesc) -> Self {
        ResourceDesc::Texture1D(desc)
    }
}

impl From<Texture2dDesc> for ResourceDesc {
    fn from(desc: Texture2dDesc) -> Self {
        ResourceDesc::Texture2D(desc)
    }
}

impl From<Texture3dDesc> for ResourceDesc {
    fn from(desc: Texture3dDesc) -> Self {
        ResourceDesc::Texture3D(desc)
    }
}
