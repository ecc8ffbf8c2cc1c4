//! D3D10 Bindings Module
//!
//! Descriptor queries and map-result conversions for the D3D10 interfaces.
//! D3D10 maps hand back a bare pointer for buffers and 1D textures and
//! `D3D10_MAPPED_TEXTURE2D`/`3D` for the rest.

use tracing::debug;
use windows::Win32::Graphics::Direct3D10::{
    ID3D10Buffer, ID3D10Texture1D, ID3D10Texture2D, ID3D10Texture3D, D3D10_BUFFER_DESC,
    D3D10_MAP, D3D10_MAPPED_TEXTURE2D, D3D10_MAPPED_TEXTURE3D, D3D10_TEXTURE1D_DESC,
    D3D10_TEXTURE2D_DESC, D3D10_TEXTURE3D_DESC,
};

use crate::error::QueryError;
use crate::map::{MapMode, MapSizer, MapTarget, MappedRegion, MappedSubresource};
use crate::resource::{BufferDesc, ResourceDesc, Texture1dDesc, Texture2dDesc, Texture3dDesc};

impl MapTarget for ID3D10Buffer {
    fn resource_desc(&self) -> Result<ResourceDesc, QueryError> {
        let mut desc = D3D10_BUFFER_DESC::default();
        unsafe { self.GetDesc(&mut desc) };
        Ok(BufferDesc {
            byte_width: desc.ByteWidth,
        }
        .into())
    }
}

impl MapTarget for ID3D10Texture1D {
    fn resource_desc(&self) -> Result<ResourceDesc, QueryError> {
        let mut desc = D3D10_TEXTURE1D_DESC::default();
        unsafe { self.GetDesc(&mut desc) };
        Ok(Texture1dDesc {
            format: desc.Format.into(),
            width: desc.Width,
            mip_levels: desc.MipLevels,
            array_size: desc.ArraySize,
        }
        .into())
    }
}

impl MapTarget for ID3D10Texture2D {
    fn resource_desc(&self) -> Result<ResourceDesc, QueryError> {
        let mut desc = D3D10_TEXTURE2D_DESC::default();
        unsafe { self.GetDesc(&mut desc) };
        Ok(Texture2dDesc {
            format: desc.Format.into(),
            width: desc.Width,
            height: desc.Height,
            mip_levels: desc.MipLevels,
            array_size: desc.ArraySize,
        }
        .into())
    }
}

impl MapTarget for ID3D10Texture3D {
    fn resource_desc(&self) -> Result<ResourceDesc, QueryError> {
        let mut desc = D3D10_TEXTURE3D_DESC::default();
        unsafe { self.GetDesc(&mut desc) };
        Ok(Texture3dDesc {
            format: desc.Format.into(),
            width: desc.Width,
            height: desc.Height,
            depth: desc.Depth,
            mip_levels: desc.MipLevels,
        }
        .into())
    }
}

impl From<&D3D10_MAPPED_TEXTURE2D> for MappedSubresource {
    fn from(mapped: &D3D10_MAPPED_TEXTURE2D) -> Self {
        MappedSubresource::Texture2D {
            data: mapped.pData,
            row_pitch: mapped.RowPitch,
        }
    }
}

impl From<&D3D10_MAPPED_TEXTURE3D> for MappedSubresource {
    fn from(mapped: &D3D10_MAPPED_TEXTURE3D) -> Self {
        MappedSubresource::Texture3D {
            data: mapped.pData,
            row_pitch: mapped.RowPitch,
            depth_pitch: mapped.DepthPitch,
        }
    }
}

/// Convert a raw `D3D10_MAP` value.
pub fn map_mode(map_type: D3D10_MAP) -> Option<MapMode> {
    u32::try_from(map_type.0).ok().and_then(MapMode::from_raw)
}

impl MapSizer {
    /// Resolve an `ID3D10Buffer::Map` or `ID3D10Texture*::Map` result.
    ///
    /// `mapped` is the pointer written through `ppData` for buffers and 1D
    /// textures, or a reference to the mapped texture struct otherwise.
    pub fn resolve_d3d10_map<T, M>(
        &self,
        resource: &T,
        subresource: u32,
        map_type: D3D10_MAP,
        mapped: M,
    ) -> MappedRegion
    where
        T: MapTarget + ?Sized,
        M: Into<MappedSubresource>,
    {
        let Some(mode) = map_mode(map_type) else {
            debug!("Unrecognized D3D10_MAP value {}", map_type.0);
            return MappedRegion::EMPTY;
        };
        self.map_info(resource, subresource, mode, mapped.into())
    }
}
