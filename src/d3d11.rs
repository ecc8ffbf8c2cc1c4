//! D3D11 Bindings Module
//!
//! Descriptor queries and map-result conversions for the real D3D11/DXGI
//! interfaces, so a hooking layer can hand its interface pointers straight
//! to the resolver.

use tracing::debug;
use windows::Win32::Graphics::Direct3D11::{
    ID3D11Buffer, ID3D11Texture1D, ID3D11Texture2D, ID3D11Texture3D, D3D11_BUFFER_DESC,
    D3D11_MAP, D3D11_MAPPED_SUBRESOURCE, D3D11_TEXTURE1D_DESC, D3D11_TEXTURE2D_DESC,
    D3D11_TEXTURE3D_DESC,
};
use windows::Win32::Graphics::Dxgi::Common::DXGI_FORMAT;
use windows::Win32::Graphics::Dxgi::{IDXGISurface, DXGI_MAPPED_RECT};

use crate::error::QueryError;
use crate::format::DxgiFormat;
use crate::map::{
    MapFlags, MapMode, MapSizer, MapTarget, MappedRect, MappedRegion, MappedSubresource,
    SurfaceTarget,
};
use crate::resource::{
    BufferDesc, ResourceDesc, SurfaceDesc, Texture1dDesc, Texture2dDesc, Texture3dDesc,
};

impl From<DXGI_FORMAT> for DxgiFormat {
    fn from(format: DXGI_FORMAT) -> Self {
        DxgiFormat(format.0 as u32)
    }
}

impl From<windows::core::Error> for QueryError {
    fn from(e: windows::core::Error) -> Self {
        QueryError::Hresult(e.code().0 as u32)
    }
}

impl MapTarget for ID3D11Buffer {
    fn resource_desc(&self) -> Result<ResourceDesc, QueryError> {
        let mut desc = D3D11_BUFFER_DESC::default();
        unsafe { self.GetDesc(&mut desc) };
        Ok(BufferDesc {
            byte_width: desc.ByteWidth,
        }
        .into())
    }
}

impl MapTarget for ID3D11Texture1D {
    fn resource_desc(&self) -> Result<ResourceDesc, QueryError> {
        let mut desc = D3D11_TEXTURE1D_DESC::default();
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

impl MapTarget for ID3D11Texture2D {
    fn resource_desc(&self) -> Result<ResourceDesc, QueryError> {
        let mut desc = D3D11_TEXTURE2D_DESC::default();
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

impl MapTarget for ID3D11Texture3D {
    fn resource_desc(&self) -> Result<ResourceDesc, QueryError> {
        let mut desc = D3D11_TEXTURE3D_DESC::default();
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

impl SurfaceTarget for IDXGISurface {
    fn surface_desc(&self) -> Result<SurfaceDesc, QueryError> {
        let desc = unsafe { self.GetDesc()? };
        Ok(SurfaceDesc {
            format: desc.Format.into(),
            width: desc.Width,
            height: desc.Height,
        })
    }
}

impl From<&D3D11_MAPPED_SUBRESOURCE> for MappedSubresource {
    fn from(mapped: &D3D11_MAPPED_SUBRESOURCE) -> Self {
        MappedSubresource::Texture3D {
            data: mapped.pData,
            row_pitch: mapped.RowPitch,
            depth_pitch: mapped.DepthPitch,
        }
    }
}

impl From<&DXGI_MAPPED_RECT> for MappedRect {
    fn from(rect: &DXGI_MAPPED_RECT) -> Self {
        MappedRect {
            bits: rect.pBits,
            // A negative pitch has no forward span to capture.
            pitch: u32::try_from(rect.Pitch).unwrap_or(0),
        }
    }
}

/// Convert a raw `D3D11_MAP` value.
pub fn map_mode(map_type: D3D11_MAP) -> Option<MapMode> {
    u32::try_from(map_type.0).ok().and_then(MapMode::from_raw)
}

impl MapSizer {
    /// Resolve an `ID3D11DeviceContext::Map` result.
    pub fn resolve_d3d11_map<T: MapTarget + ?Sized>(
        &self,
        resource: &T,
        subresource: u32,
        map_type: D3D11_MAP,
        mapped: &D3D11_MAPPED_SUBRESOURCE,
    ) -> MappedRegion {
        let Some(mode) = map_mode(map_type) else {
            debug!("Unrecognized D3D11_MAP value {}", map_type.0);
            return MappedRegion::EMPTY;
        };
        self.map_info(resource, subresource, mode, mapped.into())
    }

    /// Resolve an `IDXGISurface::Map` result.
    pub fn resolve_dxgi_surface_map(
        &self,
        surface: &IDXGISurface,
        rect: &DXGI_MAPPED_RECT,
        map_flags: u32,
    ) -> MappedRegion {
        self.surface_map_info(surface, rect.into(), MapFlags(map_flags))
    }
}
