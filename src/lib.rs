//! Mapped-region sizing for D3D10/D3D11 resources
//!
//! A capture layer sitting between an application and the driver needs to
//! know how many bytes a `Map` call exposed. The runtime doesn't say, so this
//! crate derives it:
//! 1. Classifies the pixel format (block compressed, packed, linear)
//! 2. Walks the mip chain to the mapped subresource
//! 3. Combines the mip dimensions with the row/depth pitch the map returned
//!
//! Nothing here fails. Read-only maps, zero dimensions, unknown formats and
//! descriptor query failures all resolve to a null pointer and a zero size.

pub mod config;
#[cfg(windows)]
pub mod d3d10;
#[cfg(windows)]
pub mod d3d11;
pub mod error;
pub mod format;
pub mod geometry;
pub mod map;
pub mod resource;

pub use config::{Config, FormatOverride};
pub use error::QueryError;
pub use format::{classify, DxgiFormat, FormatCategory};
pub use geometry::{data_size, mip_data_size, mip_dimensions, num_mip_levels};
pub use map::{
    map_info, surface_map_info, MapFlags, MapMode, MapSizer, MapTarget, MappedRect, MappedRegion,
    MappedSubresource, SurfaceTarget,
};
pub use resource::{
    BufferDesc, ResourceDesc, ResourceKind, SurfaceDesc, Texture1dDesc, Texture2dDesc,
    Texture3dDesc,
};
