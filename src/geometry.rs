//! Mip/Subresource Geometry
//!
//! Mip chain length, per-level dimensions and the byte span of a mapped
//! (row pitch, depth pitch) layout.

use tracing::debug;

use crate::format::{classify, DxgiFormat, FormatCategory};

/// Number of levels in a full mip chain for the given base dimensions.
///
/// The base level always counts, so `1x1x1` yields 1 and `256x1x1` yields 9.
pub fn num_mip_levels(width: u32, height: u32, depth: u32) -> u32 {
    let (mut w, mut h, mut d) = (width, height, depth);
    let mut levels = 0;
    loop {
        levels += 1;
        w >>= 1;
        h >>= 1;
        d >>= 1;
        if w == 0 && h == 0 && d == 0 {
            return levels;
        }
    }
}

/// Extent of one dimension at `mip_level`, clamped to 1 at the tail.
pub fn mip_extent(base: u32, mip_level: u32) -> u32 {
    base.checked_shr(mip_level).unwrap_or(0).max(1)
}

/// Dimensions of `mip_level` for the given base dimensions.
pub fn mip_dimensions(width: u32, height: u32, depth: u32, mip_level: u32) -> (u32, u32, u32) {
    (
        mip_extent(width, mip_level),
        mip_extent(height, mip_level),
        mip_extent(depth, mip_level),
    )
}

/// Bytes spanned by a mapped `width` x `height` x `depth` region of `format`.
///
/// Only the row count is format-adjusted; the row pitch reported by the map
/// call is authoritative for the horizontal byte size. Slices are assumed to
/// be laid out at `depth_pitch` stride, so the span runs from the start of the
/// first slice to the end of the last one.
pub fn data_size(
    format: DxgiFormat,
    width: u32,
    height: u32,
    row_pitch: u32,
    depth: u32,
    depth_pitch: u32,
) -> usize {
    category_data_size(classify(format), width, height, row_pitch, depth, depth_pitch)
}

/// [`data_size`] for a format that was already classified.
pub fn category_data_size(
    category: FormatCategory,
    width: u32,
    height: u32,
    row_pitch: u32,
    depth: u32,
    depth_pitch: u32,
) -> usize {
    if width == 0 || height == 0 || depth == 0 {
        return 0;
    }

    let Some((_width, rows)) = category.adjust_extent(width, height) else {
        debug!("Unknown format layout, mapped size not determinable");
        return 0;
    };

    let mut size = (rows as usize).saturating_mul(row_pitch as usize);
    if depth > 1 {
        let slices = (depth - 1) as usize;
        size = size.saturating_add(slices.saturating_mul(depth_pitch as usize));
    }
    size
}

/// [`data_size`] of mip level `mip_level` of a resource with the given base
/// dimensions. Zero base dimensions stay zero rather than clamping to 1.
pub fn mip_data_size(
    mip_level: u32,
    format: DxgiFormat,
    width: u32,
    height: u32,
    row_pitch: u32,
    depth: u32,
    depth_pitch: u32,
) -> usize {
    category_mip_data_size(
        mip_level,
        classify(format),
        width,
        height,
        row_pitch,
        depth,
        depth_pitch,
    )
}

/// [`mip_data_size`] for a format that was already classified.
pub fn category_mip_data_size(
    mip_level: u32,
    category: FormatCategory,
    width: u32,
    height: u32,
    row_pitch: u32,
    depth: u32,
    depth_pitch: u32,
) -> usize {
    if width == 0 || height == 0 || depth == 0 {
        return 0;
    }

    let (w, h, d) = mip_dimensions(width, height, depth, mip_level);
    category_data_size(category, w, h, row_pitch, d, depth_pitch)
}
