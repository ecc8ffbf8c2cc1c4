//! Format Size Rules
//!
//! Classifies DXGI formats into the three layouts that matter for
//! mapped-size math and adjusts a texel rectangle accordingly.

use serde::{Deserialize, Serialize};

/// Raw `DXGI_FORMAT` value.
///
/// Kept as a newtype rather than an enum so values reported by newer
/// runtimes still round-trip through the calculator.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct DxgiFormat(pub u32);

impl DxgiFormat {
    pub const UNKNOWN: Self = Self(0);
    pub const R32G32B32A32_FLOAT: Self = Self(2);
    pub const R32G32B32_FLOAT: Self = Self(6);
    pub const R16G16B16A16_FLOAT: Self = Self(10);
    pub const R16G16B16A16_UNORM: Self = Self(11);
    pub const R32G32_FLOAT: Self = Self(16);
    pub const R10G10B10A2_UNORM: Self = Self(24);
    pub const R11G11B10_FLOAT: Self = Self(26);
    pub const R8G8B8A8_TYPELESS: Self = Self(27);
    pub const R8G8B8A8_UNORM: Self = Self(28);
    pub const R8G8B8A8_UNORM_SRGB: Self = Self(29);
    pub const R16G16_FLOAT: Self = Self(34);
    pub const D32_FLOAT: Self = Self(40);
    pub const R32_FLOAT: Self = Self(41);
    pub const R32_UINT: Self = Self(42);
    pub const D24_UNORM_S8_UINT: Self = Self(45);
    pub const R8G8_UNORM: Self = Self(49);
    pub const R16_FLOAT: Self = Self(54);
    pub const D16_UNORM: Self = Self(55);
    pub const R16_UINT: Self = Self(57);
    pub const R8_UNORM: Self = Self(61);
    pub const A8_UNORM: Self = Self(65);

    // Horizontally packed (two texels share chroma)
    pub const R8G8_B8G8_UNORM: Self = Self(68);
    pub const G8R8_G8B8_UNORM: Self = Self(69);

    // Block compressed
    pub const BC1_TYPELESS: Self = Self(70);
    pub const BC1_UNORM: Self = Self(71);
    pub const BC1_UNORM_SRGB: Self = Self(72);
    pub const BC2_TYPELESS: Self = Self(73);
    pub const BC2_UNORM: Self = Self(74);
    pub const BC2_UNORM_SRGB: Self = Self(75);
    pub const BC3_TYPELESS: Self = Self(76);
    pub const BC3_UNORM: Self = Self(77);
    pub const BC3_UNORM_SRGB: Self = Self(78);
    pub const BC4_TYPELESS: Self = Self(79);
    pub const BC4_UNORM: Self = Self(80);
    pub const BC4_SNORM: Self = Self(81);
    pub const BC5_TYPELESS: Self = Self(82);
    pub const BC5_UNORM: Self = Self(83);
    pub const BC5_SNORM: Self = Self(84);

    pub const B5G6R5_UNORM: Self = Self(85);
    pub const B5G5R5A1_UNORM: Self = Self(86);
    pub const B8G8R8A8_UNORM: Self = Self(87);
    pub const B8G8R8X8_UNORM: Self = Self(88);
    pub const B8G8R8A8_UNORM_SRGB: Self = Self(91);

    pub const BC6H_TYPELESS: Self = Self(94);
    pub const BC6H_UF16: Self = Self(95);
    pub const BC6H_SF16: Self = Self(96);
    pub const BC7_TYPELESS: Self = Self(97);
    pub const BC7_UNORM: Self = Self(98);
    pub const BC7_UNORM_SRGB: Self = Self(99);

    /// Size-math category of this format under the built-in table.
    pub fn category(self) -> FormatCategory {
        classify(self)
    }
}

impl From<u32> for DxgiFormat {
    fn from(raw: u32) -> Self {
        Self(raw)
    }
}

/// How a format's texel rectangle maps onto rows of the mapped layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormatCategory {
    /// Fixed 4x4 texel blocks.
    BlockCompressed,
    /// Two horizontally adjacent texels per element.
    Packed,
    /// One texel per element; row pitch is the whole story.
    Linear,
    /// Layout not determinable. Sizes come out as zero.
    Unknown,
}

/// Texel edge length of a compressed block.
pub const BLOCK_DIM: u32 = 4;

const BLOCK_COMPRESSED: &[DxgiFormat] = &[
    DxgiFormat::BC1_TYPELESS,
    DxgiFormat::BC1_UNORM,
    DxgiFormat::BC1_UNORM_SRGB,
    DxgiFormat::BC2_TYPELESS,
    DxgiFormat::BC2_UNORM,
    DxgiFormat::BC2_UNORM_SRGB,
    DxgiFormat::BC3_TYPELESS,
    DxgiFormat::BC3_UNORM,
    DxgiFormat::BC3_UNORM_SRGB,
    DxgiFormat::BC4_TYPELESS,
    DxgiFormat::BC4_UNORM,
    DxgiFormat::BC4_SNORM,
    DxgiFormat::BC5_TYPELESS,
    DxgiFormat::BC5_UNORM,
    DxgiFormat::BC5_SNORM,
    DxgiFormat::BC6H_TYPELESS,
    DxgiFormat::BC6H_UF16,
    DxgiFormat::BC6H_SF16,
    DxgiFormat::BC7_TYPELESS,
    DxgiFormat::BC7_UNORM,
    DxgiFormat::BC7_UNORM_SRGB,
];

const PACKED: &[DxgiFormat] = &[DxgiFormat::R8G8_B8G8_UNORM, DxgiFormat::G8R8_G8B8_UNORM];

/// Classify a format using the built-in table.
///
/// Anything not listed as compressed, packed or `UNKNOWN` is linear.
pub fn classify(format: DxgiFormat) -> FormatCategory {
    if format == DxgiFormat::UNKNOWN {
        FormatCategory::Unknown
    } else if BLOCK_COMPRESSED.contains(&format) {
        FormatCategory::BlockCompressed
    } else if PACKED.contains(&format) {
        FormatCategory::Packed
    } else {
        FormatCategory::Linear
    }
}

impl FormatCategory {
    /// Convert a texel-space `width` x `height` into the element grid rows are
    /// counted in. Returns `None` when the layout is unknown.
    pub fn adjust_extent(self, width: u32, height: u32) -> Option<(u32, u32)> {
        match self {
            FormatCategory::BlockCompressed => {
                Some((width.div_ceil(BLOCK_DIM), height.div_ceil(BLOCK_DIM)))
            }
            FormatCategory::Packed => Some((width.div_ceil(2), height)),
            FormatCategory::Linear => Some((width, height)),
            FormatCategory::Unknown => None,
        }
    }
}
