//=========================================================================
// Screen Profile
//=========================================================================
//
// Classifies host display metrics into the two closed enumerations the
// engine understands: a size class and a density class.
//
// The integer codes of `ScreenSize` and `ScreenDensity` are a protocol
// shared with the engine side. Changing them, or adding a device class,
// requires bumping `SCREEN_PROTOCOL_VERSION` on both sides.
//
// Flow:
//   DisplayMetrics ──classify()──> ScreenProfile (immutable)
//                       └─ unmapped value → ErrorCode::UnsupportedScreen
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::error::{EngineError, ErrorCode};

//=== Protocol Constants ==================================================

/// Version of the size/density integer mapping.
pub const SCREEN_PROTOCOL_VERSION: u32 = 1;

/// Mask selecting the size bucket out of a host screen layout word.
pub const SCREEN_LAYOUT_SIZE_MASK: u32 = 0x0F;

pub const SCREEN_LAYOUT_SIZE_SMALL: u32 = 1;
pub const SCREEN_LAYOUT_SIZE_NORMAL: u32 = 2;
pub const SCREEN_LAYOUT_SIZE_LARGE: u32 = 3;
pub const SCREEN_LAYOUT_SIZE_XLARGE: u32 = 4;

pub const DENSITY_LOW: u32 = 120;
pub const DENSITY_MEDIUM: u32 = 160;
pub const DENSITY_HIGH: u32 = 240;
pub const DENSITY_XHIGH: u32 = 320;

//=== ScreenSize ==========================================================

/// Discrete screen size class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ScreenSize {
    Small = 0,
    Normal = 1,
    Large = 2,
    ExtraLarge = 3,
}

impl ScreenSize {
    /// Integer code shared with the engine side.
    pub fn code(self) -> i32 {
        self as i32
    }

    fn from_layout(size_layout: u32) -> Option<Self> {
        match size_layout & SCREEN_LAYOUT_SIZE_MASK {
            SCREEN_LAYOUT_SIZE_SMALL => Some(Self::Small),
            SCREEN_LAYOUT_SIZE_NORMAL => Some(Self::Normal),
            SCREEN_LAYOUT_SIZE_LARGE => Some(Self::Large),
            SCREEN_LAYOUT_SIZE_XLARGE => Some(Self::ExtraLarge),
            _ => None,
        }
    }
}

//=== ScreenDensity =======================================================

/// Discrete screen density class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i32)]
pub enum ScreenDensity {
    Low = 0,
    Medium = 1,
    High = 2,
    ExtraHigh = 3,
}

impl ScreenDensity {
    /// Integer code shared with the engine side.
    pub fn code(self) -> i32 {
        self as i32
    }

    fn from_dpi(density_dpi: u32) -> Option<Self> {
        match density_dpi {
            DENSITY_LOW => Some(Self::Low),
            DENSITY_MEDIUM => Some(Self::Medium),
            DENSITY_HIGH => Some(Self::High),
            DENSITY_XHIGH => Some(Self::ExtraHigh),
            _ => None,
        }
    }
}

//=== DisplayMetrics ======================================================

/// Raw metrics reported by the host display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayMetrics {
    /// Host screen layout word; the size bucket lives under the size mask.
    pub size_layout: u32,

    /// Density in dots per inch.
    pub density_dpi: u32,
}

impl DisplayMetrics {
    pub fn new(size_layout: u32, density_dpi: u32) -> Self {
        Self {
            size_layout,
            density_dpi,
        }
    }

    /// Derives metrics from a window's physical size and scale factor.
    ///
    /// Density is `160 * scale`, rounded. The size bucket follows the
    /// density-independent size of the window:
    ///
    /// | bucket  | min dp (long x short) |
    /// |---------|-----------------------|
    /// | xlarge  | 960 x 720             |
    /// | large   | 640 x 480             |
    /// | normal  | 470 x 320             |
    /// | small   | anything smaller      |
    pub fn from_window(width_px: u32, height_px: u32, scale_factor: f64) -> Self {
        let density_dpi = (scale_factor * DENSITY_MEDIUM as f64).round() as u32;

        let scale = if scale_factor > 0.0 { scale_factor } else { 1.0 };
        let long_dp = width_px.max(height_px) as f64 / scale;
        let short_dp = width_px.min(height_px) as f64 / scale;

        let size_layout = if long_dp >= 960.0 && short_dp >= 720.0 {
            SCREEN_LAYOUT_SIZE_XLARGE
        } else if long_dp >= 640.0 && short_dp >= 480.0 {
            SCREEN_LAYOUT_SIZE_LARGE
        } else if long_dp >= 470.0 && short_dp >= 320.0 {
            SCREEN_LAYOUT_SIZE_NORMAL
        } else {
            SCREEN_LAYOUT_SIZE_SMALL
        };

        Self {
            size_layout,
            density_dpi,
        }
    }
}

//=== ScreenProfile =======================================================

/// Classified screen description passed to the engine at start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScreenProfile {
    size: ScreenSize,
    density: ScreenDensity,
}

impl ScreenProfile {
    pub fn new(size: ScreenSize, density: ScreenDensity) -> Self {
        Self { size, density }
    }

    /// Classifies host metrics.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorCode::UnsupportedScreen`] when either the size bucket
    /// or the density has no class.
    pub fn classify(metrics: &DisplayMetrics) -> Result<Self, EngineError> {
        let size = ScreenSize::from_layout(metrics.size_layout).ok_or_else(|| {
            EngineError::new(
                ErrorCode::UnsupportedScreen,
                format!("size layout {:#x}", metrics.size_layout),
            )
        })?;

        let density = ScreenDensity::from_dpi(metrics.density_dpi).ok_or_else(|| {
            EngineError::new(
                ErrorCode::UnsupportedScreen,
                format!("density {} dpi", metrics.density_dpi),
            )
        })?;

        Ok(Self { size, density })
    }

    pub fn size(&self) -> ScreenSize {
        self.size
    }

    pub fn density(&self) -> ScreenDensity {
        self.density
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
