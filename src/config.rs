//! Display configuration types and builder

use crate::color::ColorConversion;
use crate::register::{ENTRY_MODE_MIRROR_X, ENTRY_MODE_MIRROR_Y, ENTRY_MODE_SWAP_XY};
use crate::rotation::Transform;

pub use crate::error::{BuilderError, MAX_GATE_OUTPUTS, MAX_SOURCE_OUTPUTS};

/// Display dimensions in native (unrotated) orientation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Dimensions {
    /// Number of rows (height in pixels, corresponds to gate outputs)
    pub rows: u16,
    /// Number of columns (width in pixels, corresponds to source outputs)
    pub cols: u16,
}

impl Dimensions {
    /// 240x400 panel commonly paired with the HX8352C
    pub const PANEL_240X400: Self = Self {
        rows: 400,
        cols: 240,
    };

    /// Create new dimensions with validation
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::InvalidDimensions` if:
    /// - rows is 0 or > MAX_GATE_OUTPUTS
    /// - cols is 0 or > MAX_SOURCE_OUTPUTS
    pub fn new(rows: u16, cols: u16) -> Result<Self, BuilderError> {
        if rows == 0 || rows > MAX_GATE_OUTPUTS {
            return Err(BuilderError::InvalidDimensions { rows, cols });
        }
        if cols == 0 || cols > MAX_SOURCE_OUTPUTS {
            return Err(BuilderError::InvalidDimensions { rows, cols });
        }
        Ok(Self { rows, cols })
    }

    /// Gate lines the controller addresses beyond the visible rows
    pub fn row_gap(&self) -> u16 {
        MAX_GATE_OUTPUTS - self.rows
    }

    /// Source lines the controller addresses beyond the visible columns
    pub fn col_gap(&self) -> u16 {
        MAX_SOURCE_OUTPUTS - self.cols
    }
}

/// Mirror and swap flags applied by the controller's entry mode register
///
/// Mirror flags act on the native axes, before swapping.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Orientation {
    /// Mirror the X axis
    pub mirror_x: bool,
    /// Mirror the Y axis
    pub mirror_y: bool,
    /// Exchange X and Y
    pub swap_xy: bool,
}

impl Orientation {
    /// Every mirror/swap combination
    pub const ALL: [Self; 8] = [
        Self::new(false, false, false),
        Self::new(false, false, true),
        Self::new(false, true, false),
        Self::new(false, true, true),
        Self::new(true, false, false),
        Self::new(true, false, true),
        Self::new(true, true, false),
        Self::new(true, true, true),
    ];

    /// Create an orientation from its three flags
    pub const fn new(mirror_x: bool, mirror_y: bool, swap_xy: bool) -> Self {
        Self {
            mirror_x,
            mirror_y,
            swap_xy,
        }
    }

    /// Value for the entry mode register (0x16)
    pub fn entry_mode(&self) -> u16 {
        let mut value = 0;
        if self.swap_xy {
            value |= ENTRY_MODE_SWAP_XY;
        }
        if self.mirror_x {
            value |= ENTRY_MODE_MIRROR_X;
        }
        if self.mirror_y {
            value |= ENTRY_MODE_MIRROR_Y;
        }
        value
    }
}

/// Display rotation relative to native orientation
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Rotation {
    /// No rotation
    #[default]
    Rotate0,
    /// Rotate 90 degrees clockwise
    Rotate90,
    /// Rotate 180 degrees
    Rotate180,
    /// Rotate 270 degrees clockwise
    Rotate270,
}

impl Rotation {
    /// Mirror/swap flags that realize this rotation
    pub fn orientation(self) -> Orientation {
        match self {
            Self::Rotate0 => Orientation::new(false, false, false),
            Self::Rotate90 => Orientation::new(true, false, true),
            Self::Rotate180 => Orientation::new(true, true, false),
            Self::Rotate270 => Orientation::new(false, true, true),
        }
    }
}

/// Display configuration
///
/// Use `Builder` to create a Config.
#[derive(Clone, Debug)]
pub struct Config {
    /// Display dimensions
    pub dimensions: Dimensions,
    /// Mirror/swap flags
    pub orientation: Orientation,
    /// Active color conversion (index mask)
    pub color_conversion: ColorConversion,
}

impl Config {
    /// Coordinate transform selected by this configuration
    pub fn transform(&self) -> Transform {
        Transform::new(self.orientation, self.dimensions)
    }

    /// Get the dimensions as seen through the orientation
    pub fn rotated_dimensions(&self) -> Dimensions {
        if self.orientation.swap_xy {
            Dimensions {
                rows: self.dimensions.cols,
                cols: self.dimensions.rows,
            }
        } else {
            self.dimensions
        }
    }
}

/// Builder for constructing display configuration
///
/// # Example
///
/// ```rust,no_run
/// use hx8352c::{Builder, Dimensions, Rotation};
///
/// let config = match Builder::new()
///     .dimensions(Dimensions::PANEL_240X400)
///     .rotation(Rotation::Rotate270)
///     .build()
/// {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// let _ = config;
/// ```
#[must_use]
pub struct Builder {
    /// Display dimensions (required)
    dimensions: Option<Dimensions>,
    /// Mirror/swap flags
    orientation: Orientation,
    /// Color conversion
    color_conversion: ColorConversion,
}

impl Default for Builder {
    fn default() -> Self {
        Self {
            dimensions: None,
            orientation: Rotation::Rotate0.orientation(),
            // Controller is brought up in 16 bpp mode
            color_conversion: ColorConversion::RGB565,
        }
    }
}

impl Builder {
    /// Create a new Builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set display dimensions (required)
    pub fn dimensions(mut self, dims: Dimensions) -> Self {
        self.dimensions = Some(dims);
        self
    }

    /// Set orientation from a rotation preset
    pub fn rotation(mut self, rotation: Rotation) -> Self {
        self.orientation = rotation.orientation();
        self
    }

    /// Set mirror/swap flags directly
    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = orientation;
        self
    }

    /// Set the color conversion policy
    pub fn color_conversion(mut self, conversion: ColorConversion) -> Self {
        self.color_conversion = conversion;
        self
    }

    /// Build the configuration
    ///
    /// # Errors
    ///
    /// Returns `BuilderError::MissingDimensions` if dimensions were not set
    pub fn build(self) -> Result<Config, BuilderError> {
        Ok(Config {
            dimensions: self.dimensions.ok_or(BuilderError::MissingDimensions)?,
            orientation: self.orientation,
            color_conversion: self.color_conversion,
        })
    }
}
