//! Error types for the driver
//!
//! This module defines error types for configuration building ([`BuilderError`])
//! and display operations ([`Error`]).
//!
//! ## Error Types
//!
//! - [`BuilderError`] - Errors during configuration construction
//! - [`Error`] - Runtime errors during display operations
//! - [`InterfaceError`](crate::interface::InterfaceError) - Low-level bus communication errors
//!
//! ## Example
//!
//! ```
//! use hx8352c::{Builder, Dimensions, BuilderError};
//!
//! // Missing dimensions
//! let result = Builder::new().build();
//! assert!(matches!(result, Err(BuilderError::MissingDimensions)));
//!
//! // Invalid dimensions
//! let result = Dimensions::new(500, 240); // Too many rows
//! assert!(result.is_err());
//! ```

use crate::device::DrawMode;
use crate::interface::Bus;

/// Maximum gate outputs (rows) addressable by the HX8352C
///
/// The controller addresses 432 gate lines. Panels with fewer visible rows
/// sit flush against one end of that range, which is why mirrored
/// orientations carry a row offset.
pub const MAX_GATE_OUTPUTS: u16 = 432;

/// Maximum source outputs (columns) addressable by the HX8352C
pub const MAX_SOURCE_OUTPUTS: u16 = 240;

/// Errors that can occur when interacting with the display
///
/// Generic over the bus type to preserve the specific error type.
/// This allows error handling code to match on the underlying hardware error.
#[derive(Debug)]
pub enum Error<B: Bus> {
    /// Bus error
    ///
    /// Wraps the underlying hardware error from the [`Bus`] implementation.
    Bus(B::Error),
    /// No bus has been bound with [`Display::set_bus`](crate::Display::set_bus)
    BusNotBound,
    /// The controller has not been initialized with
    /// [`Display::init`](crate::Display::init)
    NotInitialized,
    /// Bitmap bit depth is not one of 1, 2, 4, 8 or 16
    UnsupportedBitDepth(u8),
    /// The draw mode has no implementation at this bit depth
    ///
    /// XOR drawing is only available for 1 bpp bitmaps.
    UnsupportedDrawMode {
        /// Bits per pixel of the rejected bitmap
        bits_per_pixel: u8,
        /// Requested draw mode
        mode: DrawMode,
    },
    /// Sub-byte start offset is out of range for the bit depth
    ///
    /// `diff` must be below `8 / bits_per_pixel` (and 0 for 8 bpp).
    InvalidDiff {
        /// Bits per pixel of the bitmap
        bits_per_pixel: u8,
        /// Offset that was provided
        diff: u8,
    },
    /// 16 bpp stride is not a whole number of pixels
    InvalidStride {
        /// Stride in bytes
        stride: usize,
    },
    /// Buffer is too small for the requested area
    BufferTooSmall {
        /// Required buffer size in elements
        required: usize,
        /// Provided buffer size in elements
        provided: usize,
    },
    /// Palette does not cover every sample value in the bitmap
    PaletteTooSmall {
        /// Required number of entries
        required: usize,
        /// Provided number of entries
        provided: usize,
    },
}

impl<B: Bus> core::fmt::Display for Error<B> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Bus(e) => write!(f, "Bus error: {e:?}"),
            Self::BusNotBound => write!(f, "No bus bound to the driver"),
            Self::NotInitialized => write!(f, "Controller not initialized"),
            Self::UnsupportedBitDepth(bpp) => write!(f, "Unsupported bit depth: {bpp} bpp"),
            Self::UnsupportedDrawMode {
                bits_per_pixel,
                mode,
            } => write!(f, "Draw mode {mode:?} unsupported at {bits_per_pixel} bpp"),
            Self::InvalidDiff {
                bits_per_pixel,
                diff,
            } => write!(f, "Invalid start offset {diff} for {bits_per_pixel} bpp"),
            Self::InvalidStride { stride } => {
                write!(f, "Invalid stride: {stride} bytes is not a whole pixel")
            }
            Self::BufferTooSmall { required, provided } => {
                write!(f, "Buffer too small: required {required}, provided {provided}")
            }
            Self::PaletteTooSmall { required, provided } => {
                write!(
                    f,
                    "Palette too small: required {required} entries, provided {provided}"
                )
            }
        }
    }
}

impl<B: Bus + core::fmt::Debug> core::error::Error for Error<B> {}

/// Errors that can occur when building configuration
///
/// These errors occur during the builder pattern before the display is created.
#[derive(Debug)]
pub enum BuilderError {
    /// Dimensions were not specified
    ///
    /// [`Builder::dimensions()`](crate::config::Builder::dimensions) must be called before building.
    MissingDimensions,
    /// Invalid dimensions provided
    ///
    /// See [`Dimensions::new()`](crate::config::Dimensions::new) for constraints.
    InvalidDimensions {
        /// Number of rows (height) requested
        rows: u16,
        /// Number of columns (width) requested
        cols: u16,
    },
}

impl core::fmt::Display for BuilderError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::MissingDimensions => write!(f, "Dimensions must be specified"),
            Self::InvalidDimensions { rows, cols } => write!(
                f,
                "Invalid dimensions {rows}x{cols} (max {MAX_GATE_OUTPUTS}x{MAX_SOURCE_OUTPUTS})"
            ),
        }
    }
}

impl core::error::Error for BuilderError {}
