//! Toolkit-facing device interface
//!
//! [`DeviceApi`] is the operation table a graphics toolkit drives: drawing
//! primitives, pixel access, capability queries and lifecycle entry points.
//! [`Display`](crate::Display) is the HX8352C implementation.

use crate::bitmap::Bitmap;

/// Inclusive rectangle (x0, y0) to (x1, y1)
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rect {
    /// Left column
    pub x0: u16,
    /// Top row
    pub y0: u16,
    /// Right column (inclusive)
    pub x1: u16,
    /// Bottom row (inclusive)
    pub y1: u16,
}

impl Rect {
    /// Create a new rectangle from inclusive corners
    pub const fn new(x0: u16, y0: u16, x1: u16, y1: u16) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// True if the rectangle covers no pixels (x1 < x0 or y1 < y0)
    pub fn is_empty(&self) -> bool {
        self.x1 < self.x0 || self.y1 < self.y0
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        if self.is_empty() {
            0
        } else {
            u32::from(self.x1 - self.x0) + 1
        }
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        if self.is_empty() {
            0
        } else {
            u32::from(self.y1 - self.y0) + 1
        }
    }

    /// Number of pixels covered
    pub fn area(&self) -> u32 {
        self.width() * self.height()
    }
}

/// How drawn pixels combine with the panel contents
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DrawMode {
    /// Every pixel in the target area is written
    #[default]
    Normal,
    /// Bitmap samples of 0 leave the panel untouched
    Transparent,
    /// Set pixels are complemented with the index mask
    Xor,
}

/// Capability identifiers for [`DeviceApi::device_property`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceProperty {
    /// Logical width
    XSize,
    /// Logical height
    YSize,
    /// Virtual width (equal to the logical width)
    VirtualXSize,
    /// Virtual height (equal to the logical height)
    VirtualYSize,
    /// Bits per pixel of the active color conversion
    BitsPerPixel,
    /// Number of colors of the active color conversion
    NumColors,
    /// Horizontal magnification
    XMag,
    /// Vertical magnification
    YMag,
    /// X mirroring still to be applied by the caller
    MirrorX,
    /// Y mirroring still to be applied by the caller
    MirrorY,
    /// Axis swap still to be applied by the caller
    SwapXY,
    /// Red/blue swap still to be applied by the caller
    SwapRB,
}

/// Data identifiers for [`DeviceApi::device_data`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceData {
    /// Memory device (off-screen buffer) format matching the panel
    MemoryDevice,
}

/// Off-screen buffer format compatible with the panel's color depth
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MemoryDevice {
    /// Bits per pixel of the buffer
    pub bits_per_pixel: u8,
}

impl MemoryDevice {
    /// 16 bits per pixel buffers
    pub const BPP16: Self = Self { bits_per_pixel: 16 };
}

/// Lifecycle entry point identifiers for [`DeviceApi::device_function`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DeviceFunctionId {
    /// Controller initialization
    Init,
    /// Display output on
    On,
    /// Display output off
    Off,
    /// Block read of display memory
    ReadRect,
}

/// Lifecycle entry point returned by [`DeviceApi::device_function`]
pub enum DeviceFunction<D: DeviceApi> {
    /// Initialize the controller
    Init(fn(&mut D) -> Result<(), D::Error>),
    /// Turn display output on
    On(fn(&mut D) -> Result<(), D::Error>),
    /// Turn display output off
    Off(fn(&mut D) -> Result<(), D::Error>),
    /// Read a rectangle of pixel indices into a buffer
    ReadRect(fn(&mut D, Rect, &mut [u16]) -> Result<(), D::Error>),
}

/// Operation table exposed to a graphics toolkit
///
/// Coordinates are logical. Callers keep them inside [`rect`](Self::rect);
/// out-of-range coordinates are not checked.
///
/// The operations are not reentrant: the controller's address window is a
/// single shared resource, so calls must be serialized by the caller.
pub trait DeviceApi {
    /// Error type for device operations
    type Error;

    /// Draw a bitmap with its top-left corner at (x, y)
    ///
    /// For 1, 2 and 4 bpp bitmaps the first drawn pixel lands at `x + diff`.
    fn draw_bitmap(&mut self, x: u16, y: u16, bitmap: &Bitmap<'_>) -> Result<(), Self::Error>;

    /// Draw a horizontal line from (x0, y) to (x1, y) in the current color
    fn draw_hline(&mut self, x0: u16, y: u16, x1: u16) -> Result<(), Self::Error>;

    /// Draw a vertical line from (x, y0) to (x, y1) in the current color
    fn draw_vline(&mut self, x: u16, y0: u16, y1: u16) -> Result<(), Self::Error>;

    /// Fill a rectangle in the current color
    fn fill_rect(&mut self, rect: Rect) -> Result<(), Self::Error>;

    /// Read the pixel index at (x, y)
    fn pixel_index(&mut self, x: u16, y: u16) -> Result<u16, Self::Error>;

    /// Write the pixel index at (x, y)
    fn set_pixel_index(&mut self, x: u16, y: u16, index: u16) -> Result<(), Self::Error>;

    /// Complement the pixel at (x, y) with the index mask
    fn xor_pixel(&mut self, x: u16, y: u16) -> Result<(), Self::Error>;

    /// Set the virtual screen origin
    ///
    /// Virtual screens are not supported; the default does nothing.
    fn set_origin(&mut self, _x: u16, _y: u16) {}

    /// Look up a lifecycle entry point
    fn device_function(&self, id: DeviceFunctionId) -> Option<DeviceFunction<Self>>
    where
        Self: Sized;

    /// Query a device capability
    fn device_property(&self, property: DeviceProperty) -> u32;

    /// Query device data
    fn device_data(&self, id: DeviceData) -> Option<MemoryDevice>;

    /// Logical drawing area
    fn rect(&self) -> Rect;
}
