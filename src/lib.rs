//! HX8352C TFT LCD Driver
//!
//! A driver for the HX8352C LCD controller with 240 source and 432 gate
//! outputs, such as the 240x400 panels found on many evaluation boards.
//!
//! ## Features
//!
//! - `no_std` compatible
//! - `embedded-hal` v1.0 support
//! - `embedded-graphics` integration (with `graphics` feature)
//! - Eight orientations (rotation and mirroring) handled by the controller
//! - 1, 2, 4, 8 and 16 bpp bitmaps in normal, transparent and XOR modes
//! - Block writes for runs of three pixels or more
//! - GRAM read-back
//!
//! ## Usage
//!
//! ```rust,no_run
//! use core::convert::Infallible;
//! use embedded_hal::delay::DelayNs;
//! use embedded_hal::digital::OutputPin;
//! use embedded_hal::spi::{Operation, SpiDevice};
//! use hx8352c::{
//!     Bitmap, Builder, DeviceApi, Dimensions, Display, Hx8352cBringUp, Rect, Rotation,
//!     SpiInterface,
//! };
//!
//! # struct MockSpi;
//! # impl embedded_hal::spi::ErrorType for MockSpi { type Error = Infallible; }
//! # impl SpiDevice for MockSpi {
//! #     fn transaction(
//! #         &mut self,
//! #         _operations: &mut [Operation<'_, u8>],
//! #     ) -> Result<(), Self::Error> {
//! #         Ok(())
//! #     }
//! # }
//! # struct MockPin;
//! # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
//! # impl OutputPin for MockPin {
//! #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
//! # }
//! # struct MockDelay;
//! # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
//! # let spi = MockSpi;
//! # let rs = MockPin;
//! # let rst = MockPin;
//! # let delay = MockDelay;
//! let config = match Builder::new()
//!     .dimensions(Dimensions::PANEL_240X400)
//!     .rotation(Rotation::Rotate270)
//!     .build()
//! {
//!     Ok(config) => config,
//!     Err(_) => return,
//! };
//!
//! let mut display = Display::new(config, Hx8352cBringUp::new(rst, delay));
//! display.set_bus(SpiInterface::new(spi, rs));
//! let _ = display.init();
//! let _ = display.on();
//!
//! // Clear, then draw a 1bpp glyph with a two-entry palette
//! display.set_color_index(0x0000);
//! let _ = display.fill_rect(Rect::new(0, 0, 399, 239));
//! let glyph = [0x3C, 0x42, 0x42, 0x3C];
//! let palette = [0x0000, 0xFFFF];
//! let bitmap = Bitmap::packed(8, 4, 1, 1, &glyph).with_palette(&palette);
//! let _ = display.draw_bitmap(10, 10, &bitmap);
//! ```

#![no_std]

#[cfg(any(test, feature = "alloc"))]
extern crate alloc;

/// Bitmap source data and pixel format decoding
pub mod bitmap;
/// Controller power-up and output control
pub mod bringup;
/// Color conversion and GRAM read-back format
pub mod color;
/// Display configuration types and builder
pub mod config;
/// Toolkit-facing device interface
pub mod device;
/// Core display operations
pub mod display;
/// Error types for the driver
pub mod error;
/// Hardware bus abstraction
pub mod interface;
/// HX8352C register definitions
pub mod register;
/// Coordinate transform between logical and controller space
pub mod rotation;
mod window;

/// Graphics support via embedded-graphics (requires `graphics` feature)
#[cfg(feature = "graphics")]
pub mod graphics;

#[cfg(test)]
mod mock;

pub use bitmap::{Bitmap, BitmapData};
pub use bringup::{BringUp, Hx8352cBringUp, NoBringUp};
pub use color::ColorConversion;
pub use config::{
    Builder, Config, Dimensions, MAX_GATE_OUTPUTS, MAX_SOURCE_OUTPUTS, Orientation, Rotation,
};
pub use device::{
    DeviceApi, DeviceData, DeviceFunction, DeviceFunctionId, DeviceProperty, DrawMode,
    MemoryDevice, Rect,
};
pub use display::{Display, DriverState};
pub use error::{BuilderError, Error};
pub use interface::{Bus, InterfaceError, SpiInterface};
pub use window::BLOCK_WRITE_MIN_RUN;
