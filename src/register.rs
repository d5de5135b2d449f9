//! HX8352C register definitions
//!
//! This module defines the register indices used to drive the HX8352C TFT
//! controller. Every access is a register select (RS low) followed by one or
//! more 16-bit data words (RS high).
//!
//! ## Window Addressing
//!
//! Window coordinates are split across two 8-bit registers each:
//!
//! | Coordinate   | High byte | Low byte |
//! |--------------|-----------|----------|
//! | Column start | `0x02`    | `0x03`   |
//! | Column end   | `0x04`    | `0x05`   |
//! | Row start    | `0x06`    | `0x07`   |
//! | Row end      | `0x08`    | `0x09`   |
//!
//! After the window is programmed, selecting [`GRAM_ACCESS`] lets subsequent
//! data words address consecutive pixels in raster order.
//!
//! ## Example
//!
//! ```rust,no_run
//! use hx8352c::{register, Bus};
//! # use core::convert::Infallible;
//! # struct MockBus;
//! # impl Bus for MockBus {
//! #     type Error = Infallible;
//! #     fn write_register(&mut self, _r: u16) -> Result<(), Infallible> { Ok(()) }
//! #     fn write_data(&mut self, _d: u16) -> Result<(), Infallible> { Ok(()) }
//! #     fn read_register(&mut self) -> Result<u16, Infallible> { Ok(0) }
//! #     fn read_data(&mut self) -> Result<u16, Infallible> { Ok(0) }
//! # }
//! # let mut bus = MockBus;
//! // Select 16 bits per pixel
//! let _ = bus.write_register(register::PIXEL_FORMAT);
//! let _ = bus.write_data(register::PIXEL_FORMAT_16BPP);
//! ```

// Window and GRAM access

/// Column address start, high byte (0x02)
pub const COLUMN_START_HIGH: u16 = 0x0002;

/// Column address start, low byte (0x03)
pub const COLUMN_START_LOW: u16 = 0x0003;

/// Column address end, high byte (0x04)
pub const COLUMN_END_HIGH: u16 = 0x0004;

/// Column address end, low byte (0x05)
pub const COLUMN_END_LOW: u16 = 0x0005;

/// Row address start, high byte (0x06)
pub const ROW_START_HIGH: u16 = 0x0006;

/// Row address start, low byte (0x07)
pub const ROW_START_LOW: u16 = 0x0007;

/// Row address end, high byte (0x08)
pub const ROW_END_HIGH: u16 = 0x0008;

/// Row address end, low byte (0x09)
pub const ROW_END_LOW: u16 = 0x0009;

/// GRAM read/write access (0x22)
///
/// Data words following this register are written to (or read from) the
/// programmed window, starting at the window origin.
pub const GRAM_ACCESS: u16 = 0x0022;

// Memory access control

/// Memory access control / entry mode (0x16)
///
/// Holds the rotation bits. See [`ENTRY_MODE_SWAP_XY`], [`ENTRY_MODE_MIRROR_X`]
/// and [`ENTRY_MODE_MIRROR_Y`].
pub const ENTRY_MODE: u16 = 0x0016;

/// Row/column exchange bit of [`ENTRY_MODE`]
pub const ENTRY_MODE_SWAP_XY: u16 = 0x0020;

/// Column address order bit of [`ENTRY_MODE`]
pub const ENTRY_MODE_MIRROR_X: u16 = 0x0040;

/// Row address order bit of [`ENTRY_MODE`]
pub const ENTRY_MODE_MIRROR_Y: u16 = 0x0080;

/// Interface pixel format (0x17)
pub const PIXEL_FORMAT: u16 = 0x0017;

/// 16 bits per pixel value for [`PIXEL_FORMAT`]
pub const PIXEL_FORMAT_16BPP: u16 = 0x0005;

// Power control

/// Operation mode / deep standby control (0x01)
pub const OPERATION_MODE: u16 = 0x0001;

/// OSC control 1, frame rate (0x18)
pub const OSC_CONTROL_1: u16 = 0x0018;

/// OSC control 2, oscillator enable (0x19)
pub const OSC_CONTROL_2: u16 = 0x0019;

/// Power control 1, step-up factor (0x1A)
pub const POWER_CONTROL_1: u16 = 0x001A;

/// Power control 2, VREG1 voltage (0x1B)
pub const POWER_CONTROL_2: u16 = 0x001B;

/// Power control 3, operational amplifier current (0x1C)
pub const POWER_CONTROL_3: u16 = 0x001C;

/// Power control 6, standby/power-on sequencing (0x1F)
pub const POWER_CONTROL_6: u16 = 0x001F;

/// VCOM control 1 (0x23)
pub const VCOM_CONTROL_1: u16 = 0x0023;

/// VCOM control 2, VCOMH voltage (0x24)
pub const VCOM_CONTROL_2: u16 = 0x0024;

/// VCOM control 3, VCOM amplitude (0x25)
pub const VCOM_CONTROL_3: u16 = 0x0025;

/// Gate output non-overlap period (0x2D)
pub const SOURCE_GATE_TIMING: u16 = 0x002D;

// Display control

/// Display control 3, gate output and display enable (0x28)
pub const DISPLAY_CONTROL_3: u16 = 0x0028;

/// Panel characteristic control (0x36)
pub const PANEL_CHARACTERISTIC: u16 = 0x0036;

/// First gamma register (0x40); the table continues through 0x4E
pub const GAMMA_BASE: u16 = 0x0040;

/// [`DISPLAY_CONTROL_3`] value: gate on, display enabled, output halted
pub const DISPLAY_GATE_ON: u16 = 0x0038;

/// [`DISPLAY_CONTROL_3`] value: gate on, display enabled, normal output
pub const DISPLAY_ON: u16 = 0x003C;

/// [`DISPLAY_CONTROL_3`] value: gate on, display output blanked
pub const DISPLAY_OFF: u16 = 0x0030;
