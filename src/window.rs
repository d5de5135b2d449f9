//! Windowed write protocol
//!
//! Multi-pixel operations program the controller's column/row window, select
//! GRAM, stream words, then rewrite the column-end and row-end registers to
//! the cached hardware clip. The clip is rewritten even when the transfer
//! fails, since per-pixel writes only move the start registers. The start
//! registers are left stale; every later windowed operation reprograms start
//! and end together.

use log::trace;

use crate::color::{unpack_leading_pixel, unpack_trailing_pixel};
use crate::device::Rect;
use crate::interface::Bus;
use crate::register::{
    COLUMN_END_HIGH, COLUMN_END_LOW, COLUMN_START_HIGH, COLUMN_START_LOW, ENTRY_MODE,
    GRAM_ACCESS, ROW_END_HIGH, ROW_END_LOW, ROW_START_HIGH, ROW_START_LOW,
};
use crate::rotation::Transform;

/// Shortest run drawn through a block window instead of pixel by pixel
///
/// A single pixel costs 10 bus calls (cursor, GRAM select, data); a block
/// costs 26 regardless of length (window, GRAM select, repeating write,
/// clip restore).
pub const BLOCK_WRITE_MIN_RUN: u32 = 3;

/// Bus access scoped to one driver operation
pub(crate) struct WindowWriter<'a, B: Bus> {
    bus: &'a mut B,
    transform: Transform,
    hw_clip: Rect,
}

impl<'a, B: Bus> WindowWriter<'a, B> {
    pub(crate) fn new(bus: &'a mut B, transform: Transform, hw_clip: Rect) -> Self {
        Self {
            bus,
            transform,
            hw_clip,
        }
    }

    fn write_pair(&mut self, register: u16, value: u16) -> Result<(), B::Error> {
        self.bus.write_register(register)?;
        self.bus.write_data(value)
    }

    /// Write the entry mode (rotation bits) register
    pub(crate) fn set_entry_mode(&mut self, value: u16) -> Result<(), B::Error> {
        self.write_pair(ENTRY_MODE, value)
    }

    /// Write a coordinate split across a high and a low byte register
    fn write_coordinate(&mut self, high: u16, low: u16, value: u16) -> Result<(), B::Error> {
        self.write_pair(high, value >> 8)?;
        self.write_pair(low, value & 0x00FF)
    }

    /// Program all eight window registers with controller addresses
    pub(crate) fn program_window(&mut self, physical: Rect) -> Result<(), B::Error> {
        trace!(
            "window ({}, {}) - ({}, {})",
            physical.x0, physical.y0, physical.x1, physical.y1
        );
        self.write_coordinate(COLUMN_START_HIGH, COLUMN_START_LOW, physical.x0)?;
        self.write_coordinate(COLUMN_END_HIGH, COLUMN_END_LOW, physical.x1)?;
        self.write_coordinate(ROW_START_HIGH, ROW_START_LOW, physical.y0)?;
        self.write_coordinate(ROW_END_HIGH, ROW_END_LOW, physical.y1)
    }

    /// Program the window covering a logical rectangle
    fn set_window(&mut self, logical: Rect) -> Result<(), B::Error> {
        let physical = self.transform.rect_to_physical(logical);
        self.program_window(physical)
    }

    /// Move the GRAM address to a logical pixel
    fn set_cursor(&mut self, x: u16, y: u16) -> Result<(), B::Error> {
        let (px, py) = self.transform.to_physical(x, y);
        self.write_coordinate(COLUMN_START_HIGH, COLUMN_START_LOW, px)?;
        self.write_coordinate(ROW_START_HIGH, ROW_START_LOW, py)
    }

    fn begin_gram_access(&mut self) -> Result<(), B::Error> {
        self.bus.write_register(GRAM_ACCESS)
    }

    /// Point the column-end and row-end registers back at the hardware clip
    fn restore_clip(&mut self) -> Result<(), B::Error> {
        let clip = self.hw_clip;
        self.write_coordinate(COLUMN_END_HIGH, COLUMN_END_LOW, clip.x1)?;
        self.write_coordinate(ROW_END_HIGH, ROW_END_LOW, clip.y1)
    }

    /// Run `body` with GRAM selected inside the window covering `logical`
    ///
    /// The clip is restored afterwards whether or not programming the window
    /// or `body` failed. The first error wins.
    pub(crate) fn windowed<T, F>(&mut self, logical: Rect, body: F) -> Result<T, B::Error>
    where
        F: FnOnce(&mut Self) -> Result<T, B::Error>,
    {
        let result = match self
            .set_window(logical)
            .and_then(|()| self.begin_gram_access())
        {
            Ok(()) => body(self),
            Err(e) => Err(e),
        };
        let restored = self.restore_clip();
        match result {
            Ok(value) => restored.map(|()| value),
            Err(e) => Err(e),
        }
    }

    pub(crate) fn write_data(&mut self, word: u16) -> Result<(), B::Error> {
        self.bus.write_data(word)
    }

    pub(crate) fn write_multiple_data(&mut self, words: &[u16]) -> Result<(), B::Error> {
        self.bus.write_multiple_data(words)
    }

    pub(crate) fn set_pixel_index(&mut self, x: u16, y: u16, index: u16) -> Result<(), B::Error> {
        self.set_cursor(x, y)?;
        self.begin_gram_access()?;
        self.bus.write_data(index)
    }

    pub(crate) fn pixel_index(&mut self, x: u16, y: u16) -> Result<u16, B::Error> {
        self.set_cursor(x, y)?;
        self.begin_gram_access()?;
        // First word after GRAM select is a dummy
        let mut words = [0u16; 3];
        self.bus.read_multiple_data(&mut words)?;
        Ok(unpack_leading_pixel(words[1], words[2]))
    }

    pub(crate) fn xor_pixel(&mut self, x: u16, y: u16, mask: u16) -> Result<(), B::Error> {
        let index = self.pixel_index(x, y)?;
        self.set_pixel_index(x, y, index ^ mask)
    }

    /// Fill a logical rectangle through one window
    pub(crate) fn fill(&mut self, rect: Rect, index: u16) -> Result<(), B::Error> {
        self.windowed(rect, |w| w.bus.write_repeating_data(index, rect.area()))
    }

    /// Fill a one pixel wide or tall run, choosing the cheaper write path
    pub(crate) fn fill_run(&mut self, run: Rect, index: u16) -> Result<(), B::Error> {
        if run.area() < BLOCK_WRITE_MIN_RUN {
            for y in run.y0..=run.y1 {
                for x in run.x0..=run.x1 {
                    self.set_pixel_index(x, y, index)?;
                }
            }
            Ok(())
        } else {
            self.fill(run, index)
        }
    }

    /// XOR every pixel of a logical rectangle with `mask`
    pub(crate) fn xor_rect(&mut self, rect: Rect, mask: u16) -> Result<(), B::Error> {
        for y in rect.y0..=rect.y1 {
            for x in rect.x0..=rect.x1 {
                self.xor_pixel(x, y, mask)?;
            }
        }
        Ok(())
    }

    /// Read a logical rectangle of pixel indices into `buffer`
    ///
    /// `buffer` must hold at least `rect.area()` entries.
    pub(crate) fn read_rect(&mut self, rect: Rect, buffer: &mut [u16]) -> Result<(), B::Error> {
        self.windowed(rect, |w| {
            w.bus.read_data()?;

            let total = rect.area() as usize;
            let mut pixels = buffer.iter_mut().take(total);
            let mut remaining = total;
            let mut words = [0u16; 3];
            while remaining > 1 {
                w.bus.read_multiple_data(&mut words)?;
                if let Some(p) = pixels.next() {
                    *p = unpack_leading_pixel(words[0], words[1]);
                }
                if let Some(p) = pixels.next() {
                    *p = unpack_trailing_pixel(words[1], words[2]);
                }
                remaining -= 2;
            }
            if remaining == 1 {
                w.bus.read_multiple_data(&mut words[..2])?;
                if let Some(p) = pixels.next() {
                    *p = unpack_leading_pixel(words[0], words[1]);
                }
            }
            Ok(())
        })
    }
}
