//! Bitmap source data and pixel format decoding
//!
//! Bitmaps at 1, 2, 4 and 8 bits per pixel are byte-packed, most significant
//! sample first, with an optional palette mapping samples to pixel indices.
//! 16 bpp bitmaps hold final pixel indices and are streamed as-is.
//!
//! ## Draw Modes
//!
//! | bpp     | Normal          | Transparent                    | XOR                     |
//! |---------|-----------------|--------------------------------|-------------------------|
//! | 1       | one window      | per pixel, foreground only     | per pixel read/modify   |
//! | 2, 4, 8 | one window      | per pixel, non-zero samples    | rejected                |
//! | 16      | one window      | same as Normal                 | same as Normal, warned  |
//!
//! ## Example
//!
//! ```
//! use hx8352c::Bitmap;
//!
//! // 5x1 pixel 2bpp bitmap starting at the second sample of its first byte
//! let data = [0b00_01_10_11, 0b01_10_00_00];
//! let palette = [0x0000, 0xF800, 0x07E0, 0x001F];
//! let bitmap = Bitmap::packed(5, 1, 2, 2, &data)
//!     .with_diff(1)
//!     .with_palette(&palette);
//! assert_eq!(bitmap.bits_per_pixel(), 2);
//! ```

use log::warn;

use crate::device::{DrawMode, Rect};
use crate::error::Error;
use crate::interface::Bus;
use crate::window::WindowWriter;

/// Pixel storage of a [`Bitmap`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BitmapData<'a> {
    /// Byte-packed samples at 1, 2, 4 or 8 bits per pixel
    Packed {
        /// Bits per sample
        bits_per_pixel: u8,
        /// Sample bytes, `stride` bytes per row
        data: &'a [u8],
        /// Index of the first sample within each row's first byte
        diff: u8,
    },
    /// Final 16-bit pixel indices
    Rgb565(&'a [u16]),
}

/// Source bitmap for [`DeviceApi::draw_bitmap`](crate::DeviceApi::draw_bitmap)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Bitmap<'a> {
    /// Width in pixels
    pub width: u16,
    /// Height in pixels
    pub height: u16,
    /// Distance between rows in bytes (may exceed the row size for sub-rectangle blits)
    pub stride: usize,
    /// Pixel storage
    pub data: BitmapData<'a>,
    /// Sample to pixel index lookup (ignored at 16 bpp)
    pub palette: Option<&'a [u16]>,
}

/// Decoding strategy chosen for a (depth, mode) pair
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Plan {
    /// Stream every sample through one window
    Opaque,
    /// Write non-zero samples pixel by pixel
    Transparent,
    /// Write set bits in the foreground index pixel by pixel (1 bpp)
    Foreground,
    /// Complement pixels under set bits (1 bpp)
    Xor,
    /// Stream 16-bit rows through one window
    Direct,
}

impl<'a> Bitmap<'a> {
    /// Create a byte-packed bitmap with no palette and a zero start offset
    pub fn packed(
        width: u16,
        height: u16,
        bits_per_pixel: u8,
        stride: usize,
        data: &'a [u8],
    ) -> Self {
        Self {
            width,
            height,
            stride,
            data: BitmapData::Packed {
                bits_per_pixel,
                data,
                diff: 0,
            },
            palette: None,
        }
    }

    /// Create a 16 bpp bitmap; `stride` is in bytes
    pub fn rgb565(width: u16, height: u16, stride: usize, data: &'a [u16]) -> Self {
        Self {
            width,
            height,
            stride,
            data: BitmapData::Rgb565(data),
            palette: None,
        }
    }

    /// Set the sub-byte start offset of packed bitmaps
    pub fn with_diff(mut self, diff: u8) -> Self {
        if let BitmapData::Packed { diff: d, .. } = &mut self.data {
            *d = diff;
        }
        self
    }

    /// Map samples through `palette`
    pub fn with_palette(mut self, palette: &'a [u16]) -> Self {
        self.palette = Some(palette);
        self
    }

    /// Bits per pixel of the source data
    pub fn bits_per_pixel(&self) -> u8 {
        match self.data {
            BitmapData::Packed { bits_per_pixel, .. } => bits_per_pixel,
            BitmapData::Rgb565(_) => 16,
        }
    }

    /// Sub-byte start offset (0 for 8 and 16 bpp)
    pub fn diff(&self) -> u8 {
        match self.data {
            BitmapData::Packed { diff, .. } => diff,
            BitmapData::Rgb565(_) => 0,
        }
    }

    /// True if the bitmap covers no pixels
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check the bitmap against `mode` and pick a decoding strategy
    ///
    /// Runs before any bus traffic so a rejected bitmap never leaves the
    /// controller window narrowed.
    pub(crate) fn plan<B: Bus>(&self, mode: DrawMode) -> Result<Plan, Error<B>> {
        match self.data {
            BitmapData::Rgb565(words) => {
                if mode == DrawMode::Xor {
                    warn!("16 bpp bitmap drawn opaquely in XOR mode");
                }
                if self.stride % 2 != 0 {
                    return Err(Error::InvalidStride {
                        stride: self.stride,
                    });
                }
                let required = self.required_len(self.stride / 2, usize::from(self.width))?;
                check_len(required, words.len())?;
                Ok(Plan::Direct)
            }
            BitmapData::Packed {
                bits_per_pixel,
                data,
                diff,
            } => {
                if !matches!(bits_per_pixel, 1 | 2 | 4 | 8) {
                    return Err(Error::UnsupportedBitDepth(bits_per_pixel));
                }
                if diff >= 8 / bits_per_pixel {
                    return Err(Error::InvalidDiff {
                        bits_per_pixel,
                        diff,
                    });
                }
                let plan = match (bits_per_pixel, mode) {
                    (_, DrawMode::Normal) => Plan::Opaque,
                    (1, DrawMode::Transparent) => Plan::Foreground,
                    (_, DrawMode::Transparent) => Plan::Transparent,
                    (1, DrawMode::Xor) => Plan::Xor,
                    (_, DrawMode::Xor) => {
                        return Err(Error::UnsupportedDrawMode {
                            bits_per_pixel,
                            mode,
                        });
                    }
                };
                let bits =
                    (usize::from(diff) + usize::from(self.width)) * usize::from(bits_per_pixel);
                let required = self.required_len(self.stride, bits.div_ceil(8))?;
                check_len(required, data.len())?;
                self.check_palette(bits_per_pixel)?;
                Ok(plan)
            }
        }
    }

    /// Elements needed for `height` rows `stride` apart, the last `row_len` long
    fn required_len<B: Bus>(&self, stride: usize, row_len: usize) -> Result<usize, Error<B>> {
        if self.is_empty() {
            return Ok(0);
        }
        stride
            .checked_mul(usize::from(self.height) - 1)
            .and_then(|len| len.checked_add(row_len))
            .ok_or(Error::InvalidStride {
                stride: self.stride,
            })
    }

    fn check_palette<B: Bus>(&self, bits_per_pixel: u8) -> Result<(), Error<B>> {
        let Some(palette) = self.palette else {
            return Ok(());
        };
        let required = if bits_per_pixel < 8 {
            1usize << bits_per_pixel
        } else if palette.len() >= 256 || self.is_empty() {
            return Ok(());
        } else {
            // Short 8 bpp palettes are fine as long as no sample exceeds them
            let max = (0..self.height)
                .flat_map(|y| self.samples(y))
                .max()
                .unwrap_or(0);
            usize::from(max) + 1
        };
        if palette.len() < required {
            return Err(Error::PaletteTooSmall {
                required,
                provided: palette.len(),
            });
        }
        Ok(())
    }

    /// Samples of row `y`, most significant first, starting at `diff`
    pub(crate) fn samples(&self, y: u16) -> Samples<'a> {
        let (bits_per_pixel, data, diff) = match self.data {
            BitmapData::Packed {
                bits_per_pixel,
                data,
                diff,
            } => (bits_per_pixel, data, diff),
            BitmapData::Rgb565(_) => (8, &[][..], 0),
        };
        let row = data.get(usize::from(y) * self.stride..).unwrap_or(&[]);
        Samples {
            data: row,
            bits_per_pixel,
            bit: usize::from(diff) * usize::from(bits_per_pixel),
            remaining: self.width,
        }
    }

    /// Pixel indices of 16 bpp row `y`
    fn rgb565_row(&self, y: u16) -> &'a [u16] {
        match self.data {
            BitmapData::Rgb565(words) => {
                let start = usize::from(y) * (self.stride / 2);
                words
                    .get(start..start + usize::from(self.width))
                    .unwrap_or(&[])
            }
            BitmapData::Packed { .. } => &[],
        }
    }

    /// Pixel index written for `sample`
    fn lookup(&self, sample: u8) -> u16 {
        self.palette
            .and_then(|palette| palette.get(usize::from(sample)).copied())
            .unwrap_or(u16::from(sample))
    }
}

fn check_len<B: Bus>(required: usize, provided: usize) -> Result<(), Error<B>> {
    if provided < required {
        return Err(Error::BufferTooSmall { required, provided });
    }
    Ok(())
}

/// Iterator over the samples of one bitmap row
#[derive(Clone, Debug)]
pub(crate) struct Samples<'a> {
    data: &'a [u8],
    bits_per_pixel: u8,
    /// Bit position of the next sample, counted from the MSB of `data[0]`
    bit: usize,
    remaining: u16,
}

impl Iterator for Samples<'_> {
    type Item = u8;

    fn next(&mut self) -> Option<u8> {
        if self.remaining == 0 {
            return None;
        }
        let byte = *self.data.get(self.bit / 8)?;
        let shift = 8 - u32::from(self.bits_per_pixel) - (self.bit % 8) as u32;
        let mask = 0xFFu8 >> (8 - self.bits_per_pixel);
        self.bit += usize::from(self.bits_per_pixel);
        self.remaining -= 1;
        Some((byte >> shift) & mask)
    }
}

/// Draw `bitmap` with its top-left corner at logical (x, y)
pub(crate) fn draw<B: Bus>(
    writer: &mut WindowWriter<'_, B>,
    x: u16,
    y: u16,
    bitmap: &Bitmap<'_>,
    plan: Plan,
    index_mask: u16,
) -> Result<(), B::Error> {
    if bitmap.is_empty() {
        return Ok(());
    }
    let x = x.saturating_add(u16::from(bitmap.diff()));
    let area = Rect::new(
        x,
        y,
        x.saturating_add(bitmap.width - 1),
        y.saturating_add(bitmap.height - 1),
    );

    match plan {
        Plan::Opaque => writer.windowed(area, |w| {
            for row in 0..bitmap.height {
                for sample in bitmap.samples(row) {
                    w.write_data(bitmap.lookup(sample))?;
                }
            }
            Ok(())
        }),
        Plan::Direct => writer.windowed(area, |w| {
            for row in 0..bitmap.height {
                w.write_multiple_data(bitmap.rgb565_row(row))?;
            }
            Ok(())
        }),
        Plan::Transparent => for_each_sample(bitmap, area, |px, py, sample| {
            if sample != 0 {
                writer.set_pixel_index(px, py, bitmap.lookup(sample))?;
            }
            Ok(())
        }),
        Plan::Foreground => {
            let foreground = bitmap.lookup(1);
            for_each_sample(bitmap, area, |px, py, sample| {
                if sample != 0 {
                    writer.set_pixel_index(px, py, foreground)?;
                }
                Ok(())
            })
        }
        Plan::Xor => for_each_sample(bitmap, area, |px, py, sample| {
            if sample != 0 {
                writer.xor_pixel(px, py, index_mask)?;
            }
            Ok(())
        }),
    }
}

fn for_each_sample<E, F>(bitmap: &Bitmap<'_>, area: Rect, mut f: F) -> Result<(), E>
where
    F: FnMut(u16, u16, u8) -> Result<(), E>,
{
    for row in 0..bitmap.height {
        let py = area.y0.saturating_add(row);
        for (i, sample) in (0..bitmap.width).zip(bitmap.samples(row)) {
            f(area.x0.saturating_add(i), py, sample)?;
        }
    }
    Ok(())
}
