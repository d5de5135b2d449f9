//! Color conversion policy and GRAM read-back format
//!
//! The driver writes pixel indices produced by the active color conversion.
//! Reading GRAM back returns 8-bit R, G and B bytes per pixel packed into
//! 16-bit words, which this module repacks into RGB565.

/// Color conversion policy
///
/// Only the index mask is consumed by the driver: it is the value XOR drawing
/// complements pixels with, and it determines the reported bit depth.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ColorConversion {
    index_mask: u16,
}

impl ColorConversion {
    /// 16-bit RGB565
    pub const RGB565: Self = Self::new(0xFFFF);

    /// Create a conversion with the given index mask
    pub const fn new(index_mask: u16) -> Self {
        Self { index_mask }
    }

    /// Mask covering every valid pixel index
    pub fn index_mask(&self) -> u16 {
        self.index_mask
    }

    /// Bits per pixel implied by the index mask
    ///
    /// Rounded up to the next of 1, 2, 4, 8 or 16.
    pub fn bits_per_pixel(&self) -> u8 {
        match self.index_mask {
            0x0100.. => 16,
            0x0010.. => 8,
            0x0004.. => 4,
            0x0002.. => 2,
            _ => 1,
        }
    }

    /// Number of representable colors
    pub fn num_colors(&self) -> u32 {
        1 << self.bits_per_pixel()
    }
}

impl Default for ColorConversion {
    fn default() -> Self {
        Self::RGB565
    }
}

/// Pack the pixel whose R, G bytes lead `first` and whose B byte leads `second`
pub(crate) fn unpack_leading_pixel(first: u16, second: u16) -> u16 {
    (first & 0xF800) | ((first & 0x00FC) << 3) | (second >> 11)
}

/// Pack the pixel whose R byte trails `first` and whose G, B bytes fill `second`
pub(crate) fn unpack_trailing_pixel(first: u16, second: u16) -> u16 {
    ((first & 0x00F8) << 8) | ((second & 0xFC00) >> 5) | ((second & 0x00F8) >> 3)
}

/// R, G, B bytes the controller returns for an RGB565 pixel
#[cfg(test)]
pub(crate) fn gram_read_bytes(pixel: u16) -> [u8; 3] {
    [
        (((pixel >> 11) & 0x1F) << 3) as u8,
        (((pixel >> 5) & 0x3F) << 2) as u8,
        ((pixel & 0x1F) << 3) as u8,
    ]
}
