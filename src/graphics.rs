//! Graphics support via embedded-graphics
//!
//! [`Display`] implements [`DrawTarget`] with [`Rgb565`] colors, drawing
//! straight into controller GRAM. Solid fills and fully visible contiguous
//! areas go through one address window; everything else is drawn pixel by
//! pixel. The toolkit [`DrawMode`](crate::DrawMode) does not apply here.
//!
//! ## Example
//!
//! ```rust,no_run
//! use embedded_graphics::{
//!     pixelcolor::Rgb565,
//!     prelude::*,
//!     primitives::{Circle, PrimitiveStyle, Rectangle},
//! };
//! use hx8352c::{Builder, Dimensions, Display, NoBringUp, Rotation};
//! # use core::convert::Infallible;
//! # struct MockBus;
//! # impl hx8352c::Bus for MockBus {
//! #     type Error = Infallible;
//! #     fn write_register(&mut self, _r: u16) -> Result<(), Infallible> { Ok(()) }
//! #     fn write_data(&mut self, _d: u16) -> Result<(), Infallible> { Ok(()) }
//! #     fn read_register(&mut self) -> Result<u16, Infallible> { Ok(0) }
//! #     fn read_data(&mut self) -> Result<u16, Infallible> { Ok(0) }
//! # }
//! # let config = match Builder::new()
//! #     .dimensions(Dimensions::PANEL_240X400)
//! #     .rotation(Rotation::Rotate270)
//! #     .build()
//! # {
//! #     Ok(config) => config,
//! #     Err(_) => return,
//! # };
//! let mut display: Display<MockBus> = Display::new(config, NoBringUp);
//! display.set_bus(MockBus);
//! let _ = display.init();
//!
//! let _ = display.clear(Rgb565::BLACK);
//!
//! let _ = Rectangle::new(Point::new(10, 10), Size::new(50, 30))
//!     .into_styled(PrimitiveStyle::with_fill(Rgb565::RED))
//!     .draw(&mut display);
//!
//! let _ = Circle::new(Point::new(100, 50), 40)
//!     .into_styled(PrimitiveStyle::with_stroke(Rgb565::WHITE, 2))
//!     .draw(&mut display);
//! ```

use embedded_graphics_core::{
    Pixel,
    draw_target::DrawTarget,
    geometry::{Dimensions, OriginDimensions, Point, Size},
    pixelcolor::{IntoStorage, Rgb565},
    primitives::{PointsIter, Rectangle},
};

use crate::bringup::BringUp;
use crate::device::{DeviceApi, Rect};
use crate::display::Display;
use crate::error::Error;
use crate::interface::Bus;

/// Convert a non-empty rectangle already clipped to the screen
fn to_rect(area: &Rectangle) -> Option<Rect> {
    let bottom_right = area.bottom_right()?;
    Some(Rect::new(
        area.top_left.x as u16,
        area.top_left.y as u16,
        bottom_right.x as u16,
        bottom_right.y as u16,
    ))
}

impl<B, H> DrawTarget for Display<B, H>
where
    B: Bus,
    H: BringUp<B>,
{
    type Color = Rgb565;
    type Error = Error<B>;

    fn draw_iter<Iter>(&mut self, pixels: Iter) -> Result<(), Self::Error>
    where
        Iter: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let sz = self.size();

        for Pixel(Point { x, y }, color) in pixels {
            if x < 0 || y < 0 {
                continue;
            }

            let x = x as u32;
            let y = y as u32;

            if x >= sz.width || y >= sz.height {
                continue;
            }

            self.set_pixel_index(x as u16, y as u16, color.into_storage())?;
        }

        Ok(())
    }

    fn fill_contiguous<I>(&mut self, area: &Rectangle, colors: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Self::Color>,
    {
        let visible = area.intersection(&self.bounding_box());
        if visible != *area {
            return self.draw_iter(
                area.points()
                    .zip(colors)
                    .map(|(point, color)| Pixel(point, color)),
            );
        }
        match to_rect(area) {
            Some(rect) => self.write_area(rect, colors.into_iter().map(IntoStorage::into_storage)),
            None => Ok(()),
        }
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let visible = area.intersection(&self.bounding_box());
        match to_rect(&visible) {
            Some(rect) => self.fill_index(rect, color.into_storage()),
            None => Ok(()),
        }
    }
}

impl<B, H> OriginDimensions for Display<B, H>
where
    B: Bus,
    H: BringUp<B>,
{
    fn size(&self) -> Size {
        let rect = self.rect();
        Size::new(rect.width(), rect.height())
    }
}
