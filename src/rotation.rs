//! Coordinate transform between logical and controller address space
//!
//! The toolkit draws in a logical space whose size depends on the orientation.
//! The controller's entry mode register performs the actual axis swap and
//! mirroring; the driver only has to translate logical coordinates into the
//! window addresses that land on the visible area.
//!
//! The HX8352C addresses [`MAX_GATE_OUTPUTS`](crate::MAX_GATE_OUTPUTS) rows and
//! [`MAX_SOURCE_OUTPUTS`](crate::MAX_SOURCE_OUTPUTS) columns. A panel with
//! fewer rows (e.g. 400 of 432) is wired flush against the start of that
//! range, so whenever mirroring reverses an axis the visible area begins
//! `gap` addresses in.
//!
//! ## Offset Rule
//!
//! | swap | physical x offset           | physical y offset           |
//! |------|-----------------------------|-----------------------------|
//! | no   | `mirror_x ? col_gap : 0`    | `mirror_y ? row_gap : 0`    |
//! | yes  | `mirror_y ? row_gap : 0`    | `mirror_x ? col_gap : 0`    |
//!
//! ## Example
//!
//! ```
//! use hx8352c::{Dimensions, Rotation, rotation::Transform};
//!
//! // 240x400 panel rotated 270 degrees: 400x240 logical, 32 column offset
//! let t = Transform::new(Rotation::Rotate270.orientation(), Dimensions::PANEL_240X400);
//! assert_eq!(t.logical_size(), (400, 240));
//! assert_eq!(t.to_physical(0, 0), (32, 0));
//! assert_eq!(t.to_physical(399, 239), (431, 239));
//! ```

use crate::config::{Dimensions, Orientation};
use crate::device::Rect;

/// Logical to physical coordinate mapping for one orientation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transform {
    orientation: Orientation,
    x_offset: u16,
    y_offset: u16,
    width: u16,
    height: u16,
}

impl Transform {
    /// Select the transform for an orientation and panel size
    pub fn new(orientation: Orientation, dims: Dimensions) -> Self {
        let col_offset = if orientation.mirror_x {
            dims.col_gap()
        } else {
            0
        };
        let row_offset = if orientation.mirror_y {
            dims.row_gap()
        } else {
            0
        };

        if orientation.swap_xy {
            Self {
                orientation,
                x_offset: row_offset,
                y_offset: col_offset,
                width: dims.rows,
                height: dims.cols,
            }
        } else {
            Self {
                orientation,
                x_offset: col_offset,
                y_offset: row_offset,
                width: dims.cols,
                height: dims.rows,
            }
        }
    }

    /// Orientation this transform was built for
    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    /// Map a logical coordinate to controller window addresses
    ///
    /// Callers keep coordinates within [`logical_size`](Self::logical_size);
    /// the result for out-of-range input is saturated, not checked.
    pub fn to_physical(&self, x: u16, y: u16) -> (u16, u16) {
        (
            x.saturating_add(self.x_offset),
            y.saturating_add(self.y_offset),
        )
    }

    /// Map a logical rectangle to controller window addresses
    pub fn rect_to_physical(&self, rect: Rect) -> Rect {
        let (x0, y0) = self.to_physical(rect.x0, rect.y0);
        let (x1, y1) = self.to_physical(rect.x1, rect.y1);
        Rect::new(x0, y0, x1, y1)
    }

    /// Logical (width, height)
    pub fn logical_size(&self) -> (u16, u16) {
        (self.width, self.height)
    }

    /// Window covering exactly the visible area, in controller addresses
    pub fn hw_clip(&self) -> Rect {
        self.rect_to_physical(Rect::new(
            0,
            0,
            self.width.saturating_sub(1),
            self.height.saturating_sub(1),
        ))
    }
}
