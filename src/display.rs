//! Core display operations
//!
//! [`Display`] owns the bus, the controller bring-up and the per-panel
//! context (coordinate transform and hardware clip). It walks a linear
//! lifecycle and implements [`DeviceApi`] on top of the windowed write
//! protocol.
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized -> ContextAllocated -> BusBound -> Active { display_on }
//! ```
//!
//! The context is created by the first call that needs it. Drawing before a
//! bus is bound fails with [`Error::BusNotBound`]; drawing before
//! [`init`](Display::init) fails with [`Error::NotInitialized`].

use log::{debug, warn};

use crate::bitmap::{self, Bitmap};
use crate::bringup::{BringUp, NoBringUp};
use crate::config::Config;
use crate::device::{
    DeviceApi, DeviceData, DeviceFunction, DeviceFunctionId, DeviceProperty, DrawMode,
    MemoryDevice, Rect,
};
use crate::error::Error;
use crate::interface::Bus;
use crate::rotation::Transform;
use crate::window::WindowWriter;

type DisplayResult<B> = core::result::Result<(), Error<B>>;

/// Driver lifecycle state
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DriverState {
    /// Nothing has been set up yet
    #[default]
    Uninitialized,
    /// Transform and hardware clip computed from the configuration
    ContextAllocated,
    /// A bus is bound; the controller has not been configured
    BusBound,
    /// Controller configured and accepting drawing calls
    Active {
        /// Whether display output is enabled
        display_on: bool,
    },
}

/// Per-panel state derived from the configuration
#[derive(Clone, Copy, Debug)]
struct DriverContext {
    transform: Transform,
    hw_clip: Rect,
}

/// HX8352C display driver
///
/// Generic over the bus and the controller bring-up. Without a bring-up
/// ([`NoBringUp`]) the controller is assumed to be powered and configured
/// already; [`init`](Self::init) then only programs the entry mode and
/// window registers.
///
/// ## Example
///
/// ```rust,no_run
/// use hx8352c::{Builder, DeviceApi, Dimensions, Display, NoBringUp, Rect, Rotation};
/// # use core::convert::Infallible;
/// # struct MockBus;
/// # impl hx8352c::Bus for MockBus {
/// #     type Error = Infallible;
/// #     fn write_register(&mut self, _r: u16) -> Result<(), Infallible> { Ok(()) }
/// #     fn write_data(&mut self, _d: u16) -> Result<(), Infallible> { Ok(()) }
/// #     fn read_register(&mut self) -> Result<u16, Infallible> { Ok(0) }
/// #     fn read_data(&mut self) -> Result<u16, Infallible> { Ok(0) }
/// # }
/// let config = match Builder::new()
///     .dimensions(Dimensions::PANEL_240X400)
///     .rotation(Rotation::Rotate270)
///     .build()
/// {
///     Ok(config) => config,
///     Err(_) => return,
/// };
/// let mut display: Display<MockBus> = Display::new(config, NoBringUp);
/// display.set_bus(MockBus);
/// let _ = display.init();
/// display.set_color_index(0xF800);
/// let _ = display.fill_rect(Rect::new(0, 0, 99, 49));
/// ```
pub struct Display<B, H = NoBringUp>
where
    B: Bus,
{
    /// Display configuration
    config: Config,
    /// Created on first use
    context: Option<DriverContext>,
    /// Bound bus, if any
    bus: Option<B>,
    /// Controller power and output control
    bring_up: H,
    state: DriverState,
    draw_mode: DrawMode,
    /// Pixel index used by lines and rectangles
    color_index: u16,
}

impl<B, H> Display<B, H>
where
    B: Bus,
    H: BringUp<B>,
{
    /// Create a driver with no bus bound
    pub fn new(config: Config, bring_up: H) -> Self {
        Self {
            config,
            context: None,
            bus: None,
            bring_up,
            state: DriverState::Uninitialized,
            draw_mode: DrawMode::Normal,
            color_index: 0,
        }
    }

    /// Create the context on first use
    fn init_once(&mut self) -> DriverContext {
        if let Some(context) = self.context {
            return context;
        }
        let transform = self.config.transform();
        let context = DriverContext {
            transform,
            hw_clip: transform.hw_clip(),
        };
        debug!(
            "context: {}x{} logical, clip {:?}",
            transform.logical_size().0,
            transform.logical_size().1,
            context.hw_clip
        );
        self.context = Some(context);
        if self.state == DriverState::Uninitialized {
            self.state = DriverState::ContextAllocated;
        }
        context
    }

    /// Bind the bus, returning the previously bound one
    ///
    /// Binding a new bus requires a fresh [`init`](Self::init) before drawing.
    pub fn set_bus(&mut self, bus: B) -> Option<B> {
        self.init_once();
        debug!("bus bound");
        self.state = DriverState::BusBound;
        self.bus.replace(bus)
    }

    /// Configure the controller
    ///
    /// Runs the bring-up, writes the entry mode for the configured
    /// orientation and programs the hardware clip into the window registers.
    /// Display output stays off until [`on`](Self::on).
    pub fn init(&mut self) -> DisplayResult<B> {
        let context = self.init_once();
        let bus = self.bus.as_mut().ok_or(Error::BusNotBound)?;

        self.bring_up.init_controller(bus).map_err(Error::Bus)?;

        let entry_mode = self.config.orientation.entry_mode();
        let mut writer = WindowWriter::new(bus, context.transform, context.hw_clip);
        writer.set_entry_mode(entry_mode).map_err(Error::Bus)?;
        writer.program_window(context.hw_clip).map_err(Error::Bus)?;

        debug!("controller configured, entry mode {:#04x}", entry_mode);
        self.state = DriverState::Active { display_on: false };
        Ok(())
    }

    /// Enable display output
    pub fn on(&mut self) -> DisplayResult<B> {
        self.switch_output(true)
    }

    /// Disable display output
    ///
    /// Window registers and context are left untouched.
    pub fn off(&mut self) -> DisplayResult<B> {
        self.switch_output(false)
    }

    fn switch_output(&mut self, on: bool) -> DisplayResult<B> {
        self.init_once();
        let bus = self.bus.as_mut().ok_or(Error::BusNotBound)?;
        if !matches!(self.state, DriverState::Active { .. }) {
            return Err(Error::NotInitialized);
        }
        if on {
            self.bring_up.display_on(bus).map_err(Error::Bus)?;
        } else {
            self.bring_up.display_off(bus).map_err(Error::Bus)?;
        }
        debug!("display output {}", if on { "on" } else { "off" });
        self.state = DriverState::Active { display_on: on };
        Ok(())
    }

    /// Current lifecycle state
    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Whether display output is enabled
    pub fn is_display_on(&self) -> bool {
        matches!(self.state, DriverState::Active { display_on: true })
    }

    /// Window covering the visible area, in controller addresses
    pub fn hw_clip(&self) -> Rect {
        self.context
            .map_or_else(|| self.config.transform().hw_clip(), |c| c.hw_clip)
    }

    /// Set how subsequent drawing combines with the panel contents
    pub fn set_draw_mode(&mut self, mode: DrawMode) {
        self.init_once();
        self.draw_mode = mode;
    }

    /// Current draw mode
    pub fn draw_mode(&self) -> DrawMode {
        self.draw_mode
    }

    /// Set the pixel index used by lines and rectangles
    pub fn set_color_index(&mut self, index: u16) {
        self.init_once();
        self.color_index = index;
    }

    /// Pixel index used by lines and rectangles
    pub fn color_index(&self) -> u16 {
        self.color_index
    }

    /// Read a rectangle of pixel indices, row by row, into `buffer`
    pub fn read_rect(&mut self, rect: Rect, buffer: &mut [u16]) -> DisplayResult<B> {
        let required = rect.area() as usize;
        if buffer.len() < required {
            return Err(Error::BufferTooSmall {
                required,
                provided: buffer.len(),
            });
        }
        let mut writer = self.writer()?;
        if rect.is_empty() {
            return Ok(());
        }
        writer.read_rect(rect, buffer).map_err(Error::Bus)
    }

    /// Read the controller's status register
    pub fn read_register(&mut self) -> Result<u16, Error<B>> {
        self.init_once();
        let bus = self.bus.as_mut().ok_or(Error::BusNotBound)?;
        bus.read_register().map_err(Error::Bus)
    }

    /// Get the display configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Bound bus, if any
    pub fn bus(&self) -> Option<&B> {
        self.bus.as_ref()
    }

    /// Mutable access to the bound bus
    ///
    /// Leaving the window registers changed breaks later drawing calls.
    pub fn bus_mut(&mut self) -> Option<&mut B> {
        self.bus.as_mut()
    }

    /// Release the bus and bring-up
    pub fn release(self) -> (Option<B>, H) {
        (self.bus, self.bring_up)
    }

    /// Window writer for a drawing call
    fn writer(&mut self) -> Result<WindowWriter<'_, B>, Error<B>> {
        let context = self.init_once();
        let bus = self.bus.as_mut().ok_or(Error::BusNotBound)?;
        if !matches!(self.state, DriverState::Active { .. }) {
            return Err(Error::NotInitialized);
        }
        Ok(WindowWriter::new(bus, context.transform, context.hw_clip))
    }

    /// Fill a logical rectangle with `index`, ignoring the draw mode
    #[cfg(feature = "graphics")]
    pub(crate) fn fill_index(&mut self, rect: Rect, index: u16) -> DisplayResult<B> {
        let mut writer = self.writer()?;
        if rect.is_empty() {
            return Ok(());
        }
        writer.fill(rect, index).map_err(Error::Bus)
    }

    /// Stream pixel indices into a logical rectangle, row by row
    #[cfg(feature = "graphics")]
    pub(crate) fn write_area<I>(&mut self, rect: Rect, indices: I) -> DisplayResult<B>
    where
        I: IntoIterator<Item = u16>,
    {
        let mut writer = self.writer()?;
        if rect.is_empty() {
            return Ok(());
        }
        writer
            .windowed(rect, |w| {
                let mut chunk = [0u16; 32];
                let mut len = 0;
                for index in indices.into_iter().take(rect.area() as usize) {
                    chunk[len] = index;
                    len += 1;
                    if len == chunk.len() {
                        w.write_multiple_data(&chunk)?;
                        len = 0;
                    }
                }
                if len > 0 {
                    w.write_multiple_data(&chunk[..len])?;
                }
                Ok(())
            })
            .map_err(Error::Bus)
    }

    fn index_mask(&self) -> u16 {
        self.config.color_conversion.index_mask()
    }

    /// Fill a one pixel wide or tall run in the current mode
    fn draw_run(&mut self, run: Rect) -> DisplayResult<B> {
        let mode = self.draw_mode;
        let mask = self.index_mask();
        let index = self.color_index;
        let mut writer = self.writer()?;
        if run.is_empty() {
            return Ok(());
        }
        let result = match mode {
            DrawMode::Xor => writer.xor_rect(run, mask),
            DrawMode::Normal | DrawMode::Transparent => writer.fill_run(run, index),
        };
        result.map_err(Error::Bus)
    }
}

impl<B, H> DeviceApi for Display<B, H>
where
    B: Bus,
    H: BringUp<B>,
{
    type Error = Error<B>;

    fn draw_bitmap(&mut self, x: u16, y: u16, bitmap: &Bitmap<'_>) -> DisplayResult<B> {
        let plan = bitmap.plan::<B>(self.draw_mode).inspect_err(|e| {
            warn!("bitmap rejected: {}", e);
        })?;
        let mask = self.index_mask();
        let mut writer = self.writer()?;
        bitmap::draw(&mut writer, x, y, bitmap, plan, mask).map_err(Error::Bus)
    }

    fn draw_hline(&mut self, x0: u16, y: u16, x1: u16) -> DisplayResult<B> {
        self.draw_run(Rect::new(x0, y, x1, y))
    }

    fn draw_vline(&mut self, x: u16, y0: u16, y1: u16) -> DisplayResult<B> {
        self.draw_run(Rect::new(x, y0, x, y1))
    }

    fn fill_rect(&mut self, rect: Rect) -> DisplayResult<B> {
        let mode = self.draw_mode;
        let mask = self.index_mask();
        let index = self.color_index;
        let mut writer = self.writer()?;
        if rect.is_empty() {
            return Ok(());
        }
        let result = match mode {
            DrawMode::Xor => writer.xor_rect(rect, mask),
            DrawMode::Normal | DrawMode::Transparent => writer.fill(rect, index),
        };
        result.map_err(Error::Bus)
    }

    fn pixel_index(&mut self, x: u16, y: u16) -> Result<u16, Error<B>> {
        self.writer()?.pixel_index(x, y).map_err(Error::Bus)
    }

    fn set_pixel_index(&mut self, x: u16, y: u16, index: u16) -> DisplayResult<B> {
        self.writer()?
            .set_pixel_index(x, y, index)
            .map_err(Error::Bus)
    }

    fn xor_pixel(&mut self, x: u16, y: u16) -> DisplayResult<B> {
        let mask = self.index_mask();
        self.writer()?.xor_pixel(x, y, mask).map_err(Error::Bus)
    }

    fn device_function(&self, id: DeviceFunctionId) -> Option<DeviceFunction<Self>> {
        Some(match id {
            DeviceFunctionId::Init => DeviceFunction::Init(Self::init),
            DeviceFunctionId::On => DeviceFunction::On(Self::on),
            DeviceFunctionId::Off => DeviceFunction::Off(Self::off),
            DeviceFunctionId::ReadRect => DeviceFunction::ReadRect(Self::read_rect),
        })
    }

    fn device_property(&self, property: DeviceProperty) -> u32 {
        let (width, height) = self.config.transform().logical_size();
        let conversion = self.config.color_conversion;
        match property {
            DeviceProperty::XSize | DeviceProperty::VirtualXSize => u32::from(width),
            DeviceProperty::YSize | DeviceProperty::VirtualYSize => u32::from(height),
            DeviceProperty::BitsPerPixel => u32::from(conversion.bits_per_pixel()),
            DeviceProperty::NumColors => conversion.num_colors(),
            DeviceProperty::XMag | DeviceProperty::YMag => 1,
            // The controller applies orientation itself
            DeviceProperty::MirrorX
            | DeviceProperty::MirrorY
            | DeviceProperty::SwapXY
            | DeviceProperty::SwapRB => 0,
        }
    }

    fn device_data(&self, id: DeviceData) -> Option<MemoryDevice> {
        match id {
            DeviceData::MemoryDevice => Some(MemoryDevice::BPP16),
        }
    }

    fn rect(&self) -> Rect {
        let (width, height) = self.config.transform().logical_size();
        Rect::new(0, 0, width.saturating_sub(1), height.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorConversion;
    use crate::config::{Builder, Dimensions, Rotation};
    use crate::mock::{BusCall, MockBus, MockError};
    use crate::register::ENTRY_MODE;

    fn config(rotation: Rotation) -> Config {
        Builder::new()
            .dimensions(Dimensions::PANEL_240X400)
            .rotation(rotation)
            .build()
            .unwrap()
    }

    fn active(rotation: Rotation, bus: MockBus) -> Display<MockBus> {
        let mut display = Display::new(config(rotation), NoBringUp);
        display.set_bus(bus);
        display.init().unwrap();
        display.bus_mut().unwrap().clear_log();
        display
    }

    fn bus(display: &Display<MockBus>) -> &MockBus {
        display.bus().unwrap()
    }

    fn assert_clip_restored(display: &Display<MockBus>) {
        let clip = display.hw_clip();
        let mock = bus(display);
        assert_eq!((mock.col_end(), mock.row_end()), (clip.x1, clip.y1));
    }

    #[derive(Default)]
    struct CountingBringUp {
        inits: u32,
        ons: u32,
        offs: u32,
    }

    impl BringUp<MockBus> for CountingBringUp {
        fn init_controller(&mut self, _bus: &mut MockBus) -> Result<(), MockError> {
            self.inits += 1;
            Ok(())
        }
        fn display_on(&mut self, _bus: &mut MockBus) -> Result<(), MockError> {
            self.ons += 1;
            Ok(())
        }
        fn display_off(&mut self, _bus: &mut MockBus) -> Result<(), MockError> {
            self.offs += 1;
            Ok(())
        }
    }

    #[test]
    fn test_lifecycle_transitions() {
        let mut display: Display<MockBus, CountingBringUp> =
            Display::new(config(Rotation::Rotate0), CountingBringUp::default());
        assert_eq!(display.state(), DriverState::Uninitialized);

        assert!(matches!(display.draw_hline(0, 0, 5), Err(Error::BusNotBound)));
        assert_eq!(display.state(), DriverState::ContextAllocated);

        display.set_bus(MockBus::new());
        assert_eq!(display.state(), DriverState::BusBound);
        assert!(matches!(display.fill_rect(Rect::new(0, 0, 1, 1)), Err(Error::NotInitialized)));
        assert!(matches!(display.on(), Err(Error::NotInitialized)));
        assert!(bus_calls(&display).is_empty());

        display.init().unwrap();
        assert_eq!(display.state(), DriverState::Active { display_on: false });
        display.on().unwrap();
        assert!(display.is_display_on());
        display.off().unwrap();
        assert!(!display.is_display_on());

        let (_, bring_up) = display.release();
        assert_eq!((bring_up.inits, bring_up.ons, bring_up.offs), (1, 1, 1));
    }

    fn bus_calls<H: BringUp<MockBus>>(display: &Display<MockBus, H>) -> &[BusCall] {
        &display.bus().unwrap().calls
    }

    #[test]
    fn test_init_programs_entry_mode_and_clip() {
        let mut display = Display::new(config(Rotation::Rotate270), NoBringUp);
        display.set_bus(MockBus::new());
        display.init().unwrap();

        let bus = bus(&display);
        assert_eq!(bus.register(ENTRY_MODE), 0xA0);
        assert_eq!((bus.col_start(), bus.row_start()), (32, 0));
        assert_eq!((bus.col_end(), bus.row_end()), (431, 239));
    }

    #[test]
    fn test_rebinding_bus_requires_init() {
        let mut display = active(Rotation::Rotate0, MockBus::new());
        let old = display.set_bus(MockBus::new());
        assert!(old.is_some());
        assert_eq!(display.state(), DriverState::BusBound);
        assert!(matches!(display.pixel_index(0, 0), Err(Error::NotInitialized)));
    }

    #[test]
    fn test_clip_restored_after_each_operation() {
        let mut display = active(Rotation::Rotate270, MockBus::new());
        display.set_color_index(0x07E0);

        display.fill_rect(Rect::new(10, 10, 20, 20)).unwrap();
        assert_clip_restored(&display);

        display.draw_hline(0, 5, 100).unwrap();
        assert_clip_restored(&display);

        display.draw_vline(3, 0, 50).unwrap();
        assert_clip_restored(&display);

        let data = [0xFF, 0x00];
        display
            .draw_bitmap(7, 8, &Bitmap::packed(16, 1, 1, 2, &data))
            .unwrap();
        assert_clip_restored(&display);

        let mut buffer = [0u16; 6];
        display.read_rect(Rect::new(1, 1, 3, 2), &mut buffer).unwrap();
        assert_clip_restored(&display);
    }

    #[test]
    fn test_short_runs_use_pixel_writes() {
        let mut display = active(Rotation::Rotate0, MockBus::new());
        display.set_color_index(0x1234);

        display.draw_hline(5, 7, 6).unwrap();
        let calls = bus_calls(&display);
        assert_eq!(calls.len(), 20);
        assert!(!calls.iter().any(|c| matches!(c, BusCall::RepeatingData(..))));
        assert_eq!(bus(&display).pixel(5, 7), 0x1234);
        assert_eq!(bus(&display).pixel(6, 7), 0x1234);
    }

    #[test]
    fn test_runs_of_three_use_block_write() {
        let mut display = active(Rotation::Rotate0, MockBus::new());
        display.set_color_index(0x1234);

        display.draw_hline(5, 7, 7).unwrap();
        let calls = bus_calls(&display);
        assert_eq!(calls.len(), 26);
        assert!(calls.contains(&BusCall::RepeatingData(0x1234, 3)));
        for x in 5..=7 {
            assert_eq!(bus(&display).pixel(x, 7), 0x1234);
        }
        assert_eq!(bus(&display).pixel(8, 7), 0);

        display.bus_mut().unwrap().clear_log();
        display.draw_vline(9, 0, 2).unwrap();
        assert_eq!(bus_calls(&display).len(), 26);
        assert_eq!(bus(&display).pixel(9, 2), 0x1234);
    }

    #[test]
    fn test_empty_ranges_are_no_ops() {
        let mut display = active(Rotation::Rotate0, MockBus::new());
        display.draw_hline(10, 0, 9).unwrap();
        display.draw_vline(0, 10, 9).unwrap();
        display.fill_rect(Rect::new(5, 5, 4, 5)).unwrap();
        assert!(bus_calls(&display).is_empty());
    }

    #[test]
    fn test_fill_rect_lands_at_offset() {
        let mut display = active(Rotation::Rotate270, MockBus::new());
        display.set_color_index(0xF800);
        display.fill_rect(Rect::new(0, 0, 3, 1)).unwrap();

        let bus = bus(&display);
        assert!(bus.calls.contains(&BusCall::RepeatingData(0xF800, 8)));
        assert_eq!(bus.pixel(32, 0), 0xF800);
        assert_eq!(bus.pixel(35, 1), 0xF800);
        assert_eq!(bus.pixel(31, 0), 0);
        assert_eq!(bus.pixel(36, 1), 0);
    }

    #[test]
    fn test_pixel_access_through_transform() {
        let mut mock = MockBus::new();
        mock.set_pixel(32, 0, 0xBEEF);
        let mut display = active(Rotation::Rotate270, mock);

        assert_eq!(display.pixel_index(0, 0).unwrap(), 0xBEEF);

        display.set_pixel_index(399, 239, 0x0F0F).unwrap();
        assert_eq!(bus(&display).pixel(431, 239), 0x0F0F);
    }

    #[test]
    fn test_1bpp_opaque_with_diff() {
        let mut display = active(Rotation::Rotate0, MockBus::new());
        let data = [0b0001_0110];
        let palette = [0x0101, 0xF0F0];
        let bitmap = Bitmap::packed(5, 1, 1, 1, &data)
            .with_diff(3)
            .with_palette(&palette);

        display.draw_bitmap(10, 20, &bitmap).unwrap();

        let bus = bus(&display);
        let row: alloc::vec::Vec<u16> = (13..18).map(|x| bus.pixel(x, 20)).collect();
        assert_eq!(row, [0xF0F0, 0x0101, 0xF0F0, 0xF0F0, 0x0101]);
        assert_eq!(bus.pixel(12, 20), 0);
        assert_eq!(bus.pixel(18, 20), 0);
    }

    #[test]
    fn test_2bpp_opaque_with_diff() {
        let mut display = active(Rotation::Rotate0, MockBus::new());
        let data = [0b00_01_10_11, 0b01_10_00_00];
        let palette = [0x0000, 0xF800, 0x07E0, 0x001F];
        let bitmap = Bitmap::packed(5, 1, 2, 2, &data)
            .with_diff(1)
            .with_palette(&palette);

        display.draw_bitmap(0, 0, &bitmap).unwrap();

        let bus = bus(&display);
        let row: alloc::vec::Vec<u16> = (1..6).map(|x| bus.pixel(x, 0)).collect();
        assert_eq!(row, [0xF800, 0x07E0, 0x001F, 0xF800, 0x07E0]);
    }

    #[test]
    fn test_4bpp_opaque_two_rows_without_palette() {
        let mut display = active(Rotation::Rotate0, MockBus::new());
        let data = [0x12, 0x34, 0x56, 0x78];
        let bitmap = Bitmap::packed(3, 2, 4, 2, &data).with_diff(1);

        display.draw_bitmap(4, 4, &bitmap).unwrap();

        let bus = bus(&display);
        assert_eq!([bus.pixel(5, 4), bus.pixel(6, 4), bus.pixel(7, 4)], [2, 3, 4]);
        assert_eq!([bus.pixel(5, 5), bus.pixel(6, 5), bus.pixel(7, 5)], [6, 7, 8]);
    }

    #[test]
    fn test_8bpp_opaque_with_stride() {
        let mut display = active(Rotation::Rotate0, MockBus::new());
        let data = [1, 2, 3, 9, 4, 5, 6, 9];
        let palette = [0, 10, 20, 30, 40, 50, 60, 70];
        let bitmap = Bitmap::packed(3, 2, 8, 4, &data).with_palette(&palette);

        display.draw_bitmap(0, 0, &bitmap).unwrap();

        let bus = bus(&display);
        assert_eq!([bus.pixel(0, 0), bus.pixel(1, 0), bus.pixel(2, 0)], [10, 20, 30]);
        assert_eq!([bus.pixel(0, 1), bus.pixel(1, 1), bus.pixel(2, 1)], [40, 50, 60]);
        assert_eq!(bus.pixel(3, 0), 0);
    }

    #[test]
    fn test_16bpp_rows_follow_byte_stride() {
        let mut display = active(Rotation::Rotate0, MockBus::new());
        let words = [1, 2, 99, 3, 4, 99];
        display.set_draw_mode(DrawMode::Xor);

        display
            .draw_bitmap(20, 30, &Bitmap::rgb565(2, 2, 6, &words))
            .unwrap();

        let bus = bus(&display);
        assert_eq!([bus.pixel(20, 30), bus.pixel(21, 30)], [1, 2]);
        assert_eq!([bus.pixel(20, 31), bus.pixel(21, 31)], [3, 4]);
        let rows = bus
            .calls
            .iter()
            .filter(|c| **c == BusCall::MultipleData(2))
            .count();
        assert_eq!(rows, 2);
    }

    #[test]
    fn test_transparent_writes_only_set_samples() {
        let mut display = active(Rotation::Rotate0, MockBus::with_fill(0xAAAA));
        display.set_draw_mode(DrawMode::Transparent);
        let data = [0x10, 0, 0, 0, 0, 0, 0, 0x03];
        let bitmap = Bitmap::packed(16, 1, 4, 8, &data);

        display.draw_bitmap(0, 0, &bitmap).unwrap();

        let bus = bus(&display);
        assert_eq!(bus.calls.len(), 20);
        assert_eq!(bus.pixel(0, 0), 1);
        assert_eq!(bus.pixel(15, 0), 3);
        assert!((1..15).all(|x| bus.pixel(x, 0) == 0xAAAA));
    }

    #[test]
    fn test_1bpp_transparent_writes_foreground_only() {
        let mut display = active(Rotation::Rotate0, MockBus::with_fill(0xAAAA));
        display.set_draw_mode(DrawMode::Transparent);
        let palette = [0x1111, 0x2222];
        let data = [0b1010_0000];
        let bitmap = Bitmap::packed(4, 1, 1, 1, &data).with_palette(&palette);

        display.draw_bitmap(0, 0, &bitmap).unwrap();

        let bus = bus(&display);
        assert_eq!(
            [bus.pixel(0, 0), bus.pixel(1, 0), bus.pixel(2, 0), bus.pixel(3, 0)],
            [0x2222, 0xAAAA, 0x2222, 0xAAAA]
        );
    }

    #[test]
    fn test_1bpp_xor_is_an_involution() {
        let mut display = active(Rotation::Rotate0, MockBus::with_fill(0x1234));
        display.set_draw_mode(DrawMode::Xor);
        let data = [0b1100_0011];
        let bitmap = Bitmap::packed(8, 1, 1, 1, &data);

        display.draw_bitmap(0, 0, &bitmap).unwrap();
        assert_eq!(bus(&display).pixel(0, 0), 0xEDCB);
        assert_eq!(bus(&display).pixel(2, 0), 0x1234);
        assert_eq!(bus(&display).pixel(7, 0), 0xEDCB);

        display.draw_bitmap(0, 0, &bitmap).unwrap();
        assert!((0..8).all(|x| bus(&display).pixel(x, 0) == 0x1234));
    }

    #[test]
    fn test_xor_fill_and_lines_complement_pixels() {
        let mut display = active(Rotation::Rotate0, MockBus::with_fill(0x00FF));
        display.set_draw_mode(DrawMode::Xor);

        display.fill_rect(Rect::new(0, 0, 1, 1)).unwrap();
        assert_eq!(bus(&display).pixel(1, 1), 0xFF00);
        assert!(
            !bus_calls(&display)
                .iter()
                .any(|c| matches!(c, BusCall::RepeatingData(..)))
        );

        display.draw_hline(0, 1, 3).unwrap();
        assert_eq!(bus(&display).pixel(1, 1), 0x00FF);
        assert_eq!(bus(&display).pixel(3, 1), 0xFF00);

        display.xor_pixel(3, 1).unwrap();
        assert_eq!(bus(&display).pixel(3, 1), 0x00FF);
    }

    #[test]
    fn test_xor_rejected_above_1bpp_without_traffic() {
        let mut display = active(Rotation::Rotate0, MockBus::new());
        display.set_draw_mode(DrawMode::Xor);
        let data = [0xFF; 4];

        let result = display.draw_bitmap(0, 0, &Bitmap::packed(2, 1, 4, 1, &data));
        assert!(matches!(
            result,
            Err(Error::UnsupportedDrawMode {
                bits_per_pixel: 4,
                mode: DrawMode::Xor
            })
        ));
        assert!(bus_calls(&display).is_empty());
    }

    #[test]
    fn test_device_properties() {
        let display: Display<MockBus> = Display::new(config(Rotation::Rotate270), NoBringUp);
        assert_eq!(display.device_property(DeviceProperty::XSize), 400);
        assert_eq!(display.device_property(DeviceProperty::YSize), 240);
        assert_eq!(display.device_property(DeviceProperty::VirtualXSize), 400);
        assert_eq!(display.device_property(DeviceProperty::VirtualYSize), 240);
        assert_eq!(display.device_property(DeviceProperty::BitsPerPixel), 16);
        assert_eq!(display.device_property(DeviceProperty::NumColors), 65_536);
        assert_eq!(display.device_property(DeviceProperty::XMag), 1);
        assert_eq!(display.device_property(DeviceProperty::YMag), 1);
        assert_eq!(display.device_property(DeviceProperty::MirrorX), 0);
        assert_eq!(display.device_property(DeviceProperty::SwapXY), 0);
        assert_eq!(display.rect(), Rect::new(0, 0, 399, 239));
        assert_eq!(
            display.device_data(DeviceData::MemoryDevice),
            Some(MemoryDevice::BPP16)
        );
    }

    #[test]
    fn test_bit_depth_follows_color_conversion() {
        let config = Builder::new()
            .dimensions(Dimensions::PANEL_240X400)
            .color_conversion(ColorConversion::new(0x00FF))
            .build()
            .unwrap();
        let display: Display<MockBus> = Display::new(config, NoBringUp);
        assert_eq!(display.device_property(DeviceProperty::BitsPerPixel), 8);
        assert_eq!(display.device_property(DeviceProperty::NumColors), 256);
    }

    #[test]
    fn test_device_functions_drive_lifecycle() {
        let mut display = Display::new(config(Rotation::Rotate0), NoBringUp);
        display.set_bus(MockBus::new());

        if let Some(DeviceFunction::Init(init)) = display.device_function(DeviceFunctionId::Init) {
            init(&mut display).unwrap();
        }
        assert_eq!(display.state(), DriverState::Active { display_on: false });

        if let Some(DeviceFunction::On(on)) = display.device_function(DeviceFunctionId::On) {
            on(&mut display).unwrap();
        }
        assert!(display.is_display_on());

        assert!(matches!(
            display.device_function(DeviceFunctionId::ReadRect),
            Some(DeviceFunction::ReadRect(_))
        ));
        display.set_origin(10, 10);
    }

    #[test]
    fn test_read_rect_decodes_pixels() {
        let mut mock = MockBus::new();
        let pixels = [0xF800, 0x07E0, 0x001F, 0xFFFF, 0x8410, 0x1234];
        for (i, pixel) in pixels.iter().enumerate() {
            mock.set_pixel(4 + (i % 3) as u16, 5 + (i / 3) as u16, *pixel);
        }
        let mut display = active(Rotation::Rotate0, mock);

        let mut buffer = [0u16; 3];
        display.read_rect(Rect::new(4, 5, 6, 5), &mut buffer).unwrap();
        assert_eq!(buffer, pixels[..3]);
        assert_eq!(
            bus_calls(&display)
                .iter()
                .filter(|c| matches!(c, BusCall::ReadData | BusCall::ReadMultipleData(_)))
                .copied()
                .collect::<alloc::vec::Vec<_>>(),
            [
                BusCall::ReadData,
                BusCall::ReadMultipleData(3),
                BusCall::ReadMultipleData(2)
            ]
        );

        let mut buffer = [0u16; 6];
        display.read_rect(Rect::new(4, 5, 6, 6), &mut buffer).unwrap();
        assert_eq!(buffer, pixels);
    }

    #[test]
    fn test_read_rect_checks_buffer() {
        let mut display = active(Rotation::Rotate0, MockBus::new());
        let mut buffer = [0u16; 2];
        assert!(matches!(
            display.read_rect(Rect::new(0, 0, 2, 0), &mut buffer),
            Err(Error::BufferTooSmall {
                required: 3,
                provided: 2
            })
        ));
        assert!(bus_calls(&display).is_empty());
    }

    #[test]
    fn test_read_register_returns_status() {
        let mut mock = MockBus::new();
        mock.status = 0x52;
        let mut display: Display<MockBus> = Display::new(config(Rotation::Rotate0), NoBringUp);
        assert!(matches!(display.read_register(), Err(Error::BusNotBound)));
        display.set_bus(mock);
        assert_eq!(display.read_register().unwrap(), 0x52);
    }

    #[test]
    fn test_bus_error_propagates() {
        let mut display = active(Rotation::Rotate0, MockBus::new());
        display.bus_mut().unwrap().fail_at = Some(3);
        assert!(matches!(
            display.fill_rect(Rect::new(0, 0, 9, 9)),
            Err(Error::Bus(MockError))
        ));
        assert_eq!(bus_calls(&display).len(), 3);
    }

    #[test]
    fn test_clip_restored_after_failed_transfer() {
        let mut display = active(Rotation::Rotate270, MockBus::new());
        display.set_color_index(0x07E0);

        // 16 window writes and the GRAM select succeed, the block write fails
        let mock = display.bus_mut().unwrap();
        mock.fail_at = Some(17);
        mock.fail_once = true;
        assert!(matches!(
            display.fill_rect(Rect::new(10, 10, 20, 20)),
            Err(Error::Bus(MockError))
        ));
        assert_clip_restored(&display);

        let data = [0xFF, 0xFF];
        let mock = display.bus_mut().unwrap();
        mock.clear_log();
        mock.fail_at = Some(20);
        mock.fail_once = true;
        assert!(matches!(
            display.draw_bitmap(0, 0, &Bitmap::packed(16, 1, 1, 2, &data)),
            Err(Error::Bus(MockError))
        ));
        assert_clip_restored(&display);

        let mut buffer = [0u16; 2];
        let mock = display.bus_mut().unwrap();
        mock.clear_log();
        mock.fail_at = Some(18);
        mock.fail_once = true;
        assert!(matches!(
            display.read_rect(Rect::new(0, 0, 1, 0), &mut buffer),
            Err(Error::Bus(MockError))
        ));
        assert_clip_restored(&display);

        // Per-pixel writes only move the cursor and rely on the full clip
        display.set_pixel_index(399, 239, 0x001F).unwrap();
        assert_eq!(bus(&display).pixel(431, 239), 0x001F);
    }

    #[test]
    fn test_xor_pixel_twice_restores_value() {
        let mut display = active(Rotation::Rotate90, MockBus::with_fill(0x5A3C));

        display.xor_pixel(17, 42).unwrap();
        assert_ne!(display.pixel_index(17, 42).unwrap(), 0x5A3C);
        display.xor_pixel(17, 42).unwrap();
        assert_eq!(display.pixel_index(17, 42).unwrap(), 0x5A3C);
    }
}
