//! Controller bring-up
//!
//! Power sequencing, gamma and display on/off are panel specific and live
//! behind the [`BringUp`] trait. The driver calls it from
//! [`Display::init`](crate::Display::init), [`Display::on`](crate::Display::on)
//! and [`Display::off`](crate::Display::off), then takes care of the entry
//! mode and window registers itself.
//!
//! [`Hx8352cBringUp`] implements the reference sequence for a 240x400 panel:
//!
//! 1. Reset pulse (RST low 1ms, high, wait 120ms)
//! 2. Power voltage and VCOM setup
//! 3. Oscillator start and step-wise power on
//! 4. 16 bpp pixel format and panel characteristics
//! 5. Gamma table

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::interface::Bus;
use crate::register::{
    DISPLAY_CONTROL_3, DISPLAY_GATE_ON, DISPLAY_OFF, DISPLAY_ON, GAMMA_BASE, OPERATION_MODE,
    OSC_CONTROL_1, OSC_CONTROL_2, PANEL_CHARACTERISTIC, PIXEL_FORMAT, PIXEL_FORMAT_16BPP,
    POWER_CONTROL_1, POWER_CONTROL_2, POWER_CONTROL_3, POWER_CONTROL_6, SOURCE_GATE_TIMING,
    VCOM_CONTROL_1, VCOM_CONTROL_2, VCOM_CONTROL_3,
};

/// Controller-specific power and output control
pub trait BringUp<B: Bus> {
    /// Bring the controller from reset to a state ready for GRAM writes
    ///
    /// # Errors
    ///
    /// Returns the bus error if a register write fails.
    fn init_controller(&mut self, bus: &mut B) -> Result<(), B::Error>;

    /// Enable display output
    ///
    /// # Errors
    ///
    /// Returns the bus error if a register write fails.
    fn display_on(&mut self, bus: &mut B) -> Result<(), B::Error>;

    /// Disable display output
    ///
    /// # Errors
    ///
    /// Returns the bus error if a register write fails.
    fn display_off(&mut self, bus: &mut B) -> Result<(), B::Error>;
}

/// Bring-up for controllers configured elsewhere (bootloader, previous stage)
///
/// Every step is a no-op.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoBringUp;

impl<B: Bus> BringUp<B> for NoBringUp {
    fn init_controller(&mut self, _bus: &mut B) -> Result<(), B::Error> {
        Ok(())
    }

    fn display_on(&mut self, _bus: &mut B) -> Result<(), B::Error> {
        Ok(())
    }

    fn display_off(&mut self, _bus: &mut B) -> Result<(), B::Error> {
        Ok(())
    }
}

/// Gamma 2.2 table for registers 0x40 through 0x4E
pub const GAMMA_2_2: [u16; 15] = [
    0x00, 0x45, 0x45, 0x04, 0x00, 0x08, 0x23, 0x23, 0x77, 0x40, 0x04, 0x00, 0x88, 0x88, 0x88,
];

/// (register, value, delay after write in ms)
const POWER_SEQUENCE: [(u16, u16, u32); 16] = [
    // BT=100: VGH = VCI + 2DDVDH, VGL = -2DDVDH
    (POWER_CONTROL_1, 0x04, 0),
    // VREG1 = 4.75V
    (POWER_CONTROL_2, 0x8C, 0),
    // VCOMH from 0x24/0x25
    (VCOM_CONTROL_1, 0x00, 0),
    (VCOM_CONTROL_2, 0x40, 0),
    (VCOM_CONTROL_3, 0x0F, 0),
    // Gate non-overlap of 6 clocks
    (SOURCE_GATE_TIMING, 0x06, 20),
    // 60Hz frame rate, start oscillator
    (OSC_CONTROL_1, 0x07, 0),
    (OSC_CONTROL_2, 0x01, 0),
    (POWER_CONTROL_3, 0x06, 0),
    // Leave deep standby
    (OPERATION_MODE, 0x00, 0),
    // STB=0, DK=0, PON=1, VCOMG=1
    (POWER_CONTROL_6, 0x88, 5),
    (POWER_CONTROL_6, 0x80, 5),
    (POWER_CONTROL_6, 0x90, 5),
    (POWER_CONTROL_6, 0xD0, 5),
    (PIXEL_FORMAT, PIXEL_FORMAT_16BPP, 0),
    (PANEL_CHARACTERISTIC, 0x11, 0),
];

/// Delay between the two display control writes of on/off
const DISPLAY_SWITCH_DELAY_MS: u32 = 40;

/// Reference HX8352C bring-up using a reset pin and a delay provider
///
/// ## Example
///
/// ```rust,no_run
/// use hx8352c::{Builder, Dimensions, Display, Hx8352cBringUp};
/// # use core::convert::Infallible;
/// # use embedded_hal::delay::DelayNs;
/// # use embedded_hal::digital::OutputPin;
/// # struct MockPin;
/// # impl embedded_hal::digital::ErrorType for MockPin { type Error = Infallible; }
/// # impl OutputPin for MockPin {
/// #     fn set_low(&mut self) -> Result<(), Self::Error> { Ok(()) }
/// #     fn set_high(&mut self) -> Result<(), Self::Error> { Ok(()) }
/// # }
/// # struct MockDelay;
/// # impl DelayNs for MockDelay { fn delay_ns(&mut self, _ns: u32) {} }
/// # struct MockBus;
/// # impl hx8352c::Bus for MockBus {
/// #     type Error = Infallible;
/// #     fn write_register(&mut self, _r: u16) -> Result<(), Infallible> { Ok(()) }
/// #     fn write_data(&mut self, _d: u16) -> Result<(), Infallible> { Ok(()) }
/// #     fn read_register(&mut self) -> Result<u16, Infallible> { Ok(0) }
/// #     fn read_data(&mut self) -> Result<u16, Infallible> { Ok(0) }
/// # }
/// # let config = match Builder::new().dimensions(Dimensions::PANEL_240X400).build() {
/// #     Ok(config) => config,
/// #     Err(_) => return,
/// # };
/// let bring_up = Hx8352cBringUp::new(MockPin, MockDelay);
/// let mut display: Display<MockBus, _> = Display::new(config, bring_up);
/// display.set_bus(MockBus);
/// let _ = display.init();
/// let _ = display.on();
/// ```
pub struct Hx8352cBringUp<RST, D> {
    /// Reset pin (active low)
    rst: RST,
    /// Delay provider
    delay: D,
    /// Gamma registers 0x40..=0x4E
    gamma: [u16; 15],
}

impl<RST, D> Hx8352cBringUp<RST, D>
where
    RST: OutputPin,
    D: DelayNs,
{
    /// Create the bring-up with the gamma 2.2 table
    pub fn new(rst: RST, delay: D) -> Self {
        Self {
            rst,
            delay,
            gamma: GAMMA_2_2,
        }
    }

    /// Replace the gamma table
    pub fn with_gamma(mut self, gamma: [u16; 15]) -> Self {
        self.gamma = gamma;
        self
    }

    /// Pulse the reset line
    pub fn reset(&mut self) {
        // Reset sequence: LOW -> wait 1ms -> HIGH -> wait 120ms
        let _ = self.rst.set_low();
        self.delay.delay_ms(1);
        let _ = self.rst.set_high();
        self.delay.delay_ms(120);
    }

    /// Release the reset pin and delay provider
    pub fn release(self) -> (RST, D) {
        (self.rst, self.delay)
    }

    fn write<B: Bus>(bus: &mut B, register: u16, value: u16) -> Result<(), B::Error> {
        bus.write_register(register)?;
        bus.write_data(value)
    }

    fn switch_display<B: Bus>(&mut self, bus: &mut B, value: u16) -> Result<(), B::Error> {
        Self::write(bus, DISPLAY_CONTROL_3, DISPLAY_GATE_ON)?;
        self.delay.delay_ms(DISPLAY_SWITCH_DELAY_MS);
        Self::write(bus, DISPLAY_CONTROL_3, value)
    }
}

impl<B, RST, D> BringUp<B> for Hx8352cBringUp<RST, D>
where
    B: Bus,
    RST: OutputPin,
    D: DelayNs,
{
    fn init_controller(&mut self, bus: &mut B) -> Result<(), B::Error> {
        self.reset();

        for (register, value, delay_ms) in POWER_SEQUENCE {
            Self::write(bus, register, value)?;
            if delay_ms > 0 {
                self.delay.delay_ms(delay_ms);
            }
        }

        for (register, value) in (GAMMA_BASE..).zip(self.gamma) {
            Self::write(bus, register, value)?;
        }
        Ok(())
    }

    fn display_on(&mut self, bus: &mut B) -> Result<(), B::Error> {
        self.switch_display(bus, DISPLAY_ON)
    }

    fn display_off(&mut self, bus: &mut B) -> Result<(), B::Error> {
        self.switch_display(bus, DISPLAY_OFF)
    }
}
