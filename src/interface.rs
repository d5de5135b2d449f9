//! Hardware bus abstraction
//!
//! This module provides the [`Bus`] trait, the seven register-level primitives
//! the driver needs, and [`SpiInterface`], an implementation over an
//! `embedded-hal` SPI device plus a register-select pin.
//!
//! ## Hardware Requirements
//!
//! [`SpiInterface`] requires:
//! - SPI bus (MOSI, MISO for read-back, SCK)
//! - 1 GPIO pin:
//!   - **RS** (D/C): register select (output, low = register, high = data)
//!
//! Parallel (8080) wiring is supported by implementing [`Bus`] directly on a
//! type that drives the data port.
//!
//! ## Example
//!
//! ```rust,no_run
//! use hx8352c::{Bus, SpiInterface, register};
//! # use core::convert::Infallible;
//! # use embedded_hal::digital::OutputPin;
//! # use embedded_hal::spi::{Operation, SpiDevice};
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
//! // Create interface with SPI and the register-select pin
//! let mut bus = SpiInterface::new(MockSpi, MockPin);
//!
//! // Write a register
//! let _ = bus.write_register(register::DISPLAY_CONTROL_3);
//! let _ = bus.write_data(register::DISPLAY_ON);
//!
//! // Stream pixels
//! let _ = bus.write_register(register::GRAM_ACCESS);
//! let _ = bus.write_repeating_data(0xF800, 16);
//! ```

use core::fmt::Debug;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiDevice;

type BusResult<T, E> = core::result::Result<T, E>;

/// Register-level access to the HX8352C
///
/// All calls are blocking and ordered; the driver relies on strict program
/// order being preserved by the implementation.
///
/// ## Implementing
///
/// Only [`write_register`](Bus::write_register), [`write_data`](Bus::write_data),
/// [`read_register`](Bus::read_register) and [`read_data`](Bus::read_data) are
/// required. The block primitives default to loops over the single-word ones;
/// override them when the hardware can stream faster (DMA, FSMC, etc.).
pub trait Bus {
    /// Error type for bus operations
    ///
    /// Must implement [`Debug`] for error reporting.
    type Error: Debug;

    /// Write a register index (RS low)
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying transport fails.
    fn write_register(&mut self, register: u16) -> BusResult<(), Self::Error>;

    /// Write one data word (RS high)
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying transport fails.
    fn write_data(&mut self, data: u16) -> BusResult<(), Self::Error>;

    /// Write a block of data words
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying transport fails.
    fn write_multiple_data(&mut self, data: &[u16]) -> BusResult<(), Self::Error> {
        data.iter().try_for_each(|word| self.write_data(*word))
    }

    /// Write the same data word `count` times
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying transport fails.
    fn write_repeating_data(&mut self, data: u16, count: u32) -> BusResult<(), Self::Error> {
        (0..count).try_for_each(|_| self.write_data(data))
    }

    /// Read the status/index register (RS low)
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying transport fails.
    fn read_register(&mut self) -> BusResult<u16, Self::Error>;

    /// Read one data word (RS high)
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying transport fails.
    fn read_data(&mut self) -> BusResult<u16, Self::Error>;

    /// Fill `buffer` with consecutive data words
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying transport fails.
    fn read_multiple_data(&mut self, buffer: &mut [u16]) -> BusResult<(), Self::Error> {
        for word in buffer.iter_mut() {
            *word = self.read_data()?;
        }
        Ok(())
    }
}

/// Errors that can occur at the interface level
///
/// Generic over SPI and GPIO error types.
#[derive(Debug)]
pub enum InterfaceError<SpiErr, PinErr> {
    /// SPI communication error
    Spi(SpiErr),
    /// GPIO pin error
    Pin(PinErr),
}

impl<SpiErr: Debug, PinErr: Debug> core::fmt::Display for InterfaceError<SpiErr, PinErr> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Spi(e) => write!(f, "SPI error: {e:?}"),
            Self::Pin(e) => write!(f, "Pin error: {e:?}"),
        }
    }
}

impl<SpiErr: Debug, PinErr: Debug> core::error::Error for InterfaceError<SpiErr, PinErr> {}

/// Number of words buffered per SPI transfer by the block primitives
const CHUNK_WORDS: usize = 32;

/// Serial bus implementation for the HX8352C
///
/// Implements [`Bus`] for an embedded-hal v1.0 [`SpiDevice`] and a register
/// select pin. Words are shifted out MSB first.
///
/// ## Type Parameters
///
/// * `SPI` - SPI device implementing [`SpiDevice`]
/// * `RS` - Register select pin implementing [`OutputPin`]
pub struct SpiInterface<SPI, RS> {
    /// SPI device for communication
    spi: SPI,
    /// Register select pin (low=register, high=data)
    rs: RS,
}

impl<SPI, RS> SpiInterface<SPI, RS>
where
    SPI: SpiDevice,
    RS: OutputPin,
{
    /// Create a new SpiInterface
    ///
    /// # Arguments
    ///
    /// * `spi` - SPI device (must implement [`SpiDevice`])
    /// * `rs` - Register select pin (output, low=register, high=data)
    pub fn new(spi: SPI, rs: RS) -> Self {
        Self { spi, rs }
    }

    /// Release the SPI device and pin
    pub fn release(self) -> (SPI, RS) {
        (self.spi, self.rs)
    }

    fn select_data(&mut self) -> BusResult<(), InterfaceError<SPI::Error, RS::Error>> {
        self.rs.set_high().map_err(|e| InterfaceError::Pin(e))
    }

    fn write_words<I>(&mut self, words: I) -> BusResult<(), InterfaceError<SPI::Error, RS::Error>>
    where
        I: IntoIterator<Item = u16>,
    {
        let mut chunk = [0u8; CHUNK_WORDS * 2];
        let mut len = 0;
        for word in words {
            chunk[len..len + 2].copy_from_slice(&word.to_be_bytes());
            len += 2;
            if len == chunk.len() {
                self.spi
                    .write(&chunk)
                    .map_err(|e| InterfaceError::Spi(e))?;
                len = 0;
            }
        }
        if len > 0 {
            self.spi
                .write(&chunk[..len])
                .map_err(|e| InterfaceError::Spi(e))?;
        }
        Ok(())
    }

    fn read_word(&mut self) -> BusResult<u16, InterfaceError<SPI::Error, RS::Error>> {
        let mut bytes = [0u8; 2];
        self.spi
            .read(&mut bytes)
            .map_err(|e| InterfaceError::Spi(e))?;
        Ok(u16::from_be_bytes(bytes))
    }
}

impl<SPI, RS> Bus for SpiInterface<SPI, RS>
where
    SPI: SpiDevice,
    SPI::Error: Debug,
    RS: OutputPin,
    RS::Error: Debug,
{
    type Error = InterfaceError<SPI::Error, RS::Error>;

    fn write_register(&mut self, register: u16) -> BusResult<(), Self::Error> {
        self.rs.set_low().map_err(|e| InterfaceError::Pin(e))?;
        self.spi
            .write(&register.to_be_bytes())
            .map_err(|e| InterfaceError::Spi(e))?;
        Ok(())
    }

    fn write_data(&mut self, data: u16) -> BusResult<(), Self::Error> {
        self.select_data()?;
        self.spi
            .write(&data.to_be_bytes())
            .map_err(|e| InterfaceError::Spi(e))?;
        Ok(())
    }

    fn write_multiple_data(&mut self, data: &[u16]) -> BusResult<(), Self::Error> {
        self.select_data()?;
        self.write_words(data.iter().copied())
    }

    fn write_repeating_data(&mut self, data: u16, count: u32) -> BusResult<(), Self::Error> {
        self.select_data()?;
        self.write_words((0..count).map(|_| data))
    }

    fn read_register(&mut self) -> BusResult<u16, Self::Error> {
        self.rs.set_low().map_err(|e| InterfaceError::Pin(e))?;
        self.read_word()
    }

    fn read_data(&mut self) -> BusResult<u16, Self::Error> {
        self.select_data()?;
        self.read_word()
    }

    fn read_multiple_data(&mut self, buffer: &mut [u16]) -> BusResult<(), Self::Error> {
        self.select_data()?;
        for word in buffer.iter_mut() {
            *word = self.read_word()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec::Vec;
    use embedded_hal::spi::Operation;

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Line {
        Low,
        High,
    }

    #[derive(Debug, Default)]
    struct Trace {
        /// (RS level at transfer time, bytes written)
        writes: Vec<(Line, Vec<u8>)>,
        reads: usize,
    }

    struct MockSpi<'a> {
        trace: &'a core::cell::RefCell<Trace>,
        rs: &'a core::cell::Cell<Line>,
        read_bytes: [u8; 2],
    }

    struct MockPin<'a> {
        rs: &'a core::cell::Cell<Line>,
    }

    impl embedded_hal::spi::ErrorType for MockSpi<'_> {
        type Error = core::convert::Infallible;
    }

    impl SpiDevice for MockSpi<'_> {
        fn transaction(
            &mut self,
            operations: &mut [Operation<'_, u8>],
        ) -> Result<(), Self::Error> {
            for op in operations {
                match op {
                    Operation::Write(bytes) => self
                        .trace
                        .borrow_mut()
                        .writes
                        .push((self.rs.get(), bytes.to_vec())),
                    Operation::Read(buf) => {
                        buf.copy_from_slice(&self.read_bytes[..buf.len()]);
                        self.trace.borrow_mut().reads += 1;
                    }
                    _ => {}
                }
            }
            Ok(())
        }
    }

    impl embedded_hal::digital::ErrorType for MockPin<'_> {
        type Error = core::convert::Infallible;
    }

    impl OutputPin for MockPin<'_> {
        fn set_low(&mut self) -> Result<(), Self::Error> {
            self.rs.set(Line::Low);
            Ok(())
        }
        fn set_high(&mut self) -> Result<(), Self::Error> {
            self.rs.set(Line::High);
            Ok(())
        }
    }

    #[test]
    fn test_register_and_data_use_rs_level() {
        let trace = core::cell::RefCell::new(Trace::default());
        let rs = core::cell::Cell::new(Line::High);
        let spi = MockSpi {
            trace: &trace,
            rs: &rs,
            read_bytes: [0, 0],
        };
        let mut bus = SpiInterface::new(spi, MockPin { rs: &rs });

        bus.write_register(0x0022).unwrap();
        bus.write_data(0xF81F).unwrap();

        let trace = trace.borrow();
        assert_eq!(trace.writes[0], (Line::Low, alloc::vec![0x00, 0x22]));
        assert_eq!(trace.writes[1], (Line::High, alloc::vec![0xF8, 0x1F]));
    }

    #[test]
    fn test_repeating_data_is_chunked() {
        let trace = core::cell::RefCell::new(Trace::default());
        let rs = core::cell::Cell::new(Line::Low);
        let spi = MockSpi {
            trace: &trace,
            rs: &rs,
            read_bytes: [0, 0],
        };
        let mut bus = SpiInterface::new(spi, MockPin { rs: &rs });

        bus.write_repeating_data(0x1234, 40).unwrap();

        let trace = trace.borrow();
        assert_eq!(trace.writes.len(), 2);
        assert_eq!(trace.writes[0].1.len(), CHUNK_WORDS * 2);
        assert_eq!(trace.writes[1].1.len(), (40 - CHUNK_WORDS) * 2);
        assert!(trace.writes.iter().all(|(line, _)| *line == Line::High));
        assert_eq!(&trace.writes[1].1[..2], &[0x12, 0x34]);
    }

    #[test]
    fn test_read_multiple_data_reads_words_msb_first() {
        let trace = core::cell::RefCell::new(Trace::default());
        let rs = core::cell::Cell::new(Line::Low);
        let spi = MockSpi {
            trace: &trace,
            rs: &rs,
            read_bytes: [0xAB, 0xCD],
        };
        let mut bus = SpiInterface::new(spi, MockPin { rs: &rs });

        let mut words = [0u16; 3];
        bus.read_multiple_data(&mut words).unwrap();

        assert_eq!(words, [0xABCD; 3]);
        assert_eq!(trace.borrow().reads, 3);
        assert_eq!(rs.get(), Line::High);
    }

    #[test]
    fn test_interface_error_display() {
        let err: InterfaceError<u8, u8> = InterfaceError::Spi(3);
        let mut text = alloc::string::String::new();
        core::fmt::write(&mut text, format_args!("{err}")).unwrap();
        assert_eq!(text, "SPI error: 3");
    }
}
