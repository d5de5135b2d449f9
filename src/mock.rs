//! Recording bus with a simulated GRAM for unit tests

use alloc::collections::VecDeque;
use alloc::vec;
use alloc::vec::Vec;

use crate::color::gram_read_bytes;
use crate::interface::Bus;
use crate::register::{
    COLUMN_END_HIGH, COLUMN_END_LOW, COLUMN_START_HIGH, COLUMN_START_LOW, GRAM_ACCESS,
    ROW_END_HIGH, ROW_END_LOW, ROW_START_HIGH, ROW_START_LOW,
};

/// Side of the square GRAM model; covers both address space orientations
const GRAM_SIDE: usize = 432;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct MockError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum BusCall {
    Register(u16),
    Data(u16),
    MultipleData(usize),
    RepeatingData(u16, u32),
    ReadRegister,
    ReadData,
    ReadMultipleData(usize),
}

/// Bus that logs every primitive and models the controller's window logic
///
/// GRAM is addressed by raw window coordinates. Selecting GRAM moves the
/// address to (column start, row start); data words advance it column first
/// and wrap inside the window. Reads return one dummy word, then the 8-bit
/// R, G, B bytes of consecutive pixels packed two per word.
pub(crate) struct MockBus {
    pub calls: Vec<BusCall>,
    /// (register, data) for every non-GRAM register write
    pub written: Vec<(u16, u16)>,
    /// Value returned by `read_register`
    pub status: u16,
    /// Fail every primitive once this many calls have been logged
    pub fail_at: Option<usize>,
    /// Recover after the first injected failure
    pub fail_once: bool,
    registers: [u16; 256],
    selected: u16,
    gram: Vec<u16>,
    cursor: (u16, u16),
    dummy_pending: bool,
    read_bytes: VecDeque<u8>,
}

impl core::fmt::Debug for MockBus {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("MockBus")
            .field("calls", &self.calls.len())
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}

impl MockBus {
    pub fn new() -> Self {
        Self::with_fill(0)
    }

    /// Create a bus whose GRAM holds `pixel` everywhere
    pub fn with_fill(pixel: u16) -> Self {
        Self {
            calls: Vec::new(),
            written: Vec::new(),
            status: 0,
            fail_at: None,
            fail_once: false,
            registers: [0; 256],
            selected: 0,
            gram: vec![pixel; GRAM_SIDE * GRAM_SIDE],
            cursor: (0, 0),
            dummy_pending: false,
            read_bytes: VecDeque::new(),
        }
    }

    fn pair(&self, high: u16, low: u16) -> u16 {
        (self.registers[usize::from(high)] << 8) | self.registers[usize::from(low)]
    }

    pub fn col_start(&self) -> u16 {
        self.pair(COLUMN_START_HIGH, COLUMN_START_LOW)
    }

    pub fn col_end(&self) -> u16 {
        self.pair(COLUMN_END_HIGH, COLUMN_END_LOW)
    }

    pub fn row_start(&self) -> u16 {
        self.pair(ROW_START_HIGH, ROW_START_LOW)
    }

    pub fn row_end(&self) -> u16 {
        self.pair(ROW_END_HIGH, ROW_END_LOW)
    }

    /// Last value written to `register`
    pub fn register(&self, register: u16) -> u16 {
        self.registers[usize::from(register & 0xFF)]
    }

    /// Pixel at window address (x, y)
    pub fn pixel(&self, x: u16, y: u16) -> u16 {
        self.gram[usize::from(y) * GRAM_SIDE + usize::from(x)]
    }

    pub fn set_pixel(&mut self, x: u16, y: u16, pixel: u16) {
        self.gram[usize::from(y) * GRAM_SIDE + usize::from(x)] = pixel;
    }

    pub fn clear_log(&mut self) {
        self.calls.clear();
        self.written.clear();
    }

    fn record(&mut self, call: BusCall) -> Result<(), MockError> {
        if self.fail_at.is_some_and(|n| self.calls.len() >= n) {
            if self.fail_once {
                self.fail_at = None;
            }
            return Err(MockError);
        }
        self.calls.push(call);
        Ok(())
    }

    fn advance(&mut self) {
        let (x, y) = self.cursor;
        if x >= self.col_end() {
            let y = if y >= self.row_end() {
                self.row_start()
            } else {
                y + 1
            };
            self.cursor = (self.col_start(), y);
        } else {
            self.cursor = (x + 1, y);
        }
    }

    fn store(&mut self, data: u16) {
        if self.selected == GRAM_ACCESS {
            let (x, y) = self.cursor;
            self.set_pixel(x, y, data);
            self.advance();
        } else {
            self.registers[usize::from(self.selected & 0xFF)] = data;
            self.written.push((self.selected, data));
        }
    }

    fn load(&mut self) -> u16 {
        if self.selected != GRAM_ACCESS {
            return self.register(self.selected);
        }
        if self.dummy_pending {
            self.dummy_pending = false;
            return 0;
        }
        while self.read_bytes.len() < 2 {
            let (x, y) = self.cursor;
            self.read_bytes.extend(gram_read_bytes(self.pixel(x, y)));
            self.advance();
        }
        let high = self.read_bytes.pop_front().unwrap_or(0);
        let low = self.read_bytes.pop_front().unwrap_or(0);
        u16::from_be_bytes([high, low])
    }
}

impl Bus for MockBus {
    type Error = MockError;

    fn write_register(&mut self, register: u16) -> Result<(), MockError> {
        self.record(BusCall::Register(register))?;
        self.selected = register;
        if register == GRAM_ACCESS {
            self.cursor = (self.col_start(), self.row_start());
            self.dummy_pending = true;
            self.read_bytes.clear();
        }
        Ok(())
    }

    fn write_data(&mut self, data: u16) -> Result<(), MockError> {
        self.record(BusCall::Data(data))?;
        self.store(data);
        Ok(())
    }

    fn write_multiple_data(&mut self, data: &[u16]) -> Result<(), MockError> {
        self.record(BusCall::MultipleData(data.len()))?;
        for word in data {
            self.store(*word);
        }
        Ok(())
    }

    fn write_repeating_data(&mut self, data: u16, count: u32) -> Result<(), MockError> {
        self.record(BusCall::RepeatingData(data, count))?;
        for _ in 0..count {
            self.store(data);
        }
        Ok(())
    }

    fn read_register(&mut self) -> Result<u16, MockError> {
        self.record(BusCall::ReadRegister)?;
        Ok(self.status)
    }

    fn read_data(&mut self) -> Result<u16, MockError> {
        self.record(BusCall::ReadData)?;
        Ok(self.load())
    }

    fn read_multiple_data(&mut self, buffer: &mut [u16]) -> Result<(), MockError> {
        self.record(BusCall::ReadMultipleData(buffer.len()))?;
        for word in buffer.iter_mut() {
            *word = self.load();
        }
        Ok(())
    }
}
