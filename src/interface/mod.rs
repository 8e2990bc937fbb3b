//! Bus interface abstraction for the FDC1004 driver.

pub mod i2c;

/// Abstraction over the low-level bus access required by the driver.
///
/// Registers are 16 bits wide and travel MSB first.
pub trait Fdc1004Interface {
    /// Error type produced by the concrete bus implementation.
    type Error;

    /// Writes a single 16-bit register.
    fn write_register(&mut self, register: u8, value: u16) -> core::result::Result<(), Self::Error>;

    /// Selects `register` and reads `buf.len()` consecutive bytes without releasing the bus.
    fn read_many(&mut self, register: u8, buf: &mut [u8]) -> core::result::Result<(), Self::Error>;

    /// Reads a single 16-bit register.
    fn read_register(&mut self, register: u8) -> core::result::Result<u16, Self::Error> {
        let mut raw = [0u8; 2];
        self.read_many(register, &mut raw)?;
        Ok(u16::from_be_bytes(raw))
    }

    /// Returns `true` when `error` means nothing answered at the device address.
    fn is_absent(error: &Self::Error) -> bool {
        let _ = error;
        false
    }
}
