//! I²C interface implementation built on top of `embedded-hal` `I2c`.

use embedded_hal::i2c::{Error as _, ErrorKind, I2c};

use super::Fdc1004Interface;
use crate::registers::DEVICE_ADDRESS;

/// I²C-based interface implementation for the FDC1004 driver.
pub struct I2cInterface<I2C> {
    i2c: I2C,
    address: u8,
}

impl<I2C> I2cInterface<I2C> {
    /// Creates a new interface talking to the fixed FDC1004 address.
    pub const fn new(i2c: I2C) -> Self {
        Self::with_address(i2c, DEVICE_ADDRESS)
    }

    /// Creates a new interface talking to a non-default address (e.g. behind a translator).
    pub const fn with_address(i2c: I2C, address: u8) -> Self {
        Self { i2c, address }
    }

    /// Returns the 7-bit device address used for every transaction.
    pub const fn address(&self) -> u8 {
        self.address
    }

    /// Provides mutable access to the wrapped I²C bus.
    pub fn i2c_mut(&mut self) -> &mut I2C {
        &mut self.i2c
    }

    /// Consumes the interface and returns the owned I²C bus.
    pub fn release(self) -> I2C {
        self.i2c
    }
}

impl<I2C> Fdc1004Interface for I2cInterface<I2C>
where
    I2C: I2c,
{
    type Error = I2C::Error;

    fn write_register(&mut self, register: u8, value: u16) -> core::result::Result<(), Self::Error> {
        let [msb, lsb] = value.to_be_bytes();
        self.i2c.write(self.address, &[register, msb, lsb])
    }

    fn read_many(&mut self, register: u8, buf: &mut [u8]) -> core::result::Result<(), Self::Error> {
        if buf.is_empty() {
            return Ok(());
        }

        // Repeated start keeps the register pointer selected for the read.
        self.i2c.write_read(self.address, &[register], buf)
    }

    fn is_absent(error: &Self::Error) -> bool {
        matches!(error.kind(), ErrorKind::NoAcknowledge(_))
    }
}
