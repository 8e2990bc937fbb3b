//! High-level FDC1004 device driver implementation.

use crate::config::{ChannelConfig, EnabledChannels, FdcConfig};
use crate::error::{Error, Result};
use crate::interface::Fdc1004Interface;
use crate::interface::i2c::I2cInterface;
use crate::log::{debug, trace, warning};
use crate::params::{Channel, RepeatMode, SampleRate};
use crate::registers::{
    EXPECTED_DEVICE_ID,
    EXPECTED_MANUFACTURER_ID,
    FdcConfiguration,
    REG_DEVICE_ID,
    REG_MANUFACTURER_ID,
    RESET_COMMAND,
    Register,
};
use embedded_hal::i2c::I2c;

// MSB and LSB measurement registers read back-to-back.
const RAW_MEASUREMENT_BYTES: usize = 4;

/// High-level synchronous driver for the FDC1004 capacitance-to-digital converter.
///
/// The driver holds nothing but the bus interface; every call goes to the chip.
pub struct Fdc1004<IFACE> {
    interface: IFACE,
}

/// A capacitance sample as assembled from `MEASn_MSB` and `MEASn_LSB`.
///
/// The four bytes are kept in transfer order. [`word`](Self::word) reproduces the
/// reference 32-bit assembly, [`value`](Self::value) the signed 24-bit sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawMeasurement {
    bytes: [u8; RAW_MEASUREMENT_BYTES],
}

impl RawMeasurement {
    /// Wraps the four bytes returned by a measurement read.
    pub const fn from_bytes(bytes: [u8; RAW_MEASUREMENT_BYTES]) -> Self {
        Self { bytes }
    }

    /// Returns the bytes in transfer order (MSB high, MSB low, LSB high, LSB low).
    pub const fn bytes(&self) -> [u8; RAW_MEASUREMENT_BYTES] {
        self.bytes
    }

    /// Returns `(b0 << 24) | (b1 << 16) | (b2 << 8) | b3`.
    ///
    /// The 24 significant bits are left-justified; the low byte is reserved by the chip.
    pub const fn word(&self) -> u32 {
        u32::from_be_bytes(self.bytes)
    }

    /// Returns the two's-complement 24-bit sample, sign-extended to 32 bits.
    pub const fn value(&self) -> i32 {
        i32::from_be_bytes(self.bytes) >> 8
    }
}

/// Decoded view of the `FDC_CONF` register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatusSnapshot {
    /// FDC_CONF[7:4] MEAS_1..MEAS_4.
    pub enabled: EnabledChannels,
    /// FDC_CONF[3:0] DONE_1..DONE_4, same bit order as `enabled`.
    pub done: EnabledChannels,
    /// FDC_CONF[8] REPEAT.
    pub repeat: RepeatMode,
    /// FDC_CONF[11:10] RATE, `None` for the reserved encoding.
    pub rate: Option<SampleRate>,
}

impl StatusSnapshot {
    /// Builds a snapshot from the raw `FDC_CONF` bitfield.
    pub fn from_register(conf: FdcConfiguration) -> Self {
        let mut enabled = EnabledChannels::NONE;
        let mut done = EnabledChannels::NONE;
        for channel in Channel::ALL {
            if conf.is_enabled(channel) {
                enabled = enabled.with(channel);
            }
            if conf.is_done(channel) {
                done = done.with(channel);
            }
        }

        Self {
            enabled,
            done,
            repeat: conf.repeat(),
            rate: conf.rate_or_err().ok(),
        }
    }

    /// Returns whether a fresh result is waiting for `channel`.
    pub fn is_ready(&self, channel: Channel) -> bool {
        self.done.contains(channel)
    }
}

impl<IFACE> Fdc1004<IFACE> {
    // ==================================================================
    // == Driver Construction & Ownership ===============================
    // ==================================================================
    /// Creates a new driver instance from the provided bus interface.
    pub fn new(interface: IFACE) -> Self {
        Self { interface }
    }

    /// Consumes the driver and returns the owned interface.
    pub fn release(self) -> IFACE {
        self.interface
    }

    /// Provides mutable access to the underlying interface.
    pub fn interface_mut(&mut self) -> &mut IFACE {
        &mut self.interface
    }
}

impl<I2C> Fdc1004<I2cInterface<I2C>>
where
    I2C: I2c,
{
    // ==================================================================
    // == I2C Convenience Constructors ==================================
    // ==================================================================
    /// Convenience constructor for I²C transports at the fixed device address.
    pub fn new_i2c(i2c: I2C) -> Self {
        Self::new(I2cInterface::new(i2c))
    }

    /// Releases the driver, returning the I²C bus.
    pub fn release_i2c(self) -> I2C {
        self.release().release()
    }
}

impl<IFACE, CommE> Fdc1004<IFACE>
where
    IFACE: Fdc1004Interface<Error = CommE>,
{
    // ==================================================================
    // == Initialization & Identification ===============================
    // ==================================================================
    /// Verifies the chip answers with the FDC1004 device ID, then logs its manufacturer ID.
    ///
    /// An unacknowledged ID read and a mismatching device ID both yield
    /// [`Error::DeviceNotPresent`]; other bus errors are returned unchanged.
    /// A manufacturer ID other than [`EXPECTED_MANUFACTURER_ID`] is logged, not rejected.
    pub fn init(&mut self) -> Result<(), CommE> {
        let device_id = match self.device_id() {
            Ok(id) => id,
            Err(Error::Interface(err)) if IFACE::is_absent(&err) => {
                warning!("FDC1004 did not acknowledge the device ID read");
                return Err(Error::DeviceNotPresent);
            }
            Err(err) => return Err(err),
        };

        if device_id != EXPECTED_DEVICE_ID {
            warning!("unexpected FDC1004 device ID {=u16:#x}", device_id);
            return Err(Error::DeviceNotPresent);
        }

        let manufacturer_id = self.manufacturer_id()?;
        debug!(
            "FDC1004 detected (device ID {=u16:#x}, manufacturer ID {=u16:#x})",
            device_id,
            manufacturer_id
        );
        Ok(())
    }

    /// Issues a soft reset by setting `FDC_CONF.RST`.
    pub fn reset(&mut self) -> Result<(), CommE> {
        self
            .interface
            .write_register(FdcConfiguration::ADDRESS, RESET_COMMAND)
            .map_err(Error::from)
    }

    /// Reads the `MANUFACTURER_ID` register.
    pub fn manufacturer_id(&mut self) -> Result<u16, CommE> {
        let id = self
            .interface
            .read_register(REG_MANUFACTURER_ID)
            .map_err(Error::from)?;

        if id != EXPECTED_MANUFACTURER_ID {
            warning!("unexpected manufacturer ID {=u16:#x}", id);
        }
        Ok(id)
    }

    /// Reads the `DEVICE_ID` register.
    pub fn device_id(&mut self) -> Result<u16, CommE> {
        self
            .interface
            .read_register(REG_DEVICE_ID)
            .map_err(Error::from)
    }

    // ==================================================================
    // == Measurement Configuration =====================================
    // ==================================================================
    /// Programs `FDC_CONF` and returns the register image that was written.
    ///
    /// Writes are not read back; a bus error usually means the chip is absent.
    pub fn configure_measurement(&mut self, config: &FdcConfig) -> Result<u16, CommE> {
        let image = u16::from(config.register());
        trace!("FDC_CONF <- {=u16:#x}", image);
        self
            .interface
            .write_register(FdcConfiguration::ADDRESS, image)
            .map_err(Error::from)?;
        Ok(image)
    }

    /// Disables all measurements, leaving rate and repeat at their defaults.
    pub fn stop_measurements(&mut self) -> Result<(), CommE> {
        self.configure_measurement(&FdcConfig::default())?;
        Ok(())
    }

    /// Programs `CONF_MEASn` for `config.channel` and returns the register image.
    ///
    /// Out-of-range fields fail with [`Error::InvalidArgument`] before touching the bus.
    pub fn configure_channel(&mut self, config: &ChannelConfig) -> Result<u16, CommE> {
        let image = u16::from(config.register().map_err(|_| Error::InvalidArgument)?);
        let register = config.channel.config_register();
        trace!("CONF_MEAS {=u8:#x} <- {=u16:#x}", register, image);
        self
            .interface
            .write_register(register, image)
            .map_err(Error::from)?;
        Ok(image)
    }

    /// Reads back and decodes `CONF_MEASn` for `channel`.
    pub fn read_channel_configuration(&mut self, channel: Channel) -> Result<ChannelConfig, CommE> {
        let raw = self
            .interface
            .read_register(channel.config_register())
            .map_err(Error::from)?;

        ChannelConfig::from_register(channel, raw.into()).map_err(|_| Error::InvalidArgument)
    }

    /// Writes a raw offset calibration code to `OFFSET_CALn`.
    ///
    /// The code is passed through verbatim (signed 5.11 fixed point, ±16 pF).
    pub fn set_offset(&mut self, channel: Channel, offset: u16) -> Result<u16, CommE> {
        self
            .interface
            .write_register(channel.offset_register(), offset)
            .map_err(Error::from)?;
        Ok(offset)
    }

    /// Writes a raw gain calibration code to `GAIN_CALn`.
    ///
    /// The code is passed through verbatim (unsigned 2.14 fixed point, 0 to 4).
    pub fn set_gain(&mut self, channel: Channel, gain: u16) -> Result<u16, CommE> {
        self
            .interface
            .write_register(channel.gain_register(), gain)
            .map_err(Error::from)?;
        Ok(gain)
    }

    // ==================================================================
    // == Status & Data Acquisition =====================================
    // ==================================================================
    /// Returns a snapshot of `FDC_CONF`.
    pub fn read_status(&mut self) -> Result<StatusSnapshot, CommE> {
        let raw = self
            .interface
            .read_register(FdcConfiguration::ADDRESS)
            .map_err(Error::from)?;

        Ok(StatusSnapshot::from_register(FdcConfiguration::from(raw)))
    }

    /// Returns whether `DONE` is set for `channel`.
    ///
    /// Polling does not clear the flag; reading the measurement does.
    pub fn is_measurement_ready(&mut self, channel: Channel) -> Result<bool, CommE> {
        let raw = self
            .interface
            .read_register(FdcConfiguration::ADDRESS)
            .map_err(Error::from)?;

        Ok(raw & channel.done_mask() != 0)
    }

    /// Reads the `MEASn_MSB`/`MEASn_LSB` pair of `channel` in one transfer.
    pub fn read_measurement(&mut self, channel: Channel) -> Result<RawMeasurement, CommE> {
        let mut raw = [0u8; RAW_MEASUREMENT_BYTES];
        self
            .interface
            .read_many(channel.measurement_msb_register(), &mut raw)
            .map_err(Error::from)?;

        let sample = RawMeasurement::from_bytes(raw);
        trace!("MEAS{=u8} -> {=u32:#x}", channel.index() + 1, sample.word());
        Ok(sample)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::InputMux;
    use embedded_hal::i2c::{ErrorKind, NoAcknowledgeSource};
    use embedded_hal_mock::eh1::i2c::{Mock as I2cMock, Transaction as I2cTransaction};

    const ADDR: u8 = 0x50;

    fn driver(expectations: &[I2cTransaction]) -> Fdc1004<I2cInterface<I2cMock>> {
        Fdc1004::new_i2c(I2cMock::new(expectations))
    }

    fn read(register: u8, response: &[u8]) -> I2cTransaction {
        I2cTransaction::write_read(ADDR, vec![register], response.to_vec())
    }

    #[test]
    fn init_accepts_expected_device_id() {
        let mut fdc = driver(&[read(0xFF, &[0x10, 0x04]), read(0xFE, &[0x54, 0x49])]);
        assert_eq!(fdc.init(), Ok(()));
        fdc.release_i2c().done();
    }

    #[test]
    fn init_tolerates_unexpected_manufacturer_id() {
        let mut fdc = driver(&[read(0xFF, &[0x10, 0x04]), read(0xFE, &[0x00, 0x00])]);
        assert_eq!(fdc.init(), Ok(()));
        fdc.release_i2c().done();
    }

    #[test]
    fn init_propagates_manufacturer_id_bus_error() {
        let mut fdc = driver(&[
            read(0xFF, &[0x10, 0x04]),
            read(0xFE, &[0x00, 0x00]).with_error(ErrorKind::Bus),
        ]);
        assert_eq!(fdc.init(), Err(Error::Interface(ErrorKind::Bus)));
        fdc.release_i2c().done();
    }

    #[test]
    fn init_rejects_other_device_ids() {
        for id in [0x0000u16, 0x1005, 0x0410, 0xFFFF] {
            let mut fdc = driver(&[read(0xFF, &id.to_be_bytes())]);
            assert_eq!(fdc.init(), Err(Error::DeviceNotPresent));
            fdc.release_i2c().done();
        }
    }

    #[test]
    fn init_maps_nack_to_device_not_present() {
        let mut fdc = driver(&[read(0xFF, &[0x00, 0x00])
            .with_error(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address))]);
        assert_eq!(fdc.init(), Err(Error::DeviceNotPresent));
        fdc.release_i2c().done();
    }

    #[test]
    fn init_propagates_other_bus_errors() {
        let mut fdc = driver(&[read(0xFF, &[0x00, 0x00]).with_error(ErrorKind::Bus)]);
        assert_eq!(fdc.init(), Err(Error::Interface(ErrorKind::Bus)));
        fdc.release_i2c().done();
    }

    #[test]
    fn identification_registers_are_big_endian() {
        let mut fdc = driver(&[read(0xFE, &[0x54, 0x49]), read(0xFF, &[0x10, 0x04])]);
        assert_eq!(fdc.manufacturer_id(), Ok(0x5449));
        assert_eq!(fdc.device_id(), Ok(0x1004));
        fdc.release_i2c().done();
    }

    #[test]
    fn reset_writes_reset_bit() {
        let mut fdc = driver(&[I2cTransaction::write(ADDR, vec![0x0C, 0x80, 0x00])]);
        fdc.reset().unwrap();
        fdc.release_i2c().done();
    }

    #[test]
    fn configure_measurement_writes_fdc_conf_msb_first() {
        let config = FdcConfig::new()
            .enable(Channel::Channel1)
            .enable(Channel::Channel3)
            .rate(SampleRate::Sps400)
            .repeat(RepeatMode::Enabled)
            .build();
        let mut fdc = driver(&[I2cTransaction::write(ADDR, vec![0x0C, 0x09, 0xA0])]);

        assert_eq!(fdc.configure_measurement(&config), Ok(0x09A0));
        fdc.release_i2c().done();
    }

    #[test]
    fn stop_measurements_clears_enables() {
        let mut fdc = driver(&[I2cTransaction::write(ADDR, vec![0x0C, 0x00, 0x00])]);
        fdc.stop_measurements().unwrap();
        fdc.release_i2c().done();
    }

    #[test]
    fn configure_channel_targets_per_channel_register() {
        let config = ChannelConfig::new(Channel::Channel4)
            .input_a(InputMux::Cin4)
            .input_b(InputMux::Capdac)
            .capdac(31);
        // 011 100 11111 00000
        let mut fdc = driver(&[I2cTransaction::write(ADDR, vec![0x0B, 0x73, 0xE0])]);

        assert_eq!(fdc.configure_channel(&config), Ok(0x73E0));
        fdc.release_i2c().done();
    }

    #[test]
    fn configure_channel_rejects_capdac_without_bus_traffic() {
        let config = ChannelConfig::new(Channel::Channel1).capdac(32);
        let mut fdc = driver(&[]);

        assert_eq!(fdc.configure_channel(&config), Err(Error::InvalidArgument));
        fdc.release_i2c().done();
    }

    #[test]
    fn channel_index_four_never_reaches_the_bus() {
        let mut fdc = driver(&[]);
        let result = Channel::try_from(4u8)
            .map_err(|_| Error::InvalidArgument)
            .and_then(|channel| fdc.configure_channel(&ChannelConfig::new(channel)));

        assert_eq!(result, Err(Error::InvalidArgument));
        fdc.release_i2c().done();
    }

    #[test]
    fn read_channel_configuration_decodes_register() {
        let mut fdc = driver(&[read(0x09, &[0x3C, 0x40])]);
        let config = fdc.read_channel_configuration(Channel::Channel2).unwrap();

        assert_eq!(
            config,
            ChannelConfig::new(Channel::Channel2)
                .input_a(InputMux::Cin2)
                .input_b(InputMux::Disabled)
                .capdac(2)
        );
        fdc.release_i2c().done();
    }

    #[test]
    fn calibration_codes_are_written_verbatim() {
        let mut fdc = driver(&[
            I2cTransaction::write(ADDR, vec![0x0F, 0xFF, 0x80]),
            I2cTransaction::write(ADDR, vec![0x14, 0x40, 0x00]),
        ]);

        assert_eq!(fdc.set_offset(Channel::Channel3, 0xFF80), Ok(0xFF80));
        assert_eq!(fdc.set_gain(Channel::Channel4, 0x4000), Ok(0x4000));
        fdc.release_i2c().done();
    }

    #[test]
    fn readiness_uses_reversed_done_bits() {
        let flags = [
            (Channel::Channel1, 0x08u8),
            (Channel::Channel2, 0x04),
            (Channel::Channel3, 0x02),
            (Channel::Channel4, 0x01),
        ];
        let mut expectations = Vec::new();
        for (_, flag) in flags {
            for _ in Channel::ALL {
                expectations.push(read(0x0C, &[0x00, flag]));
            }
        }
        let mut fdc = driver(&expectations);

        for (ready, flag) in flags {
            for channel in Channel::ALL {
                assert_eq!(
                    fdc.is_measurement_ready(channel),
                    Ok(channel == ready),
                    "DONE flags {flag:#04x}, {channel:?}"
                );
            }
        }
        fdc.release_i2c().done();
    }

    #[test]
    fn read_status_decodes_all_fields() {
        let mut fdc = driver(&[read(0x0C, &[0x05, 0xF6])]);
        let status = fdc.read_status().unwrap();

        assert_eq!(status.enabled, EnabledChannels::ALL);
        assert_eq!(status.done.mask(), 0b0110);
        assert!(status.is_ready(Channel::Channel2));
        assert!(!status.is_ready(Channel::Channel1));
        assert_eq!(status.repeat, RepeatMode::Enabled);
        assert_eq!(status.rate, Some(SampleRate::Sps200));
        fdc.release_i2c().done();
    }

    #[test]
    fn read_status_tolerates_reserved_rate() {
        let mut fdc = driver(&[read(0x0C, &[0x0C, 0x00])]);
        assert_eq!(fdc.read_status().unwrap().rate, None);
        fdc.release_i2c().done();
    }

    #[test]
    fn read_measurement_selects_msb_register_and_reads_four_bytes() {
        let mut fdc = driver(&[read(0x04, &[0x12, 0x34, 0x56, 0x00])]);
        let sample = fdc.read_measurement(Channel::Channel3).unwrap();

        assert_eq!(sample.word(), 0x1234_5600);
        assert_eq!((sample.word() >> 24) as u8, 0x12);
        assert_eq!(sample.value(), 0x12_3456);
        fdc.release_i2c().done();
    }

    #[test]
    fn negative_samples_are_sign_extended() {
        let sample = RawMeasurement::from_bytes([0xFF, 0xFF, 0xFE, 0x00]);
        assert_eq!(sample.value(), -2);
        assert_eq!(sample.word(), 0xFFFF_FE00);

        let sample = RawMeasurement::from_bytes([0x80, 0x00, 0x00, 0xAB]);
        assert_eq!(sample.value(), -0x80_0000);
    }

    #[test]
    fn measurement_bus_error_propagates() {
        let mut fdc = driver(&[read(0x00, &[0, 0, 0, 0]).with_error(ErrorKind::Overrun)]);
        assert_eq!(
            fdc.read_measurement(Channel::Channel1),
            Err(Error::Interface(ErrorKind::Overrun))
        );
        fdc.release_i2c().done();
    }
}
