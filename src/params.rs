//! Strongly typed parameter enumerations for the FDC1004 driver.
//!
//! These enums map directly to datasheet field encodings and are used across
//! [`FdcConfig`](crate::config::FdcConfig), [`ChannelConfig`](crate::config::ChannelConfig)
//! and the high-level driver APIs. Prefer these types over raw integers so that
//! invalid channel or mux selections never reach the bus.
//!
//! # Examples
//!
//! ```rust
//! use fdc1004::params::{Channel, InputMux, SampleRate};
//!
//! let channel = Channel::try_from(2u8).unwrap();
//! assert_eq!(channel, Channel::Channel3);
//! assert_eq!(channel.measurement_msb_register(), 0x04);
//! let _ = (InputMux::Cin1, SampleRate::Sps400);
//! ```

use modular_bitfield::prelude::Specifier;

use crate::config::ConfigError;
use crate::registers::{
    ChannelConfiguration,
    Register,
    REG_GAIN_CIN1,
    REG_MEAS1_MSB,
    REG_OFFSET_CIN1,
};

/// One of the four independent measurement slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Channel {
    /// Measurement 1 (index 0).
    Channel1 = 0,
    /// Measurement 2 (index 1).
    Channel2 = 1,
    /// Measurement 3 (index 2).
    Channel3 = 2,
    /// Measurement 4 (index 3).
    Channel4 = 3,
}

impl Channel {
    /// All channels in register order.
    pub const ALL: [Channel; 4] = [
        Channel::Channel1,
        Channel::Channel2,
        Channel::Channel3,
        Channel::Channel4,
    ];

    /// Zero-based channel index.
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Address of the `MEASn_MSB` register; the LSB register follows it.
    pub const fn measurement_msb_register(self) -> u8 {
        REG_MEAS1_MSB + self.index() * 2
    }

    /// Address of the `CONF_MEASn` register.
    pub const fn config_register(self) -> u8 {
        ChannelConfiguration::ADDRESS + self.index()
    }

    /// Address of the `OFFSET_CALn` register.
    pub const fn offset_register(self) -> u8 {
        REG_OFFSET_CIN1 + self.index()
    }

    /// Address of the `GAIN_CALn` register.
    pub const fn gain_register(self) -> u8 {
        REG_GAIN_CIN1 + self.index()
    }

    /// Bit mask of this channel's `DONE` flag in `FDC_CONF`.
    ///
    /// Channel 1 owns bit 3 and channel 4 owns bit 0.
    pub const fn done_mask(self) -> u16 {
        1 << (3 - self.index())
    }

    /// Bit mask of this channel's `MEAS` enable flag in `FDC_CONF`.
    pub const fn enable_mask(self) -> u16 {
        self.done_mask() << 4
    }
}

impl TryFrom<u8> for Channel {
    type Error = ConfigError;

    fn try_from(value: u8) -> core::result::Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Channel1),
            1 => Ok(Self::Channel2),
            2 => Ok(Self::Channel3),
            3 => Ok(Self::Channel4),
            _ => Err(ConfigError::ChannelOutOfRange),
        }
    }
}

impl From<Channel> for u8 {
    fn from(value: Channel) -> Self {
        value.index()
    }
}

/// Input routed to the positive (`CHA`) or negative (`CHB`) side of a measurement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 3]
pub enum InputMux {
    /// Pin CIN1.
    Cin1 = 0b000,
    /// Pin CIN2.
    Cin2 = 0b001,
    /// Pin CIN3.
    Cin3 = 0b010,
    /// Pin CIN4.
    Cin4 = 0b011,
    /// Internal CAPDAC reference (single-ended measurement).
    Capdac = 0b100,
    /// Input disconnected (single-ended measurement without offset).
    Disabled = 0b111,
}

impl TryFrom<u8> for InputMux {
    type Error = ConfigError;

    fn try_from(value: u8) -> core::result::Result<Self, Self::Error> {
        match value {
            0b000 => Ok(Self::Cin1),
            0b001 => Ok(Self::Cin2),
            0b010 => Ok(Self::Cin3),
            0b011 => Ok(Self::Cin4),
            0b100 => Ok(Self::Capdac),
            0b111 => Ok(Self::Disabled),
            _ => Err(ConfigError::ReservedBitPattern),
        }
    }
}

/// Conversion rate encoded in `FDC_CONF.RATE`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 2]
pub enum SampleRate {
    /// 100 samples per second.
    Sps100 = 0b00,
    /// 200 samples per second.
    Sps200 = 0b01,
    /// 400 samples per second.
    Sps400 = 0b10,
}

impl SampleRate {
    /// Returns the rate in samples per second.
    pub const fn samples_per_second(self) -> u16 {
        match self {
            Self::Sps100 => 100,
            Self::Sps200 => 200,
            Self::Sps400 => 400,
        }
    }
}

/// Repeat mode encoded in `FDC_CONF.REPEAT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Specifier)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
#[bits = 1]
pub enum RepeatMode {
    /// Single conversion per enabled measurement.
    Disabled = 0,
    /// Continuous conversions at the selected rate.
    Enabled = 1,
}
