//! Register map definitions for the FDC1004 capacitance-to-digital converter.
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

use crate::params::{Channel, InputMux, RepeatMode, SampleRate};

/// Fixed 7-bit I²C address of the FDC1004.
pub const DEVICE_ADDRESS: u8 = 0x50;

/// Register address of `MEAS1_MSB`.
pub const REG_MEAS1_MSB: u8 = 0x00;
/// Register address of `MEAS1_LSB`.
pub const REG_MEAS1_LSB: u8 = 0x01;
/// Register address of `MEAS2_MSB`.
pub const REG_MEAS2_MSB: u8 = 0x02;
/// Register address of `MEAS2_LSB`.
pub const REG_MEAS2_LSB: u8 = 0x03;
/// Register address of `MEAS3_MSB`.
pub const REG_MEAS3_MSB: u8 = 0x04;
/// Register address of `MEAS3_LSB`.
pub const REG_MEAS3_LSB: u8 = 0x05;
/// Register address of `MEAS4_MSB`.
pub const REG_MEAS4_MSB: u8 = 0x06;
/// Register address of `MEAS4_LSB`.
pub const REG_MEAS4_LSB: u8 = 0x07;
/// Register address of `CONF_MEAS1`.
pub const REG_CONF_MEAS1: u8 = 0x08;
/// Register address of `CONF_MEAS2`.
pub const REG_CONF_MEAS2: u8 = 0x09;
/// Register address of `CONF_MEAS3`.
pub const REG_CONF_MEAS3: u8 = 0x0A;
/// Register address of `CONF_MEAS4`.
pub const REG_CONF_MEAS4: u8 = 0x0B;
/// Register address of `FDC_CONF`.
pub const REG_FDC_CONF: u8 = 0x0C;
/// Register address of `OFFSET_CAL_CIN1`.
pub const REG_OFFSET_CIN1: u8 = 0x0D;
/// Register address of `OFFSET_CAL_CIN2`.
pub const REG_OFFSET_CIN2: u8 = 0x0E;
/// Register address of `OFFSET_CAL_CIN3`.
pub const REG_OFFSET_CIN3: u8 = 0x0F;
/// Register address of `OFFSET_CAL_CIN4`.
pub const REG_OFFSET_CIN4: u8 = 0x10;
/// Register address of `GAIN_CAL_CIN1`.
pub const REG_GAIN_CIN1: u8 = 0x11;
/// Register address of `GAIN_CAL_CIN2`.
pub const REG_GAIN_CIN2: u8 = 0x12;
/// Register address of `GAIN_CAL_CIN3`.
pub const REG_GAIN_CIN3: u8 = 0x13;
/// Register address of `GAIN_CAL_CIN4`.
pub const REG_GAIN_CIN4: u8 = 0x14;
/// Register address of `MANUFACTURER_ID`.
pub const REG_MANUFACTURER_ID: u8 = 0xFE;
/// Register address of `DEVICE_ID`.
pub const REG_DEVICE_ID: u8 = 0xFF;

/// Expected content of `DEVICE_ID`.
pub const EXPECTED_DEVICE_ID: u16 = 0x1004;
/// Expected content of `MANUFACTURER_ID` ("TI").
pub const EXPECTED_MANUFACTURER_ID: u16 = 0x5449;

/// Soft reset command value written to `FDC_CONF` (RST bit).
pub const RESET_COMMAND: u16 = 0x8000;

/// Highest CAPDAC code accepted by `CONF_MEASn.CAPDAC` (5 bits).
pub const CAPDAC_MAX: u8 = 0x1F;

/// Access permissions encoded for each register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterAccess {
    /// Read-only register.
    ReadOnly,
    /// Write-only register.
    WriteOnly,
    /// Read/write register.
    ReadWrite,
}

/// Minimal metadata exposed by every register value type.
pub trait Register {
    /// Raw storage backing the register payload.
    type Raw: Copy;
    /// Register address as documented in the datasheet.
    ///
    /// Per-channel registers report the address of channel 1.
    const ADDRESS: u8;
    /// Access permission classification.
    const ACCESS: RegisterAccess;
    /// Optional reset/default value defined by the datasheet.
    const RESET_VALUE: Option<Self::Raw>;
}

/// Bitfield representation of the `FDC_CONF` register (address `0x0C`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FdcConfiguration {
    // Measurement 4 complete (bit 0).
    pub done_4: bool,
    // Measurement 3 complete (bit 1).
    pub done_3: bool,
    // Measurement 2 complete (bit 2).
    pub done_2: bool,
    // Measurement 1 complete (bit 3).
    pub done_1: bool,
    // Measurement 4 enable (bit 4).
    pub meas_4: bool,
    // Measurement 3 enable (bit 5).
    pub meas_3: bool,
    // Measurement 2 enable (bit 6).
    pub meas_2: bool,
    // Measurement 1 enable (bit 7).
    pub meas_1: bool,
    // Repeat mode (bit 8).
    pub repeat: RepeatMode,
    #[skip]
    __: B1,
    // Conversion rate (bits 11:10).
    pub rate: SampleRate,
    #[skip]
    __: B3,
    // Software reset (bit 15).
    pub reset: bool,
}

impl FdcConfiguration {
    /// Returns the `DONE` flag of the given channel.
    pub fn is_done(&self, channel: Channel) -> bool {
        match channel {
            Channel::Channel1 => self.done_1(),
            Channel::Channel2 => self.done_2(),
            Channel::Channel3 => self.done_3(),
            Channel::Channel4 => self.done_4(),
        }
    }

    /// Returns the `MEAS` enable flag of the given channel.
    pub fn is_enabled(&self, channel: Channel) -> bool {
        match channel {
            Channel::Channel1 => self.meas_1(),
            Channel::Channel2 => self.meas_2(),
            Channel::Channel3 => self.meas_3(),
            Channel::Channel4 => self.meas_4(),
        }
    }

    /// Sets the `MEAS` enable flag of the given channel.
    pub fn set_enabled(&mut self, channel: Channel, enabled: bool) {
        match channel {
            Channel::Channel1 => self.set_meas_1(enabled),
            Channel::Channel2 => self.set_meas_2(enabled),
            Channel::Channel3 => self.set_meas_3(enabled),
            Channel::Channel4 => self.set_meas_4(enabled),
        }
    }
}

impl From<u16> for FdcConfiguration {
    fn from(value: u16) -> Self {
        Self::from_bytes(value.to_le_bytes())
    }
}

impl From<FdcConfiguration> for u16 {
    fn from(value: FdcConfiguration) -> Self {
        u16::from_le_bytes(value.into_bytes())
    }
}

/// Bitfield representation of the `CONF_MEASn` registers (addresses `0x08`-`0x0B`).
#[allow(unused_parens)]
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChannelConfiguration {
    #[skip]
    __: B5,
    // CAPDAC offset code (bits 9:5).
    pub capdac: B5,
    // Negative input selection (bits 12:10).
    pub input_b: InputMux,
    // Positive input selection (bits 15:13).
    pub input_a: InputMux,
}

impl From<u16> for ChannelConfiguration {
    fn from(value: u16) -> Self {
        Self::from_bytes(value.to_le_bytes())
    }
}

impl From<ChannelConfiguration> for u16 {
    fn from(value: ChannelConfiguration) -> Self {
        u16::from_le_bytes(value.into_bytes())
    }
}

impl Register for FdcConfiguration {
    type Raw = u16;
    const ADDRESS: u8 = REG_FDC_CONF;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x0000);
}

impl Register for ChannelConfiguration {
    type Raw = u16;
    const ADDRESS: u8 = REG_CONF_MEAS1;
    const ACCESS: RegisterAccess = RegisterAccess::ReadWrite;
    const RESET_VALUE: Option<Self::Raw> = Some(0x1C00);
}
