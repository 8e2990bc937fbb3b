//! Configuration primitives for the FDC1004 driver.

use crate::params::{Channel, InputMux, RepeatMode, SampleRate};
use crate::registers::{CAPDAC_MAX, ChannelConfiguration, FdcConfiguration};

/// Set of measurements enabled in `FDC_CONF`.
///
/// Stored as a 4-bit mask where channel 1 is the most significant bit. The mask is
/// written to `FDC_CONF[7:4]` (MEAS_1 at bit 7), so mask `0b0001` encodes as `0x0010`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EnabledChannels(u8);

impl EnabledChannels {
    /// No measurement enabled.
    pub const NONE: Self = Self(0);
    /// All four measurements enabled.
    pub const ALL: Self = Self(0b1111);

    /// Builds the set from a 4-bit mask (channel 1 = bit 3).
    pub const fn from_mask(mask: u8) -> core::result::Result<Self, ConfigError> {
        if mask > 0b1111 {
            return Err(ConfigError::EnableMaskOutOfRange);
        }
        Ok(Self(mask))
    }

    /// Returns the 4-bit mask (channel 1 = bit 3).
    pub const fn mask(self) -> u8 {
        self.0
    }

    /// Returns a copy of the set with `channel` enabled.
    pub const fn with(self, channel: Channel) -> Self {
        Self(self.0 | (1 << (3 - channel.index())))
    }

    /// Returns whether `channel` is part of the set.
    pub const fn contains(self, channel: Channel) -> bool {
        self.0 & (1 << (3 - channel.index())) != 0
    }

    /// Returns whether no channel is enabled.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl From<Channel> for EnabledChannels {
    fn from(value: Channel) -> Self {
        Self::NONE.with(value)
    }
}

/// Device-wide measurement configuration programmed into `FDC_CONF`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FdcConfig {
    /// Measurements to run.
    pub enabled: EnabledChannels,
    /// Conversion rate.
    pub rate: SampleRate,
    /// Single-shot or continuous conversions.
    pub repeat: RepeatMode,
}

impl FdcConfig {
    /// Begins building a [`FdcConfig`] using the builder pattern.
    pub fn new() -> FdcConfigBuilder {
        FdcConfigBuilder::new()
    }

    /// Encodes the configuration into an `FDC_CONF` register image.
    ///
    /// The enable mask lands in bits 7:4, repeat in bit 8 and the rate in bits 11:10.
    /// The `DONE` and `RST` bits are always written as zero.
    pub fn register(&self) -> FdcConfiguration {
        let mut conf = FdcConfiguration::new()
            .with_repeat(self.repeat)
            .with_rate(self.rate);
        for channel in Channel::ALL {
            conf.set_enabled(channel, self.enabled.contains(channel));
        }
        conf
    }
}

impl Default for FdcConfig {
    fn default() -> Self {
        Self {
            enabled: EnabledChannels::NONE,
            rate: SampleRate::Sps100,
            repeat: RepeatMode::Disabled,
        }
    }
}

/// Builder for [`FdcConfig`] allowing piecemeal construction.
#[derive(Debug, Clone, Copy)]
pub struct FdcConfigBuilder {
    config: FdcConfig,
}

impl FdcConfigBuilder {
    /// Creates a new builder seeded with [`FdcConfig::default()`].
    pub fn new() -> Self {
        Self {
            config: FdcConfig::default(),
        }
    }

    /// Adds a channel to the enabled set.
    pub fn enable(mut self, channel: Channel) -> Self {
        self.config.enabled = self.config.enabled.with(channel);
        self
    }

    /// Replaces the enabled set.
    pub fn enabled(mut self, enabled: EnabledChannels) -> Self {
        self.config.enabled = enabled;
        self
    }

    /// Overrides the conversion rate.
    pub fn rate(mut self, rate: SampleRate) -> Self {
        self.config.rate = rate;
        self
    }

    /// Overrides the repeat mode.
    pub fn repeat(mut self, repeat: RepeatMode) -> Self {
        self.config.repeat = repeat;
        self
    }

    /// Finalizes the builder and returns the [`FdcConfig`].
    pub fn build(self) -> FdcConfig {
        self.config
    }
}

/// Input routing and CAPDAC trim for one measurement, programmed into `CONF_MEASn`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ChannelConfig {
    /// Measurement slot being configured.
    pub channel: Channel,
    /// Positive input (`CHA`).
    pub input_a: InputMux,
    /// Negative input (`CHB`).
    pub input_b: InputMux,
    /// CAPDAC offset code, 0 to 31 (3.125 pF per step).
    pub capdac: u8,
}

impl ChannelConfig {
    /// Creates a single-ended configuration measuring `CINn` of the same index.
    pub fn new(channel: Channel) -> Self {
        let input_a = match channel {
            Channel::Channel1 => InputMux::Cin1,
            Channel::Channel2 => InputMux::Cin2,
            Channel::Channel3 => InputMux::Cin3,
            Channel::Channel4 => InputMux::Cin4,
        };
        Self {
            channel,
            input_a,
            input_b: InputMux::Disabled,
            capdac: 0,
        }
    }

    /// Sets the positive input.
    pub fn input_a(mut self, input: InputMux) -> Self {
        self.input_a = input;
        self
    }

    /// Sets the negative input.
    pub fn input_b(mut self, input: InputMux) -> Self {
        self.input_b = input;
        self
    }

    /// Sets the CAPDAC offset code.
    pub fn capdac(mut self, capdac: u8) -> Self {
        self.capdac = capdac;
        self
    }

    /// Checks that every field fits its register slot.
    pub fn validate(&self) -> core::result::Result<(), ConfigError> {
        if self.capdac > CAPDAC_MAX {
            return Err(ConfigError::CapdacOutOfRange);
        }

        Ok(())
    }

    /// Encodes the configuration into a `CONF_MEASn` register image.
    pub fn register(&self) -> core::result::Result<ChannelConfiguration, ConfigError> {
        self.validate()?;

        Ok(ChannelConfiguration::new()
            .with_input_a(self.input_a)
            .with_input_b(self.input_b)
            .with_capdac(self.capdac))
    }

    /// Decodes a `CONF_MEASn` register image read back from `channel`.
    pub fn from_register(
        channel: Channel,
        register: ChannelConfiguration,
    ) -> core::result::Result<Self, ConfigError> {
        let input_a = register
            .input_a_or_err()
            .map_err(|_| ConfigError::ReservedBitPattern)?;
        let input_b = register
            .input_b_or_err()
            .map_err(|_| ConfigError::ReservedBitPattern)?;

        Ok(Self {
            channel,
            input_a,
            input_b,
            capdac: register.capdac(),
        })
    }
}

/// Validation errors generated while building configuration values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Channel index outside 0 to 3.
    ChannelOutOfRange,
    /// CAPDAC code outside 0 to 31.
    CapdacOutOfRange,
    /// Measurement enable mask wider than four bits.
    EnableMaskOutOfRange,
    /// A register field holds a reserved encoding.
    ReservedBitPattern,
}
