#![cfg_attr(not(test), no_std)]

mod error;

pub mod config;
pub mod device;
pub mod interface;
mod log;
pub mod params;
pub mod registers;

pub use crate::config::{ChannelConfig, EnabledChannels, FdcConfig};
pub use crate::device::{Fdc1004, RawMeasurement, StatusSnapshot};
pub use crate::error::{Error, Result};
pub use crate::interface::i2c::I2cInterface;
