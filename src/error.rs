//! Error handling primitives for the FDC1004 driver.

/// Crate-wide result type alias.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Error variants produced by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// Any error reported by the underlying bus interface.
    Interface(E),
    /// A channel index, CAPDAC trim or other bounded field is out of range.
    ///
    /// Raised before any bus transaction is attempted.
    InvalidArgument,
    /// The device did not answer, or answered with an unexpected device ID.
    DeviceNotPresent,
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Self::Interface(err)
    }
}
