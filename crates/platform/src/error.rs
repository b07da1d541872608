//! Error types
//!
//! The DAC write path has no error taxonomy: register stores cannot fail in
//! a way software can observe. The only fallible operations are the ones that
//! validate numbers coming from outside the type system (pin numbers, channel
//! numbers).

use thiserror_no_std::Error;

/// GPIO configuration errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioError {
    /// The chip has no GPIO with this number.
    #[error("GPIO{0} does not exist on this chip")]
    InvalidPin(u8),
    /// The pin is wired to the SPI flash and must not be reconfigured.
    #[error("GPIO{0} is reserved for the SPI flash")]
    FlashPin(u8),
    /// The pin is input-only and has no internal pull resistors.
    #[error("GPIO{0} has no internal pull resistors")]
    NoPullResistor(u8),
}

/// Analog output channel number errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelError {
    /// Only channels 1 and 2 exist.
    #[error("DAC channel {0} does not exist (expected 1 or 2)")]
    InvalidChannel(u8),
}
