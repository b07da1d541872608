//! GPIO configuration abstraction
//!
//! Only what the clock needs: turning pins into inputs with a chosen pull
//! resistor. Reading levels goes through `embedded-hal` (see
//! [`crate::input::ActiveLow`]).

use crate::error::GpioError;

/// Highest GPIO number on the ESP32.
pub const MAX_GPIO: u8 = 39;

/// A GPIO number, validated against the chip's pin count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct GpioNum(u8);

impl GpioNum {
    /// Create a `GpioNum`, returning an error if `number > 39`.
    ///
    /// # Errors
    ///
    /// Returns [`GpioError::InvalidPin`] if the chip has no such GPIO.
    pub const fn new(number: u8) -> Result<Self, GpioError> {
        if number > MAX_GPIO {
            Err(GpioError::InvalidPin(number))
        } else {
            Ok(Self(number))
        }
    }

    /// Create a `GpioNum` from a board constant.
    ///
    /// Out-of-range numbers saturate to [`MAX_GPIO`]; use [`GpioNum::new`]
    /// for numbers that are not literals.
    pub const fn from_const(number: u8) -> Self {
        match Self::new(number) {
            Ok(pin) => pin,
            Err(_) => Self(MAX_GPIO),
        }
    }

    /// Return the raw GPIO number.
    pub const fn number(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for GpioNum {
    type Error = GpioError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<GpioNum> for u8 {
    fn from(pin: GpioNum) -> Self {
        pin.0
    }
}

impl core::fmt::Display for GpioNum {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "GPIO{}", self.0)
    }
}

/// Internal pull resistor selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Pull {
    /// Floating input
    #[default]
    None,
    /// Pull-up (idle high, active low)
    Up,
    /// Pull-down (idle low, active high)
    Down,
}

/// Digital input configuration facility.
pub trait PinConfigurator {
    /// Error type
    type Error;

    /// Make `pin` a digital input with the given pull resistor.
    fn configure_input(&mut self, pin: GpioNum, pull: Pull) -> Result<(), Self::Error>;

    /// Configure every pin in `pins` identically, stopping at the first error.
    fn configure_inputs<I>(&mut self, pins: I, pull: Pull) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = GpioNum>,
    {
        for pin in pins {
            self.configure_input(pin, pull)?;
        }
        Ok(())
    }
}
