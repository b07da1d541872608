//! Front-panel inputs
//!
//! Four push buttons and a four-way directional pad, all wired active-low
//! against the internal pull-up. No debouncing happens here.

use embedded_hal::digital::{ErrorType, InputPin};

/// Push buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    /// Button 1
    B1,
    /// Button 2
    B2,
    /// Button 3
    B3,
    /// Button 4
    B4,
}

impl Button {
    /// All buttons in wiring order.
    pub const ALL: [Self; 4] = [Self::B1, Self::B2, Self::B3, Self::B4];
}

/// Directional pad inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Cursor left
    Left,
    /// Cursor right
    Right,
    /// Cursor up
    Up,
    /// Cursor down
    Down,
}

impl Direction {
    /// All directions in wiring order.
    pub const ALL: [Self; 4] = [Self::Left, Self::Right, Self::Up, Self::Down];
}

/// An input that reads low while pressed.
///
/// Wraps any `embedded-hal` input pin configured with a pull-up.
#[derive(Debug)]
pub struct ActiveLow<P> {
    pin: P,
}

impl<P: InputPin> ActiveLow<P> {
    /// Wrap a pulled-up input pin.
    pub fn new(pin: P) -> Self {
        Self { pin }
    }

    /// `true` while the contact is closed (pin pulled to ground).
    pub fn is_pressed(&mut self) -> Result<bool, <P as ErrorType>::Error> {
        self.pin.is_low()
    }

    /// `true` while the contact is open (pin held high by the pull-up).
    pub fn is_released(&mut self) -> Result<bool, <P as ErrorType>::Error> {
        self.pin.is_high()
    }

    /// Give the pin back.
    pub fn into_inner(self) -> P {
        self.pin
    }
}
