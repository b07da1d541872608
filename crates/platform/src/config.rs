//! Board configuration and constants
//!
//! Central place for the values the rest of the firmware consumes: the
//! logical coordinate ranges of the two deflection axes and the GPIO wiring of
//! the front-panel inputs.

use crate::gpio::GpioNum;
use crate::input::{Button, Direction};

/// Upper bound of the logical X coordinate range.
///
/// Consumed by the coordinate-to-voltage mapping, which lives outside the
/// driver.
pub const AXIS_MAX_X: u32 = 33_000;

/// Upper bound of the logical Y coordinate range.
pub const AXIS_MAX_Y: u32 = 41_000;

/// Wiring of the eight front-panel inputs.
///
/// All inputs are active-low with the internal pull-up enabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PinLayout {
    /// Buttons B1..B4, in [`Button`] order
    pub buttons: [GpioNum; 4],
    /// Directional pad, in [`Direction`] order (left, right, up, down)
    pub directions: [GpioNum; 4],
}

impl PinLayout {
    /// Clock board wiring.
    ///
    /// | Input | GPIO |
    /// |-------|------|
    /// | B1    | 15   |
    /// | B2    | 13   |
    /// | B3    | 12   |
    /// | B4    | 14   |
    /// | Left  | 16   |
    /// | Right | 17   |
    /// | Up    | 18   |
    /// | Down  | 19   |
    pub const STANDARD: Self = Self {
        buttons: [
            GpioNum::from_const(15),
            GpioNum::from_const(13),
            GpioNum::from_const(12),
            GpioNum::from_const(14),
        ],
        directions: [
            GpioNum::from_const(16),
            GpioNum::from_const(17),
            GpioNum::from_const(18),
            GpioNum::from_const(19),
        ],
    };

    /// Alternate devkit wiring (buttons on 21/13/22/14, pad on 2/0/4/5).
    ///
    /// GPIO0 and GPIO2 are strapping pins; keep the pad released at reset.
    pub const ALTERNATE: Self = Self {
        buttons: [
            GpioNum::from_const(21),
            GpioNum::from_const(13),
            GpioNum::from_const(22),
            GpioNum::from_const(14),
        ],
        directions: [
            GpioNum::from_const(2),
            GpioNum::from_const(0),
            GpioNum::from_const(4),
            GpioNum::from_const(5),
        ],
    };

    /// GPIO of a button.
    pub const fn button(&self, button: Button) -> GpioNum {
        match button {
            Button::B1 => self.buttons[0],
            Button::B2 => self.buttons[1],
            Button::B3 => self.buttons[2],
            Button::B4 => self.buttons[3],
        }
    }

    /// GPIO of a directional input.
    pub const fn direction(&self, direction: Direction) -> GpioNum {
        match direction {
            Direction::Left => self.directions[0],
            Direction::Right => self.directions[1],
            Direction::Up => self.directions[2],
            Direction::Down => self.directions[3],
        }
    }

    /// All eight input pins, buttons first.
    pub fn inputs(&self) -> impl Iterator<Item = GpioNum> + '_ {
        self.buttons.iter().chain(self.directions.iter()).copied()
    }
}

impl Default for PinLayout {
    fn default() -> Self {
        Self::STANDARD
    }
}
