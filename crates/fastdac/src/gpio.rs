//! ESP32 digital input configuration through IO_MUX
//!
//! [`Esp32Gpio`] implements [`PinConfigurator`] on top of a [`RegisterBus`],
//! so the front-panel setup in [`FastDac::initialize`](crate::FastDac::initialize)
//! runs against the real IO_MUX on hardware and against a mock in tests.
//!
//! Configuring a pin as an input:
//! 1. If the pad doubles as a touch pad, hand it back from the RTC domain to
//!    the digital IO_MUX and drop the RTC pulls.
//! 2. Disable the pin's output driver.
//! 3. Select the GPIO function, enable the input buffer and set the pulls.

use platform::{GpioError, GpioNum, PinConfigurator, Pull, RegisterBus};

use crate::registers::{
    io_mux_offset, touch_pad, GPIO_ENABLE1_W1TC_REG, GPIO_ENABLE_W1TC_REG, IO_MUX_BASE,
    IO_MUX_FUN_IE, IO_MUX_FUN_WPD, IO_MUX_FUN_WPU, IO_MUX_MCU_SEL, PIN_FUNC_GPIO,
    RTC_IO_TOUCH_PAD0_REG, TOUCH_PAD_MUX_SEL, TOUCH_PAD_RDE, TOUCH_PAD_RUE,
};

/// GPIOs wired to the SPI flash on every ESP32 module.
const FLASH_PINS: core::ops::RangeInclusive<u8> = 6..=11;

/// First of the input-only GPIOs, which have no pull resistors.
const FIRST_INPUT_ONLY: u8 = 34;

/// Digital input configurator for the ESP32.
#[derive(Debug)]
pub struct Esp32Gpio<R> {
    bus: R,
}

impl<R: RegisterBus> Esp32Gpio<R> {
    /// Wrap a register bus.
    pub fn new(bus: R) -> Self {
        Self { bus }
    }

    /// Give the bus back.
    pub fn into_inner(self) -> R {
        self.bus
    }

    fn validate(pin: GpioNum, pull: Pull) -> Result<u32, GpioError> {
        let n = pin.number();
        if FLASH_PINS.contains(&n) {
            return Err(GpioError::FlashPin(n));
        }
        let offset = io_mux_offset(n).ok_or(GpioError::InvalidPin(n))?;
        if n >= FIRST_INPUT_ONLY && pull != Pull::None {
            return Err(GpioError::NoPullResistor(n));
        }
        Ok(offset)
    }

    fn disable_output(&mut self, n: u8) {
        // Write-1-to-clear: the store affects only this pin's enable bit.
        match n.checked_sub(32) {
            Some(high) => self
                .bus
                .write(GPIO_ENABLE1_W1TC_REG, 1u32.wrapping_shl(u32::from(high))),
            None => self
                .bus
                .write(GPIO_ENABLE_W1TC_REG, 1u32.wrapping_shl(u32::from(n))),
        }
    }
}

impl<R: RegisterBus> PinConfigurator for Esp32Gpio<R> {
    type Error = GpioError;

    fn configure_input(&mut self, pin: GpioNum, pull: Pull) -> Result<(), Self::Error> {
        let offset = Self::validate(pin, pull)?;
        let n = pin.number();

        if let Some(pad) = touch_pad(n) {
            let reg = RTC_IO_TOUCH_PAD0_REG.wrapping_add(pad.wrapping_mul(4));
            self.bus
                .clear_bits(reg, TOUCH_PAD_MUX_SEL | TOUCH_PAD_RUE | TOUCH_PAD_RDE);
        }

        self.disable_output(n);

        self.bus.modify(IO_MUX_BASE.wrapping_add(offset), |v| {
            let v = IO_MUX_MCU_SEL.replace(v, PIN_FUNC_GPIO) | IO_MUX_FUN_IE;
            match pull {
                Pull::Up => (v | IO_MUX_FUN_WPU) & !IO_MUX_FUN_WPD,
                Pull::Down => (v | IO_MUX_FUN_WPD) & !IO_MUX_FUN_WPU,
                Pull::None => v & !(IO_MUX_FUN_WPU | IO_MUX_FUN_WPD),
            }
        });

        debug!("GPIO{} configured as input", n);
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]
mod tests {
    use super::*;
    use platform::mocks::MockRegisters;

    fn io_mux(n: u8) -> u32 {
        IO_MUX_BASE + io_mux_offset(n).unwrap()
    }

    fn configure(n: u8, pull: Pull) -> (MockRegisters, Result<(), GpioError>) {
        let regs = MockRegisters::new();
        let mut gpio = Esp32Gpio::new(regs.clone());
        let result = gpio.configure_input(GpioNum::from_const(n), pull);
        (regs, result)
    }

    #[test]
    fn test_pull_up_input() {
        let (regs, result) = configure(16, Pull::Up);
        assert!(result.is_ok());
        let reg = regs.peek(io_mux(16));
        assert_eq!(IO_MUX_MCU_SEL.extract(reg), PIN_FUNC_GPIO);
        assert_ne!(reg & IO_MUX_FUN_IE, 0);
        assert_ne!(reg & IO_MUX_FUN_WPU, 0);
        assert_eq!(reg & IO_MUX_FUN_WPD, 0);
        assert_eq!(regs.peek(GPIO_ENABLE_W1TC_REG), 1 << 16);
    }

    #[test]
    fn test_pull_down_clears_pull_up() {
        let regs = MockRegisters::new().preset(IO_MUX_BASE + 0x4C, IO_MUX_FUN_WPU);
        let mut gpio = Esp32Gpio::new(regs.clone());
        assert!(gpio
            .configure_input(GpioNum::from_const(16), Pull::Down)
            .is_ok());
        let reg = regs.peek(io_mux(16));
        assert_eq!(reg & (IO_MUX_FUN_WPU | IO_MUX_FUN_WPD), IO_MUX_FUN_WPD);
    }

    #[test]
    fn test_touch_pad_released_from_rtc() {
        let touch3 = RTC_IO_TOUCH_PAD0_REG + 3 * 4;
        let regs = MockRegisters::new().preset(touch3, TOUCH_PAD_MUX_SEL | TOUCH_PAD_RDE | 1);
        let mut gpio = Esp32Gpio::new(regs.clone());
        assert!(gpio.configure_input(GpioNum::from_const(15), Pull::Up).is_ok());
        assert_eq!(regs.peek(touch3), 1);
    }

    #[test]
    fn test_high_gpio_uses_second_enable_register() {
        let (regs, result) = configure(33, Pull::Up);
        assert!(result.is_ok());
        assert_eq!(regs.peek(GPIO_ENABLE1_W1TC_REG), 1 << 1);
        assert_eq!(regs.peek(GPIO_ENABLE_W1TC_REG), 0);
    }

    #[test]
    fn test_input_only_pins_reject_pulls() {
        let (regs, result) = configure(36, Pull::Up);
        assert_eq!(result, Err(GpioError::NoPullResistor(36)));
        assert!(regs.log().is_empty());

        let (_, result) = configure(36, Pull::None);
        assert!(result.is_ok());
    }

    #[test]
    fn test_flash_pins_rejected() {
        for n in 6..=11 {
            let (regs, result) = configure(n, Pull::Up);
            assert_eq!(result, Err(GpioError::FlashPin(n)));
            assert!(regs.log().is_empty());
        }
    }

    #[test]
    fn test_unbonded_pins_rejected() {
        for n in [20u8, 24, 28, 31] {
            let (_, result) = configure(n, Pull::Up);
            assert_eq!(result, Err(GpioError::InvalidPin(n)));
        }
    }

    #[test]
    fn test_other_fields_preserved() {
        // Drive strength bits [11:10] must survive
        let drive = 0b11 << 10;
        let regs = MockRegisters::new().preset(IO_MUX_BASE + 0x74, drive);
        let mut gpio = Esp32Gpio::new(regs.clone());
        assert!(gpio.configure_input(GpioNum::from_const(19), Pull::Up).is_ok());
        assert_eq!(regs.peek(io_mux(19)) & drive, drive);
    }
}
