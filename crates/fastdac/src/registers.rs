//! ESP32 register map for the DAC and input pads
//!
//! Source: ESP32 Technical Reference Manual, chapters "IO_MUX and GPIO
//! Matrix", "RTC_IO" and "On-Chip Sensors and Analog Signal Processing".
//!
//! # Key constraints
//!
//! ## DAC pad registers hold more than the output value
//! `RTC_IO_PAD_DACn` carries the 8-bit output level in bits \[26:19\] next to
//! the pad's power, mux, pull and sleep configuration. A store of the whole
//! word must carry those other bits unchanged, which is why the driver caches
//! a copy with the level field cleared.
//!
//! ## The cosine generator is summed into the output
//! While `SENS_SW_TONE_EN` or a channel's `SENS_DAC_CW_ENn` bit is set, the
//! built-in tone generator drives the channel instead of the pad register's
//! level field. Clear them before taking over the output.

use platform::Field;

// ---------------------------------------------------------------------------
// SENS: DAC control
// ---------------------------------------------------------------------------

/// SAR/DAC control 1 (base `0x3FF4_8800` + `0x98`)
pub const SENS_SAR_DAC_CTRL1_REG: u32 = 0x3FF4_8898;

/// Global enable of the cosine (tone) generator
pub const SENS_SW_TONE_EN: u32 = 1 << 16;

/// SAR/DAC control 2 (base `0x3FF4_8800` + `0x9C`)
pub const SENS_SAR_DAC_CTRL2_REG: u32 = 0x3FF4_889C;

/// Route the cosine generator to DAC channel 1
pub const SENS_DAC_CW_EN1: u32 = 1 << 24;

/// Route the cosine generator to DAC channel 2
pub const SENS_DAC_CW_EN2: u32 = 1 << 25;

// ---------------------------------------------------------------------------
// RTC_IO: DAC pads (GPIO25, GPIO26)
// ---------------------------------------------------------------------------

/// Pad register of DAC channel 1 / GPIO25 (base `0x3FF4_8400` + `0x84`)
pub const RTC_IO_PAD_DAC1_REG: u32 = 0x3FF4_8484;

/// Pad register of DAC channel 2 / GPIO26 (base `0x3FF4_8400` + `0x88`)
pub const RTC_IO_PAD_DAC2_REG: u32 = 0x3FF4_8488;

/// Output level field, bits \[26:19\]
pub const PDAC_DAC: Field = Field::new(0xFF, 19);

/// Highest output level (≈ VDD3P3_RTC · 255/256)
pub const DAC_FULL_SCALE: u32 = 0xFF;

/// Pad pull-down enable
pub const PDAC_RDE: u32 = 1 << 28;

/// Pad pull-up enable
pub const PDAC_RUE: u32 = 1 << 27;

/// DAC power-up
pub const PDAC_XPD_DAC: u32 = 1 << 18;

/// Route the pad to the RTC domain (1) instead of the digital IO_MUX (0)
pub const PDAC_MUX_SEL: u32 = 1 << 17;

/// Pad input buffer enable
pub const PDAC_FUN_IE: u32 = 1 << 11;

/// Let `PDAC_XPD_DAC` override the SAR controller's power-down
pub const PDAC_DAC_XPD_FORCE: u32 = 1 << 10;

// ---------------------------------------------------------------------------
// RTC_IO: touch pads (pads that share GPIOs with the front-panel inputs)
// ---------------------------------------------------------------------------

/// Touch pad 0 register; touch pad `n` lives at `+ 4 * n` for `n` in 0..=7
pub const RTC_IO_TOUCH_PAD0_REG: u32 = 0x3FF4_8494;

/// Touch pad pull-down enable
pub const TOUCH_PAD_RDE: u32 = 1 << 28;

/// Touch pad pull-up enable
pub const TOUCH_PAD_RUE: u32 = 1 << 27;

/// Route the touch pad to the RTC domain
pub const TOUCH_PAD_MUX_SEL: u32 = 1 << 19;

// ---------------------------------------------------------------------------
// IO_MUX / GPIO
// ---------------------------------------------------------------------------

/// IO_MUX base; each pin's register is at a fixed, non-linear offset
pub const IO_MUX_BASE: u32 = 0x3FF4_9000;

/// Pad function select, bits \[14:12\]
pub const IO_MUX_MCU_SEL: Field = Field::new(0x7, 12);

/// `MCU_SEL` value that connects the pad to the GPIO matrix
pub const PIN_FUNC_GPIO: u32 = 2;

/// Input buffer enable
pub const IO_MUX_FUN_IE: u32 = 1 << 9;

/// Weak pull-up enable
pub const IO_MUX_FUN_WPU: u32 = 1 << 8;

/// Weak pull-down enable
pub const IO_MUX_FUN_WPD: u32 = 1 << 7;

/// Write-1-to-clear output enable for GPIO0..=31
pub const GPIO_ENABLE_W1TC_REG: u32 = 0x3FF4_4028;

/// Write-1-to-clear output enable for GPIO32..=39
pub const GPIO_ENABLE1_W1TC_REG: u32 = 0x3FF4_4034;

/// Offset of a pin's IO_MUX register from [`IO_MUX_BASE`].
///
/// `None` for GPIO numbers the ESP32 does not bond out.
pub const fn io_mux_offset(gpio: u8) -> Option<u32> {
    let offset = match gpio {
        0 => 0x44,
        1 => 0x88,
        2 => 0x40,
        3 => 0x84,
        4 => 0x48,
        5 => 0x6C,
        6 => 0x60,
        7 => 0x64,
        8 => 0x68,
        9 => 0x54,
        10 => 0x58,
        11 => 0x5C,
        12 => 0x34,
        13 => 0x38,
        14 => 0x30,
        15 => 0x3C,
        16 => 0x4C,
        17 => 0x50,
        18 => 0x70,
        19 => 0x74,
        21 => 0x7C,
        22 => 0x80,
        23 => 0x8C,
        25 => 0x24,
        26 => 0x28,
        27 => 0x2C,
        32 => 0x1C,
        33 => 0x20,
        34 => 0x14,
        35 => 0x18,
        36 => 0x04,
        37 => 0x08,
        38 => 0x0C,
        39 => 0x10,
        _ => return None,
    };
    Some(offset)
}

/// Touch pad index of a GPIO, if the GPIO doubles as touch pad 0..=7.
pub const fn touch_pad(gpio: u8) -> Option<u32> {
    match gpio {
        4 => Some(0),
        0 => Some(1),
        2 => Some(2),
        15 => Some(3),
        13 => Some(4),
        12 => Some(5),
        14 => Some(6),
        27 => Some(7),
        _ => None,
    }
}
