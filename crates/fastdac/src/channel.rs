//! DAC output channels

use platform::{ChannelError, GpioNum};

use crate::registers::{
    RTC_IO_PAD_DAC1_REG, RTC_IO_PAD_DAC2_REG, SENS_DAC_CW_EN1, SENS_DAC_CW_EN2,
};

/// One of the two 8-bit DAC outputs.
///
/// On the clock, channel 1 drives the X deflection and channel 2 the Y
/// deflection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    /// DAC1 on GPIO25
    One,
    /// DAC2 on GPIO26
    Two,
}

impl Channel {
    /// Both channels, in hardware order.
    pub const ALL: [Self; 2] = [Self::One, Self::Two];

    /// Channel number as printed in the datasheet (1 or 2).
    pub const fn number(self) -> u8 {
        match self {
            Self::One => 1,
            Self::Two => 2,
        }
    }

    /// GPIO the channel is bonded to.
    pub const fn gpio(self) -> GpioNum {
        match self {
            Self::One => GpioNum::from_const(25),
            Self::Two => GpioNum::from_const(26),
        }
    }

    /// Address of the channel's `RTC_IO_PAD_DACn` register.
    pub const fn pad_register(self) -> u32 {
        match self {
            Self::One => RTC_IO_PAD_DAC1_REG,
            Self::Two => RTC_IO_PAD_DAC2_REG,
        }
    }

    /// The channel's cosine-generator routing bit in `SENS_SAR_DAC_CTRL2`.
    pub const fn tone_enable_bit(self) -> u32 {
        match self {
            Self::One => SENS_DAC_CW_EN1,
            Self::Two => SENS_DAC_CW_EN2,
        }
    }
}

impl TryFrom<u8> for Channel {
    type Error = ChannelError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::One),
            2 => Ok(Self::Two),
            other => Err(ChannelError::InvalidChannel(other)),
        }
    }
}

impl From<Channel> for u8 {
    fn from(channel: Channel) -> Self {
        channel.number()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_from_number() {
        assert_eq!(Channel::try_from(1), Ok(Channel::One));
        assert_eq!(Channel::try_from(2), Ok(Channel::Two));
    }

    #[test]
    fn test_invalid_channel_numbers() {
        for n in [0u8, 3, 255] {
            assert_eq!(Channel::try_from(n), Err(ChannelError::InvalidChannel(n)));
        }
    }

    #[test]
    fn test_channel_pins_and_registers() {
        assert_eq!(Channel::One.gpio().number(), 25);
        assert_eq!(Channel::Two.gpio().number(), 26);
        assert_eq!(Channel::One.pad_register(), 0x3FF4_8484);
        assert_eq!(Channel::Two.pad_register(), 0x3FF4_8488);
    }

    #[test]
    fn test_number_round_trip() {
        for channel in Channel::ALL {
            assert_eq!(Channel::try_from(u8::from(channel)), Ok(channel));
        }
    }
}
