//! PCA9685 register map and mode bits.

/// Default 7-bit bus address with all address pins low.
pub const DEFAULT_ADDRESS: u8 = 0x40;

pub const MODE1: u8 = 0x00;
pub const MODE2: u8 = 0x01;
pub const LED0_ON_L: u8 = 0x06;
pub const ALL_LED_ON_L: u8 = 0xFA;
pub const PRE_SCALE: u8 = 0xFE;

/// Register stride between consecutive channels.
pub const CHANNEL_STRIDE: u8 = 4;

// MODE1 bits
pub const RESTART: u8 = 0x80;
pub const SLEEP: u8 = 0x10;
pub const ALLCALL: u8 = 0x01;

// MODE2 bits
pub const OUTDRV: u8 = 0x04;

/// Internal oscillator frequency in Hz.
pub const OSCILLATOR_HZ: u32 = 25_000_000;

/// Counter steps per PWM period.
pub const COUNTER_STEPS: u32 = 4096;

/// Hardware limits of the prescale register.
pub const PRESCALE_MIN: u32 = 3;
pub const PRESCALE_MAX: u32 = 255;

/// Mask for 12-bit counter values.
pub const COUNTER_MASK: u16 = 0x0FFF;

/// Oscillator settle time after leaving sleep, in milliseconds.
pub const SETTLE_MS: u32 = 5;

/// Output frequency the chip powers up with (prescale 0x1E).
pub const DEFAULT_FREQUENCY_HZ: u32 = 200;

/// First register of a channel's on/off block.
#[inline]
pub const fn channel_base(channel: u8) -> u8 {
    LED0_ON_L + CHANNEL_STRIDE * channel
}

/// Prescale value for an output frequency, or `None` if the chip can't
/// produce it.
#[inline]
pub const fn prescale_for(hz: u32) -> Option<u8> {
    if hz == 0 {
        return None;
    }
    let divisor = match COUNTER_STEPS.checked_mul(hz) {
        Some(divisor) => divisor,
        None => return None,
    };
    let quotient = OSCILLATOR_HZ / divisor;
    if quotient == 0 {
        return None;
    }
    let prescale = quotient - 1;
    if prescale < PRESCALE_MIN || prescale > PRESCALE_MAX {
        None
    } else {
        Some(prescale as u8)
    }
}

/// Splits a 12-bit counter into its low and high register bytes.
#[inline]
pub const fn split_counter(count: u16) -> [u8; 2] {
    let count = count & COUNTER_MASK;
    [(count & 0xFF) as u8, (count >> 8) as u8]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prescale_matches_datasheet_examples() {
        assert_eq!(prescale_for(60), Some(100));
        assert_eq!(prescale_for(200), Some(29));
        assert_eq!(prescale_for(1000), Some(5));
    }

    #[test]
    fn prescale_rejects_unreachable_frequencies() {
        assert_eq!(prescale_for(0), None);
        assert_eq!(prescale_for(10), None);
        assert_eq!(prescale_for(5000), None);
    }

    #[test]
    fn channel_base_uses_four_register_stride() {
        assert_eq!(channel_base(0), 0x06);
        assert_eq!(channel_base(4), 0x16);
        assert_eq!(channel_base(15), 0x42);
    }

    #[test]
    fn split_counter_masks_to_twelve_bits() {
        assert_eq!(split_counter(4095), [0xFF, 0x0F]);
        assert_eq!(split_counter(0x1234), [0x34, 0x02]);
    }
}
