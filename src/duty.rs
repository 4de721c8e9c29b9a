//! Conversion between 8-bit color components and inverted driver duty values.

use crate::types::{DutyValue, RgbColor};

const COMPONENT_MAX: u32 = 255;
const DUTY_MAX: u32 = DutyValue::MAX.get() as u32;

/// Converts one 0-255 color component to its duty value.
///
/// Computes `round(4095 - component / 255 * 4095)`, so `0` maps to 4095
/// (off) and `255` maps to 0 (full on).
#[inline]
pub fn to_duty(component: u8) -> DutyValue {
    let scaled = (u32::from(component) * DUTY_MAX + COMPONENT_MAX / 2) / COMPONENT_MAX;
    DutyValue::new((DUTY_MAX - scaled) as u16)
}

/// Like [`to_duty`], clamping out-of-range input to 0-255 first.
#[inline]
pub fn to_duty_clamped(component: i32) -> DutyValue {
    to_duty(component.clamp(0, COMPONENT_MAX as i32) as u8)
}

/// Converts a color to duty values in red, green, blue order.
#[inline]
pub fn to_duty_triple(color: RgbColor) -> [DutyValue; 3] {
    [
        to_duty(color.red),
        to_duty(color.green),
        to_duty(color.blue),
    ]
}

/// Recovers the nearest color component for a duty value.
#[inline]
pub fn from_duty(duty: DutyValue) -> u8 {
    let lit = DUTY_MAX - u32::from(duty.get());
    ((lit * COMPONENT_MAX + DUTY_MAX / 2) / DUTY_MAX) as u8
}
