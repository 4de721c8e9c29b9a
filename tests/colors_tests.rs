//! Integration tests for duty conversion and the colors module

use pca9685_strip::colors::{self, TURQUOISE};
use pca9685_strip::{
    DutyValue, RgbColor, from_duty, to_duty, to_duty_clamped, to_duty_triple,
};

fn close(a: RgbColor, b: RgbColor) -> bool {
    a.red.abs_diff(b.red) <= 1 && a.green.abs_diff(b.green) <= 1 && a.blue.abs_diff(b.blue) <= 1
}

#[test]
fn duty_is_in_range_and_non_increasing() {
    let mut previous = to_duty(0);
    for component in 0..=255u8 {
        let duty = to_duty(component);
        assert!(duty <= DutyValue::MAX);
        assert!(duty <= previous, "duty rose at component {}", component);
        previous = duty;
    }
}

#[test]
fn duty_endpoints_mean_off_and_full_on() {
    assert_eq!(to_duty(0).get(), 4095);
    assert_eq!(to_duty(255).get(), 0);
}

#[test]
fn out_of_range_components_are_clamped() {
    assert_eq!(to_duty_clamped(-40), to_duty(0));
    assert_eq!(to_duty_clamped(300), to_duty(255));
    assert_eq!(to_duty_clamped(77), to_duty(77));
}

#[test]
fn triple_keeps_red_green_blue_order() {
    let duties = to_duty_triple(RgbColor::new(255, 0, 128));
    assert_eq!(duties, [DutyValue::MIN, DutyValue::MAX, to_duty(128)]);
}

#[test]
fn from_duty_reads_back_components() {
    assert_eq!(from_duty(DutyValue::MAX), 0);
    assert_eq!(from_duty(DutyValue::MIN), 255);
    assert_eq!(from_duty(to_duty(200)), 200);
}

#[test]
fn hsv_creates_primary_colors() {
    assert!(close(colors::hsv(0.0, 1.0, 1.0), colors::RED));
    assert!(close(colors::hsv(120.0, 1.0, 1.0), colors::GREEN));
    assert!(close(colors::hsv(240.0, 1.0, 1.0), colors::BLUE));
}

#[test]
fn hsv_handles_saturation_and_value() {
    let gray = colors::hsv(0.0, 0.0, 0.5);
    assert!(close(gray, RgbColor::new(128, 128, 128)));

    let black = colors::hsv(0.0, 1.0, 0.0);
    assert_eq!(black, colors::BLACK);
}

#[test]
fn hue_wraps_around_360() {
    assert!(close(colors::hue(0.0), colors::hue(360.0)));
    assert!(close(colors::hue(180.0), colors::CYAN));
}

#[test]
fn named_colors_keep_their_values() {
    assert_eq!(TURQUOISE, RgbColor::new(64, 224, 208));
    assert_eq!(colors::WHITE, RgbColor::new(255, 255, 255));
}
