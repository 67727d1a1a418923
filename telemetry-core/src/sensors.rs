//! Sensor seam: the trait the sampling loop reads through, plus the on-chip
//! temperature calibration.

use core::future::Future;

use telemetry_proto::ButtonState;

/// Async trait for the board's physical inputs.
///
/// This abstracts the raw reads (GPIO buttons, ADC joystick axes, ADC
/// temperature channel) so the sample store can be exercised on the host.
/// Raw reads are assumed to always produce *some* value; a temperature
/// implementation signals a failed read by returning NaN.
///
/// # `no_std` Compatibility
///
/// All implementations must be `#![no_std]` compatible with no heap
/// allocation.
pub trait Sensors {
    /// Read both push buttons, already decoded to logical pressed/released.
    fn read_buttons(&mut self) -> impl Future<Output = (ButtonState, ButtonState)>;

    /// Read the raw joystick axis samples `(x, y)`.
    fn read_joystick(&mut self) -> impl Future<Output = (u16, u16)>;

    /// Read the temperature in degrees Celsius; NaN means the read failed.
    fn read_temperature(&mut self) -> impl Future<Output = f32>;
}

/// Convert a raw 12-bit sample of the on-chip temperature sensor to degrees
/// Celsius.
///
/// The sensor reads 0.706 V at 27 °C with a slope of -1.721 mV/°C against a
/// 3.3 V reference.
#[must_use]
pub fn temperature_from_adc(raw: u16) -> f32 {
    let voltage = f32::from(raw) * 3.3 / 4095.0;
    27.0 - (voltage - 0.706) / 0.001721
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calibration_reference_point() {
        // 0.706 V (raw ~876) is the sensor's 27 degree reference.
        let t = temperature_from_adc(876);
        assert!((t - 27.0).abs() < 0.1, "{t}");
    }

    #[test]
    fn test_calibration_slope_is_negative() {
        // Higher voltage means lower temperature on this sensor.
        assert!(temperature_from_adc(1000) < temperature_from_adc(900));
    }

    #[test]
    fn test_calibration_is_finite_over_full_range() {
        for raw in [0u16, 1, 876, 2048, 4095] {
            assert!(temperature_from_adc(raw).is_finite());
        }
    }
}
