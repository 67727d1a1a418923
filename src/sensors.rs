//! Board sensor access for the Pico W.
//!
//! Implements the [`Sensors`] seam over the board's physical inputs:
//!
//! - Buttons on GPIO 5 and 6, pull-up, active low
//! - Joystick X on GPIO 27 (ADC1), Y on GPIO 26 (ADC0)
//! - The RP2040's on-chip temperature sensor (ADC channel 4)
//!
//! Raw reads always yield a value: a failed axis read degrades to 0 and a
//! failed temperature read to NaN, which the sample store records as a read
//! error and the payload reports as a sentinel.

use embassy_rp::adc::{Adc, Async, Channel};
use embassy_rp::gpio::Input;
use telemetry_core::{temperature_from_adc, ButtonState, Sensors};

/// The Pico W's physical inputs: two buttons, two joystick axes and the
/// on-chip temperature channel, all behind one ADC.
pub struct BoardSensors<'d> {
    button1: Input<'d>,
    button2: Input<'d>,
    adc: Adc<'d, Async>,
    joy_x: Channel<'d>,
    joy_y: Channel<'d>,
    temperature: Channel<'d>,
}

impl<'d> BoardSensors<'d> {
    /// Assemble the sensor bank from already-configured peripherals.
    #[must_use]
    pub fn new(
        button1: Input<'d>,
        button2: Input<'d>,
        adc: Adc<'d, Async>,
        joy_x: Channel<'d>,
        joy_y: Channel<'d>,
        temperature: Channel<'d>,
    ) -> Self {
        Self {
            button1,
            button2,
            adc,
            joy_x,
            joy_y,
            temperature,
        }
    }
}

impl Sensors for BoardSensors<'_> {
    async fn read_buttons(&mut self) -> (ButtonState, ButtonState) {
        // Active low: a pressed button pulls the line to ground.
        (
            ButtonState::from_pressed(self.button1.is_low()),
            ButtonState::from_pressed(self.button2.is_low()),
        )
    }

    async fn read_joystick(&mut self) -> (u16, u16) {
        let x = self.adc.read(&mut self.joy_x).await.unwrap_or(0);
        let y = self.adc.read(&mut self.joy_y).await.unwrap_or(0);
        (x, y)
    }

    async fn read_temperature(&mut self) -> f32 {
        match self.adc.read(&mut self.temperature).await {
            Ok(raw) => temperature_from_adc(raw),
            Err(_) => f32::NAN,
        }
    }
}
