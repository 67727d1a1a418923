//! SampleStore: the latest snapshot of every sensor.

use telemetry_proto::{Direction, SensorSnapshot, TempReading};

use crate::sensors::Sensors;

/// Holds the most recent [`SensorSnapshot`], overwritten in place on every
/// sampling cycle. No history is kept.
///
/// Single writer (the sampling loop), single reader (the payload builder),
/// both on the same cooperative executor, so no synchronization is needed
/// around the store itself.
#[derive(Debug, Default)]
pub struct SampleStore {
    snapshot: SensorSnapshot,
}

impl SampleStore {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            snapshot: SensorSnapshot::empty(),
        }
    }

    /// The latest snapshot.
    #[inline]
    #[must_use]
    pub fn snapshot(&self) -> &SensorSnapshot {
        &self.snapshot
    }

    /// Query every sensor and overwrite the whole snapshot.
    ///
    /// A NaN temperature is absorbed as [`TempReading::ReadError`] rather
    /// than propagated; the joystick direction is derived from the fresh
    /// axis samples.
    pub async fn capture<S: Sensors>(&mut self, sensors: &mut S) {
        let (button1, button2) = sensors.read_buttons().await;
        let (x, y) = sensors.read_joystick().await;
        let celsius = sensors.read_temperature().await;

        self.snapshot = SensorSnapshot {
            button1,
            button2,
            temperature: TempReading::from_celsius(celsius),
            joystick_x: x,
            joystick_y: y,
            direction: Direction::from_axes(x, y),
        };
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use core::future::Future;
    use core::pin::Pin;
    use core::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};
    use telemetry_proto::ButtonState;

    /// Fixed-value sensors for exercising the store.
    struct MockSensors {
        buttons: (ButtonState, ButtonState),
        joystick: (u16, u16),
        temperature: f32,
    }

    impl Sensors for MockSensors {
        async fn read_buttons(&mut self) -> (ButtonState, ButtonState) {
            self.buttons
        }

        async fn read_joystick(&mut self) -> (u16, u16) {
            self.joystick
        }

        async fn read_temperature(&mut self) -> f32 {
            self.temperature
        }
    }

    // Helper to run a future to completion (simple blocking executor)
    fn block_on<F: Future>(mut f: F) -> F::Output {
        fn noop_raw_waker() -> RawWaker {
            fn noop(_: *const ()) {}
            fn clone(_: *const ()) -> RawWaker {
                noop_raw_waker()
            }
            static VTABLE: RawWakerVTable = RawWakerVTable::new(clone, noop, noop, noop);
            RawWaker::new(core::ptr::null(), &VTABLE)
        }

        let waker = unsafe { Waker::from_raw(noop_raw_waker()) };
        let mut cx = Context::from_waker(&waker);

        // SAFETY: We don't move f after pinning
        let mut f = unsafe { Pin::new_unchecked(&mut f) };

        loop {
            match f.as_mut().poll(&mut cx) {
                Poll::Ready(result) => return result,
                Poll::Pending => {
                    panic!("Mock future returned Pending unexpectedly");
                }
            }
        }
    }

    #[test]
    fn test_capture_overwrites_every_field() {
        let mut store = SampleStore::new();
        let mut sensors = MockSensors {
            buttons: (ButtonState::Pressed, ButtonState::Released),
            joystick: (1800, 3000),
            temperature: 27.35,
        };

        block_on(store.capture(&mut sensors));

        let snap = store.snapshot();
        assert_eq!(snap.button1, ButtonState::Pressed);
        assert_eq!(snap.button2, ButtonState::Released);
        assert_eq!(snap.temperature, TempReading::Celsius(27.35));
        assert_eq!(snap.joystick_x, 1800);
        assert_eq!(snap.joystick_y, 3000);
        assert_eq!(snap.direction, Direction::Northeast);
    }

    #[test]
    fn test_capture_replaces_previous_snapshot() {
        let mut store = SampleStore::new();

        let mut sensors = MockSensors {
            buttons: (ButtonState::Pressed, ButtonState::Pressed),
            joystick: (0, 0),
            temperature: 30.0,
        };
        block_on(store.capture(&mut sensors));
        assert_eq!(store.snapshot().direction, Direction::Southwest);

        sensors.buttons = (ButtonState::Released, ButtonState::Released);
        sensors.joystick = (2000, 2000);
        sensors.temperature = 25.0;
        block_on(store.capture(&mut sensors));

        let snap = store.snapshot();
        assert_eq!(snap.button1, ButtonState::Released);
        assert_eq!(snap.direction, Direction::Center);
        assert_eq!(snap.temperature, TempReading::Celsius(25.0));
    }

    #[test]
    fn test_nan_temperature_becomes_read_error() {
        let mut store = SampleStore::new();
        let mut sensors = MockSensors {
            buttons: (ButtonState::Released, ButtonState::Released),
            joystick: (2000, 2000),
            temperature: f32::NAN,
        };

        block_on(store.capture(&mut sensors));

        assert_eq!(store.snapshot().temperature, TempReading::ReadError);
    }
}
