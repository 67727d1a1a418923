//! Core sensor types: ButtonState, TempReading, Direction, SensorSnapshot.

/// Joystick axis value below which an axis reads "west" / "south".
pub const AXIS_LOW: u16 = 1500;

/// Joystick axis value above which an axis reads "east" / "north".
pub const AXIS_HIGH: u16 = 2500;

/// State of a single push button.
///
/// The wire labels match the ingest endpoint's schema: `"pressionado"` for
/// pressed, `"solto"` for released.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonState {
    Pressed,
    #[default]
    Released,
}

impl ButtonState {
    /// Build from a logical "is pressed" flag.
    ///
    /// Electrical polarity (the board's buttons are active low) is the
    /// caller's concern; this takes the already-decoded logical state.
    #[inline]
    #[must_use]
    pub const fn from_pressed(pressed: bool) -> Self {
        if pressed {
            Self::Pressed
        } else {
            Self::Released
        }
    }

    /// Wire label used in the JSON payload.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pressed => "pressionado",
            Self::Released => "solto",
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_pressed(self) -> bool {
        matches!(self, Self::Pressed)
    }
}

/// An on-chip temperature reading in degrees Celsius, or a failed read.
///
/// `ReadError` is serialized as the bare sentinel `Erro de leitura` in the
/// JSON payload (unquoted, exactly as the ingest endpoint expects it).
#[derive(Clone, Copy, Default, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TempReading {
    Celsius(f32),
    #[default]
    ReadError,
}

impl TempReading {
    /// Classify a raw Celsius value; NaN means the read failed.
    #[inline]
    #[must_use]
    pub fn from_celsius(value: f32) -> Self {
        if value.is_nan() {
            Self::ReadError
        } else {
            Self::Celsius(value)
        }
    }

    #[inline]
    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(self, Self::ReadError)
    }
}

/// Direction label derived from the joystick's two raw axis samples.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    North,
    South,
    East,
    West,
    Northeast,
    Northwest,
    Southeast,
    Southwest,
    #[default]
    Center,
}

impl Direction {
    /// Map raw axis samples to a direction label.
    ///
    /// Axes use the fixed thresholds [`AXIS_LOW`] and [`AXIS_HIGH`]: below
    /// low is west/south, above high is east/north. Diagonal (both-axis)
    /// conditions are checked before single-axis ones; values strictly
    /// between the thresholds on both axes map to `Center`.
    #[must_use]
    pub const fn from_axes(x: u16, y: u16) -> Self {
        if x < AXIS_LOW && y > AXIS_HIGH {
            Self::Northwest
        } else if x > AXIS_HIGH && y > AXIS_HIGH {
            Self::Northeast
        } else if x < AXIS_LOW && y < AXIS_LOW {
            Self::Southwest
        } else if x > AXIS_HIGH && y < AXIS_LOW {
            Self::Southeast
        } else if x < AXIS_LOW {
            Self::West
        } else if x > AXIS_HIGH {
            Self::East
        } else if y > AXIS_HIGH {
            Self::North
        } else if y < AXIS_LOW {
            Self::South
        } else {
            Self::Center
        }
    }

    /// Wire label used in the JSON payload.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::North => "North",
            Self::South => "South",
            Self::East => "East",
            Self::West => "West",
            Self::Northeast => "Northeast",
            Self::Northwest => "Northwest",
            Self::Southeast => "Southeast",
            Self::Southwest => "Southwest",
            Self::Center => "Center",
        }
    }
}

/// Latest reading of every sensor, overwritten in place each sampling cycle.
///
/// No history is kept; the poster always transmits whatever snapshot is
/// current when its periodic trigger fires.
#[derive(Clone, Copy, Default, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SensorSnapshot {
    pub button1: ButtonState,
    pub button2: ButtonState,
    pub temperature: TempReading,
    /// Raw 12-bit ADC sample, not normalized.
    pub joystick_x: u16,
    /// Raw 12-bit ADC sample, not normalized.
    pub joystick_y: u16,
    pub direction: Direction,
}

impl SensorSnapshot {
    /// Baseline snapshot before the first sampling cycle: both buttons
    /// released, no temperature yet, joystick at origin.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            button1: ButtonState::Released,
            button2: ButtonState::Released,
            temperature: TempReading::ReadError,
            joystick_x: 0,
            joystick_y: 0,
            direction: Direction::Center,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_labels() {
        assert_eq!(ButtonState::Pressed.label(), "pressionado");
        assert_eq!(ButtonState::Released.label(), "solto");
        assert!(ButtonState::from_pressed(true).is_pressed());
        assert!(!ButtonState::from_pressed(false).is_pressed());
    }

    #[test]
    fn test_temp_reading_nan_is_error() {
        assert_eq!(TempReading::from_celsius(f32::NAN), TempReading::ReadError);
        assert_eq!(
            TempReading::from_celsius(27.35),
            TempReading::Celsius(27.35)
        );
    }

    #[test]
    fn test_direction_center_region() {
        // Both axes strictly between the thresholds.
        for (x, y) in [(1501, 1501), (2000, 2000), (2499, 2499), (1501, 2499)] {
            assert_eq!(Direction::from_axes(x, y), Direction::Center, "({x},{y})");
        }
        // Threshold values themselves are not beyond the thresholds.
        assert_eq!(Direction::from_axes(1500, 1500), Direction::Center);
        assert_eq!(Direction::from_axes(2500, 2500), Direction::Center);
    }

    #[test]
    fn test_direction_diagonals_take_priority() {
        assert_eq!(Direction::from_axes(0, 4095), Direction::Northwest);
        assert_eq!(Direction::from_axes(4095, 4095), Direction::Northeast);
        assert_eq!(Direction::from_axes(0, 0), Direction::Southwest);
        assert_eq!(Direction::from_axes(4095, 0), Direction::Southeast);
    }

    #[test]
    fn test_direction_cardinals() {
        assert_eq!(Direction::from_axes(100, 2000), Direction::West);
        assert_eq!(Direction::from_axes(4000, 2000), Direction::East);
        assert_eq!(Direction::from_axes(2000, 4000), Direction::North);
        assert_eq!(Direction::from_axes(2000, 100), Direction::South);
    }

    #[test]
    fn test_snapshot_empty_baseline() {
        let snap = SensorSnapshot::empty();
        assert_eq!(snap.button1, ButtonState::Released);
        assert_eq!(snap.button2, ButtonState::Released);
        assert!(snap.temperature.is_error());
        assert_eq!(snap.direction, Direction::Center);
        assert_eq!(snap, SensorSnapshot::default());
    }
}
