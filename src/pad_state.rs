use crate::constants::button_bits;
use gilrs::{Axis, Button};

/// Accumulated gamepad state between ticks: DSU-layout button bitfield plus
/// the four stick axes.
#[derive(Debug, Clone, Copy)]
pub struct PadState {
    pub lx: f32,
    pub ly: f32,
    pub rx: f32,
    pub ry: f32,
    pub held: u16,
}

impl PadState {
    pub fn new() -> Self {
        Self {
            lx: 0.0,
            ly: 0.0,
            rx: 0.0,
            ry: 0.0,
            held: 0,
        }
    }

    /// Apply dead-zone plus optional inversion to one stick axis.
    pub fn apply_axis(&mut self, axis: Axis, value: f32, inverted: bool, deadzone: f32) {
        let in_val = if inverted { -value } else { value };
        let adjusted = if in_val.abs() < deadzone { 0.0 } else { in_val };

        match axis {
            Axis::LeftStickX => self.lx = adjusted,
            Axis::LeftStickY => self.ly = adjusted,
            Axis::RightStickX => self.rx = adjusted,
            Axis::RightStickY => self.ry = adjusted,
            _ => {}
        }
    }

    /// Update the held bitfield for a button press or release.
    pub fn apply_button(&mut self, btn: Button, pressed: bool) {
        use button_bits::*;

        let bit = match btn {
            Button::South => B,
            Button::East => A,
            Button::West => X,
            Button::North => Y,
            Button::DPadUp => DPAD_UP,
            Button::DPadDown => DPAD_DOWN,
            Button::DPadLeft => DPAD_LEFT,
            Button::DPadRight => DPAD_RIGHT,
            Button::Select => SHARE,
            Button::Start | Button::Mode => OPTIONS,
            Button::LeftTrigger => L1,
            Button::RightTrigger => R1,
            Button::LeftTrigger2 => L2,
            Button::RightTrigger2 => R2,
            Button::LeftThumb => L3,
            Button::RightThumb => R3,
            _ => return,
        };

        if pressed {
            self.held |= bit;
        } else {
            self.held &= !bit;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadzone_centers_axis() {
        let mut st = PadState::new();
        st.apply_axis(Axis::LeftStickX, 0.05, false, 0.10);
        assert_eq!(st.lx, 0.0);
        st.apply_axis(Axis::LeftStickX, 0.5, false, 0.10);
        assert_eq!(st.lx, 0.5);
    }

    #[test]
    fn inversion_flips_sign() {
        let mut st = PadState::new();
        st.apply_axis(Axis::RightStickY, 0.8, true, 0.10);
        assert_eq!(st.ry, -0.8);
    }

    #[test]
    fn press_and_release_round_trip() {
        let mut st = PadState::new();
        st.apply_button(Button::East, true);
        st.apply_button(Button::DPadUp, true);
        assert_eq!(st.held, button_bits::A | button_bits::DPAD_UP);

        st.apply_button(Button::East, false);
        assert_eq!(st.held, button_bits::DPAD_UP);
    }
}
