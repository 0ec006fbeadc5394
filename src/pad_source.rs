use crate::config::AppConfig;
use crate::pad_state::PadState;
use crate::sample::InputSample;
use gilrs::{Axis, EventType, GamepadId, Gilrs};

/// Per-axis tuning taken from the application config.
#[derive(Debug, Clone, Copy)]
pub struct AxisTuning {
    pub deadzone_lstick: f32,
    pub deadzone_rstick: f32,
    pub invert_lx: bool,
    pub invert_ly: bool,
    pub invert_rx: bool,
    pub invert_ry: bool,
}

impl From<&AppConfig> for AxisTuning {
    fn from(cfg: &AppConfig) -> Self {
        Self {
            deadzone_lstick: cfg.deadzone_lstick,
            deadzone_rstick: cfg.deadzone_rstick,
            invert_lx: cfg.invert_lx,
            invert_ly: cfg.invert_ly,
            invert_rx: cfg.invert_rx,
            invert_ry: cfg.invert_ry,
        }
    }
}

/// Gamepad acquisition collaborator: drains pending gilrs events each tick
/// and snapshots the accumulated state as an `InputSample`.
///
/// Desktop gamepads expose no motion sensors or touch surface through
/// gilrs, so those sample fields stay at zero.
pub struct PadSource {
    gilrs: Gilrs,
    active_id: GamepadId,
    tuning: AxisTuning,
    state: PadState,
}

impl PadSource {
    /// Pick the first connected gamepad. `None` if there is none; the
    /// caller then serves neutral samples instead.
    pub fn discover(tuning: AxisTuning) -> Option<Self> {
        let gilrs = match Gilrs::new() {
            Ok(g) => g,
            Err(e) => {
                log::warn!("gamepad backend unavailable: {e}");
                return None;
            }
        };

        let (active_id, gamepad) = gilrs.gamepads().next()?;
        log::info!("using gamepad '{}' (id {:?})", gamepad.name(), active_id);

        Some(Self {
            gilrs,
            active_id,
            tuning,
            state: PadState::new(),
        })
    }

    fn axis_inverted(&self, axis: Axis) -> bool {
        match axis {
            Axis::LeftStickX => self.tuning.invert_lx,
            Axis::LeftStickY => self.tuning.invert_ly,
            Axis::RightStickX => self.tuning.invert_rx,
            Axis::RightStickY => self.tuning.invert_ry,
            _ => false,
        }
    }

    fn deadzone(&self, axis: Axis) -> f32 {
        match axis {
            Axis::LeftStickX | Axis::LeftStickY => self.tuning.deadzone_lstick,
            Axis::RightStickX | Axis::RightStickY => self.tuning.deadzone_rstick,
            _ => 0.0,
        }
    }

    /// Drain pending events without blocking and return the current state
    /// stamped with the caller's clock.
    pub fn sample(&mut self, now_us: u64) -> InputSample {
        while let Some(evt) = self.gilrs.next_event() {
            if evt.id != self.active_id {
                continue;
            }
            match evt.event {
                EventType::AxisChanged(axis, value, _) => {
                    let deadzone = self.deadzone(axis);
                    let inverted = self.axis_inverted(axis);
                    self.state.apply_axis(axis, value, inverted, deadzone);
                }
                EventType::ButtonPressed(btn, _) => self.state.apply_button(btn, true),
                EventType::ButtonReleased(btn, _) => self.state.apply_button(btn, false),
                EventType::Disconnected => {
                    log::warn!("gamepad {:?} disconnected", evt.id);
                    self.state = PadState::new();
                }
                _ => {}
            }
        }

        InputSample {
            held: self.state.held,
            left_stick: (self.state.lx, self.state.ly),
            right_stick: (self.state.rx, self.state.ry),
            accel: [0.0; 3],
            gyro: [0.0; 3],
            touch: None,
            timestamp_us: now_us,
        }
    }
}
