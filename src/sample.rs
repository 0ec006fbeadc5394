/// One touch point on the controller's touch surface, in device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TouchPoint {
    pub id: u8,
    pub x: u16,
    pub y: u16,
}

/// Snapshot of one controller's state at a point in time.
///
/// Produced once per tick by the input acquisition side; the protocol
/// engine only reads it for the duration of one encode call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InputSample {
    /// Digital buttons in DSU wire layout (see `constants::button_bits`).
    pub held: u16,
    /// Left stick, each axis in -1.0..1.0, positive right/up.
    pub left_stick: (f32, f32),
    /// Right stick, same convention.
    pub right_stick: (f32, f32),
    /// Accelerometer in g, device axes (remapped to wire axes at encode).
    pub accel: [f32; 3],
    /// Gyroscope as normalized turn rate: pitch, yaw, roll.
    pub gyro: [f32; 3],
    pub touch: Option<TouchPoint>,
    /// Capture time in microseconds since an arbitrary epoch.
    pub timestamp_us: u64,
}

impl InputSample {
    /// A released, centered, motionless sample — what clients see when no
    /// physical gamepad is available.
    pub fn neutral(timestamp_us: u64) -> Self {
        Self {
            held: 0,
            left_stick: (0.0, 0.0),
            right_stick: (0.0, 0.0),
            accel: [0.0; 3],
            gyro: [0.0; 3],
            touch: None,
            timestamp_us,
        }
    }
}
