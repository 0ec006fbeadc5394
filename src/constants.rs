use std::time::Duration;

// Network
pub const DEFAULT_LISTEN_PORT: u16 = 26760;
pub const TICK_INTERVAL: Duration = Duration::from_millis(10);

// Wire protocol
pub const SERVER_MAGIC: &[u8; 4] = b"DSUS";
pub const CLIENT_MAGIC: &[u8; 4] = b"DSUC";
pub const PROTOCOL_VERSION: u16 = 1001;
pub const HEADER_LEN: usize = 16;
pub const SERVER_ID: [u8; 4] = [0x01, 0x02, 0x03, 0x04];

// Message-type tags, bytes [16..20) of every packet
pub const MSG_PROTOCOL_INFORMATION: u32 = 0x0010_0000;
pub const MSG_CONTROLLER_INFORMATION: u32 = 0x0010_0001;
pub const MSG_CONTROLLER_DATA: u32 = 0x0010_0002;

// Fixed response sizes
pub const PROTOCOL_INFORMATION_LEN: usize = 22;
pub const CONTROLLER_INFORMATION_LEN: usize = 32;
pub const CONTROLLER_DATA_LEN: usize = 100;

// Shortest well-formed request: 16-byte header plus the tag's low byte
pub const MIN_REQUEST_LEN: usize = 17;

// Logical controller slots; only slot 0 has a physical backing
pub const SLOT_COUNT: u8 = 4;

// A client that stops sending ControllerData requests is dropped after 30s
pub const DATA_REQUEST_TIMEOUT_US: u64 = 30_000_000;

// Gyro samples arrive as normalized turn rate, the wire wants degrees/sec
pub const GYRO_DEGREES_PER_TURN: f32 = 360.0;

// Slot 0 identity as reported to clients
pub const PAD_MAC: [u8; 6] = [0x01, 0x00, 0x00, 0x00, 0x00, 0x00];
pub const BATTERY_FULL: u8 = 0x05;

// Slot states
pub const STATE_DISCONNECTED: u8 = 0;
pub const STATE_CONNECTED: u8 = 2;

// Device model
pub const MODEL_FULL_GYRO: u8 = 2;

// Connection type
pub const CONNECTION_BLUETOOTH: u8 = 2;

// DSU digital-button bits. Byte A carries the D-pad and menu/stick-click
// buttons, byte B the face/shoulder/trigger buttons. The assignment is a
// fixed compatibility table shared with every deployed client.
pub mod button_bits {
    // byte A (offset 36 in a controller-data packet)
    pub const SHARE: u16 = 1 << 0;
    pub const L3: u16 = 1 << 1;
    pub const R3: u16 = 1 << 2;
    pub const OPTIONS: u16 = 1 << 3;
    pub const DPAD_UP: u16 = 1 << 4;
    pub const DPAD_RIGHT: u16 = 1 << 5;
    pub const DPAD_DOWN: u16 = 1 << 6;
    pub const DPAD_LEFT: u16 = 1 << 7;

    // byte B (offset 37)
    pub const L2: u16 = 1 << 8;
    pub const R2: u16 = 1 << 9;
    pub const L1: u16 = 1 << 10;
    pub const R1: u16 = 1 << 11;
    pub const X: u16 = 1 << 12;
    pub const A: u16 = 1 << 13;
    pub const B: u16 = 1 << 14;
    pub const Y: u16 = 1 << 15;
}
