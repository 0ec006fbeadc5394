//! The three DSU response encoders.
//!
//! Each returns a fixed-size, checksum-stamped byte buffer ready for
//! `send_to`. Layouts follow the cemuhook wire contract byte for byte;
//! deployed clients reject anything else.

use crate::constants::*;
use crate::packet::PacketWriter;
use crate::sample::InputSample;

/// 22-byte reply to a protocol-information request.
pub fn protocol_information() -> [u8; PROTOCOL_INFORMATION_LEN] {
    let mut w = PacketWriter::new();
    w.put_u32(MSG_PROTOCOL_INFORMATION);
    w.put_u16(PROTOCOL_VERSION);
    w.finish()
}

/// 32-byte reply describing one slot. `connected` is true only for slot 0,
/// the slot backed by the physical gamepad; slots 1-3 always report the
/// all-zero disconnected variant.
pub fn controller_information(slot: u8, connected: bool) -> [u8; CONTROLLER_INFORMATION_LEN] {
    let mut w = PacketWriter::new();
    w.put_u32(MSG_CONTROLLER_INFORMATION);
    write_slot_identity(&mut w, slot, connected);
    w.put_u8(0x00); // termination byte
    w.finish()
}

/// 100-byte controller-data packet. `sample` is `None` for slots without a
/// physical backing; everything past the packet counter is then zero and
/// the connected flag reports dead data.
pub fn controller_data(
    slot: u8,
    sample: Option<&InputSample>,
    packet_count: u32,
) -> [u8; CONTROLLER_DATA_LEN] {
    let mut w = PacketWriter::new();
    w.put_u32(MSG_CONTROLLER_DATA);
    write_slot_identity(&mut w, slot, sample.is_some());
    w.put_u8(if sample.is_some() { 0x01 } else { 0x00 });
    w.put_u32(packet_count);

    let Some(sample) = sample else {
        w.skip(64);
        return w.finish();
    };

    w.put_u8((sample.held & 0xFF) as u8); // D-pad, Options, R3, L3, Share
    w.put_u8((sample.held >> 8) as u8); // Y, B, A, X, R1, L1, R2, L2
    w.skip(2); // PS button, touch button (unused)

    w.put_u8(stick_byte(sample.left_stick.0));
    w.put_u8(stick_byte(sample.left_stick.1));
    w.put_u8(stick_byte(sample.right_stick.0));
    w.put_u8(stick_byte(sample.right_stick.1));

    // Digital buttons re-expressed as analog pressure, fixed order.
    use button_bits::*;
    for bit in [DPAD_LEFT, DPAD_DOWN, DPAD_RIGHT, DPAD_UP, Y, B, A, X, R1, L1, R2, L2] {
        w.put_u8(pressure(sample.held, bit));
    }

    // First touch point; the second slot is never populated.
    match sample.touch {
        Some(touch) => {
            w.put_u8(0x01);
            w.put_u8(touch.id);
            w.put_u16(touch.x);
            w.put_u16(touch.y);
        }
        None => w.skip(6),
    }
    w.skip(6);

    w.put_u64(sample.timestamp_us);

    // Device-to-protocol axis remap: accelerometer X and Z flip sign, gyro
    // pitch and yaw flip sign, and gyro scales from turns to degrees/sec.
    // Clients calibrate against exactly this mapping.
    w.put_f32(-sample.accel[0]);
    w.put_f32(sample.accel[1]);
    w.put_f32(-sample.accel[2]);
    w.put_f32(-sample.gyro[0] * GYRO_DEGREES_PER_TURN);
    w.put_f32(-sample.gyro[1] * GYRO_DEGREES_PER_TURN);
    w.put_f32(sample.gyro[2] * GYRO_DEGREES_PER_TURN);

    w.finish()
}

/// Shared slot/state/model/connection/identifier/battery block used by both
/// controller-information and controller-data payloads.
fn write_slot_identity<const N: usize>(w: &mut PacketWriter<N>, slot: u8, connected: bool) {
    w.put_u8(slot);
    if connected {
        w.put_u8(STATE_CONNECTED);
        w.put_u8(MODEL_FULL_GYRO);
        w.put_u8(CONNECTION_BLUETOOTH);
        w.put_bytes(&PAD_MAC);
        w.put_u8(BATTERY_FULL);
    } else {
        w.put_u8(STATE_DISCONNECTED);
        w.skip(2); // model, connection not applicable
        w.skip(6); // no identifier
        w.put_u8(0x00); // no battery
    }
}

/// Map a -1.0..1.0 stick axis onto the wire's 0..255 range, neutral at 127.
fn stick_byte(value: f32) -> u8 {
    (value * 128.0 + 127.0).round().clamp(0.0, 255.0) as u8
}

fn pressure(held: u16, bit: u16) -> u8 {
    if held & bit != 0 { 0xFF } else { 0x00 }
}
