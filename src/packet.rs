use crate::constants::*;
use byteorder::{ByteOrder, LittleEndian};
use crc::{CRC_32_ISO_HDLC, Crc};

const CRC32: Crc<u32> = Crc::<u32>::new(&CRC_32_ISO_HDLC);

/// Fixed-size outgoing packet under construction.
///
/// `new()` stamps the 16-byte header skeleton (magic, version, payload
/// length, zeroed checksum, server identifier) and positions the cursor at
/// the first payload byte. Fields are appended little-endian in wire order;
/// `finish()` installs the CRC32 over the whole buffer and freezes it.
///
/// The checksum field at bytes [8..12) stays zero until `finish()`, so the
/// CRC is always computed with the field held at zero, as clients expect.
pub struct PacketWriter<const N: usize> {
    buf: [u8; N],
    pos: usize,
}

impl<const N: usize> PacketWriter<N> {
    pub fn new() -> Self {
        let mut buf = [0u8; N];
        buf[0..4].copy_from_slice(SERVER_MAGIC);
        LittleEndian::write_u16(&mut buf[4..6], PROTOCOL_VERSION);
        buf[6] = (N - HEADER_LEN) as u8;
        buf[7] = 0x00;
        // [8..12) checksum, left zero until finish()
        buf[12..16].copy_from_slice(&SERVER_ID);
        Self {
            buf,
            pos: HEADER_LEN,
        }
    }

    pub fn put_u8(&mut self, v: u8) {
        self.buf[self.pos] = v;
        self.pos += 1;
    }

    pub fn put_u16(&mut self, v: u16) {
        LittleEndian::write_u16(&mut self.buf[self.pos..self.pos + 2], v);
        self.pos += 2;
    }

    pub fn put_u32(&mut self, v: u32) {
        LittleEndian::write_u32(&mut self.buf[self.pos..self.pos + 4], v);
        self.pos += 4;
    }

    pub fn put_u64(&mut self, v: u64) {
        LittleEndian::write_u64(&mut self.buf[self.pos..self.pos + 8], v);
        self.pos += 8;
    }

    pub fn put_f32(&mut self, v: f32) {
        LittleEndian::write_f32(&mut self.buf[self.pos..self.pos + 4], v);
        self.pos += 4;
    }

    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.buf[self.pos..self.pos + bytes.len()].copy_from_slice(bytes);
        self.pos += bytes.len();
    }

    /// Leave `n` bytes at zero and advance the cursor past them.
    pub fn skip(&mut self, n: usize) {
        self.pos += n;
    }

    /// Install the checksum and return the completed packet.
    pub fn finish(mut self) -> [u8; N] {
        debug_assert_eq!(self.pos, N, "payload not fully written");
        let checksum = CRC32.checksum(&self.buf);
        LittleEndian::write_u32(&mut self.buf[8..12], checksum);
        self.buf
    }
}

/// Test helper: CRC32 of `packet` with the checksum field treated as zero,
/// i.e. the value a client recomputes when validating.
#[cfg(test)]
pub fn checksum_of(packet: &[u8]) -> u32 {
    let mut copy = packet.to_vec();
    copy[8..12].fill(0);
    CRC32.checksum(&copy)
}
