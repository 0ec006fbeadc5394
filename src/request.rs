//! Inbound datagram decoding.
//!
//! The listen port sees arbitrary traffic, so anything that is not a
//! well-formed client request decodes to `None` and is dropped without a
//! reply. Only the low byte of the message-type tag selects the request
//! kind; the rest of the tag is not inspected, matching deployed clients.

use crate::constants::{CLIENT_MAGIC, MIN_REQUEST_LEN};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    ProtocolInformation,
    /// Carries the slot indices the client asked about, in request order.
    /// Out-of-range indices are kept here and skipped by the responder.
    ControllerInformation { slots: Vec<u8> },
    /// Any controller-data request means "stream slot 0 to this sender";
    /// the by-slot and by-MAC sub-modes are not distinguished.
    ControllerData,
}

pub fn decode(datagram: &[u8]) -> Option<Request> {
    if datagram.len() < MIN_REQUEST_LEN || &datagram[0..4] != CLIENT_MAGIC {
        return None;
    }

    match datagram[16] {
        0x00 => Some(Request::ProtocolInformation),
        0x01 => {
            // Slot count at offset 20, slot indices from offset 24.
            let count = *datagram.get(20)? as usize;
            let slots = datagram.get(24..24 + count)?.to_vec();
            Some(Request::ControllerInformation { slots })
        }
        0x02 => Some(Request::ControllerData),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(tag_byte: u8) -> Vec<u8> {
        let mut d = vec![0u8; 17];
        d[0..4].copy_from_slice(b"DSUC");
        d[4] = 0xE9; // version 1001
        d[5] = 0x03;
        d[16] = tag_byte;
        d
    }

    #[test]
    fn protocol_information_request() {
        assert_eq!(decode(&request(0x00)), Some(Request::ProtocolInformation));
    }

    #[test]
    fn controller_data_request() {
        assert_eq!(decode(&request(0x02)), Some(Request::ControllerData));
    }

    #[test]
    fn controller_information_request_with_slots() {
        let mut d = request(0x01);
        d.resize(28, 0);
        d[20] = 3;
        d[24] = 0;
        d[25] = 2;
        d[26] = 7;
        assert_eq!(
            decode(&d),
            Some(Request::ControllerInformation {
                slots: vec![0, 2, 7]
            })
        );
    }

    #[test]
    fn truncated_slot_list_is_dropped() {
        let mut d = request(0x01);
        d.resize(25, 0);
        d[20] = 4; // claims four slots, carries one
        assert_eq!(decode(&d), None);
    }

    #[test]
    fn wrong_magic_is_dropped() {
        let mut d = request(0x00);
        d[0..4].copy_from_slice(b"DSUS"); // server-origin marker
        assert_eq!(decode(&d), None);
    }

    #[test]
    fn short_datagram_is_dropped() {
        assert_eq!(decode(b"DSUC"), None);
        assert_eq!(decode(&request(0x00)[..16]), None);
    }

    #[test]
    fn unknown_tag_is_ignored() {
        assert_eq!(decode(&request(0x03)), None);
        assert_eq!(decode(&request(0xFF)), None);
    }
}
