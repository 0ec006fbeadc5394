//! Session state and per-tick orchestration of the DSU engine.
//!
//! One tick does two things, in order: a single non-blocking receive with
//! synchronous replies for information requests, then — independently of
//! whether anything arrived — one streamed controller-data packet if a
//! client asked for data within the last 30 seconds.

use crate::constants::*;
use crate::messages;
use crate::request::{self, Request};
use crate::sample::InputSample;
use std::io;
use std::net::{SocketAddr, UdpSocket};

/// Largest client request (controller-data, 28 bytes) plus slack for
/// foreign traffic that still has to be read off the socket.
const RECV_BUF_LEN: usize = 64;

/// Socket surface the engine drives. The engine never owns, creates, or
/// reconfigures the underlying socket; it only reads and writes.
pub trait Transport {
    /// Non-blocking receive. `Ok(None)` means no datagram was waiting.
    fn try_recv(&mut self, buf: &mut [u8]) -> io::Result<Option<(usize, SocketAddr)>>;

    fn send_to(&mut self, packet: &[u8], target: SocketAddr) -> io::Result<()>;
}

/// The socket must already be in non-blocking mode; `WouldBlock` is the
/// expected idle result, not an error.
impl Transport for UdpSocket {
    fn try_recv(&mut self, buf: &mut [u8]) -> io::Result<Option<(usize, SocketAddr)>> {
        match self.recv_from(buf) {
            Ok((len, addr)) => Ok(Some((len, addr))),
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn send_to(&mut self, packet: &[u8], target: SocketAddr) -> io::Result<()> {
        UdpSocket::send_to(self, packet, target).map(|_| ())
    }
}

/// The most recent client that asked for controller data.
#[derive(Debug, Clone, Copy)]
struct StreamTarget {
    addr: SocketAddr,
    last_request_us: u64,
}

/// DSU protocol engine. All mutable protocol state lives here so that
/// independent instances can coexist and tests can drive it directly.
pub struct DsuServer {
    target: Option<StreamTarget>,
    packet_count: u32,
}

impl DsuServer {
    pub fn new() -> Self {
        Self {
            target: None,
            packet_count: 0,
        }
    }

    /// Run one receive-then-maybe-stream cycle. I/O failures are logged
    /// and skipped; a long-running bridge must not die over one lost
    /// datagram.
    pub fn tick<T: Transport>(&mut self, transport: &mut T, now_us: u64, sample: &InputSample) {
        let mut buf = [0u8; RECV_BUF_LEN];
        match transport.try_recv(&mut buf) {
            Ok(Some((len, sender))) => self.dispatch(transport, &buf[..len], sender, now_us),
            Ok(None) => {}
            Err(e) => log::warn!("receive failed: {e}"),
        }

        self.stream(transport, now_us, sample);
    }

    fn dispatch<T: Transport>(
        &mut self,
        transport: &mut T,
        datagram: &[u8],
        sender: SocketAddr,
        now_us: u64,
    ) {
        // Malformed or foreign datagrams decode to None and are dropped.
        let Some(req) = request::decode(datagram) else {
            return;
        };

        match req {
            Request::ProtocolInformation => {
                send(transport, &messages::protocol_information(), sender);
            }
            Request::ControllerInformation { slots } => {
                for slot in slots {
                    if slot >= SLOT_COUNT {
                        // no such slot, nothing to report
                        continue;
                    }
                    send(transport, &messages::controller_information(slot, slot == 0), sender);
                }
            }
            Request::ControllerData => {
                self.target = Some(StreamTarget {
                    addr: sender,
                    last_request_us: now_us,
                });
            }
        }
    }

    /// Stream slot 0 to the most recent requester until it has been silent
    /// for the timeout window, then forget it.
    fn stream<T: Transport>(&mut self, transport: &mut T, now_us: u64, sample: &InputSample) {
        let Some(target) = self.target else {
            return;
        };

        if now_us.saturating_sub(target.last_request_us) >= DATA_REQUEST_TIMEOUT_US {
            log::info!("client {} timed out, stopping stream", target.addr);
            self.target = None;
            return;
        }

        let packet = messages::controller_data(0, Some(sample), self.packet_count);
        if let Err(e) = transport.send_to(&packet, target.addr) {
            log::warn!("send to {} failed: {e}", target.addr);
            return;
        }
        self.packet_count = self.packet_count.wrapping_add(1);
    }
}

fn send<T: Transport>(transport: &mut T, packet: &[u8], target: SocketAddr) {
    if let Err(e) = transport.send_to(packet, target) {
        log::warn!("send to {target} failed: {e}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use byteorder::{ByteOrder, LittleEndian};
    use std::collections::VecDeque;

    struct MockTransport {
        inbound: VecDeque<(Vec<u8>, SocketAddr)>,
        sent: Vec<(Vec<u8>, SocketAddr)>,
    }

    impl MockTransport {
        fn new() -> Self {
            Self {
                inbound: VecDeque::new(),
                sent: Vec::new(),
            }
        }

        fn push(&mut self, datagram: &[u8], from: SocketAddr) {
            self.inbound.push_back((datagram.to_vec(), from));
        }
    }

    impl Transport for MockTransport {
        fn try_recv(&mut self, buf: &mut [u8]) -> io::Result<Option<(usize, SocketAddr)>> {
            match self.inbound.pop_front() {
                Some((datagram, addr)) => {
                    buf[..datagram.len()].copy_from_slice(&datagram);
                    Ok(Some((datagram.len(), addr)))
                }
                None => Ok(None),
            }
        }

        fn send_to(&mut self, packet: &[u8], target: SocketAddr) -> io::Result<()> {
            self.sent.push((packet.to_vec(), target));
            Ok(())
        }
    }

    fn client() -> SocketAddr {
        "192.0.2.1:26761".parse().unwrap()
    }

    fn request(tag_byte: u8) -> Vec<u8> {
        let mut d = vec![0u8; 17];
        d[0..4].copy_from_slice(b"DSUC");
        d[4] = 0xE9;
        d[5] = 0x03;
        d[16] = tag_byte;
        d
    }

    fn sample(now_us: u64) -> InputSample {
        InputSample::neutral(now_us)
    }

    #[test]
    fn protocol_information_is_answered_synchronously() {
        let mut server = DsuServer::new();
        let mut net = MockTransport::new();
        net.push(&request(0x00), client());

        server.tick(&mut net, 0, &sample(0));

        assert_eq!(net.sent.len(), 1);
        let (pkt, to) = &net.sent[0];
        assert_eq!(*to, client());
        assert_eq!(pkt.len(), 22);
        assert_eq!(&pkt[16..20], &[0x00, 0x00, 0x10, 0x00]);
        assert_eq!(LittleEndian::read_u16(&pkt[20..22]), 1001);
    }

    #[test]
    fn controller_information_answers_each_requested_slot() {
        let mut server = DsuServer::new();
        let mut net = MockTransport::new();

        let mut d = request(0x01);
        d.resize(28, 0);
        d[20] = 4;
        d[24..28].copy_from_slice(&[0, 1, 2, 3]);
        net.push(&d, client());

        server.tick(&mut net, 0, &sample(0));

        assert_eq!(net.sent.len(), 4);
        for (i, (pkt, _)) in net.sent.iter().enumerate() {
            assert_eq!(pkt.len(), 32);
            assert_eq!(pkt[20] as usize, i);
            let expected = if i == 0 { STATE_CONNECTED } else { STATE_DISCONNECTED };
            assert_eq!(pkt[21], expected);
        }
        // only slot 0 carries an identifier and battery level
        assert_eq!(&net.sent[0].0[24..30], &PAD_MAC);
        for (pkt, _) in &net.sent[1..] {
            assert!(pkt[22..31].iter().all(|&b| b == 0));
        }
    }

    #[test]
    fn out_of_range_slots_are_omitted() {
        let mut server = DsuServer::new();
        let mut net = MockTransport::new();

        let mut d = request(0x01);
        d.resize(26, 0);
        d[20] = 2;
        d[24] = 0;
        d[25] = 9;
        net.push(&d, client());

        server.tick(&mut net, 0, &sample(0));
        assert_eq!(net.sent.len(), 1);
        assert_eq!(net.sent[0].0[20], 0);
    }

    #[test]
    fn data_request_starts_streaming() {
        let mut server = DsuServer::new();
        let mut net = MockTransport::new();

        // Nothing streams before a request arrives.
        server.tick(&mut net, 0, &sample(0));
        assert!(net.sent.is_empty());

        net.push(&request(0x02), client());
        server.tick(&mut net, 1_000, &sample(1_000));

        assert_eq!(net.sent.len(), 1);
        let (pkt, to) = &net.sent[0];
        assert_eq!(*to, client());
        assert_eq!(pkt.len(), 100);
        assert_eq!(pkt[31], 0x01); // live data
    }

    #[test]
    fn packet_counter_is_monotonic_across_ticks() {
        let mut server = DsuServer::new();
        let mut net = MockTransport::new();
        net.push(&request(0x02), client());

        for i in 0..5u64 {
            server.tick(&mut net, i * 10_000, &sample(i * 10_000));
        }

        let counts: Vec<u32> = net
            .sent
            .iter()
            .map(|(pkt, _)| LittleEndian::read_u32(&pkt[32..36]))
            .collect();
        assert_eq!(counts, vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn packet_counter_wraps_at_u32_max() {
        let mut server = DsuServer::new();
        server.packet_count = u32::MAX;
        let mut net = MockTransport::new();
        net.push(&request(0x02), client());

        server.tick(&mut net, 0, &sample(0));
        server.tick(&mut net, 10_000, &sample(10_000));

        let counts: Vec<u32> = net
            .sent
            .iter()
            .map(|(pkt, _)| LittleEndian::read_u32(&pkt[32..36]))
            .collect();
        assert_eq!(counts, vec![u32::MAX, 0]);
    }

    #[test]
    fn streaming_stops_after_timeout() {
        let mut server = DsuServer::new();
        let mut net = MockTransport::new();
        net.push(&request(0x02), client());

        server.tick(&mut net, 0, &sample(0)); // records the request
        assert_eq!(net.sent.len(), 1);

        server.tick(&mut net, 29_999_999, &sample(29_999_999));
        assert_eq!(net.sent.len(), 2); // just inside the window

        server.tick(&mut net, 30_000_001, &sample(30_000_001));
        assert_eq!(net.sent.len(), 2); // expired, nothing sent

        // A fresh request resumes the stream.
        net.push(&request(0x02), client());
        server.tick(&mut net, 30_010_000, &sample(30_010_000));
        assert_eq!(net.sent.len(), 3);
    }

    #[test]
    fn renewed_requests_extend_the_window() {
        let mut server = DsuServer::new();
        let mut net = MockTransport::new();

        net.push(&request(0x02), client());
        server.tick(&mut net, 0, &sample(0));

        net.push(&request(0x02), client());
        server.tick(&mut net, 25_000_000, &sample(25_000_000));

        // 50s after the first request but 25s after the second.
        server.tick(&mut net, 50_000_000, &sample(50_000_000));
        assert_eq!(net.sent.len(), 3);
    }

    #[test]
    fn latest_sender_wins() {
        let mut server = DsuServer::new();
        let mut net = MockTransport::new();
        let other: SocketAddr = "192.0.2.2:26761".parse().unwrap();

        net.push(&request(0x02), client());
        server.tick(&mut net, 0, &sample(0));
        net.push(&request(0x02), other);
        server.tick(&mut net, 10_000, &sample(10_000));

        assert_eq!(net.sent.last().unwrap().1, other);
    }

    #[test]
    fn foreign_traffic_changes_nothing() {
        let mut server = DsuServer::new();
        let mut net = MockTransport::new();

        net.push(b"not a dsu packet at all", client());
        server.tick(&mut net, 0, &sample(0));
        net.push(&request(0x7F), client());
        server.tick(&mut net, 10_000, &sample(10_000));

        assert!(net.sent.is_empty());
    }

    #[test]
    fn info_requests_do_not_start_streaming() {
        let mut server = DsuServer::new();
        let mut net = MockTransport::new();

        net.push(&request(0x00), client());
        server.tick(&mut net, 0, &sample(0));
        net.sent.clear();

        server.tick(&mut net, 10_000, &sample(10_000));
        assert!(net.sent.is_empty());
    }
}
