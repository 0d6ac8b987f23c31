/// Largest LoRa payload the SX127x can deliver.
pub const MAX_PACKET_SIZE: usize = 255;

/// Holds the most recently received packet and a read cursor into it.
#[derive(Debug)]
pub struct PacketBuffer {
    bytes: [u8; MAX_PACKET_SIZE],
    len: usize,
    cursor: usize,
}

impl Default for PacketBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl PacketBuffer {
    pub const fn new() -> Self {
        Self {
            bytes: [0; MAX_PACKET_SIZE],
            len: 0,
            cursor: 0,
        }
    }

    /// Drops whatever is left of the previous packet and exposes the whole
    /// buffer for the radio to write into.
    pub fn receive_slot(&mut self) -> &mut [u8] {
        self.clear();
        &mut self.bytes
    }

    /// Marks the first `len` bytes written through [`Self::receive_slot`] as the pending packet.
    pub fn commit(&mut self, len: usize) -> usize {
        self.len = len.min(MAX_PACKET_SIZE);
        self.cursor = 0;
        self.len
    }

    /// Replaces the pending packet with a copy of `payload`, truncated to the buffer size.
    pub fn load(&mut self, payload: &[u8]) -> usize {
        let len = payload.len().min(MAX_PACKET_SIZE);
        self.receive_slot()[..len].copy_from_slice(&payload[..len]);
        self.commit(len)
    }

    pub fn next_byte(&mut self) -> Option<u8> {
        if self.cursor < self.len {
            let byte = self.bytes[self.cursor];
            self.cursor += 1;
            Some(byte)
        } else {
            None
        }
    }

    pub fn remaining(&self) -> usize {
        self.len - self.cursor
    }

    pub fn clear(&mut self) {
        self.len = 0;
        self.cursor = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bytes_drain_in_order() {
        let mut packet = PacketBuffer::new();
        assert_eq!(packet.load(b"hi!"), 3);

        assert_eq!(packet.next_byte(), Some(b'h'));
        assert_eq!(packet.remaining(), 2);
        assert_eq!(packet.next_byte(), Some(b'i'));
        assert_eq!(packet.next_byte(), Some(b'!'));
        assert_eq!(packet.next_byte(), None);
    }

    #[test]
    fn test_new_packet_discards_unread_bytes() {
        let mut packet = PacketBuffer::new();
        packet.load(b"first");
        packet.next_byte();

        packet.load(b"2nd");
        assert_eq!(packet.next_byte(), Some(b'2'));
        assert_eq!(packet.remaining(), 2);
    }

    #[test]
    fn test_oversized_payload_is_truncated() {
        let mut packet = PacketBuffer::new();
        let payload = [0xAAu8; MAX_PACKET_SIZE + 10];

        assert_eq!(packet.load(&payload), MAX_PACKET_SIZE);
    }

    #[test]
    fn test_commit_after_receive_slot() {
        let mut packet = PacketBuffer::new();
        let slot = packet.receive_slot();
        slot[..2].copy_from_slice(&[0x01, 0x02]);
        packet.commit(2);

        assert_eq!(packet.next_byte(), Some(0x01));
        assert_eq!(packet.next_byte(), Some(0x02));
        assert_eq!(packet.next_byte(), None);
    }
}
