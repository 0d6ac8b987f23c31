use core::fmt::Write;
use core::str;

use defmt::Format;
use heapless::{String, Vec};

use crate::lora::MAX_PACKET_SIZE;

/// Room for the longest identifier plus worst-case coordinates and speed.
const MESSAGE_CAPACITY: usize = 96;

/// Heading is not computed; every message reports north.
const DIRECTION: &str = "N";

#[derive(Debug, Clone, PartialEq, Format)]
pub enum MessageError {
    /// The formatted line does not fit in the message buffer
    Overflow,
}

/// Outbound status line:
/// `ID:<id>,LAT:<lat>,LON:<lon>,SPEED:<speed>,DIR:N`
///
/// Coordinates carry 4 fractional digits and speed 2. Rounding is the
/// `core::fmt` rule: nearest decimal of the exact binary value, ties to even.
#[derive(Debug, Clone, PartialEq, Format)]
pub struct StatusMessage {
    text: String<MESSAGE_CAPACITY>,
}

impl StatusMessage {
    pub fn new(
        vehicle_id: &str,
        latitude: f64,
        longitude: f64,
        speed: f64,
    ) -> Result<Self, MessageError> {
        let mut text = String::new();
        write!(
            &mut text,
            "ID:{},LAT:{:.4},LON:{:.4},SPEED:{:.2},DIR:{}",
            vehicle_id, latitude, longitude, speed, DIRECTION
        )
        .map_err(|_| MessageError::Overflow)?;

        Ok(Self { text })
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.text.as_bytes()
    }
}

/// Raw contents of one received packet. No structure is assumed.
#[derive(Debug, Clone, PartialEq, Default, Format)]
pub struct InboundPacket {
    bytes: Vec<u8, MAX_PACKET_SIZE>,
}

impl InboundPacket {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a byte, returning `false` once the packet is full.
    pub fn push(&mut self, byte: u8) -> bool {
        self.bytes.push(byte).is_ok()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The payload as text, if it is valid UTF-8.
    pub fn as_text(&self) -> Option<&str> {
        str::from_utf8(&self.bytes).ok()
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}
