use core::fmt::Debug;

use defmt::Format;

mod packet;

pub use packet::{PacketBuffer, MAX_PACKET_SIZE};

// ESP32-specific modules
#[cfg(feature = "esp32")]
pub mod driver;

/// Error type for LoRa operations
#[derive(Debug, Format)]
pub enum LoraError {
    /// Radio hardware error
    #[cfg(feature = "esp32")]
    Radio(lora_phy::mod_params::RadioError),
    /// Invalid configuration
    InvalidConfig,
    /// Transmission error
    TransmissionError,
    /// Payload does not fit in a single packet
    PayloadTooLarge,
}

#[cfg(feature = "esp32")]
impl From<lora_phy::mod_params::RadioError> for LoraError {
    fn from(e: lora_phy::mod_params::RadioError) -> Self {
        LoraError::Radio(e)
    }
}

/// Half-duplex packet transceiver.
///
/// Construction is initialization: an implementation that exists is ready to
/// send. Transmission is best effort with no acknowledgement.
#[allow(async_fn_in_trait)]
pub trait RadioLink {
    type Error: Debug + Format;

    /// Sends `payload` as a single packet and waits until it is on air.
    async fn transmit(&mut self, payload: &[u8]) -> Result<(), Self::Error>;

    /// Checks for a fully received packet without waiting for one to arrive.
    ///
    /// Returns the length of the new pending packet, or 0 if nothing came in.
    /// Unread bytes of an earlier packet are discarded.
    async fn poll_incoming(&mut self) -> Result<usize, Self::Error>;

    /// Takes the next byte of the pending packet.
    fn read_byte(&mut self) -> Option<u8>;
}
