mod decoder;
mod error;
mod fix;
mod sentence;

pub use decoder::GnssDecoder;
pub use error::GnssError;
pub use fix::Fix;
pub use sentence::SentenceBuffer;

// ESP32-specific modules
#[cfg(feature = "esp32")]
pub mod driver;

/// Non-blocking byte stream from the GPS receiver.
pub trait SerialSource {
    /// Copies whatever is already buffered into `buffer` and returns the count.
    ///
    /// Returns 0 when nothing is pending; never waits for more input.
    fn read_available(&mut self, buffer: &mut [u8]) -> usize;
}
