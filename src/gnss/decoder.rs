use nmea::{parse_str, ParseResult};

use super::error::GnssError;
use super::fix::Fix;
use super::sentence::SentenceBuffer;

/// Byte-fed NMEA decoder holding the most recent [`Fix`].
#[derive(Debug, Default)]
pub struct GnssDecoder {
    nmea_buffer: SentenceBuffer,
    fix: Fix,
}

impl GnssDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one raw byte from the receiver.
    ///
    /// When the byte completes a sentence the fix is updated in place.
    /// Malformed or unsupported sentences are absorbed without a trace.
    pub fn feed(&mut self, byte: u8) {
        if let Some(sentence) = self.nmea_buffer.feed(byte) {
            let _ = Self::parse(sentence).and_then(|data| self.fix.apply(&data));
        }
    }

    /// Snapshot of the latest fix. Never blocks.
    pub fn current_fix(&self) -> Fix {
        self.fix
    }

    fn parse(sentence: &str) -> Result<ParseResult, GnssError> {
        parse_str(sentence).map_err(|_| GnssError::ParseError)
    }
}
