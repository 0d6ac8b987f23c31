use core::str;
use core::str::Utf8Error;

const MAX_NMEA_SENTENCE_SIZE: usize = 128;

type Buffer = [u8; MAX_NMEA_SENTENCE_SIZE];

/// Frames a raw NMEA byte stream into complete `$...*HH` sentences.
#[derive(Debug)]
pub struct SentenceBuffer {
    cursor: usize,
    buffer: Buffer,

    state: ParseState,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ParseState {
    /// Waiting for a start-of-sentence marker
    Waiting,

    /// Collecting characters of the sentence
    Collecting,

    /// After `'*'` exactly two hex characters of checksum follow
    InChecksum { count: usize },

    /// Checksum read, waiting for the LF terminator
    Terminating,

    /// The last fed byte completed a sentence
    Complete,
}

impl Default for SentenceBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentenceBuffer {
    pub fn new() -> Self {
        Self {
            cursor: 0,
            buffer: [0; MAX_NMEA_SENTENCE_SIZE],

            state: ParseState::Waiting,
        }
    }

    /// Appends a byte, returning `false` and resetting when the sentence is too long.
    fn push_byte(&mut self, byte: u8) -> bool {
        if self.cursor >= self.buffer.len() {
            self.reset();
            return false;
        }

        self.buffer[self.cursor] = byte;
        self.cursor += 1;
        true
    }

    pub fn as_string(&self) -> Result<&str, Utf8Error> {
        str::from_utf8(&self.buffer[..self.cursor])
    }

    fn start_sentence(&mut self) {
        self.reset();
        self.push_byte(b'$');
        self.state = ParseState::Collecting;
    }

    /// Feeds one byte. Returns the sentence (without line ending) once it is complete.
    ///
    /// Malformed input never produces an error; the buffer resets and waits for
    /// the next `$`.
    pub fn feed(&mut self, byte: u8) -> Option<&str> {
        match self.state {
            ParseState::Waiting | ParseState::Complete => {
                if byte == b'$' {
                    self.start_sentence();
                } else if self.state == ParseState::Complete {
                    self.reset();
                }
            }

            ParseState::Collecting => match byte {
                b'$' => self.start_sentence(),

                b'*' => {
                    if self.push_byte(byte) {
                        self.state = ParseState::InChecksum { count: 0 };
                    }
                }

                // A sentence without checksum is dropped
                b'\r' | b'\n' => self.reset(),

                _ => {
                    self.push_byte(byte);
                }
            },

            ParseState::InChecksum { count } => {
                if !byte.is_ascii_hexdigit() {
                    self.reset();
                } else if self.push_byte(byte) {
                    let new_count = count + 1;
                    self.state = if new_count == 2 {
                        ParseState::Terminating
                    } else {
                        ParseState::InChecksum { count: new_count }
                    };
                }
            }

            ParseState::Terminating => match byte {
                b'\n' => {
                    self.state = ParseState::Complete;
                    return self.as_string().ok();
                }

                b'\r' => {}

                b'$' => self.start_sentence(),

                _ => self.reset(),
            },
        }
        None
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
        self.buffer.fill(0);

        self.state = ParseState::Waiting;
    }
}
