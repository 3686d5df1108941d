//! Sentence accumulator for the receiver byte stream
//!
//! Accumulates UART bytes until a complete CR/LF-terminated NMEA sentence is
//! received.

use crate::config::gps::MAX_SENTENCE_LEN;
use heapless::String;

/// Accumulates incoming receiver bytes and extracts complete sentences.
///
/// Sentences are terminated by a line feed; a preceding carriage return is
/// stripped. Bytes that are not printable ASCII reset the buffer, as does an
/// overlong sentence, so noise on the line cannot wedge the accumulator.
pub struct SentenceAccumulator {
    buffer: String<MAX_SENTENCE_LEN>,
}

impl SentenceAccumulator {
    /// Create a new empty accumulator.
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
        }
    }

    /// Push a byte into the accumulator.
    ///
    /// Returns `Some(sentence)` when a complete non-empty sentence is
    /// terminated. Returns `None` if more bytes are needed.
    pub fn push(&mut self, byte: u8) -> Option<String<MAX_SENTENCE_LEN>> {
        match byte {
            b'\n' => {
                if self.buffer.is_empty() {
                    return None;
                }
                let sentence = core::mem::replace(&mut self.buffer, String::new());
                Some(sentence)
            }
            b'\r' => None,
            0x20..=0x7E => {
                if self.buffer.push(byte as char).is_err() {
                    // Overlong sentence, drop it
                    self.buffer.clear();
                }
                None
            }
            _ => {
                // Line noise invalidates the partial sentence
                self.buffer.clear();
                None
            }
        }
    }

    /// Reset the accumulator, discarding any partial sentence.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }

    /// Returns true if no partial sentence is in progress.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Default for SentenceAccumulator {
    fn default() -> Self {
        Self::new()
    }
}
