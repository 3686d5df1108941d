//! Link-layer framing for transmitted beacons
//!
//! Every frame on the air is the fixed 3-byte header (`0x3C` tag followed by
//! the two protocol-version bytes `0xFF 0x01`) and the raw bytes of the
//! encoded APRS message. There is no length prefix and no checksum beyond the
//! radio's own CRC.

use crate::config::link::{FRAME_HEADER, MAX_FRAME_LEN};
use crate::lora::traits::{LoraError, LoraRadio};
use heapless::Vec;

/// One framed packet ready for the radio
pub type Frame = Vec<u8, MAX_FRAME_LEN>;

/// Errors from frame assembly and transmission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendError {
    /// Payload does not fit behind the header
    PayloadTooLong,
    /// The radio rejected or failed the transmission
    Radio(LoraError),
}

impl From<LoraError> for SendError {
    fn from(error: LoraError) -> Self {
        Self::Radio(error)
    }
}

/// Prepend the link header to an encoded message.
pub fn build_frame(payload: &[u8]) -> Result<Frame, SendError> {
    let mut frame = Frame::new();
    frame
        .extend_from_slice(&FRAME_HEADER)
        .map_err(|_| SendError::PayloadTooLong)?;
    frame
        .extend_from_slice(payload)
        .map_err(|_| SendError::PayloadTooLong)?;
    Ok(frame)
}

/// Frame an encoded message and hand it to the radio as one atomic packet.
///
/// Blocks until the transmission completes; the outcome of the send is not
/// verified further (one-way protocol, no acknowledgement).
pub async fn send_frame<R: LoraRadio>(radio: &mut R, payload: &[u8]) -> Result<(), SendError> {
    let frame = build_frame(payload)?;
    radio.transmit(&frame).await?;
    Ok(())
}
