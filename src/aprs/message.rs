//! APRS position report assembly
//!
//! Builds the textual record `CALL>DEST:=LAT{overlay}LON{code}{comment}`:
//! the `=` marker introduces a position report without timestamp, followed by
//! the fixed-width coordinate fields, the symbol selection and the free-text
//! comment. The destination is the fixed product identifier for this tracker.

use core::fmt::Write;
use heapless::String;

use crate::aprs::coordinate::{format_latitude, format_longitude, CoordinateError, RawCoordinate};
use crate::config::{beacon, link};

/// Encoded APRS message text
pub type EncodedMessage = String<{ link::MAX_MESSAGE_LEN }>;

/// Station identity and symbol configuration for outgoing reports.
///
/// Resolved once at startup; `Default` picks up the compile-time constants.
/// The comment is used verbatim; keeping it within the frame budget is a
/// configuration-time responsibility.
#[derive(Debug, Clone, Copy)]
pub struct BeaconConfig {
    pub callsign: &'static str,
    pub destination: &'static str,
    pub symbol_overlay: char,
    pub symbol_code: char,
    pub comment: &'static str,
}

impl Default for BeaconConfig {
    fn default() -> Self {
        Self {
            callsign: beacon::CALLSIGN,
            destination: beacon::DESTINATION,
            symbol_overlay: beacon::SYMBOL_OVERLAY,
            symbol_code: beacon::SYMBOL_CODE,
            comment: beacon::COMMENT,
        }
    }
}

/// Errors from message assembly
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageError {
    /// A coordinate could not be formatted
    Coordinate(CoordinateError),
    /// The encoded message exceeds the frame budget
    TooLong,
}

impl From<CoordinateError> for MessageError {
    fn from(error: CoordinateError) -> Self {
        Self::Coordinate(error)
    }
}

/// One APRS position report, created fresh per beacon.
#[derive(Debug, Clone)]
pub struct PositionReport {
    source: &'static str,
    destination: &'static str,
    body: EncodedMessage,
}

impl PositionReport {
    /// Build a report from a raw position and the station configuration.
    pub fn new(
        config: &BeaconConfig,
        latitude: &RawCoordinate,
        longitude: &RawCoordinate,
    ) -> Result<Self, MessageError> {
        let lat = format_latitude(latitude)?;
        let lon = format_longitude(longitude)?;

        let mut body = EncodedMessage::new();
        write!(
            body,
            "={}{}{}{}{}",
            lat, config.symbol_overlay, lon, config.symbol_code, config.comment
        )
        .map_err(|_| MessageError::TooLong)?;

        Ok(Self {
            source: config.callsign,
            destination: config.destination,
            body,
        })
    }

    /// Message body (everything after the TNC2 header)
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Encode the report as TNC2 monitor text: `SOURCE>DEST:body`.
    pub fn encode(&self) -> Result<EncodedMessage, MessageError> {
        let mut text = EncodedMessage::new();
        write!(text, "{}>{}:{}", self.source, self.destination, self.body)
            .map_err(|_| MessageError::TooLong)?;
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> BeaconConfig {
        BeaconConfig {
            callsign: "OE5BPA-7",
            destination: "APLT0",
            symbol_overlay: '/',
            symbol_code: '>',
            comment: " LoRa Tracker",
        }
    }

    #[test]
    fn test_body_concatenation_order() {
        let lat = RawCoordinate::new(48, 123_400_000, false);
        let lon = RawCoordinate::new(16, 350_000_000, false);
        let report = PositionReport::new(&test_config(), &lat, &lon).unwrap();

        assert_eq!(report.body(), "=4807.40N/01621.00E> LoRa Tracker");
    }

    #[test]
    fn test_encode_tnc2_header() {
        let lat = RawCoordinate::new(48, 123_400_000, false);
        let lon = RawCoordinate::new(16, 350_000_000, true);
        let report = PositionReport::new(&test_config(), &lat, &lon).unwrap();

        let text = report.encode().unwrap();
        assert_eq!(
            text.as_str(),
            "OE5BPA-7>APLT0:=4807.40N/01621.00W> LoRa Tracker"
        );
    }

    #[test]
    fn test_encode_is_repeatable() {
        let lat = RawCoordinate::new(51, 482_000_000, false);
        let lon = RawCoordinate::new(0, 75_000_000, true);
        let report = PositionReport::new(&test_config(), &lat, &lon).unwrap();

        assert_eq!(report.encode().unwrap(), report.encode().unwrap());
    }

    #[test]
    fn test_invalid_coordinate_is_rejected() {
        let lat = RawCoordinate::new(91, 0, false);
        let lon = RawCoordinate::new(16, 0, false);
        let result = PositionReport::new(&test_config(), &lat, &lon);

        assert_eq!(
            result.unwrap_err(),
            MessageError::Coordinate(CoordinateError::DegreesOutOfRange)
        );
    }

    #[test]
    fn test_default_config_uses_constants() {
        let config = BeaconConfig::default();
        assert_eq!(config.destination, "APLT0");
        assert_eq!(config.callsign, crate::config::beacon::CALLSIGN);
    }
}
