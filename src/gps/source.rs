//! NMEA fix source for the embedded build
//!
//! Feeds receiver UART bytes through the sentence accumulator into the
//! `nmea` parser and produces the per-iteration [`GpsSnapshot`] the tracker
//! consumes. The freshness flags are derived here by comparing against the
//! previously snapshotted values.

use chrono::{Datelike, Timelike};
use nmea::Nmea;

use crate::aprs::coordinate::RawCoordinate;
use crate::gps::fix::{FixDateTime, GpsSnapshot};
use crate::gps::sentence::SentenceAccumulator;

/// Receiver adapter turning the raw byte stream into fix snapshots.
pub struct NmeaFixSource {
    parser: Nmea,
    accumulator: SentenceAccumulator,
    bytes_seen: u32,
    last_location: Option<(f64, f64)>,
    last_datetime: Option<FixDateTime>,
}

impl NmeaFixSource {
    pub fn new() -> Self {
        Self {
            parser: Nmea::default(),
            accumulator: SentenceAccumulator::new(),
            bytes_seen: 0,
            last_location: None,
            last_datetime: None,
        }
    }

    /// Consume one receiver byte. Unparseable sentences are dropped.
    pub fn feed(&mut self, byte: u8) {
        self.bytes_seen = self.bytes_seen.wrapping_add(1);
        if let Some(sentence) = self.accumulator.push(byte) {
            let _ = self.parser.parse(&sentence);
        }
    }

    /// Produce the snapshot for this iteration and mark the current values
    /// as read, so the `*_updated` flags reflect changes since the last call.
    pub fn snapshot(&mut self) -> GpsSnapshot {
        let location = match (self.parser.latitude, self.parser.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        };
        let datetime = match (self.parser.fix_date, self.parser.fix_time) {
            (Some(date), Some(time)) => Some(FixDateTime {
                year: date.year() as u16,
                month: date.month() as u8,
                day: date.day() as u8,
                hour: time.hour() as u8,
                minute: time.minute() as u8,
                second: time.second() as u8,
            }),
            _ => None,
        };

        let location_updated = location.is_some() && location != self.last_location;
        let time_updated = datetime.is_some() && datetime != self.last_datetime;
        if location.is_some() {
            self.last_location = location;
        }
        if datetime.is_some() {
            self.last_datetime = datetime;
        }

        let (lat, lon) = location.unwrap_or((0.0, 0.0));

        GpsSnapshot {
            location_valid: location.is_some(),
            location_updated,
            time_valid: datetime.is_some(),
            time_updated,
            latitude: RawCoordinate::from_decimal_degrees(lat),
            longitude: RawCoordinate::from_decimal_degrees(lon),
            datetime: datetime.unwrap_or_default(),
            satellites: self
                .parser
                .num_of_fix_satellites
                .unwrap_or(0)
                .min(u8::MAX as u32) as u8,
            hdop: self.parser.hdop.unwrap_or(0.0),
            receiver_bytes: self.bytes_seen,
        }
    }
}

impl Default for NmeaFixSource {
    fn default() -> Self {
        Self::new()
    }
}
