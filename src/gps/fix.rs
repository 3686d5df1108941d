//! Per-iteration snapshot of the navigation fix

use crate::aprs::coordinate::RawCoordinate;

/// Calendar date and time-of-day reported by the receiver (UTC).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FixDateTime {
    pub year: u16,
    pub month: u8,
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

/// Read-only view of the receiver state for one control-loop iteration.
///
/// The `*_updated` flags indicate the corresponding fields changed since the
/// previous snapshot (freshness), which is distinct from validity: a fix can
/// be valid but not newly updated.
#[derive(Debug, Clone, Copy)]
pub struct GpsSnapshot {
    /// Location fields carry a usable fix
    pub location_valid: bool,
    /// Location changed since the last snapshot
    pub location_updated: bool,
    /// Date/time fields carry a usable value
    pub time_valid: bool,
    /// Date/time changed since the last snapshot
    pub time_updated: bool,
    pub latitude: RawCoordinate,
    pub longitude: RawCoordinate,
    pub datetime: FixDateTime,
    /// Satellites used in the fix
    pub satellites: u8,
    /// Horizontal dilution of precision
    pub hdop: f32,
    /// Total receiver bytes consumed since startup (activity watchdog input)
    pub receiver_bytes: u32,
}

impl Default for GpsSnapshot {
    fn default() -> Self {
        Self {
            location_valid: false,
            location_updated: false,
            time_valid: false,
            time_updated: false,
            latitude: RawCoordinate::new(0, 0, false),
            longitude: RawCoordinate::new(0, 0, false),
            datetime: FixDateTime::default(),
            satellites: 0,
            hdop: 0.0,
            receiver_bytes: 0,
        }
    }
}
