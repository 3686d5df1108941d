//! APRS position-report encoding
//!
//! Converts raw receiver coordinates into the fixed-width APRS text fields
//! and assembles the complete position report for transmission.

pub mod coordinate;
pub mod message;

pub use coordinate::{format_latitude, format_longitude, CoordinateError, RawCoordinate};
pub use message::PositionReport;
