//! Navigation receiver interface
//!
//! The core never parses the receiver's wire protocol itself; it consumes a
//! [`GpsSnapshot`] produced per control-loop iteration by the platform glue.
//! The embedded build feeds UART bytes through [`SentenceAccumulator`] into
//! the `nmea` parser (see [`source`]).

pub mod clock;
pub mod fix;
pub mod sentence;

#[cfg(feature = "embedded")]
pub mod source;

pub use clock::{GpsClock, UnixTime};
pub use fix::GpsSnapshot;
pub use sentence::SentenceAccumulator;
