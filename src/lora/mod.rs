//! LoRa radio interface and link framing

pub mod framing;
pub mod traits;

#[cfg(feature = "embedded")]
pub mod driver;
