//! LoRa radio trait for abstraction and testability
//!
//! This trait defines the transmit-side interface for the radio, allowing the
//! actual hardware driver to be swapped with a mock for testing. The beacon
//! protocol is one-way, so there is no receive path.

use crate::config::lora_defaults;
use core::future::Future;

/// Errors that can occur during LoRa operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoraError {
    /// Operation timed out
    Timeout,
    /// Transmission failed
    TransmitFailed,
    /// Invalid configuration or payload
    InvalidConfig,
    /// Radio busy timeout
    BusyTimeout,
    /// SPI communication error
    SpiError,
    /// Radio not initialised
    NotInitialised,
}

/// Configuration for LoRa modulation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoraConfig {
    /// Centre frequency in Hz
    pub frequency_hz: u32,
    /// Spreading factor (7-12)
    pub spreading_factor: u8,
    /// Bandwidth in kHz
    pub bandwidth_khz: u32,
    /// Coding rate denominator (5-8 for 4/5 to 4/8)
    pub coding_rate: u8,
    /// Transmit power in dBm
    pub tx_power_dbm: i8,
}

impl Default for LoraConfig {
    fn default() -> Self {
        Self {
            frequency_hz: lora_defaults::FREQUENCY_HZ,
            spreading_factor: lora_defaults::SPREADING_FACTOR,
            bandwidth_khz: lora_defaults::BANDWIDTH_KHZ,
            coding_rate: lora_defaults::CODING_RATE,
            tx_power_dbm: lora_defaults::TX_POWER_DBM,
        }
    }
}

/// Abstract LoRa transmitter interface
///
/// Allows the tracker to run against either the real SX1262 hardware driver
/// or a mock implementation for testing. `transmit` is synchronous from the
/// caller's perspective: it completes only once the packet is on the air.
pub trait LoraRadio {
    /// Initialise the radio hardware.
    ///
    /// Failure is fatal for the device; there is no secondary communication
    /// channel to fall back to.
    fn init(&mut self) -> impl Future<Output = Result<(), LoraError>>;

    /// Transmit one packet, blocking until the transmission completes.
    fn transmit(&mut self, data: &[u8]) -> impl Future<Output = Result<(), LoraError>>;

    /// Configure the radio parameters
    fn configure(&mut self, config: &LoraConfig) -> impl Future<Output = Result<(), LoraError>>;

    /// Set the radio to standby mode
    fn set_standby(&mut self) -> impl Future<Output = Result<(), LoraError>>;
}
