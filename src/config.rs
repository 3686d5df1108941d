//! Compile-time configuration for the tracker
//!
//! Beacon identity and timing live here together with the hardware constants
//! for the ESP32-S3 with WIO-SX1262. Change the `beacon` block to match your
//! station before flashing.

/// Beacon identity and scheduling
pub mod beacon {
    /// Source callsign (with SSID) placed in the APRS message
    pub const CALLSIGN: &str = "NOCALL-7";

    /// Destination identifying this tracker product class
    pub const DESTINATION: &str = "APLT0";

    /// Minutes between scheduled position reports
    pub const INTERVAL_MINUTES: u32 = 5;

    /// APRS symbol table / overlay character ('/' = primary table)
    pub const SYMBOL_OVERLAY: char = '/';

    /// APRS symbol code ('>' = car, '[' = jogger, 'b' = bicycle)
    pub const SYMBOL_CODE: char = '>';

    /// Free-text comment appended to every position report
    pub const COMMENT: &str = " LoRa Tracker";
}

/// Default LoRa configuration (LoRa APRS channel)
pub mod lora_defaults {
    /// European LoRa APRS frequency
    pub const FREQUENCY_HZ: u32 = 433_775_000;
    pub const SPREADING_FACTOR: u8 = 12;
    pub const BANDWIDTH_KHZ: u32 = 125;
    /// Coding rate 4/5
    pub const CODING_RATE: u8 = 5;
    pub const TX_POWER_DBM: i8 = 20;
}

/// Link-layer framing constants
pub mod link {
    /// Header prepended to every transmitted frame: tag + protocol version
    pub const FRAME_HEADER: [u8; 3] = [0x3C, 0xFF, 0x01];

    /// Maximum encoded APRS message length
    pub const MAX_MESSAGE_LEN: usize = 128;

    /// Maximum frame length handed to the radio (header + message)
    pub const MAX_FRAME_LEN: usize = FRAME_HEADER.len() + MAX_MESSAGE_LEN;
}

/// GPS receiver configuration
pub mod gps {
    pub const BAUD_RATE: u32 = 9600;

    /// Maximum length of one NMEA sentence (incl. "$" and checksum)
    pub const MAX_SENTENCE_LEN: usize = 96;

    /// Startup grace period before warning about a silent receiver
    pub const ACTIVITY_GRACE_MS: u64 = 5_000;

    /// Minimum bytes expected from the receiver within the grace period
    pub const ACTIVITY_MIN_BYTES: u32 = 10;
}

/// SPI pins for LoRa module
pub mod spi {
    pub const SCLK: u8 = 7;
    pub const MISO: u8 = 8;
    pub const MOSI: u8 = 9;
}

/// LoRa control pins
pub mod lora_pins {
    pub const NSS: u8 = 41;
    pub const DIO1: u8 = 39;
    pub const NRST: u8 = 42;
    pub const BUSY: u8 = 40;
}

/// GPS UART pins
pub mod gps_pins {
    pub const TX: u8 = 17;
    pub const RX: u8 = 18;
}

/// Manual-send button pin (active low); not populated on all variants
pub mod button {
    pub const MANUAL_SEND: u8 = 38;
}

/// TCXO configuration
pub mod tcxo {
    /// TCXO voltage code for SX1262 register (0x02 = 1.8V)
    pub const VOLTAGE_CODE: u8 = 0x02;
}
