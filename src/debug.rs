//! Debug logging.
//!
//! On embedded builds messages go to the JTAG serial console via
//! `esp-println`. Host builds forward to the `log` facade instead, so unit
//! tests can install a logger and observe output when needed.

/// Print a debug message to the serial console.
///
/// Usage: `debug!("frequency: {}", freq);`
#[cfg(feature = "embedded")]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        esp_println::println!($($arg)*)
    };
}

/// Print a debug message via the `log` facade (host builds).
#[cfg(not(feature = "embedded"))]
#[macro_export]
macro_rules! debug {
    ($($arg:tt)*) => {
        log::debug!($($arg)*)
    };
}
