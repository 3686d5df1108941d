//! Fixed-width APRS coordinate fields
//!
//! APRS position reports carry latitude as `DDMM.mmH` and longitude as
//! `DDDMM.mmH`: integer degrees, minutes with exactly two digits either side
//! of the decimal point, and a hemisphere letter. The receiver driver hands us
//! degrees plus the sub-degree fraction in billionths of a degree; the
//! fraction is converted to minutes here (fraction x 60).

use core::fmt::Write;
use heapless::String;

/// Maximum length of a formatted coordinate field (`DDDMM.mmW` = 9 chars)
const MAX_FIELD_LEN: usize = 12;

/// A formatted coordinate field
pub type CoordinateField = String<MAX_FIELD_LEN>;

/// Raw coordinate as reported by the navigation receiver.
///
/// `billionths` is the fractional part of the degree scaled by 10^9, the
/// representation u-blox style drivers expose. The sign is carried separately
/// so `degrees` is always the magnitude.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawCoordinate {
    /// Whole degrees (magnitude)
    pub degrees: u16,
    /// Fractional degrees scaled by 1_000_000_000
    pub billionths: u32,
    /// True for south latitude / west longitude
    pub negative: bool,
}

impl RawCoordinate {
    /// Create a coordinate from whole degrees and fractional billionths.
    pub const fn new(degrees: u16, billionths: u32, negative: bool) -> Self {
        Self {
            degrees,
            billionths,
            negative,
        }
    }

    /// Build a coordinate from decimal degrees.
    pub fn from_decimal_degrees(value: f64) -> Self {
        let negative = value < 0.0;
        let magnitude = if negative { -value } else { value };
        let degrees = magnitude as u16;
        let billionths = ((magnitude - degrees as f64) * 1_000_000_000.0) as u32;
        Self {
            degrees,
            billionths,
            negative,
        }
    }
}

/// Errors from coordinate formatting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoordinateError {
    /// Degrees exceed the valid range for the axis (90 / 180)
    DegreesOutOfRange,
    /// Fractional part is a full degree or more
    FractionOutOfRange,
    /// Field buffer overflow while formatting
    Format,
}

/// Format a latitude as `DDMM.mmN` / `DDMM.mmS`.
///
/// Pure and deterministic; the same input always yields the same field.
pub fn format_latitude(coordinate: &RawCoordinate) -> Result<CoordinateField, CoordinateError> {
    let hemisphere = if coordinate.negative { 'S' } else { 'N' };
    format_field(coordinate, 2, 90, hemisphere)
}

/// Format a longitude as `DDDMM.mmE` / `DDDMM.mmW`.
pub fn format_longitude(coordinate: &RawCoordinate) -> Result<CoordinateField, CoordinateError> {
    let hemisphere = if coordinate.negative { 'W' } else { 'E' };
    format_field(coordinate, 3, 180, hemisphere)
}

fn format_field(
    coordinate: &RawCoordinate,
    degree_digits: usize,
    max_degrees: u16,
    hemisphere: char,
) -> Result<CoordinateField, CoordinateError> {
    if coordinate.billionths >= 1_000_000_000 {
        return Err(CoordinateError::FractionOutOfRange);
    }

    let mut degrees = coordinate.degrees;
    let mut minutes = coordinate.billionths as f64 / 1_000_000_000.0 * 60.0;

    // Two-decimal rounding would otherwise render the minutes as 60.00
    if minutes >= 59.995 {
        degrees += 1;
        minutes = 0.0;
    }

    if degrees > max_degrees {
        return Err(CoordinateError::DegreesOutOfRange);
    }

    let mut field = CoordinateField::new();
    write!(
        field,
        "{:0width$}{:05.2}{}",
        degrees,
        minutes,
        hemisphere,
        width = degree_digits
    )
    .map_err(|_| CoordinateError::Format)?;

    Ok(field)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latitude_known_value() {
        // 48 degrees + 0.1234 of a degree = 7.404 minutes
        let raw = RawCoordinate::new(48, 123_400_000, false);
        let field = format_latitude(&raw).unwrap();
        assert_eq!(field.as_str(), "4807.40N");
    }

    #[test]
    fn test_longitude_known_value() {
        // 16 degrees + 0.35 of a degree = 21.00 minutes, west
        let raw = RawCoordinate::new(16, 350_000_000, true);
        let field = format_longitude(&raw).unwrap();
        assert_eq!(field.as_str(), "01621.00W");
    }

    #[test]
    fn test_latitude_shape_and_hemisphere() {
        for &(degrees, billionths, negative) in &[
            (0u16, 0u32, false),
            (0, 999_999_999, true),
            (7, 500_000_000, false),
            (89, 16_666_666, true),
            (90, 0, false),
        ] {
            let raw = RawCoordinate::new(degrees, billionths, negative);
            let field = format_latitude(&raw).unwrap();

            let bytes = field.as_bytes();
            assert_eq!(bytes.len(), 8, "field {:?}", field);
            assert_eq!(bytes[4], b'.');
            assert!(bytes[..4].iter().all(u8::is_ascii_digit));
            assert!(bytes[5..7].iter().all(u8::is_ascii_digit));
            assert_eq!(bytes[7], if negative { b'S' } else { b'N' });
        }
    }

    #[test]
    fn test_longitude_shape_and_hemisphere() {
        for &(degrees, billionths, negative) in &[
            (0u16, 0u32, true),
            (16, 350_000_000, false),
            (120, 250_000_000, true),
            (180, 0, false),
        ] {
            let raw = RawCoordinate::new(degrees, billionths, negative);
            let field = format_longitude(&raw).unwrap();

            let bytes = field.as_bytes();
            assert_eq!(bytes.len(), 9, "field {:?}", field);
            assert_eq!(bytes[5], b'.');
            assert!(bytes[..5].iter().all(u8::is_ascii_digit));
            assert!(bytes[6..8].iter().all(u8::is_ascii_digit));
            assert_eq!(bytes[8], if negative { b'W' } else { b'E' });
        }
    }

    #[test]
    fn test_formatting_is_idempotent() {
        let raw = RawCoordinate::new(51, 482_000_000, false);
        let first = format_latitude(&raw).unwrap();
        let second = format_latitude(&raw).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_zero_coordinate() {
        let raw = RawCoordinate::new(0, 0, false);
        assert_eq!(format_latitude(&raw).unwrap().as_str(), "0000.00N");
        assert_eq!(format_longitude(&raw).unwrap().as_str(), "00000.00E");
    }

    #[test]
    fn test_degrees_out_of_range() {
        let raw = RawCoordinate::new(91, 0, false);
        assert_eq!(
            format_latitude(&raw),
            Err(CoordinateError::DegreesOutOfRange)
        );

        let raw = RawCoordinate::new(181, 0, false);
        assert_eq!(
            format_longitude(&raw),
            Err(CoordinateError::DegreesOutOfRange)
        );

        // 180 degrees longitude is still representable
        let raw = RawCoordinate::new(180, 0, true);
        assert!(format_longitude(&raw).is_ok());
    }

    #[test]
    fn test_minutes_rounding_carries_into_degrees() {
        // 0.999999999 of a degree is 59.99999994 minutes; rounded to two
        // decimals that must carry, not render as 60.00
        let raw = RawCoordinate::new(48, 999_999_999, false);
        assert_eq!(format_latitude(&raw).unwrap().as_str(), "4900.00N");

        let raw = RawCoordinate::new(120, 999_999_000, true);
        assert_eq!(format_longitude(&raw).unwrap().as_str(), "12100.00W");

        // Just under the rounding threshold stays in place
        let raw = RawCoordinate::new(48, 999_800_000, false);
        assert_eq!(format_latitude(&raw).unwrap().as_str(), "4859.99N");
    }

    #[test]
    fn test_minutes_carry_past_axis_limit_is_rejected() {
        let raw = RawCoordinate::new(90, 999_999_999, false);
        assert_eq!(
            format_latitude(&raw),
            Err(CoordinateError::DegreesOutOfRange)
        );
    }

    #[test]
    fn test_fraction_out_of_range() {
        let raw = RawCoordinate::new(10, 1_000_000_000, false);
        assert_eq!(
            format_latitude(&raw),
            Err(CoordinateError::FractionOutOfRange)
        );
    }

    #[test]
    fn test_from_decimal_degrees() {
        let raw = RawCoordinate::from_decimal_degrees(-33.25);
        assert_eq!(raw.degrees, 33);
        assert!(raw.negative);
        assert_eq!(format_latitude(&raw).unwrap().as_str(), "3315.00S");
    }
}
