//! Binary integer (COMP/COMP-4 and native COMP-5) fields.
//!
//! Storage width comes from the PIC digit count in fixed tiers:
//!
//! - 1-4 digits: 2 bytes (halfword)
//! - 5-9 digits: 4 bytes (fullword)
//! - 10-18 digits: 8 bytes (doubleword)
//!
//! COMP stores values in the configured byte order and limits them to
//! the PIC digit capacity. COMP-5 always uses host byte order and
//! allows the full range of the underlying storage — PIC S9(4) COMP
//! holds -9999..9999, PIC S9(4) COMP-5 holds -32768..32767.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

use crate::data::Value;
use crate::error::CodecError;
use crate::settings::Settings;

use super::{digit_string, field_bytes};

/// Storage bytes for a PIC digit count.
pub(crate) fn storage_size_for_digits(digits: u32) -> usize {
    match digits {
        1..=4 => 2,
        5..=9 => 4,
        _ => 8,
    }
}

/// Two's-complement binary integer field.
#[derive(Debug, Clone, PartialEq)]
pub struct Binary {
    pub(crate) name: String,
    pub(crate) level: u8,
    pub(crate) occurs: u32,
    pub(crate) digits: u32,
    pub(crate) scale: u32,
    pub(crate) signed: bool,
    /// COMP-5: host byte order, full storage range.
    pub(crate) native: bool,
    pub(crate) literals: Vec<String>,
}

impl Binary {
    pub(crate) fn new(
        name: String,
        level: u8,
        occurs: u32,
        digits: u32,
        scale: u32,
        signed: bool,
        native: bool,
    ) -> Self {
        Self {
            name,
            level,
            occurs,
            digits,
            scale,
            signed,
            native,
            literals: Vec::new(),
        }
    }

    /// Byte length from the digit tier.
    pub fn length(&self) -> usize {
        storage_size_for_digits(self.digits)
    }

    fn little_endian(&self, settings: &Settings) -> bool {
        if self.native {
            cfg!(target_endian = "little")
        } else {
            settings.little_endian()
        }
    }

    pub(crate) fn decode(
        &self,
        buf: &[u8],
        offset: usize,
        settings: &Settings,
    ) -> Result<Value, CodecError> {
        let bytes = field_bytes(buf, offset, self.length(), &self.name)?;

        // Normalize to big-endian, then assemble.
        let mut raw: u64 = 0;
        if self.little_endian(settings) {
            for &b in bytes.iter().rev() {
                raw = (raw << 8) | u64::from(b);
            }
        } else {
            for &b in bytes {
                raw = (raw << 8) | u64::from(b);
            }
        }

        let width_bits = self.length() as u32 * 8;
        let magnitude: i128 = if self.signed {
            // Sign-extend from the storage width.
            let shift = 64 - width_bits;
            (((raw << shift) as i64) >> shift).into()
        } else {
            raw.into()
        };

        Ok(Value::Number(
            Decimal::from_i128_with_scale(magnitude, self.scale).normalize(),
        ))
    }

    pub(crate) fn encode(&self, value: &Value, settings: &Settings) -> Result<Vec<u8>, CodecError> {
        let number = match value {
            Value::Number(n) => n,
            _ => {
                return Err(CodecError::TypeMismatch {
                    path: self.name.clone(),
                    expected: "number",
                })
            }
        };

        let scaled = if self.native {
            self.native_range_checked(number)?
        } else {
            // COMP is limited by the PIC digit capacity, like every
            // digit-based format.
            let (digits, negative) = digit_string(number, self.digits, self.scale, &self.name)?;
            if negative && !self.signed {
                return Err(CodecError::Overflow {
                    path: self.name.clone(),
                    value: number.to_string(),
                    reason: "negative value in an unsigned field".to_string(),
                });
            }
            let magnitude: i128 = digits.parse().expect("digit string is numeric");
            if negative {
                -magnitude
            } else {
                magnitude
            }
        };

        let be = scaled.to_be_bytes();
        let mut out = be[16 - self.length()..].to_vec();
        if self.little_endian(settings) {
            out.reverse();
        }
        Ok(out)
    }

    /// COMP-5 range check: the full storage range, not the PIC range.
    fn native_range_checked(&self, number: &Decimal) -> Result<i128, CodecError> {
        let overflow = |reason: String| CodecError::Overflow {
            path: self.name.clone(),
            value: number.to_string(),
            reason,
        };

        let normalized = number.normalize();
        if normalized.scale() > self.scale {
            return Err(overflow(format!(
                "{} decimal places exceed the declared scale of {}",
                normalized.scale(),
                self.scale
            )));
        }
        let scaled = (normalized * Decimal::from(10u64.pow(self.scale)))
            .to_i128()
            .ok_or_else(|| overflow("value exceeds binary storage".to_string()))?;

        let (min, max): (i128, i128) = match (self.length(), self.signed) {
            (2, true) => (i16::MIN.into(), i16::MAX.into()),
            (4, true) => (i32::MIN.into(), i32::MAX.into()),
            (8, true) => (i64::MIN.into(), i64::MAX.into()),
            (2, false) => (0, u16::MAX.into()),
            (4, false) => (0, u32::MAX.into()),
            _ => (0, u64::MAX.into()),
        };
        if scaled < min || scaled > max {
            return Err(overflow(format!(
                "value outside native storage range {min}..{max}"
            )));
        }
        Ok(scaled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn comp(digits: u32, scale: u32, signed: bool) -> Binary {
        Binary::new("F".to_string(), 5, 1, digits, scale, signed, false)
    }

    fn comp5(digits: u32) -> Binary {
        Binary::new("F".to_string(), 5, 1, digits, 0, true, true)
    }

    #[test]
    fn test_storage_tiers() {
        assert_eq!(comp(4, 0, true).length(), 2);
        assert_eq!(comp(5, 0, true).length(), 4);
        assert_eq!(comp(9, 0, true).length(), 4);
        assert_eq!(comp(10, 0, true).length(), 8);
        assert_eq!(comp(18, 0, true).length(), 8);
    }

    #[test]
    fn test_encode_big_endian() {
        let settings = Settings::default();
        let bytes = comp(4, 0, true)
            .encode(&Value::Number(Decimal::from(258)), &settings)
            .unwrap();
        assert_eq!(bytes, vec![0x01, 0x02]);
    }

    #[test]
    fn test_encode_little_endian() {
        let settings = Settings::default().with_little_endian(true);
        let bytes = comp(4, 0, true)
            .encode(&Value::Number(Decimal::from(258)), &settings)
            .unwrap();
        assert_eq!(bytes, vec![0x02, 0x01]);
    }

    #[test]
    fn test_negative_twos_complement() {
        let settings = Settings::default();
        let element = comp(4, 0, true);
        let bytes = element
            .encode(&Value::Number(Decimal::from(-1)), &settings)
            .unwrap();
        assert_eq!(bytes, vec![0xFF, 0xFF]);
        let value = element.decode(&bytes, 0, &settings).unwrap();
        assert_eq!(value, Value::Number(Decimal::from(-1)));
    }

    #[test]
    fn test_roundtrip_with_scale() {
        let settings = Settings::default();
        let element = comp(7, 2, true);
        let original = Decimal::from_str("-12345.67").unwrap();
        let bytes = element
            .encode(&Value::Number(original), &settings)
            .unwrap();
        assert_eq!(bytes.len(), 4);
        let value = element.decode(&bytes, 0, &settings).unwrap();
        assert_eq!(value, Value::Number(original));
    }

    #[test]
    fn test_comp_overflow_by_pic_digits() {
        let settings = Settings::default();
        // 12345 has five digits; PIC S9(4) COMP rejects it even though
        // a halfword could hold it.
        let err = comp(4, 0, true)
            .encode(&Value::Number(Decimal::from(12345)), &settings)
            .unwrap_err();
        assert!(matches!(err, CodecError::Overflow { .. }));
    }

    #[test]
    fn test_comp5_uses_full_storage_range() {
        let settings = Settings::default();
        let element = comp5(4);
        let bytes = element
            .encode(&Value::Number(Decimal::from(32000)), &settings)
            .unwrap();
        let value = element.decode(&bytes, 0, &settings).unwrap();
        assert_eq!(value, Value::Number(Decimal::from(32000)));

        let err = element
            .encode(&Value::Number(Decimal::from(40000)), &settings)
            .unwrap_err();
        assert!(matches!(err, CodecError::Overflow { .. }));
    }

    #[test]
    fn test_unsigned_rejects_negative() {
        let settings = Settings::default();
        let err = comp(4, 0, false)
            .encode(&Value::Number(Decimal::from(-5)), &settings)
            .unwrap_err();
        assert!(matches!(err, CodecError::Overflow { .. }));
    }

    #[test]
    fn test_unsigned_decode_high_bit() {
        let settings = Settings::default().with_encoding("latin1").unwrap();
        // 0xFFFE as unsigned is 65534, not -2.
        let value = comp(5, 0, false)
            .decode(&[0x00, 0x00, 0xFF, 0xFE], 0, &settings)
            .unwrap();
        assert_eq!(value, Value::Number(Decimal::from(65534)));
    }

    #[test]
    fn test_short_buffer() {
        let settings = Settings::default();
        let err = comp(9, 0, true).decode(&[0u8; 3], 0, &settings).unwrap_err();
        assert!(matches!(err, CodecError::BufferTooShort { .. }));
    }
}
