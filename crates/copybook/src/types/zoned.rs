//! Zoned decimal (DISPLAY) fields.
//!
//! One digit per byte: the digit in the low nibble, the code page's
//! digit zone in the high nibble (0xF under EBCDIC, 0x3 under Latin-1).
//! For signed fields the sign is overpunched into the zone nibble of
//! the leading or trailing digit byte: 0xC positive, 0xD negative.
//! 0xA/0xE read as positive and 0xB as negative; any other zone reads
//! as unsigned, matching how mainframe data written under older
//! compilers behaves.

use crate::data::Value;
use crate::error::CodecError;
use crate::settings::{Settings, SignPosition};

use super::{decimal_from_digits, digit_string, field_bytes};

/// Zoned (display) decimal field with optional sign overpunch.
#[derive(Debug, Clone, PartialEq)]
pub struct Zoned {
    pub(crate) name: String,
    pub(crate) level: u8,
    pub(crate) occurs: u32,
    pub(crate) digits: u32,
    pub(crate) scale: u32,
    pub(crate) signed: bool,
    /// SIGN clause position; `None` falls back to the settings default.
    pub(crate) sign: Option<SignPosition>,
    pub(crate) literals: Vec<String>,
}

impl Zoned {
    pub(crate) fn new(
        name: String,
        level: u8,
        occurs: u32,
        digits: u32,
        scale: u32,
        signed: bool,
        sign: Option<SignPosition>,
    ) -> Self {
        Self {
            name,
            level,
            occurs,
            digits,
            scale,
            signed,
            sign,
            literals: Vec::new(),
        }
    }

    /// Byte length: one byte per digit.
    pub fn length(&self) -> usize {
        self.digits as usize
    }

    fn sign_index(&self, settings: &Settings) -> usize {
        match self.sign.unwrap_or(settings.sign_position()) {
            SignPosition::Leading => 0,
            SignPosition::Trailing => self.digits as usize - 1,
        }
    }

    pub(crate) fn decode(
        &self,
        buf: &[u8],
        offset: usize,
        settings: &Settings,
    ) -> Result<Value, CodecError> {
        let bytes = field_bytes(buf, offset, self.length(), &self.name)?;
        let sign_index = self.sign_index(settings);

        let mut digits = Vec::with_capacity(bytes.len());
        let mut negative = false;
        for (i, &byte) in bytes.iter().enumerate() {
            let digit = byte & 0x0F;
            if digit > 9 {
                return Err(CodecError::InvalidDigit {
                    path: self.name.clone(),
                    byte,
                });
            }
            digits.push(digit);

            if self.signed && i == sign_index {
                negative = matches!((byte >> 4) & 0x0F, 0x0D | 0x0B);
            }
        }

        Ok(Value::Number(decimal_from_digits(&digits, self.scale, negative)))
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

        let (digit_str, negative) = digit_string(number, self.digits, self.scale, &self.name)?;
        if negative && !self.signed {
            return Err(CodecError::Overflow {
                path: self.name.clone(),
                value: number.to_string(),
                reason: "negative value in an unsigned field".to_string(),
            });
        }

        let page = settings.code_page();
        let sign_index = self.sign_index(settings);

        let out = digit_str
            .bytes()
            .map(|b| b - b'0')
            .enumerate()
            .map(|(i, digit)| {
                if self.signed && i == sign_index {
                    let zone = if negative { 0xD0 } else { 0xC0 };
                    zone | digit
                } else {
                    page.digit(digit)
                }
            })
            .collect();
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn zoned(digits: u32, scale: u32, signed: bool) -> Zoned {
        Zoned::new("F".to_string(), 5, 1, digits, scale, signed, None)
    }

    #[test]
    fn test_encode_trailing_positive() {
        let settings = Settings::default();
        let bytes = zoned(5, 0, true)
            .encode(&Value::Number(Decimal::from(12345)), &settings)
            .unwrap();
        assert_eq!(bytes, vec![0xF1, 0xF2, 0xF3, 0xF4, 0xC5]);
    }

    #[test]
    fn test_encode_trailing_negative_overpunch() {
        let settings = Settings::default();
        let element = zoned(3, 0, true);
        let bytes = element
            .encode(&Value::Number(Decimal::from(-123)), &settings)
            .unwrap();
        assert_eq!(bytes, vec![0xF1, 0xF2, 0xD3]);
        assert_eq!(
            element.decode(&bytes, 0, &settings).unwrap(),
            Value::Number(Decimal::from(-123))
        );
    }

    #[test]
    fn test_encode_leading_sign() {
        let settings = Settings::default();
        let element = Zoned::new(
            "F".to_string(),
            5,
            1,
            3,
            0,
            true,
            Some(SignPosition::Leading),
        );
        let bytes = element
            .encode(&Value::Number(Decimal::from(-123)), &settings)
            .unwrap();
        assert_eq!(bytes, vec![0xD1, 0xF2, 0xF3]);
        assert_eq!(
            element.decode(&bytes, 0, &settings).unwrap(),
            Value::Number(Decimal::from(-123))
        );
    }

    #[test]
    fn test_unsigned_keeps_digit_zone() {
        let settings = Settings::default();
        let bytes = zoned(4, 0, false)
            .encode(&Value::Number(Decimal::from(42)), &settings)
            .unwrap();
        assert_eq!(bytes, vec![0xF0, 0xF0, 0xF4, 0xF2]);
    }

    #[test]
    fn test_latin1_digit_zone() {
        let settings = Settings::default().with_encoding("latin1").unwrap();
        let element = zoned(3, 0, false);
        let bytes = element
            .encode(&Value::Number(Decimal::from(7)), &settings)
            .unwrap();
        assert_eq!(bytes, b"007");
        assert_eq!(
            element.decode(b"007", 0, &settings).unwrap(),
            Value::Number(Decimal::from(7))
        );
    }

    #[test]
    fn test_decode_alternate_positive_zones() {
        let settings = Settings::default();
        // 0xA and 0xE zones read as positive.
        let value = zoned(3, 0, true)
            .decode(&[0xF1, 0xF2, 0xA3], 0, &settings)
            .unwrap();
        assert_eq!(value, Value::Number(Decimal::from(123)));
    }

    #[test]
    fn test_decode_invalid_digit() {
        let settings = Settings::default();
        let err = zoned(3, 0, true)
            .decode(&[0xF1, 0xFA, 0xC3], 0, &settings)
            .unwrap_err();
        assert!(matches!(err, CodecError::InvalidDigit { .. }));
    }

    #[test]
    fn test_scale_affects_interpretation_not_bytes() {
        let settings = Settings::default();
        let plain = zoned(5, 0, true);
        let scaled = zoned(5, 2, true);
        let bytes_plain = plain
            .encode(&Value::Number(Decimal::from(12345)), &settings)
            .unwrap();
        let bytes_scaled = scaled
            .encode(&Value::Number(Decimal::from_str("123.45").unwrap()), &settings)
            .unwrap();
        assert_eq!(bytes_plain, bytes_scaled);
        assert_eq!(
            scaled.decode(&bytes_scaled, 0, &settings).unwrap(),
            Value::Number(Decimal::from_str("123.45").unwrap())
        );
    }

    #[test]
    fn test_overflow_is_fatal() {
        let settings = Settings::default();
        let err = zoned(3, 0, true)
            .encode(&Value::Number(Decimal::from(1000)), &settings)
            .unwrap_err();
        assert!(matches!(err, CodecError::Overflow { .. }));
    }
}
