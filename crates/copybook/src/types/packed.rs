//! Packed decimal (COMP-3) fields.
//!
//! Two decimal digits per byte, with the sign in the rightmost nibble.
//! Storage size = (digits + 2) / 2, so a 5-digit field occupies 3 bytes
//! (`d1|d2 d3|d4 d5|sign`) and a 6-digit field occupies 4 bytes with a
//! leading zero pad nibble (`0|d1 d2|d3 d4|d5 d6|sign`).
//!
//! Sign nibbles: 0xC positive, 0xD negative, 0xF unsigned; 0xA/0xE read
//! as positive and 0xB as negative for data written by other systems.

use crate::data::Value;
use crate::error::CodecError;

use super::{decimal_from_digits, digit_string, field_bytes};

/// BCD packed decimal field.
#[derive(Debug, Clone, PartialEq)]
pub struct Packed {
    pub(crate) name: String,
    pub(crate) level: u8,
    pub(crate) occurs: u32,
    pub(crate) digits: u32,
    pub(crate) scale: u32,
    pub(crate) signed: bool,
    pub(crate) literals: Vec<String>,
}

impl Packed {
    pub(crate) fn new(
        name: String,
        level: u8,
        occurs: u32,
        digits: u32,
        scale: u32,
        signed: bool,
    ) -> Self {
        Self {
            name,
            level,
            occurs,
            digits,
            scale,
            signed,
            literals: Vec::new(),
        }
    }

    /// Byte length: digit nibbles plus the sign nibble, rounded up.
    pub fn length(&self) -> usize {
        (self.digits as usize + 2) / 2
    }

    pub(crate) fn decode(&self, buf: &[u8], offset: usize) -> Result<Value, CodecError> {
        let bytes = field_bytes(buf, offset, self.length(), &self.name)?;

        let mut digits = Vec::with_capacity(bytes.len() * 2);
        for (i, &byte) in bytes.iter().enumerate() {
            let high = (byte >> 4) & 0x0F;
            let low = byte & 0x0F;

            if high > 9 {
                return Err(CodecError::InvalidDigit {
                    path: self.name.clone(),
                    byte,
                });
            }
            digits.push(high);

            if i < bytes.len() - 1 {
                if low > 9 {
                    return Err(CodecError::InvalidDigit {
                        path: self.name.clone(),
                        byte,
                    });
                }
                digits.push(low);
            }
        }

        let sign_nibble = bytes[bytes.len() - 1] & 0x0F;
        let negative = match sign_nibble {
            0x0C | 0x0A | 0x0E | 0x0F => false,
            0x0D | 0x0B => true,
            _ => {
                return Err(CodecError::InvalidSign {
                    path: self.name.clone(),
                    value: sign_nibble,
                })
            }
        };

        Ok(Value::Number(decimal_from_digits(&digits, self.scale, negative)))
    }

    pub(crate) fn encode(&self, value: &Value) -> Result<Vec<u8>, CodecError> {
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

        let sign_nibble: u8 = if !self.signed {
            0x0F
        } else if negative {
            0x0D
        } else {
            0x0C
        };

        let mut nibbles: Vec<u8> = digit_str.bytes().map(|b| b - b'0').collect();
        nibbles.push(sign_nibble);
        // Even digit counts need a leading zero pad to fill whole bytes.
        if nibbles.len() % 2 == 1 {
            nibbles.insert(0, 0);
        }

        let mut out = Vec::with_capacity(nibbles.len() / 2);
        for pair in nibbles.chunks(2) {
            out.push((pair[0] << 4) | pair[1]);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    fn packed(digits: u32, scale: u32) -> Packed {
        Packed::new("F".to_string(), 5, 1, digits, scale, true)
    }

    #[test]
    fn test_five_digits_take_three_bytes() {
        assert_eq!(packed(5, 0).length(), 3);
        assert_eq!(packed(4, 0).length(), 3);
        assert_eq!(packed(6, 0).length(), 4);
        assert_eq!(packed(1, 0).length(), 1);
    }

    #[test]
    fn test_encode_positive() {
        let bytes = packed(5, 0)
            .encode(&Value::Number(Decimal::from(12345)))
            .unwrap();
        assert_eq!(bytes, vec![0x12, 0x34, 0x5C]);
    }

    #[test]
    fn test_encode_negative() {
        let bytes = packed(5, 0)
            .encode(&Value::Number(Decimal::from(-12345)))
            .unwrap();
        assert_eq!(bytes, vec![0x12, 0x34, 0x5D]);
    }

    #[test]
    fn test_encode_even_digits_pads_leading_zero() {
        let bytes = packed(6, 0)
            .encode(&Value::Number(Decimal::from(123456)))
            .unwrap();
        assert_eq!(bytes, vec![0x01, 0x23, 0x45, 0x6C]);
    }

    #[test]
    fn test_encode_unsigned_sign_nibble() {
        let element = Packed::new("F".to_string(), 5, 1, 3, 0, false);
        let bytes = element.encode(&Value::Number(Decimal::from(42))).unwrap();
        assert_eq!(bytes, vec![0x04, 0x2F]);
    }

    #[test]
    fn test_decode_negative() {
        let value = packed(5, 0).decode(&[0x12, 0x34, 0x5D], 0).unwrap();
        assert_eq!(value, Value::Number(Decimal::from(-12345)));
    }

    #[test]
    fn test_decode_alternate_sign_nibbles() {
        assert_eq!(
            packed(3, 0).decode(&[0x12, 0x3A], 0).unwrap(),
            Value::Number(Decimal::from(123))
        );
        assert_eq!(
            packed(3, 0).decode(&[0x12, 0x3B], 0).unwrap(),
            Value::Number(Decimal::from(-123))
        );
    }

    #[test]
    fn test_decode_invalid_digit_nibble() {
        let err = packed(3, 0).decode(&[0xA2, 0x3C], 0).unwrap_err();
        assert!(matches!(err, CodecError::InvalidDigit { .. }));
    }

    #[test]
    fn test_decode_invalid_sign_nibble() {
        let err = packed(3, 0).decode(&[0x12, 0x39], 0).unwrap_err();
        assert!(matches!(err, CodecError::InvalidSign { .. }));
    }

    #[test]
    fn test_roundtrip_with_scale() {
        let element = packed(7, 2);
        let original = Decimal::from_str("-98765.43").unwrap();
        let bytes = element.encode(&Value::Number(original)).unwrap();
        assert_eq!(bytes.len(), 4);
        assert_eq!(element.decode(&bytes, 0).unwrap(), Value::Number(original));
    }

    #[test]
    fn test_overflow_is_fatal() {
        let err = packed(3, 0)
            .encode(&Value::Number(Decimal::from(1234)))
            .unwrap_err();
        assert!(matches!(err, CodecError::Overflow { .. }));
    }

    #[test]
    fn test_zero() {
        let element = packed(3, 0);
        let bytes = element.encode(&Value::Number(Decimal::ZERO)).unwrap();
        assert_eq!(bytes, vec![0x00, 0x0C]);
        assert_eq!(
            element.decode(&bytes, 0).unwrap(),
            Value::Number(Decimal::ZERO)
        );
    }
}
