//! Display numerics with a separate sign byte (SIGN IS ... SEPARATE).
//!
//! Digit bytes are plain unsigned display digits; one extra byte holds
//! an explicit `+` or `-` character, before or after the digits per the
//! field's sign position.

use crate::data::Value;
use crate::error::CodecError;
use crate::settings::{Settings, SignPosition};

use super::{decimal_from_digits, digit_string, field_bytes};

/// Display digits plus an explicit sign character byte.
#[derive(Debug, Clone, PartialEq)]
pub struct SignedSeparate {
    pub(crate) name: String,
    pub(crate) level: u8,
    pub(crate) occurs: u32,
    pub(crate) digits: u32,
    pub(crate) scale: u32,
    /// SIGN clause position; `None` falls back to the settings default.
    pub(crate) sign: Option<SignPosition>,
    pub(crate) literals: Vec<String>,
}

impl SignedSeparate {
    pub(crate) fn new(
        name: String,
        level: u8,
        occurs: u32,
        digits: u32,
        scale: u32,
        sign: Option<SignPosition>,
    ) -> Self {
        Self {
            name,
            level,
            occurs,
            digits,
            scale,
            sign,
            literals: Vec::new(),
        }
    }

    /// Byte length: one byte per digit plus the sign byte.
    pub fn length(&self) -> usize {
        self.digits as usize + 1
    }

    fn leading(&self, settings: &Settings) -> bool {
        self.sign.unwrap_or(settings.sign_position()) == SignPosition::Leading
    }

    pub(crate) fn decode(
        &self,
        buf: &[u8],
        offset: usize,
        settings: &Settings,
    ) -> Result<Value, CodecError> {
        let bytes = field_bytes(buf, offset, self.length(), &self.name)?;
        let page = settings.code_page();

        let (sign_byte, digit_bytes) = if self.leading(settings) {
            (bytes[0], &bytes[1..])
        } else {
            (bytes[bytes.len() - 1], &bytes[..bytes.len() - 1])
        };

        let negative = if sign_byte == page.minus() {
            true
        } else if sign_byte == page.plus() {
            false
        } else {
            return Err(CodecError::InvalidSign {
                path: self.name.clone(),
                value: sign_byte,
            });
        };

        let mut digits = Vec::with_capacity(digit_bytes.len());
        for &byte in digit_bytes {
            let digit = page
                .digit_value(byte)
                .ok_or_else(|| CodecError::InvalidDigit {
                    path: self.name.clone(),
                    byte,
                })?;
            digits.push(digit);
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
        let page = settings.code_page();
        let sign_byte = if negative { page.minus() } else { page.plus() };

        let mut out = Vec::with_capacity(self.length());
        if self.leading(settings) {
            out.push(sign_byte);
        }
        out.extend(digit_str.bytes().map(|b| page.digit(b - b'0')));
        if !self.leading(settings) {
            out.push(sign_byte);
        }
        Ok(out)
    }
}
