//! Alphanumeric (PIC X / PIC A) fields.

use crate::data::Value;
use crate::error::CodecError;
use crate::settings::Settings;

use super::field_bytes;

/// Character data, one byte per declared character position.
///
/// Encoding is the one place the system truncates: text longer than the
/// declared width is cut to fit. Every numeric kind treats overflow as
/// fatal instead.
#[derive(Debug, Clone, PartialEq)]
pub struct AlphaNumeric {
    pub(crate) name: String,
    pub(crate) level: u8,
    pub(crate) occurs: u32,
    pub(crate) chars: u32,
    pub(crate) literals: Vec<String>,
}

impl AlphaNumeric {
    pub(crate) fn new(name: String, level: u8, occurs: u32, chars: u32) -> Self {
        Self {
            name,
            level,
            occurs,
            chars,
            literals: Vec::new(),
        }
    }

    /// Byte length: one byte per character position.
    pub fn length(&self) -> usize {
        self.chars as usize
    }

    pub(crate) fn decode(
        &self,
        buf: &[u8],
        offset: usize,
        settings: &Settings,
    ) -> Result<Value, CodecError> {
        let bytes = field_bytes(buf, offset, self.length(), &self.name)?;
        Ok(Value::Text(settings.code_page().decode(bytes)))
    }

    pub(crate) fn encode(&self, value: &Value, settings: &Settings) -> Result<Vec<u8>, CodecError> {
        let text = match value {
            Value::Text(text) => text.as_str(),
            _ => {
                return Err(CodecError::TypeMismatch {
                    path: self.name.clone(),
                    expected: "text",
                })
            }
        };

        let page = settings.code_page();
        let mut out = Vec::with_capacity(self.length());
        // Overflow truncates; that is the documented alphanumeric contract.
        for ch in text.chars().take(self.length()) {
            let byte = page.encode_char(ch).ok_or_else(|| CodecError::Charset {
                path: self.name.clone(),
                page: page.name,
                message: format!("character {ch:?} is not representable"),
            })?;
            out.push(byte);
        }
        out.resize(self.length(), page.space());
        Ok(out)
    }

    pub(crate) fn default_text(&self) -> String {
        self.literals.first().cloned().unwrap_or_default()
    }
}
