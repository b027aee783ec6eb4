//! Immutable codec configuration.
//!
//! One [`Settings`] value is constructed per layout and shared by
//! reference through every decode/encode call. There is no mutation
//! API: to parse the same copybook under different settings, build a
//! new layout with new settings.

use crate::charset::{CodePage, CP037};
use crate::error::LayoutError;

/// Where a numeric field's sign lives relative to its digits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SignPosition {
    /// Sign on the first digit byte (or before the digits when separate).
    Leading,
    /// Sign on the last digit byte (or after the digits when separate).
    Trailing,
}

/// Strategy for the 4/8-byte floating formats.
///
/// Pre-IEEE mainframe float encodings must be substitutable without
/// changing the `Floating` element's contract, so the strategy is part
/// of the configuration rather than the layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum FloatConversion {
    /// IEEE 754 single/double precision, big-endian.
    Ieee754,
    /// IBM System/370 hexadecimal floating point.
    Hfp,
}

/// Immutable configuration for one copybook layout.
#[derive(Debug, Clone)]
pub struct Settings {
    code_page: &'static CodePage,
    little_endian: bool,
    float_conversion: FloatConversion,
    sign_position: SignPosition,
    column_start: usize,
    column_end: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            code_page: &CP037,
            little_endian: false,
            float_conversion: FloatConversion::Ieee754,
            sign_position: SignPosition::Trailing,
            column_start: 6,
            column_end: 72,
        }
    }
}

impl Settings {
    /// Replace the character encoding by code page name.
    ///
    /// # Errors
    /// Returns [`LayoutError::UnknownCodePage`] for unrecognized names.
    pub fn with_encoding(mut self, name: &str) -> Result<Self, LayoutError> {
        self.code_page = CodePage::by_name(name)?;
        Ok(self)
    }

    /// Use little-endian byte order for binary fields.
    pub fn with_little_endian(mut self, little_endian: bool) -> Self {
        self.little_endian = little_endian;
        self
    }

    /// Replace the floating-point conversion strategy.
    pub fn with_float_conversion(mut self, conversion: FloatConversion) -> Self {
        self.float_conversion = conversion;
        self
    }

    /// Replace the default sign position for fields without a SIGN clause.
    pub fn with_sign_position(mut self, position: SignPosition) -> Self {
        self.sign_position = position;
        self
    }

    /// Replace the copybook source column bounds.
    ///
    /// Used only by source-format tooling; the codec never reads these.
    pub fn with_columns(mut self, start: usize, end: usize) -> Self {
        self.column_start = start;
        self.column_end = end;
        self
    }

    /// The configured code page.
    pub fn code_page(&self) -> &'static CodePage {
        self.code_page
    }

    /// Whether binary fields use little-endian byte order.
    pub fn little_endian(&self) -> bool {
        self.little_endian
    }

    /// The configured floating-point strategy.
    pub fn float_conversion(&self) -> FloatConversion {
        self.float_conversion
    }

    /// Default sign position for fields without a SIGN clause.
    pub fn sign_position(&self) -> SignPosition {
        self.sign_position
    }

    /// First significant source column (source-format only).
    pub fn column_start(&self) -> usize {
        self.column_start
    }

    /// Last significant source column (source-format only).
    pub fn column_end(&self) -> usize {
        self.column_end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();
        assert_eq!(settings.code_page().name, "CP037");
        assert!(!settings.little_endian());
        assert_eq!(settings.float_conversion(), FloatConversion::Ieee754);
        assert_eq!(settings.sign_position(), SignPosition::Trailing);
    }

    #[test]
    fn test_builder_chain() {
        let settings = Settings::default()
            .with_encoding("latin1")
            .unwrap()
            .with_little_endian(true)
            .with_float_conversion(FloatConversion::Hfp)
            .with_sign_position(SignPosition::Leading);
        assert_eq!(settings.code_page().name, "LATIN1");
        assert!(settings.little_endian());
        assert_eq!(settings.float_conversion(), FloatConversion::Hfp);
        assert_eq!(settings.sign_position(), SignPosition::Leading);
    }

    #[test]
    fn test_unknown_encoding_rejected() {
        assert!(Settings::default().with_encoding("EBCDIC-9999").is_err());
    }
}
