//! Character code pages for record text fields.
//!
//! Fixed-format records carry text in the encoding of the system that
//! wrote them, almost always an EBCDIC code page. A [`CodePage`] maps
//! record bytes to characters and back, and tells the numeric codecs
//! which zone nibble an unsigned display digit carries (0xF under
//! EBCDIC, 0x3 under Latin-1/ASCII).
//!
//! Pages are static values looked up by name; more pages slot in as
//! additional statics without touching callers.

mod tables;

pub use tables::{CP037, LATIN1};

use crate::error::LayoutError;

/// A single-byte code page: 256-entry mappings in both directions.
pub struct CodePage {
    /// Canonical page name.
    pub name: &'static str,
    /// Record byte to Latin-1 character.
    pub(crate) to_char: [u8; 256],
    /// Latin-1 character to record byte.
    pub(crate) from_char: [u8; 256],
    /// Zone nibble (high four bits) of an unsigned display digit.
    pub(crate) digit_zone: u8,
}

impl CodePage {
    /// Look up a page by name.
    ///
    /// Accepts common aliases: `CP037`, `IBM-037`, `IBM037`, `EBCDIC`
    /// for CP037; `LATIN1`, `ISO-8859-1`, `ASCII` for the pass-through
    /// page.
    ///
    /// # Errors
    /// Returns [`LayoutError::UnknownCodePage`] for unrecognized names.
    pub fn by_name(name: &str) -> Result<&'static CodePage, LayoutError> {
        match name.to_ascii_uppercase().as_str() {
            "CP037" | "IBM-037" | "IBM037" | "EBCDIC" | "EBCDIC-037" => Ok(&CP037),
            "LATIN1" | "LATIN-1" | "ISO-8859-1" | "ASCII" | "UTF-8" => Ok(&LATIN1),
            _ => Err(LayoutError::UnknownCodePage {
                name: name.to_string(),
            }),
        }
    }

    /// Decode record bytes to a string.
    pub fn decode(&self, bytes: &[u8]) -> String {
        bytes
            .iter()
            .map(|&b| char::from(self.to_char[b as usize]))
            .collect()
    }

    /// Encode a single character, if it is representable.
    pub fn encode_char(&self, ch: char) -> Option<u8> {
        if ch as u32 > 255 {
            return None;
        }
        Some(self.from_char[ch as usize])
    }

    /// The encoded space byte, used for alphanumeric padding.
    pub fn space(&self) -> u8 {
        self.from_char[b' ' as usize]
    }

    /// The encoded byte for a decimal digit 0-9.
    pub fn digit(&self, d: u8) -> u8 {
        debug_assert!(d <= 9);
        self.digit_zone | d
    }

    /// Read a decimal digit back out of an encoded digit byte.
    ///
    /// Returns `None` if the byte is not a digit under this page.
    pub fn digit_value(&self, byte: u8) -> Option<u8> {
        let digit = byte & 0x0F;
        if byte & 0xF0 == self.digit_zone && digit <= 9 {
            Some(digit)
        } else {
            None
        }
    }

    /// Zone nibble of an unsigned display digit (high four bits set).
    pub fn digit_zone(&self) -> u8 {
        self.digit_zone
    }

    /// The encoded `+` byte, for separate-sign fields.
    pub fn plus(&self) -> u8 {
        self.from_char[b'+' as usize]
    }

    /// The encoded `-` byte, for separate-sign fields.
    pub fn minus(&self) -> u8 {
        self.from_char[b'-' as usize]
    }
}

impl std::fmt::Debug for CodePage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CodePage").field("name", &self.name).finish()
    }
}

impl PartialEq for CodePage {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}
