//! Layout elements: the closed set of field types.
//!
//! A resolved copybook is a tree of [`Element`] values — a `Group` over
//! ordered children, or one of six leaf kinds, each with a fixed byte
//! length and its own codec. Elements never mutate after construction,
//! so a layout tree can be shared read-only across any number of
//! concurrent decode/encode calls.
//!
//! Offsets are never stored: a child's offset within its parent is the
//! sum of the lengths (times OCCURS) of its preceding siblings, and the
//! root's total length is the record length used everywhere else.

mod alpha;
mod binary;
mod floating;
mod group;
mod packed;
pub mod picture;
mod signed_separate;
mod zoned;

pub use alpha::AlphaNumeric;
pub use binary::Binary;
pub use floating::{conversion, FloatPrecision, Floating};
pub use group::Group;
pub use packed::Packed;
pub use picture::{Picture, PictureCategory};
pub use signed_separate::SignedSeparate;
pub use zoned::Zoned;

use rust_decimal::Decimal;

use crate::data::Value;
use crate::error::CodecError;
use crate::settings::Settings;

/// One field type in a resolved layout.
///
/// The set is closed: resolution in the element factory is an exhaustive
/// match, so an unhandled PICTURE/USAGE combination is a compile-time
/// hole, not a runtime fallthrough.
#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    /// Ordered named children; length is the sum of theirs.
    Group(Group),
    /// Character data, one byte per character.
    AlphaNumeric(AlphaNumeric),
    /// Two's-complement integer, 2/4/8 bytes by digit tier.
    Binary(Binary),
    /// Packed decimal (BCD), two digits per byte plus a sign nibble.
    Packed(Packed),
    /// Zoned (DISPLAY) decimal, one digit per byte, sign overpunched.
    Zoned(Zoned),
    /// Display digits plus an explicit sign byte.
    SignedSeparate(SignedSeparate),
    /// 4- or 8-byte float, codec chosen by the conversion strategy.
    Floating(Floating),
}

impl Element {
    /// Field name as declared.
    pub fn name(&self) -> &str {
        match self {
            Element::Group(e) => &e.name,
            Element::AlphaNumeric(e) => &e.name,
            Element::Binary(e) => &e.name,
            Element::Packed(e) => &e.name,
            Element::Zoned(e) => &e.name,
            Element::SignedSeparate(e) => &e.name,
            Element::Floating(e) => &e.name,
        }
    }

    /// Declared level number (0 for the document root).
    pub fn level(&self) -> u8 {
        match self {
            Element::Group(e) => e.level,
            Element::AlphaNumeric(e) => e.level,
            Element::Binary(e) => e.level,
            Element::Packed(e) => e.level,
            Element::Zoned(e) => e.level,
            Element::SignedSeparate(e) => e.level,
            Element::Floating(e) => e.level,
        }
    }

    /// OCCURS count; 1 for non-repeated fields.
    pub fn occurs(&self) -> u32 {
        match self {
            Element::Group(e) => e.occurs,
            Element::AlphaNumeric(e) => e.occurs,
            Element::Binary(e) => e.occurs,
            Element::Packed(e) => e.occurs,
            Element::Zoned(e) => e.occurs,
            Element::SignedSeparate(e) => e.occurs,
            Element::Floating(e) => e.occurs,
        }
    }

    /// Byte length of a single occurrence, fixed at construction.
    pub fn length(&self) -> usize {
        match self {
            Element::Group(e) => e.length(),
            Element::AlphaNumeric(e) => e.length(),
            Element::Binary(e) => e.length(),
            Element::Packed(e) => e.length(),
            Element::Zoned(e) => e.length(),
            Element::SignedSeparate(e) => e.length(),
            Element::Floating(e) => e.length(),
        }
    }

    /// Byte length including OCCURS repetitions.
    pub fn total_length(&self) -> usize {
        self.length() * self.occurs() as usize
    }

    /// Decode one occurrence of this field at `offset`.
    pub fn decode(
        &self,
        buf: &[u8],
        offset: usize,
        settings: &Settings,
    ) -> Result<Value, CodecError> {
        match self {
            Element::Group(e) => e.decode(buf, offset, settings),
            Element::AlphaNumeric(e) => e.decode(buf, offset, settings),
            Element::Binary(e) => e.decode(buf, offset, settings),
            Element::Packed(e) => e.decode(buf, offset),
            Element::Zoned(e) => e.decode(buf, offset, settings),
            Element::SignedSeparate(e) => e.decode(buf, offset, settings),
            Element::Floating(e) => e.decode(buf, offset, settings),
        }
    }

    /// Encode one occurrence; always exactly [`Element::length`] bytes.
    pub fn encode(&self, value: &Value, settings: &Settings) -> Result<Vec<u8>, CodecError> {
        match self {
            Element::Group(e) => e.encode(value, settings),
            Element::AlphaNumeric(e) => e.encode(value, settings),
            Element::Binary(e) => e.encode(value, settings),
            Element::Packed(e) => e.encode(value),
            Element::Zoned(e) => e.encode(value, settings),
            Element::SignedSeparate(e) => e.encode(value, settings),
            Element::Floating(e) => e.encode(value, settings),
        }
    }

    /// The value a freshly created record holds for this field: the
    /// first VALUE literal when one was declared, otherwise a
    /// type-appropriate zero.
    pub fn default_value(&self, settings: &Settings) -> Value {
        match self {
            Element::Group(e) => e.default_value(settings),
            Element::AlphaNumeric(e) => Value::Text(e.default_text()),
            Element::Binary(e) => Value::Number(default_number(&e.literals)),
            Element::Packed(e) => Value::Number(default_number(&e.literals)),
            Element::Zoned(e) => Value::Number(default_number(&e.literals)),
            Element::SignedSeparate(e) => Value::Number(default_number(&e.literals)),
            Element::Floating(e) => Value::Float(e.default_float()),
        }
    }

    /// The group behind this element, if it is one.
    pub fn as_group(&self) -> Option<&Group> {
        match self {
            Element::Group(e) => Some(e),
            _ => None,
        }
    }
}

fn default_number(literals: &[String]) -> Decimal {
    literals
        .first()
        .and_then(|lit| lit.trim().parse().ok())
        .unwrap_or_default()
}

/// Slice the byte range of one field occurrence, or fail with the
/// field's name as the path.
pub(crate) fn field_bytes<'a>(
    buf: &'a [u8],
    offset: usize,
    len: usize,
    name: &str,
) -> Result<&'a [u8], CodecError> {
    if buf.len() < offset + len {
        return Err(CodecError::BufferTooShort {
            path: name.to_string(),
            needed: len,
            available: buf.len().saturating_sub(offset),
        });
    }
    Ok(&buf[offset..offset + len])
}

/// Render a numeric value as exactly `digits` decimal digit characters
/// at the picture's scale, rejecting anything that does not fit.
///
/// Returns the zero-padded digit string and whether the value is
/// negative. This is the single overflow gate for every digit-based
/// codec: magnitude and excess precision both fail here, never
/// truncate.
pub(crate) fn digit_string(
    value: &Decimal,
    digits: u32,
    scale: u32,
    path: &str,
) -> Result<(String, bool), CodecError> {
    let normalized = value.normalize();
    if normalized.scale() > scale {
        return Err(CodecError::Overflow {
            path: path.to_string(),
            value: value.to_string(),
            reason: format!(
                "{} decimal places exceed the declared scale of {}",
                normalized.scale(),
                scale
            ),
        });
    }

    let scaled = (normalized.abs() * Decimal::from(10u64.pow(scale))).trunc();
    let unpadded = scaled.to_string();
    if unpadded.len() > digits as usize {
        return Err(CodecError::Overflow {
            path: path.to_string(),
            value: value.to_string(),
            reason: format!("{} digits exceed the declared {}", unpadded.len(), digits),
        });
    }

    let padded = format!("{unpadded:0>width$}", width = digits as usize);
    let negative = normalized.is_sign_negative() && !normalized.is_zero();
    Ok((padded, negative))
}

/// Rebuild a numeric value from decoded decimal digits and a sign.
pub(crate) fn decimal_from_digits(digits: &[u8], scale: u32, negative: bool) -> Decimal {
    let mut magnitude: i128 = 0;
    for &d in digits {
        magnitude = magnitude * 10 + i128::from(d);
    }
    if negative {
        magnitude = -magnitude;
    }
    Decimal::from_i128_with_scale(magnitude, scale).normalize()
}
