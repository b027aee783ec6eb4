//! Runtime data: the value tree mirroring a layout.

mod record;

pub use record::Record;

use rust_decimal::Decimal;

use crate::error::CodecError;

/// A decoded (or to-be-encoded) value.
///
/// Mirrors the layout tree: groups hold one [`FieldValue`] per child,
/// leaves hold a typed scalar. Value trees are independent of the
/// buffer they were decoded from and of every other decode call.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Group contents, one entry per child field, in declaration order.
    Group(Vec<FieldValue>),
    /// Alphanumeric content.
    Text(String),
    /// Any of the decimal storage kinds.
    Number(Decimal),
    /// Floating-point content.
    Float(f64),
}

impl Value {
    /// The text behind an alphanumeric value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The number behind a numeric value.
    pub fn as_number(&self) -> Option<Decimal> {
        match self {
            Value::Number(number) => Some(*number),
            _ => None,
        }
    }

    /// The float behind a floating value.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(float) => Some(*float),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(text: &str) -> Self {
        Value::Text(text.to_string())
    }
}

impl From<Decimal> for Value {
    fn from(number: Decimal) -> Self {
        Value::Number(number)
    }
}

impl From<i64> for Value {
    fn from(number: i64) -> Self {
        Value::Number(number.into())
    }
}

impl From<f64> for Value {
    fn from(float: f64) -> Self {
        Value::Float(float)
    }
}

/// One field slot inside a group value: the field name and one value
/// per OCCURS iteration.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValue {
    /// Field name as declared.
    pub name: String,
    /// One value per occurrence; length equals the field's OCCURS count.
    pub occurrences: Vec<Value>,
}

/// One step of a dotted field path: a name and an optional `[i]`
/// occurrence index (defaulting to the first occurrence).
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct PathSegment {
    pub name: String,
    pub index: Option<usize>,
}

/// Parse `CUSTOMER.ORDERS[2].AMOUNT` into segments.
pub(crate) fn parse_path(path: &str) -> Result<Vec<PathSegment>, CodecError> {
    let bad = || CodecError::UnknownField {
        path: path.to_string(),
    };

    let mut segments = Vec::new();
    for raw in path.split('.') {
        let raw = raw.trim();
        let (name, index) = match raw.find('[') {
            Some(open) => {
                let close = raw.rfind(']').filter(|&c| c == raw.len() - 1).ok_or_else(bad)?;
                let index = raw[open + 1..close].parse().map_err(|_| bad())?;
                (&raw[..open], Some(index))
            }
            None => (raw, None),
        };
        if name.is_empty() {
            return Err(bad());
        }
        segments.push(PathSegment {
            name: name.to_string(),
            index,
        });
    }
    if segments.is_empty() {
        return Err(bad());
    }
    Ok(segments)
}
