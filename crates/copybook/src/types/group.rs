//! Group elements: ordered named children.

use crate::data::{FieldValue, Value};
use crate::error::CodecError;
use crate::settings::Settings;

use super::Element;

/// A group over ordered children.
///
/// Length is fixed at construction as the sum of each child's length
/// times its OCCURS count; the root group's length is the record length
/// used for stream segmentation and encode sizing. A child's offset is
/// implied by the lengths of its preceding siblings and is never
/// stored.
#[derive(Debug, Clone, PartialEq)]
pub struct Group {
    pub(crate) name: String,
    pub(crate) level: u8,
    pub(crate) occurs: u32,
    pub(crate) children: Vec<Element>,
    length: usize,
}

impl Group {
    pub(crate) fn new(name: String, level: u8, occurs: u32, children: Vec<Element>) -> Self {
        let length = children.iter().map(Element::total_length).sum();
        Self {
            name,
            level,
            occurs,
            children,
            length,
        }
    }

    /// Byte length of one occurrence of this group.
    pub fn length(&self) -> usize {
        self.length
    }

    /// The ordered children.
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Find a direct child by name, case-insensitively (COBOL names are
    /// caseless).
    pub fn child(&self, name: &str) -> Option<&Element> {
        self.children
            .iter()
            .find(|c| c.name().eq_ignore_ascii_case(name))
    }

    /// Byte offset of a direct child within this group: the sum of the
    /// total lengths of its preceding siblings.
    pub fn child_offset(&self, name: &str) -> Option<usize> {
        let mut offset = 0;
        for child in &self.children {
            if child.name().eq_ignore_ascii_case(name) {
                return Some(offset);
            }
            offset += child.total_length();
        }
        None
    }

    pub(crate) fn decode(
        &self,
        buf: &[u8],
        offset: usize,
        settings: &Settings,
    ) -> Result<Value, CodecError> {
        let mut cursor = offset;
        let mut fields = Vec::with_capacity(self.children.len());
        for child in &self.children {
            let mut occurrences = Vec::with_capacity(child.occurs() as usize);
            for _ in 0..child.occurs() {
                let value = child
                    .decode(buf, cursor, settings)
                    .map_err(|e| e.under(&self.name))?;
                occurrences.push(value);
                cursor += child.length();
            }
            fields.push(FieldValue {
                name: child.name().to_string(),
                occurrences,
            });
        }
        Ok(Value::Group(fields))
    }

    pub(crate) fn encode(&self, value: &Value, settings: &Settings) -> Result<Vec<u8>, CodecError> {
        let fields = match value {
            Value::Group(fields) => fields,
            _ => {
                return Err(CodecError::TypeMismatch {
                    path: self.name.clone(),
                    expected: "group",
                })
            }
        };
        if fields.len() != self.children.len() {
            return Err(CodecError::TypeMismatch {
                path: self.name.clone(),
                expected: "group with one entry per child field",
            });
        }

        let mut out = Vec::with_capacity(self.length);
        for (child, field) in self.children.iter().zip(fields) {
            if !field.name.eq_ignore_ascii_case(child.name()) {
                return Err(CodecError::UnknownField {
                    path: format!("{}.{}", self.name, field.name),
                });
            }
            if field.occurrences.len() != child.occurs() as usize {
                return Err(CodecError::IndexOutOfRange {
                    path: format!("{}.{}", self.name, field.name),
                    index: field.occurrences.len(),
                    occurs: child.occurs(),
                });
            }
            for occurrence in &field.occurrences {
                let bytes = child
                    .encode(occurrence, settings)
                    .map_err(|e| e.under(&self.name))?;
                out.extend_from_slice(&bytes);
            }
        }
        Ok(out)
    }

    pub(crate) fn default_value(&self, settings: &Settings) -> Value {
        Value::Group(
            self.children
                .iter()
                .map(|child| FieldValue {
                    name: child.name().to_string(),
                    occurrences: (0..child.occurs())
                        .map(|_| child.default_value(settings))
                        .collect(),
                })
                .collect(),
        )
    }
}
