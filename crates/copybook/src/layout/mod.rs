//! Copybook layouts: the resolved, offset-addressable record shape.

mod builder;
mod events;
mod redefine;

pub use events::{FieldEvent, SignClause, Usage};
pub use redefine::{Redefine, RedefineRegistry};

use std::io::Read;

use tracing::debug;

use crate::data::{parse_path, PathSegment, Record, Value};
use crate::error::{CodecError, LayoutError};
use crate::settings::Settings;
use crate::stream::RecordStream;
use crate::types::{Element, Group};

use builder::TreeBuilder;

/// A resolved copybook: the document group, its settings, and any
/// redefinitions.
///
/// Immutable once parsed, and therefore safely shared read-only across
/// any number of concurrent decode/encode calls. To use different
/// settings, parse a new copybook.
#[derive(Debug, Clone)]
pub struct Copybook {
    name: String,
    settings: Settings,
    root: Group,
    redefines: RedefineRegistry,
}

impl Copybook {
    /// Resolve an ordered declaration event stream into a layout.
    ///
    /// The document root is materialized as a group named `name`
    /// holding every 01-level record, irrespective of the events' own
    /// levels.
    ///
    /// # Errors
    /// Any structural inconsistency — an unresolvable PICTURE/USAGE
    /// combination, an unknown REDEFINES target, an out-of-range level
    /// — fails the whole parse with the offending field named.
    pub fn parse(
        name: &str,
        events: &[FieldEvent],
        settings: Settings,
    ) -> Result<Self, LayoutError> {
        let mut builder = TreeBuilder::new();
        for event in events {
            builder.push(event)?;
        }
        let (root, redefines) = builder.finish(name)?;
        debug!(
            copybook = %name,
            record_length = root.length(),
            redefines = redefines.len(),
            "layout resolved"
        );
        Ok(Self {
            name: name.to_string(),
            settings,
            root,
            redefines,
        })
    }

    /// The copybook name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The settings this layout was parsed under.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The document group.
    pub fn root(&self) -> &Group {
        &self.root
    }

    /// The fixed record length in bytes; every encode produces exactly
    /// this many, and stream segmentation chunks by it.
    pub fn length(&self) -> usize {
        self.root.length()
    }

    /// The registered redefinitions.
    pub fn redefines(&self) -> &RedefineRegistry {
        &self.redefines
    }

    /// The alternate element registered under an alias name, if any.
    pub fn aliased(&self, name: &str) -> Option<&Element> {
        self.redefines.lookup(name).map(Redefine::element)
    }

    /// A new empty record: every leaf holds its VALUE literal or a
    /// type-appropriate zero.
    pub fn create_record(&self) -> Record<'_> {
        Record::new(self, self.root.default_value(&self.settings))
    }

    /// Decode one record buffer.
    ///
    /// Bytes beyond the record length are ignored; a buffer that ends
    /// inside a field fails with that field's path.
    pub fn decode(&self, bytes: &[u8]) -> Result<Record<'_>, CodecError> {
        let root = self.root.decode(bytes, 0, &self.settings)?;
        Ok(Record::new(self, root))
    }

    /// Decode a stream of fixed-length records from a byte source.
    ///
    /// The returned iterator is finite and single-pass. A trailing
    /// short chunk (or a corrupt record) surfaces as an `Err` item the
    /// caller may skip; it never ends the stream early.
    pub fn decode_stream<R: Read>(&self, source: R) -> RecordStream<'_, R> {
        RecordStream::new(self, source)
    }

    /// Decode a record buffer through a REDEFINES alias: the alias
    /// element re-reads the byte range of its target field within the
    /// same buffer. A view, never a copy.
    pub fn decode_alias(&self, alias: &str, bytes: &[u8]) -> Result<Value, CodecError> {
        let redefine = self
            .redefines
            .lookup(alias)
            .ok_or_else(|| CodecError::UnknownField {
                path: alias.to_string(),
            })?;
        let offset = self
            .offset_of(redefine.target())
            .ok_or_else(|| CodecError::UnknownField {
                path: redefine.target().to_string(),
            })?;
        redefine.element().decode(bytes, offset, &self.settings)
    }

    /// Byte offset of the first field with the given name, searching
    /// the tree depth-first.
    pub fn offset_of(&self, name: &str) -> Option<usize> {
        find_offset(&self.root, name, 0)
    }

    /// The element a dotted path names; indices are bounds-checked
    /// against OCCURS counts.
    pub(crate) fn element_at(
        &self,
        segments: &[PathSegment],
        path: &str,
    ) -> Result<&Element, CodecError> {
        let mut group = &self.root;
        let mut element = None;
        for (i, segment) in segments.iter().enumerate() {
            let child = group
                .child(&segment.name)
                .ok_or_else(|| CodecError::UnknownField {
                    path: path.to_string(),
                })?;
            if let Some(index) = segment.index {
                if index >= child.occurs() as usize {
                    return Err(CodecError::IndexOutOfRange {
                        path: path.to_string(),
                        index,
                        occurs: child.occurs(),
                    });
                }
            }
            if i + 1 < segments.len() {
                group = child.as_group().ok_or_else(|| CodecError::UnknownField {
                    path: path.to_string(),
                })?;
            }
            element = Some(child);
        }
        element.ok_or_else(|| CodecError::UnknownField {
            path: path.to_string(),
        })
    }

    /// Convenience: the element a dotted path string names.
    pub fn element(&self, path: &str) -> Result<&Element, CodecError> {
        let segments = parse_path(path)?;
        self.element_at(&segments, path)
    }
}

fn find_offset(group: &Group, name: &str, base: usize) -> Option<usize> {
    let mut offset = base;
    for child in group.children() {
        if child.name().eq_ignore_ascii_case(name) {
            return Some(offset);
        }
        if let Element::Group(inner) = child {
            if let Some(found) = find_offset(inner, name, offset) {
                return Some(found);
            }
        }
        offset += child.total_length();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn latin1() -> Settings {
        Settings::default().with_encoding("latin1").unwrap()
    }

    fn events() -> Vec<FieldEvent> {
        vec![
            FieldEvent::new(1, "CUSTOMER"),
            FieldEvent::new(5, "CUST-ID").with_picture("9(4)"),
            FieldEvent::new(5, "NAME").with_picture("X(6)").with_value("NONE"),
            FieldEvent::new(5, "RAW-DATE").with_picture("X(8)"),
            FieldEvent::new(5, "NUM-DATE").with_picture("9(8)").with_redefines("RAW-DATE"),
        ]
    }

    #[test]
    fn test_parse_and_length() {
        let copybook = Copybook::parse("CUST", &events(), latin1()).unwrap();
        assert_eq!(copybook.name(), "CUST");
        assert_eq!(copybook.length(), 18);
        assert_eq!(copybook.root().children().len(), 1);
    }

    #[test]
    fn test_create_record_uses_literals() {
        let copybook = Copybook::parse("CUST", &events(), latin1()).unwrap();
        let record = copybook.create_record();
        assert_eq!(record.get("CUSTOMER.NAME").unwrap().as_text(), Some("NONE"));
        assert_eq!(
            record.get("CUSTOMER.CUST-ID").unwrap().as_number(),
            Some(Decimal::ZERO)
        );
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        let copybook = Copybook::parse("CUST", &events(), latin1()).unwrap();
        let mut buf = b"0042ACME  20240101".to_vec();
        buf.extend_from_slice(b"EXTRA");
        let record = copybook.decode(&buf).unwrap();
        assert_eq!(
            record.get("CUSTOMER.CUST-ID").unwrap().as_number(),
            Some(Decimal::from(42))
        );
    }

    #[test]
    fn test_decode_short_buffer_names_field() {
        let copybook = Copybook::parse("CUST", &events(), latin1()).unwrap();
        let err = copybook.decode(b"0042ACME  2024").unwrap_err();
        match err {
            CodecError::BufferTooShort { path, .. } => {
                assert_eq!(path, "CUST.CUSTOMER.RAW-DATE");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_alias_views_target_bytes() {
        let copybook = Copybook::parse("CUST", &events(), latin1()).unwrap();
        let buf = b"0042ACME  20240101".to_vec();

        let record = copybook.decode(&buf).unwrap();
        assert_eq!(
            record.get("CUSTOMER.RAW-DATE").unwrap().as_text(),
            Some("20240101")
        );

        // The alias reinterprets the identical byte range as a number.
        let value = copybook.decode_alias("NUM-DATE", &buf).unwrap();
        assert_eq!(value.as_number(), Some(Decimal::from(20_240_101)));
    }

    #[test]
    fn test_offset_of_nested_fields() {
        let copybook = Copybook::parse("CUST", &events(), latin1()).unwrap();
        assert_eq!(copybook.offset_of("CUST-ID"), Some(0));
        assert_eq!(copybook.offset_of("NAME"), Some(4));
        assert_eq!(copybook.offset_of("RAW-DATE"), Some(10));
        assert_eq!(copybook.offset_of("MISSING"), None);
    }

    #[test]
    fn test_element_lookup() {
        let copybook = Copybook::parse("CUST", &events(), latin1()).unwrap();
        let element = copybook.element("CUSTOMER.NAME").unwrap();
        assert_eq!(element.length(), 6);
        assert!(copybook.element("CUSTOMER.BOGUS").is_err());
    }

    #[test]
    fn test_roundtrip_byte_exact() {
        let copybook = Copybook::parse("CUST", &events(), latin1()).unwrap();
        let buf = b"0042ACME  20240101".to_vec();
        let record = copybook.decode(&buf).unwrap();
        assert_eq!(record.encode().unwrap(), buf);
    }
}
