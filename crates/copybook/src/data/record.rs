//! Records: one value tree bound to its layout.

use crate::error::CodecError;
use crate::layout::Copybook;

use super::{parse_path, PathSegment, Value};

/// A single record: the layout's value tree plus the layout itself.
///
/// Records are created empty (from VALUE literals) or by decoding a
/// buffer, mutated through [`Record::set`], and serialized back with
/// [`Record::encode`]. A record is independent of the buffer it was
/// decoded from; share the layout freely, not the record.
#[derive(Debug, Clone)]
pub struct Record<'a> {
    copybook: &'a Copybook,
    root: Value,
}

impl<'a> Record<'a> {
    pub(crate) fn new(copybook: &'a Copybook, root: Value) -> Self {
        Self { copybook, root }
    }

    /// The layout this record conforms to.
    pub fn copybook(&self) -> &'a Copybook {
        self.copybook
    }

    /// The root group value.
    pub fn value(&self) -> &Value {
        &self.root
    }

    /// Look up a value by dotted path, e.g. `CUSTOMER.ORDERS[2].AMOUNT`.
    /// An omitted `[i]` index means the first occurrence.
    pub fn get(&self, path: &str) -> Result<&Value, CodecError> {
        let segments = parse_path(path)?;
        resolve(&self.root, &segments, path)
    }

    /// Replace a value by dotted path.
    ///
    /// The new value is validated against the field's element before it
    /// is stored: an out-of-capacity number fails here, immediately,
    /// rather than surfacing later from [`Record::encode`] — nothing is
    /// ever stored truncated.
    pub fn set(&mut self, path: &str, value: impl Into<Value>) -> Result<(), CodecError> {
        let segments = parse_path(path)?;
        let value = value.into();

        let element = self.copybook.element_at(&segments, path)?;
        element.encode(&value, self.copybook.settings())?;

        *resolve_mut(&mut self.root, &segments, path)? = value;
        Ok(())
    }

    /// Serialize the whole tree into exactly
    /// [`Copybook::length`](crate::layout::Copybook::length) bytes,
    /// regardless of how many fields changed.
    pub fn encode(&self) -> Result<Vec<u8>, CodecError> {
        let bytes = self
            .copybook
            .root()
            .encode(&self.root, self.copybook.settings())?;
        debug_assert_eq!(bytes.len(), self.copybook.length());
        Ok(bytes)
    }
}

fn resolve<'v>(
    mut current: &'v Value,
    segments: &[PathSegment],
    path: &str,
) -> Result<&'v Value, CodecError> {
    for segment in segments {
        let Value::Group(fields) = current else {
            return Err(CodecError::UnknownField {
                path: path.to_string(),
            });
        };
        let field = fields
            .iter()
            .find(|f| f.name.eq_ignore_ascii_case(&segment.name))
            .ok_or_else(|| CodecError::UnknownField {
                path: path.to_string(),
            })?;
        let index = segment.index.unwrap_or(0);
        let occurs = field.occurrences.len() as u32;
        current = field
            .occurrences
            .get(index)
            .ok_or_else(|| CodecError::IndexOutOfRange {
                path: path.to_string(),
                index,
                occurs,
            })?;
    }
    Ok(current)
}

fn resolve_mut<'v>(
    mut current: &'v mut Value,
    segments: &[PathSegment],
    path: &str,
) -> Result<&'v mut Value, CodecError> {
    for segment in segments {
        let Value::Group(fields) = current else {
            return Err(CodecError::UnknownField {
                path: path.to_string(),
            });
        };
        let field = fields
            .iter_mut()
            .find(|f| f.name.eq_ignore_ascii_case(&segment.name))
            .ok_or_else(|| CodecError::UnknownField {
                path: path.to_string(),
            })?;
        let index = segment.index.unwrap_or(0);
        let occurs = field.occurrences.len() as u32;
        current = field
            .occurrences
            .get_mut(index)
            .ok_or_else(|| CodecError::IndexOutOfRange {
                path: path.to_string(),
                index,
                occurs,
            })?;
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{FieldEvent, Usage};
    use crate::settings::Settings;
    use rust_decimal::Decimal;

    fn sample_copybook() -> Copybook {
        let events = vec![
            FieldEvent::new(1, "ORDER"),
            FieldEvent::new(5, "ORDER-ID").with_picture("9(5)"),
            FieldEvent::new(5, "LINES").with_occurs(2),
            FieldEvent::new(10, "SKU").with_picture("X(4)"),
            FieldEvent::new(10, "QTY")
                .with_picture("S9(4)")
                .with_usage(Usage::Binary),
        ];
        let settings = Settings::default().with_encoding("latin1").unwrap();
        Copybook::parse("ORDERS", &events, settings).unwrap()
    }

    #[test]
    fn test_create_get_set_encode() {
        let copybook = sample_copybook();
        let mut record = copybook.create_record();

        record.set("ORDER.ORDER-ID", 123i64).unwrap();
        record.set("ORDER.LINES[0].SKU", "AB12").unwrap();
        record.set("ORDER.LINES[0].QTY", 7i64).unwrap();
        record.set("ORDER.LINES[1].SKU", "CD34").unwrap();
        record.set("ORDER.LINES[1].QTY", -2i64).unwrap();

        assert_eq!(
            record.get("ORDER.LINES[1].QTY").unwrap().as_number(),
            Some(Decimal::from(-2))
        );

        let bytes = record.encode().unwrap();
        assert_eq!(bytes.len(), copybook.length());
        assert_eq!(&bytes[0..5], b"00123");
        assert_eq!(&bytes[5..9], b"AB12");
        assert_eq!(&bytes[9..11], &[0x00, 0x07]);
        assert_eq!(&bytes[11..15], b"CD34");
        assert_eq!(&bytes[15..17], &[0xFF, 0xFE]);
    }

    #[test]
    fn test_set_out_of_range_fails_immediately() {
        let copybook = sample_copybook();
        let mut record = copybook.create_record();

        let err = record.set("ORDER.ORDER-ID", 123456i64).unwrap_err();
        assert!(matches!(err, CodecError::Overflow { .. }));
        // The stored value is untouched.
        assert_eq!(
            record.get("ORDER.ORDER-ID").unwrap().as_number(),
            Some(Decimal::ZERO)
        );
    }

    #[test]
    fn test_get_unknown_field() {
        let copybook = sample_copybook();
        let record = copybook.create_record();
        assert!(matches!(
            record.get("ORDER.NOPE"),
            Err(CodecError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_get_index_out_of_range() {
        let copybook = sample_copybook();
        let record = copybook.create_record();
        assert!(matches!(
            record.get("ORDER.LINES[2].SKU"),
            Err(CodecError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_case_insensitive_paths() {
        let copybook = sample_copybook();
        let record = copybook.create_record();
        assert!(record.get("order.lines[1].sku").is_ok());
    }
}
