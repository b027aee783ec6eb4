//! Error types for layout construction and record codecs.
//!
//! Two distinct failure levels exist and never mix:
//!
//! - [`LayoutError`] — the copybook itself is inconsistent. Always fatal
//!   to layout construction.
//! - [`CodecError`] — a single decode/encode call violated the format.
//!   Fatal to that call only; sibling fields already processed are
//!   unaffected, and stream scanners may skip the failing record.

use miette::Diagnostic;
use thiserror::Error;

/// Errors raised while resolving a copybook layout tree.
#[derive(Debug, Error, Diagnostic)]
pub enum LayoutError {
    /// A REDEFINES clause names a field that does not exist.
    #[error("REDEFINES target not found: {target} (redefined by {alias})")]
    #[diagnostic(
        code(copybook::layout::unknown_redefines_target),
        help("The target of a REDEFINES must be an earlier sibling at the same level")
    )]
    UnknownRedefinesTarget {
        /// The redefining field.
        alias: String,
        /// The missing target name.
        target: String,
    },

    /// A level number outside the supported 1-49 range (other than the
    /// recognized-and-skipped 66/77/88).
    #[error("Invalid level number {level} on field {field}")]
    #[diagnostic(code(copybook::layout::invalid_level))]
    InvalidLevel {
        /// The offending field name.
        field: String,
        /// The declared level.
        level: u8,
    },

    /// A PICTURE string that parses as neither numeric nor alphanumeric.
    #[error("Unsupported PICTURE '{picture}' on field {field}")]
    #[diagnostic(
        code(copybook::layout::invalid_picture),
        help("Supported pictures use S, 9, V, X, A and (n) repetition")
    )]
    InvalidPicture {
        /// The offending field name.
        field: String,
        /// The picture string as declared.
        picture: String,
    },

    /// A PICTURE and USAGE combination with no valid resolution.
    #[error("Cannot resolve field {field}: {reason}")]
    #[diagnostic(code(copybook::layout::unresolvable_field))]
    Unresolvable {
        /// The offending field name.
        field: String,
        /// Why no element variant fits.
        reason: String,
    },

    /// Declared digit count exceeds what the storage format can hold.
    #[error("Field {field} declares {digits} digits; the maximum is {max}")]
    #[diagnostic(code(copybook::layout::too_many_digits))]
    TooManyDigits {
        /// The offending field name.
        field: String,
        /// Declared digit count.
        digits: u32,
        /// Maximum supported by the storage format.
        max: u32,
    },

    /// The configured character encoding is not a known code page.
    #[error("Unknown code page: {name}")]
    #[diagnostic(
        code(copybook::layout::unknown_code_page),
        help("Known pages: CP037 (and IBM-037/EBCDIC aliases), LATIN1 (and ISO-8859-1/ASCII aliases)")
    )]
    UnknownCodePage {
        /// The requested page name.
        name: String,
    },
}

/// Errors raised by a single decode or encode pass.
///
/// Every variant that concerns a field carries the field's path from the
/// record root (for example `CUSTOMER.ORDERS[2].AMOUNT`) so a failing
/// record can be diagnosed without replaying the pass.
#[derive(Debug, Error, Diagnostic)]
pub enum CodecError {
    /// The buffer ended before the field's byte range.
    #[error("Buffer too short for {path}: need {needed} bytes, have {available}")]
    #[diagnostic(code(copybook::codec::buffer_too_short))]
    BufferTooShort {
        /// Path of the field being decoded.
        path: String,
        /// Bytes the field requires.
        needed: usize,
        /// Bytes remaining in the buffer.
        available: usize,
    },

    /// A byte that should hold a digit does not, under the configured
    /// encoding.
    #[error("Invalid digit byte 0x{byte:02X} in {path}")]
    #[diagnostic(code(copybook::codec::invalid_digit))]
    InvalidDigit {
        /// Path of the field being decoded.
        path: String,
        /// The offending byte.
        byte: u8,
    },

    /// A sign nibble or sign byte outside the recognized conventions.
    #[error("Invalid sign 0x{value:02X} in {path}")]
    #[diagnostic(code(copybook::codec::invalid_sign))]
    InvalidSign {
        /// Path of the field being decoded.
        path: String,
        /// The offending nibble or byte.
        value: u8,
    },

    /// An encoded value's magnitude or precision exceeds the picture's
    /// declared capacity. Numeric overflow is always fatal, never
    /// silently truncated.
    #[error("Value {value} does not fit {path}: {reason}")]
    #[diagnostic(code(copybook::codec::overflow))]
    Overflow {
        /// Path of the field being encoded.
        path: String,
        /// The rejected value, as text.
        value: String,
        /// Which capacity was exceeded.
        reason: String,
    },

    /// A value of the wrong kind was supplied for a field.
    #[error("Type mismatch at {path}: expected {expected}")]
    #[diagnostic(code(copybook::codec::type_mismatch))]
    TypeMismatch {
        /// Path of the field.
        path: String,
        /// The kind of value the element accepts.
        expected: &'static str,
    },

    /// Text that cannot be represented in the configured code page.
    #[error("Cannot encode {path} in {page}: {message}")]
    #[diagnostic(code(copybook::codec::charset))]
    Charset {
        /// Path of the field being encoded.
        path: String,
        /// The code page name.
        page: &'static str,
        /// What failed.
        message: String,
    },

    /// A floating value the conversion strategy cannot represent.
    #[error("Float conversion failed at {path}: {message}")]
    #[diagnostic(code(copybook::codec::float))]
    Float {
        /// Path of the field.
        path: String,
        /// What failed.
        message: String,
    },

    /// A get/set path that names no field in the layout.
    #[error("No field at path {path}")]
    #[diagnostic(code(copybook::codec::unknown_field))]
    UnknownField {
        /// The path as given.
        path: String,
    },

    /// An occurrence index outside the field's OCCURS count.
    #[error("Index {index} out of range for {path} (occurs {occurs})")]
    #[diagnostic(code(copybook::codec::index_out_of_range))]
    IndexOutOfRange {
        /// The path as given.
        path: String,
        /// The requested occurrence.
        index: usize,
        /// The declared OCCURS count.
        occurs: u32,
    },

    /// An I/O failure from the underlying byte source, propagated
    /// unrecovered.
    #[error("I/O error: {0}")]
    #[diagnostic(code(copybook::codec::io))]
    Io(#[from] std::io::Error),
}

impl CodecError {
    /// Prefix the error's field path with a parent segment.
    ///
    /// Group decodes use this to grow a leaf's failure path into the full
    /// path from the record root.
    pub(crate) fn under(mut self, parent: &str) -> Self {
        if parent.is_empty() {
            return self;
        }
        if let Some(path) = self.path_mut() {
            if path.is_empty() {
                *path = parent.to_string();
            } else {
                *path = format!("{parent}.{path}");
            }
        }
        self
    }

    fn path_mut(&mut self) -> Option<&mut String> {
        match self {
            CodecError::BufferTooShort { path, .. }
            | CodecError::InvalidDigit { path, .. }
            | CodecError::InvalidSign { path, .. }
            | CodecError::Overflow { path, .. }
            | CodecError::TypeMismatch { path, .. }
            | CodecError::Charset { path, .. }
            | CodecError::Float { path, .. }
            | CodecError::UnknownField { path }
            | CodecError::IndexOutOfRange { path, .. } => Some(path),
            CodecError::Io(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_under_prefixes_path() {
        let err = CodecError::InvalidDigit {
            path: "AMOUNT".to_string(),
            byte: 0xFF,
        };
        let err = err.under("ORDER").under("CUSTOMER");
        assert_eq!(
            err.to_string(),
            "Invalid digit byte 0xFF in CUSTOMER.ORDER.AMOUNT"
        );
    }

    #[test]
    fn test_under_leaves_io_alone() {
        let err = CodecError::Io(std::io::Error::new(std::io::ErrorKind::Other, "boom"));
        let err = err.under("ROOT");
        assert!(matches!(err, CodecError::Io(_)));
    }
}
