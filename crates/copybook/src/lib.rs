//! COBOL copybook record layouts for OpenMainframe-style tooling.
//!
//! A copybook describes a fixed-format record: nested field groups,
//! repeated fields (OCCURS), several binary numeric storage encodings,
//! and overlapping alternate views of the same bytes (REDEFINES). This
//! crate does two things with that description:
//!
//! 1. **Layout resolution** — turn an ordered list of field
//!    declarations into an immutable, offset-resolved element tree.
//! 2. **Record codecs** — decode raw byte buffers into typed value
//!    trees and re-encode them byte-exactly, per storage format:
//!    packed decimal (COMP-3), zoned decimal with sign overpunch,
//!    big/little/native-endian binary (COMP/COMP-5), separate-sign
//!    display, and single/double floating (IEEE 754 or IBM HFP).
//!
//! The copybook text grammar is a separate concern: an external
//! grammar walk supplies [`FieldEvent`]s, and this crate takes over
//! from there.
//!
//! # Example
//!
//! ```rust
//! use copybook::{Copybook, FieldEvent, Settings, Usage};
//!
//! let events = vec![
//!     FieldEvent::new(1, "ACCOUNT"),
//!     FieldEvent::new(5, "ACCT-ID").with_picture("9(6)"),
//!     FieldEvent::new(5, "BALANCE")
//!         .with_picture("S9(7)V99")
//!         .with_usage(Usage::PackedDecimal),
//! ];
//! let settings = Settings::default().with_encoding("CP037")?;
//! let copybook = Copybook::parse("ACCOUNTS", &events, settings)?;
//! assert_eq!(copybook.length(), 11);
//!
//! let mut record = copybook.create_record();
//! record.set("ACCOUNT.BALANCE", "-1234.56".parse::<rust_decimal::Decimal>().unwrap())?;
//! let bytes = record.encode()?;
//! assert_eq!(bytes.len(), copybook.length());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![forbid(unsafe_code)]

pub mod charset;
pub mod data;
pub mod error;
pub mod layout;
pub mod settings;
pub mod stream;
pub mod types;

pub use charset::{CodePage, CP037, LATIN1};
pub use data::{FieldValue, Record, Value};
pub use error::{CodecError, LayoutError};
pub use layout::{Copybook, FieldEvent, Redefine, RedefineRegistry, SignClause, Usage};
pub use settings::{FloatConversion, Settings, SignPosition};
pub use stream::{RecordStream, Segmenter};
pub use types::{
    AlphaNumeric, Binary, Element, FloatPrecision, Floating, Group, Packed, Picture,
    PictureCategory, SignedSeparate, Zoned,
};

/// Result type for layout construction.
pub type LayoutResult<T> = std::result::Result<T, LayoutError>;

/// Result type for decode/encode operations.
pub type CodecResult<T> = std::result::Result<T, CodecError>;
