//! Field-declaration events, as produced by an external copybook
//! grammar walk.
//!
//! The grammar engine that tokenizes copybook source is a separate
//! concern; it hands this crate an ordered list of [`FieldEvent`]s.
//! Order is semantically load-bearing: nesting is reconstructed from
//! level numbers by the tree builder, not carried in the events.

use serde::{Deserialize, Serialize};

/// USAGE clause: a field's physical storage representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Usage {
    /// DISPLAY (the default).
    Display,
    /// BINARY / COMP / COMP-4.
    Binary,
    /// COMP-1 (single precision float).
    Comp1,
    /// COMP-2 (double precision float).
    Comp2,
    /// COMP-3 / PACKED-DECIMAL.
    PackedDecimal,
    /// COMP-5 (native binary).
    Comp5,
}

/// SIGN clause on a numeric field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignClause {
    /// LEADING (true) or TRAILING (false).
    pub leading: bool,
    /// SEPARATE CHARACTER: the sign is its own byte instead of an
    /// overpunch.
    pub separate: bool,
}

/// One field declaration from the grammar walk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldEvent {
    /// Field name as declared.
    pub name: String,
    /// Level number, 1-49 (66/77/88 are recognized and skipped).
    pub level: u8,
    /// PICTURE string, absent for groups and floats.
    #[serde(default)]
    pub picture: Option<String>,
    /// USAGE clause, absent for DISPLAY.
    #[serde(default)]
    pub usage: Option<Usage>,
    /// OCCURS count; 1 when not repeated.
    #[serde(default = "default_occurs")]
    pub occurs: u32,
    /// OCCURS DEPENDING ON variable — recognized, never honored.
    #[serde(default)]
    pub depending_on: Option<String>,
    /// SIGN clause, absent for the settings default.
    #[serde(default)]
    pub sign: Option<SignClause>,
    /// REDEFINES target field name.
    #[serde(default)]
    pub redefines: Option<String>,
    /// VALUE literals, already unquoted by the grammar.
    #[serde(default)]
    pub values: Vec<String>,
}

fn default_occurs() -> u32 {
    1
}

impl FieldEvent {
    /// A bare declaration with just a level and name.
    pub fn new(level: u8, name: &str) -> Self {
        Self {
            name: name.to_string(),
            level,
            picture: None,
            usage: None,
            occurs: 1,
            depending_on: None,
            sign: None,
            redefines: None,
            values: Vec::new(),
        }
    }

    /// Attach a PICTURE string.
    pub fn with_picture(mut self, picture: &str) -> Self {
        self.picture = Some(picture.to_string());
        self
    }

    /// Attach a USAGE clause.
    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.usage = Some(usage);
        self
    }

    /// Attach an OCCURS count.
    pub fn with_occurs(mut self, occurs: u32) -> Self {
        self.occurs = occurs.max(1);
        self
    }

    /// Attach a SIGN clause.
    pub fn with_sign(mut self, leading: bool, separate: bool) -> Self {
        self.sign = Some(SignClause { leading, separate });
        self
    }

    /// Attach a REDEFINES target.
    pub fn with_redefines(mut self, target: &str) -> Self {
        self.redefines = Some(target.to_string());
        self
    }

    /// Attach a VALUE literal.
    pub fn with_value(mut self, literal: &str) -> Self {
        self.values.push(literal.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let event = FieldEvent::new(5, "AMOUNT");
        assert_eq!(event.occurs, 1);
        assert!(event.picture.is_none());
        assert!(event.values.is_empty());
    }

    #[test]
    fn test_occurs_floor_is_one() {
        assert_eq!(FieldEvent::new(5, "F").with_occurs(0).occurs, 1);
    }

    #[test]
    fn test_deserializes_with_defaults() {
        let event: FieldEvent =
            serde_json::from_str(r#"{"name": "CUST-ID", "level": 5, "picture": "9(6)"}"#).unwrap();
        assert_eq!(event.occurs, 1);
        assert_eq!(event.picture.as_deref(), Some("9(6)"));
        assert!(event.usage.is_none());
    }
}
