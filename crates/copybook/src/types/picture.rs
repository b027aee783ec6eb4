//! PICTURE string parsing.
//!
//! Only the physical-layout subset is supported: `S`, `9`, `V` and the
//! `(n)` repetition for numerics, `X` and `A` for alphanumerics. Editing
//! pictures (Z, comma, currency) describe display formatting, not record
//! layout, and are rejected.

use crate::error::LayoutError;

/// Category a picture resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PictureCategory {
    /// Contains X or A positions; one byte per character.
    Alphanumeric,
    /// Only S/9/V positions; interpretation depends on USAGE.
    Numeric,
}

/// A parsed PICTURE clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Picture {
    raw: String,
    category: PictureCategory,
    signed: bool,
    integer_digits: u32,
    decimal_digits: u32,
    char_count: u32,
}

impl Picture {
    /// Parse a picture string. `field` names the declaring field for
    /// error reporting.
    pub fn parse(field: &str, picture: &str) -> Result<Self, LayoutError> {
        let invalid = || LayoutError::InvalidPicture {
            field: field.to_string(),
            picture: picture.to_string(),
        };

        let mut chars = picture.trim().chars().map(|c| c.to_ascii_uppercase()).peekable();

        let mut signed = false;
        let mut seen_v = false;
        let mut integer_digits = 0u32;
        let mut decimal_digits = 0u32;
        let mut char_count = 0u32;
        let mut has_alpha = false;
        let mut has_numeric = false;
        let mut first = true;

        while let Some(symbol) = chars.next() {
            if symbol == 'S' {
                if !first || signed {
                    return Err(invalid());
                }
                signed = true;
                first = false;
                continue;
            }
            first = false;

            if symbol == 'V' {
                if seen_v {
                    return Err(invalid());
                }
                seen_v = true;
                continue;
            }

            // Optional (n) repetition after a position symbol.
            let mut count = 1u32;
            if chars.peek() == Some(&'(') {
                chars.next();
                let mut digits = String::new();
                loop {
                    match chars.next() {
                        Some(')') => break,
                        Some(d) if d.is_ascii_digit() => digits.push(d),
                        _ => return Err(invalid()),
                    }
                }
                count = digits.parse().map_err(|_| invalid())?;
                if count == 0 {
                    return Err(invalid());
                }
            }

            match symbol {
                '9' => {
                    has_numeric = true;
                    char_count += count;
                    if seen_v {
                        decimal_digits += count;
                    } else {
                        integer_digits += count;
                    }
                }
                'X' | 'A' => {
                    has_alpha = true;
                    char_count += count;
                }
                _ => return Err(invalid()),
            }
        }

        if char_count == 0 {
            return Err(invalid());
        }

        // A picture mixing X/A with 9 is alphanumeric as a whole; S and V
        // only make sense on a pure numeric picture.
        let category = if has_alpha {
            if signed || seen_v {
                return Err(invalid());
            }
            PictureCategory::Alphanumeric
        } else {
            debug_assert!(has_numeric);
            PictureCategory::Numeric
        };

        Ok(Self {
            raw: picture.to_string(),
            category,
            signed,
            integer_digits,
            decimal_digits,
            char_count,
        })
    }

    /// The picture string as declared.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Resolved category.
    pub fn category(&self) -> PictureCategory {
        self.category
    }

    /// Whether the picture carries an S sign position.
    pub fn signed(&self) -> bool {
        self.signed
    }

    /// Total digit count (integer + decimal positions).
    pub fn digits(&self) -> u32 {
        self.integer_digits + self.decimal_digits
    }

    /// Digits before the implied decimal point.
    pub fn integer_digits(&self) -> u32 {
        self.integer_digits
    }

    /// Digits after the implied decimal point (the scale).
    pub fn scale(&self) -> u32 {
        self.decimal_digits
    }

    /// Character count for alphanumeric pictures.
    pub fn char_count(&self) -> u32 {
        self.char_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_with_scale() {
        let pic = Picture::parse("F", "S9(5)V99").unwrap();
        assert_eq!(pic.category(), PictureCategory::Numeric);
        assert!(pic.signed());
        assert_eq!(pic.integer_digits(), 5);
        assert_eq!(pic.scale(), 2);
        assert_eq!(pic.digits(), 7);
    }

    #[test]
    fn test_plain_numeric() {
        let pic = Picture::parse("F", "9(3)").unwrap();
        assert!(!pic.signed());
        assert_eq!(pic.digits(), 3);
        assert_eq!(pic.scale(), 0);
    }

    #[test]
    fn test_repeated_symbols() {
        let pic = Picture::parse("F", "999V9(2)").unwrap();
        assert_eq!(pic.integer_digits(), 3);
        assert_eq!(pic.scale(), 2);
    }

    #[test]
    fn test_alphanumeric() {
        let pic = Picture::parse("F", "X(10)").unwrap();
        assert_eq!(pic.category(), PictureCategory::Alphanumeric);
        assert_eq!(pic.char_count(), 10);

        let pic = Picture::parse("F", "A(3)XX").unwrap();
        assert_eq!(pic.char_count(), 5);
    }

    #[test]
    fn test_mixed_is_alphanumeric() {
        let pic = Picture::parse("F", "X9(3)").unwrap();
        assert_eq!(pic.category(), PictureCategory::Alphanumeric);
        assert_eq!(pic.char_count(), 4);
    }

    #[test]
    fn test_rejects_editing_pictures() {
        assert!(Picture::parse("F", "ZZ9.99").is_err());
        assert!(Picture::parse("F", "$999").is_err());
        assert!(Picture::parse("F", "").is_err());
        assert!(Picture::parse("F", "S").is_err());
        assert!(Picture::parse("F", "9(0)").is_err());
        assert!(Picture::parse("F", "SX(3)").is_err());
        assert!(Picture::parse("F", "9S9").is_err());
        assert!(Picture::parse("F", "9V9V9").is_err());
    }

    #[test]
    fn test_lowercase_accepted() {
        let pic = Picture::parse("F", "s9(4)v99").unwrap();
        assert!(pic.signed());
        assert_eq!(pic.digits(), 6);
    }
}
