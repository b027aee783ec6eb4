//! Floating-point (COMP-1/COMP-2) fields.
//!
//! A `Floating` field is 4 bytes (single) or 8 bytes (double); the bit
//! pattern is owned by the configured [`conversion`] strategy, because
//! records written on pre-IEEE mainframes use IBM hexadecimal floating
//! point and must remain decodable without changing this element's
//! contract.

pub mod conversion;

use rust_decimal::prelude::ToPrimitive;

use crate::data::Value;
use crate::error::CodecError;
use crate::settings::{FloatConversion, Settings};

use super::field_bytes;

/// Single (4-byte) or double (8-byte) precision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FloatPrecision {
    /// COMP-1, 4 bytes.
    Single,
    /// COMP-2, 8 bytes.
    Double,
}

/// Floating-point field delegating its codec to the conversion strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct Floating {
    pub(crate) name: String,
    pub(crate) level: u8,
    pub(crate) occurs: u32,
    pub(crate) precision: FloatPrecision,
    pub(crate) literals: Vec<String>,
}

impl Floating {
    pub(crate) fn new(name: String, level: u8, occurs: u32, precision: FloatPrecision) -> Self {
        Self {
            name,
            level,
            occurs,
            precision,
            literals: Vec::new(),
        }
    }

    /// Byte length: 4 for single, 8 for double precision.
    pub fn length(&self) -> usize {
        match self.precision {
            FloatPrecision::Single => 4,
            FloatPrecision::Double => 8,
        }
    }

    pub(crate) fn decode(
        &self,
        buf: &[u8],
        offset: usize,
        settings: &Settings,
    ) -> Result<Value, CodecError> {
        let bytes = field_bytes(buf, offset, self.length(), &self.name)?;
        let result = match (settings.float_conversion(), self.precision) {
            (FloatConversion::Ieee754, FloatPrecision::Single) => {
                conversion::decode_ieee_single(bytes.try_into().expect("length checked"))
            }
            (FloatConversion::Ieee754, FloatPrecision::Double) => {
                conversion::decode_ieee_double(bytes.try_into().expect("length checked"))
            }
            (FloatConversion::Hfp, FloatPrecision::Single) => {
                Ok(conversion::decode_hfp_single(bytes.try_into().expect("length checked")))
            }
            (FloatConversion::Hfp, FloatPrecision::Double) => {
                Ok(conversion::decode_hfp_double(bytes.try_into().expect("length checked")))
            }
        };
        let value = result.map_err(|message| CodecError::Float {
            path: self.name.clone(),
            message,
        })?;
        Ok(Value::Float(value))
    }

    pub(crate) fn encode(&self, value: &Value, settings: &Settings) -> Result<Vec<u8>, CodecError> {
        let float = match value {
            Value::Float(f) => *f,
            // A decimal set through the record API is accepted and
            // converted, the way DISPLAY-to-COMP moves behave.
            Value::Number(n) => n.to_f64().ok_or_else(|| CodecError::Float {
                path: self.name.clone(),
                message: format!("{n} is not representable as a float"),
            })?,
            _ => {
                return Err(CodecError::TypeMismatch {
                    path: self.name.clone(),
                    expected: "float",
                })
            }
        };

        let result = match (settings.float_conversion(), self.precision) {
            (FloatConversion::Ieee754, FloatPrecision::Single) => {
                conversion::encode_ieee_single(float).map(|b| b.to_vec())
            }
            (FloatConversion::Ieee754, FloatPrecision::Double) => {
                conversion::encode_ieee_double(float).map(|b| b.to_vec())
            }
            (FloatConversion::Hfp, FloatPrecision::Single) => {
                conversion::encode_hfp_single(float).map(|b| b.to_vec())
            }
            (FloatConversion::Hfp, FloatPrecision::Double) => {
                conversion::encode_hfp_double(float).map(|b| b.to_vec())
            }
        };
        result.map_err(|message| CodecError::Float {
            path: self.name.clone(),
            message,
        })
    }

    pub(crate) fn default_float(&self) -> f64 {
        self.literals
            .first()
            .and_then(|lit| lit.trim().parse().ok())
            .unwrap_or(0.0)
    }
}
