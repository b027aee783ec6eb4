//! Floating-point conversion strategies.
//!
//! Two byte-pattern families are supported:
//!
//! - **IEEE 754** big-endian single/double precision, the format modern
//!   systems write.
//! - **IBM HFP** (hexadecimal floating point) from System/370 and
//!   z/Architecture: base-16 exponent with bias 64, no implicit leading
//!   bit, no NaN/Infinity, no denormals.
//!
//! HFP short layout: `[S|EEEEEEE|F x 24]`; long: `[S|EEEEEEE|F x 56]`.
//! Value = (-1)^S x 0.fraction x 16^(exponent - 64).
//!
//! Errors are plain messages; the owning element attaches the field
//! path.

/// Encode big-endian IEEE 754 single precision.
pub fn encode_ieee_single(value: f64) -> Result<[u8; 4], String> {
    let f = value as f32;
    if f.is_nan() {
        return Err("NaN cannot be encoded as single-precision float".to_string());
    }
    if f.is_infinite() && !value.is_infinite() {
        return Err(format!("{value} overflows single precision"));
    }
    Ok(f.to_be_bytes())
}

/// Decode big-endian IEEE 754 single precision.
pub fn decode_ieee_single(bytes: &[u8; 4]) -> Result<f64, String> {
    let f = f32::from_be_bytes(*bytes);
    if f.is_nan() {
        return Err("NaN in single-precision float".to_string());
    }
    Ok(f.into())
}

/// Encode big-endian IEEE 754 double precision.
pub fn encode_ieee_double(value: f64) -> Result<[u8; 8], String> {
    if value.is_nan() {
        return Err("NaN cannot be encoded as double-precision float".to_string());
    }
    Ok(value.to_be_bytes())
}

/// Decode big-endian IEEE 754 double precision.
pub fn decode_ieee_double(bytes: &[u8; 8]) -> Result<f64, String> {
    let f = f64::from_be_bytes(*bytes);
    if f.is_nan() {
        return Err("NaN in double-precision float".to_string());
    }
    Ok(f)
}

fn hfp_reject(value: f64) -> Result<(), String> {
    if value.is_nan() {
        return Err("HFP has no NaN representation".to_string());
    }
    if value.is_infinite() {
        return Err("HFP has no Infinity representation".to_string());
    }
    Ok(())
}

/// Normalize to base-16: returns (fraction in [1/16, 1), hex exponent).
fn hfp_normalize(abs_val: f64) -> (f64, i32) {
    let mut hex_exp = (abs_val.log2() / 4.0).ceil() as i32;
    let mut fraction = abs_val / 16.0_f64.powi(hex_exp);
    if fraction >= 1.0 {
        hex_exp += 1;
        fraction /= 16.0;
    }
    if fraction < 1.0 / 16.0 && fraction > 0.0 {
        hex_exp -= 1;
        fraction *= 16.0;
    }
    (fraction, hex_exp)
}

/// Encode IBM HFP short (4 bytes).
pub fn encode_hfp_single(value: f64) -> Result<[u8; 4], String> {
    hfp_reject(value)?;
    if value == 0.0 {
        return Ok([0u8; 4]);
    }

    let sign = u8::from(value < 0.0);
    let (fraction, hex_exp) = hfp_normalize(value.abs());
    let biased_exp = (hex_exp + 64).clamp(0, 127) as u8;
    let frac_bits = ((fraction * (1u64 << 24) as f64).round() as u32) & 0x00FF_FFFF;

    Ok([
        (sign << 7) | biased_exp,
        ((frac_bits >> 16) & 0xFF) as u8,
        ((frac_bits >> 8) & 0xFF) as u8,
        (frac_bits & 0xFF) as u8,
    ])
}

/// Decode IBM HFP short (4 bytes). Every bit pattern is a finite value.
pub fn decode_hfp_single(bytes: &[u8; 4]) -> f64 {
    let sign = (bytes[0] >> 7) & 1;
    let biased_exp = (bytes[0] & 0x7F) as i32;
    let fraction = (u32::from(bytes[1]) << 16) | (u32::from(bytes[2]) << 8) | u32::from(bytes[3]);

    if fraction == 0 && biased_exp == 0 {
        return 0.0;
    }

    let value = f64::from(fraction) / (1u64 << 24) as f64 * 16.0_f64.powi(biased_exp - 64);
    if sign == 1 {
        -value
    } else {
        value
    }
}

/// Encode IBM HFP long (8 bytes).
pub fn encode_hfp_double(value: f64) -> Result<[u8; 8], String> {
    hfp_reject(value)?;
    if value == 0.0 {
        return Ok([0u8; 8]);
    }

    let sign = u8::from(value < 0.0);
    let (fraction, hex_exp) = hfp_normalize(value.abs());
    let biased_exp = (hex_exp + 64).clamp(0, 127) as u8;
    let frac_bits = ((fraction * (1u64 << 56) as f64).round() as u64) & 0x00FF_FFFF_FFFF_FFFF;

    let mut out = [0u8; 8];
    out[0] = (sign << 7) | biased_exp;
    for (i, byte) in out.iter_mut().skip(1).enumerate() {
        *byte = ((frac_bits >> (48 - i * 8)) & 0xFF) as u8;
    }
    Ok(out)
}

/// Decode IBM HFP long (8 bytes). Every bit pattern is a finite value.
pub fn decode_hfp_double(bytes: &[u8; 8]) -> f64 {
    let sign = (bytes[0] >> 7) & 1;
    let biased_exp = (bytes[0] & 0x7F) as i32;
    let mut fraction: u64 = 0;
    for &b in &bytes[1..] {
        fraction = (fraction << 8) | u64::from(b);
    }

    if fraction == 0 && biased_exp == 0 {
        return 0.0;
    }

    let value = fraction as f64 / (1u64 << 56) as f64 * 16.0_f64.powi(biased_exp - 64);
    if sign == 1 {
        -value
    } else {
        value
    }
}
