//! Fixed-width integers standing in for floats in a known range.

const U16MAX: f64 = 65535.0;
const OOU16MAX: f64 = 1.0 / U16MAX;

/// Maps `x` from `[0, 65535]` onto `[lower, upper]`. Values closer to zero
/// than one quantization step come out as exactly zero.
pub fn dequantize_u16(x: u16, lower: f64, upper: f64) -> f64 {
    let delta = upper - lower;
    let val = x as f64 * OOU16MAX * delta + lower;
    let max_error = delta * OOU16MAX;
    if val.abs() < max_error {
        0.0
    } else {
        val
    }
}

/// Inverse of `dequantize_u16`; `val` is clamped to `[lower, upper]`.
#[cfg(test)]
pub fn quantize_u16(val: f64, lower: f64, upper: f64) -> u16 {
    let val = val.max(lower).min(upper);
    let normalized = (val - lower) / (upper - lower);
    (normalized * U16MAX).round() as u16
}

#[test]
fn test_dequantize() {
    assert_eq!(dequantize_u16(0, -1.0, 1.0), -1.0);
    assert_eq!(dequantize_u16(65535, -1.0, 1.0), 1.0);
    assert_eq!(dequantize_u16(0, 0.0, 2.0), 0.0);
    assert_eq!(dequantize_u16(65535, 0.0, 2.0), 2.0);

    // Neither middle step lands on zero exactly, but both snap to it.
    assert_eq!(dequantize_u16(32767, -1.0, 1.0), 0.0);
    assert_eq!(dequantize_u16(32768, -1.0, 1.0), 0.0);
    assert_eq!(dequantize_u16(32768, -5.0, 5.0), 0.0);
}

#[test]
fn test_quantize_is_close_inverse() {
    for &v in &[-0.9, -0.25, 0.0, 0.3, 0.999] {
        let x = quantize_u16(v, -1.0, 1.0);
        assert!((dequantize_u16(x, -1.0, 1.0) - v).abs() <= 1.0 / 65535.0);
    }
    assert_eq!(quantize_u16(7.0, -5.0, 5.0), 65535);
    assert_eq!(quantize_u16(-7.0, -5.0, 5.0), 0);
}
