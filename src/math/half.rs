//! Half-precision to single-precision conversion.
//!
//! Matches the unit's unpack behavior, including its handling of half
//! subnormals: the fraction is shifted up until the implicit leading bit
//! appears, decrementing the exponent from zero as it goes, then rebiased
//! with `+112`. Inf/NaN encodings keep their fraction bits unshifted in
//! the low bits of the single-precision result.

/// Sign bit position in a half-precision value.
const SIGN_SHIFT: u32 = 15;
/// Exponent field position.
const EXP_SHIFT: u32 = 10;
/// Exponent field mask.
const EXP_MASK: u32 = 0x1F;
/// Fraction field mask.
const FRAC_MASK: u32 = 0x3FF;

/// Convert a half-precision bit pattern to a single-precision float.
pub fn half_to_float(half: u16) -> f32 {
    let half = half as u32;
    let sign = (half >> SIGN_SHIFT) & 1;
    let mut exponent = ((half >> EXP_SHIFT) & EXP_MASK) as i32;
    let mut fraction = half & FRAC_MASK;

    let bits = if exponent == EXP_MASK as i32 {
        // Inf/NaN: fraction passes through in the low bits.
        (sign << 31) | (255 << 23) | fraction
    } else if exponent == 0 && fraction == 0 {
        sign << 31
    } else {
        if exponent == 0 {
            // Renormalize a half subnormal.
            loop {
                fraction <<= 1;
                exponent -= 1;
                if fraction & (FRAC_MASK + 1) != 0 {
                    break;
                }
            }
            fraction &= FRAC_MASK;
        }
        (sign << 31) | (((exponent + 112) as u32) << 23) | (fraction << 13)
    };
    f32::from_bits(bits)
}
