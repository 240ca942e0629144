//! Hardware-exact VFPU arithmetic.
//!
//! The VFPU does not round the way an IEEE-correct library does, and guest
//! software depends on the difference: dot products accumulate in fixed
//! point and round once, sqrt/rsqrt run a fixed number of Newton
//! iterations and leave the low two mantissa bits cleared, and the trig
//! unit measures angles in turns (1.0 = 90°) with its own reduction and
//! precision cutoff. Everything here works on 32-bit IEEE-754 bit patterns
//! directly; substituting standard library `sqrt`/`sin`/`cos` would
//! silently change results.
//!
//! Every function is total: all 2^32 input patterns, including every
//! NaN/Inf/denormal/signed-zero encoding, have a defined output.

mod dot;
mod half;
mod roots;
mod trig;

pub use dot::vfpu_dot;
pub use half::half_to_float;
pub use roots::{vfpu_rsqrt, vfpu_sqrt};
pub use trig::{vfpu_cos, vfpu_sin, vfpu_sincos};

/// Canonical NaN produced by the unit for invalid operations.
pub(crate) const CANONICAL_NAN: u32 = 0x7F80_0001;

/// Biased exponent field.
#[inline]
pub(crate) fn get_uexp(x: u32) -> u32 {
    (x >> 23) & 0xFF
}

/// Unbiased exponent.
#[inline]
pub(crate) fn get_exp(x: u32) -> i32 {
    get_uexp(x) as i32 - 127
}

/// Mantissa with the hidden 1 restored.
#[inline]
pub(crate) fn get_mant(x: u32) -> u32 {
    (x & 0x007F_FFFF) | 0x0080_0000
}

/// Sign bit, in place.
#[inline]
pub(crate) fn get_sign(x: u32) -> u32 {
    x & 0x8000_0000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_helpers() {
        let one = 1.0f32.to_bits();
        assert_eq!(get_uexp(one), 127);
        assert_eq!(get_exp(one), 0);
        assert_eq!(get_mant(one), 0x0080_0000);
        assert_eq!(get_sign(one), 0);
        assert_eq!(get_sign((-1.0f32).to_bits()), 0x8000_0000);

        let x = 6.0f32.to_bits(); // 1.5 * 2^2
        assert_eq!(get_exp(x), 2);
        assert_eq!(get_mant(x), 0x00C0_0000);

        // The hidden bit is restored even for zero.
        assert_eq!(get_mant(0), 0x0080_0000);
    }
}
