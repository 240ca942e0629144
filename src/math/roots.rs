//! Square root and reciprocal square root.
//!
//! Both run exactly six fixed-point Newton iterations on the mantissa and
//! leave the low two bits of the result mantissa cleared, which is what the
//! hardware observably does. rsqrt additionally rounds its intermediate
//! multiplies with a fixed bias rather than truncating.

use super::{get_exp, get_mant, CANONICAL_NAN};

/// VFPU square root.
///
/// NaN inputs come back as the canonical NaN, +inf passes through, both
/// zeros return +0, and negative values produce the canonical NaN.
pub fn vfpu_sqrt(a: f32) -> f32 {
    let mut bits = a.to_bits();

    if (bits & 0xFF80_0000) == 0x7F80_0000 {
        if (bits & 0x007F_FFFF) != 0 {
            bits = CANONICAL_NAN;
        }
        return f32::from_bits(bits);
    }
    if (bits & 0x7F80_0000) == 0 {
        // Denormals flush, and any sign is killed.
        return f32::from_bits(0);
    }
    if bits & 0x8000_0000 != 0 {
        return f32::from_bits(CANONICAL_NAN);
    }

    let mut k = get_exp(bits);
    let sp = get_mant(bits);
    let less_bits = k & 1;
    k >>= 1;

    let mut z: u32 = 0x00C0_0000 >> less_bits;
    let halfsp: i64 = ((sp >> 1) as i64) << (23 - less_bits);
    for _ in 0..6 {
        z = (z >> 1) + (halfsp / z as i64) as u32;
    }

    bits = (((k + 127) as u32) << 23) | ((z << less_bits) & 0x007F_FFFF);
    // The lower two bits never end up set on the hardware.
    bits &= 0xFFFF_FFFC;

    f32::from_bits(bits)
}

/// Fixed-point mantissa multiply with the unit's rounding bias.
#[inline]
fn mant_mul(a: u32, b: u32) -> u32 {
    let mut m = a as u64 * b as u64;
    if m & 0x007F_FFFF != 0 {
        m += 0x0143_7000;
    }
    (m >> 23) as u32
}

/// VFPU reciprocal square root.
///
/// +inf gives 0, NaN and out-of-range magnitudes give a sign-preserving
/// canonical NaN, zeros give a signed infinity, and negative values give
/// the negative canonical NaN.
pub fn vfpu_rsqrt(a: f32) -> f32 {
    let mut bits = a.to_bits();

    if bits == 0x7F80_0000 {
        return 0.0;
    }
    if (bits & 0x7FFF_FFFF) > 0x7F80_0000 {
        return f32::from_bits((bits & 0x8000_0000) | CANONICAL_NAN);
    }
    if (bits & 0x7F80_0000) == 0 {
        return f32::from_bits((bits & 0x8000_0000) | 0x7F80_0000);
    }
    if bits & 0x8000_0000 != 0 {
        return f32::from_bits(0xFF80_0001);
    }

    let mut k = get_exp(bits);
    let sp = get_mant(bits);
    let less_bits = k & 1;
    k = -(k >> 1);

    let mut z: u32 = 0x0080_0000 >> less_bits;
    let halfsp: u32 = sp >> (1 + less_bits);
    for _ in 0..6 {
        let zsq = mant_mul(z, z);
        let correction = 0x00C0_0000u32.wrapping_sub(mant_mul(halfsp, zsq));
        z = mant_mul(z, correction);
    }

    let shift = z.leading_zeros() as i32 - 8 + less_bits;
    if shift < 1 {
        z >>= -shift;
        k += -shift;
    } else if shift > 0 {
        z <<= shift;
        k -= shift;
    }

    z >>= less_bits;

    bits = (((k + 127) as u32) << 23) | (z & 0x007F_FFFF);
    bits &= 0xFFFF_FFFC;

    f32::from_bits(bits)
}

#[cfg(test)]
mod tests {
    use super::*;

    // ========== sqrt ==========

    #[test]
    fn test_sqrt_exact_powers() {
        assert_eq!(vfpu_sqrt(4.0).to_bits(), 0x4000_0000); // exactly 2.0
        assert_eq!(vfpu_sqrt(0.25).to_bits(), 0x3F00_0000); // exactly 0.5
    }

    #[test]
    fn test_sqrt_differs_from_library() {
        // The 6-iteration result, low bits cleared; libm gives 0x3FB504F3.
        assert_eq!(vfpu_sqrt(2.0).to_bits(), 0x3FB5_04F0);
        assert_eq!(vfpu_sqrt(3.0).to_bits(), 0x3FDD_B3D4);
    }

    #[test]
    fn test_sqrt_low_bits_cleared() {
        for x in [2.0f32, 3.0, 5.0, 7.5, 1234.5] {
            assert_eq!(vfpu_sqrt(x).to_bits() & 3, 0);
        }
    }

    #[test]
    fn test_sqrt_special_cases() {
        assert_eq!(vfpu_sqrt(f32::INFINITY).to_bits(), 0x7F80_0000);
        assert_eq!(vfpu_sqrt(f32::from_bits(0x7FC0_0001)).to_bits(), 0x7F80_0001);
        assert_eq!(vfpu_sqrt(0.0).to_bits(), 0);
        assert_eq!(vfpu_sqrt(-0.0).to_bits(), 0); // sign is killed
        assert_eq!(vfpu_sqrt(1e-40).to_bits(), 0); // denormal flushes
        assert_eq!(vfpu_sqrt(-1.0).to_bits(), 0x7F80_0001);
    }

    // ========== rsqrt ==========

    #[test]
    fn test_rsqrt_exact_powers() {
        assert_eq!(vfpu_rsqrt(4.0).to_bits(), 0x3F00_0000); // 0.5
        assert_eq!(vfpu_rsqrt(0.25).to_bits(), 0x4000_0000); // 2.0
        assert_eq!(vfpu_rsqrt(1.0).to_bits(), 0x3F80_0000); // 1.0
    }

    #[test]
    fn test_rsqrt_six_iterations() {
        assert_eq!(vfpu_rsqrt(2.0).to_bits(), 0x3F35_04E8);
    }

    #[test]
    fn test_rsqrt_low_bits_cleared() {
        for x in [2.0f32, 3.0, 5.0, 7.5, 1234.5] {
            assert_eq!(vfpu_rsqrt(x).to_bits() & 3, 0);
        }
    }

    #[test]
    fn test_rsqrt_special_cases() {
        assert_eq!(vfpu_rsqrt(f32::INFINITY).to_bits(), 0);
        assert_eq!(vfpu_rsqrt(0.0).to_bits(), 0x7F80_0000); // +inf
        assert_eq!(vfpu_rsqrt(-0.0).to_bits(), 0xFF80_0000); // -inf
        assert_eq!(vfpu_rsqrt(1e-40).to_bits(), 0x7F80_0000); // denormal
        assert_eq!(vfpu_rsqrt(-1e-40).to_bits(), 0xFF80_0000);
        assert_eq!(vfpu_rsqrt(-4.0).to_bits(), 0xFF80_0001);
        assert_eq!(vfpu_rsqrt(f32::from_bits(0x7FC0_0001)).to_bits(), 0x7F80_0001);
        assert_eq!(vfpu_rsqrt(f32::from_bits(0xFFC0_0001)).to_bits(), 0xFF80_0001);
    }
}
