//! 4-wide dot product with a single final rounding.
//!
//! The hardware multiplies all four lane pairs into an extended fixed-point
//! form, aligns them to the largest exponent, sums, and rounds once. Chained
//! float adds round three times and diverge from the unit in the low bits,
//! so the accumulation here stays in integer mantissa space throughout.

use super::{get_mant, get_sign, get_uexp, CANONICAL_NAN};

/// Guard bits carried below the 24-bit mantissa during accumulation.
const EXTRA_BITS: u32 = 2;

/// Compute the VFPU dot product of two 4-lane vectors.
pub fn vfpu_dot(a: &[f32; 4], b: &[f32; 4]) -> f32 {
    let mut exps = [0i32; 4];
    let mut mants = [0i32; 4];
    let mut signs = [0u32; 4];
    let mut max_exp = 0i32;
    let mut last_inf: Option<u32> = None;

    for i in 0..4 {
        let ai = a[i].to_bits();
        let bi = b[i].to_bits();

        let aexp = get_uexp(ai) as i32;
        let bexp = get_uexp(bi) as i32;
        let amant = (get_mant(ai) << EXTRA_BITS) as u64;
        let bmant = (get_mant(bi) << EXTRA_BITS) as u64;

        exps[i] = aexp + bexp - 127;
        if aexp == 255 {
            // INF * 0 = NAN, as is INF * NAN.
            if (ai & 0x007F_FFFF) != 0 || bexp == 0 {
                return f32::from_bits(CANONICAL_NAN);
            }
            mants[i] = (get_mant(0) << EXTRA_BITS) as i32;
            exps[i] = 255;
        } else if bexp == 255 {
            if (bi & 0x007F_FFFF) != 0 || aexp == 0 {
                return f32::from_bits(CANONICAL_NAN);
            }
            mants[i] = (get_mant(0) << EXTRA_BITS) as i32;
            exps[i] = 255;
        } else {
            let product = amant * bmant;
            mants[i] = ((product >> (23 + EXTRA_BITS)) & 0x7FFF_FFFF) as i32;
        }
        signs[i] = get_sign(ai) ^ get_sign(bi);

        if exps[i] > max_exp {
            max_exp = exps[i];
        }
        if exps[i] >= 255 {
            // Infinity minus infinity is not a real number.
            if let Some(inf_sign) = last_inf {
                if signs[i] != inf_sign {
                    return f32::from_bits(CANONICAL_NAN);
                }
            }
            last_inf = Some(signs[i]);
        }
    }

    let mut mant_sum = 0i32;
    for i in 0..4 {
        let shift = max_exp - exps[i];
        if shift >= 32 {
            mants[i] = 0;
        } else {
            mants[i] >>= shift;
        }
        if signs[i] != 0 {
            mants[i] = -mants[i];
        }
        mant_sum += mants[i];
    }

    let mut sign_sum = 0u32;
    if mant_sum < 0 {
        sign_sum = 0x8000_0000;
        mant_sum = -mant_sum;
    }

    // Truncate off the guard bits now; they must read as zero when
    // rounding below.
    mant_sum >>= EXTRA_BITS;

    if mant_sum == 0 || max_exp <= 0 {
        return 0.0;
    }

    let mut shift = (mant_sum as u32).leading_zeros() as i32 - 8;
    if shift < 0 {
        // Round to even if we'd shift away a 0.5.
        let round_bit = 1i32 << (-shift - 1);
        if (mant_sum & round_bit) != 0 && (mant_sum & (round_bit << 1)) != 0 {
            mant_sum += round_bit;
            shift = (mant_sum as u32).leading_zeros() as i32 - 8;
        } else if (mant_sum & round_bit) != 0 && (mant_sum & (round_bit - 1)) != 0 {
            mant_sum += round_bit;
            shift = (mant_sum as u32).leading_zeros() as i32 - 8;
        }
        mant_sum >>= -shift;
        max_exp += -shift;
    } else {
        mant_sum <<= shift;
        max_exp -= shift;
    }
    debug_assert!(mant_sum & 0x0080_0000 != 0, "mantissa wrong: {:08x}", mant_sum);

    if max_exp >= 255 {
        max_exp = 255;
        mant_sum = 0;
    } else if max_exp <= 0 {
        return 0.0;
    }

    f32::from_bits(sign_sum | ((max_exp as u32) << 23) | (mant_sum as u32 & 0x007F_FFFF))
}

#[cfg(test)]
mod tests {
    use super::*;

    const INF: f32 = f32::INFINITY;

    fn dot_bits(a: [f32; 4], b: [f32; 4]) -> u32 {
        vfpu_dot(&a, &b).to_bits()
    }

    #[test]
    fn test_unit_vectors() {
        assert_eq!(dot_bits([1.0, 0.0, 0.0, 0.0], [1.0, 0.0, 0.0, 0.0]), 0x3F80_0000);
        assert_eq!(vfpu_dot(&[1.0, 2.0, 3.0, 4.0], &[1.0, 2.0, 3.0, 4.0]), 30.0);
        assert_eq!(dot_bits([-1.0, -2.0, -3.0, -4.0], [1.0, 1.0, 1.0, 1.0]), 0xC120_0000);
    }

    #[test]
    fn test_inf_times_zero_is_nan() {
        assert_eq!(dot_bits([INF, 0.0, 0.0, 0.0], [0.0, 1.0, 1.0, 1.0]), 0x7F80_0001);
        assert_eq!(dot_bits([0.0, 1.0, 0.0, 1.0], [1.0, 1.0, -INF, 1.0]), 0x7F80_0001);
    }

    #[test]
    fn test_inf_propagates() {
        // INF times a real value stays infinite.
        assert_eq!(dot_bits([INF, 0.0, 0.0, 0.0], [1.0, 0.0, 0.0, 0.0]), 0x7F80_0000);
    }

    #[test]
    fn test_opposite_infinities_are_nan() {
        assert_eq!(dot_bits([INF, -INF, 0.0, 0.0], [1.0, 1.0, 0.0, 0.0]), 0x7F80_0001);
        assert_eq!(dot_bits([INF, INF, 0.0, 0.0], [1.0, -1.0, 0.0, 0.0]), 0x7F80_0001);
    }

    #[test]
    fn test_nan_operand() {
        let nan = f32::from_bits(0x7FC0_0000);
        assert_eq!(dot_bits([nan, 0.0, 0.0, 0.0], [1.0, 1.0, 1.0, 1.0]), 0x7F80_0001);
    }

    #[test]
    fn test_single_rounding_differs_from_chained_adds() {
        // The fixed-point accumulator rounds once; sequential float adds
        // land one ULP lower here.
        assert_eq!(
            dot_bits([0.1, 0.2, 0.3, 0.4], [0.5, 0.6, 0.7, 0.8]),
            0x3F33_3334
        );
    }

    #[test]
    fn test_round_to_even() {
        // 2^24 + 1 ties to even (stays 2^24); 2^24 + 3 rounds up.
        let big = 16_777_216.0f32;
        assert_eq!(dot_bits([big, 1.0, 0.0, 0.0], [1.0, 1.0, 0.0, 0.0]), 0x4B80_0000);
        assert_eq!(dot_bits([big, 3.0, 0.0, 0.0], [1.0, 1.0, 0.0, 0.0]), 0x4B80_0001);
    }

    #[test]
    fn test_underflow_flushes_to_zero() {
        assert_eq!(dot_bits([1e-20, 1e-20, 0.0, 0.0], [1e-20, 1e-20, 0.0, 0.0]), 0);
    }

    #[test]
    fn test_exact_cancellation() {
        assert_eq!(dot_bits([1.0, -1.0, 0.0, 0.0], [1.0, 1.0, 0.0, 0.0]), 0);
    }
}
