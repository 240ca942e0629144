//! Sine and cosine in turns.
//!
//! The trig unit measures angles in turns, 1.0 = 90°, with a period of 4.
//! Reduction happens on the mantissa directly: once the exponent exceeds
//! 0x80 the whole periods are shifted out, a residue of two turns or more
//! flips a negate flag, and the remainder is renormalized. Exact ±1-turn
//! inputs short-circuit to exact axis values instead of going through the
//! platform transcendentals. Results get their low two mantissa bits
//! cleared.
//!
//! Inputs below the precision threshold flush to the trivial small-angle
//! result. The threshold was measured around 0x68 on hardware, but some
//! titles are sensitive to the exact curve shape near the cutoff, so a
//! slightly lower value is used.

use std::f64::consts::FRAC_PI_2;

/// Biased-exponent cutoff below which angles flush to sin=x, cos=1.
const PRECISION_EXP_THRESHOLD: i32 = 0x65;

use super::{get_mant, get_uexp};

/// Reduce the angle modulo 4 turns, in place on its bit fields.
///
/// Returns the reduced exponent, the reduced mantissa (leading bit at 23),
/// and whether two turns were subtracted (the caller flips signs for that
/// case). A reduced exponent <= 0 or zero mantissa means the angle landed
/// exactly on zero.
#[inline]
fn reduce_turns(bits: u32) -> (i32, i32, bool) {
    let mut k = get_uexp(bits) as i32;
    let mut mantissa = get_mant(bits) as i32;
    let mut flipped = false;

    // Modulus by 4 first (identical wave every 4 turns).
    if k > 0x80 {
        let over = (k & 0x1F) as u32;
        mantissa = (mantissa as u32).wrapping_shl(over) as i32 & 0x00FF_FFFF;
        k = 0x80;
    }
    // This subtracts off the 2. If we do, the wave inverts.
    if k == 0x80 && mantissa >= (1 << 23) {
        mantissa -= 1 << 23;
        flipped = true;
    }

    if mantissa == 0 {
        k -= 32;
    } else {
        let norm_shift = (mantissa as u32).leading_zeros() as i32 - 8;
        mantissa <<= norm_shift;
        k -= norm_shift;
    }

    (k, mantissa, flipped)
}

/// VFPU sine of an angle in turns.
///
/// NaN and infinity produce a sign-preserving single-payload-bit NaN.
pub fn vfpu_sin(a: f32) -> f32 {
    let mut bits = a.to_bits();

    let k = get_uexp(bits) as i32;
    if k == 255 {
        return f32::from_bits((bits & 0xFF80_0001) | 1);
    }

    if k < PRECISION_EXP_THRESHOLD {
        return f32::from_bits(bits & 0x8000_0000);
    }

    let (k, mantissa, flipped) = reduce_turns(bits);
    if flipped {
        // Subtracting two turns inverts the wave: flip the input sign.
        bits ^= 0x8000_0000;
    }

    if k <= 0 || mantissa == 0 {
        return f32::from_bits(bits & 0x8000_0000);
    }

    // The value with the modulus applied.
    bits = (bits & 0x8000_0000) | ((k as u32) << 23) | (mantissa as u32 & !(1 << 23));
    let reduced = f32::from_bits(bits) as f64;
    let result = (reduced * FRAC_PI_2).sin() as f32;
    f32::from_bits(result.to_bits() & 0xFFFF_FFFC)
}

/// VFPU cosine of an angle in turns.
///
/// Unlike sine, NaN and infinity always produce a positive NaN.
pub fn vfpu_cos(a: f32) -> f32 {
    let bits = a.to_bits();

    let k = get_uexp(bits) as i32;
    if k == 255 {
        return f32::from_bits((bits & 0x7F80_0001) | 1);
    }

    if k < PRECISION_EXP_THRESHOLD {
        return 1.0;
    }

    let (k, mantissa, negate) = reduce_turns(bits);

    if k <= 0 || mantissa == 0 {
        return if negate { -1.0 } else { 1.0 };
    }

    let reduced_bits = (bits & 0x8000_0000) | ((k as u32) << 23) | (mantissa as u32 & !(1 << 23));
    let reduced = f32::from_bits(reduced_bits);
    if reduced == 1.0 || reduced == -1.0 {
        // Axis-aligned angle: the hardware returns a signed exact zero
        // instead of the library's near-zero value.
        return if negate { 0.0 } else { -0.0 };
    }
    let result = ((reduced as f64 * FRAC_PI_2).cos() as f32).to_bits() & 0xFFFF_FFFC;
    let result = f32::from_bits(result);
    if negate {
        -result
    } else {
        result
    }
}

/// VFPU combined sine and cosine, returned as `(sin, cos)`.
///
/// The fused form is an optimization only; each component matches the
/// standalone [`vfpu_sin`] / [`vfpu_cos`] bit for bit.
pub fn vfpu_sincos(a: f32) -> (f32, f32) {
    let bits = a.to_bits();

    let k = get_uexp(bits) as i32;
    if k == 255 {
        let s = (bits & 0xFF80_0001) | 1;
        let c = s & 0x7F80_0001;
        return (f32::from_bits(s), f32::from_bits(c));
    }

    if k < PRECISION_EXP_THRESHOLD {
        return (f32::from_bits(bits & 0x8000_0000), 1.0);
    }

    // For sin, negate the input; for cos, negate the output.
    let (k, mantissa, negate) = reduce_turns(bits);

    if k <= 0 || mantissa == 0 {
        let mut s = bits & 0x8000_0000;
        if negate {
            s ^= 0x8000_0000;
        }
        let c = if negate { -1.0 } else { 1.0 };
        return (f32::from_bits(s), c);
    }

    let reduced_bits = (bits & 0x8000_0000) | ((k as u32) << 23) | (mantissa as u32 & !(1 << 23));
    let reduced = f32::from_bits(reduced_bits);

    let (sine, cosine) = if reduced == 1.0 {
        (if negate { -1.0f32 } else { 1.0 }, if negate { 0.0f32 } else { -0.0 })
    } else if reduced == -1.0 {
        (if negate { 1.0f32 } else { -1.0 }, if negate { 0.0f32 } else { -0.0 })
    } else if negate {
        (
            ((-reduced as f64) * FRAC_PI_2).sin() as f32,
            -(((reduced as f64) * FRAC_PI_2).cos() as f32),
        )
    } else {
        let angle = reduced as f64 * FRAC_PI_2;
        (angle.sin() as f32, angle.cos() as f32)
    };

    (
        f32::from_bits(sine.to_bits() & 0xFFFF_FFFC),
        f32::from_bits(cosine.to_bits() & 0xFFFF_FFFC),
    )
}
