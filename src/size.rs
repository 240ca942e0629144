//! Operand sizes for VFPU instructions.
//!
//! VFPU instructions operate on one of four vector widths, with a matrix
//! size in 1:1 correspondence:
//!
//! | VectorSize | MatrixSize | Elements |
//! |------------|------------|----------|
//! | Single     | 1×1        | 1        |
//! | Pair       | 2×2        | 2        |
//! | Triple     | 3×3        | 3        |
//! | Quad       | 4×4        | 4        |
//!
//! The size is encoded in two fixed bits of the instruction word (bits 7
//! and 15), so every opcode maps to a valid size; the decode here is total.

use thiserror::Error;

/// Errors from operand-width conversions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SizeError {
    /// The size has no half-width counterpart (only Pair and Quad do).
    #[error("no half width for {0:?}")]
    NoHalfWidth(VectorSize),

    /// The size has no double-width counterpart (only Single and Pair do).
    #[error("no double width for {0:?}")]
    NoDoubleWidth(VectorSize),
}

/// Vector operand width: 1 to 4 lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VectorSize {
    /// One lane (`.s` operations).
    Single,
    /// Two lanes (`.p` operations).
    Pair,
    /// Three lanes (`.t` operations).
    Triple,
    /// Four lanes (`.q` operations).
    Quad,
}

impl VectorSize {
    /// Decode the size from an instruction word.
    ///
    /// The two size bits live at fixed positions 7 and 15; all four
    /// combinations are valid.
    #[inline]
    pub fn from_opcode(op: u32) -> Self {
        let bits = ((op >> 7) & 1) | (((op >> 15) & 1) << 1);
        match bits {
            0 => VectorSize::Single,
            1 => VectorSize::Pair,
            2 => VectorSize::Triple,
            _ => VectorSize::Quad,
        }
    }

    /// Number of lanes addressed at this size.
    #[inline]
    pub fn elements(self) -> usize {
        match self {
            VectorSize::Single => 1,
            VectorSize::Pair => 2,
            VectorSize::Triple => 3,
            VectorSize::Quad => 4,
        }
    }

    /// The matrix size this vector size corresponds to.
    #[inline]
    pub fn matrix(self) -> MatrixSize {
        match self {
            VectorSize::Single => MatrixSize::M1x1,
            VectorSize::Pair => MatrixSize::M2x2,
            VectorSize::Triple => MatrixSize::M3x3,
            VectorSize::Quad => MatrixSize::M4x4,
        }
    }

    /// Half this width (Pair → Single, Quad → Pair).
    ///
    /// Used by instructions whose destination is half as wide as their
    /// sources (e.g. the half-float pack).
    pub fn half(self) -> Result<VectorSize, SizeError> {
        match self {
            VectorSize::Pair => Ok(VectorSize::Single),
            VectorSize::Quad => Ok(VectorSize::Pair),
            sz => Err(SizeError::NoHalfWidth(sz)),
        }
    }

    /// Double this width (Single → Pair, Pair → Quad).
    pub fn double(self) -> Result<VectorSize, SizeError> {
        match self {
            VectorSize::Single => Ok(VectorSize::Pair),
            VectorSize::Pair => Ok(VectorSize::Quad),
            sz => Err(SizeError::NoDoubleWidth(sz)),
        }
    }
}

/// Matrix operand size: 1×1 to 4×4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MatrixSize {
    /// 1×1 matrix (a single lane).
    M1x1,
    /// 2×2 matrix.
    M2x2,
    /// 3×3 matrix.
    M3x3,
    /// 4×4 matrix (a full bank tile).
    M4x4,
}

impl MatrixSize {
    /// Decode the size from an instruction word (same bit positions as
    /// [`VectorSize::from_opcode`]).
    ///
    /// A 1×1 decode happens in disassembly of junk, but has predictable
    /// behavior.
    #[inline]
    pub fn from_opcode(op: u32) -> Self {
        VectorSize::from_opcode(op).matrix()
    }

    /// Side length of the matrix (1-4).
    #[inline]
    pub fn side(self) -> usize {
        match self {
            MatrixSize::M1x1 => 1,
            MatrixSize::M2x2 => 2,
            MatrixSize::M3x3 => 3,
            MatrixSize::M4x4 => 4,
        }
    }

    /// The vector size of one row or column of this matrix.
    #[inline]
    pub fn vector(self) -> VectorSize {
        match self {
            MatrixSize::M1x1 => VectorSize::Single,
            MatrixSize::M2x2 => VectorSize::Pair,
            MatrixSize::M3x3 => VectorSize::Triple,
            MatrixSize::M4x4 => VectorSize::Quad,
        }
    }
}
