//! Aliasing detection between addressed register views.
//!
//! Recompiled code needs to know whether a destination operand overlaps a
//! source before reordering reads and writes. Operand sets are at most 16
//! lanes, so exhaustive comparison is cheap and exact.

use crate::addressing::{matrix_lanes, vector_lanes};
use crate::size::{MatrixSize, VectorSize};

/// How two matrix operands alias.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatrixOverlap {
    /// No shared lanes.
    None,
    /// At least one shared lane, but not the identical operand.
    Partial,
    /// The identical selector code.
    Equal,
}

/// Count the lanes shared by two vector operands.
///
/// Operands in different banks can never overlap. Both operands are
/// decoded with `size1`; callers always pass equal sizes in practice, and
/// the asymmetry is kept as the unit has always behaved. When `size2` is
/// wider than `size1`, the comparison sees the zero-initialized tail of
/// the second lane array.
pub fn vector_overlap(reg1: u32, size1: VectorSize, reg2: u32, size2: VectorSize) -> usize {
    // Different banks? Can't overlap, return early.
    if ((reg1 >> 2) & 7) != ((reg2 >> 2) & 7) {
        return 0;
    }

    let n1 = size1.elements();
    let n2 = size2.elements();
    let lanes1 = vector_lanes(size1, reg1);
    let lanes2 = vector_lanes(size1, reg2);
    let mut count = 0;
    for i in 0..n1 {
        for j in 0..n2 {
            if lanes1[i] == lanes2[j] {
                count += 1;
            }
        }
    }
    count
}

/// Classify the overlap between two matrix operands of the same size.
pub fn matrix_overlap(reg1: u32, reg2: u32, size: MatrixSize) -> MatrixOverlap {
    let n = size.side();

    if reg1 == reg2 {
        return MatrixOverlap::Equal;
    }

    let m1 = matrix_lanes(size, reg1);
    let m2 = matrix_lanes(size, reg2);

    // Simply do an exhaustive search.
    for x in 0..n {
        for y in 0..n {
            let val = m1[y * 4 + x];
            for a in 0..n {
                for b in 0..n {
                    if m2[a * 4 + b] == val {
                        return MatrixOverlap::Partial;
                    }
                }
            }
        }
    }

    MatrixOverlap::None
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_VECTOR_SIZES: [VectorSize; 4] = [
        VectorSize::Single,
        VectorSize::Pair,
        VectorSize::Triple,
        VectorSize::Quad,
    ];

    #[test]
    fn test_full_self_overlap() {
        for size in ALL_VECTOR_SIZES {
            for reg in 0..128u32 {
                assert_eq!(vector_overlap(reg, size, reg, size), size.elements());
            }
        }
    }

    #[test]
    fn test_different_banks_never_overlap() {
        for size in ALL_VECTOR_SIZES {
            for reg in 0..128u32 {
                let other = reg ^ 0x04; // flip a bank bit
                assert_eq!(vector_overlap(reg, size, other, size), 0);
            }
        }
    }

    #[test]
    fn test_crossing_row_and_column() {
        // Column 0 and row 0 of bank 0 share exactly lane 0.
        assert_eq!(vector_overlap(0, VectorSize::Quad, 0x20, VectorSize::Quad), 1);

        // Column 0 and row 2 (code 0x22) share exactly lane 64.
        assert_eq!(vector_overlap(0, VectorSize::Quad, 0x22, VectorSize::Quad), 1);

        // A rotated row over the same tile row still shares one lane.
        assert_eq!(vector_overlap(0, VectorSize::Quad, 0x60, VectorSize::Quad), 1);

        // Disjoint columns of the same bank.
        assert_eq!(vector_overlap(0, VectorSize::Quad, 1, VectorSize::Quad), 0);
    }

    #[test]
    fn test_second_operand_decoded_with_first_size() {
        // Historical contract: the second operand is decoded at size1, so
        // mixed sizes compare size1's view of both operands against the
        // other operand's element count.
        assert_eq!(vector_overlap(4, VectorSize::Single, 4, VectorSize::Quad), 1);
        assert_eq!(vector_overlap(4, VectorSize::Quad, 4, VectorSize::Single), 1);
    }

    #[test]
    fn test_matrix_equal_iff_same_code() {
        for reg in 0..64u32 {
            assert_eq!(matrix_overlap(reg, reg, MatrixSize::M4x4), MatrixOverlap::Equal);
        }
    }

    #[test]
    fn test_matrix_partial_transpose() {
        // A tile and its transpose address the same lanes but differ as
        // operands.
        assert_eq!(matrix_overlap(0, 0x20, MatrixSize::M4x4), MatrixOverlap::Partial);
    }

    #[test]
    fn test_matrix_none_across_banks() {
        assert_eq!(matrix_overlap(0, 4, MatrixSize::M4x4), MatrixOverlap::None);
        assert_eq!(matrix_overlap(0, 8, MatrixSize::M2x2), MatrixOverlap::None);
    }

    #[test]
    fn test_matrix_partial_shifted_tiles() {
        // 2x2 tiles at columns 0 and 1 of the same bank share a column.
        assert_eq!(matrix_overlap(0, 1, MatrixSize::M2x2), MatrixOverlap::Partial);

        // 2x2 at col 0 row 0 vs col 2 row 2: disjoint quadrants.
        assert_eq!(matrix_overlap(0, 0x42, MatrixSize::M2x2), MatrixOverlap::None);
    }
}
