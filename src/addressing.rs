//! Selector-code decoding to lane indices.
//!
//! VFPU operands are named by a packed 7-bit selector code:
//!
//! | Bits | Field |
//! |------|-------|
//! | 0-1  | column within the bank tile |
//! | 2-4  | bank (matrix) number |
//! | 5-6  | row / transpose, layout depends on operand size |
//!
//! For Single operands bits 5-6 are the full row and transpose is forced
//! off. Pair and Quad operands take the row from bit 6 (as `(code>>5)&2`)
//! and the transpose flag from bit 5; Triple operands take the row from
//! bit 6 and the same transpose bit.
//!
//! A decoded lane index is `bank*4 + col + row*32` (column-major logical
//! numbering, stride 32 between rows). Rows and columns past the tile
//! origin wrap with `&3`, which the aliasing detector relies on; this bit
//! layout must be reproduced exactly.

use crate::size::{MatrixSize, VectorSize};

/// Number of register banks.
pub const NUM_BANKS: usize = 8;

/// Map a logical lane index to its physical slot in the register file.
///
/// Storage is bank-major (`bank*16 + col*4 + row`) so that a full 4×4 tile
/// is contiguous, while logical lane numbers interleave banks with a row
/// stride of 32. The transfer routines fold this swizzle into their
/// addressing instead of going through a lookup table.
#[inline]
pub const fn lane_offset(lane: u32) -> usize {
    (((lane & 0x1F) << 2) | (lane >> 5)) as usize
}

/// Decode a vector selector code into lane indices.
///
/// Only the first `size.elements()` entries are meaningful; the rest stay
/// zero.
pub fn vector_lanes(size: VectorSize, reg: u32) -> [u8; 4] {
    let bank = (reg >> 2) & 7;
    let col = reg & 3;
    let mut transpose = (reg >> 5) & 1;

    let row = match size {
        VectorSize::Single => {
            transpose = 0;
            (reg >> 5) & 3
        }
        VectorSize::Pair => (reg >> 5) & 2,
        VectorSize::Triple => (reg >> 6) & 1,
        VectorSize::Quad => (reg >> 5) & 2,
    };

    let mut lanes = [0u8; 4];
    for (i, lane) in lanes.iter_mut().enumerate().take(size.elements()) {
        let i = i as u32;
        let index = bank * 4
            + if transpose != 0 {
                ((row + i) & 3) + col * 32
            } else {
                col + ((row + i) & 3) * 32
            };
        *lane = index as u8;
    }
    lanes
}

/// Decode a matrix selector code into lane indices.
///
/// The cell at (row `i`, col `j`) lands at `out[j*4 + i]`; only the
/// leading `side×side` cells of each used column are meaningful.
pub fn matrix_lanes(size: MatrixSize, reg: u32) -> [u8; 16] {
    let bank = (reg >> 2) & 7;
    let col = reg & 3;
    let mut transpose = (reg >> 5) & 1;

    let row = match size {
        MatrixSize::M1x1 => {
            transpose = 0;
            (reg >> 5) & 3
        }
        MatrixSize::M2x2 => (reg >> 5) & 2,
        MatrixSize::M3x3 => (reg >> 6) & 1,
        MatrixSize::M4x4 => (reg >> 5) & 2,
    };

    let side = size.side();
    let mut lanes = [0u8; 16];
    for i in 0..side as u32 {
        for j in 0..side as u32 {
            let index = bank * 4
                + if transpose != 0 {
                    ((row + i) & 3) + ((col + j) & 3) * 32
                } else {
                    ((col + j) & 3) + ((row + i) & 3) * 32
                };
            lanes[(j * 4 + i) as usize] = index as u8;
        }
    }
    lanes
}

/// Selector codes for the columns of a matrix operand.
///
/// Each returned code addresses one column of the matrix as a vector of
/// the matrix's side length; only the first `side` entries are meaningful.
pub fn matrix_columns(size: MatrixSize, reg: u32) -> [u8; 4] {
    let col = reg & 3;
    let row = (reg >> 5) & 2;
    let transpose = (reg >> 5) & 1;

    let mut vecs = [0u8; 4];
    for (i, vec) in vecs.iter_mut().enumerate().take(size.side()) {
        *vec = ((transpose << 5) | (row << 5) | (reg & 0x1C) | (i as u32 + col)) as u8;
    }
    vecs
}

/// Selector codes for the rows of a matrix operand.
///
/// Rows of a matrix are columns of its transpose, so the returned codes
/// carry the flipped transpose bit with the row/column fields swapped into
/// place.
pub fn matrix_rows(size: MatrixSize, reg: u32) -> [u8; 4] {
    let col = reg & 3;
    let row = (reg >> 5) & 2;

    let swapped_col = if row != 0 {
        if size == MatrixSize::M3x3 {
            1
        } else {
            2
        }
    } else {
        0
    };
    let swapped_row = if col != 0 { 2u32 } else { 0 };
    let transpose = ((reg >> 5) & 1) ^ 1;

    let mut vecs = [0u8; 4];
    for (i, vec) in vecs.iter_mut().enumerate().take(size.side()) {
        *vec = ((transpose << 5) | (swapped_row << 5) | (reg & 0x1C) | (i as u32 + swapped_col)) as u8;
    }
    vecs
}

/// Build the selector code for a column vector of a bank.
#[inline]
pub fn column_reg(bank: u32, column: u32, offset: u32) -> u32 {
    bank * 4 + column + offset * 32
}

/// Build the selector code for a row vector of a bank (transpose bit set).
#[inline]
pub fn row_reg(bank: u32, column: u32, offset: u32) -> u32 {
    0x20 | (bank * 4 + column + offset * 32)
}
