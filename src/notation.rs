//! Debug register names.
//!
//! Assembler-style operand names: `S` for singles, `C`/`R` for column/row
//! vectors, `M`/`E` for matrices and transposed matrices, followed by the
//! bank and tile coordinates. Returns owned strings; formatting is the
//! only consumer and is never on a hot path.

use crate::size::{MatrixSize, VectorSize};

/// Name a vector operand, e.g. `S012`, `C100`, `R301`.
pub fn vector_notation(reg: u32, size: VectorSize) -> String {
    let bank = (reg >> 2) & 7;
    let col = reg & 3;
    let transpose = (reg >> 5) & 1;

    let (mut c, row) = match size {
        VectorSize::Single => ('S', (reg >> 5) & 3),
        VectorSize::Pair => ('C', (reg >> 5) & 2),
        VectorSize::Triple => ('C', (reg >> 6) & 1),
        VectorSize::Quad => ('C', (reg >> 5) & 2),
    };
    if transpose != 0 && c == 'C' {
        c = 'R';
    }
    if transpose != 0 && size != VectorSize::Single {
        format!("{}{}{}{}", c, bank, row, col)
    } else {
        format!("{}{}{}{}", c, bank, col, row)
    }
}

/// Name a matrix operand, e.g. `M000`, `E020`. 1×1 "matrices" have no
/// name of their own and render as `?`.
pub fn matrix_notation(reg: u32, size: MatrixSize) -> String {
    let bank = (reg >> 2) & 7;
    let col = reg & 3;
    let transpose = (reg >> 5) & 1;

    let (mut c, row) = match size {
        MatrixSize::M2x2 => ('M', (reg >> 5) & 2),
        MatrixSize::M3x3 => ('M', (reg >> 6) & 1),
        MatrixSize::M4x4 => ('M', (reg >> 5) & 2),
        MatrixSize::M1x1 => ('?', 0),
    };
    if transpose != 0 && c == 'M' {
        c = 'E';
    }
    if transpose != 0 {
        format!("{}{}{}{}", c, bank, row, col)
    } else {
        format!("{}{}{}{}", c, bank, col, row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_names() {
        assert_eq!(vector_notation(0, VectorSize::Single), "S000");
        assert_eq!(vector_notation(0x23, VectorSize::Single), "S031");
        assert_eq!(vector_notation(0x7F, VectorSize::Single), "S733");
    }

    #[test]
    fn test_column_and_row_names() {
        assert_eq!(vector_notation(0, VectorSize::Quad), "C000");
        assert_eq!(vector_notation(0x20, VectorSize::Quad), "R000");
        assert_eq!(vector_notation(0x45, VectorSize::Pair), "C112");
        assert_eq!(vector_notation(0x66, VectorSize::Triple), "R112");
    }

    #[test]
    fn test_matrix_names() {
        assert_eq!(matrix_notation(0, MatrixSize::M4x4), "M000");
        assert_eq!(matrix_notation(0x20, MatrixSize::M4x4), "E000");
        assert_eq!(matrix_notation(0x42, MatrixSize::M2x2), "M022");
        assert_eq!(matrix_notation(5, MatrixSize::M1x1), "?110");
    }
}
