//! The VFPU register file and operand transfer.
//!
//! 128 × 32-bit float lanes, stored bank-major so that each 4×4 bank tile
//! is contiguous. Lanes are kept as raw bit patterns: guest code routinely
//! moves NaN payloads and signed zeros through the register file, and a
//! round trip must not disturb a single bit.
//!
//! The register file is owned by the surrounding CPU state; the transfer
//! routines here gather decoded operands into caller buffers and scatter
//! results back, consulting the externally supplied write mask on the way
//! in. Mask bit *i* set means lane *i* of the addressed set is *not*
//! written.

use std::fmt;

use crate::addressing::lane_offset;
use crate::size::{MatrixSize, VectorSize};

/// Number of lanes in the register file.
pub const NUM_LANES: usize = 128;

/// The per-lane write-enable override, sourced from external VFPU control
/// state. Read-only here; only writes consult it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteMask(u8);

impl WriteMask {
    /// An all-clear mask: every lane is written.
    pub const CLEAR: WriteMask = WriteMask(0);

    /// Wrap the raw 8-bit mask state.
    #[inline]
    pub const fn from_bits(bits: u8) -> Self {
        WriteMask(bits)
    }

    /// Raw mask bits.
    #[inline]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// True if lane `i` of the addressed set must be skipped.
    #[inline]
    pub const fn skips(self, i: usize) -> bool {
        (self.0 >> i) & 1 != 0
    }

    /// True if no lane is masked (the common case, worth a fast path).
    #[inline]
    pub const fn is_clear(self) -> bool {
        self.0 == 0
    }
}

/// The 128-lane VFPU register file.
#[derive(Clone)]
pub struct RegisterFile {
    /// Lane bit patterns in physical (bank-major) order.
    v: [u32; NUM_LANES],
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterFile {
    /// Create a new zeroed register file.
    pub const fn new() -> Self {
        Self { v: [0; NUM_LANES] }
    }

    /// Read one lane by logical index (0-127) as a float.
    #[inline]
    pub fn read(&self, lane: u32) -> f32 {
        f32::from_bits(self.v[lane_offset(lane & 0x7F)])
    }

    /// Read one lane by logical index as its raw bit pattern.
    #[inline]
    pub fn read_bits(&self, lane: u32) -> u32 {
        self.v[lane_offset(lane & 0x7F)]
    }

    /// Write one lane by logical index.
    #[inline]
    pub fn write(&mut self, lane: u32, value: f32) {
        self.v[lane_offset(lane & 0x7F)] = value.to_bits();
    }

    /// Write one lane by logical index as a raw bit pattern.
    #[inline]
    pub fn write_bits(&mut self, lane: u32, bits: u32) {
        self.v[lane_offset(lane & 0x7F)] = bits;
    }

    /// Gather a vector operand into `rd[0..size.elements()]` in logical
    /// order.
    pub fn read_vector(&self, rd: &mut [f32; 4], size: VectorSize, reg: u32) {
        let (row, length) = match size {
            VectorSize::Single => {
                // For singles the selector code is the lane index itself.
                rd[0] = self.read(reg);
                return;
            }
            VectorSize::Pair => ((reg >> 5) & 2, 2),
            VectorSize::Triple => ((reg >> 6) & 1, 3),
            VectorSize::Quad => ((reg >> 5) & 2, 4),
        };
        let transpose = (reg >> 5) & 1;
        let bank = (reg >> 2) & 7;
        let col = reg & 3;

        if transpose != 0 {
            let base = bank * 4 + col * 32;
            for (i, out) in rd.iter_mut().enumerate().take(length) {
                *out = self.read(base + ((row + i as u32) & 3));
            }
        } else {
            let base = bank * 4 + col;
            for (i, out) in rd.iter_mut().enumerate().take(length) {
                *out = self.read(base + ((row + i as u32) & 3) * 32);
            }
        }
    }

    /// Scatter a vector result from `rd[0..size.elements()]`, skipping
    /// masked lanes.
    pub fn write_vector(&mut self, rd: &[f32; 4], size: VectorSize, reg: u32, mask: WriteMask) {
        if size == VectorSize::Single {
            // Optimize the common case.
            if !mask.skips(0) {
                self.write(reg, rd[0]);
            }
            return;
        }

        let bank = (reg >> 2) & 7;
        let col = reg & 3;
        let transpose = (reg >> 5) & 1;
        let (row, length) = match size {
            VectorSize::Single => unreachable!(),
            VectorSize::Pair => ((reg >> 5) & 2, 2),
            VectorSize::Triple => ((reg >> 6) & 1, 3),
            VectorSize::Quad => ((reg >> 5) & 2, 4),
        };

        if mask.is_clear() {
            if transpose != 0 {
                let base = bank * 4 + col * 32;
                for (i, val) in rd.iter().enumerate().take(length) {
                    self.write(base + ((row + i as u32) & 3), *val);
                }
            } else {
                let base = bank * 4 + col;
                for (i, val) in rd.iter().enumerate().take(length) {
                    self.write(base + ((row + i as u32) & 3) * 32, *val);
                }
            }
        } else {
            for (i, val) in rd.iter().enumerate().take(length) {
                if !mask.skips(i) {
                    let index = bank * 4
                        + if transpose != 0 {
                            ((row + i as u32) & 3) + col * 32
                        } else {
                            col + ((row + i as u32) & 3) * 32
                        };
                    self.write(index, *val);
                }
            }
        }
    }

    /// Gather a matrix operand; the cell at (row `i`, col `j`) lands in
    /// `rd[j*4 + i]`.
    pub fn read_matrix(&self, rd: &mut [f32; 16], size: MatrixSize, reg: u32) {
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

        // The physical lane swizzle is folded into these formulas,
        // eliminating a per-lane offset lookup.
        let v = &self.v[bank as usize * 16..bank as usize * 16 + 16];
        if transpose != 0 {
            if side == 4 && col == 0 && row == 0 {
                // Fast path: simple 4x4 transpose.
                for j in 0..4 {
                    for i in 0..4 {
                        rd[j * 4 + i] = f32::from_bits(v[i * 4 + j]);
                    }
                }
            } else {
                for j in 0..side as u32 {
                    for i in 0..side as u32 {
                        let index = ((row + i) & 3) * 4 + ((col + j) & 3);
                        rd[(j * 4 + i) as usize] = f32::from_bits(v[index as usize]);
                    }
                }
            }
        } else if side == 4 && col == 0 && row == 0 {
            // Fast path: the tile is contiguous.
            for (out, bits) in rd.iter_mut().zip(v.iter()) {
                *out = f32::from_bits(*bits);
            }
        } else {
            for j in 0..side as u32 {
                for i in 0..side as u32 {
                    let index = ((col + j) & 3) * 4 + ((row + i) & 3);
                    rd[(j * 4 + i) as usize] = f32::from_bits(v[index as usize]);
                }
            }
        }
    }

    /// Scatter a matrix result from `rd`.
    ///
    /// Mask handling is intentionally narrow and matches the hardware
    /// observations: a cell at (row `i`, col `j`) is skipped only when
    /// `j == side-1` and mask bit `i` is set; every other cell is written
    /// regardless of mask state. Masking only ever behaved meaningfully
    /// for width-1 operations on the real unit.
    pub fn write_matrix(&mut self, rd: &[f32; 16], size: MatrixSize, reg: u32, mask: WriteMask) {
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

        if !mask.is_clear() {
            log::error!("write mask {:#04x} used with a matrix operation", mask.bits());
        }

        let v = &mut self.v[bank as usize * 16..bank as usize * 16 + 16];
        if transpose != 0 {
            if side == 4 && row == 0 && col == 0 && mask.is_clear() {
                // Fast path: simple 4x4 transpose.
                for j in 0..4 {
                    for i in 0..4 {
                        v[i * 4 + j] = rd[j * 4 + i].to_bits();
                    }
                }
            } else {
                for j in 0..side {
                    for i in 0..side {
                        if j != side - 1 || !mask.skips(i) {
                            let index =
                                ((row + i as u32) & 3) * 4 + ((col + j as u32) & 3);
                            v[index as usize] = rd[j * 4 + i].to_bits();
                        }
                    }
                }
            }
        } else if side == 4 && row == 0 && col == 0 && mask.is_clear() {
            for (slot, val) in v.iter_mut().zip(rd.iter()) {
                *slot = val.to_bits();
            }
        } else {
            for j in 0..side {
                for i in 0..side {
                    if j != side - 1 || !mask.skips(i) {
                        let index = ((col + j as u32) & 3) * 4 + ((row + i as u32) & 3);
                        v[index as usize] = rd[j * 4 + i].to_bits();
                    }
                }
            }
        }
    }
}

impl fmt::Debug for RegisterFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Only show non-zero lanes, by logical index
        let non_zero: Vec<_> = (0..NUM_LANES as u32)
            .map(|lane| (lane, self.read_bits(lane)))
            .filter(|(_, bits)| *bits != 0)
            .collect();

        if non_zero.is_empty() {
            write!(f, "RegisterFile {{ all zero }}")
        } else {
            write!(f, "RegisterFile {{ ")?;
            for (i, (lane, bits)) in non_zero.iter().enumerate() {
                if i > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "v{}: 0x{:08X}", lane, bits)?;
            }
            write!(f, " }}")
        }
    }
}
