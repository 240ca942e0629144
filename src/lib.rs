//! vfpu-emu library
//!
//! Bit-accurate emulation core for the PSP's VFPU vector coprocessor.
//!
//! The VFPU register file is 128 × 32-bit float lanes organized as 8 banks
//! of 4×4 tiles. Guest code addresses vectors and matrices inside those
//! tiles with packed 7-bit selector codes, including a transpose mode, and
//! its arithmetic depends on the exact rounding quirks of the hardware.
//! This crate reproduces both, so that interpretation and recompilation
//! produce numerically identical results to the real unit:
//!
//! - [`size`]: operand sizes (single/pair/triple/quad) and their decode
//!   from instruction words
//! - [`addressing`]: selector-code decode to concrete lane indices
//! - [`register_file`]: the lane array with masked gather/scatter transfer
//! - [`overlap`]: aliasing detection between two addressed views
//! - [`math`]: hardware-exact dot product, sqrt, rsqrt, sin/cos, and
//!   half-float conversion
//! - [`notation`]: debug register names (S010, C123, M000, ...)
//!
//! The register file is owned by the surrounding CPU state and passed by
//! reference; nothing in this crate holds global state.

pub mod addressing;
pub mod math;
pub mod notation;
pub mod overlap;
pub mod register_file;
pub mod size;

// Re-export key types for convenience
pub use addressing::{lane_offset, matrix_lanes, vector_lanes};
pub use math::{half_to_float, vfpu_cos, vfpu_dot, vfpu_rsqrt, vfpu_sin, vfpu_sincos, vfpu_sqrt};
pub use overlap::{matrix_overlap, vector_overlap, MatrixOverlap};
pub use register_file::{RegisterFile, WriteMask, NUM_LANES};
pub use size::{MatrixSize, SizeError, VectorSize};
