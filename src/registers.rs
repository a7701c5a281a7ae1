//! AD9833 command-word bit definitions.
//!
//! Ported from the Analog Devices AD9833 datasheet control-register map.
//! Every transaction is a single 16-bit word, MSB first, framed by FSYNC
//! (active low). Bits D15:D14 address the destination register; the chip
//! has no readback path, so all registers are write-only.
//!
//! Control register layout (D15:D14 = `00`):
//!
//! | Bit | Name    | Meaning |
//! |-----|---------|---------|
//! | 13  | B28     | 1 = frequency registers load as two consecutive 14-bit writes |
//! | 12  | HLB     | half-word select when B28 = 0 (unused by this driver) |
//! | 11  | FSELECT | 1 = output uses FREQ1 |
//! | 10  | PSELECT | 1 = output uses PHASE1 |
//! | 8   | RESET   | 1 = internal registers held at 0, output at midscale |
//! | 7   | SLEEP1  | 1 = internal MCLK disabled |
//! | 6   | SLEEP12 | 1 = on-chip DAC powered down |
//! | 5   | OPBITEN | 1 = MSB of the DAC data drives the output (square) |
//! | 3   | DIV2    | 1 = MSB output at full rate, 0 = divided by 2 |
//! | 1   | MODE    | 1 = triangle output, 0 = sine (when OPBITEN = 0) |

// HLB is defined for completeness; this driver always programs frequency
// registers in B28 mode.
#![allow(dead_code)]

// ── Register addressing (D15:D14, plus D13 in phase mode) ──────────────────

/// Destination: FREQ0 frequency register (`01` in D15:D14).
pub const FREQ0_LOAD: u16 = 0x4000;

/// Destination: FREQ1 frequency register (`10` in D15:D14).
pub const FREQ1_LOAD: u16 = 0x8000;

/// Destination: a phase register (`11` in D15:D14).
pub const PHASE_LOAD: u16 = 0xC000;

/// Phase-mode D13: target PHASE1 instead of PHASE0.
pub const PHASE1_SELECT: u16 = 0x2000;

// ── Control-register bits (D15:D14 = `00`) ─────────────────────────────────

/// Load both 14-bit halves of a frequency register consecutively.
pub const B28: u16 = 0x2000;

/// Half-word select for independent 14-bit loads (B28 = 0).
pub const HLB: u16 = 0x1000;

/// Route FREQ1 to the phase accumulator.
pub const FSELECT: u16 = 0x0800;

/// Add PHASE1 to the accumulator output.
pub const PSELECT: u16 = 0x0400;

/// Hold the chip in reset: registers zeroed, output at midscale.
pub const RESET: u16 = 0x0100;

/// Disable the internal MCLK (output frozen at its current value).
pub const SLEEP1: u16 = 0x0080;

/// Power down the on-chip DAC (square-wave output still available).
pub const SLEEP12: u16 = 0x0040;

/// Output the MSB of the DAC data (square wave), bypassing the SIN ROM.
pub const OPBITEN: u16 = 0x0020;

/// MSB output at the full accumulator rate; clear to divide by 2.
pub const DIV2: u16 = 0x0008;

/// Triangle output (bypass the SIN ROM); only valid with OPBITEN clear.
pub const MODE: u16 = 0x0002;

// ── Value widths and masks ─────────────────────────────────────────────────

/// Phase accumulator width: frequency words are 28-bit fixed point.
pub const FREQ_WORD_BITS: u32 = 28;

/// Mask for a full 28-bit frequency word.
pub const FREQ_WORD_MASK: u32 = 0x0FFF_FFFF;

/// Mask for one 14-bit half of a frequency word.
pub const FREQ_HALF_MASK: u16 = 0x3FFF;

/// Mask for a 12-bit phase word (4096 steps per turn).
pub const PHASE_WORD_MASK: u16 = 0x0FFF;
