// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Z80 instruction table and operand categories.
//!
//! Each [`OpCode`] row pairs a mnemonic with one operand category per slot
//! and a byte template. The table is ordered so that more specific rows come
//! before more general ones for the same mnemonic; resolution takes the
//! first row whose categories are members of both inferred operand sets.
//!
//! Register-group categories encode positionally: the operand's index in the
//! group's name list is its encoded value. The `Reg8` list carries a
//! `"(hl)"` placeholder at index 6 so B..A take the architectural field
//! numbers while `(HL)` itself resolves through the indirection table.

/// Encoded value of a single operand.
pub type ParamVal = i64;

/// Operand category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamType {
    None,
    // register groups, encoded by list position
    Reg8,
    Pair,
    PairAf,
    Cond,
    CondRel,
    // register singletons
    A,
    I,
    R,
    BC,
    DE,
    HL,
    SP,
    AF,
    IX,
    IY,
    /// The alternate accumulator pair, `AF'`.
    AfAlt,
    // one-token indirections
    BcInd,
    DeInd,
    HlInd,
    SpInd,
    CInd,
    // index register with signed displacement
    IxDisp,
    IyDisp,
    // immediate-address indirections
    ByteInd,
    WordInd,
    // numeric operands
    Imm8,
    Imm16,
    Disp,
    BitIndex,
    Rel,
    IntMode,
    RstVec,
}

/// One byte of an instruction encoding template.
#[derive(Debug, Clone, Copy)]
pub enum Slot {
    /// A literal byte.
    Lit(u8),
    /// Low byte of the first / second operand value.
    Lo0,
    Lo1,
    /// High byte of the first / second operand value.
    Hi0,
    Hi1,
    /// Base byte with operand values OR-ed in at the given shifts.
    Bits {
        base: u8,
        shl0: Option<u8>,
        shl1: Option<u8>,
    },
    /// Interrupt-mode second byte (`IM 0/1/2` -> 46/56/5E).
    IntModeByte,
}

use Slot::{Hi0, Hi1, IntModeByte, Lit, Lo0, Lo1};

const fn bits0(base: u8, shl0: u8) -> Slot {
    Slot::Bits {
        base,
        shl0: Some(shl0),
        shl1: None,
    }
}

const fn bits1(base: u8, shl1: u8) -> Slot {
    Slot::Bits {
        base,
        shl0: None,
        shl1: Some(shl1),
    }
}

const fn bits01(base: u8, shl0: u8, shl1: u8) -> Slot {
    Slot::Bits {
        base,
        shl0: Some(shl0),
        shl1: Some(shl1),
    }
}

/// One row of the instruction table.
#[derive(Debug)]
pub struct OpCode {
    pub mnemonic: &'static str,
    pub pt0: ParamType,
    pub pt1: ParamType,
    pub encoding: &'static [Slot],
}

impl OpCode {
    /// Encoded size in bytes. Equal to the emitted length by construction.
    #[must_use]
    pub fn size(&self) -> usize {
        self.encoding.len()
    }

    /// Produce the instruction bytes for the two encoded operand values.
    #[must_use]
    pub fn emit(&self, p0: ParamVal, p1: ParamVal) -> Vec<u8> {
        self.encoding
            .iter()
            .map(|slot| match *slot {
                Slot::Lit(byte) => byte,
                Slot::Lo0 => (p0 & 0xff) as u8,
                Slot::Hi0 => ((p0 >> 8) & 0xff) as u8,
                Slot::Lo1 => (p1 & 0xff) as u8,
                Slot::Hi1 => ((p1 >> 8) & 0xff) as u8,
                Slot::Bits { base, shl0, shl1 } => {
                    let mut byte = base;
                    if let Some(shl) = shl0 {
                        byte |= (p0 as u8) << shl;
                    }
                    if let Some(shl) = shl1 {
                        byte |= (p1 as u8) << shl;
                    }
                    byte
                }
                Slot::IntModeByte => match p0 {
                    0 => 0x46,
                    1 => 0x56,
                    _ => 0x5E,
                },
            })
            .collect()
    }
}

const fn op(
    mnemonic: &'static str,
    pt0: ParamType,
    pt1: ParamType,
    encoding: &'static [Slot],
) -> OpCode {
    OpCode {
        mnemonic,
        pt0,
        pt1,
        encoding,
    }
}

use ParamType as P;

/// The documented Z80 instruction set.
pub static OPCODE_TABLE: &[OpCode] = &[
    // ============================================================
    // 8-bit loads
    // ============================================================
    op("ld", P::Reg8, P::Reg8, &[bits01(0x40, 3, 0)]),
    op("ld", P::Reg8, P::HlInd, &[bits0(0x46, 3)]),
    op("ld", P::HlInd, P::Reg8, &[bits1(0x70, 0)]),
    op("ld", P::Reg8, P::IxDisp, &[Lit(0xDD), bits0(0x46, 3), Lo1]),
    op("ld", P::Reg8, P::IyDisp, &[Lit(0xFD), bits0(0x46, 3), Lo1]),
    op("ld", P::IxDisp, P::Reg8, &[Lit(0xDD), bits1(0x70, 0), Lo0]),
    op("ld", P::IyDisp, P::Reg8, &[Lit(0xFD), bits1(0x70, 0), Lo0]),
    op("ld", P::HlInd, P::Imm8, &[Lit(0x36), Lo1]),
    op("ld", P::IxDisp, P::Imm8, &[Lit(0xDD), Lit(0x36), Lo0, Lo1]),
    op("ld", P::IyDisp, P::Imm8, &[Lit(0xFD), Lit(0x36), Lo0, Lo1]),
    op("ld", P::A, P::BcInd, &[Lit(0x0A)]),
    op("ld", P::A, P::DeInd, &[Lit(0x1A)]),
    op("ld", P::BcInd, P::A, &[Lit(0x02)]),
    op("ld", P::DeInd, P::A, &[Lit(0x12)]),
    op("ld", P::A, P::WordInd, &[Lit(0x3A), Lo1, Hi1]),
    op("ld", P::WordInd, P::A, &[Lit(0x32), Lo0, Hi0]),
    op("ld", P::A, P::I, &[Lit(0xED), Lit(0x57)]),
    op("ld", P::A, P::R, &[Lit(0xED), Lit(0x5F)]),
    op("ld", P::I, P::A, &[Lit(0xED), Lit(0x47)]),
    op("ld", P::R, P::A, &[Lit(0xED), Lit(0x4F)]),
    op("ld", P::Reg8, P::Imm8, &[bits0(0x06, 3), Lo1]),
    // ============================================================
    // 16-bit loads
    // ============================================================
    op("ld", P::HL, P::WordInd, &[Lit(0x2A), Lo1, Hi1]),
    op("ld", P::WordInd, P::HL, &[Lit(0x22), Lo0, Hi0]),
    op("ld", P::IX, P::WordInd, &[Lit(0xDD), Lit(0x2A), Lo1, Hi1]),
    op("ld", P::WordInd, P::IX, &[Lit(0xDD), Lit(0x22), Lo0, Hi0]),
    op("ld", P::IY, P::WordInd, &[Lit(0xFD), Lit(0x2A), Lo1, Hi1]),
    op("ld", P::WordInd, P::IY, &[Lit(0xFD), Lit(0x22), Lo0, Hi0]),
    op("ld", P::Pair, P::WordInd, &[Lit(0xED), bits0(0x4B, 4), Lo1, Hi1]),
    op("ld", P::WordInd, P::Pair, &[Lit(0xED), bits1(0x43, 4), Lo0, Hi0]),
    op("ld", P::IX, P::Imm16, &[Lit(0xDD), Lit(0x21), Lo1, Hi1]),
    op("ld", P::IY, P::Imm16, &[Lit(0xFD), Lit(0x21), Lo1, Hi1]),
    op("ld", P::Pair, P::Imm16, &[bits0(0x01, 4), Lo1, Hi1]),
    op("ld", P::SP, P::HL, &[Lit(0xF9)]),
    op("ld", P::SP, P::IX, &[Lit(0xDD), Lit(0xF9)]),
    op("ld", P::SP, P::IY, &[Lit(0xFD), Lit(0xF9)]),
    // ============================================================
    // Stack
    // ============================================================
    op("push", P::IX, P::None, &[Lit(0xDD), Lit(0xE5)]),
    op("push", P::IY, P::None, &[Lit(0xFD), Lit(0xE5)]),
    op("push", P::PairAf, P::None, &[bits0(0xC5, 4)]),
    op("pop", P::IX, P::None, &[Lit(0xDD), Lit(0xE1)]),
    op("pop", P::IY, P::None, &[Lit(0xFD), Lit(0xE1)]),
    op("pop", P::PairAf, P::None, &[bits0(0xC1, 4)]),
    // ============================================================
    // Exchange and block transfer/search
    // ============================================================
    op("ex", P::DE, P::HL, &[Lit(0xEB)]),
    op("ex", P::AF, P::AfAlt, &[Lit(0x08)]),
    op("ex", P::SpInd, P::HL, &[Lit(0xE3)]),
    op("ex", P::SpInd, P::IX, &[Lit(0xDD), Lit(0xE3)]),
    op("ex", P::SpInd, P::IY, &[Lit(0xFD), Lit(0xE3)]),
    op("exx", P::None, P::None, &[Lit(0xD9)]),
    op("ldi", P::None, P::None, &[Lit(0xED), Lit(0xA0)]),
    op("ldir", P::None, P::None, &[Lit(0xED), Lit(0xB0)]),
    op("ldd", P::None, P::None, &[Lit(0xED), Lit(0xA8)]),
    op("lddr", P::None, P::None, &[Lit(0xED), Lit(0xB8)]),
    op("cpi", P::None, P::None, &[Lit(0xED), Lit(0xA1)]),
    op("cpir", P::None, P::None, &[Lit(0xED), Lit(0xB1)]),
    op("cpd", P::None, P::None, &[Lit(0xED), Lit(0xA9)]),
    op("cpdr", P::None, P::None, &[Lit(0xED), Lit(0xB9)]),
    // ============================================================
    // 8-bit arithmetic and logic
    // ============================================================
    op("add", P::A, P::Reg8, &[bits1(0x80, 0)]),
    op("add", P::A, P::HlInd, &[Lit(0x86)]),
    op("add", P::A, P::IxDisp, &[Lit(0xDD), Lit(0x86), Lo1]),
    op("add", P::A, P::IyDisp, &[Lit(0xFD), Lit(0x86), Lo1]),
    op("add", P::A, P::Imm8, &[Lit(0xC6), Lo1]),
    op("adc", P::A, P::Reg8, &[bits1(0x88, 0)]),
    op("adc", P::A, P::HlInd, &[Lit(0x8E)]),
    op("adc", P::A, P::IxDisp, &[Lit(0xDD), Lit(0x8E), Lo1]),
    op("adc", P::A, P::IyDisp, &[Lit(0xFD), Lit(0x8E), Lo1]),
    op("adc", P::A, P::Imm8, &[Lit(0xCE), Lo1]),
    op("sub", P::Reg8, P::None, &[bits0(0x90, 0)]),
    op("sub", P::HlInd, P::None, &[Lit(0x96)]),
    op("sub", P::IxDisp, P::None, &[Lit(0xDD), Lit(0x96), Lo0]),
    op("sub", P::IyDisp, P::None, &[Lit(0xFD), Lit(0x96), Lo0]),
    op("sub", P::Imm8, P::None, &[Lit(0xD6), Lo0]),
    op("sbc", P::A, P::Reg8, &[bits1(0x98, 0)]),
    op("sbc", P::A, P::HlInd, &[Lit(0x9E)]),
    op("sbc", P::A, P::IxDisp, &[Lit(0xDD), Lit(0x9E), Lo1]),
    op("sbc", P::A, P::IyDisp, &[Lit(0xFD), Lit(0x9E), Lo1]),
    op("sbc", P::A, P::Imm8, &[Lit(0xDE), Lo1]),
    op("and", P::Reg8, P::None, &[bits0(0xA0, 0)]),
    op("and", P::HlInd, P::None, &[Lit(0xA6)]),
    op("and", P::IxDisp, P::None, &[Lit(0xDD), Lit(0xA6), Lo0]),
    op("and", P::IyDisp, P::None, &[Lit(0xFD), Lit(0xA6), Lo0]),
    op("and", P::Imm8, P::None, &[Lit(0xE6), Lo0]),
    op("xor", P::Reg8, P::None, &[bits0(0xA8, 0)]),
    op("xor", P::HlInd, P::None, &[Lit(0xAE)]),
    op("xor", P::IxDisp, P::None, &[Lit(0xDD), Lit(0xAE), Lo0]),
    op("xor", P::IyDisp, P::None, &[Lit(0xFD), Lit(0xAE), Lo0]),
    op("xor", P::Imm8, P::None, &[Lit(0xEE), Lo0]),
    op("or", P::Reg8, P::None, &[bits0(0xB0, 0)]),
    op("or", P::HlInd, P::None, &[Lit(0xB6)]),
    op("or", P::IxDisp, P::None, &[Lit(0xDD), Lit(0xB6), Lo0]),
    op("or", P::IyDisp, P::None, &[Lit(0xFD), Lit(0xB6), Lo0]),
    op("or", P::Imm8, P::None, &[Lit(0xF6), Lo0]),
    op("cp", P::Reg8, P::None, &[bits0(0xB8, 0)]),
    op("cp", P::HlInd, P::None, &[Lit(0xBE)]),
    op("cp", P::IxDisp, P::None, &[Lit(0xDD), Lit(0xBE), Lo0]),
    op("cp", P::IyDisp, P::None, &[Lit(0xFD), Lit(0xBE), Lo0]),
    op("cp", P::Imm8, P::None, &[Lit(0xFE), Lo0]),
    // ============================================================
    // 16-bit arithmetic
    // ============================================================
    op("add", P::HL, P::Pair, &[bits1(0x09, 4)]),
    op("add", P::IX, P::BC, &[Lit(0xDD), Lit(0x09)]),
    op("add", P::IX, P::DE, &[Lit(0xDD), Lit(0x19)]),
    op("add", P::IX, P::IX, &[Lit(0xDD), Lit(0x29)]),
    op("add", P::IX, P::SP, &[Lit(0xDD), Lit(0x39)]),
    op("add", P::IY, P::BC, &[Lit(0xFD), Lit(0x09)]),
    op("add", P::IY, P::DE, &[Lit(0xFD), Lit(0x19)]),
    op("add", P::IY, P::IY, &[Lit(0xFD), Lit(0x29)]),
    op("add", P::IY, P::SP, &[Lit(0xFD), Lit(0x39)]),
    op("adc", P::HL, P::Pair, &[Lit(0xED), bits1(0x4A, 4)]),
    op("sbc", P::HL, P::Pair, &[Lit(0xED), bits1(0x42, 4)]),
    // ============================================================
    // Increment / decrement
    // ============================================================
    op("inc", P::Reg8, P::None, &[bits0(0x04, 3)]),
    op("inc", P::HlInd, P::None, &[Lit(0x34)]),
    op("inc", P::IxDisp, P::None, &[Lit(0xDD), Lit(0x34), Lo0]),
    op("inc", P::IyDisp, P::None, &[Lit(0xFD), Lit(0x34), Lo0]),
    op("inc", P::IX, P::None, &[Lit(0xDD), Lit(0x23)]),
    op("inc", P::IY, P::None, &[Lit(0xFD), Lit(0x23)]),
    op("inc", P::Pair, P::None, &[bits0(0x03, 4)]),
    op("dec", P::Reg8, P::None, &[bits0(0x05, 3)]),
    op("dec", P::HlInd, P::None, &[Lit(0x35)]),
    op("dec", P::IxDisp, P::None, &[Lit(0xDD), Lit(0x35), Lo0]),
    op("dec", P::IyDisp, P::None, &[Lit(0xFD), Lit(0x35), Lo0]),
    op("dec", P::IX, P::None, &[Lit(0xDD), Lit(0x2B)]),
    op("dec", P::IY, P::None, &[Lit(0xFD), Lit(0x2B)]),
    op("dec", P::Pair, P::None, &[bits0(0x0B, 4)]),
    // ============================================================
    // General purpose and CPU control
    // ============================================================
    op("daa", P::None, P::None, &[Lit(0x27)]),
    op("cpl", P::None, P::None, &[Lit(0x2F)]),
    op("neg", P::None, P::None, &[Lit(0xED), Lit(0x44)]),
    op("ccf", P::None, P::None, &[Lit(0x3F)]),
    op("scf", P::None, P::None, &[Lit(0x37)]),
    op("nop", P::None, P::None, &[Lit(0x00)]),
    op("halt", P::None, P::None, &[Lit(0x76)]),
    op("di", P::None, P::None, &[Lit(0xF3)]),
    op("ei", P::None, P::None, &[Lit(0xFB)]),
    op("im", P::IntMode, P::None, &[Lit(0xED), IntModeByte]),
    // ============================================================
    // Rotates and shifts
    // ============================================================
    op("rlca", P::None, P::None, &[Lit(0x07)]),
    op("rla", P::None, P::None, &[Lit(0x17)]),
    op("rrca", P::None, P::None, &[Lit(0x0F)]),
    op("rra", P::None, P::None, &[Lit(0x1F)]),
    op("rlc", P::Reg8, P::None, &[Lit(0xCB), bits0(0x00, 0)]),
    op("rlc", P::HlInd, P::None, &[Lit(0xCB), Lit(0x06)]),
    op("rlc", P::IxDisp, P::None, &[Lit(0xDD), Lit(0xCB), Lo0, Lit(0x06)]),
    op("rlc", P::IyDisp, P::None, &[Lit(0xFD), Lit(0xCB), Lo0, Lit(0x06)]),
    op("rrc", P::Reg8, P::None, &[Lit(0xCB), bits0(0x08, 0)]),
    op("rrc", P::HlInd, P::None, &[Lit(0xCB), Lit(0x0E)]),
    op("rrc", P::IxDisp, P::None, &[Lit(0xDD), Lit(0xCB), Lo0, Lit(0x0E)]),
    op("rrc", P::IyDisp, P::None, &[Lit(0xFD), Lit(0xCB), Lo0, Lit(0x0E)]),
    op("rl", P::Reg8, P::None, &[Lit(0xCB), bits0(0x10, 0)]),
    op("rl", P::HlInd, P::None, &[Lit(0xCB), Lit(0x16)]),
    op("rl", P::IxDisp, P::None, &[Lit(0xDD), Lit(0xCB), Lo0, Lit(0x16)]),
    op("rl", P::IyDisp, P::None, &[Lit(0xFD), Lit(0xCB), Lo0, Lit(0x16)]),
    op("rr", P::Reg8, P::None, &[Lit(0xCB), bits0(0x18, 0)]),
    op("rr", P::HlInd, P::None, &[Lit(0xCB), Lit(0x1E)]),
    op("rr", P::IxDisp, P::None, &[Lit(0xDD), Lit(0xCB), Lo0, Lit(0x1E)]),
    op("rr", P::IyDisp, P::None, &[Lit(0xFD), Lit(0xCB), Lo0, Lit(0x1E)]),
    op("sla", P::Reg8, P::None, &[Lit(0xCB), bits0(0x20, 0)]),
    op("sla", P::HlInd, P::None, &[Lit(0xCB), Lit(0x26)]),
    op("sla", P::IxDisp, P::None, &[Lit(0xDD), Lit(0xCB), Lo0, Lit(0x26)]),
    op("sla", P::IyDisp, P::None, &[Lit(0xFD), Lit(0xCB), Lo0, Lit(0x26)]),
    op("sra", P::Reg8, P::None, &[Lit(0xCB), bits0(0x28, 0)]),
    op("sra", P::HlInd, P::None, &[Lit(0xCB), Lit(0x2E)]),
    op("sra", P::IxDisp, P::None, &[Lit(0xDD), Lit(0xCB), Lo0, Lit(0x2E)]),
    op("sra", P::IyDisp, P::None, &[Lit(0xFD), Lit(0xCB), Lo0, Lit(0x2E)]),
    op("srl", P::Reg8, P::None, &[Lit(0xCB), bits0(0x38, 0)]),
    op("srl", P::HlInd, P::None, &[Lit(0xCB), Lit(0x3E)]),
    op("srl", P::IxDisp, P::None, &[Lit(0xDD), Lit(0xCB), Lo0, Lit(0x3E)]),
    op("srl", P::IyDisp, P::None, &[Lit(0xFD), Lit(0xCB), Lo0, Lit(0x3E)]),
    op("rld", P::None, P::None, &[Lit(0xED), Lit(0x6F)]),
    op("rrd", P::None, P::None, &[Lit(0xED), Lit(0x67)]),
    // ============================================================
    // Bit set, reset, and test
    // ============================================================
    op("bit", P::BitIndex, P::Reg8, &[Lit(0xCB), bits01(0x40, 3, 0)]),
    op("bit", P::BitIndex, P::HlInd, &[Lit(0xCB), bits0(0x46, 3)]),
    op("bit", P::BitIndex, P::IxDisp, &[Lit(0xDD), Lit(0xCB), Lo1, bits0(0x46, 3)]),
    op("bit", P::BitIndex, P::IyDisp, &[Lit(0xFD), Lit(0xCB), Lo1, bits0(0x46, 3)]),
    op("set", P::BitIndex, P::Reg8, &[Lit(0xCB), bits01(0xC0, 3, 0)]),
    op("set", P::BitIndex, P::HlInd, &[Lit(0xCB), bits0(0xC6, 3)]),
    op("set", P::BitIndex, P::IxDisp, &[Lit(0xDD), Lit(0xCB), Lo1, bits0(0xC6, 3)]),
    op("set", P::BitIndex, P::IyDisp, &[Lit(0xFD), Lit(0xCB), Lo1, bits0(0xC6, 3)]),
    op("res", P::BitIndex, P::Reg8, &[Lit(0xCB), bits01(0x80, 3, 0)]),
    op("res", P::BitIndex, P::HlInd, &[Lit(0xCB), bits0(0x86, 3)]),
    op("res", P::BitIndex, P::IxDisp, &[Lit(0xDD), Lit(0xCB), Lo1, bits0(0x86, 3)]),
    op("res", P::BitIndex, P::IyDisp, &[Lit(0xFD), Lit(0xCB), Lo1, bits0(0x86, 3)]),
    // ============================================================
    // Jumps, calls, and returns
    // ============================================================
    op("jp", P::HlInd, P::None, &[Lit(0xE9)]),
    op("jp", P::IxDisp, P::None, &[Lit(0xDD), Lit(0xE9)]),
    op("jp", P::IyDisp, P::None, &[Lit(0xFD), Lit(0xE9)]),
    op("jp", P::Cond, P::Imm16, &[bits0(0xC2, 3), Lo1, Hi1]),
    op("jp", P::Imm16, P::None, &[Lit(0xC3), Lo0, Hi0]),
    op("jr", P::CondRel, P::Rel, &[bits0(0x20, 3), Lo1]),
    op("jr", P::Rel, P::None, &[Lit(0x18), Lo0]),
    op("djnz", P::Rel, P::None, &[Lit(0x10), Lo0]),
    op("call", P::Cond, P::Imm16, &[bits0(0xC4, 3), Lo1, Hi1]),
    op("call", P::Imm16, P::None, &[Lit(0xCD), Lo0, Hi0]),
    op("ret", P::None, P::None, &[Lit(0xC9)]),
    op("ret", P::Cond, P::None, &[bits0(0xC0, 3)]),
    op("reti", P::None, P::None, &[Lit(0xED), Lit(0x4D)]),
    op("retn", P::None, P::None, &[Lit(0xED), Lit(0x45)]),
    op("rst", P::RstVec, P::None, &[bits0(0xC7, 0)]),
    // ============================================================
    // Input / output
    // ============================================================
    op("in", P::A, P::ByteInd, &[Lit(0xDB), Lo1]),
    op("in", P::Reg8, P::CInd, &[Lit(0xED), bits0(0x40, 3)]),
    op("out", P::ByteInd, P::A, &[Lit(0xD3), Lo0]),
    op("out", P::CInd, P::Reg8, &[Lit(0xED), bits1(0x41, 3)]),
    op("ini", P::None, P::None, &[Lit(0xED), Lit(0xA2)]),
    op("inir", P::None, P::None, &[Lit(0xED), Lit(0xB2)]),
    op("ind", P::None, P::None, &[Lit(0xED), Lit(0xAA)]),
    op("indr", P::None, P::None, &[Lit(0xED), Lit(0xBA)]),
    op("outi", P::None, P::None, &[Lit(0xED), Lit(0xA3)]),
    op("otir", P::None, P::None, &[Lit(0xED), Lit(0xB3)]),
    op("outd", P::None, P::None, &[Lit(0xED), Lit(0xAB)]),
    op("otdr", P::None, P::None, &[Lit(0xED), Lit(0xBB)]),
];

/// Register groups and singletons: the operand's position in the name list
/// is its encoded value.
pub static PARAM_VAL_TABLE: &[(ParamType, &[&str])] = &[
    (P::Reg8, &["b", "c", "d", "e", "h", "l", "(hl)", "a"]),
    (P::Pair, &["bc", "de", "hl", "sp"]),
    (P::PairAf, &["bc", "de", "hl", "af"]),
    (P::Cond, &["nz", "z", "nc", "c", "po", "pe", "p", "m"]),
    (P::CondRel, &["nz", "z", "nc", "c"]),
    (P::A, &["a"]),
    (P::I, &["i"]),
    (P::R, &["r"]),
    (P::BC, &["bc"]),
    (P::DE, &["de"]),
    (P::HL, &["hl"]),
    (P::SP, &["sp"]),
    (P::AF, &["af"]),
    (P::IX, &["ix"]),
    (P::IY, &["iy"]),
];

/// One-token indirections like `(hl)`.
pub static PARAM_VAL_TABLE_D: &[(ParamType, &[&str])] = &[
    (P::BcInd, &["bc"]),
    (P::DeInd, &["de"]),
    (P::HlInd, &["hl"]),
    (P::SpInd, &["sp"]),
    (P::CInd, &["c"]),
];

/// Categories a bare number or symbol expression could be.
pub static NUMBER_PARAM_TYPES: &[ParamType] = &[
    P::Imm8,
    P::Imm16,
    P::Disp,
    P::BitIndex,
    P::Rel,
    P::IntMode,
    P::RstVec,
];

/// Name list for a group-encoded category.
#[must_use]
pub fn param_val_names(pt: ParamType) -> Option<&'static [&'static str]> {
    PARAM_VAL_TABLE
        .iter()
        .find(|(ty, _)| *ty == pt)
        .map(|(_, names)| *names)
}

/// True if the identifier names a register, register pair, or condition.
#[must_use]
pub fn is_register_name(name: &str) -> bool {
    PARAM_VAL_TABLE
        .iter()
        .flat_map(|(_, names)| names.iter())
        .chain(PARAM_VAL_TABLE_D.iter().flat_map(|(_, names)| names.iter()))
        .any(|candidate| candidate.eq_ignore_ascii_case(name))
}

/// Range predicate for the numeric operand categories.
#[must_use]
pub fn valid_number_param(pt: ParamType, val: i64) -> bool {
    match pt {
        P::Imm8 => (-128..=255).contains(&val),
        P::Imm16 => (-32768..=65535).contains(&val),
        P::Disp | P::Rel => (-128..=127).contains(&val),
        P::BitIndex => (0..=7).contains(&val),
        P::ByteInd => (0..=255).contains(&val),
        P::WordInd => (0..=65535).contains(&val),
        P::IntMode => (0..=2).contains(&val),
        P::RstVec => (0..=0x38).contains(&val) && val % 8 == 0,
        _ => false,
    }
}

/// All rows for a mnemonic, in table order.
pub fn mnemonic_rows<'a>(mnemonic: &'a str) -> impl Iterator<Item = &'static OpCode> + 'a {
    OPCODE_TABLE
        .iter()
        .filter(move |row| row.mnemonic.eq_ignore_ascii_case(mnemonic))
}

#[must_use]
pub fn is_mnemonic(name: &str) -> bool {
    mnemonic_rows(name).next().is_some()
}

/// Find the first row whose operand categories are members of both inferred
/// sets. Table order is authoritative: specific rows precede general ones.
#[must_use]
pub fn resolve(
    mnemonic: &str,
    types0: &[ParamType],
    types1: &[ParamType],
) -> Option<&'static OpCode> {
    mnemonic_rows(mnemonic).find(|row| types0.contains(&row.pt0) && types1.contains(&row.pt1))
}
