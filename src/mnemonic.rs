//! Mnemonic tables: machine operations and assembler directives.

use std::fmt;
use std::str::FromStr;

use num_derive::FromPrimitive;
use strum_macros::{Display, EnumString};

/// Machine operations of the base SIC instruction set, with their opcode
/// values as discriminants. Every operation occupies 3 bytes and takes a
/// single simple or indexed memory operand, except RSUB which takes none.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display, FromPrimitive)]
pub enum Op {
    LDA = 0x00,
    LDX = 0x04,
    LDL = 0x08,
    STA = 0x0C,
    STX = 0x10,
    STL = 0x14,
    ADD = 0x18,
    SUB = 0x1C,
    MUL = 0x20,
    DIV = 0x24,
    COMP = 0x28,
    TIX = 0x2C,
    JEQ = 0x30,
    JGT = 0x34,
    JLT = 0x38,
    J = 0x3C,
    JSUB = 0x48,
    RSUB = 0x4C,
    LDCH = 0x50,
    STCH = 0x54,
    RD = 0xD8,
    WD = 0xDC,
    TD = 0xE0,
}

impl Op {
    pub fn opcode(self) -> u8 {
        self as u8
    }
}

/// Assembler directives.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, Display)]
pub enum Assembler {
    START,
    END,
    BYTE,
    WORD,
    RESB,
    RESW,
}

/// A known mnemonic: either a machine operation or a directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mnemonic {
    Op(Op),
    Assembler(Assembler),
}

impl Mnemonic {
    /// Look a token up in the directive and operation tables.
    pub fn parse(token: &str) -> Option<Self> {
        if let Ok(directive) = Assembler::from_str(token) {
            Some(Self::Assembler(directive))
        } else if let Ok(op) = Op::from_str(token) {
            Some(Self::Op(op))
        } else {
            None
        }
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mnemonic::Op(op) => write!(f, "{}", op),
            Mnemonic::Assembler(directive) => write!(f, "{}", directive),
        }
    }
}
