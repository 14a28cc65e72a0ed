//! Error taxonomy and warnings for a translation run.
//!
//! Every fatal condition is a value here; the library never terminates the
//! process. The driver decides what reaching it means.

use std::fmt;

use thiserror::Error;

use crate::parser::SourceLine;

/// Every contract violation that aborts a translation run.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("the first instruction is not START, use '<label> START <address>'")]
    FirstNotStart,
    #[error("program empty, no START instruction found")]
    ProgramEmpty,
    #[error("more than one START directive in the program")]
    MultipleStart,
    #[error("could not find an END directive in the program")]
    EndNotFound,
    #[error("operation mnemonic <{0}> is not valid")]
    InvalidMnemonic(String),
    #[error("the instruction does not contain an operation mnemonic")]
    MissingMnemonic,
    #[error("two mnemonics specified in one line")]
    TwoMnemonics,
    #[error("two or more operands or operation mnemonics specified in line")]
    TooManyTokens,
    #[error("no operand specified in the <{0}> assembler directive")]
    MissingOperand(String),
    #[error("the symbol <{0}> already exists, remove the duplicate declaration")]
    DuplicateSymbol(String),
    #[error("string too large, at most 30 bytes allowed in a character array")]
    StringTooLong,
    #[error("incorrect indexed addressing, only the index register X is permitted")]
    BadIndexRegister,
    #[error("the symbol is not an alphanumeric starting with a letter")]
    BadSymbolFormat,
    #[error("invalid operand syntax")]
    OperandSyntax,
    #[error("RESW and RESB only accept numeric operands")]
    ReserveNotNumeric,
    #[error("the WORD directive only accepts decimal operands")]
    WordNotDecimal,
    #[error("constants require decimal, hexadecimal, or character-array data")]
    InvalidConstant,
    #[error("constant out of bounds, a word is 3 bytes and a byte is 1")]
    ConstantOutOfBounds,
    #[error("the RSUB instruction expects no operand")]
    RsubOperand,
    #[error("direct addressing is not allowed, specify a label or variable name")]
    DirectAddressing,
    #[error("no variable named <{0}> was declared in the program")]
    UndefinedSymbol(String),
    #[error("invalid END operand, specify the label of the first instruction to execute")]
    BadEndOperand,
    #[error("address does not fit in the 15-bit address space, lower the START address")]
    AddressOverflow,
    #[error("internal consistency error")]
    Internal,
}

/// A fatal error, annotated with the offending source line when there is one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AsmError {
    #[error("{0}")]
    Program(ErrorKind),
    #[error("{kind}\nline-{line_no}>\t{text}")]
    Source {
        kind: ErrorKind,
        line_no: usize,
        text: String,
    },
}

impl AsmError {
    pub(crate) fn at(kind: ErrorKind, line: &SourceLine) -> Self {
        Self::Source {
            kind,
            line_no: line.line_no,
            text: line.text.clone(),
        }
    }

    pub fn kind(&self) -> &ErrorKind {
        match self {
            Self::Program(kind) | Self::Source { kind, .. } => kind,
        }
    }
}

/// Conditions that are reported but do not stop the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Warning {
    MissingProgramName,
    MissingStartAddress,
    MissingEndOperand,
    BlankLines,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Warning::MissingProgramName => "program name not specified in START instruction",
            Warning::MissingStartAddress => {
                "program starting address not specified in START instruction"
            }
            Warning::MissingEndOperand => {
                "first executable instruction not specified in END directive"
            }
            Warning::BlankLines => "the program contains one or more blank lines",
        };
        f.write_str(text)
    }
}
