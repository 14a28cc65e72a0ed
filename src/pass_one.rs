//! Pass one: START/END placement, location assignment, symbol definition.

use crate::{
    error::{AsmError, ErrorKind, Warning},
    hex,
    mnemonic::{Assembler, Mnemonic},
    parser::{LineBody, SourceLine},
    symbols::SymbolTable,
};

/// Highest address expressible in the 15-bit address field.
pub const MAX_ADDRESS: u32 = 0x7FFF;

/// Program name used when the START instruction carries no label.
pub const DEFAULT_PROGRAM_NAME: &str = "UNTITL";

/// Everything pass one resolves: the classified lines, a location for each
/// line that occupies memory, the completed symbol table, and the program
/// scalars. Locations are associated with lines by index.
#[derive(Debug)]
pub struct PassOne {
    pub lines: Vec<SourceLine>,
    pub locations: Vec<Option<u32>>,
    pub symbols: SymbolTable,
    pub program_name: String,
    pub starting_address: u32,
    pub program_length: u32,
    /// Index of the first END line. Nothing after it is processed.
    pub end_index: usize,
    /// The END operand after defaulting; names the first executable
    /// instruction.
    pub end_target: String,
    pub warnings: Vec<Warning>,
}

pub fn pass_one(lines: Vec<SourceLine>) -> Result<PassOne, AsmError> {
    let mut warnings = Vec::new();

    // Only comments and blanks may precede START.
    let mut start_index = None;
    for (index, line) in lines.iter().enumerate() {
        match line.mnemonic() {
            None => {}
            Some(Mnemonic::Assembler(Assembler::START)) => {
                start_index = Some(index);
                break;
            }
            Some(_) => return Err(AsmError::at(ErrorKind::FirstNotStart, line)),
        }
    }
    let start_index = start_index.ok_or(AsmError::Program(ErrorKind::ProgramEmpty))?;

    let start_line = &lines[start_index];
    let LineBody::Instruction(start) = &start_line.body else {
        return Err(AsmError::Program(ErrorKind::Internal));
    };

    let program_name = match &start.label {
        Some(label) => label.clone(),
        None => {
            warnings.push(Warning::MissingProgramName);
            DEFAULT_PROGRAM_NAME.to_string()
        }
    };

    let starting_address = if start.operand_text.is_empty() {
        warnings.push(Warning::MissingStartAddress);
        0
    } else {
        let address = hex::from_hex(&start.operand_text)
            .ok_or_else(|| AsmError::at(ErrorKind::OperandSyntax, start_line))?;
        if address > MAX_ADDRESS {
            return Err(AsmError::at(ErrorKind::AddressOverflow, start_line));
        }
        address
    };

    let end_index = lines
        .iter()
        .position(|line| line.mnemonic() == Some(Mnemonic::Assembler(Assembler::END)))
        .ok_or(AsmError::Program(ErrorKind::EndNotFound))?;
    let LineBody::Instruction(end) = &lines[end_index].body else {
        return Err(AsmError::Program(ErrorKind::Internal));
    };

    let end_target = if end.operand_text.is_empty() {
        warnings.push(Warning::MissingEndOperand);
        program_name.clone()
    } else {
        end.operand_text.clone()
    };

    // Walk up to and including the first END, assigning locations and
    // defining symbols. Everything past END is left untouched.
    let mut locations = vec![None; lines.len()];
    let mut symbols = SymbolTable::new();
    let mut counter = starting_address;

    for (index, line) in lines.iter().enumerate().take(end_index + 1) {
        let LineBody::Instruction(ins) = &line.body else {
            continue;
        };
        if ins.mnemonic == Mnemonic::Assembler(Assembler::START) && index != start_index {
            return Err(AsmError::at(ErrorKind::MultipleStart, line));
        }
        if index == end_index {
            break;
        }
        // START has zero size but still occupies the origin.
        if ins.size == 0 && index != start_index {
            continue;
        }
        if counter > MAX_ADDRESS {
            return Err(AsmError::at(ErrorKind::AddressOverflow, line));
        }
        locations[index] = Some(counter);

        let label = if index == start_index {
            Some(program_name.as_str())
        } else {
            ins.label.as_deref()
        };
        if let Some(label) = label {
            symbols
                .define(label, counter)
                .map_err(|kind| AsmError::at(kind, line))?;
        }

        counter = counter
            .checked_add(ins.size)
            .ok_or_else(|| AsmError::at(ErrorKind::AddressOverflow, line))?;
    }

    let program_length = counter - starting_address;

    Ok(PassOne {
        lines,
        locations,
        symbols,
        program_name,
        starting_address,
        program_length,
        end_index,
        end_target,
        warnings,
    })
}
