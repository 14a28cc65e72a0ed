//! Pass two: structural operand checks and object-code encoding.

use num_traits::FromPrimitive;

use crate::{
    error::{AsmError, ErrorKind},
    hex,
    mnemonic::{Assembler, Mnemonic, Op},
    parser::{Instruction, LineBody, Operand, SourceLine},
    pass_one::PassOne,
    symbols::SymbolTable,
};

/// Bit set in the encoded word when the operand is indexed by register X.
pub const INDEX_BIT: u32 = 1 << 15;

const MAX_WORD: u32 = (1 << 24) - 1;
const MAX_BYTE: u32 = 0xFF;

/// Object code per line, associated by index, plus the resolved END target.
#[derive(Debug)]
pub struct PassTwo {
    pub object_codes: Vec<Option<String>>,
    pub first_executable: u32,
}

/// Encode every located instruction up to the first END. The symbol table
/// is read-only here.
pub fn pass_two(pass_one: &PassOne) -> Result<PassTwo, AsmError> {
    let mut object_codes = vec![None; pass_one.lines.len()];
    let mut first_executable = None;

    for (index, line) in pass_one.lines.iter().enumerate() {
        let LineBody::Instruction(ins) = &line.body else {
            continue;
        };
        let code = match ins.mnemonic {
            Mnemonic::Assembler(Assembler::START) => continue,
            Mnemonic::Assembler(Assembler::END) => {
                first_executable = Some(resolve_end(pass_one, ins, line)?);
                break;
            }
            Mnemonic::Assembler(Assembler::RESW | Assembler::RESB) => {
                // reservations produce no code, only an address gap
                if !ins.operand.is_numeric() {
                    return Err(AsmError::at(ErrorKind::ReserveNotNumeric, line));
                }
                continue;
            }
            Mnemonic::Assembler(Assembler::WORD) => {
                encode_word(ins).map_err(|kind| AsmError::at(kind, line))?
            }
            Mnemonic::Assembler(Assembler::BYTE) => {
                encode_byte(ins).map_err(|kind| AsmError::at(kind, line))?
            }
            Mnemonic::Op(Op::RSUB) => {
                if ins.operand != Operand::None {
                    return Err(AsmError::at(ErrorKind::RsubOperand, line));
                }
                // opcode 0x4C, no address, no index bit
                "4C0000".to_string()
            }
            Mnemonic::Op(op) => encode_operation(op, ins, &pass_one.symbols)
                .map_err(|kind| AsmError::at(kind, line))?,
        };
        object_codes[index] = Some(code);
    }

    let first_executable = first_executable.ok_or(AsmError::Program(ErrorKind::Internal))?;

    Ok(PassTwo {
        object_codes,
        first_executable,
    })
}

fn resolve_end(pass_one: &PassOne, ins: &Instruction, line: &SourceLine) -> Result<u32, AsmError> {
    if !ins.operand_text.is_empty() && !matches!(ins.operand, Operand::Label(_)) {
        return Err(AsmError::at(ErrorKind::BadEndOperand, line));
    }
    pass_one
        .symbols
        .get(&pass_one.end_target)
        .ok_or_else(|| AsmError::at(ErrorKind::UndefinedSymbol(pass_one.end_target.clone()), line))
}

fn encode_word(ins: &Instruction) -> Result<String, ErrorKind> {
    let Operand::Decimal(value) = &ins.operand else {
        return Err(ErrorKind::WordNotDecimal);
    };
    if *value > MAX_WORD {
        return Err(ErrorKind::ConstantOutOfBounds);
    }
    Ok(hex::to_hex(*value, 6))
}

fn encode_byte(ins: &Instruction) -> Result<String, ErrorKind> {
    match &ins.operand {
        Operand::Decimal(value) => {
            if *value > MAX_BYTE {
                return Err(ErrorKind::ConstantOutOfBounds);
            }
            Ok(hex::to_hex(*value, 2))
        }
        Operand::Hex(digits) => {
            // an odd digit stands for the low nibble of a single byte
            let padded = if digits.len() % 2 == 1 {
                format!("0{digits}")
            } else {
                digits.clone()
            };
            if padded.len() != 2 {
                return Err(ErrorKind::ConstantOutOfBounds);
            }
            Ok(padded)
        }
        Operand::CharArray(content) => Ok(content
            .chars()
            .map(|c| hex::to_hex(c as u32, 2))
            .collect()),
        _ => Err(ErrorKind::InvalidConstant),
    }
}

/// `(opcode << 16) | index_bit | address`, rendered as 6 hex digits.
fn encode_operation(op: Op, ins: &Instruction, symbols: &SymbolTable) -> Result<String, ErrorKind> {
    let (target, index_bit) = match &ins.operand {
        Operand::Label(label) => (label, 0),
        Operand::Indexed(label) => (label, INDEX_BIT),
        _ => return Err(ErrorKind::DirectAddressing),
    };
    let address = symbols
        .get(target)
        .ok_or_else(|| ErrorKind::UndefinedSymbol(target.clone()))?;
    let word = (u32::from(op.opcode()) << 16) | index_bit | address;
    Ok(hex::to_hex(word, 6))
}

/// Decode a 6-digit operation word back into opcode, index bit, and address.
/// The inverse of `encode_operation`.
pub fn decode_operation(code: &str) -> Option<(Op, bool, u32)> {
    if code.len() != 6 {
        return None;
    }
    let word = hex::from_hex(code)?;
    let op = Op::from_u32(word >> 16)?;
    let indexed = word & INDEX_BIT != 0;
    Some((op, indexed, word & (INDEX_BIT - 1)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_program;
    use crate::pass_one::pass_one;

    fn run(source: &str) -> (PassOne, PassTwo) {
        let pass = pass_one(parse_program(source).unwrap()).unwrap();
        let encoded = pass_two(&pass).unwrap();
        (pass, encoded)
    }

    fn run_err(source: &str) -> AsmError {
        let pass = pass_one(parse_program(source).unwrap()).unwrap();
        pass_two(&pass).unwrap_err()
    }

    fn single_code(source: &str, index: usize) -> String {
        let (_, encoded) = run(source);
        encoded.object_codes[index].clone().unwrap()
    }

    #[test]
    fn encodes_operation_with_resolved_address() {
        let source = "\
COPY    START   1000
FIRST   LDA     ALPHA
        ADD     ALPHA
ALPHA   WORD    5
        END     FIRST";
        let (_, encoded) = run(source);
        assert_eq!(encoded.object_codes[1].as_deref(), Some("001006"));
        assert_eq!(encoded.object_codes[2].as_deref(), Some("181006"));
        assert_eq!(encoded.first_executable, 0x1000);
    }

    #[test]
    fn indexed_operand_sets_bit_fifteen() {
        let source = "\
COPY    START   1000
FIRST   LDCH    BUFFER,X
BUFFER  RESB    8
        END     FIRST";
        assert_eq!(single_code(source, 1), "509003");
    }

    #[test]
    fn rsub_is_fixed() {
        let source = "\
COPY    START   1000
FIRST   RSUB
        END     FIRST";
        assert_eq!(single_code(source, 1), "4C0000");
    }

    #[test]
    fn rsub_rejects_an_operand() {
        let source = "\
COPY    START   1000
FIRST   RSUB    COPY
        END     FIRST";
        assert_eq!(run_err(source).kind(), &ErrorKind::RsubOperand);
    }

    #[test]
    fn word_encodes_three_bytes() {
        let source = "\
COPY    START   1000
FIRST   WORD    65535
        END     FIRST";
        assert_eq!(single_code(source, 1), "00FFFF");
    }

    #[test]
    fn word_out_of_bounds() {
        let source = "\
COPY    START   1000
FIRST   WORD    16777216
        END     FIRST";
        assert_eq!(run_err(source).kind(), &ErrorKind::ConstantOutOfBounds);
    }

    #[test]
    fn word_requires_decimal() {
        let source = "\
COPY    START   1000
FIRST   WORD    X'0F'
        END     FIRST";
        assert_eq!(run_err(source).kind(), &ErrorKind::WordNotDecimal);
    }

    #[test]
    fn byte_constants() {
        let base = "COPY    START   1000\nFIRST   BYTE    {}\n        END     FIRST";
        assert_eq!(single_code(&base.replace("{}", "C'EOF'"), 1), "454F46");
        assert_eq!(single_code(&base.replace("{}", "X'F1'"), 1), "F1");
        assert_eq!(single_code(&base.replace("{}", "X'F'"), 1), "0F");
        assert_eq!(single_code(&base.replace("{}", "255"), 1), "FF");
    }

    #[test]
    fn byte_out_of_bounds() {
        let base = "COPY    START   1000\nFIRST   BYTE    {}\n        END     FIRST";
        let err = run_err(&base.replace("{}", "256"));
        assert_eq!(err.kind(), &ErrorKind::ConstantOutOfBounds);
        let err = run_err(&base.replace("{}", "X'F1A2'"));
        assert_eq!(err.kind(), &ErrorKind::ConstantOutOfBounds);
    }

    #[test]
    fn byte_rejects_label_data() {
        let source = "\
COPY    START   1000
FIRST   BYTE    COPY
        END     FIRST";
        assert_eq!(run_err(source).kind(), &ErrorKind::InvalidConstant);
    }

    #[test]
    fn operations_require_label_operands() {
        let source = "\
COPY    START   1000
FIRST   LDA     4096
        END     FIRST";
        assert_eq!(run_err(source).kind(), &ErrorKind::DirectAddressing);
    }

    #[test]
    fn undeclared_symbol_is_named() {
        let source = "\
COPY    START   1000
FIRST   LDA     GHOST
        END     FIRST";
        assert_eq!(
            run_err(source).kind(),
            &ErrorKind::UndefinedSymbol("GHOST".to_string())
        );
    }

    #[test]
    fn undeclared_end_target_is_fatal() {
        let source = "\
COPY    START   1000
FIRST   RSUB
        END     GHOST";
        assert_eq!(
            run_err(source).kind(),
            &ErrorKind::UndefinedSymbol("GHOST".to_string())
        );
    }

    #[test]
    fn end_requires_a_label_operand() {
        let source = "\
COPY    START   1000
FIRST   RSUB
        END     1000";
        assert_eq!(run_err(source).kind(), &ErrorKind::BadEndOperand);
    }

    #[test]
    fn nothing_is_encoded_after_the_first_end() {
        let source = "\
COPY    START   1000
FIRST   RSUB
        END     FIRST
LATE    WORD    16777216";
        let (_, encoded) = run(source);
        assert_eq!(encoded.object_codes[3], None);
    }

    #[test]
    fn encoding_round_trips() {
        let source = "\
COPY    START   1000
FIRST   LDCH    BUFFER,X
        STA     BUFFER
BUFFER  RESB    8
        END     FIRST";
        let (_, encoded) = run(source);
        let code = encoded.object_codes[1].as_deref().unwrap();
        assert_eq!(decode_operation(code), Some((Op::LDCH, true, 0x1006)));
        let code = encoded.object_codes[2].as_deref().unwrap();
        assert_eq!(decode_operation(code), Some((Op::STA, false, 0x1006)));
    }
}
