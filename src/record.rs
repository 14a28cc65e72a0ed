//! Object-program records and the text-record packer.

use std::fmt::Display;

use crate::{
    hex,
    mnemonic::{Assembler, Mnemonic},
    parser::LineBody,
    pass_one::PassOne,
    pass_two::PassTwo,
};

/// Maximum object-code payload of one text record, in hex characters
/// (30 bytes).
pub const MAX_TEXT_CHARS: usize = 60;

/// One text record: a starting address and the consecutive object-code
/// fragments packed behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Text {
    pub address: u32,
    pub fragments: Vec<String>,
}

impl Text {
    pub fn new(address: u32) -> Self {
        Self {
            address,
            fragments: Vec::new(),
        }
    }

    /// Accumulated payload length in hex characters.
    pub fn len(&self) -> usize {
        self.fragments.iter().map(String::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.fragments.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Header {
        name: String,
        start: u32,
        length: u32,
    },
    Text(Text),
    End {
        first_instruction: u32,
    },
}

impl Display for Record {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Record::Header {
                name,
                start,
                length,
            } => {
                write!(
                    f,
                    "H^{:<6}^{}^{}",
                    name,
                    hex::to_hex(*start, 6),
                    hex::to_hex(*length, 6)
                )
            }
            Record::Text(text) => {
                write!(
                    f,
                    "T^{}^{}",
                    hex::to_hex(text.address, 6),
                    hex::to_hex(text.len() as u32 / 2, 2)
                )?;
                for fragment in &text.fragments {
                    write!(f, "^{}", fragment)?;
                }
                Ok(())
            }
            Record::End { first_instruction } => {
                write!(f, "E^{}", hex::to_hex(*first_instruction, 6))
            }
        }
    }
}

/// Pack the encoded program into Header, Text, and End records. A RESW or
/// RESB line closes the open text record; the next code-bearing line opens
/// a fresh one at its own location.
pub fn pack_records(pass_one: &PassOne, pass_two: &PassTwo) -> Vec<Record> {
    let mut records = vec![Record::Header {
        name: pass_one.program_name.clone(),
        start: pass_one.starting_address,
        length: pass_one.program_length,
    }];
    let mut open: Option<Text> = None;

    for (index, line) in pass_one.lines.iter().enumerate() {
        let LineBody::Instruction(ins) = &line.body else {
            continue;
        };
        match ins.mnemonic {
            Mnemonic::Assembler(Assembler::START) => continue,
            Mnemonic::Assembler(Assembler::END) => break,
            Mnemonic::Assembler(Assembler::RESW | Assembler::RESB) => {
                if let Some(text) = open.take() {
                    records.push(Record::Text(text));
                }
                continue;
            }
            _ => {}
        }
        let (Some(location), Some(code)) = (
            pass_one.locations[index],
            pass_two.object_codes[index].as_ref(),
        ) else {
            continue;
        };

        let mut text = open.take().unwrap_or_else(|| Text::new(location));
        if text.len() + code.len() > MAX_TEXT_CHARS {
            records.push(Record::Text(text));
            text = Text::new(location);
        }
        text.fragments.push(code.clone());
        open = Some(text);
    }

    if let Some(text) = open.take() {
        if !text.is_empty() {
            records.push(Record::Text(text));
        }
    }

    records.push(Record::End {
        first_instruction: pass_two.first_executable,
    });

    records
}
