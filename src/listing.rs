//! Textual renderings of the annotated program: the pass-one intermediate
//! file, the assembly listing, and the object-program text.

use crate::{
    hex,
    parser::{LineBody, SourceLine},
    pass_one::PassOne,
    pass_two::PassTwo,
    record::Record,
};

const INDENT: &str = "\t\t";
const NO_LOCATION: &str = "None";

fn source_fields(line: &SourceLine, location: Option<u32>) -> String {
    match &line.body {
        LineBody::Blank => String::new(),
        LineBody::Comment(comment) => format!(".{INDENT}{comment}"),
        LineBody::Instruction(ins) => {
            let loc = location.map_or_else(|| NO_LOCATION.to_string(), |loc| hex::to_hex(loc, 4));
            format!(
                "Loc-{loc}{INDENT}{label}{INDENT}{mnemonic}{INDENT}{operand}",
                label = ins.label.as_deref().unwrap_or(""),
                mnemonic = ins.mnemonic,
                operand = ins.operand_text,
            )
        }
    }
}

/// The pass-one/pass-two boundary artifact: every line with its location.
pub fn intermediate_text(pass_one: &PassOne) -> String {
    let mut out = String::new();
    for (line, location) in pass_one.lines.iter().zip(&pass_one.locations) {
        out.push_str(&source_fields(line, *location));
        out.push('\n');
    }
    out
}

/// The diagnostic listing: object code alongside the intermediate fields.
pub fn listing_text(pass_one: &PassOne, pass_two: &PassTwo) -> String {
    let mut out = format!("Obj{INDENT}Location\n\n");
    for (index, line) in pass_one.lines.iter().enumerate() {
        if let Some(code) = &pass_two.object_codes[index] {
            out.push_str(code);
        }
        out.push_str(INDENT);
        out.push_str(&source_fields(line, pass_one.locations[index]));
        out.push('\n');
    }
    out
}

/// The final object program, one record per line.
pub fn object_program_text(records: &[Record]) -> String {
    let mut out = String::new();
    for record in records {
        out.push_str(&record.to_string());
        out.push('\n');
    }
    out
}
