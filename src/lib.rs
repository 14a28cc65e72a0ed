//! A two-pass assembler for the simplified instructional computer (SIC).
//!
//! Source text goes through line classification, a first pass that assigns
//! locations and builds the symbol table, and a second pass that encodes
//! object code, which is then packed into caret-delimited Header, Text,
//! and End records. The first fatal error aborts the whole run; warnings
//! accumulate and are returned with the artifacts.

pub use error::{AsmError, ErrorKind, Warning};

pub mod error;
pub mod hex;
pub mod listing;
pub mod mnemonic;
pub mod parser;
pub mod pass_one;
pub mod pass_two;
pub mod record;
pub mod symbols;

/// The artifacts of a successful run.
#[derive(Debug)]
pub struct Assembly {
    /// The pass-one rendering of every line with its location.
    pub intermediate: String,
    /// Object code alongside the intermediate fields.
    pub listing: String,
    /// Header, Text, and End records, one per line.
    pub object_program: String,
    pub warnings: Vec<Warning>,
}

/// Assemble a SIC program from source text.
///
/// # Errors
///
/// Returns the first fatal error found in the source. No artifacts are
/// produced for a failed run.
pub fn assemble_program(source: &str) -> Result<Assembly, AsmError> {
    let lines = parser::parse_program(source)?;
    let saw_blank_lines = lines.iter().any(parser::SourceLine::is_blank);

    let pass_one = pass_one::pass_one(lines)?;
    let pass_two = pass_two::pass_two(&pass_one)?;
    let records = record::pack_records(&pass_one, &pass_two);

    let mut warnings = pass_one.warnings.clone();
    if saw_blank_lines {
        warnings.push(Warning::BlankLines);
    }

    Ok(Assembly {
        intermediate: listing::intermediate_text(&pass_one),
        listing: listing::listing_text(&pass_one, &pass_two),
        object_program: listing::object_program_text(&records),
        warnings,
    })
}
