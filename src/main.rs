use anyhow::Result;
use sicas::assemble_program;
use std::{env, fs};

const INTERMEDIATE_FILE: &str = "intermediate_file.txt";
const LISTING_FILE: &str = "assembly_listing.txt";
const OBJECT_FILE: &str = "output_object_program.txt";

fn main() -> Result<()> {
    let filename: String = env::args()
        .nth(1)
        .ok_or_else(|| anyhow::Error::msg("Need an input filename"))?;
    let source = fs::read_to_string(&filename)?;

    let assembly = assemble_program(&source)?;

    fs::write(INTERMEDIATE_FILE, &assembly.intermediate)?;
    fs::write(LISTING_FILE, &assembly.listing)?;
    fs::write(OBJECT_FILE, &assembly.object_program)?;

    for warning in &assembly.warnings {
        println!("Warning: {}", warning);
    }
    println!("Code assembled successfully");
    println!("Intermediate file written to\t{}", INTERMEDIATE_FILE);
    println!("Assembly listing written to\t{}", LISTING_FILE);
    println!("Object program written to\t{}", OBJECT_FILE);

    Ok(())
}
