use sicas::assemble_program;

#[test]
fn test_copy_object_program() {
    let assembly = assemble_program(include_str!("../programs/copy.sic")).unwrap();

    insta::assert_snapshot!("copy_object_program", assembly.object_program.trim_end());
}

#[test]
fn test_gap_object_program() {
    let assembly = assemble_program(include_str!("../programs/gap.sic")).unwrap();

    insta::assert_snapshot!("gap_object_program", assembly.object_program.trim_end());
}
