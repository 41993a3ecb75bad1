use super::{assemble, split_args, AsmError, AsmErrorKind, AsmOutput};
use crate::core::report::Reporter;
use crate::core::tokenizer::{tokenize_line, tokenize_source, TokenKind};

fn assemble_output(src: &str) -> AsmOutput {
    let lines = tokenize_source(src).unwrap();
    let mut reporter = Reporter::new(true);
    match assemble(&lines, &mut reporter) {
        Ok(output) => output,
        Err(err) => panic!("assembly failed for {src:?}: {err}"),
    }
}

fn assemble_bytes(src: &str) -> Vec<u8> {
    assemble_output(src).bytes
}

fn assemble_err(src: &str) -> AsmError {
    let lines = tokenize_source(src).unwrap();
    let mut reporter = Reporter::new(true);
    match assemble(&lines, &mut reporter) {
        Ok(_) => panic!("assembly unexpectedly succeeded for {src:?}"),
        Err(err) => err,
    }
}

fn assemble_warnings(src: &str) -> usize {
    let lines = tokenize_source(src).unwrap();
    let mut reporter = Reporter::new(true);
    assemble(&lines, &mut reporter).expect("assembly failed");
    reporter.warning_count()
}

#[test]
fn nop_emits_single_byte() {
    assert_eq!(assemble_bytes("nop"), vec![0x00]);
}

#[test]
fn org_sets_addresses_without_padding() {
    let out = assemble_output(".org $100\nld a, $42");
    assert_eq!(out.bytes, vec![0x3E, 0x42]);
    assert_eq!(out.image.output_range(), Some((0x0100, 0x0101)));
}

#[test]
fn dollar_tracks_program_counter_in_pass1() {
    // After the two-byte load at $100 the counter sits at $102.
    let bytes = assemble_bytes(".org $100\nld a, $42\nhere = $\n.dw here");
    assert_eq!(bytes, vec![0x3E, 0x42, 0x02, 0x01]);
}

#[test]
fn relative_jump_to_own_label() {
    assert_eq!(assemble_bytes(".org 0\nlabel: jr label"), vec![0x18, 0xFE]);
}

#[test]
fn relative_jump_forward() {
    assert_eq!(
        assemble_bytes("jr fwd\nnop\nfwd: nop"),
        vec![0x18, 0x01, 0x00, 0x00]
    );
}

#[test]
fn djnz_backward() {
    assert_eq!(assemble_bytes("loop: djnz loop"), vec![0x10, 0xFE]);
}

#[test]
fn db_evaluates_arguments() {
    assert_eq!(assemble_bytes(".db 1, 2+3, 0x10"), vec![0x01, 0x05, 0x10]);
}

#[test]
fn dw_is_little_endian() {
    assert_eq!(
        assemble_bytes(".dw 0x1234, 0xBEEF"),
        vec![0x34, 0x12, 0xEF, 0xBE]
    );
}

#[test]
fn ds_reserves_filled_space() {
    assert_eq!(assemble_bytes(".ds 4, 0xAA"), vec![0xAA; 4]);
    assert_eq!(assemble_bytes(".ds 2"), vec![0x00, 0x00]);
}

#[test]
fn assignment_uses_operator_precedence() {
    assert_eq!(assemble_bytes("x = 1 + 2 * 3\n.db x"), vec![0x07]);
    assert_eq!(assemble_bytes("y = (1+2)*3\n.db y"), vec![0x09]);
}

#[test]
fn equ_directive_assigns() {
    assert_eq!(assemble_bytes("five .equ 5\n.db five"), vec![0x05]);
}

#[test]
fn index_displacements() {
    assert_eq!(assemble_bytes("ld a, (ix+5)"), vec![0xDD, 0x7E, 0x05]);
    assert_eq!(assemble_bytes("ld a, (ix-1)"), vec![0xDD, 0x7E, 0xFF]);
    assert_eq!(assemble_bytes("ld (iy+2), b"), vec![0xFD, 0x70, 0x02]);
    assert_eq!(assemble_bytes("ld b, (ix)"), vec![0xDD, 0x46, 0x00]);
}

#[test]
fn labels_bind_to_output_offsets() {
    let bytes = assemble_bytes("nop\nlab: nop\n.dw lab");
    assert_eq!(bytes, vec![0x00, 0x00, 0x01, 0x00]);
}

#[test]
fn chained_labels_share_an_address() {
    let bytes = assemble_bytes("first: second: nop\n.dw first, second");
    assert_eq!(bytes, vec![0x00, 0x00, 0x00, 0x00, 0x00]);
}

#[test]
fn forward_references_resolve_in_pass2() {
    let bytes = assemble_bytes("jp target\ntarget: nop");
    assert_eq!(bytes, vec![0xC3, 0x03, 0x00, 0x00]);
}

#[test]
fn end_stops_assembly() {
    assert_eq!(assemble_bytes("nop\n.end\nhalt"), vec![0x00]);
}

#[test]
fn instruction_selection_across_groups() {
    assert_eq!(assemble_bytes("ld b, c"), vec![0x41]);
    assert_eq!(assemble_bytes("ld (hl), b"), vec![0x70]);
    assert_eq!(assemble_bytes("ld hl, 0x1234"), vec![0x21, 0x34, 0x12]);
    assert_eq!(assemble_bytes("ld hl, (0x1234)"), vec![0x2A, 0x34, 0x12]);
    assert_eq!(
        assemble_bytes("ld bc, (0x1234)"),
        vec![0xED, 0x4B, 0x34, 0x12]
    );
    assert_eq!(
        assemble_bytes("ld (0x4321), bc"),
        vec![0xED, 0x43, 0x21, 0x43]
    );
    assert_eq!(assemble_bytes("ld a, (bc)"), vec![0x0A]);
    assert_eq!(assemble_bytes("ld (de), a"), vec![0x12]);
    assert_eq!(assemble_bytes("ld sp, ix"), vec![0xDD, 0xF9]);
    assert_eq!(assemble_bytes("ld a, i"), vec![0xED, 0x57]);
}

#[test]
fn arithmetic_and_logic_forms() {
    assert_eq!(assemble_bytes("add a, b"), vec![0x80]);
    assert_eq!(assemble_bytes("add a, 1"), vec![0xC6, 0x01]);
    assert_eq!(assemble_bytes("add hl, sp"), vec![0x39]);
    assert_eq!(assemble_bytes("add ix, de"), vec![0xDD, 0x19]);
    assert_eq!(assemble_bytes("adc a, 1"), vec![0xCE, 0x01]);
    assert_eq!(assemble_bytes("sbc hl, bc"), vec![0xED, 0x42]);
    assert_eq!(assemble_bytes("sub b"), vec![0x90]);
    assert_eq!(assemble_bytes("and 0x0F"), vec![0xE6, 0x0F]);
    assert_eq!(assemble_bytes("xor a"), vec![0xAF]);
    assert_eq!(assemble_bytes("cp 5"), vec![0xFE, 0x05]);
    assert_eq!(assemble_bytes("inc (ix+1)"), vec![0xDD, 0x34, 0x01]);
    assert_eq!(assemble_bytes("dec sp"), vec![0x3B]);
}

#[test]
fn stack_exchange_and_control_forms() {
    assert_eq!(assemble_bytes("push af"), vec![0xF5]);
    assert_eq!(assemble_bytes("pop ix"), vec![0xDD, 0xE1]);
    assert_eq!(assemble_bytes("ex af, af'"), vec![0x08]);
    assert_eq!(assemble_bytes("ex (sp), hl"), vec![0xE3]);
    assert_eq!(assemble_bytes("ldir"), vec![0xED, 0xB0]);
    assert_eq!(assemble_bytes("im 1"), vec![0xED, 0x56]);
    assert_eq!(assemble_bytes("rst 0x18"), vec![0xDF]);
    assert_eq!(assemble_bytes("halt"), vec![0x76]);
}

#[test]
fn jump_call_and_io_forms() {
    assert_eq!(assemble_bytes("jp 0x1234"), vec![0xC3, 0x34, 0x12]);
    assert_eq!(assemble_bytes("jp nz, 0x1234"), vec![0xC2, 0x34, 0x12]);
    assert_eq!(assemble_bytes("jp (hl)"), vec![0xE9]);
    assert_eq!(assemble_bytes("call z, 0x1234"), vec![0xCC, 0x34, 0x12]);
    assert_eq!(assemble_bytes("ret po"), vec![0xE0]);
    assert_eq!(assemble_bytes("in a, (0xFE)"), vec![0xDB, 0xFE]);
    assert_eq!(assemble_bytes("in b, (c)"), vec![0xED, 0x40]);
    assert_eq!(assemble_bytes("out (c), e"), vec![0xED, 0x59]);
}

#[test]
fn bit_and_shift_forms() {
    assert_eq!(assemble_bytes("bit 7, (hl)"), vec![0xCB, 0x7E]);
    assert_eq!(assemble_bytes("set 1, (ix+3)"), vec![0xDD, 0xCB, 0x03, 0xCE]);
    assert_eq!(assemble_bytes("res 0, a"), vec![0xCB, 0x87]);
    assert_eq!(assemble_bytes("srl c"), vec![0xCB, 0x39]);
    assert_eq!(assemble_bytes("rlc (hl)"), vec![0xCB, 0x06]);
}

#[test]
fn conditional_relative_jump() {
    assert_eq!(assemble_bytes("back: jr c, back"), vec![0x38, 0xFE]);
}

#[test]
fn redeclared_symbol_is_an_error() {
    let err = assemble_err("x = 1\nx = 2");
    assert_eq!(err.kind(), AsmErrorKind::Symbol);
    let err = assemble_err("lab: nop\nlab: nop");
    assert_eq!(err.kind(), AsmErrorKind::Symbol);
}

#[test]
fn undeclared_symbol_is_an_error() {
    let err = assemble_err(".db missing");
    assert_eq!(err.kind(), AsmErrorKind::Expression);
    let err = assemble_err("ld a, missing");
    assert_eq!(err.kind(), AsmErrorKind::Expression);
}

#[test]
fn out_of_range_values_are_errors() {
    let err = assemble_err("ld a, 0x1FF");
    assert_eq!(err.kind(), AsmErrorKind::Range);
    let err = assemble_err("ld a, (ix+200)");
    assert_eq!(err.kind(), AsmErrorKind::Range);
    let err = assemble_err(".db 256");
    assert_eq!(err.kind(), AsmErrorKind::Range);
    let err = assemble_err(".dw 0x10000");
    assert_eq!(err.kind(), AsmErrorKind::Range);
    let err = assemble_err(".org 0x10000");
    assert_eq!(err.kind(), AsmErrorKind::Range);
    let err = assemble_err("target: rst 0x19");
    assert_eq!(err.kind(), AsmErrorKind::Range);
}

#[test]
fn relative_jump_out_of_range_is_an_error() {
    let err = assemble_err("jr 0x1000");
    assert_eq!(err.kind(), AsmErrorKind::Range);
}

#[test]
fn unknown_opcode_is_an_error() {
    let err = assemble_err("mov a, b");
    assert_eq!(err.kind(), AsmErrorKind::Instruction);
}

#[test]
fn invalid_operands_are_an_error() {
    let err = assemble_err("ld (bc), c");
    assert_eq!(err.kind(), AsmErrorKind::Instruction);
    let err = assemble_err("ld a,");
    assert_eq!(err.kind(), AsmErrorKind::Instruction);
}

#[test]
fn unknown_directive_warns_and_skips() {
    let lines = tokenize_source(".bogus 1\nnop").unwrap();
    let mut reporter = Reporter::new(true);
    let out = assemble(&lines, &mut reporter).unwrap();
    assert_eq!(out.bytes, vec![0x00]);
    assert_eq!(reporter.warning_count(), 1);
}

#[test]
fn excess_opcode_arguments_warn_and_truncate() {
    let lines = tokenize_source("ld a, 1, 2").unwrap();
    let mut reporter = Reporter::new(true);
    let out = assemble(&lines, &mut reporter).unwrap();
    assert_eq!(out.bytes, vec![0x3E, 0x01]);
    assert_eq!(reporter.warning_count(), 1);
}

#[test]
fn ds_argument_count_warnings() {
    assert_eq!(assemble_warnings(".ds"), 1);
    assert_eq!(assemble_warnings(".ds 1, 2, 3"), 1);
    assert_eq!(assemble_warnings(".ds 1, 2"), 0);
}

#[test]
fn emitted_length_always_matches_resolved_size() {
    let src = "start: ld a, 1\nld hl, (0x1234)\njr start\nbit 3, (iy-2)\nrst 8\ncall 0x10";
    let lines = tokenize_source(src).unwrap();
    let mut reporter = Reporter::new(true);
    let out = assemble(&lines, &mut reporter).unwrap();
    // Pass 1 advances by resolved sizes; the flat image is their sum.
    assert_eq!(out.bytes.len(), 2 + 3 + 2 + 4 + 1 + 3);
}

#[test]
fn split_args_handles_commas() {
    let tokens = tokenize_line("1, 2+3, (hl)", 1).unwrap();
    let args = split_args(&tokens);
    assert_eq!(args.len(), 3);
    assert_eq!(args[0].len(), 1);
    assert_eq!(args[1].len(), 3);
    assert_eq!(args[2].len(), 3);

    // trailing comma is permitted
    let tokens = tokenize_line("1, 2,", 1).unwrap();
    let args = split_args(&tokens);
    assert_eq!(args.len(), 2);

    assert!(split_args(&[]).is_empty());
}

#[test]
fn pass2_reports_line_of_failing_statement() {
    let lines = tokenize_source("nop\nnop\njr 0x1000").unwrap();
    let mut reporter = Reporter::new(true);
    let err = assemble(&lines, &mut reporter).unwrap_err();
    assert_eq!(err.kind(), AsmErrorKind::Range);
    let diags = reporter.diagnostics();
    assert_eq!(diags.last().unwrap().line, Some(3));
}

#[test]
fn comment_only_lines_are_ignored() {
    let bytes = assemble_bytes("; header\nnop ; trailing\n\nhalt");
    assert_eq!(bytes, vec![0x00, 0x76]);
}

#[test]
fn case_insensitive_mnemonics_and_registers() {
    assert_eq!(assemble_bytes("LD A, B"), assemble_bytes("ld a, b"));
    assert_eq!(assemble_bytes("JP NZ, 5"), assemble_bytes("jp nz, 5"));
}

#[test]
fn tokens_reconstruct_source_text() {
    let tokens = tokenize_line(".db 5, x", 1).unwrap();
    let text: Vec<String> = tokens.iter().map(|t| t.to_source_text()).collect();
    assert_eq!(text, vec![".db", "5", ",", "x"]);
    assert_eq!(tokens[0].kind, TokenKind::Directive("db".to_string()));
}
