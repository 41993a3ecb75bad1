// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Two-pass assembly driver.
//!
//! Pass 1 walks the token lines in program order: it binds labels and
//! assignments into the symbol context, evaluates data directives to literal
//! blocks, and resolves each instruction to its table row, queueing the
//! operand token spans with the recorded address. Pass 2 drains the queue,
//! re-evaluates each statement's operands at its address, and concatenates
//! the emitted bytes into the output image.

pub mod cli;
pub mod error;

#[cfg(test)]
mod tests;

use std::collections::VecDeque;
use std::fs::{self, File};

use clap::Parser;

use crate::core::context::{Context, DefineResult};
use crate::core::expr::parse_expression;
use crate::core::imagestore::ImageStore;
use crate::core::report::{Diagnostic, Reporter, Severity};
use crate::core::tokenizer::{tokenize_source, Span, Token, TokenKind, TokenLine};
use crate::z80::operand::{param_types, param_val, OperandErrorKind};
use crate::z80::table::{self, OpCode, ParamType};

use cli::{input_base_from_path, validate_cli, Cli};

pub use cli::VERSION;
pub use error::{AsmError, AsmErrorKind, AsmRunError, AsmRunReport};

/// A deferred instruction: the operand spans are re-evaluated in Pass 2
/// against the recorded address.
struct Statement<'a> {
    line: u32,
    address: i64,
    op: &'static OpCode,
    param0: &'a [Token],
    param1: &'a [Token],
}

/// A literal block whose bytes were already fixed in Pass 1.
struct Data {
    line: u32,
    address: i64,
    bytes: Vec<u8>,
}

enum QueueItem<'a> {
    Statement(Statement<'a>),
    Data(Data),
}

/// Result of one assembly: the flat byte image in queue order, plus the
/// addressed image for formats that keep `.org` placement.
#[derive(Debug)]
pub struct AsmOutput {
    pub bytes: Vec<u8>,
    pub image: ImageStore,
    pub symbol_count: usize,
}

/// Assemble token lines into a byte image. The reporter receives status
/// messages and accumulates warnings; the first error aborts the unit.
pub fn assemble<'a>(
    lines: &'a [TokenLine],
    reporter: &mut Reporter,
) -> Result<AsmOutput, AsmError> {
    let mut asm = Assembler::new();
    let result = asm.run_passes(lines, reporter);
    reporter.clear_line();
    result
}

struct Assembler<'a> {
    ctx: Context,
    queue: VecDeque<QueueItem<'a>>,
    image: ImageStore,
}

impl<'a> Assembler<'a> {
    fn new() -> Self {
        Self {
            ctx: Context::new(),
            queue: VecDeque::new(),
            image: ImageStore::new(),
        }
    }

    fn run_passes(
        &mut self,
        lines: &'a [TokenLine],
        reporter: &mut Reporter,
    ) -> Result<AsmOutput, AsmError> {
        reporter.status("Pass 1");
        self.pass1(lines, reporter)?;
        reporter.clear_line();
        reporter.status("Pass 2");
        let bytes = self.pass2(reporter)?;
        Ok(AsmOutput {
            bytes,
            image: std::mem::take(&mut self.image),
            symbol_count: self.ctx.symbol_count(),
        })
    }

    /// Symbol resolution and deferral.
    fn pass1(&mut self, lines: &'a [TokenLine], reporter: &mut Reporter) -> Result<(), AsmError> {
        'lines: for (idx, line) in lines.iter().enumerate() {
            let line_num = idx as u32 + 1;
            reporter.set_line(line_num);
            if line.is_empty() {
                continue;
            }

            if let TokenKind::Directive(name) = &line[0].kind {
                let rest = &line[1..];
                match name.to_ascii_lowercase().as_str() {
                    "org" | "origin" => self.dir_org(rest, reporter)?,
                    "db" | "byte" => self.dir_db(line_num, rest, reporter)?,
                    "dw" | "word" => self.dir_dw(line_num, rest, reporter)?,
                    "ds" | "space" => self.dir_ds(line_num, rest, reporter)?,
                    "end" => break 'lines,
                    "equ" => reporter.warning("Missing symbol before .equ"),
                    _ => reporter.warning_at(
                        &format!("Unknown directive: .{name}"),
                        Some(line[0].span.col_start),
                    ),
                }
                continue;
            }

            // label prefixes, any number chained
            let mut i = 0;
            while i + 1 < line.len() && line[i + 1].kind == TokenKind::Colon {
                let TokenKind::Identifier(name) = &line[i].kind else {
                    break;
                };
                let addr = self.ctx.prog_counter;
                self.define_symbol(name, addr, line[i].span, reporter)?;
                i += 2;
            }

            if i >= line.len() {
                continue;
            }

            let TokenKind::Identifier(name) = &line[i].kind else {
                return Err(fail(
                    reporter,
                    AsmErrorKind::Instruction,
                    &format!(
                        "Expected mnemonic or label, found '{}'",
                        line[i].to_source_text()
                    ),
                    Some(line[i].span.col_start),
                ));
            };

            // assignment: NAME = expr, NAME .equ expr
            let is_assignment = line.get(i + 1).is_some_and(|t| {
                t.kind == TokenKind::Assign
                    || matches!(&t.kind, TokenKind::Directive(d) if d.eq_ignore_ascii_case("equ"))
            });
            if is_assignment {
                let val = self.eval(&line[i + 2..], reporter)?;
                self.define_symbol(name, val, line[i].span, reporter)?;
                continue;
            }

            if table::is_mnemonic(name) {
                let mut args = split_args(&line[i + 1..]);
                if args.len() > 2 {
                    reporter.warning("Too many opcode arguments");
                    args.truncate(2);
                }
                let types0 = args
                    .first()
                    .map_or_else(|| vec![ParamType::None], |arg| param_types(arg));
                let types1 = args
                    .get(1)
                    .map_or_else(|| vec![ParamType::None], |arg| param_types(arg));
                let Some(op) = table::resolve(name, &types0, &types1) else {
                    return Err(fail(
                        reporter,
                        AsmErrorKind::Instruction,
                        &format!("Invalid operands for {name}"),
                        Some(line[i].span.col_start),
                    ));
                };
                self.queue.push_back(QueueItem::Statement(Statement {
                    line: line_num,
                    address: self.ctx.prog_counter,
                    op,
                    param0: args.first().copied().unwrap_or(&[]),
                    param1: args.get(1).copied().unwrap_or(&[]),
                }));
                self.ctx.prog_counter += op.size() as i64;
                continue;
            }

            return Err(fail(
                reporter,
                AsmErrorKind::Instruction,
                &format!("Unknown opcode: {name}"),
                Some(line[i].span.col_start),
            ));
        }
        Ok(())
    }

    /// Encoding: drain the queue in order and concatenate.
    fn pass2(&mut self, reporter: &mut Reporter) -> Result<Vec<u8>, AsmError> {
        let mut out = Vec::new();
        while let Some(item) = self.queue.pop_front() {
            match item {
                QueueItem::Data(data) => {
                    reporter.set_line(data.line);
                    self.image.store_slice(data.address as u16, &data.bytes);
                    out.extend_from_slice(&data.bytes);
                }
                QueueItem::Statement(stmt) => {
                    reporter.set_line(stmt.line);
                    // Relative operands are measured from the byte after the
                    // instruction.
                    self.ctx.prog_counter = stmt.address + stmt.op.size() as i64;
                    let p0 = self.operand_val(stmt.op.pt0, stmt.param0, reporter)?;
                    let p1 = self.operand_val(stmt.op.pt1, stmt.param1, reporter)?;
                    let bytes = stmt.op.emit(p0, p1);
                    debug_assert_eq!(bytes.len(), stmt.op.size());
                    self.image.store_slice(stmt.address as u16, &bytes);
                    out.extend_from_slice(&bytes);
                }
            }
        }
        Ok(out)
    }

    fn dir_org(&mut self, rest: &[Token], reporter: &mut Reporter) -> Result<(), AsmError> {
        let val = self.eval(rest, reporter)?;
        if !(0..=0xFFFF).contains(&val) {
            return Err(fail(
                reporter,
                AsmErrorKind::Range,
                &format!("Origin out of range: {val}"),
                rest.first().map(|t| t.span.col_start),
            ));
        }
        self.ctx.prog_counter = val;
        Ok(())
    }

    fn dir_db(
        &mut self,
        line_num: u32,
        rest: &[Token],
        reporter: &mut Reporter,
    ) -> Result<(), AsmError> {
        for arg in split_args(rest) {
            let val = self.eval(arg, reporter)?;
            if !(-128..=255).contains(&val) {
                return Err(fail(
                    reporter,
                    AsmErrorKind::Range,
                    &format!("Byte value out of range: {val}"),
                    arg.first().map(|t| t.span.col_start),
                ));
            }
            self.push_data(line_num, vec![(val & 0xff) as u8]);
        }
        Ok(())
    }

    fn dir_dw(
        &mut self,
        line_num: u32,
        rest: &[Token],
        reporter: &mut Reporter,
    ) -> Result<(), AsmError> {
        for arg in split_args(rest) {
            let val = self.eval(arg, reporter)?;
            if !(-32768..=65535).contains(&val) {
                return Err(fail(
                    reporter,
                    AsmErrorKind::Range,
                    &format!("Word value out of range: {val}"),
                    arg.first().map(|t| t.span.col_start),
                ));
            }
            self.push_data(line_num, vec![(val & 0xff) as u8, ((val >> 8) & 0xff) as u8]);
        }
        Ok(())
    }

    fn dir_ds(
        &mut self,
        line_num: u32,
        rest: &[Token],
        reporter: &mut Reporter,
    ) -> Result<(), AsmError> {
        let args = split_args(rest);
        if args.is_empty() {
            reporter.warning(".ds arguments expected");
        }
        if args.len() >= 3 {
            reporter.warning("Too many .ds arguments");
        }
        let count = match args.first() {
            Some(arg) => self.eval(arg, reporter)?,
            None => 0,
        };
        let fill = match args.get(1) {
            Some(arg) => self.eval(arg, reporter)?,
            None => 0,
        };
        if !(0..=0x10000).contains(&count) {
            return Err(fail(
                reporter,
                AsmErrorKind::Range,
                &format!("Space count out of range: {count}"),
                rest.first().map(|t| t.span.col_start),
            ));
        }
        self.push_data(line_num, vec![(fill & 0xff) as u8; count as usize]);
        Ok(())
    }

    fn push_data(&mut self, line: u32, bytes: Vec<u8>) {
        let len = bytes.len() as i64;
        self.queue.push_back(QueueItem::Data(Data {
            line,
            address: self.ctx.prog_counter,
            bytes,
        }));
        self.ctx.prog_counter += len;
    }

    fn define_symbol(
        &mut self,
        name: &str,
        val: i64,
        span: Span,
        reporter: &mut Reporter,
    ) -> Result<(), AsmError> {
        match self.ctx.define(name, val) {
            DefineResult::Ok => Ok(()),
            DefineResult::Duplicate => Err(fail(
                reporter,
                AsmErrorKind::Symbol,
                &format!("Redeclared variable: {name}"),
                Some(span.col_start),
            )),
        }
    }

    fn eval(&self, tokens: &[Token], reporter: &mut Reporter) -> Result<i64, AsmError> {
        parse_expression(&self.ctx, tokens).map_err(|err| {
            fail(
                reporter,
                AsmErrorKind::Expression,
                &err.message,
                err.span.map(|s| s.col_start),
            )
        })
    }

    fn operand_val(
        &self,
        pt: ParamType,
        tokens: &[Token],
        reporter: &mut Reporter,
    ) -> Result<i64, AsmError> {
        param_val(&self.ctx, pt, tokens).map_err(|err| {
            let kind = match err.kind {
                OperandErrorKind::Shape => AsmErrorKind::Operand,
                OperandErrorKind::Range => AsmErrorKind::Range,
                OperandErrorKind::Eval => AsmErrorKind::Expression,
            };
            fail(reporter, kind, &err.message, err.span.map(|s| s.col_start))
        })
    }
}

/// Record the error at the current line and build the `AsmError` that aborts
/// the unit.
fn fail(
    reporter: &mut Reporter,
    kind: AsmErrorKind,
    message: &str,
    column: Option<usize>,
) -> AsmError {
    reporter.error_at(message, column);
    AsmError::new(kind, message, None)
}

/// Split an operand list on commas. Trailing commas are permitted.
fn split_args(tokens: &[Token]) -> Vec<&[Token]> {
    let mut result = Vec::new();
    if tokens.is_empty() {
        return result;
    }
    let mut start = 0;
    for (i, tok) in tokens.iter().enumerate() {
        if tok.kind == TokenKind::Comma {
            result.push(&tokens[start..i]);
            start = i + 1;
        }
    }
    if start < tokens.len() {
        result.push(&tokens[start..]);
    }
    result
}

/// Run the assembler with command-line arguments.
pub fn run() -> Result<Vec<AsmRunReport>, AsmRunError> {
    let cli = Cli::parse();
    validate_cli(&cli)?;

    let mut reports = Vec::new();
    for asm_path in &cli.infiles {
        let (asm_name, input_base) = input_base_from_path(asm_path)?;
        let out_base = cli
            .outfile
            .as_deref()
            .unwrap_or(&input_base)
            .to_string();
        reports.push(run_one(&asm_name, &out_base, cli.hex, cli.quiet)?);
    }
    Ok(reports)
}

fn run_one(
    asm_name: &str,
    out_base: &str,
    want_hex: bool,
    quiet: bool,
) -> Result<AsmRunReport, AsmRunError> {
    let source = match fs::read_to_string(asm_name) {
        Ok(source) => source,
        Err(err) => {
            return Err(AsmRunError::new(
                AsmError::new(AsmErrorKind::Io, &err.to_string(), Some(asm_name)),
                Vec::new(),
                Vec::new(),
            ))
        }
    };
    let source_lines: Vec<String> = source.lines().map(|s| s.to_string()).collect();

    let token_lines = match tokenize_source(&source) {
        Ok(lines) => lines,
        Err(err) => {
            let diag = Diagnostic::new(Some(err.span.line), Severity::Error, err.message.clone())
                .with_column(Some(err.span.col_start));
            return Err(AsmRunError::new(
                AsmError::new(AsmErrorKind::Tokenize, &err.message, None),
                vec![diag],
                source_lines,
            ));
        }
    };

    let mut reporter = Reporter::new(quiet);
    let output = match assemble(&token_lines, &mut reporter) {
        Ok(output) => output,
        Err(err) => {
            return Err(AsmRunError::new(
                err,
                reporter.take_diagnostics(),
                source_lines,
            ))
        }
    };

    let bin_path = format!("{out_base}.bin");
    if let Err(err) = fs::write(&bin_path, &output.bytes) {
        return Err(AsmRunError::new(
            AsmError::new(AsmErrorKind::Io, &err.to_string(), Some(&bin_path)),
            reporter.take_diagnostics(),
            source_lines,
        ));
    }

    if want_hex {
        let hex_path = format!("{out_base}.hex");
        let result = File::create(&hex_path)
            .and_then(|mut file| output.image.write_hex_file(&mut file));
        if let Err(err) = result {
            return Err(AsmRunError::new(
                AsmError::new(AsmErrorKind::Io, &err.to_string(), Some(&hex_path)),
                reporter.take_diagnostics(),
                source_lines,
            ));
        }
    }

    match output.image.output_range() {
        Some((lo, hi)) => reporter.status(&format!(
            "Wrote {} bytes to {bin_path} ({lo:04X}..{hi:04X}, {} symbols)",
            output.bytes.len(),
            output.symbol_count
        )),
        None => reporter.status(&format!("Wrote 0 bytes to {bin_path}")),
    }

    Ok(AsmRunReport::new(
        reporter.take_diagnostics(),
        source_lines,
    ))
}
