// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Command-line interface parsing and argument validation.

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser};

use crate::assembler::error::{AsmError, AsmErrorKind, AsmRunError};

pub const VERSION: &str = "1.0";

const LONG_ABOUT: &str = "Z80 two-pass assembler with expressions and directives.

A flat binary image <BASE>.bin is always written, where BASE defaults to the
input filename without its .asm extension. Use -x/--hex to additionally emit
an Intel Hex file with the assembled addresses.
With multiple inputs, -o/--outfile is not allowed.";

#[derive(Parser, Debug)]
#[command(
    name = "zforge",
    version = VERSION,
    about = "Z80 two-pass assembler with expressions and directives",
    long_about = LONG_ABOUT
)]
pub struct Cli {
    #[arg(
        short = 'i',
        long = "infile",
        value_name = "FILE",
        action = ArgAction::Append,
        long_help = "Input assembly file (repeatable). Must end with .asm."
    )]
    pub infiles: Vec<PathBuf>,
    #[arg(
        short = 'o',
        long = "outfile",
        value_name = "BASE",
        long_help = "Output filename base. Defaults to the input base."
    )]
    pub outfile: Option<String>,
    #[arg(
        short = 'x',
        long = "hex",
        action = ArgAction::SetTrue,
        long_help = "Additionally emit an Intel Hex file <BASE>.hex."
    )]
    pub hex: bool,
    #[arg(
        short = 'q',
        long = "quiet",
        action = ArgAction::SetTrue,
        long_help = "Silence status messages."
    )]
    pub quiet: bool,
}

fn cli_error(msg: &str) -> AsmRunError {
    AsmRunError::new(
        AsmError::new(AsmErrorKind::Cli, msg, None),
        Vec::new(),
        Vec::new(),
    )
}

/// Validate CLI arguments.
pub fn validate_cli(cli: &Cli) -> Result<(), AsmRunError> {
    if cli.infiles.is_empty() {
        return Err(cli_error("No input files specified. Use -i/--infile"));
    }
    if cli.infiles.len() > 1 && cli.outfile.is_some() {
        return Err(cli_error(
            "-o/--outfile is not allowed with multiple inputs",
        ));
    }
    Ok(())
}

/// Split an input path into its display name and output base name.
pub fn input_base_from_path(path: &Path) -> Result<(String, String), AsmRunError> {
    let asm_name = path.to_string_lossy().to_string();
    let file_name = match path.file_name().and_then(|s| s.to_str()) {
        Some(name) => name,
        None => return Err(cli_error("Invalid input file name")),
    };
    if !file_name.ends_with(".asm") {
        return Err(cli_error("Input file must end with .asm"));
    }
    let base = file_name.strip_suffix(".asm").unwrap_or(file_name);
    Ok((asm_name, base.to_string()))
}
