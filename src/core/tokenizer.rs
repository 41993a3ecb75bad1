// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Tokenizer for assembly source with spans.
//!
//! Each source line is scanned into a [`TokenLine`]. The token surface is
//! deliberately small: integers, identifiers, `.directives`, punctuation,
//! the arithmetic operators, the `AF'` tick, and `$` for the current
//! program counter. Register detection is not done here; operand
//! classification decides what an identifier means.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub line: u32,
    pub col_start: usize,
    pub col_end: usize,
}

impl Span {
    fn new(line: u32, start: usize, end: usize) -> Self {
        Self {
            line,
            col_start: start + 1,
            col_end: end + 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Integer(i64),
    Identifier(String),
    Directive(String),
    Comma,
    Colon,
    Assign,
    OpenParen,
    CloseParen,
    Plus,
    Minus,
    Star,
    Slash,
    Caret,
    Tick,
    Dollar,
}

/// True for token kinds that reduce to an integer value during expression
/// evaluation. Parentheses count: a parenthesized group stands for the value
/// of its contents.
#[must_use]
pub fn holds_int_value(kind: &TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Integer(_)
            | TokenKind::Identifier(_)
            | TokenKind::Dollar
            | TokenKind::OpenParen
            | TokenKind::CloseParen
    )
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn to_source_text(&self) -> String {
        match &self.kind {
            TokenKind::Integer(val) => val.to_string(),
            TokenKind::Identifier(name) => name.clone(),
            TokenKind::Directive(name) => format!(".{name}"),
            TokenKind::Comma => ",".to_string(),
            TokenKind::Colon => ":".to_string(),
            TokenKind::Assign => "=".to_string(),
            TokenKind::OpenParen => "(".to_string(),
            TokenKind::CloseParen => ")".to_string(),
            TokenKind::Plus => "+".to_string(),
            TokenKind::Minus => "-".to_string(),
            TokenKind::Star => "*".to_string(),
            TokenKind::Slash => "/".to_string(),
            TokenKind::Caret => "^".to_string(),
            TokenKind::Tick => "'".to_string(),
            TokenKind::Dollar => "$".to_string(),
        }
    }
}

/// One logical source line as an ordered token sequence.
pub type TokenLine = Vec<Token>;

#[derive(Debug, Clone)]
pub struct TokenizeError {
    pub message: String,
    pub span: Span,
}

impl fmt::Display for TokenizeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for TokenizeError {}

pub struct Tokenizer<'a> {
    line_num: u32,
    input: &'a [u8],
    cursor: usize,
}

impl<'a> Tokenizer<'a> {
    #[must_use]
    pub fn new(line: &'a str, line_num: u32) -> Self {
        Self {
            line_num,
            input: line.as_bytes(),
            cursor: 0,
        }
    }

    /// Scan the next token, or `None` at end of line / comment start.
    pub fn next_token(&mut self) -> Result<Option<Token>, TokenizeError> {
        self.skip_white();
        let start = self.cursor;
        let c = self.current_byte();
        match c {
            0 => Ok(None),
            b';' => {
                self.cursor = self.input.len();
                Ok(None)
            }
            _ if is_ident_start(c) => self.scan_identifier().map(Some),
            _ if c.is_ascii_digit() => self.scan_number().map(Some),
            b'.' => self.scan_directive().map(Some),
            b'$' => {
                if is_hex_digit(self.peek_byte(1)) || self.peek_byte(1) == b'_' {
                    self.scan_prefixed_number(16).map(Some)
                } else {
                    self.cursor += 1;
                    Ok(Some(self.token(TokenKind::Dollar, start)))
                }
            }
            b'%' => self.scan_prefixed_number(2).map(Some),
            _ => self.scan_punct(start, c).map(Some),
        }
    }

    fn scan_punct(&mut self, start: usize, c: u8) -> Result<Token, TokenizeError> {
        self.cursor += 1;
        let kind = match c {
            b',' => TokenKind::Comma,
            b':' => TokenKind::Colon,
            b'=' => TokenKind::Assign,
            b'(' => TokenKind::OpenParen,
            b')' => TokenKind::CloseParen,
            b'+' => TokenKind::Plus,
            b'-' => TokenKind::Minus,
            b'*' => TokenKind::Star,
            b'/' => TokenKind::Slash,
            b'^' => TokenKind::Caret,
            b'\'' => TokenKind::Tick,
            _ => {
                return Err(TokenizeError {
                    message: "Illegal character".to_string(),
                    span: Span::new(self.line_num, start, self.cursor),
                })
            }
        };
        Ok(self.token(kind, start))
    }

    fn scan_identifier(&mut self) -> Result<Token, TokenizeError> {
        let start = self.cursor;
        while is_ident_char(self.current_byte()) {
            self.cursor += 1;
        }
        let text = String::from_utf8_lossy(&self.input[start..self.cursor]).to_string();
        Ok(self.token(TokenKind::Identifier(text), start))
    }

    fn scan_directive(&mut self) -> Result<Token, TokenizeError> {
        let start = self.cursor;
        self.cursor += 1;
        if !is_ident_start(self.current_byte()) {
            return Err(TokenizeError {
                message: "Expected directive name after '.'".to_string(),
                span: Span::new(self.line_num, start, self.cursor),
            });
        }
        let name_start = self.cursor;
        while is_ident_char(self.current_byte()) {
            self.cursor += 1;
        }
        let name = String::from_utf8_lossy(&self.input[name_start..self.cursor]).to_string();
        Ok(self.token(TokenKind::Directive(name), start))
    }

    fn scan_number(&mut self) -> Result<Token, TokenizeError> {
        let start = self.cursor;
        while is_num_char(self.current_byte()) {
            self.cursor += 1;
        }
        let text = String::from_utf8_lossy(&self.input[start..self.cursor]).to_string();
        match parse_number_text(&text) {
            Some(val) => Ok(self.token(TokenKind::Integer(val), start)),
            None => Err(TokenizeError {
                message: "Illegal character in constant".to_string(),
                span: Span::new(self.line_num, start, self.cursor),
            }),
        }
    }

    fn scan_prefixed_number(&mut self, base: u32) -> Result<Token, TokenizeError> {
        let start = self.cursor;
        self.cursor += 1;
        let mut digits = String::new();
        loop {
            let c = self.current_byte();
            let ok = match base {
                2 => is_bin_digit(c) || c == b'_',
                16 => is_hex_digit(c) || c == b'_',
                _ => false,
            };
            if !ok {
                break;
            }
            if c != b'_' {
                digits.push(c as char);
            }
            self.cursor += 1;
        }
        if digits.is_empty() {
            return Err(TokenizeError {
                message: "Illegal character in constant".to_string(),
                span: Span::new(self.line_num, start, self.cursor),
            });
        }
        match i64::from_str_radix(&digits, base) {
            Ok(val) => Ok(self.token(TokenKind::Integer(val), start)),
            Err(_) => Err(TokenizeError {
                message: "Constant out of range".to_string(),
                span: Span::new(self.line_num, start, self.cursor),
            }),
        }
    }

    fn token(&self, kind: TokenKind, start: usize) -> Token {
        Token {
            kind,
            span: Span::new(self.line_num, start, self.cursor),
        }
    }

    fn skip_white(&mut self) {
        while is_space(self.current_byte()) {
            self.cursor += 1;
        }
    }

    fn current_byte(&self) -> u8 {
        self.input.get(self.cursor).copied().unwrap_or(0)
    }

    fn peek_byte(&self, offset: usize) -> u8 {
        self.input.get(self.cursor + offset).copied().unwrap_or(0)
    }
}

/// Tokenize a single source line.
pub fn tokenize_line(line: &str, line_num: u32) -> Result<TokenLine, TokenizeError> {
    let mut tok = Tokenizer::new(line, line_num);
    let mut tokens = Vec::new();
    while let Some(token) = tok.next_token()? {
        tokens.push(token);
    }
    Ok(tokens)
}

/// Tokenize a whole source text, one [`TokenLine`] per input line.
pub fn tokenize_source(source: &str) -> Result<Vec<TokenLine>, TokenizeError> {
    let mut lines = Vec::new();
    for (idx, line) in source.lines().enumerate() {
        lines.push(tokenize_line(line, idx as u32 + 1)?);
    }
    Ok(lines)
}

/// Parse a number literal body (decimal, hex, binary, octal).
///
/// Supported forms: `42`, `0x2A`, `2Ah`, `0b101010`, `101010b`, `0o52`,
/// `52o`, `52q`, `42d`, with `_` separators.
fn parse_number_text(text: &str) -> Option<i64> {
    let text: String = text.chars().filter(|&c| c != '_').collect();
    let text = text.as_str();
    if text.is_empty() {
        return None;
    }

    if let Some(hex) = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X")) {
        return i64::from_str_radix(hex, 16).ok();
    }
    if let Some(bin) = text.strip_prefix("0b").or_else(|| text.strip_prefix("0B")) {
        if bin.bytes().all(is_bin_digit) {
            return i64::from_str_radix(bin, 2).ok();
        }
    }
    if let Some(oct) = text.strip_prefix("0o").or_else(|| text.strip_prefix("0O")) {
        return i64::from_str_radix(oct, 8).ok();
    }

    let upper = text.to_ascii_uppercase();
    match upper.chars().last() {
        Some('H') => i64::from_str_radix(&upper[..upper.len() - 1], 16).ok(),
        Some('B') => {
            let inner = &upper[..upper.len() - 1];
            if inner.bytes().all(is_bin_digit) {
                i64::from_str_radix(inner, 2).ok()
            } else {
                // Something like 1CB; the B suffix only means binary when the
                // digits allow it, otherwise the whole text must be hex.
                i64::from_str_radix(inner, 16).ok()
            }
        }
        Some('O') | Some('Q') => i64::from_str_radix(&upper[..upper.len() - 1], 8).ok(),
        Some('D') => upper[..upper.len() - 1].parse::<i64>().ok(),
        _ => upper.parse::<i64>().ok(),
    }
}

fn is_space(c: u8) -> bool {
    c == b' ' || c == b'\t' || c == b'\r'
}

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

fn is_ident_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

fn is_num_char(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

fn is_bin_digit(c: u8) -> bool {
    c == b'0' || c == b'1'
}

fn is_hex_digit(c: u8) -> bool {
    c.is_ascii_hexdigit()
}

#[cfg(test)]
mod tests {
    use super::{tokenize_line, tokenize_source, TokenKind};

    fn kinds(line: &str) -> Vec<TokenKind> {
        tokenize_line(line, 1)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn tokenizes_instruction_line() {
        let kinds = kinds("loop: ld a, 5");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Identifier("loop".to_string()),
                TokenKind::Colon,
                TokenKind::Identifier("ld".to_string()),
                TokenKind::Identifier("a".to_string()),
                TokenKind::Comma,
                TokenKind::Integer(5),
            ]
        );
    }

    #[test]
    fn tokenizes_number_bases() {
        assert_eq!(kinds("42"), vec![TokenKind::Integer(42)]);
        assert_eq!(kinds("0x2A"), vec![TokenKind::Integer(42)]);
        assert_eq!(kinds("2Ah"), vec![TokenKind::Integer(42)]);
        assert_eq!(kinds("$2a"), vec![TokenKind::Integer(42)]);
        assert_eq!(kinds("0b101010"), vec![TokenKind::Integer(42)]);
        assert_eq!(kinds("%101010"), vec![TokenKind::Integer(42)]);
        assert_eq!(kinds("101010b"), vec![TokenKind::Integer(42)]);
        assert_eq!(kinds("0o52"), vec![TokenKind::Integer(42)]);
        assert_eq!(kinds("52q"), vec![TokenKind::Integer(42)]);
        assert_eq!(kinds("1_000"), vec![TokenKind::Integer(1000)]);
    }

    #[test]
    fn dollar_alone_is_program_counter() {
        assert_eq!(kinds("$"), vec![TokenKind::Dollar]);
        assert_eq!(
            kinds("$ + 2"),
            vec![TokenKind::Dollar, TokenKind::Plus, TokenKind::Integer(2)]
        );
    }

    #[test]
    fn tokenizes_directive() {
        assert_eq!(
            kinds(".org 100h"),
            vec![
                TokenKind::Directive("org".to_string()),
                TokenKind::Integer(0x100),
            ]
        );
    }

    #[test]
    fn tokenizes_af_tick() {
        assert_eq!(
            kinds("af'"),
            vec![TokenKind::Identifier("af".to_string()), TokenKind::Tick]
        );
    }

    #[test]
    fn comment_ends_line() {
        assert_eq!(kinds("nop ; does nothing"), kinds("nop"));
        assert!(kinds("; whole line").is_empty());
    }

    #[test]
    fn tokenizes_operators() {
        assert_eq!(
            kinds("(1+2)*3/4-5^6"),
            vec![
                TokenKind::OpenParen,
                TokenKind::Integer(1),
                TokenKind::Plus,
                TokenKind::Integer(2),
                TokenKind::CloseParen,
                TokenKind::Star,
                TokenKind::Integer(3),
                TokenKind::Slash,
                TokenKind::Integer(4),
                TokenKind::Minus,
                TokenKind::Integer(5),
                TokenKind::Caret,
                TokenKind::Integer(6),
            ]
        );
    }

    #[test]
    fn rejects_bad_constant() {
        assert!(tokenize_line("12xy", 1).is_err());
        assert!(tokenize_line("%", 1).is_err());
    }

    #[test]
    fn rejects_illegal_character() {
        assert!(tokenize_line("ld a, @", 1).is_err());
    }

    #[test]
    fn tokenize_source_numbers_lines() {
        let lines = tokenize_source("nop\n\nhalt").unwrap();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].is_empty());
        assert_eq!(lines[2][0].span.line, 3);
    }
}
