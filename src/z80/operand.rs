// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Operand classification and encoding.
//!
//! [`param_types`] looks only at an operand's surface form and returns every
//! category it could be; the resolver picks the row. [`param_val`] then
//! converts the operand into the encoded value for the chosen category,
//! evaluating expressions against the symbol context.

use std::fmt;

use crate::core::expr::{parse_expression, EvalContext, EvalError};
use crate::core::tokenizer::{holds_int_value, Span, Token, TokenKind};

use super::table::{
    is_register_name, param_val_names, valid_number_param, ParamType, ParamVal,
    NUMBER_PARAM_TYPES, PARAM_VAL_TABLE, PARAM_VAL_TABLE_D,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperandErrorKind {
    /// The operand's token shape does not fit the chosen category.
    Shape,
    /// The value is outside the category's encodable range.
    Range,
    /// Expression evaluation failed.
    Eval,
}

#[derive(Debug, Clone)]
pub struct OperandError {
    pub kind: OperandErrorKind,
    pub message: String,
    pub span: Option<Span>,
}

impl OperandError {
    fn shape(message: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            kind: OperandErrorKind::Shape,
            message: message.into(),
            span,
        }
    }

    fn range(message: impl Into<String>, span: Option<Span>) -> Self {
        Self {
            kind: OperandErrorKind::Range,
            message: message.into(),
            span,
        }
    }
}

impl From<EvalError> for OperandError {
    fn from(err: EvalError) -> Self {
        Self {
            kind: OperandErrorKind::Eval,
            message: err.message,
            span: err.span,
        }
    }
}

impl fmt::Display for OperandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for OperandError {}

/// Every category this operand could be, from surface form alone.
/// An unrecognizable shape yields the empty set, which no table row matches.
#[must_use]
pub fn param_types(tokens: &[Token]) -> Vec<ParamType> {
    let mut result = Vec::new();
    if tokens.is_empty() {
        result.push(ParamType::None);
        return result;
    }

    let front_paren = tokens[0].kind == TokenKind::OpenParen;
    let back_paren = tokens[tokens.len() - 1].kind == TokenKind::CloseParen;

    // registers or conditions
    if tokens.len() == 1 {
        if let TokenKind::Identifier(name) = &tokens[0].kind {
            for (ty, names) in PARAM_VAL_TABLE {
                if names.iter().any(|n| n.eq_ignore_ascii_case(name)) {
                    result.push(*ty);
                }
            }
        }
    }
    // AF'
    else if tokens.len() == 2 {
        if let TokenKind::Identifier(name) = &tokens[0].kind {
            if name.eq_ignore_ascii_case("af") && tokens[1].kind == TokenKind::Tick {
                result.push(ParamType::AfAlt);
            }
        }
    }
    // indirection
    else if front_paren && back_paren {
        if let TokenKind::Identifier(name) = &tokens[1].kind {
            // (hl), (bc), (c), ...
            if tokens.len() == 3 {
                for (ty, names) in PARAM_VAL_TABLE_D {
                    if names[0].eq_ignore_ascii_case(name) {
                        result.push(*ty);
                    }
                }
            }
            // (ix), (ix+5), (iy-100), ...
            if name.eq_ignore_ascii_case("ix") {
                result.push(ParamType::IxDisp);
            }
            if name.eq_ignore_ascii_case("iy") {
                result.push(ParamType::IyDisp);
            }
        } else if holds_int_value(&tokens[1].kind) {
            // (0), ($8002), ...
            result.push(ParamType::ByteInd);
            result.push(ParamType::WordInd);
        }
    }

    // numbers, labels, variables
    let leading_register = matches!(&tokens[0].kind,
        TokenKind::Identifier(name) if is_register_name(name));
    if holds_int_value(&tokens[0].kind) && !(front_paren || back_paren) && !leading_register {
        result.extend_from_slice(NUMBER_PARAM_TYPES);
    }

    result
}

/// Encode the operand for the category chosen by the resolver.
pub fn param_val(
    ctx: &dyn EvalContext,
    pt: ParamType,
    tokens: &[Token],
) -> Result<ParamVal, OperandError> {
    match pt {
        // index register with displacement
        ParamType::IxDisp | ParamType::IyDisp => {
            if tokens.len() == 3 {
                return Ok(0);
            }
            let sign = match tokens.get(2).map(|t| &t.kind) {
                Some(TokenKind::Plus) => 1,
                Some(TokenKind::Minus) => -1,
                _ => {
                    return Err(OperandError::shape(
                        "Expected + or - after index register",
                        tokens.get(2).map(|t| t.span),
                    ))
                }
            };
            let inner = &tokens[3..tokens.len() - 1];
            let disp = sign * parse_expression(ctx, inner)?;
            if !(-128..=127).contains(&disp) {
                return Err(OperandError::range(
                    format!("Index displacement out of range: {disp}"),
                    Some(tokens[0].span),
                ));
            }
            Ok(disp)
        }
        // number parameters
        ParamType::Imm8
        | ParamType::Imm16
        | ParamType::Disp
        | ParamType::BitIndex
        | ParamType::ByteInd
        | ParamType::WordInd
        | ParamType::IntMode
        | ParamType::RstVec => {
            let val = parse_expression(ctx, tokens)?;
            if !valid_number_param(pt, val) {
                return Err(OperandError::range(
                    format!("Value out of range: {val}"),
                    tokens.first().map(|t| t.span),
                ));
            }
            Ok(val)
        }
        // short jump: absolute target, relative encoding
        ParamType::Rel => {
            let target = parse_expression(ctx, tokens)?;
            let offset = target - ctx.current_address();
            if !valid_number_param(pt, offset) {
                return Err(OperandError::range(
                    format!("Relative jump out of range: {offset}"),
                    tokens.first().map(|t| t.span),
                ));
            }
            Ok(offset)
        }
        // group categories: the index in the name list is the value
        _ => {
            if let Some(names) = param_val_names(pt) {
                if let Some(TokenKind::Identifier(name)) = tokens.first().map(|t| &t.kind) {
                    if let Some(ix) = names.iter().position(|n| n.eq_ignore_ascii_case(name)) {
                        return Ok(ix as ParamVal);
                    }
                }
            }
            Ok(0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{param_types, param_val, OperandErrorKind};
    use crate::core::context::Context;
    use crate::core::tokenizer::tokenize_line;
    use crate::z80::table::ParamType as P;

    fn types(src: &str) -> Vec<P> {
        param_types(&tokenize_line(src, 1).unwrap())
    }

    fn val(pt: P, src: &str) -> Result<i64, super::OperandError> {
        let ctx = Context::new();
        param_val(&ctx, pt, &tokenize_line(src, 1).unwrap())
    }

    #[test]
    fn classifies_registers_and_conditions() {
        let t = types("a");
        assert!(t.contains(&P::Reg8));
        assert!(t.contains(&P::A));
        assert!(!t.contains(&P::Imm8));

        let t = types("c");
        assert!(t.contains(&P::Reg8));
        assert!(t.contains(&P::Cond));
        assert!(t.contains(&P::CondRel));

        let t = types("sp");
        assert!(t.contains(&P::Pair));
        assert!(t.contains(&P::SP));
    }

    #[test]
    fn classifies_numbers_and_symbols() {
        let t = types("128");
        assert!(t.contains(&P::Imm8));
        assert!(t.contains(&P::Imm16));
        assert!(t.contains(&P::Rel));
        assert!(!t.contains(&P::Reg8));

        let t = types("label + 2");
        assert!(t.contains(&P::Imm16));

        let t = types("$");
        assert!(t.contains(&P::Imm16));
    }

    #[test]
    fn classifies_indirections() {
        assert_eq!(types("(hl)"), vec![P::HlInd]);
        assert_eq!(types("(c)"), vec![P::CInd]);
        assert_eq!(types("(ix)"), vec![P::IxDisp]);
        assert_eq!(types("(ix + 5)"), vec![P::IxDisp]);
        assert_eq!(types("(iy - 1)"), vec![P::IyDisp]);
        assert_eq!(types("(100)"), vec![P::ByteInd, P::WordInd]);
        assert_eq!(types("($8002)"), vec![P::ByteInd, P::WordInd]);
    }

    #[test]
    fn classifies_alternate_af() {
        assert_eq!(types("af'"), vec![P::AfAlt]);
        let t = types("af");
        assert!(t.contains(&P::AF));
        assert!(t.contains(&P::PairAf));
    }

    #[test]
    fn empty_operand_is_none() {
        assert_eq!(types(""), vec![P::None]);
    }

    #[test]
    fn unrecognizable_shapes_classify_to_nothing() {
        assert!(types("(2 + 3) * 4").is_empty());
        assert!(types("- 1").is_empty());
    }

    #[test]
    fn encodes_group_positions() {
        assert_eq!(val(P::Reg8, "c").unwrap(), 1);
        assert_eq!(val(P::Reg8, "a").unwrap(), 7);
        assert_eq!(val(P::Cond, "c").unwrap(), 3);
        assert_eq!(val(P::Cond, "pe").unwrap(), 5);
        assert_eq!(val(P::Pair, "sp").unwrap(), 3);
        assert_eq!(val(P::PairAf, "af").unwrap(), 3);
    }

    #[test]
    fn encodes_index_displacements() {
        assert_eq!(val(P::IxDisp, "(ix)").unwrap(), 0);
        assert_eq!(val(P::IxDisp, "(ix + 5)").unwrap(), 5);
        assert_eq!(val(P::IxDisp, "(ix - 1)").unwrap(), -1);
        assert_eq!(val(P::IyDisp, "(iy + 2 * 3)").unwrap(), 6);

        let err = val(P::IxDisp, "(ix + 200)").unwrap_err();
        assert_eq!(err.kind, OperandErrorKind::Range);
    }

    #[test]
    fn encodes_numbers_with_range_checks() {
        assert_eq!(val(P::Imm8, "255").unwrap(), 255);
        assert_eq!(val(P::Imm16, "$beef").unwrap(), 0xBEEF);
        assert_eq!(val(P::WordInd, "($8002)").unwrap(), 0x8002);

        let err = val(P::Imm8, "$1ff").unwrap_err();
        assert_eq!(err.kind, OperandErrorKind::Range);
        let err = val(P::BitIndex, "8").unwrap_err();
        assert_eq!(err.kind, OperandErrorKind::Range);
        let err = val(P::RstVec, "$12").unwrap_err();
        assert_eq!(err.kind, OperandErrorKind::Range);
    }

    #[test]
    fn encodes_relative_offsets_against_pc() {
        let mut ctx = Context::new();
        ctx.prog_counter = 2;
        let tokens = tokenize_line("0", 1).unwrap();
        assert_eq!(param_val(&ctx, P::Rel, &tokens).unwrap(), -2);

        ctx.prog_counter = 0x1000;
        let tokens = tokenize_line("$2000", 1).unwrap();
        let err = param_val(&ctx, P::Rel, &tokens).unwrap_err();
        assert_eq!(err.kind, OperandErrorKind::Range);
    }

    #[test]
    fn undeclared_symbol_surfaces_as_eval_error() {
        let err = val(P::Imm16, "missing").unwrap_err();
        assert_eq!(err.kind, OperandErrorKind::Eval);
    }
}
