// SPDX-License-Identifier: GPL-3.0-or-later
// Copyright (C) 2026 Erik van der Tier

//! Zilog Z80 target support.
//!
//! - [`table`] - Instruction table, operand categories, and encodings
//! - [`operand`] - Operand classification and value encoding

pub mod operand;
pub mod table;

pub use operand::{param_types, param_val, OperandError, OperandErrorKind};
pub use table::{
    is_mnemonic, is_register_name, resolve, valid_number_param, OpCode, ParamType, ParamVal,
};
