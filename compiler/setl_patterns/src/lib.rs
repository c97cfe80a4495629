#![allow(
    clippy::result_large_err,
    reason = "EvalError is fundamental; boxing it would add indirection across every crate"
)]
//! Runtime side of the SetlX evaluator that does not execute code.
//!
//! This crate provides:
//! - the value model ([`Value`], [`Rational`], copy-on-write collections)
//! - evaluation errors and control signals ([`EvalError`], [`ControlAction`])
//! - variable frames ([`Scope`], [`LocalScope`])
//! - the matrix collaborator ([`LinearAlgebra`], [`DenseBackend`])
//! - terms: conversion of values and code to terms and back
//!   ([`TermConverter`]), and structural matching ([`match_term`])

pub mod errors;
pub mod matrix;
pub mod scope;
pub mod term;
mod value;

pub use errors::{ControlAction, EvalError, EvalErrorKind, EvalResult, ExecResult, ValueResult};
pub use matrix::{DenseBackend, LinearAlgebra, Matrix};
pub use scope::{FrameKind, LocalScope, Scope};
pub use term::{
    block_to_term, expr_to_term, expr_to_term_with, match_split_list, match_term,
    procedure_to_term, stmt_to_term, term_to_value, value_to_term, variable_term, MatchResult,
    TermConverter, TermHook,
};
pub use value::{Members, ObjectValue, ProcedureValue, Rational, SetlString, TermValue, Value};
