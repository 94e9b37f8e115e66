//! The Imp language front end.
//!
//! Imp is a small imperative language with `int`/`bool`/`void` primitives,
//! first-class function types (`fn (int, bool) -> int`), mandatory-braced
//! control flow, and C-style declarations. This module supplies its token
//! kinds, its abstract syntax tree, and the grammar with the semantic
//! actions that build that tree, wired for both the shift-reduce parser and
//! the span recognizer.
//!
//! `void` is only legal as a function return type and as the sole parameter
//! type of a function type; `void a;` is a syntax error, not a later type
//! error, because variable declarations go through a void-free type rule.

mod ast;
mod grammar;
mod token;

pub use ast::{Ast, BinaryOp, PostOp, UnaryOp};
pub use grammar::{imp_grammar, Rule};
pub use token::{Token, TokenKind};
