//! Error types for grammar construction and parsing.
//!
//! Two kinds of failure exist in the engine:
//!
//! - [`GrammarConfigError`]: programmer-facing and fatal. Raised while a
//!   grammar is validated, transformed, or compiled into parse tables.
//!   Parsing cannot proceed until the grammar is fixed.
//! - [`SyntaxError`]: user-facing. Raised by the shift-reduce parser when no
//!   table action exists for the current state and lookahead. Carries the
//!   offending terminal, its position, and the set of terminals that would
//!   have been accepted.
//!
//! The span recognizer never errors; it is strictly a boolean oracle.

use std::fmt;

use thiserror::Error;

use crate::grammar::{Position, Terminal};

/// Fatal grammar configuration error, raised at build time.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarConfigError {
    /// A right-hand side references a nonterminal with no alternatives.
    #[error("rule `{rule}` references undefined nonterminal `{referenced}`")]
    UndefinedNonTerminal {
        rule: &'static str,
        referenced: &'static str,
    },

    /// A terminal or nonterminal name contains `__`, which is reserved for
    /// the synthetic rules minted during normalization. Allowing it would
    /// let two distinct symbol pairs collide on one synthetic name.
    #[error("symbol name `{symbol}` contains the reserved `__` sequence")]
    ReservedName { symbol: &'static str },

    /// Two distinct actions claim the same (state, terminal) table slot.
    ///
    /// This means the grammar is not SLR(1); the conflict is reported here
    /// rather than silently resolved or deferred to parse time.
    #[error("parse table conflict in state {state} on `{terminal}`: {existing} vs {conflicting}")]
    TableConflict {
        state: usize,
        terminal: String,
        existing: String,
        conflicting: String,
    },

    /// Unit-production elimination failed to converge within its iteration
    /// cap, which indicates a cyclic unit chain in the grammar.
    #[error(
        "unit-production elimination did not converge after {iterations} passes \
         (cyclic unit chain through `{nonterminal}`)"
    )]
    UnitCycle {
        nonterminal: String,
        iterations: usize,
    },
}

/// Syntax error produced by the shift-reduce parser.
///
/// `got` is `None` when the parser ran out of input; `end_expected` records
/// whether end-of-input would have been a valid continuation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError<K: Terminal> {
    /// The terminal that had no valid action, or `None` at end of input.
    pub got: Option<K>,
    /// Source position of the offending token, when known.
    pub position: Option<Position>,
    /// Terminals with a valid action in the failing state, sorted by name.
    pub expected: Vec<K>,
    /// Whether end-of-input had a valid action in the failing state.
    pub end_expected: bool,
}

impl<K: Terminal> fmt::Display for SyntaxError<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.got {
            Some(kind) => write!(f, "unexpected {}", kind.name())?,
            None => write!(f, "unexpected end of input")?,
        }
        if let Some(position) = self.position {
            write!(f, " at {position}")?;
        }
        let mut names: Vec<&str> = self.expected.iter().map(|k| k.name()).collect();
        if self.end_expected {
            names.push("<end of input>");
        }
        if !names.is_empty() {
            write!(f, "; expected one of {}", names.join(", "))?;
        }
        Ok(())
    }
}

impl<K: Terminal> std::error::Error for SyntaxError<K> {}
