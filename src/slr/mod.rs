//! SLR(1) shift-reduce parsing.
//!
//! The pipeline is: lower the grammar's alternatives into numbered
//! [`Production`]s with an augmented start, build the LR(0) item-set
//! [`Automaton`] by closure and goto, derive the action and goto
//! [`ParseTables`] gated by FOLLOW sets, and drive the [`SlrParser`] stack
//! machine over a token stream. Table conflicts are detected while the
//! tables are built, so an ambiguous grammar is rejected before any input is
//! parsed.

mod automaton;
mod parser;
mod table;

pub use automaton::{Automaton, LrItem, LrState, Production};
pub use parser::SlrParser;
pub use table::{Action, ActionKey, ParseTables};
