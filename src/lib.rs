//! A compiler front end toolkit built around one declarative grammar.
//!
//! A [`grammar::Grammar`] pairs context-free rules with semantic actions and
//! feeds two independent engines:
//!
//! - [`slr::SlrParser`]: an SLR(1) shift-reduce parser that synthesizes a
//!   value (for the bundled Imp language, an [`lang::Ast`]) and reports
//!   syntax errors with the set of acceptable terminals,
//! - [`cyk::SpanRecognizer`]: a CYK membership oracle over token-kind
//!   sequences, running on a normalized copy of the same grammar.
//!
//! Both engines reject bad grammars at construction time with a
//! [`GrammarConfigError`]; a built parser is immutable and freely shareable
//! across threads, while the recognizer keeps a per-instance memo.
//!
//! ```
//! use grackle::cyk::SpanRecognizer;
//! use grackle::grammar::Position;
//! use grackle::lang::{imp_grammar, Ast, Token, TokenKind};
//! use grackle::slr::SlrParser;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let grammar = imp_grammar();
//! let tokens = [
//!     Token::new(TokenKind::Int, "int", Position::new(1, 1)),
//!     Token::new(TokenKind::Id, "a", Position::new(1, 5)),
//!     Token::new(TokenKind::Semicolon, ";", Position::new(1, 6)),
//! ];
//!
//! let parser = SlrParser::new(&grammar)?;
//! let ast = parser.parse(&tokens)?;
//! assert!(matches!(ast, Ast::Program(_)));
//!
//! let mut recognizer = SpanRecognizer::new(&grammar)?;
//! assert!(recognizer.recognize(&tokens));
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod cyk;
pub mod error;
pub mod grammar;
pub mod lang;
pub mod slr;

pub use error::{GrammarConfigError, SyntaxError};
pub use grammar::{Grammar, GrammarBuilder, NamedChildren, NonTerminal, Position, Symbol, Terminal};
