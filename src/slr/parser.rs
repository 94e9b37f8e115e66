//! The shift-reduce stack machine.

use super::automaton::{Automaton, Production};
use super::table::{Action, ActionKey, ParseTables};
use crate::error::{GrammarConfigError, SyntaxError};
use crate::grammar::{Grammar, NamedChildren, NonTerminal, Position, Symbol, Terminal, Token};

struct StackEntry<K, N, V> {
    state: usize,
    symbol: Option<Symbol<K, N>>,
    value: Option<V>,
}

/// An SLR(1) parser with its tables baked at construction.
///
/// Construction fails on a non-SLR(1) grammar; a successfully built parser
/// is immutable and can run any number of parses, including concurrently.
pub struct SlrParser<K, N, V> {
    productions: Vec<Production<K, N, V>>,
    tables: ParseTables<K, N>,
}

impl<K: Terminal, N: NonTerminal, V> SlrParser<K, N, V> {
    /// Build the automaton and tables for `grammar`.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarConfigError::TableConflict`] when the grammar is not
    /// SLR(1).
    pub fn new(grammar: &Grammar<K, N, V>) -> Result<Self, GrammarConfigError> {
        let automaton = Automaton::build(grammar);
        let tables = ParseTables::build(&automaton, grammar)?;
        Ok(Self {
            productions: automaton.into_productions(),
            tables,
        })
    }

    /// Parse `tokens` to the synthesized value of the start rule.
    ///
    /// Shifted tokens enter the value stack through `V::from`; a reduce with
    /// no semantic action passes a lone child through unchanged and
    /// synthesizes `V::default()` otherwise.
    ///
    /// # Errors
    ///
    /// Returns a [`SyntaxError`] carrying the offending token (or end of
    /// input), its position, and the terminals acceptable in the state the
    /// parser was in.
    pub fn parse<T>(&self, tokens: &[T]) -> Result<V, SyntaxError<K>>
    where
        T: Token<Kind = K>,
        V: From<T> + Default,
    {
        let mut stack: Vec<StackEntry<K, N, V>> = vec![StackEntry {
            state: 0,
            symbol: None,
            value: None,
        }];
        let mut cursor = 0usize;
        loop {
            let state = match stack.last() {
                Some(top) => top.state,
                None => return Err(self.unexpected(tokens, cursor, 0)),
            };
            let lookahead = tokens.get(cursor);
            let key = lookahead.map_or(ActionKey::End, |token| ActionKey::Terminal(token.kind()));
            let Some(action) = self.tables.action(state, key) else {
                return Err(self.unexpected(tokens, cursor, state));
            };
            match action {
                Action::Shift(target) => {
                    // The key was Terminal, so the lookahead exists.
                    let Some(token) = lookahead else {
                        return Err(self.unexpected(tokens, cursor, state));
                    };
                    stack.push(StackEntry {
                        state: target,
                        symbol: Some(Symbol::Terminal(token.kind())),
                        value: Some(V::from(token.clone())),
                    });
                    cursor += 1;
                }
                Action::Reduce(production) => {
                    let production = &self.productions[production];
                    let arity = production.rhs().len();
                    if stack.len() <= arity {
                        return Err(self.unexpected(tokens, cursor, state));
                    }
                    let popped = stack.split_off(stack.len() - arity);
                    let value = Self::synthesize(production, popped);
                    let Some(lhs) = production.lhs() else {
                        return Err(self.unexpected(tokens, cursor, state));
                    };
                    let below = match stack.last() {
                        Some(top) => top.state,
                        None => return Err(self.unexpected(tokens, cursor, state)),
                    };
                    let Some(target) = self.tables.goto(below, lhs) else {
                        return Err(self.unexpected(tokens, cursor, below));
                    };
                    stack.push(StackEntry {
                        state: target,
                        symbol: Some(Symbol::NonTerminal(lhs)),
                        value: Some(value),
                    });
                }
                Action::Accept => {
                    // The accept state holds exactly the start value above
                    // the bottom entry.
                    return match stack.pop().and_then(|entry| entry.value) {
                        Some(value) => Ok(value),
                        None => Err(self.unexpected(tokens, cursor, state)),
                    };
                }
            }
        }
    }

    fn synthesize(production: &Production<K, N, V>, popped: Vec<StackEntry<K, N, V>>) -> V
    where
        V: Default,
    {
        match production.action() {
            Some(action) => {
                let mut children = NamedChildren::new();
                for entry in popped {
                    if let (Some(symbol), Some(value)) = (entry.symbol, entry.value) {
                        children.insert(symbol.name(), value);
                    }
                }
                action(&mut children)
            }
            None => {
                // Action-less unit alternatives forward their child; anything
                // else synthesizes the default value.
                let mut values = popped.into_iter().filter_map(|entry| entry.value);
                match (values.next(), values.next()) {
                    (Some(only), None) => only,
                    _ => V::default(),
                }
            }
        }
    }

    fn unexpected<T>(&self, tokens: &[T], cursor: usize, state: usize) -> SyntaxError<K>
    where
        T: Token<Kind = K>,
    {
        let (expected, end_expected) = self.tables.expected_terminals(state);
        let got = tokens.get(cursor);
        SyntaxError {
            got: got.map(Token::kind),
            position: got.map(Token::position).or_else(|| {
                tokens.last().map(|token| {
                    let Position { line, column } = token.position();
                    Position::new(line, column + 1)
                })
            }),
            expected,
            end_expected,
        }
    }
}
