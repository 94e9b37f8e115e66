//! Grammar definition for the parsing engine.
//!
//! A [`Grammar`] is a static, declarative description of a context-free
//! language: a mapping from nonterminal to its ordered [`Alternative`]s plus a
//! designated start nonterminal. Each alternative may carry a
//! [`SemanticAction`] that synthesizes a value from the values of its named
//! children during a reduce.
//!
//! Grammars are generic over three types:
//!
//! - `K`: the [`Terminal`] kind type (token-type tags emitted by the lexer),
//! - `N`: the [`NonTerminal`] type (syntactic categories),
//! - `V`: the synthesized value type produced by semantic actions.
//!
//! Once built, a grammar is immutable and may be shared read-only across any
//! number of parses and recognitions.

pub mod analysis;
pub mod normal;

use std::fmt;
use std::sync::Arc;

use compact_str::{format_compact, CompactString};
use hashbrown::HashMap;

use crate::error::GrammarConfigError;

/// Trait for terminal kind types (token-type tags).
pub trait Terminal: Copy + fmt::Debug + Eq + std::hash::Hash + Send + Sync + 'static {
    /// The identifier of this terminal, as referenced in grammars and
    /// inverse-index keys.
    fn name(self) -> &'static str;
}

/// Trait for nonterminal types.
pub trait NonTerminal: Copy + fmt::Debug + Eq + std::hash::Hash + Send + Sync + 'static {
    /// The identifier of this nonterminal.
    fn name(self) -> &'static str;
}

/// Trait for tokens consumed by the shift-reduce parser.
pub trait Token: Clone + fmt::Debug + Send + Sync + 'static {
    /// The terminal kind type for this token.
    type Kind: Terminal;

    /// The terminal kind of this token.
    fn kind(&self) -> Self::Kind;

    /// Source position of this token, for error reporting.
    fn position(&self) -> Position;
}

/// Line/column source position (1-based).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A grammar symbol: a terminal kind or a nonterminal.
///
/// Equality is structural.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Symbol<K, N> {
    Terminal(K),
    NonTerminal(N),
}

impl<K: Terminal, N: NonTerminal> Symbol<K, N> {
    /// The identifier of the underlying terminal or nonterminal.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Terminal(kind) => kind.name(),
            Self::NonTerminal(nt) => nt.name(),
        }
    }
}

/// Synthesized values of the children popped during a reduce, keyed by
/// symbol name.
///
/// When a right-hand side repeats a symbol name, later occurrences get
/// numbered suffixes: the second `stmtList` is stored as `stmtList2`, the
/// third as `stmtList3`, and so on. Plain last-wins shadowing would make
/// alternatives such as if/else (two statement lists) impossible to act on.
pub struct NamedChildren<V> {
    entries: HashMap<CompactString, V, ahash::RandomState>,
}

impl<V> NamedChildren<V> {
    pub(crate) fn new() -> Self {
        Self {
            entries: HashMap::default(),
        }
    }

    pub(crate) fn insert(&mut self, name: &str, value: V) {
        if !self.entries.contains_key(name) {
            self.entries.insert(CompactString::from(name), value);
            return;
        }
        let mut suffix = 2usize;
        loop {
            let candidate = format_compact!("{name}{suffix}");
            if !self.entries.contains_key(candidate.as_str()) {
                self.entries.insert(candidate, value);
                return;
            }
            suffix += 1;
        }
    }

    /// Remove and return the value synthesized for `name`, if present.
    pub fn take(&mut self, name: &str) -> Option<V> {
        self.entries.remove(name)
    }

    /// Like [`take`](Self::take), falling back to `V::default()`.
    pub fn take_or_default(&mut self, name: &str) -> V
    where
        V: Default,
    {
        self.entries.remove(name).unwrap_or_default()
    }

    /// Number of child values not yet taken.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no child values remain.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Semantic action attached to an alternative: maps the named children of a
/// reduce to the synthesized value for the left-hand side.
pub type SemanticAction<V> = Arc<dyn Fn(&mut NamedChildren<V>) -> V + Send + Sync>;

/// One right-hand-side choice for a nonterminal.
///
/// An empty symbol sequence is an epsilon alternative: the nonterminal may
/// match nothing.
pub struct Alternative<K, N, V> {
    symbols: Vec<Symbol<K, N>>,
    action: Option<SemanticAction<V>>,
}

impl<K, N, V> Alternative<K, N, V> {
    /// The ordered right-hand-side symbols.
    #[must_use]
    pub fn symbols(&self) -> &[Symbol<K, N>] {
        &self.symbols
    }

    /// The semantic action, if any.
    #[must_use]
    pub fn action(&self) -> Option<&SemanticAction<V>> {
        self.action.as_ref()
    }

    /// Whether this is an epsilon (empty right-hand side) alternative.
    #[must_use]
    pub fn is_epsilon(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl<K: Clone, N: Clone, V> Clone for Alternative<K, N, V> {
    fn clone(&self) -> Self {
        Self {
            symbols: self.symbols.clone(),
            action: self.action.clone(),
        }
    }
}

// Structural equality over symbols; semantic actions are not compared.
impl<K: PartialEq, N: PartialEq, V> PartialEq for Alternative<K, N, V> {
    fn eq(&self, other: &Self) -> bool {
        self.symbols == other.symbols
    }
}

impl<K: Eq, N: Eq, V> Eq for Alternative<K, N, V> {}

impl<K: Terminal, N: NonTerminal, V> fmt::Debug for Alternative<K, N, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.symbols.iter().map(|s| s.name()).collect();
        f.debug_struct("Alternative")
            .field("symbols", &names)
            .field("has_action", &self.action.is_some())
            .finish()
    }
}

/// An immutable context-free grammar with semantic actions.
pub struct Grammar<K, N, V> {
    rules: HashMap<N, Vec<Alternative<K, N, V>>, ahash::RandomState>,
    /// Nonterminals in definition order, for deterministic derived structures.
    order: Vec<N>,
    start: N,
}

impl<K: Terminal, N: NonTerminal, V> Grammar<K, N, V> {
    /// The designated start nonterminal.
    #[must_use]
    pub fn start(&self) -> N {
        self.start
    }

    /// The ordered alternatives of `nonterminal` (empty if undefined).
    #[must_use]
    pub fn alternatives(&self, nonterminal: N) -> &[Alternative<K, N, V>] {
        self.rules.get(&nonterminal).map_or(&[], Vec::as_slice)
    }

    /// Iterate rules in definition order.
    pub fn rules(&self) -> impl Iterator<Item = (N, &[Alternative<K, N, V>])> {
        self.order.iter().map(|nt| (*nt, self.alternatives(*nt)))
    }

    /// Number of defined nonterminals.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.order.len()
    }
}

/// Builder for [`Grammar`], validating symbol references on `build`.
pub struct GrammarBuilder<K, N, V> {
    rules: HashMap<N, Vec<Alternative<K, N, V>>, ahash::RandomState>,
    order: Vec<N>,
    start: N,
}

impl<K: Terminal, N: NonTerminal, V> GrammarBuilder<K, N, V> {
    /// Create a builder with the given start nonterminal.
    #[must_use]
    pub fn new(start: N) -> Self {
        Self {
            rules: HashMap::default(),
            order: Vec::new(),
            start,
        }
    }

    /// Add an alternative without a semantic action.
    #[must_use]
    pub fn rule(self, lhs: N, symbols: Vec<Symbol<K, N>>) -> Self {
        self.push(lhs, symbols, None)
    }

    /// Add an alternative with a semantic action.
    #[must_use]
    pub fn rule_with(
        self,
        lhs: N,
        symbols: Vec<Symbol<K, N>>,
        action: impl Fn(&mut NamedChildren<V>) -> V + Send + Sync + 'static,
    ) -> Self {
        self.push(lhs, symbols, Some(Arc::new(action)))
    }

    fn push(
        mut self,
        lhs: N,
        symbols: Vec<Symbol<K, N>>,
        action: Option<SemanticAction<V>>,
    ) -> Self {
        if !self.rules.contains_key(&lhs) {
            self.order.push(lhs);
        }
        self.rules
            .entry(lhs)
            .or_default()
            .push(Alternative { symbols, action });
        self
    }

    /// Finish building, validating that the start nonterminal is defined,
    /// every referenced nonterminal has at least one alternative, and no
    /// symbol name contains the `__` sequence reserved for synthetic
    /// normal-form rules.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarConfigError::UndefinedNonTerminal`] on a dangling
    /// reference and [`GrammarConfigError::ReservedName`] on a `__` name.
    pub fn build(self) -> Result<Grammar<K, N, V>, GrammarConfigError> {
        if !self.rules.contains_key(&self.start) {
            return Err(GrammarConfigError::UndefinedNonTerminal {
                rule: self.start.name(),
                referenced: self.start.name(),
            });
        }
        for nt in &self.order {
            if nt.name().contains("__") {
                return Err(GrammarConfigError::ReservedName { symbol: nt.name() });
            }
            for alternative in &self.rules[nt] {
                for symbol in alternative.symbols() {
                    if symbol.name().contains("__") {
                        return Err(GrammarConfigError::ReservedName {
                            symbol: symbol.name(),
                        });
                    }
                    if let Symbol::NonTerminal(referenced) = symbol {
                        if !self.rules.contains_key(referenced) {
                            return Err(GrammarConfigError::UndefinedNonTerminal {
                                rule: nt.name(),
                                referenced: referenced.name(),
                            });
                        }
                    }
                }
            }
        }
        Ok(Grammar {
            rules: self.rules,
            order: self.order,
            start: self.start,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lang::{Rule, TokenKind};

    fn t(kind: TokenKind) -> Symbol<TokenKind, Rule> {
        Symbol::Terminal(kind)
    }

    fn n(rule: Rule) -> Symbol<TokenKind, Rule> {
        Symbol::NonTerminal(rule)
    }

    #[test]
    fn builder_rejects_undefined_nonterminal() {
        let result: Result<Grammar<TokenKind, Rule, ()>, _> = GrammarBuilder::new(Rule::Program)
            .rule(Rule::Program, vec![n(Rule::Globals)])
            .build();
        assert_eq!(
            result.err(),
            Some(GrammarConfigError::UndefinedNonTerminal {
                rule: "program",
                referenced: "globals",
            })
        );
    }

    #[test]
    fn builder_rejects_undefined_start() {
        let result: Result<Grammar<TokenKind, Rule, ()>, _> = GrammarBuilder::new(Rule::Program)
            .rule(Rule::Globals, vec![t(TokenKind::Semicolon)])
            .build();
        assert!(matches!(
            result,
            Err(GrammarConfigError::UndefinedNonTerminal { .. })
        ));
    }

    #[test]
    fn builder_rejects_names_with_double_underscore() {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        enum BadRule {
            Start,
            Clashing,
        }
        impl NonTerminal for BadRule {
            fn name(self) -> &'static str {
                match self {
                    Self::Start => "start",
                    Self::Clashing => "a__b",
                }
            }
        }
        // "a__b" would be indistinguishable from the synthetic pair rule
        // minted for the symbols "a" and "b" during binarization.
        let result: Result<Grammar<TokenKind, BadRule, ()>, _> =
            GrammarBuilder::new(BadRule::Start)
                .rule(BadRule::Start, vec![Symbol::NonTerminal(BadRule::Clashing)])
                .rule(BadRule::Clashing, vec![Symbol::Terminal(TokenKind::Id)])
                .build();
        assert_eq!(
            result.err(),
            Some(GrammarConfigError::ReservedName { symbol: "a__b" })
        );
    }

    #[test]
    fn alternatives_keep_definition_order() {
        let grammar: Grammar<TokenKind, Rule, ()> = GrammarBuilder::new(Rule::PrimType)
            .rule(Rule::PrimType, vec![t(TokenKind::Int)])
            .rule(Rule::PrimType, vec![t(TokenKind::Bool)])
            .build()
            .unwrap();
        let alternatives = grammar.alternatives(Rule::PrimType);
        assert_eq!(alternatives.len(), 2);
        assert_eq!(alternatives[0].symbols(), &[t(TokenKind::Int)]);
        assert_eq!(alternatives[1].symbols(), &[t(TokenKind::Bool)]);
    }

    #[test]
    fn named_children_number_repeated_names() {
        let mut children: NamedChildren<u32> = NamedChildren::new();
        children.insert("stmtList", 1);
        children.insert("stmtList", 2);
        children.insert("stmtList", 3);
        assert_eq!(children.take("stmtList"), Some(1));
        assert_eq!(children.take("stmtList2"), Some(2));
        assert_eq!(children.take("stmtList3"), Some(3));
        assert!(children.is_empty());
    }
}
