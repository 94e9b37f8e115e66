//! Chomsky-style normal form for the span recognizer.
//!
//! The typed [`Grammar`](super::Grammar) is lowered into a name-interned
//! [`NormalGrammar`] and then normalized in three passes:
//!
//! 1. nullable expansion: every alternative gains variants that omit any
//!    subset of its nullable nonterminals, and empty alternatives are
//!    dropped (whether the start symbol derives the empty string is recorded
//!    separately),
//! 2. unit elimination: alternatives consisting of a single nonterminal are
//!    replaced by the alternatives of that nonterminal until a fixed point,
//! 3. binarization: terminals inside longer alternatives are promoted to
//!    synthetic single-terminal rules, then alternatives are folded left to
//!    right into synthetic pair rules until no alternative exceeds two
//!    symbols.
//!
//! After normalization every alternative is either a single terminal or a
//! pair of nonterminals, which is what the pairwise span recognizer needs.

use std::collections::BTreeMap;

use hashbrown::{HashMap, HashSet};
use lasso::{Rodeo, Spur};
use smallvec::SmallVec;

use super::{Grammar, NonTerminal, Symbol, Terminal};
use crate::error::GrammarConfigError;

/// A symbol in the normal form, identified by interned name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NormalSymbol {
    Terminal(Spur),
    Rule(Spur),
}

impl NormalSymbol {
    /// The interned name, regardless of symbol kind.
    #[must_use]
    pub fn key(self) -> Spur {
        match self {
            Self::Terminal(name) | Self::Rule(name) => name,
        }
    }
}

/// One normalized right-hand side.
pub type Line = SmallVec<[NormalSymbol; 4]>;

/// A name-interned grammar suitable for normalization and span recognition.
pub struct NormalGrammar {
    names: Rodeo,
    rules: HashMap<Spur, Vec<Line>, ahash::RandomState>,
    order: Vec<Spur>,
    start: Spur,
    start_nullable: bool,
}

impl NormalGrammar {
    /// Lower a typed grammar, interning every symbol name.
    #[must_use]
    pub fn lower<K: Terminal, N: NonTerminal, V>(grammar: &Grammar<K, N, V>) -> Self {
        let mut names = Rodeo::default();
        let mut rules: HashMap<Spur, Vec<Line>, ahash::RandomState> = HashMap::default();
        let mut order = Vec::with_capacity(grammar.rule_count());
        for (lhs, alternatives) in grammar.rules() {
            let lhs_name = names.get_or_intern(lhs.name());
            order.push(lhs_name);
            let lines = alternatives
                .iter()
                .map(|alternative| {
                    alternative
                        .symbols()
                        .iter()
                        .map(|symbol| match symbol {
                            Symbol::Terminal(kind) => {
                                NormalSymbol::Terminal(names.get_or_intern(kind.name()))
                            }
                            Symbol::NonTerminal(nt) => {
                                NormalSymbol::Rule(names.get_or_intern(nt.name()))
                            }
                        })
                        .collect()
                })
                .collect();
            rules.insert(lhs_name, lines);
        }
        let start = names.get_or_intern(grammar.start().name());
        let start_nullable = grammar.nullable_set().contains(&grammar.start());
        Self {
            names,
            rules,
            order,
            start,
            start_nullable,
        }
    }

    /// Run all three normalization passes.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarConfigError::UnitCycle`] if unit elimination fails to
    /// reach a fixed point within its iteration cap.
    pub fn normalize(mut self) -> Result<Self, GrammarConfigError> {
        self.expand_nullable();
        self.remove_unit_productions()?;
        self.binarize();
        Ok(self)
    }

    /// The interned start rule name.
    #[must_use]
    pub fn start(&self) -> Spur {
        self.start
    }

    /// Whether the start rule can derive the empty string.
    #[must_use]
    pub fn start_nullable(&self) -> bool {
        self.start_nullable
    }

    /// The alternatives of a rule (empty if unknown).
    #[must_use]
    pub fn lines(&self, rule: Spur) -> &[Line] {
        self.rules.get(&rule).map_or(&[], Vec::as_slice)
    }

    /// Iterate rules in definition order (synthetic rules last).
    pub fn iter(&self) -> impl Iterator<Item = (Spur, &[Line])> {
        self.order.iter().map(|rule| (*rule, self.lines(*rule)))
    }

    /// Intern a name, usually a token kind seen at recognition time.
    pub fn intern(&mut self, name: &str) -> Spur {
        self.names.get_or_intern(name)
    }

    /// Look up an already interned name.
    #[must_use]
    pub fn get_name(&self, name: &str) -> Option<Spur> {
        self.names.get(name)
    }

    /// Resolve an interned name back to its string.
    #[must_use]
    pub fn resolve(&self, name: Spur) -> &str {
        self.names.resolve(&name)
    }

    /// Replace every alternative with the variants reachable by omitting any
    /// subset of its nullable rule references, dropping empty alternatives.
    fn expand_nullable(&mut self) {
        let nullable = self.nullable_rules();
        for rule in &self.order {
            let Some(lines) = self.rules.get_mut(rule) else {
                continue;
            };
            let mut expanded: Vec<Line> = Vec::new();
            let mut seen: HashSet<Line, ahash::RandomState> = HashSet::default();
            for line in lines.iter() {
                push_variants(line, &nullable, &mut expanded, &mut seen);
            }
            *lines = expanded;
        }
    }

    fn nullable_rules(&self) -> HashSet<Spur, ahash::RandomState> {
        let mut nullable: HashSet<Spur, ahash::RandomState> = HashSet::default();
        let mut changed = true;
        while changed {
            changed = false;
            for (rule, lines) in self.iter_raw() {
                if nullable.contains(&rule) {
                    continue;
                }
                let derives_empty = lines.iter().any(|line| {
                    line.iter().all(|symbol| match symbol {
                        NormalSymbol::Terminal(_) => false,
                        NormalSymbol::Rule(r) => nullable.contains(r),
                    })
                });
                if derives_empty {
                    nullable.insert(rule);
                    changed = true;
                }
            }
        }
        nullable
    }

    fn iter_raw(&self) -> impl Iterator<Item = (Spur, &Vec<Line>)> {
        self.order
            .iter()
            .filter_map(|rule| self.rules.get(rule).map(|lines| (*rule, lines)))
    }

    /// Replace single-nonterminal alternatives by the alternatives of the
    /// referenced rule, to a fixed point.
    ///
    /// The pass is capped at one iteration per alternative in the grammar;
    /// a grammar that still changes past the cap has a unit cycle that keeps
    /// regenerating work, and is rejected rather than looped on.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarConfigError::UnitCycle`] when the cap is exceeded.
    pub fn remove_unit_productions(&mut self) -> Result<(), GrammarConfigError> {
        let cap = self
            .rules
            .values()
            .map(Vec::len)
            .sum::<usize>()
            .max(self.order.len())
            .saturating_mul(2)
            .max(8);
        let order = self.order.clone();
        let mut iterations = 0usize;
        loop {
            let mut changed = false;
            for rule in &order {
                let lines = match self.rules.get(rule) {
                    Some(lines) => lines.clone(),
                    None => continue,
                };
                let mut replacement: Vec<Line> = Vec::with_capacity(lines.len());
                for line in lines {
                    let unit_target = match line.as_slice() {
                        [NormalSymbol::Rule(target)] => Some(*target),
                        _ => None,
                    };
                    match unit_target {
                        Some(target) if target != *rule => {
                            for inherited in self.lines(target) {
                                if !replacement.contains(inherited) {
                                    replacement.push(inherited.clone());
                                    changed = true;
                                }
                            }
                            changed = true;
                        }
                        Some(_) => {
                            // Self-unit alternative derives nothing new.
                            changed = true;
                        }
                        None => {
                            if !replacement.contains(&line) {
                                replacement.push(line);
                            }
                        }
                    }
                }
                self.rules.insert(*rule, replacement);
            }
            if !changed {
                return Ok(());
            }
            iterations += 1;
            if iterations > cap {
                let culprit = order
                    .iter()
                    .find(|rule| {
                        self.lines(**rule)
                            .iter()
                            .any(|line| matches!(line.as_slice(), [NormalSymbol::Rule(_)]))
                    })
                    .copied()
                    .unwrap_or(self.start);
                return Err(GrammarConfigError::UnitCycle {
                    nonterminal: self.resolve(culprit).to_owned(),
                    iterations,
                });
            }
        }
    }

    /// Promote terminals inside longer alternatives to synthetic rules, then
    /// fold every alternative down to at most two symbols.
    fn binarize(&mut self) {
        let order = self.order.clone();
        for rule in order {
            let lines = match self.rules.get(&rule) {
                Some(lines) => lines.clone(),
                None => continue,
            };
            let mut rewritten: Vec<Line> = Vec::with_capacity(lines.len());
            for mut line in lines {
                if line.len() >= 2 {
                    for symbol in line.iter_mut() {
                        if let NormalSymbol::Terminal(name) = *symbol {
                            *symbol = NormalSymbol::Rule(self.promote_terminal(name));
                        }
                    }
                }
                while line.len() > 2 {
                    let first = line[0];
                    let second = line[1];
                    let pair = self.pair_rule(first, second);
                    let mut folded: Line = SmallVec::new();
                    folded.push(NormalSymbol::Rule(pair));
                    folded.extend(line.drain(2..));
                    line = folded;
                }
                rewritten.push(line);
            }
            self.rules.insert(rule, rewritten);
        }
    }

    /// Synthetic rule `__NAME` with the single alternative `NAME`.
    fn promote_terminal(&mut self, terminal: Spur) -> Spur {
        let name = format!("__{}", self.names.resolve(&terminal));
        let rule = self.names.get_or_intern(&name);
        if !self.rules.contains_key(&rule) {
            let mut line: Line = SmallVec::new();
            line.push(NormalSymbol::Terminal(terminal));
            self.rules.insert(rule, vec![line]);
            self.order.push(rule);
        }
        rule
    }

    /// Synthetic rule `__A__B` with the single alternative `A B`.
    fn pair_rule(&mut self, first: NormalSymbol, second: NormalSymbol) -> Spur {
        let name = format!(
            "__{}__{}",
            self.names.resolve(&first.key()),
            self.names.resolve(&second.key())
        );
        let rule = self.names.get_or_intern(&name);
        if !self.rules.contains_key(&rule) {
            let mut line: Line = SmallVec::new();
            line.push(first);
            line.push(second);
            self.rules.insert(rule, vec![line]);
            self.order.push(rule);
        }
        rule
    }

    /// A stable, name-resolved view of the rules, for comparisons in tests.
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, Vec<Vec<String>>> {
        self.iter()
            .map(|(rule, lines)| {
                let lines = lines
                    .iter()
                    .map(|line| {
                        line.iter()
                            .map(|symbol| self.resolve(symbol.key()).to_owned())
                            .collect()
                    })
                    .collect();
                (self.resolve(rule).to_owned(), lines)
            })
            .collect()
    }

    /// Build a grammar directly from name strings. A symbol is treated as a
    /// rule reference exactly when a rule of that name is defined.
    #[cfg(test)]
    pub(crate) fn from_parts(start: &str, parts: &[(&str, &[&[&str]])]) -> Self {
        let mut names = Rodeo::default();
        let mut order = Vec::with_capacity(parts.len());
        for (rule, _) in parts {
            order.push(names.get_or_intern(rule));
        }
        let defined: HashSet<Spur, ahash::RandomState> = order.iter().copied().collect();
        let mut rules: HashMap<Spur, Vec<Line>, ahash::RandomState> = HashMap::default();
        for (rule, lines) in parts {
            let rule = names.get_or_intern(rule);
            let lines = lines
                .iter()
                .map(|line| {
                    line.iter()
                        .map(|symbol| {
                            let name = names.get_or_intern(symbol);
                            if defined.contains(&name) {
                                NormalSymbol::Rule(name)
                            } else {
                                NormalSymbol::Terminal(name)
                            }
                        })
                        .collect()
                })
                .collect();
            rules.insert(rule, lines);
        }
        let start = names.get_or_intern(start);
        Self {
            names,
            rules,
            order,
            start,
            start_nullable: false,
        }
    }
}

fn push_variants(
    line: &Line,
    nullable: &HashSet<Spur, ahash::RandomState>,
    out: &mut Vec<Line>,
    seen: &mut HashSet<Line, ahash::RandomState>,
) {
    // Depth-first over keep/omit choices for each nullable reference, in
    // symbol order, so the unaltered line comes out first.
    fn walk(
        line: &[NormalSymbol],
        nullable: &HashSet<Spur, ahash::RandomState>,
        prefix: &mut Line,
        out: &mut Vec<Line>,
        seen: &mut HashSet<Line, ahash::RandomState>,
    ) {
        match line.split_first() {
            None => {
                if !prefix.is_empty() && seen.insert(prefix.clone()) {
                    out.push(prefix.clone());
                }
            }
            Some((symbol, rest)) => {
                prefix.push(*symbol);
                walk(rest, nullable, prefix, out, seen);
                prefix.pop();
                if matches!(symbol, NormalSymbol::Rule(r) if nullable.contains(r)) {
                    walk(rest, nullable, prefix, out, seen);
                }
            }
        }
    }
    let mut prefix: Line = SmallVec::new();
    walk(line, nullable, &mut prefix, out, seen);
}
