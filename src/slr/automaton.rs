//! LR(0) item sets and the canonical automaton.

use std::collections::BTreeSet;

use hashbrown::{HashMap, HashSet};

use crate::grammar::{Grammar, NonTerminal, SemanticAction, Symbol, Terminal};

/// A numbered production lowered from a grammar alternative.
///
/// Production 0 is always the augmented start `S' -> start`, marked by a
/// `None` left-hand side; reducing it is the accept move.
pub struct Production<K, N, V> {
    pub(crate) lhs: Option<N>,
    pub(crate) rhs: Vec<Symbol<K, N>>,
    pub(crate) action: Option<SemanticAction<V>>,
}

impl<K: Terminal, N: NonTerminal, V> Production<K, N, V> {
    /// The left-hand side, or `None` for the augmented start.
    #[must_use]
    pub fn lhs(&self) -> Option<N> {
        self.lhs
    }

    /// The right-hand-side symbols.
    #[must_use]
    pub fn rhs(&self) -> &[Symbol<K, N>] {
        &self.rhs
    }

    /// The semantic action of the source alternative, if any.
    #[must_use]
    pub fn action(&self) -> Option<&SemanticAction<V>> {
        self.action.as_ref()
    }

    /// A readable `lhs -> rhs` rendering, used in conflict reports.
    #[must_use]
    pub fn describe(&self) -> String {
        let lhs = self.lhs.map_or("<start>", NonTerminal::name);
        if self.rhs.is_empty() {
            return format!("{lhs} -> <empty>");
        }
        let rhs: Vec<&str> = self.rhs.iter().map(|s| s.name()).collect();
        format!("{lhs} -> {}", rhs.join(" "))
    }
}

/// An LR(0) item: a production with a dot position in its right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LrItem {
    pub production: usize,
    pub dot: usize,
}

impl LrItem {
    #[must_use]
    pub const fn new(production: usize, dot: usize) -> Self {
        Self { production, dot }
    }

    fn advanced(self) -> Self {
        Self {
            production: self.production,
            dot: self.dot + 1,
        }
    }
}

/// A state of the automaton: a closed set of items.
///
/// Items are kept in a `BTreeSet` so state identity is order-independent and
/// iteration is deterministic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LrState {
    pub items: BTreeSet<LrItem>,
}

/// The LR(0) automaton: numbered productions, states, and the goto relation.
pub struct Automaton<K, N, V> {
    productions: Vec<Production<K, N, V>>,
    states: Vec<LrState>,
    transitions: Vec<HashMap<Symbol<K, N>, usize, ahash::RandomState>>,
}

impl<K: Terminal, N: NonTerminal, V> Automaton<K, N, V> {
    /// Build the automaton for `grammar` by breadth-first exploration from
    /// the closure of the augmented start item.
    #[must_use]
    pub fn build(grammar: &Grammar<K, N, V>) -> Self {
        let mut productions: Vec<Production<K, N, V>> = Vec::new();
        productions.push(Production {
            lhs: None,
            rhs: vec![Symbol::NonTerminal(grammar.start())],
            action: None,
        });
        let mut by_lhs: HashMap<N, Vec<usize>, ahash::RandomState> = HashMap::default();
        for (lhs, alternatives) in grammar.rules() {
            for alternative in alternatives {
                by_lhs.entry(lhs).or_default().push(productions.len());
                productions.push(Production {
                    lhs: Some(lhs),
                    rhs: alternative.symbols().to_vec(),
                    action: alternative.action().cloned(),
                });
            }
        }

        let closure = |kernel: BTreeSet<LrItem>| -> BTreeSet<LrItem> {
            let mut items = kernel;
            let mut queue: Vec<LrItem> = items.iter().copied().collect();
            while let Some(item) = queue.pop() {
                let rhs = &productions[item.production].rhs;
                let Some(Symbol::NonTerminal(next)) = rhs.get(item.dot) else {
                    continue;
                };
                for &production in by_lhs.get(next).map_or(&[][..], Vec::as_slice) {
                    let fresh = LrItem::new(production, 0);
                    if items.insert(fresh) {
                        queue.push(fresh);
                    }
                }
            }
            items
        };

        let start_items = closure(BTreeSet::from([LrItem::new(0, 0)]));
        let mut states = vec![LrState { items: start_items }];
        let mut index: HashMap<BTreeSet<LrItem>, usize, ahash::RandomState> = HashMap::default();
        index.insert(states[0].items.clone(), 0);
        let mut transitions: Vec<HashMap<Symbol<K, N>, usize, ahash::RandomState>> =
            vec![HashMap::default()];

        let mut frontier = 0usize;
        while frontier < states.len() {
            // Collect outgoing symbols in item order so state numbering does
            // not depend on hash iteration.
            let mut symbols: Vec<Symbol<K, N>> = Vec::new();
            let mut seen: HashSet<Symbol<K, N>, ahash::RandomState> = HashSet::default();
            for item in &states[frontier].items {
                if let Some(symbol) = productions[item.production].rhs.get(item.dot) {
                    if seen.insert(*symbol) {
                        symbols.push(*symbol);
                    }
                }
            }
            for symbol in symbols {
                let kernel: BTreeSet<LrItem> = states[frontier]
                    .items
                    .iter()
                    .filter(|item| {
                        productions[item.production].rhs.get(item.dot) == Some(&symbol)
                    })
                    .map(|item| item.advanced())
                    .collect();
                let target_items = closure(kernel);
                let target = match index.get(&target_items) {
                    Some(&existing) => existing,
                    None => {
                        let fresh = states.len();
                        index.insert(target_items.clone(), fresh);
                        states.push(LrState {
                            items: target_items,
                        });
                        transitions.push(HashMap::default());
                        fresh
                    }
                };
                transitions[frontier].insert(symbol, target);
            }
            frontier += 1;
        }

        Self {
            productions,
            states,
            transitions,
        }
    }

    #[must_use]
    pub fn productions(&self) -> &[Production<K, N, V>] {
        &self.productions
    }

    #[must_use]
    pub fn states(&self) -> &[LrState] {
        &self.states
    }

    /// The goto target from `state` on `symbol`, if any.
    #[must_use]
    pub fn transition(&self, state: usize, symbol: Symbol<K, N>) -> Option<usize> {
        self.transitions.get(state)?.get(&symbol).copied()
    }

    pub(crate) fn into_productions(self) -> Vec<Production<K, N, V>> {
        self.productions
    }
}
