//! Nullable, FIRST, and FOLLOW analyses over a [`Grammar`].
//!
//! All three are computed by fixed-point iteration over the rules and are
//! consumed by the SLR table builder (FOLLOW gates reduce entries) and by the
//! normal-form lowering (nullable drives epsilon elimination).

use hashbrown::{HashMap, HashSet};

use super::{Grammar, NonTerminal, Symbol, Terminal};

/// The FOLLOW set of a nonterminal.
///
/// End of input is not a terminal kind, so it is tracked as a separate flag
/// rather than a sentinel member of `terminals`.
#[derive(Debug, Clone)]
pub struct FollowSet<K> {
    pub terminals: HashSet<K, ahash::RandomState>,
    pub end_of_input: bool,
}

impl<K> Default for FollowSet<K> {
    fn default() -> Self {
        Self {
            terminals: HashSet::default(),
            end_of_input: false,
        }
    }
}

impl<K: Terminal> FollowSet<K> {
    fn absorb_first(&mut self, first: &HashSet<K, ahash::RandomState>) -> bool {
        let before = self.terminals.len();
        self.terminals.extend(first.iter().copied());
        self.terminals.len() != before
    }

    fn absorb(&mut self, other: &Self) -> bool {
        let mut changed = self.absorb_first(&other.terminals);
        if other.end_of_input && !self.end_of_input {
            self.end_of_input = true;
            changed = true;
        }
        changed
    }
}

impl<K: Terminal, N: NonTerminal, V> Grammar<K, N, V> {
    /// The set of nonterminals that can derive the empty string.
    #[must_use]
    pub fn nullable_set(&self) -> HashSet<N, ahash::RandomState> {
        let mut nullable: HashSet<N, ahash::RandomState> = HashSet::default();
        let mut changed = true;
        while changed {
            changed = false;
            for (lhs, alternatives) in self.rules() {
                if nullable.contains(&lhs) {
                    continue;
                }
                let derives_empty = alternatives.iter().any(|alternative| {
                    alternative.symbols().iter().all(|symbol| match symbol {
                        Symbol::Terminal(_) => false,
                        Symbol::NonTerminal(nt) => nullable.contains(nt),
                    })
                });
                if derives_empty {
                    nullable.insert(lhs);
                    changed = true;
                }
            }
        }
        nullable
    }

    /// FIRST sets of every nonterminal.
    #[must_use]
    pub fn first_sets(&self) -> HashMap<N, HashSet<K, ahash::RandomState>, ahash::RandomState> {
        let nullable = self.nullable_set();
        let mut first: HashMap<N, HashSet<K, ahash::RandomState>, ahash::RandomState> =
            HashMap::default();
        for nt in self.rules().map(|(nt, _)| nt) {
            first.insert(nt, HashSet::default());
        }
        let mut changed = true;
        while changed {
            changed = false;
            for (lhs, alternatives) in self.rules() {
                for alternative in alternatives {
                    for symbol in alternative.symbols() {
                        match symbol {
                            Symbol::Terminal(kind) => {
                                if first.get_mut(&lhs).is_some_and(|set| set.insert(*kind)) {
                                    changed = true;
                                }
                                break;
                            }
                            Symbol::NonTerminal(nt) => {
                                let from = first.get(nt).cloned().unwrap_or_default();
                                if let Some(into) = first.get_mut(&lhs) {
                                    let before = into.len();
                                    into.extend(from.iter().copied());
                                    if into.len() != before {
                                        changed = true;
                                    }
                                }
                                if !nullable.contains(nt) {
                                    break;
                                }
                            }
                        }
                    }
                }
            }
        }
        first
    }

    /// FOLLOW sets of every nonterminal. The start nonterminal's set has the
    /// end-of-input flag raised.
    #[must_use]
    pub fn follow_sets(&self) -> HashMap<N, FollowSet<K>, ahash::RandomState> {
        let nullable = self.nullable_set();
        let first = self.first_sets();
        let mut follow: HashMap<N, FollowSet<K>, ahash::RandomState> = HashMap::default();
        for nt in self.rules().map(|(nt, _)| nt) {
            follow.insert(nt, FollowSet::default());
        }
        if let Some(set) = follow.get_mut(&self.start()) {
            set.end_of_input = true;
        }
        let mut changed = true;
        while changed {
            changed = false;
            for (lhs, alternatives) in self.rules() {
                for alternative in alternatives {
                    let symbols = alternative.symbols();
                    for (i, symbol) in symbols.iter().enumerate() {
                        let Symbol::NonTerminal(target) = symbol else {
                            continue;
                        };
                        // Everything FIRST-derivable from the suffix after the
                        // target follows it; if the whole suffix is nullable,
                        // FOLLOW(lhs) does too.
                        let mut suffix_nullable = true;
                        let mut additions: HashSet<K, ahash::RandomState> = HashSet::default();
                        for rest in &symbols[i + 1..] {
                            match rest {
                                Symbol::Terminal(kind) => {
                                    additions.insert(*kind);
                                    suffix_nullable = false;
                                    break;
                                }
                                Symbol::NonTerminal(nt) => {
                                    if let Some(set) = first.get(nt) {
                                        additions.extend(set.iter().copied());
                                    }
                                    if !nullable.contains(nt) {
                                        suffix_nullable = false;
                                        break;
                                    }
                                }
                            }
                        }
                        if let Some(set) = follow.get_mut(target) {
                            if set.absorb_first(&additions) {
                                changed = true;
                            }
                        }
                        if suffix_nullable && *target != lhs {
                            let from = follow.get(&lhs).cloned().unwrap_or_default();
                            if let Some(set) = follow.get_mut(target) {
                                if set.absorb(&from) {
                                    changed = true;
                                }
                            }
                        }
                    }
                }
            }
        }
        follow
    }
}
