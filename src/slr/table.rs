//! Action and goto tables derived from the automaton.

use hashbrown::HashMap;

use super::automaton::Automaton;
use crate::error::GrammarConfigError;
use crate::grammar::{Grammar, NonTerminal, Symbol, Terminal};

/// Lookahead key for the action table. End of input is its own key rather
/// than a sentinel terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKey<K> {
    Terminal(K),
    End,
}

/// A parse-table action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Shift the lookahead and enter the given state.
    Shift(usize),
    /// Reduce by the given production.
    Reduce(usize),
    /// Input is a complete start derivation.
    Accept,
}

impl Action {
    fn describe<K, N, V>(self, automaton: &Automaton<K, N, V>) -> String
    where
        K: Terminal,
        N: NonTerminal,
    {
        match self {
            Self::Shift(state) => format!("shift to state {state}"),
            Self::Reduce(production) => {
                format!("reduce {}", automaton.productions()[production].describe())
            }
            Self::Accept => "accept".to_owned(),
        }
    }
}

/// The SLR(1) action and goto tables.
///
/// Both tables are total in neither dimension; a missing entry is a syntax
/// error at parse time.
pub struct ParseTables<K, N> {
    actions: HashMap<(usize, ActionKey<K>), Action, ahash::RandomState>,
    gotos: HashMap<(usize, N), usize, ahash::RandomState>,
}

impl<K: Terminal, N: NonTerminal> ParseTables<K, N> {
    /// Derive the tables from the automaton, gating reduces by FOLLOW sets.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarConfigError::TableConflict`] on the first cell that
    /// would hold two different actions. The grammar is then not SLR(1).
    pub fn build<V>(
        automaton: &Automaton<K, N, V>,
        grammar: &Grammar<K, N, V>,
    ) -> Result<Self, GrammarConfigError> {
        let follow = grammar.follow_sets();
        let mut tables = Self {
            actions: HashMap::default(),
            gotos: HashMap::default(),
        };
        for (state, lr_state) in automaton.states().iter().enumerate() {
            for item in &lr_state.items {
                let production = &automaton.productions()[item.production];
                match production.rhs().get(item.dot) {
                    Some(Symbol::Terminal(kind)) => {
                        // Transition exists for every symbol with an item
                        // dotted before it.
                        if let Some(target) = automaton.transition(state, Symbol::Terminal(*kind))
                        {
                            tables.insert_action(
                                automaton,
                                state,
                                ActionKey::Terminal(*kind),
                                Action::Shift(target),
                            )?;
                        }
                    }
                    Some(Symbol::NonTerminal(nt)) => {
                        if let Some(target) =
                            automaton.transition(state, Symbol::NonTerminal(*nt))
                        {
                            tables.gotos.insert((state, *nt), target);
                        }
                    }
                    None => match production.lhs() {
                        None => {
                            tables.insert_action(
                                automaton,
                                state,
                                ActionKey::End,
                                Action::Accept,
                            )?;
                        }
                        Some(lhs) => {
                            let Some(follow_set) = follow.get(&lhs) else {
                                continue;
                            };
                            // Sorted by name so the first reported conflict
                            // is deterministic.
                            let mut terminals: Vec<K> =
                                follow_set.terminals.iter().copied().collect();
                            terminals.sort_by_key(|kind| kind.name());
                            for kind in terminals {
                                tables.insert_action(
                                    automaton,
                                    state,
                                    ActionKey::Terminal(kind),
                                    Action::Reduce(item.production),
                                )?;
                            }
                            if follow_set.end_of_input {
                                tables.insert_action(
                                    automaton,
                                    state,
                                    ActionKey::End,
                                    Action::Reduce(item.production),
                                )?;
                            }
                        }
                    },
                }
            }
        }
        Ok(tables)
    }

    fn insert_action<V>(
        &mut self,
        automaton: &Automaton<K, N, V>,
        state: usize,
        key: ActionKey<K>,
        action: Action,
    ) -> Result<(), GrammarConfigError> {
        match self.actions.get(&(state, key)) {
            None => {
                self.actions.insert((state, key), action);
                Ok(())
            }
            Some(existing) if *existing == action => Ok(()),
            Some(existing) => Err(GrammarConfigError::TableConflict {
                state,
                terminal: match key {
                    ActionKey::Terminal(kind) => kind.name().to_owned(),
                    ActionKey::End => "<end of input>".to_owned(),
                },
                existing: existing.describe(automaton),
                conflicting: action.describe(automaton),
            }),
        }
    }

    /// The action for `state` on `key`, if the cell is filled.
    #[must_use]
    pub fn action(&self, state: usize, key: ActionKey<K>) -> Option<Action> {
        self.actions.get(&(state, key)).copied()
    }

    /// The goto target for `state` on `nonterminal`, if any.
    #[must_use]
    pub fn goto(&self, state: usize, nonterminal: N) -> Option<usize> {
        self.gotos.get(&(state, nonterminal)).copied()
    }

    /// The terminals with a filled action cell in `state`, sorted by name,
    /// and whether end of input is acceptable there. Feeds syntax errors.
    #[must_use]
    pub fn expected_terminals(&self, state: usize) -> (Vec<K>, bool) {
        let mut terminals = Vec::new();
        let mut end = false;
        for (cell_state, key) in self.actions.keys() {
            if *cell_state != state {
                continue;
            }
            match key {
                ActionKey::Terminal(kind) => terminals.push(*kind),
                ActionKey::End => end = true,
            }
        }
        terminals.sort_by_key(|kind| kind.name());
        terminals.dedup();
        (terminals, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::GrammarBuilder;
    use crate::lang::{Rule, TokenKind};

    fn t(kind: TokenKind) -> Symbol<TokenKind, Rule> {
        Symbol::Terminal(kind)
    }

    fn n(rule: Rule) -> Symbol<TokenKind, Rule> {
        Symbol::NonTerminal(rule)
    }

    #[test]
    fn builds_shift_and_reduce_entries() {
        let grammar: Grammar<TokenKind, Rule, ()> = GrammarBuilder::new(Rule::Program)
            .rule(Rule::Program, vec![n(Rule::VarDecl)])
            .rule(
                Rule::VarDecl,
                vec![t(TokenKind::Int), t(TokenKind::Id), t(TokenKind::Semicolon)],
            )
            .build()
            .unwrap();
        let automaton = Automaton::build(&grammar);
        let tables = ParseTables::build(&automaton, &grammar).unwrap();
        assert!(matches!(
            tables.action(0, ActionKey::Terminal(TokenKind::Int)),
            Some(Action::Shift(_))
        ));
        assert!(tables.goto(0, Rule::VarDecl).is_some());
        assert_eq!(tables.action(0, ActionKey::End), None);
    }

    #[test]
    fn reduce_reduce_conflict_is_reported() {
        // program -> exp | term, exp -> ID, term -> ID: after shifting ID
        // the parser cannot pick a reduction on end of input.
        let grammar: Grammar<TokenKind, Rule, ()> = GrammarBuilder::new(Rule::Program)
            .rule(Rule::Program, vec![n(Rule::Exp)])
            .rule(Rule::Program, vec![n(Rule::Term)])
            .rule(Rule::Exp, vec![t(TokenKind::Id)])
            .rule(Rule::Term, vec![t(TokenKind::Id)])
            .build()
            .unwrap();
        let automaton = Automaton::build(&grammar);
        let result = ParseTables::build(&automaton, &grammar);
        assert!(matches!(
            result,
            Err(GrammarConfigError::TableConflict { .. })
        ));
    }

    #[test]
    fn expected_terminals_are_sorted_by_name() {
        let grammar: Grammar<TokenKind, Rule, ()> = GrammarBuilder::new(Rule::PrimType)
            .rule(Rule::PrimType, vec![t(TokenKind::Int)])
            .rule(Rule::PrimType, vec![t(TokenKind::Bool)])
            .build()
            .unwrap();
        let automaton = Automaton::build(&grammar);
        let tables = ParseTables::build(&automaton, &grammar).unwrap();
        let (expected, end) = tables.expected_terminals(0);
        assert_eq!(expected, vec![TokenKind::Bool, TokenKind::Int]);
        assert!(!end);
    }
}
