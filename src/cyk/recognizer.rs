//! The CYK membership oracle.

use hashbrown::{HashMap, HashSet};
use lasso::Spur;

use super::cartesian_product;
use super::index::InverseRuleIndex;
use crate::error::GrammarConfigError;
use crate::grammar::normal::NormalGrammar;
use crate::grammar::{Grammar, NonTerminal, Terminal, Token};

/// Boolean membership oracle over token-kind sequences.
///
/// Construction normalizes the grammar and builds the inverse index once;
/// each query fills a fresh triangular chart, consulting and feeding a
/// cross-query memo of span results. The memo only ever grows, so
/// [`clear_cache`](Self::clear_cache) exists for long-lived recognizers fed
/// many unrelated inputs.
pub struct SpanRecognizer {
    grammar: NormalGrammar,
    index: InverseRuleIndex,
    memo: HashMap<Box<[Spur]>, HashSet<Spur, ahash::RandomState>, ahash::RandomState>,
}

impl SpanRecognizer {
    /// Normalize `grammar` and build the inverse index.
    ///
    /// # Errors
    ///
    /// Returns [`GrammarConfigError::UnitCycle`] if normalization fails.
    pub fn new<K: Terminal, N: NonTerminal, V>(
        grammar: &Grammar<K, N, V>,
    ) -> Result<Self, GrammarConfigError> {
        let normal = NormalGrammar::lower(grammar).normalize()?;
        let index = InverseRuleIndex::build(&normal);
        Ok(Self {
            grammar: normal,
            index,
            memo: HashMap::default(),
        })
    }

    /// Whether the kind sequence of `tokens` is in the language.
    pub fn recognize<T: Token>(&mut self, tokens: &[T]) -> bool {
        let input: Vec<Spur> = tokens
            .iter()
            .map(|token| self.grammar.intern(token.kind().name()))
            .collect();
        self.recognize_spans(&input)
    }

    /// Like [`recognize`](Self::recognize), over raw kind names. A name the
    /// grammar never mentions derives nothing.
    pub fn recognize_kinds(&mut self, kinds: &[&str]) -> bool {
        let input: Vec<Spur> = kinds.iter().map(|kind| self.grammar.intern(kind)).collect();
        self.recognize_spans(&input)
    }

    /// Drop every memoized span result.
    pub fn clear_cache(&mut self) {
        self.memo.clear();
    }

    /// Number of memoized spans.
    #[must_use]
    pub fn cached_spans(&self) -> usize {
        self.memo.len()
    }

    fn recognize_spans(&mut self, input: &[Spur]) -> bool {
        if input.is_empty() {
            return self.grammar.start_nullable();
        }
        let n = input.len();
        // chart[i][l - 1] holds the rules deriving input[i..i + l].
        let mut chart: Vec<Vec<HashSet<Spur, ahash::RandomState>>> =
            vec![vec![HashSet::default(); n]; n];
        for length in 1..=n {
            for start in 0..=n - length {
                let span = &input[start..start + length];
                if let Some(cached) = self.memo.get(span) {
                    chart[start][length - 1] = cached.clone();
                    continue;
                }
                let mut cell: HashSet<Spur, ahash::RandomState> = HashSet::default();
                if length == 1 {
                    cell.extend(self.index.unit(span[0]).iter().copied());
                } else {
                    for split in 1..length {
                        let left: Vec<Spur> =
                            chart[start][split - 1].iter().copied().collect();
                        let right: Vec<Spur> = chart[start + split][length - split - 1]
                            .iter()
                            .copied()
                            .collect();
                        for (a, b) in cartesian_product(&left, &right) {
                            cell.extend(self.index.pair(a, b).iter().copied());
                        }
                    }
                }
                self.memo
                    .insert(span.to_vec().into_boxed_slice(), cell.clone());
                chart[start][length - 1] = cell;
            }
        }
        chart[0][n - 1].contains(&self.grammar.start())
    }
}
