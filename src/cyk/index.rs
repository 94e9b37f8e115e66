//! Inverse lookup from right-hand sides to producing rules.

use hashbrown::HashMap;
use lasso::Spur;
use smallvec::SmallVec;

use crate::grammar::normal::NormalGrammar;

/// Maps right-hand-side symbol-name sequences to the rules that produce
/// them.
///
/// Every non-empty alternative of the grammar is indexed, whatever its
/// length; the recognizer only ever asks for lengths one and two, which is
/// all a binarized grammar contains. A rule producing the same sequence
/// through several alternatives appears once per alternative.
pub struct InverseRuleIndex {
    entries: HashMap<SmallVec<[Spur; 2]>, SmallVec<[Spur; 4]>, ahash::RandomState>,
}

impl InverseRuleIndex {
    /// Index every non-empty alternative of `grammar`.
    #[must_use]
    pub fn build(grammar: &NormalGrammar) -> Self {
        let mut entries: HashMap<SmallVec<[Spur; 2]>, SmallVec<[Spur; 4]>, ahash::RandomState> =
            HashMap::default();
        for (rule, lines) in grammar.iter() {
            for line in lines {
                if line.is_empty() {
                    continue;
                }
                let key: SmallVec<[Spur; 2]> =
                    line.iter().map(|symbol| symbol.key()).collect();
                entries.entry(key).or_default().push(rule);
            }
        }
        Self { entries }
    }

    /// The rules producing exactly this symbol-name sequence.
    #[must_use]
    pub fn lookup(&self, key: &[Spur]) -> &[Spur] {
        self.entries.get(key).map_or(&[], SmallVec::as_slice)
    }

    /// The rules producing a single symbol.
    #[must_use]
    pub fn unit(&self, name: Spur) -> &[Spur] {
        self.lookup(&[name])
    }

    /// The rules producing this symbol pair.
    #[must_use]
    pub fn pair(&self, first: Spur, second: Spur) -> &[Spur] {
        self.lookup(&[first, second])
    }

    /// Number of distinct indexed sequences.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
