//! CYK span recognition.
//!
//! The [`SpanRecognizer`] answers "does this token-kind sequence belong to
//! the language" without building a parse: the normalized grammar is
//! inverted into an [`InverseRuleIndex`], and a bottom-up chart derives the
//! rule set of every span from the rule sets of its splits.

mod index;
mod recognizer;

pub use index::InverseRuleIndex;
pub use recognizer::SpanRecognizer;

/// All left/right combinations, left-major: the first element of `left` is
/// paired with every element of `right` before the second is considered.
#[must_use]
pub fn cartesian_product<A: Copy, B: Copy>(left: &[A], right: &[B]) -> Vec<(A, B)> {
    let mut pairs = Vec::with_capacity(left.len() * right.len());
    for &a in left {
        for &b in right {
            pairs.push((a, b));
        }
    }
    pairs
}
