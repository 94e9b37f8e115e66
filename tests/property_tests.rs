//! Property tests cross-validating the two engines.
//!
//! The shift-reduce parser and the span recognizer answer the membership
//! question through entirely different machinery (SLR tables over the typed
//! grammar versus CYK over its normalized form), so agreement over random
//! inputs is a strong check on both.

use std::sync::OnceLock;

use proptest::prelude::*;

use grackle::cyk::SpanRecognizer;
use grackle::grammar::{Grammar, Position};
use grackle::lang::{imp_grammar, Ast, Rule, Token, TokenKind};
use grackle::slr::SlrParser;

fn grammar() -> &'static Grammar<TokenKind, Rule, Ast> {
    static GRAMMAR: OnceLock<Grammar<TokenKind, Rule, Ast>> = OnceLock::new();
    GRAMMAR.get_or_init(imp_grammar)
}

fn parser() -> &'static SlrParser<TokenKind, Rule, Ast> {
    static PARSER: OnceLock<SlrParser<TokenKind, Rule, Ast>> = OnceLock::new();
    PARSER.get_or_init(|| SlrParser::new(grammar()).unwrap())
}

fn tokens(kinds: &[TokenKind]) -> Vec<Token> {
    kinds
        .iter()
        .enumerate()
        .map(|(i, kind)| Token::new(*kind, "x", Position::new(1, i as u32 + 1)))
        .collect()
}

fn kind_strategy() -> impl Strategy<Value = TokenKind> {
    prop::sample::select(vec![
        TokenKind::Int,
        TokenKind::Bool,
        TokenKind::Void,
        TokenKind::Fn,
        TokenKind::Id,
        TokenKind::Semicolon,
        TokenKind::LParen,
        TokenKind::RParen,
        TokenKind::Arrow,
    ])
}

proptest! {
    #[test]
    fn engines_agree_on_membership(kinds in prop::collection::vec(kind_strategy(), 0..7)) {
        let input = tokens(&kinds);
        let parsed = parser().parse(&input).is_ok();
        let mut recognizer = SpanRecognizer::new(grammar()).unwrap();
        let recognized = recognizer.recognize(&input);
        prop_assert_eq!(
            parsed,
            recognized,
            "engines disagree on {:?}",
            kinds
        );
    }

    #[test]
    fn recognition_is_stable_under_memo_reuse_and_reset(
        kinds in prop::collection::vec(kind_strategy(), 0..7)
    ) {
        let input = tokens(&kinds);
        let mut recognizer = SpanRecognizer::new(grammar()).unwrap();
        let first = recognizer.recognize(&input);
        let cached = recognizer.recognize(&input);
        recognizer.clear_cache();
        let fresh = recognizer.recognize(&input);
        prop_assert_eq!(first, cached);
        prop_assert_eq!(first, fresh);
    }

    #[test]
    fn accepted_inputs_synthesize_a_program(
        kinds in prop::collection::vec(kind_strategy(), 0..7)
    ) {
        let input = tokens(&kinds);
        if let Ok(ast) = parser().parse(&input) {
            prop_assert!(matches!(ast, Ast::Program(_)));
        }
    }

    #[test]
    fn declaration_sequences_are_always_accepted(count in 0usize..5) {
        let mut kinds = Vec::new();
        for i in 0..count {
            kinds.push(if i % 2 == 0 { TokenKind::Int } else { TokenKind::Bool });
            kinds.push(TokenKind::Id);
            kinds.push(TokenKind::Semicolon);
        }
        let input = tokens(&kinds);
        prop_assert!(parser().parse(&input).is_ok());
        let mut recognizer = SpanRecognizer::new(grammar()).unwrap();
        prop_assert!(recognizer.recognize(&input));
    }
}
