//! End-to-end tests running both engines over Imp token streams.

use grackle::cyk::SpanRecognizer;
use grackle::grammar::Position;
use grackle::lang::{imp_grammar, Ast, BinaryOp, Token, TokenKind};
use grackle::slr::SlrParser;

fn tokens(kinds: &[TokenKind]) -> Vec<Token> {
    kinds
        .iter()
        .enumerate()
        .map(|(i, kind)| Token::new(*kind, "", Position::new(1, i as u32 + 1)))
        .collect()
}

fn named(entries: &[(TokenKind, &str)]) -> Vec<Token> {
    entries
        .iter()
        .enumerate()
        .map(|(i, (kind, text))| Token::new(*kind, text, Position::new(1, i as u32 + 1)))
        .collect()
}

#[test]
fn both_engines_accept_a_global_declaration() {
    let grammar = imp_grammar();
    let parser = SlrParser::new(&grammar).unwrap();
    let mut recognizer = SpanRecognizer::new(&grammar).unwrap();

    let input = named(&[
        (TokenKind::Int, "int"),
        (TokenKind::Id, "a"),
        (TokenKind::Semicolon, ";"),
    ]);
    let ast = parser.parse(&input).unwrap();
    assert_eq!(
        ast,
        Ast::Program(vec![Ast::VarDecl {
            declared: Box::new(Ast::PrimType(TokenKind::Int)),
            name: Box::new(Ast::Id("a".into())),
        }])
    );
    assert!(recognizer.recognize(&input));
}

#[test]
fn both_engines_reject_a_void_variable() {
    let grammar = imp_grammar();
    let parser = SlrParser::new(&grammar).unwrap();
    let mut recognizer = SpanRecognizer::new(&grammar).unwrap();

    let input = tokens(&[TokenKind::Void, TokenKind::Id, TokenKind::Semicolon]);
    assert!(parser.parse(&input).is_err());
    assert!(!recognizer.recognize(&input));
}

#[test]
fn both_engines_accept_the_empty_program() {
    let grammar = imp_grammar();
    let parser = SlrParser::new(&grammar).unwrap();
    let mut recognizer = SpanRecognizer::new(&grammar).unwrap();

    assert_eq!(parser.parse(&tokens(&[])).unwrap(), Ast::Program(Vec::new()));
    assert!(recognizer.recognize(&tokens(&[])));
}

#[test]
fn function_types_declare_variables_but_void_alone_does_not() {
    let grammar = imp_grammar();
    let parser = SlrParser::new(&grammar).unwrap();
    let mut recognizer = SpanRecognizer::new(&grammar).unwrap();

    // fn (int) -> void f;
    let input = named(&[
        (TokenKind::Fn, "fn"),
        (TokenKind::LParen, "("),
        (TokenKind::Int, "int"),
        (TokenKind::RParen, ")"),
        (TokenKind::Arrow, "->"),
        (TokenKind::Void, "void"),
        (TokenKind::Id, "f"),
        (TokenKind::Semicolon, ";"),
    ]);
    let ast = parser.parse(&input).unwrap();
    assert_eq!(
        ast,
        Ast::Program(vec![Ast::VarDecl {
            declared: Box::new(Ast::FnType {
                params: vec![Ast::PrimType(TokenKind::Int)],
                ret: Box::new(Ast::VoidType),
            }),
            name: Box::new(Ast::Id("f".into())),
        }])
    );
    assert!(recognizer.recognize(&input));
}

#[test]
fn a_medium_program_parses_and_is_recognized() {
    use TokenKind::{
        Assign, Else, Equals, Id, If, Int, IntLiteral, LCurly, LParen, Less, Output, Plus,
        PostInc, RCurly, Return, RParen, Semicolon, StringLiteral, Times, Void, While,
    };
    // int g;
    // void main() {
    //     int i;
    //     i = 0;
    //     while (i < 10) { output i * 2 + 1; i++; }
    //     if (i == 10) { return; } else { output "done"; }
    // }
    let kinds = [
        Int, Id, Semicolon,
        Void, Id, LParen, RParen, LCurly,
        Int, Id, Semicolon,
        Id, Assign, IntLiteral, Semicolon,
        While, LParen, Id, Less, IntLiteral, RParen, LCurly,
        Output, Id, Times, IntLiteral, Plus, IntLiteral, Semicolon,
        Id, PostInc, Semicolon,
        RCurly,
        If, LParen, Id, Equals, IntLiteral, RParen, LCurly,
        Return, Semicolon,
        RCurly, Else, LCurly,
        Output, StringLiteral, Semicolon,
        RCurly,
        RCurly,
    ];
    let input = tokens(&kinds);

    let grammar = imp_grammar();
    let parser = SlrParser::new(&grammar).unwrap();
    let ast = parser.parse(&input).unwrap();
    let Ast::Program(items) = ast else {
        panic!("expected a program");
    };
    assert_eq!(items.len(), 2);
    let Ast::FnDecl { ret, body, .. } = &items[1] else {
        panic!("expected a function declaration");
    };
    assert_eq!(**ret, Ast::VoidType);
    assert_eq!(body.len(), 4);
    let Ast::If { else_body, .. } = &body[3] else {
        panic!("expected the trailing if/else");
    };
    assert!(else_body.is_some());

    let mut recognizer = SpanRecognizer::new(&grammar).unwrap();
    assert!(recognizer.recognize(&input));
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    use TokenKind::{Id, IntLiteral, Output, Plus, Semicolon, Times, Void};
    // void f() { output 1 + 2 * x; }
    let kinds = [
        Void,
        Id,
        TokenKind::LParen,
        TokenKind::RParen,
        TokenKind::LCurly,
        Output,
        IntLiteral,
        Plus,
        IntLiteral,
        Times,
        Id,
        Semicolon,
        TokenKind::RCurly,
    ];
    let parser = SlrParser::new(&imp_grammar()).unwrap();
    let ast = parser.parse(&tokens(&kinds)).unwrap();
    let Ast::Program(items) = ast else {
        panic!("expected a program");
    };
    let Ast::FnDecl { body, .. } = &items[0] else {
        panic!("expected a function declaration");
    };
    let Ast::Output(exp) = &body[0] else {
        panic!("expected an output statement");
    };
    let Ast::Binary { op, rhs, .. } = exp.as_ref() else {
        panic!("expected a binary expression");
    };
    assert_eq!(*op, BinaryOp::Plus);
    assert!(matches!(
        rhs.as_ref(),
        Ast::Binary {
            op: BinaryOp::Times,
            ..
        }
    ));
}

#[test]
fn syntax_errors_carry_position_and_expected_terminals() {
    let parser = SlrParser::new(&imp_grammar()).unwrap();
    // int ; -- a name must follow the type.
    let input = tokens(&[TokenKind::Int, TokenKind::Semicolon]);
    let error = parser.parse(&input).unwrap_err();
    assert_eq!(error.got, Some(TokenKind::Semicolon));
    assert_eq!(error.position, Some(Position::new(1, 2)));
    // The state after a prim type also serves type lists, so COMMA and
    // RPAREN carry reduce entries alongside the declaration's ID.
    assert_eq!(
        error.expected,
        vec![TokenKind::Comma, TokenKind::Id, TokenKind::RParen]
    );
    assert!(!error.end_expected);
    let rendered = error.to_string();
    assert!(rendered.contains("SEMICOL"), "got: {rendered}");
    assert!(rendered.contains("ID"), "got: {rendered}");
}

#[test]
fn function_types_may_have_an_empty_parameter_list() {
    let grammar = imp_grammar();
    let parser = SlrParser::new(&grammar).unwrap();
    let mut recognizer = SpanRecognizer::new(&grammar).unwrap();

    // fn () -> int x;
    let input = named(&[
        (TokenKind::Fn, "fn"),
        (TokenKind::LParen, "("),
        (TokenKind::RParen, ")"),
        (TokenKind::Arrow, "->"),
        (TokenKind::Int, "int"),
        (TokenKind::Id, "x"),
        (TokenKind::Semicolon, ";"),
    ]);
    let ast = parser.parse(&input).unwrap();
    assert_eq!(
        ast,
        Ast::Program(vec![Ast::VarDecl {
            declared: Box::new(Ast::FnType {
                params: Vec::new(),
                ret: Box::new(Ast::PrimType(TokenKind::Int)),
            }),
            name: Box::new(Ast::Id("x".into())),
        }])
    );
    assert!(recognizer.recognize(&input));
}

#[test]
fn for_loops_take_a_plain_step_before_the_closing_paren() {
    use TokenKind::{
        Assign, Id, Int, IntLiteral, LCurly, Less, LParen, Output, PostInc, RCurly, RParen,
        Semicolon, Void,
    };
    // void f() { int i; for (i = 0; i < 10; i++) { output i; } }
    let kinds = [
        Void, Id, LParen, RParen, LCurly,
        Int, Id, Semicolon,
        TokenKind::For, LParen, Id, Assign, IntLiteral, Semicolon, Id, Less, IntLiteral,
        Semicolon, Id, PostInc, RParen, LCurly,
        Output, Id, Semicolon,
        RCurly,
        RCurly,
    ];
    let input = tokens(&kinds);

    let grammar = imp_grammar();
    let parser = SlrParser::new(&grammar).unwrap();
    let ast = parser.parse(&input).unwrap();
    let Ast::Program(items) = ast else {
        panic!("expected a program");
    };
    let Ast::FnDecl { body, .. } = &items[0] else {
        panic!("expected a function declaration");
    };
    let Ast::For { init, step, body, .. } = &body[1] else {
        panic!("expected a for loop");
    };
    assert!(matches!(init.as_ref(), Ast::Assign { .. }));
    assert!(matches!(
        step.as_ref(),
        Ast::Post {
            op: grackle::lang::PostOp::Inc,
            ..
        }
    ));
    assert_eq!(body.len(), 1);

    let mut recognizer = SpanRecognizer::new(&grammar).unwrap();
    assert!(recognizer.recognize(&input));
}

#[test]
fn assignments_chain_as_expressions() {
    use TokenKind::{Assign, Id, Int, IntLiteral, LCurly, LParen, RCurly, RParen, Semicolon, Void};
    // void f() { int x; int y; x = y = 1; }
    let input = named(&[
        (Void, "void"),
        (Id, "f"),
        (LParen, "("),
        (RParen, ")"),
        (LCurly, "{"),
        (Int, "int"),
        (Id, "x"),
        (Semicolon, ";"),
        (Int, "int"),
        (Id, "y"),
        (Semicolon, ";"),
        (Id, "x"),
        (Assign, "="),
        (Id, "y"),
        (Assign, "="),
        (IntLiteral, "1"),
        (Semicolon, ";"),
        (RCurly, "}"),
    ]);

    let grammar = imp_grammar();
    let parser = SlrParser::new(&grammar).unwrap();
    let ast = parser.parse(&input).unwrap();
    let Ast::Program(items) = ast else {
        panic!("expected a program");
    };
    let Ast::FnDecl { body, .. } = &items[0] else {
        panic!("expected a function declaration");
    };
    assert_eq!(
        body[2],
        Ast::Assign {
            target: Box::new(Ast::Id("x".into())),
            value: Box::new(Ast::Assign {
                target: Box::new(Ast::Id("y".into())),
                value: Box::new(Ast::IntLit(1)),
            }),
        }
    );

    let mut recognizer = SpanRecognizer::new(&grammar).unwrap();
    assert!(recognizer.recognize(&input));
}

#[test]
fn recognizer_memo_survives_across_inputs() {
    let mut recognizer = SpanRecognizer::new(&imp_grammar()).unwrap();
    let accept = tokens(&[TokenKind::Int, TokenKind::Id, TokenKind::Semicolon]);
    let reject = tokens(&[TokenKind::Int, TokenKind::Id]);
    for _ in 0..3 {
        assert!(recognizer.recognize(&accept));
        assert!(!recognizer.recognize(&reject));
    }
    recognizer.clear_cache();
    assert!(recognizer.recognize(&accept));
}
