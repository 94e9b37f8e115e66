//! The Imp grammar and its tree-building actions.

use crate::grammar::{Grammar, GrammarBuilder, NonTerminal, Symbol};

use super::ast::{Ast, BinaryOp, PostOp, UnaryOp};
use super::token::TokenKind;

/// The nonterminals of Imp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    Program,
    Globals,
    VarDecl,
    Type,
    PrimType,
    FnType,
    RetType,
    TypeList,
    FnDecl,
    Formals,
    FormalDecl,
    StmtList,
    BlockStmt,
    Stmt,
    SimpleStmt,
    AssignExp,
    CallExp,
    ActualsList,
    Exp,
    ExpOr,
    ExpAnd,
    ExpCompare,
    ExpPlus,
    ExpMult,
    Term,
    Id,
}

impl NonTerminal for Rule {
    fn name(self) -> &'static str {
        match self {
            Self::Program => "program",
            Self::Globals => "globals",
            Self::VarDecl => "varDecl",
            Self::Type => "type",
            Self::PrimType => "primType",
            Self::FnType => "fnType",
            Self::RetType => "retType",
            Self::TypeList => "typeList",
            Self::FnDecl => "fnDecl",
            Self::Formals => "formals",
            Self::FormalDecl => "formalDecl",
            Self::StmtList => "stmtList",
            Self::BlockStmt => "blockStmt",
            Self::Stmt => "stmt",
            Self::SimpleStmt => "simpleStmt",
            Self::AssignExp => "assignExp",
            Self::CallExp => "callExp",
            Self::ActualsList => "actualsList",
            Self::Exp => "exp",
            Self::ExpOr => "expOr",
            Self::ExpAnd => "expAnd",
            Self::ExpCompare => "expCompare",
            Self::ExpPlus => "expPlus",
            Self::ExpMult => "expMult",
            Self::Term => "term",
            Self::Id => "id",
        }
    }
}

fn t(kind: TokenKind) -> Symbol<TokenKind, Rule> {
    Symbol::Terminal(kind)
}

fn n(rule: Rule) -> Symbol<TokenKind, Rule> {
    Symbol::NonTerminal(rule)
}

fn boxed(ast: Ast) -> Box<Ast> {
    Box::new(ast)
}

/// The full Imp grammar, SLR(1) by construction.
///
/// Variable and formal declarations go through the void-free `type` rule, so
/// `void a;` never parses; `void` re-enters only through `retType` (function
/// returns and parameter type lists) and the explicit `VOID`-headed function
/// declaration alternatives. Expressions are layered by precedence, with
/// comparison deliberately non-associative.
///
/// # Panics
///
/// Grammar construction is static; the internal validation cannot fail.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn imp_grammar() -> Grammar<TokenKind, Rule, Ast> {
    use Rule::*;
    use TokenKind::{
        And, Arrow, Assign, Bool, Comma, Divide, Else, Equals, False, Fn, For, Greater,
        GreaterEq, Id as IdTok, If, Input, Int, IntLiteral, LCurly, LParen, Less, LessEq, Minus,
        Not, NotEquals, Or, Output, Plus, PostDec, PostInc, RCurly, RParen, Return, Semicolon,
        StringLiteral, Times, True, Void, While,
    };

    let builder = GrammarBuilder::new(Program)
        // Top level.
        .rule(Program, vec![n(Globals)])
        .rule_with(Globals, vec![], |_| Ast::Program(Vec::new()))
        .rule_with(Globals, vec![n(Globals), n(VarDecl)], |c| {
            let mut items = c.take_or_default("globals").into_list();
            items.push(c.take_or_default("varDecl"));
            Ast::Program(items)
        })
        .rule_with(Globals, vec![n(Globals), n(FnDecl)], |c| {
            let mut items = c.take_or_default("globals").into_list();
            items.push(c.take_or_default("fnDecl"));
            Ast::Program(items)
        })
        // Declarations and types.
        .rule_with(
            VarDecl,
            vec![n(Type), t(IdTok), t(Semicolon)],
            |c| Ast::VarDecl {
                declared: boxed(c.take_or_default("type")),
                name: boxed(c.take_or_default("ID")),
            },
        )
        .rule(Type, vec![n(PrimType)])
        .rule_with(Type, vec![t(Fn), n(FnType)], |c| c.take_or_default("fnType"))
        .rule_with(PrimType, vec![t(Int)], |_| Ast::PrimType(TokenKind::Int))
        .rule_with(PrimType, vec![t(Bool)], |_| Ast::PrimType(TokenKind::Bool))
        .rule_with(
            FnType,
            vec![t(LParen), n(TypeList), t(RParen), t(Arrow), n(RetType)],
            |c| Ast::FnType {
                params: c.take_or_default("typeList").into_list(),
                ret: boxed(c.take_or_default("retType")),
            },
        )
        .rule_with(
            FnType,
            vec![t(LParen), t(RParen), t(Arrow), n(RetType)],
            |c| Ast::FnType {
                params: Vec::new(),
                ret: boxed(c.take_or_default("retType")),
            },
        )
        .rule(RetType, vec![n(Type)])
        .rule_with(RetType, vec![t(Void)], |_| Ast::VoidType)
        .rule_with(TypeList, vec![n(RetType)], |c| {
            Ast::TypeList(vec![c.take_or_default("retType")])
        })
        .rule_with(TypeList, vec![n(TypeList), t(Comma), n(RetType)], |c| {
            let mut items = c.take_or_default("typeList").into_list();
            items.push(c.take_or_default("retType"));
            Ast::TypeList(items)
        })
        .rule_with(
            FnDecl,
            vec![
                n(Type),
                t(IdTok),
                t(LParen),
                t(RParen),
                t(LCurly),
                n(StmtList),
                t(RCurly),
            ],
            |c| Ast::FnDecl {
                ret: boxed(c.take_or_default("type")),
                name: boxed(c.take_or_default("ID")),
                formals: Vec::new(),
                body: c.take_or_default("stmtList").into_list(),
            },
        )
        .rule_with(
            FnDecl,
            vec![
                n(Type),
                t(IdTok),
                t(LParen),
                n(Formals),
                t(RParen),
                t(LCurly),
                n(StmtList),
                t(RCurly),
            ],
            |c| Ast::FnDecl {
                ret: boxed(c.take_or_default("type")),
                name: boxed(c.take_or_default("ID")),
                formals: c.take_or_default("formals").into_list(),
                body: c.take_or_default("stmtList").into_list(),
            },
        )
        .rule_with(
            FnDecl,
            vec![
                t(Void),
                t(IdTok),
                t(LParen),
                t(RParen),
                t(LCurly),
                n(StmtList),
                t(RCurly),
            ],
            |c| Ast::FnDecl {
                ret: boxed(Ast::VoidType),
                name: boxed(c.take_or_default("ID")),
                formals: Vec::new(),
                body: c.take_or_default("stmtList").into_list(),
            },
        )
        .rule_with(
            FnDecl,
            vec![
                t(Void),
                t(IdTok),
                t(LParen),
                n(Formals),
                t(RParen),
                t(LCurly),
                n(StmtList),
                t(RCurly),
            ],
            |c| Ast::FnDecl {
                ret: boxed(Ast::VoidType),
                name: boxed(c.take_or_default("ID")),
                formals: c.take_or_default("formals").into_list(),
                body: c.take_or_default("stmtList").into_list(),
            },
        )
        .rule_with(Formals, vec![n(FormalDecl)], |c| {
            Ast::Formals(vec![c.take_or_default("formalDecl")])
        })
        .rule_with(Formals, vec![n(Formals), t(Comma), n(FormalDecl)], |c| {
            let mut items = c.take_or_default("formals").into_list();
            items.push(c.take_or_default("formalDecl"));
            Ast::Formals(items)
        })
        .rule_with(FormalDecl, vec![n(Type), t(IdTok)], |c| Ast::Formal {
            declared: boxed(c.take_or_default("type")),
            name: boxed(c.take_or_default("ID")),
        });

    // Statements.
    let builder = builder
        .rule_with(StmtList, vec![], |_| Ast::StmtList(Vec::new()))
        .rule_with(StmtList, vec![n(StmtList), n(Stmt)], |c| {
            let mut items = c.take_or_default("stmtList").into_list();
            items.push(c.take_or_default("stmt"));
            Ast::StmtList(items)
        })
        .rule_with(StmtList, vec![n(StmtList), n(BlockStmt)], |c| {
            let mut items = c.take_or_default("stmtList").into_list();
            items.push(c.take_or_default("blockStmt"));
            Ast::StmtList(items)
        })
        .rule_with(
            BlockStmt,
            vec![
                t(While),
                t(LParen),
                n(Exp),
                t(RParen),
                t(LCurly),
                n(StmtList),
                t(RCurly),
            ],
            |c| Ast::While {
                cond: boxed(c.take_or_default("exp")),
                body: c.take_or_default("stmtList").into_list(),
            },
        )
        .rule_with(
            BlockStmt,
            vec![
                t(For),
                t(LParen),
                n(SimpleStmt),
                t(Semicolon),
                n(Exp),
                t(Semicolon),
                n(SimpleStmt),
                t(RParen),
                t(LCurly),
                n(StmtList),
                t(RCurly),
            ],
            |c| Ast::For {
                init: boxed(c.take_or_default("simpleStmt")),
                cond: boxed(c.take_or_default("exp")),
                step: boxed(c.take_or_default("simpleStmt2")),
                body: c.take_or_default("stmtList").into_list(),
            },
        )
        .rule_with(
            BlockStmt,
            vec![
                t(If),
                t(LParen),
                n(Exp),
                t(RParen),
                t(LCurly),
                n(StmtList),
                t(RCurly),
            ],
            |c| Ast::If {
                cond: boxed(c.take_or_default("exp")),
                then_body: c.take_or_default("stmtList").into_list(),
                else_body: None,
            },
        )
        .rule_with(
            BlockStmt,
            vec![
                t(If),
                t(LParen),
                n(Exp),
                t(RParen),
                t(LCurly),
                n(StmtList),
                t(RCurly),
                t(Else),
                t(LCurly),
                n(StmtList),
                t(RCurly),
            ],
            |c| Ast::If {
                cond: boxed(c.take_or_default("exp")),
                then_body: c.take_or_default("stmtList").into_list(),
                else_body: Some(c.take_or_default("stmtList2").into_list()),
            },
        )
        .rule(Stmt, vec![n(VarDecl)])
        .rule_with(Stmt, vec![n(SimpleStmt), t(Semicolon)], |c| {
            c.take_or_default("simpleStmt")
        })
        .rule(SimpleStmt, vec![n(AssignExp)])
        .rule_with(SimpleStmt, vec![n(Id), t(PostInc)], |c| Ast::Post {
            target: boxed(c.take_or_default("id")),
            op: PostOp::Inc,
        })
        .rule_with(SimpleStmt, vec![n(Id), t(PostDec)], |c| Ast::Post {
            target: boxed(c.take_or_default("id")),
            op: PostOp::Dec,
        })
        .rule_with(SimpleStmt, vec![t(Input), n(Id)], |c| {
            Ast::Input(boxed(c.take_or_default("id")))
        })
        .rule_with(SimpleStmt, vec![t(Output), n(Exp)], |c| {
            Ast::Output(boxed(c.take_or_default("exp")))
        })
        .rule_with(SimpleStmt, vec![t(Return), n(Exp)], |c| {
            Ast::Return(Some(boxed(c.take_or_default("exp"))))
        })
        .rule_with(SimpleStmt, vec![t(Return)], |_| Ast::Return(None))
        .rule(SimpleStmt, vec![n(CallExp)]);

    // Expressions, layered by precedence.
    let builder = builder
        .rule_with(AssignExp, vec![n(Id), t(Assign), n(Exp)], |c| Ast::Assign {
            target: boxed(c.take_or_default("id")),
            value: boxed(c.take_or_default("exp")),
        })
        .rule_with(CallExp, vec![n(Id), t(LParen), t(RParen)], |c| Ast::Call {
            callee: boxed(c.take_or_default("id")),
            actuals: Vec::new(),
        })
        .rule_with(
            CallExp,
            vec![n(Id), t(LParen), n(ActualsList), t(RParen)],
            |c| Ast::Call {
                callee: boxed(c.take_or_default("id")),
                actuals: c.take_or_default("actualsList").into_list(),
            },
        )
        .rule_with(ActualsList, vec![n(Exp)], |c| {
            Ast::Actuals(vec![c.take_or_default("exp")])
        })
        .rule_with(ActualsList, vec![n(ActualsList), t(Comma), n(Exp)], |c| {
            let mut items = c.take_or_default("actualsList").into_list();
            items.push(c.take_or_default("exp"));
            Ast::Actuals(items)
        })
        .rule(Exp, vec![n(AssignExp)])
        .rule(Exp, vec![n(ExpOr)])
        .rule(ExpOr, vec![n(ExpAnd)])
        .rule_with(ExpOr, vec![n(ExpAnd), t(Or), n(ExpOr)], |c| {
            binary(c.take_or_default("expAnd"), BinaryOp::Or, c.take_or_default("expOr"))
        })
        .rule(ExpAnd, vec![n(ExpCompare)])
        .rule_with(ExpAnd, vec![n(ExpCompare), t(And), n(ExpAnd)], |c| {
            binary(
                c.take_or_default("expCompare"),
                BinaryOp::And,
                c.take_or_default("expAnd"),
            )
        })
        .rule(ExpCompare, vec![n(ExpPlus)]);

    let comparisons = [
        (Equals, BinaryOp::Equals),
        (NotEquals, BinaryOp::NotEquals),
        (Greater, BinaryOp::Greater),
        (GreaterEq, BinaryOp::GreaterEq),
        (Less, BinaryOp::Less),
        (LessEq, BinaryOp::LessEq),
    ];
    let mut builder = builder;
    for (token, op) in comparisons {
        builder = builder.rule_with(
            ExpCompare,
            vec![n(ExpPlus), t(token), n(ExpPlus)],
            move |c| {
                binary(
                    c.take_or_default("expPlus"),
                    op,
                    c.take_or_default("expPlus2"),
                )
            },
        );
    }

    builder
        .rule(ExpPlus, vec![n(ExpMult)])
        .rule_with(ExpPlus, vec![n(ExpMult), t(Plus), n(ExpPlus)], |c| {
            binary(
                c.take_or_default("expMult"),
                BinaryOp::Plus,
                c.take_or_default("expPlus"),
            )
        })
        .rule_with(ExpPlus, vec![n(ExpMult), t(Minus), n(ExpPlus)], |c| {
            binary(
                c.take_or_default("expMult"),
                BinaryOp::Minus,
                c.take_or_default("expPlus"),
            )
        })
        .rule(ExpMult, vec![n(Term)])
        .rule_with(ExpMult, vec![n(Term), t(Times), n(ExpMult)], |c| {
            binary(
                c.take_or_default("term"),
                BinaryOp::Times,
                c.take_or_default("expMult"),
            )
        })
        .rule_with(ExpMult, vec![n(Term), t(Divide), n(ExpMult)], |c| {
            binary(
                c.take_or_default("term"),
                BinaryOp::Divide,
                c.take_or_default("expMult"),
            )
        })
        .rule(Term, vec![n(Id)])
        .rule(Term, vec![t(IntLiteral)])
        .rule(Term, vec![t(StringLiteral)])
        .rule(Term, vec![t(True)])
        .rule(Term, vec![t(False)])
        .rule_with(Term, vec![t(LParen), n(Exp), t(RParen)], |c| {
            c.take_or_default("exp")
        })
        .rule(Term, vec![n(CallExp)])
        .rule_with(Term, vec![t(Minus), n(Term)], |c| Ast::Unary {
            op: UnaryOp::Neg,
            operand: boxed(c.take_or_default("term")),
        })
        .rule_with(Term, vec![t(Not), n(Term)], |c| Ast::Unary {
            op: UnaryOp::Not,
            operand: boxed(c.take_or_default("term")),
        })
        .rule(Id, vec![t(IdTok)])
        .build()
        .unwrap_or_else(|error| panic!("imp grammar is malformed: {error}"))
}

fn binary(lhs: Ast, op: BinaryOp, rhs: Ast) -> Ast {
    Ast::Binary {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
    }
}
