//! The Imp abstract syntax tree.

use compact_str::CompactString;

use super::token::{Token, TokenKind};

/// Binary operators, strongest-binding last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Equals,
    NotEquals,
    Greater,
    GreaterEq,
    Less,
    LessEq,
    Plus,
    Minus,
    Times,
    Divide,
}

/// Prefix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Not,
    Neg,
}

/// Postfix increment and decrement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostOp {
    Inc,
    Dec,
}

/// A closed Imp syntax tree.
///
/// `Empty` is the value of constructs with nothing to say (and the default
/// the parser synthesizes for action-less multi-symbol reductions); `Leaf`
/// carries tokens that shifted onto the value stack but were consumed only
/// for their presence, such as punctuation inside an acted-on alternative.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Ast {
    #[default]
    Empty,
    Leaf(Token),
    Id(CompactString),
    IntLit(i64),
    StrLit(CompactString),
    BoolLit(bool),
    Program(Vec<Ast>),
    VarDecl {
        declared: Box<Ast>,
        name: Box<Ast>,
    },
    PrimType(TokenKind),
    VoidType,
    FnType {
        params: Vec<Ast>,
        ret: Box<Ast>,
    },
    TypeList(Vec<Ast>),
    FnDecl {
        ret: Box<Ast>,
        name: Box<Ast>,
        formals: Vec<Ast>,
        body: Vec<Ast>,
    },
    Formal {
        declared: Box<Ast>,
        name: Box<Ast>,
    },
    Formals(Vec<Ast>),
    StmtList(Vec<Ast>),
    While {
        cond: Box<Ast>,
        body: Vec<Ast>,
    },
    For {
        init: Box<Ast>,
        cond: Box<Ast>,
        step: Box<Ast>,
        body: Vec<Ast>,
    },
    If {
        cond: Box<Ast>,
        then_body: Vec<Ast>,
        else_body: Option<Vec<Ast>>,
    },
    Post {
        target: Box<Ast>,
        op: PostOp,
    },
    Input(Box<Ast>),
    Output(Box<Ast>),
    Return(Option<Box<Ast>>),
    Assign {
        target: Box<Ast>,
        value: Box<Ast>,
    },
    Call {
        callee: Box<Ast>,
        actuals: Vec<Ast>,
    },
    Actuals(Vec<Ast>),
    Binary {
        op: BinaryOp,
        lhs: Box<Ast>,
        rhs: Box<Ast>,
    },
    Unary {
        op: UnaryOp,
        operand: Box<Ast>,
    },
}

impl Ast {
    /// Unwrap a list-carrying node into its elements. Non-list nodes come
    /// back as a singleton, `Empty` as nothing.
    #[must_use]
    pub fn into_list(self) -> Vec<Ast> {
        match self {
            Self::Empty => Vec::new(),
            Self::Program(items)
            | Self::TypeList(items)
            | Self::Formals(items)
            | Self::StmtList(items)
            | Self::Actuals(items) => items,
            other => vec![other],
        }
    }
}

impl From<Token> for Ast {
    fn from(token: Token) -> Self {
        match token.kind {
            TokenKind::Id => Self::Id(token.text),
            TokenKind::IntLiteral => Self::IntLit(token.text.parse().unwrap_or_default()),
            TokenKind::StringLiteral => Self::StrLit(token.text),
            TokenKind::True => Self::BoolLit(true),
            TokenKind::False => Self::BoolLit(false),
            _ => Self::Leaf(token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::Position;

    #[test]
    fn literal_tokens_become_typed_leaves() {
        let position = Position::new(1, 1);
        assert_eq!(
            Ast::from(Token::new(TokenKind::IntLiteral, "42", position)),
            Ast::IntLit(42)
        );
        assert_eq!(
            Ast::from(Token::new(TokenKind::True, "true", position)),
            Ast::BoolLit(true)
        );
        assert_eq!(
            Ast::from(Token::new(TokenKind::Id, "x", position)),
            Ast::Id(CompactString::from("x"))
        );
    }

    #[test]
    fn punctuation_tokens_stay_leaves() {
        let token = Token::new(TokenKind::Semicolon, ";", Position::new(1, 5));
        assert_eq!(Ast::from(token.clone()), Ast::Leaf(token));
    }

    #[test]
    fn into_list_flattens_list_nodes_only() {
        let list = Ast::StmtList(vec![Ast::Empty, Ast::IntLit(1)]);
        assert_eq!(list.into_list().len(), 2);
        assert_eq!(Ast::IntLit(7).into_list(), vec![Ast::IntLit(7)]);
        assert!(Ast::Empty.into_list().is_empty());
    }
}
