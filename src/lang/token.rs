//! Token kinds and tokens of Imp.

use compact_str::CompactString;

use crate::grammar::{self, Position, Terminal};

/// The terminal alphabet of Imp.
///
/// `name` returns the tag the grammar and the recognizer key on; tags are
/// the conventional upper-case lexer spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    And,
    Arrow,
    Assign,
    Bool,
    Comma,
    Divide,
    Else,
    Equals,
    False,
    Fn,
    For,
    Greater,
    GreaterEq,
    Id,
    If,
    Input,
    Int,
    IntLiteral,
    LCurly,
    Less,
    LessEq,
    LParen,
    Minus,
    Not,
    NotEquals,
    Or,
    Output,
    Plus,
    PostDec,
    PostInc,
    RCurly,
    Return,
    RParen,
    Semicolon,
    StringLiteral,
    Times,
    True,
    Void,
    While,
}

impl Terminal for TokenKind {
    fn name(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Arrow => "ARROW",
            Self::Assign => "ASSIGN",
            Self::Bool => "BOOL",
            Self::Comma => "COMMA",
            Self::Divide => "DIVIDE",
            Self::Else => "ELSE",
            Self::Equals => "EQUALS",
            Self::False => "FALSE",
            Self::Fn => "FN",
            Self::For => "FOR",
            Self::Greater => "GREATER",
            Self::GreaterEq => "GREATEREQ",
            Self::Id => "ID",
            Self::If => "IF",
            Self::Input => "INPUT",
            Self::Int => "INT",
            Self::IntLiteral => "INTLITERAL",
            Self::LCurly => "LCURLY",
            Self::Less => "LESS",
            Self::LessEq => "LESSEQ",
            Self::LParen => "LPAREN",
            Self::Minus => "MINUS",
            Self::Not => "NOT",
            Self::NotEquals => "NOTEQUALS",
            Self::Or => "OR",
            Self::Output => "OUTPUT",
            Self::Plus => "PLUS",
            Self::PostDec => "POSTDEC",
            Self::PostInc => "POSTINC",
            Self::RCurly => "RCURLY",
            Self::Return => "RETURN",
            Self::RParen => "RPAREN",
            Self::Semicolon => "SEMICOL",
            Self::StringLiteral => "STRINGLITERAL",
            Self::Times => "TIMES",
            Self::True => "TRUE",
            Self::Void => "VOID",
            Self::While => "WHILE",
        }
    }
}

/// A lexed Imp token: kind, source text, and position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: CompactString,
    pub position: Position,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, text: &str, position: Position) -> Self {
        Self {
            kind,
            text: CompactString::from(text),
            position,
        }
    }
}

impl grammar::Token for Token {
    type Kind = TokenKind;

    fn kind(&self) -> TokenKind {
        self.kind
    }

    fn position(&self) -> Position {
        self.position
    }
}
