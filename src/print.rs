use std::{error, fmt};

use crate::expr::{Assignment, Program};
use crate::lex::{self, LexErrorKind};
use crate::parse;

impl error::Error for lex::LexError {}

impl fmt::Display for lex::LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let lex::LexError { kind, col } = self;
        write!(f, "LexError({}): ", col)?;
        match kind {
            LexErrorKind::BadChar(c) => write!(f, "unexpected character '{}'", c.escape_default()),
            LexErrorKind::Expected { expected, found } => {
                write!(f, "expected {}, found {}", expected, found)
            }
            LexErrorKind::EndOfInput => write!(f, "unexpected end of input"),
        }
    }
}

impl fmt::Debug for lex::LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl error::Error for parse::ParseError {}

impl fmt::Display for parse::ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parse::ParseError {
            expected,
            found,
            col,
        } = self;
        write!(f, "ParseError({}): expected {}, found {}", col, expected, found)
    }
}

impl fmt::Debug for parse::ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl fmt::Display for lex::Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use lex::Token::*;
        match &self {
            Eof => write!(f, "EOF"),
            OpParen => write!(f, "("),
            ClParen => write!(f, ")"),
            Lambda => write!(f, "\\"),
            Dot => write!(f, "."),
            Assign => write!(f, ":="),
            Macro => write!(f, "macro"),
            Variable => write!(f, "variable"),
        }
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} := {}", self.target, self.value)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Program::Assignment(a) => fmt::Display::fmt(a, f),
            Program::Expr(e) => fmt::Display::fmt(e, f),
        }
    }
}
