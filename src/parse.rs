use std::error::Error;

use crate::expr::{Assignment, Expr, Program};
use crate::lex::{Lexer, Token};

/// A token or nonterminal was expected but something else was found.
#[derive(Clone, PartialEq, Eq)]
pub struct ParseError {
    pub expected: String,
    pub found: String,
    pub col: usize,
}

impl ParseError {
    fn boxed(expected: impl Into<String>, found: impl Into<String>, col: usize) -> Box<Self> {
        Box::new(ParseError {
            expected: expected.into(),
            found: found.into(),
            col,
        })
    }
}

/// Recursive-descent parser for one line of input.
///
/// ```text
/// P -> A | E
/// A -> M ':=' E
/// E -> '(' E E ')' | '(' E ')' | '\' V '.' E | V | M
/// ```
pub struct Parser {
    lexer: Lexer,
    depth: usize,
    max_depth: usize,
}

/// Deepest nesting of expressions a line may have.
pub const MAX_DEPTH: usize = 5_000;

pub fn parse(input: &str) -> Result<Program, Box<dyn Error>> {
    Parser::new(input).program()
}

/// Parses a lone expression, rejecting assignments.
pub fn parse_expr(input: &str) -> Result<Box<Expr>, Box<dyn Error>> {
    let mut parser = Parser::new(input);
    let expr = parser.expression()?;
    parser.end()?;
    Ok(expr)
}

impl Parser {
    pub fn new(input: &str) -> Parser {
        Parser::with_max_depth(input, MAX_DEPTH)
    }

    pub fn with_max_depth(input: &str, max_depth: usize) -> Parser {
        Parser {
            lexer: Lexer::new(input),
            depth: 0,
            max_depth,
        }
    }

    pub fn program(&mut self) -> Result<Program, Box<dyn Error>> {
        let program = if self.lexer.peek()? == Token::Macro {
            Program::Assignment(self.assignment()?)
        } else {
            Program::Expr(self.expression()?)
        };
        self.end()?;
        Ok(program)
    }

    pub fn assignment(&mut self) -> Result<Assignment, Box<dyn Error>> {
        if self.lexer.next()? != Token::Macro {
            return Err(self.error("assignment"));
        }
        let target = self.lexer.identifier().to_owned();

        if self.lexer.next()? != Token::Assign {
            return Err(self.error("':='"));
        }

        let value = self.expression()?;
        Ok(Assignment { target, value })
    }

    pub fn expression(&mut self) -> Result<Box<Expr>, Box<dyn Error>> {
        if self.depth == self.max_depth {
            let expected = format!("at most {} levels of nesting", self.max_depth);
            return Err(self.error(&expected));
        }
        self.depth += 1;
        let ret = self.nested_expression();
        self.depth -= 1;
        ret
    }

    fn nested_expression(&mut self) -> Result<Box<Expr>, Box<dyn Error>> {
        use Expr::*;
        match self.lexer.next()? {
            Token::OpParen => {
                let left = self.expression()?;
                if self.lexer.peek()? == Token::ClParen {
                    self.lexer.next()?;
                    return Ok(left);
                }

                let right = self.expression()?;
                if self.lexer.next()? != Token::ClParen {
                    return Err(self.error("')'"));
                }
                Ok(Box::new(Appl(left, right)))
            }
            Token::Lambda => {
                if self.lexer.next()? != Token::Variable {
                    return Err(self.error("variable"));
                }
                let param = self.lexer.identifier().to_owned();

                if self.lexer.next()? != Token::Dot {
                    return Err(self.error("'.'"));
                }

                let body = self.expression()?;
                Ok(Box::new(Abstr(param, body)))
            }
            Token::Variable => Ok(Box::new(Variable(self.lexer.identifier().to_owned()))),
            Token::Macro => Ok(Box::new(Macro(self.lexer.identifier().to_owned()))),
            _ => Err(self.error("expression")),
        }
    }

    fn end(&mut self) -> Result<(), Box<dyn Error>> {
        match self.lexer.next()? {
            Token::Eof => Ok(()),
            _ => Err(self.error("end of input")),
        }
    }

    fn error(&self, expected: &str) -> Box<dyn Error> {
        ParseError::boxed(expected, self.lexer.last_token(), self.lexer.token_col())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::expr_aliases::*;
    use crate::lex::{LexError, LexErrorKind};

    fn parse_err(s: &str) -> ParseError {
        parse(s)
            .unwrap_err()
            .downcast_ref::<ParseError>()
            .expect("not a parse error")
            .clone()
    }

    #[test]
    fn application() {
        assert_eq!(parse_expr("(x x)").unwrap(), appl(var("x"), var("x")));
    }

    #[test]
    fn parens_unwrap() {
        assert_eq!(parse_expr("(x)").unwrap(), var("x"));
        assert_eq!(parse_expr("(((x)))").unwrap(), var("x"));
        assert_eq!(parse_expr("((x) (y))").unwrap(), appl(var("x"), var("y")));
    }

    #[test]
    fn abstraction() {
        assert_eq!(parse_expr(r"\x.x").unwrap(), abstr("x", var("x")));
        assert_eq!(parse_expr("λx.x").unwrap(), abstr("x", var("x")));
        assert_eq!(
            parse_expr(r"\f.\x.(f x)").unwrap(),
            abstr("f", abstr("x", appl(var("f"), var("x"))))
        );
    }

    #[test]
    fn abstraction_in_application() {
        assert_eq!(
            parse_expr(r"(\x.x \y.y)").unwrap(),
            appl(abstr("x", var("x")), abstr("y", var("y")))
        );
    }

    #[test]
    fn macros() {
        assert_eq!(parse_expr("(_I _K)").unwrap(), appl(mac("_I"), mac("_K")));
    }

    #[test]
    fn assignment() {
        assert_eq!(
            parse(r"_I := \x.x").unwrap(),
            Program::Assignment(Assignment {
                target: "_I".into(),
                value: abstr("x", var("x")),
            })
        );
        assert_eq!(parse("x").unwrap(), Program::Expr(var("x")));
    }

    #[test]
    fn missing_paren() {
        let err = parse_err("(x y");
        assert_eq!(err.expected, "')'");
        assert_eq!(err.found, "EOF");
        assert_eq!(err.col, 5);
    }

    #[test]
    fn too_many_in_parens() {
        let err = parse_err("(x y z)");
        assert_eq!(err.expected, "')'");
        assert_eq!(err.found, "z");
    }

    #[test]
    fn trailing_input() {
        let err = parse_err("x y");
        assert_eq!(err.expected, "end of input");
        assert_eq!(err.found, "y");
        assert_eq!(err.col, 3);
    }

    #[test]
    fn bad_abstraction() {
        let err = parse_err(r"\_M.x");
        assert_eq!(err.expected, "variable");
        assert_eq!(err.found, "_M");
        let err = parse_err(r"\x x");
        assert_eq!(err.expected, "'.'");
        assert_eq!(err.found, "x");
    }

    #[test]
    fn bad_assignment() {
        let err = parse_err(r"_M \x.x");
        assert_eq!(err.expected, "':='");
        assert_eq!(err.found, "\\");
        let err = parse_err(r"_M := ");
        assert_eq!(err.expected, "expression");
        assert_eq!(err.found, "EOF");
    }

    #[test]
    fn assignment_is_not_an_expression() {
        let err = parse_err(r"(_M := x)");
        assert_eq!(err.expected, "expression");
        assert_eq!(err.found, ":=");
        assert!(parse_expr(r"_M := x").is_err());
    }

    #[test]
    fn empty_input() {
        let err = parse_err("");
        assert_eq!(err.expected, "expression");
        assert_eq!(err.found, "EOF");
    }

    #[test]
    fn nesting_limit() {
        let mut parser = Parser::with_max_depth(r"\a.\b.(a b)", 4);
        assert_eq!(
            parser.program().unwrap(),
            Program::Expr(abstr("a", abstr("b", appl(var("a"), var("b")))))
        );

        let err = Parser::with_max_depth(r"\a.\b.\c.(a b)", 4)
            .program()
            .unwrap_err();
        let err = err.downcast_ref::<ParseError>().expect("not a parse error");
        assert_eq!(err.expected, "at most 4 levels of nesting");
        assert_eq!(err.found, "(");
    }

    #[test]
    fn lex_errors_pass_through() {
        let err = parse("(x 1)").unwrap_err();
        let lex_err = err.downcast_ref::<LexError>().expect("not a lex error");
        assert!(lex_err.kind == LexErrorKind::BadChar('1'));
    }
}
