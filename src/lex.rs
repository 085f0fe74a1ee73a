#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Token {
    Eof,
    OpParen,
    ClParen,
    Lambda,
    Dot,
    Assign,
    Macro,
    Variable,
}

#[derive(Clone, PartialEq, Eq)]
pub enum LexErrorKind {
    BadChar(char),
    Expected { expected: &'static str, found: String },
    EndOfInput,
}

#[derive(Clone, PartialEq, Eq)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub col: usize,
}

/// Letters of any script. Letter-like numerals such as `Ⅻ` are excluded.
pub fn is_letter(c: char) -> bool {
    c.is_alphabetic() && !c.is_numeric()
}

/// On-demand scanner over a single line of input.
///
/// Lookahead is done by saving and restoring the cursor, so there is never
/// more than one token in flight.
pub struct Lexer {
    input: Vec<char>,
    idx: usize,
    start: usize,
    past_end: bool,
    identifier: String,
    last_token: String,
}

struct Cursor {
    idx: usize,
    start: usize,
    past_end: bool,
    identifier: String,
    last_token: String,
}

impl Lexer {
    pub fn new(input: &str) -> Lexer {
        Lexer {
            input: input.chars().collect(),
            idx: 0,
            start: 0,
            past_end: false,
            identifier: String::new(),
            last_token: String::new(),
        }
    }

    /// Column (1-based) of the next unread character.
    pub fn position(&self) -> usize {
        self.idx + 1
    }

    /// Column (1-based) where the most recently produced token starts.
    pub fn token_col(&self) -> usize {
        self.start + 1
    }

    /// Text of the most recently scanned macro or variable name.
    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    /// Surface text of the most recently produced token, `EOF` at the end.
    pub fn last_token(&self) -> &str {
        &self.last_token
    }

    pub fn peek(&mut self) -> Result<Token, LexError> {
        let saved = self.save();
        let tok = self.next();
        self.restore(saved);
        tok
    }

    pub fn next(&mut self) -> Result<Token, LexError> {
        use Token::*;

        if self.past_end {
            return Err(self.error(LexErrorKind::EndOfInput));
        }

        while matches!(self.current(), Some(c) if c.is_whitespace()) {
            self.idx += 1;
        }

        let c = match self.current() {
            Some(c) => c,
            None => {
                self.start = self.idx;
                self.past_end = true;
                self.last_token = "EOF".into();
                return Ok(Eof);
            }
        };

        let start = self.idx;
        self.idx += 1;
        let tok = match c {
            '(' => OpParen,
            ')' => ClParen,
            '\\' | 'λ' => Lambda,
            '.' => Dot,
            ':' => {
                self.expect_next("=", |c| c == '=')?;
                self.idx += 1;
                Assign
            }
            '_' => {
                self.expect_next("identifier", is_letter)?;
                self.identifier = format!("_{}", self.scan_letters());
                Macro
            }
            c if is_letter(c) => {
                self.idx = start;
                self.identifier = self.scan_letters();
                Variable
            }
            c => {
                self.idx = start;
                return Err(self.error(LexErrorKind::BadChar(c)));
            }
        };
        self.start = start;
        self.last_token = self.input[start..self.idx].iter().collect();
        Ok(tok)
    }

    fn current(&self) -> Option<char> {
        self.input.get(self.idx).copied()
    }

    fn expect_next(
        &self,
        expected: &'static str,
        accept: impl Fn(char) -> bool,
    ) -> Result<(), LexError> {
        match self.current() {
            Some(c) if accept(c) => Ok(()),
            other => Err(self.error(LexErrorKind::Expected {
                expected,
                found: other.map_or_else(|| "EOF".into(), String::from),
            })),
        }
    }

    fn scan_letters(&mut self) -> String {
        let start = self.idx;
        while matches!(self.current(), Some(c) if is_letter(c)) {
            self.idx += 1;
        }
        self.input[start..self.idx].iter().collect()
    }

    fn error(&self, kind: LexErrorKind) -> LexError {
        LexError {
            kind,
            col: self.position(),
        }
    }

    fn save(&self) -> Cursor {
        Cursor {
            idx: self.idx,
            start: self.start,
            past_end: self.past_end,
            identifier: self.identifier.clone(),
            last_token: self.last_token.clone(),
        }
    }

    fn restore(&mut self, c: Cursor) {
        self.idx = c.idx;
        self.start = c.start;
        self.past_end = c.past_end;
        self.identifier = c.identifier;
        self.last_token = c.last_token;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Token::*;

    fn tokens(s: &str) -> Result<Vec<Token>, LexError> {
        let mut lexer = Lexer::new(s);
        let mut vec = Vec::new();
        loop {
            let tok = lexer.next()?;
            vec.push(tok);
            if tok == Eof {
                return Ok(vec);
            }
        }
    }

    #[test]
    fn all_tokens() {
        assert_eq!(
            tokens("_M := (\\x.x λy.y)").unwrap(),
            vec![
                Macro, Assign, OpParen, Lambda, Variable, Dot, Variable, Lambda, Variable, Dot,
                Variable, ClParen, Eof
            ]
        );
    }

    #[test]
    fn identifiers() {
        let mut lexer = Lexer::new("_foo foo");
        assert_eq!(lexer.next().unwrap(), Macro);
        assert_eq!(lexer.identifier(), "_foo");
        assert_eq!(lexer.last_token(), "_foo");
        assert_eq!(lexer.next().unwrap(), Variable);
        assert_eq!(lexer.identifier(), "foo");
        assert_eq!(lexer.next().unwrap(), Eof);
        assert_eq!(lexer.last_token(), "EOF");
    }

    #[test]
    fn letters_stop_identifiers() {
        let mut lexer = Lexer::new("ab1");
        assert_eq!(lexer.next().unwrap(), Variable);
        assert_eq!(lexer.identifier(), "ab");
        let err = lexer.next().unwrap_err();
        assert!(err.kind == LexErrorKind::BadChar('1'));
        assert_eq!(err.col, 3);
    }

    #[test]
    fn unicode_letters() {
        let mut lexer = Lexer::new("ä λβ _Ωx");
        assert_eq!(lexer.next().unwrap(), Variable);
        assert_eq!(lexer.identifier(), "ä");
        assert_eq!(lexer.next().unwrap(), Lambda);
        assert_eq!(lexer.next().unwrap(), Variable);
        assert_eq!(lexer.identifier(), "β");
        assert_eq!(lexer.next().unwrap(), Macro);
        assert_eq!(lexer.identifier(), "_Ωx");
    }

    #[test]
    fn letter_numerals_are_not_letters() {
        let mut lexer = Lexer::new("aⅫ");
        assert_eq!(lexer.next().unwrap(), Variable);
        assert_eq!(lexer.identifier(), "a");
        let err = lexer.next().unwrap_err();
        assert!(err.kind == LexErrorKind::BadChar('Ⅻ'));
        let err = tokens("_Ⅻ").unwrap_err();
        assert!(
            err.kind
                == LexErrorKind::Expected {
                    expected: "identifier",
                    found: "Ⅻ".into()
                }
        );
    }

    #[test]
    fn bad_macros() {
        let err = tokens("_1").unwrap_err();
        assert!(
            err.kind
                == LexErrorKind::Expected {
                    expected: "identifier",
                    found: "1".into()
                }
        );
        let err = tokens("_").unwrap_err();
        assert!(
            err.kind
                == LexErrorKind::Expected {
                    expected: "identifier",
                    found: "EOF".into()
                }
        );
    }

    #[test]
    fn bad_assign() {
        let err = tokens(":x").unwrap_err();
        assert!(
            err.kind
                == LexErrorKind::Expected {
                    expected: "=",
                    found: "x".into()
                }
        );
        assert!(tokens(":").is_err());
    }

    #[test]
    fn peek_is_idempotent() {
        let input = "  (foo _bar)";
        let mut lexer = Lexer::new(input);
        let mut plain = Lexer::new(input);
        loop {
            let a = lexer.peek().unwrap();
            assert_eq!(a, lexer.peek().unwrap());
            assert_eq!(a, lexer.next().unwrap());
            assert_eq!(a, plain.next().unwrap());
            assert_eq!(lexer.position(), plain.position());
            if a == Eof {
                break;
            }
        }
    }

    #[test]
    fn peek_keeps_last_token() {
        let mut lexer = Lexer::new("x y");
        lexer.next().unwrap();
        assert_eq!(lexer.peek().unwrap(), Variable);
        assert_eq!(lexer.identifier(), "x");
        assert_eq!(lexer.last_token(), "x");
    }

    #[test]
    fn eof_only_once() {
        let mut lexer = Lexer::new("   ");
        assert_eq!(lexer.next().unwrap(), Eof);
        assert!(lexer.next().unwrap_err().kind == LexErrorKind::EndOfInput);
        assert!(lexer.peek().is_err());
    }
}
