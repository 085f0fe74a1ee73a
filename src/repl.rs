use crate::eval::{self, Env, Limits};
use crate::expr::Program;
use crate::lex::{Lexer, Token};
use crate::parse;

use std::error::Error;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

#[derive(Copy, Clone, Debug, Default)]
pub struct Config {
    pub limits: Limits,
    /// Print reduction statistics to stderr after every evaluation.
    pub stats: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reply {
    Print(String),
    Nothing,
    Quit,
}

/// One interactive session: the macro environment plus settings.
pub struct Session {
    pub env: Env,
    pub config: Config,
}

const HELP: &str = r#"Enter an expression to reduce it, or `_Name := expression` to define a macro.
Commands:
	:q, :quit, :exit   leave the REPL
	:defs              list definitions
	:names             list macro names
	:tree <expr>       show the syntax tree of an expression
	:tokens <line>     show the tokens of a line
	:num <expr>        reduce and read back a Church numeral
	:clear, :cl        clear the screen
	:h, :help          this text"#;

impl Session {
    pub fn new(config: Config) -> Session {
        Session {
            env: Env::new(),
            config,
        }
    }

    /// Evaluates every line of `path`, see [`Session::load_str`].
    pub fn load(&mut self, path: &Path) -> Result<(), Box<dyn Error>> {
        let text = fs::read_to_string(path)?;
        self.load_str(&path.display().to_string(), &text)
    }

    /// Evaluates each line of `text`. Blank lines and lines starting with
    /// `#` are skipped. Stops at the first error.
    pub fn load_str(&mut self, name: &str, text: &str) -> Result<(), Box<dyn Error>> {
        for (n, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            self.eval(line)
                .map_err(|err| format!("{}:{}: {}", name, n + 1, err))?;
        }
        Ok(())
    }

    /// Handles one line of input, either a command or a program.
    ///
    /// Commands are a `:` directly followed by an ASCII letter, so stray
    /// assignment syntax such as `:= x` still reaches the parser.
    pub fn handle(&mut self, line: &str) -> Result<Reply, Box<dyn Error>> {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            Ok(Reply::Nothing)
        } else if let Some(cmd) = command_name(trimmed) {
            self.command(cmd)
        } else {
            Ok(Reply::Print(self.eval(trimmed)?))
        }
    }

    fn eval(&mut self, line: &str) -> Result<String, Box<dyn Error>> {
        let program = parse::parse(line)?;
        let (result, stats) = eval::evaluate(program, &mut self.env, &self.config.limits)?;
        if self.config.stats {
            eprintln!("{}", stats);
        }
        Ok(result.to_string())
    }

    fn command(&mut self, cmd: &str) -> Result<Reply, Box<dyn Error>> {
        let (name, rest) = match cmd.split_once(char::is_whitespace) {
            Some((name, rest)) => (name, rest.trim()),
            None => (cmd, ""),
        };

        Ok(Reply::Print(match name {
            "quit" | "q" | "exit" => return Ok(Reply::Quit),
            "defs" => self
                .env
                .iter()
                .map(|(k, v)| format!("{} := {}", k, v))
                .collect::<Vec<_>>()
                .join("\n"),
            "names" => self.env.names().join(", "),
            "tree" => format!("{:#}", parse::parse_expr(rest)?)
                .trim_end()
                .to_owned(),
            "tokens" => tokens(rest)?,
            "num" => {
                let program = Program::Expr(parse::parse_expr(rest)?);
                let (result, _) = eval::evaluate(program, &mut self.env, &self.config.limits)?;
                match result.try_unchurch_num() {
                    Some(n) => n.to_string(),
                    None => format!("not a Church numeral: {}", result),
                }
            }
            "clear" | "cl" => "\x1B[2J\x1B[H".to_owned(),
            "help" | "h" => HELP.to_owned(),
            _ => format!("Unknown command: {}", name),
        }))
    }
}

fn command_name(line: &str) -> Option<&str> {
    line.strip_prefix(':')
        .filter(|cmd| cmd.starts_with(|c: char| c.is_ascii_alphabetic()))
}

fn tokens(line: &str) -> Result<String, Box<dyn Error>> {
    let mut lexer = Lexer::new(line);
    let mut out = Vec::new();
    loop {
        let tok = lexer.next()?;
        out.push(match tok {
            Token::Macro | Token::Variable => format!("{}({})", tok, lexer.identifier()),
            _ => tok.to_string(),
        });
        if tok == Token::Eof {
            return Ok(out.join(" "));
        }
    }
}

pub fn repl(mut session: Session) -> Result<(), Box<dyn Error>> {
    let mut buf = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;

        buf.clear();
        if io::stdin().read_line(&mut buf)? == 0 {
            println!();
            return Ok(());
        }

        match session.handle(&buf) {
            Ok(Reply::Print(s)) => println!("{}", s),
            Ok(Reply::Nothing) => {}
            Ok(Reply::Quit) => return Ok(()),
            Err(err) => println!("{}", err),
        }
    }
}
