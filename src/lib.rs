pub mod eval;
#[macro_use]
pub mod expr;
pub mod lex;
pub mod parse;
mod print;
pub mod repl;
