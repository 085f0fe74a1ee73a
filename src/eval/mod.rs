use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::{error, fmt};

use crate::expr::Expr;
use crate::parse;

pub mod eval;
pub mod util;
pub use eval::*;


#[derive(Clone, PartialEq, Eq)]
pub enum EvalError {
    UnboundMacro(String),
    StepLimit(u64),
    SizeLimit(usize),
    DepthLimit(usize),
}

impl EvalError {
    /// True when reduction was cut short by a limit rather than failing.
    pub fn is_divergence(&self) -> bool {
        matches!(
            self,
            EvalError::StepLimit(_) | EvalError::SizeLimit(_) | EvalError::DepthLimit(_)
        )
    }
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::UnboundMacro(name) => write!(f, "EvalError: unbound macro {}", name),
            EvalError::StepLimit(max) => write!(
                f,
                "EvalError: did not converge, step limit reached: {}",
                max
            ),
            EvalError::SizeLimit(max) => write!(
                f,
                "EvalError: did not converge, size outgrew maximum size: {}",
                max
            ),
            EvalError::DepthLimit(max) => write!(
                f,
                "EvalError: did not converge, nesting outgrew maximum depth: {}",
                max
            ),
        }
    }
}

impl fmt::Debug for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl error::Error for EvalError {}

#[derive(Clone, Debug)]
struct Def {
    value: Box<Expr>,
    unbounds: HashSet<String>,
}

/// Macro definitions shared by every line of a session.
///
/// A variable left free in a definition stays free wherever the macro is
/// expanded; binders around the reference are renamed instead of capturing it.
#[derive(Clone, Debug, Default)]
pub struct Env {
    defs: HashMap<String, Def>,
    // free variables of all definitions together
    open: HashSet<String>,
}

impl Env {
    pub fn new() -> Env {
        Env::default()
    }

    /// Binds `name`, replacing any earlier definition.
    pub fn define(&mut self, name: impl Into<String>, expr: Box<Expr>) {
        let unbounds = expr.unbounds();
        self.defs.insert(
            name.into(),
            Def {
                value: expr,
                unbounds,
            },
        );
        self.open = self
            .defs
            .values()
            .flat_map(|d| d.unbounds.iter().cloned())
            .collect();
    }

    pub fn resolve(&self, name: &str) -> Result<&Expr, EvalError> {
        self.defs
            .get(name)
            .map(|d| d.value.as_ref())
            .ok_or_else(|| EvalError::UnboundMacro(name.into()))
    }

    /// Free variables of the definition of `name`, if it is defined.
    pub fn unbounds_of(&self, name: &str) -> Option<&HashSet<String>> {
        self.defs.get(name).map(|d| &d.unbounds)
    }

    /// True when some definition has `var` free.
    pub fn is_open(&self, var: &str) -> bool {
        self.open.contains(var)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.defs.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Definitions sorted by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Expr)> {
        self.names()
            .into_iter()
            .filter_map(move |n| self.defs.get(n).map(|d| (n, d.value.as_ref())))
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }
}

/// Bounds on a single reduction. `None` disables the check.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Limits {
    pub max_steps: Option<u64>,
    pub max_size: Option<usize>,
    /// Also bounds recursion while reducing, so keep it well below what the stack holds.
    pub max_depth: Option<usize>,
}

impl Limits {
    pub fn unbounded() -> Limits {
        Limits {
            max_steps: None,
            max_size: None,
            max_depth: None,
        }
    }
}

impl Default for Limits {
    fn default() -> Limits {
        Limits {
            max_steps: Some(1_000_000),
            max_size: Some(1_000_000),
            max_depth: Some(5_000),
        }
    }
}

/// Lexes, parses and evaluates one line against `env`.
pub fn interpret(
    line: &str,
    env: &mut Env,
    limits: &Limits,
) -> Result<(Box<Expr>, Stats), Box<dyn Error>> {
    let program = parse::parse(line)?;
    Ok(evaluate(program, env, limits)?)
}
