use empty_box::EmptyBox;
use std::fmt;

use super::util::*;
use super::{Env, EvalError, Limits};
use crate::expr::{Assignment, Expr, Program};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    reduced: bool,
    pub betas: u64,
    pub expansions: u64,
    pub max_size: usize,
    pub max_depth: usize,
}

impl Stats {
    pub fn steps(&self) -> u64 {
        self.betas + self.expansions
    }
}

/// Evaluates one program. An assignment binds the normal form of its
/// right-hand side, and the environment is only touched once that succeeded.
pub fn evaluate(
    program: Program,
    env: &mut Env,
    limits: &Limits,
) -> Result<(Box<Expr>, Stats), EvalError> {
    match program {
        Program::Expr(expr) => reduce(expr, env, limits),
        Program::Assignment(Assignment { target, value }) => {
            let (value, stats) = reduce(value, env, limits)?;
            env.define(target, value.clone());
            Ok((value, stats))
        }
    }
}

/// Normal-order reduction to normal form, one leftmost-outermost rewrite
/// at a time. Limits are only checked between rewrites.
pub fn reduce(
    mut expr: Box<Expr>,
    env: &Env,
    limits: &Limits,
) -> Result<(Box<Expr>, Stats), EvalError> {
    let mut stats = Stats::default();
    check(&expr, limits, &mut stats)?;
    loop {
        stats.reduced = false;
        expr = step(expr, env, &mut stats)?;
        if !stats.reduced {
            break;
        }
        if let Some(max) = limits.max_steps {
            if stats.steps() > max {
                return Err(EvalError::StepLimit(max));
            }
        }
        check(&expr, limits, &mut stats)?;
    }
    Ok((expr, stats))
}

fn check(expr: &Expr, limits: &Limits, st: &mut Stats) -> Result<(), EvalError> {
    let size = expr.size();
    st.max_size = st.max_size.max(size);
    if let Some(max) = limits.max_size {
        if size > max {
            return Err(EvalError::SizeLimit(max));
        }
    }

    let depth = expr.depth();
    st.max_depth = st.max_depth.max(depth);
    if let Some(max) = limits.max_depth {
        if depth > max {
            return Err(EvalError::DepthLimit(max));
        }
    }
    Ok(())
}

fn step(expr: Box<Expr>, env: &Env, st: &mut Stats) -> Result<Box<Expr>, EvalError> {
    use Expr::*;
    let (ex, eb) = EmptyBox::take(expr);
    Ok(match ex {
        // Irreducable
        Variable(_) => eb.put(ex),

        // Expansion:
        //   _M  =>  Env[_M]
        Macro(ref name) => {
            let value = env.resolve(name)?.clone();
            st.expansions += 1;
            st.reduced = true;
            eb.put(value)
        }

        // Alpha conversion when a macro in the body has `a` free:
        //   \a.E  =>  \b.E[a->b]
        //   Reduce[\a.E]  =>  \a.Reduce[E]
        Abstr(var, body) => {
            let (var, body) = if env.is_open(&var) && captures(&body, &var, env) {
                let mut taken = unbounds_in(&body, env);
                taken.insert(var.clone());
                let fresh = alpha_next(&taken);
                let body = replace_var(body, &var, &fresh, env);
                (fresh, body)
            } else {
                (var, body)
            };
            eb.put(Abstr(var, step(body, env, st)?))
        }

        Appl(a, to) => {
            let (fun, fun_eb) = EmptyBox::take(a);
            match fun {
                // Beta reduction:
                //   (\x.A)B  =>  A[x->B]
                Abstr(from, body) => {
                    st.betas += 1;
                    st.reduced = true;
                    substitute(body, &from, &to, env)
                }
                //   Reduce[AB]  =>  Reduce[A]B, or else A Reduce[B]
                other => {
                    let a = step(fun_eb.put(other), env, st)?;
                    if st.reduced {
                        eb.put(Appl(a, to))
                    } else {
                        eb.put(Appl(a, step(to, env, st)?))
                    }
                }
            }
        }
    })
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Stats {
            betas,
            expansions,
            max_size,
            max_depth,
            ..
        } = *self;
        write!(
            f,
            r#"Stats:
	Beta reductions: {}
	Macro expansions: {}
	Maximum size: {}
	Maximum depth: {}"#,
            betas, expansions, max_size, max_depth
        )
    }
}
