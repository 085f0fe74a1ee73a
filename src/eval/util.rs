use crate::expr::Expr;
use empty_box::EmptyBox;
use std::collections::HashSet;

use super::Env;

/// Free variables of `expr`, including those of the macros it references.
pub fn unbounds_in(expr: &Expr, env: &Env) -> HashSet<String> {
    match expr {
        Expr::Macro(n) => env.unbounds_of(n).cloned().unwrap_or_default(),
        Expr::Variable(_) => expr.unbounds(),
        Expr::Abstr(v, b) => {
            let mut set = unbounds_in(b, env);
            set.remove(v);
            set
        }
        Expr::Appl(a, b) => {
            let mut set = unbounds_in(a, env);
            set.extend(unbounds_in(b, env));
            set
        }
    }
}

/// Whether a binder `\var.` around `expr` would capture a free variable of
/// some macro referenced in `expr`.
pub fn captures(expr: &Expr, var: &str, env: &Env) -> bool {
    match expr {
        Expr::Variable(_) => false,
        Expr::Macro(n) => env.unbounds_of(n).map_or(false, |unb| unb.contains(var)),
        Expr::Abstr(v, b) => v != var && captures(b, var, env),
        Expr::Appl(a, b) => captures(a, var, env) || captures(b, var, env),
    }
}

/// `expr[from := to]`, renaming binders that would capture a free variable of `to`.
///
/// Macro references are left in place. They never contain `from`, but their
/// free variables count as free variables of `to`.
pub fn substitute(expr: Box<Expr>, from: &str, to: &Expr, env: &Env) -> Box<Expr> {
    let to_unb = unbounds_in(to, env);
    subst(expr, from, to, &to_unb, env)
}

fn subst(
    expr: Box<Expr>,
    from: &str,
    to: &Expr,
    to_unb: &HashSet<String>,
    env: &Env,
) -> Box<Expr> {
    use Expr::*;
    let (ex, eb) = EmptyBox::take(expr);
    match ex {
        Macro(_) => eb.put(ex),
        Variable(ref v) if v == from => eb.put(to.clone()),
        Variable(_) => eb.put(ex),
        Appl(a, b) => eb.put(Appl(
            subst(a, from, to, to_unb, env),
            subst(b, from, to, to_unb, env),
        )),
        Abstr(v, b) => eb.put(if v == from {
            // Shadowed
            Abstr(v, b)
        } else if to_unb.contains(&v) && b.occurs_free(from) {
            let (v, b) = alpha(v, b, from, to_unb, env);
            Abstr(v, subst(b, from, to, to_unb, env))
        } else {
            Abstr(v, subst(b, from, to, to_unb, env))
        }),
    }
}

/// `a`, `b`, ..., `z`, `aa`, `ab`, ...
pub fn nth_name(mut n: usize) -> String {
    let mut ret = Vec::new();
    loop {
        ret.push(b'a' + (n % 26) as u8);
        if n < 26 {
            break;
        }
        n = n / 26 - 1;
    }
    ret.iter().rev().map(|&c| c as char).collect()
}

pub fn alpha_next(taken: &HashSet<String>) -> String {
    (0..)
        .map(nth_name)
        .find(|name| !taken.contains(name))
        .unwrap_or_default()
}

/// Renames the parameter of `\par.body` to a name free in neither `body`
/// nor `to`, and distinct from `from`.
pub fn alpha(
    par: String,
    body: Box<Expr>,
    from: &str,
    to_taken: &HashSet<String>,
    env: &Env,
) -> (String, Box<Expr>) {
    let mut taken = unbounds_in(&body, env);
    taken.extend(to_taken.iter().cloned());
    taken.insert(from.to_owned());
    taken.insert(par.clone());
    let unused = alpha_next(&taken);
    let body = replace_var(body, &par, &unused, env);
    (unused, body)
}

/// Renames free occurrences of `from` to `to`.
pub fn replace_var(expr: Box<Expr>, from: &str, to: &str, env: &Env) -> Box<Expr> {
    substitute(expr, from, &Expr::Variable(to.to_owned()), env)
}
