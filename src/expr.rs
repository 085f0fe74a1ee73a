use std::{collections::HashSet, fmt};

/// A lambda expression. Macro references are expanded during reduction.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Expr {
    Variable(String),
    Macro(String),
    Abstr(String, Box<Expr>),
    Appl(Box<Expr>, Box<Expr>),
}

/// `_M := E`. Binds a macro name; it is not an expression itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Assignment {
    pub target: String,
    pub value: Box<Expr>,
}

/// Root of one parsed input line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Program {
    Assignment(Assignment),
    Expr(Box<Expr>),
}

impl Expr {
    /// Number of nodes in the tree.
    pub fn size(&self) -> usize {
        let mut ret = 0;
        let mut stack: Vec<&Expr> = Vec::new();
        let mut next = self;
        loop {
            ret += 1;
            next = match next {
                Expr::Variable(_) | Expr::Macro(_) => match stack.pop() {
                    Some(e) => e,
                    None => break,
                },
                Expr::Abstr(_, body) => body.as_ref(),
                Expr::Appl(a, b) => {
                    stack.push(a.as_ref());
                    b.as_ref()
                }
            }
        }
        ret
    }

    /// Length of the longest path from the root, a lone variable being 1.
    pub fn depth(&self) -> usize {
        let mut ret = 0;
        let mut stack: Vec<(&Expr, usize)> = vec![(self, 1)];
        while let Some((next, d)) = stack.pop() {
            ret = ret.max(d);
            match next {
                Expr::Variable(_) | Expr::Macro(_) => {}
                Expr::Abstr(_, body) => stack.push((body.as_ref(), d + 1)),
                Expr::Appl(a, b) => {
                    stack.push((a.as_ref(), d + 1));
                    stack.push((b.as_ref(), d + 1));
                }
            }
        }
        ret
    }

    /// Variables occurring free. Macro references are opaque here.
    pub fn unbounds(&self) -> HashSet<String> {
        match self {
            Expr::Variable(v) => {
                let mut set = HashSet::new();
                set.insert(v.clone());
                set
            }
            Expr::Macro(_) => HashSet::new(),
            Expr::Abstr(v, b) => {
                let mut set = b.unbounds();
                set.remove(v);
                set
            }
            Expr::Appl(a, b) => {
                let mut set = a.unbounds();
                set.extend(b.unbounds());
                set
            }
        }
    }

    pub fn occurs_free(&self, name: &str) -> bool {
        match self {
            Expr::Variable(v) => v == name,
            Expr::Macro(_) => false,
            Expr::Abstr(v, b) => v != name && b.occurs_free(name),
            Expr::Appl(a, b) => a.occurs_free(name) || b.occurs_free(name),
        }
    }

    pub fn is_normal(&self) -> bool {
        match self {
            Expr::Variable(_) => true,
            Expr::Macro(_) => false,
            Expr::Abstr(_, b) => b.is_normal(),
            Expr::Appl(a, b) => !matches!(**a, Expr::Abstr(..)) && a.is_normal() && b.is_normal(),
        }
    }

    /// `\f.\x.(f (f ... x))` with `n` applications of `f`.
    pub fn church_num(mut n: u32) -> Box<Expr> {
        use Expr::*;
        let mut ret = Box::new(Variable("x".into()));
        while n > 0 {
            ret = Box::new(Appl(Box::new(Variable("f".into())), ret));
            n -= 1;
        }
        Box::new(Abstr("f".into(), Box::new(Abstr("x".into(), ret))))
    }

    ///Expr should be fully reduced!!
    pub fn try_unchurch_num(&self) -> Option<u32> {
        use Expr::*;
        match self {
            Abstr(bound_f, body) => match body.as_ref() {
                Abstr(bound_x, body) if bound_x != bound_f => {
                    let mut ret: u32 = 0;
                    let mut current_body: &Expr = body;
                    loop {
                        current_body = match current_body {
                            Variable(now_x) if now_x == bound_x => break Some(ret),
                            Appl(f, rest) if matches!(f.as_ref(), Variable(now_f) if now_f == bound_f) => {
                                ret += 1;
                                rest.as_ref()
                            }
                            _ => break None,
                        }
                    }
                }
                _ => None,
            },
            _ => None,
        }
    }
}

/// Equality up to renaming of bound variables.
pub fn alpha_eq(a: &Expr, b: &Expr) -> bool {
    fn eq<'a>(a: &'a Expr, b: &'a Expr, binders: &mut Vec<(&'a str, &'a str)>) -> bool {
        match (a, b) {
            (Expr::Variable(v), Expr::Variable(w)) => {
                let av = binders.iter().rposition(|(x, _)| *x == v.as_str());
                let bw = binders.iter().rposition(|(_, y)| *y == w.as_str());
                match (av, bw) {
                    (None, None) => v == w,
                    (av, bw) => av == bw,
                }
            }
            (Expr::Macro(n), Expr::Macro(m)) => n == m,
            (Expr::Abstr(v, a_body), Expr::Abstr(w, b_body)) => {
                binders.push((v.as_str(), w.as_str()));
                let ret = eq(a_body, b_body, binders);
                binders.pop();
                ret
            }
            (Expr::Appl(a_f, a_x), Expr::Appl(b_f, b_x)) => {
                eq(a_f, b_f, binders) && eq(a_x, b_x, binders)
            }
            _ => false,
        }
    }
    eq(a, b, &mut Vec::new())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Expr::*;
        if !f.alternate() {
            // Same syntax the parser accepts
            match self {
                Variable(v) => f.write_str(v),
                Macro(n) => f.write_str(n),
                Abstr(p, b) => write!(f, "\\{}.{}", p, b),
                Appl(a, b) => write!(f, "({} {})", a, b),
            }
        } else {
            // A tree representing the expression
            fn tree(
                f: &mut fmt::Formatter<'_>,
                head_prepend: String,
                mut rest_prepend: String,
                expr: &Expr,
            ) -> fmt::Result {
                match expr {
                    Variable(v) => writeln!(f, "{}Var {}", head_prepend, v),
                    Macro(n) => writeln!(f, "{}Macro {}", head_prepend, n),
                    Abstr(p, b) => {
                        write!(f, "{}Abstr {}", head_prepend, p)?;
                        let mut body = b.as_ref();
                        while let Abstr(pn, bn) = body {
                            write!(f, " {}", pn)?;
                            body = bn.as_ref();
                        }
                        writeln!(f)?;
                        let rest = rest_prepend.clone() + "  ";
                        rest_prepend.push_str("`-");
                        tree(f, rest_prepend, rest, body)
                    }
                    Appl(a, b) => {
                        writeln!(f, "{}.", head_prepend)?;
                        let mut stack: Vec<&Expr> = vec![b.as_ref()];
                        let mut current_a = a.as_ref();
                        while let Appl(aa, ab) = current_a {
                            stack.push(ab.as_ref());
                            current_a = aa.as_ref();
                        }

                        let head = rest_prepend.clone() + "|-";
                        let rest = rest_prepend.clone() + "| ";
                        tree(f, head.clone(), rest.clone(), current_a)?;
                        while stack.len() > 1 {
                            if let Some(e) = stack.pop() {
                                tree(f, head.clone(), rest.clone(), e)?;
                            }
                        }

                        let last_rest = rest_prepend.clone() + "  ";
                        rest_prepend.push_str("`-");
                        tree(f, rest_prepend, last_rest, b.as_ref())
                    }
                }
            }
            tree(f, String::new(), String::new(), self)
        }
    }
}

/// Short constructors, mostly for tests and benchmarks.
pub mod expr_aliases {
    use super::Expr;

    pub fn var(name: &str) -> Box<Expr> {
        Box::new(Expr::Variable(name.into()))
    }

    pub fn mac(name: &str) -> Box<Expr> {
        Box::new(Expr::Macro(name.into()))
    }

    pub fn abstr(param: &str, body: Box<Expr>) -> Box<Expr> {
        Box::new(Expr::Abstr(param.into(), body))
    }

    pub fn appl(a: Box<Expr>, b: Box<Expr>) -> Box<Expr> {
        Box::new(Expr::Appl(a, b))
    }

    pub fn church(n: u32) -> Box<Expr> {
        Expr::church_num(n)
    }
}

/// Left-nested application: `vappl!(f, a, b)` is `((f a) b)`.
#[macro_export]
macro_rules! vappl {
    ($e:expr) => { $e };
    ($a:expr, $b:expr $(, $rest:expr)*) => {
        $crate::vappl!($crate::expr::expr_aliases::appl($a, $b) $(, $rest)*)
    };
}

/// Curried abstraction: `vabstr!("x", "y", body)` is `\x.\y.body`.
#[macro_export]
macro_rules! vabstr {
    ($body:expr) => { $body };
    ($p:expr, $($rest:expr),+) => {
        $crate::expr::expr_aliases::abstr($p, $crate::vabstr!($($rest),+))
    };
}
