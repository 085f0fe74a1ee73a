use criterion::*;

use macrolambda::{
    eval::{self, Env, Limits},
    expr::Expr,
    parse,
    repl::{Config, Session},
};

fn prelude() -> Env {
    let mut session = Session::new(Config::default());
    session
        .load_str("prelude", include_str!("../res/prelude.lc"))
        .unwrap();
    session.env
}

pub fn bench_prelude(c: &mut Criterion) {
    let input = include_str!("../res/prelude.lc");
    c.bench_function("parse prelude", |b| {
        b.iter(|| {
            input
                .lines()
                .filter(|l| !l.trim().is_empty() && !l.starts_with('#'))
                .map(|l| parse::parse(l).unwrap())
                .count()
        })
    });
    c.bench_function("load prelude", |b| b.iter(prelude));
}

pub fn bench_arithmetic(c: &mut Criterion) {
    let env = prelude();
    let limits = Limits::default();
    for line in &["((_Mult _Ten) _Ten)", "(_Pred _Ten)", "((_Pow _Two) _Ten)"] {
        let expr = parse::parse_expr(line).unwrap();
        c.bench_function(line, |b| {
            b.iter(|| eval::reduce(expr.clone(), &env, &limits).unwrap())
        });
    }
}

pub fn bench_exp(c: &mut Criterion) {
    let mut group = c.benchmark_group("eval exp");
    let env = Env::new();
    let limits = Limits::unbounded();
    for exp in 1..=10 {
        group.bench_with_input(BenchmarkId::from_parameter(exp), &exp, |b, &exp| {
            let e = Box::new(Expr::Appl(Expr::church_num(exp), Expr::church_num(2)));
            b.iter(|| eval::reduce(e.clone(), &env, &limits));
        });
    }
}

criterion_group!(benches, bench_prelude, bench_arithmetic, bench_exp);
criterion_main!(benches);
