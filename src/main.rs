use std::{error::Error, path::PathBuf};

use structopt::StructOpt;

use macrolambda::eval::Limits;
use macrolambda::repl::{self, Config, Reply, Session};

#[derive(Debug, StructOpt)]
#[structopt(
    name = "macrolambda",
    about = "Untyped lambda calculus with named macros"
)]
struct Opt {
    /// Print reduction statistics to stderr
    #[structopt(short, long)]
    stats: bool,

    /// Reduction steps allowed per line, 0 for no limit
    #[structopt(long, default_value = "1000000")]
    max_steps: u64,

    /// Largest expression size allowed during reduction, 0 for no limit
    #[structopt(long, default_value = "1000000")]
    max_size: usize,

    /// Deepest expression nesting allowed during reduction, 0 for no limit
    #[structopt(long, default_value = "5000")]
    max_depth: usize,

    /// Evaluate this line and exit instead of starting the REPL (repeatable)
    #[structopt(short, long = "eval", number_of_values = 1)]
    eval: Vec<String>,

    /// Files of definitions, one per line, to load first
    #[structopt(parse(from_os_str))]
    files: Vec<PathBuf>,
}

fn main() -> Result<(), Box<dyn Error>> {
    let opt = Opt::from_args();
    let config = Config {
        limits: Limits {
            max_steps: Some(opt.max_steps).filter(|&n| n > 0),
            max_size: Some(opt.max_size).filter(|&n| n > 0),
            max_depth: Some(opt.max_depth).filter(|&n| n > 0),
        },
        stats: opt.stats,
    };

    let mut session = Session::new(config);
    for f in &opt.files {
        session.load(f)?;
    }

    if opt.eval.is_empty() {
        return repl::repl(session);
    }
    for line in &opt.eval {
        match session.handle(line)? {
            Reply::Print(s) => println!("{}", s),
            Reply::Nothing => {}
            Reply::Quit => break,
        }
    }
    Ok(())
}
