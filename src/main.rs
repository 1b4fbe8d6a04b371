use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use ariadne_expr::{Expression, Options, Param, Parameter, ParameterList};
use clap::Parser;
use log::{LevelFilter, Log, Metadata, Record};

/// Evaluates an expression, asking on stdin for the value of every symbol it
/// references.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Only print the free symbols of the expression, one per line.
    #[arg(short, long)]
    symbols: bool,

    /// Binds a symbol without prompting. May be repeated.
    #[arg(long = "set", value_name = "NAME=VALUE", value_parser = parse_binding)]
    set: Vec<Parameter>,

    /// Deepest bracket / unary nesting the parser accepts.
    #[arg(long, default_value_t = Options::DEFAULT_MAX_DEPTH)]
    max_depth: usize,

    /// Log to stderr; repeat for more detail.
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// The expression. Read from the first line of stdin when omitted.
    expression: Option<String>,
}

/// The only log sink: writes records to stderr.
struct StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

/// Numbers bind as reals, anything else as text.
fn read_param(text: &str) -> Param {
    match text.trim().parse::<f64>() {
        Ok(r) => Param::Real(r),
        Err(_) => Param::Text(text.to_string()),
    }
}

fn parse_binding(s: &str) -> Result<Parameter, String> {
    match s.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok(Parameter::new(name.trim(), read_param(value)))
        }
        _ => Err(format!("expected NAME=VALUE, got '{}'", s)),
    }
}

/// Asks for `name` until a non-empty line arrives.
fn prompt<I>(name: &str, lines: &mut I) -> io::Result<Param>
where
    I: Iterator<Item = io::Result<String>>,
{
    print!("{} = ", name);
    io::stdout().flush()?;
    for line in lines {
        let line = line?;
        if !line.is_empty() {
            return Ok(read_param(&line));
        }
    }
    Err(io::Error::new(io::ErrorKind::UnexpectedEof, "input ended"))
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    let mut lines = io::stdin().lock().lines();
    let src = match args.expression {
        Some(src) => src,
        None => match lines.next() {
            Some(Ok(line)) => line,
            _ => String::new(),
        },
    };

    let mut expr = Expression::with_options(&src, Options::new().max_depth(args.max_depth));
    if !expr.is_ok() {
        eprintln!("Error: {}", expr.message());
        return ExitCode::from(1);
    }

    if args.symbols {
        for s in expr.symbols() {
            println!("{}", s);
        }
        return ExitCode::SUCCESS;
    }

    let mut params: ParameterList = args.set.into_iter().collect();
    for name in expr.symbols().to_vec() {
        if params.contains(&name) {
            continue;
        }
        match prompt(&name, &mut lines) {
            Ok(value) => params.insert(&name, value),
            Err(e) => {
                eprintln!("Error: not a valid parameter for {}: {}", name, e);
                return ExitCode::from(2);
            }
        }
    }

    match expr.eval_params(&params) {
        Ok(v) => {
            println!("{}", v);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::from(3)
        }
    }
}
