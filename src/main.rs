/// lambdak - demo runner for the trampolined evaluator
use lambdak::*;
use std::env;
use std::path::PathBuf;
use std::process;
use std::str::FromStr;
use tracing::{debug, Level};

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Environment variable selecting the log level when `-v` is absent
const LOG_ENV: &str = "LAMBDAK_LOG";

const MODULUS: i64 = 1_000_000_007;

fn print_usage() {
    eprintln!("lambdak v{}", VERSION);
    eprintln!();
    eprintln!("USAGE:");
    eprintln!("    lambdak [OPTIONS] <DEMO> [N]");
    eprintln!();
    eprintln!("OPTIONS:");
    eprintln!("    -h, --help             Print this help message");
    eprintln!("    -V, --version          Print version information");
    eprintln!("    -v                     Increase log verbosity (repeatable)");
    eprintln!("    --config <FILE>        Read trampoline settings from a TOML file");
    eprintln!("    --steps <N>            Fail after N trampoline steps (0 = unlimited)");
    eprintln!();
    eprintln!("DEMOS:");
    eprintln!("    factorial [N]          N! mod 1_000_000_007 (default N = 20)");
    eprintln!("    countdown [N]          Print N down to 1, then liftoff (default N = 10)");
    eprintln!("    fizzbuzz [N]           FizzBuzz from 1 to N (default N = 15)");
    eprintln!();
    eprintln!("ENVIRONMENT:");
    eprintln!("    {:<22} Log level (error, warn, info, debug, trace)", LOG_ENV);
    eprintln!("    {:<22} Overrides step_limit", STEP_LIMIT_ENV);
    eprintln!("    {:<22} Overrides progress_interval", PROGRESS_INTERVAL_ENV);
    eprintln!();
    eprintln!("EXAMPLES:");
    eprintln!("    lambdak factorial 100000");
    eprintln!("    lambdak --steps 50 countdown 100");
    eprintln!("    lambdak -vv --config lambdak.toml fizzbuzz 30");
}

fn print_version() {
    println!("lambdak {}", VERSION);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Demo {
    Factorial,
    Countdown,
    FizzBuzz,
}

impl Demo {
    fn default_n(self) -> i64 {
        match self {
            Demo::Factorial => 20,
            Demo::Countdown => 10,
            Demo::FizzBuzz => 15,
        }
    }
}

impl FromStr for Demo {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "factorial" => Ok(Demo::Factorial),
            "countdown" => Ok(Demo::Countdown),
            "fizzbuzz" => Ok(Demo::FizzBuzz),
            other => Err(format!("Unknown demo: {}", other)),
        }
    }
}

struct Options {
    demo: Demo,
    n: i64,
    config: Option<PathBuf>,
    steps: Option<u64>,
    verbosity: u8,
}

fn parse_args() -> Result<Options, String> {
    let args: Vec<String> = env::args().collect();

    let mut demo = None;
    let mut n = None;
    let mut config = None;
    let mut steps = None;
    let mut verbosity = 0u8;
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_usage();
                process::exit(0);
            }
            "-V" | "--version" => {
                print_version();
                process::exit(0);
            }
            "--config" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing file after --config".to_string());
                }
                config = Some(PathBuf::from(&args[i]));
            }
            "--steps" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing count after --steps".to_string());
                }
                steps = Some(
                    args[i]
                        .parse::<u64>()
                        .map_err(|_| format!("Invalid step count: {}", args[i]))?,
                );
            }
            arg if arg.len() > 1 && arg.starts_with('-') && arg[1..].chars().all(|c| c == 'v') => {
                verbosity = verbosity.saturating_add((arg.len() - 1) as u8);
            }
            arg if arg.starts_with('-') => {
                return Err(format!("Unknown option: {}", arg));
            }
            arg if demo.is_none() => {
                demo = Some(arg.parse::<Demo>()?);
            }
            arg => {
                if n.is_some() {
                    return Err(format!("Unexpected argument: {}", arg));
                }
                n = Some(
                    arg.parse::<i64>()
                        .map_err(|_| format!("Invalid number: {}", arg))?,
                );
            }
        }
        i += 1;
    }

    let demo = demo.ok_or_else(|| "No demo specified".to_string())?;
    Ok(Options {
        demo,
        n: n.unwrap_or_else(|| demo.default_n()),
        config,
        steps,
        verbosity,
    })
}

fn init_logging(verbosity: u8) {
    let level = match verbosity {
        0 => env::var(LOG_ENV)
            .ok()
            .and_then(|s| Level::from_str(&s).ok())
            .unwrap_or(Level::WARN),
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

fn load_config(options: &Options) -> Result<TrampolineConfig, String> {
    let config = match &options.config {
        Some(path) => TrampolineConfig::from_path(path).map_err(|e| e.to_string())?,
        None => TrampolineConfig::default(),
    };
    let config = config.with_env_overrides().map_err(|e| e.to_string())?;
    Ok(match options.steps {
        Some(0) => TrampolineConfig {
            step_limit: None,
            ..config
        },
        Some(limit) => config.with_step_limit(limit),
        None => config,
    })
}

fn long_arg(value: &Value) -> Result<i64, EvalError> {
    value
        .as_long()
        .ok_or_else(|| EvalError::Type(format!("expected Long, got {}", value.type_name())))
}

/// n! mod 1_000_000_007, one deferred step per factor
fn factorial(n: i64) -> Lambdak {
    let step = recur_(|again, state| {
        let pair = state
            .as_list()
            .ok_or_else(|| EvalError::Type(format!("expected List, got {}", state.type_name())))?;
        let (n, acc) = match pair {
            [n, acc] => (long_arg(n)?, long_arg(acc)?),
            _ => return Err(EvalError::Arity { expected: 2, got: pair.len() }),
        };
        if n <= 1 {
            return Ok(Step::done(acc));
        }
        let next = vec![Value::from(n - 1), Value::from(acc * (n % MODULUS) % MODULUS)];
        Ok(Step::Defer(Lambdak::with_value(again.clone(), next)))
    });
    let_(vec![Value::from(n), Value::from(1)], step)
}

fn countdown(n: i64) -> Lambdak {
    let counter = Object::from_pairs([("n", n)]);
    let out = stdout_sink();
    let test = {
        let counter = counter.clone();
        pred(move || getattr_(&counter, "n").ok().and_then(|v| v.as_long()).unwrap_or(0) > 0)
    };
    let body = {
        let (counter, out) = (counter.clone(), out.clone());
        thunk(move || {
            let current = getattr_(&counter, "n")?;
            let decrement = modattr_(
                &counter,
                "n",
                |v| Ok(Value::from(long_arg(&v)? - 1)),
                None,
            );
            Ok(Step::Defer(print_to(out.clone(), current, Some(chain_(decrement)))))
        })
    };
    while_(test, body, Some(chain_(print_to(out, "liftoff", None))))
}

fn fizzbuzz(n: i64) -> Lambdak {
    let out = stdout_sink();
    let numbers: Vec<Value> = (1..=n).map(Value::from).collect();
    for_(
        numbers,
        unary(move |item| {
            let i = long_arg(&item)?;
            let out = out.clone();
            Ok(Step::Defer(cond_(
                vec![
                    (pred(move || i % 15 == 0), thunk(|| Ok(Step::done("FizzBuzz")))),
                    (pred(move || i % 3 == 0), thunk(|| Ok(Step::done("Fizz")))),
                    (pred(move || i % 5 == 0), thunk(|| Ok(Step::done("Buzz")))),
                ],
                Some(thunk(move || Ok(Step::done(i)))),
                Some(unary(move |word| Ok(Step::Defer(print_to(out.clone(), word, None))))),
            )))
        }),
        None,
    )
}

fn run(options: &Options) -> Result<(), String> {
    let config = load_config(options)?;
    debug!(target: "lambdak::cli", demo = ?options.demo, n = options.n, ?config, "running demo");

    let program = match options.demo {
        Demo::Factorial => factorial(options.n),
        Demo::Countdown => countdown(options.n),
        Demo::FizzBuzz => fizzbuzz(options.n),
    };
    let value = program
        .run_with(&config)
        .map_err(|e| format!("{}: {}", e.kind(), e))?;
    if !value.is_nil() {
        println!("{}", value);
    }
    Ok(())
}

fn main() {
    let options = match parse_args() {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("Error: {}", e);
            eprintln!();
            print_usage();
            process::exit(1);
        }
    };

    init_logging(options.verbosity);

    if let Err(e) = run(&options) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
