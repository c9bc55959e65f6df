use anyhow::{Context, bail};
use argh::{EarlyExit, FromArgs};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};
use wish::{Batch, Config, DIAGNOSTIC, Interactive, Interpreter, SessionEnd};

#[derive(FromArgs)]
/// Run commands from a batch file, or interactively when no file is given.
struct Args {
    #[argh(switch, short = 'd')]
    /// log every stage of command processing to stderr.
    debug: bool,

    #[argh(option, short = 'p')]
    /// directory for the initial search path; repeat to add more (default /bin).
    path: Vec<PathBuf>,

    #[argh(positional, greedy)]
    /// file to read commands from.
    batch: Vec<String>,
}

impl Args {
    /// Parse the command line without letting argh print or exit.
    fn parse(argv: &[String]) -> Result<Self, EarlyExit> {
        let (cmd, rest) = match argv.split_first() {
            Some((cmd, rest)) => (cmd.as_str(), rest),
            None => ("wish", &[][..]),
        };
        Args::from_args(&[cmd], &end_options(rest))
    }
}

/// Insert `--` before the first word that is not one of our own flags.
///
/// Everything from there on is a batch file name, even `help` or `-x`.
fn end_options(args: &[String]) -> Vec<&str> {
    let mut out = Vec::with_capacity(args.len() + 1);
    let mut iter = args.iter().map(String::as_str);
    while let Some(arg) = iter.next() {
        match arg {
            "-d" | "--debug" => out.push(arg),
            "-p" | "--path" => {
                out.push(arg);
                out.extend(iter.next());
            }
            "--" => {
                out.push(arg);
                out.extend(iter);
                return out;
            }
            _ => {
                out.push("--");
                out.push(arg);
                out.extend(iter);
                return out;
            }
        }
    }
    out
}

fn main() -> ExitCode {
    let argv: Vec<String> = std::env::args().collect();
    let Ok(args) = Args::parse(&argv) else {
        eprint!("{DIAGNOSTIC}");
        return ExitCode::FAILURE;
    };
    init_tracing(args.debug);

    let end = match run(args) {
        Ok(end) => end,
        Err(err) => {
            tracing::debug!("{err:#}");
            eprint!("{DIAGNOSTIC}");
            return ExitCode::FAILURE;
        }
    };
    match &end {
        SessionEnd::Failed(err) => {
            tracing::debug!("{err:#}");
            eprint!("{DIAGNOSTIC}");
        }
        _ => tracing::debug!(?end, "session finished"),
    }
    ExitCode::from(end.exit_code())
}

fn run(args: Args) -> anyhow::Result<SessionEnd> {
    if args.batch.len() > 1 {
        bail!("expected at most one batch file, got {}", args.batch.len());
    }
    let config = Config::default().with_search_path(args.path);
    let prompt = config.prompt.clone();
    let mut shell = Interpreter::new(config);

    let end = match args.batch.first() {
        Some(file) => {
            let file = File::open(file).with_context(|| format!("can't open {file}"))?;
            shell.run(&mut Batch::new(BufReader::new(file)))
        }
        None => {
            let mut source = Interactive::new(prompt).context("can't start the line editor")?;
            shell.run(&mut source)
        }
    };
    Ok(end)
}

/// Logging is off unless `--debug` is given or `WISH_LOG` holds a filter.
fn init_tracing(debug: bool) {
    let filter = if debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("WISH_LOG").unwrap_or_else(|_| EnvFilter::new("off"))
    };
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
