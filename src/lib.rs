//! A small line-oriented shell.
//!
//! Lines are read from a terminal or a batch file. Each line is split on `&`
//! into segments that are launched together; each segment may send its output
//! to a file with `> target`. Three commands are built in (`exit`, `cd` and
//! `path`); everything else is looked up in the directories of the search path
//! and started as a child process.
//!
//! The main entry point is [`Interpreter`], which owns the session
//! [`Environment`](env::Environment) and runs lines from any [`LineSource`].
//! Process creation goes through the [`Launcher`] trait so the pipeline can be
//! driven without touching the operating system.

pub mod barrier;
mod builtin;
pub mod command;
pub mod config;
pub mod env;
pub mod error;
pub mod external;
pub mod input;
mod interpreter;
pub mod lexer;
pub mod parser;

pub use config::Config;
pub use error::{DIAGNOSTIC, ErrorKind, ShellError};
pub use external::{Launcher, SpawnRequest, SystemLauncher};
pub use input::{Batch, Interactive, LineSource};
pub use interpreter::{Interpreter, LineReport, SessionEnd};
