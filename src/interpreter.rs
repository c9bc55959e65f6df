use crate::barrier::PendingChildren;
use crate::builtin::{self, run_builtin};
use crate::command::{Builtin, Command, Flow};
use crate::config::Config;
use crate::env::{Environment, SearchPath};
use crate::error::ShellError;
use crate::external::{Launcher, SpawnRequest, SystemLauncher};
use crate::input::LineSource;
use crate::lexer::tokenize;
use crate::parser::split_line;

/// Result of handling one input line.
#[derive(Debug)]
pub struct LineReport {
    /// Children launched by this line, all of which have been joined.
    pub launched: usize,
    /// `Flow::Exit` when an `exit` built-in ran cleanly.
    pub flow: Flow,
    /// The error that stopped the line, if any. Segments after it never ran.
    pub error: Option<ShellError>,
}

impl LineReport {
    /// Whether the session must stop once this line is done.
    pub fn ends_session(&self) -> bool {
        self.flow == Flow::Exit || self.error.is_some()
    }
}

/// Why a session stopped.
#[derive(Debug)]
pub enum SessionEnd {
    /// The `exit` built-in ran.
    Exit,
    /// The line source ran dry.
    EndOfInput,
    /// A line failed; no later line was read.
    Failed(ShellError),
}

impl SessionEnd {
    /// Process exit status for this ending.
    pub fn exit_code(&self) -> u8 {
        match self {
            SessionEnd::Exit | SessionEnd::EndOfInput => 0,
            SessionEnd::Failed(_) => 1,
        }
    }
}

/// A line-oriented shell session.
///
/// Each line is split into segments on the concurrency operator, every segment
/// is tokenized and dispatched in order, and the children launched by the
/// line are joined before the next line is read. The first error stops the
/// rest of the line and, after the join, the whole session.
///
/// Example
/// ```
/// use wish::{Config, Interpreter};
/// let mut sh = Interpreter::new(Config::default());
/// let report = sh.process_line("path /usr/bin /bin\n");
/// assert!(report.error.is_none());
/// assert_eq!(sh.environment().search_path.len(), 3);
/// ```
pub struct Interpreter<L = SystemLauncher> {
    config: Config,
    env: Environment,
    launcher: L,
}

impl Interpreter<SystemLauncher> {
    /// Create an interpreter that launches real processes.
    pub fn new(config: Config) -> Self {
        Self::with_launcher(config, SystemLauncher)
    }
}

impl<L: Launcher> Interpreter<L> {
    /// Create an interpreter that starts external commands through `launcher`.
    pub fn with_launcher(config: Config, launcher: L) -> Self {
        let search_path = SearchPath::new(config.default_path.iter().cloned());
        Self {
            env: Environment::new(search_path),
            config,
            launcher,
        }
    }

    pub fn environment(&self) -> &Environment {
        &self.env
    }

    /// Read and run lines from `source` until `exit`, end of input, or an error.
    pub fn run<S: LineSource>(&mut self, source: &mut S) -> SessionEnd {
        loop {
            let line = match source.next_line() {
                Ok(Some(line)) => line,
                Ok(None) => return SessionEnd::EndOfInput,
                Err(e) => return SessionEnd::Failed(ShellError::system("can't read input", e)),
            };

            let report = self.process_line(&line);
            if report.ends_session() {
                return match report.error {
                    Some(err) => SessionEnd::Failed(err),
                    None => SessionEnd::Exit,
                };
            }
        }
    }

    /// Dispatch every segment of `line`, then wait for the children it launched.
    pub fn process_line(&mut self, line: &str) -> LineReport {
        let segments = split_line(line, self.config.parallel_op);
        tracing::debug!(count = segments.len(), "segments: {:?}", segments);

        let mut pending = PendingChildren::new();
        let mut flow = Flow::Continue;
        let mut error = None;
        for segment in segments {
            match self.dispatch(segment, &mut pending) {
                Ok(Flow::Continue) => {}
                Ok(Flow::Exit) => {
                    flow = Flow::Exit;
                    break;
                }
                Err(e) => {
                    tracing::debug!("segment {:?} failed: {}", segment, e);
                    error = Some(e);
                    break;
                }
            }
        }

        let launched = pending.wait_all();
        tracing::debug!(launched, "line finished");
        LineReport {
            launched,
            flow,
            error,
        }
    }

    fn dispatch(&mut self, segment: &str, pending: &mut PendingChildren) -> Result<Flow, ShellError> {
        let tokens = tokenize(segment, self.config.redirect_op)?;
        tracing::trace!("tokens: {:?}", tokens.as_slice());

        match Command::classify(&tokens)? {
            Command::Empty => Ok(Flow::Continue),
            Command::Builtin { builtin: kind, args } => match kind {
                Builtin::Exit => run_builtin::<builtin::Exit>(&args, &mut self.env),
                Builtin::Cd => run_builtin::<builtin::Cd>(&args, &mut self.env),
                Builtin::Path => run_builtin::<builtin::Path>(&args, &mut self.env),
            },
            Command::External(tokens) => {
                let request = SpawnRequest::prepare(tokens, &self.env.search_path)?;
                tracing::debug!(?request, "launching");
                pending.push(self.launcher.launch(&request)?);
                Ok(Flow::Continue)
            }
        }
    }
}
