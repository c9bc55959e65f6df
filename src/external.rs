use crate::env::SearchPath;
use crate::error::ShellError;
use crate::lexer::Tokens;
use std::fs::File;
use std::io;
use std::os::unix::fs::PermissionsExt;
use std::os::unix::process::CommandExt;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};

/// Everything needed to start one external program.
///
/// Built by [`SpawnRequest::prepare`] without touching any process state, then
/// handed to a [`Launcher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpawnRequest {
    /// Resolved executable, e.g. `/bin/ls`.
    pub program: PathBuf,
    /// Argument vector as the program sees it; `argv[0]` is the name the user typed.
    pub argv: Vec<String>,
    /// File that receives both stdout and stderr, truncated first.
    pub redirect: Option<PathBuf>,
}

impl SpawnRequest {
    /// Resolve `tokens` against `search_path` and build the argument vector.
    ///
    /// The redirect marker and its target never reach the program.
    pub fn prepare(tokens: &Tokens, search_path: &SearchPath) -> Result<Self, ShellError> {
        let argv: Vec<String> = tokens.argv().into_iter().map(str::to_owned).collect();
        let Some(name) = argv.first() else {
            return Err(ShellError::syntax("redirection without a command"));
        };
        let program = find_command_path(search_path, name)
            .ok_or_else(|| ShellError::Resolution(name.clone()))?;
        Ok(Self {
            program,
            argv,
            redirect: tokens.target().map(PathBuf::from),
        })
    }
}

/// Find `name` in the directories of `search_path`.
///
/// Directories are tried in registry order and the first one holding an
/// executable regular file called `name` wins. The candidate is
/// `dir + "/" + name`, so a name containing slashes is still looked up below
/// each directory.
pub fn find_command_path(search_path: &SearchPath, name: &str) -> Option<PathBuf> {
    search_path
        .iter()
        .map(|dir| candidate(dir, name))
        .find(|path| is_executable(path))
}

fn candidate(dir: &Path, name: &str) -> PathBuf {
    let mut path = dir.as_os_str().to_owned();
    path.push("/");
    path.push(name);
    PathBuf::from(path)
}

fn is_executable(path: &Path) -> bool {
    path.metadata()
        .map(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// A started child the shell will eventually wait for.
pub trait ChildProcess {
    fn id(&self) -> u32;

    /// Block until the child exits. The exit status is not reported.
    fn wait(&mut self) -> io::Result<()>;
}

impl ChildProcess for Child {
    fn id(&self) -> u32 {
        Child::id(self)
    }

    fn wait(&mut self) -> io::Result<()> {
        Child::wait(self).map(|_| ())
    }
}

/// Starts programs described by a [`SpawnRequest`] without waiting for them.
pub trait Launcher {
    fn launch(&mut self, request: &SpawnRequest) -> Result<Box<dyn ChildProcess>, ShellError>;
}

/// Launches real operating-system processes.
///
/// The child inherits stdin. With a redirect, stdout and stderr share one
/// handle to the target file; otherwise both are inherited from the shell.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn launch(&mut self, request: &SpawnRequest) -> Result<Box<dyn ChildProcess>, ShellError> {
        // The target must stay untouched when there is nothing to run.
        if !is_executable(&request.program) {
            let kind = if request.program.exists() {
                io::ErrorKind::PermissionDenied
            } else {
                io::ErrorKind::NotFound
            };
            return Err(ShellError::system(
                format!("can't spawn {}", request.program.display()),
                io::Error::from(kind),
            ));
        }

        let mut cmd = Command::new(&request.program);
        if let Some((name, args)) = request.argv.split_first() {
            cmd.arg0(name).args(args);
        }
        cmd.stdin(Stdio::inherit());

        if let Some(target) = &request.redirect {
            let stdout = File::create(target).map_err(|e| ShellError::open_failed(target, e))?;
            let stderr = stdout
                .try_clone()
                .map_err(|e| ShellError::open_failed(target, e))?;
            cmd.stdout(Stdio::from(stdout)).stderr(Stdio::from(stderr));
        }

        let child = cmd.spawn().map_err(|e| {
            ShellError::system(format!("can't spawn {}", request.program.display()), e)
        })?;
        tracing::debug!(pid = child.id(), program = %request.program.display(), "spawned");
        Ok(Box::new(child))
    }
}
