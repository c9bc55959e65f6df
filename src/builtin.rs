use crate::command::Flow;
use crate::env::Environment;
use crate::error::ShellError;
use argh::{EarlyExit, FromArgs};
use std::env;
use std::fs;
use std::path::PathBuf;

/// Built-in commands known to the shell at compile time.
///
/// Builtins are parsed using the [`argh`] crate (`FromArgs`) and run inside the
/// shell process. They only ever touch the session [`Environment`] and the
/// process working directory.
pub(crate) trait BuiltinCommand: Sized + FromArgs {
    /// Canonical name of the command, e.g. "cd" or "path".
    fn name() -> &'static str;

    /// Runs the command against the session environment.
    fn execute(self, env: &mut Environment) -> Result<Flow, ShellError>;
}

/// Parse `args` for builtin `T` and run it.
///
/// Arguments are passed after `--`, so words such as `-x` or `--help` are
/// plain positionals. Any parse failure is an arity problem.
pub(crate) fn run_builtin<T: BuiltinCommand>(
    args: &[&str],
    env: &mut Environment,
) -> Result<Flow, ShellError> {
    let mut argv = Vec::with_capacity(args.len() + 1);
    argv.push("--");
    argv.extend_from_slice(args);

    let cmd = T::from_args(&[T::name()], &argv).map_err(|EarlyExit { output, .. }| {
        ShellError::argument(T::name(), output.trim().to_string())
    })?;
    cmd.execute(env)
}

#[derive(FromArgs)]
/// Change the current working directory.
pub struct Cd {
    #[argh(positional)]
    /// directory to switch to; absolute or relative to the current directory.
    pub target: String,
}

impl BuiltinCommand for Cd {
    fn name() -> &'static str {
        "cd"
    }

    fn execute(self, env: &mut Environment) -> Result<Flow, ShellError> {
        let target = PathBuf::from(&self.target);
        let new_dir = if target.is_absolute() {
            target
        } else {
            env.current_dir.join(target)
        };

        let canonical = fs::canonicalize(&new_dir).map_err(|e| {
            ShellError::system(format!("cd: can't canonicalize {}", new_dir.display()), e)
        })?;
        env::set_current_dir(&canonical).map_err(|e| {
            ShellError::system(format!("cd: can't chdir to {}", canonical.display()), e)
        })?;
        tracing::debug!(dir = %canonical.display(), "changed directory");
        env.current_dir = canonical;
        Ok(Flow::Continue)
    }
}

#[derive(FromArgs)]
/// Append to the list of directories searched for commands.
/// Without arguments the list is cleared.
pub struct Path {
    #[argh(positional, greedy)]
    /// directories appended, in order, to the search path.
    pub dirs: Vec<String>,
}

impl BuiltinCommand for Path {
    fn name() -> &'static str {
        "path"
    }

    fn execute(self, env: &mut Environment) -> Result<Flow, ShellError> {
        if self.dirs.is_empty() {
            env.search_path.clear();
        } else {
            env.search_path.extend(self.dirs);
        }
        tracing::debug!(search_path = ?env.search_path, "search path updated");
        Ok(Flow::Continue)
    }
}

#[derive(FromArgs)]
/// Exit the shell.
pub struct Exit {
    #[argh(positional, greedy)]
    /// not accepted; any argument is reported as an error but still exits.
    pub args: Vec<String>,
}

impl BuiltinCommand for Exit {
    fn name() -> &'static str {
        "exit"
    }

    fn execute(self, _env: &mut Environment) -> Result<Flow, ShellError> {
        if self.args.is_empty() {
            Ok(Flow::Exit)
        } else {
            Err(ShellError::syntax(format!(
                "exit takes no arguments, got {}",
                self.args.join(" ")
            )))
        }
    }
}

/// Serializes tests that change the process working directory.
#[cfg(test)]
pub(crate) fn lock_current_dir() -> std::sync::MutexGuard<'static, ()> {
    use std::sync::{Mutex, OnceLock};
    static MUTEX: OnceLock<Mutex<()>> = OnceLock::new();
    MUTEX
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner())
}
