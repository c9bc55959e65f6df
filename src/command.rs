use crate::error::ShellError;
use crate::lexer::Tokens;

/// What the line loop should do after a segment has been dispatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Commands implemented inside the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Builtin {
    Exit,
    Cd,
    Path,
}

impl Builtin {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "exit" => Some(Builtin::Exit),
            "cd" => Some(Builtin::Cd),
            "path" => Some(Builtin::Path),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Builtin::Exit => "exit",
            Builtin::Cd => "cd",
            Builtin::Path => "path",
        }
    }
}

/// A classified segment, ready to be routed.
#[derive(Debug, PartialEq, Eq)]
pub enum Command<'a> {
    /// Blank segment; nothing to do.
    Empty,
    /// A built-in with the words that followed its name.
    Builtin { builtin: Builtin, args: Vec<&'a str> },
    /// Anything else goes to the process launcher with the full token list.
    External(&'a Tokens),
}

impl<'a> Command<'a> {
    /// Decide whether `tokens` names a built-in or an external program.
    ///
    /// Built-ins run inside the shell and have no output to redirect, so a
    /// redirection on one is rejected here.
    pub fn classify(tokens: &'a Tokens) -> Result<Self, ShellError> {
        let argv = tokens.argv();
        let Some((&name, args)) = argv.split_first() else {
            return Ok(Command::Empty);
        };
        let Some(builtin) = Builtin::from_name(name) else {
            return Ok(Command::External(tokens));
        };
        if tokens.target().is_some() {
            return Err(ShellError::syntax(format!(
                "{name}: built-ins can't be redirected"
            )));
        }
        Ok(Command::Builtin {
            builtin,
            args: args.to_vec(),
        })
    }
}
