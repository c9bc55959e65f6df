use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::io::{self, BufRead};

/// Where the interpreter gets its lines from.
pub trait LineSource {
    /// The next raw line, or `None` once the input is exhausted.
    fn next_line(&mut self) -> io::Result<Option<String>>;
}

/// Lines typed at a terminal, each one prompted and line-edited.
pub struct Interactive {
    editor: DefaultEditor,
    prompt: String,
}

impl Interactive {
    pub fn new(prompt: impl Into<String>) -> rustyline::Result<Self> {
        Ok(Self {
            editor: DefaultEditor::new()?,
            prompt: prompt.into(),
        })
    }
}

impl LineSource for Interactive {
    fn next_line(&mut self) -> io::Result<Option<String>> {
        loop {
            match self.editor.readline(&self.prompt) {
                Ok(line) => {
                    if let Err(e) = self.editor.add_history_entry(line.as_str()) {
                        tracing::warn!("couldn't add to history: {}", e);
                    }
                    return Ok(Some(line));
                }
                // Ctrl-C drops the half-typed line and prompts again.
                Err(ReadlineError::Interrupted) => continue,
                Err(ReadlineError::Eof) => return Ok(None),
                Err(ReadlineError::Io(e)) => return Err(e),
                Err(e) => return Err(io::Error::other(e.to_string())),
            }
        }
    }
}

/// Lines read from a script, without any prompt.
pub struct Batch<R> {
    reader: R,
}

impl<R: BufRead> Batch<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for Batch<R> {
    /// Bytes that are not valid UTF-8 become U+FFFD instead of ending the session.
    fn next_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = Vec::new();
        match self.reader.read_until(b'\n', &mut buf)? {
            0 => Ok(None),
            _ => Ok(Some(String::from_utf8_lossy(&buf).into_owned())),
        }
    }
}
