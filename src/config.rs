use std::path::PathBuf;

/// Knobs fixed for the lifetime of a session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Printed before every interactive read. Batch sessions never prompt.
    pub prompt: String,
    /// Separates commands that should run concurrently.
    pub parallel_op: char,
    /// Sends a command's stdout and stderr to the word that follows it.
    pub redirect_op: char,
    /// Contents of the search path when the session starts.
    pub default_path: Vec<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: "wish> ".to_string(),
            parallel_op: '&',
            redirect_op: '>',
            default_path: vec![PathBuf::from("/bin")],
        }
    }
}

impl Config {
    /// Replace the default search path, keeping the default when `dirs` is empty.
    pub fn with_search_path(mut self, dirs: Vec<PathBuf>) -> Self {
        if !dirs.is_empty() {
            self.default_path = dirs;
        }
        self
    }
}
