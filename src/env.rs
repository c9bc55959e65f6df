use std::path::{Path, PathBuf};

/// Ordered list of directories consulted to resolve a bare command name.
///
/// Duplicates are kept and insertion order is preserved, so the first
/// directory added is the first one searched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPath {
    dirs: Vec<PathBuf>,
}

impl SearchPath {
    pub fn new(dirs: impl IntoIterator<Item = PathBuf>) -> Self {
        Self {
            dirs: dirs.into_iter().collect(),
        }
    }

    /// Forget every directory. Nothing resolves until the path is repopulated.
    pub fn clear(&mut self) {
        self.dirs.clear();
    }

    /// Append `dirs` after the existing entries, in the given order.
    pub fn extend<I, P>(&mut self, dirs: I)
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.dirs.extend(dirs.into_iter().map(Into::into));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Path> {
        self.dirs.iter().map(PathBuf::as_path)
    }

    pub fn is_empty(&self) -> bool {
        self.dirs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.dirs.len()
    }
}

/// Mutable, session-level state shared by the built-ins and the launcher.
///
/// The environment contains:
/// - `search_path`: where external commands are looked up; written only by `path`.
/// - `current_dir`: the working directory, refreshed after every successful `cd`.
///
/// One environment lives as long as one shell session.
#[derive(Debug, Clone)]
pub struct Environment {
    pub search_path: SearchPath,
    pub current_dir: PathBuf,
}

impl Environment {
    /// Start a session with `search_path` and the process' current directory.
    pub fn new(search_path: SearchPath) -> Self {
        let current_dir = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            search_path,
            current_dir,
        }
    }
}
