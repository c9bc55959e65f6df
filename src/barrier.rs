use crate::external::ChildProcess;

/// Children launched while handling the current line.
///
/// Owned by the line loop: filled while segments are dispatched, drained by
/// [`PendingChildren::wait_all`] before the next line is read.
#[derive(Default)]
pub struct PendingChildren {
    children: Vec<Box<dyn ChildProcess>>,
}

impl PendingChildren {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, child: Box<dyn ChildProcess>) {
        self.children.push(child);
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Wait for every pending child and forget them. Returns how many were joined.
    ///
    /// Exit statuses are discarded. A failed wait is logged and the child
    /// is dropped like any other.
    pub fn wait_all(&mut self) -> usize {
        if self.is_empty() {
            return 0;
        }
        let joined = self.len();
        tracing::debug!(joined, "waiting for line's children");
        for mut child in self.children.drain(..) {
            let pid = child.id();
            match child.wait() {
                Ok(()) => tracing::trace!(pid, "child finished"),
                Err(e) => tracing::warn!(pid, "waiting for child failed: {}", e),
            }
        }
        joined
    }
}
