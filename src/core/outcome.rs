//! Results and completion signals exchanged with the binding layer.

use crate::error::RenderError;

/// What an accepted enqueue did to the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Enqueued {
    /// A new toast was appended at `index`.
    Inserted { index: usize },
    /// An existing toast at `index` had its duration refreshed.
    Updated { index: usize },
}

impl Enqueued {
    #[inline]
    pub fn index(&self) -> usize {
        match self {
            Enqueued::Inserted { index } | Enqueued::Updated { index } => *index,
        }
    }

    #[inline]
    pub fn is_head(&self) -> bool {
        self.index() == 0
    }
}

/// How a shown toast ended, as reported by its renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShowOutcome {
    /// Dismissed normally.
    Hidden,
    /// Its duration elapsed.
    TimedOut,
    /// The renderer failed after accepting the toast.
    Failed(RenderError),
}

impl ShowOutcome {
    pub fn as_label(&self) -> &'static str {
        match self {
            ShowOutcome::Hidden => "hidden",
            ShowOutcome::TimedOut => "timed_out",
            ShowOutcome::Failed(_) => "failed",
        }
    }
}
