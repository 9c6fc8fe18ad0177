use std::cell::RefCell;

use crate::models::GenerationMode;

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Requesting(GenerationMode),
    Errored {
        mode: GenerationMode,
        message: String,
    },
}

impl SessionState {
    pub fn is_requesting(&self) -> bool {
        matches!(self, Self::Requesting(_))
    }
}

/// Marks one outstanding request. Dropping it unfinished (for example when the
/// caller cancels or times out the future) returns the session to `Idle`.
pub(crate) struct InFlight<'a> {
    state: &'a RefCell<SessionState>,
    mode: GenerationMode,
    finished: bool,
}

impl<'a> InFlight<'a> {
    /// Returns `None` when another request is already outstanding.
    pub(crate) fn begin(state: &'a RefCell<SessionState>, mode: GenerationMode) -> Option<Self> {
        let mut current = state.borrow_mut();
        if current.is_requesting() {
            return None;
        }
        *current = SessionState::Requesting(mode);

        Some(Self {
            state,
            mode,
            finished: false,
        })
    }

    pub(crate) fn mode(&self) -> GenerationMode {
        self.mode
    }

    pub(crate) fn succeed(mut self) {
        self.finished = true;
        *self.state.borrow_mut() = SessionState::Idle;
    }

    pub(crate) fn fail(mut self, message: String) {
        self.finished = true;
        *self.state.borrow_mut() = SessionState::Errored {
            mode: self.mode,
            message,
        };
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if !self.finished {
            tracing::debug!(mode = %self.mode, "request dropped before completion");
            *self.state.borrow_mut() = SessionState::Idle;
        }
    }
}
