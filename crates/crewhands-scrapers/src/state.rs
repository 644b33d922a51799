//! Per-session scrape state machine.

use std::fmt;

use crate::error::ScrapeError;

/// Where a site adapter is in its session.
///
/// ```text
/// Idle -> Initializing -> (LoggingIn) -> Searching -> Paginating
///      Paginating <-> Extracting -> Saved -> Closed
/// ```
///
/// `Failed` is reachable from every state and `Closed` from every state, so
/// teardown always succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionState {
    Idle,
    Initializing,
    LoggingIn,
    Searching,
    Paginating,
    Extracting,
    Saved,
    Failed,
    Closed,
}

impl SessionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Initializing => "initializing",
            SessionState::LoggingIn => "logging_in",
            SessionState::Searching => "searching",
            SessionState::Paginating => "paginating",
            SessionState::Extracting => "extracting",
            SessionState::Saved => "saved",
            SessionState::Failed => "failed",
            SessionState::Closed => "closed",
        }
    }

    pub fn can_transition_to(&self, next: SessionState) -> bool {
        use SessionState::*;

        match (*self, next) {
            (Closed, _) => next == Closed,
            (_, Failed | Closed) => true,
            (Idle, Initializing)
            | (Initializing, LoggingIn | Searching)
            | (LoggingIn, Searching)
            // A retried search re-enters Searching.
            | (Searching, Searching | Paginating)
            // A stalled advance is attempted again without re-extracting.
            | (Paginating, Paginating | Extracting | Saved)
            | (Extracting, Paginating | Saved) => true,
            _ => false,
        }
    }

    /// Move to `next`, or report the invalid transition.
    pub fn advance(&mut self, next: SessionState) -> Result<(), ScrapeError> {
        if !self.can_transition_to(next) {
            return Err(ScrapeError::InvalidTransition {
                from: *self,
                to: next,
            });
        }
        *self = next;
        Ok(())
    }

    /// Whether the session has been torn down.
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Closed)
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::SessionState::*;
    use super::*;

    #[test]
    fn test_happy_path() {
        let mut state = Idle;
        for next in [
            Initializing,
            LoggingIn,
            Searching,
            Paginating,
            Extracting,
            Paginating,
            Extracting,
            Saved,
            Closed,
        ] {
            state.advance(next).unwrap();
        }
        assert!(state.is_terminal());
    }

    #[test]
    fn test_login_is_optional() {
        let mut state = Initializing;
        assert!(state.advance(Searching).is_ok());
    }

    #[test]
    fn test_failed_reachable_from_any_state() {
        for state in [Idle, Initializing, LoggingIn, Searching, Paginating, Extracting, Saved] {
            assert!(state.can_transition_to(Failed), "{} -> failed", state);
            assert!(state.can_transition_to(Closed), "{} -> closed", state);
        }
        assert!(Failed.can_transition_to(Closed));
    }

    #[test]
    fn test_invalid_transitions() {
        let mut state = Idle;
        let err = state.advance(Extracting).unwrap_err();
        assert!(matches!(err, ScrapeError::InvalidTransition { from: Idle, to: Extracting }));
        assert_eq!(state, Idle);

        assert!(!Searching.can_transition_to(Extracting));
        assert!(!Saved.can_transition_to(Paginating));
        assert!(!Failed.can_transition_to(Searching));
    }

    #[test]
    fn test_closed_only_stays_closed() {
        assert!(Closed.can_transition_to(Closed));
        assert!(!Closed.can_transition_to(Failed));
        assert!(!Closed.can_transition_to(Initializing));
    }
}
