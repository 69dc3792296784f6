use std::fmt;

/// Result of performing one logical action (click, type, select).
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    Succeeded,
    TransientFailure(TransientKind),
    PermanentFailure(PermanentKind),
}

/// Failures that may clear up on their own and are retried within a budget.
#[derive(Debug, Clone, PartialEq)]
pub enum TransientKind {
    /// The target was re-rendered under us on every attempt.
    TargetBecameStale,
    /// The target was covered by an overlay and the fallback activation also
    /// failed. Carries the original interception message.
    TargetTemporarilyObscured(String),
}

/// Failures that are surfaced immediately and never retried.
#[derive(Debug, Clone, PartialEq)]
pub enum PermanentKind {
    TargetNotFoundAfterDeadline,
    UnexpectedException(String),
}

impl ActionOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, ActionOutcome::Succeeded)
    }
}

impl fmt::Display for ActionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionOutcome::Succeeded => write!(f, "succeeded"),
            ActionOutcome::TransientFailure(kind) => write!(f, "transient failure: {}", kind),
            ActionOutcome::PermanentFailure(kind) => write!(f, "permanent failure: {}", kind),
        }
    }
}

impl fmt::Display for TransientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransientKind::TargetBecameStale => write!(f, "target became stale"),
            TransientKind::TargetTemporarilyObscured(reason) => {
                write!(f, "target obscured ({})", reason)
            }
        }
    }
}

impl fmt::Display for PermanentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PermanentKind::TargetNotFoundAfterDeadline => {
                write!(f, "target not actionable before deadline")
            }
            PermanentKind::UnexpectedException(reason) => {
                write!(f, "unexpected driver error ({})", reason)
            }
        }
    }
}
