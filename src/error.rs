use std::fmt;
use thiserror::Error;

use crate::handlers::{HandlerError, RegistryError};
use crate::jobs::{Addon, WashTier};

/// Pipeline step a processing error originated in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    Wash(WashTier),
    Addon(Addon),
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Wash(tier) => write!(f, "wash phase ({tier})"),
            Phase::Addon(addon) => write!(f, "addon step ({addon})"),
        }
    }
}

/// Why a job stopped before completing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProcessingError {
    #[error("invalid argument in {phase}: {reason}")]
    InvalidArgument { phase: Phase, reason: String },

    #[error("{phase} could not be dispatched: {source}")]
    UnknownKey {
        phase: Phase,
        #[source]
        source: RegistryError,
    },

    #[error("{phase} cancelled")]
    Cancelled { phase: Phase },

    #[error("{phase} failed: {reason}")]
    HandlerFailed { phase: Phase, reason: String },
}

impl ProcessingError {
    pub fn from_handler(phase: Phase, err: HandlerError) -> Self {
        match err {
            HandlerError::InvalidArgument(reason) => Self::InvalidArgument { phase, reason },
            HandlerError::Cancelled => Self::Cancelled { phase },
            HandlerError::Failed(reason) => Self::HandlerFailed { phase, reason },
        }
    }

    pub fn phase(&self) -> Phase {
        match self {
            Self::InvalidArgument { phase, .. }
            | Self::UnknownKey { phase, .. }
            | Self::Cancelled { phase }
            | Self::HandlerFailed { phase, .. } => *phase,
        }
    }

    /// Work was stopped rather than failed
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_handler_keeps_phase() {
        let phase = Phase::Addon(Addon::TireShine);

        let err = ProcessingError::from_handler(phase, HandlerError::Cancelled);
        assert!(err.is_cancelled());
        assert_eq!(err.phase(), phase);

        let err = ProcessingError::from_handler(phase, HandlerError::Failed("jammed".into()));
        assert!(!err.is_cancelled());
        assert_eq!(err.to_string(), "addon step (TireShine) failed: jammed");
    }

    #[test]
    fn test_unknown_key_display() {
        let err = ProcessingError::UnknownKey {
            phase: Phase::Wash(WashTier::ToTheMax),
            source: RegistryError::UnknownKey {
                kind: "wash",
                key: "ToTheMax".to_string(),
            },
        };
        assert_eq!(
            err.to_string(),
            "wash phase (ToTheMax) could not be dispatched: no wash handler registered for key 'ToTheMax'"
        );
    }
}
