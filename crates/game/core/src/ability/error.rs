use std::time::Duration;

use crate::error::{ErrorSeverity, GameError};
use crate::state::EntityId;

use super::AbilityId;

/// Why an activation request did nothing.
///
/// These are soft failures: the request leaves every state untouched and the
/// tick carries on.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ActivationError {
    #[error("{ability} is not ready")]
    NotReady { ability: AbilityId },

    #[error("{ability} needs {required} mana, actor has {available}")]
    InsufficientMana {
        ability: AbilityId,
        required: u32,
        available: u32,
    },

    #[error("{ability} aim held for {held:?}, needs {required:?}")]
    AimTooEarly {
        ability: AbilityId,
        held: Duration,
        required: Duration,
    },

    #[error("{ability} has no aim target")]
    MissingAimTarget { ability: AbilityId },

    #[error("ability slot {slot} is empty")]
    EmptySlot { slot: usize },

    #[error("ability slot {slot} is outside the {capacity} fixed slots")]
    SlotOutOfRange { slot: usize, capacity: usize },

    #[error("actor {actor} is not alive")]
    ActorInactive { actor: EntityId },
}

impl GameError for ActivationError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::SlotOutOfRange { .. } => ErrorSeverity::Validation,
            _ => ErrorSeverity::Recoverable,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotReady { .. } => "ACTIVATION_NOT_READY",
            Self::InsufficientMana { .. } => "ACTIVATION_INSUFFICIENT_MANA",
            Self::AimTooEarly { .. } => "ACTIVATION_AIM_TOO_EARLY",
            Self::MissingAimTarget { .. } => "ACTIVATION_MISSING_AIM_TARGET",
            Self::EmptySlot { .. } => "ACTIVATION_EMPTY_SLOT",
            Self::SlotOutOfRange { .. } => "ACTIVATION_SLOT_OUT_OF_RANGE",
            Self::ActorInactive { .. } => "ACTIVATION_ACTOR_INACTIVE",
        }
    }
}

/// A persisted record could not be applied to the loadout.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RestoreError {
    #[error("no {id} ability in this loadout")]
    NotInLoadout { id: AbilityId },
}

impl GameError for RestoreError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NotInLoadout { .. } => "RESTORE_NOT_IN_LOADOUT",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_a_bad_slot_index_is_a_validation_error() {
        let bad_slot = ActivationError::SlotOutOfRange { slot: 9, capacity: 4 };
        assert_eq!(bad_slot.severity(), ErrorSeverity::Validation);
        assert_eq!(bad_slot.error_code(), "ACTIVATION_SLOT_OUT_OF_RANGE");

        let not_ready = ActivationError::NotReady {
            ability: AbilityId::Dash,
        };
        assert!(not_ready.severity().is_recoverable());
        assert_eq!(
            RestoreError::NotInLoadout { id: AbilityId::Magic }.error_code(),
            "RESTORE_NOT_IN_LOADOUT"
        );
    }
}
