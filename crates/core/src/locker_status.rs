//! Locker status values and the transition rules between them.
//!
//! The state machine is a pure function of the current status, the current
//! occupant, the requested event and the acting principal. The allocator
//! consults it for every occupancy change and repeats the expected prior
//! state in the SQL predicate of the write.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::DbId;

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

pub const STATUS_UNOCCUPIED: &str = "UNOCCUPIED";
pub const STATUS_OCCUPIED: &str = "OCCUPIED";
pub const STATUS_UNDER_MANAGEMENT: &str = "UNDER_MANAGEMENT";

/// All valid persisted status strings.
pub const VALID_STATUSES: &[&str] = &[STATUS_UNOCCUPIED, STATUS_OCCUPIED, STATUS_UNDER_MANAGEMENT];

/// Occupancy status of a locker. Persisted as its SCREAMING_SNAKE_CASE name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LockerStatus {
    Unoccupied,
    Occupied,
    UnderManagement,
}

impl LockerStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            LockerStatus::Unoccupied => STATUS_UNOCCUPIED,
            LockerStatus::Occupied => STATUS_OCCUPIED,
            LockerStatus::UnderManagement => STATUS_UNDER_MANAGEMENT,
        }
    }
}

impl fmt::Display for LockerStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LockerStatus {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_UNOCCUPIED => Ok(LockerStatus::Unoccupied),
            STATUS_OCCUPIED => Ok(LockerStatus::Occupied),
            STATUS_UNDER_MANAGEMENT => Ok(LockerStatus::UnderManagement),
            other => Err(CoreError::Validation(format!(
                "Invalid locker status '{other}'. Must be one of: {VALID_STATUSES:?}"
            ))),
        }
    }
}

impl TryFrom<String> for LockerStatus {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

// ---------------------------------------------------------------------------
// Events and actors
// ---------------------------------------------------------------------------

/// A requested change to a locker's occupancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockerEvent {
    Rent,
    Return,
    ForceManagement,
    ForceRelease,
}

impl LockerEvent {
    pub fn as_str(self) -> &'static str {
        match self {
            LockerEvent::Rent => "RENT",
            LockerEvent::Return => "RETURN",
            LockerEvent::ForceManagement => "FORCE_MANAGEMENT",
            LockerEvent::ForceRelease => "FORCE_RELEASE",
        }
    }

    /// The admin event that forces a locker into `target`.
    ///
    /// `OCCUPIED` has no forcing event: occupancy is only ever granted by `RENT`.
    pub fn forcing(target: LockerStatus) -> Option<LockerEvent> {
        match target {
            LockerStatus::UnderManagement => Some(LockerEvent::ForceManagement),
            LockerStatus::Unoccupied => Some(LockerEvent::ForceRelease),
            LockerStatus::Occupied => None,
        }
    }
}

impl fmt::Display for LockerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The authenticated principal performing an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    User { id: DbId },
    Admin { id: DbId },
}

impl Actor {
    pub fn id(self) -> DbId {
        match self {
            Actor::User { id } | Actor::Admin { id } => id,
        }
    }

    pub fn is_admin(self) -> bool {
        matches!(self, Actor::Admin { .. })
    }
}

// ---------------------------------------------------------------------------
// Transitions
// ---------------------------------------------------------------------------

/// An accepted transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: LockerStatus,
    pub to: LockerStatus,
    /// The occupant, start and end fields must be cleared by the same write.
    pub clears_occupant: bool,
}

/// Why a transition was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionRejection {
    /// The actor's role may not issue this event at all.
    NotPermitted { event: LockerEvent },
    /// The event is not legal from the current status.
    IllegalFromState {
        event: LockerEvent,
        current: LockerStatus,
    },
    /// The actor already holds this locker.
    AlreadyOccupant,
    /// The actor is not the recorded occupant.
    NotOccupant,
}

impl TransitionRejection {
    /// Classify the rejection into the domain error taxonomy.
    pub fn into_core_error(self, locker_id: DbId) -> CoreError {
        match self {
            TransitionRejection::NotPermitted { event } => CoreError::Forbidden(format!(
                "{event} on locker {locker_id} requires the admin role"
            )),
            TransitionRejection::IllegalFromState { event, current } => CoreError::Conflict(
                format!("Cannot apply {event} to locker {locker_id}: current status is {current}"),
            ),
            TransitionRejection::AlreadyOccupant => CoreError::Conflict(format!(
                "Locker {locker_id} is already rented by the caller"
            )),
            TransitionRejection::NotOccupant => CoreError::Forbidden(format!(
                "Caller is not the recorded occupant of locker {locker_id}"
            )),
        }
    }
}

/// Decide whether `event` issued by `actor` is legal for a locker currently in
/// `current` and held by `occupant`.
pub fn can_transition(
    current: LockerStatus,
    occupant: Option<DbId>,
    event: LockerEvent,
    actor: Actor,
) -> Result<Transition, TransitionRejection> {
    use LockerStatus::*;

    let to = match event {
        LockerEvent::Rent => match current {
            Unoccupied => Occupied,
            Occupied if occupant == Some(actor.id()) => {
                return Err(TransitionRejection::AlreadyOccupant)
            }
            _ => return Err(TransitionRejection::IllegalFromState { event, current }),
        },
        LockerEvent::Return => match current {
            Occupied if occupant == Some(actor.id()) => Unoccupied,
            Occupied => return Err(TransitionRejection::NotOccupant),
            _ => return Err(TransitionRejection::IllegalFromState { event, current }),
        },
        LockerEvent::ForceManagement | LockerEvent::ForceRelease => {
            if !actor.is_admin() {
                return Err(TransitionRejection::NotPermitted { event });
            }
            if event == LockerEvent::ForceManagement {
                UnderManagement
            } else {
                Unoccupied
            }
        }
    };

    Ok(Transition {
        from: current,
        to,
        clears_occupant: current == Occupied && to != Occupied,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
