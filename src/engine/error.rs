use ulid::Ulid;

use crate::model::Ms;

#[derive(Debug)]
pub enum EngineError {
    UserNotFound(Ulid),
    ItemNotFound(Ulid),
    BookingNotFound(Ulid),
    /// Caller is neither the booker nor the item's owner.
    NotAuthorized(Ulid),
    /// Caller does not own the booking's item.
    NotOwner { user_id: Ulid, item_id: Ulid },
    /// Self-booking attempt.
    OwnershipConflict(Ulid),
    /// Item's availability flag is false.
    NotAvailable(Ulid),
    InvalidTimeRange { start: Ms, end: Ms },
    /// The booking already left the WAITING state.
    AlreadyDecided(Ulid),
    InvalidPage { from: i64, size: i64 },
    /// Unrecognized state filter token, reported verbatim.
    UnknownState(String),
    /// Failure surfaced by a store implementation.
    Store(String),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::UserNotFound(id) => write!(f, "user not found: {id}"),
            EngineError::ItemNotFound(id) => write!(f, "item not found: {id}"),
            EngineError::BookingNotFound(id) => write!(f, "booking not found: {id}"),
            EngineError::NotAuthorized(id) => {
                write!(f, "user {id} has no relation to this booking")
            }
            EngineError::NotOwner { user_id, item_id } => {
                write!(f, "user {user_id} does not own item {item_id}")
            }
            EngineError::OwnershipConflict(id) => {
                write!(f, "cannot book own item: {id}")
            }
            EngineError::NotAvailable(id) => {
                write!(f, "item not available for booking: {id}")
            }
            EngineError::InvalidTimeRange { start, end } => {
                write!(f, "invalid time range: end {end} is not after start {start}")
            }
            EngineError::AlreadyDecided(id) => {
                write!(f, "booking already decided: {id}")
            }
            EngineError::InvalidPage { from, size } => {
                write!(f, "invalid page: from={from} size={size}")
            }
            EngineError::UnknownState(token) => write!(f, "unknown state: {token}"),
            EngineError::Store(e) => write!(f, "store error: {e}"),
        }
    }
}

impl std::error::Error for EngineError {}
